use std::{collections::BTreeMap, fs, path::Path};

use anyhow::Context as _;
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::{
    components::UiComponent,
    header::NavLink,
    pipeline::{self, OutputPlugin},
    routes::BuildRoutes,
    social::SocialProfile,
};

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum Environment {
    Development,
    Production,
}

impl Environment {
    pub fn is_development(self) -> bool {
        self == Environment::Development
    }
}

fn default_dev_url() -> Url {
    Url::parse("http://localhost:3001").expect("static url is valid")
}

fn default_language() -> String {
    "en".to_string()
}

/// Contents of the site's `config.toml`.
#[derive(Deserialize, Serialize)]
pub struct Config {
    pub title: String,
    /// Host the production build is served from.
    pub alias: String,
    #[serde(default = "default_dev_url")]
    pub dev_url: Url,
    #[serde(default)]
    pub offline: bool,
    #[serde(default = "default_language")]
    pub language: String,
    pub author: Option<String>,
    #[serde(default)]
    pub social: SocialProfile,
    #[serde(default)]
    pub nav: Vec<NavLink>,
    /// Overrides for the default component map, keyed by element kind.
    #[serde(default)]
    pub components: BTreeMap<String, UiComponent>,
    #[serde(default, skip_serializing)]
    pub routes: BuildRoutes,
}

impl Config {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading {}", path.display()))?;
        let config = toml::from_str(&text)
            .with_context(|| format!("parsing {}", path.display()))?;
        Ok(config)
    }

    pub fn asset_prefix(&self, environment: Environment) -> anyhow::Result<Url> {
        match environment {
            Environment::Production => {
                let prefix = format!("https://{}", self.alias.trim_end_matches('/'));
                Url::parse(&prefix).with_context(|| format!("invalid alias '{}'", self.alias))
            }
            Environment::Development => Ok(self.dev_url.clone()),
        }
    }
}

/// Everything that depends on the environment, resolved once before the build starts.
pub struct BuildConfig {
    pub environment: Environment,
    pub asset_prefix: Url,
    pub plugins: Vec<Box<dyn OutputPlugin>>,
    pub offline: bool,
}

impl BuildConfig {
    pub fn resolve(config: &Config, environment: Environment) -> anyhow::Result<Self> {
        Ok(Self {
            environment,
            asset_prefix: config.asset_prefix(environment)?,
            plugins: pipeline::configure(pipeline::default_plugins(), environment),
            offline: config.offline && !environment.is_development(),
        })
    }

    pub fn make_permalink(&self, path: &str) -> anyhow::Result<Url> {
        let escaped = path.strip_suffix("index.html").unwrap_or(path);
        Ok(self.asset_prefix.join(escaped)?)
    }
}
