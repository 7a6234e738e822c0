use std::{
    fs::{self, create_dir_all, remove_dir_all},
    path::{Path, PathBuf},
    str::FromStr,
};

use anyhow::Context as _;
use chrono::Utc;
use clap::Parser;
use tera::Tera;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;
use walkdir::WalkDir;

use crate::{
    components::ComponentMap,
    config::{BuildConfig, Config, Environment},
    functions::{get_url::GetURL, markdown::Markdown},
    highlighter::Highlighter,
    layout::PageLayout,
    markdown::render_content,
    meta::PageMetadata,
    page::{Page, PartialPage},
    routes::BuildRoutes,
    site::Site,
};

mod components;
mod config;
mod frontmatter;
mod functions;
mod head;
mod header;
mod highlighter;
mod layout;
mod markdown;
mod meta;
mod offline;
mod page;
mod pipeline;
mod routes;
mod site;
mod social;

#[derive(Parser, Debug)]
#[command(name = "folio")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[arg(default_value = ".")]
    path: String,
    #[arg(default_value = "public")]
    output_dir: String,
    #[arg(short, long, value_enum, env = "FOLIO_ENV", default_value = "development")]
    env: Environment,
    #[arg(short, long)]
    verbose: bool,
}

pub struct Context {
    home: PathBuf,
    output_dir: PathBuf,
    config: Config,
    build: BuildConfig,
}

impl Context {
    pub fn new(home: PathBuf, output_dir: PathBuf, environment: Environment) -> anyhow::Result<Self> {
        let config = Config::load(&home.join("config.toml"))?;
        let build = BuildConfig::resolve(&config, environment)?;

        Ok(Self {
            home,
            output_dir,
            config,
            build,
        })
    }

    fn clean_output_dir(&self) -> anyhow::Result<()> {
        if self.output_dir.exists() {
            remove_dir_all(&self.output_dir)?;
        }
        create_dir_all(&self.output_dir)?;
        Ok(())
    }

    fn absolute<P: AsRef<Path>>(&self, path: P) -> PathBuf {
        self.home.join(path.as_ref())
    }

    fn relative(&self, path: &Path) -> anyhow::Result<PathBuf> {
        Ok(path.strip_prefix(&self.home)?.into())
    }

    fn create_output_dir(&self, path: &Path) -> anyhow::Result<()> {
        let output = self.output_dir.join(path);
        Ok(fs::create_dir_all(output)?)
    }

    fn copy_to_output(&self, file: &Path, path: &Path) -> anyhow::Result<()> {
        path.parent()
            .map(|p| self.create_output_dir(p))
            .transpose()?;

        let output = self.output_dir.join(path);

        fs::copy(file, output)?;

        Ok(())
    }

    fn write_to_output(&self, path: &Path, contents: &str) -> anyhow::Result<()> {
        path.parent()
            .map(|p| self.create_output_dir(p))
            .transpose()?;

        let output = self.output_dir.join(path);

        fs::write(output, contents)?;

        Ok(())
    }
}

fn setup_template_engine(context: &Context, components: &ComponentMap) -> anyhow::Result<Tera> {
    let template_dir = context.absolute("templates");

    let mut tera = if template_dir.is_dir() {
        Tera::new(&template_dir.join("**").join("*").to_string_lossy())?
    } else {
        Tera::default()
    };

    layout::register(&mut tera)?;

    tera.register_function("get_url", GetURL::new(context.build.asset_prefix.clone()));
    tera.register_filter("markdown", Markdown::new(components.clone()));

    debug!(
        "loaded templates: {:?}",
        tera.get_template_names().collect::<Vec<_>>()
    );

    Ok(tera)
}

fn copy_static_files(context: &Context) -> anyhow::Result<()> {
    let static_dir: PathBuf = context.absolute("static");

    if !static_dir.is_dir() {
        return Ok(());
    }

    for entry in WalkDir::new(&static_dir) {
        let entry = entry?;

        if !entry.file_type().is_file() {
            continue;
        }

        debug!("copying {} to output", context.relative(entry.path())?.display());

        context.copy_to_output(entry.path(), entry.path().strip_prefix(&static_dir)?)?;
    }

    Ok(())
}

fn process_pages(
    context: &Context,
    tera: &Tera,
    highlighter: &Highlighter,
    components: &ComponentMap,
) -> anyhow::Result<Site> {
    let content_dir: PathBuf = context.absolute("content");

    let discovered;
    let build_routes = if context.config.routes.is_empty() {
        discovered = BuildRoutes::from_content_dir(&content_dir)?;
        &discovered
    } else {
        &context.config.routes
    };

    let mut site = Site::new();

    for (route, target) in build_routes.iter() {
        let source = target.source(&content_dir)?;

        info!("compiling {} -> {}", context.relative(&source)?.display(), route);

        let contents = fs::read_to_string(&source)
            .with_context(|| format!("reading {}", source.display()))?;

        let (meta, body) = frontmatter::parse::<PageMetadata>(&contents)
            .with_context(|| format!("parsing frontmatter of {}", source.display()))?;

        meta.validate()
            .with_context(|| format!("invalid metadata in {}", source.display()))?;

        let output_path = routes::output_path(route)?;

        let permalink = context
            .build
            .make_permalink(&output_path.to_string_lossy().replace('\\', "/"))?;

        let partial = PartialPage {
            route: route.clone(),
            title: meta.title.clone(),
            description: meta.description().map(str::to_string),
            permalink: permalink.clone(),
            query: target.query.clone(),
        };

        let content = render_content(body, &partial, tera, highlighter, components)
            .with_context(|| format!("rendering {}", source.display()))?;

        site.pages.push(Page {
            route: route.clone(),
            output_path,
            meta,
            permalink,
            content,
        });
    }

    Ok(site)
}

fn render_pages_for_site(context: &Context, tera: &Tera, site: &Site) -> anyhow::Result<()> {
    let layout = PageLayout::new(tera, &context.config, context.build.offline);

    for page in &site.pages {
        let contents = layout
            .render(&page.meta, &page.content, &page.permalink)
            .with_context(|| format!("rendering layout for {}", page.route))?;

        let contents = pipeline::run(&context.build.plugins, &page.output_path, contents)?;

        context.write_to_output(&page.output_path, &contents)?;
    }

    Ok(())
}

fn write_service_worker(context: &Context, site: &Site) -> anyhow::Result<()> {
    let precache = site.pages.iter().map(|page| page.permalink.path());
    let worker = offline::service_worker(precache, Utc::now());

    info!("writing {} for {} routes", offline::SERVICE_WORKER, site.pages.len());

    context.write_to_output(Path::new(offline::SERVICE_WORKER), &worker)
}

fn build(context: &Context) -> anyhow::Result<Site> {
    context.clean_output_dir()?;

    copy_static_files(context)?;

    let components = ComponentMap::ui().with_overrides(&context.config.components)?;

    let highlighter = Highlighter::new(&context.absolute("syntaxes"))?;

    let tera = setup_template_engine(context, &components)?;

    let site = process_pages(context, &tera, &highlighter, &components)?;

    render_pages_for_site(context, &tera, &site)?;

    if context.build.offline {
        write_service_worker(context, &site)?;
    }

    info!(
        "built {} pages into {}",
        site.routes().count(),
        context.output_dir.display()
    );

    Ok(site)
}

fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}

fn main() -> anyhow::Result<()> {
    let args = Args::parse();

    init_logging(args.verbose);

    debug!("running with {args:?}");

    let home = PathBuf::from_str(&args.path)?;
    let output_dir = home.join(&args.output_dir);

    let context = Context::new(home, output_dir, args.env)?;

    info!(
        "building for {:?} with asset prefix {}",
        context.build.environment, context.build.asset_prefix
    );

    build(&context)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"
title = "Sergio Xalambrí"
alias = "sergio.xalambri.xyz"
offline = true
author = "Sergio Xalambrí, sergio@xalambri.xyz"

[social]
twitter = "@sergiodxa"
site_name = "Sergio Xalambrí"
locale = "en"

[[nav]]
label = "Code"
href = "https://github.com/sergiodxa"
title = "Code repositories"

[routes]
"/" = { page = "index" }
"/about" = { page = "about", query = { section = "bio" } }
"#;

    const INDEX: &str = r#"+++
title = "Sergio Xalambrí"
description = "JavaScript Developer"
date = 2016-09-29
+++

Hi, I write *JavaScript*.
"#;

    const ABOUT: &str = r#"+++
title = "About"
+++

## Talks

{{ avatar(src="avatar.png") }}

- [Slides](https://slides.com/sergiodxa)
"#;

    fn site() -> tempfile::TempDir {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();

        fs::create_dir_all(root.join("content")).unwrap();
        fs::create_dir_all(root.join("static")).unwrap();
        fs::create_dir_all(root.join("templates/components")).unwrap();

        fs::write(root.join("config.toml"), CONFIG).unwrap();
        fs::write(root.join("content/index.md"), INDEX).unwrap();
        fs::write(root.join("content/about.md"), ABOUT).unwrap();
        fs::write(root.join("static/avatar.png"), "png").unwrap();
        fs::write(
            root.join("templates/components/avatar.html"),
            "<img class=\"avatar\" src=\"{{ get_url(path=src) }}\" data-section=\"{{ page.query.section | default(value=\"\") }}\">",
        )
        .unwrap();

        dir
    }

    fn build_site(root: &Path, environment: Environment) -> anyhow::Result<Site> {
        let context = Context::new(root.to_path_buf(), root.join("public"), environment)?;
        build(&context)
    }

    fn read(root: &Path, path: &str) -> String {
        fs::read_to_string(root.join("public").join(path)).unwrap()
    }

    #[test]
    fn development_build() {
        let dir = site();
        let root = dir.path();

        let site = build_site(root, Environment::Development).unwrap();
        assert_eq!(site.routes().collect::<Vec<_>>(), vec!["/", "/about"]);

        let index = read(root, "index.html");
        assert!(index.contains("<title>Sergio Xalambrí</title>"));
        assert!(index.contains("<meta name=\"description\" content=\"JavaScript Developer\">"));
        assert!(index.contains("<meta property=\"og:url\" content=\"http://localhost:3001/\">"));
        assert!(index.contains("<meta name=\"date\" content=\"Sep. 29, 2016\">"));
        assert!(index.contains("<p class=\"ui-paragraph\">Hi, I write <em>JavaScript</em>.</p>"));

        let about = read(root, "about/index.html");
        assert!(about.contains("<h2 class=\"ui-heading\">Talks</h2>"));
        assert!(about.contains(
            "<img class=\"avatar\" src=\"http://localhost:3001/avatar.png\" data-section=\"bio\">"
        ));
        assert!(about.contains("<a class=\"ui-link\" href=\"https://slides.com/sergiodxa\">"));
        assert!(!about.contains("name=\"description\""));

        assert_eq!(read(root, "avatar.png"), "png");
        assert!(!root.join("public/sw.js").exists());
    }

    #[test]
    fn production_build() {
        let dir = site();
        let root = dir.path();

        build_site(root, Environment::Production).unwrap();

        let about = read(root, "about/index.html");
        assert!(about.contains("https://sergio.xalambri.xyz/about/"));
        assert!(about.contains("serviceWorker"));

        let worker = read(root, "sw.js");
        assert!(worker.contains("\"/about/\""));
    }

    #[test]
    fn routes_default_to_content_files() {
        let dir = site();
        let root = dir.path();

        let config = CONFIG.split("[routes]").next().unwrap();
        fs::write(root.join("config.toml"), config).unwrap();
        fs::write(root.join("content/_partial.md"), "not a page").unwrap();

        let site = build_site(root, Environment::Development).unwrap();
        assert_eq!(site.routes().collect::<Vec<_>>(), vec!["/", "/about"]);

        // discovered routes carry no query
        assert!(read(root, "about/index.html").contains("data-section=\"\""));
    }

    #[test]
    fn invalid_metadata_fails_the_build() {
        let dir = site();
        let root = dir.path();

        let long = format!("+++\ntitle = \"About\"\ndescription = \"{}\"\n+++\n", "x".repeat(141));
        fs::write(root.join("content/about.md"), long).unwrap();

        let err = build_site(root, Environment::Development).unwrap_err();
        assert!(format!("{err:#}").contains("about.md"));
    }

    #[test]
    fn missing_route_page_fails_the_build() {
        let dir = site();
        let root = dir.path();

        fs::remove_file(root.join("content/about.md")).unwrap();

        assert!(build_site(root, Environment::Development).is_err());
    }
}
