use std::{
    collections::BTreeMap,
    path::{Component, Path, PathBuf},
};

use anyhow::{anyhow, bail};
use serde::{Deserialize, Serialize};
use walkdir::WalkDir;

const PAGE_EXTENSIONS: [&str; 2] = ["md", "mdx"];

/// The page an export path is rendered from.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct RouteTarget {
    /// Page file under `content/`, with or without its extension.
    pub page: String,
    #[serde(default)]
    pub query: BTreeMap<String, String>,
}

impl RouteTarget {
    pub fn new(page: impl Into<String>) -> Self {
        Self {
            page: page.into(),
            query: BTreeMap::new(),
        }
    }

    pub fn source(&self, content_dir: &Path) -> anyhow::Result<PathBuf> {
        let page = Path::new(self.page.trim_start_matches('/'));
        let page = if page.as_os_str().is_empty() {
            Path::new("index")
        } else {
            page
        };

        if page.extension().is_some() {
            let path = content_dir.join(page);
            if path.is_file() {
                return Ok(path);
            }
        }

        PAGE_EXTENSIONS
            .iter()
            .map(|ext| content_dir.join(page).with_extension(ext))
            .find(|path| path.is_file())
            .ok_or_else(|| anyhow!("no page '{}' in {}", self.page, content_dir.display()))
    }
}

/// Export paths mapped to the page each one renders, in path order.
#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct BuildRoutes(BTreeMap<String, RouteTarget>);

impl BuildRoutes {
    pub fn insert(&mut self, route: impl Into<String>, target: RouteTarget) {
        self.0.insert(route.into(), target);
    }

    #[cfg(test)]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &RouteTarget)> {
        self.0.iter()
    }

    /// One route per page file under `content_dir`. Files starting with `_` are skipped.
    pub fn from_content_dir(content_dir: &Path) -> anyhow::Result<Self> {
        let mut routes = Self::default();

        for entry in WalkDir::new(content_dir) {
            let entry = entry?;

            if !entry.file_type().is_file() {
                continue;
            }

            let is_page = entry
                .path()
                .extension()
                .and_then(|ext| ext.to_str())
                .is_some_and(|ext| PAGE_EXTENSIONS.contains(&ext));
            let is_partial = entry.file_name().to_string_lossy().starts_with('_');

            if !is_page || is_partial {
                continue;
            }

            let relative = entry.path().strip_prefix(content_dir)?;
            let page = relative.with_extension("");

            let mut route = page.clone();
            if route.file_name().is_some_and(|n| n == "index") {
                route.pop();
            }

            let route = route
                .components()
                .map(|c| c.as_os_str().to_string_lossy())
                .collect::<Vec<_>>()
                .join("/");

            routes.insert(
                format!("/{route}"),
                RouteTarget::new(relative.to_string_lossy().replace('\\', "/")),
            );
        }

        Ok(routes)
    }
}

/// File an export path is written to, relative to the output directory.
///
/// `/` becomes `index.html`, `/about` becomes `about/index.html` and paths with
/// an extension (`/404.html`) are written as is.
pub fn output_path(route: &str) -> anyhow::Result<PathBuf> {
    if !route.starts_with('/') {
        bail!("route '{route}' must start with '/'");
    }
    if route.contains(['"', '\\', '?', '#']) {
        bail!("route '{route}' contains reserved characters");
    }

    let relative = Path::new(route.trim_start_matches('/'));

    if relative
        .components()
        .any(|c| !matches!(c, Component::Normal(_)))
    {
        bail!("route '{route}' must not leave the output directory");
    }

    if relative.extension().is_some() {
        Ok(relative.to_path_buf())
    } else {
        Ok(relative.join("index.html"))
    }
}
