use std::path::Path;

use tracing::debug;

use crate::config::Environment;

pub const DEFAULT_MINIFIER: &str = "collapse-whitespace";
pub const PRODUCTION_MINIFIER: &str = "minify-html";

/// A post-processing step applied to every rendered page before it is written.
pub trait OutputPlugin {
    fn name(&self) -> &'static str;

    fn process(&self, path: &Path, contents: String) -> anyhow::Result<String>;
}

/// Strips indentation and blank lines, leaving `<pre>` blocks untouched.
pub struct CollapseWhitespace;

impl OutputPlugin for CollapseWhitespace {
    fn name(&self) -> &'static str {
        DEFAULT_MINIFIER
    }

    fn process(&self, _path: &Path, contents: String) -> anyhow::Result<String> {
        let mut out = String::with_capacity(contents.len());
        let mut in_pre = false;

        for line in contents.lines() {
            if in_pre {
                out.push_str(line);
                out.push('\n');
            } else if !line.trim().is_empty() {
                out.push_str(line.trim_start());
                out.push('\n');
            }

            if line.contains("<pre") {
                in_pre = true;
            }
            if line.contains("</pre>") {
                in_pre = false;
            }
        }

        Ok(out)
    }
}

pub struct HtmlMinifier {
    cfg: minify_html::Cfg,
}

impl HtmlMinifier {
    pub fn new() -> Self {
        let mut cfg = minify_html::Cfg::new();
        cfg.keep_closing_tags = true;
        cfg.keep_html_and_head_opening_tags = true;
        cfg.minify_css = true;
        // minify-js panics on some inline scripts, the service worker registration among them
        cfg.minify_js = false;
        Self { cfg }
    }
}

impl Default for HtmlMinifier {
    fn default() -> Self {
        Self::new()
    }
}

impl OutputPlugin for HtmlMinifier {
    fn name(&self) -> &'static str {
        PRODUCTION_MINIFIER
    }

    fn process(&self, _path: &Path, contents: String) -> anyhow::Result<String> {
        let minified = minify_html::minify(contents.as_bytes(), &self.cfg);
        Ok(String::from_utf8(minified)?)
    }
}

pub fn default_plugins() -> Vec<Box<dyn OutputPlugin>> {
    vec![Box::new(CollapseWhitespace)]
}

/// Swaps the default minifier for the production one outside of development.
pub fn configure(
    mut plugins: Vec<Box<dyn OutputPlugin>>,
    environment: Environment,
) -> Vec<Box<dyn OutputPlugin>> {
    if environment.is_development() {
        return plugins;
    }

    plugins.retain(|plugin| plugin.name() != DEFAULT_MINIFIER);
    plugins.push(Box::new(HtmlMinifier::new()));

    plugins
}

pub fn run(
    plugins: &[Box<dyn OutputPlugin>],
    path: &Path,
    contents: String,
) -> anyhow::Result<String> {
    plugins.iter().try_fold(contents, |contents, plugin| {
        debug!("running {} on {}", plugin.name(), path.display());
        plugin.process(path, contents)
    })
}
