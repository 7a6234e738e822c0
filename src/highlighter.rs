use std::path::Path;

use anyhow::anyhow;
use syntect::{highlighting::ThemeSet, html::highlighted_html_for_string, parsing::SyntaxSet};
use tracing::debug;

const THEME: &str = "base16-ocean.dark";

pub struct Highlighter {
    syntax_set: SyntaxSet,
    theme_set: ThemeSet,
}

impl Highlighter {
    /// Default syntaxes, plus any `.sublime-syntax` files found in `syntaxes`.
    pub fn new(syntaxes: &Path) -> anyhow::Result<Self> {
        let mut syntax_set_builder = SyntaxSet::load_defaults_newlines().into_builder();
        if syntaxes.is_dir() {
            debug!("loading extra syntaxes from {}", syntaxes.display());
            syntax_set_builder.add_from_folder(syntaxes, true)?;
        }
        let syntax_set = syntax_set_builder.build();

        let theme_set = ThemeSet::load_defaults();

        Ok(Self {
            syntax_set,
            theme_set,
        })
    }

    pub fn highlight(&self, lang: &str, input: &str) -> anyhow::Result<String> {
        let syntax = self
            .syntax_set
            .find_syntax_by_token(lang)
            .unwrap_or_else(|| self.syntax_set.find_syntax_plain_text());
        let theme = self
            .theme_set
            .themes
            .get(THEME)
            .ok_or_else(|| anyhow!("missing theme {THEME}"))?;

        Ok(highlighted_html_for_string(
            input,
            &self.syntax_set,
            syntax,
            theme,
        )?)
    }
}
