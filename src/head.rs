use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};

/// Which attribute carries the key of a `<meta>` tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetaKey {
    Name,
    Property,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HeadTag {
    Title(String),
    Meta {
        key: MetaKey,
        name: String,
        content: String,
    },
    Style(String),
}

/// Collects the head tags declared while a page renders. Flushed once, when
/// the document head is written.
#[derive(Debug, Default)]
pub struct HeadTags {
    tags: Vec<HeadTag>,
}

impl HeadTags {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn title(&mut self, title: &str) {
        self.tags.push(HeadTag::Title(title.to_string()));
    }

    pub fn meta_name(&mut self, name: &str, content: &str) {
        self.push_meta(MetaKey::Name, name, content);
    }

    pub fn meta_property(&mut self, property: &str, content: &str) {
        self.push_meta(MetaKey::Property, property, content);
    }

    pub fn style(&mut self, css: &str) {
        self.tags.push(HeadTag::Style(css.to_string()));
    }

    fn push_meta(&mut self, key: MetaKey, name: &str, content: &str) {
        self.tags.push(HeadTag::Meta {
            key,
            name: name.to_string(),
            content: content.to_string(),
        });
    }

    #[cfg(test)]
    pub fn tags(&self) -> &[HeadTag] {
        &self.tags
    }

    #[cfg(test)]
    /// Content of the first `<meta>` declared under `name`.
    pub fn find(&self, name: &str) -> Option<&str> {
        self.tags.iter().find_map(|tag| match tag {
            HeadTag::Meta {
                name: n, content, ..
            } if n == name => Some(content.as_str()),
            _ => None,
        })
    }

    #[cfg(test)]
    pub fn count(&self, name: &str) -> usize {
        self.tags
            .iter()
            .filter(|tag| matches!(tag, HeadTag::Meta { name: n, .. } if n == name))
            .count()
    }

    pub fn flush(self) -> String {
        let mut out = String::new();

        for tag in self.tags {
            // writing into a String cannot fail
            let _ = match tag {
                HeadTag::Title(title) => writeln!(out, "<title>{}</title>", encode_text(&title)),
                HeadTag::Meta { key, name, content } => {
                    let attr = match key {
                        MetaKey::Name => "name",
                        MetaKey::Property => "property",
                    };
                    writeln!(
                        out,
                        r#"<meta {attr}="{}" content="{}">"#,
                        encode_double_quoted_attribute(&name),
                        encode_double_quoted_attribute(&content)
                    )
                }
                HeadTag::Style(css) => writeln!(out, "<style>{css}</style>"),
            };
        }

        out
    }
}
