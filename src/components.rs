//! Re-skins markdown elements with the site's UI components.

use std::collections::{BTreeMap, HashMap};

use anyhow::anyhow;
use html_escape::encode_double_quoted_attribute;
use pulldown_cmark::{CowStr, Event, LinkType, Tag};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    Paragraph,
    Heading,
    Link,
    List,
    ListItem,
    BlockQuote,
}

impl ElementKind {
    pub fn parse(name: &str) -> Option<Self> {
        match name {
            "paragraph" => Some(Self::Paragraph),
            "heading" => Some(Self::Heading),
            "link" => Some(Self::Link),
            "list" => Some(Self::List),
            "list_item" => Some(Self::ListItem),
            "block_quote" => Some(Self::BlockQuote),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct UiComponent {
    pub class: String,
}

impl UiComponent {
    pub fn new(class: impl Into<String>) -> Self {
        Self {
            class: class.into(),
        }
    }
}

#[derive(Debug, Clone, Default)]
pub struct ComponentMap {
    components: HashMap<ElementKind, UiComponent>,
}

impl ComponentMap {
    /// The site's own components for every element kind.
    pub fn ui() -> Self {
        let components = [
            (ElementKind::Paragraph, "ui-paragraph"),
            (ElementKind::Heading, "ui-heading"),
            (ElementKind::Link, "ui-link"),
            (ElementKind::List, "ui-list"),
            (ElementKind::ListItem, "ui-list-item"),
            (ElementKind::BlockQuote, "ui-blockquote"),
        ]
        .into_iter()
        .map(|(kind, class)| (kind, UiComponent::new(class)))
        .collect();

        Self { components }
    }

    pub fn with_overrides(
        mut self,
        overrides: &BTreeMap<String, UiComponent>,
    ) -> anyhow::Result<Self> {
        for (name, component) in overrides {
            let kind = ElementKind::parse(name)
                .ok_or_else(|| anyhow!("unknown element kind '{name}' in [components]"))?;
            self.components.insert(kind, component.clone());
        }
        Ok(self)
    }

    #[cfg(test)]
    pub fn insert(&mut self, kind: ElementKind, component: UiComponent) {
        self.components.insert(kind, component);
    }

    pub fn get(&self, kind: ElementKind) -> Option<&UiComponent> {
        self.components.get(&kind)
    }

    /// Replaces the start or end of a mapped element with the component's markup.
    /// Everything else is handed back untouched.
    pub fn substitute<'a>(&self, event: Event<'a>) -> Event<'a> {
        let html = match &event {
            Event::Start(tag) => self.open(tag),
            Event::End(tag) => self.close(tag),
            _ => None,
        };

        match html {
            Some(html) => Event::Html(CowStr::from(html)),
            None => event,
        }
    }

    fn class(&self, kind: ElementKind) -> Option<String> {
        self.get(kind)
            .map(|c| encode_double_quoted_attribute(&c.class).into_owned())
    }

    fn open(&self, tag: &Tag) -> Option<String> {
        match tag {
            Tag::Paragraph => {
                let class = self.class(ElementKind::Paragraph)?;
                Some(format!("<p class=\"{class}\">"))
            }
            Tag::Heading(level, id, classes) => {
                let mut class = self.class(ElementKind::Heading)?;
                for extra in classes {
                    class.push(' ');
                    class.push_str(&encode_double_quoted_attribute(extra));
                }
                let id = id
                    .map(|id| format!(" id=\"{}\"", encode_double_quoted_attribute(id)))
                    .unwrap_or_default();
                Some(format!("<h{} class=\"{class}\"{id}>", *level as usize))
            }
            Tag::Link(link_type, dest, title) => {
                let class = self.class(ElementKind::Link)?;
                let href = match link_type {
                    LinkType::Email => format!("mailto:{dest}"),
                    _ => dest.to_string(),
                };
                let mut html = format!(
                    "<a class=\"{class}\" href=\"{}\"",
                    encode_double_quoted_attribute(&href)
                );
                if !title.is_empty() {
                    html.push_str(&format!(
                        " title=\"{}\"",
                        encode_double_quoted_attribute(&**title)
                    ));
                }
                html.push('>');
                Some(html)
            }
            Tag::List(start) => {
                let class = self.class(ElementKind::List)?;
                Some(match start {
                    None => format!("<ul class=\"{class}\">\n"),
                    Some(1) => format!("<ol class=\"{class}\">\n"),
                    Some(n) => format!("<ol class=\"{class}\" start=\"{n}\">\n"),
                })
            }
            Tag::Item => {
                let class = self.class(ElementKind::ListItem)?;
                Some(format!("<li class=\"{class}\">"))
            }
            Tag::BlockQuote => {
                let class = self.class(ElementKind::BlockQuote)?;
                Some(format!("<blockquote class=\"{class}\">\n"))
            }
            _ => None,
        }
    }

    fn close(&self, tag: &Tag) -> Option<String> {
        let (kind, html) = match tag {
            Tag::Paragraph => (ElementKind::Paragraph, "</p>\n".to_string()),
            Tag::Heading(level, ..) => (ElementKind::Heading, format!("</h{}>\n", *level as usize)),
            Tag::Link(..) => (ElementKind::Link, "</a>".to_string()),
            Tag::List(None) => (ElementKind::List, "</ul>\n".to_string()),
            Tag::List(Some(_)) => (ElementKind::List, "</ol>\n".to_string()),
            Tag::Item => (ElementKind::ListItem, "</li>\n".to_string()),
            Tag::BlockQuote => (ElementKind::BlockQuote, "</blockquote>\n".to_string()),
            _ => return None,
        };

        self.get(kind).map(|_| html)
    }
}
