use std::fmt::Write;

use html_escape::{encode_double_quoted_attribute, encode_text};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct NavLink {
    pub label: String,
    pub href: String,
    pub title: Option<String>,
}

impl NavLink {
    fn is_external(&self) -> bool {
        self.href.starts_with("http://") || self.href.starts_with("https://")
    }
}

/// Site title linking home, followed by the navigation links. The same on every page.
pub struct LinkedHeader<'a> {
    title: &'a str,
    links: &'a [NavLink],
}

impl<'a> LinkedHeader<'a> {
    pub fn new(title: &'a str, links: &'a [NavLink]) -> Self {
        Self { title, links }
    }

    pub fn render(&self) -> String {
        let mut out = String::from("<header class=\"site-header\">\n");
        let _ = writeln!(
            out,
            "<h1><a href=\"/\" rel=\"home\">{}</a></h1>",
            encode_text(self.title)
        );

        if !self.links.is_empty() {
            out.push_str("<nav>\n");
            for link in self.links {
                out.push_str("<a");
                if link.is_external() {
                    out.push_str(" target=\"_blank\" rel=\"author\"");
                }
                let _ = write!(out, " href=\"{}\"", encode_double_quoted_attribute(&link.href));
                if let Some(title) = &link.title {
                    let _ = write!(out, " title=\"{}\"", encode_double_quoted_attribute(title));
                }
                let _ = writeln!(out, ">{}</a>", encode_text(&link.label));
            }
            out.push_str("</nav>\n");
        }

        out.push_str("</header>\n");
        out
    }
}
