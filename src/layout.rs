use tera::Tera;
use url::Url;

use crate::{
    config::Config,
    head::HeadTags,
    header::LinkedHeader,
    meta::PageMetadata,
    social::{OpenGraph, SocialCard, SocialCardProps, TwitterCard},
};

pub const LAYOUT_TEMPLATE: &str = "layout.html";

const DEFAULT_LAYOUT: &str = include_str!("templates/layout.html");

const LAYOUT_STYLE: &str = "\
.page-layout > section { max-width: 720px; margin: 0 1em; font-size: 1.25em; }
.page-layout > section li > a { color: black; text-decoration: none; }
@media (min-width: 720px) { .page-layout > section { margin: 0 auto; } }";

const VIEWPORT: &str = "width=device-width, initial-scale=1.0, minimum-scale=1.0, maximum-scale=1.0";

/// Adds the built-in layout unless the site ships its own `layout.html`.
pub fn register(tera: &mut Tera) -> anyhow::Result<()> {
    if !tera.get_template_names().any(|name| name == LAYOUT_TEMPLATE) {
        tera.add_raw_template(LAYOUT_TEMPLATE, DEFAULT_LAYOUT)?;
    }
    Ok(())
}

/// Wraps rendered page content in the site's document: head tags, social cards, header.
pub struct PageLayout<'a> {
    tera: &'a Tera,
    config: &'a Config,
    offline: bool,
}

impl<'a> PageLayout<'a> {
    pub fn new(tera: &'a Tera, config: &'a Config, offline: bool) -> Self {
        Self {
            tera,
            config,
            offline,
        }
    }

    pub fn head(&self, meta: &PageMetadata, url: &Url) -> anyhow::Result<HeadTags> {
        meta.validate()?;

        let mut head = HeadTags::new();

        head.title(&meta.title);
        if let Some(description) = meta.description() {
            head.meta_name("description", description);
        }

        let props = SocialCardProps {
            title: &meta.title,
            description: meta.description(),
            url: url.as_str(),
        };
        TwitterCard::new(&self.config.social).declare(&props, &mut head);
        OpenGraph::new(&self.config.social).declare(&props, &mut head);

        head.meta_name("viewport", VIEWPORT);
        head.meta_name("language", &self.config.language);
        if let Some(author) = &self.config.author {
            head.meta_name("author", author);
        }
        if let Some(date) = meta.display_date() {
            head.meta_name("date", &date);
        }

        head.style(LAYOUT_STYLE);

        Ok(head)
    }

    pub fn render(&self, meta: &PageMetadata, content: &str, url: &Url) -> anyhow::Result<String> {
        let head = self.head(meta, url)?;
        let header = LinkedHeader::new(&self.config.title, &self.config.nav).render();

        let mut ctx = tera::Context::new();
        ctx.insert("config", self.config);
        ctx.insert("language", &self.config.language);
        ctx.insert("title", &meta.title);
        ctx.insert("description", &meta.description());
        ctx.insert("current_url", url);
        ctx.insert("head", &head.flush());
        ctx.insert("header", &header);
        ctx.insert("content", content);
        ctx.insert("offline", &self.offline);

        Ok(self.tera.render(LAYOUT_TEMPLATE, &ctx)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config() -> Config {
        toml::from_str(
            r#"
            title = "Sergio Xalambrí"
            alias = "sergio.xalambri.xyz"

            [social]
            twitter = "@sergiodxa"

            [[nav]]
            label = "Code"
            href = "https://github.com/sergiodxa"
            "#,
        )
        .unwrap()
    }

    fn tera() -> Tera {
        let mut tera = Tera::default();
        register(&mut tera).unwrap();
        tera
    }

    fn url() -> Url {
        Url::parse("http://sergio.xalambri.xyz/").unwrap()
    }

    #[test]
    fn emits_everything_in_order() {
        let (tera, config) = (tera(), config());
        let meta = PageMetadata::new("Sergio Xalambrí", Some("JavaScript Developer"));

        let html = PageLayout::new(&tera, &config, false)
            .render(&meta, "<p>body</p>", &url())
            .unwrap();

        let positions = [
            "<title>Sergio Xalambrí</title>",
            "<meta name=\"description\" content=\"JavaScript Developer\">",
            "twitter:card",
            "og:type",
            "class=\"site-header\"",
            "<p>body</p>",
        ]
        .map(|needle| html.find(needle).unwrap_or_else(|| panic!("missing {needle}")));

        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(html.matches("name=\"description\"").count(), 1);
        assert!(!html.contains("serviceWorker"));
    }

    #[test]
    fn both_cards_share_the_url_and_description() {
        let (tera, config) = (tera(), config());
        let meta = PageMetadata::new("Sergio Xalambrí", Some("JavaScript Developer"));

        let head = PageLayout::new(&tera, &config, false)
            .head(&meta, &url())
            .unwrap();

        assert_eq!(head.find("description"), Some("JavaScript Developer"));
        assert_eq!(head.find("twitter:description"), Some("JavaScript Developer"));
        assert_eq!(head.find("og:description"), Some("JavaScript Developer"));
        assert_eq!(head.find("twitter:url"), Some("http://sergio.xalambri.xyz/"));
        assert_eq!(head.find("og:url"), Some("http://sergio.xalambri.xyz/"));
    }

    #[test]
    fn no_description_tags_without_a_description() {
        let (tera, config) = (tera(), config());
        let meta = PageMetadata::new("Sergio Xalambrí", None);

        let html = PageLayout::new(&tera, &config, false)
            .render(&meta, "", &url())
            .unwrap();

        assert!(!html.contains("name=\"description\""));
        assert!(!html.contains("twitter:description"));
        assert!(!html.contains("og:description"));
    }

    #[test]
    fn invalid_metadata_is_not_rendered() {
        let (tera, config) = (tera(), config());
        let layout = PageLayout::new(&tera, &config, false);

        assert!(layout.render(&PageMetadata::new("", None), "", &url()).is_err());

        let long = "x".repeat(141);
        assert!(layout
            .render(&PageMetadata::new("Home", Some(&long)), "", &url())
            .is_err());
    }

    #[test]
    fn offline_builds_register_the_service_worker() {
        let (tera, config) = (tera(), config());
        let meta = PageMetadata::new("Home", None);

        let html = PageLayout::new(&tera, &config, true)
            .render(&meta, "", &url())
            .unwrap();

        assert!(html.contains("navigator.serviceWorker.register(\"/sw.js\")"));
    }

    #[test]
    fn rendering_twice_gives_the_same_document() {
        let (tera, config) = (tera(), config());
        let meta = PageMetadata::new("Home", Some("JavaScript Developer"));
        let layout = PageLayout::new(&tera, &config, true);

        let first = layout.render(&meta, "<p>body</p>", &url()).unwrap();
        let second = layout.render(&meta, "<p>body</p>", &url()).unwrap();

        assert_eq!(first, second);
    }

    #[test]
    fn site_layout_replaces_the_default() {
        let mut tera = Tera::default();
        tera.add_raw_template(LAYOUT_TEMPLATE, "{{ title }}|{{ header | safe }}")
            .unwrap();
        register(&mut tera).unwrap();

        let config = config();
        let html = PageLayout::new(&tera, &config, false)
            .render(&PageMetadata::new("Home", None), "", &url())
            .unwrap();

        assert!(html.starts_with("Home|<header"));
    }
}
