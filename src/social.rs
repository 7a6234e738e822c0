//! Link preview tags for Twitter and Open Graph crawlers.

use serde::{Deserialize, Serialize};

use crate::head::HeadTags;

/// Site-wide values shared by every page's social cards.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct SocialProfile {
    /// Twitter handle used for both `twitter:site` and `twitter:creator`.
    pub twitter: Option<String>,
    pub image: Option<String>,
    pub summary: Option<String>,
    pub site_name: Option<String>,
    pub locale: Option<String>,
}

#[derive(Debug, Clone, Copy)]
pub struct SocialCardProps<'a> {
    pub title: &'a str,
    pub description: Option<&'a str>,
    pub url: &'a str,
}

pub trait SocialCard {
    fn declare(&self, props: &SocialCardProps, head: &mut HeadTags);
}

pub struct TwitterCard<'a> {
    profile: &'a SocialProfile,
}

impl<'a> TwitterCard<'a> {
    pub fn new(profile: &'a SocialProfile) -> Self {
        Self { profile }
    }
}

impl SocialCard for TwitterCard<'_> {
    fn declare(&self, props: &SocialCardProps, head: &mut HeadTags) {
        head.meta_name("twitter:card", "summary");
        if let Some(handle) = &self.profile.twitter {
            head.meta_name("twitter:site", handle);
            head.meta_name("twitter:creator", handle);
        }
        head.meta_name("twitter:url", props.url);
        head.meta_name("twitter:title", props.title);
        if let Some(description) = props.description {
            head.meta_name("twitter:description", description);
        }
        if let Some(image) = &self.profile.image {
            head.meta_name("twitter:image", image);
        }
        if let Some(summary) = &self.profile.summary {
            head.meta_name("twitter:summary", summary);
        }
    }
}

pub struct OpenGraph<'a> {
    profile: &'a SocialProfile,
}

impl<'a> OpenGraph<'a> {
    pub fn new(profile: &'a SocialProfile) -> Self {
        Self { profile }
    }
}

impl SocialCard for OpenGraph<'_> {
    fn declare(&self, props: &SocialCardProps, head: &mut HeadTags) {
        head.meta_property("og:type", "website");
        head.meta_property("og:title", props.title);
        if let Some(description) = props.description {
            head.meta_property("og:description", description);
        }
        if let Some(image) = &self.profile.image {
            head.meta_property("og:image", image);
        }
        head.meta_property("og:url", props.url);
        if let Some(site_name) = &self.profile.site_name {
            head.meta_property("og:site_name", site_name);
        }
        if let Some(locale) = &self.profile.locale {
            head.meta_property("og:locale", locale);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::head::HeadTag;

    fn profile() -> SocialProfile {
        SocialProfile {
            twitter: Some("@sergiodxa".to_string()),
            image: Some("https://sergio.xalambri.xyz/avatar.png".to_string()),
            summary: Some("Sergio Xalambrí's personal website".to_string()),
            site_name: Some("Sergio Xalambrí".to_string()),
            locale: Some("en".to_string()),
        }
    }

    fn names(head: &HeadTags) -> Vec<&str> {
        head.tags()
            .iter()
            .filter_map(|tag| match tag {
                HeadTag::Meta { name, .. } => Some(name.as_str()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn open_graph_scenario() {
        let props = SocialCardProps {
            title: "Sergio Xalambrí",
            description: Some("JavaScript Developer"),
            url: "http://sergio.xalambri.xyz/",
        };
        let mut head = HeadTags::new();
        OpenGraph::new(&SocialProfile::default()).declare(&props, &mut head);

        assert_eq!(head.find("og:title"), Some("Sergio Xalambrí"));
        assert_eq!(head.find("og:description"), Some("JavaScript Developer"));
        assert_eq!(head.find("og:url"), Some("http://sergio.xalambri.xyz/"));
        assert_eq!(
            names(&head),
            vec!["og:type", "og:title", "og:description", "og:url"]
        );
    }

    #[test]
    fn full_profile_emits_every_tag() {
        let profile = profile();
        let props = SocialCardProps {
            title: "Home",
            description: Some("JavaScript Developer"),
            url: "https://sergio.xalambri.xyz/",
        };
        let mut head = HeadTags::new();
        TwitterCard::new(&profile).declare(&props, &mut head);
        OpenGraph::new(&profile).declare(&props, &mut head);

        assert_eq!(
            names(&head),
            vec![
                "twitter:card",
                "twitter:site",
                "twitter:creator",
                "twitter:url",
                "twitter:title",
                "twitter:description",
                "twitter:image",
                "twitter:summary",
                "og:type",
                "og:title",
                "og:description",
                "og:image",
                "og:url",
                "og:site_name",
                "og:locale",
            ]
        );
        assert_eq!(head.find("twitter:description"), Some("JavaScript Developer"));
    }

    #[test]
    fn no_description_tags_without_a_description() {
        let profile = profile();
        let props = SocialCardProps {
            title: "Home",
            description: None,
            url: "https://sergio.xalambri.xyz/",
        };
        let mut head = HeadTags::new();
        TwitterCard::new(&profile).declare(&props, &mut head);
        OpenGraph::new(&profile).declare(&props, &mut head);

        assert_eq!(head.count("twitter:description"), 0);
        assert_eq!(head.count("og:description"), 0);
    }
}
