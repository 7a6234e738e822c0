use std::{collections::BTreeMap, path::PathBuf};

use serde::Serialize;
use url::Url;

use crate::meta::PageMetadata;

/// What component templates see of the page they are rendered into.
#[derive(Serialize, Clone)]
pub struct PartialPage {
    pub route: String,
    pub title: String,
    pub description: Option<String>,
    pub permalink: Url,
    pub query: BTreeMap<String, String>,
}

#[derive(Debug)]
pub struct Page {
    pub route: String,
    pub output_path: PathBuf,
    pub meta: PageMetadata,
    pub permalink: Url,
    pub content: String,
}
