use serde::Deserialize;
use thiserror::Error;
use toml::value::Datetime;

pub const MAX_DESCRIPTION_CHARS: usize = 140;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum MetaError {
    #[error("page metadata is missing a title")]
    MissingTitle,
    #[error("page description is {0} characters long, the limit is 140")]
    DescriptionTooLong(usize),
}

/// Per-page metadata, read from the frontmatter of every page.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PageMetadata {
    #[serde(default)]
    pub title: String,
    pub description: Option<String>,
    pub date: Option<Datetime>,
}

impl PageMetadata {
    #[cfg(test)]
    pub fn new(title: impl Into<String>, description: Option<&str>) -> Self {
        Self {
            title: title.into(),
            description: description.map(str::to_string),
            date: None,
        }
    }

    pub fn validate(&self) -> Result<(), MetaError> {
        if self.title.trim().is_empty() {
            return Err(MetaError::MissingTitle);
        }

        if let Some(description) = &self.description {
            let length = description.chars().count();
            if length > MAX_DESCRIPTION_CHARS {
                return Err(MetaError::DescriptionTooLong(length));
            }
        }

        Ok(())
    }

    /// The description, if there is one worth emitting. Empty strings count as absent.
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref().filter(|d| !d.is_empty())
    }

    /// Frontmatter date in the `Sep. 29, 2016` form used by the `date` meta tag.
    pub fn display_date(&self) -> Option<String> {
        let date = self.date.as_ref()?.date?;
        let date = chrono::NaiveDate::from_ymd_opt(
            i32::from(date.year),
            u32::from(date.month),
            u32::from(date.day),
        )?;

        Some(date.format("%b. %-d, %Y").to_string())
    }
}
