use anyhow::anyhow;

const MARKER: &str = "+++";

/// Splits a page into its TOML frontmatter and the body that follows it.
pub fn parse<D>(data: &str) -> anyhow::Result<(D, &str)>
where
    D: serde::de::DeserializeOwned,
{
    let start = data
        .find(MARKER)
        .ok_or_else(|| anyhow!("missing frontmatter"))?;

    if !data[..start].trim().is_empty() {
        return Err(anyhow!("frontmatter not at beginning of file"));
    }

    let start = start + MARKER.len();

    let end = data[start..]
        .find(MARKER)
        .ok_or_else(|| anyhow!("unterminated frontmatter"))?;

    let frontmatter = &data[start..start + end];

    let end = start + end + MARKER.len();
    let extra = &data[end..];

    Ok((toml::from_str::<D>(frontmatter.trim())?, extra.trim_start()))
}

#[cfg(test)]
mod tests {
    use crate::meta::PageMetadata;

    use super::*;

    #[test]
    fn splits_frontmatter_and_body() {
        let page = "+++\ntitle = \"Sergio Xalambrí\"\ndescription = \"JavaScript Developer\"\n+++\n\n# Hi\n";
        let (meta, body) = parse::<PageMetadata>(page).unwrap();

        assert_eq!(meta.title, "Sergio Xalambrí");
        assert_eq!(meta.description.as_deref(), Some("JavaScript Developer"));
        assert_eq!(body, "# Hi\n");
    }

    #[test]
    fn rejects_malformed_frontmatter() {
        assert!(parse::<PageMetadata>("# no frontmatter").is_err());
        assert!(parse::<PageMetadata>("intro\n+++\ntitle = \"x\"\n+++\n").is_err());
        assert!(parse::<PageMetadata>("+++\ntitle = \"x\"\n").is_err());
    }
}
