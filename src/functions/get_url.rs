use std::collections::HashMap;
use url::Url;

/// `get_url(path=...)`: joins a path onto the asset prefix of the current build.
pub struct GetURL {
    asset_prefix: Url,
}

impl GetURL {
    pub fn new(asset_prefix: Url) -> Self {
        GetURL { asset_prefix }
    }
}

impl tera::Function for GetURL {
    fn call(&self, args: &HashMap<String, tera::Value>) -> tera::Result<tera::Value> {
        let path = args
            .get("path")
            .cloned()
            .map(tera::from_value::<String>)
            .transpose()?
            .ok_or("get_url: missing path")?;

        let result = self
            .asset_prefix
            .join(path.trim())
            .map_err(|e| format!("get_url: {e}"))?;

        Ok(tera::to_value::<String>(result.into())?)
    }

    fn is_safe(&self) -> bool {
        true
    }
}
