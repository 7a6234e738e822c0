use pulldown_cmark::html;

use crate::components::ComponentMap;

/// `markdown` filter, rendered through the same component map as page content.
pub struct Markdown {
    components: ComponentMap,
}

impl Markdown {
    pub fn new(components: ComponentMap) -> Self {
        Self { components }
    }
}

impl tera::Filter for Markdown {
    fn filter(
        &self,
        value: &tera::Value,
        _args: &std::collections::HashMap<String, tera::Value>,
    ) -> tera::Result<tera::Value> {
        let input = tera::from_value::<String>(value.clone())?;

        let parser = pulldown_cmark::Parser::new(&input).map(|e| self.components.substitute(e));

        let mut contents = String::new();
        html::push_html(&mut contents, parser);

        Ok(tera::to_value(contents)?)
    }

    fn is_safe(&self) -> bool {
        true
    }
}
