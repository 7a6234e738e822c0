use crate::page::Page;

/// Every page of the build, in route order.
#[derive(Debug, Default)]
pub struct Site {
    pub pages: Vec<Page>,
}

impl Site {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn routes(&self) -> impl Iterator<Item = &str> {
        self.pages.iter().map(|page| page.route.as_str())
    }
}
