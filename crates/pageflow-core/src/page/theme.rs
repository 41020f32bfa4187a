use serde::Serialize;

use super::element::PageRoot;

/// Document-root colors a page wants while it is visible
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageTheme {
    pub background: Option<String>,
    pub color: Option<String>,
}

impl PageTheme {
    /// Read `data-background` and `data-color` from a page root
    pub fn from_root(root: &PageRoot) -> Self {
        Self {
            background: root.attribute("background").map(str::to_string),
            color: root.attribute("color").map(str::to_string),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.background.is_none() && self.color.is_none()
    }
}
