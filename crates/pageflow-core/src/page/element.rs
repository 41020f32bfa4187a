use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::animation::AnimatedElement;

/// Vertical translation applied to a scroll wrapper
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Transform {
    /// Scroll offset; content moves up by this many pixels
    pub offset: f64,
}

impl Transform {
    pub fn scroll(offset: f64) -> Self {
        Self { offset }
    }

    /// Whole-pixel translation
    pub fn pixels(&self) -> i64 {
        -(self.offset.round() as i64)
    }
}

impl fmt::Display for Transform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "translate3d(0, {}px, 0)", self.pixels())
    }
}

/// The element whose content is translated instead of natively scrolled
pub trait ScrollWrapper: Send {
    /// Laid-out content height
    fn client_height(&self) -> f64;

    fn apply_transform(&mut self, transform: Transform);
}

/// Static description of a page root element
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PageRoot {
    /// Logical page identifier (navigation path)
    pub template: String,
    /// `data-*` attributes of the root, without the prefix
    #[serde(default)]
    pub data: BTreeMap<String, String>,
    /// Whether the page scrolls through a wrapper element
    #[serde(default = "default_scrollable")]
    pub scrollable: bool,
    /// Elements tagged with an animation category
    #[serde(default)]
    pub elements: Vec<AnimatedElement>,
}

fn default_scrollable() -> bool {
    true
}

impl PageRoot {
    pub fn new(template: impl Into<String>) -> Self {
        Self {
            template: template.into(),
            data: BTreeMap::new(),
            scrollable: true,
            elements: Vec::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    pub fn with_element(mut self, element: AnimatedElement) -> Self {
        self.elements.push(element);
        self
    }

    pub fn static_page(mut self) -> Self {
        self.scrollable = false;
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&str> {
        self.data.get(key).map(String::as_str)
    }
}
