//! Animation unit contract and the tag-keyed registry that builds units
//!
//! Concrete behaviors (parallax, reveal, magnetic buttons, ...) live with the
//! host. Pages only know how to build them from tagged elements and drive them
//! once per frame.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::scroll::ScrollState;

/// Animation categories known to the default registry ordering
pub const DEFAULT_CATEGORIES: [&str; 7] = [
    "button",
    "link",
    "magnetic",
    "parallax",
    "paragraph",
    "rotation",
    "translate",
];

/// A behavior bound to one element and driven by scroll state
pub trait AnimationUnit: Send {
    /// Called after a viewport or content resize has settled
    fn on_resize(&mut self) {}

    /// Called once per frame while the owning page is active
    fn update(&mut self, _scroll: &ScrollState) {}
}

/// Element tagged with an animation category inside a page root
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnimatedElement {
    /// Host-side element identifier
    pub id: String,
    /// Animation category (`data-animation` value)
    pub animation: String,
    /// Remaining `data-*` attributes, without the prefix
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl AnimatedElement {
    pub fn new(id: impl Into<String>, animation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            animation: animation.into(),
            data: BTreeMap::new(),
        }
    }

    pub fn with_data(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.data.insert(key.into(), value.into());
        self
    }

    /// Read a numeric data attribute
    pub fn data_f64(&self, key: &str) -> Option<f64> {
        self.data.get(key).and_then(|v| v.trim().parse().ok())
    }
}

/// Builds a unit for one element
pub type UnitConstructor = Arc<dyn Fn(&AnimatedElement) -> Box<dyn AnimationUnit> + Send + Sync>;

/// Ordered mapping from animation tag to unit constructor
///
/// Iteration order is registration order; it decides the order units are
/// driven in, not what they do.
#[derive(Clone, Default)]
pub struct AnimationRegistry {
    entries: Vec<(String, UnitConstructor)>,
}

impl fmt::Debug for AnimationRegistry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AnimationRegistry")
            .field("tags", &self.tags().collect::<Vec<_>>())
            .finish()
    }
}

impl AnimationRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a constructor for `tag`, replacing any previous one in place
    pub fn register<F>(&mut self, tag: impl Into<String>, constructor: F) -> &mut Self
    where
        F: Fn(&AnimatedElement) -> Box<dyn AnimationUnit> + Send + Sync + 'static,
    {
        let tag = tag.into();
        let constructor: UnitConstructor = Arc::new(constructor);
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = constructor,
            None => self.entries.push((tag, constructor)),
        }
        self
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.entries.iter().any(|(t, _)| t == tag)
    }

    pub fn tags(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(t, _)| t.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Instantiate units for `elements`, category by category
    pub fn instantiate(&self, elements: &[AnimatedElement]) -> Vec<Box<dyn AnimationUnit>> {
        let mut units = Vec::new();

        for (tag, constructor) in &self.entries {
            units.extend(
                elements
                    .iter()
                    .filter(|element| element.animation == *tag)
                    .map(|element| constructor(element)),
            );
        }

        for element in elements.iter().filter(|e| !self.contains(&e.animation)) {
            tracing::debug!(
                element = %element.id,
                animation = %element.animation,
                "No animation registered for tag, skipping element"
            );
        }

        units
    }
}
