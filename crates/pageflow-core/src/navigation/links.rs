//! URL normalization and anchor classification

use url::Url;

use crate::{Error, Result};

/// What the host should do with an anchor
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LinkAction {
    /// Same-origin link: intercept the click and navigate to the template
    Navigate(String),
    /// Other site: open in a new tab with `rel="noopener"`
    External,
    /// `mailto:` or `tel:` link: leave untouched
    Passthrough,
}

impl LinkAction {
    /// Attributes the host should set on the anchor element
    pub fn attributes(&self) -> &'static [(&'static str, &'static str)] {
        match self {
            LinkAction::External => &[("rel", "noopener"), ("target", "_blank")],
            LinkAction::Navigate(_) | LinkAction::Passthrough => &[],
        }
    }
}

/// Reduce a URL to its template key
///
/// Accepts absolute URLs on `origin` and root-relative paths. Query, fragment
/// and a trailing slash are dropped.
pub fn template_for(url: &str, origin: &Url) -> Result<String> {
    let resolved = if url.starts_with('/') && !url.starts_with("//") {
        origin.join(url)?
    } else {
        let parsed = Url::parse(url)?;
        if parsed.origin() != origin.origin() {
            return Err(Error::ForeignOrigin(url.to_string()));
        }
        parsed
    };

    let path = resolved.path();
    let trimmed = path.trim_end_matches('/');
    if trimmed.is_empty() {
        Ok("/".to_string())
    } else {
        Ok(trimmed.to_string())
    }
}

/// Decide how an anchor with `href` is handled
pub fn classify_link(href: &str, origin: &Url) -> LinkAction {
    let href = href.trim();
    let lowered = href.to_ascii_lowercase();
    if lowered.starts_with("mailto:") || lowered.starts_with("tel:") {
        return LinkAction::Passthrough;
    }

    match template_for(href, origin) {
        Ok(template) => LinkAction::Navigate(template),
        Err(_) => LinkAction::External,
    }
}
