//! Site manifests and scripted sessions
//!
//! A manifest describes the pages of a site the way the server would render
//! them; a session is a list of user actions replayed against it.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use pageflow_core::collab::{Completer, Completion};
use pageflow_core::event::Viewport;
use pageflow_core::navigation::MemoryHistory;
use pageflow_core::page::{PageRoot, ScrollWrapper};
use pageflow_core::scroll::DeltaMode;
use pageflow_core::{App, AppConfig};

use crate::headless::{
    sample_registry, CurtainOverlay, Journal, SimulatedWrapper, TraceDocument, TraceNavigation,
    TraceSurface, WrapperHandle,
};

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SiteManifest {
    /// Overrides `general.origin` from the config
    #[serde(default)]
    pub origin: Option<String>,
    /// Path the session starts on
    #[serde(default = "default_initial")]
    pub initial: String,
    #[serde(default = "default_curtain_ms")]
    pub curtain_ms: u64,
    /// Delay before the preload signal fires
    #[serde(default)]
    pub preload_ms: u64,
    #[serde(default)]
    pub viewport: Option<Viewport>,
    #[serde(default, rename = "page")]
    pub pages: Vec<PageSpec>,
}

fn default_initial() -> String {
    "/".to_string()
}

fn default_curtain_ms() -> u64 {
    600
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct PageSpec {
    #[serde(flatten)]
    pub root: PageRoot,
    /// Laid-out height of the scroll wrapper
    #[serde(default)]
    pub content_height: f64,
}

/// An [`App`] wired to headless collaborators, plus the handles a session
/// needs to poke at it from outside
pub struct HeadlessSite {
    pub app: App,
    pub journal: Journal,
    pub wrappers: HashMap<String, WrapperHandle>,
    pub preloader: Completer,
    pub preload_delay: Duration,
    pub surface_frames: Arc<std::sync::atomic::AtomicU64>,
}

impl SiteManifest {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read site manifest {}", path.display()))?;
        Self::parse(&content).with_context(|| format!("Invalid site manifest {}", path.display()))
    }

    pub fn parse(content: &str) -> Result<Self> {
        let manifest: Self = toml::from_str(content)?;
        if manifest.pages.is_empty() {
            anyhow::bail!("site manifest declares no pages");
        }
        Ok(manifest)
    }

    /// Effective configuration once the manifest's origin is applied
    pub fn config(&self, config: &AppConfig) -> AppConfig {
        let mut config = config.clone();
        if let Some(origin) = &self.origin {
            config.general.origin = origin.clone();
        }
        config
    }

    pub fn build(&self, config: &AppConfig) -> Result<HeadlessSite> {
        let config = Arc::new(self.config(config));
        let journal = Journal::default();
        let surface = TraceSurface::new(journal.clone());
        let surface_frames = surface.frames();
        let (preloader, preloaded) = Completion::channel();

        let mut builder = App::builder(config)
            .registry(sample_registry(&journal))
            .overlay(CurtainOverlay::new(
                Duration::from_millis(self.curtain_ms),
                journal.clone(),
            ))
            .surface(surface)
            .navigation_ui(TraceNavigation::new(journal.clone()))
            .document(TraceDocument::new(journal.clone()))
            .history(MemoryHistory::new(self.initial.clone()))
            .preloader(preloaded);
        if let Some(viewport) = self.viewport {
            builder = builder.viewport(viewport);
        }

        let mut wrappers = HashMap::new();
        for page in &self.pages {
            let wrapper: Option<Box<dyn ScrollWrapper>> = if page.root.scrollable {
                let handle = WrapperHandle::new(page.content_height);
                wrappers.insert(page.root.template.clone(), handle.clone());
                Some(Box::new(SimulatedWrapper::new(handle)))
            } else {
                None
            };
            builder = builder.page(page.root.clone(), wrapper);
        }

        let app = builder.build().context("Failed to assemble site")?;

        Ok(HeadlessSite {
            app,
            journal,
            wrappers,
            preloader,
            preload_delay: Duration::from_millis(self.preload_ms),
            surface_frames,
        })
    }
}

/// A scripted user session
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Session {
    #[serde(default, rename = "step")]
    pub steps: Vec<Step>,
}

impl Session {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read session script {}", path.display()))?;
        toml::from_str(&content).with_context(|| format!("Invalid session script {}", path.display()))
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(tag = "action", rename_all = "snake_case")]
pub enum Step {
    Wheel {
        delta_y: f64,
        #[serde(default)]
        delta_mode: DeltaMode,
    },
    TouchDown {
        y: f64,
    },
    TouchMove {
        y: f64,
    },
    TouchUp {
        #[serde(default)]
        y: f64,
    },
    /// Click an anchor
    Click {
        href: String,
    },
    Navigate {
        url: String,
        #[serde(default = "default_push")]
        push: bool,
    },
    Back,
    Forward,
    Resize {
        width: f64,
        height: f64,
    },
    /// Change a page's content height, as a content observer would report
    ContentResize {
        template: String,
        height: f64,
    },
    Wait {
        ms: u64,
    },
}

fn default_push() -> bool {
    true
}
