pub mod animation;
pub mod app;
pub mod collab;
pub mod config;
pub mod detection;
pub mod error;
pub mod event;
pub mod navigation;
pub mod page;
pub mod runtime;
pub mod scroll;

pub use app::{App, AppBuilder, NavigateOutcome, TransitionPhase};
pub use config::{AppConfig, ScrollConfig};
pub use error::{Error, Result};
pub use runtime::FrameLoop;
