use serde::{Deserialize, Serialize};

use crate::scroll::WheelEvent;

/// Visible area of the host window
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(1440.0, 900.0)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerKind {
    #[default]
    Mouse,
    Touch,
}

/// Pointer or first-touch coordinates, already unified by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    #[serde(default)]
    pub client_x: f64,
    pub client_y: f64,
    #[serde(default)]
    pub kind: PointerKind,
}

impl PointerEvent {
    pub fn touch(client_y: f64) -> Self {
        Self {
            client_x: 0.0,
            client_y,
            kind: PointerKind::Touch,
        }
    }

    pub fn mouse(client_x: f64, client_y: f64) -> Self {
        Self {
            client_x,
            client_y,
            kind: PointerKind::Mouse,
        }
    }
}

/// Application events
#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Wheel(WheelEvent),
    PointerDown(PointerEvent),
    PointerMove(PointerEvent),
    PointerUp(PointerEvent),
    /// Window was resized
    Resize(Viewport),
    /// A page's scroll wrapper changed size
    ContentResize { template: String },
    /// Host history moved; the new location is already current
    PopState,
    /// Step back through history (hosts without native history)
    HistoryBack,
    /// Step forward through history (hosts without native history)
    HistoryForward,
    /// An anchor was clicked
    LinkClick { href: String },
    Navigate { url: String, push: bool },
    /// Render a frame outside the frame loop
    Tick,
}
