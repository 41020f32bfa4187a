//! Wheel delta normalization
//!
//! Hosts report wheel deltas in pixels, lines or pages depending on the input
//! device. Everything downstream works in pixels.

use serde::{Deserialize, Serialize};

use crate::config::WheelConfig;

/// Unit of a raw wheel delta
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DeltaMode {
    #[default]
    Pixel,
    Line,
    Page,
}

/// Raw wheel event as reported by the host
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    #[serde(default)]
    pub delta_x: f64,
    #[serde(default)]
    pub delta_y: f64,
    #[serde(default)]
    pub delta_mode: DeltaMode,
}

impl WheelEvent {
    pub fn pixels(delta_y: f64) -> Self {
        Self {
            delta_x: 0.0,
            delta_y,
            delta_mode: DeltaMode::Pixel,
        }
    }
}

/// Wheel delta expressed in pixels plus a direction hint
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct NormalizedWheel {
    /// Direction of horizontal movement (-1, 0, 1)
    pub spin_x: f64,
    /// Direction of vertical movement (-1, 0, 1)
    pub spin_y: f64,
    pub pixel_x: f64,
    pub pixel_y: f64,
}

/// Convert a raw wheel event to pixel deltas
pub fn normalize_wheel(event: &WheelEvent, config: &WheelConfig) -> NormalizedWheel {
    let scale = match event.delta_mode {
        DeltaMode::Pixel => 1.0,
        DeltaMode::Line => config.line_height,
        DeltaMode::Page => config.page_height,
    };

    let pixel_x = event.delta_x * scale;
    let pixel_y = event.delta_y * scale;

    NormalizedWheel {
        spin_x: spin(pixel_x),
        spin_y: spin(pixel_y),
        pixel_x,
        pixel_y,
    }
}

#[inline]
fn spin(pixels: f64) -> f64 {
    if pixels == 0.0 {
        0.0
    } else {
        pixels.signum()
    }
}
