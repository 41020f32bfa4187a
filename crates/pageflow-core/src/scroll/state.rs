//! Per-page scroll record and its integration step

use serde::Serialize;

use super::math::{clamp, lerp};

/// Eased scroll offset and its bounds
///
/// Input handlers only write `target` and `position`. The render tick is the
/// only writer of `current` and `last`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ScrollState {
    /// Constant blend factor in (0, 1]
    pub ease: f64,
    /// Snapshot of `current` taken when a drag gesture starts
    pub position: f64,
    /// Rendered offset
    pub current: f64,
    /// Offset requested by input
    pub target: f64,
    /// Maximum scrollable distance, never negative
    pub limit: f64,
    /// `current` as of the previous tick
    pub last: f64,
}

impl ScrollState {
    pub fn new(ease: f64) -> Self {
        Self::with_limit(ease, 0.0)
    }

    pub fn with_limit(ease: f64, limit: f64) -> Self {
        Self {
            ease,
            position: 0.0,
            current: 0.0,
            target: 0.0,
            limit: limit.max(0.0),
            last: 0.0,
        }
    }

    /// Update the scroll bound from content and viewport heights
    pub fn set_limit(&mut self, content_height: f64, viewport_height: f64) {
        self.limit = (content_height - viewport_height).max(0.0);
    }

    /// Keep `target` inside `[0, limit]`
    #[inline]
    pub fn clamp_target(&mut self) {
        self.target = clamp(0.0, self.limit, self.target);
    }

    /// Advance `current` one step toward `target` and return it
    ///
    /// `current` is floored after easing, so it settles within `1 / ease`
    /// pixels below a target it approaches from above zero.
    pub fn integrate(&mut self, snap_threshold: f64) -> f64 {
        self.clamp_target();

        self.current = lerp(self.current, self.target, self.ease).floor();

        if self.current < snap_threshold {
            self.current = 0.0;
        }

        self.current
    }

    /// Close the tick
    #[inline]
    pub fn commit(&mut self) {
        self.last = self.current;
    }

    /// Jump to an offset without easing
    pub fn jump(&mut self, value: f64) {
        self.current = value;
        self.target = value;
        self.last = value;
    }

    /// Distance travelled during the last tick
    #[inline]
    pub fn velocity(&self) -> f64 {
        self.current - self.last
    }

    /// Scroll progress in [0, 1]
    pub fn progress(&self) -> f64 {
        if self.limit <= 0.0 {
            0.0
        } else {
            clamp(0.0, 1.0, self.current / self.limit)
        }
    }
}
