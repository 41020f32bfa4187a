//! Pure interpolation helpers used by the scroll engine

/// Linear interpolation between two values
///
/// # Arguments
/// * `from` - Start value
/// * `to` - End value
/// * `t` - Interpolation factor [0.0, 1.0]
#[inline]
pub fn lerp(from: f64, to: f64, t: f64) -> f64 {
    from + (to - from) * t
}

/// Clamp `value` into `[min, max]`
///
/// Unlike `f64::clamp` this never panics: an inverted range resolves to `max`.
#[inline]
pub fn clamp(min: f64, max: f64, value: f64) -> f64 {
    value.max(min).min(max)
}
