//! Smooth scrolling engine
//!
//! Raw input only ever moves a scroll *target*; once per frame the rendered
//! offset is eased toward it with a constant blend factor.
//!
//! # Layers
//!
//! - `math` - Pure interpolation helpers (lerp, clamp)
//! - `wheel` - Wheel delta normalization across line/page/pixel modes
//! - `state` - Per-page scroll record and its integration step
//!
//! # Usage
//!
//! ```
//! use pageflow_core::scroll::ScrollState;
//!
//! let mut scroll = ScrollState::with_limit(0.07, 1000.0);
//! scroll.target = 1000.0;
//!
//! scroll.integrate(0.1);
//! assert_eq!(scroll.current, 70.0);
//! scroll.commit();
//! ```

pub mod math;
pub mod state;
pub mod wheel;

pub use state::ScrollState;
pub use wheel::{normalize_wheel, DeltaMode, NormalizedWheel, WheelEvent};
