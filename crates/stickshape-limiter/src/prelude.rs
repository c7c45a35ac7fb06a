//! Prelude for the limiter crate.
//!
//! ```
//! use stickshape_limiter::prelude::*;
//!
//! let mut limiter = Limiter::new(LimiterConfig::default());
//! let out = limiter.limit_outputs(&InputState::default(), &OutputState::default(), 250);
//! assert_eq!(out.left_stick(), Coordinate::CENTER);
//! ```

pub use crate::config::{AbVariant, Detectors, LimiterConfig, Timing, WankRule};
pub use crate::coord::{Axis, Coordinate};
pub use crate::engine::{Diagnostics, Limiter, Lockout};
pub use crate::error::{ConfigError, ConfigResult};
pub use crate::pivot::PivotDirection;
pub use crate::sdi::{SdiNerf, SdiVerdict};
pub use crate::state::{InputState, OutputState};
pub use crate::timebase::TimeBase;
pub use crate::travel::EasingCurve;
pub use crate::zones::{Easiness, Zone};
