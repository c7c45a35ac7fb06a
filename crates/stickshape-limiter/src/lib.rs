//! Analog Output Limiter for Fight-Stick Firmware
//!
//! This crate reshapes the left-stick coordinate of a digital controller
//! before it is reported to the console. Button presses on a fight stick
//! produce instant, perfectly repeatable coordinates; the limiter restores
//! the travel time and the imprecision of a physical stick, and rewrites the
//! few input patterns that digital inputs make unreasonably easy.
//!
//! # Overview
//!
//! - **Travel time**: every target change eases from the current output
//!   over a budget chosen by how easy the destination is to hit.
//! - **SDI lockout**: rapid tapping, cardinal-diagonal repeats and wank SDI
//!   pin one axis to center while the pattern persists.
//! - **Pivot correction**: tilts right after an empty pivot are stretched
//!   to the rim.
//! - **Crouch-to-jump assist**: rising out of a crouch with up held is
//!   turned into a full jump input.
//! - **Jitter**: resting coordinates are perturbed by up to one unit.
//!
//! # RT Safety
//!
//! - No heap allocation on the per-sample path
//! - Bounded work per call over fixed five-entry buffers
//! - No errors on the per-sample path; every function is total
//! - Wrapping 16-bit sample clock with sticky stale flags
//!
//! # Example
//!
//! ```
//! use stickshape_limiter::prelude::*;
//!
//! let mut limiter = Limiter::try_new(LimiterConfig::default())?;
//!
//! // One sample per millisecond: 250 ticks of 4 µs.
//! let raw = OutputState::with_left_stick(Coordinate::new(128, 255));
//! let out = limiter.limit_outputs(&InputState::default(), &raw, 250);
//! assert_eq!(out.left_stick(), Coordinate::CENTER);
//! # Ok::<(), ConfigError>(())
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_debug_implementations)]

pub mod config;
pub mod coord;
pub mod crouch;
pub mod engine;
pub mod error;
pub mod history;
pub mod jitter;
pub mod pivot;
pub mod prelude;
pub mod sdi;
pub mod state;
pub mod timebase;
pub mod travel;
pub mod zones;

pub use config::{AbVariant, Detectors, LimiterConfig, Timing, WankRule};
pub use coord::{Axis, Coordinate};
pub use engine::{Diagnostics, Limiter};
pub use error::{ConfigError, ConfigResult};
pub use state::{InputState, OutputState};
pub use stickshape_fixed::Fixed88;
pub use timebase::TimeBase;
