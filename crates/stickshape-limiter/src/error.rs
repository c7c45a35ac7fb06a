//! Error types for limiter configuration.
//!
//! The per-sample path has no failure modes; only building a configuration
//! or a time base can be rejected.

use thiserror::Error;

/// Configuration validation failure.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error("timing window `{field}` must be non-zero")]
    ZeroWindow { field: &'static str },

    #[error("timing range is inverted: `{low}` ({low_us} us) must be below `{high}` ({high_us} us)")]
    InvertedRange {
        low: &'static str,
        high: &'static str,
        low_us: u32,
        high_us: u32,
    },

    #[error(
        "staleness budget `{budget}` ({budget_us} us) is shorter than the `{window}` window ({window_us} us)"
    )]
    StaleBudgetTooShort {
        budget: &'static str,
        budget_us: u32,
        window: &'static str,
        window_us: u32,
    },

    #[error("sample spacing must be at least one time-base tick")]
    ZeroSampleSpacing,
}

pub type ConfigResult<T> = Result<T, ConfigError>;
