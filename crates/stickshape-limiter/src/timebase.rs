//! Sample-clock time base.
//!
//! The limiter has no wall clock. Each call advances a wrapping 16-bit sample
//! counter, and every duration is converted into samples from the caller's
//! sample spacing. The spacing is measured in 4 µs ticks.
//!
//! Timestamps are compared with wrapping subtraction only, so ordering is
//! correct as long as every compared pair is less than 2^16 samples apart.
//! Stale flags on history entries cover the rest.

use crate::config::Timing;
use crate::error::{ConfigError, ConfigResult};

/// Duration of one sample-spacing tick.
pub const TICK_US: u32 = 4;

/// Converts microsecond and millisecond durations into sample counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TimeBase {
    sample_spacing: u16,
}

impl TimeBase {
    /// One sample per millisecond.
    pub const DEFAULT: Self = Self {
        sample_spacing: 250,
    };

    /// Build a time base, treating a zero spacing as one tick.
    #[inline]
    pub fn new(sample_spacing: u16) -> Self {
        Self {
            sample_spacing: sample_spacing.max(1),
        }
    }

    /// Build a time base, rejecting a zero spacing.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::ZeroSampleSpacing`] when `sample_spacing` is 0.
    pub fn try_new(sample_spacing: u16) -> ConfigResult<Self> {
        if sample_spacing == 0 {
            return Err(ConfigError::ZeroSampleSpacing);
        }
        Ok(Self { sample_spacing })
    }

    #[inline]
    pub fn sample_spacing(self) -> u16 {
        self.sample_spacing
    }

    /// Microseconds between two samples.
    #[inline]
    pub fn sample_us(self) -> u32 {
        u32::from(self.sample_spacing) * TICK_US
    }

    /// Samples needed to cover `us` microseconds, rounded up and saturated.
    ///
    /// ```
    /// use stickshape_limiter::timebase::TimeBase;
    ///
    /// // 1 ms per sample.
    /// let tb = TimeBase::new(250);
    /// assert_eq!(tb.samples_for_us(6_000), 6);
    /// assert_eq!(tb.samples_for_us(8_333), 9);
    /// assert_eq!(tb.samples_for_us(0), 0);
    /// ```
    #[inline]
    pub fn samples_for_us(self, us: u32) -> u16 {
        let samples = us.div_ceil(self.sample_us());
        u16::try_from(samples).unwrap_or(u16::MAX)
    }

    /// Samples needed to cover `ms` milliseconds.
    #[inline]
    pub fn samples_for_ms(self, ms: u16) -> u16 {
        self.samples_for_us(u32::from(ms) * 1_000)
    }
}

impl Default for TimeBase {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// Samples elapsed from `then` to `now` on the wrapping clock.
#[inline]
pub fn elapsed(now: u16, then: u16) -> u16 {
    now.wrapping_sub(then)
}

/// Every timing window of a [`Timing`] table, converted to samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Budgets {
    pub pivot_dwell_min: u16,
    pub pivot_dwell_max: u16,
    pub pivot_window: u16,
    pub dash_memory: u16,
    pub uptilt_shutoff: u16,
    pub down_up_window: u16,
    pub jump_hold: u16,
    pub sdi_debounce: u16,
    pub tap_inner: u16,
    pub tap_outer: u16,
    pub repeat_window: u16,
    pub wank_window: u16,
    pub sdi_stale: u16,
}

impl Budgets {
    pub fn new(timing: &Timing, tb: TimeBase) -> Self {
        Self {
            pivot_dwell_min: tb.samples_for_us(timing.pivot_dwell_min_us),
            pivot_dwell_max: tb.samples_for_us(timing.pivot_dwell_max_us),
            pivot_window: tb.samples_for_us(timing.pivot_window_us),
            dash_memory: tb.samples_for_us(timing.dash_memory_us),
            uptilt_shutoff: tb.samples_for_us(timing.uptilt_shutoff_us),
            down_up_window: tb.samples_for_us(timing.down_up_window_us),
            jump_hold: tb.samples_for_us(timing.jump_hold_us),
            sdi_debounce: tb.samples_for_us(timing.sdi_debounce_us),
            tap_inner: tb.samples_for_us(timing.tap_inner_us),
            tap_outer: tb.samples_for_us(timing.tap_outer_us),
            repeat_window: tb.samples_for_us(timing.repeat_window_us),
            wank_window: tb.samples_for_us(timing.wank_window_us),
            sdi_stale: tb.samples_for_us(timing.sdi_stale_us),
        }
    }
}
