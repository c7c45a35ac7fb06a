//! Limiter configuration.
//!
//! Every timing window is stored in microseconds and converted to samples on
//! each call, because the sampling cadence is only known at runtime and can
//! change after auto-calibration.

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, ConfigResult};

/// A/B tuning selector held at boot by the player.
///
/// Threaded through the limiter as a reserved extension point: both variants
/// currently produce identical output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AbVariant {
    #[default]
    A,
    B,
}

/// Which wank-SDI detector feeds the lockout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum WankRule {
    /// Origin, cardinal and two distinct diagonals inside one window.
    #[default]
    Simplified,
    /// Backward walk through chained zones to an adjacent diagonal.
    Sequential,
}

/// Per-detector switches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Detectors {
    pub sdi: bool,
    pub pivot: bool,
    pub crouch_jump: bool,
}

impl Detectors {
    /// Every detector enabled.
    pub const ALL: Self = Self {
        sdi: true,
        pivot: true,
        crouch_jump: true,
    };

    /// Every detector disabled; the limiter reduces to travel-time easing.
    pub const NONE: Self = Self {
        sdi: false,
        pivot: false,
        crouch_jump: false,
    };
}

impl Default for Detectors {
    fn default() -> Self {
        Self::ALL
    }
}

/// Timing windows, in microseconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Timing {
    /// Shortest dwell in the reversed dash zone that still counts as a pivot.
    pub pivot_dwell_min_us: u32,
    /// Longest dwell in the reversed dash zone that still counts as a pivot.
    pub pivot_dwell_max_us: u32,
    /// How long after returning to neutral a pivot keeps correcting tilts.
    pub pivot_window_us: u32,
    /// Dash-zone history older than this is stale for pivot detection.
    pub dash_memory_us: u32,
    /// Held upward deflection beyond this switches to the shallow jump angle.
    pub uptilt_shutoff_us: u32,
    /// A crouch this recent arms the crouch-to-jump assist.
    pub down_up_window_us: u32,
    /// Length of the synthetic jump hold.
    pub jump_hold_us: u32,
    /// Zone changes closer together than this are treated as noise.
    pub sdi_debounce_us: u32,
    /// Tap SDI: limit on one full alternation period.
    pub tap_inner_us: u32,
    /// Tap SDI: limit on the age of the whole alternation window.
    pub tap_outer_us: u32,
    /// Cardinal-diagonal repeat window.
    pub repeat_window_us: u32,
    /// Wank SDI window.
    pub wank_window_us: u32,
    /// SDI-zone history older than this is stale.
    pub sdi_stale_us: u32,
}

/// One 60 Hz frame, rounded.
pub const FRAME_US: u32 = 16_667;

impl Timing {
    pub const DEFAULT: Self = Self {
        pivot_dwell_min_us: 8_333,
        pivot_dwell_max_us: 25_000,
        pivot_window_us: 166_667,
        dash_memory_us: 250_000,
        uptilt_shutoff_us: 66_667,
        down_up_window_us: 66_667,
        jump_hold_us: 33_333,
        sdi_debounce_us: 2_000,
        tap_inner_us: 50_000,
        tap_outer_us: 83_333,
        repeat_window_us: 133_333,
        wank_window_us: 100_000,
        sdi_stale_us: 133_333,
    };

    fn windows(&self) -> [(&'static str, u32); 13] {
        [
            ("pivot_dwell_min_us", self.pivot_dwell_min_us),
            ("pivot_dwell_max_us", self.pivot_dwell_max_us),
            ("pivot_window_us", self.pivot_window_us),
            ("dash_memory_us", self.dash_memory_us),
            ("uptilt_shutoff_us", self.uptilt_shutoff_us),
            ("down_up_window_us", self.down_up_window_us),
            ("jump_hold_us", self.jump_hold_us),
            ("sdi_debounce_us", self.sdi_debounce_us),
            ("tap_inner_us", self.tap_inner_us),
            ("tap_outer_us", self.tap_outer_us),
            ("repeat_window_us", self.repeat_window_us),
            ("wank_window_us", self.wank_window_us),
            ("sdi_stale_us", self.sdi_stale_us),
        ]
    }

    /// Check ordering constraints between windows.
    ///
    /// # Errors
    ///
    /// Returns the first violated constraint.
    pub fn validate(&self) -> ConfigResult<()> {
        if let Some((field, _)) = self.windows().into_iter().find(|(_, us)| *us == 0) {
            return Err(ConfigError::ZeroWindow { field });
        }

        ordered(
            ("pivot_dwell_min_us", self.pivot_dwell_min_us),
            ("pivot_dwell_max_us", self.pivot_dwell_max_us),
        )?;
        ordered(
            ("sdi_debounce_us", self.sdi_debounce_us),
            ("tap_inner_us", self.tap_inner_us),
        )?;
        ordered(
            ("tap_inner_us", self.tap_inner_us),
            ("tap_outer_us", self.tap_outer_us),
        )?;

        for (window, window_us) in [
            ("tap_outer_us", self.tap_outer_us),
            ("repeat_window_us", self.repeat_window_us),
            ("wank_window_us", self.wank_window_us),
        ] {
            if self.sdi_stale_us < window_us {
                return Err(ConfigError::StaleBudgetTooShort {
                    budget: "sdi_stale_us",
                    budget_us: self.sdi_stale_us,
                    window,
                    window_us,
                });
            }
        }
        if self.dash_memory_us < self.pivot_window_us {
            return Err(ConfigError::StaleBudgetTooShort {
                budget: "dash_memory_us",
                budget_us: self.dash_memory_us,
                window: "pivot_window_us",
                window_us: self.pivot_window_us,
            });
        }
        Ok(())
    }
}

impl Default for Timing {
    fn default() -> Self {
        Self::DEFAULT
    }
}

fn ordered(low: (&'static str, u32), high: (&'static str, u32)) -> ConfigResult<()> {
    if low.1 < high.1 {
        Ok(())
    } else {
        Err(ConfigError::InvertedRange {
            low: low.0,
            high: high.0,
            low_us: low.1,
            high_us: high.1,
        })
    }
}

/// Complete limiter configuration.
///
/// # Example
///
/// ```
/// use stickshape_limiter::config::{LimiterConfig, WankRule};
///
/// let config: LimiterConfig = serde_json::from_str(r#"{"wank_rule": "sequential"}"#)?;
/// assert_eq!(config.wank_rule, WankRule::Sequential);
/// assert!(config.jitter);
/// config.validate()?;
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct LimiterConfig {
    pub ab_variant: AbVariant,
    pub wank_rule: WankRule,
    pub detectors: Detectors,
    /// Perturb resting end anchors by up to one unit per axis.
    pub jitter: bool,
    pub timing: Timing,
}

impl LimiterConfig {
    /// Travel-time easing only: no detectors, no jitter.
    pub fn pure_easing() -> Self {
        Self {
            detectors: Detectors::NONE,
            jitter: false,
            ..Self::default()
        }
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the timing table is inconsistent.
    pub fn validate(&self) -> ConfigResult<()> {
        self.timing.validate()
    }
}

impl Default for LimiterConfig {
    fn default() -> Self {
        Self {
            ab_variant: AbVariant::default(),
            wank_rule: WankRule::default(),
            detectors: Detectors::default(),
            jitter: true,
            timing: Timing::default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_is_valid() {
        assert_eq!(LimiterConfig::default().validate(), Ok(()));
    }

    #[test]
    fn test_zero_window_rejected() {
        let mut config = LimiterConfig::default();
        config.timing.jump_hold_us = 0;
        assert_eq!(
            config.validate(),
            Err(ConfigError::ZeroWindow {
                field: "jump_hold_us"
            })
        );
    }

    #[test]
    fn test_inverted_pivot_dwell_rejected() {
        let mut config = LimiterConfig::default();
        config.timing.pivot_dwell_min_us = 30_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                low: "pivot_dwell_min_us",
                ..
            })
        ));
    }

    #[test]
    fn test_tap_inner_must_be_below_outer() {
        let mut config = LimiterConfig::default();
        config.timing.tap_inner_us = config.timing.tap_outer_us;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvertedRange {
                high: "tap_outer_us",
                ..
            })
        ));
    }

    #[test]
    fn test_stale_budget_must_cover_windows() {
        let mut config = LimiterConfig::default();
        config.timing.sdi_stale_us = 90_000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::StaleBudgetTooShort {
                window: "repeat_window_us",
                ..
            })
        ));
    }

    #[test]
    fn test_pure_easing_disables_everything() {
        let config = LimiterConfig::pure_easing();
        assert_eq!(config.detectors, Detectors::NONE);
        assert!(!config.jitter);
    }

    #[test]
    fn test_json_round_trip() -> Result<(), Box<dyn std::error::Error>> {
        let config = LimiterConfig {
            ab_variant: AbVariant::B,
            ..LimiterConfig::default()
        };
        let json = serde_json::to_string(&config)?;
        let back: LimiterConfig = serde_json::from_str(&json)?;
        assert_eq!(back, config);
        Ok(())
    }

    #[test]
    fn test_unknown_fields_rejected() {
        let result: Result<LimiterConfig, _> = serde_json::from_str(r#"{"nerf": true}"#);
        let err = result.map(|_| ()).unwrap_err();
        assert!(err.to_string().contains("unknown field `nerf`"));
    }
}
