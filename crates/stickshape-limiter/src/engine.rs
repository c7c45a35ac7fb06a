//! The per-sample limiter.
//!
//! [`Limiter::limit_outputs`] runs once per input sample:
//!
//! 1. advance the sample clock and interpolate the head travel entry;
//! 2. record the pivot zone of the interpolated x;
//! 3. apply the pivot tilt correction;
//! 4. apply the crouch-to-jump assist;
//! 5. record the SDI zone of the raw stick;
//! 6. detect SDI and apply the axis lockout;
//! 7. open a new travel entry if the raw target moved;
//! 8. pass every other report field through.

use tracing::{debug, trace};

use crate::config::LimiterConfig;
use crate::coord::{ANALOG_CENTER, Axis, Coordinate};
use crate::crouch::CrouchJump;
use crate::error::ConfigResult;
use crate::history::{AnalogEntry, AxisHistory, ZoneRing, ZoneShiftRegister, ZoneWindow};
use crate::jitter::Jitter;
use crate::pivot::{PivotDirection, detect_pivot, pivot_override};
use crate::sdi::{SdiVerdict, detect};
use crate::state::{InputState, OutputState};
use crate::timebase::{Budgets, TimeBase};
use crate::travel::{select_travel, travel};
use crate::zones::{is_up_deflected, pivot_zone, sdi_zone};

/// Per-axis lockout latches.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Lockout {
    pub x: bool,
    pub y: bool,
}

impl Lockout {
    pub fn get(self, axis: Axis) -> bool {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    fn set(&mut self, axis: Axis, value: bool) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

/// What the limiter decided on the most recent sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Diagnostics {
    /// Sample clock after the most recent call.
    pub clock: u16,
    pub sdi: SdiVerdict,
    pub pivot: PivotDirection,
    /// The pivot correction rewrote the staged coordinate.
    pub pivot_override: bool,
    pub lockout: Lockout,
    pub jumping: bool,
    /// Staged left stick before pass-through.
    pub staged: Coordinate,
}

/// Analog output limiter for the left stick.
///
/// Owns every piece of history; one instance per controller.
///
/// # Example
///
/// ```
/// use stickshape_limiter::prelude::*;
///
/// let mut limiter = Limiter::new(LimiterConfig::pure_easing());
/// let raw = OutputState::with_left_stick(Coordinate::new(208, 128));
///
/// let first = limiter.limit_outputs(&InputState::default(), &raw, 250);
/// assert_eq!(first.left_stick(), Coordinate::CENTER);
///
/// let mut last = first;
/// for _ in 0..8 {
///     last = limiter.limit_outputs(&InputState::default(), &raw, 250);
/// }
/// assert_eq!(last.left_stick(), Coordinate::new(208, 128));
/// ```
#[derive(Debug, Clone)]
pub struct Limiter {
    config: LimiterConfig,
    clock: u16,
    analog: AxisHistory,
    sdi_zones: ZoneRing,
    pivot_zones: ZoneShiftRegister,
    jitter: Jitter,
    crouch: CrouchJump,
    up_held: u16,
    /// Coordinate the pivot correction emitted on the previous sample.
    correction: Option<Coordinate>,
    lockout: Lockout,
    last: Diagnostics,
}

impl Limiter {
    /// Create a limiter whose sample clock starts at zero.
    pub fn new(config: LimiterConfig) -> Self {
        Self::with_start_time(config, 0)
    }

    /// Validate `config`, then create a limiter.
    ///
    /// # Errors
    ///
    /// Returns the first timing constraint `config` violates.
    pub fn try_new(config: LimiterConfig) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self::new(config))
    }

    /// Create a limiter whose sample clock starts at `start`.
    ///
    /// Every history buffer is filled with a neutral baseline stamped at
    /// `start`.
    pub fn with_start_time(config: LimiterConfig, start: u16) -> Self {
        Self {
            config,
            clock: start,
            analog: AxisHistory::new(start),
            sdi_zones: ZoneRing::new(start),
            pivot_zones: ZoneShiftRegister::new(start),
            jitter: Jitter::new(),
            crouch: CrouchJump::new(),
            up_held: 0,
            correction: None,
            lockout: Lockout::default(),
            last: Diagnostics {
                clock: start,
                staged: Coordinate::CENTER,
                ..Diagnostics::default()
            },
        }
    }

    pub fn config(&self) -> &LimiterConfig {
        &self.config
    }

    /// Decisions taken on the most recent sample.
    pub fn diagnostics(&self) -> Diagnostics {
        self.last
    }

    /// Shape one sample.
    ///
    /// `sample_spacing` is the time between samples in 4 µs ticks. A spacing
    /// of zero is treated as one tick.
    pub fn limit_outputs(
        &mut self,
        inputs: &InputState,
        raw: &OutputState,
        sample_spacing: u16,
    ) -> OutputState {
        let tb = TimeBase::new(sample_spacing);
        let budgets = Budgets::new(&self.config.timing, tb);
        let detectors = self.config.detectors;
        self.jitter.seed(sample_spacing);

        self.clock = self.clock.wrapping_add(1);
        let now = self.clock;

        // Interpolate; a finished entry collapses onto its end anchor.
        let step = travel(&self.analog.head(), now, tb);
        if step.done
            && let Some(head) = self.analog.head_mut()
        {
            head.start = head.end;
        }
        let mut staged = step.coord;

        self.up_held = if is_up_deflected(staged.y) {
            self.up_held.saturating_add(1)
        } else {
            0
        };

        self.pivot_zones.push_if_changed(now, pivot_zone(staged.x));
        self.pivot_zones.mark_stale(now, budgets.dash_memory);

        let pivot = if detectors.pivot {
            detect_pivot(&self.pivot_zones.window(), now, &budgets)
        } else {
            PivotDirection::None
        };
        let corrected = pivot_override(pivot, staged, self.up_held, &budgets);
        match (corrected, self.correction) {
            (Some(coord), _) => {
                debug!(?pivot, from = ?staged, to = ?coord, "pivot tilt corrected");
                staged = coord;
            }
            (None, Some(held)) => {
                // Ease out of the correction from where it left the output.
                if let Some(head) = self.analog.head_mut() {
                    head.start = held;
                    head.timestamp = now;
                }
                debug!(from = ?held, to = ?staged, "pivot tilt correction ended");
                staged = held;
            }
            (None, None) => {}
        }
        self.correction = corrected;

        if detectors.crouch_jump
            && let Some(y) = self.crouch.step(staged.y, inputs.up, &budgets)
        {
            staged.y = y;
        }

        let target = raw.left_stick();
        self.sdi_zones.push_if_changed(now, sdi_zone(target));
        self.sdi_zones.mark_stale(now, budgets.sdi_stale);

        let verdict = if detectors.sdi {
            detect(&self.sdi_zones.window(), &budgets, self.config.wank_rule)
        } else {
            SdiVerdict::NONE
        };
        let firing = verdict.lockout_axis();
        self.apply_lockout(firing, &mut staged, now);

        if target != self.analog.head().target {
            let entry = self.open_entry(now, staged, target, firing, verdict.slow_travel());
            trace!(
                now,
                ?target,
                start = ?entry.start,
                end = ?entry.end,
                travel_ms = entry.travel_ms,
                curve = ?entry.curve,
                "travel entry opened"
            );
            self.analog.push(entry);
        }

        self.last = Diagnostics {
            clock: now,
            sdi: verdict,
            pivot,
            pivot_override: corrected.is_some(),
            lockout: self.lockout,
            jumping: self.crouch.is_jumping(),
            staged,
        };

        let mut out = *raw;
        out.set_left_stick(staged);
        out
    }

    /// Pin the firing axis at center, or release a latched one.
    fn apply_lockout(&mut self, firing: Option<Axis>, staged: &mut Coordinate, now: u16) {
        for axis in Axis::BOTH {
            let latched = self.lockout.get(axis);
            if firing == Some(axis) {
                staged.set(axis, ANALOG_CENTER);
                if let Some(head) = self.analog.head_mut() {
                    head.end.set(axis, ANALOG_CENTER);
                }
                if !latched {
                    debug!(?axis, now, "sdi lockout engaged");
                    self.lockout.set(axis, true);
                }
            } else if latched {
                if let Some(head) = self.analog.head_mut()
                    && head.end.get(axis) != head.target.get(axis)
                {
                    // Resume easing from where the output is now.
                    head.end.set(axis, head.target.get(axis));
                    head.start = *staged;
                    head.timestamp = now;
                }
                if staged.get(axis) == ANALOG_CENTER {
                    debug!(?axis, now, "sdi lockout released");
                    self.lockout.set(axis, false);
                }
            }
        }
    }

    fn open_entry(
        &mut self,
        now: u16,
        start: Coordinate,
        target: Coordinate,
        firing: Option<Axis>,
        slow: bool,
    ) -> AnalogEntry {
        let mut end = if self.config.jitter {
            self.jitter.apply(target)
        } else {
            target
        };
        for axis in Axis::BOTH {
            let from = start.get(axis);
            let wanted = target.get(axis);
            // A jittered anchor may not reverse the direction of travel.
            if end.get(axis).cmp(&from) != wanted.cmp(&from) {
                end.set(axis, wanted);
            }
            if firing == Some(axis) {
                end.set(axis, ANALOG_CENTER);
            }
        }

        let budget = select_travel(start, target, slow);
        AnalogEntry {
            timestamp: now,
            travel_ms: budget.ms,
            curve: budget.curve,
            target,
            start,
            end,
        }
    }
}
