//! Travel-time interpolation.
//!
//! Every accepted target change opens a new [`AnalogEntry`] with a start
//! anchor (where the staged output was), an end anchor (where it is headed),
//! a budget in milliseconds and an easing curve. Each sample the head entry
//! is evaluated at the elapsed sample count.
//!
//! # Budgets
//!
//! | Destination              | Budget | Curve        |
//! |--------------------------|--------|--------------|
//! | tier 3                   | 6 ms   | linear       |
//! | tier 2                   | 8 ms   | quadratic    |
//! | tier 1                   | 12 ms  | cubic        |
//! | tier 0                   | 16 ms  | quartic      |
//! | across the gate          | 12 ms  | linear       |
//! | inside the deadzone      | 6 ms   | delayed snap |
//! | during cardinal tap SDI  | 64 ms  | linear       |
//!
//! # RT Safety
//!
//! Integer and [`Fixed88`] arithmetic only; no allocation.

use serde::{Deserialize, Serialize};
use stickshape_fixed::Fixed88;

use crate::coord::{ANALOG_CENTER, Axis, Coordinate, axis_offset};
use crate::history::AnalogEntry;
use crate::timebase::{TimeBase, elapsed};
use crate::zones::{ANALOG_DEAD_MAX, ANALOG_DEAD_MIN, Easiness, easiness, in_deadzone};

/// Easing curve of one interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EasingCurve {
    #[default]
    Linear,
    Quadratic,
    Cubic,
    Quartic,
    /// Hold the start anchor for the whole budget, then jump to the end.
    DelayedSnap,
}

impl EasingCurve {
    /// Power applied to the linear fraction, for the polynomial curves.
    pub fn exponent(self) -> Option<u32> {
        match self {
            Self::Linear => Some(1),
            Self::Quadratic => Some(2),
            Self::Cubic => Some(3),
            Self::Quartic => Some(4),
            Self::DelayedSnap => None,
        }
    }
}

/// Travel budget and curve for one entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TravelBudget {
    pub ms: u8,
    pub curve: EasingCurve,
}

impl TravelBudget {
    pub const fn new(ms: u8, curve: EasingCurve) -> Self {
        Self { ms, curve }
    }
}

pub const TIER3_TRAVEL: TravelBudget = TravelBudget::new(6, EasingCurve::Linear);
pub const TIER2_TRAVEL: TravelBudget = TravelBudget::new(8, EasingCurve::Quadratic);
pub const TIER1_TRAVEL: TravelBudget = TravelBudget::new(12, EasingCurve::Cubic);
pub const TIER0_TRAVEL: TravelBudget = TravelBudget::new(16, EasingCurve::Quartic);
pub const CROSS_GATE_TRAVEL: TravelBudget = TravelBudget::new(12, EasingCurve::Linear);
pub const DEADZONE_TRAVEL: TravelBudget = TravelBudget::new(6, EasingCurve::DelayedSnap);
pub const SLOW_SDI_TRAVEL: TravelBudget = TravelBudget::new(64, EasingCurve::Linear);

/// Entries older than this many slow budgets are complete regardless of
/// their own budget.
pub const STALE_GUARD_FACTOR: u16 = 4;

/// Output of one interpolation step.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TravelResult {
    pub coord: Coordinate,
    pub done: bool,
}

impl TravelResult {
    fn done(coord: Coordinate) -> Self {
        Self { coord, done: true }
    }
}

/// Budget for a destination by easiness tier.
pub fn tier_travel(tier: Easiness) -> TravelBudget {
    match tier {
        Easiness::Tier3 => TIER3_TRAVEL,
        Easiness::Tier2 => TIER2_TRAVEL,
        Easiness::Tier1 => TIER1_TRAVEL,
        Easiness::Tier0 => TIER0_TRAVEL,
    }
}

/// Choose the budget for a move from `start` towards `target`.
///
/// Cardinal tap SDI overrides everything. Otherwise a deadzone destination
/// snaps, a move across center on either axis uses the cross-gate budget,
/// and everything else goes by easiness tier.
pub fn select_travel(start: Coordinate, target: Coordinate, slow_sdi: bool) -> TravelBudget {
    if slow_sdi {
        SLOW_SDI_TRAVEL
    } else if in_deadzone(target) {
        DEADZONE_TRAVEL
    } else if Axis::BOTH
        .into_iter()
        .any(|axis| crosses_gate(start.get(axis), target.get(axis)))
    {
        CROSS_GATE_TRAVEL
    } else {
        tier_travel(easiness(target))
    }
}

fn crosses_gate(from: u8, to: u8) -> bool {
    (from < ANALOG_DEAD_MIN && to > ANALOG_DEAD_MAX)
        || (from > ANALOG_DEAD_MAX && to < ANALOG_DEAD_MIN)
}

/// Evaluate `entry` at sample `now`.
///
/// ```
/// use stickshape_limiter::coord::Coordinate;
/// use stickshape_limiter::history::AnalogEntry;
/// use stickshape_limiter::timebase::TimeBase;
/// use stickshape_limiter::travel::{EasingCurve, travel};
///
/// let entry = AnalogEntry {
///     timestamp: 0,
///     travel_ms: 6,
///     curve: EasingCurve::Linear,
///     target: Coordinate::new(208, 128),
///     start: Coordinate::CENTER,
///     end: Coordinate::new(208, 128),
/// };
/// let tb = TimeBase::new(250);
/// let xs: Vec<u8> = (0..=6).map(|now| travel(&entry, now, tb).coord.x).collect();
/// assert_eq!(xs, [128, 141, 154, 168, 181, 194, 208]);
/// assert!(travel(&entry, 6, tb).done);
/// ```
pub fn travel(entry: &AnalogEntry, now: u16, tb: TimeBase) -> TravelResult {
    let budget = tb.samples_for_ms(u16::from(entry.travel_ms));
    let age = elapsed(now, entry.timestamp);
    let guard = tb
        .samples_for_ms(u16::from(SLOW_SDI_TRAVEL.ms))
        .saturating_mul(STALE_GUARD_FACTOR);

    if budget == 0 || age >= budget || age > guard {
        return TravelResult::done(entry.end);
    }

    let fraction = (u32::from(age) << 8) / u32::from(budget);
    let fraction = i32::try_from(fraction.min(256)).unwrap_or(256);

    let coord = match entry.curve.exponent() {
        None => entry.start,
        Some(1) => Coordinate::new(
            linear_axis(entry.start.x, entry.end.x, fraction),
            linear_axis(entry.start.y, entry.end.y, fraction),
        ),
        Some(power) => {
            let t = Fixed88::from_bits(i16::try_from(fraction).unwrap_or(256)).pow(power);
            Coordinate::new(
                eased_axis(entry.start.x, entry.end.x, t),
                eased_axis(entry.start.y, entry.end.y, t),
            )
        }
    };
    TravelResult {
        coord,
        done: false,
    }
}

fn linear_axis(start: u8, end: u8, fraction: i32) -> u8 {
    let start = i32::from(start);
    let span = i32::from(end) - start;
    to_axis(start + ((span * fraction) >> 8))
}

fn eased_axis(start: u8, end: u8, t: Fixed88) -> u8 {
    let start = half_scale(start);
    let end = half_scale(end);
    let bits = i32::from(Fixed88::lerp(start, end, t).to_bits());
    to_axis(((bits + 64) >> 7) + i32::from(ANALOG_CENTER))
}

/// Center an axis and scale it by 1/2 so any span fits in 16 bits.
fn half_scale(value: u8) -> Fixed88 {
    Fixed88::from_bits(axis_offset(value) << 7)
}

fn to_axis(value: i32) -> u8 {
    u8::try_from(value.clamp(0, 255)).unwrap_or(u8::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(start: Coordinate, end: Coordinate, budget: TravelBudget) -> AnalogEntry {
        AnalogEntry {
            timestamp: 100,
            travel_ms: budget.ms,
            curve: budget.curve,
            target: end,
            start,
            end,
        }
    }

    const TB: TimeBase = TimeBase::DEFAULT;

    #[test]
    fn test_linear_reaches_end_at_budget() {
        let e = entry(Coordinate::CENTER, Coordinate::new(208, 128), TIER3_TRAVEL);
        assert_eq!(travel(&e, 100, TB).coord, Coordinate::CENTER);
        let last = travel(&e, 105, TB);
        assert!(!last.done);
        let done = travel(&e, 106, TB);
        assert!(done.done);
        assert_eq!(done.coord, Coordinate::new(208, 128));
    }

    #[test]
    fn test_linear_downward_is_monotonic() {
        let e = entry(Coordinate::new(208, 48), Coordinate::new(48, 208), CROSS_GATE_TRAVEL);
        let mut prev = travel(&e, 100, TB).coord;
        for now in 101..=112 {
            let cur = travel(&e, now, TB).coord;
            assert!(cur.x <= prev.x);
            assert!(cur.y >= prev.y);
            prev = cur;
        }
        assert_eq!(prev, Coordinate::new(48, 208));
    }

    #[test]
    fn test_quartic_starts_slowly() {
        let e = entry(Coordinate::CENTER, Coordinate::new(200, 160), TIER0_TRAVEL);
        let linear = entry(
            Coordinate::CENTER,
            Coordinate::new(200, 160),
            TravelBudget::new(16, EasingCurve::Linear),
        );
        let eased = travel(&e, 104, TB).coord;
        let straight = travel(&linear, 104, TB).coord;
        assert!(eased.x < straight.x);
        assert!(eased.x >= 128);
    }

    #[test]
    fn test_power_curves_are_monotonic() {
        for budget in [TIER2_TRAVEL, TIER1_TRAVEL, TIER0_TRAVEL] {
            let e = entry(Coordinate::new(20, 230), Coordinate::new(236, 30), budget);
            let mut prev = travel(&e, 100, TB).coord;
            assert_eq!(prev, Coordinate::new(20, 230));
            for now in 101..=(100 + u16::from(budget.ms)) {
                let cur = travel(&e, now, TB).coord;
                assert!(cur.x >= prev.x, "{budget:?} at {now}");
                assert!(cur.y <= prev.y, "{budget:?} at {now}");
                prev = cur;
            }
            assert_eq!(prev, Coordinate::new(236, 30));
        }
    }

    #[test]
    fn test_delayed_snap_holds_then_jumps() {
        let e = entry(Coordinate::new(200, 128), Coordinate::new(130, 126), DEADZONE_TRAVEL);
        for now in 100..106 {
            assert_eq!(travel(&e, now, TB).coord, Coordinate::new(200, 128));
        }
        assert_eq!(travel(&e, 106, TB).coord, Coordinate::new(130, 126));
    }

    #[test]
    fn test_zero_budget_is_done() {
        let e = entry(
            Coordinate::CENTER,
            Coordinate::new(0, 0),
            TravelBudget::new(0, EasingCurve::Linear),
        );
        let result = travel(&e, 100, TB);
        assert!(result.done);
        assert_eq!(result.coord, Coordinate::new(0, 0));
    }

    #[test]
    fn test_stale_guard_across_wrap() {
        let e = entry(Coordinate::CENTER, Coordinate::new(208, 128), SLOW_SDI_TRAVEL);
        // A timestamp that reads as "in the future" is far past the guard.
        let result = travel(&e, 99, TB);
        assert!(result.done);
    }

    #[test]
    fn test_select_travel_order() {
        let center = Coordinate::CENTER;
        assert_eq!(select_travel(center, Coordinate::new(208, 128), true), SLOW_SDI_TRAVEL);
        assert_eq!(select_travel(Coordinate::new(208, 128), center, false), DEADZONE_TRAVEL);
        assert_eq!(
            select_travel(Coordinate::new(48, 128), Coordinate::new(208, 128), false),
            CROSS_GATE_TRAVEL
        );
        assert_eq!(select_travel(center, Coordinate::new(208, 128), false), TIER3_TRAVEL);
        assert_eq!(select_travel(center, Coordinate::new(184, 184), false), TIER2_TRAVEL);
        assert_eq!(select_travel(center, Coordinate::new(200, 160), false), TIER0_TRAVEL);
    }

    #[test]
    fn test_gate_crossing_needs_both_sides_outside_deadzone() {
        assert!(crosses_gate(105, 151));
        assert!(crosses_gate(151, 105));
        assert!(!crosses_gate(106, 200));
        assert!(!crosses_gate(48, 150));
    }
}
