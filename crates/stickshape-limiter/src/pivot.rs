//! Empty-pivot detection and tilt correction.
//!
//! A pivot is a dash in one direction, a short reversed dash, and a return
//! to neutral. After one, a downtilt or uptilt coordinate would come out as
//! a weak tilt; the correction stretches it out to the rim instead.

use serde::{Deserialize, Serialize};

use crate::coord::{Coordinate, axis_from_offset};
use crate::history::{HISTORY_LEN, ZoneEntry};
use crate::timebase::{Budgets, elapsed};
use crate::zones::{Zone, is_downtilt, is_uptilt};

/// Direction of the detected pivot, named by the dash order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PivotDirection {
    #[default]
    None,
    /// Dash left, then right: the character ends facing right.
    LeftThenRight,
    /// Dash right, then left: the character ends facing left.
    RightThenLeft,
}

/// Stick offset of the shallow jump used once upward deflection has been
/// held too long after a pivot.
pub const UPTILT_SHUTOFF_OFFSET: (i16, i16) = (63, 110);

/// Detect a pivot in a newest-first pivot-zone window.
///
/// `z0` must be neutral and `z1` the reversed dash. The original dash sits at
/// index 2, or at index 3 when the stick passed through neutral at index 2.
pub fn detect_pivot(
    window: &[ZoneEntry; HISTORY_LEN],
    now: u16,
    budgets: &Budgets,
) -> PivotDirection {
    let [z0, z1, z2, z3, _] = *window;
    if !z0.zone.is_empty() || z0.stale || z1.stale {
        return PivotDirection::None;
    }

    let direction = if z1.zone == Zone::LEFT {
        PivotDirection::RightThenLeft
    } else if z1.zone == Zone::RIGHT {
        PivotDirection::LeftThenRight
    } else {
        return PivotDirection::None;
    };
    let first_dash = match direction {
        PivotDirection::RightThenLeft => Zone::RIGHT,
        _ => Zone::LEFT,
    };

    let dash_found = if z2.stale {
        false
    } else if z2.zone == first_dash {
        true
    } else {
        z2.zone.is_empty() && !z3.stale && z3.zone == first_dash
    };
    if !dash_found {
        return PivotDirection::None;
    }

    let dwell = elapsed(z0.timestamp, z1.timestamp);
    if dwell < budgets.pivot_dwell_min || dwell > budgets.pivot_dwell_max {
        return PivotDirection::None;
    }
    if elapsed(now, z0.timestamp) > budgets.pivot_window {
        return PivotDirection::None;
    }
    direction
}

/// Corrected coordinate for a pivot tilt, if any applies.
///
/// `up_held` counts consecutive samples of upward deflection.
pub fn pivot_override(
    direction: PivotDirection,
    coord: Coordinate,
    up_held: u16,
    budgets: &Budgets,
) -> Option<Coordinate> {
    if direction == PivotDirection::None {
        return None;
    }
    if is_downtilt(coord.y) {
        return Some(stretch_to_rim(coord, false));
    }
    if !is_uptilt(coord.y) {
        return None;
    }
    if up_held > budgets.uptilt_shutoff {
        let (dx, dy) = UPTILT_SHUTOFF_OFFSET;
        let dx = match direction {
            PivotDirection::RightThenLeft => -dx,
            _ => dx,
        };
        return Some(Coordinate::from_offset(dx, dy));
    }
    Some(stretch_to_rim(coord, true))
}

/// Push a coordinate out to radius 127 along its own angle.
///
/// The radius is resolved in half units and each axis is rounded to the
/// nearest unit. With `min_45`, an angle flatter than 45° is raised to 45°
/// above horizontal first.
///
/// ```
/// use stickshape_limiter::coord::Coordinate;
/// use stickshape_limiter::pivot::stretch_to_rim;
///
/// assert_eq!(stretch_to_rim(Coordinate::new(128, 90), false), Coordinate::new(128, 1));
/// assert_eq!(stretch_to_rim(Coordinate::new(160, 160), false), Coordinate::new(218, 218));
/// ```
pub fn stretch_to_rim(coord: Coordinate, min_45: bool) -> Coordinate {
    let (dx, dy) = coord.offset();
    let (dx, mut dy) = (i32::from(dx), i32::from(dy));
    if min_45 && dx.abs() > dy.abs() {
        dy = dx.abs();
    }

    let r2 = u32::try_from(dx * dx + dy * dy).unwrap_or(0);
    if r2 == 0 {
        return Coordinate::CENTER;
    }
    let r_half = i32::try_from((4 * r2).isqrt()).unwrap_or(i32::MAX);

    Coordinate::new(scale_axis(dx, r_half), scale_axis(dy, r_half))
}

fn scale_axis(offset: i32, r_half: i32) -> u8 {
    let magnitude = (offset.abs() * 254 * 2 + r_half) / (2 * r_half);
    let scaled = if offset < 0 { -magnitude } else { magnitude };
    let clamped = i16::try_from(scaled.clamp(-128, 127)).unwrap_or(0);
    axis_from_offset(clamped)
}
