//! Zone classifiers.
//!
//! Each classifier maps a coordinate, or a single axis, onto a small
//! direction mask. The SDI, pivot and tap-jump classifiers use independent
//! threshold sets: SDI starts registering before a dash would, so the two
//! must never share one zone function.

use bitflags::bitflags;

use crate::coord::{ANALOG_CENTER, Coordinate};

/// Inner edge of the deadzone square (inclusive, still neutral).
pub const ANALOG_DEAD_MIN: u8 = ANALOG_CENTER - 22;
/// Outer edge of the deadzone square (inclusive, still neutral).
pub const ANALOG_DEAD_MAX: u8 = ANALOG_CENTER + 22;
/// y at or below this holds a crouch.
pub const ANALOG_CROUCH: u8 = ANALOG_CENTER - 50;
/// y at or below this is past the downtilt band.
pub const ANALOG_DOWNSMASH: u8 = ANALOG_CENTER - 53;
/// y at or above this always jumps.
pub const ANALOG_TAP_JUMP: u8 = ANALOG_CENTER + 55;
/// Left SDI bound (inclusive).
pub const ANALOG_SDI_LEFT: u8 = ANALOG_CENTER - 56;
/// Right SDI bound (inclusive).
pub const ANALOG_SDI_RIGHT: u8 = ANALOG_CENTER + 56;
/// Left dash bound (inclusive).
pub const ANALOG_DASH_LEFT: u8 = ANALOG_CENTER - 64;
/// Right dash bound (inclusive).
pub const ANALOG_DASH_RIGHT: u8 = ANALOG_CENTER + 64;

/// Squared radius of the circular deadzone.
pub const DEADZONE_RADIUS_SQUARED: u32 = 22 * 22;
/// Squared rim radii for easiness tiers 1, 2 and 3.
pub const RIM_RADII_SQUARED: [u32; 3] = [5625, 6185, 6400];
/// Axis-difference tolerance for "near a principal direction".
pub const PRINCIPAL_TOLERANCE: u16 = 3;

bitflags! {
    /// Direction mask. Cardinal = one bit, diagonal = two, neutral = none.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct Zone: u8 {
        const UP = 0b0001;
        const DOWN = 0b0010;
        const LEFT = 0b0100;
        const RIGHT = 0b1000;
    }
}

impl Zone {
    /// No direction.
    pub const NEUTRAL: Self = Self::empty();

    /// Number of directions set.
    pub fn popcount(self) -> u32 {
        self.bits().count_ones()
    }

    /// Exactly one direction.
    pub fn is_cardinal(self) -> bool {
        self.popcount() == 1
    }

    /// Two directions.
    pub fn is_diagonal(self) -> bool {
        self.popcount() == 2
    }

    /// Whether the mask involves the horizontal axis.
    pub fn is_horizontal(self) -> bool {
        self.intersects(Self::LEFT | Self::RIGHT)
    }

    /// Whether the mask involves the vertical axis.
    pub fn is_vertical(self) -> bool {
        self.intersects(Self::UP | Self::DOWN)
    }
}

/// Distance-and-angle class of a destination coordinate.
///
/// Only the eight principal directions earn a tier above zero; anything else
/// has to ease in with the slow internal travel time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Easiness {
    Tier0 = 0,
    Tier1 = 1,
    Tier2 = 2,
    Tier3 = 3,
}

/// SDI zone of a coordinate.
///
/// An axis registers once it reaches the SDI bound. While one axis is
/// registered, the other joins as soon as it leaves the deadzone square,
/// which makes a diagonal.
pub fn sdi_zone(coord: Coordinate) -> Zone {
    let horizontal = axis_zone(coord.x, ANALOG_SDI_LEFT, ANALOG_SDI_RIGHT, Zone::LEFT, Zone::RIGHT);
    let vertical = axis_zone(coord.y, ANALOG_SDI_LEFT, ANALOG_SDI_RIGHT, Zone::DOWN, Zone::UP);

    let mut zone = horizontal | vertical;
    if !horizontal.is_empty() && vertical.is_empty() {
        zone |= axis_zone(coord.y, ANALOG_DEAD_MIN - 1, ANALOG_DEAD_MAX + 1, Zone::DOWN, Zone::UP);
    }
    if !vertical.is_empty() && horizontal.is_empty() {
        zone |= axis_zone(coord.x, ANALOG_DEAD_MIN - 1, ANALOG_DEAD_MAX + 1, Zone::LEFT, Zone::RIGHT);
    }
    zone
}

/// Pivot zone: x against the dash bounds only.
pub fn pivot_zone(x: u8) -> Zone {
    axis_zone(x, ANALOG_DASH_LEFT, ANALOG_DASH_RIGHT, Zone::LEFT, Zone::RIGHT)
}

/// `UP` when y sits in the tilt-only band above the deadzone and below the
/// tap-jump threshold.
pub fn uptilt_shutoff_zone(y: u8) -> Zone {
    if is_up_deflected(y) && !is_tap_jump(y) {
        Zone::UP
    } else {
        Zone::NEUTRAL
    }
}

/// y within the downtilt band.
pub fn is_downtilt(y: u8) -> bool {
    y > ANALOG_DOWNSMASH && y < ANALOG_DEAD_MIN
}

/// y within the uptilt band.
pub fn is_uptilt(y: u8) -> bool {
    uptilt_shutoff_zone(y) == Zone::UP
}

/// y holds a crouch.
pub fn is_crouch(y: u8) -> bool {
    y <= ANALOG_CROUCH
}

/// y at or past the tap-jump threshold.
pub fn is_tap_jump(y: u8) -> bool {
    y >= ANALOG_TAP_JUMP
}

/// y is above the deadzone square.
pub fn is_up_deflected(y: u8) -> bool {
    y > ANALOG_DEAD_MAX
}

/// Coordinate inside the deadzone square on both axes.
pub fn in_deadzone(coord: Coordinate) -> bool {
    let dead = ANALOG_DEAD_MIN..=ANALOG_DEAD_MAX;
    dead.contains(&coord.x) && dead.contains(&coord.y)
}

/// Easiness tier of a destination.
///
/// ```
/// use stickshape_limiter::coord::Coordinate;
/// use stickshape_limiter::zones::{Easiness, easiness};
///
/// assert_eq!(easiness(Coordinate::new(208, 128)), Easiness::Tier3);
/// assert_eq!(easiness(Coordinate::new(184, 184)), Easiness::Tier2);
/// // Off-angle rim points get no fast path.
/// assert_eq!(easiness(Coordinate::new(200, 160)), Easiness::Tier0);
/// ```
pub fn easiness(coord: Coordinate) -> Easiness {
    let r2 = coord.radius_squared();
    if r2 < DEADZONE_RADIUS_SQUARED {
        return Easiness::Tier0;
    }

    let (dx, dy) = coord.offset();
    let (ax, ay) = (dx.unsigned_abs(), dy.unsigned_abs());
    let near_cardinal = ax.min(ay) <= PRINCIPAL_TOLERANCE;
    let near_diagonal = ax.abs_diff(ay) <= PRINCIPAL_TOLERANCE;
    if !near_cardinal && !near_diagonal {
        return Easiness::Tier0;
    }

    match RIM_RADII_SQUARED.iter().filter(|&&rim| r2 >= rim).count() {
        0 => Easiness::Tier0,
        1 => Easiness::Tier1,
        2 => Easiness::Tier2,
        _ => Easiness::Tier3,
    }
}

fn axis_zone(value: u8, low: u8, high: u8, low_zone: Zone, high_zone: Zone) -> Zone {
    if value <= low {
        low_zone
    } else if value >= high {
        high_zone
    } else {
        Zone::NEUTRAL
    }
}
