//! Analog stick coordinates.
//!
//! A coordinate is a pair of unsigned 8-bit axis values with the neutral
//! position at 128. Most geometry in the limiter works on signed offsets
//! from that center.

/// Neutral axis value.
pub const ANALOG_CENTER: u8 = 128;

/// Axis selector used by lockout and anchor bookkeeping.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Axis {
    /// Horizontal axis.
    X,
    /// Vertical axis.
    Y,
}

impl Axis {
    /// Both axes, x first.
    pub const BOTH: [Axis; 2] = [Axis::X, Axis::Y];

    /// The other axis.
    pub fn cross(self) -> Self {
        match self {
            Axis::X => Axis::Y,
            Axis::Y => Axis::X,
        }
    }
}

/// Position of one analog stick, `0..=255` per axis, 128 = neutral.
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Coordinate {
    /// Horizontal position; larger is further right.
    pub x: u8,
    /// Vertical position; larger is further up.
    pub y: u8,
}

impl Coordinate {
    /// Stick at rest.
    pub const CENTER: Self = Self {
        x: ANALOG_CENTER,
        y: ANALOG_CENTER,
    };

    /// Create a coordinate from raw axis values.
    pub const fn new(x: u8, y: u8) -> Self {
        Self { x, y }
    }

    /// Build a coordinate from signed offsets, saturating into `0..=255`.
    pub fn from_offset(dx: i16, dy: i16) -> Self {
        Self {
            x: axis_from_offset(dx),
            y: axis_from_offset(dy),
        }
    }

    /// Signed offsets from center.
    pub fn offset(self) -> (i16, i16) {
        (axis_offset(self.x), axis_offset(self.y))
    }

    /// Squared distance from center.
    pub fn radius_squared(self) -> u32 {
        let (dx, dy) = self.offset();
        u32::from(dx.unsigned_abs()).pow(2) + u32::from(dy.unsigned_abs()).pow(2)
    }

    /// True when both axes sit exactly at 128.
    pub fn is_center(self) -> bool {
        self == Self::CENTER
    }

    /// Read one axis.
    pub fn get(self, axis: Axis) -> u8 {
        match axis {
            Axis::X => self.x,
            Axis::Y => self.y,
        }
    }

    /// Write one axis.
    pub fn set(&mut self, axis: Axis, value: u8) {
        match axis {
            Axis::X => self.x = value,
            Axis::Y => self.y = value,
        }
    }
}

impl Default for Coordinate {
    fn default() -> Self {
        Self::CENTER
    }
}

/// Signed offset of a single axis value from center.
#[inline]
pub fn axis_offset(value: u8) -> i16 {
    i16::from(value) - i16::from(ANALOG_CENTER)
}

/// Axis value for a signed offset from center, saturating into `0..=255`.
#[inline]
pub fn axis_from_offset(offset: i16) -> u8 {
    let value = offset.saturating_add(i16::from(ANALOG_CENTER)).clamp(0, 255);
    u8::try_from(value).unwrap_or(ANALOG_CENTER)
}
