//! Controller snapshots exchanged with the rest of the firmware.
//!
//! `InputState` is the digital side after button scanning; `OutputState` is
//! the report handed to a protocol backend. The limiter reads the raw
//! `OutputState`, rewrites the left stick and passes every other field
//! through untouched.

use serde::{Deserialize, Serialize};

use crate::coord::{ANALOG_CENTER, Coordinate};

/// Digital direction inputs after SOCD resolution.
///
/// Only `up` is consulted by the limiter; it gates the synthetic jump hold
/// so the report never claims an up input the player is not pressing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct InputState {
    pub left: bool,
    pub right: bool,
    pub down: bool,
    pub up: bool,
    pub mod_x: bool,
    pub mod_y: bool,
}

/// Controller report before protocol encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputState {
    pub a: bool,
    pub b: bool,
    pub x: bool,
    pub y: bool,
    /// Z on GameCube.
    pub button_r: bool,
    pub button_l: bool,
    pub trigger_l_digital: bool,
    pub trigger_r_digital: bool,
    pub trigger_l_analog: u8,
    pub trigger_r_analog: u8,
    pub start: bool,
    pub select: bool,
    pub home: bool,
    pub dpad_up: bool,
    pub dpad_down: bool,
    pub dpad_left: bool,
    pub dpad_right: bool,
    pub left_stick_x: u8,
    pub left_stick_y: u8,
    pub right_stick_x: u8,
    pub right_stick_y: u8,
}

impl Default for OutputState {
    fn default() -> Self {
        Self {
            a: false,
            b: false,
            x: false,
            y: false,
            button_r: false,
            button_l: false,
            trigger_l_digital: false,
            trigger_r_digital: false,
            trigger_l_analog: 0,
            trigger_r_analog: 0,
            start: false,
            select: false,
            home: false,
            dpad_up: false,
            dpad_down: false,
            dpad_left: false,
            dpad_right: false,
            left_stick_x: ANALOG_CENTER,
            left_stick_y: ANALOG_CENTER,
            right_stick_x: ANALOG_CENTER,
            right_stick_y: ANALOG_CENTER,
        }
    }
}

impl OutputState {
    /// Report with the left stick at `coord` and everything else at rest.
    pub fn with_left_stick(coord: Coordinate) -> Self {
        let mut out = Self::default();
        out.set_left_stick(coord);
        out
    }

    /// Left stick position.
    pub fn left_stick(&self) -> Coordinate {
        Coordinate::new(self.left_stick_x, self.left_stick_y)
    }

    /// Overwrite the left stick position.
    pub fn set_left_stick(&mut self, coord: Coordinate) {
        self.left_stick_x = coord.x;
        self.left_stick_y = coord.y;
    }

    /// Right (C) stick position.
    pub fn right_stick(&self) -> Coordinate {
        Coordinate::new(self.right_stick_x, self.right_stick_y)
    }
}
