//! Crouch-to-jump assist.
//!
//! Coming up out of a crouch into the uptilt band with the up direction held
//! is read as a jump attempt. The assist drives y to full deflection for the
//! jump hold so the jump registers before the tilt does.

use tracing::debug;

use crate::timebase::Budgets;
use crate::zones::{is_crouch, is_up_deflected, is_uptilt};

/// Full upward deflection.
pub const JUMP_Y: u8 = u8::MAX;

/// Assist state carried between samples.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrouchJump {
    since_crouch: u16,
    since_jump: u16,
    jumping: bool,
    latch: bool,
}

impl Default for CrouchJump {
    fn default() -> Self {
        Self::new()
    }
}

impl CrouchJump {
    pub const fn new() -> Self {
        Self {
            since_crouch: u16::MAX,
            since_jump: u16::MAX,
            jumping: false,
            latch: false,
        }
    }

    /// A synthetic jump is being held.
    #[inline]
    pub fn is_jumping(&self) -> bool {
        self.jumping
    }

    /// Re-entry latch: set when a jump starts, cleared once y falls back to
    /// the deadzone edge.
    #[inline]
    pub fn is_latched(&self) -> bool {
        self.latch
    }

    /// Advance one sample with staged `y` and the digital up input.
    ///
    /// Returns the y override while a jump is held.
    pub fn step(&mut self, y: u8, up_held: bool, budgets: &Budgets) -> Option<u8> {
        self.since_crouch = self.since_crouch.saturating_add(1);
        self.since_jump = self.since_jump.saturating_add(1);

        if is_crouch(y) {
            self.since_crouch = 0;
        }
        if !is_up_deflected(y) {
            self.latch = false;
        }

        if self.jumping {
            if self.since_jump < budgets.jump_hold && up_held && is_up_deflected(y) {
                self.since_crouch = u16::MAX;
                return Some(JUMP_Y);
            }
            self.jumping = false;
            debug!(held = self.since_jump, "crouch jump released");
            return None;
        }

        if !self.latch && self.since_crouch <= budgets.down_up_window && is_uptilt(y) && up_held {
            debug!(since_crouch = self.since_crouch, "crouch jump started");
            self.jumping = true;
            self.since_jump = 0;
            self.latch = true;
            self.since_crouch = u16::MAX;
            return Some(JUMP_Y);
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Timing;
    use crate::timebase::TimeBase;

    fn budgets() -> Budgets {
        Budgets::new(&Timing::DEFAULT, TimeBase::DEFAULT)
    }

    #[test]
    fn test_jump_held_for_hold_duration() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assert_eq!(assist.step(60, false, &b), None);
        let held = (0..100)
            .map(|_| assist.step(170, true, &b))
            .take_while(Option::is_some)
            .count();
        assert_eq!(held, usize::from(b.jump_hold));
        assert!(!assist.is_jumping());
        assert!(assist.is_latched());
    }

    #[test]
    fn test_latch_blocks_reentry_until_deadzone() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assist.step(60, false, &b);
        for _ in 0..40 {
            assist.step(170, true, &b);
        }
        // Still up: no second jump.
        assert_eq!(assist.step(170, true, &b), None);
        // Back down through crouch and up again fires once more.
        assist.step(60, true, &b);
        assert!(!assist.is_latched());
        assert_eq!(assist.step(170, true, &b), Some(JUMP_Y));
    }

    #[test]
    fn test_requires_up_input() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assist.step(60, false, &b);
        assert_eq!(assist.step(170, false, &b), None);
    }

    #[test]
    fn test_crouch_window_expires() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assist.step(60, false, &b);
        for _ in 0..b.down_up_window {
            assist.step(128, true, &b);
        }
        assert_eq!(assist.step(170, true, &b), None);
    }

    #[test]
    fn test_crouch_window_inclusive() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assist.step(60, false, &b);
        for _ in 1..b.down_up_window {
            assist.step(128, true, &b);
        }
        assert_eq!(assist.step(170, true, &b), Some(JUMP_Y));
    }

    #[test]
    fn test_tap_jump_height_is_ignored() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assist.step(60, false, &b);
        assert_eq!(assist.step(200, true, &b), None);
    }

    #[test]
    fn test_releasing_up_ends_hold_early() {
        let b = budgets();
        let mut assist = CrouchJump::new();
        assist.step(60, false, &b);
        assert_eq!(assist.step(170, true, &b), Some(JUMP_Y));
        assert_eq!(assist.step(170, true, &b), Some(JUMP_Y));
        assert_eq!(assist.step(170, false, &b), None);
        assert!(!assist.is_jumping());
    }
}
