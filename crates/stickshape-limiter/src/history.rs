//! Fixed-capacity history buffers.
//!
//! Three buffers back the limiter:
//!
//! - [`AxisHistory`]: a ring of travel entries for the left stick.
//! - [`ZoneRing`]: a modulo-indexed ring of SDI zones.
//! - [`ZoneShiftRegister`]: a shift register of pivot zones, index 0 newest.
//!
//! All three are pre-filled with a neutral, non-stale baseline so detectors
//! never read uninitialized history. Zone buffers only record changes.

use crate::coord::Coordinate;
use crate::timebase::elapsed;
use crate::travel::EasingCurve;
use crate::zones::Zone;

/// Entries per history buffer.
pub const HISTORY_LEN: usize = 5;

/// One travel-time interpolation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AnalogEntry {
    /// Sample at which the entry was created.
    pub timestamp: u16,
    pub travel_ms: u8,
    pub curve: EasingCurve,
    /// Raw target that opened the entry.
    pub target: Coordinate,
    /// Staged output when the entry was created.
    pub start: Coordinate,
    /// Where the interpolation ends; the target up to jitter, unless locked.
    pub end: Coordinate,
}

impl AnalogEntry {
    /// A finished entry resting at center.
    pub const fn baseline(timestamp: u16) -> Self {
        Self {
            timestamp,
            travel_ms: 0,
            curve: EasingCurve::Linear,
            target: Coordinate::CENTER,
            start: Coordinate::CENTER,
            end: Coordinate::CENTER,
        }
    }
}

/// Ring of travel entries.
#[derive(Debug, Clone)]
pub struct AxisHistory {
    entries: [AnalogEntry; HISTORY_LEN],
    head: usize,
}

impl AxisHistory {
    pub fn new(timestamp: u16) -> Self {
        Self {
            entries: [AnalogEntry::baseline(timestamp); HISTORY_LEN],
            head: 0,
        }
    }

    /// Most recent entry.
    pub fn head(&self) -> AnalogEntry {
        self.entries
            .get(self.head)
            .copied()
            .unwrap_or(AnalogEntry::baseline(0))
    }

    /// Mutable access to the most recent entry.
    pub fn head_mut(&mut self) -> Option<&mut AnalogEntry> {
        self.entries.get_mut(self.head)
    }

    /// Overwrite the oldest slot and make it the head.
    pub fn push(&mut self, entry: AnalogEntry) {
        self.head = (self.head + 1) % HISTORY_LEN;
        if let Some(slot) = self.entries.get_mut(self.head) {
            *slot = entry;
        }
    }
}

/// One recorded zone change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ZoneEntry {
    pub timestamp: u16,
    pub zone: Zone,
    /// Set once the entry ages past the buffer's budget; never cleared.
    pub stale: bool,
}

impl ZoneEntry {
    pub const fn baseline(timestamp: u16) -> Self {
        Self {
            timestamp,
            zone: Zone::NEUTRAL,
            stale: false,
        }
    }

    fn age_out(&mut self, now: u16, budget: u16) {
        if elapsed(now, self.timestamp) > budget {
            self.stale = true;
        }
    }
}

/// Newest-first view of a zone buffer, with index 0 the latest change.
pub trait ZoneWindow {
    fn zone_entry(&self, back: usize) -> Option<ZoneEntry>;

    /// The whole window, newest first.
    fn window(&self) -> [ZoneEntry; HISTORY_LEN] {
        let mut out = [ZoneEntry::default(); HISTORY_LEN];
        for (back, slot) in out.iter_mut().enumerate() {
            if let Some(entry) = self.zone_entry(back) {
                *slot = entry;
            }
        }
        out
    }
}

/// Modulo-indexed ring of SDI zones.
#[derive(Debug, Clone)]
pub struct ZoneRing {
    entries: [ZoneEntry; HISTORY_LEN],
    head: usize,
}

impl ZoneRing {
    pub fn new(timestamp: u16) -> Self {
        Self {
            entries: [ZoneEntry::baseline(timestamp); HISTORY_LEN],
            head: 0,
        }
    }

    /// Record `zone` if it differs from the newest entry. Returns whether a
    /// new entry was written.
    pub fn push_if_changed(&mut self, now: u16, zone: Zone) -> bool {
        if self.zone_entry(0).is_some_and(|head| head.zone == zone) {
            return false;
        }
        self.head = (self.head + 1) % HISTORY_LEN;
        if let Some(slot) = self.entries.get_mut(self.head) {
            *slot = ZoneEntry {
                timestamp: now,
                zone,
                stale: false,
            };
        }
        true
    }

    /// Flag every entry older than `budget` samples.
    pub fn mark_stale(&mut self, now: u16, budget: u16) {
        for entry in &mut self.entries {
            entry.age_out(now, budget);
        }
    }
}

impl ZoneWindow for ZoneRing {
    fn zone_entry(&self, back: usize) -> Option<ZoneEntry> {
        if back >= HISTORY_LEN {
            return None;
        }
        self.entries
            .get((self.head + HISTORY_LEN - back) % HISTORY_LEN)
            .copied()
    }
}

/// Shift register of pivot zones.
#[derive(Debug, Clone)]
pub struct ZoneShiftRegister {
    entries: [ZoneEntry; HISTORY_LEN],
}

impl ZoneShiftRegister {
    pub fn new(timestamp: u16) -> Self {
        Self {
            entries: [ZoneEntry::baseline(timestamp); HISTORY_LEN],
        }
    }

    /// Shift in `zone` if it differs from the newest entry. Returns whether
    /// the register moved.
    pub fn push_if_changed(&mut self, now: u16, zone: Zone) -> bool {
        if self.entries.first().is_some_and(|head| head.zone == zone) {
            return false;
        }
        self.entries.rotate_right(1);
        if let Some(slot) = self.entries.first_mut() {
            *slot = ZoneEntry {
                timestamp: now,
                zone,
                stale: false,
            };
        }
        true
    }

    /// Flag every entry older than `budget` samples.
    pub fn mark_stale(&mut self, now: u16, budget: u16) {
        for entry in &mut self.entries {
            entry.age_out(now, budget);
        }
    }
}

impl ZoneWindow for ZoneShiftRegister {
    fn zone_entry(&self, back: usize) -> Option<ZoneEntry> {
        self.entries.get(back).copied()
    }
}
