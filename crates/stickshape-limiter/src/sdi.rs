//! SDI detection.
//!
//! Reads the five most recent SDI-zone changes (index 0 newest) and reports
//! which rapid-input patterns are present:
//!
//! - **Tap SDI**: rhythmic alternation between two zones. Alternating with
//!   neutral is a cardinal tap; alternating between a cardinal and a
//!   diagonal containing it is a diagonal tap.
//! - **Cardinal-diagonal repeat**: origin, cardinal, diagonal, cardinal,
//!   diagonal inside one window.
//! - **Wank SDI**: sweeping from one diagonal to an adjacent one.
//!
//! A referenced entry that has gone stale invalidates the pattern.

use bitflags::bitflags;

use crate::config::WankRule;
use crate::coord::Axis;
use crate::history::{HISTORY_LEN, ZoneEntry};
use crate::timebase::{Budgets, elapsed};
use crate::zones::Zone;

bitflags! {
    /// Detected SDI patterns. Occupies the high nibble of the packed verdict.
    #[repr(transparent)]
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct SdiNerf: u8 {
        const WANK = 0x10;
        const TAP_CARDINAL = 0x20;
        const TAP_DIAGONAL = 0x40;
        const TAP_CRDG = 0x80;
    }
}

impl SdiNerf {
    /// Patterns that lock out an axis.
    pub const LOCKOUT: Self = Self::WANK
        .union(Self::TAP_DIAGONAL)
        .union(Self::TAP_CRDG);
}

/// Detector output: the patterns found plus the cardinal that selects the
/// lockout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct SdiVerdict {
    pub nerf: SdiNerf,
    pub cardinal: Zone,
}

impl SdiVerdict {
    pub const NONE: Self = Self {
        nerf: SdiNerf::empty(),
        cardinal: Zone::NEUTRAL,
    };

    /// Pack into one byte: patterns high, cardinal low.
    ///
    /// ```
    /// use stickshape_limiter::sdi::{SdiNerf, SdiVerdict};
    /// use stickshape_limiter::zones::Zone;
    ///
    /// let verdict = SdiVerdict { nerf: SdiNerf::WANK, cardinal: Zone::RIGHT };
    /// assert_eq!(verdict.bits(), 0x18);
    /// assert_eq!(SdiVerdict::from_bits(0x18), verdict);
    /// ```
    pub fn bits(self) -> u8 {
        self.nerf.bits() | self.cardinal.bits()
    }

    pub fn from_bits(bits: u8) -> Self {
        Self {
            nerf: SdiNerf::from_bits_truncate(bits),
            cardinal: Zone::from_bits_truncate(bits),
        }
    }

    pub fn is_empty(self) -> bool {
        self.nerf.is_empty()
    }

    /// Whether new entries should use the slow travel budget.
    pub fn slow_travel(self) -> bool {
        self.nerf.contains(SdiNerf::TAP_CARDINAL)
    }

    /// Axis to pin at center, if a lockout-class pattern carries a cardinal.
    ///
    /// The cross axis of the cardinal is locked: a vertical cardinal pins x,
    /// a horizontal one pins y.
    pub fn lockout_axis(self) -> Option<Axis> {
        if !self.nerf.intersects(SdiNerf::LOCKOUT) || !self.cardinal.is_cardinal() {
            return None;
        }
        let along = if self.cardinal.is_vertical() {
            Axis::Y
        } else {
            Axis::X
        };
        Some(along.cross())
    }
}

/// Run every SDI detector over a newest-first window.
pub fn detect(window: &[ZoneEntry; HISTORY_LEN], budgets: &Budgets, rule: WankRule) -> SdiVerdict {
    let tap = tap_sdi(window, budgets);
    let wank = match rule {
        WankRule::Simplified => wank_sdi_simplified(window, budgets),
        WankRule::Sequential => wank_sdi_sequential(window, budgets),
    };
    if wank.is_empty() {
        tap
    } else {
        SdiVerdict {
            nerf: tap.nerf | wank.nerf,
            cardinal: wank.cardinal,
        }
    }
}

/// Tap SDI and cardinal-diagonal repeat.
pub fn tap_sdi(window: &[ZoneEntry; HISTORY_LEN], budgets: &Budgets) -> SdiVerdict {
    let [z0, z1, z2, z3, z4] = *window;
    let mut nerf = SdiNerf::empty();

    let alternating = z0.zone != z1.zone && z0.zone == z2.zone && z1.zone == z3.zone;
    if alternating
        && all_fresh(&[z0, z1, z2, z3])
        && elapsed(z0.timestamp, z3.timestamp) < budgets.tap_outer
        && elapsed(z0.timestamp, z2.timestamp) < budgets.tap_inner
        && debounced(&[z0, z1, z2, z3], budgets.sdi_debounce)
    {
        if z0.zone.is_empty() || z1.zone.is_empty() {
            nerf |= SdiNerf::TAP_CARDINAL;
        }
        if z0.zone.popcount() + z1.zone.popcount() == 3 {
            nerf |= SdiNerf::TAP_DIAGONAL;
        }
    }

    let repeat = z4.zone.is_empty()
        && z3.zone.is_cardinal()
        && z2.zone.is_diagonal()
        && z2.zone.contains(z3.zone)
        && z1.zone == z3.zone
        && z0.zone == z2.zone;
    if repeat
        && all_fresh(window)
        && elapsed(z0.timestamp, z4.timestamp) < budgets.repeat_window
        && debounced(window, budgets.sdi_debounce)
    {
        nerf |= SdiNerf::TAP_CRDG;
    }

    if nerf.is_empty() {
        return SdiVerdict::NONE;
    }
    SdiVerdict {
        nerf,
        cardinal: cardinal_before_diagonal(window),
    }
}

/// Wank SDI by walking back through chained zones.
///
/// Starting from a diagonal, each older entry must share a direction with
/// its newer neighbour. The walk fires at the first diagonal adjacent to the
/// current one, and the direction the two share is the cardinal.
pub fn wank_sdi_sequential(window: &[ZoneEntry; HISTORY_LEN], budgets: &Budgets) -> SdiVerdict {
    let Some(&current) = window.first() else {
        return SdiVerdict::NONE;
    };
    if !current.zone.is_diagonal() || current.stale {
        return SdiVerdict::NONE;
    }

    let mut newer = current;
    for &older in window.iter().skip(1) {
        if older.stale
            || elapsed(current.timestamp, older.timestamp) >= budgets.wank_window
            || !older.zone.intersects(newer.zone)
        {
            break;
        }
        let shared = older.zone & current.zone;
        if older.zone.is_diagonal() && older.zone != current.zone && shared.is_cardinal() {
            return SdiVerdict {
                nerf: SdiNerf::WANK,
                cardinal: shared,
            };
        }
        newer = older;
    }
    SdiVerdict::NONE
}

/// Wank SDI by pattern: a diagonal, a distinct diagonal, a cardinal and the
/// origin, newest first.
///
/// The window opens when the stick leaves the origin, at the cardinal entry.
/// The origin is matched on zone alone, so any rest at neutral beforehand
/// does not matter.
pub fn wank_sdi_simplified(window: &[ZoneEntry; HISTORY_LEN], budgets: &Budgets) -> SdiVerdict {
    let Some(&current) = window.first() else {
        return SdiVerdict::NONE;
    };
    if !current.zone.is_diagonal() {
        return SdiVerdict::NONE;
    }

    let Some(j) = first_after(window, 0, |z| z.is_diagonal() && z != current.zone) else {
        return SdiVerdict::NONE;
    };
    let Some(k) = first_after(window, j, Zone::is_cardinal) else {
        return SdiVerdict::NONE;
    };
    if first_after(window, k, |z| z.is_empty()).is_none()
        || window.iter().take(k + 1).any(|entry| entry.stale)
    {
        return SdiVerdict::NONE;
    }
    let (Some(other), Some(cardinal)) = (window.get(j), window.get(k)) else {
        return SdiVerdict::NONE;
    };
    if elapsed(current.timestamp, cardinal.timestamp) >= budgets.wank_window {
        return SdiVerdict::NONE;
    }

    let shared = (current.zone & other.zone) & cardinal.zone;
    if shared.popcount() != 1 {
        return SdiVerdict::NONE;
    }
    SdiVerdict {
        nerf: SdiNerf::WANK,
        cardinal: cardinal.zone,
    }
}

fn first_after(
    window: &[ZoneEntry; HISTORY_LEN],
    after: usize,
    pred: impl Fn(Zone) -> bool,
) -> Option<usize> {
    window
        .iter()
        .enumerate()
        .skip(after + 1)
        .find(|(_, entry)| pred(entry.zone))
        .map(|(i, _)| i)
}

fn all_fresh(entries: &[ZoneEntry]) -> bool {
    entries.iter().all(|entry| !entry.stale)
}

/// Every consecutive pair is at least `debounce` samples apart.
fn debounced(entries: &[ZoneEntry], debounce: u16) -> bool {
    entries
        .windows(2)
        .all(|pair| match pair {
            [newer, older] => elapsed(newer.timestamp, older.timestamp) >= debounce,
            _ => true,
        })
}

/// The newest cardinal older than the newest diagonal.
fn cardinal_before_diagonal(window: &[ZoneEntry; HISTORY_LEN]) -> Zone {
    let Some(diagonal) = window.iter().position(|entry| entry.zone.is_diagonal()) else {
        return Zone::NEUTRAL;
    };
    window
        .iter()
        .skip(diagonal + 1)
        .map(|entry| entry.zone)
        .find(|zone| zone.is_cardinal())
        .unwrap_or(Zone::NEUTRAL)
}
