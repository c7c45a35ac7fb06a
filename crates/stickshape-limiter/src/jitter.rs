//! Deterministic end-anchor jitter.
//!
//! A 16-bit linear congruential generator drives a weighted 3x3 grid of
//! one-unit offsets. The grid weights are corners 1, edges 2 and center 4,
//! so the offset distribution is a discrete approximation of a small
//! Gaussian blob around the requested target.

use crate::coord::Coordinate;

/// LCG multiplier. The increment is 1.
pub const LCG_MULTIPLIER: u16 = 0xD9F5;

/// Nibble to `(dx, dy)` offset table.
const GRID: [(i8, i8); 16] = [
    (-1, -1),
    (1, -1),
    (-1, 1),
    (1, 1),
    (0, -1),
    (0, -1),
    (0, 1),
    (0, 1),
    (-1, 0),
    (-1, 0),
    (1, 0),
    (1, 0),
    (0, 0),
    (0, 0),
    (0, 0),
    (0, 0),
];

/// Jitter generator state.
///
/// The generator seeds itself from the first value passed to
/// [`Jitter::seed`] and ignores every later seed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Jitter {
    state: u16,
    seeded: bool,
}

impl Jitter {
    pub const fn new() -> Self {
        Self {
            state: 0,
            seeded: false,
        }
    }

    /// Seed once; later calls are no-ops.
    pub fn seed(&mut self, seed: u16) {
        if !self.seeded {
            self.state = seed;
            self.seeded = true;
        }
    }

    /// Advance the generator and return the folded 4-bit output.
    pub fn next_nibble(&mut self) -> u8 {
        self.state = self.state.wrapping_mul(LCG_MULTIPLIER).wrapping_add(1);
        fold_nibble(self.state)
    }

    /// Advance the generator and return a grid offset.
    pub fn next_offset(&mut self) -> (i8, i8) {
        decode(self.next_nibble())
    }

    /// Perturb a coordinate by one draw.
    ///
    /// Axes resting exactly at center are left alone so a released stick
    /// stays centered. Other axes move by at most one unit, saturating.
    pub fn apply(&mut self, coord: Coordinate) -> Coordinate {
        let (dx, dy) = self.next_offset();
        Coordinate::new(nudge(coord.x, dx), nudge(coord.y, dy))
    }
}

/// XOR-fold a 16-bit state into a nibble.
///
/// ```
/// use stickshape_limiter::jitter::fold_nibble;
///
/// // 0x12 ^ 0x34 = 0x26, then 0x2 ^ 0x6 = 0x4.
/// assert_eq!(fold_nibble(0x1234), 0x4);
/// ```
#[inline]
pub fn fold_nibble(state: u16) -> u8 {
    let [hi, lo] = state.to_be_bytes();
    let byte = hi ^ lo;
    (byte >> 4) ^ (byte & 0x0F)
}

/// Map a nibble onto the weighted grid.
#[inline]
pub fn decode(nibble: u8) -> (i8, i8) {
    GRID.get(usize::from(nibble & 0x0F))
        .copied()
        .unwrap_or((0, 0))
}

fn nudge(value: u8, delta: i8) -> u8 {
    if value == Coordinate::CENTER.x {
        value
    } else {
        value.saturating_add_signed(delta)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_grid_weights() {
        let mut corners = 0;
        let mut edges = 0;
        let mut center = 0;
        for nibble in 0..16u8 {
            match decode(nibble) {
                (0, 0) => center += 1,
                (0, _) | (_, 0) => edges += 1,
                _ => corners += 1,
            }
        }
        assert_eq!((corners, edges, center), (4, 8, 4));
    }

    #[test]
    fn test_each_edge_has_weight_two() {
        for edge in [(0, -1), (0, 1), (-1, 0), (1, 0)] {
            let count = (0..16u8).filter(|&n| decode(n) == edge).count();
            assert_eq!(count, 2, "edge {edge:?}");
        }
    }

    #[test]
    fn test_lcg_step() {
        let mut jitter = Jitter::new();
        jitter.seed(1);
        jitter.next_nibble();
        // 1 * 0xD9F5 + 1
        assert_eq!(jitter.state, 0xD9F6);
        jitter.next_nibble();
        assert_eq!(jitter.state, 0xD9F6u16.wrapping_mul(0xD9F5).wrapping_add(1));
    }

    #[test]
    fn test_seed_only_once() {
        let mut jitter = Jitter::new();
        assert!(!jitter.seeded);
        jitter.seed(250);
        jitter.seed(999);
        assert!(jitter.seeded);
        assert_eq!(jitter.state, 250);
    }

    #[test]
    fn test_sequence_is_deterministic() {
        let mut a = Jitter::new();
        let mut b = Jitter::new();
        a.seed(250);
        b.seed(250);
        for _ in 0..64 {
            assert_eq!(a.next_offset(), b.next_offset());
        }
    }

    #[test]
    fn test_center_axes_untouched() {
        let mut jitter = Jitter::new();
        jitter.seed(7);
        for _ in 0..32 {
            assert_eq!(jitter.apply(Coordinate::CENTER), Coordinate::CENTER);
            let moved = jitter.apply(Coordinate::new(128, 200));
            assert_eq!(moved.x, 128);
            assert!(moved.y.abs_diff(200) <= 1);
        }
    }

    #[test]
    fn test_saturates_at_extremes() {
        let mut jitter = Jitter::new();
        jitter.seed(3);
        for _ in 0..32 {
            let moved = jitter.apply(Coordinate::new(255, 0));
            assert!(moved.x >= 254);
            assert!(moved.y <= 1);
        }
    }
}
