//! 8.8 Fixed-Point Arithmetic for Stickshape
//!
//! This crate provides [`Fixed88`], a signed 16-bit fixed-point number with
//! 8 integer bits and 8 fractional bits. It is the numeric kernel of the
//! travel-time easing engine, chosen over native floats so that easing output
//! is bit-identical on every target the firmware runs on.
//!
//! # Operation Contracts
//!
//! | Operation | Overflow behavior |
//! |-----------|-------------------|
//! | [`Fixed88::wrapping_add`] / `+` | wraps (two's complement) |
//! | [`Fixed88::wrapping_sub`] / `-` | wraps |
//! | [`Fixed88::wrapping_mul`] / `*` | 32-bit product, shifted, truncated to 16 bits |
//! | [`Fixed88::saturating_div`] / `/` | division by zero saturates by numerator sign |
//! | [`Fixed88::fast_div`] | 16-bit divide, 4 bits of precision lost |
//! | [`Fixed88::lerp`] | composed from the wrapping operations |
//!
//! # RT Safety
//!
//! - No heap allocations
//! - No floating point on any arithmetic path
//! - All arithmetic operations are `const fn` and O(1)
//!
//! # Example
//!
//! ```
//! use stickshape_fixed::Fixed88;
//!
//! let half = Fixed88::HALF;
//! let quarter = half * half;
//! assert_eq!(quarter.to_bits(), 64);
//!
//! let mid = Fixed88::lerp(Fixed88::ZERO, Fixed88::from_int(10), half);
//! assert_eq!(mid, Fixed88::from_int(5));
//! ```

#![deny(unsafe_op_in_unsafe_fn, clippy::unwrap_used)]
#![deny(static_mut_refs)]
#![deny(unused_must_use)]
#![warn(missing_docs)]
#![warn(missing_debug_implementations)]

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Signed 8.8 fixed-point number.
///
/// The raw representation is an `i16` where one unit equals `1/256`.
/// Representable range is `[-128.0, 127.99609375]`.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Fixed88(i16);

impl Fixed88 {
    /// Number of fractional bits.
    pub const FRAC_BITS: u32 = 8;

    /// 0.0
    pub const ZERO: Self = Self(0);

    /// 1.0
    pub const ONE: Self = Self(1 << 8);

    /// 0.5
    pub const HALF: Self = Self(1 << 7);

    /// Largest representable value, `0x7FFF`.
    pub const MAX: Self = Self(i16::MAX);

    /// Smallest representable value, `0x8000`.
    pub const MIN: Self = Self(i16::MIN);

    /// Build from the raw 8.8 representation.
    #[inline]
    pub const fn from_bits(bits: i16) -> Self {
        Self(bits)
    }

    /// Raw 8.8 representation.
    #[inline]
    pub const fn to_bits(self) -> i16 {
        self.0
    }

    /// Convert an integer to fixed point. Every `i8` is exactly representable.
    #[inline]
    pub const fn from_int(n: i8) -> Self {
        Self((n as i16) << Self::FRAC_BITS)
    }

    /// Integer part, rounded toward negative infinity.
    ///
    /// ```
    /// use stickshape_fixed::Fixed88;
    ///
    /// assert_eq!(Fixed88::from_bits(0x0180).to_int(), 1);
    /// assert_eq!(Fixed88::from_bits(-0x0080).to_int(), -1);
    /// ```
    #[inline]
    pub const fn to_int(self) -> i8 {
        (self.0 >> Self::FRAC_BITS) as i8
    }

    /// Wrapping addition.
    #[inline]
    pub const fn wrapping_add(self, rhs: Self) -> Self {
        Self(self.0.wrapping_add(rhs.0))
    }

    /// Wrapping subtraction.
    #[inline]
    pub const fn wrapping_sub(self, rhs: Self) -> Self {
        Self(self.0.wrapping_sub(rhs.0))
    }

    /// Multiply with a 32-bit intermediate, then truncate back to 16 bits.
    ///
    /// The shift is arithmetic, so products round toward negative infinity.
    #[inline]
    pub const fn wrapping_mul(self, rhs: Self) -> Self {
        let product = (self.0 as i32) * (rhs.0 as i32);
        Self((product >> Self::FRAC_BITS) as i16)
    }

    /// Full-precision division using a 32-bit intermediate.
    ///
    /// Division by zero saturates: positive numerators give [`Fixed88::MAX`],
    /// negative numerators give [`Fixed88::MIN`] and zero gives zero.
    /// Quotients outside the representable range wrap.
    ///
    /// ```
    /// use stickshape_fixed::Fixed88;
    ///
    /// let three = Fixed88::from_int(3);
    /// assert_eq!(three.saturating_div(Fixed88::from_int(2)).to_bits(), 0x0180);
    /// assert_eq!(three.saturating_div(Fixed88::ZERO), Fixed88::MAX);
    /// ```
    #[inline]
    pub const fn saturating_div(self, rhs: Self) -> Self {
        if rhs.0 == 0 {
            return Self::div_by_zero(self);
        }
        let quotient = ((self.0 as i32) << Self::FRAC_BITS) / (rhs.0 as i32);
        Self(quotient as i16)
    }

    /// Division that only needs a 16-bit divider.
    ///
    /// The divisor is pre-shifted by four bits, so the low four fractional
    /// bits of the divisor and of the quotient are lost. Divisors whose
    /// magnitude is below `16/256` collapse to zero after the pre-shift and
    /// are treated like a division by zero.
    #[inline]
    pub const fn fast_div(self, rhs: Self) -> Self {
        let divisor = rhs.0 >> 4;
        if divisor == 0 {
            return Self::div_by_zero(self);
        }
        Self(self.0.wrapping_div(divisor) << 4)
    }

    /// Linear interpolation `start + (end - start) * t`.
    ///
    /// `t` is expected in `[0, 1]`; values outside extrapolate with
    /// wrapping arithmetic. The span `end - start` must fit in 16 bits for
    /// an exact result, which callers guarantee by working at half scale.
    #[inline]
    pub const fn lerp(start: Self, end: Self, t: Self) -> Self {
        start.wrapping_add(end.wrapping_sub(start).wrapping_mul(t))
    }

    /// Raise to a non-negative integer power by repeated multiplication.
    ///
    /// `pow(0)` is [`Fixed88::ONE`].
    #[inline]
    pub const fn pow(self, exp: u32) -> Self {
        let mut acc = Self::ONE;
        let mut i = 0;
        while i < exp {
            acc = acc.wrapping_mul(self);
            i += 1;
        }
        acc
    }

    #[inline]
    const fn div_by_zero(numerator: Self) -> Self {
        if numerator.0 > 0 {
            Self::MAX
        } else if numerator.0 < 0 {
            Self::MIN
        } else {
            Self::ZERO
        }
    }
}

impl Add for Fixed88 {
    type Output = Self;

    #[inline]
    fn add(self, rhs: Self) -> Self {
        self.wrapping_add(rhs)
    }
}

impl Sub for Fixed88 {
    type Output = Self;

    #[inline]
    fn sub(self, rhs: Self) -> Self {
        self.wrapping_sub(rhs)
    }
}

impl Mul for Fixed88 {
    type Output = Self;

    #[inline]
    fn mul(self, rhs: Self) -> Self {
        self.wrapping_mul(rhs)
    }
}

impl Div for Fixed88 {
    type Output = Self;

    #[inline]
    fn div(self, rhs: Self) -> Self {
        self.saturating_div(rhs)
    }
}

impl Neg for Fixed88 {
    type Output = Self;

    #[inline]
    fn neg(self) -> Self {
        Self(self.0.wrapping_neg())
    }
}

impl From<i8> for Fixed88 {
    fn from(n: i8) -> Self {
        Self::from_int(n)
    }
}

impl fmt::Display for Fixed88 {
    /// Formats with four decimal places without going through floats.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let bits = i32::from(self.0);
        let magnitude = bits.unsigned_abs();
        let int_part = magnitude >> Self::FRAC_BITS;
        let frac_part = ((magnitude & 0xFF) * 10_000) >> Self::FRAC_BITS;
        let sign = if bits < 0 { "-" } else { "" };
        write!(f, "{sign}{int_part}.{frac_part:04}")
    }
}
