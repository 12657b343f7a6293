//! Signed 22.10 fixed-point numbers.
//!
//! Every CSS 2.1 number — length, angle, time, frequency, percentage — is
//! carried in this type so that the bytecode codec and the property parsers
//! share one arithmetic representation instead of juggling `f32`/`f64` and
//! losing exactness at serialization boundaries.

use core::fmt;
use core::ops::{Add, Div, Mul, Neg, Sub};

/// Number of fractional bits.
const FRAC_BITS: u32 = 10;

/// Signed 22.10 fixed-point value: 22 integer bits, 10 fractional bits,
/// stored in the low 32 bits of an `i32`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Fixed(i32);

impl Fixed {
    /// Zero.
    pub const ZERO: Fixed = Fixed(0);

    /// π.
    pub const PI: Fixed = Fixed::from_raw(0x0000_0c91);
    /// π / 2.
    pub const PI_2: Fixed = Fixed::from_raw(0x0000_0648);
    /// 3π / 2.
    pub const THREE_PI_2: Fixed = Fixed::from_raw(0x0000_12d9);
    /// 2π.
    pub const TWO_PI: Fixed = Fixed::from_raw(0x0000_1922);

    /// 90 degrees, expressed in this fixed-point format.
    pub const DEG_90: Fixed = Fixed::from_raw(0x0001_6800);
    /// 180 degrees.
    pub const DEG_180: Fixed = Fixed::from_raw(0x0002_d000);
    /// 270 degrees.
    pub const DEG_270: Fixed = Fixed::from_raw(0x0004_3800);
    /// 360 degrees.
    pub const DEG_360: Fixed = Fixed::from_raw(0x0005_a000);

    /// 100 grad, expressed in this fixed-point format.
    pub const GRAD_100: Fixed = Fixed::from_raw(0x0001_9000);
    /// 200 grad.
    pub const GRAD_200: Fixed = Fixed::from_raw(0x0003_2000);
    /// 300 grad.
    pub const GRAD_300: Fixed = Fixed::from_raw(0x0004_b000);
    /// 400 grad.
    pub const GRAD_400: Fixed = Fixed::from_raw(0x0006_4000);

    /// Wrap a raw 22.10 bit pattern.
    #[must_use]
    pub const fn from_raw(raw: i32) -> Self {
        Fixed(raw)
    }

    /// The raw 22.10 bit pattern, for bytecode serialization.
    #[must_use]
    pub const fn to_raw(self) -> i32 {
        self.0
    }

    /// Convert from an integer.
    #[must_use]
    pub const fn from_int(v: i32) -> Self {
        Fixed(v << FRAC_BITS)
    }

    /// Truncate to an integer (rounds toward zero).
    #[must_use]
    pub const fn to_int(self) -> i32 {
        self.0 >> FRAC_BITS
    }

    /// Convert from a floating-point value.
    #[must_use]
    pub fn from_f64(v: f64) -> Self {
        Fixed((v * (1i64 << FRAC_BITS) as f64).round() as i32)
    }

    /// Convert to a floating-point value.
    #[must_use]
    pub fn to_f64(self) -> f64 {
        f64::from(self.0) / (1i64 << FRAC_BITS) as f64
    }

    /// Multiply, widening to `i64` to avoid intermediate overflow (the
    /// original C macro multiplies in 32 bits and can overflow for large
    /// operands; this type does not repeat that bug).
    #[must_use]
    pub fn mul(self, rhs: Fixed) -> Self {
        let product = i64::from(self.0) * i64::from(rhs.0);
        Fixed((product >> FRAC_BITS) as i32)
    }

    /// Divide, widening to `i64`.
    #[must_use]
    pub fn div(self, rhs: Fixed) -> Self {
        let numerator = i64::from(self.0) << FRAC_BITS;
        Fixed((numerator / i64::from(rhs.0)) as i32)
    }

    /// Multiply by a plain integer scale factor.
    #[must_use]
    pub const fn mul_int(self, scale: i32) -> Self {
        Fixed(self.0 * scale)
    }

    /// True if the value is negative.
    #[must_use]
    pub const fn is_negative(self) -> bool {
        self.0 < 0
    }

    /// Absolute value.
    #[must_use]
    pub const fn abs(self) -> Self {
        Fixed(self.0.abs())
    }
}

impl Add for Fixed {
    type Output = Fixed;
    fn add(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 + rhs.0)
    }
}

impl Sub for Fixed {
    type Output = Fixed;
    fn sub(self, rhs: Fixed) -> Fixed {
        Fixed(self.0 - rhs.0)
    }
}

impl Mul for Fixed {
    type Output = Fixed;
    fn mul(self, rhs: Fixed) -> Fixed {
        Fixed::mul(self, rhs)
    }
}

impl Div for Fixed {
    type Output = Fixed;
    fn div(self, rhs: Fixed) -> Fixed {
        Fixed::div(self, rhs)
    }
}

impl Neg for Fixed {
    type Output = Fixed;
    fn neg(self) -> Fixed {
        Fixed(-self.0)
    }
}

impl fmt::Display for Fixed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.to_f64())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn int_round_trip() {
        assert_eq!(Fixed::from_int(42).to_int(), 42);
        assert_eq!(Fixed::from_int(-7).to_int(), -7);
    }

    #[test]
    fn float_round_trip_is_close() {
        let f = Fixed::from_f64(3.5);
        assert!((f.to_f64() - 3.5).abs() < 1e-6);
    }

    #[test]
    fn mul_matches_float_multiplication() {
        let a = Fixed::from_f64(2.5);
        let b = Fixed::from_f64(4.0);
        assert!((a.mul(b).to_f64() - 10.0).abs() < 1e-2);
    }

    #[test]
    fn div_matches_float_division() {
        let a = Fixed::from_f64(10.0);
        let b = Fixed::from_f64(4.0);
        assert!((a.div(b).to_f64() - 2.5).abs() < 1e-2);
    }

    #[test]
    fn large_multiply_does_not_overflow() {
        let a = Fixed::from_int(2_000_000);
        let b = Fixed::from_int(2_000);
        // Would overflow a 32-bit intermediate product; must not panic.
        let _ = a.mul(b);
    }

    #[test]
    fn angle_constants_match_degrees() {
        assert!((Fixed::DEG_360.to_f64() - 360.0).abs() < 1.0);
        assert!((Fixed::TWO_PI.to_f64() - core::f64::consts::TAU).abs() < 1e-2);
    }
}
