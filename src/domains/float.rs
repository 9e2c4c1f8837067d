use std::{
    fmt::{self, Display, Formatter},
    hash::Hash,
    ops::{Add, Div, Mul, Neg, Sub},
};

use rand::Rng;

use super::{Field, Ring};

/// Values whose magnitude is below this bound are treated as zero.
pub const ZERO_TOLERANCE: f64 = 1e-12;

/// A wrapper around `f64` that implements `Eq` and `Hash`.
/// All `NaN` values are considered equal, and `-0` is considered equal to `0`.
#[derive(Debug, Copy, Clone, Default)]
pub struct F64(f64);

impl F64 {
    pub fn into_inner(self) -> f64 {
        self.0
    }

    pub fn abs(self) -> F64 {
        F64(self.0.abs())
    }
}

impl From<f64> for F64 {
    #[inline(always)]
    fn from(value: f64) -> Self {
        F64(value)
    }
}

impl PartialEq for F64 {
    fn eq(&self, other: &Self) -> bool {
        if self.0.is_nan() && other.0.is_nan() {
            true
        } else {
            self.0 == other.0
        }
    }
}

impl Eq for F64 {}

impl Hash for F64 {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        if self.0.is_nan() {
            state.write_u64(0x7ff8000000000000);
        } else if self.0 == 0. {
            state.write_u64(0);
        } else {
            state.write_u64(self.0.to_bits());
        }
    }
}

impl PartialOrd for F64 {
    fn partial_cmp(&self, other: &Self) -> Option<std::cmp::Ordering> {
        self.0.partial_cmp(&other.0)
    }
}

impl Display for F64 {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        Display::fmt(&self.0, f)
    }
}

impl Neg for F64 {
    type Output = F64;

    #[inline(always)]
    fn neg(self) -> Self::Output {
        F64(-self.0)
    }
}

impl Add for F64 {
    type Output = F64;

    #[inline(always)]
    fn add(self, rhs: F64) -> Self::Output {
        F64(self.0 + rhs.0)
    }
}

impl Sub for F64 {
    type Output = F64;

    #[inline(always)]
    fn sub(self, rhs: F64) -> Self::Output {
        F64(self.0 - rhs.0)
    }
}

impl Mul for F64 {
    type Output = F64;

    #[inline(always)]
    fn mul(self, rhs: F64) -> Self::Output {
        F64(self.0 * rhs.0)
    }
}

impl Div for F64 {
    type Output = F64;

    #[inline(always)]
    fn div(self, rhs: F64) -> Self::Output {
        F64(self.0 / rhs.0)
    }
}

/// The field of double precision floating point numbers.
///
/// Zero tests use the tolerance [ZERO_TOLERANCE], so that cancellation
/// errors do not leave spurious terms behind.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct FloatField;

impl FloatField {
    pub fn new() -> FloatField {
        FloatField
    }
}

impl Display for FloatField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("RR")
    }
}

impl Ring for FloatField {
    type Element = F64;

    #[inline(always)]
    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        *a + *b
    }

    #[inline(always)]
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        *a - *b
    }

    #[inline(always)]
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        *a * *b
    }

    #[inline(always)]
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 += b.0;
    }

    #[inline(always)]
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 -= b.0;
    }

    #[inline(always)]
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 *= b.0;
    }

    #[inline(always)]
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        a.0 += b.0 * c.0;
    }

    #[inline(always)]
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        a.0 -= b.0 * c.0;
    }

    #[inline(always)]
    fn neg(&self, a: &Self::Element) -> Self::Element {
        -*a
    }

    fn zero(&self) -> Self::Element {
        F64(0.)
    }

    fn one(&self) -> Self::Element {
        F64(1.)
    }

    fn nth(&self, n: i64) -> Self::Element {
        F64(n as f64)
    }

    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element {
        F64(b.0.powi(e as i32))
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.0.abs() < ZERO_TOLERANCE
    }

    fn is_exactly_zero(a: &Self::Element) -> bool {
        a.0 == 0.
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        (a.0 - 1.).abs() < ZERO_TOLERANCE
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        F64(rng.gen_range(range.0 as f64..range.1 as f64))
    }
}

impl Field for FloatField {
    #[inline(always)]
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        *a / *b
    }

    #[inline(always)]
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        a.0 /= b.0;
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        F64(1. / a.0)
    }

    fn from_fraction(&self, num: i64, den: i64) -> Self::Element {
        F64(num as f64 / den as f64)
    }

    fn magnitude(&self, a: &Self::Element) -> f64 {
        a.0.abs()
    }

    fn is_exact(&self) -> bool {
        false
    }
}

/// A complex number with double precision parts.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq, Hash)]
pub struct Complex {
    pub re: F64,
    pub im: F64,
}

impl Complex {
    pub fn new(re: f64, im: f64) -> Complex {
        Complex {
            re: F64(re),
            im: F64(im),
        }
    }

    pub fn norm_squared(&self) -> f64 {
        self.re.0 * self.re.0 + self.im.0 * self.im.0
    }

    pub fn norm(&self) -> f64 {
        self.re.0.hypot(self.im.0)
    }

    pub fn conj(&self) -> Complex {
        Complex::new(self.re.0, -self.im.0)
    }
}

impl From<f64> for Complex {
    fn from(value: f64) -> Self {
        Complex::new(value, 0.)
    }
}

impl Display for Complex {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        if self.im.0 < 0. {
            write!(f, "({}-{}i)", self.re, -self.im.0)
        } else {
            write!(f, "({}+{}i)", self.re, self.im)
        }
    }
}

/// The field of complex numbers with double precision parts.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct ComplexField;

impl ComplexField {
    pub fn new() -> ComplexField {
        ComplexField
    }
}

impl Display for ComplexField {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("CC")
    }
}

impl Ring for ComplexField {
    type Element = Complex;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Complex {
            re: a.re + b.re,
            im: a.im + b.im,
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Complex {
            re: a.re - b.re,
            im: a.im - b.im,
        }
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        Complex {
            re: a.re * b.re - a.im * b.im,
            im: a.re * b.im + a.im * b.re,
        }
    }

    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.add(a, b);
    }

    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.sub(a, b);
    }

    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.mul(a, b);
    }

    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.add(a, &self.mul(b, c));
    }

    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element) {
        *a = self.sub(a, &self.mul(b, c));
    }

    fn neg(&self, a: &Self::Element) -> Self::Element {
        Complex {
            re: -a.re,
            im: -a.im,
        }
    }

    fn zero(&self) -> Self::Element {
        Complex::new(0., 0.)
    }

    fn one(&self) -> Self::Element {
        Complex::new(1., 0.)
    }

    fn nth(&self, n: i64) -> Self::Element {
        Complex::new(n as f64, 0.)
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = *b;
        let mut res = self.one();
        while e > 0 {
            if e & 1 == 1 {
                res = self.mul(&res, &base);
            }
            e >>= 1;
            base = self.mul(&base, &base);
        }
        res
    }

    fn is_zero(a: &Self::Element) -> bool {
        a.re.0.abs() < ZERO_TOLERANCE && a.im.0.abs() < ZERO_TOLERANCE
    }

    fn is_exactly_zero(a: &Self::Element) -> bool {
        a.re.0 == 0. && a.im.0 == 0.
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        (a.re.0 - 1.).abs() < ZERO_TOLERANCE && a.im.0.abs() < ZERO_TOLERANCE
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        let (lo, hi) = (range.0 as f64, range.1 as f64);
        Complex::new(rng.gen_range(lo..hi), rng.gen_range(lo..hi))
    }
}

impl Field for ComplexField {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        let n = a.norm_squared();
        Complex::new(a.re.0 / n, -a.im.0 / n)
    }

    fn from_fraction(&self, num: i64, den: i64) -> Self::Element {
        Complex::new(num as f64 / den as f64, 0.)
    }

    fn magnitude(&self, a: &Self::Element) -> f64 {
        a.norm()
    }

    fn is_exact(&self) -> bool {
        false
    }
}

#[cfg(test)]
mod test {
    use std::collections::hash_map::DefaultHasher;
    use std::hash::{Hash, Hasher};

    use crate::domains::{Field, Ring};

    use super::{Complex, ComplexField, FloatField, F64};

    fn hash(v: &F64) -> u64 {
        let mut h = DefaultHasher::new();
        v.hash(&mut h);
        h.finish()
    }

    #[test]
    fn tolerance() {
        let f = FloatField;
        let a = F64::from(0.1);
        let b = f.add(&f.add(&a, &a), &a);
        let c = f.sub(&b, &F64::from(0.3));
        assert!(FloatField::is_zero(&c));
        assert!(!FloatField::is_zero(&F64::from(1e-6)));
        assert!(!FloatField::is_exactly_zero(&F64::from(1e-14)));
        assert!(FloatField::is_zero(&F64::from(1e-14)));
    }

    #[test]
    fn signed_zero() {
        assert_eq!(F64::from(0.), F64::from(-0.));
        assert_eq!(hash(&F64::from(0.)), hash(&F64::from(-0.)));
    }

    #[test]
    fn display() {
        assert_eq!(F64::from(2.).to_string(), "2");
        assert_eq!(F64::from(-0.5).to_string(), "-0.5");
        assert_eq!(Complex::new(1., -2.).to_string(), "(1-2i)");
        assert_eq!(Complex::new(0., 3.).to_string(), "(0+3i)");
    }

    #[test]
    fn complex_arithmetic() {
        let c = ComplexField;
        let i = Complex::new(0., 1.);
        assert_eq!(c.mul(&i, &i), c.nth(-1));
        let z = Complex::new(3., 4.);
        let q = c.div(&z, &z);
        assert!(c.is_one(&q));
        assert_eq!(c.magnitude(&z), 5.);
        assert_eq!(c.pow(&i, 4), c.one());
    }
}
