use std::fmt::{Display, Formatter};

use rand::Rng;
use rug::{Integer, Rational as ArbitraryPrecisionRational};

use crate::utils;

use super::{Field, Ring};

/// The field of rational numbers.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub struct RationalField;

/// The field of rational numbers.
pub type Q = RationalField;
/// The field of rational numbers.
pub const Q: RationalField = RationalField;

impl RationalField {
    pub fn new() -> RationalField {
        RationalField
    }
}

impl Display for RationalField {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str("QQ")
    }
}

/// A rational number. Small numbers are stored inline and upgrade to
/// arbitrary precision on overflow.
///
/// The representation is canonical: the fraction is reduced, the denominator
/// is positive, and a value is only stored as `Large` when it does not fit in `Natural`.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub enum Rational {
    Natural(i64, i64),
    Large(ArbitraryPrecisionRational),
}

impl Rational {
    /// Create the rational `num / den`.
    ///
    /// Panics when `den` is zero.
    pub fn new(num: i64, den: i64) -> Rational {
        Rational::from_i128(num as i128, den as i128)
    }

    fn from_i128(mut num: i128, mut den: i128) -> Rational {
        if den == 0 {
            panic!("Division by zero in rational construction");
        }

        if den < 0 {
            num = -num;
            den = -den;
        }

        let g = utils::gcd_signed_i128(num, den) as i128;
        if g > 1 {
            num /= g;
            den /= g;
        }

        match (i64::try_from(num), i64::try_from(den)) {
            (Ok(n), Ok(d)) => Rational::Natural(n, d),
            _ => Rational::Large(ArbitraryPrecisionRational::from((
                Integer::from(num),
                Integer::from(den),
            ))),
        }
    }

    /// Downcast an arbitrary precision rational whenever possible.
    fn from_large(r: ArbitraryPrecisionRational) -> Rational {
        if let (Some(n), Some(d)) = (r.numer().to_i64(), r.denom().to_i64()) {
            Rational::Natural(n, d)
        } else {
            Rational::Large(r)
        }
    }

    fn to_large(&self) -> ArbitraryPrecisionRational {
        match self {
            Rational::Natural(n, d) => ArbitraryPrecisionRational::from((*n, *d)),
            Rational::Large(r) => r.clone(),
        }
    }

    pub fn is_negative(&self) -> bool {
        match self {
            Rational::Natural(n, _) => *n < 0,
            Rational::Large(r) => r.cmp0() == std::cmp::Ordering::Less,
        }
    }

    pub fn is_integer(&self) -> bool {
        match self {
            Rational::Natural(_, d) => *d == 1,
            Rational::Large(r) => *r.denom() == 1,
        }
    }

    pub fn to_f64(&self) -> f64 {
        match self {
            Rational::Natural(n, d) => *n as f64 / *d as f64,
            Rational::Large(r) => r.to_f64(),
        }
    }
}

impl From<i64> for Rational {
    fn from(value: i64) -> Self {
        Rational::Natural(value, 1)
    }
}

impl From<(i64, i64)> for Rational {
    fn from(value: (i64, i64)) -> Self {
        Rational::new(value.0, value.1)
    }
}

impl From<ArbitraryPrecisionRational> for Rational {
    fn from(value: ArbitraryPrecisionRational) -> Self {
        Rational::from_large(value)
    }
}

impl Display for Rational {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Rational::Natural(n, d) => {
                if *d == 1 {
                    write!(f, "{}", n)
                } else {
                    write!(f, "{}/{}", n, d)
                }
            }
            Rational::Large(r) => r.fmt(f),
        }
    }
}

impl Ring for RationalField {
    type Element = Rational;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        match (a, b) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                if *d1 == 1 && *d2 == 1 {
                    if let Some(n) = n1.checked_add(*n2) {
                        return Rational::Natural(n, 1);
                    }
                }

                let (n1, d1, n2, d2) = (*n1 as i128, *d1 as i128, *n2 as i128, *d2 as i128);
                Rational::from_i128(n1 * d2 + n2 * d1, d1 * d2)
            }
            _ => Rational::from_large(a.to_large() + b.to_large()),
        }
    }

    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.add(a, &self.neg(b))
    }

    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        match (a, b) {
            (Rational::Natural(n1, d1), Rational::Natural(n2, d2)) => {
                if *d1 == 1 && *d2 == 1 {
                    if let Some(n) = n1.checked_mul(*n2) {
                        return Rational::Natural(n, 1);
                    }
                }

                Rational::from_i128(*n1 as i128 * *n2 as i128, *d1 as i128 * *d2 as i128)
            }
            _ => Rational::from_large(a.to_large() * b.to_large()),
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
        match a {
            Rational::Natural(n, d) => {
                if let Some(neg) = n.checked_neg() {
                    Rational::Natural(neg, *d)
                } else {
                    Rational::from_large(-ArbitraryPrecisionRational::from((*n, *d)))
                }
            }
            Rational::Large(r) => Rational::from_large(-r.clone()),
        }
    }

    fn zero(&self) -> Self::Element {
        Rational::Natural(0, 1)
    }

    fn one(&self) -> Self::Element {
        Rational::Natural(1, 1)
    }

    fn nth(&self, n: i64) -> Self::Element {
        Rational::Natural(n, 1)
    }

    fn pow(&self, b: &Self::Element, mut e: u64) -> Self::Element {
        let mut base = b.clone();
        let mut res = self.one();
        while e > 0 {
            if e & 1 == 1 {
                res = self.mul(&res, &base);
            }
            e >>= 1;
            if e > 0 {
                base = self.mul(&base, &base);
            }
        }
        res
    }

    fn is_zero(a: &Self::Element) -> bool {
        match a {
            Rational::Natural(n, _) => *n == 0,
            Rational::Large(r) => r.cmp0() == std::cmp::Ordering::Equal,
        }
    }

    fn is_one(&self, a: &Self::Element) -> bool {
        match a {
            Rational::Natural(n, d) => *n == 1 && *d == 1,
            Rational::Large(r) => *r == 1,
        }
    }

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element {
        Rational::Natural(rng.gen_range(range.0..range.1), 1)
    }
}

impl Field for RationalField {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element {
        self.mul(a, &self.inv(b))
    }

    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element) {
        *a = self.div(a, b);
    }

    fn inv(&self, a: &Self::Element) -> Self::Element {
        match a {
            Rational::Natural(n, d) => {
                if *n == 0 {
                    panic!("Division by zero");
                }
                Rational::from_i128(*d as i128, *n as i128)
            }
            Rational::Large(r) => Rational::from_large(r.clone().recip()),
        }
    }

    fn from_fraction(&self, num: i64, den: i64) -> Self::Element {
        Rational::new(num, den)
    }

    fn magnitude(&self, a: &Self::Element) -> f64 {
        a.to_f64().abs()
    }

    fn is_exact(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod test {
    use crate::domains::{Field, Ring};

    use super::{Rational, Q};

    #[test]
    fn arithmetic() {
        let a = Rational::new(1, 2);
        let b = Rational::new(-2, 6);
        assert_eq!(Q.add(&a, &b), Rational::new(1, 6));
        assert_eq!(Q.mul(&a, &b), Rational::new(-1, 6));
        assert_eq!(Q.div(&a, &b), Rational::new(-3, 2));
        assert_eq!(Q.sub(&a, &a), Q.zero());
        assert_eq!(Rational::new(3, -6), Rational::Natural(-1, 2));
        assert_eq!(Q.pow(&Rational::new(2, 3), 3), Rational::new(8, 27));
    }

    #[test]
    fn overflow_roundtrip() {
        let big = Rational::Natural(i64::MAX, 1);
        let sq = Q.mul(&big, &big);
        assert!(matches!(sq, Rational::Large(_)));

        // dividing back must downcast to the inline representation
        let back = Q.div(&sq, &big);
        assert_eq!(back, big);

        let sum = Q.add(&big, &Q.one());
        assert!(matches!(sum, Rational::Large(_)));
        assert_eq!(Q.sub(&sum, &Q.one()), big);
    }

    #[test]
    fn display() {
        assert_eq!(Rational::new(4, 2).to_string(), "2");
        assert_eq!(Rational::new(-1, 3).to_string(), "-1/3");
    }
}
