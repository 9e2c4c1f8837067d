//! Defines the coefficient domains polynomials are built over.
//!
//! The core trait is [Ring], which has two binary operations, addition and multiplication.
//! Each ring has an associated element type, that should not be confused with the ring type itself.
//! For example:
//! - The field of rational numbers [Q](type@rational::Q) has elements of type [Rational](rational::Rational).
//! - The field of floating point numbers [FloatField](float::FloatField) has elements of type [F64](float::F64).
//! - The field of complex numbers [ComplexField](float::ComplexField) has elements of type [Complex](float::Complex).
//!
//! The ring elements do not implement operations such as addition or multiplication
//! themselves, but rather the ring does. All polynomials, ideals, modules and matrices
//! in this crate are generic over the coefficient field, which is chosen once per computation.
pub mod float;
pub mod rational;

use std::fmt::{Debug, Display};
use std::hash::Hash;

/// A ring is a set with two binary operations, addition and multiplication.
pub trait Ring: Clone + PartialEq + Eq + Hash + Debug + Display {
    /// The element of a ring. For example, the elements of the field of rationals [Q](type@rational::Q), `Q::Element`,
    /// are [Rational](rational::Rational).
    type Element: Clone + PartialEq + Eq + Hash + Debug + Display;

    fn add(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn sub(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn mul(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn add_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn sub_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn mul_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn add_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn sub_mul_assign(&self, a: &mut Self::Element, b: &Self::Element, c: &Self::Element);
    fn neg(&self, a: &Self::Element) -> Self::Element;
    fn zero(&self) -> Self::Element;
    fn one(&self) -> Self::Element;
    /// Return the nth element by computing `n * 1`.
    fn nth(&self, n: i64) -> Self::Element;
    fn pow(&self, b: &Self::Element, e: u64) -> Self::Element;
    /// Test if `a` is zero. Inexact domains compare against a tolerance.
    fn is_zero(a: &Self::Element) -> bool;
    /// Test if `a` is zero without any tolerance.
    fn is_exactly_zero(a: &Self::Element) -> bool {
        Self::is_zero(a)
    }
    fn is_one(&self, a: &Self::Element) -> bool;

    fn sample(&self, rng: &mut impl rand::RngCore, range: (i64, i64)) -> Self::Element;
}

/// A field is a ring that supports division and inversion.
pub trait Field: Ring {
    fn div(&self, a: &Self::Element, b: &Self::Element) -> Self::Element;
    fn div_assign(&self, a: &mut Self::Element, b: &Self::Element);
    fn inv(&self, a: &Self::Element) -> Self::Element;

    /// Construct the element `num / den`.
    fn from_fraction(&self, num: i64, den: i64) -> Self::Element {
        self.div(&self.nth(num), &self.nth(den))
    }

    /// An absolute value used to select pivots in numerical elimination.
    fn magnitude(&self, a: &Self::Element) -> f64;

    /// Returns `true` if arithmetic in the field is exact.
    fn is_exact(&self) -> bool;
}
