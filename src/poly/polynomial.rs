use std::cmp::Ordering;
use std::fmt::Display;
use std::mem;
use std::ops::{Add, Mul, Neg, Sub};
use std::sync::Arc;

use tracing::warn;

use crate::domains::{Field, Ring};
use crate::error::{AlgebraError, Result};
use crate::printer::{PolynomialPrinter, PrintOptions};

use super::monomial::Monomial;
use super::{default_variables, MonomialOrder, Variable};

/// A polynomial ring over the field `F`: a coefficient field, an ordered list
/// of variables and the monomial order that determines leading terms.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct PolynomialRing<F: Ring> {
    pub(crate) field: F,
    pub(crate) variables: Arc<Vec<Variable>>,
    pub(crate) order: MonomialOrder,
}

impl<F: Ring> PolynomialRing<F> {
    /// Create a ring with `nvars` variables and the default variable names.
    pub fn new(field: F, nvars: usize, order: MonomialOrder) -> PolynomialRing<F> {
        PolynomialRing {
            field,
            variables: Arc::new(default_variables(nvars)),
            order,
        }
    }

    /// Create a ring with the given variable names.
    pub fn with_variables(
        field: F,
        variables: Vec<Variable>,
        order: MonomialOrder,
    ) -> PolynomialRing<F> {
        PolynomialRing {
            field,
            variables: Arc::new(variables),
            order,
        }
    }

    #[inline]
    pub fn field(&self) -> &F {
        &self.field
    }

    #[inline]
    pub fn variables(&self) -> &Arc<Vec<Variable>> {
        &self.variables
    }

    #[inline]
    pub fn order(&self) -> MonomialOrder {
        self.order
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    /// Returns `true` if the two rings have the same field, variables and order.
    pub fn is_compatible(&self, other: &PolynomialRing<F>) -> bool {
        self.field == other.field
            && self.order == other.order
            && (Arc::ptr_eq(&self.variables, &other.variables)
                || self.variables == other.variables)
    }

    /// The zero polynomial.
    pub fn zero(&self) -> MultivariatePolynomial<F> {
        MultivariatePolynomial {
            coefficients: vec![],
            exponents: vec![],
            field: self.field.clone(),
            variables: self.variables.clone(),
            order: self.order,
        }
    }

    /// The constant polynomial `1`.
    pub fn one(&self) -> MultivariatePolynomial<F> {
        self.zero().one()
    }

    /// The constant polynomial `c`.
    pub fn constant(&self, c: F::Element) -> MultivariatePolynomial<F> {
        self.zero().constant(c)
    }

    /// The polynomial consisting of the variable with index `var`.
    pub fn variable(&self, var: usize) -> MultivariatePolynomial<F> {
        self.zero().variable(var)
    }

    /// The polynomial with a single term `c * m`. Missing trailing exponents are zero.
    pub fn monomial(&self, c: F::Element, exponents: &[u16]) -> Result<MultivariatePolynomial<F>> {
        self.from_terms(vec![(c, exponents.to_vec())])
    }

    /// Build a polynomial from a list of terms. The terms are sorted, like terms are
    /// merged and zero terms are dropped. Missing trailing exponents are zero.
    pub fn from_terms(
        &self,
        terms: Vec<(F::Element, Vec<u16>)>,
    ) -> Result<MultivariatePolynomial<F>> {
        let mut p = self.zero();
        p.coefficients.reserve(terms.len());
        p.exponents.reserve(terms.len() * self.nvars());
        for (c, e) in terms {
            if e.len() > self.nvars() {
                return Err(AlgebraError::MismatchedContext(format!(
                    "exponent vector {:?} has more entries than the variables of {}",
                    e, self
                )));
            }
            p.coefficients.push(c);
            let start = p.exponents.len();
            p.exponents.extend_from_slice(&e);
            p.exponents.resize(start + self.nvars(), 0);
        }
        p.normalize();
        Ok(p)
    }

    /// Convert a monomial into a polynomial with coefficient one.
    pub fn from_monomial(&self, m: &Monomial) -> Result<MultivariatePolynomial<F>> {
        if !(Arc::ptr_eq(&self.variables, &m.variables) || self.variables == m.variables) {
            return Err(AlgebraError::MismatchedContext(format!(
                "monomial {} is not in {}",
                m, self
            )));
        }
        Ok(self.zero().monomial(self.field.one(), &m.exponents))
    }
}

impl<F: Ring> Display for PolynomialRing<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[", self.field)?;
        for (i, v) in self.variables.iter().enumerate() {
            if i > 0 {
                f.write_str(",")?;
            }
            f.write_str(v)?;
        }
        f.write_str("]")
    }
}

/// Multivariate polynomial with a sparse term list.
///
/// The i-th term is stored as `coefficients[i]` and `exponents[i * nvars .. (i + 1) * nvars]`.
/// Terms are sorted in strictly decreasing monomial order, so that the leading term comes first.
/// No coefficient is zero, and the zero polynomial has no terms.
#[derive(Clone)]
pub struct MultivariatePolynomial<F: Ring> {
    pub coefficients: Vec<F::Element>,
    pub exponents: Vec<u16>,
    pub field: F,
    pub variables: Arc<Vec<Variable>>,
    pub order: MonomialOrder,
}

impl<F: Ring> MultivariatePolynomial<F> {
    /// Constructs a zero polynomial, inheriting the field and variable map from `self`.
    #[inline]
    pub fn zero(&self) -> Self {
        Self {
            coefficients: vec![],
            exponents: vec![],
            field: self.field.clone(),
            variables: self.variables.clone(),
            order: self.order,
        }
    }

    #[inline]
    fn zero_with_capacity(&self, cap: usize) -> Self {
        Self {
            coefficients: Vec::with_capacity(cap),
            exponents: Vec::with_capacity(cap * self.nvars()),
            field: self.field.clone(),
            variables: self.variables.clone(),
            order: self.order,
        }
    }

    /// Constructs a polynomial that is one, inheriting the field and variable map from `self`.
    #[inline]
    pub fn one(&self) -> Self {
        self.constant(self.field.one())
    }

    /// Constructs a constant polynomial, inheriting the field and variable map from `self`.
    #[inline]
    pub fn constant(&self, coeff: F::Element) -> Self {
        let e = vec![0; self.nvars()];
        self.monomial(coeff, &e)
    }

    /// Constructs the polynomial consisting of the variable with index `var`.
    pub fn variable(&self, var: usize) -> Self {
        let mut e = vec![0; self.nvars()];
        e[var] = 1;
        self.monomial(self.field.one(), &e)
    }

    /// Constructs a polynomial with a single term, from an exponent vector with one
    /// entry per variable.
    #[inline]
    pub(crate) fn monomial(&self, coeff: F::Element, exponents: &[u16]) -> Self {
        debug_assert_eq!(exponents.len(), self.nvars());

        if F::is_zero(&coeff) {
            return self.zero();
        }

        let mut e = exponents.to_vec();
        e.resize(self.nvars(), 0);
        Self {
            coefficients: vec![coeff],
            exponents: e,
            field: self.field.clone(),
            variables: self.variables.clone(),
            order: self.order,
        }
    }

    /// Get the polynomial ring this polynomial belongs to.
    pub fn ring(&self) -> PolynomialRing<F> {
        PolynomialRing {
            field: self.field.clone(),
            variables: self.variables.clone(),
            order: self.order,
        }
    }

    /// Returns the number of terms in the polynomial.
    #[inline]
    pub fn nterms(&self) -> usize {
        self.coefficients.len()
    }

    /// Returns the number of variables in the polynomial.
    #[inline]
    pub fn nvars(&self) -> usize {
        self.variables.len()
    }

    #[inline]
    pub fn is_zero(&self) -> bool {
        self.nterms() == 0
    }

    #[inline]
    pub fn is_one(&self) -> bool {
        self.nterms() == 1
            && self.field.is_one(&self.coefficients[0])
            && self.exponents.iter().all(|x| *x == 0)
    }

    /// Returns `true` if the polynomial is zero or has only a constant term.
    #[inline]
    pub fn is_constant(&self) -> bool {
        self.is_zero() || (self.nterms() == 1 && self.exponents.iter().all(|x| *x == 0))
    }

    /// Get the exponents of the `index`th term.
    #[inline]
    pub fn exponents(&self, index: usize) -> &[u16] {
        &self.exponents[index * self.nvars()..(index + 1) * self.nvars()]
    }

    /// Get an iterator over the `(coefficient, exponents)` pairs, leading term first.
    pub fn terms(&self) -> impl Iterator<Item = (&F::Element, &[u16])> {
        let n = self.nvars();
        self.coefficients
            .iter()
            .enumerate()
            .map(move |(i, c)| (c, &self.exponents[i * n..(i + 1) * n]))
    }

    /// Get the leading coefficient, or zero for the zero polynomial.
    pub fn lcoeff(&self) -> F::Element {
        self.coefficients
            .first()
            .cloned()
            .unwrap_or_else(|| self.field.zero())
    }

    /// Get the exponents of the leading monomial. The polynomial must not be zero.
    #[inline]
    pub(crate) fn lexponents(&self) -> &[u16] {
        self.exponents(0)
    }

    /// Get the leading monomial, or the unit monomial for the zero polynomial.
    pub fn lmonomial(&self) -> Monomial {
        if self.is_zero() {
            Monomial::one(self.variables.clone())
        } else {
            Monomial::from_exponents(self.lexponents(), self.variables.clone())
        }
    }

    /// Get the leading term. The zero polynomial has the leading term `(0, 1)`.
    pub fn leading_term(&self) -> (F::Element, Monomial) {
        (self.lcoeff(), self.lmonomial())
    }

    /// Get the `index`th term as a monomial.
    pub fn monomial_at(&self, index: usize) -> Monomial {
        Monomial::from_exponents(self.exponents(index), self.variables.clone())
    }

    /// The total degree of the leading monomial.
    pub fn degree(&self) -> u32 {
        if self.is_zero() {
            0
        } else {
            self.lexponents().iter().map(|e| *e as u32).sum()
        }
    }

    /// The largest total degree of any term.
    pub fn total_degree(&self) -> u32 {
        (0..self.nterms())
            .map(|i| self.exponents(i).iter().map(|e| *e as u32).sum())
            .max()
            .unwrap_or(0)
    }

    /// Returns `true` if both polynomials live in the same ring.
    #[inline]
    pub fn same_context(&self, other: &Self) -> bool {
        self.field == other.field
            && self.order == other.order
            && (Arc::ptr_eq(&self.variables, &other.variables)
                || self.variables == other.variables)
    }

    pub(crate) fn check_context(&self, other: &Self) -> Result<()> {
        if self.same_context(other) {
            Ok(())
        } else {
            Err(AlgebraError::MismatchedContext(format!(
                "{} and {} are not in the same polynomial ring",
                self.ring(),
                other.ring()
            )))
        }
    }

    /// Sort the terms in decreasing order, merge like terms and drop zero terms.
    pub(crate) fn normalize(&mut self) {
        let n = self.nvars();
        if self.nterms() < 2 {
            if self.nterms() == 1 && F::is_zero(&self.coefficients[0]) {
                report_cancellation(!F::is_exactly_zero(&self.coefficients[0]) as usize, 0);
                self.coefficients.clear();
                self.exponents.clear();
            }
            return;
        }

        let mut perm: Vec<usize> = (0..self.nterms()).collect();
        let order = self.order;
        perm.sort_by(|&a, &b| {
            order.cmp(
                &self.exponents[b * n..(b + 1) * n],
                &self.exponents[a * n..(a + 1) * n],
            )
        });

        let mut coefficients: Vec<F::Element> = Vec::with_capacity(self.nterms());
        let mut exponents: Vec<u16> = Vec::with_capacity(self.exponents.len());
        let mut old_coefficients = mem::take(&mut self.coefficients);
        let mut near_zero = 0;

        let mut i = 0;
        while i < perm.len() {
            let e = &self.exponents[perm[i] * n..(perm[i] + 1) * n];
            let mut c = mem::replace(&mut old_coefficients[perm[i]], self.field.zero());
            let mut j = i + 1;
            while j < perm.len() && &self.exponents[perm[j] * n..(perm[j] + 1) * n] == e {
                self.field.add_assign(&mut c, &old_coefficients[perm[j]]);
                j += 1;
            }

            if F::is_zero(&c) {
                if !F::is_exactly_zero(&c) {
                    near_zero += 1;
                }
            } else {
                coefficients.push(c);
                exponents.extend_from_slice(e);
            }
            i = j;
        }

        report_cancellation(near_zero, coefficients.len());

        self.coefficients = coefficients;
        self.exponents = exponents;
    }

    /// Append a term that is smaller than all existing terms.
    #[inline]
    fn push_term(&mut self, coeff: F::Element, exponents: &[u16]) {
        self.coefficients.push(coeff);
        self.exponents.extend_from_slice(exponents);
    }

    /// Merge two sorted polynomials, negating the terms of `other` when `subtract` is set.
    fn merge(&self, other: &Self, subtract: bool) -> Self {
        let mut res = self.zero_with_capacity(self.nterms() + other.nterms());
        let mut near_zero = 0;

        let (mut i, mut j) = (0, 0);
        while i < self.nterms() && j < other.nterms() {
            match self.order.cmp(self.exponents(i), other.exponents(j)) {
                Ordering::Greater => {
                    res.push_term(self.coefficients[i].clone(), self.exponents(i));
                    i += 1;
                }
                Ordering::Less => {
                    let c = if subtract {
                        self.field.neg(&other.coefficients[j])
                    } else {
                        other.coefficients[j].clone()
                    };
                    res.push_term(c, other.exponents(j));
                    j += 1;
                }
                Ordering::Equal => {
                    let c = if subtract {
                        self.field.sub(&self.coefficients[i], &other.coefficients[j])
                    } else {
                        self.field.add(&self.coefficients[i], &other.coefficients[j])
                    };
                    if F::is_zero(&c) {
                        if !F::is_exactly_zero(&c) {
                            near_zero += 1;
                        }
                    } else {
                        res.push_term(c, self.exponents(i));
                    }
                    i += 1;
                    j += 1;
                }
            }
        }

        while i < self.nterms() {
            res.push_term(self.coefficients[i].clone(), self.exponents(i));
            i += 1;
        }
        while j < other.nterms() {
            let c = if subtract {
                self.field.neg(&other.coefficients[j])
            } else {
                other.coefficients[j].clone()
            };
            res.push_term(c, other.exponents(j));
            j += 1;
        }

        report_cancellation(near_zero, res.nterms());
        res
    }

    /// Add two polynomials of the same ring.
    pub fn checked_add(&self, other: &Self) -> Result<Self> {
        self.check_context(other)?;
        Ok(self.merge(other, false))
    }

    /// Subtract two polynomials of the same ring.
    pub fn checked_sub(&self, other: &Self) -> Result<Self> {
        self.check_context(other)?;
        Ok(self.merge(other, true))
    }

    /// Multiply two polynomials of the same ring. Fails with
    /// [AlgebraError::ExponentOverflow] if an exponent of the product exceeds `u16::MAX`.
    pub fn checked_mul(&self, other: &Self) -> Result<Self> {
        self.check_context(other)?;
        self.check_exponent_sum(&other.max_exponents(), 1)?;
        Ok(self.mul_impl(other))
    }

    /// The largest exponent of every variable over all terms.
    pub fn max_exponents(&self) -> Vec<u16> {
        let mut max = vec![0; self.nvars()];
        for (_, e) in self.terms() {
            for (m, e) in max.iter_mut().zip(e) {
                *m = (*m).max(*e);
            }
        }
        max
    }

    /// Check that `factor * max_exponents + other` fits in a `u16` for every variable.
    fn check_exponent_sum(&self, other: &[u16], factor: u32) -> Result<()> {
        if self.is_zero() {
            return Ok(());
        }

        for ((m, o), v) in self.max_exponents().iter().zip(other).zip(self.variables.iter()) {
            let total = (*m as u32)
                .checked_mul(factor)
                .and_then(|t| t.checked_add(*o as u32));
            if !matches!(total, Some(t) if t <= u16::MAX as u32) {
                return Err(AlgebraError::ExponentOverflow {
                    variable: v.to_string(),
                });
            }
        }
        Ok(())
    }

    fn mul_impl(&self, other: &Self) -> Self {
        if self.is_zero() || other.is_zero() {
            return self.zero();
        }

        if other.nterms() == 1 {
            return self.mul_term(&other.coefficients[0], other.exponents(0));
        }
        if self.nterms() == 1 {
            return other.mul_term(&self.coefficients[0], self.exponents(0));
        }

        let mut res = self.zero_with_capacity(self.nterms() * other.nterms());
        for i in 0..self.nterms() {
            for j in 0..other.nterms() {
                res.coefficients
                    .push(self.field.mul(&self.coefficients[i], &other.coefficients[j]));
                res.exponents.extend(
                    self.exponents(i)
                        .iter()
                        .zip(other.exponents(j))
                        .map(|(a, b)| add_exponents(*a, *b)),
                );
            }
        }
        res.normalize();
        res
    }

    /// Multiply every term with `coeff * x^exponents`. Monomial orders are compatible
    /// with multiplication, so the terms stay sorted.
    ///
    /// Panics if an exponent exceeds `u16::MAX`; see [Self::mul_monomial] for a checked version.
    pub fn mul_term(&self, coeff: &F::Element, exponents: &[u16]) -> Self {
        if F::is_zero(coeff) {
            return self.zero();
        }

        let mut res = self.zero_with_capacity(self.nterms());
        for (c, e) in self.terms() {
            let c = self.field.mul(c, coeff);
            if F::is_zero(&c) {
                continue;
            }
            res.coefficients.push(c);
            res.exponents
                .extend(e.iter().zip(exponents).map(|(a, b)| add_exponents(*a, *b)));
        }
        res
    }

    /// Multiply by a monomial.
    pub fn mul_monomial(&self, m: &Monomial) -> Result<Self> {
        if !(Arc::ptr_eq(&self.variables, &m.variables) || self.variables == m.variables) {
            return Err(AlgebraError::MismatchedContext(format!(
                "monomial {} is not in {}",
                m,
                self.ring()
            )));
        }
        self.check_exponent_sum(&m.exponents, 1)?;
        Ok(self.mul_term(&self.field.one(), &m.exponents))
    }

    /// Multiply every coefficient by `coeff`.
    pub fn mul_coeff(&self, coeff: &F::Element) -> Self {
        let e = vec![0; self.nvars()];
        self.mul_term(coeff, &e)
    }

    /// Compute `self^e`, failing with [AlgebraError::ExponentOverflow] if an
    /// exponent of the result exceeds `u16::MAX`.
    pub fn checked_pow(&self, e: u32) -> Result<Self> {
        self.check_exponent_sum(&vec![0; self.nvars()], e)?;
        Ok(self.pow(e))
    }

    /// Compute `self^e`. Panics if an exponent exceeds `u16::MAX`.
    pub fn pow(&self, mut e: u32) -> Self {
        let mut base = self.clone();
        let mut res = self.one();
        while e > 0 {
            if e & 1 == 1 {
                res = res.mul_impl(&base);
            }
            e >>= 1;
            if e > 0 {
                base = base.mul_impl(&base);
            }
        }
        res
    }

    /// Evaluate the polynomial at a point.
    pub fn evaluate(&self, point: &[F::Element]) -> F::Element {
        debug_assert_eq!(point.len(), self.nvars());
        let mut res = self.field.zero();
        for (c, e) in self.terms() {
            let mut t = c.clone();
            for (x, p) in point.iter().zip(e) {
                if *p > 0 {
                    self.field.mul_assign(&mut t, &self.field.pow(x, *p as u64));
                }
            }
            self.field.add_assign(&mut res, &t);
        }
        res
    }

    /// Print the polynomial with the given options.
    pub fn format(&self, opts: PrintOptions) -> String {
        PolynomialPrinter::new_with_options(self, opts).to_string()
    }
}

impl<F: Field> MultivariatePolynomial<F> {
    /// Divide every coefficient by `coeff`.
    pub fn checked_div_coeff(&self, coeff: &F::Element) -> Result<Self> {
        if F::is_zero(coeff) {
            return Err(AlgebraError::UnsupportedOperand(format!(
                "cannot divide {} by zero",
                self
            )));
        }
        Ok(self.mul_coeff(&self.field.inv(coeff)))
    }

    /// Divide by the leading coefficient.
    pub fn make_monic(self) -> Self {
        if self.is_zero() || self.field.is_one(&self.coefficients[0]) {
            return self;
        }

        let inv = self.field.inv(&self.coefficients[0]);
        let mut res = self.mul_coeff(&inv);
        // the leading coefficient must be exactly one, also for inexact fields
        res.coefficients[0] = res.field.one();
        res
    }
}

#[inline]
fn add_exponents(a: u16, b: u16) -> u16 {
    match a.checked_add(b) {
        Some(e) => e,
        None => panic!("exponent overflow: {} + {} exceeds {}", a, b, u16::MAX),
    }
}

/// Warn when numerical cancellation wiped out a polynomial.
#[inline]
fn report_cancellation(near_zero: usize, remaining: usize) {
    if near_zero > 1 && remaining == 0 {
        warn!(
            "{} near-zero terms were collapsed to zero; the result may suffer from precision loss",
            near_zero
        );
    }
}

impl<F: Ring> std::fmt::Debug for MultivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        if self.is_zero() {
            return write!(f, "[]");
        }
        let mut first = true;
        write!(f, "[ ")?;
        for (c, e) in self.terms() {
            if first {
                first = false;
            } else {
                write!(f, ", ")?;
            }
            write!(f, "{{ {:?}, {:?} }}", c, e)?;
        }
        write!(f, " ]")
    }
}

impl<F: Ring> Display for MultivariatePolynomial<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        PolynomialPrinter::new(self).fmt(f)
    }
}

impl<F: Ring> PartialEq for MultivariatePolynomial<F> {
    #[inline]
    fn eq(&self, other: &Self) -> bool {
        self.same_context(other)
            && self.exponents == other.exponents
            && self.coefficients == other.coefficients
    }
}

impl<F: Ring> Eq for MultivariatePolynomial<F> {}

impl<F: Ring> std::hash::Hash for MultivariatePolynomial<F> {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.coefficients.hash(state);
        self.exponents.hash(state);
        self.variables.hash(state);
        self.order.hash(state);
    }
}

impl<'a, F: Ring> Add<&'a MultivariatePolynomial<F>> for &'a MultivariatePolynomial<F> {
    type Output = MultivariatePolynomial<F>;

    fn add(self, other: &'a MultivariatePolynomial<F>) -> Self::Output {
        match self.checked_add(other) {
            Ok(p) => p,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<F: Ring> Add for MultivariatePolynomial<F> {
    type Output = Self;

    fn add(self, other: Self) -> Self::Output {
        &self + &other
    }
}

impl<'a, F: Ring> Sub<&'a MultivariatePolynomial<F>> for &'a MultivariatePolynomial<F> {
    type Output = MultivariatePolynomial<F>;

    fn sub(self, other: &'a MultivariatePolynomial<F>) -> Self::Output {
        match self.checked_sub(other) {
            Ok(p) => p,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<F: Ring> Sub for MultivariatePolynomial<F> {
    type Output = Self;

    fn sub(self, other: Self) -> Self::Output {
        &self - &other
    }
}

impl<'a, F: Ring> Mul<&'a MultivariatePolynomial<F>> for &'a MultivariatePolynomial<F> {
    type Output = MultivariatePolynomial<F>;

    fn mul(self, other: &'a MultivariatePolynomial<F>) -> Self::Output {
        match self.checked_mul(other) {
            Ok(p) => p,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<F: Ring> Mul for MultivariatePolynomial<F> {
    type Output = Self;

    fn mul(self, other: Self) -> Self::Output {
        &self * &other
    }
}

impl<F: Ring> Neg for MultivariatePolynomial<F> {
    type Output = Self;

    fn neg(mut self) -> Self::Output {
        for c in &mut self.coefficients {
            *c = self.field.neg(c);
        }
        self
    }
}

impl<'a, F: Ring> Neg for &'a MultivariatePolynomial<F> {
    type Output = MultivariatePolynomial<F>;

    fn neg(self) -> Self::Output {
        self.clone().neg()
    }
}

#[cfg(test)]
mod test {
    use std::sync::atomic::{AtomicUsize, Ordering as AtomicOrdering};
    use std::sync::Arc;

    use tracing::{Event, Level, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    use crate::domains::float::{FloatField, F64};
    use crate::domains::rational::{Rational, Q};
    use crate::domains::Ring;
    use crate::error::AlgebraError;
    use crate::poly::MonomialOrder;

    use super::PolynomialRing;

    #[test]
    fn construction_sorts_and_collapses() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let p = r
            .from_terms(vec![
                (Q.nth(1), vec![0, 1]),
                (Q.nth(2), vec![2, 0]),
                (Q.nth(-1), vec![0, 1]),
                (Q.nth(3), vec![0, 0]),
                (Q.nth(1), vec![1, 1]),
            ])
            .unwrap();

        assert_eq!(p.nterms(), 3);
        assert_eq!(p.exponents(0), &[2, 0]);
        assert_eq!(p.exponents(1), &[1, 1]);
        assert_eq!(p.lcoeff(), Q.nth(2));
        assert_eq!(p.degree(), 2);

        let z = r
            .from_terms(vec![(Q.nth(1), vec![1]), (Q.nth(-1), vec![1, 0])])
            .unwrap();
        assert!(z.is_zero());
        assert_eq!(z.leading_term(), (Q.zero(), r.zero().lmonomial()));
        assert!(z.lmonomial().is_constant());
    }

    #[test]
    fn arithmetic() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::Lex);
        let x = r.variable(0);
        let y = r.variable(1);

        let a = &x + &y;
        let b = &x - &y;
        let c = &a * &b;
        assert_eq!(c, &x.pow(2) - &y.pow(2));
        assert_eq!(&a - &a, r.zero());
        assert_eq!(-(&a) + a.clone(), r.zero());
        assert_eq!(a.pow(0), r.one());

        let h = c.checked_div_coeff(&Q.nth(2)).unwrap();
        assert_eq!(h.lcoeff(), Rational::new(1, 2));
        assert!(matches!(
            c.checked_div_coeff(&Q.zero()),
            Err(AlgebraError::UnsupportedOperand(_))
        ));

        let m = (&x * &r.constant(Q.nth(3))).make_monic();
        assert_eq!(m, x);

        assert_eq!(c.evaluate(&[Q.nth(3), Q.nth(2)]), Q.nth(5));
    }

    #[test]
    fn mismatched_rings() {
        let r2 = PolynomialRing::new(Q, 2, MonomialOrder::Lex);
        let r3 = PolynomialRing::new(Q, 3, MonomialOrder::Lex);
        let r2g = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        assert!(matches!(
            r2.variable(0).checked_add(&r3.variable(0)),
            Err(AlgebraError::MismatchedContext(_))
        ));
        assert!(r2
            .variable(0)
            .checked_mul(&r2g.variable(0))
            .is_err());
    }

    #[test]
    #[should_panic]
    fn operator_panics_on_mismatch() {
        let r2 = PolynomialRing::new(Q, 2, MonomialOrder::Lex);
        let r3 = PolynomialRing::new(Q, 3, MonomialOrder::Lex);
        let _ = &r2.variable(0) + &r3.variable(0);
    }

    struct WarningCounter(Arc<AtomicUsize>);

    impl<S: Subscriber> Layer<S> for WarningCounter {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            if *event.metadata().level() == Level::WARN {
                self.0.fetch_add(1, AtomicOrdering::SeqCst);
            }
        }
    }

    fn count_warnings(f: impl FnOnce()) -> usize {
        let count = Arc::new(AtomicUsize::new(0));
        let subscriber = tracing_subscriber::registry().with(WarningCounter(count.clone()));
        tracing::subscriber::with_default(subscriber, f);
        count.load(AtomicOrdering::SeqCst)
    }

    #[test]
    fn float_cancellation() {
        let r = PolynomialRing::new(FloatField, 2, MonomialOrder::GrevLex);
        let three = r.constant(F64::from(3.));
        let a = r
            .from_terms(vec![(F64::from(0.1), vec![1, 0]), (F64::from(0.7), vec![0, 1])])
            .unwrap();
        let b = r
            .from_terms(vec![(F64::from(0.3), vec![1, 0]), (F64::from(2.1), vec![0, 1])])
            .unwrap();

        // 3 * a - b vanishes up to rounding
        let warnings = count_warnings(|| {
            let d = &(&a * &three) - &b;
            assert!(d.is_zero());
        });
        assert_eq!(warnings, 1);

        // a single near-zero term is not reported
        let a = r.from_terms(vec![(F64::from(0.1), vec![1, 0])]).unwrap();
        let b = r.from_terms(vec![(F64::from(0.3), vec![1, 0])]).unwrap();
        let warnings = count_warnings(|| {
            let d = &(&a * &three) - &b;
            assert!(d.is_zero());
        });
        assert_eq!(warnings, 0);

        // neither is a cancellation that leaves terms behind
        let a = r
            .from_terms(vec![
                (F64::from(0.1), vec![1, 0]),
                (F64::from(0.7), vec![0, 1]),
                (F64::from(1.), vec![0, 0]),
            ])
            .unwrap();
        let b = r
            .from_terms(vec![(F64::from(0.3), vec![1, 0]), (F64::from(2.1), vec![0, 1])])
            .unwrap();
        let warnings = count_warnings(|| {
            let d = &(&a * &three) - &b;
            assert_eq!(d, r.constant(F64::from(3.)));
        });
        assert_eq!(warnings, 0);
    }

    #[test]
    fn exponent_overflow() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let x = r.variable(0);
        let big = r.monomial(Q.one(), &[u16::MAX, 1]).unwrap();

        assert!(big.checked_mul(&r.variable(1)).is_ok());
        assert_eq!(
            big.checked_mul(&(&x + &r.one())),
            Err(AlgebraError::ExponentOverflow {
                variable: "x".into()
            })
        );
        assert!(matches!(
            big.mul_monomial(&x.lmonomial()),
            Err(AlgebraError::ExponentOverflow { .. })
        ));
        assert_eq!(x.checked_pow(u16::MAX as u32).unwrap().exponents(0), &[u16::MAX, 0]);
        assert!(x.checked_pow(u16::MAX as u32 + 1).is_err());
        assert_eq!(big.checked_pow(0).unwrap(), r.one());
    }

    #[test]
    fn too_many_exponents() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        assert!(matches!(
            r.from_terms(vec![(Q.one(), vec![1, 0, 2])]),
            Err(AlgebraError::MismatchedContext(_))
        ));
        assert!(r.monomial(Q.one(), &[0, 0, 1]).is_err());
        assert_eq!(r.monomial(Q.one(), &[2]).unwrap(), r.variable(0).pow(2));
    }
}
