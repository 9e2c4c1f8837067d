//! Ideals of polynomial rings, represented by their reduced Gröbner basis.
//!
//! The basis is computed once, when the ideal is constructed, and every query
//! (membership, normal forms, quotient bases) is answered from it.
//!
//! ```
//! use hilbert_tangent::domains::rational::Q;
//! use hilbert_tangent::ideal::Ideal;
//! use hilbert_tangent::poly::{polynomial::PolynomialRing, MonomialOrder};
//!
//! let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
//! let i = Ideal::parse(&r, &["x^2", "y"]).unwrap();
//! assert_eq!(i.colength().unwrap(), 2);
//! assert!(i.contains(&r.parse("x^3 + x*y").unwrap()).unwrap());
//! ```

use std::fmt::Display;

use tracing::debug;

use crate::domains::Field;
use crate::error::{AlgebraError, Result};
use crate::poly::groebner::{groebner_basis, reduce, total_reduce};
use crate::poly::monomial::{divides, pure_power, Monomial};
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::printer::PrintOptions;
use crate::utils::multisets;

/// An ideal of a polynomial ring, given by generators and its reduced Gröbner basis.
#[derive(Clone, Debug)]
pub struct Ideal<F: Field> {
    ring: PolynomialRing<F>,
    generators: Vec<MultivariatePolynomial<F>>,
    basis: Vec<MultivariatePolynomial<F>>,
}

impl<F: Field> Ideal<F> {
    /// Create the ideal generated by `generators`, which must all live in `ring`.
    pub fn new(
        ring: &PolynomialRing<F>,
        generators: Vec<MultivariatePolynomial<F>>,
    ) -> Result<Ideal<F>> {
        for g in &generators {
            if !ring.is_compatible(&g.ring()) {
                return Err(AlgebraError::MismatchedContext(format!(
                    "generator {} of {} is not in {}",
                    g,
                    g.ring(),
                    ring
                )));
            }
        }

        let basis = groebner_basis(&generators);
        debug!(
            "Ideal with {} generators has a reduced Gröbner basis of {} elements",
            generators.len(),
            basis.len()
        );

        Ok(Ideal {
            ring: ring.clone(),
            generators,
            basis,
        })
    }

    /// Create an ideal from generators written as strings.
    pub fn parse<S: AsRef<str>>(ring: &PolynomialRing<F>, generators: &[S]) -> Result<Ideal<F>> {
        Ideal::new(ring, ring.parse_all(generators)?)
    }

    /// The ideal generated by `1`.
    pub fn unit(ring: &PolynomialRing<F>) -> Ideal<F> {
        Ideal {
            ring: ring.clone(),
            generators: vec![ring.one()],
            basis: vec![ring.one()],
        }
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F> {
        &self.ring
    }

    #[inline]
    pub fn generators(&self) -> &[MultivariatePolynomial<F>] {
        &self.generators
    }

    /// The reduced Gröbner basis, sorted by decreasing leading monomial.
    #[inline]
    pub fn groebner_basis(&self) -> &[MultivariatePolynomial<F>] {
        &self.basis
    }

    fn check_polynomial(&self, f: &MultivariatePolynomial<F>) -> Result<()> {
        if self.ring.is_compatible(&f.ring()) {
            Ok(())
        } else {
            Err(AlgebraError::MismatchedContext(format!(
                "{} is in {}, but the ideal is in {}",
                f,
                f.ring(),
                self.ring
            )))
        }
    }

    fn check_ideal(&self, other: &Ideal<F>) -> Result<()> {
        if self.ring.is_compatible(&other.ring) {
            Ok(())
        } else {
            Err(AlgebraError::MismatchedContext(format!(
                "ideals in {} and {}",
                self.ring, other.ring
            )))
        }
    }

    /// Test if `f` is a member of the ideal.
    pub fn contains(&self, f: &MultivariatePolynomial<F>) -> Result<bool> {
        self.check_polynomial(f)?;
        Ok(reduce(f, &self.basis).is_zero())
    }

    /// Test if every generator of `other` is a member of the ideal.
    pub fn contains_ideal(&self, other: &Ideal<F>) -> Result<bool> {
        self.check_ideal(other)?;
        Ok(other
            .generators
            .iter()
            .all(|g| reduce(g, &self.basis).is_zero()))
    }

    /// The unique representative of `f` modulo the ideal that consists of standard monomials.
    pub fn normal_form(&self, f: &MultivariatePolynomial<F>) -> Result<MultivariatePolynomial<F>> {
        self.check_polynomial(f)?;
        Ok(total_reduce(f, &self.basis))
    }

    /// Test if the monomial `e` is not divisible by any leading monomial of the basis.
    #[inline]
    fn is_standard(&self, e: &[u16]) -> bool {
        !self
            .basis
            .iter()
            .any(|g| divides(g.exponents(0), e))
    }

    /// Returns `true` if the ideal is the whole ring.
    pub fn is_unit(&self) -> bool {
        self.basis.len() == 1 && self.basis[0].is_constant()
    }

    /// The first variable for which no pure power is a leading monomial of the basis.
    fn missing_variable(&self) -> Option<usize> {
        if self.is_unit() {
            return None;
        }

        let mut represented = vec![false; self.ring.nvars()];
        for g in &self.basis {
            if let Some(v) = pure_power(g.exponents(0)) {
                represented[v] = true;
            }
        }
        represented.iter().position(|r| !r)
    }

    /// Returns `true` if for every variable some leading monomial of the basis is
    /// a pure power of that variable, which makes the quotient finite dimensional.
    /// The unit ideal satisfies the condition.
    pub fn has_maximal_radical(&self) -> bool {
        self.missing_variable().is_none()
    }

    fn check_finite(&self) -> Result<()> {
        match self.missing_variable() {
            Some(v) => Err(AlgebraError::InfiniteDimension {
                variable: self.ring.variables()[v].to_string(),
            }),
            None => Ok(()),
        }
    }

    /// The monomials that are not divisible by any leading monomial of the basis,
    /// sorted in decreasing order. They form a basis of the quotient ring.
    pub fn standard_monomials(&self) -> Result<Vec<Monomial>> {
        self.check_finite()?;

        fn explore<F: Field>(
            ideal: &Ideal<F>,
            exponents: &mut Vec<u16>,
            start: usize,
            out: &mut Vec<Vec<u16>>,
        ) {
            if !ideal.is_standard(exponents) {
                return;
            }
            out.push(exponents.clone());

            // only raise variables from `start` on, so that every monomial is reached once
            for v in start..exponents.len() {
                exponents[v] += 1;
                explore(ideal, exponents, v, out);
                exponents[v] -= 1;
            }
        }

        let mut staircase = vec![];
        explore(self, &mut vec![0; self.ring.nvars()], 0, &mut staircase);

        let order = self.ring.order();
        staircase.sort_by(|a, b| order.cmp(b, a));

        Ok(staircase
            .into_iter()
            .map(|e| Monomial::from_exponents(&e, self.ring.variables().clone()))
            .collect())
    }

    /// The dimension of the quotient ring as a vector space.
    pub fn colength(&self) -> Result<usize> {
        Ok(self.standard_monomials()?.len())
    }

    /// A basis of `top / self` for an ideal `top` containing `self`, sorted by decreasing
    /// leading monomial.
    ///
    /// The leading monomials are the standard monomials `m` of `self` that are divisible by
    /// a leading monomial `lm(g)` of `top`, and the element for `m` is the normal form of
    /// `(m / lm(g)) * g` modulo `self`, using the first such `g`.
    pub fn standard_monomials_in(&self, top: &Ideal<F>) -> Result<Vec<MultivariatePolynomial<F>>> {
        self.check_ideal(top)?;
        if !top.contains_ideal(self)? {
            return Err(AlgebraError::IdealNotContained {
                top: top.to_string(),
                bottom: self.to_string(),
            });
        }

        let mut res = vec![];
        for m in self.standard_monomials()? {
            let Some(g) = top.basis.iter().find(|g| divides(g.exponents(0), &m.exponents)) else {
                continue;
            };

            let shift: Vec<u16> = m
                .exponents
                .iter()
                .zip(g.exponents(0))
                .map(|(a, b)| a - b)
                .collect();
            let lifted = g.mul_term(&g.field.one(), &shift);
            res.push(total_reduce(&lifted, &self.basis));
        }

        Ok(res)
    }

    /// Compute the `d`-th power of the ideal, generated by all products of `d` generators.
    pub fn power(&self, d: u32) -> Result<Ideal<F>> {
        if d == 0 {
            return Ok(Ideal::unit(&self.ring));
        }

        let generators = multisets(self.generators.len(), d as usize)
            .into_iter()
            .map(|choice| {
                let mut p = self.ring.one();
                for i in choice {
                    p = &p * &self.generators[i];
                }
                p
            })
            .collect();

        Ideal::new(&self.ring, generators)
    }

    /// The product ideal, generated by all products of generators.
    pub fn product(&self, other: &Ideal<F>) -> Result<Ideal<F>> {
        self.check_ideal(other)?;

        let mut generators = Vec::with_capacity(self.generators.len() * other.generators.len());
        for f in &self.generators {
            for g in &other.generators {
                generators.push(f * g);
            }
        }
        Ideal::new(&self.ring, generators)
    }

    /// The sum of two ideals, generated by the union of the generators.
    pub fn sum(&self, other: &Ideal<F>) -> Result<Ideal<F>> {
        self.check_ideal(other)?;

        let mut generators = self.generators.clone();
        generators.extend(other.generators.iter().cloned());
        Ideal::new(&self.ring, generators)
    }

    /// Write the ideal in Macaulay2 syntax, for example `ideal(x^2,x*y-z)`.
    pub fn to_macaulay2(&self) -> String {
        let gens: Vec<String> = self
            .generators
            .iter()
            .map(|g| g.format(PrintOptions::macaulay2()))
            .collect();
        format!("ideal({})", gens.join(","))
    }
}

/// A Macaulay2 script that computes the dimension of the tangent space of the
/// Hilbert scheme of points at `ideal`.
pub fn macaulay2_tangent_script<F: Field>(ideal: &Ideal<F>) -> String {
    let vars: Vec<&str> = ideal.ring.variables().iter().map(|v| v.as_str()).collect();
    format!(
        "R = QQ[{}]; I = {}; degree Hom(I/I^2, R/I)",
        vars.join(","),
        ideal.to_macaulay2()
    )
}

impl<F: Field> PartialEq for Ideal<F> {
    /// Two ideals are equal if they have the same reduced Gröbner basis.
    fn eq(&self, other: &Self) -> bool {
        self.ring.is_compatible(&other.ring) && self.basis == other.basis
    }
}

impl<F: Field> Eq for Ideal<F> {}

impl<F: Field> Display for Ideal<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("<")?;
        for (i, g) in self.generators.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            g.fmt(f)?;
        }
        f.write_str(">")
    }
}
