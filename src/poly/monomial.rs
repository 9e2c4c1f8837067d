use std::fmt::Display;
use std::ops::Mul;
use std::sync::Arc;

use smallvec::{smallvec, SmallVec};

use crate::error::{AlgebraError, Result};
use crate::printer::{MonomialPrinter, PrintOptions};

use super::{MonomialOrder, Variable, INLINED_EXPONENTS};

/// A monomial: an exponent vector over an ordered list of variables.
/// Equality considers the exponents and the variable list.
#[derive(Clone, PartialEq, Eq, Hash, Debug)]
pub struct Monomial {
    pub exponents: SmallVec<[u16; INLINED_EXPONENTS]>,
    pub variables: Arc<Vec<Variable>>,
}

impl Monomial {
    /// Create a monomial. Missing trailing exponents are zero.
    pub fn new(exponents: &[u16], variables: Arc<Vec<Variable>>) -> Result<Monomial> {
        if exponents.len() > variables.len() {
            return Err(AlgebraError::MismatchedContext(format!(
                "exponent vector {:?} for the variables {:?}",
                exponents, variables
            )));
        }

        let mut e: SmallVec<[u16; INLINED_EXPONENTS]> = smallvec![0; variables.len()];
        e[..exponents.len()].copy_from_slice(exponents);
        Ok(Monomial {
            exponents: e,
            variables,
        })
    }

    /// Create a monomial from an exponent vector with one entry per variable.
    pub(crate) fn from_exponents(exponents: &[u16], variables: Arc<Vec<Variable>>) -> Monomial {
        debug_assert_eq!(exponents.len(), variables.len());
        Monomial {
            exponents: exponents.into(),
            variables,
        }
    }

    /// The constant monomial `1`.
    pub fn one(variables: Arc<Vec<Variable>>) -> Monomial {
        Monomial {
            exponents: smallvec![0; variables.len()],
            variables,
        }
    }

    /// The monomial consisting of the variable with index `var`.
    pub fn variable(var: usize, variables: Arc<Vec<Variable>>) -> Monomial {
        let mut m = Monomial::one(variables);
        m.exponents[var] = 1;
        m
    }

    #[inline]
    pub fn nvars(&self) -> usize {
        self.exponents.len()
    }

    /// Returns `true` if both monomials are defined over the same variables.
    #[inline]
    pub fn same_variables(&self, other: &Monomial) -> bool {
        Arc::ptr_eq(&self.variables, &other.variables) || self.variables == other.variables
    }

    fn check_variables(&self, other: &Monomial) -> Result<()> {
        if self.same_variables(other) {
            Ok(())
        } else {
            Err(AlgebraError::MismatchedContext(format!(
                "monomials over {:?} and {:?}",
                self.variables, other.variables
            )))
        }
    }

    /// Multiply two monomials.
    pub fn checked_mul(&self, other: &Monomial) -> Result<Monomial> {
        self.check_variables(other)?;
        let exponents = self
            .exponents
            .iter()
            .zip(&other.exponents)
            .zip(self.variables.iter())
            .map(|((a, b), v)| {
                a.checked_add(*b).ok_or_else(|| AlgebraError::ExponentOverflow {
                    variable: v.to_string(),
                })
            })
            .collect::<Result<_>>()?;

        Ok(Monomial {
            exponents,
            variables: self.variables.clone(),
        })
    }

    /// Divide `self` by `other`, which must divide `self`.
    pub fn checked_div(&self, other: &Monomial) -> Result<Monomial> {
        self.check_variables(other)?;
        if !self.is_multiple(other) {
            return Err(AlgebraError::NotDivisible {
                dividend: self.to_string(),
                divisor: other.to_string(),
            });
        }

        Ok(Monomial {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| a - b)
                .collect(),
            variables: self.variables.clone(),
        })
    }

    /// Returns `true` if every exponent of `self` is at least the corresponding exponent of `other`.
    #[inline]
    pub fn is_multiple(&self, other: &Monomial) -> bool {
        divides(&other.exponents, &self.exponents)
    }

    /// Exponent-wise minimum.
    pub fn gcd(&self, other: &Monomial) -> Monomial {
        Monomial {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.min(b))
                .collect(),
            variables: self.variables.clone(),
        }
    }

    /// Exponent-wise maximum.
    pub fn lcm(&self, other: &Monomial) -> Monomial {
        Monomial {
            exponents: self
                .exponents
                .iter()
                .zip(&other.exponents)
                .map(|(a, b)| *a.max(b))
                .collect(),
            variables: self.variables.clone(),
        }
    }

    #[inline]
    pub fn total_degree(&self) -> u32 {
        self.exponents.iter().map(|e| *e as u32).sum()
    }

    #[inline]
    pub fn is_constant(&self) -> bool {
        self.exponents.iter().all(|e| *e == 0)
    }

    /// If the monomial is a positive power of a single variable, return the index of that variable.
    pub fn is_pure_power(&self) -> Option<usize> {
        pure_power(&self.exponents)
    }

    /// Compare two monomials under the order `order`.
    pub fn cmp_in(&self, other: &Monomial, order: MonomialOrder) -> std::cmp::Ordering {
        order.cmp(&self.exponents, &other.exponents)
    }

    /// Print the monomial with the given options.
    pub fn format(&self, opts: PrintOptions) -> String {
        MonomialPrinter::new_with_options(&self.exponents, &self.variables, opts).to_string()
    }
}

/// Returns `true` if `a` divides `b`.
#[inline]
pub(crate) fn divides(a: &[u16], b: &[u16]) -> bool {
    a.iter().zip(b).all(|(x, y)| x <= y)
}

#[inline]
pub(crate) fn pure_power(e: &[u16]) -> Option<usize> {
    let mut var = None;
    for (i, x) in e.iter().enumerate() {
        if *x > 0 {
            if var.is_some() {
                return None;
            }
            var = Some(i);
        }
    }
    var
}

impl<'a> Mul<&'a Monomial> for &'a Monomial {
    type Output = Monomial;

    /// Multiply two monomials. Panics when the variable lists differ.
    fn mul(self, rhs: &'a Monomial) -> Monomial {
        match self.checked_mul(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Display for Monomial {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        MonomialPrinter::new(&self.exponents, &self.variables).fmt(f)
    }
}
