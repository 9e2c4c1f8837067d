//! Sparse multivariate polynomials over a field, their monomials and
//! the monomial orders that define leading terms.
pub mod groebner;
pub mod monomial;
pub mod parse;
pub mod polynomial;

use std::cmp::{Ordering, Reverse};
use std::fmt::Display;

use smallvec::SmallVec;
use smartstring::{LazyCompact, SmartString};

use crate::error::{AlgebraError, Result};

pub const INLINED_EXPONENTS: usize = 6;

/// The name of a polynomial variable.
pub type Variable = SmartString<LazyCompact>;

/// Create the default variable names for a ring with `n` variables:
/// `x, y, z, w` for up to four variables and `x1, ..., xn` otherwise.
pub fn default_variables(n: usize) -> Vec<Variable> {
    if n <= 4 {
        ["x", "y", "z", "w"][..n].iter().map(|s| (*s).into()).collect()
    } else {
        (1..=n).map(|i| format!("x{}", i).into()).collect()
    }
}

/// A well-order of monomials that is compatible with multiplication.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Default)]
pub enum MonomialOrder {
    /// Lexicographic order: the first differing exponent decides.
    Lex,
    /// Graded reverse lexicographic order: the total degree decides, ties are broken
    /// by the last differing exponent, where the smaller exponent wins.
    #[default]
    GrevLex,
}

/// A sortable key for a monomial under a [MonomialOrder]. Comparing two keys of
/// the same order gives the same result as comparing the monomials.
#[derive(Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Debug)]
pub enum OrderKey {
    Lex(SmallVec<[u16; INLINED_EXPONENTS]>),
    GrevLex(u32, SmallVec<[Reverse<u16>; INLINED_EXPONENTS]>),
}

impl MonomialOrder {
    /// Compute the sort key of the exponent vector `a`.
    pub fn key(&self, a: &[u16]) -> OrderKey {
        match self {
            MonomialOrder::Lex => OrderKey::Lex(a.iter().copied().collect()),
            MonomialOrder::GrevLex => OrderKey::GrevLex(
                a.iter().map(|e| *e as u32).sum(),
                a.iter().rev().map(|e| Reverse(*e)).collect(),
            ),
        }
    }

    /// Compare two exponent vectors of the same length.
    #[inline]
    pub fn cmp(&self, a: &[u16], b: &[u16]) -> Ordering {
        match self {
            MonomialOrder::Lex => a.cmp(b),
            MonomialOrder::GrevLex => {
                let deg: u32 = a.iter().map(|e| *e as u32).sum();
                let deg2: u32 = b.iter().map(|e| *e as u32).sum();

                match deg.cmp(&deg2) {
                    Ordering::Equal => {}
                    x => {
                        return x;
                    }
                }

                for (a1, a2) in a.iter().rev().zip(b.iter().rev()) {
                    match a1.cmp(a2) {
                        Ordering::Equal => {}
                        x => {
                            return x.reverse();
                        }
                    }
                }

                Ordering::Equal
            }
        }
    }

    /// Returns `true` if the two exponent vectors have equal keys.
    #[inline]
    pub fn equal_under_order(&self, a: &[u16], b: &[u16]) -> bool {
        self.cmp(a, b) == Ordering::Equal
    }

    pub const fn name(&self) -> &'static str {
        match self {
            MonomialOrder::Lex => "lex",
            MonomialOrder::GrevLex => "grevlex",
        }
    }

    /// Parse an order from its name.
    pub fn from_name(name: &str) -> Result<MonomialOrder> {
        match name.trim().to_ascii_lowercase().as_str() {
            "lex" | "plex" => Ok(MonomialOrder::Lex),
            "grevlex" | "degrevlex" => Ok(MonomialOrder::GrevLex),
            _ => Err(AlgebraError::UnsupportedOperand(format!(
                "unknown monomial order '{}'",
                name
            ))),
        }
    }
}

impl Display for MonomialOrder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
