//! Errors raised by the algebraic core.

use std::fmt::{self, Display, Formatter};

/// Result type used throughout the crate.
pub type Result<T> = std::result::Result<T, AlgebraError>;

/// Errors that can occur when constructing or combining algebraic objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlgebraError {
    /// Operands live in different polynomial rings or over different base rings.
    MismatchedContext(String),
    /// A monomial division where the divisor has a larger exponent than the dividend.
    NotDivisible { dividend: String, divisor: String },
    /// The quotient by an ideal is not finite dimensional: no pure power of
    /// the variable with the given index is a leading monomial of the Gröbner basis.
    InfiniteDimension { variable: String },
    /// Expressing an element in a module basis left a non-zero residue.
    BasisInconsistency { element: String, residue: String },
    /// A product of monomials has an exponent that does not fit in a `u16`.
    ExponentOverflow { variable: String },
    /// A diagram or matrix has the wrong shape.
    InvalidShape(String),
    /// An operand that the coefficient domain cannot handle, such as a zero divisor.
    UnsupportedOperand(String),
    /// The bottom ideal of a quotient is not contained in the top ideal.
    IdealNotContained { top: String, bottom: String },
    /// Malformed polynomial input.
    Parse { input: String, reason: String },
}

impl Display for AlgebraError {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            AlgebraError::MismatchedContext(s) => write!(f, "Mismatched context: {}", s),
            AlgebraError::NotDivisible { dividend, divisor } => {
                write!(f, "Monomial {} is not a multiple of {}", dividend, divisor)
            }
            AlgebraError::InfiniteDimension { variable } => write!(
                f,
                "The quotient is infinite dimensional: no pure power of {} is a leading monomial",
                variable
            ),
            AlgebraError::BasisInconsistency { element, residue } => write!(
                f,
                "Could not express {} in the module basis, residue {} remains",
                element, residue
            ),
            AlgebraError::ExponentOverflow { variable } => {
                write!(f, "The exponent of {} exceeds {}", variable, u16::MAX)
            }
            AlgebraError::InvalidShape(s) => write!(f, "Invalid shape: {}", s),
            AlgebraError::UnsupportedOperand(s) => write!(f, "Unsupported operand: {}", s),
            AlgebraError::IdealNotContained { top, bottom } => {
                write!(f, "The ideal {} is not contained in {}", bottom, top)
            }
            AlgebraError::Parse { input, reason } => {
                write!(f, "Could not parse '{}': {}", input, reason)
            }
        }
    }
}

impl std::error::Error for AlgebraError {}

#[cfg(test)]
mod test {
    use super::AlgebraError;

    #[test]
    fn display() {
        let e = AlgebraError::InfiniteDimension {
            variable: "y".into(),
        };
        assert_eq!(
            e.to_string(),
            "The quotient is infinite dimensional: no pure power of y is a leading monomial"
        );

        let e = AlgebraError::IdealNotContained {
            top: "<x>".into(),
            bottom: "<y>".into(),
        };
        assert_eq!(e.to_string(), "The ideal <y> is not contained in <x>");
    }
}
