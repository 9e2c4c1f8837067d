//! Run-time settings: the coefficient mode, the monomial order and printing.
//!
//! The coefficient field is a type parameter everywhere else in the crate. The
//! helpers in this module pick the field that matches [Settings::mode] and run a
//! computation on generators given as strings.

use std::env;

use tracing::debug;

use crate::domains::float::{ComplexField, FloatField};
use crate::domains::rational::Q;
use crate::domains::Field;
use crate::error::{AlgebraError, Result};
use crate::hilbert::HilbertScheme;
use crate::ideal::Ideal;
use crate::nested::DoubleNestedHilbertScheme;
use crate::poly::polynomial::PolynomialRing;
use crate::poly::{MonomialOrder, Variable};
use crate::printer::PrintOptions;

/// The coefficient field used for a computation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum CoefficientMode {
    /// Double precision floats, with a tolerance for zero tests.
    Float,
    /// Double precision complex numbers.
    Complex,
    /// Exact rational numbers.
    #[default]
    Rational,
}

impl CoefficientMode {
    pub fn from_name(name: &str) -> Result<CoefficientMode> {
        match name.trim().to_ascii_lowercase().as_str() {
            "float" => Ok(CoefficientMode::Float),
            "complex" => Ok(CoefficientMode::Complex),
            "rational" | "exact" => Ok(CoefficientMode::Rational),
            _ => Err(AlgebraError::UnsupportedOperand(format!(
                "unknown coefficient mode '{}'",
                name
            ))),
        }
    }
}

/// Settings for a computation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub mode: CoefficientMode,
    pub order: MonomialOrder,
    /// Print `+` and `-` between terms with surrounding spaces.
    pub verbose: bool,
    /// Print exponents as superscripts.
    pub unicode: bool,
    /// Variable names. `None` uses `x, y, z, w` for up to four variables and `x1, ..., xn` otherwise.
    pub variables: Option<Vec<Variable>>,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            mode: CoefficientMode::Rational,
            order: MonomialOrder::GrevLex,
            verbose: false,
            unicode: false,
            variables: None,
        }
    }
}

impl Settings {
    /// Read the settings from the environment variables `HILBERT_COEFFICIENT_MODE`,
    /// `HILBERT_MONOMIAL_ORDER` and `HILBERT_VERBOSE`.
    pub fn from_env() -> Result<Settings> {
        Settings::from_lookup(|key| env::var(key).ok())
    }

    /// Read the settings from a key-value lookup, using the defaults for missing keys.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Settings> {
        let mut settings = Settings::default();

        if let Some(mode) = lookup("HILBERT_COEFFICIENT_MODE") {
            settings.mode = CoefficientMode::from_name(&mode)?;
        }
        if let Some(order) = lookup("HILBERT_MONOMIAL_ORDER") {
            settings.order = MonomialOrder::from_name(&order)?;
        }
        if let Some(verbose) = lookup("HILBERT_VERBOSE") {
            settings.verbose = match verbose.trim() {
                "1" | "true" => true,
                "0" | "false" | "" => false,
                v => {
                    return Err(AlgebraError::UnsupportedOperand(format!(
                        "unknown value '{}' for HILBERT_VERBOSE",
                        v
                    )))
                }
            };
        }

        debug!("Settings: {:?}", settings);
        Ok(settings)
    }

    /// The print options that match the settings.
    pub fn print_options(&self) -> PrintOptions {
        let base = if self.unicode {
            PrintOptions::unicode()
        } else {
            PrintOptions::new()
        };
        PrintOptions {
            verbose: self.verbose,
            ..base
        }
    }

    /// Create a polynomial ring over `field` with `nvars` variables.
    pub fn ring<F: Field>(&self, field: F, nvars: usize) -> Result<PolynomialRing<F>> {
        match &self.variables {
            Some(v) if v.len() != nvars => Err(AlgebraError::InvalidShape(format!(
                "{} variable names for {} variables",
                v.len(),
                nvars
            ))),
            Some(v) => Ok(PolynomialRing::with_variables(field, v.clone(), self.order)),
            None => Ok(PolynomialRing::new(field, nvars, self.order)),
        }
    }
}

fn tangent_dimension_in<F: Field, S: AsRef<str>>(
    settings: &Settings,
    field: F,
    nvars: usize,
    generators: &[S],
) -> Result<usize> {
    let ring = settings.ring(field, nvars)?;
    let ideal = Ideal::parse(&ring, generators)?;
    HilbertScheme::new(&ring).tangent_space(&ideal)?.dim()
}

/// Compute the dimension of the tangent space of the Hilbert scheme of points at the
/// ideal generated by `generators`, in the coefficient field selected by `settings`.
pub fn tangent_space_dimension<S: AsRef<str>>(
    settings: &Settings,
    nvars: usize,
    generators: &[S],
) -> Result<usize> {
    match settings.mode {
        CoefficientMode::Float => tangent_dimension_in(settings, FloatField, nvars, generators),
        CoefficientMode::Complex => {
            tangent_dimension_in(settings, ComplexField, nvars, generators)
        }
        CoefficientMode::Rational => tangent_dimension_in(settings, Q, nvars, generators),
    }
}

fn nested_dimension_in<F: Field, S: AsRef<str>>(
    settings: &Settings,
    field: F,
    nvars: usize,
    diagram: &[usize],
    grid: &[Vec<Vec<S>>],
) -> Result<usize> {
    let ring = settings.ring(field, nvars)?;
    let scheme = DoubleNestedHilbertScheme::new(&ring, diagram)?;

    let ideals = grid
        .iter()
        .map(|row| {
            row.iter()
                .map(|gens| Ideal::parse(&ring, gens))
                .collect::<Result<Vec<_>>>()
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(scheme.tangent_space(ideals)?.dim())
}

/// Compute the dimension of the tangent space of the double nested Hilbert scheme of
/// shape `diagram` at the grid of ideals given by their generators.
pub fn nested_tangent_space_dimension<S: AsRef<str>>(
    settings: &Settings,
    nvars: usize,
    diagram: &[usize],
    grid: &[Vec<Vec<S>>],
) -> Result<usize> {
    match settings.mode {
        CoefficientMode::Float => nested_dimension_in(settings, FloatField, nvars, diagram, grid),
        CoefficientMode::Complex => {
            nested_dimension_in(settings, ComplexField, nvars, diagram, grid)
        }
        CoefficientMode::Rational => nested_dimension_in(settings, Q, nvars, diagram, grid),
    }
}

#[cfg(test)]
mod test {
    use ahash::AHashMap;

    use crate::domains::rational::Q;
    use crate::error::AlgebraError;
    use crate::poly::MonomialOrder;

    use super::{
        nested_tangent_space_dimension, tangent_space_dimension, CoefficientMode, Settings,
    };

    #[test]
    fn lookup() {
        let env: AHashMap<&str, &str> = [
            ("HILBERT_COEFFICIENT_MODE", "float"),
            ("HILBERT_MONOMIAL_ORDER", "lex"),
            ("HILBERT_VERBOSE", "1"),
        ]
        .into_iter()
        .collect();

        let s = Settings::from_lookup(|k| env.get(k).map(|v| v.to_string())).unwrap();
        assert_eq!(s.mode, CoefficientMode::Float);
        assert_eq!(s.order, MonomialOrder::Lex);
        assert!(s.verbose);

        assert_eq!(Settings::from_lookup(|_| None).unwrap(), Settings::default());
        assert!(matches!(
            Settings::from_lookup(|k| (k == "HILBERT_COEFFICIENT_MODE").then(|| "p-adic".to_owned())),
            Err(AlgebraError::UnsupportedOperand(_))
        ));
    }

    #[test]
    fn ring_variables() {
        let s = Settings {
            variables: Some(vec!["a".into(), "b".into()]),
            ..Settings::default()
        };
        let r = s.ring(Q, 2).unwrap();
        let f = r.parse("a^2 - b").unwrap();
        assert_eq!(f.format(s.print_options()), "a^2-b");

        let verbose = Settings {
            verbose: true,
            ..s.clone()
        };
        assert_eq!(f.format(verbose.print_options()), "a^2 - b");

        let unicode = Settings {
            unicode: true,
            ..s.clone()
        };
        assert_eq!(f.format(unicode.print_options()), "a²-b");
        let unicode_verbose = Settings {
            unicode: true,
            ..verbose
        };
        assert_eq!(f.format(unicode_verbose.print_options()), "a² - b");
        assert!(matches!(
            s.ring(Q, 3),
            Err(AlgebraError::InvalidShape(_))
        ));
    }

    #[test]
    fn dispatch() {
        for mode in [
            CoefficientMode::Rational,
            CoefficientMode::Float,
            CoefficientMode::Complex,
        ] {
            let s = Settings {
                mode,
                ..Settings::default()
            };
            assert_eq!(tangent_space_dimension(&s, 2, &["x^2", "x*y", "y^2"]).unwrap(), 6);
            assert_eq!(
                nested_tangent_space_dimension(
                    &s,
                    2,
                    &[2],
                    &[vec![vec!["x", "y"], vec!["x^2", "y"]]]
                )
                .unwrap(),
                4
            );
        }
    }
}
