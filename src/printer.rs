//! Human-readable rendering of monomials and polynomials.
//!
//! Printing is presentation only: two polynomials print the same if and only if
//! they are equal, but the exact spacing is governed by [PrintOptions].

use std::fmt::{self, Write};

use crate::domains::Ring;
use crate::poly::polynomial::MultivariatePolynomial;
use crate::poly::Variable;
use crate::tensors::matrix::Matrix;

/// Various options for printing polynomials.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct PrintOptions {
    /// Surround `+` and `-` between terms with spaces.
    pub verbose: bool,
    /// Print exponents as unicode superscripts, `x²` instead of `x^2`.
    pub num_exp_as_superscript: bool,
    pub multiplication_operator: char,
}

impl PrintOptions {
    /// Compact ASCII output, e.g. `x^2-3*x*y+1/2`.
    pub const fn new() -> PrintOptions {
        PrintOptions {
            verbose: false,
            num_exp_as_superscript: false,
            multiplication_operator: '*',
        }
    }

    /// ASCII output with spaced operators, e.g. `x^2 - 3*x*y + 1/2`.
    pub const fn verbose() -> PrintOptions {
        PrintOptions {
            verbose: true,
            ..PrintOptions::new()
        }
    }

    /// Output with superscript exponents, e.g. `x² - 3·x·y + 1/2`.
    pub const fn unicode() -> PrintOptions {
        PrintOptions {
            verbose: true,
            num_exp_as_superscript: true,
            multiplication_operator: '·',
        }
    }

    /// Output that Macaulay2 accepts as input.
    pub const fn macaulay2() -> PrintOptions {
        PrintOptions::new()
    }
}

impl Default for PrintOptions {
    fn default() -> Self {
        Self::new()
    }
}

fn write_superscript(f: &mut impl Write, n: u16) -> fmt::Result {
    const DIGITS: [char; 10] = ['⁰', '¹', '²', '³', '⁴', '⁵', '⁶', '⁷', '⁸', '⁹'];
    for d in n.to_string().bytes() {
        f.write_char(DIGITS[(d - b'0') as usize])?;
    }
    Ok(())
}

/// Prints an exponent vector as a product of variable powers.
pub struct MonomialPrinter<'a> {
    pub exponents: &'a [u16],
    pub variables: &'a [Variable],
    pub opts: PrintOptions,
}

impl<'a> MonomialPrinter<'a> {
    pub fn new(exponents: &'a [u16], variables: &'a [Variable]) -> MonomialPrinter<'a> {
        MonomialPrinter {
            exponents,
            variables,
            opts: PrintOptions::default(),
        }
    }

    pub fn new_with_options(
        exponents: &'a [u16],
        variables: &'a [Variable],
        opts: PrintOptions,
    ) -> MonomialPrinter<'a> {
        MonomialPrinter {
            exponents,
            variables,
            opts,
        }
    }
}

impl<'a> fmt::Display for MonomialPrinter<'a> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let mut first = true;
        for (v, e) in self.variables.iter().zip(self.exponents) {
            if *e == 0 {
                continue;
            }

            if !first {
                f.write_char(self.opts.multiplication_operator)?;
            }
            first = false;

            f.write_str(v)?;
            if *e > 1 {
                if self.opts.num_exp_as_superscript {
                    write_superscript(f, *e)?;
                } else {
                    write!(f, "^{}", e)?;
                }
            }
        }

        if first {
            f.write_char('1')?;
        }

        Ok(())
    }
}

/// Prints a polynomial term by term, in the order of its monomial order.
pub struct PolynomialPrinter<'a, F: Ring> {
    pub poly: &'a MultivariatePolynomial<F>,
    pub opts: PrintOptions,
}

impl<'a, F: Ring> PolynomialPrinter<'a, F> {
    pub fn new(poly: &'a MultivariatePolynomial<F>) -> PolynomialPrinter<'a, F> {
        PolynomialPrinter {
            poly,
            opts: PrintOptions::default(),
        }
    }

    pub fn new_with_options(
        poly: &'a MultivariatePolynomial<F>,
        opts: PrintOptions,
    ) -> PolynomialPrinter<'a, F> {
        PolynomialPrinter { poly, opts }
    }

    fn format_term(&self, i: usize) -> String {
        let field = &self.poly.field;
        let c = &self.poly.coefficients[i];
        let e = self.poly.exponents(i);
        let m = MonomialPrinter::new_with_options(e, &self.poly.variables, self.opts);

        if e.iter().all(|x| *x == 0) {
            c.to_string()
        } else if field.is_one(c) {
            m.to_string()
        } else if field.is_one(&field.neg(c)) {
            format!("-{}", m)
        } else {
            format!("{}{}{}", c, self.opts.multiplication_operator, m)
        }
    }
}

impl<'a, F: Ring> fmt::Display for PolynomialPrinter<'a, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.poly.is_zero() {
            return f.write_char('0');
        }

        let (sep_plus, sep_minus) = if self.opts.verbose {
            (" + ", " - ")
        } else {
            ("+", "-")
        };

        for i in 0..self.poly.nterms() {
            let s = self.format_term(i);
            if i == 0 {
                f.write_str(&s)?;
            } else if let Some(rest) = s.strip_prefix('-') {
                f.write_str(sep_minus)?;
                f.write_str(rest)?;
            } else {
                f.write_str(sep_plus)?;
                f.write_str(&s)?;
            }
        }

        Ok(())
    }
}

/// Prints a matrix as nested lists of rows, e.g. `{{1,2},{3,4}}`.
pub struct MatrixPrinter<'a, F: Ring> {
    pub matrix: &'a Matrix<F>,
}

impl<'a, F: Ring> MatrixPrinter<'a, F> {
    pub fn new(matrix: &'a Matrix<F>) -> MatrixPrinter<'a, F> {
        MatrixPrinter { matrix }
    }
}

impl<'a, F: Ring> fmt::Display for MatrixPrinter<'a, F> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_char('{')?;
        for i in 0..self.matrix.nrows() {
            if i > 0 {
                f.write_char(',')?;
            }
            f.write_char('{')?;
            for (j, e) in self.matrix[i as u32].iter().enumerate() {
                if j > 0 {
                    f.write_char(',')?;
                }
                write!(f, "{}", e)?;
            }
            f.write_char('}')?;
        }
        f.write_char('}')
    }
}

#[cfg(test)]
mod test {
    use crate::domains::float::FloatField;
    use crate::domains::rational::Q;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::MonomialOrder;

    use super::{PolynomialPrinter, PrintOptions};

    #[test]
    fn rational_polynomial() {
        let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
        let p = r.parse("y^3 - x*z + 1/2 - 3*x^2*y").unwrap();

        assert_eq!(p.to_string(), "-3*x^2*y+y^3-x*z+1/2");
        assert_eq!(
            PolynomialPrinter::new_with_options(&p, PrintOptions::verbose()).to_string(),
            "-3*x^2*y + y^3 - x*z + 1/2"
        );
        assert_eq!(
            PolynomialPrinter::new_with_options(&p, PrintOptions::unicode()).to_string(),
            "-3·x²·y + y³ - x·z + 1/2"
        );
        assert_eq!(r.zero().to_string(), "0");
    }

    #[test]
    fn float_polynomial() {
        let r = PolynomialRing::new(FloatField, 2, MonomialOrder::Lex);
        let p = r.parse("2x - 0.5y + 1").unwrap();
        assert_eq!(p.to_string(), "2*x-0.5*y+1");
    }
}
