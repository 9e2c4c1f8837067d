//! Finite-dimensional quotient rings and the modules over them that are built from ideals.
//!
//! A [QuotientRing] `S = R/I` is the ring of scalars. A [QuotientModule] is either
//! `R/I'` or an ideal quotient `I₁/I₂`, seen as a module over `S`. Every module has a
//! finite vector space basis of polynomials, sorted by decreasing leading monomial,
//! and elements are converted to and from coordinates in that basis.

use std::fmt::Display;
use std::sync::Arc;

use rand::RngCore;
use tracing::debug;

use crate::domains::Field;
use crate::error::{AlgebraError, Result};
use crate::hom::hom_constraints;
use crate::ideal::Ideal;
use crate::poly::polynomial::{MultivariatePolynomial, PolynomialRing};
use crate::tensors::matrix::Matrix;
use crate::tensors::sparse::SparseMatrix;

/// The quotient `R/I` of a polynomial ring by an ideal with a finite-dimensional quotient.
#[derive(Clone, Debug)]
pub struct QuotientRing<F: Field> {
    ideal: Ideal<F>,
    basis: Vec<MultivariatePolynomial<F>>,
}

impl<F: Field> QuotientRing<F> {
    /// Create the quotient ring. Fails with [AlgebraError::InfiniteDimension] if the
    /// quotient is not finite dimensional.
    pub fn new(ideal: Ideal<F>) -> Result<QuotientRing<F>> {
        let ring = ideal.ring().clone();
        let basis = ideal
            .standard_monomials()?
            .iter()
            .map(|m| ring.from_monomial(m))
            .collect::<Result<Vec<_>>>()?;

        debug!("Quotient ring {}/{} has dimension {}", ring, ideal, basis.len());
        Ok(QuotientRing { ideal, basis })
    }

    #[inline]
    pub fn ideal(&self) -> &Ideal<F> {
        &self.ideal
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F> {
        self.ideal.ring()
    }

    /// The standard monomials, as polynomials.
    #[inline]
    pub fn basis(&self) -> &[MultivariatePolynomial<F>] {
        &self.basis
    }

    /// The dimension as a vector space.
    #[inline]
    pub fn dim(&self) -> usize {
        self.basis.len()
    }
}

impl<F: Field> PartialEq for QuotientRing<F> {
    fn eq(&self, other: &Self) -> bool {
        self.ideal == other.ideal
    }
}

impl<F: Field> Eq for QuotientRing<F> {}

impl<F: Field> Display for QuotientRing<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.ring(), self.ideal)
    }
}

/// A module over a [QuotientRing] whose elements are polynomials modulo a structure ideal.
#[derive(Clone, Debug)]
pub struct QuotientModule<F: Field> {
    base: Arc<QuotientRing<F>>,
    structure: Ideal<F>,
    /// The numerator of an ideal quotient `top / structure`.
    top: Option<Ideal<F>>,
    basis: Vec<MultivariatePolynomial<F>>,
}

impl<F: Field> QuotientModule<F> {
    fn check_base(base: &QuotientRing<F>, ideal: &Ideal<F>) -> Result<()> {
        if base.ring().is_compatible(ideal.ring()) {
            Ok(())
        } else {
            Err(AlgebraError::MismatchedContext(format!(
                "the ideal {} of {} cannot define a module over {}",
                ideal,
                ideal.ring(),
                base
            )))
        }
    }

    /// The module `R/I` over `base`.
    pub fn ring_quotient(base: &Arc<QuotientRing<F>>, ideal: &Ideal<F>) -> Result<QuotientModule<F>> {
        Self::check_base(base, ideal)?;

        let ring = ideal.ring();
        let basis = ideal
            .standard_monomials()?
            .iter()
            .map(|m| ring.from_monomial(m))
            .collect::<Result<Vec<_>>>()?;

        debug!("Module {}/{} has dimension {}", ring, ideal, basis.len());
        Ok(QuotientModule {
            base: base.clone(),
            structure: ideal.clone(),
            top: None,
            basis,
        })
    }

    /// The module `top / bottom` over `base`. The ideal `bottom` must be contained in `top`.
    pub fn ideal_quotient(
        base: &Arc<QuotientRing<F>>,
        top: &Ideal<F>,
        bottom: &Ideal<F>,
    ) -> Result<QuotientModule<F>> {
        Self::check_base(base, top)?;
        Self::check_base(base, bottom)?;

        let basis = bottom.standard_monomials_in(top)?;

        debug!("Module {}/{} has dimension {}", top, bottom, basis.len());
        Ok(QuotientModule {
            base: base.clone(),
            structure: bottom.clone(),
            top: Some(top.clone()),
            basis,
        })
    }

    #[inline]
    pub fn base_ring(&self) -> &Arc<QuotientRing<F>> {
        &self.base
    }

    /// The ideal that elements are reduced by.
    #[inline]
    pub fn structure_ideal(&self) -> &Ideal<F> {
        &self.structure
    }

    /// The numerator of an ideal quotient, or `None` for a ring quotient.
    #[inline]
    pub fn top_ideal(&self) -> Option<&Ideal<F>> {
        self.top.as_ref()
    }

    #[inline]
    pub fn basis(&self) -> &[MultivariatePolynomial<F>] {
        &self.basis
    }

    /// The dimension as a vector space.
    #[inline]
    pub fn dim(&self) -> usize {
        self.basis.len()
    }

    /// Test if `f` represents an element of the module.
    pub fn contains(&self, f: &MultivariatePolynomial<F>) -> Result<bool> {
        match &self.top {
            Some(top) => top.contains(f),
            None => {
                if self.structure.ring().is_compatible(&f.ring()) {
                    Ok(true)
                } else {
                    Err(AlgebraError::MismatchedContext(format!(
                        "{} is not in {}",
                        f,
                        self.structure.ring()
                    )))
                }
            }
        }
    }

    /// Express `f` in the basis of the module.
    ///
    /// The normal form of `f` modulo the structure ideal is reduced in a single pass
    /// over the basis. A non-zero remainder yields [AlgebraError::BasisInconsistency].
    pub fn to_basis(&self, f: &MultivariatePolynomial<F>) -> Result<Vec<F::Element>> {
        let field = self.structure.ring().field();
        let mut r = self.structure.normal_form(f)?;
        let mut coeffs = vec![field.zero(); self.dim()];

        for (c, b) in coeffs.iter_mut().zip(&self.basis) {
            if r.is_zero() {
                break;
            }

            if r.exponents(0) == b.exponents(0) {
                *c = field.div(&r.lcoeff(), &b.lcoeff());
                r = &r - &b.mul_coeff(c);
            }
        }

        if !r.is_zero() {
            return Err(AlgebraError::BasisInconsistency {
                element: f.to_string(),
                residue: r.to_string(),
            });
        }

        Ok(coeffs)
    }

    /// Build the element with the given coordinates.
    pub fn from_basis(&self, coeffs: &[F::Element]) -> Result<MultivariatePolynomial<F>> {
        if coeffs.len() != self.dim() {
            return Err(AlgebraError::InvalidShape(format!(
                "expected {} coordinates, got {}",
                self.dim(),
                coeffs.len()
            )));
        }

        let mut res = self.structure.ring().zero();
        for (c, b) in coeffs.iter().zip(&self.basis) {
            res = &res + &b.mul_coeff(c);
        }
        Ok(res)
    }

    /// Sample an element with random coordinates in `[-5, 5)`.
    pub fn random_element(&self, rng: &mut impl RngCore) -> MultivariatePolynomial<F> {
        let field = self.structure.ring().field();
        let mut res = self.structure.ring().zero();
        for b in &self.basis {
            res = &res + &b.mul_coeff(&field.sample(rng, (-5, 5)));
        }
        res
    }

    /// Get the matrix of the linear map `phi` from the module to itself.
    /// Column `j` holds the coordinates of the image of basis element `j`.
    pub fn matrix_representation(
        &self,
        phi: impl Fn(&MultivariatePolynomial<F>) -> Result<MultivariatePolynomial<F>>,
    ) -> Result<Matrix<F>> {
        linear_map_matrix(self, self, phi)
    }

    /// Get, for every basis element `g` of the base ring, the matrix of multiplication by `g`.
    pub fn matrices_representation(&self) -> Result<Vec<Matrix<F>>> {
        self.base
            .basis()
            .iter()
            .map(|g| self.matrix_representation(|f| g.checked_mul(f)))
            .collect()
    }

    /// The constraints for an `n x n` matrix to be a module endomorphism, with
    /// `n` the dimension of the module.
    pub fn endomorphism_constraints(&self) -> Result<SparseMatrix<F>> {
        let actions = self.matrices_representation()?;
        hom_constraints(
            self.dim(),
            self.dim(),
            &actions,
            &actions,
            self.structure.ring().field(),
        )
    }
}

impl<F: Field> Display for QuotientModule<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.top {
            Some(top) => write!(f, "{}/{}", top, self.structure),
            None => write!(f, "{}/{}", self.structure.ring(), self.structure),
        }
    }
}

/// Get the matrix of a linear map `phi: source -> target`. The modules may be defined
/// over different base rings. Column `j` holds the coordinates of the image of
/// basis element `j` of `source`.
pub fn linear_map_matrix<F: Field>(
    source: &QuotientModule<F>,
    target: &QuotientModule<F>,
    phi: impl Fn(&MultivariatePolynomial<F>) -> Result<MultivariatePolynomial<F>>,
) -> Result<Matrix<F>> {
    let field = source.structure.ring().field().clone();
    let mut m = Matrix::new(target.dim() as u32, source.dim() as u32, field);

    for (j, b) in source.basis.iter().enumerate() {
        let coords = target.to_basis(&phi(b)?)?;
        for (i, c) in coords.into_iter().enumerate() {
            m[(i as u32, j as u32)] = c;
        }
    }

    Ok(m)
}
