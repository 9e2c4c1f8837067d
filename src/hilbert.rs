//! Tangent spaces of Hilbert schemes of points.
//!
//! For a zero-dimensional ideal `I` of `R`, the tangent space of the Hilbert
//! scheme at the point `[R/I]` is `Hom_S(I/I², R/I)` with `S = R/I`.
//!
//! ```
//! use hilbert_tangent::domains::rational::Q;
//! use hilbert_tangent::hilbert::HilbertScheme;
//! use hilbert_tangent::ideal::Ideal;
//! use hilbert_tangent::poly::{polynomial::PolynomialRing, MonomialOrder};
//!
//! let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
//! let i = Ideal::parse(&r, &["x^2", "x*y", "y^2"]).unwrap();
//! let t = HilbertScheme::new(&r).tangent_space(&i).unwrap();
//! assert_eq!(t.dim().unwrap(), 6);
//! ```

use std::sync::Arc;

use tracing::{debug, instrument};

use crate::domains::Field;
use crate::error::{AlgebraError, Result};
use crate::hom::HomSpace;
use crate::ideal::Ideal;
use crate::module::{QuotientModule, QuotientRing};
use crate::poly::polynomial::PolynomialRing;
use crate::tensors::matrix::Matrix;
use crate::tensors::sparse::SparseMatrix;

/// The Hilbert scheme of points of the affine space with coordinate ring `ring`.
#[derive(Clone, Debug)]
pub struct HilbertScheme<F: Field> {
    ring: PolynomialRing<F>,
}

impl<F: Field> HilbertScheme<F> {
    pub fn new(ring: &PolynomialRing<F>) -> HilbertScheme<F> {
        HilbertScheme { ring: ring.clone() }
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F> {
        &self.ring
    }

    /// The tangent space at the point given by `ideal`, which must be an ideal of the ring.
    pub fn tangent_space(&self, ideal: &Ideal<F>) -> Result<TangentSpace<F>> {
        if !self.ring.is_compatible(ideal.ring()) {
            return Err(AlgebraError::MismatchedContext(format!(
                "the ideal {} of {} is not an ideal of {}",
                ideal,
                ideal.ring(),
                self.ring
            )));
        }

        TangentSpace::new(ideal)
    }
}

/// The tangent space `Hom_S(I/I², R/I)` of a Hilbert scheme at `I`.
#[derive(Debug)]
pub struct TangentSpace<F: Field> {
    ideal: Ideal<F>,
    base: Arc<QuotientRing<F>>,
    conormal: Arc<QuotientModule<F>>,
    structure_sheaf: Arc<QuotientModule<F>>,
    hom: HomSpace<F>,
}

impl<F: Field> TangentSpace<F> {
    /// Build the modules for the tangent space at `ideal`. Fails with
    /// [AlgebraError::InfiniteDimension] if `ideal` is not zero-dimensional.
    #[instrument(level = "debug", skip_all, fields(ideal = %ideal))]
    pub fn new(ideal: &Ideal<F>) -> Result<TangentSpace<F>> {
        let base = Arc::new(QuotientRing::new(ideal.clone())?);
        let square = ideal.power(2)?;
        let conormal = Arc::new(QuotientModule::ideal_quotient(&base, ideal, &square)?);
        let structure_sheaf = Arc::new(QuotientModule::ring_quotient(&base, ideal)?);
        let hom = HomSpace::new(conormal.clone(), structure_sheaf.clone())?;

        debug!(
            "Tangent space at a point of length {} with conormal module of dimension {}",
            base.dim(),
            conormal.dim()
        );

        Ok(TangentSpace {
            ideal: ideal.clone(),
            base,
            conormal,
            structure_sheaf,
            hom,
        })
    }

    #[inline]
    pub fn ideal(&self) -> &Ideal<F> {
        &self.ideal
    }

    /// The ring `S = R/I` that the modules are defined over.
    #[inline]
    pub fn base_ring(&self) -> &Arc<QuotientRing<F>> {
        &self.base
    }

    /// The conormal module `I/I²`.
    #[inline]
    pub fn conormal_module(&self) -> &Arc<QuotientModule<F>> {
        &self.conormal
    }

    /// The module `R/I`.
    #[inline]
    pub fn structure_module(&self) -> &Arc<QuotientModule<F>> {
        &self.structure_sheaf
    }

    #[inline]
    pub fn hom_space(&self) -> &HomSpace<F> {
        &self.hom
    }

    /// The length of the subscheme, `dim R/I`.
    pub fn length(&self) -> usize {
        self.base.dim()
    }

    /// The number of unknowns in the constraint system, `dim I/I² * dim R/I`.
    pub fn unknowns(&self) -> usize {
        self.conormal.dim() * self.structure_sheaf.dim()
    }

    /// The constraints on an `n x m` matrix to be a module homomorphism `I/I² -> R/I`.
    pub fn constraints(&self) -> Result<&SparseMatrix<F>> {
        self.hom.constraints()
    }

    pub fn dim(&self) -> Result<usize> {
        self.hom.dim()
    }

    /// A basis of the tangent space, as matrices from `I/I²` to `R/I`.
    pub fn basis(&self) -> Result<Vec<Matrix<F>>> {
        self.hom.basis()
    }
}

#[cfg(test)]
mod test {
    use crate::domains::float::ComplexField;
    use crate::domains::rational::Q;
    use crate::error::AlgebraError;
    use crate::ideal::Ideal;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::MonomialOrder;

    use super::HilbertScheme;

    #[test]
    fn plane_points() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let hilb = HilbertScheme::new(&r);

        // the Hilbert scheme of points in the plane is smooth of dimension 2n
        for (gens, dim) in [
            (vec!["x", "y"], 2),
            (vec!["x^2", "y"], 4),
            (vec!["x^2", "x*y", "y^2"], 6),
            (vec!["x^3", "x*y", "y^2"], 8),
            (vec!["x^2 - y", "y^2"], 8),
        ] {
            let i = Ideal::parse(&r, &gens).unwrap();
            let t = hilb.tangent_space(&i).unwrap();
            assert_eq!(t.dim().unwrap(), dim);
            assert_eq!(t.dim().unwrap() + t.constraints().unwrap().rank(), t.unknowns());
        }
    }

    #[test]
    fn line_points() {
        let r = PolynomialRing::new(Q, 1, MonomialOrder::Lex);
        let hilb = HilbertScheme::new(&r);
        for n in 1..5 {
            let i = Ideal::parse(&r, &[format!("x^{}", n)]).unwrap();
            let t = hilb.tangent_space(&i).unwrap();
            assert_eq!(t.length(), n);
            assert_eq!(t.dim().unwrap(), n);
        }
    }

    #[test]
    fn square_of_maximal_ideal() {
        let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
        let i = Ideal::parse(&r, &["x", "y", "z"]).unwrap().power(2).unwrap();
        let t = HilbertScheme::new(&r).tangent_space(&i).unwrap();
        assert_eq!(t.length(), 4);
        assert_eq!(t.dim().unwrap(), 18);
    }

    #[test]
    fn complex_coefficients() {
        let r = PolynomialRing::new(ComplexField, 2, MonomialOrder::GrevLex);
        let i = Ideal::parse(&r, &["x^2", "y"]).unwrap();
        let t = HilbertScheme::new(&r).tangent_space(&i).unwrap();
        assert_eq!(t.dim().unwrap(), 4);
        assert_eq!(t.basis().unwrap().len(), 4);
    }

    #[test]
    fn wrong_ring() {
        let r2 = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let r3 = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
        let i = Ideal::parse(&r3, &["x", "y", "z"]).unwrap();
        assert!(matches!(
            HilbertScheme::new(&r2).tangent_space(&i),
            Err(AlgebraError::MismatchedContext(_))
        ));

        let line = Ideal::parse(&r2, &["x"]).unwrap();
        assert!(matches!(
            HilbertScheme::new(&r2).tangent_space(&line),
            Err(AlgebraError::InfiniteDimension { .. })
        ));
    }
}
