//! Spaces of module homomorphisms.
//!
//! A homomorphism `H: M -> N` between modules over the same finite-dimensional ring
//! `S` is an `n x m` matrix that commutes with the action of every basis element `f`
//! of `S`: `H * FM[f] = FN[f] * H`, where `FM[f]` and `FN[f]` are the matrices of
//! multiplication by `f` on `M` and `N`. These equations are linear in the entries of
//! `H`, so the homomorphisms form the null space of a constraint matrix.

use std::fmt::Display;
use std::sync::Arc;

use once_cell::sync::OnceCell;
use tracing::{debug, instrument};

use crate::domains::Field;
use crate::error::{AlgebraError, Result};
use crate::module::QuotientModule;
use crate::poly::polynomial::MultivariatePolynomial;
use crate::tensors::matrix::Matrix;
use crate::tensors::sparse::SparseMatrix;

/// Build the constraints for an `n x m` matrix `H`, flattened in row-major order, to
/// satisfy `H * FM[f] = FN[f] * H` for every `f`.
///
/// The constraint for `(f, i, j)` reads
/// `sum_l H[i][l] FM[f][l][j] - sum_l FN[f][i][l] H[l][j] = 0`.
/// Zero rows and duplicate rows are dropped.
#[instrument(level = "debug", skip_all, fields(m = m, n = n, k = fm.len()))]
pub fn hom_constraints<F: Field>(
    m: usize,
    n: usize,
    fm: &[Matrix<F>],
    fnn: &[Matrix<F>],
    field: &F,
) -> Result<SparseMatrix<F>> {
    if fm.len() != fnn.len() {
        return Err(AlgebraError::InvalidShape(format!(
            "{} action matrices for the source but {} for the target",
            fm.len(),
            fnn.len()
        )));
    }
    for (a, b) in fm.iter().zip(fnn) {
        if a.nrows() != m || a.ncols() != m || b.nrows() != n || b.ncols() != n {
            return Err(AlgebraError::InvalidShape(format!(
                "action matrices of shape ({},{}) and ({},{}) for modules of dimension {} and {}",
                a.nrows(),
                a.ncols(),
                b.nrows(),
                b.ncols(),
                m,
                n
            )));
        }
    }

    let mut c = SparseMatrix::new((n * m) as u32, field.clone());
    let mut dropped = 0;
    for (a, b) in fm.iter().zip(fnn) {
        for i in 0..n {
            for j in 0..m {
                let mut row = Vec::with_capacity(m + n);
                for l in 0..m {
                    row.push(((i * m + l) as u32, a[(l as u32, j as u32)].clone()));
                }
                for l in 0..n {
                    row.push(((l * m + j) as u32, field.neg(&b[(i as u32, l as u32)])));
                }

                if !c.push_row(row)? {
                    dropped += 1;
                }
            }
        }
    }
    let duplicates = c.dedup();

    debug!(
        "Constraint matrix of shape ({}, {}), dropped {} zero rows and {} duplicates",
        c.nrows(),
        c.ncols(),
        dropped,
        duplicates
    );
    Ok(c)
}

/// The size of a Hom-space computation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct HomComplexity {
    /// The dimension of the base ring.
    pub k: usize,
    /// The dimension of the source.
    pub m: usize,
    /// The dimension of the target.
    pub n: usize,
    /// The number of entries of the unreduced dense constraint matrix.
    pub entries: usize,
}

impl Display for HomComplexity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "k = {}, m = {}, n = {}, total matrix entries: {}",
            self.k, self.m, self.n, self.entries
        )
    }
}

/// The space of module homomorphisms from `source` to `target`.
#[derive(Debug)]
pub struct HomSpace<F: Field> {
    source: Arc<QuotientModule<F>>,
    target: Arc<QuotientModule<F>>,
    constraints: OnceCell<SparseMatrix<F>>,
}

impl<F: Field> HomSpace<F> {
    /// Create the Hom-space. Both modules must be defined over the same base ring.
    pub fn new(
        source: Arc<QuotientModule<F>>,
        target: Arc<QuotientModule<F>>,
    ) -> Result<HomSpace<F>> {
        if source.base_ring() != target.base_ring() {
            return Err(AlgebraError::MismatchedContext(format!(
                "modules over {} and {}",
                source.base_ring(),
                target.base_ring()
            )));
        }

        Ok(HomSpace {
            source,
            target,
            constraints: OnceCell::new(),
        })
    }

    #[inline]
    pub fn source(&self) -> &Arc<QuotientModule<F>> {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &Arc<QuotientModule<F>> {
        &self.target
    }

    /// The dimensions involved in the computation.
    pub fn complexity(&self) -> HomComplexity {
        let k = self.source.base_ring().dim();
        let m = self.source.dim();
        let n = self.target.dim();
        let c = HomComplexity {
            k,
            m,
            n,
            entries: k * m * n * m * n,
        };
        debug!("Hom-space complexity: {}", c);
        c
    }

    /// The constraint matrix whose null space is the Hom-space, computed once.
    pub fn constraints(&self) -> Result<&SparseMatrix<F>> {
        self.constraints.get_or_try_init(|| {
            let fm = self.source.matrices_representation()?;
            let fnn = self.target.matrices_representation()?;
            hom_constraints(
                self.source.dim(),
                self.target.dim(),
                &fm,
                &fnn,
                self.source.structure_ideal().ring().field(),
            )
        })
    }

    /// The rank of the constraint matrix.
    pub fn rank(&self) -> Result<usize> {
        Ok(self.constraints()?.rank())
    }

    /// The dimension of the Hom-space, `m * n - rank`.
    pub fn dim(&self) -> Result<usize> {
        Ok(self.source.dim() * self.target.dim() - self.rank()?)
    }

    /// A basis of the Hom-space, as `n x m` matrices.
    pub fn basis(&self) -> Result<Vec<Matrix<F>>> {
        let m = self.source.dim() as u32;
        let n = self.target.dim() as u32;
        let null = self.constraints()?.null_space();

        null.row_iter()
            .take(null.nrows())
            .map(|v| {
                Matrix::from_linear(v.to_vec(), n, m, null.field().clone())
                    .map_err(AlgebraError::from)
            })
            .collect()
    }

    /// A basis of the Hom-space, as morphisms that can be applied to module elements.
    pub fn morphisms(&self) -> Result<Vec<ModuleMorphism<F>>> {
        Ok(self
            .basis()?
            .into_iter()
            .map(|matrix| ModuleMorphism {
                source: self.source.clone(),
                target: self.target.clone(),
                matrix,
            })
            .collect())
    }
}

/// A module homomorphism given by its matrix in the bases of the source and target.
#[derive(Clone, Debug)]
pub struct ModuleMorphism<F: Field> {
    source: Arc<QuotientModule<F>>,
    target: Arc<QuotientModule<F>>,
    matrix: Matrix<F>,
}

impl<F: Field> ModuleMorphism<F> {
    #[inline]
    pub fn matrix(&self) -> &Matrix<F> {
        &self.matrix
    }

    #[inline]
    pub fn source(&self) -> &Arc<QuotientModule<F>> {
        &self.source
    }

    #[inline]
    pub fn target(&self) -> &Arc<QuotientModule<F>> {
        &self.target
    }

    /// Apply the morphism to an element of the source.
    pub fn apply(&self, f: &MultivariatePolynomial<F>) -> Result<MultivariatePolynomial<F>> {
        let coords = self.source.to_basis(f)?;
        let v = Matrix::from_linear(
            coords,
            self.source.dim() as u32,
            1,
            self.matrix.field().clone(),
        )?;
        let image = self.matrix.checked_mul(&v)?;
        self.target.from_basis(&image.data)
    }
}

#[cfg(test)]
mod test {
    use std::sync::Arc;

    use crate::domains::float::FloatField;
    use crate::domains::rational::Q;
    use crate::error::AlgebraError;
    use crate::ideal::Ideal;
    use crate::module::{QuotientModule, QuotientRing};
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::MonomialOrder;

    use super::HomSpace;

    #[test]
    fn conormal_to_quotient() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let i = Ideal::parse(&r, &["x^2", "y"]).unwrap();
        let s = Arc::new(QuotientRing::new(i.clone()).unwrap());
        let j = Arc::new(QuotientModule::ideal_quotient(&s, &i, &i.power(2).unwrap()).unwrap());
        let o = Arc::new(QuotientModule::ring_quotient(&s, &i).unwrap());

        let hom = HomSpace::new(j.clone(), o.clone()).unwrap();
        let c = hom.complexity();
        assert_eq!((c.k, c.m, c.n), (2, 4, 2));

        let dim = hom.dim().unwrap();
        assert_eq!(dim, 4);
        assert_eq!(dim + hom.rank().unwrap(), c.m * c.n);

        let actions_j = j.matrices_representation().unwrap();
        let actions_o = o.matrices_representation().unwrap();
        let basis = hom.basis().unwrap();
        assert_eq!(basis.len(), dim);
        for h in &basis {
            for (a, b) in actions_j.iter().zip(&actions_o) {
                assert_eq!(&(h * a), &(b * h));
            }
        }

        // morphisms are S-linear
        let x = r.variable(0);
        for phi in hom.morphisms().unwrap() {
            for e in j.basis() {
                let lhs = phi.apply(&(&x * e)).unwrap();
                let rhs = o
                    .structure_ideal()
                    .normal_form(&(&x * &phi.apply(e).unwrap()))
                    .unwrap();
                assert_eq!(lhs, rhs);
            }
        }
    }

    #[test]
    fn float_mode() {
        let r = PolynomialRing::new(FloatField, 2, MonomialOrder::GrevLex);
        let i = Ideal::parse(&r, &["x^2", "x*y", "y^2"]).unwrap();
        let s = Arc::new(QuotientRing::new(i.clone()).unwrap());
        let j = Arc::new(QuotientModule::ideal_quotient(&s, &i, &i.power(2).unwrap()).unwrap());
        let o = Arc::new(QuotientModule::ring_quotient(&s, &i).unwrap());

        let hom = HomSpace::new(j, o).unwrap();
        assert_eq!(hom.dim().unwrap(), 6);
        for h in hom.basis().unwrap() {
            assert_eq!(h.nrows(), 3);
        }
    }

    #[test]
    fn different_base_rings() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let i1 = Ideal::parse(&r, &["x", "y"]).unwrap();
        let i2 = Ideal::parse(&r, &["x^2", "y"]).unwrap();
        let s1 = Arc::new(QuotientRing::new(i1.clone()).unwrap());
        let s2 = Arc::new(QuotientRing::new(i2.clone()).unwrap());
        let o1 = Arc::new(QuotientModule::ring_quotient(&s1, &i1).unwrap());
        let o2 = Arc::new(QuotientModule::ring_quotient(&s2, &i2).unwrap());

        assert!(matches!(
            HomSpace::new(o1, o2),
            Err(AlgebraError::MismatchedContext(_))
        ));
    }
}
