//! Sparse matrices for large linear constraint systems.
//!
//! Constraint systems are tall and narrow: many more rows than columns, and every
//! row has only a handful of non-zero entries. Rows are stored as lists of
//! `(column, coefficient)` pairs sorted by column.

use ahash::AHashSet;
use tracing::{debug, instrument};

use crate::domains::{Field, Ring};

use super::matrix::{Matrix, MatrixError};

/// A sparse row: `(column, coefficient)` pairs sorted by column, without zeros.
pub type SparseRow<E> = Vec<(u32, E)>;

/// A sparse matrix without zero rows.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SparseMatrix<F: Ring> {
    rows: Vec<SparseRow<F::Element>>,
    ncols: u32,
    field: F,
}

/// Compute `a - s * b` for two sorted sparse rows.
fn sub_scaled<F: Ring>(
    a: &[(u32, F::Element)],
    b: &[(u32, F::Element)],
    s: &F::Element,
    field: &F,
) -> SparseRow<F::Element> {
    let mut res = Vec::with_capacity(a.len() + b.len());

    let (mut i, mut j) = (0, 0);
    while i < a.len() || j < b.len() {
        if j == b.len() || (i < a.len() && a[i].0 < b[j].0) {
            res.push(a[i].clone());
            i += 1;
        } else if i == a.len() || b[j].0 < a[i].0 {
            let c = field.neg(&field.mul(s, &b[j].1));
            if !F::is_zero(&c) {
                res.push((b[j].0, c));
            }
            j += 1;
        } else {
            let mut c = a[i].1.clone();
            field.sub_mul_assign(&mut c, s, &b[j].1);
            if !F::is_zero(&c) {
                res.push((a[i].0, c));
            }
            i += 1;
            j += 1;
        }
    }

    res
}

impl<F: Ring> SparseMatrix<F> {
    /// Create a matrix with `ncols` columns and no rows.
    pub fn new(ncols: u32, field: F) -> SparseMatrix<F> {
        SparseMatrix {
            rows: vec![],
            ncols,
            field,
        }
    }

    /// Return the number of stored rows.
    pub fn nrows(&self) -> usize {
        self.rows.len()
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn rows(&self) -> &[SparseRow<F::Element>] {
        &self.rows
    }

    /// Add a row given as `(column, coefficient)` pairs in any order. Entries in the
    /// same column are added, zeros are dropped and a row that ends up empty is not
    /// stored. Returns `true` if the row was stored.
    pub fn push_row(&mut self, mut row: Vec<(u32, F::Element)>) -> Result<bool, MatrixError> {
        if let Some((c, _)) = row.iter().find(|(c, _)| *c >= self.ncols) {
            return Err(MatrixError::ShapeMismatch(format!(
                "column {} is out of bounds for a matrix with {} columns",
                c, self.ncols
            )));
        }

        row.sort_by_key(|(c, _)| *c);

        let mut merged: SparseRow<F::Element> = Vec::with_capacity(row.len());
        for (c, e) in row {
            match merged.last_mut() {
                Some((lc, le)) if *lc == c => self.field.add_assign(le, &e),
                _ => merged.push((c, e)),
            }
        }
        merged.retain(|(_, e)| !F::is_zero(e));

        if merged.is_empty() {
            Ok(false)
        } else {
            self.rows.push(merged);
            Ok(true)
        }
    }

    /// Append the rows of `block`, shifting its columns by `offset`. The other
    /// columns of the new rows are zero.
    pub fn push_block(&mut self, block: &SparseMatrix<F>, offset: u32) -> Result<(), MatrixError> {
        if offset as usize + block.ncols() > self.ncols() {
            return Err(MatrixError::ShapeMismatch(format!(
                "block with {} columns at offset {} does not fit in {} columns",
                block.ncols, offset, self.ncols
            )));
        }

        for r in &block.rows {
            self.rows
                .push(r.iter().map(|(c, e)| (c + offset, e.clone())).collect());
        }
        Ok(())
    }

    /// Remove duplicate rows, keeping the first occurrence. Returns the number of removed rows.
    pub fn dedup(&mut self) -> usize {
        let n = self.rows.len();
        let mut seen = AHashSet::with_capacity(n);
        self.rows.retain(|r| seen.insert(r.clone()));
        n - self.rows.len()
    }

    /// Convert to a dense matrix.
    pub fn to_dense(&self) -> Matrix<F> {
        let mut m = Matrix::new(self.rows.len() as u32, self.ncols, self.field.clone());
        for (i, r) in self.rows.iter().enumerate() {
            for (c, e) in r {
                m[(i as u32, *c)] = e.clone();
            }
        }
        m
    }

    /// Evaluate `A v` for a dense vector `v`.
    pub fn apply(&self, v: &[F::Element]) -> Vec<F::Element> {
        debug_assert_eq!(v.len(), self.ncols());
        self.rows
            .iter()
            .map(|r| {
                let mut acc = self.field.zero();
                for (c, e) in r {
                    self.field.add_mul_assign(&mut acc, e, &v[*c as usize]);
                }
                acc
            })
            .collect()
    }
}

impl<F: Field> SparseMatrix<F> {
    /// Bring the rows into echelon form one at a time. Entry `c` of the result is the
    /// row with pivot column `c`, normalized to a leading one.
    fn echelon(&self) -> Vec<Option<SparseRow<F::Element>>> {
        let field = &self.field;
        let mut pivots: Vec<Option<SparseRow<F::Element>>> = vec![None; self.ncols()];

        for row in &self.rows {
            let mut r = row.clone();
            while let Some(c) = r.first().map(|(c, _)| *c as usize) {
                if let Some(p) = &pivots[c] {
                    let s = r[0].1.clone();
                    r = sub_scaled(&r, p, &s, field);
                    continue;
                }

                let inv = field.inv(&r[0].1);
                for (_, e) in &mut r[1..] {
                    field.mul_assign(e, &inv);
                }
                r[0].1 = field.one();
                pivots[c] = Some(r);
                break;
            }
        }

        pivots
    }

    /// Get the rank of the matrix. Exact fields use sparse elimination, inexact fields
    /// dense elimination with partial pivoting.
    #[instrument(level = "debug", skip_all, fields(nrows = self.nrows(), ncols = self.ncols()))]
    pub fn rank(&self) -> usize {
        let rank = if self.field.is_exact() {
            self.echelon().iter().filter(|p| p.is_some()).count()
        } else {
            self.to_dense().rank()
        };
        debug!("Rank {}", rank);
        rank
    }

    /// Compute a basis of the null space. Every row of the returned matrix is a basis vector.
    #[instrument(level = "debug", skip_all, fields(nrows = self.nrows(), ncols = self.ncols()))]
    pub fn null_space(&self) -> Matrix<F> {
        if !self.field.is_exact() {
            return self.to_dense().null_space();
        }

        let field = &self.field;
        let mut pivots = self.echelon();

        // back substitution, from the last pivot up
        for c in (0..self.ncols()).rev() {
            let Some(mut r) = pivots[c].take() else {
                continue;
            };

            while let Some((j, s)) = r[1..]
                .iter()
                .find(|(j, _)| pivots[*j as usize].is_some())
                .cloned()
            {
                if let Some(p) = &pivots[j as usize] {
                    r = sub_scaled(&r, p, &s, field);
                }
            }

            pivots[c] = Some(r);
        }

        let mut free_index = vec![None; self.ncols()];
        let mut nullity = 0;
        for (c, p) in pivots.iter().enumerate() {
            if p.is_none() {
                free_index[c] = Some(nullity);
                nullity += 1;
            }
        }
        debug!("Nullity {}", nullity);

        let mut basis = Matrix::new(nullity, self.ncols, field.clone());
        for (c, f) in free_index.iter().enumerate() {
            if let Some(f) = f {
                basis[(*f, c as u32)] = field.one();
            }
        }
        for (c, p) in pivots.iter().enumerate() {
            if let Some(r) = p {
                for (j, e) in &r[1..] {
                    if let Some(f) = free_index[*j as usize] {
                        basis[(f, c as u32)] = field.neg(e);
                    }
                }
            }
        }

        basis
    }
}

#[cfg(test)]
mod test {
    use crate::domains::float::{FloatField, F64};
    use crate::domains::rational::Q;
    use crate::domains::Ring;
    use crate::tensors::matrix::MatrixError;

    use super::SparseMatrix;

    #[test]
    fn construction() {
        let mut m = SparseMatrix::new(4, Q);
        assert!(m
            .push_row(vec![(2, Q.nth(1)), (0, Q.nth(3)), (2, Q.nth(-1))])
            .unwrap());
        assert!(!m.push_row(vec![(1, Q.nth(2)), (1, Q.nth(-2))]).unwrap());
        assert!(m.push_row(vec![(0, Q.nth(3))]).unwrap());
        assert_eq!(m.nrows(), 2);
        assert_eq!(m.rows()[0], vec![(0, Q.nth(3))]);
        assert_eq!(m.dedup(), 1);

        assert!(matches!(
            m.push_row(vec![(4, Q.nth(1))]),
            Err(MatrixError::ShapeMismatch(_))
        ));

        let mut big = SparseMatrix::new(6, Q);
        big.push_block(&m, 2).unwrap();
        assert_eq!(big.rows()[0], vec![(2, Q.nth(3))]);
        assert!(big.push_block(&m, 3).is_err());
    }

    #[test]
    fn rank_and_null_space() {
        let mut m = SparseMatrix::new(4, Q);
        m.push_row(vec![(0, Q.nth(1)), (1, Q.nth(2)), (3, Q.nth(1))])
            .unwrap();
        m.push_row(vec![(0, Q.nth(2)), (1, Q.nth(4)), (3, Q.nth(2))])
            .unwrap();
        m.push_row(vec![(1, Q.nth(1)), (2, Q.nth(-1))]).unwrap();

        assert_eq!(m.rank(), 2);
        assert_eq!(m.rank(), m.to_dense().rank());

        let n = m.null_space();
        assert_eq!(n.nrows(), 2);
        for v in n.row_iter() {
            assert!(m.apply(v).iter().all(|e| Q::is_zero(e)));
        }
    }

    #[test]
    fn float_null_space() {
        let mut m = SparseMatrix::new(3, FloatField);
        m.push_row(vec![(0, F64::from(0.5)), (2, F64::from(1.))])
            .unwrap();
        m.push_row(vec![(1, F64::from(3.)), (2, F64::from(-1.5))])
            .unwrap();

        assert_eq!(m.rank(), 2);
        let n = m.null_space();
        assert_eq!(n.nrows(), 1);
        for v in n.row_iter() {
            assert!(m.apply(v).iter().all(|e| FloatField::is_zero(e)));
        }
    }
}
