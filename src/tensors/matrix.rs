use std::{
    fmt::Display,
    ops::{Add, Index, IndexMut, Mul, Neg, Sub},
    slice::Chunks,
};

use crate::{
    domains::{Field, Ring},
    error::AlgebraError,
    printer::MatrixPrinter,
};

/// A matrix with entries that are elements of a ring `F`, stored in row-major order.
#[derive(Clone, Hash, PartialEq, Eq, Debug)]
pub struct Matrix<F: Ring> {
    pub(crate) data: Vec<F::Element>,
    pub(crate) nrows: u32,
    pub(crate) ncols: u32,
    pub(crate) field: F,
}

impl<F: Ring> Matrix<F> {
    /// Create a new zeroed matrix with `nrows` rows and `ncols` columns.
    pub fn new(nrows: u32, ncols: u32, field: F) -> Matrix<F> {
        Matrix {
            data: (0..nrows as usize * ncols as usize)
                .map(|_| field.zero())
                .collect(),
            nrows,
            ncols,
            field,
        }
    }

    /// Convert a linear representation of a matrix to a `Matrix`.
    pub fn from_linear(
        data: Vec<F::Element>,
        nrows: u32,
        ncols: u32,
        field: F,
    ) -> Result<Matrix<F>, MatrixError> {
        if data.len() == nrows as usize * ncols as usize {
            Ok(Matrix {
                data,
                nrows,
                ncols,
                field,
            })
        } else {
            Err(MatrixError::ShapeMismatch(format!(
                "data length does not match matrix dimensions: {} vs ({},{})",
                data.len(),
                nrows,
                ncols
            )))
        }
    }

    /// Create a new matrix from a 2-dimensional vector of scalars.
    pub fn from_nested_vec(matrix: Vec<Vec<F::Element>>, field: F) -> Result<Matrix<F>, MatrixError> {
        let mut data = vec![];

        let nrows = matrix.len();
        let cols = matrix.first().map(|r| r.len()).unwrap_or(0);

        for d in matrix {
            if d.len() != cols {
                return Err(MatrixError::NotRectangular);
            }

            data.extend(d);
        }

        Ok(Matrix {
            nrows: nrows as u32,
            ncols: cols as u32,
            data,
            field,
        })
    }

    /// Return the number of rows.
    pub fn nrows(&self) -> usize {
        self.nrows as usize
    }

    /// Return the number of columns.
    pub fn ncols(&self) -> usize {
        self.ncols as usize
    }

    /// Return the field of the matrix entries.
    pub fn field(&self) -> &F {
        &self.field
    }

    /// Return an iterator over the rows of the matrix.
    pub fn row_iter(&self) -> Chunks<'_, F::Element> {
        self.data.chunks(self.ncols.max(1) as usize)
    }

    /// Get a copy of column `j`.
    pub fn column(&self, j: u32) -> Vec<F::Element> {
        (0..self.nrows).map(|i| self[(i, j)].clone()).collect()
    }

    /// Return true iff every entry in the matrix is zero.
    pub fn is_zero(&self) -> bool {
        self.data.iter().all(|e| F::is_zero(e))
    }

    /// Transpose the matrix.
    pub fn transpose(&self) -> Matrix<F> {
        let mut m = Matrix::new(self.ncols, self.nrows, self.field.clone());
        for i in 0..self.nrows {
            for j in 0..self.ncols {
                m[(j, i)] = self[(i, j)].clone();
            }
        }
        m
    }

    /// Compute the product `self * rhs`, checking the dimensions.
    pub fn checked_mul(&self, rhs: &Matrix<F>) -> Result<Matrix<F>, MatrixError> {
        if self.ncols != rhs.nrows {
            return Err(MatrixError::ShapeMismatch(format!(
                "cannot multiply ({},{}) and ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            )));
        }

        let mut m = Matrix::new(self.nrows, rhs.ncols, self.field.clone());

        for i in 0..self.nrows {
            for k in 0..self.ncols {
                if F::is_exactly_zero(&self[(i, k)]) {
                    continue;
                }
                for j in 0..rhs.ncols {
                    let mut e = std::mem::replace(&mut m[(i, j)], self.field.zero());
                    self.field.add_mul_assign(&mut e, &self[(i, k)], &rhs[(k, j)]);
                    m[(i, j)] = e;
                }
            }
        }

        Ok(m)
    }

    /// Test if two matrices are equal, using the tolerance of the field for inexact fields.
    pub fn approx_eq(&self, other: &Matrix<F>) -> bool {
        self.nrows == other.nrows
            && self.ncols == other.ncols
            && self
                .data
                .iter()
                .zip(&other.data)
                .all(|(a, b)| F::is_zero(&self.field.sub(a, b)))
    }
}

impl<F: Ring> Index<u32> for Matrix<F> {
    type Output = [F::Element];

    /// Get the `index`th row of the matrix.
    #[inline]
    fn index(&self, index: u32) -> &Self::Output {
        &self.data[index as usize * self.ncols as usize..(index as usize + 1) * self.ncols as usize]
    }
}

impl<F: Ring> Index<(u32, u32)> for Matrix<F> {
    type Output = F::Element;

    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index(&self, index: (u32, u32)) -> &Self::Output {
        &self.data[index.0 as usize * self.ncols as usize + index.1 as usize]
    }
}

impl<F: Ring> IndexMut<(u32, u32)> for Matrix<F> {
    /// Get the `i`th row and `j`th column of the matrix, where `index=(i,j)`.
    #[inline]
    fn index_mut(&mut self, index: (u32, u32)) -> &mut F::Element {
        &mut self.data[index.0 as usize * self.ncols as usize + index.1 as usize]
    }
}

impl<F: Ring> Display for Matrix<F> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        MatrixPrinter::new(self).fmt(f)
    }
}

impl<F: Ring> Add<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Add two matrices.
    fn add(self, rhs: &Matrix<F>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot add matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        Matrix {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| self.field.add(a, b))
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
            field: self.field.clone(),
        }
    }
}

impl<F: Ring> Sub<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Subtract two matrices.
    fn sub(self, rhs: &Matrix<F>) -> Self::Output {
        if self.nrows != rhs.nrows || self.ncols != rhs.ncols {
            panic!(
                "Cannot subtract matrices of different dimensions: ({},{}) vs ({},{})",
                self.nrows, self.ncols, rhs.nrows, rhs.ncols
            );
        }

        Matrix {
            data: self
                .data
                .iter()
                .zip(&rhs.data)
                .map(|(a, b)| self.field.sub(a, b))
                .collect(),
            nrows: self.nrows,
            ncols: self.ncols,
            field: self.field.clone(),
        }
    }
}

impl<F: Ring> Mul<&Matrix<F>> for &Matrix<F> {
    type Output = Matrix<F>;

    /// Multiply two matrices.
    fn mul(self, rhs: &Matrix<F>) -> Self::Output {
        match self.checked_mul(rhs) {
            Ok(m) => m,
            Err(e) => panic!("{}", e),
        }
    }
}

impl<F: Ring> Neg for Matrix<F> {
    type Output = Matrix<F>;

    /// Negate each entry of the matrix.
    fn neg(mut self) -> Self::Output {
        for e in &mut self.data {
            *e = self.field.neg(e);
        }

        self
    }
}

/// Errors that can occur when performing matrix operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MatrixError {
    ShapeMismatch(String),
    NotRectangular,
}

impl std::fmt::Display for MatrixError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MatrixError::ShapeMismatch(s) => {
                write!(f, "The shape of the matrix is not compatible: {}", s)
            }
            MatrixError::NotRectangular => write!(f, "The matrix is not rectangular"),
        }
    }
}

impl std::error::Error for MatrixError {}

impl From<MatrixError> for AlgebraError {
    fn from(e: MatrixError) -> Self {
        AlgebraError::InvalidShape(e.to_string())
    }
}

/// A decomposition `P * A = L * U` of an `n x m` matrix `A` with partial pivoting,
/// where `U` is in row echelon form.
///
/// `perm[i]` is the row of `A` that ends up in row `i`, `L` is an `n x k` unit lower
/// triangular matrix and `U` a `k x m` matrix, with `k = min(n, m)`.
#[derive(Clone, Debug)]
pub struct LuDecomposition<F: Ring> {
    pub perm: Vec<u32>,
    pub lower: Matrix<F>,
    pub upper: Matrix<F>,
    pub rank: usize,
}

impl<F: Field> Matrix<F> {
    /// Find the pivot in column `j`, at or below row `i`. Exact fields take the first non-zero
    /// entry, inexact fields the entry with the largest magnitude.
    fn find_pivot(&self, i: u32, j: u32) -> Option<u32> {
        if self.field.is_exact() {
            (i..self.nrows).find(|&k| !F::is_zero(&self[(k, j)]))
        } else {
            let mut best = None;
            let mut best_mag = 0.;
            for k in i..self.nrows {
                if F::is_zero(&self[(k, j)]) {
                    continue;
                }
                let mag = self.field.magnitude(&self[(k, j)]);
                if best.is_none() || mag > best_mag {
                    best = Some(k);
                    best_mag = mag;
                }
            }
            best
        }
    }

    /// Write the matrix in echelon form and return the rank. The row swaps are
    /// recorded in `perm` and the elimination multipliers in `lower`, if provided.
    fn gaussian_elimination(
        &mut self,
        max_col: u32,
        perm: &mut Vec<u32>,
        mut lower: Option<&mut Matrix<F>>,
    ) -> u32 {
        let zero = self.field.zero();
        *perm = (0..self.nrows).collect();

        if self.nrows == 0 {
            return 0;
        }

        let mut i = 0;
        for j in 0..max_col {
            let Some(k) = self.find_pivot(i, j) else {
                // clear the noise below a missing pivot
                for k in i..self.nrows {
                    self[(k, j)] = zero.clone();
                }
                continue;
            };

            if k != i {
                // Swap i-th row and k-th row.
                for l in 0..self.ncols {
                    self.data
                        .swap((self.ncols * i + l) as usize, (self.ncols * k + l) as usize);
                }
                perm.swap(i as usize, k as usize);
                if let Some(lower) = lower.as_deref_mut() {
                    for l in 0..i {
                        lower
                            .data
                            .swap((lower.ncols * i + l) as usize, (lower.ncols * k + l) as usize);
                    }
                }
            }

            let inv_x = self.field.inv(&self[(i, j)]);
            for k in i + 1..self.nrows {
                if !F::is_exactly_zero(&self[(k, j)]) {
                    let s = self.field.mul(&self[(k, j)], &inv_x);
                    self[(k, j)] = zero.clone();
                    for l in j + 1..self.ncols {
                        let mut e = std::mem::replace(&mut self[(k, l)], zero.clone());
                        self.field.sub_mul_assign(&mut e, &self[(i, l)], &s);
                        self[(k, l)] = e;
                    }
                    if let Some(lower) = lower.as_deref_mut() {
                        lower[(k, i)] = s;
                    }
                }
            }

            i += 1;
            if i >= self.nrows {
                break;
            }
        }

        i
    }

    /// Create a row-reduced matrix from a matrix in echelon form.
    fn back_substitution(&mut self, max_col: u32) {
        let field = self.field.clone();
        for i in (0..self.nrows).rev() {
            if let Some(j) = (0..max_col).find(|&j| !F::is_zero(&self[(i, j)])) {
                if !field.is_one(&self[(i, j)]) {
                    let inv_x = field.inv(&self[(i, j)]);

                    for k in j..self.ncols {
                        field.mul_assign(&mut self[(i, k)], &inv_x);
                    }
                }

                for k in 0..i {
                    if !F::is_exactly_zero(&self[(k, j)]) {
                        let scale = std::mem::replace(&mut self[(k, j)], field.zero());
                        for l in j + 1..self.ncols {
                            let mut e = std::mem::replace(&mut self[(k, l)], field.zero());
                            field.sub_mul_assign(&mut e, &self[(i, l)], &scale);
                            self[(k, l)] = e;
                        }
                    }
                }
            }
        }
    }

    /// Row-reduce the matrix in-place using Gaussian elimination and return the rank.
    pub fn row_reduce(&mut self) -> usize {
        let rank = self.gaussian_elimination(self.ncols, &mut vec![], None) as usize;
        self.back_substitution(self.ncols);
        rank
    }

    /// Get the rank of the matrix.
    pub fn rank(&self) -> usize {
        self.clone()
            .gaussian_elimination(self.ncols, &mut vec![], None) as usize
    }

    /// Compute the LU decomposition with partial pivoting.
    pub fn lu(&self) -> LuDecomposition<F> {
        let k = self.nrows.min(self.ncols);
        let mut u = self.clone();
        let mut lower = Matrix::new(self.nrows, k, self.field.clone());
        let mut perm = vec![];
        let rank = u.gaussian_elimination(self.ncols, &mut perm, Some(&mut lower)) as usize;

        for i in 0..k {
            lower[(i, i)] = self.field.one();
        }

        u.data.truncate(k as usize * self.ncols as usize);
        u.nrows = k;

        LuDecomposition {
            perm,
            lower,
            upper: u,
            rank,
        }
    }

    /// Compute a basis of the null space `{v | A v = 0}`. Every row of the
    /// returned matrix is a basis vector.
    ///
    /// Exact fields are reduced to reduced row echelon form directly, inexact
    /// fields use the upper factor of the LU decomposition.
    pub fn null_space(&self) -> Matrix<F> {
        let echelon = if self.field.is_exact() {
            let mut m = self.clone();
            m.gaussian_elimination(self.ncols, &mut vec![], None);
            m
        } else {
            self.lu().upper
        };

        echelon.null_space_from_echelon()
    }

    /// Compute the null space of a matrix in row echelon form, by back substitution
    /// followed by setting each free variable to one.
    fn null_space_from_echelon(mut self) -> Matrix<F> {
        self.back_substitution(self.ncols);

        let mut pivots = vec![];
        for i in 0..self.nrows {
            if let Some(j) = (0..self.ncols).find(|&j| !F::is_zero(&self[(i, j)])) {
                pivots.push((i, j));
            }
        }

        let mut is_pivot = vec![false; self.ncols as usize];
        for (_, j) in &pivots {
            is_pivot[*j as usize] = true;
        }

        let free: Vec<u32> = (0..self.ncols).filter(|j| !is_pivot[*j as usize]).collect();
        let mut basis = Matrix::new(free.len() as u32, self.ncols, self.field.clone());
        for (b, f) in free.iter().enumerate() {
            basis[(b as u32, *f)] = self.field.one();
            for (i, j) in &pivots {
                if !F::is_zero(&self[(*i, *f)]) {
                    basis[(b as u32, *j)] = self.field.neg(&self[(*i, *f)]);
                }
            }
        }

        basis
    }
}

#[cfg(test)]
mod test {
    use crate::{
        domains::{float::FloatField, float::F64, rational::Q, Ring},
        tensors::matrix::{Matrix, MatrixError},
    };

    #[test]
    fn basics() {
        let a = Matrix::from_linear((1..=6).map(|i| Q.nth(i)).collect(), 2, 3, Q).unwrap();

        assert_eq!(
            a.transpose().data,
            [1, 4, 2, 5, 3, 6].iter().map(|i| Q.nth(*i)).collect::<Vec<_>>()
        );
        assert!((&a - &a).is_zero());
        assert_eq!(&a[1], &[Q.nth(4), Q.nth(5), Q.nth(6)]);
        assert_eq!(a.column(2), vec![Q.nth(3), Q.nth(6)]);

        let b = Matrix::from_nested_vec(
            vec![
                vec![Q.nth(7), Q.nth(8)],
                vec![Q.nth(9), Q.nth(10)],
                vec![Q.nth(11), Q.nth(12)],
            ],
            Q,
        )
        .unwrap();

        let c = &a * &b;
        assert_eq!(
            c.data,
            vec![Q.nth(58), Q.nth(64), Q.nth(139), Q.nth(154)]
        );
        assert_eq!(c[(0, 1)], Q.nth(64));

        assert!(matches!(
            a.checked_mul(&a),
            Err(MatrixError::ShapeMismatch(_))
        ));
        assert!(matches!(
            Matrix::from_nested_vec(vec![vec![Q.nth(1)], vec![]], Q),
            Err(MatrixError::NotRectangular)
        ));
        assert_eq!(a.to_string(), "{{1,2,3},{4,5,6}}");
    }

    #[test]
    fn row_reduce() {
        let mut a = Matrix::from_linear((1..=9).map(|i| Q.nth(i)).collect(), 3, 3, Q).unwrap();

        assert_eq!(a.rank(), 2);
        assert_eq!(a.row_reduce(), 2);

        assert_eq!(
            a.data,
            [1, 0, -1, 0, 1, 2, 0, 0, 0]
                .iter()
                .map(|i| Q.nth(*i))
                .collect::<Vec<_>>()
        );
    }

    #[test]
    fn null_space() {
        let a = Matrix::from_linear(
            [1, 2, 3, 4, 2, 4, 6, 8, 1, 0, 1, 0]
                .iter()
                .map(|i| Q.nth(*i))
                .collect(),
            3,
            4,
            Q,
        )
        .unwrap();

        let n = a.null_space();
        assert_eq!(n.nrows(), 2);
        assert!((&a * &n.transpose()).is_zero());

        let empty = Matrix::new(0, 3, Q);
        assert_eq!(empty.rank(), 0);
        assert_eq!(empty.null_space().nrows(), 3);
    }

    #[test]
    fn lu() {
        let a = Matrix::from_linear(
            [2., 1., 1., 4., 3., 3., 8., 7., 9.]
                .iter()
                .map(|x| F64::from(*x))
                .collect(),
            3,
            3,
            FloatField,
        )
        .unwrap();

        let lu = a.lu();
        assert_eq!(lu.rank, 3);

        let mut pa = Matrix::new(3, 3, FloatField);
        for (i, r) in lu.perm.iter().enumerate() {
            for j in 0..3 {
                pa[(i as u32, j)] = a[(*r, j)];
            }
        }
        assert!((&lu.lower * &lu.upper).approx_eq(&pa));
        // the largest entry of the first column is chosen as pivot
        assert_eq!(lu.perm[0], 2);

        let singular = Matrix::from_linear(
            [1., 2., 2., 4., 3., 6.].iter().map(|x| F64::from(*x)).collect(),
            3,
            2,
            FloatField,
        )
        .unwrap();
        assert_eq!(singular.rank(), 1);
        let n = singular.null_space();
        assert_eq!(n.nrows(), 1);
        assert!((&singular * &n.transpose()).approx_eq(&Matrix::new(3, 1, FloatField)));
    }
}
