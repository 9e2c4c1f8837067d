//! Tangent spaces of nested and double nested Hilbert schemes.
//!
//! A point of a double nested Hilbert scheme is a grid of ideals in the shape of a
//! Young diagram, where every ideal contains the ideal to its right and the ideal
//! below it. A diagram is given by its row lengths, so `[3, 2]` is
//!
//! ```text
//! ┌─┬─┬─┐
//! ├─┼─┼─┘
//! └─┴─┘
//! ```
//!
//! A tangent vector is a tangent vector `H_c: I_c/I_c² -> R/I_c` at every cell `c`,
//! such that for every pair of adjacent cells `I₁ ⊇ I₂` the square
//!
//! ```text
//! I₂/I₂² → I₁/I₁²
//!   ↓         ↓
//!  R/I₂  →  R/I₁
//! ```
//!
//! commutes. The unknowns of all cells are concatenated, in row-major cell order,
//! into a single constraint system.

use tracing::{debug, instrument};

use crate::domains::Field;
use crate::error::{AlgebraError, Result};
use crate::hilbert::TangentSpace;
use crate::ideal::Ideal;
use crate::module::linear_map_matrix;
use crate::poly::polynomial::PolynomialRing;
use crate::tensors::matrix::Matrix;
use crate::tensors::sparse::SparseMatrix;

/// Check that the row lengths are positive and non-increasing.
fn check_diagram(diagram: &[usize]) -> Result<()> {
    if diagram.is_empty() {
        return Err(AlgebraError::InvalidShape(
            "a Young diagram needs at least one row".to_owned(),
        ));
    }

    if let Some(i) = diagram.iter().position(|l| *l == 0) {
        return Err(AlgebraError::InvalidShape(format!(
            "row {} of the diagram {:?} is empty",
            i, diagram
        )));
    }

    if let Some(i) = diagram.windows(2).position(|w| w[1] > w[0]) {
        return Err(AlgebraError::InvalidShape(format!(
            "row {} of the diagram {:?} is longer than the row above it",
            i + 1,
            diagram
        )));
    }

    Ok(())
}

/// A grid of ideals in the shape of a Young diagram, decreasing along rows and columns.
#[derive(Clone, Debug)]
pub struct YoungDiagramIdeals<F: Field> {
    diagram: Vec<usize>,
    grid: Vec<Vec<Ideal<F>>>,
    ring: PolynomialRing<F>,
}

impl<F: Field> YoungDiagramIdeals<F> {
    /// Create the grid. The diagram shape is checked first, then the number of
    /// ideals in every row, then that all ideals live in `ring`, and finally that
    /// every ideal contains its right and lower neighbour.
    pub fn new(
        diagram: &[usize],
        grid: Vec<Vec<Ideal<F>>>,
        ring: &PolynomialRing<F>,
    ) -> Result<YoungDiagramIdeals<F>> {
        check_diagram(diagram)?;

        if grid.len() != diagram.len() {
            return Err(AlgebraError::InvalidShape(format!(
                "{} rows of ideals for a diagram with {} rows",
                grid.len(),
                diagram.len()
            )));
        }
        for (i, (row, l)) in grid.iter().zip(diagram).enumerate() {
            if row.len() != *l {
                return Err(AlgebraError::InvalidShape(format!(
                    "row {} has {} ideals instead of {}",
                    i,
                    row.len(),
                    l
                )));
            }
        }

        for ideal in grid.iter().flatten() {
            if !ring.is_compatible(ideal.ring()) {
                return Err(AlgebraError::MismatchedContext(format!(
                    "the ideal {} of {} is not an ideal of {}",
                    ideal,
                    ideal.ring(),
                    ring
                )));
            }
        }

        let y = YoungDiagramIdeals {
            diagram: diagram.to_vec(),
            grid,
            ring: ring.clone(),
        };

        for line in y.rows().into_iter().chain(y.columns()) {
            for w in line.windows(2) {
                if !w[0].contains_ideal(w[1])? {
                    return Err(AlgebraError::IdealNotContained {
                        top: w[0].to_string(),
                        bottom: w[1].to_string(),
                    });
                }
            }
        }

        Ok(y)
    }

    #[inline]
    pub fn diagram(&self) -> &[usize] {
        &self.diagram
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F> {
        &self.ring
    }

    /// The ideal in row `i` and column `j`.
    pub fn get(&self, i: usize, j: usize) -> Option<&Ideal<F>> {
        self.grid.get(i).and_then(|r| r.get(j))
    }

    pub fn row(&self, i: usize) -> Vec<&Ideal<F>> {
        self.grid.get(i).map(|r| r.iter().collect()).unwrap_or_default()
    }

    /// The ideals in column `j`, from top to bottom.
    pub fn column(&self, j: usize) -> Vec<&Ideal<F>> {
        self.grid
            .iter()
            .take_while(|r| r.len() > j)
            .map(|r| &r[j])
            .collect()
    }

    pub fn rows(&self) -> Vec<Vec<&Ideal<F>>> {
        (0..self.grid.len()).map(|i| self.row(i)).collect()
    }

    pub fn columns(&self) -> Vec<Vec<&Ideal<F>>> {
        (0..self.diagram[0]).map(|j| self.column(j)).collect()
    }

    /// The position of cell `(i, j)` when the rows are concatenated.
    pub fn index_mapping(&self, i: usize, j: usize) -> usize {
        self.diagram[..i].iter().sum::<usize>() + j
    }

    /// The number of cells.
    pub fn size(&self) -> usize {
        self.diagram.iter().sum()
    }

    /// Iterate over the ideals in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = &Ideal<F>> {
        self.grid.iter().flatten()
    }
}

/// Build the constraints for the square of the inclusion `bottom ⊆ top` to commute.
///
/// The unknowns of `top` start at column `top_offset` and those of `bottom` at
/// `bottom_offset`. With `phi: J₂ -> J₁` and `psi: O₂ -> O₁` the maps induced by the
/// identity, the constraint is `H₁ phi = psi H₂`.
fn square_constraints<F: Field>(
    top: &TangentSpace<F>,
    bottom: &TangentSpace<F>,
    top_offset: usize,
    bottom_offset: usize,
    c: &mut SparseMatrix<F>,
) -> Result<()> {
    let (j1, o1) = (top.conormal_module(), top.structure_module());
    let (j2, o2) = (bottom.conormal_module(), bottom.structure_module());

    let phi = linear_map_matrix(j2, j1, |f| Ok(f.clone()))?;
    let psi = linear_map_matrix(o2, o1, |f| Ok(f.clone()))?;

    let field = c.field().clone();
    let (m1, m2, n1, n2) = (j1.dim(), j2.dim(), o1.dim(), o2.dim());
    for i in 0..n1 {
        for j in 0..m2 {
            let mut row = Vec::with_capacity(m1 + n2);
            for l in 0..m1 {
                row.push((
                    (top_offset + i * m1 + l) as u32,
                    phi[(l as u32, j as u32)].clone(),
                ));
            }
            for l in 0..n2 {
                row.push((
                    (bottom_offset + l * m2 + j) as u32,
                    field.neg(&psi[(i as u32, l as u32)]),
                ));
            }
            c.push_row(row)?;
        }
    }

    Ok(())
}

/// The double nested Hilbert scheme for a fixed Young diagram.
///
/// The diagram `[3, 3, 2, 1, 1]` has the shape
///
/// ```text
/// ┌─┬─┬─┐
/// ├─┼─┼─┤
/// ├─┼─┼─┘
/// ├─┼─┘
/// ├─┤
/// └─┘
/// ```
#[derive(Clone, Debug)]
pub struct DoubleNestedHilbertScheme<F: Field> {
    ring: PolynomialRing<F>,
    diagram: Vec<usize>,
}

impl<F: Field> DoubleNestedHilbertScheme<F> {
    /// Create the scheme. The diagram must have positive, non-increasing row lengths.
    pub fn new(ring: &PolynomialRing<F>, diagram: &[usize]) -> Result<DoubleNestedHilbertScheme<F>> {
        check_diagram(diagram)?;
        Ok(DoubleNestedHilbertScheme {
            ring: ring.clone(),
            diagram: diagram.to_vec(),
        })
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F> {
        &self.ring
    }

    #[inline]
    pub fn diagram(&self) -> &[usize] {
        &self.diagram
    }

    /// The tangent space at the point given by `grid`, which must have the shape of the diagram.
    pub fn tangent_space(&self, grid: Vec<Vec<Ideal<F>>>) -> Result<DoubleNestedTangentSpace<F>> {
        let ideals = YoungDiagramIdeals::new(&self.diagram, grid, &self.ring)?;
        DoubleNestedTangentSpace::new(ideals)
    }
}

/// The tangent space of a double nested Hilbert scheme at a grid of ideals.
#[derive(Debug)]
pub struct DoubleNestedTangentSpace<F: Field> {
    ideals: YoungDiagramIdeals<F>,
    cells: Vec<TangentSpace<F>>,
    offsets: Vec<usize>,
    constraints: SparseMatrix<F>,
}

impl<F: Field> DoubleNestedTangentSpace<F> {
    /// Build the combined constraints: the morphism constraints of every cell,
    /// followed by a commuting square for every pair of horizontally adjacent cells
    /// and then for every pair of vertically adjacent cells.
    #[instrument(level = "debug", skip_all, fields(cells = ideals.size()))]
    pub fn new(ideals: YoungDiagramIdeals<F>) -> Result<DoubleNestedTangentSpace<F>> {
        let cells = ideals
            .iter()
            .map(TangentSpace::new)
            .collect::<Result<Vec<_>>>()?;

        let mut offsets = Vec::with_capacity(cells.len());
        let mut total = 0;
        for c in &cells {
            offsets.push(total);
            total += c.unknowns();
        }

        let field = ideals.ring().field().clone();
        let mut constraints = SparseMatrix::new(total as u32, field);
        for (c, offset) in cells.iter().zip(&offsets) {
            constraints.push_block(c.constraints()?, *offset as u32)?;
        }
        let morphism_rows = constraints.nrows();

        let diagram = ideals.diagram().to_vec();
        let mut squares = vec![];
        for (i, l) in diagram.iter().enumerate() {
            for j in 0..l - 1 {
                squares.push(((i, j), (i, j + 1)));
            }
        }
        for j in 0..diagram[0] {
            for i in 0..ideals.column(j).len() - 1 {
                squares.push(((i, j), (i + 1, j)));
            }
        }

        for (a, b) in squares {
            let ia = ideals.index_mapping(a.0, a.1);
            let ib = ideals.index_mapping(b.0, b.1);
            square_constraints(
                &cells[ia],
                &cells[ib],
                offsets[ia],
                offsets[ib],
                &mut constraints,
            )?;
        }
        let duplicates = constraints.dedup();

        debug!(
            "Combined constraints of shape ({}, {}): {} morphism rows, {} duplicates removed",
            constraints.nrows(),
            constraints.ncols(),
            morphism_rows,
            duplicates
        );

        Ok(DoubleNestedTangentSpace {
            ideals,
            cells,
            offsets,
            constraints,
        })
    }

    #[inline]
    pub fn ideals(&self) -> &YoungDiagramIdeals<F> {
        &self.ideals
    }

    /// The tangent space of the ordinary Hilbert scheme at cell `(i, j)`.
    pub fn cell(&self, i: usize, j: usize) -> Option<&TangentSpace<F>> {
        self.ideals
            .get(i, j)
            .map(|_| &self.cells[self.ideals.index_mapping(i, j)])
    }

    /// The number of unknowns of every cell, in row-major order.
    pub fn block_sizes(&self) -> Vec<usize> {
        self.cells.iter().map(|c| c.unknowns()).collect()
    }

    #[inline]
    pub fn constraints(&self) -> &SparseMatrix<F> {
        &self.constraints
    }

    pub fn dim(&self) -> usize {
        self.constraints.ncols() - self.constraints.rank()
    }

    /// A basis of the tangent space. Every basis vector is given as one `n x m`
    /// matrix per cell, in row-major cell order.
    pub fn basis(&self) -> Result<Vec<Vec<Matrix<F>>>> {
        let null = self.constraints.null_space();
        let field = self.constraints.field();

        let mut basis = Vec::with_capacity(null.nrows());
        for v in null.row_iter().take(null.nrows()) {
            let mut matrices = Vec::with_capacity(self.cells.len());
            for (c, offset) in self.cells.iter().zip(&self.offsets) {
                let m = c.conormal_module().dim();
                let n = c.structure_module().dim();
                matrices.push(Matrix::from_linear(
                    v[*offset..*offset + m * n].to_vec(),
                    n as u32,
                    m as u32,
                    field.clone(),
                )?);
            }
            basis.push(matrices);
        }

        Ok(basis)
    }
}

/// The nested Hilbert scheme of chains `I₁ ⊇ I₂ ⊇ ...`, a double nested Hilbert
/// scheme whose diagram has a single row.
#[derive(Clone, Debug)]
pub struct NestedHilbertScheme<F: Field> {
    ring: PolynomialRing<F>,
}

impl<F: Field> NestedHilbertScheme<F> {
    pub fn new(ring: &PolynomialRing<F>) -> NestedHilbertScheme<F> {
        NestedHilbertScheme { ring: ring.clone() }
    }

    #[inline]
    pub fn ring(&self) -> &PolynomialRing<F> {
        &self.ring
    }

    /// The tangent space at a decreasing chain of ideals.
    pub fn tangent_space(&self, chain: Vec<Ideal<F>>) -> Result<DoubleNestedTangentSpace<F>> {
        DoubleNestedHilbertScheme::new(&self.ring, &[chain.len()])?.tangent_space(vec![chain])
    }
}

#[cfg(test)]
mod test {
    use crate::domains::rational::{RationalField, Q};
    use crate::error::AlgebraError;
    use crate::hilbert::HilbertScheme;
    use crate::ideal::Ideal;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::MonomialOrder;

    use super::{DoubleNestedHilbertScheme, NestedHilbertScheme, YoungDiagramIdeals};

    fn ideal(r: &PolynomialRing<RationalField>, gens: &[&str]) -> Ideal<RationalField> {
        Ideal::parse(r, gens).unwrap()
    }

    #[test]
    fn grid_access() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let m = ideal(&r, &["x", "y"]);
        let a = ideal(&r, &["x^2", "y"]);
        let b = ideal(&r, &["x", "y^2"]);
        let c = ideal(&r, &["x^2", "x*y", "y^2"]);

        let y = YoungDiagramIdeals::new(
            &[2, 1],
            vec![vec![m.clone(), a.clone()], vec![b.clone()]],
            &r,
        )
        .unwrap();
        assert_eq!(y.size(), 3);
        assert_eq!(y.index_mapping(1, 0), 2);
        assert_eq!(y.column(0), vec![&m, &b]);
        assert_eq!(y.column(1), vec![&a]);
        assert_eq!(y.columns().len(), 2);
        assert_eq!(y.get(1, 1), None);
        assert_eq!(y.iter().count(), 3);

        assert!(matches!(
            YoungDiagramIdeals::new(&[2], vec![vec![c, m.clone()]], &r),
            Err(AlgebraError::IdealNotContained { .. })
        ));
        assert!(matches!(
            YoungDiagramIdeals::new(&[1, 1], vec![vec![a], vec![b]], &r),
            Err(AlgebraError::IdealNotContained { .. })
        ));
        assert!(matches!(
            YoungDiagramIdeals::new(&[2], vec![vec![m]], &r),
            Err(AlgebraError::InvalidShape(_))
        ));
    }

    #[test]
    fn diagram_shape_is_checked_first() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        assert!(matches!(
            DoubleNestedHilbertScheme::new(&r, &[2, 3, 1]),
            Err(AlgebraError::InvalidShape(_))
        ));
        assert!(matches!(
            DoubleNestedHilbertScheme::new(&r, &[]),
            Err(AlgebraError::InvalidShape(_))
        ));

        // an unrelated, wrongly sized grid is not inspected
        assert!(matches!(
            YoungDiagramIdeals::new(&[2, 3, 1], vec![], &r),
            Err(AlgebraError::InvalidShape(_))
        ));
    }

    #[test]
    fn single_cell() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let i = ideal(&r, &["x^3", "x*y", "y^2"]);
        let t = DoubleNestedHilbertScheme::new(&r, &[1])
            .unwrap()
            .tangent_space(vec![vec![i.clone()]])
            .unwrap();
        let single = HilbertScheme::new(&r).tangent_space(&i).unwrap();
        assert_eq!(t.dim(), single.dim().unwrap());
        assert_eq!(t.block_sizes(), vec![single.unknowns()]);
    }

    #[test]
    fn nested_pair() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let i1 = ideal(&r, &["x", "y"]);
        let i2 = ideal(&r, &["x^2", "y"]);

        let t = NestedHilbertScheme::new(&r)
            .tangent_space(vec![i1.clone(), i2.clone()])
            .unwrap();
        assert_eq!(t.block_sizes(), vec![2, 8]);
        assert_eq!(t.dim(), 4);

        // the same chain as a column
        let t = DoubleNestedHilbertScheme::new(&r, &[1, 1])
            .unwrap()
            .tangent_space(vec![vec![i1], vec![i2]])
            .unwrap();
        assert_eq!(t.dim(), 4);

        let basis = t.basis().unwrap();
        assert_eq!(basis.len(), 4);
        for b in &basis {
            assert_eq!(b.len(), 2);
            assert_eq!((b[1].nrows(), b[1].ncols()), (2, 4));
        }

        // every cell restricts to a tangent vector of its own Hilbert scheme
        let cell = t.cell(1, 0).unwrap();
        let actions_j = cell.conormal_module().matrices_representation().unwrap();
        let actions_o = cell.structure_module().matrices_representation().unwrap();
        for b in &basis {
            for (fm, fnn) in actions_j.iter().zip(&actions_o) {
                assert_eq!(&(&b[1] * fm), &(fnn * &b[1]));
            }
        }
    }

    #[test]
    fn unit_cell() {
        // the empty subscheme has a zero-dimensional tangent space and no unknowns
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let t = NestedHilbertScheme::new(&r)
            .tangent_space(vec![Ideal::unit(&r), ideal(&r, &["x", "y"])])
            .unwrap();
        assert_eq!(t.block_sizes(), vec![0, 2]);
        assert_eq!(t.dim(), 2);
    }
}
