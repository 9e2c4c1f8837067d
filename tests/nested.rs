use hilbert_tangent::{
    domains::{
        float::FloatField,
        rational::{RationalField, Q},
        Field,
    },
    error::AlgebraError,
    hilbert::HilbertScheme,
    ideal::Ideal,
    nested::{DoubleNestedHilbertScheme, NestedHilbertScheme, YoungDiagramIdeals},
    poly::{polynomial::PolynomialRing, MonomialOrder},
};

fn plane() -> PolynomialRing<RationalField> {
    PolynomialRing::new(Q, 2, MonomialOrder::GrevLex)
}

fn ideal(r: &PolynomialRing<RationalField>, gens: &[&str]) -> Ideal<RationalField> {
    Ideal::parse(r, gens).unwrap()
}

#[test]
fn nested_pair() {
    let r = plane();
    let t = NestedHilbertScheme::new(&r)
        .tangent_space(vec![ideal(&r, &["x", "y"]), ideal(&r, &["x^2", "y"])])
        .unwrap();
    assert_eq!(t.dim(), 4);
    assert_eq!(t.basis().unwrap().len(), 4);
}

#[test]
fn chain_is_bounded_by_cells() {
    let r = plane();
    let chain = vec![
        ideal(&r, &["x", "y"]),
        ideal(&r, &["x^2", "y"]),
        ideal(&r, &["x^3", "y"]),
    ];
    let t = NestedHilbertScheme::new(&r).tangent_space(chain.clone()).unwrap();

    let single: usize = chain
        .iter()
        .map(|i| HilbertScheme::new(&r).tangent_space(i).unwrap().dim().unwrap())
        .sum();
    assert!(t.dim() <= single);
    assert_eq!(t.block_sizes().iter().sum::<usize>(), t.constraints().ncols());
}

fn double_nested_in<F: Field>(field: F) {
    let r = PolynomialRing::new(field, 2, MonomialOrder::GrevLex);
    let m = Ideal::parse(&r, &["x", "y"]).unwrap();
    let grid = vec![
        vec![m.clone(), Ideal::parse(&r, &["x^2", "y"]).unwrap()],
        vec![Ideal::parse(&r, &["x", "y^2"]).unwrap()],
    ];
    let scheme = DoubleNestedHilbertScheme::new(&r, &[2, 1]).unwrap();
    let t = scheme.tangent_space(grid).unwrap();

    assert_eq!(t.ideals().size(), 3);
    // two length-two schemes through a common point: 4 + 4 - 2
    assert_eq!(t.dim(), 6);
    let basis = t.basis().unwrap();
    assert_eq!(basis.len(), 6);
    for b in basis {
        assert_eq!(b.len(), 3);
    }
    assert_eq!(t.cell(0, 0).unwrap().ideal(), &m);
}

#[test]
fn double_nested() {
    double_nested_in(Q);
}

#[test]
fn double_nested_float() {
    double_nested_in(FloatField);
}

#[test]
fn curvilinear_chains() {
    let r = plane();
    for (top, bottom, dim) in [
        (vec!["x", "y"], vec!["x - y", "y^2"], 4),
        (vec!["x - y^2", "y^3"], vec!["x - y^2", "y^4"], 8),
    ] {
        let t = NestedHilbertScheme::new(&r)
            .tangent_space(vec![ideal(&r, &top), ideal(&r, &bottom)])
            .unwrap();
        assert_eq!(t.dim(), dim);
    }
}

#[test]
fn diagram_validation() {
    let r = plane();
    assert!(matches!(
        DoubleNestedHilbertScheme::new(&r, &[2, 3, 1]),
        Err(AlgebraError::InvalidShape(_))
    ));

    // the shape is rejected before the ideals are looked at
    let not_nested = vec![
        vec![ideal(&r, &["x^2", "y"]), ideal(&r, &["x", "y"])],
        vec![ideal(&r, &["x", "y"]), ideal(&r, &["x", "y"]), ideal(&r, &["x", "y"])],
        vec![ideal(&r, &["x", "y"])],
    ];
    assert!(matches!(
        YoungDiagramIdeals::new(&[2, 3, 1], not_nested, &r),
        Err(AlgebraError::InvalidShape(_))
    ));

    let scheme = DoubleNestedHilbertScheme::new(&r, &[2]).unwrap();
    assert!(matches!(
        scheme.tangent_space(vec![vec![ideal(&r, &["x^2", "y"]), ideal(&r, &["x", "y"])]]),
        Err(AlgebraError::IdealNotContained { .. })
    ));

    let other = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
    assert!(matches!(
        scheme.tangent_space(vec![vec![
            ideal(&other, &["x", "y", "z"]),
            ideal(&other, &["x", "y", "z"])
        ]]),
        Err(AlgebraError::MismatchedContext(_))
    ));
}
