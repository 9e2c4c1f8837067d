use hilbert_tangent::{
    domains::{rational::Q, Ring},
    ideal::Ideal,
    poly::{
        groebner::{groebner_basis, reduce},
        polynomial::PolynomialRing,
        MonomialOrder,
    },
};
use rand::{Rng, SeedableRng};
use rand_xoshiro::Xoshiro256StarStar;

#[test]
fn canonical_basis() {
    for order in [MonomialOrder::Lex, MonomialOrder::GrevLex] {
        let r = PolynomialRing::new(Q, 3, order);
        let a = Ideal::parse(&r, &["x^2 - y", "x*y - z", "z^2"]).unwrap();
        let b = Ideal::parse(
            &r,
            &[
                "x^2 - y + z^2",
                "x*y - z",
                "2*z^2",
                "x^3 - x*y + x*y^2 - y*z",
            ],
        )
        .unwrap();

        assert_eq!(a, b);
        assert_eq!(a.groebner_basis(), b.groebner_basis());
        for g in a.groebner_basis() {
            assert!(Q.is_one(&g.lcoeff()));
        }
    }
}

#[test]
fn containment() {
    let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
    let i = Ideal::parse(
        &r,
        &["x^2", "x*y^2", "x*y*z", "x*z^2", "y^2*z^2", "y*z^3", "z^4", "y^3 - x*z"],
    )
    .unwrap();

    for g in i.groebner_basis() {
        assert!(i.contains(g).unwrap());
    }

    let mut rng = Xoshiro256StarStar::seed_from_u64(11);
    for _ in 0..20 {
        let terms = (0..4)
            .map(|_| {
                (
                    Q.sample(&mut rng, (-3, 4)),
                    (0..3).map(|_| rng.gen_range(0..4)).collect(),
                )
            })
            .collect();
        let f = r.from_terms(terms).unwrap();

        let nf = reduce(&f, i.groebner_basis());
        assert_eq!(i.contains(&f).unwrap(), nf.is_zero());
        assert_eq!(reduce(&nf, i.groebner_basis()), nf);

        // every multiple of a generator is a member
        let g = &i.generators()[rng.gen_range(0..i.generators().len())];
        assert!(i.contains(&(&f * g)).unwrap());
    }
}

#[test]
fn ideal_power() {
    let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
    let i = Ideal::parse(&r, &["x^2 - y", "x*y", "y^2"]).unwrap();

    assert_eq!(i.power(1).unwrap(), i);
    for (a, b) in [(1, 1), (1, 2), (2, 2)] {
        let lhs = i.power(a + b).unwrap();
        let rhs = i.power(a).unwrap().product(&i.power(b).unwrap()).unwrap();
        assert_eq!(lhs, rhs);
        assert!(i.power(a).unwrap().contains_ideal(&lhs).unwrap());
    }
}

#[test]
fn basis_of_basis() {
    let r = PolynomialRing::new(Q, 2, MonomialOrder::Lex);
    let gens = r.parse_all(&["x^2 + y^2 - 1", "x - y"]).unwrap();
    let g = groebner_basis(&gens);
    assert_eq!(groebner_basis(&g), g);
}
