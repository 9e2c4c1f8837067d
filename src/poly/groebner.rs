//! Gröbner bases with Buchberger's algorithm.
//!
//! The polynomials of a system must all live in the same polynomial ring; the
//! leading term of a polynomial is determined by the monomial order of that ring.
//!
//! The central entry point is [groebner_basis], which computes the reduced Gröbner basis
//! of a generating set:
//!
//! ```
//! use hilbert_tangent::domains::rational::Q;
//! use hilbert_tangent::poly::{groebner::groebner_basis, polynomial::PolynomialRing, MonomialOrder};
//!
//! let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
//! let gens = r.parse_all(&["x^2 - y", "x*y - 1"]).unwrap();
//! let basis = groebner_basis(&gens);
//! for g in &basis {
//!     println!("{}", g);
//! }
//! ```

use tracing::{debug, instrument};

use crate::domains::Field;
use crate::error::{AlgebraError, Result};

use super::monomial::divides;
use super::polynomial::MultivariatePolynomial;

/// Compute `f - coeff / lc(g) * x^(exps - lm(g)) * g`. The leading monomial of `g` must divide `exps`.
fn cancel_term<F: Field>(
    f: &MultivariatePolynomial<F>,
    coeff: &F::Element,
    exps: &[u16],
    g: &MultivariatePolynomial<F>,
) -> MultivariatePolynomial<F> {
    let shift: Vec<u16> = exps
        .iter()
        .zip(g.lexponents())
        .map(|(a, b)| a - b)
        .collect();
    let ratio = f.field.div(coeff, &g.coefficients[0]);
    f - &g.mul_term(&ratio, &shift)
}

/// Subtract the multiple of `g` that cancels the leading term of `f`:
/// `f - (lc(f)/lc(g)) * (lm(f)/lm(g)) * g`.
pub fn reduction_step<F: Field>(
    f: &MultivariatePolynomial<F>,
    g: &MultivariatePolynomial<F>,
) -> Result<MultivariatePolynomial<F>> {
    f.check_context(g)?;

    if g.is_zero() {
        return Err(AlgebraError::UnsupportedOperand(
            "cannot reduce with respect to the zero polynomial".to_string(),
        ));
    }
    if f.is_zero() {
        return Ok(f.clone());
    }

    if !divides(g.lexponents(), f.lexponents()) {
        return Err(AlgebraError::NotDivisible {
            dividend: f.lmonomial().to_string(),
            divisor: g.lmonomial().to_string(),
        });
    }

    Ok(cancel_term(f, &f.coefficients[0], f.lexponents(), g))
}

/// Reduce the leading term of `f` with respect to `gs` until it is zero or
/// no leading monomial of `gs` divides the leading monomial of `f`.
/// The first divisor in `gs` is used.
pub fn reduce<F: Field>(
    f: &MultivariatePolynomial<F>,
    gs: &[MultivariatePolynomial<F>],
) -> MultivariatePolynomial<F> {
    let mut r = f.clone();

    while !r.is_zero() {
        let Some(g) = gs
            .iter()
            .find(|g| !g.is_zero() && divides(g.lexponents(), r.lexponents()))
        else {
            break;
        };

        debug_assert!(r.same_context(g));
        r = cancel_term(&r, &r.coefficients[0], r.lexponents(), g);
    }

    r
}

/// Completely reduce the polynomial `f` w.r.t the polynomials `gs`, term by term.
/// For example reducing `f=y^2+x` by `g=[x]` yields `y^2`.
pub fn total_reduce<F: Field>(
    f: &MultivariatePolynomial<F>,
    gs: &[MultivariatePolynomial<F>],
) -> MultivariatePolynomial<F> {
    let mut q = f.zero();
    let mut r = f.clone();

    'term: while !r.is_zero() {
        while let Some(g) = gs
            .iter()
            .find(|g| !g.is_zero() && divides(g.lexponents(), r.lexponents()))
        {
            r = cancel_term(&r, &r.coefficients[0], r.lexponents(), g);

            if r.is_zero() {
                break 'term;
            }
        }

        // strip the leading term, which is not reducible. Terms leave in
        // decreasing order, so `q` stays sorted.
        q.coefficients.push(r.coefficients.remove(0));
        q.exponents.extend(r.exponents.drain(..r.nvars()));
    }

    q
}

/// Construct the S-polynomial `(1/lc(f))·(lm(g)/d)·f − (1/lc(g))·(lm(f)/d)·g`
/// where `d = gcd(lm(f), lm(g))`.
pub fn s_polynomial<F: Field>(
    f: &MultivariatePolynomial<F>,
    g: &MultivariatePolynomial<F>,
) -> MultivariatePolynomial<F> {
    if f.is_zero() || g.is_zero() {
        return f.zero();
    }

    let (lf, lg) = (f.lexponents(), g.lexponents());
    let extra_factor_f: Vec<u16> = lf.iter().zip(lg).map(|(a, b)| b - a.min(b)).collect();
    let extra_factor_g: Vec<u16> = lf.iter().zip(lg).map(|(a, b)| a - a.min(b)).collect();

    let new_f = f.mul_term(&f.field.inv(&f.coefficients[0]), &extra_factor_f);
    let new_g = g.mul_term(&g.field.inv(&g.coefficients[0]), &extra_factor_g);
    &new_f - &new_g
}

/// Compute the S-polynomial of `f` and `g`, reduce it modulo `basis` and
/// append it to `new` if it is not zero.
pub fn buchberger_step<F: Field>(
    f: &MultivariatePolynomial<F>,
    g: &MultivariatePolynomial<F>,
    basis: &[MultivariatePolynomial<F>],
    new: &mut Vec<MultivariatePolynomial<F>>,
) {
    // coprime leading monomials give an S-polynomial that reduces to zero
    if f.lexponents()
        .iter()
        .zip(g.lexponents())
        .all(|(a, b)| *a == 0 || *b == 0)
    {
        return;
    }

    let s = reduce(&s_polynomial(f, g), basis);
    if !s.is_zero() {
        new.push(s);
    }
}

/// Buchberger's algorithm with an old and a new set: S-polynomials of all
/// old×new and new×new pairs are reduced modulo the current basis, and the
/// non-zero remainders form the next new set, until no new polynomials appear.
#[instrument(level = "debug", skip_all, fields(generators = generators.len()))]
pub fn buchberger<F: Field>(
    generators: &[MultivariatePolynomial<F>],
) -> Vec<MultivariatePolynomial<F>> {
    let mut old: Vec<MultivariatePolynomial<F>> = vec![];
    let mut new: Vec<MultivariatePolynomial<F>> =
        generators.iter().filter(|g| !g.is_zero()).cloned().collect();

    let mut round = 0;
    while !new.is_empty() {
        let mut basis = old.clone();
        basis.extend(new.iter().cloned());

        let mut next_new = vec![];
        for f in &old {
            for g in &new {
                buchberger_step(f, g, &basis, &mut next_new);
            }
        }
        for (i, f) in new.iter().enumerate() {
            for g in &new[i + 1..] {
                buchberger_step(f, g, &basis, &mut next_new);
            }
        }

        debug!(
            "Buchberger round {}: basis size {}, pairs {}, new polynomials {}",
            round,
            basis.len(),
            old.len() * new.len() + new.len() * new.len().saturating_sub(1) / 2,
            next_new.len()
        );

        old = basis;
        new = next_new;
        round += 1;
    }

    old
}

/// Remove every polynomial whose leading monomial is divisible by the
/// leading monomial of another polynomial in the basis.
pub fn basis_minimize<F: Field>(
    mut basis: Vec<MultivariatePolynomial<F>>,
) -> Vec<MultivariatePolynomial<F>> {
    basis.retain(|p| !p.is_zero());

    let mut keep = vec![true; basis.len()];
    'l1: for (i, p1) in basis.iter().enumerate() {
        for (j, p2) in basis.iter().enumerate() {
            if i != j && keep[j] && divides(p2.lexponents(), p1.lexponents()) {
                keep[i] = false;
                continue 'l1;
            }
        }
    }

    basis
        .into_iter()
        .zip(keep)
        .filter_map(|(p, k)| if k { Some(p) } else { None })
        .collect()
}

/// Minimize the basis, fully reduce each element modulo the others and make
/// every element monic. The result is sorted by decreasing leading monomial and
/// is the unique reduced Gröbner basis when the input is a Gröbner basis.
pub fn basis_reduce<F: Field>(
    basis: Vec<MultivariatePolynomial<F>>,
) -> Vec<MultivariatePolynomial<F>> {
    let mut lead_reduced = basis_minimize(basis);

    let mut reduced = vec![];
    for i in 0..lead_reduced.len() {
        lead_reduced.swap(0, i);
        let h = total_reduce(&lead_reduced[0], &lead_reduced[1..]);
        if !h.is_zero() {
            reduced.push(h.make_monic());
        }
    }

    reduced.sort_by(|p1, p2| p2.order.cmp(p2.lexponents(), p1.lexponents()));
    reduced
}

/// Compute the reduced Gröbner basis of the ideal generated by `generators`.
#[instrument(level = "debug", skip_all, fields(generators = generators.len()))]
pub fn groebner_basis<F: Field>(
    generators: &[MultivariatePolynomial<F>],
) -> Vec<MultivariatePolynomial<F>> {
    let basis = basis_reduce(buchberger(generators));
    debug!("Reduced Gröbner basis has {} elements", basis.len());
    basis
}

/// Check if every S-polynomial of the system reduces to zero.
pub fn is_groebner_basis<F: Field>(system: &[MultivariatePolynomial<F>]) -> bool {
    for (i, p1) in system.iter().enumerate() {
        for p2 in &system[i + 1..] {
            if !reduce(&s_polynomial(p1, p2), system).is_zero() {
                return false;
            }
        }
    }
    true
}

#[cfg(test)]
mod test {
    use rand::SeedableRng;
    use rand_xoshiro::Xoshiro256StarStar;

    use crate::domains::rational::Q;
    use crate::domains::Ring;
    use crate::error::AlgebraError;
    use crate::poly::polynomial::PolynomialRing;
    use crate::poly::MonomialOrder;

    use super::{
        basis_minimize, groebner_basis, is_groebner_basis, reduce, reduction_step, s_polynomial,
        total_reduce,
    };

    #[test]
    fn reduction() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::Lex);
        let f = r.parse("y^2 + x").unwrap();
        let g = r.parse("x").unwrap();
        assert_eq!(total_reduce(&f, &[g.clone()]), r.parse("y^2").unwrap());

        let f = r.parse("x^2*y + y").unwrap();
        let g = r.parse("2*x*y - 1").unwrap();
        let step = reduction_step(&f, &g).unwrap();
        assert_eq!(step, r.parse("1/2*x + y").unwrap());

        assert!(matches!(
            reduction_step(&g, &r.parse("y^2").unwrap()),
            Err(AlgebraError::NotDivisible { .. })
        ));
    }

    #[test]
    fn s_poly() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let f = r.parse("x^2 - y").unwrap();
        let g = r.parse("x*y - 1").unwrap();
        // y*f - x*g
        assert_eq!(s_polynomial(&f, &g), r.parse("x - y^2").unwrap());
    }

    #[test]
    fn cyclic3() {
        let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
        let gens = r
            .parse_all(&["x + y + z", "x*y + y*z + z*x", "x*y*z - 1"])
            .unwrap();
        let basis = groebner_basis(&gens);
        assert!(is_groebner_basis(&basis));

        let expected = r
            .parse_all(&["z^3 - 1", "y^2 + y*z + z^2", "x + y + z"])
            .unwrap();
        assert_eq!(basis, expected);
    }

    #[test]
    fn lex_elimination() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::Lex);
        let gens = r.parse_all(&["x^2 + y^2 - 1", "x - y"]).unwrap();
        let basis = groebner_basis(&gens);
        assert_eq!(basis, r.parse_all(&["x - y", "y^2 - 1/2"]).unwrap());
    }

    #[test]
    fn canonical_for_different_generators() {
        let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
        let a = r
            .parse_all(&["x^2", "x*y^2", "x*y*z", "x*z^2", "y^2*z^2", "y*z^3", "z^4", "y^3 - x*z"])
            .unwrap();

        // same ideal: add combinations of generators and reverse the order
        let mut b: Vec<_> = a.iter().rev().cloned().collect();
        b.push(&(&a[0] * &r.variable(2)) + &a[7]);
        b[0] = &b[0] + &(&b[3] * &r.constant(Q.nth(5)));

        assert_eq!(groebner_basis(&a), groebner_basis(&b));
    }

    #[test]
    fn reduce_is_idempotent() {
        use rand::Rng;

        let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
        let basis = groebner_basis(
            &r.parse_all(&["x^2 - y*z", "y^2 - x*z", "z^3 - x"])
                .unwrap(),
        );

        let mut rng = Xoshiro256StarStar::seed_from_u64(7);
        for _ in 0..20 {
            let terms = (0..5)
                .map(|_| {
                    (
                        Q.nth(rng.gen_range(-5..6)),
                        vec![rng.gen_range(0..4), rng.gen_range(0..4), rng.gen_range(0..4)],
                    )
                })
                .collect();
            let f = r.from_terms(terms).unwrap();
            let once = reduce(&f, &basis);
            assert_eq!(reduce(&once, &basis), once);
            let full = total_reduce(&f, &basis);
            assert_eq!(total_reduce(&full, &basis), full);
        }
    }

    #[test]
    fn minimize() {
        let r = PolynomialRing::new(Q, 2, MonomialOrder::GrevLex);
        let b = r.parse_all(&["x^2", "x^2*y", "x^2 + y^3", "y"]).unwrap();
        let m = basis_minimize(b);
        assert_eq!(m.len(), 2);
    }
}
