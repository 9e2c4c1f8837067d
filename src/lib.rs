//! Tangent spaces of Hilbert schemes of points.
//!
//! The crate computes reduced Gröbner bases of polynomial ideals, the finite-dimensional
//! quotient rings and modules they define, and spaces of module homomorphisms between
//! them. On top of that it computes the tangent space `Hom(I/I², R/I)` of the Hilbert
//! scheme of points at an ideal `I`, and the tangent spaces of nested and double nested
//! Hilbert schemes at grids of ideals.
//!
//! For example:
//!
//! ```
//! use hilbert_tangent::domains::rational::Q;
//! use hilbert_tangent::hilbert::HilbertScheme;
//! use hilbert_tangent::ideal::Ideal;
//! use hilbert_tangent::poly::{polynomial::PolynomialRing, MonomialOrder};
//!
//! let r = PolynomialRing::new(Q, 3, MonomialOrder::GrevLex);
//! let i = Ideal::parse(&r, &["x", "y", "z"]).unwrap().power(2).unwrap();
//! let t = HilbertScheme::new(&r).tangent_space(&i).unwrap();
//! println!("dim T = {}", t.dim().unwrap());
//! ```
//!
//! Coefficients are exact rationals ([domains::rational::Q]), floats
//! ([domains::float::FloatField]) or complex floats ([domains::float::ComplexField]).
//! The library emits `tracing` events but never installs a subscriber.

pub mod domains;
pub mod error;
pub mod hilbert;
pub mod hom;
pub mod ideal;
pub mod module;
pub mod nested;
pub mod poly;
pub mod printer;
pub mod settings;
pub mod tensors;
pub mod utils;
