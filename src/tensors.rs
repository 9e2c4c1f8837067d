//! Dense and sparse matrices over a field, with the elimination routines used to
//! compute ranks and null spaces of constraint systems.
//!
//! In exact fields elimination picks the first non-zero pivot, in inexact fields
//! the pivot with the largest magnitude (partial pivoting).

pub mod matrix;
pub mod sparse;
