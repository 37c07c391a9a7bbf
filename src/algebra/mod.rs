//! GF(2) multilinear-polynomial kernel.
//!
//! Replaces the dynamically-typed polynomial-ring library the verifier this
//! crate is modeled on leans on externally: monomials are sorted small
//! integer variable-id sequences, polynomials are sorted sets of monomials,
//! and every operation here is total and allocation-explicit.

pub mod polynomial;

pub use polynomial::{Monomial, Polynomial, VarId};
