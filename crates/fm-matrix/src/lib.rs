//! `fm-matrix` - Dense integer matrices for forkmul.
//!
//! This crate provides:
//! - A row-major `Matrix` of fixed-width integers
//! - `Dims` and the conformability check used before any multiplication
//! - Disjoint mutable views (`rows_mut`, `cells_mut`) that let workers write
//!   into a shared output without locks

pub mod dims;
pub mod error;
pub mod matrix;

// Re-export primary types at the crate root for convenience.
pub use dims::{can_multiply, Dims};
pub use error::{MatrixError, Result};
pub use matrix::{Element, Matrix};
