//! Mathematical utilities: least squares and sampling distributions.

pub mod inference;
pub mod ols;

pub use inference::*;
pub use ols::*;
