//! Model fitting orchestration.
//!
//! Responsibilities:
//!
//! - fit one OLS model with coefficient inference (`ols`)
//! - residual diagnostics for the summary table (`diagnostics`)
//! - backward elimination by p-value (`selection`)

pub mod diagnostics;
pub mod ols;
pub mod selection;

pub use diagnostics::*;
pub use ols::*;
pub use selection::*;
