//! Prediction from a fitted linear model.
//!
//! Kept as small, pure functions so the reporter and the CLI share one
//! definition of "apply the model to a case".

pub mod model;

pub use model::*;
