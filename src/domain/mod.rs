//! Domain types used throughout the pipeline.
//!
//! This module defines:
//!
//! - the table schema and the fixed configuration constants (`Schema`, `TargetCase`)
//! - fit outputs (`FittedModel`, `Coefficient`, `FitQuality`)
//! - elimination outputs (`Selection`, `EliminationStep`, `Termination`)

pub mod types;

pub use types::*;
