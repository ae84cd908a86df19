//! Input/output helpers.
//!
//! - CSV ingest + validation (`ingest`)
//! - result exports (CSV/JSON) (`export`)
//! - target case JSON (`target`)

pub mod export;
pub mod ingest;
pub mod target;

pub use export::*;
pub use ingest::*;
pub use target::*;
