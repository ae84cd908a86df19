//! In-memory data: the validated observation table, design matrices, and a
//! seeded synthetic dataset generator.

pub mod design;
pub mod sample;
pub mod table;

pub use design::*;
pub use sample::*;
pub use table::*;
