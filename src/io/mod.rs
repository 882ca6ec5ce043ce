//! Input/output helpers.
//!
//! - exercise CSV ingest + validation (`ingest`)
//! - labeled exercise / word table CSV exports (`export`)
//! - word table JSON read/write (`table`)

pub mod export;
pub mod ingest;
pub mod table;

pub use export::*;
pub use ingest::*;
pub use table::*;
