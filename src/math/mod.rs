//! Mathematical utilities: descriptive statistics and 1-D optimization.

pub mod optimize;
pub mod stats;

pub use optimize::*;
pub use stats::*;
