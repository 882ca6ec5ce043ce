//! Difficulty scoring.
//!
//! Responsibilities:
//!
//! - collect the unique-token corpus (`corpus`)
//! - score each token from its length and rarity (`word`)
//! - reduce skew with a Box–Cox power transform (`normalize`)
//! - bin scores into equal-frequency ranks (`quantile`) and map ranks to labels (`level`)
//! - build the immutable token → difficulty table (`table`)
//! - aggregate word scores per sentence (`sentence`)
//! - run the whole pipeline over an exercise dataset (`classifier`)

pub mod classifier;
pub mod corpus;
pub mod level;
pub mod normalize;
pub mod quantile;
pub mod sentence;
pub mod table;
pub mod word;

pub use classifier::*;
pub use corpus::*;
pub use level::*;
pub use normalize::*;
pub use quantile::*;
pub use sentence::*;
pub use table::*;
pub use word::*;
