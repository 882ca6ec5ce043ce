//! `exo-difficulty` library crate.
//!
//! The binary (`exodiff`) is a thin wrapper around this library so that:
//!
//! - the scoring core is testable without spawning processes
//! - tokenizers and frequency sources can be swapped by other front-ends
//! - code stays easy to navigate as the project grows

pub mod app;
pub mod cli;
pub mod domain;
pub mod error;
pub mod io;
pub mod lexicon;
pub mod math;
pub mod report;
pub mod scoring;
