//! Solver-agnostic vocabulary shared by engine drivers and the benchmark harness.
//!
//! # Module Organization
//!
//! - [`status`]: Terminal solve status classification
//! - [`config`]: Solve strategy and engine configuration
//! - [`outcome`]: Per-solve result record with optional metrics
//! - [`error`]: Solver error types
//! - [`traits`]: The [`Solve`] seam implemented by engine drivers

mod config;
mod error;
mod outcome;
mod status;
mod traits;

pub use config::{SolveStrategy, SolverConfig};
pub use error::SolverError;
pub use outcome::SolveOutcome;
pub use status::SolveStatus;
pub use traits::Solve;
