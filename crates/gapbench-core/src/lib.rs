//! Core instance handling, model assembly, and solver abstractions for the
//! generalized assignment benchmark.

pub mod gap;
pub mod instance;
pub mod model;
pub mod solver;
pub mod types;

pub use gap::GapModel;
pub use instance::{Instance, InstanceError};
pub use model::{Model, ModelError};
pub use solver::{Solve, SolveOutcome, SolveStatus, SolveStrategy, SolverConfig, SolverError};
pub use types::{Bounds, Constraint, ConstraintId, Objective, Sense, Variable, VariableId};
