//! HiGHS backend for the generalized assignment benchmark.
//!
//! [`HighsSolver`] implements the [`Solve`](gapbench_core::Solve) trait on
//! top of a thin safe wrapper around the HiGHS C API. The wrapper lives in
//! [`ffi`] and can be used directly when the engine-agnostic model layer is
//! not needed.

pub mod ffi;
pub mod solver;

mod status;

pub use ffi::{
    HighsModel, HighsModelError, HighsOption, HighsStatus, ObjectiveSense, highs_version,
};
pub use solver::HighsSolver;
