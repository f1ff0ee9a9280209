//! Conversion between HiGHS statuses and engine-agnostic solve statuses.

use crate::ffi::HighsStatus;
use gapbench_core::SolveStatus;

/// Convert a HiGHS termination status to the engine-agnostic status.
///
/// Iteration-limit terminations have no dedicated outcome and fold into
/// `Unknown`; the presolve verdict that cannot separate infeasibility from
/// unboundedness keeps its combined form.
pub(crate) fn highs_to_solve_status(status: HighsStatus) -> SolveStatus {
    match status {
        HighsStatus::Optimal => SolveStatus::Optimal,
        HighsStatus::Infeasible => SolveStatus::Infeasible,
        HighsStatus::Unbounded => SolveStatus::Unbounded,
        HighsStatus::UnboundedOrInfeasible => SolveStatus::InfeasibleOrUnbounded,
        HighsStatus::ReachedTimeLimit => SolveStatus::TimeLimit,
        HighsStatus::ReachedIterationLimit | HighsStatus::Unknown => SolveStatus::Unknown,
    }
}
