//! Per-solve result record.

use crate::solver::SolveStatus;

/// Result of a single solve attempt.
///
/// Every metric beyond the status is optional: an engine that terminates
/// without an incumbent, or that cannot report a counter, leaves the field
/// absent. Absence is never collapsed to zero.
#[derive(Debug, Clone, PartialEq)]
pub struct SolveOutcome {
    /// Terminal status of the attempt.
    pub status: SolveStatus,
    /// Solve wall time in seconds as reported by the engine.
    pub run_time_seconds: Option<f64>,
    /// Objective value of the best feasible solution found.
    pub best_objective: Option<f64>,
    /// Best bound on the objective proved by the search.
    pub dual_bound: Option<f64>,
    /// Branch-and-bound nodes explored.
    pub explored_nodes: Option<u64>,
    /// Relative gap between incumbent and bound.
    pub relative_gap: Option<f64>,
    /// Primal values of variables indexed by their internal position.
    /// Empty when no feasible solution was found.
    pub primal_values: Vec<f64>,
}

impl SolveOutcome {
    /// Create an outcome with the given status and no metrics.
    pub fn new(status: SolveStatus) -> Self {
        Self {
            status,
            run_time_seconds: None,
            best_objective: None,
            dual_bound: None,
            explored_nodes: None,
            relative_gap: None,
            primal_values: Vec::new(),
        }
    }

    /// Check if the attempt produced a feasible solution.
    pub fn has_incumbent(&self) -> bool {
        self.best_objective.is_some()
    }
}
