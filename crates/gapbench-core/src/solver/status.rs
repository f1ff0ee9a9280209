//! Solver status types.

/// Terminal status of a solve attempt.
///
/// Every engine run that returns at all is classified into one of these
/// values; anything an engine reports outside this set maps to `Unknown`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SolveStatus {
    /// Optimal solution found.
    Optimal,
    /// Solver reached time limit (may have feasible solution).
    TimeLimit,
    /// Problem is infeasible.
    Infeasible,
    /// Problem is unbounded.
    Unbounded,
    /// Presolve detected infeasibility or unboundedness without deciding which.
    InfeasibleOrUnbounded,
    /// Status is unknown or solver did not complete.
    Unknown,
}

impl SolveStatus {
    /// Check if the status indicates an optimal solution.
    pub fn is_optimal(self) -> bool {
        matches!(self, SolveStatus::Optimal)
    }

    /// Check if the status indicates infeasibility (including the undecided case).
    pub fn is_infeasible(self) -> bool {
        matches!(
            self,
            SolveStatus::Infeasible | SolveStatus::InfeasibleOrUnbounded
        )
    }

    /// Check if the status indicates unboundedness (including the undecided case).
    pub fn is_unbounded(self) -> bool {
        matches!(
            self,
            SolveStatus::Unbounded | SolveStatus::InfeasibleOrUnbounded
        )
    }

    /// Get a human-readable string representation.
    pub fn as_str(self) -> &'static str {
        match self {
            SolveStatus::Optimal => "optimal",
            SolveStatus::TimeLimit => "time_limit",
            SolveStatus::Infeasible => "infeasible",
            SolveStatus::Unbounded => "unbounded",
            SolveStatus::InfeasibleOrUnbounded => "infeasible_or_unbounded",
            SolveStatus::Unknown => "unknown",
        }
    }
}

impl std::fmt::Display for SolveStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}
