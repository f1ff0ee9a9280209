//! Solver error types.

/// Error type for solver operations.
///
/// Terminal solve states (infeasible, unbounded, limits) are not errors;
/// they come back as part of a [`crate::SolveOutcome`]. An `Err` from a
/// driver means the engine invocation itself failed.
#[derive(Debug, Clone)]
pub enum SolverError {
    /// No objective sense set on the model.
    NoObjective,
    /// Model data could not be loaded into the engine.
    InternalError(String),
    /// The engine invocation failed.
    EngineFailure(String),
}

impl SolverError {
    /// Returns a semantic error code for programmatic handling.
    pub fn code(&self) -> &'static str {
        match self {
            SolverError::NoObjective => "OBJECTIVE_MISSING",
            SolverError::InternalError(_) => "SOLVER_INTERNAL",
            SolverError::EngineFailure(_) => "ENGINE_FAILURE",
        }
    }
}

impl std::fmt::Display for SolverError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SolverError::NoObjective => write!(f, "[{}] Model has no objective", self.code()),
            SolverError::InternalError(msg) => {
                write!(f, "[{}] Solver internal error: {}", self.code(), msg)
            }
            SolverError::EngineFailure(msg) => {
                write!(f, "[{}] Engine invocation failed: {}", self.code(), msg)
            }
        }
    }
}

impl std::error::Error for SolverError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display_no_objective() {
        let err = SolverError::NoObjective;
        let msg = format!("{}", err);
        assert!(msg.contains("OBJECTIVE_MISSING"));
        assert!(msg.contains("no objective"));
    }

    #[test]
    fn test_error_display_internal_error() {
        let err = SolverError::InternalError("something went wrong".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("SOLVER_INTERNAL"));
        assert!(msg.contains("something went wrong"));
    }

    #[test]
    fn test_error_display_engine_failure() {
        let err = SolverError::EngineFailure("status -1 from solve call".to_string());
        let msg = format!("{}", err);
        assert!(msg.contains("ENGINE_FAILURE"));
        assert!(msg.contains("status -1"));
    }

    #[test]
    fn test_error_code() {
        assert_eq!(SolverError::NoObjective.code(), "OBJECTIVE_MISSING");
        assert_eq!(
            SolverError::InternalError(String::new()).code(),
            "SOLVER_INTERNAL"
        );
        assert_eq!(
            SolverError::EngineFailure(String::new()).code(),
            "ENGINE_FAILURE"
        );
    }
}
