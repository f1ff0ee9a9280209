//! Solver traits for abstraction over different solver backends.

use crate::model::Model;
use crate::solver::{SolveOutcome, SolverConfig, SolverError};

/// Trait for solver implementations.
///
/// This trait defines the interface that all engine drivers must implement.
/// The benchmark harness drives batches through it so tests can substitute
/// a scripted engine for a real one.
pub trait Solve {
    /// Solve the model with the given configuration.
    ///
    /// # Errors
    ///
    /// Returns a `SolverError` if the model cannot be loaded into the engine
    /// or the engine invocation itself fails. Terminal solve states such as
    /// infeasibility are reported through the returned [`SolveOutcome`].
    fn solve(
        &mut self,
        model: &Model,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, SolverError>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SolveStatus;
    use crate::types::{Objective, Sense, Variable};

    struct FixtureEngine {
        status: SolveStatus,
    }

    impl Solve for FixtureEngine {
        fn solve(
            &mut self,
            model: &Model,
            _config: &SolverConfig,
        ) -> Result<SolveOutcome, SolverError> {
            let mut outcome = SolveOutcome::new(self.status);
            outcome.primal_values = vec![0.0; model.num_variables()];
            Ok(outcome)
        }
    }

    #[test]
    fn test_engine_seam_is_object_safe() {
        let mut model = Model::new();
        let var_id = model.add_variable(Variable::binary()).unwrap();
        model
            .set_objective(Objective {
                sense: Some(Sense::Maximize),
                terms: vec![(var_id, 1.0)],
            })
            .unwrap();

        let mut engine: Box<dyn Solve> = Box::new(FixtureEngine {
            status: SolveStatus::Optimal,
        });
        let outcome = engine.solve(&model, &SolverConfig::new()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.primal_values.len(), 1);
    }
}
