//! HiGHS solver implementation.
//!
//! Translates an engine-agnostic [`Model`] into a HiGHS problem, runs the
//! engine, and reads the outcome back. Metrics the engine does not report
//! stay absent in the returned [`SolveOutcome`], and terminal statuses such
//! as infeasibility come back as outcomes rather than errors.

use std::collections::BTreeMap;
use std::time::Instant;

use gapbench_core::{
    Model, Objective, Sense, Solve, SolveOutcome, SolveStatus, SolveStrategy, SolverConfig,
    SolverError, VariableId,
};
use tracing::{debug, trace, warn};

use crate::ffi::{HighsModel, HighsOption, HighsStatus, ObjectiveSense, highs_version};
use crate::status::highs_to_solve_status;

// HiGHS `simplex_strategy` option values (kSimplexStrategy* in the C API).
const SIMPLEX_STRATEGY_DUAL: i32 = 1;
const SIMPLEX_STRATEGY_PRIMAL: i32 = 4;

/// Solver backed by the HiGHS engine.
#[derive(Debug, Clone, Copy, Default)]
pub struct HighsSolver;

impl HighsSolver {
    /// Create a solver with engine defaults.
    pub fn new() -> Self {
        HighsSolver
    }
}

impl Solve for HighsSolver {
    fn solve(
        &mut self,
        model: &Model,
        config: &SolverConfig,
    ) -> Result<SolveOutcome, SolverError> {
        solve_model(model, config)
    }
}

fn solve_model(model: &Model, config: &SolverConfig) -> Result<SolveOutcome, SolverError> {
    let objective = model.objective();
    let Some(sense) = objective.sense else {
        return Err(SolverError::NoObjective);
    };

    if model.num_variables() == 0 {
        return Ok(empty_model_outcome(model));
    }

    let solver_version = highs_version().unwrap_or_else(|| "unknown".to_string());
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_version = %solver_version,
        num_variables = model.num_variables(),
        num_constraints = model.num_constraints(),
        "Starting solve process"
    );
    let started = Instant::now();

    let objective_coefficients = collect_objective_coefficients(objective);

    let mut highs_model = HighsModel::new();
    apply_solver_config(&mut highs_model, config, model.has_integer_variables());
    highs_model.set_objective_sense(match sense {
        Sense::Minimize => ObjectiveSense::Minimize,
        Sense::Maximize => ObjectiveSense::Maximize,
    });

    let variable_columns = add_variables_to_highs(model, &mut highs_model, &objective_coefficients);
    add_constraints_to_highs(model, &mut highs_model, &variable_columns)?;

    let highs_status = highs_model.solve();
    let duration_ms = started.elapsed().as_millis();

    let outcome = extract_outcome(&highs_model, highs_status);
    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solver_status = ?highs_status,
        solve_status = %outcome.status,
        objective_value = ?outcome.best_objective,
        dual_bound = ?outcome.dual_bound,
        explored_nodes = ?outcome.explored_nodes,
        simplex_iterations = ?highs_model.simplex_iteration_count(),
        duration_ms,
        "Solve process completed"
    );
    if !outcome.status.is_optimal() {
        warn!(
            component = "solver",
            operation = "solve",
            status = "warn",
            solver = "highs",
            solve_status = %outcome.status,
            "Solver terminated without proving optimality"
        );
    }

    Ok(outcome)
}

/// Resolve a model with no variables without calling the engine.
///
/// Every row evaluates to zero, so feasibility is decided by whether zero
/// sits inside each row's bounds; the objective of the empty solution is
/// zero.
fn empty_model_outcome(model: &Model) -> SolveOutcome {
    let feasible = model
        .constraints()
        .all(|(_, constraint)| constraint.bounds.lower <= 0.0 && constraint.bounds.upper >= 0.0);

    let mut outcome = if feasible {
        let mut outcome = SolveOutcome::new(SolveStatus::Optimal);
        outcome.best_objective = Some(0.0);
        outcome
    } else {
        SolveOutcome::new(SolveStatus::Infeasible)
    };
    outcome.run_time_seconds = Some(0.0);

    debug!(
        component = "solver",
        operation = "solve",
        status = "success",
        solver = "highs",
        solve_status = %outcome.status,
        "Model has no variables; resolved without engine call"
    );
    outcome
}

fn collect_objective_coefficients(objective: &Objective) -> BTreeMap<VariableId, f64> {
    let mut coefficients: BTreeMap<VariableId, f64> = BTreeMap::new();
    for (variable_id, coefficient) in &objective.terms {
        *coefficients.entry(*variable_id).or_insert(0.0) += *coefficient;
    }
    coefficients
}

fn apply_solver_config(
    highs_model: &mut HighsModel,
    config: &SolverConfig,
    has_integer_variables: bool,
) {
    highs_model.set_log_to_console(config.log_to_console.unwrap_or(false));
    if let Some(time_limit) = config.time_limit {
        highs_model.set_option("time_limit", HighsOption::Float(time_limit));
    }
    if let Some(mip_gap) = config.mip_gap {
        highs_model.set_option("mip_rel_gap", HighsOption::Float(mip_gap));
    }
    if let Some(presolve) = config.presolve {
        let value = if presolve { "on" } else { "off" };
        highs_model.set_option("presolve", HighsOption::Str(value.to_string()));
    }
    if let Some(threads) = config.threads {
        highs_model.set_option("threads", HighsOption::Int(threads as i32));
    }

    match config.strategy {
        Some(SolveStrategy::PrimalSimplex) => {
            highs_model.set_option("simplex_strategy", HighsOption::Int(SIMPLEX_STRATEGY_PRIMAL));
        }
        Some(SolveStrategy::DualSimplex) => {
            highs_model.set_option("simplex_strategy", HighsOption::Int(SIMPLEX_STRATEGY_DUAL));
        }
        Some(SolveStrategy::Barrier) => {
            if has_integer_variables {
                // Forcing `solver = ipm` makes HiGHS relax integrality, so an
                // integer model keeps the engine default for node relaxations.
                debug!(
                    component = "solver",
                    operation = "configure",
                    status = "success",
                    strategy = "barrier",
                    "Integer model keeps default relaxation algorithm"
                );
            } else {
                highs_model.set_option("solver", HighsOption::Str("ipm".to_string()));
            }
        }
        None => {}
    }

    if !config.is_empty() {
        debug!(
            component = "solver",
            operation = "configure",
            status = "success",
            ?config,
            "Applied solver configuration"
        );
    }
}

fn add_variables_to_highs(
    model: &Model,
    highs_model: &mut HighsModel,
    objective_coefficients: &BTreeMap<VariableId, f64>,
) -> BTreeMap<VariableId, usize> {
    let mut variable_columns = BTreeMap::new();
    // Columns are created in ascending variable-id order, so the primal
    // vector read back after solving lines up with id order.
    for (variable_id, variable) in model.variables() {
        let coefficient = objective_coefficients
            .get(&variable_id)
            .copied()
            .unwrap_or(0.0);
        let column = if variable.is_integer {
            highs_model.add_integer_col(variable.bounds.lower, variable.bounds.upper, coefficient)
        } else {
            highs_model.add_col(variable.bounds.lower, variable.bounds.upper, coefficient)
        };
        variable_columns.insert(variable_id, column);
        trace!(
            component = "solver",
            operation = "add_variable",
            status = "success",
            variable_id = variable_id.inner(),
            column,
            is_integer = variable.is_integer,
            "Added variable to HiGHS"
        );
    }
    debug!(
        component = "solver",
        operation = "add_variables",
        status = "success",
        num_variables = variable_columns.len(),
        "Added variables to HiGHS"
    );
    variable_columns
}

fn add_constraints_to_highs(
    model: &Model,
    highs_model: &mut HighsModel,
    variable_columns: &BTreeMap<VariableId, usize>,
) -> Result<(), SolverError> {
    for (constraint_id, constraint) in model.constraints() {
        let mut columns = Vec::new();
        let mut coefficients = Vec::new();
        if let Some(row) = model.get_row(constraint_id) {
            columns.reserve(row.len());
            coefficients.reserve(row.len());
            for (variable_id, coefficient) in row {
                let Some(&column) = variable_columns.get(variable_id) else {
                    warn!(
                        component = "solver",
                        operation = "add_constraint",
                        status = "warn",
                        constraint_id = constraint_id.inner(),
                        variable_id = variable_id.inner(),
                        "Row references a variable without a HiGHS column; dropping coefficient"
                    );
                    continue;
                };
                columns.push(column);
                coefficients.push(*coefficient);
            }
        }
        highs_model
            .add_row(
                constraint.bounds.lower,
                constraint.bounds.upper,
                &columns,
                &coefficients,
            )
            .map_err(|err| SolverError::InternalError(err.to_string()))?;
        trace!(
            component = "solver",
            operation = "add_constraint",
            status = "success",
            constraint_id = constraint_id.inner(),
            num_terms = columns.len(),
            "Added constraint to HiGHS"
        );
    }
    debug!(
        component = "solver",
        operation = "add_constraints",
        status = "success",
        num_constraints = model.num_constraints(),
        "Added constraints to HiGHS"
    );
    Ok(())
}

fn extract_outcome(highs_model: &HighsModel, highs_status: HighsStatus) -> SolveOutcome {
    let mut outcome = SolveOutcome::new(highs_to_solve_status(highs_status));
    outcome.run_time_seconds = highs_model.run_time_seconds();
    outcome.dual_bound = highs_model.dual_bound();
    outcome.explored_nodes = highs_model.node_count();

    // Incumbent-dependent metrics are read only when the engine reports a
    // feasible primal solution; otherwise the stored values are meaningless.
    if highs_model.has_feasible_solution() {
        outcome.best_objective = highs_model.objective_function_value();
        outcome.relative_gap = highs_model.relative_gap();
        match highs_model.primal_column_values() {
            Some(values) => outcome.primal_values = values,
            None => warn!(
                component = "solver",
                operation = "extract_solution",
                status = "warn",
                "Incumbent reported but primal values unavailable"
            ),
        }
    }

    debug!(
        component = "solver",
        operation = "extract_solution",
        status = "success",
        solve_status = %outcome.status,
        has_incumbent = outcome.has_incumbent(),
        num_primal_values = outcome.primal_values.len(),
        "Extracted solve outcome"
    );
    outcome
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use gapbench_core::{Bounds, Constraint};

    fn objective(sense: Sense, terms: Vec<(VariableId, f64)>) -> Objective {
        Objective {
            sense: Some(sense),
            terms,
        }
    }

    #[test]
    fn test_missing_objective_sense_is_an_error() {
        let model = Model::new();
        let mut solver = HighsSolver::new();
        let result = solver.solve(&model, &SolverConfig::new());
        assert!(matches!(result, Err(SolverError::NoObjective)));
    }

    #[test]
    fn test_empty_model_is_trivially_optimal() {
        let mut model = Model::new();
        model
            .set_objective(objective(Sense::Maximize, Vec::new()))
            .unwrap();

        let mut solver = HighsSolver::new();
        let outcome = solver.solve(&model, &SolverConfig::new()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Optimal);
        assert_eq!(outcome.best_objective, Some(0.0));
        assert_eq!(outcome.run_time_seconds, Some(0.0));
        assert!(outcome.primal_values.is_empty());
    }

    #[test]
    fn test_empty_model_with_unsatisfiable_row_is_infeasible() {
        let mut model = Model::new();
        model
            .add_constraint(Constraint {
                bounds: Bounds::new(f64::NEG_INFINITY, -5.0),
            })
            .unwrap();
        model
            .set_objective(objective(Sense::Maximize, Vec::new()))
            .unwrap();

        let mut solver = HighsSolver::new();
        let outcome = solver.solve(&model, &SolverConfig::new()).unwrap();
        assert_eq!(outcome.status, SolveStatus::Infeasible);
        assert_eq!(outcome.best_objective, None);
    }

    #[test]
    fn test_objective_coefficients_merge_duplicates() {
        let var = VariableId::new(3);
        let merged = collect_objective_coefficients(&Objective {
            sense: Some(Sense::Maximize),
            terms: vec![(var, 2.0), (var, 3.0)],
        });
        assert_eq!(merged.get(&var), Some(&5.0));
    }
}
