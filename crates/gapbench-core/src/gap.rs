//! Assembly of the assignment model from an instance.
//!
//! One binary variable `x_{i}_{j}` per (agent, task) pair, one equality row
//! per task forcing the task onto exactly one agent, one upper-bounded row
//! per agent charging capacity costs against the agent's budget, and a
//! maximized profit objective.

use tracing::debug;

use crate::instance::Instance;
use crate::model::{Model, ModelError};
use crate::types::{Bounds, Constraint, ConstraintId, Objective, Sense, Variable, VariableId};

/// A [`Model`] built from one [`Instance`], with the id grid retained so
/// solutions can be read back in instance terms.
#[derive(Debug, Clone)]
pub struct GapModel {
    model: Model,
    // variable_grid[agent][task]
    variable_grid: Vec<Vec<VariableId>>,
    assignment_rows: Vec<ConstraintId>,
    capacity_rows: Vec<ConstraintId>,
}

impl GapModel {
    /// Build the assignment model for an instance.
    ///
    /// Deterministic: the same instance always yields the same variable and
    /// constraint structure. Zero or negative capacity budgets are accepted;
    /// they simply constrain the agent to assignments it can still afford.
    pub fn build(instance: &Instance) -> Result<Self, ModelError> {
        let nb_agents = instance.nb_agents();
        let nb_tasks = instance.nb_tasks();

        let mut model = Model::new();

        let mut variable_grid = Vec::with_capacity(nb_agents);
        for agent in 0..nb_agents {
            let mut row = Vec::with_capacity(nb_tasks);
            for task in 0..nb_tasks {
                let id = model.add_variable(Variable::binary())?;
                model.set_variable_name(id, format!("x_{agent}_{task}"))?;
                row.push(id);
            }
            variable_grid.push(row);
        }

        let mut assignment_rows = Vec::with_capacity(nb_tasks);
        for task in 0..nb_tasks {
            let row = model.add_constraint(Constraint {
                bounds: Bounds::new(1.0, 1.0),
            })?;
            model.set_constraint_name(row, format!("assign_{task}"))?;
            for agent_row in &variable_grid {
                model.set_coefficient(agent_row[task], row, 1.0)?;
            }
            assignment_rows.push(row);
        }

        let mut capacity_rows = Vec::with_capacity(nb_agents);
        for agent in 0..nb_agents {
            let limit = instance.capacity_limit()[agent] as f64;
            let row = model.add_constraint(Constraint {
                bounds: Bounds::new(f64::NEG_INFINITY, limit),
            })?;
            model.set_constraint_name(row, format!("cap_{agent}"))?;
            for task in 0..nb_tasks {
                let cost = instance.capacity_cost()[agent][task] as f64;
                if cost != 0.0 {
                    model.set_coefficient(variable_grid[agent][task], row, cost)?;
                }
            }
            capacity_rows.push(row);
        }

        let mut terms = Vec::with_capacity(nb_agents * nb_tasks);
        for agent in 0..nb_agents {
            for task in 0..nb_tasks {
                terms.push((
                    variable_grid[agent][task],
                    instance.profit()[agent][task] as f64,
                ));
            }
        }
        model.set_objective(Objective {
            sense: Some(Sense::Maximize),
            terms,
        })?;

        debug!(
            component = "model",
            operation = "build_gap",
            status = "success",
            instance = instance.name(),
            nb_agents,
            nb_tasks,
            variables = model.num_variables(),
            constraints = model.num_constraints(),
            "Built assignment model"
        );

        Ok(Self {
            model,
            variable_grid,
            assignment_rows,
            capacity_rows,
        })
    }

    /// The underlying model.
    pub fn model(&self) -> &Model {
        &self.model
    }

    /// Variable for agent `i` performing task `j`.
    pub fn variable(&self, agent: usize, task: usize) -> Option<VariableId> {
        self.variable_grid
            .get(agent)
            .and_then(|row| row.get(task))
            .copied()
    }

    /// Per-task assignment rows, in task order.
    pub fn assignment_rows(&self) -> &[ConstraintId] {
        &self.assignment_rows
    }

    /// Per-agent capacity rows, in agent order.
    pub fn capacity_rows(&self) -> &[ConstraintId] {
        &self.capacity_rows
    }

    /// Objective coefficient for a grid position, zero when the term was
    /// dropped as zero-profit.
    pub fn objective_coefficient(&self, agent: usize, task: usize) -> f64 {
        let Some(id) = self.variable(agent, task) else {
            return 0.0;
        };
        self.model
            .objective()
            .terms
            .iter()
            .find(|(var_id, _)| *var_id == id)
            .map(|(_, coeff)| *coeff)
            .unwrap_or(0.0)
    }

    /// Read the agent chosen for each task out of a primal solution.
    ///
    /// Primal values are indexed by variable position, the order in which
    /// [`build`](Self::build) created the grid. A task with no variable above
    /// one half (no feasible solution, or a truncated vector) comes back as
    /// `None`.
    pub fn assignment_from(&self, primal_values: &[f64]) -> Vec<Option<usize>> {
        let nb_tasks = self.variable_grid.first().map_or(0, Vec::len);
        let mut assignment = vec![None; nb_tasks];
        for (task, slot) in assignment.iter_mut().enumerate() {
            for (agent, row) in self.variable_grid.iter().enumerate() {
                let position = row[task].inner() as usize;
                if primal_values.get(position).copied().unwrap_or(0.0) > 0.5 {
                    *slot = Some(agent);
                    break;
                }
            }
        }
        assignment
    }
}

#[cfg(test)]
#[allow(clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::instance::Instance;

    fn small_instance() -> Instance {
        Instance::new(
            "small",
            vec![vec![3, 1], vec![2, 4]],
            vec![vec![1, 1], vec![1, 1]],
            vec![1, 1],
        )
        .unwrap()
    }

    #[test]
    fn build_produces_grid_shape() {
        let instance = small_instance();
        let gap = GapModel::build(&instance).unwrap();

        assert_eq!(gap.model().num_variables(), 4);
        assert_eq!(gap.assignment_rows().len(), 2);
        assert_eq!(gap.capacity_rows().len(), 2);
        assert_eq!(gap.model().num_constraints(), 4);

        for agent in 0..2 {
            for task in 0..2 {
                let id = gap.variable(agent, task).unwrap();
                assert!(gap.model().get_variable(id).unwrap().is_integer);
                assert_eq!(
                    gap.model().get_variable_name(id),
                    Some(format!("x_{agent}_{task}").as_str())
                );
            }
        }
    }

    #[test]
    fn objective_coefficients_match_profit() {
        let instance = small_instance();
        let gap = GapModel::build(&instance).unwrap();

        assert_eq!(gap.objective_coefficient(0, 0), 3.0);
        assert_eq!(gap.objective_coefficient(0, 1), 1.0);
        assert_eq!(gap.objective_coefficient(1, 0), 2.0);
        assert_eq!(gap.objective_coefficient(1, 1), 4.0);
        assert_eq!(gap.model().objective().sense, Some(Sense::Maximize));
    }

    #[test]
    fn assignment_rows_sum_to_one() {
        let instance = small_instance();
        let gap = GapModel::build(&instance).unwrap();

        for (task, row_id) in gap.assignment_rows().iter().enumerate() {
            let constraint = gap.model().get_constraint(*row_id).unwrap();
            assert_eq!(constraint.bounds, Bounds::new(1.0, 1.0));

            let row = gap.model().get_row(*row_id).unwrap();
            assert_eq!(row.len(), 2);
            for agent in 0..2 {
                let id = gap.variable(agent, task).unwrap();
                assert!(row.contains(&(id, 1.0)));
            }
        }
    }

    #[test]
    fn capacity_rows_carry_costs_and_limits() {
        let instance = Instance::new(
            "costs",
            vec![vec![5, 6], vec![7, 8]],
            vec![vec![2, 3], vec![4, 5]],
            vec![9, -1],
        )
        .unwrap();
        let gap = GapModel::build(&instance).unwrap();

        let first = gap.model().get_constraint(gap.capacity_rows()[0]).unwrap();
        assert!(first.bounds.lower.is_infinite() && first.bounds.lower < 0.0);
        assert_eq!(first.bounds.upper, 9.0);

        // Negative budgets are kept as-is.
        let second = gap.model().get_constraint(gap.capacity_rows()[1]).unwrap();
        assert_eq!(second.bounds.upper, -1.0);

        let row = gap.model().get_row(gap.capacity_rows()[1]).unwrap();
        assert!(row.contains(&(gap.variable(1, 0).unwrap(), 4.0)));
        assert!(row.contains(&(gap.variable(1, 1).unwrap(), 5.0)));
    }

    #[test]
    fn zero_cost_entries_are_skipped() {
        let instance = Instance::new(
            "zerocost",
            vec![vec![1, 1]],
            vec![vec![0, 2]],
            vec![3],
        )
        .unwrap();
        let gap = GapModel::build(&instance).unwrap();

        let row = gap.model().get_row(gap.capacity_rows()[0]).unwrap();
        assert_eq!(row, &vec![(gap.variable(0, 1).unwrap(), 2.0)]);
    }

    #[test]
    fn zero_tasks_build_empty_objective() {
        let instance = Instance::new("zero", vec![vec![]], vec![vec![]], vec![5]).unwrap();
        let gap = GapModel::build(&instance).unwrap();

        assert_eq!(gap.model().num_variables(), 0);
        assert_eq!(gap.assignment_rows().len(), 0);
        assert_eq!(gap.capacity_rows().len(), 1);
        assert!(gap.model().objective().terms.is_empty());
        assert_eq!(gap.model().objective().sense, Some(Sense::Maximize));
    }

    #[test]
    fn build_is_deterministic() {
        let instance = small_instance();
        let first = GapModel::build(&instance).unwrap();
        let second = GapModel::build(&instance).unwrap();

        assert_eq!(
            first.model().num_variables(),
            second.model().num_variables()
        );
        assert_eq!(
            first.model().num_constraints(),
            second.model().num_constraints()
        );
        assert_eq!(
            first.model().objective().terms,
            second.model().objective().terms
        );
        for (a, b) in first
            .assignment_rows()
            .iter()
            .chain(first.capacity_rows())
            .zip(second.assignment_rows().iter().chain(second.capacity_rows()))
        {
            assert_eq!(first.model().get_row(*a), second.model().get_row(*b));
            assert_eq!(
                first.model().get_constraint(*a).unwrap().bounds,
                second.model().get_constraint(*b).unwrap().bounds
            );
        }
    }

    #[test]
    fn assignment_from_reads_grid_positions() {
        let instance = small_instance();
        let gap = GapModel::build(&instance).unwrap();

        // x_0_0 and x_1_1 selected.
        let primal = vec![1.0, 0.0, 0.0, 1.0];
        assert_eq!(gap.assignment_from(&primal), vec![Some(0), Some(1)]);

        // Fractional noise below the threshold reads as unassigned.
        let primal = vec![0.2, 0.0, 0.3, 0.0];
        assert_eq!(gap.assignment_from(&primal), vec![None, None]);

        // Truncated vectors never panic.
        assert_eq!(gap.assignment_from(&[]), vec![None, None]);
    }
}
