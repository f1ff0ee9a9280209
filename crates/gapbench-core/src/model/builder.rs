//! Model builder methods for adding variables, constraints, and objectives.

use crate::types::{Constraint, ConstraintId, Objective, Variable, VariableId};

use crate::model::Model;
use crate::model::error::ModelError;

impl Model {
    /// Add a variable to the model.
    pub fn add_variable(&mut self, variable: Variable) -> Result<VariableId, ModelError> {
        if variable.bounds.lower.is_nan()
            || variable.bounds.upper.is_nan()
            || variable.bounds.lower > variable.bounds.upper
        {
            return Err(ModelError::InvalidVariableBounds {
                lower: variable.bounds.lower,
                upper: variable.bounds.upper,
            });
        }

        let id = VariableId::new(self.next_variable_id);
        self.next_variable_id += 1;

        self.variables.insert(id, variable);

        Ok(id)
    }

    /// Add a constraint to the model.
    pub fn add_constraint(&mut self, constraint: Constraint) -> Result<ConstraintId, ModelError> {
        if constraint.bounds.lower.is_nan()
            || constraint.bounds.upper.is_nan()
            || constraint.bounds.lower > constraint.bounds.upper
        {
            return Err(ModelError::InvalidConstraintBounds {
                lower: constraint.bounds.lower,
                upper: constraint.bounds.upper,
            });
        }

        let id = ConstraintId::new(self.next_constraint_id);
        self.next_constraint_id += 1;

        self.constraints.insert(id, constraint);

        Ok(id)
    }

    /// Set the objective function.
    pub fn set_objective(&mut self, objective: Objective) -> Result<(), ModelError> {
        let sense = objective.sense.ok_or(ModelError::NoObjective)?;
        for (var_id, coeff) in &objective.terms {
            self.ensure_variable_exists(*var_id)?;
            if !coeff.is_finite() {
                return Err(ModelError::InvalidCoefficient {
                    coefficient: *coeff,
                });
            }
        }

        let normalized = self.normalize_terms(objective.terms);
        self.objective = Objective {
            sense: Some(sense),
            terms: normalized,
        };
        tracing::debug!(
            component = "model",
            operation = "set_objective",
            status = "success",
            sense = ?sense,
            terms = self.objective.terms.len(),
            "Set objective function"
        );
        Ok(())
    }

    /// Add a coefficient to the constraint matrix.
    ///
    /// This adds a coefficient at the intersection of a constraint row and variable column.
    /// Returns an error if the variable or constraint IDs are invalid.
    pub fn set_coefficient(
        &mut self,
        var_id: VariableId,
        constraint_id: ConstraintId,
        coefficient: f64,
    ) -> Result<(), ModelError> {
        if !coefficient.is_finite() {
            return Err(ModelError::InvalidCoefficient { coefficient });
        }
        self.ensure_variable_exists(var_id)?;
        self.ensure_constraint_exists(constraint_id)?;

        // Update or insert in row-first storage.
        let row = self.rows.entry(constraint_id).or_default();
        match row.iter_mut().find(|(id, _)| *id == var_id) {
            Some(entry) => entry.1 = coefficient,
            None => row.push((var_id, coefficient)),
        }

        Ok(())
    }
}
