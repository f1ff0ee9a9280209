//! Model module for building optimization models.
//!
//! This module provides the core [`Model`] type and related structures for building
//! linear and mixed-integer programming models.
//!
//! # Module Organization
//!
//! - [`error`]: Model error types
//! - [`builder`]: Methods for adding variables, constraints, and objectives

mod builder;
mod error;

use crate::types::{Constraint, ConstraintId, Objective, Variable, VariableId};
use std::collections::BTreeMap;

pub use error::ModelError;

/// A lazy model builder for linear and mixed-integer programs.
///
/// Variables, constraints, and objectives can be added at any time.
/// The constraint matrix uses row-first sparse storage.
#[derive(Debug, Clone)]
pub struct Model {
    pub(crate) variables: BTreeMap<VariableId, Variable>,
    pub(crate) constraints: BTreeMap<ConstraintId, Constraint>,
    pub(crate) objective: Objective,
    // Row-first sparse storage: constraint_id -> vec of (variable_id, coefficient)
    pub(crate) rows: BTreeMap<ConstraintId, Vec<(VariableId, f64)>>,
    pub(crate) next_variable_id: u32,
    pub(crate) next_constraint_id: u32,
    // Lazy-allocated name storage
    pub(crate) variable_names: Option<BTreeMap<VariableId, String>>,
    pub(crate) constraint_names: Option<BTreeMap<ConstraintId, String>>,
}

impl Model {
    /// Create a new empty model.
    pub fn new() -> Self {
        Self {
            variables: BTreeMap::new(),
            constraints: BTreeMap::new(),
            objective: Objective::new(),
            rows: BTreeMap::new(),
            next_variable_id: 0,
            next_constraint_id: 0,
            variable_names: None,
            constraint_names: None,
        }
    }

    /// Number of variables in the model.
    pub fn num_variables(&self) -> usize {
        self.variables.len()
    }

    /// Number of constraints in the model.
    pub fn num_constraints(&self) -> usize {
        self.constraints.len()
    }

    /// Get the objective
    pub fn objective(&self) -> &Objective {
        &self.objective
    }

    /// Get a variable by ID.
    pub fn get_variable(&self, id: VariableId) -> Option<&Variable> {
        self.variables.get(&id)
    }

    /// Get a constraint by ID.
    pub fn get_constraint(&self, id: ConstraintId) -> Option<&Constraint> {
        self.constraints.get(&id)
    }

    /// Iterate variables in ascending ID order.
    pub fn variables(&self) -> impl Iterator<Item = (VariableId, &Variable)> {
        self.variables.iter().map(|(id, var)| (*id, var))
    }

    /// Iterate constraints in ascending ID order.
    pub fn constraints(&self) -> impl Iterator<Item = (ConstraintId, &Constraint)> {
        self.constraints.iter().map(|(id, con)| (*id, con))
    }

    /// Get the sparse row for a constraint, if any coefficients were set.
    pub fn get_row(&self, id: ConstraintId) -> Option<&Vec<(VariableId, f64)>> {
        self.rows.get(&id)
    }

    /// True if any variable carries an integrality constraint.
    pub fn has_integer_variables(&self) -> bool {
        self.variables.values().any(|var| var.is_integer)
    }

    /// Set name for a variable.
    pub fn set_variable_name(&mut self, id: VariableId, name: String) -> Result<(), ModelError> {
        self.ensure_variable_exists(id)?;
        self.variable_names
            .get_or_insert_with(BTreeMap::new)
            .insert(id, name);
        Ok(())
    }

    /// Get name for a variable.
    pub fn get_variable_name(&self, id: VariableId) -> Option<&str> {
        self.variable_names
            .as_ref()
            .and_then(|names| names.get(&id).map(|s| s.as_str()))
    }

    /// Set name for a constraint.
    pub fn set_constraint_name(
        &mut self,
        id: ConstraintId,
        name: String,
    ) -> Result<(), ModelError> {
        self.ensure_constraint_exists(id)?;
        self.constraint_names
            .get_or_insert_with(BTreeMap::new)
            .insert(id, name);
        Ok(())
    }

    /// Get name for a constraint.
    pub fn get_constraint_name(&self, id: ConstraintId) -> Option<&str> {
        self.constraint_names
            .as_ref()
            .and_then(|names| names.get(&id).map(|s| s.as_str()))
    }

    pub(crate) fn ensure_variable_exists(&self, id: VariableId) -> Result<(), ModelError> {
        if self.variables.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidVariableId(id))
        }
    }

    pub(crate) fn ensure_constraint_exists(&self, id: ConstraintId) -> Result<(), ModelError> {
        if self.constraints.contains_key(&id) {
            Ok(())
        } else {
            Err(ModelError::InvalidConstraintId(id))
        }
    }

    pub(crate) fn normalize_terms(&self, terms: Vec<(VariableId, f64)>) -> Vec<(VariableId, f64)> {
        let mut merged: BTreeMap<VariableId, f64> = BTreeMap::new();
        for (var_id, coeff) in terms {
            *merged.entry(var_id).or_insert(0.0) += coeff;
        }

        merged
            .into_iter()
            .filter(|(_, coeff)| *coeff != 0.0)
            .collect()
    }
}

impl Default for Model {
    fn default() -> Self {
        Self::new()
    }
}
