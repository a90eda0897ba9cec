//! Labeled multi-dimensional variable collections.
//!
//! A [`Dataset`] holds named dimensions, variables stored as flattened
//! row-major polars series, and table-level attributes. Variables are kept in
//! name order so every walk over them is deterministic.

use crate::constants::{DIM_INDEX, DIM_N_LEVELS, DIM_N_PROF};
use crate::error::{ArgoError, Result};
use polars::prelude::*;
use std::collections::BTreeMap;
use std::fmt;
use tracing::debug;

/// Table-level attribute value
#[derive(Debug, Clone, PartialEq)]
pub enum AttrValue {
    Text(String),
    Int(i64),
    Float(f64),
}

impl From<&str> for AttrValue {
    fn from(value: &str) -> Self {
        AttrValue::Text(value.to_string())
    }
}

impl From<String> for AttrValue {
    fn from(value: String) -> Self {
        AttrValue::Text(value)
    }
}

impl From<i64> for AttrValue {
    fn from(value: i64) -> Self {
        AttrValue::Int(value)
    }
}

impl From<f64> for AttrValue {
    fn from(value: f64) -> Self {
        AttrValue::Float(value)
    }
}

impl fmt::Display for AttrValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AttrValue::Text(v) => write!(f, "{v}"),
            AttrValue::Int(v) => write!(f, "{v}"),
            AttrValue::Float(v) => write!(f, "{v}"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableRole {
    /// Labels positions along a dimension (latitude, time, ...)
    Coordinate,
    /// Measured or derived values
    Data,
}

/// A named-dimension array backed by a polars series
#[derive(Debug, Clone)]
pub struct Variable {
    dims: Vec<String>,
    data: Series,
    role: VariableRole,
}

impl Variable {
    pub fn new(dims: &[&str], data: Series) -> Self {
        Self::with_role(dims, data, VariableRole::Data)
    }

    pub fn coordinate(dims: &[&str], data: Series) -> Self {
        Self::with_role(dims, data, VariableRole::Coordinate)
    }

    pub fn with_role(dims: &[&str], data: Series, role: VariableRole) -> Self {
        Self {
            dims: dims.iter().map(|d| d.to_string()).collect(),
            data,
            role,
        }
    }

    pub fn dims(&self) -> &[String] {
        &self.dims
    }

    pub fn data(&self) -> &Series {
        &self.data
    }

    pub fn dtype(&self) -> &DataType {
        self.data.dtype()
    }

    pub fn role(&self) -> VariableRole {
        self.role
    }

    pub fn is_coordinate(&self) -> bool {
        self.role == VariableRole::Coordinate
    }

    /// True when the variable spans exactly these dimensions, in order
    pub fn has_dims(&self, dims: &[&str]) -> bool {
        self.dims.len() == dims.len() && self.dims.iter().zip(dims).all(|(a, b)| a == b)
    }
}

#[derive(Debug, Clone, Default)]
pub struct Dataset {
    dims: BTreeMap<String, usize>,
    variables: BTreeMap<String, Variable>,
    attrs: BTreeMap<String, AttrValue>,
}

impl Dataset {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a flat table as a collection of points along `index`
    pub fn from_point_frame(frame: &DataFrame, coordinates: &[&str]) -> Result<Self> {
        let mut dataset = Self::new();
        dataset.set_dim(DIM_INDEX, frame.height())?;

        for column in frame.get_columns() {
            let name = column.name().to_string();
            let series = column.as_materialized_series().clone();
            let variable = if coordinates.contains(&name.as_str()) {
                Variable::coordinate(&[DIM_INDEX], series)
            } else {
                Variable::new(&[DIM_INDEX], series)
            };
            dataset.insert(name, variable)?;
        }

        Ok(dataset)
    }

    pub fn dims(&self) -> &BTreeMap<String, usize> {
        &self.dims
    }

    pub fn dim_len(&self, name: &str) -> Option<usize> {
        self.dims.get(name).copied()
    }

    pub fn has_dim(&self, name: &str) -> bool {
        self.dims.contains_key(name)
    }

    /// Declare a dimension; redeclaring it with another size is an error
    pub fn set_dim(&mut self, name: impl Into<String>, size: usize) -> Result<()> {
        let name = name.into();
        match self.dims.get(&name) {
            Some(&existing) if existing != size => Err(ArgoError::structural(format!(
                "dimension '{name}' already has size {existing}, cannot resize to {size}"
            ))),
            _ => {
                self.dims.insert(name, size);
                Ok(())
            }
        }
    }

    /// Add or replace a variable.
    ///
    /// At most one of its dimensions may be undeclared, its size is then
    /// inferred from the series length.
    pub fn insert(
        &mut self,
        name: impl Into<String>,
        variable: Variable,
    ) -> Result<Option<Variable>> {
        let name = name.into();
        let len = variable.data.len();

        let mut known = 1usize;
        let mut unknown = Vec::new();
        for dim in &variable.dims {
            match self.dims.get(dim) {
                Some(size) => known *= size,
                None if !unknown.contains(dim) => unknown.push(dim.clone()),
                None => {}
            }
        }

        match unknown.as_slice() {
            [] if known == len => {}
            [] => {
                return Err(ArgoError::structural(format!(
                    "variable '{name}' has {len} values but dimensions {:?} hold {known}",
                    variable.dims
                )));
            }
            [dim] if known > 0 && len % known == 0 => {
                self.dims.insert(dim.clone(), len / known);
            }
            _ => {
                return Err(ArgoError::structural(format!(
                    "cannot infer dimensions {unknown:?} of variable '{name}'"
                )));
            }
        }

        let mut variable = variable;
        variable.data.rename(name.as_str().into());
        Ok(self.variables.insert(name, variable))
    }

    pub fn remove(&mut self, name: &str) -> Option<Variable> {
        self.variables.remove(name)
    }

    pub fn variable(&self, name: &str) -> Option<&Variable> {
        self.variables.get(name)
    }

    /// Like [`Dataset::variable`] but missing variables are a structural error
    pub fn get(&self, name: &str) -> Result<&Variable> {
        self.variables
            .get(name)
            .ok_or_else(|| ArgoError::structural(format!("missing variable '{name}'")))
    }

    pub fn contains(&self, name: &str) -> bool {
        self.variables.contains_key(name)
    }

    /// Variables in name order
    pub fn variables(&self) -> impl Iterator<Item = (&str, &Variable)> {
        self.variables.iter().map(|(name, var)| (name.as_str(), var))
    }

    pub fn variable_names(&self) -> Vec<String> {
        self.variables.keys().cloned().collect()
    }

    /// Swap the values of a variable, keeping its dimensions and role
    pub fn replace_data(&mut self, name: &str, data: Series) -> Result<()> {
        let variable = self
            .variables
            .get_mut(name)
            .ok_or_else(|| ArgoError::structural(format!("missing variable '{name}'")))?;

        if variable.data.len() != data.len() {
            return Err(ArgoError::structural(format!(
                "replacement for '{name}' has {} values, expected {}",
                data.len(),
                variable.data.len()
            )));
        }

        let mut data = data;
        data.rename(name.into());
        variable.data = data;
        Ok(())
    }

    pub fn attrs(&self) -> &BTreeMap<String, AttrValue> {
        &self.attrs
    }

    pub fn attr(&self, name: &str) -> Option<&AttrValue> {
        self.attrs.get(name)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<AttrValue>) {
        self.attrs.insert(name.into(), value.into());
    }

    pub fn remove_attr(&mut self, name: &str) -> Option<AttrValue> {
        self.attrs.remove(name)
    }

    pub fn set_attrs(&mut self, attrs: BTreeMap<String, AttrValue>) {
        self.attrs = attrs;
    }

    /// Flatten into a frame.
    ///
    /// Points give one row per `index`. Profiles give one row per
    /// `(N_PROF, N_LEVELS)` cell, with per-profile variables repeated and the
    /// cell position in `N_PROF` / `N_LEVELS` columns. Variables on other
    /// dimensions are left out.
    pub fn to_frame(&self) -> Result<DataFrame> {
        let mut columns: Vec<Column> = Vec::new();

        if self.has_dim(DIM_INDEX) {
            for (_, variable) in self.variables() {
                if variable.has_dims(&[DIM_INDEX]) {
                    columns.push(Column::from(variable.data.clone()));
                }
            }
        } else if let Some(n_prof) = self.dim_len(DIM_N_PROF) {
            let n_levels = self.dim_len(DIM_N_LEVELS).unwrap_or(1);
            let cells = n_prof * n_levels;

            let prof: Vec<i64> = (0..cells).map(|c| (c / n_levels) as i64).collect();
            let level: Vec<i64> = (0..cells).map(|c| (c % n_levels) as i64).collect();
            columns.push(Column::from(Series::new(DIM_N_PROF.into(), prof)));
            if self.has_dim(DIM_N_LEVELS) {
                columns.push(Column::from(Series::new(DIM_N_LEVELS.into(), level)));
            }

            let repeat = (0..cells)
                .map(|c| IdxSize::try_from(c / n_levels))
                .collect::<std::result::Result<Vec<_>, _>>()
                .map_err(|_| ArgoError::structural("profile grid exceeds the index range"))?;
            let repeat = IdxCa::from_vec(PlSmallStr::EMPTY, repeat);

            for (name, variable) in self.variables() {
                if variable.has_dims(&[DIM_N_PROF, DIM_N_LEVELS]) {
                    columns.push(Column::from(variable.data.clone()));
                } else if variable.has_dims(&[DIM_N_PROF]) {
                    columns.push(Column::from(variable.data.take(&repeat)?));
                } else {
                    debug!(
                        "Leaving '{}' out of the flattened frame: dims {:?}",
                        name, variable.dims
                    );
                }
            }
        } else {
            return Err(ArgoError::structural(
                "dataset has neither an index nor an N_PROF dimension",
            ));
        }

        Ok(DataFrame::new(columns)?)
    }
}
