//! Strongly typed observation table.
//!
//! The table is a mapping from column name to a fixed-length numeric column,
//! validated once against a [`Schema`] and read-only afterwards. Anything that
//! violates the schema (missing column, ragged lengths, non-finite values) is
//! rejected here so the fitting code never has to re-check it.

use std::collections::HashMap;

use nalgebra::DVector;

use crate::data::design::DesignMatrix;
use crate::domain::Schema;
use crate::error::AppError;

#[derive(Debug, Clone)]
pub struct ObservationTable {
    schema: Schema,
    n_rows: usize,
    columns: HashMap<String, Vec<f64>>,
}

impl ObservationTable {
    /// Build a table from named columns.
    ///
    /// Columns not named by the schema are dropped.
    pub fn from_columns<I, S>(schema: Schema, columns: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (S, Vec<f64>)>,
        S: Into<String>,
    {
        let mut by_name: HashMap<String, Vec<f64>> = HashMap::new();
        for (name, values) in columns {
            let name = name.into();
            if by_name.contains_key(&name) {
                return Err(AppError::input(format!("Duplicate column `{name}`.")));
            }
            by_name.insert(name, values);
        }

        let mut kept = HashMap::with_capacity(schema.predictors.len() + 1);
        let mut n_rows: Option<usize> = None;
        for name in schema.required_columns() {
            let values = by_name
                .remove(name)
                .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))?;

            match n_rows {
                None => n_rows = Some(values.len()),
                Some(n) if n != values.len() => {
                    return Err(AppError::input(format!(
                        "Column `{name}` has {} rows but `{}` has {n}.",
                        values.len(),
                        schema.response
                    )));
                }
                Some(_) => {}
            }

            if let Some(row) = values.iter().position(|v| !v.is_finite()) {
                return Err(AppError::input(format!(
                    "Column `{name}` has a non-finite value at row {}.",
                    row + 1
                )));
            }
            kept.insert(name.to_string(), values);
        }

        let n_rows = n_rows.unwrap_or(0);
        if n_rows == 0 {
            return Err(AppError::input("Observation table has no rows."));
        }

        Ok(Self {
            schema,
            n_rows,
            columns: kept,
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    pub fn n_rows(&self) -> usize {
        self.n_rows
    }

    pub fn column(&self, name: &str) -> Result<&[f64], AppError> {
        self.columns
            .get(name)
            .map(Vec::as_slice)
            .ok_or_else(|| AppError::input(format!("Unknown column `{name}`.")))
    }

    pub fn response(&self) -> DVector<f64> {
        DVector::from_column_slice(&self.columns[&self.schema.response])
    }

    /// Design matrix with the intercept and every schema predictor.
    pub fn full_design(&self) -> Result<DesignMatrix, AppError> {
        let names: Vec<&str> = self.schema.predictors.iter().map(String::as_str).collect();
        self.design(&names)
    }

    /// Design matrix with the intercept and the given predictors, in order.
    pub fn design(&self, predictors: &[&str]) -> Result<DesignMatrix, AppError> {
        let mut cols = Vec::with_capacity(predictors.len());
        for &name in predictors {
            if name == self.schema.response {
                return Err(AppError::input(format!(
                    "Response `{name}` cannot be used as a predictor."
                )));
            }
            cols.push((name, self.column(name)?));
        }
        DesignMatrix::with_intercept(self.n_rows, cols)
    }
}
