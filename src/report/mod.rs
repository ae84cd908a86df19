//! Reporting utilities: residual rows, the target prediction, and formatted
//! terminal output.

pub mod format;

pub use format::*;

use crate::data::ObservationTable;
use crate::domain::{FittedModel, PredictionReport, ResidualRow, TargetCase};
use crate::error::AppError;
use crate::models::predict_interval;

/// Pair each observed response with the final model's fitted value.
pub fn compute_residuals(table: &ObservationTable, model: &FittedModel) -> Result<Vec<ResidualRow>, AppError> {
    let actual = table.column(&table.schema().response)?;
    if actual.len() != model.fitted.len() {
        return Err(AppError::input(format!(
            "Model was fitted on {} rows but the table has {}.",
            model.fitted.len(),
            actual.len()
        )));
    }

    let mut out = Vec::with_capacity(actual.len());
    for (i, (&y, &fitted)) in actual.iter().zip(model.fitted.iter()).enumerate() {
        if !fitted.is_finite() {
            return Err(AppError::numerical("Non-finite fitted value during residual computation."));
        }
        out.push(ResidualRow {
            row: i + 1,
            actual: y,
            fitted,
            residual: y - fitted,
        });
    }
    Ok(out)
}

/// Predict the target case and compare against its known response, if any.
pub fn prediction_report(model: &FittedModel, target: &TargetCase, level: f64) -> Result<PredictionReport, AppError> {
    let interval = predict_interval(model, &target.features, level)?;
    let difference = target.actual.map(|a| a - interval.predicted);
    Ok(PredictionReport {
        label: target.label.clone(),
        interval,
        actual: target.actual,
        difference,
    })
}
