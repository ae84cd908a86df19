//! Applying a fitted model to a new case.
//!
//! Prediction relies on two primitive operations:
//! - build a design row `[1, f(c1), ..., f(cm)]` for the model's columns
//! - dot that row with the estimates (and, for intervals, with `(X'X)^-1`)

use std::collections::BTreeMap;

use crate::domain::{FittedModel, INTERCEPT, PredictionInterval};
use crate::error::AppError;
use crate::math::t_quantile;

/// Build the design row for `model` from a feature map.
///
/// Features for columns the model does not use are ignored. A retained
/// predictor without a feature value is an input error.
pub fn design_row(model: &FittedModel, features: &BTreeMap<String, f64>) -> Result<Vec<f64>, AppError> {
    model
        .coefficients
        .iter()
        .map(|c| {
            if c.name == INTERCEPT {
                return Ok(1.0);
            }
            let v = *features.get(&c.name).ok_or_else(|| {
                AppError::input(format!("Missing feature value for retained predictor `{}`.", c.name))
            })?;
            if !v.is_finite() {
                return Err(AppError::input(format!("Feature `{}` is not a finite number.", c.name)));
            }
            Ok(v)
        })
        .collect()
}

/// Predict the response for a single case.
pub fn predict(model: &FittedModel, features: &BTreeMap<String, f64>) -> Result<f64, AppError> {
    let row = design_row(model, features)?;
    Ok(row
        .iter()
        .zip(model.coefficients.iter())
        .map(|(x, c)| x * c.estimate)
        .sum())
}

/// Predict with a confidence interval for the mean response and a prediction
/// interval for a new observation, both at coverage `level`.
pub fn predict_interval(
    model: &FittedModel,
    features: &BTreeMap<String, f64>,
    level: f64,
) -> Result<PredictionInterval, AppError> {
    if !(level > 0.0 && level < 1.0) {
        return Err(AppError::input(format!("Interval level must lie in (0, 1), got {level}.")));
    }
    let row = design_row(model, features)?;
    let predicted = predict(model, features)?;

    // x0' (X'X)^-1 x0
    let mut leverage = 0.0;
    for (i, xi) in row.iter().enumerate() {
        for (j, xj) in row.iter().enumerate() {
            leverage += xi * model.cov_unscaled[i][j] * xj;
        }
    }

    let sigma2 = model.quality.residual_std_error.powi(2);
    let se_mean = (sigma2 * leverage.max(0.0)).sqrt();
    let se_obs = (sigma2 + se_mean * se_mean).sqrt();
    let t = t_quantile(0.5 + level / 2.0, model.quality.df_resid)?;

    Ok(PredictionInterval {
        predicted,
        level,
        se_mean,
        mean_lower: predicted - t * se_mean,
        mean_upper: predicted + t * se_mean,
        obs_lower: predicted - t * se_obs,
        obs_upper: predicted + t * se_obs,
    })
}
