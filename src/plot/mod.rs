//! Plotting: terminal ASCII charts (`ascii`) and SVG report artifacts (`svg`).
//!
//! Both renderers draw the same two scatters, so the reference lines are
//! computed here once.

pub mod ascii;
pub mod svg;

pub use ascii::*;
pub use svg::*;

use crate::data::ObservationTable;
use crate::error::AppError;
use crate::fit::fit_ols;

/// The `y = x` line spanning every coordinate of `points`.
///
/// `None` when all coordinates coincide.
pub fn identity_line(points: &[(f64, f64)]) -> Option<Vec<(f64, f64)>> {
    let mut lo = f64::INFINITY;
    let mut hi = f64::NEG_INFINITY;
    for &(x, y) in points {
        lo = lo.min(x).min(y);
        hi = hi.max(x).max(y);
    }
    (lo.is_finite() && hi.is_finite() && hi > lo).then(|| vec![(lo, lo), (hi, hi)])
}

/// Endpoints of the simple regression of the response on `predictor`.
pub fn regression_line(table: &ObservationTable, predictor: &str) -> Result<Vec<(f64, f64)>, AppError> {
    let x = table.column(predictor)?;
    let model = fit_ols(&table.response(), &table.design(&[predictor])?)?;
    let (b0, b1) = (model.coefficients[0].estimate, model.coefficients[1].estimate);

    let lo = x.iter().copied().fold(f64::INFINITY, f64::min);
    let hi = x.iter().copied().fold(f64::NEG_INFINITY, f64::max);
    Ok(vec![(lo, b0 + b1 * lo), (hi, b0 + b1 * hi)])
}
