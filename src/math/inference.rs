//! Sampling distributions used for coefficient and model tests.

use statrs::distribution::{ChiSquared, ContinuousCDF, FisherSnedecor, StudentsT};

use crate::error::AppError;

fn students_t(df: usize) -> Result<StudentsT, AppError> {
    if df == 0 {
        return Err(AppError::numerical("t distribution needs at least one degree of freedom"));
    }
    StudentsT::new(0.0, 1.0, df as f64)
        .map_err(|e| AppError::numerical(format!("t distribution error: {e}")))
}

/// Two-sided p-value `P(|T| >= |t|)` with `T ~ t(df)`.
pub fn t_two_sided_p(t: f64, df: usize) -> Result<f64, AppError> {
    if t.is_nan() {
        return Err(AppError::numerical("t statistic is NaN"));
    }
    if t.is_infinite() {
        return Ok(0.0);
    }
    let dist = students_t(df)?;
    Ok((2.0 * dist.sf(t.abs())).min(1.0))
}

/// Quantile of `t(df)` at cumulative probability `prob`.
pub fn t_quantile(prob: f64, df: usize) -> Result<f64, AppError> {
    if !(prob > 0.0 && prob < 1.0) {
        return Err(AppError::input(format!("Probability {prob} is outside (0, 1).")));
    }
    Ok(students_t(df)?.inverse_cdf(prob))
}

/// Upper-tail probability of `F(d1, d2)` at `f`.
pub fn f_upper_p(f: f64, d1: usize, d2: usize) -> Result<f64, AppError> {
    if f.is_infinite() {
        return Ok(0.0);
    }
    let dist = FisherSnedecor::new(d1 as f64, d2 as f64)
        .map_err(|e| AppError::numerical(format!("F distribution error: {e}")))?;
    Ok(dist.sf(f.max(0.0)))
}

/// Upper-tail probability of `χ²(k)` at `x`.
pub fn chi2_upper_p(x: f64, k: usize) -> Result<f64, AppError> {
    let dist = ChiSquared::new(k as f64)
        .map_err(|e| AppError::numerical(format!("chi-squared distribution error: {e}")))?;
    Ok(dist.sf(x.max(0.0)))
}
