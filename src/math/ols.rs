//! Least squares solver.
//!
//! Every fit in this crate solves a small, tall problem
//!
//! ```text
//! minimize ||y - X β||²
//! ```
//!
//! with `X` holding an intercept plus up to a handful of predictors.
//!
//! Implementation choices:
//! - We use SVD rather than the normal equations: the singular values give an
//!   explicit rank check, and `(X'X)^-1 = V Σ^-2 V'` falls out for free.
//!   (Nalgebra's `QR::solve` is intended for square systems and will panic for
//!   non-square matrices.)
//! - A rank-deficient design (perfectly collinear columns) is an error. We do
//!   not drop columns or regularize; callers get a code-4 `AppError`.

use nalgebra::{DMatrix, DVector};

use crate::error::AppError;

/// Relative singular-value floor below which `X` is treated as rank deficient.
const RANK_RTOL: f64 = 1e-12;

/// Solution of a full-rank least squares problem.
#[derive(Debug, Clone)]
pub struct LeastSquares {
    pub beta: DVector<f64>,
    /// `(X'X)^-1`.
    pub cov_unscaled: DMatrix<f64>,
    pub singular_values: DVector<f64>,
}

impl LeastSquares {
    /// Ratio of the largest to the smallest singular value of `X`.
    pub fn condition_number(&self) -> f64 {
        let (s_min, s_max) = extreme_values(&self.singular_values);
        s_max / s_min
    }
}

/// Solve a least squares problem using SVD.
///
/// Fails if the smallest singular value of `X` is below
/// `s_max * max(RANK_RTOL, max(n, k) * ε)`, or if the solution is not finite.
pub fn solve_least_squares(x: &DMatrix<f64>, y: &DVector<f64>) -> Result<LeastSquares, AppError> {
    let (n, k) = x.shape();
    if y.len() != n {
        return Err(AppError::input(format!(
            "Response has {} rows but the design matrix has {n}.",
            y.len()
        )));
    }
    if k == 0 {
        return Err(AppError::input("Design matrix has no columns."));
    }
    if n < k {
        return Err(AppError::insufficient(n, k));
    }

    let svd = x.clone().svd(true, true);
    let (s_min, s_max) = extreme_values(&svd.singular_values);
    let tol = s_max * RANK_RTOL.max(n.max(k) as f64 * f64::EPSILON);
    if !(s_min > tol) {
        return Err(AppError::numerical(format!(
            "design matrix is rank deficient (collinear columns): smallest singular value {s_min:.3e} <= tolerance {tol:.3e}"
        )));
    }

    let beta = svd
        .solve(y, tol)
        .map_err(|e| AppError::numerical(format!("SVD least squares failed: {e}")))?;
    if !beta.iter().all(|v| v.is_finite()) {
        return Err(AppError::numerical("least squares produced non-finite coefficients"));
    }

    let v_t = svd
        .v_t
        .as_ref()
        .ok_or_else(|| AppError::numerical("SVD did not produce right singular vectors"))?;
    let s = &svd.singular_values;
    let cov_unscaled = DMatrix::from_fn(k, k, |i, j| {
        (0..s.len())
            .map(|m| v_t[(m, i)] * v_t[(m, j)] / (s[m] * s[m]))
            .sum::<f64>()
    });

    Ok(LeastSquares {
        beta,
        cov_unscaled,
        singular_values: svd.singular_values.clone(),
    })
}

fn extreme_values(v: &DVector<f64>) -> (f64, f64) {
    v.iter()
        .fold((f64::INFINITY, 0.0_f64), |(lo, hi), &s| (lo.min(s), hi.max(s)))
}
