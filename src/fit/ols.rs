//! One ordinary-least-squares fit with full coefficient inference.
//!
//! Given a response `y` and a design matrix `X` (intercept first), we compute:
//! - estimates `β` by SVD least squares
//! - standard errors from `s² (X'X)^-1`, `s² = RSS / (n - k)`
//! - two-sided t-test p-values with `n - k` degrees of freedom
//! - 95% confidence intervals
//! - fit quality (R², F test, likelihood, information criteria)
//! - residual diagnostics

use nalgebra::DVector;

use crate::data::DesignMatrix;
use crate::domain::{COEF_CI_LEVEL, Coefficient, FitQuality, FittedModel};
use crate::error::AppError;
use crate::fit::diagnostics::residual_diagnostics;
use crate::math::{f_upper_p, solve_least_squares, t_quantile, t_two_sided_p};

/// Fit `y` on every column of `design`.
pub fn fit_ols(y: &DVector<f64>, design: &DesignMatrix) -> Result<FittedModel, AppError> {
    let n = design.n_rows();
    let k = design.n_cols();
    if y.len() != n {
        return Err(AppError::input(format!(
            "Response has {} rows but the design matrix has {n}.",
            y.len()
        )));
    }
    if n <= k {
        return Err(AppError::insufficient(n, k));
    }

    let x = design.matrix();
    let ls = solve_least_squares(x, y)?;

    let fitted = x * &ls.beta;
    let residuals = y - &fitted;

    let df_resid = n - k;
    let df_model = k - 1;
    let rss = residuals.norm_squared();
    let y_mean = y.mean();
    let tss: f64 = y.iter().map(|v| (v - y_mean).powi(2)).sum();
    let sigma2 = rss / df_resid as f64;

    let t_crit = t_quantile(0.5 + COEF_CI_LEVEL / 2.0, df_resid)?;

    let mut coefficients = Vec::with_capacity(k);
    for (j, name) in design.columns().iter().enumerate() {
        let estimate = ls.beta[j];
        let std_error = (sigma2 * ls.cov_unscaled[(j, j)]).max(0.0).sqrt();
        let t_stat = estimate / std_error;
        if t_stat.is_nan() {
            return Err(AppError::numerical(format!(
                "t statistic for `{name}` is undefined (zero residual variance)"
            )));
        }
        let p_value = t_two_sided_p(t_stat, df_resid)?;

        coefficients.push(Coefficient {
            name: name.clone(),
            estimate,
            std_error,
            t_stat,
            p_value,
            ci_lower: estimate - t_crit * std_error,
            ci_upper: estimate + t_crit * std_error,
        });
    }

    let r_squared = if tss > 0.0 { 1.0 - rss / tss } else { 0.0 };
    let adj_r_squared = 1.0 - (n as f64 - 1.0) / df_resid as f64 * (1.0 - r_squared);

    let (f_statistic, f_p_value) = if df_model > 0 {
        let f = ((tss - rss) / df_model as f64) / sigma2;
        (Some(f), Some(f_upper_p(f, df_model, df_resid)?))
    } else {
        (None, None)
    };

    let n_f = n as f64;
    let log_likelihood = -n_f / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (rss / n_f).ln() + 1.0);
    let aic = -2.0 * log_likelihood + 2.0 * k as f64;
    let bic = -2.0 * log_likelihood + k as f64 * n_f.ln();

    let residuals: Vec<f64> = residuals.iter().copied().collect();
    let diagnostics = residual_diagnostics(&residuals)?;

    let cov_unscaled = (0..k)
        .map(|i| (0..k).map(|j| ls.cov_unscaled[(i, j)]).collect())
        .collect();

    Ok(FittedModel {
        coefficients,
        fitted: fitted.iter().copied().collect(),
        residuals,
        cov_unscaled,
        quality: FitQuality {
            n,
            k,
            df_resid,
            df_model,
            rss,
            tss,
            r_squared,
            adj_r_squared,
            residual_std_error: sigma2.sqrt(),
            f_statistic,
            f_p_value,
            log_likelihood,
            aic,
            bic,
            condition_number: ls.condition_number(),
        },
        diagnostics,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rel_close(a: f64, b: f64, tol: f64) -> bool {
        (a - b).abs() <= tol * b.abs().max(1e-300)
    }

    fn simple_design(x: &[f64]) -> DesignMatrix {
        DesignMatrix::with_intercept(x.len(), vec![("x", x)]).unwrap()
    }

    #[test]
    fn simple_regression_matches_reference_values() {
        // Reference values from a statsmodels-equivalent OLS computation.
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = DVector::from_row_slice(&[2.1, 3.9, 6.2, 7.8, 10.1]);
        let m = fit_ols(&y, &simple_design(&x)).unwrap();

        let c = &m.coefficients[0];
        let b = &m.coefficients[1];
        assert_eq!(c.name, "const");
        assert!((c.estimate - 0.05).abs() < 1e-9);
        assert!(rel_close(b.estimate, 1.99, 1e-9));
        assert!(rel_close(c.std_error, 0.198_074_060_223_274_48, 1e-9));
        assert!(rel_close(b.std_error, 0.059_721_576_223_896_414, 1e-9));
        assert!(rel_close(b.t_stat, 33.321_290_659_501_07, 1e-9));
        assert!((c.p_value - 0.817_015_178_175_135_5).abs() < 1e-6);
        assert!((b.p_value - 5.941_539_111_755_347e-5).abs() < 1e-6);
        assert!(rel_close(m.quality.r_squared, 0.997_305_328_900_977_1, 1e-9));
        assert!(rel_close(m.quality.rss, 0.107, 1e-9));
        assert_eq!(m.quality.df_resid, 3);
    }

    #[test]
    fn confidence_interval_brackets_estimate() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = DVector::from_row_slice(&[2.1, 3.9, 6.2, 7.8, 10.1]);
        let m = fit_ols(&y, &simple_design(&x)).unwrap();
        for c in &m.coefficients {
            assert!(c.ci_lower < c.estimate && c.estimate < c.ci_upper);
            // Symmetric around the estimate.
            assert!(((c.estimate - c.ci_lower) - (c.ci_upper - c.estimate)).abs() < 1e-9);
        }
    }

    #[test]
    fn f_test_equals_squared_t_for_one_predictor() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 5.0, 4.0, 6.5]);
        let m = fit_ols(&y, &simple_design(&x)).unwrap();

        let t = m.coefficients[1].t_stat;
        let f = m.quality.f_statistic.unwrap();
        assert!(rel_close(f, t * t, 1e-9));
        assert!((m.quality.f_p_value.unwrap() - m.coefficients[1].p_value).abs() < 1e-9);
    }

    #[test]
    fn residuals_sum_to_zero_with_intercept() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0, 6.0];
        let y = DVector::from_row_slice(&[1.0, 3.0, 2.0, 5.0, 4.0, 6.5]);
        let m = fit_ols(&y, &simple_design(&x)).unwrap();

        assert!(m.residuals.iter().sum::<f64>().abs() < 1e-9);
        for i in 0..6 {
            assert!((m.fitted[i] + m.residuals[i] - y[i]).abs() < 1e-9);
        }
    }

    #[test]
    fn intercept_only_fit_is_the_mean() {
        let y = DVector::from_row_slice(&[2.0, 4.0, 9.0]);
        let design = DesignMatrix::with_intercept(3, Vec::<(&str, &[f64])>::new()).unwrap();
        let m = fit_ols(&y, &design).unwrap();

        assert!((m.coefficients[0].estimate - 5.0).abs() < 1e-12);
        assert_eq!(m.quality.f_statistic, None);
        assert!(m.quality.r_squared.abs() < 1e-12);
        assert!(m.is_intercept_only());
    }

    #[test]
    fn too_few_rows_is_insufficient_data() {
        let x = [1.0, 2.0];
        let y = DVector::from_row_slice(&[1.0, 2.0]);
        let err = fit_ols(&y, &simple_design(&x)).unwrap_err();
        assert_eq!(err.exit_code(), 3);
    }

    #[test]
    fn information_criteria_follow_log_likelihood() {
        let x = [1.0, 2.0, 3.0, 4.0, 5.0];
        let y = DVector::from_row_slice(&[2.1, 3.9, 6.2, 7.8, 10.1]);
        let m = fit_ols(&y, &simple_design(&x)).unwrap();
        let q = &m.quality;

        let n = 5.0_f64;
        let llf = -n / 2.0 * ((2.0 * std::f64::consts::PI).ln() + (0.107_f64 / n).ln() + 1.0);
        assert!(rel_close(q.log_likelihood, llf, 1e-9));
        assert!(rel_close(q.aic, -2.0 * llf + 4.0, 1e-9));
        assert!(rel_close(q.bic, -2.0 * llf + 2.0 * n.ln(), 1e-9));
    }
}
