//! Residual diagnostics (Durbin–Watson, moments, Jarque–Bera).

use crate::domain::ResidualDiagnostics;
use crate::error::AppError;
use crate::math::chi2_upper_p;

/// Compute diagnostics from OLS residuals.
///
/// Moments are the biased (population) estimators; kurtosis is not excess.
pub fn residual_diagnostics(residuals: &[f64]) -> Result<ResidualDiagnostics, AppError> {
    let n = residuals.len();
    if n == 0 {
        return Err(AppError::input("No residuals to diagnose."));
    }
    let n_f = n as f64;

    let ssr: f64 = residuals.iter().map(|e| e * e).sum();
    let dw_num: f64 = residuals.windows(2).map(|w| (w[1] - w[0]).powi(2)).sum();
    let durbin_watson = if ssr > 0.0 { dw_num / ssr } else { 0.0 };

    let mean = residuals.iter().sum::<f64>() / n_f;
    let central = |p: i32| residuals.iter().map(|e| (e - mean).powi(p)).sum::<f64>() / n_f;
    let m2 = central(2);

    if m2 <= 0.0 {
        return Ok(ResidualDiagnostics {
            durbin_watson,
            skew: 0.0,
            kurtosis: 0.0,
            jarque_bera: 0.0,
            jarque_bera_p: 1.0,
        });
    }

    let skew = central(3) / m2.powf(1.5);
    let kurtosis = central(4) / (m2 * m2);
    let jarque_bera = n_f / 6.0 * (skew * skew + (kurtosis - 3.0).powi(2) / 4.0);
    let jarque_bera_p = chi2_upper_p(jarque_bera, 2)?;

    Ok(ResidualDiagnostics {
        durbin_watson,
        skew,
        kurtosis,
        jarque_bera,
        jarque_bera_p,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn symmetric_residuals_have_zero_skew() {
        let d = residual_diagnostics(&[-2.0, -1.0, 0.0, 1.0, 2.0]).unwrap();
        assert!(d.skew.abs() < 1e-12);
        // m2 = 2, m4 = 6.8 -> kurtosis 1.7
        assert!((d.kurtosis - 1.7).abs() < 1e-12);
        // DW = 4 * 1 / 10
        assert!((d.durbin_watson - 0.4).abs() < 1e-12);
        assert!(d.jarque_bera_p > 0.0 && d.jarque_bera_p <= 1.0);
    }

    #[test]
    fn zero_residuals_do_not_produce_nan() {
        let d = residual_diagnostics(&[0.0, 0.0, 0.0]).unwrap();
        assert_eq!(d.jarque_bera_p, 1.0);
        assert!(!d.durbin_watson.is_nan());
    }
}
