//! Shared domain types.
//!
//! These types are intentionally kept lightweight and serializable so they can be:
//!
//! - passed by value through the elimination loop
//! - rendered by the reporter (text, ASCII plots, SVG)
//! - dumped as JSON for scripting (`spend select --json`)

use std::collections::BTreeMap;
use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Name of the intercept column in every design matrix.
pub const INTERCEPT: &str = "const";

/// Response column of the college dataset.
pub const DEFAULT_RESPONSE: &str = "SPEND";

/// Candidate predictors, in design-matrix column order.
pub const DEFAULT_PREDICTORS: [&str; 7] = ["SAT", "TOP10", "ACCRATE", "PHD", "RATIO", "GRADRATE", "ALUMNI"];

/// Significance threshold for backward elimination.
pub const DEFAULT_ALPHA: f64 = 0.05;

/// Coverage of the coefficient confidence intervals in model summaries.
pub const COEF_CI_LEVEL: f64 = 0.95;

/// Data file used when neither `--csv` nor `SPEND_CSV` is given.
pub const DEFAULT_CSV: &str = "college4.csv";

/// Feature vector of the held-out target institution.
pub const HSU_FEATURES: [(&str, f64); 7] = [
    ("SAT", 1100.0),
    ("TOP10", 50.0),
    ("ACCRATE", 50.0),
    ("PHD", 95.0),
    ("RATIO", 10.0),
    ("GRADRATE", 70.0),
    ("ALUMNI", 30.0),
];

/// Known spending of the held-out target institution.
pub const HSU_ACTUAL_SPEND: f64 = 16000.0;

/// Expected columns of an observation table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Schema {
    pub response: String,
    /// Candidate predictors; their order is the design-matrix column order.
    pub predictors: Vec<String>,
}

impl Schema {
    pub fn new(response: impl Into<String>, predictors: &[&str]) -> Self {
        Self {
            response: response.into(),
            predictors: predictors.iter().map(|p| p.to_string()).collect(),
        }
    }

    /// `SPEND` explained by the seven college predictors.
    pub fn college() -> Self {
        Self::new(DEFAULT_RESPONSE, &DEFAULT_PREDICTORS)
    }

    /// Response first, then predictors.
    pub fn required_columns(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.response.as_str()).chain(self.predictors.iter().map(String::as_str))
    }
}

impl Default for Schema {
    fn default() -> Self {
        Self::college()
    }
}

/// One row of a coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Coefficient {
    pub name: String,
    pub estimate: f64,
    pub std_error: f64,
    pub t_stat: f64,
    /// Two-sided p-value for `H0: coefficient = 0`.
    pub p_value: f64,
    pub ci_lower: f64,
    pub ci_upper: f64,
}

impl Coefficient {
    pub fn is_intercept(&self) -> bool {
        self.name == INTERCEPT
    }
}

/// Goodness-of-fit statistics for a single OLS fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitQuality {
    pub n: usize,
    /// Estimated coefficients, intercept included.
    pub k: usize,
    pub df_resid: usize,
    pub df_model: usize,
    pub rss: f64,
    /// Centered total sum of squares.
    pub tss: f64,
    pub r_squared: f64,
    pub adj_r_squared: f64,
    pub residual_std_error: f64,
    /// Overall F test; absent for an intercept-only model.
    pub f_statistic: Option<f64>,
    pub f_p_value: Option<f64>,
    pub log_likelihood: f64,
    pub aic: f64,
    pub bic: f64,
    /// Ratio of the largest to the smallest singular value of X.
    pub condition_number: f64,
}

/// Residual diagnostics printed under the coefficient table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResidualDiagnostics {
    pub durbin_watson: f64,
    pub skew: f64,
    /// Non-excess kurtosis (3 for a normal distribution).
    pub kurtosis: f64,
    pub jarque_bera: f64,
    pub jarque_bera_p: f64,
}

/// Output of one OLS fit. Never mutated; every refit builds a new one.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FittedModel {
    /// One entry per design column, intercept first.
    pub coefficients: Vec<Coefficient>,
    pub fitted: Vec<f64>,
    pub residuals: Vec<f64>,
    /// `(X'X)^-1`, row-major, same column order as `coefficients`.
    pub cov_unscaled: Vec<Vec<f64>>,
    pub quality: FitQuality,
    pub diagnostics: ResidualDiagnostics,
}

impl FittedModel {
    /// All column names, intercept included, in design order.
    pub fn columns(&self) -> Vec<&str> {
        self.coefficients.iter().map(|c| c.name.as_str()).collect()
    }

    /// Non-intercept column names in design order.
    pub fn predictors(&self) -> Vec<&str> {
        self.coefficients
            .iter()
            .filter(|c| !c.is_intercept())
            .map(|c| c.name.as_str())
            .collect()
    }

    pub fn coefficient(&self, name: &str) -> Option<&Coefficient> {
        self.coefficients.iter().find(|c| c.name == name)
    }

    pub fn estimates(&self) -> Vec<f64> {
        self.coefficients.iter().map(|c| c.estimate).collect()
    }

    pub fn is_intercept_only(&self) -> bool {
        self.coefficients.iter().all(Coefficient::is_intercept)
    }
}

/// The least significant predictor of a fit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WorstPredictor {
    pub name: String,
    pub p_value: f64,
}

/// One iteration of backward elimination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EliminationStep {
    /// Design columns at the start of this iteration (intercept included).
    pub columns: Vec<String>,
    /// `None` once only the intercept is left.
    pub worst: Option<WorstPredictor>,
    pub removed: bool,
}

/// Why the elimination loop stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Termination {
    /// Every retained predictor has `p <= alpha`.
    AllSignificant,
    /// Every predictor was eliminated; the final model is intercept-only.
    Exhausted,
}

/// Full result of backward elimination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Selection {
    pub alpha: f64,
    pub full: FittedModel,
    pub steps: Vec<EliminationStep>,
    pub final_model: FittedModel,
    pub termination: Termination,
}

impl Selection {
    /// Predictors that survived elimination, in design order.
    pub fn retained_predictors(&self) -> Vec<String> {
        self.final_model.predictors().into_iter().map(str::to_string).collect()
    }

    /// Predictors removed, in removal order.
    pub fn removed_predictors(&self) -> Vec<&str> {
        self.steps
            .iter()
            .filter(|s| s.removed)
            .filter_map(|s| s.worst.as_ref().map(|w| w.name.as_str()))
            .collect()
    }
}

/// A single case to predict, optionally with its known response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TargetCase {
    pub label: String,
    pub features: BTreeMap<String, f64>,
    #[serde(default)]
    pub actual: Option<f64>,
}

impl TargetCase {
    /// The held-out institution (HSU) with its known spending.
    pub fn hsu() -> Self {
        Self {
            label: "HSU".to_string(),
            features: HSU_FEATURES.iter().map(|&(k, v)| (k.to_string(), v)).collect(),
            actual: Some(HSU_ACTUAL_SPEND),
        }
    }
}

/// Point prediction with mean-response and new-observation intervals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionInterval {
    pub predicted: f64,
    pub level: f64,
    pub se_mean: f64,
    pub mean_lower: f64,
    pub mean_upper: f64,
    pub obs_lower: f64,
    pub obs_upper: f64,
}

/// Fitted value and residual for one observation of the final model.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResidualRow {
    /// 1-based row number in the input file (header excluded).
    pub row: usize,
    pub actual: f64,
    pub fitted: f64,
    pub residual: f64,
}

/// The target case's prediction set against its known response.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PredictionReport {
    pub label: String,
    pub interval: PredictionInterval,
    pub actual: Option<f64>,
    /// `actual - predicted` when the actual value is known.
    pub difference: Option<f64>,
}

/// A full run's configuration as understood by the pipeline.
///
/// This is derived from CLI flags (plus defaults and `SPEND_CSV`).
#[derive(Debug, Clone)]
pub struct RunConfig {
    pub csv_path: PathBuf,
    pub schema: Schema,
    pub alpha: f64,
    pub target: TargetCase,
    /// Coverage of the prediction intervals.
    pub level: f64,

    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,

    pub export_results: Option<PathBuf>,
    /// Directory receiving the SVG artifacts.
    pub artifacts_dir: Option<PathBuf>,
    pub json: bool,
}

impl RunConfig {
    pub fn new(csv_path: impl Into<PathBuf>) -> Self {
        Self {
            csv_path: csv_path.into(),
            schema: Schema::college(),
            alpha: DEFAULT_ALPHA,
            target: TargetCase::hsu(),
            level: COEF_CI_LEVEL,
            plot: false,
            plot_width: 72,
            plot_height: 22,
            export_results: None,
            artifacts_dir: None,
            json: false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn hsu_target_covers_every_college_predictor() {
        let target = TargetCase::hsu();
        for p in DEFAULT_PREDICTORS {
            assert!(target.features.contains_key(p), "missing {p}");
        }
        assert_eq!(target.actual, Some(16000.0));
    }

    #[test]
    fn schema_lists_response_first() {
        let schema = Schema::college();
        let cols: Vec<&str> = schema.required_columns().collect();
        assert_eq!(cols[0], "SPEND");
        assert_eq!(cols.len(), 8);
    }

    #[test]
    fn target_case_parses_without_actual() {
        let json = r#"{"label":"X","features":{"SAT":1000.0}}"#;
        let target: TargetCase = serde_json::from_str(json).unwrap();
        assert_eq!(target.actual, None);
        assert_eq!(target.features["SAT"], 1000.0);
    }
}
