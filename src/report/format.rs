//! Formatted terminal output.
//!
//! We keep formatting code in one place so:
//! - the math/fitting code stays clean and testable
//! - output changes are localized

use chrono::{DateTime, Local};

use crate::domain::{COEF_CI_LEVEL, FittedModel, PredictionReport, RunConfig, Selection, Termination};

const RULE_WIDTH: usize = 78;

/// Header printed once per run.
pub fn format_run_header(config: &RunConfig, n_rows: usize, started: DateTime<Local>) -> String {
    let mut out = String::new();
    out.push_str("=== spend - Backward Elimination OLS ===\n");
    out.push_str(&format!("Run: {}\n", started.format("%Y-%m-%d %H:%M:%S")));
    out.push_str(&format!("Data: {} (n={n_rows})\n", config.csv_path.display()));
    out.push_str(&format!(
        "Response: {} | candidates: {}\n",
        config.schema.response,
        config.schema.predictors.join(", ")
    ));
    out.push_str(&format!("Alpha: {}\n", config.alpha));
    out
}

/// A statsmodels-style summary of one fit.
pub fn format_model_summary(title: &str, model: &FittedModel, response: &str) -> String {
    let q = &model.quality;
    let d = &model.diagnostics;
    let mut out = String::new();

    out.push_str(&format!("=== {title} ===\n"));
    out.push_str(&format!("{:^width$}\n", "OLS Regression Results", width = RULE_WIDTH));
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    let rows = [
        (("Dep. Variable:", response.to_string()), ("R-squared:", format!("{:.3}", q.r_squared))),
        (("Model:", "OLS".to_string()), ("Adj. R-squared:", format!("{:.3}", q.adj_r_squared))),
        (("Method:", "Least Squares".to_string()), ("F-statistic:", fmt_opt(q.f_statistic, 3))),
        (("No. Observations:", q.n.to_string()), ("Prob (F-statistic):", fmt_opt(q.f_p_value, 3))),
        (("Df Residuals:", q.df_resid.to_string()), ("Log-Likelihood:", format!("{:.2}", q.log_likelihood))),
        (("Df Model:", q.df_model.to_string()), ("AIC:", format!("{:.1}", q.aic))),
        (("Resid. Std. Err.:", format!("{:.3}", q.residual_std_error)), ("BIC:", format!("{:.1}", q.bic))),
    ];
    for ((ll, lv), (rl, rv)) in rows {
        out.push_str(&format!("{ll:<20}{lv:>18}   {rl:<22}{rv:>15}\n"));
    }

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    let tail = (1.0 - COEF_CI_LEVEL) / 2.0;
    out.push_str(&format!(
        "{:<14}{:>12}{:>12}{:>9}{:>9}{:>11}{:>11}\n",
        "",
        "coef",
        "std err",
        "t",
        "P>|t|",
        format!("[{tail:.3}"),
        format!("{:.3}]", 1.0 - tail)
    ));
    out.push_str(&"-".repeat(RULE_WIDTH));
    out.push('\n');
    for c in &model.coefficients {
        out.push_str(&format!(
            "{:<14}{:>12}{:>12}{:>9.3}{:>9.3}{:>11}{:>11}\n",
            truncate(&c.name, 14),
            fmt_num(c.estimate),
            fmt_num(c.std_error),
            c.t_stat,
            c.p_value,
            fmt_num(c.ci_lower),
            fmt_num(c.ci_upper)
        ));
    }

    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');
    let diag = [
        (("Durbin-Watson:", format!("{:.3}", d.durbin_watson)), ("Jarque-Bera (JB):", format!("{:.3}", d.jarque_bera))),
        (("Skew:", format!("{:.3}", d.skew)), ("Prob(JB):", format!("{:.3}", d.jarque_bera_p))),
        (("Kurtosis:", format!("{:.3}", d.kurtosis)), ("Cond. No.", fmt_num(q.condition_number))),
    ];
    for ((ll, lv), (rl, rv)) in diag {
        out.push_str(&format!("{ll:<20}{lv:>18}   {rl:<22}{rv:>15}\n"));
    }
    out.push_str(&"=".repeat(RULE_WIDTH));
    out.push('\n');

    out
}

/// The per-iteration elimination trace and the termination sentence.
pub fn format_elimination_trace(selection: &Selection) -> String {
    let mut out = String::new();
    for step in &selection.steps {
        out.push_str(&format!("\nCurrent variables: {}\n", fmt_columns(&step.columns)));
        match &step.worst {
            Some(w) => out.push_str(&format!("Worst p-value: {} for variable: {}\n", w.p_value, w.name)),
            None => out.push_str("Worst p-value: none (intercept-only model)\n"),
        }
    }

    out.push('\n');
    match selection.termination {
        Termination::AllSignificant => out.push_str(&format!(
            "All remaining variables are significant at alpha = {}.\n",
            selection.alpha
        )),
        Termination::Exhausted => {
            out.push_str("No predictor is significant; the final model is intercept-only.\n")
        }
    }
    out
}

/// The target-case comparison, two decimals throughout.
pub fn format_prediction(report: &PredictionReport, response: &str) -> String {
    let mut out = String::new();
    out.push_str(&format!(
        "Predicted {response} for {}: {:.2}\n",
        report.label, report.interval.predicted
    ));
    if let (Some(actual), Some(diff)) = (report.actual, report.difference) {
        out.push_str(&format!("Actual {response} for {}:   {actual:.2}\n", report.label));
        out.push_str(&format!("Difference (Actual - Predicted): {diff:.2}\n"));
    }
    out
}

/// Mean-response and new-observation intervals for the target case.
pub fn format_interval(report: &PredictionReport) -> String {
    let p = &report.interval;
    let pct = p.level * 100.0;
    format!(
        "{pct:.0}% CI (mean):        [{:.2}, {:.2}]\n{pct:.0}% PI (observation): [{:.2}, {:.2}]\n",
        p.mean_lower, p.mean_upper, p.obs_lower, p.obs_upper
    )
}

/// `['const', 'SAT']`
fn fmt_columns(columns: &[String]) -> String {
    let quoted: Vec<String> = columns.iter().map(|c| format!("'{c}'")).collect();
    format!("[{}]", quoted.join(", "))
}

fn fmt_opt(v: Option<f64>, decimals: usize) -> String {
    match v {
        Some(x) => format!("{x:.decimals$}"),
        None => "-".to_string(),
    }
}

/// Fixed notation for ordinary magnitudes, scientific otherwise.
fn fmt_num(v: f64) -> String {
    let a = v.abs();
    if v == 0.0 || (1e-3..1e6).contains(&a) {
        format!("{v:.4}")
    } else {
        format!("{v:.3e}")
    }
}

fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max - 1).collect();
    out.push('.');
    out
}
