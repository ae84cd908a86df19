//! Backward elimination by coefficient p-value.
//!
//! Starting from the full design, the selector repeatedly:
//! 1. fits OLS on the current columns
//! 2. finds the non-intercept coefficient with the largest p-value
//! 3. stops if that p-value is `<= alpha`, or if no predictors remain
//! 4. otherwise drops that column and refits
//!
//! Each iteration consumes a `(DesignMatrix, FittedModel)` pair and produces a
//! new one; nothing is edited in place. The intercept is never a candidate for
//! removal, so the loop runs at most `p` times for `p` predictors.
//!
//! Ties: when several predictors share the maximum p-value exactly, the one
//! that comes first in design-matrix column order is removed.

use nalgebra::DVector;

use crate::data::DesignMatrix;
use crate::domain::{Coefficient, EliminationStep, FittedModel, Selection, Termination, WorstPredictor};
use crate::error::AppError;
use crate::fit::ols::fit_ols;

/// Run backward elimination of `y` on `design` at significance level `alpha`.
pub fn select(y: &DVector<f64>, design: DesignMatrix, alpha: f64) -> Result<Selection, AppError> {
    if !(alpha.is_finite() && alpha > 0.0 && alpha < 1.0) {
        return Err(AppError::input(format!("Significance level must lie in (0, 1), got {alpha}.")));
    }

    let full = fit_ols(y, &design)?;
    let mut steps = Vec::with_capacity(design.predictors().len() + 1);
    let mut state = (design, full.clone());

    loop {
        let (design, model) = state;
        let columns = design.columns().to_vec();

        let Some(worst) = least_significant(&model) else {
            log::info!("current columns {columns:?}: no predictors left, intercept-only model");
            steps.push(EliminationStep {
                columns,
                worst: None,
                removed: false,
            });
            return Ok(finish(alpha, full, steps, model, Termination::Exhausted));
        };

        log::info!(
            "current columns {columns:?}: worst p-value {:.6} for `{}`",
            worst.p_value,
            worst.name
        );

        if worst.p_value <= alpha {
            steps.push(EliminationStep {
                columns,
                worst: Some(worst),
                removed: false,
            });
            return Ok(finish(alpha, full, steps, model, Termination::AllSignificant));
        }

        let narrowed = design.without(&worst.name)?;
        let refit = fit_ols(y, &narrowed)?;
        steps.push(EliminationStep {
            columns,
            worst: Some(worst),
            removed: true,
        });
        state = (narrowed, refit);
    }
}

fn finish(
    alpha: f64,
    full: FittedModel,
    steps: Vec<EliminationStep>,
    final_model: FittedModel,
    termination: Termination,
) -> Selection {
    Selection {
        alpha,
        full,
        steps,
        final_model,
        termination,
    }
}

/// The non-intercept coefficient with the largest p-value.
///
/// Scans in column order with a strict `>` so the first of several tied
/// maxima wins. Returns `None` for an intercept-only model.
pub fn least_significant(model: &FittedModel) -> Option<WorstPredictor> {
    let mut worst: Option<&Coefficient> = None;
    for c in model.coefficients.iter().filter(|c| !c.is_intercept()) {
        match worst {
            Some(w) if c.p_value <= w.p_value => {}
            _ => worst = Some(c),
        }
    }
    worst.map(|c| WorstPredictor {
        name: c.name.clone(),
        p_value: c.p_value,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::ObservationTable;
    use crate::domain::{DEFAULT_ALPHA, DEFAULT_PREDICTORS, Schema};

    fn two_predictor_table() -> ObservationTable {
        ObservationTable::from_columns(
            Schema::new("SPEND", &["SAT", "TOP10"]),
            vec![
                ("SAT", vec![950.0, 970.0, 980.0, 1290.0, 960.0, 1200.0, 1060.0, 1100.0]),
                ("TOP10", vec![30.0, 17.0, 23.0, 11.0, 88.0, 80.0, 35.0, 28.0]),
                (
                    "SPEND",
                    vec![5400.0, 10981.0, 6695.0, 15315.0, 5238.0, 18099.0, 10713.0, 12941.0],
                ),
            ],
        )
        .unwrap()
    }

    /// Seven predictors with no relationship to the response.
    fn noise_table() -> ObservationTable {
        let cols = vec![
            ("SAT", vec![84.4, 75.8, 42.1, 25.9, 51.1, 40.5, 78.4, 30.3, 47.7, 58.3, 90.8, 50.5, 28.2, 75.6, 61.8, 25.1]),
            ("TOP10", vec![91.0, 98.3, 81.0, 90.2, 31.0, 73.0, 89.9, 68.4, 47.2, 10.1, 43.4, 61.1, 91.3, 96.7, 47.7, 86.5]),
            ("ACCRATE", vec![26.0, 80.5, 54.9, 1.4, 72.0, 39.9, 82.5, 66.8, 0.1, 49.4, 86.8, 24.4, 32.5, 87.0, 19.1, 56.8]),
            ("PHD", vec![23.9, 96.8, 80.3, 44.8, 8.0, 32.0, 50.8, 93.3, 10.9, 55.1, 70.7, 54.7, 81.4, 54.0, 96.4, 60.3]),
            ("RATIO", vec![58.8, 44.5, 59.6, 38.5, 57.6, 29.0, 18.9, 18.7, 61.3, 65.7, 47.7, 9.0, 75.8, 87.7, 92.3, 84.2]),
            ("GRADRATE", vec![89.8, 92.3, 54.1, 39.1, 70.5, 27.6, 81.2, 84.9, 89.5, 59.0, 95.0, 58.0, 45.1, 66.0, 99.6, 91.7]),
            ("ALUMNI", vec![79.3, 8.2, 61.3, 48.6, 63.0, 84.5, 24.3, 73.1, 11.7, 22.0, 79.5, 33.3, 81.6, 10.1, 14.6, 69.8]),
            (
                "SPEND",
                vec![
                    8543.0, 14886.0, 18920.0, 14410.0, 16167.0, 8320.0, 15620.0, 15276.0, 14911.0, 12695.0, 12442.0,
                    19766.0, 8437.0, 8260.0, 19532.0, 10220.0,
                ],
            ),
        ];
        ObservationTable::from_columns(Schema::college(), cols).unwrap()
    }

    fn run(table: &ObservationTable) -> Selection {
        select(&table.response(), table.full_design().unwrap(), DEFAULT_ALPHA).unwrap()
    }

    #[test]
    fn drops_insignificant_top10_after_one_removal() {
        let selection = run(&two_predictor_table());

        let top10 = selection.full.coefficient("TOP10").unwrap();
        let sat = selection.full.coefficient("SAT").unwrap();
        assert!((top10.p_value - 0.832_955_319_062_808_2).abs() < 1e-6);
        assert!((sat.p_value - 0.010_204_882_594_823_215).abs() < 1e-6);

        assert_eq!(selection.removed_predictors(), vec!["TOP10"]);
        assert_eq!(selection.steps.len(), 2);
        assert_eq!(selection.termination, Termination::AllSignificant);
        assert_eq!(selection.final_model.columns(), vec!["const", "SAT"]);

        let sat = selection.final_model.coefficient("SAT").unwrap();
        assert!((sat.estimate - 32.662_620_097_207_91).abs() < 1e-9 * 32.66);
        assert!((sat.p_value - 0.004_735_471_420_243_761).abs() < 1e-6);
    }

    #[test]
    fn noise_predictors_reduce_to_intercept_only() {
        let table = noise_table();
        let selection = run(&table);

        assert_eq!(selection.termination, Termination::Exhausted);
        assert!(selection.retained_predictors().is_empty());
        assert!(selection.final_model.is_intercept_only());
        assert_eq!(
            selection.removed_predictors(),
            vec!["ACCRATE", "GRADRATE", "SAT", "PHD", "TOP10", "RATIO", "ALUMNI"]
        );

        // Intercept-only estimate is the sample mean.
        assert!((selection.final_model.coefficients[0].estimate - 13_650.3125).abs() < 1e-8);

        let last = selection.steps.last().unwrap();
        assert_eq!(last.columns, vec!["const"]);
        assert!(last.worst.is_none());
    }

    #[test]
    fn columns_shrink_by_one_and_keep_intercept() {
        let selection = run(&noise_table());
        for pair in selection.steps.windows(2) {
            assert!(pair[0].removed);
            assert_eq!(pair[1].columns.len(), pair[0].columns.len() - 1);
        }
        for step in &selection.steps {
            assert_eq!(step.columns[0], "const");
        }
        assert!(selection.steps.iter().filter(|s| s.removed).count() <= DEFAULT_PREDICTORS.len());
    }

    #[test]
    fn significance_holds_on_normal_termination() {
        let selection = run(&two_predictor_table());
        assert_eq!(selection.termination, Termination::AllSignificant);
        for c in selection.final_model.coefficients.iter().filter(|c| !c.is_intercept()) {
            assert!(c.p_value <= selection.alpha, "{} p={}", c.name, c.p_value);
        }
    }

    #[test]
    fn repeated_runs_are_identical() {
        let table = noise_table();
        assert_eq!(run(&table), run(&table));
    }

    #[test]
    fn intercept_only_input_terminates_immediately() {
        let table = two_predictor_table();
        let design = table.design(&[]).unwrap();
        let selection = select(&table.response(), design, DEFAULT_ALPHA).unwrap();

        assert_eq!(selection.termination, Termination::Exhausted);
        assert_eq!(selection.steps.len(), 1);
        assert!(selection.removed_predictors().is_empty());
    }

    #[test]
    fn ties_remove_the_first_column() {
        let mut model = run(&two_predictor_table()).full;
        for c in model.coefficients.iter_mut() {
            c.p_value = 0.5;
        }
        assert_eq!(least_significant(&model).unwrap().name, "SAT");
    }

    #[test]
    fn invalid_alpha_is_rejected() {
        let table = two_predictor_table();
        let err = select(&table.response(), table.full_design().unwrap(), 1.5).unwrap_err();
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn collinear_predictors_fail_with_numerical_error() {
        let table = ObservationTable::from_columns(
            Schema::new("SPEND", &["A", "B"]),
            vec![
                ("A", vec![1.0, 2.0, 3.0, 4.0, 5.0]),
                ("B", vec![2.0, 4.0, 6.0, 8.0, 10.0]),
                ("SPEND", vec![3.0, 1.0, 4.0, 1.0, 5.0]),
            ],
        )
        .unwrap();
        let err = select(&table.response(), table.full_design().unwrap(), DEFAULT_ALPHA).unwrap_err();
        assert_eq!(err.exit_code(), 4);
    }
}
