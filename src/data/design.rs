//! Design matrices with a named, always-present intercept column.

use nalgebra::DMatrix;

use crate::domain::INTERCEPT;
use crate::error::AppError;

/// Regression input: `const` followed by the retained predictors.
///
/// Narrowing (`without`) returns a new matrix; columns are only ever removed.
#[derive(Debug, Clone, PartialEq)]
pub struct DesignMatrix {
    columns: Vec<String>,
    x: DMatrix<f64>,
}

impl DesignMatrix {
    /// Build `[1, p1, ..., pm]` from predictor columns of length `n_rows`.
    pub fn with_intercept<'a, I>(n_rows: usize, predictors: I) -> Result<Self, AppError>
    where
        I: IntoIterator<Item = (&'a str, &'a [f64])>,
    {
        let mut columns = vec![INTERCEPT.to_string()];
        let mut values: Vec<&[f64]> = Vec::new();

        for (name, col) in predictors {
            if name == INTERCEPT {
                return Err(AppError::input(format!(
                    "Predictor name `{INTERCEPT}` is reserved for the intercept."
                )));
            }
            if columns.iter().any(|c| c == name) {
                return Err(AppError::input(format!("Predictor `{name}` listed twice.")));
            }
            if col.len() != n_rows {
                return Err(AppError::input(format!(
                    "Predictor `{name}` has {} rows, expected {n_rows}.",
                    col.len()
                )));
            }
            columns.push(name.to_string());
            values.push(col);
        }

        let x = DMatrix::from_fn(n_rows, columns.len(), |i, j| if j == 0 { 1.0 } else { values[j - 1][i] });
        Ok(Self { columns, x })
    }

    /// All column names, intercept first.
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    /// Non-intercept column names.
    pub fn predictors(&self) -> &[String] {
        &self.columns[1..]
    }

    pub fn matrix(&self) -> &DMatrix<f64> {
        &self.x
    }

    pub fn n_rows(&self) -> usize {
        self.x.nrows()
    }

    pub fn n_cols(&self) -> usize {
        self.x.ncols()
    }

    /// A copy of this design without predictor `name`.
    pub fn without(&self, name: &str) -> Result<Self, AppError> {
        if name == INTERCEPT {
            return Err(AppError::input("The intercept column cannot be removed."));
        }
        let idx = self
            .columns
            .iter()
            .position(|c| c == name)
            .ok_or_else(|| AppError::input(format!("Column `{name}` is not in the design matrix.")))?;

        let mut columns = self.columns.clone();
        columns.remove(idx);
        Ok(Self {
            columns,
            x: self.x.clone().remove_column(idx),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn design() -> DesignMatrix {
        let a = [1.0, 2.0, 3.0];
        let b = [4.0, 5.0, 6.0];
        DesignMatrix::with_intercept(3, vec![("A", &a[..]), ("B", &b[..])]).unwrap()
    }

    #[test]
    fn without_narrows_and_keeps_original() {
        let full = design();
        let narrowed = full.without("A").unwrap();

        assert_eq!(narrowed.columns(), &["const", "B"]);
        assert_eq!(narrowed.n_cols(), 2);
        assert_eq!(narrowed.matrix()[(2, 1)], 6.0);
        assert_eq!(full.n_cols(), 3);
    }

    #[test]
    fn intercept_cannot_be_removed() {
        assert!(design().without(INTERCEPT).is_err());
        assert!(design().without("C").is_err());
    }

    #[test]
    fn intercept_only_design() {
        let d = DesignMatrix::with_intercept(4, Vec::<(&str, &[f64])>::new()).unwrap();
        assert_eq!(d.columns(), &["const"]);
        assert!(d.predictors().is_empty());
        assert_eq!(d.matrix().iter().sum::<f64>(), 4.0);
    }
}
