//! Export per-row results to CSV and the selection to JSON.
//!
//! The CSV is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::io::Write;
use std::path::Path;

use serde::Serialize;

use crate::data::ObservationTable;
use crate::domain::{PredictionReport, ResidualRow, Selection};
use crate::error::AppError;

/// Write per-row fitted values and residuals of the final model.
pub fn write_results_csv(path: &Path, rows: &[ResidualRow]) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create export CSV '{}': {e}", path.display())))?;
    write_results(file, rows)
}

/// Same as [`write_results_csv`] for any writer.
pub fn write_results<W: Write>(writer: W, rows: &[ResidualRow]) -> Result<(), AppError> {
    let mut out = csv::Writer::from_writer(writer);
    out.write_record(["row", "actual", "fitted", "residual"])
        .map_err(|e| AppError::input(format!("Failed to write export CSV header: {e}")))?;

    for r in rows {
        out.write_record([
            r.row.to_string(),
            format!("{:.4}", r.actual),
            format!("{:.4}", r.fitted),
            format!("{:.4}", r.residual),
        ])
        .map_err(|e| AppError::input(format!("Failed to write export CSV row: {e}")))?;
    }

    out.flush()
        .map_err(|e| AppError::input(format!("Failed to flush export CSV: {e}")))
}

/// Write an observation table as CSV, predictors first and the response last.
pub fn write_table_csv(path: &Path, table: &ObservationTable) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::input(format!("Failed to create CSV '{}': {e}", path.display())))?;
    write_table(file, table)
}

/// Same as [`write_table_csv`] for any writer.
pub fn write_table<W: Write>(writer: W, table: &ObservationTable) -> Result<(), AppError> {
    let schema = table.schema();
    let names: Vec<&str> = schema
        .predictors
        .iter()
        .map(String::as_str)
        .chain(std::iter::once(schema.response.as_str()))
        .collect();
    let columns = names
        .iter()
        .map(|name| table.column(name))
        .collect::<Result<Vec<_>, _>>()?;

    let mut out = csv::Writer::from_writer(writer);
    out.write_record(&names)
        .map_err(|e| AppError::input(format!("Failed to write CSV header: {e}")))?;
    for row in 0..table.n_rows() {
        out.write_record(columns.iter().map(|c| c[row].to_string()))
            .map_err(|e| AppError::input(format!("Failed to write CSV row {}: {e}", row + 1)))?;
    }
    out.flush()
        .map_err(|e| AppError::input(format!("Failed to flush CSV: {e}")))
}

#[derive(Serialize)]
struct RunDocument<'a> {
    selection: &'a Selection,
    prediction: &'a PredictionReport,
}

/// Serialize the selection result and the target prediction as pretty JSON.
pub fn run_json(selection: &Selection, prediction: &PredictionReport) -> Result<String, AppError> {
    serde_json::to_string_pretty(&RunDocument { selection, prediction })
        .map_err(|e| AppError::numerical(format!("Failed to serialize run result: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn csv_has_header_and_one_line_per_row() {
        let rows = [
            ResidualRow { row: 1, actual: 10.0, fitted: 9.5, residual: 0.5 },
            ResidualRow { row: 2, actual: 12.0, fitted: 12.25, residual: -0.25 },
        ];
        let mut buf = Vec::new();
        write_results(&mut buf, &rows).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "row,actual,fitted,residual");
        assert_eq!(lines[2], "2,12.0000,12.2500,-0.2500");
        assert_eq!(lines.len(), 3);
    }

    #[test]
    fn written_table_reads_back_through_ingest() {
        use crate::domain::Schema;
        use crate::io::read_table;

        let table = crate::data::generate_sample(12, 3).unwrap();
        let mut buf = Vec::new();
        write_table(&mut buf, &table).unwrap();

        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("SAT,TOP10,ACCRATE,PHD,RATIO,GRADRATE,ALUMNI,SPEND"));
        let back = read_table(text.as_bytes(), &Schema::college()).unwrap();
        assert_eq!(back.column("RATIO").unwrap(), table.column("RATIO").unwrap());
    }

    #[test]
    fn csv_file_is_written_to_disk() {
        let path = std::env::temp_dir().join(format!("spend_export_{}.csv", std::process::id()));
        write_results_csv(&path, &[ResidualRow { row: 1, actual: 1.0, fitted: 1.0, residual: 0.0 }]).unwrap();
        let text = std::fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("row,actual"));
        let _ = std::fs::remove_file(&path);
    }
}
