//! CSV ingest and validation.
//!
//! This module turns a college CSV into an [`ObservationTable`].
//!
//! Design goals:
//! - **Strict schema**: every response/predictor column must exist (clear
//!   errors + exit code 2)
//! - **Fatal on bad cells**: a non-numeric or non-finite value anywhere in a
//!   required column aborts the run with its line number; there is no row
//!   skipping, since dropping institutions silently would change the model
//! - **Tolerant headers**: names match case-insensitively, surrounding
//!   whitespace and a UTF-8 BOM are ignored, extra columns are allowed
//! - **Separation of concerns**: no fitting logic here

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;

use crate::data::ObservationTable;
use crate::domain::Schema;
use crate::error::AppError;

/// Load and validate a CSV file against `schema`.
pub fn load_table(path: &Path, schema: &Schema) -> Result<ObservationTable, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::input(format!("Failed to open CSV '{}': {e}", path.display())))?;
    let table = read_table(file, schema)?;
    log::debug!(
        "loaded {} rows x {} columns from {}",
        table.n_rows(),
        schema.predictors.len() + 1,
        path.display()
    );
    Ok(table)
}

/// Read and validate CSV data from any reader.
pub fn read_table<R: Read>(reader: R, schema: &Schema) -> Result<ObservationTable, AppError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = reader
        .headers()
        .map_err(|e| AppError::input(format!("Failed to read CSV headers: {e}")))?
        .clone();
    let header_map = build_header_map(&headers);

    // Resolve each required column to its index once.
    let mut wanted: Vec<(&str, usize)> = Vec::new();
    for name in schema.required_columns() {
        let idx = header_map
            .get(&normalize_header_name(name))
            .copied()
            .ok_or_else(|| AppError::input(format!("Missing required column: `{name}`")))?;
        wanted.push((name, idx));
    }

    let mut values: Vec<Vec<f64>> = vec![Vec::new(); wanted.len()];
    for (idx, result) in reader.records().enumerate() {
        // +2 because:
        // - records() starts at line 1 after headers
        // - CSV is 1-based line numbers
        let line = idx + 2;
        let record = result.map_err(|e| AppError::input(format!("CSV parse error on line {line}: {e}")))?;

        for ((name, col), out) in wanted.iter().zip(values.iter_mut()) {
            out.push(parse_cell(&record, *col, name, line)?);
        }
    }

    let columns = wanted.iter().map(|(name, _)| name.to_string()).zip(values);
    ObservationTable::from_columns(schema.clone(), columns)
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    let mut map = HashMap::new();
    for (idx, name) in headers.iter().enumerate() {
        // First occurrence wins for duplicated headers.
        map.entry(normalize_header_name(name)).or_insert(idx);
    }
    map
}

fn normalize_header_name(name: &str) -> String {
    // Excel and other tools sometimes emit UTF-8 CSVs with a BOM prefix on the
    // first header. If we don't strip it, schema validation will incorrectly
    // report missing columns.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn parse_cell(record: &StringRecord, idx: usize, column: &str, line: usize) -> Result<f64, AppError> {
    let raw = record
        .get(idx)
        .ok_or_else(|| AppError::input(format!("Line {line}: missing value for `{column}`.")))?;
    let value: f64 = raw.parse().map_err(|_| {
        AppError::input(format!("Line {line}: `{column}` value '{raw}' is not numeric."))
    })?;
    if !value.is_finite() {
        return Err(AppError::input(format!("Line {line}: `{column}` value '{raw}' is not finite.")));
    }
    Ok(value)
}
