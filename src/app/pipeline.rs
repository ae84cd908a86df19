//! Shared selection pipeline used by every subcommand that fits.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! CSV ingest -> full design -> backward elimination -> residuals -> target prediction
//!
//! The subcommands can then focus on presentation (text, JSON, plots).

use crate::data::ObservationTable;
use crate::domain::{PredictionReport, ResidualRow, RunConfig, Selection};
use crate::error::AppError;
use crate::fit::select;
use crate::io::load_table;
use crate::report::{compute_residuals, prediction_report};

/// All computed outputs of a single run.
#[derive(Debug, Clone)]
pub struct RunOutput {
    pub table: ObservationTable,
    pub selection: Selection,
    pub residuals: Vec<ResidualRow>,
    pub prediction: PredictionReport,
}

/// Load the configured CSV and run the pipeline on it.
pub fn run_selection(config: &RunConfig) -> Result<RunOutput, AppError> {
    let table = load_table(&config.csv_path, &config.schema)?;
    run_selection_on_table(config, table)
}

/// Run the pipeline on an already validated table.
pub fn run_selection_on_table(config: &RunConfig, table: ObservationTable) -> Result<RunOutput, AppError> {
    let selection = select(&table.response(), table.full_design()?, config.alpha)?;
    let residuals = compute_residuals(&table, &selection.final_model)?;
    let prediction = prediction_report(&selection.final_model, &config.target, config.level)?;

    Ok(RunOutput {
        table,
        selection,
        residuals,
        prediction,
    })
}
