//! Command-line parsing for the `spend` backward-elimination tool.
//!
//! The goal of this module is to keep **argument parsing** and **command dispatch**
//! separate from the modeling/math code.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::domain::{COEF_CI_LEVEL, DEFAULT_ALPHA, DEFAULT_CSV};

/// Top-level CLI.
#[derive(Debug, Parser)]
#[command(name = "spend", version, about = "Backward-elimination OLS for institutional spending")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

/// CLI subcommands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Run backward elimination, print summaries and the trace, predict the target case.
    Select(SelectArgs),
    /// Print only the target prediction and its intervals (useful for scripting).
    Predict(PredictArgs),
    /// Write a synthetic college dataset to CSV.
    Generate(GenerateArgs),
}

/// Data and model options shared by `select` and `predict`.
#[derive(Debug, Args, Clone)]
pub struct DataArgs {
    /// College CSV with SPEND and the seven candidate predictors.
    #[arg(long, value_name = "PATH", env = "SPEND_CSV", default_value = DEFAULT_CSV)]
    pub csv: PathBuf,

    /// Significance level for backward elimination.
    #[arg(long, default_value_t = DEFAULT_ALPHA)]
    pub alpha: f64,

    /// Target case JSON (`label`, `features`, optional `actual`). Defaults to HSU.
    #[arg(long, value_name = "JSON")]
    pub target: Option<PathBuf>,

    /// Coverage of the prediction intervals.
    #[arg(long, default_value_t = COEF_CI_LEVEL)]
    pub level: f64,
}

/// Options for a full selection run.
#[derive(Debug, Args, Clone)]
pub struct SelectArgs {
    #[command(flatten)]
    pub data: DataArgs,

    /// Export per-row actual/fitted/residual of the final model to CSV.
    #[arg(long, value_name = "CSV")]
    pub export: Option<PathBuf>,

    /// Print the selection result as JSON instead of text.
    #[arg(long)]
    pub json: bool,

    /// Render ASCII plots in the terminal.
    #[arg(long)]
    pub plot: bool,

    /// Plot width (columns).
    #[arg(long, default_value_t = 72)]
    pub width: usize,

    /// Plot height (rows).
    #[arg(long, default_value_t = 22)]
    pub height: usize,

    /// Write the SVG artifacts into this directory.
    #[arg(long = "out-dir", value_name = "DIR")]
    pub out_dir: Option<PathBuf>,
}

/// Options for prediction-only output.
#[derive(Debug, Args, Clone)]
pub struct PredictArgs {
    #[command(flatten)]
    pub data: DataArgs,
}

/// Options for synthetic data generation.
#[derive(Debug, Args, Clone)]
pub struct GenerateArgs {
    /// Destination CSV.
    #[arg(long, value_name = "PATH")]
    pub out: PathBuf,

    /// Number of institutions to generate.
    #[arg(long, default_value_t = 100)]
    pub rows: usize,

    /// Random seed.
    #[arg(long, default_value_t = 42)]
    pub seed: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn select_flags_parse() {
        let cli = Cli::parse_from([
            "spend", "select", "--csv", "x.csv", "--alpha", "0.1", "--plot", "--out-dir", "out", "--json",
        ]);
        let Command::Select(args) = cli.command else {
            panic!("expected select");
        };
        assert_eq!(args.data.csv, PathBuf::from("x.csv"));
        assert_eq!(args.data.alpha, 0.1);
        assert!(args.plot && args.json);
        assert_eq!(args.out_dir, Some(PathBuf::from("out")));
        assert_eq!(args.width, 72);
    }

    #[test]
    fn generate_requires_out() {
        assert!(Cli::try_parse_from(["spend", "generate"]).is_err());
        let cli = Cli::try_parse_from(["spend", "generate", "--out", "s.csv", "--rows", "10"]).unwrap();
        let Command::Generate(args) = cli.command else {
            panic!("expected generate");
        };
        assert_eq!(args.rows, 10);
        assert_eq!(args.seed, 42);
    }

    #[test]
    fn predict_defaults() {
        let cli = Cli::try_parse_from(["spend", "predict", "--csv", "c.csv"]).unwrap();
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(args.data.alpha, DEFAULT_ALPHA);
        assert_eq!(args.data.level, 0.95);
        assert!(args.data.target.is_none());
    }
}
