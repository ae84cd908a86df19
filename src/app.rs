//! Top-level application orchestration.
//!
//! `src/main.rs` is intentionally tiny; this module is the "real main" that:
//! - loads `.env` and sets up logging
//! - parses CLI arguments
//! - runs the selection pipeline
//! - prints reports/plots
//! - writes optional exports and SVG artifacts

use chrono::Local;
use clap::Parser;

use crate::cli::{Cli, Command, DataArgs, GenerateArgs, PredictArgs, SelectArgs};
use crate::domain::{RunConfig, TargetCase};
use crate::error::AppError;

pub mod pipeline;

/// Entry point for the `spend` binary.
pub fn run() -> Result<(), AppError> {
    // A missing `.env` is not an error; `SPEND_CSV` may come from the real environment.
    dotenvy::dotenv().ok();
    init_logging();

    // We want `spend` and `spend --alpha 0.1` to behave like `spend select ...`.
    //
    // Clap requires a subcommand name, so we do a small, explicit rewrite of the
    // argv list before parsing.
    let argv = rewrite_args(std::env::args().collect());
    let cli = Cli::parse_from(argv);

    match cli.command {
        Command::Select(args) => handle_select(args),
        Command::Predict(args) => handle_predict(args),
        Command::Generate(args) => handle_generate(args),
    }
}

fn init_logging() {
    // `RUST_LOG` overrides the default; repeated init (tests) is ignored.
    let env = env_logger::Env::default().default_filter_or("warn");
    env_logger::Builder::from_env(env).try_init().ok();
}

fn handle_select(args: SelectArgs) -> Result<(), AppError> {
    let mut config = run_config_from_args(&args.data)?;
    config.plot = args.plot;
    config.plot_width = args.width;
    config.plot_height = args.height;
    config.export_results = args.export.clone();
    config.artifacts_dir = args.out_dir.clone();
    config.json = args.json;

    let started = Local::now();
    let run = pipeline::run_selection(&config)?;
    let response = &config.schema.response;
    let final_summary =
        crate::report::format_model_summary("Final model summary", &run.selection.final_model, response);

    if config.json {
        println!("{}", crate::io::run_json(&run.selection, &run.prediction)?);
    } else {
        println!("{}", crate::report::format_run_header(&config, run.table.n_rows(), started));
        println!(
            "{}",
            crate::report::format_model_summary("Full model summary", &run.selection.full, response)
        );
        println!("{}", crate::report::format_elimination_trace(&run.selection));
        println!("{final_summary}");
        println!("{}", crate::report::format_prediction(&run.prediction, response));
        println!("{}", crate::report::format_interval(&run.prediction));
    }

    if config.plot && !config.json {
        println!(
            "{}",
            crate::plot::render_predicted_vs_actual(&run.residuals, config.plot_width, config.plot_height)
        );
        println!(
            "{}",
            crate::plot::render_predictor_vs_response(
                &run.table,
                crate::plot::SCATTER_PREDICTOR,
                config.plot_width,
                config.plot_height,
            )?
        );
    }

    // Optional exports.
    if let Some(path) = &config.export_results {
        crate::io::write_results_csv(path, &run.residuals)?;
        log::info!("wrote per-row results to {}", path.display());
    }
    if let Some(dir) = &config.artifacts_dir {
        let artifacts = crate::plot::write_svg_artifacts(dir, &final_summary, &run.residuals, &run.table)?;
        log::info!(
            "wrote {}, {}, {}",
            artifacts.summary.display(),
            artifacts.predicted_vs_actual.display(),
            artifacts.predictor_vs_response.display()
        );
    }

    Ok(())
}

fn handle_predict(args: PredictArgs) -> Result<(), AppError> {
    let config = run_config_from_args(&args.data)?;
    let run = pipeline::run_selection(&config)?;

    print!("{}", crate::report::format_prediction(&run.prediction, &config.schema.response));
    print!("{}", crate::report::format_interval(&run.prediction));
    Ok(())
}

fn handle_generate(args: GenerateArgs) -> Result<(), AppError> {
    let table = crate::data::generate_sample(args.rows, args.seed)?;
    crate::io::write_table_csv(&args.out, &table)?;
    println!("Wrote {} rows to {}", table.n_rows(), args.out.display());
    Ok(())
}

/// Map shared CLI options to a [`RunConfig`], reading the target JSON if given.
pub fn run_config_from_args(args: &DataArgs) -> Result<RunConfig, AppError> {
    let target = match &args.target {
        Some(path) => crate::io::read_target_json(path)?,
        None => TargetCase::hsu(),
    };

    let mut config = RunConfig::new(args.csv.clone());
    config.alpha = args.alpha;
    config.level = args.level;
    config.target = target;
    Ok(config)
}

/// Rewrite argv so `spend` defaults to `spend select`.
///
/// Rules:
/// - `spend`                      -> `spend select`
/// - `spend --alpha 0.1 ...`      -> `spend select --alpha 0.1 ...`
/// - `spend --help/--version/-h`  -> unchanged (show top-level help/version)
fn rewrite_args(mut argv: Vec<String>) -> Vec<String> {
    let Some(arg1) = argv.get(1).cloned() else {
        argv.push("select".to_string());
        return argv;
    };

    let is_top_level_help_or_version = matches!(
        arg1.as_str(),
        "-h" | "--help" | "-V" | "--version" | "help"
    );
    if is_top_level_help_or_version {
        return argv;
    }

    let is_subcommand = matches!(arg1.as_str(), "select" | "predict" | "generate");
    if is_subcommand {
        return argv;
    }

    // If the first token is a flag, treat it as "select flags".
    if arg1.starts_with('-') {
        argv.insert(1, "select".to_string());
        return argv;
    }

    // Otherwise, leave as-is.
    argv
}

#[cfg(test)]
mod tests {
    use super::*;

    fn argv(args: &[&str]) -> Vec<String> {
        args.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn bare_invocation_runs_select() {
        assert_eq!(rewrite_args(argv(&["spend"])), argv(&["spend", "select"]));
    }

    #[test]
    fn leading_flags_are_select_flags() {
        assert_eq!(
            rewrite_args(argv(&["spend", "--alpha", "0.1"])),
            argv(&["spend", "select", "--alpha", "0.1"])
        );
    }

    #[test]
    fn subcommands_and_help_are_untouched() {
        for a in [argv(&["spend", "predict"]), argv(&["spend", "--help"]), argv(&["spend", "generate", "--out", "x"])] {
            assert_eq!(rewrite_args(a.clone()), a);
        }
    }

    #[test]
    fn config_defaults_to_hsu_target() {
        let cli = Cli::parse_from(["spend", "predict", "--csv", "c.csv", "--alpha", "0.1"]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        let config = run_config_from_args(&args.data).unwrap();
        assert_eq!(config.target, TargetCase::hsu());
        assert_eq!(config.alpha, 0.1);
        assert_eq!(config.csv_path, std::path::PathBuf::from("c.csv"));
    }

    #[test]
    fn unreadable_target_json_is_an_input_error() {
        let cli = Cli::parse_from(["spend", "predict", "--csv", "c.csv", "--target", "missing/target.json"]);
        let Command::Predict(args) = cli.command else {
            panic!("expected predict");
        };
        assert_eq!(run_config_from_args(&args.data).unwrap_err().exit_code(), 2);
    }
}
