//! SVG report artifacts rendered with Plotters.
//!
//! Three files are written to a fixed set of names inside the output
//! directory: the final model summary as text, predicted vs actual with the
//! 45° line, and one predictor against the response with its fitted line.

use std::fs;
use std::path::{Path, PathBuf};

use plotters::prelude::*;

use crate::data::ObservationTable;
use crate::domain::ResidualRow;
use crate::error::AppError;
use crate::plot::{identity_line, regression_line};

pub const MODEL_SUMMARY_SVG: &str = "model_summary.svg";
pub const PREDICTED_VS_ACTUAL_SVG: &str = "predicted_vs_actual.svg";
pub const SAT_VS_SPEND_SVG: &str = "sat_vs_spend.svg";

/// Predictor shown in the single-predictor scatter.
pub const SCATTER_PREDICTOR: &str = "SAT";

const CHART_SIZE: (u32, u32) = (800, 600);
const CHAR_WIDTH: u32 = 8;
const LINE_HEIGHT: u32 = 16;
const TEXT_MARGIN: u32 = 20;

/// Paths of the written artifacts.
#[derive(Debug, Clone)]
pub struct SvgArtifacts {
    pub summary: PathBuf,
    pub predicted_vs_actual: PathBuf,
    pub predictor_vs_response: PathBuf,
}

/// Write all three artifacts into `dir`, creating it if needed.
pub fn write_svg_artifacts(
    dir: &Path,
    summary_text: &str,
    rows: &[ResidualRow],
    table: &ObservationTable,
) -> Result<SvgArtifacts, AppError> {
    fs::create_dir_all(dir)
        .map_err(|e| AppError::input(format!("Failed to create output directory '{}': {e}", dir.display())))?;

    let artifacts = SvgArtifacts {
        summary: dir.join(MODEL_SUMMARY_SVG),
        predicted_vs_actual: dir.join(PREDICTED_VS_ACTUAL_SVG),
        predictor_vs_response: dir.join(SAT_VS_SPEND_SVG),
    };

    render_text_svg(&artifacts.summary, summary_text)?;

    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.actual, r.fitted)).collect();
    let response = &table.schema().response;
    render_scatter_svg(
        &artifacts.predicted_vs_actual,
        &format!("Predicted vs Actual {response}"),
        &format!("Actual {response}"),
        &format!("Predicted {response}"),
        &points,
        identity_line(&points).as_deref(),
    )?;

    let x = table.column(SCATTER_PREDICTOR)?;
    let y = table.column(response)?;
    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let line = regression_line(table, SCATTER_PREDICTOR)?;
    render_scatter_svg(
        &artifacts.predictor_vs_response,
        &format!("{SCATTER_PREDICTOR} vs {response}"),
        SCATTER_PREDICTOR,
        response,
        &points,
        Some(&line),
    )?;

    log::debug!("wrote SVG artifacts to {}", dir.display());
    Ok(artifacts)
}

/// Render monospace text (one `<text>` per line) into an SVG file.
pub fn render_text_svg(path: &Path, text: &str) -> Result<(), AppError> {
    let lines: Vec<&str> = text.lines().collect();
    let cols = lines.iter().map(|l| l.chars().count()).max().unwrap_or(0) as u32;
    let size = (
        cols * CHAR_WIDTH + 2 * TEXT_MARGIN,
        lines.len() as u32 * LINE_HEIGHT + 2 * TEXT_MARGIN,
    );

    let root = SVGBackend::new(path, size).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let style = ("monospace", 13).into_font().color(&BLACK);
    for (i, line) in lines.iter().enumerate() {
        // SVG collapses runs of spaces; non-breaking spaces keep the columns aligned.
        let line = line.replace(' ', "\u{a0}");
        let pos = (TEXT_MARGIN as i32, (TEXT_MARGIN + i as u32 * LINE_HEIGHT) as i32);
        root.draw(&Text::new(line, pos, style.clone())).map_err(plot_err)?;
    }

    root.present().map_err(plot_err)
}

/// Scatter plot with an optional line drawn underneath.
pub fn render_scatter_svg(
    path: &Path,
    title: &str,
    x_label: &str,
    y_label: &str,
    points: &[(f64, f64)],
    line: Option<&[(f64, f64)]>,
) -> Result<(), AppError> {
    let line_pts = line.unwrap_or(&[]);
    let (x0, x1) = padded_bounds(points.iter().chain(line_pts).map(|p| p.0));
    let (y0, y1) = padded_bounds(points.iter().chain(line_pts).map(|p| p.1));

    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE).map_err(plot_err)?;

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 20))
        .margin(15)
        .set_label_area_size(LabelAreaPosition::Left, 70)
        .set_label_area_size(LabelAreaPosition::Bottom, 40)
        .build_cartesian_2d(x0..x1, y0..y1)
        .map_err(plot_err)?;

    chart
        .configure_mesh()
        .x_desc(x_label)
        .y_desc(y_label)
        .x_labels(8)
        .y_labels(8)
        .draw()
        .map_err(plot_err)?;

    if let Some(line) = line {
        chart
            .draw_series(LineSeries::new(line.iter().copied(), RED.stroke_width(2)))
            .map_err(plot_err)?;
    }
    chart
        .draw_series(points.iter().map(|&(x, y)| Circle::new((x, y), 3, BLUE.filled())))
        .map_err(plot_err)?;

    root.present().map_err(plot_err)
}

fn padded_bounds(values: impl Iterator<Item = f64>) -> (f64, f64) {
    let (mut lo, mut hi) = (f64::INFINITY, f64::NEG_INFINITY);
    for v in values {
        lo = lo.min(v);
        hi = hi.max(v);
    }
    if !(lo.is_finite() && hi.is_finite()) {
        return (0.0, 1.0);
    }
    let pad = ((hi - lo) * 0.05).max(1e-9 * lo.abs().max(1.0));
    (lo - pad, hi + pad)
}

fn plot_err(e: impl std::fmt::Display) -> AppError {
    AppError::input(format!("Plot rendering error: {e}"))
}
