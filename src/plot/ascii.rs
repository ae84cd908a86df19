//! ASCII plotting for terminal output.
//!
//! This is intentionally "dumb" (fixed-size grid), optimized for:
//! - quick visual sanity checks in a terminal
//! - deterministic output (helpful for golden tests)
//!
//! Plot elements:
//! - observations: `o`
//! - reference or fitted line: `-`

use crate::data::ObservationTable;
use crate::domain::ResidualRow;
use crate::error::AppError;
use crate::plot::{identity_line, regression_line};

/// Predicted (y) against actual (x) with the 45° reference line.
pub fn render_predicted_vs_actual(rows: &[ResidualRow], width: usize, height: usize) -> String {
    let points: Vec<(f64, f64)> = rows.iter().map(|r| (r.actual, r.fitted)).collect();
    let line = identity_line(&points);
    render_scatter(&points, line.as_deref(), "actual", "predicted", width, height)
}

/// One predictor against the response with its simple-regression line.
pub fn render_predictor_vs_response(
    table: &ObservationTable,
    predictor: &str,
    width: usize,
    height: usize,
) -> Result<String, AppError> {
    let x = table.column(predictor)?;
    let y = table.column(&table.schema().response)?;
    let points: Vec<(f64, f64)> = x.iter().copied().zip(y.iter().copied()).collect();
    let line = regression_line(table, predictor)?;
    Ok(render_scatter(&points, Some(&line), predictor, &table.schema().response, width, height))
}

/// Scatter `points` with an optional polyline drawn underneath.
pub fn render_scatter(
    points: &[(f64, f64)],
    line: Option<&[(f64, f64)]>,
    x_label: &str,
    y_label: &str,
    width: usize,
    height: usize,
) -> String {
    let width = width.max(10);
    let height = height.max(5);

    let line_pts = line.unwrap_or(&[]);
    let (x_min, x_max) = range(points.iter().chain(line_pts).map(|p| p.0)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = range(points.iter().chain(line_pts).map(|p| p.1)).unwrap_or((0.0, 1.0));
    let (y_min, y_max) = pad_range(y_min, y_max, 0.05);

    let mut grid = vec![vec![' '; width]; height];

    // Draw the line first (so points can overlay).
    if let Some(line) = line {
        draw_polyline(&mut grid, line, (x_min, x_max), (y_min, y_max));
    }

    for &(px, py) in points {
        let x = map_x(px, x_min, x_max, width);
        let y = map_y(py, y_min, y_max, height);
        grid[y][x] = 'o';
    }

    let mut out = String::new();
    out.push_str(&format!(
        "Plot: {x_label}=[{x_min:.2}, {x_max:.2}] | {y_label}=[{y_min:.2}, {y_max:.2}]\n"
    ));

    for row in grid {
        out.push_str(&row.into_iter().collect::<String>());
        out.push('\n');
    }

    out
}

fn range(values: impl Iterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        min = min.min(v);
        max = max.max(v);
    }
    if min.is_finite() && max.is_finite() && max > min {
        Some((min, max))
    } else {
        None
    }
}

fn pad_range(min: f64, max: f64, frac: f64) -> (f64, f64) {
    let span = (max - min).abs();
    let pad = (span * frac).max(1e-12);
    (min - pad, max + pad)
}

fn map_x(x: f64, x_min: f64, x_max: f64, width: usize) -> usize {
    let width = width.max(2);
    let u = ((x - x_min) / (x_max - x_min)).clamp(0.0, 1.0);
    (u * (width as f64 - 1.0)).round() as usize
}

fn map_y(y: f64, y_min: f64, y_max: f64, height: usize) -> usize {
    let height = height.max(2);
    let u = ((y - y_min) / (y_max - y_min)).clamp(0.0, 1.0);
    // y=top is max -> row 0
    (height as f64 - 1.0 - (u * (height as f64 - 1.0))).round() as usize
}

fn draw_polyline(grid: &mut [Vec<char>], line: &[(f64, f64)], xr: (f64, f64), yr: (f64, f64)) {
    if line.len() < 2 {
        return;
    }
    let height = grid.len();
    let width = grid[0].len();

    let mut prev = None;
    for &(px, py) in line {
        let x = map_x(px, xr.0, xr.1, width);
        let y = map_y(py, yr.0, yr.1, height);
        if let Some((x0, y0)) = prev {
            draw_line(grid, x0, y0, x, y, '-');
        } else {
            grid[y][x] = '-';
        }
        prev = Some((x, y));
    }
}

/// Integer line drawing (Bresenham-ish).
fn draw_line(grid: &mut [Vec<char>], x0: usize, y0: usize, x1: usize, y1: usize, ch: char) {
    let mut x0 = x0 as isize;
    let mut y0 = y0 as isize;
    let x1 = x1 as isize;
    let y1 = y1 as isize;

    let dx = (x1 - x0).abs();
    let sx = if x0 < x1 { 1 } else { -1 };
    let dy = -(y1 - y0).abs();
    let sy = if y0 < y1 { 1 } else { -1 };
    let mut err = dx + dy;

    loop {
        if y0 >= 0
            && (y0 as usize) < grid.len()
            && x0 >= 0
            && (x0 as usize) < grid[0].len()
            && grid[y0 as usize][x0 as usize] == ' '
        {
            grid[y0 as usize][x0 as usize] = ch;
        }

        if x0 == x1 && y0 == y1 {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x0 += sx;
        }
        if e2 <= dx {
            err += dx;
            y0 += sy;
        }
    }
}
