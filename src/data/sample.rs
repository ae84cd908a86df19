//! Synthetic college sample generation.
//!
//! Rows are drawn from a small structural model so that the generated file
//! behaves like the real college data under backward elimination: SAT drives
//! TOP10, ACCRATE and GRADRATE, while SPEND depends only on SAT, PHD and RATIO
//! plus Gaussian noise.

use rand::prelude::*;
use rand::rngs::StdRng;
use rand_distr::Normal;

use crate::data::ObservationTable;
use crate::domain::Schema;
use crate::error::AppError;

/// Noise standard deviation of SPEND around its structural mean.
const SPEND_NOISE_SD: f64 = 3000.0;

/// Lowest SPEND the generator emits.
const SPEND_FLOOR: f64 = 2000.0;

/// Generate `rows` synthetic institutions with the college schema.
///
/// The same `(rows, seed)` pair always yields the same table.
pub fn generate_sample(rows: usize, seed: u64) -> Result<ObservationTable, AppError> {
    if rows == 0 {
        return Err(AppError::input("Sample row count must be > 0."));
    }

    let mut rng = StdRng::seed_from_u64(seed);
    let normal = Normal::new(0.0_f64, 1.0)
        .map_err(|e| AppError::numerical(format!("Noise distribution error: {e}")))?;
    let mut z = move || normal.sample(&mut rng);

    let mut sat = Vec::with_capacity(rows);
    let mut top10 = Vec::with_capacity(rows);
    let mut accrate = Vec::with_capacity(rows);
    let mut phd = Vec::with_capacity(rows);
    let mut ratio = Vec::with_capacity(rows);
    let mut gradrate = Vec::with_capacity(rows);
    let mut alumni = Vec::with_capacity(rows);
    let mut spend = Vec::with_capacity(rows);

    for _ in 0..rows {
        let s = (1100.0 + 120.0 * z()).clamp(800.0, 1500.0).round();
        let t = (20.0 + 0.2 * (s - 1000.0) + 10.0 * z()).clamp(1.0, 100.0).round();
        let a = (80.0 - 0.1 * (s - 1000.0) + 10.0 * z()).clamp(10.0, 100.0).round();
        let p = (80.0 + 10.0 * z()).clamp(30.0, 100.0).round();
        let r = round1((14.0 + 3.0 * z()).clamp(5.0, 30.0));
        let g = (40.0 + 0.08 * (s - 900.0) + 8.0 * z()).clamp(20.0, 100.0).round();
        let al = (25.0 + 10.0 * z()).clamp(1.0, 70.0).round();

        let mean = -12_000.0 + 20.0 * s + 150.0 * p - 450.0 * r;
        let y = (mean + SPEND_NOISE_SD * z()).max(SPEND_FLOOR).round();

        sat.push(s);
        top10.push(t);
        accrate.push(a);
        phd.push(p);
        ratio.push(r);
        gradrate.push(g);
        alumni.push(al);
        spend.push(y);
    }

    log::debug!("generated {rows} synthetic rows with seed {seed}");

    ObservationTable::from_columns(
        Schema::college(),
        vec![
            ("SAT", sat),
            ("TOP10", top10),
            ("ACCRATE", accrate),
            ("PHD", phd),
            ("RATIO", ratio),
            ("GRADRATE", gradrate),
            ("ALUMNI", alumni),
            ("SPEND", spend),
        ],
    )
}

fn round1(v: f64) -> f64 {
    (v * 10.0).round() / 10.0
}
