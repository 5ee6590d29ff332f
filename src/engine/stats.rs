use serde::{Deserialize, Serialize};

use super::selection::Statistic;

// ---------------------------------------------------------------------------
// Scalar statistics over a group of rates
// ---------------------------------------------------------------------------
//
// Every function expects a non-empty slice; groups are built from observed
// rows so an empty group never reaches them.

/// Apply `statistic` to `values`.
pub fn apply(statistic: Statistic, values: &[f64]) -> f64 {
    match statistic {
        Statistic::Median => median(values),
        Statistic::Mean => mean(values),
        Statistic::Min => values.iter().copied().fold(f64::INFINITY, f64::min),
        Statistic::Max => values.iter().copied().fold(f64::NEG_INFINITY, f64::max),
        Statistic::Std => std_dev(values),
    }
}

pub fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

pub fn median(values: &[f64]) -> f64 {
    median_sorted(&sorted(values))
}

/// Sample standard deviation (n - 1 denominator). `NaN` for a single value.
pub fn std_dev(values: &[f64]) -> f64 {
    let n = values.len();
    if n < 2 {
        return f64::NAN;
    }
    let m = mean(values);
    let ss: f64 = values.iter().map(|v| (v - m).powi(2)).sum();
    (ss / (n - 1) as f64).sqrt()
}

fn sorted(values: &[f64]) -> Vec<f64> {
    let mut v = values.to_vec();
    v.sort_by(f64::total_cmp);
    v
}

fn median_sorted(sorted: &[f64]) -> f64 {
    let n = sorted.len();
    if n % 2 == 1 {
        sorted[n / 2]
    } else {
        (sorted[n / 2 - 1] + sorted[n / 2]) / 2.0
    }
}

/// Linearly interpolated quantile of already-sorted values, `q` in `[0, 1]`.
fn quantile_sorted(sorted: &[f64], q: f64) -> f64 {
    let pos = q * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

// ---------------------------------------------------------------------------
// BoxStats – five-number summary for box plots
// ---------------------------------------------------------------------------

/// Box-plot summary: quartiles, Tukey whiskers (furthest observation within
/// 1.5 IQR of the box) and the observations beyond them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BoxStats {
    pub lower_whisker: f64,
    pub q1: f64,
    pub median: f64,
    pub q3: f64,
    pub upper_whisker: f64,
    pub outliers: Vec<f64>,
}

impl BoxStats {
    /// `None` for an empty slice.
    pub fn compute(values: &[f64]) -> Option<Self> {
        if values.is_empty() {
            return None;
        }
        let sorted = sorted(values);
        let q1 = quantile_sorted(&sorted, 0.25);
        let q3 = quantile_sorted(&sorted, 0.75);
        let iqr = q3 - q1;
        let lo_fence = q1 - 1.5 * iqr;
        let hi_fence = q3 + 1.5 * iqr;

        let inside = || {
            sorted
                .iter()
                .copied()
                .filter(move |v| (lo_fence..=hi_fence).contains(v))
        };
        let lower_whisker = inside().next().unwrap_or(q1);
        let upper_whisker = inside().last().unwrap_or(q3);
        let outliers = sorted
            .iter()
            .copied()
            .filter(|v| !(lo_fence..=hi_fence).contains(v))
            .collect();

        Some(BoxStats {
            lower_whisker,
            q1,
            median: median_sorted(&sorted),
            q3,
            upper_whisker,
            outliers,
        })
    }
}
