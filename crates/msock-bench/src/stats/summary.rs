//! Mean and population standard deviation of a sample set.

use serde::{Deserialize, Serialize};

/// Arithmetic mean and population standard deviation of `samples`.
///
/// Uses the single-pass identity `dev = sqrt(E[x²] - E[x]²)`. Rounding can
/// push the radicand slightly below zero, so it is clamped at zero.
///
/// # Returns
///
/// * `Some((mean, std_dev))`
/// * `None` - If samples is empty
///
/// # Examples
///
/// ```
/// use msock_bench::stats::mean_and_deviation;
///
/// let (mean, dev) = mean_and_deviation(&[1.0, 2.0, 3.0, 4.0, 5.0]).unwrap();
/// assert_eq!(mean, 3.0);
/// assert!((dev - 2.0_f64.sqrt()).abs() < 1e-12);
/// ```
pub fn mean_and_deviation(samples: &[f64]) -> Option<(f64, f64)> {
    if samples.is_empty() {
        return None;
    }

    let n = samples.len() as f64;
    let mean = samples.iter().sum::<f64>() / n;
    let mean_of_squares = samples.iter().map(|x| x * x).sum::<f64>() / n;
    let variance = (mean_of_squares - mean * mean).max(0.0);

    Some((mean, variance.sqrt()))
}

/// Summary of one benchmark run's samples, in nanoseconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Number of samples
    pub count: usize,
    /// Arithmetic mean
    pub mean: f64,
    /// Population standard deviation (divides by N)
    pub std_dev: f64,
    /// Smallest sample
    pub min: f64,
    /// Largest sample
    pub max: f64,
}

impl Summary {
    /// Summarize samples, or `None` if there are none.
    pub fn from_samples(samples: &[f64]) -> Option<Self> {
        let (mean, std_dev) = mean_and_deviation(samples)?;
        let min = samples.iter().copied().fold(f64::INFINITY, f64::min);
        let max = samples.iter().copied().fold(f64::NEG_INFINITY, f64::max);

        Some(Summary {
            count: samples.len(),
            mean,
            std_dev,
            min,
            max,
        })
    }
}
