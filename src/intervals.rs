//! RR interval derivation
//!
//! Converts beat peak positions into millisecond inter-beat intervals using
//! the nominal configured sampling rate.

use crate::config::PipelineConfig;

/// Peak-to-interval conversion stage
pub struct IntervalCalculator;

impl IntervalCalculator {
    /// Millisecond RR intervals between consecutive peaks.
    ///
    /// `n` peaks yield `max(n - 1, 0)` intervals; fewer than two peaks is not
    /// an error, just an empty series.
    pub fn derive(peaks: &[usize], config: &PipelineConfig) -> Vec<f64> {
        if peaks.len() < 2 || config.sampling_rate_hz <= 0.0 {
            return Vec::new();
        }
        peaks
            .windows(2)
            .map(|pair| (pair[1] - pair[0]) as f64 / config.sampling_rate_hz * 1000.0)
            .collect()
    }
}
