//! Beat peak detection
//!
//! Locates R-peaks in the filtered signal with an adaptive threshold
//! (median + multiplier * std-dev, robust to outliers) and a minimum spacing
//! derived from the maximum plausible heart rate.

use log::debug;
use std::cmp::Ordering;

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::types::{Diagnostic, DiagnosticCode, Stage};

/// Signals whose range falls below this are treated as flat
const FLATNESS_EPSILON: f64 = 1e-6;

/// Adaptive-threshold peak detection stage
pub struct PeakDetector;

impl PeakDetector {
    /// Detect beat peaks in a filtered signal.
    ///
    /// Returns strictly ascending sample indices; consecutive indices differ
    /// by at least the minimum spacing. A flat or empty signal yields an
    /// empty set with a diagnostic. A non-positive sampling rate is the one
    /// condition that cannot be absorbed and fails the run.
    pub fn detect(
        filtered: &[f64],
        config: &PipelineConfig,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Result<Vec<usize>, PipelineError> {
        if config.sampling_rate_hz <= 0.0 {
            return Err(PipelineError::InvalidSamplingRate(config.sampling_rate_hz));
        }
        if filtered.is_empty() {
            return Ok(Vec::new());
        }

        let min = filtered.iter().cloned().fold(f64::INFINITY, f64::min);
        let max = filtered.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
        if max - min < FLATNESS_EPSILON {
            diagnostics.push(Diagnostic::new(
                Stage::PeakDetection,
                DiagnosticCode::FlatSignal,
                "filtered signal is flat or near-constant, no peaks detectable",
            ));
            return Ok(Vec::new());
        }

        // the flatness guard has returned by now for any signal shorter
        // than two samples, so len - 1 >= 1 below
        let threshold = median(filtered) + config.peak_threshold_multiplier * std_dev(filtered);
        let min_distance = min_distance_samples(config, filtered.len());

        // Interior local maxima above the threshold
        let mut candidates: Vec<usize> = (1..filtered.len() - 1)
            .filter(|&i| {
                filtered[i] > filtered[i - 1]
                    && filtered[i] > filtered[i + 1]
                    && filtered[i] > threshold
            })
            .collect();

        // Greedy suppression: highest amplitude wins its spacing window,
        // equal amplitudes resolve to the lower index.
        candidates.sort_by(|&a, &b| {
            filtered[b]
                .partial_cmp(&filtered[a])
                .unwrap_or(Ordering::Equal)
                .then(a.cmp(&b))
        });
        let mut kept: Vec<usize> = Vec::new();
        for &idx in &candidates {
            if kept.iter().all(|&k| idx.abs_diff(k) >= min_distance) {
                kept.push(idx);
            }
        }
        kept.sort_unstable();

        debug!(
            "detected {} peaks (threshold {:.4}, min spacing {} samples)",
            kept.len(),
            threshold,
            min_distance
        );
        Ok(kept)
    }
}

/// Minimum peak spacing from the maximum plausible heart rate, clamped to
/// `[1, len - 1]`
fn min_distance_samples(config: &PipelineConfig, len: usize) -> usize {
    let raw = (config.sampling_rate_hz * 60.0 / config.max_hr_bpm).round() as usize;
    raw.clamp(1, len - 1)
}

fn median(data: &[f64]) -> f64 {
    let mut sorted = data.to_vec();
    sorted.sort_by(|a, b| a.partial_cmp(b).unwrap_or(Ordering::Equal));
    let mid = sorted.len() / 2;
    if sorted.len() % 2 == 0 {
        (sorted[mid - 1] + sorted[mid]) / 2.0
    } else {
        sorted[mid]
    }
}

/// Population standard deviation
fn std_dev(data: &[f64]) -> f64 {
    let mean = data.iter().sum::<f64>() / data.len() as f64;
    let variance = data.iter().map(|x| (x - mean).powi(2)).sum::<f64>() / data.len() as f64;
    variance.sqrt()
}
