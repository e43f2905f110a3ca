//! Time-domain HRV statistics
//!
//! Computes MeanRR, SDNN, RMSSD, pNN50, and mean heart rate from an RR
//! interval series. A series with fewer than two elements produces undefined
//! metrics rather than an error, so short or empty rhythms still yield a
//! well-formed result.

use crate::types::HrvMetrics;

/// Threshold for pNN50: successive differences larger than this count (ms)
const NN50_THRESHOLD_MS: f64 = 50.0;

/// HRV statistics stage
pub struct MetricsCalculator;

impl MetricsCalculator {
    /// Compute time-domain statistics from millisecond RR intervals.
    pub fn compute(rr_intervals_ms: &[f64]) -> HrvMetrics {
        if rr_intervals_ms.len() < 2 {
            return HrvMetrics::undefined();
        }

        let mean_rr = mean(rr_intervals_ms);
        let sdnn = std_dev(rr_intervals_ms);

        let diffs: Vec<f64> = rr_intervals_ms
            .windows(2)
            .map(|pair| pair[1] - pair[0])
            .collect();
        let rmssd = (diffs.iter().map(|d| d * d).sum::<f64>() / diffs.len() as f64).sqrt();
        let pnn50 = if diffs.is_empty() {
            0.0
        } else {
            let nn50 = diffs.iter().filter(|d| d.abs() > NN50_THRESHOLD_MS).count();
            100.0 * nn50 as f64 / diffs.len() as f64
        };

        let mean_hr = if mean_rr > 0.0 {
            Some(60_000.0 / mean_rr)
        } else {
            None
        };

        HrvMetrics {
            mean_rr_ms: Some(mean_rr),
            sdnn_ms: Some(sdnn),
            rmssd_ms: Some(rmssd),
            pnn50_pct: Some(pnn50),
            mean_hr_bpm: mean_hr,
        }
    }
}

fn mean(data: &[f64]) -> f64 {
    data.iter().sum::<f64>() / data.len() as f64
}

/// Population standard deviation
fn std_dev(data: &[f64]) -> f64 {
    let m = mean(data);
    (data.iter().map(|x| (x - m).powi(2)).sum::<f64>() / data.len() as f64).sqrt()
}
