//! Core types for the HRV analysis pipeline
//!
//! This module defines the data that flows through each stage of the
//! pipeline: the captured sample series, detected peaks, RR intervals,
//! time-domain metrics, and the result envelope returned to callers.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{ENGINE_VERSION, PRODUCER_NAME};

/// One captured sample: elapsed time since capture start and raw amplitude.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SamplePoint {
    /// Seconds since the start of the recording (non-decreasing)
    pub elapsed_secs: f64,
    /// Raw sensor amplitude (arbitrary ADC units)
    pub amplitude: f64,
}

/// A complete captured recording, as handed over by the acquisition stage.
///
/// Timestamps are carried for provenance only. All time-domain computation
/// uses the nominal configured sampling rate, not the observed inter-sample
/// spacing; jitter in `elapsed_secs` is neither validated nor resampled.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SampleSeries {
    samples: Vec<SamplePoint>,
}

impl SampleSeries {
    /// Create a series from already-paired samples.
    ///
    /// Expects `elapsed_secs` to be non-decreasing; the series is stored
    /// as given.
    pub fn new(samples: Vec<SamplePoint>) -> Self {
        Self { samples }
    }

    /// Create a series from bare amplitudes, synthesizing elapsed times from
    /// the nominal sampling rate.
    pub fn from_amplitudes(amplitudes: &[f64], sampling_rate_hz: f64) -> Self {
        let samples = amplitudes
            .iter()
            .enumerate()
            .map(|(i, &amplitude)| SamplePoint {
                elapsed_secs: if sampling_rate_hz > 0.0 {
                    i as f64 / sampling_rate_hz
                } else {
                    0.0
                },
                amplitude,
            })
            .collect();
        Self { samples }
    }

    pub fn samples(&self) -> &[SamplePoint] {
        &self.samples
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    /// Amplitudes in capture order, detached from their timestamps.
    pub fn amplitudes(&self) -> Vec<f64> {
        self.samples.iter().map(|s| s.amplitude).collect()
    }

    /// Captured duration in seconds, from the first to the last timestamp.
    pub fn duration_secs(&self) -> f64 {
        match (self.samples.first(), self.samples.last()) {
            (Some(first), Some(last)) => (last.elapsed_secs - first.elapsed_secs).max(0.0),
            _ => 0.0,
        }
    }

    /// Provenance summary of the capture, including the rate actually
    /// observed on the wire (informational; never used for computation).
    pub fn summary(&self) -> RecordingSummary {
        let duration_secs = self.duration_secs();
        let effective_rate_hz = if duration_secs > 0.0 {
            Some(self.samples.len() as f64 / duration_secs)
        } else {
            None
        };
        RecordingSummary {
            sample_count: self.samples.len(),
            duration_secs,
            effective_rate_hz,
        }
    }
}

/// Capture provenance carried in the result envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecordingSummary {
    pub sample_count: usize,
    /// Duration spanned by the sample timestamps (seconds)
    pub duration_secs: f64,
    /// Measured rate from the timestamps; `None` for zero-duration captures
    pub effective_rate_hz: Option<f64>,
}

/// Pipeline stage that raised a diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Orchestrator,
    Filter,
    PeakDetection,
    Intervals,
    Metrics,
}

/// Machine-readable code for a recoverable condition
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticCode {
    /// Filter corners outside (0, Nyquist) or crossed; data passed through
    InvalidFilterSpec,
    /// Recording shorter than two nominal seconds; results may be unreliable
    ShortRecording,
    /// Filtered signal has negligible dynamic range; no peaks detectable
    FlatSignal,
    /// Fewer than two peaks found; metrics resolve to undefined
    UndersampledRhythm,
}

/// A recoverable condition surfaced alongside the result.
///
/// Diagnostics replace printed warnings: the pipeline never writes to any
/// output channel, and the caller decides how to present these.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub stage: Stage,
    pub code: DiagnosticCode,
    pub message: String,
}

impl Diagnostic {
    pub fn new(stage: Stage, code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            stage,
            code,
            message: message.into(),
        }
    }
}

/// Time-domain HRV statistics.
///
/// Every field is `None` when the RR series has fewer than two elements.
/// `None` models "undefined" explicitly; NaN never appears in a result.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct HrvMetrics {
    /// Mean RR interval (ms)
    pub mean_rr_ms: Option<f64>,
    /// Population standard deviation of RR intervals (ms)
    pub sdnn_ms: Option<f64>,
    /// Root mean square of successive RR differences (ms)
    pub rmssd_ms: Option<f64>,
    /// Percentage of successive differences exceeding 50 ms
    pub pnn50_pct: Option<f64>,
    /// Mean heart rate (bpm), derived from the mean RR interval
    pub mean_hr_bpm: Option<f64>,
}

impl HrvMetrics {
    /// All five statistics undefined
    pub fn undefined() -> Self {
        Self::default()
    }

    /// True when every statistic carries a value
    pub fn is_defined(&self) -> bool {
        self.mean_rr_ms.is_some()
            && self.sdnn_ms.is_some()
            && self.rmssd_ms.is_some()
            && self.pnn50_pct.is_some()
            && self.mean_hr_bpm.is_some()
    }
}

/// Engine identification embedded in every result
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineInfo {
    pub name: String,
    pub version: String,
    pub run_id: String,
}

impl EngineInfo {
    /// Identification for the current engine build with a fresh run id
    pub fn current() -> Self {
        Self {
            name: PRODUCER_NAME.to_string(),
            version: ENGINE_VERSION.to_string(),
            run_id: Uuid::new_v4().to_string(),
        }
    }
}

/// Complete result of one analysis run.
///
/// The four pipeline fields are always present: on degraded runs the vectors
/// may be empty and the metrics undefined, but the shape never changes. The
/// reporting collaborator renders `None` metrics as a placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub producer: EngineInfo,
    pub computed_at: DateTime<Utc>,
    pub recording: RecordingSummary,
    /// Band-limited signal, same length as the input, zero time shift
    pub filtered: Vec<f64>,
    /// Sample indices of detected beat peaks, strictly ascending
    pub peaks: Vec<usize>,
    /// Inter-beat intervals in milliseconds, `max(peaks - 1, 0)` entries
    pub rr_intervals_ms: Vec<f64>,
    pub metrics: HrvMetrics,
    pub diagnostics: Vec<Diagnostic>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_amplitudes_synthesizes_timestamps() {
        let series = SampleSeries::from_amplitudes(&[0.0, 1.0, 2.0, 3.0], 250.0);
        assert_eq!(series.len(), 4);
        assert!((series.samples()[3].elapsed_secs - 0.012).abs() < 1e-12);
        assert_eq!(series.samples()[3].amplitude, 3.0);
    }

    #[test]
    fn test_summary_effective_rate() {
        // 500 samples over 2 seconds -> 250 Hz observed
        let amplitudes = vec![0.0; 500];
        let series = SampleSeries::from_amplitudes(&amplitudes, 250.0);
        let summary = series.summary();
        assert_eq!(summary.sample_count, 500);
        let rate = summary.effective_rate_hz.unwrap();
        assert!((rate - 500.0 / (499.0 / 250.0)).abs() < 1e-9);
    }

    #[test]
    fn test_summary_empty_series() {
        let series = SampleSeries::default();
        let summary = series.summary();
        assert_eq!(summary.sample_count, 0);
        assert_eq!(summary.duration_secs, 0.0);
        assert!(summary.effective_rate_hz.is_none());
    }

    #[test]
    fn test_metrics_undefined() {
        let metrics = HrvMetrics::undefined();
        assert!(!metrics.is_defined());
        assert!(metrics.mean_rr_ms.is_none());
        assert!(metrics.mean_hr_bpm.is_none());
    }

    #[test]
    fn test_diagnostic_serializes_snake_case() {
        let diag = Diagnostic::new(
            Stage::Filter,
            DiagnosticCode::InvalidFilterSpec,
            "corners crossed",
        );
        let json = serde_json::to_string(&diag).unwrap();
        assert!(json.contains("\"invalid_filter_spec\""));
        assert!(json.contains("\"filter\""));
    }
}
