//! Pipeline orchestration
//!
//! This module provides the public API for analysing a captured recording.
//! It sequences filtering, peak detection, interval derivation, and metric
//! computation under the guard conditions that decide whether a run aborts,
//! degrades, or completes.

use chrono::Utc;
use log::{debug, warn};

use crate::config::PipelineConfig;
use crate::error::PipelineError;
use crate::filter::SignalFilter;
use crate::intervals::IntervalCalculator;
use crate::metrics::MetricsCalculator;
use crate::peaks::PeakDetector;
use crate::types::{AnalysisResult, Diagnostic, DiagnosticCode, EngineInfo, SampleSeries, Stage};

/// Analyse one captured recording with the given configuration.
///
/// Convenience wrapper over [`HrvPipeline`] for one-shot use.
///
/// # Example
/// ```ignore
/// let config = PipelineConfig::default();
/// let result = analyze_recording(&series, &config)?;
/// println!("mean HR: {:?}", result.metrics.mean_hr_bpm);
/// ```
pub fn analyze_recording(
    series: &SampleSeries,
    config: &PipelineConfig,
) -> Result<AnalysisResult, PipelineError> {
    HrvPipeline::new(config.clone()).process(series)
}

/// Configured analysis pipeline.
///
/// Holds only the immutable run configuration; `process` is a pure
/// transformation of its input, so one pipeline may serve any number of
/// recordings, concurrently if the host wishes.
#[derive(Debug, Clone)]
pub struct HrvPipeline {
    config: PipelineConfig,
}

impl Default for HrvPipeline {
    fn default() -> Self {
        Self::new(PipelineConfig::default())
    }
}

impl HrvPipeline {
    pub fn new(config: PipelineConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// Run the full pipeline over one recording.
    ///
    /// Fatal preconditions (empty or too-short buffer, non-positive sampling
    /// rate) abort before any stage runs. Everything else degrades: the
    /// result always carries all four pipeline fields, with empty vectors
    /// and undefined metrics where the data could not support more, plus the
    /// diagnostics explaining why.
    pub fn process(&self, series: &SampleSeries) -> Result<AnalysisResult, PipelineError> {
        let config = &self.config;

        if config.sampling_rate_hz <= 0.0 {
            return Err(PipelineError::InvalidSamplingRate(config.sampling_rate_hz));
        }

        let samples = series.amplitudes();
        let required = (config.filter.order * 3).max(1);
        if samples.len() < required {
            warn!(
                "aborting: {} samples, filter order {} needs {}",
                samples.len(),
                config.filter.order,
                required
            );
            return Err(PipelineError::InsufficientData {
                len: samples.len(),
                required,
            });
        }

        let mut diagnostics = Vec::new();
        if (samples.len() as f64) < config.sampling_rate_hz * 2.0 {
            diagnostics.push(Diagnostic::new(
                Stage::Orchestrator,
                DiagnosticCode::ShortRecording,
                format!(
                    "recording is only {:.2}s at the nominal rate, results may be unreliable",
                    samples.len() as f64 / config.sampling_rate_hz
                ),
            ));
        }

        debug!(
            "processing {} samples at nominal {} Hz",
            samples.len(),
            config.sampling_rate_hz
        );

        let filtered = SignalFilter::apply(&samples, config, &mut diagnostics);
        let peaks = PeakDetector::detect(&filtered, config, &mut diagnostics)?;

        if peaks.len() < 2 {
            diagnostics.push(Diagnostic::new(
                Stage::PeakDetection,
                DiagnosticCode::UndersampledRhythm,
                format!(
                    "{} peak(s) detected, need at least 2 for interval analysis",
                    peaks.len()
                ),
            ));
        }

        // Downstream stages always run, even on an empty peak set, so the
        // result shape is uniform across success and degraded paths.
        let rr_intervals_ms = IntervalCalculator::derive(&peaks, config);
        let metrics = MetricsCalculator::compute(&rr_intervals_ms);

        Ok(AnalysisResult {
            producer: EngineInfo::current(),
            computed_at: Utc::now(),
            recording: series.summary(),
            filtered,
            peaks,
            rr_intervals_ms,
            metrics,
            diagnostics,
        })
    }
}
