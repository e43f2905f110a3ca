//! Run configuration
//!
//! Configuration is an explicit immutable value handed to every stage entry
//! point; no stage mutates it and nothing is read from ambient/global state.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Nominal sensor sampling rate (Hz)
pub const DEFAULT_SAMPLING_RATE_HZ: f64 = 250.0;
/// Band-pass corners and order tuned for surface ECG
pub const DEFAULT_LOW_CUT_HZ: f64 = 0.5;
pub const DEFAULT_HIGH_CUT_HZ: f64 = 40.0;
pub const DEFAULT_FILTER_ORDER: usize = 3;
/// Peak threshold is median + multiplier * std-dev of the filtered signal
pub const DEFAULT_PEAK_THRESHOLD_MULTIPLIER: f64 = 0.7;
/// Maximum plausible heart rate, bounding the minimum peak spacing
pub const DEFAULT_MAX_HR_BPM: f64 = 220.0;

/// Band-pass filter parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Low cut-off frequency (Hz)
    pub low_cut_hz: f64,
    /// High cut-off frequency (Hz); must stay below Nyquist
    pub high_cut_hz: f64,
    /// Butterworth filter order
    pub order: usize,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            low_cut_hz: DEFAULT_LOW_CUT_HZ,
            high_cut_hz: DEFAULT_HIGH_CUT_HZ,
            order: DEFAULT_FILTER_ORDER,
        }
    }
}

/// Output path templates for the reporting collaborator.
///
/// Templates contain a literal `{timestamp}` token, rendered per run.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OutputConfig {
    pub report_path_template: String,
    pub plot_dir_template: String,
    /// `chrono` format string used to render `{timestamp}`
    pub timestamp_format: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            report_path_template: "results/hrv_report_{timestamp}.txt".to_string(),
            plot_dir_template: "results/ecg_plots_{timestamp}".to_string(),
            timestamp_format: "%Y%m%d_%H%M%S".to_string(),
        }
    }
}

impl OutputConfig {
    pub fn report_path(&self, at: DateTime<Utc>) -> String {
        self.render(&self.report_path_template, at)
    }

    pub fn plot_dir(&self, at: DateTime<Utc>) -> String {
        self.render(&self.plot_dir_template, at)
    }

    fn render(&self, template: &str, at: DateTime<Utc>) -> String {
        let stamp = at.format(&self.timestamp_format).to_string();
        template.replace("{timestamp}", &stamp)
    }
}

/// Complete configuration for one analysis run, read-only for its duration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub sampling_rate_hz: f64,
    pub filter: FilterConfig,
    pub peak_threshold_multiplier: f64,
    pub max_hr_bpm: f64,
    pub output: OutputConfig,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            sampling_rate_hz: DEFAULT_SAMPLING_RATE_HZ,
            filter: FilterConfig::default(),
            peak_threshold_multiplier: DEFAULT_PEAK_THRESHOLD_MULTIPLIER,
            max_hr_bpm: DEFAULT_MAX_HR_BPM,
            output: OutputConfig::default(),
        }
    }
}

impl PipelineConfig {
    /// Load configuration from JSON; absent fields fall back to defaults
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Serialize configuration to JSON
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Half the sampling rate; the upper bound for any valid cut-off
    pub fn nyquist_hz(&self) -> f64 {
        0.5 * self.sampling_rate_hz
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_values() {
        let config = PipelineConfig::default();
        assert_eq!(config.sampling_rate_hz, 250.0);
        assert_eq!(config.filter.low_cut_hz, 0.5);
        assert_eq!(config.filter.high_cut_hz, 40.0);
        assert_eq!(config.filter.order, 3);
        assert_eq!(config.peak_threshold_multiplier, 0.7);
        assert_eq!(config.max_hr_bpm, 220.0);
        assert_eq!(config.nyquist_hz(), 125.0);
    }

    #[test]
    fn test_output_templates_render_timestamp() {
        let config = PipelineConfig::default();
        let at = Utc.with_ymd_and_hms(2024, 3, 7, 14, 30, 5).unwrap();
        assert_eq!(
            config.output.report_path(at),
            "results/hrv_report_20240307_143005.txt"
        );
        assert_eq!(
            config.output.plot_dir(at),
            "results/ecg_plots_20240307_143005"
        );
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = PipelineConfig::default();
        config.sampling_rate_hz = 500.0;
        config.filter.order = 4;
        let json = config.to_json().unwrap();
        let restored = PipelineConfig::from_json(&json).unwrap();
        assert_eq!(restored, config);
    }

    #[test]
    fn test_partial_json_falls_back_to_defaults() {
        let config = PipelineConfig::from_json(r#"{"sampling_rate_hz": 360.0}"#).unwrap();
        assert_eq!(config.sampling_rate_hz, 360.0);
        assert_eq!(config.filter.order, DEFAULT_FILTER_ORDER);
        assert_eq!(config.max_hr_bpm, DEFAULT_MAX_HR_BPM);
    }
}
