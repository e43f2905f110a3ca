//! Band-limiting signal filter
//!
//! Applies a Butterworth band-pass filter forward and backward over the whole
//! capture buffer (zero-phase), so peak timing in the output lines up exactly
//! with the true waveform feature location. Invalid parameters degrade to a
//! pass-through with a diagnostic instead of failing the run.

use log::debug;
use sci_rs::signal::filter::design::{
    butter_dyn, DigitalFilter, FilterBandType, FilterOutputType, SosFormatFilter,
};
use sci_rs::signal::filter::sosfiltfilt_dyn;

use crate::config::PipelineConfig;
use crate::types::{Diagnostic, DiagnosticCode, Stage};

/// Zero-phase band-pass filter stage
pub struct SignalFilter;

impl SignalFilter {
    /// Band-limit the raw amplitude buffer.
    ///
    /// The output always has the same length as the input. When the corner
    /// frequencies violate `0 < low < high < Nyquist`, or the buffer is too
    /// short for forward-backward edge padding, the input is returned
    /// unchanged and a diagnostic is recorded.
    pub fn apply(
        data: &[f64],
        config: &PipelineConfig,
        diagnostics: &mut Vec<Diagnostic>,
    ) -> Vec<f64> {
        let nyquist = config.nyquist_hz();
        let low = config.filter.low_cut_hz / nyquist;
        let high = config.filter.high_cut_hz / nyquist;

        if low <= 0.0 || high >= 1.0 || low >= high {
            diagnostics.push(Diagnostic::new(
                Stage::Filter,
                DiagnosticCode::InvalidFilterSpec,
                format!(
                    "invalid band-pass corners: low={} Hz high={} Hz at {} Hz sampling; \
                     need 0 < low < high < {} Hz, passing signal through unfiltered",
                    config.filter.low_cut_hz,
                    config.filter.high_cut_hz,
                    config.sampling_rate_hz,
                    nyquist
                ),
            ));
            return data.to_vec();
        }

        // Forward-backward application needs edge padding proportional to
        // the filter order.
        if data.len() < config.filter.order * 3 {
            diagnostics.push(Diagnostic::new(
                Stage::Filter,
                DiagnosticCode::ShortRecording,
                format!(
                    "buffer of {} samples is too short for filter order {}, skipping filtering",
                    data.len(),
                    config.filter.order
                ),
            ));
            return data.to_vec();
        }

        let filter = butter_dyn(
            config.filter.order,
            vec![low, high],
            Some(FilterBandType::Bandpass),
            Some(false),
            Some(FilterOutputType::Sos),
            None,
        );
        let DigitalFilter::Sos(SosFormatFilter { sos }) = filter else {
            // butter_dyn honors the requested output type; treat anything
            // else like an invalid design and pass the data through.
            diagnostics.push(Diagnostic::new(
                Stage::Filter,
                DiagnosticCode::InvalidFilterSpec,
                "filter design did not produce second-order sections, passing signal through"
                    .to_string(),
            ));
            return data.to_vec();
        };

        debug!(
            "band-pass {}-{} Hz order {} over {} samples",
            config.filter.low_cut_hz,
            config.filter.high_cut_hz,
            config.filter.order,
            data.len()
        );
        sosfiltfilt_dyn(data.iter(), &sos)
    }
}
