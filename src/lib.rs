//! Cardioflux - offline HRV analysis engine for captured ECG recordings
//!
//! Cardioflux turns one complete, already-captured biosignal buffer into
//! heart-rate-variability statistics through a deterministic pipeline:
//! zero-phase band-pass filtering → adaptive beat peak detection → RR
//! interval derivation → time-domain metric computation.
//!
//! The pipeline is batch-oriented and pure: no I/O, no shared state, one
//! immutable configuration per run. Acquisition (reading the sensor) and
//! reporting (rendering text or charts) are external collaborators; the
//! `cli` feature ships a thin file-based host for both.

pub mod config;
pub mod error;
pub mod filter;
pub mod intervals;
pub mod metrics;
pub mod peaks;
pub mod pipeline;
pub mod types;

pub use config::{FilterConfig, OutputConfig, PipelineConfig};
pub use error::PipelineError;
pub use filter::SignalFilter;
pub use intervals::IntervalCalculator;
pub use metrics::MetricsCalculator;
pub use peaks::PeakDetector;
pub use pipeline::{analyze_recording, HrvPipeline};
pub use types::{
    AnalysisResult, Diagnostic, DiagnosticCode, EngineInfo, HrvMetrics, RecordingSummary,
    SamplePoint, SampleSeries, Stage,
};

/// Engine version embedded in every result
pub const ENGINE_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Producer name embedded in every result
pub const PRODUCER_NAME: &str = "cardioflux";
