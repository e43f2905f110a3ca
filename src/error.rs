//! Error types for the HRV pipeline

use thiserror::Error;

/// Fatal preconditions that abort an analysis run before a result exists.
///
/// Recoverable conditions (invalid filter corners, flat signal, fewer than
/// two peaks) never surface here; they are absorbed at the stage boundary and
/// reported as [`Diagnostic`](crate::types::Diagnostic) entries in the result.
#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("recording too short to filter: {len} samples, need at least {required}")]
    InsufficientData { len: usize, required: usize },

    #[error("invalid sampling rate: {0} Hz (must be positive)")]
    InvalidSamplingRate(f64),
}
