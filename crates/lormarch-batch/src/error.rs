//! Error types for batch tracing.

use lormarch_kernel::KernelError;
use thiserror::Error;

/// Errors that can occur while building a tracer or submitting a batch.
///
/// Batch validation errors are raised before any per-ray work starts;
/// a batch either fully validates and computes or fails with no partial
/// results.
#[derive(Error, Debug)]
pub enum TraceError {
    /// Input arrays disagree on the number of rays.
    #[error("array length mismatch: {name} has {got} rows, expected {expected}")]
    LengthMismatch {
        /// Name of the offending array.
        name: &'static str,
        /// Row count of the reference array (`points`).
        expected: usize,
        /// Row count actually supplied.
        got: usize,
    },

    /// The batch size differs from the length this tracer was pinned to.
    #[error("batch has {got} rays but tracer is configured for {expected}")]
    BatchLength {
        /// Pinned batch length.
        expected: usize,
        /// Number of rays submitted.
        got: usize,
    },

    /// A line of response with coincident endpoints cannot be sampled.
    #[error("degenerate line of response: start and end coincide")]
    DegenerateLor,

    /// Invalid kernel configuration.
    #[error("kernel configuration: {0}")]
    Kernel(#[from] KernelError),

    /// Reading or writing a tracer artifact failed.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// A tracer artifact could not be encoded or decoded.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type for batch operations.
pub type Result<T> = std::result::Result<T, TraceError>;
