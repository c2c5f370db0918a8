//! Error types for the kernel.

use thiserror::Error;

/// Errors raised while configuring the kernel.
///
/// All of these are rejected synchronously, before any per-ray
/// computation runs.
#[derive(Error, Debug)]
pub enum KernelError {
    /// A voxel size component is zero, negative, or not finite.
    #[error("invalid voxel size: {0}")]
    InvalidVoxelSize(String),

    /// March settings out of range.
    #[error("invalid march settings: {0}")]
    InvalidSettings(String),
}

/// Result type for kernel operations.
pub type Result<T> = std::result::Result<T, KernelError>;
