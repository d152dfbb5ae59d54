//! Error types for the Galaxy3D device layer
//!
//! Resource and capability problems are reported through [`Error`].
//! Contract violations by the caller (unbalanced passes, draws outside a
//! render pass) are not errors: they panic at the call site.

use std::fmt;

/// Result type for Galaxy3D device operations
pub type Result<T> = std::result::Result<T, Error>;

/// Galaxy3D device errors
#[derive(Debug, Clone, PartialEq)]
pub enum Error {
    /// Backend-specific error (GL, WebGPU, etc.)
    BackendError(String),

    /// Out of GPU memory
    OutOfMemory,

    /// Invalid resource (texture, buffer, render target, shader)
    InvalidResource(String),

    /// Initialization failed (device, backend)
    InitializationFailed(String),

    /// The device cannot provide a requested feature or format.
    /// Non-fatal: the caller picks a fallback.
    UnsupportedFeature(String),

    /// The hardware context is gone. Reported by backends only; the device
    /// absorbs it by switching to the lost state.
    ContextLost,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::BackendError(msg) => write!(f, "Backend error: {}", msg),
            Error::OutOfMemory => write!(f, "Out of GPU memory"),
            Error::InvalidResource(msg) => write!(f, "Invalid resource: {}", msg),
            Error::InitializationFailed(msg) => write!(f, "Initialization failed: {}", msg),
            Error::UnsupportedFeature(msg) => write!(f, "Unsupported feature: {}", msg),
            Error::ContextLost => write!(f, "Graphics context lost"),
        }
    }
}

impl std::error::Error for Error {}

#[cfg(test)]
#[path = "error_tests.rs"]
mod tests;
