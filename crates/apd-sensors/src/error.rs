//! Error types for sensors whose faults reach the caller.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised by OS facilities behind a sensor read.
#[derive(Error, Debug)]
pub enum Error {
    /// The local hostname could not be read.
    #[error("Failed to read hostname: {0}")]
    Hostname(#[source] std::io::Error),

    /// Hostname resolution failed.
    #[error("Failed to resolve {host}: {source}")]
    Resolve {
        host: String,
        #[source]
        source: std::io::Error,
    },

    /// CPU usage sampling is not available on this platform.
    #[error("CPU sampling is not supported on this platform")]
    CpuUnsupported,

    /// The OS reported no CPUs to sample.
    #[error("No CPUs reported by the system")]
    NoCpus,
}
