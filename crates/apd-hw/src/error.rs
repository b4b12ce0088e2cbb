//! Error types for the APD hardware library.

use thiserror::Error;

/// Result type alias using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors that can occur when interacting with the hardware.
#[derive(Error, Debug)]
pub enum Error {
    /// No driver for the requested sensor is present on this host.
    #[error("Sensor driver unavailable: {0}")]
    DriverUnavailable(String),

    /// The driver exists but the platform cannot perform the operation.
    #[error("Operation not supported on this platform")]
    Unsupported,

    /// Invalid pin name.
    #[error("Invalid pin: {0}")]
    InvalidPin(String),

    /// The sensor did not answer a read (timing or checksum failure).
    #[error("Sensor read failed on {device}: {source}")]
    Read {
        device: String,
        #[source]
        source: std::io::Error,
    },

    /// Sysfs I/O error outside of a sensor read.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The driver returned a value that could not be parsed.
    #[error("Unparsable reading: {0:?}")]
    Parse(String),
}
