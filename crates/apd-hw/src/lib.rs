//! APD Hardware Library
//!
//! Provides hardware abstraction for the optional sensor drivers used by the
//! APD sensors. Every driver is probed at call time: a host without the
//! hardware (or without the kernel driver) reports a typed error instead of
//! failing to start.

pub mod error;
pub mod pin;
pub mod thermometer;

pub use error::{Error, Result};
pub use pin::Pin;
pub use thermometer::{Absent, IioProvider, Thermometer, ThermometerProvider};

/// Highest BCM GPIO number exposed on the 40-pin header.
pub const MAX_GPIO: u8 = 27;

/// Root of the Linux industrial I/O device tree.
pub const IIO_DEVICES_ROOT: &str = "/sys/bus/iio/devices";
