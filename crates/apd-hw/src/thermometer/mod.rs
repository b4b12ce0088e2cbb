//! Ambient thermometer drivers.
//!
//! A [`ThermometerProvider`] is probed on every read: it either hands out a
//! fresh [`Thermometer`] handle for the requested pin or explains why the
//! hardware is not usable on this host.

mod iio;

pub use iio::IioProvider;

use crate::{Error, Pin, Result};

/// An open handle to a thermometer.
pub trait Thermometer {
    /// Reads the current temperature in degrees Celsius.
    fn temperature(&mut self) -> Result<f64>;
}

/// Capability to acquire a thermometer handle at call time.
pub trait ThermometerProvider: Send + Sync {
    /// Tries to open the thermometer wired to `pin`.
    fn acquire(&self, pin: Pin) -> Result<Box<dyn Thermometer>>;
}

/// Provider for hosts that have no thermometer driver at all.
#[derive(Debug, Clone, Copy, Default)]
pub struct Absent;

impl ThermometerProvider for Absent {
    fn acquire(&self, pin: Pin) -> Result<Box<dyn Thermometer>> {
        Err(Error::DriverUnavailable(format!(
            "no thermometer driver for pin {}",
            pin
        )))
    }
}
