//! Board pin naming.
//!
//! Pins are named the way the board silkscreen and most Raspberry Pi
//! libraries name them (`D4`), which maps one-to-one onto the BCM GPIO
//! number the kernel uses.

use crate::{Error, Result, MAX_GPIO};
use std::str::FromStr;

/// A digital GPIO pin, identified by its BCM number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Pin(u8);

impl Pin {
    /// Data pin the ambient thermometer is wired to by default.
    pub const D4: Pin = Pin(4);

    /// Creates a pin from its BCM GPIO number.
    pub fn new(gpio: u8) -> Result<Self> {
        if gpio > MAX_GPIO {
            return Err(Error::InvalidPin(gpio.to_string()));
        }
        Ok(Pin(gpio))
    }

    /// Returns the BCM GPIO number.
    pub fn gpio(&self) -> u8 {
        self.0
    }
}

impl Default for Pin {
    fn default() -> Self {
        Pin::D4
    }
}

impl FromStr for Pin {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let lower = s.trim().to_lowercase();
        let digits = lower
            .strip_prefix("gpio")
            .or_else(|| lower.strip_prefix('d'))
            .unwrap_or(&lower);

        let gpio: u8 = digits
            .parse()
            .map_err(|_| Error::InvalidPin(s.to_string()))?;
        Pin::new(gpio).map_err(|_| Error::InvalidPin(s.to_string()))
    }
}

impl std::fmt::Display for Pin {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "D{}", self.0)
    }
}
