//! APD Sensors
//!
//! Small polled sensors that each read one value (ambient temperature, host
//! addresses, runtime version, CPU load) and render it as display text.
//! Reading and formatting are separate operations so callers can keep the
//! raw value; [`Sensor::describe`] does both.

pub mod cpu;
pub mod error;
pub mod network;
pub mod runtime;
pub mod sensor;
pub mod temperature;

pub use cpu::CpuLoad;
pub use error::{Error, Result};
pub use network::{AddressFamily, HostAddress, HostResolver, IpAddresses, SystemResolver};
pub use runtime::{RuntimeVersion, Version};
pub use sensor::{Probe, Readout, Sensor};
pub use temperature::Temperature;

/// Text rendered for a reading that could not be obtained.
pub const UNKNOWN: &str = "Unknown";
