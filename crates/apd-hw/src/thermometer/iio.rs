//! DHT11/DHT22 thermometer via the Linux industrial I/O subsystem.
//!
//! The kernel `dht11` driver (which also handles the DHT22/AM2302) exposes
//! each sensor as `/sys/bus/iio/devices/iio:deviceN` with the temperature in
//! milli-degrees Celsius in `in_temp_input`. A read blocks for the bus
//! transaction and fails with `EIO`/`ETIMEDOUT` when the sensor misses its
//! timing window, which is common for this sensor class.

use super::{Thermometer, ThermometerProvider};
use crate::{Error, Pin, Result, IIO_DEVICES_ROOT};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Name prefix the kernel driver registers its IIO devices under.
const DRIVER_NAME: &str = "dht11";

/// Attribute holding the temperature in milli-degrees Celsius.
const TEMP_INPUT: &str = "in_temp_input";

/// Provider backed by the kernel `dht11` IIO driver.
#[derive(Debug, Clone)]
pub struct IioProvider {
    root: PathBuf,
    device: Option<PathBuf>,
}

impl IioProvider {
    /// Creates a provider that discovers the device for the requested pin.
    pub fn auto() -> Self {
        Self {
            root: PathBuf::from(IIO_DEVICES_ROOT),
            device: None,
        }
    }

    /// Creates a provider bound to an explicit IIO device directory.
    pub fn with_device<P: Into<PathBuf>>(device: P) -> Self {
        Self {
            root: PathBuf::from(IIO_DEVICES_ROOT),
            device: Some(device.into()),
        }
    }

    /// Creates a provider that discovers devices below `root` instead of sysfs.
    pub fn with_root<P: Into<PathBuf>>(root: P) -> Self {
        Self {
            root: root.into(),
            device: None,
        }
    }

    /// Finds the IIO device registered for `pin`.
    fn discover(&self, pin: Pin) -> Result<PathBuf> {
        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) if e.kind() == ErrorKind::NotFound => {
                return Err(Error::DriverUnavailable(format!(
                    "{} does not exist",
                    self.root.display()
                )));
            }
            Err(e) => return Err(Error::Io(e)),
        };

        let mut devices: Vec<PathBuf> = entries
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| is_device_dir(path))
            .collect();
        devices.sort();

        for device in devices {
            let Ok(name) = fs::read_to_string(device.join("name")) else {
                continue;
            };
            if matches_pin(name.trim(), pin) {
                debug!("Found {} for pin {} at {}", name.trim(), pin, device.display());
                return Ok(device);
            }
        }

        Err(Error::DriverUnavailable(format!(
            "no {} device for pin {} under {}",
            DRIVER_NAME,
            pin,
            self.root.display()
        )))
    }
}

impl Default for IioProvider {
    fn default() -> Self {
        Self::auto()
    }
}

impl ThermometerProvider for IioProvider {
    fn acquire(&self, pin: Pin) -> Result<Box<dyn Thermometer>> {
        if !cfg!(target_os = "linux") {
            return Err(Error::Unsupported);
        }

        let device = match &self.device {
            Some(device) => device.clone(),
            None => self.discover(pin)?,
        };

        let input = device.join(TEMP_INPUT);
        if !input.exists() {
            return Err(Error::DriverUnavailable(format!(
                "{} is missing",
                input.display()
            )));
        }

        Ok(Box::new(IioThermometer { input }))
    }
}

/// Open handle on one `in_temp_input` attribute.
struct IioThermometer {
    input: PathBuf,
}

impl Thermometer for IioThermometer {
    fn temperature(&mut self) -> Result<f64> {
        let raw = fs::read_to_string(&self.input).map_err(|source| Error::Read {
            device: self.input.display().to_string(),
            source,
        })?;
        parse_millidegrees(&raw)
    }
}

/// Returns true if an IIO device name belongs to the driver and `pin`.
///
/// Device-tree instances are named `dht11@<gpio>` with the unit address in
/// hex; a bare `dht11` carries no pin and is accepted for any pin.
fn matches_pin(name: &str, pin: Pin) -> bool {
    let Some(rest) = name.strip_prefix(DRIVER_NAME) else {
        return false;
    };
    match rest.strip_prefix('@') {
        Some(unit) => u8::from_str_radix(unit, 16).ok() == Some(pin.gpio()),
        None => rest.is_empty(),
    }
}

/// Parses a sysfs milli-degree reading into degrees Celsius.
fn parse_millidegrees(raw: &str) -> Result<f64> {
    raw.trim()
        .parse::<i64>()
        .map(|milli| milli as f64 / 1000.0)
        .map_err(|_| Error::Parse(raw.trim().to_string()))
}

/// Returns true if `path` looks like an IIO device directory.
fn is_device_dir(path: &Path) -> bool {
    path.file_name()
        .and_then(|n| n.to_str())
        .map(|n| n.starts_with("iio:device"))
        .unwrap_or(false)
}
