//! Ambient temperature sensor.

use crate::sensor::Sensor;
use crate::{Result, UNKNOWN};
use apd_hw::{Absent, IioProvider, Pin, ThermometerProvider};
use tracing::debug;

/// Ambient temperature from an optional DHT-class thermometer.
///
/// Reads `None` whenever the thermometer cannot be used: driver missing,
/// platform unsupported, or a failed bus transaction.
pub struct Temperature {
    provider: Box<dyn ThermometerProvider>,
    pin: Pin,
}

impl Temperature {
    /// Display name.
    pub const TITLE: &'static str = "Ambient Temperature";

    /// Creates a temperature sensor reading through `provider` on `pin`.
    pub fn new(provider: Box<dyn ThermometerProvider>, pin: Pin) -> Self {
        Self { provider, pin }
    }

    /// Creates a temperature sensor for a host without a thermometer.
    pub fn absent() -> Self {
        Self::new(Box::new(Absent), Pin::default())
    }

    /// Returns the pin the thermometer is read from.
    pub fn pin(&self) -> Pin {
        self.pin
    }

    /// Converts degrees Celsius to degrees Fahrenheit.
    pub fn celsius_to_fahrenheit(value: f64) -> f64 {
        value * 9.0 / 5.0 + 32.0
    }

    fn read_celsius(&self) -> apd_hw::Result<f64> {
        // A fresh handle per read so an interrupted transaction cannot leak
        // into the next one.
        let mut thermometer = self.provider.acquire(self.pin)?;
        thermometer.temperature()
    }
}

impl Default for Temperature {
    fn default() -> Self {
        Self::new(Box::new(IioProvider::auto()), Pin::default())
    }
}

impl Sensor for Temperature {
    type Value = Option<f64>;

    fn title(&self) -> &str {
        Self::TITLE
    }

    fn value(&self) -> Result<Option<f64>> {
        match self.read_celsius() {
            Ok(celsius) => Ok(Some(celsius)),
            Err(e) => {
                debug!("Temperature on {} unavailable: {}", self.pin, e);
                Ok(None)
            }
        }
    }

    fn format(&self, value: &Option<f64>) -> String {
        match value {
            None => UNKNOWN.to_string(),
            Some(celsius) => format!(
                "{:.1}C ({:.1}F)",
                celsius,
                Self::celsius_to_fahrenheit(*celsius)
            ),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use apd_hw::{Error as HwError, Thermometer};
    use std::io;
    use std::sync::atomic::{AtomicU32, Ordering};
    use std::sync::Arc;

    struct Fixed(f64);

    impl Thermometer for Fixed {
        fn temperature(&mut self) -> apd_hw::Result<f64> {
            Ok(self.0)
        }
    }

    struct TimingFault;

    impl Thermometer for TimingFault {
        fn temperature(&mut self) -> apd_hw::Result<f64> {
            Err(HwError::Read {
                device: "dht22".to_string(),
                source: io::Error::new(io::ErrorKind::TimedOut, "no response"),
            })
        }
    }

    /// Provider that hands out a new handle per acquire and counts them.
    struct Stub {
        celsius: Option<f64>,
        acquired: Arc<AtomicU32>,
    }

    impl ThermometerProvider for Stub {
        fn acquire(&self, _pin: Pin) -> apd_hw::Result<Box<dyn Thermometer>> {
            self.acquired.fetch_add(1, Ordering::SeqCst);
            match self.celsius {
                Some(c) => Ok(Box::new(Fixed(c))),
                None => Ok(Box::new(TimingFault)),
            }
        }
    }

    struct Unsupported;

    impl ThermometerProvider for Unsupported {
        fn acquire(&self, _pin: Pin) -> apd_hw::Result<Box<dyn Thermometer>> {
            Err(HwError::Unsupported)
        }
    }

    /// Provider whose acquire always fails with the error built by `make`.
    struct FailingAcquire(fn() -> HwError);

    impl ThermometerProvider for FailingAcquire {
        fn acquire(&self, _pin: Pin) -> apd_hw::Result<Box<dyn Thermometer>> {
            Err((self.0)())
        }
    }

    struct Garbled;

    impl Thermometer for Garbled {
        fn temperature(&mut self) -> apd_hw::Result<f64> {
            Err(HwError::Parse("-- --".to_string()))
        }
    }

    struct GarbledProvider;

    impl ThermometerProvider for GarbledProvider {
        fn acquire(&self, _pin: Pin) -> apd_hw::Result<Box<dyn Thermometer>> {
            Ok(Box::new(Garbled))
        }
    }

    fn stub(celsius: Option<f64>) -> (Temperature, Arc<AtomicU32>) {
        let acquired = Arc::new(AtomicU32::new(0));
        let provider = Stub {
            celsius,
            acquired: acquired.clone(),
        };
        (Temperature::new(Box::new(provider), Pin::D4), acquired)
    }

    #[test]
    fn test_celsius_to_fahrenheit() {
        assert_eq!(Temperature::celsius_to_fahrenheit(100.0), 212.0);
        assert_eq!(Temperature::celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(Temperature::celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn test_format() {
        let sensor = Temperature::absent();
        assert_eq!(sensor.format(&Some(20.0)), "20.0C (68.0F)");
        assert_eq!(sensor.format(&Some(0.0)), "0.0C (32.0F)");
        assert_eq!(sensor.format(&Some(21.5)), "21.5C (70.7F)");
        assert_eq!(sensor.format(&None), "Unknown");
    }

    #[test]
    fn test_format_is_idempotent() {
        let sensor = Temperature::absent();
        assert_eq!(sensor.format(&Some(23.4)), sensor.format(&Some(23.4)));
        assert_eq!(sensor.format(&None), sensor.format(&None));
    }

    #[test]
    fn test_missing_driver_reads_unknown() {
        let sensor = Temperature::absent();
        assert_eq!(sensor.value().unwrap(), None);
        assert_eq!(sensor.describe().unwrap(), "Unknown");
    }

    #[test]
    fn test_unsupported_platform_reads_unknown() {
        let sensor = Temperature::new(Box::new(Unsupported), Pin::D4);
        assert_eq!(sensor.value().unwrap(), None);
    }

    #[test]
    fn test_every_acquire_error_reads_unknown() {
        let errors: [fn() -> HwError; 5] = [
            || HwError::DriverUnavailable("no dht11 device".to_string()),
            || HwError::Unsupported,
            || HwError::InvalidPin("D99".to_string()),
            || HwError::Io(io::Error::new(io::ErrorKind::PermissionDenied, "sysfs")),
            || HwError::Parse("garbage".to_string()),
        ];

        for make in errors {
            let sensor = Temperature::new(Box::new(FailingAcquire(make)), Pin::D4);
            assert!(matches!(sensor.value(), Ok(None)), "{}", make());
            assert_eq!(sensor.describe().unwrap(), "Unknown");
        }
    }

    #[test]
    fn test_unparsable_reading_reads_unknown() {
        let sensor = Temperature::new(Box::new(GarbledProvider), Pin::D4);
        assert!(matches!(sensor.value(), Ok(None)));
    }

    #[test]
    fn test_read_fault_reads_unknown() {
        let (sensor, _) = stub(None);
        assert_eq!(sensor.value().unwrap(), None);
        assert_eq!(sensor.describe().unwrap(), "Unknown");
    }

    #[test]
    fn test_reading() {
        let (sensor, _) = stub(Some(20.0));
        assert_eq!(sensor.value().unwrap(), Some(20.0));
        assert_eq!(sensor.describe().unwrap(), "20.0C (68.0F)");
        assert_eq!(sensor.title(), "Ambient Temperature");
    }

    #[test]
    fn test_handle_per_read() {
        let (sensor, acquired) = stub(Some(20.0));
        sensor.value().unwrap();
        sensor.value().unwrap();
        assert_eq!(acquired.load(Ordering::SeqCst), 2);
    }
}
