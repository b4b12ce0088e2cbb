//! Sensor polling.
//!
//! Each cycle reads every enabled sensor on its own blocking task, so a
//! slow sensor (the CPU sample blocks for its interval, a DHT transaction
//! can take a couple of seconds) does not hold up the others.

use anyhow::{Context, Result};
use apd_hw::{IioProvider, Pin};
use apd_sensors::{CpuLoad, IpAddresses, Probe, Readout, RuntimeVersion, Temperature};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, warn};

use crate::config::Config;

/// Minimum time between two error log lines for the same sensor.
const ERROR_LOG_INTERVAL: Duration = Duration::from_secs(60);

/// How readings are printed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Output {
    /// The rendered text, one line per sensor.
    #[default]
    Text,
    /// One JSON object per sensor.
    Json,
}

/// Builds the enabled sensors, in display order.
pub fn build_probes(config: &Config) -> Result<Vec<Arc<dyn Probe>>> {
    let mut probes: Vec<Arc<dyn Probe>> = Vec::new();

    if config.temperature.enable {
        let pin: Pin = config
            .temperature
            .pin
            .parse()
            .with_context(|| format!("Invalid temperature pin {:?}", config.temperature.pin))?;
        let provider = match config.temperature.device.as_str() {
            "auto" => IioProvider::auto(),
            device => IioProvider::with_device(device),
        };
        probes.push(Arc::new(Temperature::new(Box::new(provider), pin)));
    }

    if config.runtime.enable {
        probes.push(Arc::new(RuntimeVersion::rust()));
    }

    if config.ip_addresses.enable {
        probes.push(Arc::new(IpAddresses::default()));
    }

    if config.cpu_load.enable {
        let interval = Duration::from_millis(config.cpu_load.interval);
        probes.push(Arc::new(CpuLoad::new(interval)));
    }

    Ok(probes)
}

/// Renders a readout as an output line. Empty text renders nothing in text
/// mode; text that already leads with the title is printed as-is.
pub fn render(readout: &Readout, output: Output) -> Result<Option<String>> {
    match output {
        Output::Text if readout.text.is_empty() => Ok(None),
        Output::Text if readout.text.starts_with(&readout.title) => {
            Ok(Some(readout.text.clone()))
        }
        Output::Text => Ok(Some(format!("{}: {}", readout.title, readout.text))),
        Output::Json => Ok(Some(
            serde_json::to_string(readout).context("Failed to serialize readout")?,
        )),
    }
}

/// Rate limiter for repeated sensor errors.
#[derive(Debug, Default)]
struct ErrorLog {
    suppressed: u32,
    last_log: Option<Instant>,
}

impl ErrorLog {
    /// Returns the number of errors suppressed since the last log line if
    /// this error should be logged.
    fn should_log(&mut self, now: Instant) -> Option<u32> {
        match self.last_log {
            Some(last) if now.duration_since(last) < ERROR_LOG_INTERVAL => {
                self.suppressed += 1;
                None
            }
            _ => {
                let suppressed = self.suppressed;
                self.suppressed = 0;
                self.last_log = Some(now);
                Some(suppressed)
            }
        }
    }
}

/// Polls a fixed set of sensors.
pub struct Poller {
    probes: Vec<Arc<dyn Probe>>,
    output: Output,
    errors: HashMap<String, ErrorLog>,
}

impl Poller {
    /// Creates a poller over `probes`.
    pub fn new(probes: Vec<Arc<dyn Probe>>, output: Output) -> Self {
        Self {
            probes,
            output,
            errors: HashMap::new(),
        }
    }

    /// Returns the number of sensors polled per cycle.
    pub fn len(&self) -> usize {
        self.probes.len()
    }

    /// Returns true if no sensor is enabled.
    pub fn is_empty(&self) -> bool {
        self.probes.is_empty()
    }

    /// Reads every sensor concurrently, returning results in sensor order.
    pub async fn read_all(&self) -> Result<Vec<(String, apd_sensors::Result<Readout>)>> {
        let handles: Vec<_> = self
            .probes
            .iter()
            .map(|probe| {
                let probe = Arc::clone(probe);
                tokio::task::spawn_blocking(move || (probe.name().to_string(), probe.readout()))
            })
            .collect();

        let mut results = Vec::with_capacity(handles.len());
        for handle in handles {
            results.push(handle.await.context("Sensor task failed")?);
        }
        Ok(results)
    }

    /// Runs one poll cycle, printing readings and logging sensor errors.
    pub async fn cycle(&mut self) -> Result<()> {
        let results = self.read_all().await?;
        let now = Instant::now();

        for (name, result) in results {
            match result {
                Ok(readout) => {
                    self.errors.remove(&name);
                    match render(&readout, self.output)? {
                        Some(line) => println!("{}", line),
                        None => debug!("{} rendered no text", name),
                    }
                }
                Err(e) => {
                    let log = self.errors.entry(name.clone()).or_default();
                    match log.should_log(now) {
                        Some(0) => warn!("{} read failed: {}", name, e),
                        Some(suppressed) => warn!(
                            "{} read failed: {} ({} more since last report)",
                            name, e, suppressed
                        ),
                        None => {}
                    }
                }
            }
        }

        Ok(())
    }
}
