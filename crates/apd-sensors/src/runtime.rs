//! Runtime version sensor.

use crate::sensor::Sensor;
use crate::Result;
use serde::Serialize;
use std::str::FromStr;

/// Version of the Rust toolchain this binary was built with.
const RUSTC_VERSION: &str = env!("APD_RUSTC_VERSION");

/// A `major.minor.micro` version.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
    pub micro: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32, micro: u32) -> Self {
        Self {
            major,
            minor,
            micro,
        }
    }
}

impl FromStr for Version {
    type Err = String;

    /// Parses `1.80.1`, `1.82.0-nightly` or `3.11`; a missing micro is zero.
    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        let release = s.trim().split(['-', '+']).next().unwrap_or_default();
        let mut parts = release.split('.');
        let mut next = |required: bool| -> std::result::Result<u32, String> {
            match parts.next() {
                Some(part) => part.parse().map_err(|_| format!("invalid version: {}", s)),
                None if required => Err(format!("invalid version: {}", s)),
                None => Ok(0),
            }
        };

        let major = next(true)?;
        let minor = next(true)?;
        let micro = next(false)?;
        Ok(Version::new(major, minor, micro))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}.{}", self.major, self.minor, self.micro)
    }
}

/// Reports the version of the runtime executing this program.
#[derive(Debug, Clone)]
pub struct RuntimeVersion {
    runtime: String,
    title: String,
    version: Version,
}

impl RuntimeVersion {
    /// Creates a sensor reporting `version` for the runtime called `runtime`.
    pub fn new(runtime: &str, version: Version) -> Self {
        Self {
            runtime: runtime.to_string(),
            title: format!("{} Version", runtime),
            version,
        }
    }

    /// Creates a sensor for the Rust toolchain this binary was built with.
    pub fn rust() -> Self {
        Self::new("Rust", RUSTC_VERSION.parse().unwrap_or_default())
    }

    /// Returns the runtime name.
    pub fn runtime(&self) -> &str {
        &self.runtime
    }
}

impl Default for RuntimeVersion {
    fn default() -> Self {
        Self::rust()
    }
}

impl Sensor for RuntimeVersion {
    type Value = Version;

    fn title(&self) -> &str {
        &self.title
    }

    fn value(&self) -> Result<Version> {
        Ok(self.version)
    }

    fn format(&self, value: &Version) -> String {
        format!("{}: {}.{}", self.title, value.major, value.minor)
    }
}
