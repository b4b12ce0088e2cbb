//! Configuration management.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Main configuration structure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Poll cycle interval in milliseconds
    #[serde(default = "default_poll")]
    pub poll: u64,

    /// Ambient temperature sensor
    #[serde(default)]
    pub temperature: TemperatureConfig,

    /// Runtime version sensor
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Host IP address sensor
    #[serde(default)]
    pub ip_addresses: IpAddressesConfig,

    /// CPU load sensor
    #[serde(default)]
    pub cpu_load: CpuLoadConfig,
}

/// Ambient temperature sensor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TemperatureConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,

    /// Data pin the thermometer is wired to (e.g., "D4")
    #[serde(default = "default_pin")]
    pub pin: String,

    /// IIO device directory or "auto" for discovery
    #[serde(default = "default_device")]
    pub device: String,
}

impl Default for TemperatureConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            pin: default_pin(),
            device: default_device(),
        }
    }
}

/// Runtime version sensor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RuntimeConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
        }
    }
}

/// Host IP address sensor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IpAddressesConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,
}

impl Default for IpAddressesConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
        }
    }
}

/// CPU load sensor configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CpuLoadConfig {
    #[serde(default = "default_enable")]
    pub enable: bool,

    /// Sampling interval in milliseconds
    #[serde(default = "default_cpu_interval")]
    pub interval: u64,
}

impl Default for CpuLoadConfig {
    fn default() -> Self {
        Self {
            enable: default_enable(),
            interval: default_cpu_interval(),
        }
    }
}

// Default value functions
fn default_poll() -> u64 {
    5000
}

fn default_enable() -> bool {
    true
}

fn default_pin() -> String {
    "D4".to_string()
}

fn default_device() -> String {
    "auto".to_string()
}

fn default_cpu_interval() -> u64 {
    100
}

impl Config {
    /// Loads configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content =
            std::fs::read_to_string(path.as_ref()).context("Failed to read configuration file")?;
        Self::parse(&content)
    }

    /// Parses configuration from TOML text.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse configuration")
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            poll: default_poll(),
            temperature: TemperatureConfig::default(),
            runtime: RuntimeConfig::default(),
            ip_addresses: IpAddressesConfig::default(),
            cpu_load: CpuLoadConfig::default(),
        }
    }
}
