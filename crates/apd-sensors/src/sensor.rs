//! The sensor abstraction.

use crate::Result;
use serde::Serialize;

/// A polled unit that reads one value and renders it as text.
pub trait Sensor: Send + Sync {
    /// The raw reading type.
    type Value;

    /// Returns the static display name.
    fn title(&self) -> &str;

    /// Performs the read.
    ///
    /// Sensors backed by optional hardware report an unavailable reading
    /// through their value type rather than an error.
    fn value(&self) -> Result<Self::Value>;

    /// Renders a reading. Must accept every value `value()` can produce and
    /// must not perform I/O.
    fn format(&self, value: &Self::Value) -> String;

    /// Reads and renders in one step.
    fn describe(&self) -> Result<String> {
        let value = self.value()?;
        Ok(self.format(&value))
    }
}

/// A rendered reading.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Readout {
    /// Sensor display name.
    pub title: String,
    /// Rendered value.
    pub text: String,
}

/// Object-safe view of a [`Sensor`], for holding sensors of mixed value types.
pub trait Probe: Send + Sync {
    /// Returns the sensor's display name.
    fn name(&self) -> &str;

    /// Reads the sensor and renders the result.
    fn readout(&self) -> Result<Readout>;
}

impl<S: Sensor> Probe for S {
    fn name(&self) -> &str {
        self.title()
    }

    fn readout(&self) -> Result<Readout> {
        Ok(Readout {
            title: self.title().to_string(),
            text: self.describe()?,
        })
    }
}
