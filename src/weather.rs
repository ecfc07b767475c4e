//! Hourly irradiance series for the solar model.
//!
//! A series carries one W/m^2 reading per hour of day. Lookups key on the
//! whole hour of the simulated time; a missing hour yields `None`, which
//! callers treat as "use the clear-sky fallback" rather than an error.

use std::path::Path;

use serde::Deserialize;

use crate::config::ConfigError;

/// Hourly solar irradiance readings (W/m^2), indexed by hour of day.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct IrradianceSeries {
    hourly_w_m2: Vec<f64>,
}

impl IrradianceSeries {
    /// Creates a series from per-hour readings. A series shorter than 24
    /// entries simply has no readings for the trailing hours.
    pub fn new(hourly_w_m2: Vec<f64>) -> Self {
        Self { hourly_w_m2 }
    }

    /// Returns the reading covering the given simulated time, or `None`
    /// when the series has no entry for that hour.
    ///
    /// The hour index is the whole hour of `time_hr`, wrapped into a day,
    /// so `13.75` and `37.75` both read hour 13.
    pub fn value_at(&self, time_hr: f64) -> Option<f64> {
        if !time_hr.is_finite() {
            return None;
        }
        let hour = (time_hr.floor() as i64).rem_euclid(24) as usize;
        self.hourly_w_m2.get(hour).copied()
    }

    /// Number of hours the series covers.
    pub fn len(&self) -> usize {
        self.hourly_w_m2.len()
    }

    pub fn is_empty(&self) -> bool {
        self.hourly_w_m2.is_empty()
    }

    /// Parses a series from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError {
            field: "irradiance".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a series from a TOML string with a single `hourly_w_m2` array.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "irradiance".to_string(),
            message: e.to_string(),
        })
    }
}
