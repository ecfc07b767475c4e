//! TOML-based scenario configuration and preset definitions.

use std::fmt;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

/// Top-level scenario configuration parsed from TOML.
///
/// All fields have defaults matching the baseline scenario. Load from
/// TOML with [`ScenarioConfig::from_toml_file`] or use
/// [`ScenarioConfig::baseline`] for the built-in default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ScenarioConfig {
    /// Physical site parameters.
    #[serde(default)]
    pub site: SiteConfig,
    /// Simulation timing and global parameters.
    #[serde(default)]
    pub simulation: SimulationConfig,
}

/// Physical site parameters: location, solar array, and battery.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SiteConfig {
    /// Site latitude (degrees, -90 to 90).
    pub latitude: f64,
    /// Site longitude (degrees, -180 to 180).
    pub longitude: f64,
    /// Total solar panel area (m^2).
    pub panel_area_m2: f64,
    /// Panel conversion efficiency (fraction, 0.0 to 1.0).
    pub panel_efficiency: f64,
    /// Panel tilt from horizontal (degrees).
    pub panel_tilt_deg: f64,
    /// Usable battery capacity (kWh, must be > 0).
    pub battery_capacity_kwh: f64,
    /// Battery state of charge entering the first tick (percent).
    pub initial_soc_pct: f64,
}

impl Default for SiteConfig {
    fn default() -> Self {
        Self {
            latitude: 34.05,
            longitude: -118.25,
            panel_area_m2: 25.0,
            panel_efficiency: 0.2,
            panel_tilt_deg: 30.0,
            battery_capacity_kwh: 13.5,
            initial_soc_pct: 50.0,
        }
    }
}

/// Simulation timing and global parameters.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct SimulationConfig {
    /// Duration of one timestep in hours (must be > 0).
    pub step_hours: f64,
    /// Number of timesteps to run (must be > 0).
    pub ticks: usize,
    /// Master random seed.
    pub seed: u64,
    /// Simulated hour of day the run starts at (0.0 to 24.0 exclusive).
    pub start_hour: f64,
}

impl Default for SimulationConfig {
    fn default() -> Self {
        Self {
            step_hours: 0.25,
            ticks: 96,
            seed: 42,
            start_hour: 12.0,
        }
    }
}

/// Configuration error with field path and constraint description.
#[derive(Debug)]
pub struct ConfigError {
    /// Dotted field path (e.g., `"site.battery_capacity_kwh"`).
    pub field: String,
    /// Human-readable constraint description.
    pub message: String,
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "config error: {} — {}", self.field, self.message)
    }
}

impl ScenarioConfig {
    /// Returns the baseline scenario (same parameters as the original hardcoded defaults).
    pub fn baseline() -> Self {
        Self {
            site: SiteConfig::default(),
            simulation: SimulationConfig::default(),
        }
    }

    /// Returns the high-desert preset: a large, well-aligned array with an
    /// oversized battery starting near empty.
    pub fn high_desert() -> Self {
        Self {
            site: SiteConfig {
                latitude: 35.1,
                longitude: -116.1,
                panel_area_m2: 40.0,
                panel_efficiency: 0.22,
                panel_tilt_deg: 35.0,
                battery_capacity_kwh: 20.0,
                initial_soc_pct: 30.0,
            },
            simulation: SimulationConfig::default(),
        }
    }

    /// Returns the apartment preset: a small balcony array with a compact
    /// battery.
    pub fn apartment() -> Self {
        Self {
            site: SiteConfig {
                panel_area_m2: 8.0,
                panel_efficiency: 0.18,
                panel_tilt_deg: 10.0,
                battery_capacity_kwh: 5.0,
                initial_soc_pct: 60.0,
                ..SiteConfig::default()
            },
            simulation: SimulationConfig::default(),
        }
    }

    /// Available preset names.
    pub const PRESETS: &[&str] = &["baseline", "high_desert", "apartment"];

    /// Loads a scenario from a named preset.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the preset name is unknown.
    pub fn from_preset(name: &str) -> Result<Self, ConfigError> {
        match name {
            "baseline" => Ok(Self::baseline()),
            "high_desert" => Ok(Self::high_desert()),
            "apartment" => Ok(Self::apartment()),
            _ => Err(ConfigError {
                field: "preset".to_string(),
                message: format!(
                    "unknown preset \"{name}\", available: {}",
                    Self::PRESETS.join(", ")
                ),
            }),
        }
    }

    /// Parses a scenario from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the file cannot be read or the TOML is invalid.
    pub fn from_toml_file(path: &Path) -> Result<Self, ConfigError> {
        let content = fs::read_to_string(path).map_err(|e| ConfigError {
            field: "scenario".to_string(),
            message: format!("cannot read \"{}\": {e}", path.display()),
        })?;
        Self::from_toml_str(&content)
    }

    /// Parses a scenario from a TOML string.
    ///
    /// # Errors
    ///
    /// Returns a `ConfigError` if the TOML is invalid or contains unknown fields.
    pub fn from_toml_str(s: &str) -> Result<Self, ConfigError> {
        toml::from_str(s).map_err(|e| ConfigError {
            field: "toml".to_string(),
            message: e.to_string(),
        })
    }

    /// Validates all fields and returns a list of errors.
    ///
    /// Returns an empty vector if configuration is valid.
    pub fn validate(&self) -> Vec<ConfigError> {
        let mut errors = Vec::new();
        let site = &self.site;

        if !(-90.0..=90.0).contains(&site.latitude) {
            errors.push(ConfigError {
                field: "site.latitude".into(),
                message: "must be in [-90, 90]".into(),
            });
        }
        if !(-180.0..=180.0).contains(&site.longitude) {
            errors.push(ConfigError {
                field: "site.longitude".into(),
                message: "must be in [-180, 180]".into(),
            });
        }
        if site.panel_area_m2 <= 0.0 {
            errors.push(ConfigError {
                field: "site.panel_area_m2".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=1.0).contains(&site.panel_efficiency) {
            errors.push(ConfigError {
                field: "site.panel_efficiency".into(),
                message: "must be in [0.0, 1.0]".into(),
            });
        }
        if site.battery_capacity_kwh <= 0.0 {
            errors.push(ConfigError {
                field: "site.battery_capacity_kwh".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..=100.0).contains(&site.initial_soc_pct) {
            errors.push(ConfigError {
                field: "site.initial_soc_pct".into(),
                message: "must be in [0.0, 100.0]".into(),
            });
        }

        let sim = &self.simulation;
        if sim.step_hours <= 0.0 {
            errors.push(ConfigError {
                field: "simulation.step_hours".into(),
                message: "must be > 0".into(),
            });
        }
        if sim.ticks == 0 {
            errors.push(ConfigError {
                field: "simulation.ticks".into(),
                message: "must be > 0".into(),
            });
        }
        if !(0.0..24.0).contains(&sim.start_hour) {
            errors.push(ConfigError {
                field: "simulation.start_hour".into(),
                message: "must be in [0.0, 24.0)".into(),
            });
        }

        errors
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn baseline_preset_valid() {
        let cfg = ScenarioConfig::baseline();
        let errors = cfg.validate();
        assert!(errors.is_empty(), "baseline should be valid: {errors:?}");
    }

    #[test]
    fn from_preset_baseline() {
        let cfg = ScenarioConfig::from_preset("baseline");
        assert!(cfg.is_ok());
    }

    #[test]
    fn from_preset_unknown() {
        let err = ScenarioConfig::from_preset("nonexistent");
        assert!(err.is_err());
        let e = err.unwrap_err();
        assert!(e.message.contains("unknown preset"));
    }

    #[test]
    fn valid_toml_parses() {
        let toml = r#"
[site]
latitude = 51.5
longitude = -0.12
panel_area_m2 = 18.0
panel_efficiency = 0.19
panel_tilt_deg = 40.0
battery_capacity_kwh = 10.0
initial_soc_pct = 35.0

[simulation]
step_hours = 0.5
ticks = 48
seed = 99
start_hour = 0.0
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok(), "valid TOML should parse: {:?}", cfg.err());
        let cfg = cfg.ok();
        assert_eq!(cfg.as_ref().map(|c| c.site.latitude), Some(51.5));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.ticks), Some(48));
        assert_eq!(cfg.as_ref().map(|c| c.simulation.start_hour), Some(0.0));
    }

    #[test]
    fn invalid_toml_unknown_field() {
        let toml = r#"
[site]
latitude = 34.05
inverter_count = 3
"#;
        let result = ScenarioConfig::from_toml_str(toml);
        assert!(result.is_err());
    }

    #[test]
    fn validation_catches_zero_capacity() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.site.battery_capacity_kwh = 0.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.battery_capacity_kwh"));
    }

    #[test]
    fn validation_catches_invalid_efficiency() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.site.panel_efficiency = 1.4;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.panel_efficiency"));
    }

    #[test]
    fn validation_catches_invalid_soc() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.site.initial_soc_pct = 140.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "site.initial_soc_pct"));
    }

    #[test]
    fn validation_catches_zero_ticks() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.ticks = 0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.ticks"));
    }

    #[test]
    fn validation_catches_out_of_range_start_hour() {
        let mut cfg = ScenarioConfig::baseline();
        cfg.simulation.start_hour = 24.0;
        let errors = cfg.validate();
        assert!(errors.iter().any(|e| e.field == "simulation.start_hour"));
    }

    #[test]
    fn all_presets_are_valid() {
        for name in ScenarioConfig::PRESETS {
            let cfg = ScenarioConfig::from_preset(name);
            assert!(cfg.is_ok(), "preset \"{name}\" should load");
            let errors = cfg.as_ref().map(|c| c.validate()).unwrap_or_default();
            assert!(
                errors.is_empty(),
                "preset \"{name}\" should be valid: {errors:?}"
            );
        }
    }

    #[test]
    fn high_desert_has_larger_array() {
        let base = ScenarioConfig::baseline();
        let desert = ScenarioConfig::high_desert();
        assert!(desert.site.panel_area_m2 > base.site.panel_area_m2);
        assert!(desert.site.battery_capacity_kwh > base.site.battery_capacity_kwh);
    }

    #[test]
    fn apartment_has_compact_battery() {
        let base = ScenarioConfig::baseline();
        let apartment = ScenarioConfig::apartment();
        assert!(apartment.site.battery_capacity_kwh < base.site.battery_capacity_kwh);
        assert_eq!(apartment.site.latitude, base.site.latitude);
    }

    #[test]
    fn partial_toml_uses_defaults() {
        let toml = r#"
[simulation]
seed = 99
"#;
        let cfg = ScenarioConfig::from_toml_str(toml);
        assert!(cfg.is_ok());
        let cfg = cfg.ok();
        // seed overridden
        assert_eq!(cfg.as_ref().map(|c| c.simulation.seed), Some(99));
        // step_hours kept default
        assert_eq!(cfg.as_ref().map(|c| c.simulation.step_hours), Some(0.25));
        // site kept default
        assert_eq!(cfg.as_ref().map(|c| c.site.panel_area_m2), Some(25.0));
    }
}
