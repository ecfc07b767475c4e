//! Core simulation types: timing configuration, site parameters, and
//! snapshot data.
//!
//! All power values are kilowatts. `grid_kw` is positive when the site
//! imports from the grid and negative when it exports surplus. Battery
//! state of charge is a percentage of usable capacity.

use std::fmt;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Centralized simulation timing configuration.
///
/// The engine and the clock both reference this struct, eliminating
/// duplicated timestep bookkeeping.
///
/// # Examples
///
/// ```
/// use gridchain_sim::sim::types::SimConfig;
///
/// let cfg = SimConfig::new(0.25, 96, 42);
/// assert_eq!(cfg.horizon_hours(), 24.0);
/// assert_eq!(cfg.start_hour, 12.0);
/// ```
#[derive(Debug, Clone, Serialize)]
pub struct SimConfig {
    /// Duration of one timestep in hours.
    pub step_hours: f64,
    /// Number of timesteps in a full run.
    pub ticks: usize,
    /// Master random seed for the stochastic load model.
    pub seed: u64,
    /// Simulated hour of day the run starts at.
    pub start_hour: f64,
}

impl SimConfig {
    /// Creates a new timing configuration starting at noon.
    ///
    /// # Arguments
    ///
    /// * `step_hours` - Duration of one timestep in hours (must be > 0)
    /// * `ticks` - Number of timesteps to run (must be > 0)
    /// * `seed` - Master random seed
    ///
    /// # Panics
    ///
    /// Panics if `step_hours` is not positive or `ticks` is zero.
    pub fn new(step_hours: f64, ticks: usize, seed: u64) -> Self {
        assert!(step_hours > 0.0, "step_hours must be > 0");
        assert!(ticks > 0, "ticks must be > 0");
        Self { step_hours, ticks, seed, start_hour: 12.0 }
    }

    /// Simulated hours covered by a full run.
    pub fn horizon_hours(&self) -> f64 {
        self.step_hours * self.ticks as f64
    }
}

/// Physical site parameters consumed by the solar and battery models.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GridConfig {
    /// Site latitude (degrees).
    pub latitude: f64,
    /// Site longitude (degrees).
    pub longitude: f64,
    /// Total solar panel area (m^2).
    pub panel_area_m2: f64,
    /// Panel conversion efficiency (fraction, 0.0 to 1.0).
    pub panel_efficiency: f64,
    /// Panel tilt from horizontal (degrees).
    pub panel_tilt_deg: f64,
    /// Usable battery capacity (kWh, must be positive).
    pub battery_capacity_kwh: f64,
}

/// Battery operating mode reported in each snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum BatteryStatus {
    Charging,
    Discharging,
    Idle,
}

impl fmt::Display for BatteryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            BatteryStatus::Charging => write!(f, "CHARGING"),
            BatteryStatus::Discharging => write!(f, "DISCHARGING"),
            BatteryStatus::Idle => write!(f, "IDLE"),
        }
    }
}

/// Battery state carried from one timestep to the next.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct BatteryState {
    /// State of charge (percent, 0.0 to 100.0).
    pub soc: f64,
    pub status: BatteryStatus,
}

impl BatteryState {
    /// Creates a battery state.
    ///
    /// # Panics
    ///
    /// Panics if `soc` is outside [0, 100].
    pub fn new(soc: f64, status: BatteryStatus) -> Self {
        assert!((0.0..=100.0).contains(&soc), "soc must be within [0, 100]");
        Self { soc, status }
    }
}

/// Complete energy reading of the microgrid for one timestep.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Snapshot {
    /// Solar generation (kW, rounded to two decimals).
    pub solar_kw: f64,
    /// Household consumption (kW, rounded to two decimals).
    pub load_kw: f64,
    /// Battery state after this step.
    pub battery: BatteryState,
    /// Grid exchange (kW; positive=import, negative=export).
    pub grid_kw: f64,
    /// Wall-clock creation instant (milliseconds since the Unix epoch).
    pub produced_at_ms: i64,
}

impl fmt::Display for Snapshot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "solar={:>5.2} kW  load={:>5.2} kW  soc={:>5.1}% {:<11}  grid={:>6.2} kW",
            self.solar_kw, self.load_kw, self.battery.soc, self.battery.status, self.grid_kw
        )
    }
}

/// Fatal configuration failures raised by the physics models.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum SimError {
    #[error("battery capacity must be positive, got {0} kWh")]
    InvalidCapacity(f64),
    #[error("solar efficiency must be within [0, 1], got {0}")]
    InvalidEfficiency(f64),
}

/// Rounds to two decimal places, the precision used for power readings.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// Rounds to one decimal place, the precision used for state of charge.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round() / 10.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sim_config_basic() {
        let cfg = SimConfig::new(0.25, 96, 42);
        assert_eq!(cfg.step_hours, 0.25);
        assert_eq!(cfg.ticks, 96);
        assert_eq!(cfg.seed, 42);
        assert_eq!(cfg.start_hour, 12.0);
        assert_eq!(cfg.horizon_hours(), 24.0);
    }

    #[test]
    fn sim_config_hourly_steps() {
        let cfg = SimConfig::new(1.0, 48, 0);
        assert_eq!(cfg.horizon_hours(), 48.0);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_step_panics() {
        SimConfig::new(0.0, 96, 0);
    }

    #[test]
    #[should_panic]
    fn sim_config_zero_ticks_panics() {
        SimConfig::new(0.25, 0, 0);
    }

    #[test]
    #[should_panic]
    fn battery_state_out_of_range_soc_panics() {
        BatteryState::new(150.0, BatteryStatus::Idle);
    }

    #[test]
    fn battery_status_wire_form() {
        let json = serde_json::to_string(&BatteryStatus::Discharging).unwrap();
        assert_eq!(json, r#""DISCHARGING""#);
        let back: BatteryStatus = serde_json::from_str(r#""CHARGING""#).unwrap();
        assert_eq!(back, BatteryStatus::Charging);
    }

    #[test]
    fn snapshot_display_does_not_panic() {
        let snapshot = Snapshot {
            solar_kw: 3.97,
            load_kw: 0.52,
            battery: BatteryState::new(57.5, BatteryStatus::Charging),
            grid_kw: -1.2,
            produced_at_ms: 0,
        };
        let s = format!("{snapshot}");
        assert!(s.contains("CHARGING"));
        assert!(s.contains("-1.20"));
    }

    #[test]
    fn rounding_helpers_match_display_precision() {
        assert_eq!(round2(3.9676), 3.97);
        assert_eq!(round2(2.344), 2.34);
        assert_eq!(round2(2.0), 2.0);
        assert_eq!(round1(57.48), 57.5);
        assert_eq!(round1(0.04), 0.0);
    }
}
