//! Shared test fixtures for integration tests.

use gridchain_sim::chain::{FixedClock, Ledger};
use gridchain_sim::sim::engine::Engine;
use gridchain_sim::sim::types::{BatteryState, BatteryStatus, GridConfig, SimConfig};

/// Wall-clock epoch used by every fixed test clock (2024-01-01T00:00:00Z).
pub const TEST_EPOCH_MS: i64 = 1_704_067_200_000;

/// Empty ledger stamped by a fixed clock advancing 250 ms per reading.
pub fn fixed_ledger() -> Ledger {
    Ledger::with_clock(Box::new(FixedClock::new(TEST_EPOCH_MS, 250)))
}

/// Default site: 25 m^2 array at 20% efficiency, 13.5 kWh battery.
pub fn baseline_grid() -> GridConfig {
    GridConfig {
        latitude: 34.05,
        longitude: -118.25,
        panel_area_m2: 25.0,
        panel_efficiency: 0.2,
        panel_tilt_deg: 30.0,
        battery_capacity_kwh: 13.5,
    }
}

/// Default timing: quarter-hour steps, seed 42, noon start.
pub fn baseline_sim(ticks: usize) -> SimConfig {
    SimConfig::new(0.25, ticks, 42)
}

/// Battery at half charge, idle.
pub fn initial_battery() -> BatteryState {
    BatteryState::new(50.0, BatteryStatus::Idle)
}

/// Engine whose chain is fully reproducible: fixed ledger clock and fixed
/// wall clock, fixed load seed.
pub fn build_engine(ticks: usize) -> Engine {
    Engine::new(
        baseline_sim(ticks),
        baseline_grid(),
        initial_battery(),
        fixed_ledger(),
        Box::new(FixedClock::new(TEST_EPOCH_MS, 250)),
    )
}
