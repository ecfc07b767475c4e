//! Simulation engine that orchestrates the physics models, the clock, and
//! the record chain.

use thiserror::Error;

use crate::chain::ledger::{Ledger, LedgerError, TimeSource};
use crate::chain::record::{Payload, Record};
use crate::chain::validator::{self, ValidationResult};
use crate::weather::IrradianceSeries;

use super::battery;
use super::clock::SimClock;
use super::load::HouseholdLoad;
use super::solar;
use super::types::{BatteryState, GridConfig, SimConfig, SimError, Snapshot};

/// Errors from the tick path.
///
/// Physics failures are configuration mistakes and chain failures are
/// serialization mistakes; both abort the run rather than drop a record,
/// so a completed run always has one record per tick.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    #[error(transparent)]
    Sim(#[from] SimError),
}

/// Computes one energy snapshot from simulated time, site parameters, and
/// the prior battery state.
///
/// Pure apart from the jitter drawn by `load_model`: the same inputs and
/// load model state always produce the same snapshot.
///
/// # Arguments
///
/// * `time_hr` - Simulated hour of day
/// * `config` - Physical site parameters
/// * `prior_battery` - Battery state entering this timestep
/// * `irradiance_w_m2` - Measured irradiance for this hour, if any
/// * `step_hours` - Timestep duration in hours
/// * `load_model` - Stochastic demand generator
/// * `produced_at_ms` - Wall-clock creation instant for the snapshot
///
/// # Errors
///
/// Returns [`SimError::InvalidEfficiency`] when the configured panel
/// efficiency is outside [0, 1], or [`SimError::InvalidCapacity`] when the
/// battery capacity is not positive.
pub fn compute_snapshot(
    time_hr: f64,
    config: &GridConfig,
    prior_battery: BatteryState,
    irradiance_w_m2: Option<f64>,
    step_hours: f64,
    load_model: &mut HouseholdLoad,
    produced_at_ms: i64,
) -> Result<Snapshot, SimError> {
    if !(0.0..=1.0).contains(&config.panel_efficiency) {
        return Err(SimError::InvalidEfficiency(config.panel_efficiency));
    }

    // 1. Generation and demand
    let solar_kw = solar::output_kw(
        time_hr,
        config.panel_area_m2,
        config.panel_efficiency,
        irradiance_w_m2,
        Some(config.latitude),
        Some(config.panel_tilt_deg),
    );
    let load_kw = load_model.demand_kw(time_hr);

    // 2. Battery response and grid exchange
    let transition = battery::step(
        prior_battery,
        solar_kw,
        load_kw,
        config.battery_capacity_kwh,
        step_hours,
    )?;

    Ok(Snapshot {
        solar_kw,
        load_kw,
        battery: transition.battery,
        grid_kw: transition.grid_kw,
        produced_at_ms,
    })
}

/// Simulation engine owning the physics state and the record chain.
///
/// Each tick advances the simulated clock, computes one snapshot, and
/// appends it to the ledger, so the chain is a complete tick-by-tick
/// history of the run.
pub struct Engine {
    sim: SimConfig,
    grid: GridConfig,
    clock: SimClock,
    load: HouseholdLoad,
    battery: BatteryState,
    irradiance: Option<IrradianceSeries>,
    ledger: Ledger,
    wall: Box<dyn TimeSource>,
}

impl Engine {
    /// Creates a new simulation engine. No records are appended until
    /// [`Engine::run`], [`Engine::tick`], or [`Engine::reset`] is called.
    ///
    /// # Arguments
    ///
    /// * `sim` - Timing configuration
    /// * `grid` - Physical site parameters
    /// * `initial_battery` - Battery state entering the first tick
    /// * `ledger` - Record chain to append into
    /// * `wall` - Wall clock stamping snapshot creation instants
    pub fn new(
        sim: SimConfig,
        grid: GridConfig,
        initial_battery: BatteryState,
        ledger: Ledger,
        wall: Box<dyn TimeSource>,
    ) -> Self {
        let clock = SimClock::new(sim.start_hour, sim.step_hours);
        let load = HouseholdLoad::new(sim.seed);
        Self {
            sim,
            grid,
            clock,
            load,
            battery: initial_battery,
            irradiance: None,
            ledger,
            wall,
        }
    }

    /// Installs (or clears) the hourly irradiance series. Takes effect on
    /// the next tick; records already in the chain are untouched.
    pub fn set_irradiance(&mut self, series: Option<IrradianceSeries>) {
        self.irradiance = series;
    }

    /// Executes one simulation timestep and returns the appended record.
    ///
    /// # Errors
    ///
    /// Returns an [`EngineError`] when the site configuration is invalid or
    /// the snapshot cannot be serialized. The chain gains no record in
    /// either case.
    pub fn tick(&mut self) -> Result<&Record, EngineError> {
        let time_hr = self.clock.advance();
        let irradiance = self
            .irradiance
            .as_ref()
            .and_then(|series| series.value_at(time_hr));
        let produced_at_ms = self.wall.now_millis();

        let snapshot = compute_snapshot(
            time_hr,
            &self.grid,
            self.battery,
            irradiance,
            self.sim.step_hours,
            &mut self.load,
            produced_at_ms,
        )?;
        self.battery = snapshot.battery;

        Ok(self.ledger.append(Payload::Snapshot(snapshot))?)
    }

    /// Seeds a genesis record if the chain is empty, then executes the
    /// configured number of ticks.
    pub fn run(&mut self) -> Result<(), EngineError> {
        if self.ledger.is_empty() {
            self.seed_genesis()?;
        }
        for _ in 0..self.sim.ticks {
            self.tick()?;
        }
        tracing::info!(records = self.ledger.len(), "simulation run complete");
        Ok(())
    }

    /// Discards the chain, rewinds the simulated clock to the start hour,
    /// and seeds a fresh genesis record from the current battery state.
    pub fn reset(&mut self) -> Result<&Record, EngineError> {
        self.clock = SimClock::new(self.sim.start_hour, self.sim.step_hours);
        self.ledger.reset();
        self.seed_genesis()
    }

    /// Audits the chain for link and content integrity.
    pub fn audit(&self) -> ValidationResult {
        validator::validate(self.ledger.records())
    }

    /// Appends the quiescent genesis record: no generation, no demand, no
    /// grid exchange, current battery state.
    fn seed_genesis(&mut self) -> Result<&Record, EngineError> {
        let produced_at_ms = self.wall.now_millis();
        let snapshot = Snapshot {
            solar_kw: 0.0,
            load_kw: 0.0,
            battery: self.battery,
            grid_kw: 0.0,
            produced_at_ms,
        };
        Ok(self.ledger.append(Payload::Snapshot(snapshot))?)
    }

    /// Returns a reference to the record chain.
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Returns a mutable reference to the record chain, for tamper
    /// demonstrations.
    pub fn ledger_mut(&mut self) -> &mut Ledger {
        &mut self.ledger
    }

    /// Battery state after the most recent tick.
    pub fn battery(&self) -> BatteryState {
        self.battery
    }

    /// Current simulated hour of day.
    pub fn time_hr(&self) -> f64 {
        self.clock.time_hr()
    }

    /// Returns a reference to the timing configuration.
    pub fn config(&self) -> &SimConfig {
        &self.sim
    }
}
