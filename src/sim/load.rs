//! Stochastic household load model.
//!
//! Demand is a flat base with two sinusoidal bumps, one over the morning
//! routine and one over the evening peak, plus a small uniform jitter so
//! consecutive runs do not repeat exactly unless seeded alike.

use rand::Rng;
use rand::SeedableRng;
use rand::rngs::StdRng;

use super::types::round2;

/// Always-on background demand (kW).
const BASE_LOAD_KW: f64 = 0.5;
/// Morning bump amplitude (kW).
const MORNING_PEAK_KW: f64 = 1.5;
/// Morning bump window start hour.
const MORNING_START_HR: f64 = 6.0;
/// Morning bump window end hour.
const MORNING_END_HR: f64 = 9.0;
/// Evening bump amplitude (kW).
const EVENING_PEAK_KW: f64 = 2.5;
/// Evening bump window start hour.
const EVENING_START_HR: f64 = 17.0;
/// Evening bump window end hour.
const EVENING_END_HR: f64 = 22.0;
/// Half-width of the uniform jitter (kW).
const JITTER_KW: f64 = 0.1;
/// Demand never reported below this floor (kW).
const MIN_LOAD_KW: f64 = 0.2;

/// Seeded household demand generator.
#[derive(Debug, Clone)]
pub struct HouseholdLoad {
    rng: StdRng,
}

impl HouseholdLoad {
    /// Creates a load model from the master seed. Two models built from the
    /// same seed produce identical demand sequences.
    pub fn new(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed) }
    }

    /// Returns household demand for the given hour of day, in kW rounded to
    /// two decimals. Each call draws one jitter sample, so call order
    /// matters for reproducibility.
    pub fn demand_kw(&mut self, time_hr: f64) -> f64 {
        let mut demand = BASE_LOAD_KW;

        if (MORNING_START_HR..=MORNING_END_HR).contains(&time_hr) {
            let phase = (time_hr - MORNING_START_HR) / (MORNING_END_HR - MORNING_START_HR);
            demand += MORNING_PEAK_KW * (phase * std::f64::consts::PI).sin();
        }
        if (EVENING_START_HR..=EVENING_END_HR).contains(&time_hr) {
            let phase = (time_hr - EVENING_START_HR) / (EVENING_END_HR - EVENING_START_HR);
            demand += EVENING_PEAK_KW * (phase * std::f64::consts::PI).sin();
        }

        demand += self.rng.random_range(-JITTER_KW..JITTER_KW);
        round2(demand.max(MIN_LOAD_KW))
    }
}
