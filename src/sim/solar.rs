//! Solar photovoltaic generation model.
//!
//! Output follows measured irradiance when an hourly value is available and
//! falls back to a clear-sky sine approximation of the daylight arc when it
//! is not. Both paths scale by a latitude/tilt alignment factor.

use super::types::round2;

/// First hour of the clear-sky generation window.
const SUNRISE_HOUR: f64 = 6.0;
/// Last hour of the clear-sky generation window.
const SUNSET_HOUR: f64 = 18.0;
/// Peak clear-sky irradiance (kW per m^2).
const CLEAR_SKY_PEAK_KW_M2: f64 = 0.8;
/// Lower bound of the latitude/tilt alignment factor.
const TILT_FACTOR_FLOOR: f64 = 0.5;

/// Computes solar generation for one timestep.
///
/// With an irradiance reading the output is
/// `area * irradiance * efficiency * tilt / 1000`. Without one, a sine arc
/// between [`SUNRISE_HOUR`] and [`SUNSET_HOUR`] approximates clear-sky
/// generation, and the output is zero outside that window. The result is in
/// kW, never negative on the clear-sky path, rounded to two decimals.
///
/// # Arguments
///
/// * `time_hr` - Simulated hour of day (0.0 to 24.0)
/// * `area_m2` - Total panel area (m^2)
/// * `efficiency` - Panel conversion efficiency (fraction)
/// * `irradiance_w_m2` - Measured irradiance for this hour (W/m^2), if any
/// * `latitude_deg` - Site latitude, if known
/// * `tilt_deg` - Panel tilt from horizontal, if known
pub fn output_kw(
    time_hr: f64,
    area_m2: f64,
    efficiency: f64,
    irradiance_w_m2: Option<f64>,
    latitude_deg: Option<f64>,
    tilt_deg: Option<f64>,
) -> f64 {
    let tilt = tilt_factor(latitude_deg, tilt_deg);

    if let Some(irradiance) = irradiance_w_m2 {
        return round2(area_m2 * irradiance * efficiency * tilt / 1000.0);
    }

    if !(SUNRISE_HOUR..=SUNSET_HOUR).contains(&time_hr) {
        return 0.0;
    }
    let arc = ((time_hr - SUNRISE_HOUR) / (SUNSET_HOUR - SUNRISE_HOUR) * std::f64::consts::PI)
        .sin();
    let output = area_m2 * efficiency * CLEAR_SKY_PEAK_KW_M2 * tilt * arc;
    round2(output.max(0.0))
}

/// Alignment factor for panel tilt relative to site latitude.
///
/// `1.0` when either input is missing; otherwise degrades linearly with the
/// latitude/tilt mismatch down to [`TILT_FACTOR_FLOOR`].
fn tilt_factor(latitude_deg: Option<f64>, tilt_deg: Option<f64>) -> f64 {
    match (latitude_deg, tilt_deg) {
        (Some(latitude), Some(tilt)) => {
            TILT_FACTOR_FLOOR.max(1.0 - (latitude - tilt).abs() / 500.0)
        }
        _ => 1.0,
    }
}
