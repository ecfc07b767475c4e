/// Battery charge/discharge model.
pub mod battery;
/// Simulated time-of-day clock.
pub mod clock;
pub mod engine;
pub mod load;
/// Solar generation model.
pub mod solar;
pub mod types;
