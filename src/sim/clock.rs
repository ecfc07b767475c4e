/// A simulated time-of-day clock.
///
/// The `SimClock` advances a fixed number of hours per tick and snaps back
/// to midnight once a reading reaches 24 hours, so readings always stay in
/// `[0.0, 24.0)`.
///
/// # Examples
///
/// ```
/// use gridchain_sim::sim::clock::SimClock;
///
/// let mut clock = SimClock::new(23.5, 0.25);
/// assert_eq!(clock.advance(), 23.75);
/// assert_eq!(clock.advance(), 0.0);
/// assert_eq!(clock.time_hr(), 0.0);
/// ```
#[derive(Debug, Clone)]
pub struct SimClock {
    /// Current simulated hour of day
    time_hr: f64,
    /// Hours added per tick
    step_hours: f64,
}

impl SimClock {
    /// Creates a clock at the given hour of day.
    ///
    /// # Arguments
    ///
    /// * `start_hour` - Initial hour of day, within `[0.0, 24.0)`
    /// * `step_hours` - Hours to add per tick (must be > 0)
    ///
    /// # Panics
    ///
    /// Panics if `step_hours` is not positive or `start_hour` is outside
    /// `[0.0, 24.0)`.
    pub fn new(start_hour: f64, step_hours: f64) -> Self {
        assert!(step_hours > 0.0, "step_hours must be > 0");
        assert!(
            (0.0..24.0).contains(&start_hour),
            "start_hour must be within [0, 24)"
        );
        Self { time_hr: start_hour, step_hours }
    }

    /// Current simulated hour of day.
    pub fn time_hr(&self) -> f64 {
        self.time_hr
    }

    /// Advances the clock by one step.
    ///
    /// # Returns
    ///
    /// The new reading. A reading that would reach or pass 24 hours snaps
    /// to exactly `0.0` rather than carrying the overflow.
    pub fn advance(&mut self) -> f64 {
        let next = self.time_hr + self.step_hours;
        self.time_hr = if next >= 24.0 { 0.0 } else { next };
        self.time_hr
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_clock() {
        let clock = SimClock::new(12.0, 0.25);
        assert_eq!(clock.time_hr(), 12.0);
    }

    #[test]
    fn test_advance() {
        let mut clock = SimClock::new(12.0, 0.25);
        assert_eq!(clock.advance(), 12.25);
        assert_eq!(clock.advance(), 12.5);
        assert_eq!(clock.time_hr(), 12.5);
    }

    #[test]
    fn test_wraps_to_midnight() {
        let mut clock = SimClock::new(23.75, 0.25);
        assert_eq!(clock.advance(), 0.0);
        assert_eq!(clock.advance(), 0.25);
    }

    #[test]
    fn test_overshoot_snaps_to_zero() {
        // 23.9 + 0.25 passes midnight; the reading snaps to 0.0 instead of
        // carrying the 0.15 h overflow.
        let mut clock = SimClock::new(23.9, 0.25);
        assert_eq!(clock.advance(), 0.0);
    }

    #[test]
    fn test_full_day_returns_to_start() {
        let mut clock = SimClock::new(12.0, 0.25);
        for _ in 0..96 {
            clock.advance();
        }
        assert_eq!(clock.time_hr(), 12.0);
    }

    #[test]
    #[should_panic]
    fn test_zero_step_panics() {
        SimClock::new(12.0, 0.0);
    }

    #[test]
    #[should_panic]
    fn test_out_of_range_start_panics() {
        SimClock::new(24.0, 0.25);
    }
}
