//! Time management utilities

use std::time::{Duration, Instant};

/// Converts variable frame time into whole fixed-length physics ticks
///
/// Leftover time is carried to the next frame. When a frame is so long that
/// more than `max_substeps` ticks would be owed, the surplus is dropped so a
/// hitch never snowballs into a longer one.
#[derive(Debug, Clone)]
pub struct FixedTimestep {
    step: f32,
    max_substeps: u32,
    accumulator: f32,
    tick_count: u64,
}

impl FixedTimestep {
    /// Create a fixed timestep of `step` seconds
    pub fn new(step: f32, max_substeps: u32) -> Self {
        assert!(step > 0.0, "fixed timestep must be positive, got {step}");
        Self {
            step,
            max_substeps: max_substeps.max(1),
            accumulator: 0.0,
            tick_count: 0,
        }
    }

    /// Feed elapsed frame time, returning how many ticks to run now
    ///
    /// Negative frame times count as zero; non-finite ones are discarded.
    pub fn accumulate(&mut self, frame_dt: f32) -> u32 {
        if !frame_dt.is_finite() {
            log::warn!("Ignoring non-finite frame time {}", frame_dt);
            return 0;
        }
        self.accumulator += frame_dt.max(0.0);

        let mut ticks = 0;
        while self.accumulator >= self.step && ticks < self.max_substeps {
            self.accumulator -= self.step;
            ticks += 1;
        }

        if ticks == self.max_substeps && self.accumulator >= self.step {
            log::debug!(
                "Dropping {:.4}s of simulation time after {} substeps",
                self.accumulator,
                ticks
            );
            self.accumulator %= self.step;
        }

        self.tick_count += u64::from(ticks);
        ticks
    }

    /// Length of one tick in seconds
    pub fn step(&self) -> f32 {
        self.step
    }

    /// Fraction of a tick still waiting in the accumulator, in `[0, 1)`
    pub fn alpha(&self) -> f32 {
        self.accumulator / self.step
    }

    /// Total ticks handed out since creation or the last reset
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }

    /// Forget any accumulated time
    pub fn reset(&mut self) {
        self.accumulator = 0.0;
        self.tick_count = 0;
    }
}

/// Simple stopwatch for measuring elapsed time
pub struct Stopwatch {
    start_time: Option<Instant>,
    elapsed: Duration,
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}

impl Stopwatch {
    /// Create a new stopped stopwatch
    pub fn new() -> Self {
        Self {
            start_time: None,
            elapsed: Duration::ZERO,
        }
    }

    /// Create a new stopwatch and start it immediately
    pub fn start_new() -> Self {
        let mut stopwatch = Self::new();
        stopwatch.start();
        stopwatch
    }

    /// Start the stopwatch
    pub fn start(&mut self) {
        self.start_time = Some(Instant::now());
    }

    /// Stop the stopwatch and accumulate elapsed time
    pub fn stop(&mut self) {
        if let Some(start) = self.start_time {
            self.elapsed += start.elapsed();
            self.start_time = None;
        }
    }

    /// Get the elapsed time
    pub fn elapsed(&self) -> Duration {
        let current_elapsed = self.start_time.map_or(Duration::ZERO, |start| start.elapsed());
        self.elapsed + current_elapsed
    }

    /// Get the elapsed time in microseconds
    pub fn elapsed_micros(&self) -> u64 {
        u64::try_from(self.elapsed().as_micros()).unwrap_or(u64::MAX)
    }

    /// Check if the stopwatch is currently running
    pub fn is_running(&self) -> bool {
        self.start_time.is_some()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn test_fixed_timestep_carries_remainder() {
        let mut timestep = FixedTimestep::new(0.01, 10);

        assert_eq!(timestep.accumulate(0.025), 2);
        assert_relative_eq!(timestep.alpha(), 0.5, epsilon = 1e-3);

        assert_eq!(timestep.accumulate(0.005), 1);
        assert_eq!(timestep.tick_count(), 3);
    }

    #[test]
    fn test_fixed_timestep_clamps_long_frames() {
        let mut timestep = FixedTimestep::new(1.0 / 60.0, 5);

        assert_eq!(timestep.accumulate(1.0), 5);
        assert!(timestep.alpha() < 1.0);
        assert_eq!(timestep.accumulate(0.0), 0);
    }

    #[test]
    fn test_fixed_timestep_ignores_non_finite_frames() {
        let mut timestep = FixedTimestep::new(0.25, 4);
        assert_eq!(timestep.accumulate(0.375), 1);

        assert_eq!(timestep.accumulate(f32::INFINITY), 0);
        assert_eq!(timestep.accumulate(f32::NAN), 0);
        assert_eq!(timestep.accumulate(f32::NEG_INFINITY), 0);
        assert!(timestep.alpha().is_finite());

        assert_eq!(timestep.accumulate(0.125), 1);
        assert_eq!(timestep.tick_count(), 2);
    }

    #[test]
    fn test_stopwatch_accumulates_only_while_running() {
        let mut stopwatch = Stopwatch::new();
        assert!(!stopwatch.is_running());
        assert_eq!(stopwatch.elapsed(), Duration::ZERO);

        stopwatch.start();
        assert!(stopwatch.is_running());
        stopwatch.stop();
        assert!(!stopwatch.is_running());
    }
}
