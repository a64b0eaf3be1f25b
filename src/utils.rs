use std::time::{Duration, Instant};

/// Frame clock for the tick loop
///
/// Measures the wall time between ticks and paces the loop to a target rate.
pub struct FrameClock {
    last_tick: Instant,
    frame_duration: Duration,
    max_delta: Duration,
}

impl FrameClock {
    /// Create a clock ticking `rate_hz` times per second (at least once)
    pub fn new(rate_hz: u32) -> Self {
        let frame_duration = Duration::from_secs_f64(1.0 / f64::from(rate_hz.max(1)));
        Self {
            last_tick: Instant::now(),
            frame_duration,
            // A long stall (debugger, suspended laptop) must not jump fades to the end
            max_delta: frame_duration * 10,
        }
    }

    /// Target time between ticks
    pub fn frame_duration(&self) -> Duration {
        self.frame_duration
    }

    /// Seconds since the previous call, capped at ten frames
    pub fn delta(&mut self) -> f32 {
        let now = Instant::now();
        let elapsed = now.duration_since(self.last_tick).min(self.max_delta);
        self.last_tick = now;
        elapsed.as_secs_f32()
    }

    /// Time left until the next tick is due
    pub fn remaining(&self) -> Duration {
        self.frame_duration.saturating_sub(self.last_tick.elapsed())
    }

    /// Sleep until the next tick is due
    pub fn wait(&self) {
        let remaining = self.remaining();
        if !remaining.is_zero() {
            std::thread::sleep(remaining);
        }
    }

    /// Restart measuring from now
    pub fn reset(&mut self) {
        self.last_tick = Instant::now();
    }
}
