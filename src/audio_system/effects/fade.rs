/// Fade ramp
///
/// Duration based linear interpolation between two volume levels.

/// One interpolation run from `start` to `target`.
///
/// Progress is a fraction of the configured fade time, so every ramp lasts
/// the full fade time whatever the distance between the two levels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadeRamp {
    start: f32,
    target: f32,
    fraction: f32,
}

impl FadeRamp {
    /// Create a ramp with no progress
    pub fn new(start: f32, target: f32) -> Self {
        Self {
            start,
            target,
            fraction: 0.0,
        }
    }

    pub fn start(&self) -> f32 {
        self.start
    }

    pub fn target(&self) -> f32 {
        self.target
    }

    /// Elapsed fraction in 0.0-1.0
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    /// Re-aim the remaining motion without touching start or progress
    pub fn retarget(&mut self, target: f32) {
        self.target = target;
    }

    /// Advance by `dt` seconds of a `fade_time` second fade.
    ///
    /// A non-positive or non-finite fade time finishes the ramp at once; a
    /// negative or non-finite `dt` does not move it.
    pub fn advance(&mut self, dt: f32, fade_time: f32) {
        if !(fade_time.is_finite() && fade_time > 0.0) {
            self.fraction = 1.0;
            return;
        }
        if !(dt.is_finite() && dt > 0.0) {
            return;
        }
        self.fraction = (self.fraction + dt / fade_time).min(1.0);
    }

    /// Check if the ramp reached its target
    pub fn is_complete(&self) -> bool {
        self.fraction >= 1.0
    }

    /// Interpolated level at the current progress (exactly `target` once complete)
    pub fn level(&self) -> f32 {
        if self.is_complete() {
            self.target
        } else {
            lerp(self.start, self.target, self.fraction)
        }
    }
}

/// Linear interpolation with `t` clamped to 0.0-1.0
pub fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t.clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lerp_endpoints() {
        assert_eq!(lerp(0.2, 0.8, 0.0), 0.2);
        assert_eq!(lerp(0.2, 0.8, 1.0), 0.8);
        assert_eq!(lerp(0.0, 1.0, 2.0), 1.0);
        assert!((lerp(0.0, 0.8, 0.5) - 0.4).abs() < 1e-6);
    }

    #[test]
    fn test_ramp_is_duration_based() {
        let mut short = FadeRamp::new(0.4, 0.5);
        let mut long = FadeRamp::new(0.0, 1.0);
        short.advance(0.5, 1.0);
        long.advance(0.5, 1.0);
        assert_eq!(short.fraction(), long.fraction());
        assert!(!short.is_complete());
    }

    #[test]
    fn test_ramp_snaps_to_target() {
        let mut ramp = FadeRamp::new(0.0, 0.7);
        for _ in 0..3 {
            ramp.advance(0.4, 1.0);
        }
        assert!(ramp.is_complete());
        assert_eq!(ramp.level(), 0.7);
    }

    #[test]
    fn test_zero_fade_time_completes_immediately() {
        let mut ramp = FadeRamp::new(0.0, 0.5);
        ramp.advance(0.0, 0.0);
        assert!(ramp.is_complete());

        let mut ramp = FadeRamp::new(0.0, 0.5);
        ramp.advance(0.016, -1.0);
        assert_eq!(ramp.level(), 0.5);
    }

    #[test]
    fn test_bad_dt_is_ignored() {
        let mut ramp = FadeRamp::new(0.0, 1.0);
        ramp.advance(-0.5, 1.0);
        ramp.advance(f32::NAN, 1.0);
        assert_eq!(ramp.fraction(), 0.0);
    }

    #[test]
    fn test_retarget_keeps_progress() {
        let mut ramp = FadeRamp::new(0.0, 1.0);
        ramp.advance(0.5, 1.0);
        ramp.retarget(0.0);
        assert_eq!(ramp.fraction(), 0.5);
        assert_eq!(ramp.start(), 0.0);
        assert_eq!(ramp.level(), 0.0);
    }
}
