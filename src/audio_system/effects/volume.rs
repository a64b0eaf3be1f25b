/// Volume level
///
/// A gain value kept inside 0.0-1.0.

/// Clamped volume level
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Volume {
    level: f32,
}

impl Volume {
    /// Silence
    pub const SILENT: Volume = Volume { level: 0.0 };

    /// Full volume
    pub const FULL: Volume = Volume { level: 1.0 };

    /// Create a new volume, clamping into range (NaN becomes silence)
    pub fn new(level: f32) -> Self {
        Self {
            level: clamp_unit(level),
        }
    }

    /// Get the volume level
    pub fn level(&self) -> f32 {
        self.level
    }

    /// Set the volume level
    pub fn set_level(&mut self, level: f32) {
        self.level = clamp_unit(level);
    }

    /// Check if muted
    pub fn is_muted(&self) -> bool {
        self.level == 0.0
    }

    /// Scale a pre-master level by this volume
    pub fn scale(&self, level: f32) -> f32 {
        level * self.level
    }
}

impl Default for Volume {
    fn default() -> Self {
        Self::FULL
    }
}

impl From<f32> for Volume {
    fn from(level: f32) -> Self {
        Self::new(level)
    }
}

fn clamp_unit(level: f32) -> f32 {
    if level.is_nan() {
        0.0
    } else {
        level.clamp(0.0, 1.0)
    }
}
