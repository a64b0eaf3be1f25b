/// Fade effects module
///
/// Ramp math, volume levels, and the policy flags that choose between the
/// two retargeting behaviours.

pub mod fade;
pub mod volume;

use serde::{Deserialize, Serialize};

pub use fade::{lerp, FadeRamp};
pub use volume::Volume;

/// How a fade reacts when its target changes mid-flight
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RetargetMode {
    /// Start a fresh ramp from the cached current volume
    #[default]
    Restart,

    /// Keep start and progress, only re-aim at the new target (legacy)
    Continue,
}

/// Fade engine behaviour
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FadePolicy {
    /// Duration of one full fade in seconds
    pub fade_time: f32,

    /// Retargeting behaviour
    pub retarget: RetargetMode,

    /// Apply master volume to fades requested outside of any group
    pub scale_ungrouped: bool,
}

impl Default for FadePolicy {
    fn default() -> Self {
        Self {
            fade_time: 1.0,
            retarget: RetargetMode::Restart,
            scale_ungrouped: false,
        }
    }
}

impl FadePolicy {
    /// Create a policy with the given fade time and default flags
    pub fn new(fade_time: f32) -> Self {
        Self {
            fade_time,
            ..Self::default()
        }
    }

    /// Set fade time
    pub fn with_fade_time(mut self, seconds: f32) -> Self {
        self.fade_time = seconds;
        self
    }

    /// Set retargeting behaviour
    pub fn with_retarget(mut self, mode: RetargetMode) -> Self {
        self.retarget = mode;
        self
    }

    /// Set whether ungrouped fades follow master volume
    pub fn with_scale_ungrouped(mut self, enabled: bool) -> Self {
        self.scale_ungrouped = enabled;
        self
    }
}
