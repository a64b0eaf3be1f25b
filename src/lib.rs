//! Runtime audio crossfading for games.
//!
//! Groups of audio sources fade in and out over a fixed duration, fades can
//! be retargeted mid-flight, and a master volume scales every group.
//! Game logic drives it through [`SoundscapeController`].

pub mod audio_system;
pub mod config;
pub mod error;
pub mod messaging;
pub mod utils;

pub use audio_system::{
    AudioGroup, FadeEngine, FadePolicy, FadeState, MemorySource, RetargetMode,
    SoundscapeController, SourceHandle, VolumeSource,
};
pub use config::Config;
pub use error::{AppResult, AudioError, ConfigError, SoundscapeError};
pub use messaging::{Command, CommandResult, Event, EventBus};
