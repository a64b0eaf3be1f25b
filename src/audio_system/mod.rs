pub mod effects;
pub mod engine;
pub mod group;
pub mod manager;
pub mod player;
/// Audio system module
///
/// Crossfades named groups of audio sources and applies a master volume on
/// top of them.
///
/// ## Architecture
///
/// ```text
/// SoundscapeController
///   ├── AudioGroup "Ambience"  ── [wind, birds]   targets + cached volumes
///   ├── AudioGroup "Tension"   ── [drone]
///   └── FadeEngine
///         └── HashMap<SourceHandle, Fade>   one ramp per fading source
/// ```
///
/// The host calls `tick(dt)` once per frame. Each active fade advances by
/// `dt / fade_time`, writes `level × master` to its source, and is removed
/// once it reaches its target.
///
/// ## Usage
///
/// ```rust,ignore
/// use soundscape::audio_system::{AudioGroup, FadePolicy, MemorySource, SoundscapeController};
///
/// let (_wind, wind) = MemorySource::shared("wind", 0.8);
/// let groups = vec![AudioGroup::with_sources("Ambience", vec![wind])];
///
/// let mut controller = SoundscapeController::new(FadePolicy::new(1.0), groups);
/// controller.start();
///
/// loop {
///     controller.tick(1.0 / 60.0);
/// }
/// ```
pub mod source;

// Re-export commonly used types
pub use effects::{FadePolicy, FadeRamp, RetargetMode, Volume};
pub use engine::{FadeEngine, FadeState, GroupSlot};
pub use group::AudioGroup;
pub use manager::{GroupStatus, SoundscapeController, SourceStatus};
pub use player::SinkSource;
pub use source::{MemorySource, SourceHandle, VolumeSource};
