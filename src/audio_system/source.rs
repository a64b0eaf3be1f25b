/// Volume sources
///
/// A volume source is any playable audio handle owned by the host engine.
/// The soundscape only ever reads and writes its volume and toggles playback.
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use parking_lot::Mutex;

/// Playable audio handle driven by the fade engine.
///
/// Implementations never fail; a handle that can no longer play should
/// simply ignore the calls.
pub trait VolumeSource: Send + Sync {
    /// Current output volume (0.0-1.0)
    fn volume(&self) -> f32;

    /// Set the output volume (0.0-1.0)
    fn set_volume(&self, volume: f32);

    /// Start or resume playback
    fn play(&self);

    /// Pause playback, keeping the position
    fn pause(&self);

    /// Check if the source is currently playing
    fn is_playing(&self) -> bool;

    /// Short label used in log lines
    fn label(&self) -> &str {
        "source"
    }
}

/// Shared reference to a host-owned source.
///
/// Equality and hashing use pointer identity, so two handles compare equal
/// only when they refer to the very same source.
#[derive(Clone)]
pub struct SourceHandle(Arc<dyn VolumeSource>);

impl SourceHandle {
    pub fn new<S: VolumeSource + 'static>(source: S) -> Self {
        Self(Arc::new(source))
    }

    pub fn from_arc(source: Arc<dyn VolumeSource>) -> Self {
        Self(source)
    }

    fn addr(&self) -> usize {
        Arc::as_ptr(&self.0) as *const () as usize
    }
}

impl std::ops::Deref for SourceHandle {
    type Target = dyn VolumeSource;

    fn deref(&self) -> &Self::Target {
        &*self.0
    }
}

impl PartialEq for SourceHandle {
    fn eq(&self, other: &Self) -> bool {
        self.addr() == other.addr()
    }
}

impl Eq for SourceHandle {}

impl Hash for SourceHandle {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.addr().hash(state);
    }
}

impl fmt::Debug for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceHandle")
            .field("label", &self.0.label())
            .field("volume", &self.0.volume())
            .field("playing", &self.0.is_playing())
            .finish()
    }
}

impl fmt::Display for SourceHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.label())
    }
}

#[derive(Debug, Default)]
struct MemoryState {
    volume: f32,
    playing: bool,
    play_calls: usize,
    pause_calls: usize,
}

/// In-memory source with no audio output.
///
/// Records every call so headless hosts and tests can observe what the
/// fade engine did.
#[derive(Debug)]
pub struct MemorySource {
    label: String,
    state: Mutex<MemoryState>,
}

impl MemorySource {
    /// Create a paused source at the given volume
    pub fn new(label: impl Into<String>, volume: f32) -> Self {
        Self {
            label: label.into(),
            state: Mutex::new(MemoryState {
                volume,
                ..MemoryState::default()
            }),
        }
    }

    /// Wrap the source in a handle, keeping a typed reference for inspection
    pub fn shared(label: impl Into<String>, volume: f32) -> (Arc<MemorySource>, SourceHandle) {
        let source = Arc::new(Self::new(label, volume));
        let handle = SourceHandle::from_arc(source.clone());
        (source, handle)
    }

    /// Number of `play()` calls received
    pub fn play_calls(&self) -> usize {
        self.state.lock().play_calls
    }

    /// Number of `pause()` calls received
    pub fn pause_calls(&self) -> usize {
        self.state.lock().pause_calls
    }
}

impl VolumeSource for MemorySource {
    fn volume(&self) -> f32 {
        self.state.lock().volume
    }

    fn set_volume(&self, volume: f32) {
        self.state.lock().volume = volume;
    }

    fn play(&self) {
        let mut state = self.state.lock();
        state.playing = true;
        state.play_calls += 1;
    }

    fn pause(&self) {
        let mut state = self.state.lock();
        state.playing = false;
        state.pause_calls += 1;
    }

    fn is_playing(&self) -> bool {
        self.state.lock().playing
    }

    fn label(&self) -> &str {
        &self.label
    }
}
