/// Audio groups
///
/// A named set of sources faded together. Each slot keeps the volume the
/// source was configured with (its fade-in target) and the current pre-master
/// volume the fade engine last wrote.
use super::effects::Volume;
use super::source::SourceHandle;

/// Named collection of sources with per-slot fade state.
///
/// `sources`, `target_volumes` and `current_volumes` always have the same
/// length and are indexed together.
#[derive(Debug)]
pub struct AudioGroup {
    name: String,
    sources: Vec<Option<SourceHandle>>,
    target_volumes: Vec<f32>,
    current_volumes: Vec<f32>,
    initialized: bool,
}

impl AudioGroup {
    /// Create a group from ordered slots. `None` marks a missing handle.
    pub fn new(name: impl Into<String>, sources: Vec<Option<SourceHandle>>) -> Self {
        let len = sources.len();
        Self {
            name: name.into(),
            sources,
            target_volumes: vec![0.0; len],
            current_volumes: vec![0.0; len],
            initialized: false,
        }
    }

    /// Create a group where every slot holds a handle
    pub fn with_sources(name: impl Into<String>, sources: Vec<SourceHandle>) -> Self {
        Self::new(name, sources.into_iter().map(Some).collect())
    }

    /// Capture each source's volume as its target, then silence it.
    ///
    /// Runs once; later calls are ignored.
    pub fn initialize(&mut self) {
        if self.initialized {
            tracing::warn!("Audiogroup {} is already initialized", self.name);
            return;
        }

        for (index, slot) in self.sources.iter().enumerate() {
            match slot {
                Some(source) => {
                    self.target_volumes[index] = Volume::new(source.volume()).level();
                    source.set_volume(0.0);
                }
                None => {
                    tracing::warn!(
                        "Audiogroup {} has no source in slot {}",
                        self.name,
                        index
                    );
                    self.target_volumes[index] = 0.0;
                }
            }
            self.current_volumes[index] = 0.0;
        }

        self.initialized = true;
        tracing::debug!(
            "Initialized audiogroup {} with targets {:?}",
            self.name,
            self.target_volumes
        );
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn len(&self) -> usize {
        self.sources.len()
    }

    pub fn is_empty(&self) -> bool {
        self.sources.is_empty()
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized
    }

    /// Source in slot `index`, if the slot exists and holds a handle
    pub fn source(&self, index: usize) -> Option<&SourceHandle> {
        self.sources.get(index).and_then(Option::as_ref)
    }

    /// Iterate over slots in order
    pub fn sources(&self) -> impl Iterator<Item = Option<&SourceHandle>> {
        self.sources.iter().map(Option::as_ref)
    }

    /// Fade-in target of slot `index`; `None` before initialization
    pub fn target_volume(&self, index: usize) -> Option<f32> {
        if !self.initialized {
            return None;
        }
        let target = self.target_volumes.get(index).copied();
        if target.is_none() {
            self.warn_out_of_range(index);
        }
        target
    }

    pub fn target_volumes(&self) -> &[f32] {
        &self.target_volumes
    }

    /// Cached pre-master volume of slot `index`
    pub fn current_volume(&self, index: usize) -> Option<f32> {
        let current = self.current_volumes.get(index).copied();
        if current.is_none() {
            self.warn_out_of_range(index);
        }
        current
    }

    pub fn current_volumes(&self) -> &[f32] {
        &self.current_volumes
    }

    /// Update the cached pre-master volume of slot `index`
    pub fn set_current_volume(&mut self, index: usize, volume: f32) {
        match self.current_volumes.get_mut(index) {
            Some(slot) => *slot = volume,
            None => self.warn_out_of_range(index),
        }
    }

    /// Write `current × master` to every source in the group
    pub fn apply_master(&self, master: Volume) {
        for (slot, current) in self.sources.iter().zip(&self.current_volumes) {
            if let Some(source) = slot {
                source.set_volume(master.scale(*current));
            }
        }
    }

    fn warn_out_of_range(&self, index: usize) {
        tracing::warn!(
            "Audiogroup {} has no slot {} (len {})",
            self.name,
            index,
            self.sources.len()
        );
    }
}
