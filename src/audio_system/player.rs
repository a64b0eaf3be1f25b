/// Sink-backed audio source
///
/// Plays a single audio file through rodio and exposes it as a `VolumeSource`.
use std::fs::File;
use std::io::BufReader;
use std::path::Path;

use rodio::{Decoder, OutputStreamHandle, Sink};

use super::source::VolumeSource;
use crate::error::AudioError;

/// Audio file playing on its own rodio sink.
///
/// The sink is created paused at the requested volume, so the owning group
/// can capture that volume as its target before any fade starts.
pub struct SinkSource {
    label: String,
    sink: Sink,
}

impl SinkSource {
    /// Decode `path` onto a new sink of `stream_handle`
    pub fn open(
        stream_handle: &OutputStreamHandle,
        path: &Path,
        volume: f32,
        looped: bool,
    ) -> Result<Self, AudioError> {
        let display = path.display().to_string();
        if !path.exists() {
            return Err(AudioError::NotFound { path: display });
        }

        let file = File::open(path).map_err(|source| AudioError::OpenFailed {
            path: display.clone(),
            source,
        })?;
        let reader = BufReader::new(file);

        let sink = Sink::try_new(stream_handle).map_err(|e| AudioError::SinkFailed(Box::new(e)))?;
        sink.pause();
        sink.set_volume(volume.clamp(0.0, 1.0));

        // Each branch yields a different source type, so append inside the match
        if looped {
            let decoder = Decoder::new_looped(reader).map_err(|e| AudioError::DecodeFailed {
                path: display.clone(),
                source: Box::new(e),
            })?;
            sink.append(decoder);
        } else {
            let decoder = Decoder::new(reader).map_err(|e| AudioError::DecodeFailed {
                path: display.clone(),
                source: Box::new(e),
            })?;
            sink.append(decoder);
        }

        let label = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or(display);

        tracing::debug!(
            "Opened audio source {} (volume={}, looped={})",
            label,
            volume,
            looped
        );

        Ok(Self { label, sink })
    }
}

impl VolumeSource for SinkSource {
    fn volume(&self) -> f32 {
        self.sink.volume()
    }

    fn set_volume(&self, volume: f32) {
        self.sink.set_volume(volume.clamp(0.0, 1.0));
    }

    fn play(&self) {
        tracing::debug!("Playing audio: {}", self.label);
        self.sink.play();
    }

    fn pause(&self) {
        tracing::debug!("Pausing audio: {}", self.label);
        self.sink.pause();
    }

    fn is_playing(&self) -> bool {
        !self.sink.is_paused() && !self.sink.empty()
    }

    fn label(&self) -> &str {
        &self.label
    }
}
