use thiserror::Error;

/// Errors raised by the I/O facing layers (configuration files and audio output).
///
/// Fade operations themselves never fail: misconfigured groups and unknown
/// group names are logged and skipped. Only loading configuration and
/// opening audio sources can produce one of these.

#[derive(Error, Debug)]
pub enum AudioError {
    #[error("Audio file not found: {path}")]
    NotFound { path: String },

    #[error("Failed to open audio file: {path}")]
    OpenFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to decode audio file: {path}")]
    DecodeFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Failed to initialize audio output stream")]
    StreamInitFailed(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("Failed to create playback sink")]
    SinkFailed(#[source] Box<dyn std::error::Error + Send + Sync>),
}

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load configuration from {path}")]
    LoadFailed {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse configuration from {path}")]
    ParseFailed {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Failed to save configuration to {path}")]
    SaveFailed {
        path: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}

/// Top-level error for the soundscape crate.
#[derive(Error, Debug)]
pub enum SoundscapeError {
    #[error(transparent)]
    Audio(#[from] AudioError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

/// Type alias for application Results using anyhow for context chaining
pub type AppResult<T> = anyhow::Result<T>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::error::Error as _;

    #[test]
    fn test_error_display() {
        let err = ConfigError::Invalid("fade_time_secs must be positive".to_string());
        assert_eq!(
            err.to_string(),
            "Invalid configuration: fade_time_secs must be positive"
        );

        let err = AudioError::NotFound {
            path: "wind.ogg".to_string(),
        };
        assert_eq!(err.to_string(), "Audio file not found: wind.ogg");
    }

    #[test]
    fn test_error_source_chain() {
        use std::io;

        let io_err = io::Error::new(io::ErrorKind::NotFound, "file not found");
        let config_err = ConfigError::LoadFailed {
            path: "/test/soundscape.json".to_string(),
            source: io_err,
        };

        assert!(config_err.source().is_some());
        assert_eq!(
            config_err.to_string(),
            "Failed to load configuration from /test/soundscape.json"
        );
    }

    #[test]
    fn test_transparent_wrapping() {
        let err: SoundscapeError = ConfigError::Invalid("empty group name".to_string()).into();
        assert_eq!(err.to_string(), "Invalid configuration: empty group name");
        assert!(matches!(err, SoundscapeError::Config(_)));
    }
}
