use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

use crate::audio_system::{FadePolicy, RetargetMode};
use crate::error::ConfigError;

const CONFIG_FILE_NAME: &str = "soundscape.json";

fn default_fade_time() -> f32 {
    1.0
}

fn default_master_volume() -> f32 {
    1.0
}

fn default_tick_rate() -> u32 {
    60
}

fn default_source_volume() -> f32 {
    1.0
}

fn default_looped() -> bool {
    true
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SourceEntry {
    /// Audio file, relative to the config file's directory unless absolute
    pub path: String,

    /// Volume the source fades in to (0.0-1.0)
    #[serde(default = "default_source_volume")]
    pub volume: f32,

    /// Restart the file when it ends
    #[serde(default = "default_looped")]
    pub looped: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupEntry {
    pub name: String,

    #[serde(default)]
    pub sources: Vec<SourceEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Duration of a full fade in seconds
    #[serde(default = "default_fade_time")]
    pub fade_time_secs: f32,

    /// Master volume applied at startup (0.0-1.0)
    #[serde(default = "default_master_volume")]
    pub master_volume: f32,

    /// Tick loop frequency of the binary
    #[serde(default = "default_tick_rate")]
    pub tick_rate_hz: u32,

    /// Behaviour when a fade is retargeted mid-flight
    #[serde(default)]
    pub retarget: RetargetMode,

    /// Apply master volume to fades started outside of groups
    #[serde(default)]
    pub scale_ungrouped: bool,

    /// Audio groups; the first one fades in at startup
    #[serde(default)]
    pub groups: Vec<GroupEntry>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            fade_time_secs: default_fade_time(),
            master_volume: default_master_volume(),
            tick_rate_hz: default_tick_rate(),
            retarget: RetargetMode::default(),
            scale_ungrouped: false,
            groups: Vec::new(),
        }
    }
}

impl Config {
    /// Load and validate configuration from `path`
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let path_str = path.display().to_string();
        let content = fs::read_to_string(path).map_err(|source| ConfigError::LoadFailed {
            path: path_str.clone(),
            source,
        })?;
        let config: Config = serde_json::from_str(&content).map_err(|source| {
            ConfigError::ParseFailed {
                path: path_str.clone(),
                source,
            }
        })?;

        config.validate()?;
        tracing::info!(
            "Loaded config from {} ({} groups)",
            path_str,
            config.groups.len()
        );
        Ok(config)
    }

    /// Save configuration to `path`, creating parent directories
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        let save_failed = |source: Box<dyn std::error::Error + Send + Sync>| ConfigError::SaveFailed {
            path: path.display().to_string(),
            source,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).map_err(|e| save_failed(Box::new(e)))?;
        }

        let json = serde_json::to_string_pretty(self).map_err(|e| save_failed(Box::new(e)))?;
        fs::write(path, json).map_err(|e| save_failed(Box::new(e)))?;

        Ok(())
    }

    /// Reject values the fade engine cannot work with
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fade_time_secs.is_finite() && self.fade_time_secs > 0.0) {
            return Err(ConfigError::Invalid(format!(
                "fade_time_secs must be positive, got {}",
                self.fade_time_secs
            )));
        }
        if !(0.0..=1.0).contains(&self.master_volume) {
            return Err(ConfigError::Invalid(format!(
                "master_volume must be within 0.0-1.0, got {}",
                self.master_volume
            )));
        }
        if self.tick_rate_hz == 0 {
            return Err(ConfigError::Invalid("tick_rate_hz must be at least 1".to_string()));
        }

        for (index, group) in self.groups.iter().enumerate() {
            if group.name.trim().is_empty() {
                return Err(ConfigError::Invalid(format!("group {} has an empty name", index)));
            }
            if self.groups[..index].iter().any(|g| g.name == group.name) {
                tracing::warn!("Audiogroup name {} is used more than once", group.name);
            }
            for source in &group.sources {
                if !(0.0..=1.0).contains(&source.volume) {
                    return Err(ConfigError::Invalid(format!(
                        "source {} in group {} has volume {} outside 0.0-1.0",
                        source.path, group.name, source.volume
                    )));
                }
            }
        }

        Ok(())
    }

    /// Fade engine settings described by this config
    pub fn fade_policy(&self) -> FadePolicy {
        FadePolicy::new(self.fade_time_secs)
            .with_retarget(self.retarget)
            .with_scale_ungrouped(self.scale_ungrouped)
    }

    /// Default config location: `<config dir>/Soundscape/soundscape.json`
    pub fn default_path() -> PathBuf {
        dirs::config_dir()
            .map(|dir| dir.join("Soundscape"))
            .unwrap_or_else(|| PathBuf::from("."))
            .join(CONFIG_FILE_NAME)
    }

    /// Resolve a source path against the directory holding the config file
    pub fn resolve_source_path(config_path: &Path, source: &SourceEntry) -> PathBuf {
        let path = Path::new(&source.path);
        if path.is_absolute() {
            return path.to_path_buf();
        }
        config_path
            .parent()
            .map(|dir| dir.join(path))
            .unwrap_or_else(|| path.to_path_buf())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Config {
        Config {
            groups: vec![GroupEntry {
                name: "Ambience".to_string(),
                sources: vec![
                    SourceEntry {
                        path: "wind.ogg".to_string(),
                        volume: 0.8,
                        looped: true,
                    },
                    SourceEntry {
                        path: "birds.ogg".to_string(),
                        volume: 0.5,
                        looped: true,
                    },
                ],
            }],
            ..Config::default()
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.fade_time_secs, 1.0);
        assert_eq!(config.master_volume, 1.0);
        assert_eq!(config.tick_rate_hz, 60);
        assert_eq!(config.retarget, RetargetMode::Restart);
        assert!(!config.scale_ungrouped);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_minimal_json_uses_defaults() {
        let json = r#"{ "groups": [ { "name": "Music", "sources": [ { "path": "a.mp3" } ] } ] }"#;
        let config: Config = serde_json::from_str(json).unwrap();

        assert_eq!(config.fade_time_secs, 1.0);
        assert_eq!(config.groups[0].sources[0].volume, 1.0);
        assert!(config.groups[0].sources[0].looped);
    }

    #[test]
    fn test_retarget_mode_from_json() {
        let json = r#"{ "retarget": "continue", "scale_ungrouped": true }"#;
        let config: Config = serde_json::from_str(json).unwrap();
        let policy = config.fade_policy();

        assert_eq!(policy.retarget, RetargetMode::Continue);
        assert!(policy.scale_ungrouped);
    }

    #[test]
    fn test_validation_rejects_bad_values() {
        let mut config = sample();
        config.fade_time_secs = 0.0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));

        let mut config = sample();
        config.master_volume = 1.5;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.groups[0].sources[1].volume = -0.1;
        assert!(config.validate().is_err());

        let mut config = sample();
        config.groups[0].name = "  ".to_string();
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load() {
        let dir = std::env::temp_dir().join(format!("soundscape-config-{}", std::process::id()));
        let path = dir.join("soundscape.json");

        let config = sample();
        config.save(&path).unwrap();
        let loaded = Config::load(&path).unwrap();
        let _ = fs::remove_dir_all(&dir);

        assert_eq!(loaded, config);
    }

    #[test]
    fn test_load_missing_file() {
        let result = Config::load(Path::new("/definitely/not/here/soundscape.json"));
        assert!(matches!(result, Err(ConfigError::LoadFailed { .. })));
    }

    #[test]
    fn test_resolve_source_path() {
        let entry = SourceEntry {
            path: "sounds/wind.ogg".to_string(),
            volume: 0.8,
            looped: true,
        };
        let resolved = Config::resolve_source_path(Path::new("/games/demo/soundscape.json"), &entry);
        assert_eq!(resolved, PathBuf::from("/games/demo/sounds/wind.ogg"));
    }
}
