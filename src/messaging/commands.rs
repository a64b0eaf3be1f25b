/// Command types for the soundscape
///
/// Commands represent requests to perform actions (imperative).
/// The binary parses them from text lines; the controller applies them.
use std::str::FromStr;

use thiserror::Error;

/// Soundscape commands
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Fade a group in to its configured volumes
    FadeIn { group: String },

    /// Fade a group out to silence
    FadeOut { group: String },

    /// Change master volume
    SetMasterVolume { volume: f32 },

    /// Report group volumes and fade states
    Status,

    /// Stop the tick loop
    Quit,
}

/// Result of applying a command
#[derive(Debug, Clone, PartialEq)]
pub enum CommandResult {
    /// Command applied
    Success,

    /// Command applied and produced a report
    SuccessWithValue(String),

    /// The caller should stop ticking
    Quit,
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum CommandParseError {
    #[error("Empty command")]
    Empty,

    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("Missing argument for {0}")]
    MissingArgument(&'static str),

    #[error("Invalid volume: {0}")]
    InvalidVolume(String),
}

impl Command {
    /// Get a human-readable description of the command
    pub fn description(&self) -> String {
        match self {
            Command::FadeIn { group } => format!("Fade in group: {}", group),
            Command::FadeOut { group } => format!("Fade out group: {}", group),
            Command::SetMasterVolume { volume } => format!("Set master volume: {:.2}", volume),
            Command::Status => "Report status".to_string(),
            Command::Quit => "Quit".to_string(),
        }
    }
}

impl FromStr for Command {
    type Err = CommandParseError;

    /// Parse `in <group>`, `out <group>`, `master <volume>`, `status` or `quit`.
    /// Group names may contain spaces and keep their case.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let line = line.trim();
        let (verb, rest) = match line.split_once(char::is_whitespace) {
            Some((verb, rest)) => (verb, rest.trim()),
            None => (line, ""),
        };

        match verb.to_ascii_lowercase().as_str() {
            "" => Err(CommandParseError::Empty),
            "in" | "fadein" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument("in"));
                }
                Ok(Command::FadeIn {
                    group: rest.to_string(),
                })
            }
            "out" | "fadeout" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument("out"));
                }
                Ok(Command::FadeOut {
                    group: rest.to_string(),
                })
            }
            "master" | "volume" => {
                if rest.is_empty() {
                    return Err(CommandParseError::MissingArgument("master"));
                }
                let volume: f32 = rest
                    .parse()
                    .map_err(|_| CommandParseError::InvalidVolume(rest.to_string()))?;
                if !volume.is_finite() {
                    return Err(CommandParseError::InvalidVolume(rest.to_string()));
                }
                Ok(Command::SetMasterVolume { volume })
            }
            "status" => Ok(Command::Status),
            "quit" | "exit" => Ok(Command::Quit),
            other => Err(CommandParseError::Unknown(other.to_string())),
        }
    }
}
