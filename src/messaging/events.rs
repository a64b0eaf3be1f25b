/// Event types for the soundscape
///
/// Events represent things that have happened (past tense).
/// They are broadcast to all subscribers.

/// Soundscape events
#[derive(Debug, Clone, PartialEq)]
pub enum Event {
    /// A source started fading
    FadeStarted {
        source: String,
        group: Option<String>,
        from: f32,
        target: f32,
    },

    /// An in-flight fade got a new target
    FadeRetargeted {
        source: String,
        group: Option<String>,
        target: f32,
    },

    /// A fade reached its target and was removed
    FadeCompleted {
        source: String,
        group: Option<String>,
        volume: f32,
    },

    /// Master volume changed
    MasterVolumeChanged { volume: f32 },

    /// A fade was requested for a group that does not exist
    UnknownGroup { name: String },

    /// The controller is shutting down
    Shutdown,
}

impl Event {
    /// Get a human-readable description of the event
    pub fn description(&self) -> String {
        match self {
            Event::FadeStarted {
                source,
                group,
                from,
                target,
            } => format!(
                "Fade started: {}{} {:.2} -> {:.2}",
                source,
                in_group(group),
                from,
                target
            ),
            Event::FadeRetargeted {
                source,
                group,
                target,
            } => format!("Fade retargeted: {}{} -> {:.2}", source, in_group(group), target),
            Event::FadeCompleted {
                source,
                group,
                volume,
            } => format!("Fade completed: {}{} at {:.2}", source, in_group(group), volume),
            Event::MasterVolumeChanged { volume } => format!("Master volume: {:.2}", volume),
            Event::UnknownGroup { name } => format!("No audiogroup by name {}", name),
            Event::Shutdown => "Shutting down".to_string(),
        }
    }
}

fn in_group(group: &Option<String>) -> String {
    match group {
        Some(name) => format!(" ({})", name),
        None => String::new(),
    }
}
