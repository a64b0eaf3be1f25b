/// Soundscape controller
///
/// Owns the audio groups and the fade engine, and exposes the fade and
/// volume API used by game logic.
use std::collections::HashMap;
use std::fmt::Write as _;

use super::effects::{FadePolicy, Volume};
use super::engine::{FadeEngine, FadeState, GroupSlot};
use super::group::AudioGroup;
use super::source::SourceHandle;
use crate::messaging::{Command, CommandResult, Event, EventBus};

/// Per-source snapshot used by status reports
#[derive(Debug, Clone, PartialEq)]
pub struct SourceStatus {
    pub label: Option<String>,
    pub target: f32,
    pub current: f32,
    pub state: FadeState,
}

/// Per-group snapshot used by status reports
#[derive(Debug, Clone, PartialEq)]
pub struct GroupStatus {
    pub name: String,
    pub sources: Vec<SourceStatus>,
}

/// Context object for the whole soundscape.
///
/// Construct one at startup, call [`tick`](Self::tick) once per frame and
/// [`shutdown`](Self::shutdown) when leaving.
pub struct SoundscapeController {
    groups: Vec<AudioGroup>,
    by_name: HashMap<String, usize>,
    engine: FadeEngine,
    events: EventBus,
}

impl SoundscapeController {
    /// Take ownership of `groups` and initialize each one.
    ///
    /// Group names are matched case-sensitively; when a name repeats, the
    /// first group keeps it.
    pub fn new(policy: FadePolicy, mut groups: Vec<AudioGroup>) -> Self {
        let events = EventBus::new();
        let mut by_name = HashMap::new();

        for (index, group) in groups.iter_mut().enumerate() {
            group.initialize();
            if by_name.contains_key(group.name()) {
                tracing::warn!(
                    "Duplicate audiogroup name {}; only the first one is reachable by name",
                    group.name()
                );
                continue;
            }
            by_name.insert(group.name().to_string(), index);
        }

        tracing::info!(
            "Soundscape ready: {} groups, fade time {}s",
            groups.len(),
            policy.fade_time
        );

        Self {
            groups,
            by_name,
            engine: FadeEngine::new(policy, events.clone()),
            events,
        }
    }

    /// Fade in the first configured group, if any
    pub fn start(&mut self) {
        if self.groups.is_empty() {
            tracing::debug!("No audiogroups configured; nothing to fade in");
            return;
        }
        self.fade_in_group_at(0);
    }

    /// Fade every source of `name` to its configured volume
    pub fn fade_in_group(&mut self, name: &str) {
        match self.by_name.get(name) {
            Some(&index) => self.fade_in_group_at(index),
            None => self.unknown_group(name),
        }
    }

    /// Fade every source of `name` to silence
    pub fn fade_out_group(&mut self, name: &str) {
        match self.by_name.get(name) {
            Some(&index) => self.fade_out_group_at(index),
            None => self.unknown_group(name),
        }
    }

    /// Fade a single source outside of any group
    pub fn fade_source_to(&mut self, source: &SourceHandle, volume: f32) {
        self.engine.request_fade(source, volume, None, &self.groups);
    }

    /// Clamp and apply master volume to every grouped source, idle or fading
    pub fn set_master_volume(&mut self, volume: f32) {
        self.engine.set_master_volume(volume, &self.groups);

        let master = Volume::new(self.engine.master_volume());
        for group in &self.groups {
            group.apply_master(master);
        }

        tracing::debug!("Master volume set to {:.3}", master.level());
        self.events.publish(Event::MasterVolumeChanged {
            volume: master.level(),
        });
    }

    /// Advance all fades by `dt` seconds
    pub fn tick(&mut self, dt: f32) {
        self.engine.tick(dt, &mut self.groups);
    }

    pub fn master_volume(&self) -> f32 {
        self.engine.master_volume()
    }

    pub fn fade_time(&self) -> f32 {
        self.engine.policy().fade_time
    }

    pub fn group(&self, name: &str) -> Option<&AudioGroup> {
        self.by_name.get(name).map(|&index| &self.groups[index])
    }

    pub fn groups(&self) -> &[AudioGroup] {
        &self.groups
    }

    pub fn group_names(&self) -> impl Iterator<Item = &str> {
        self.groups.iter().map(AudioGroup::name)
    }

    pub fn engine(&self) -> &FadeEngine {
        &self.engine
    }

    pub fn is_fading(&self, source: &SourceHandle) -> bool {
        self.engine.is_fading(source)
    }

    /// Event bus carrying fade lifecycle events
    pub fn events(&self) -> &EventBus {
        &self.events
    }

    /// Snapshot of every group's volumes and fade states
    pub fn status(&self) -> Vec<GroupStatus> {
        self.groups
            .iter()
            .map(|group| GroupStatus {
                name: group.name().to_string(),
                sources: group
                    .sources()
                    .enumerate()
                    .map(|(index, slot)| SourceStatus {
                        label: slot.map(|source| source.label().to_string()),
                        target: group.target_volumes()[index],
                        current: group.current_volumes()[index],
                        state: slot
                            .map(|source| self.engine.state_of(source))
                            .unwrap_or(FadeState::Idle),
                    })
                    .collect(),
            })
            .collect()
    }

    /// Apply a parsed command
    pub fn apply(&mut self, command: Command) -> CommandResult {
        tracing::info!("Executing command: {}", command.description());

        match command {
            Command::FadeIn { group } => {
                self.fade_in_group(&group);
                CommandResult::Success
            }
            Command::FadeOut { group } => {
                self.fade_out_group(&group);
                CommandResult::Success
            }
            Command::SetMasterVolume { volume } => {
                self.set_master_volume(volume);
                CommandResult::Success
            }
            Command::Status => CommandResult::SuccessWithValue(self.status_report()),
            Command::Quit => CommandResult::Quit,
        }
    }

    /// Drop in-flight fades and notify subscribers
    pub fn shutdown(&mut self) {
        self.engine.clear();
        self.events.publish(Event::Shutdown);
        tracing::info!("Soundscape shut down");
    }

    fn fade_in_group_at(&mut self, group_index: usize) {
        let group = &self.groups[group_index];
        let mut requests = Vec::with_capacity(group.len());

        for (index, slot) in group.sources().enumerate() {
            match (slot, group.target_volume(index)) {
                (Some(source), Some(target)) => requests.push((source.clone(), target, index)),
                _ => tracing::warn!("Audiogroup {} isn't set up properly", group.name()),
            }
        }

        tracing::debug!("Fading in audiogroup {}", group.name());
        for (source, target, index) in requests {
            self.engine.request_fade(
                &source,
                target,
                Some(GroupSlot::new(group_index, index)),
                &self.groups,
            );
        }
    }

    fn fade_out_group_at(&mut self, group_index: usize) {
        let group = &self.groups[group_index];
        let requests: Vec<(SourceHandle, usize)> = group
            .sources()
            .enumerate()
            .filter_map(|(index, slot)| slot.map(|source| (source.clone(), index)))
            .collect();

        tracing::debug!("Fading out audiogroup {}", group.name());
        for (source, index) in requests {
            self.engine.request_fade(
                &source,
                0.0,
                Some(GroupSlot::new(group_index, index)),
                &self.groups,
            );
        }
    }

    fn unknown_group(&self, name: &str) {
        tracing::warn!("No audiogroup by name {}", name);
        self.events.publish(Event::UnknownGroup {
            name: name.to_string(),
        });
    }

    fn status_report(&self) -> String {
        let mut report = format!("master {:.2}", self.master_volume());
        for group in self.status() {
            let _ = write!(report, "\n{}:", group.name);
            for source in group.sources {
                let _ = write!(
                    report,
                    " [{} {:.2}/{:.2}{}]",
                    source.label.as_deref().unwrap_or("<missing>"),
                    source.current,
                    source.target,
                    if source.state == FadeState::Fading { " fading" } else { "" }
                );
            }
        }
        report
    }
}
