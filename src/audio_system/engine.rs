/// Fade engine
///
/// Drives every in-flight volume transition. Fades are plain records keyed
/// by source identity and advanced together once per tick.
use std::collections::HashMap;

use super::effects::{FadePolicy, FadeRamp, RetargetMode, Volume};
use super::group::AudioGroup;
use super::source::SourceHandle;
use crate::messaging::{Event, EventBus};

/// Position of a source inside the controller's group list
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GroupSlot {
    /// Index of the group
    pub group: usize,

    /// Index of the source inside the group
    pub index: usize,
}

impl GroupSlot {
    pub fn new(group: usize, index: usize) -> Self {
        Self { group, index }
    }
}

/// Fade lifecycle of a single source
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FadeState {
    /// No transition in progress
    Idle,

    /// A fade is active
    Fading,
}

#[derive(Debug)]
struct Fade {
    /// Latest requested target
    requested: f32,
    slot: Option<GroupSlot>,
    ramp: FadeRamp,
    /// Whether the current ramp already ran its first step
    started: bool,
    /// Last pre-master level written
    level: f32,
}

impl Fade {
    /// Pre-master level the source is at right now
    fn current_level(&self, groups: &[AudioGroup]) -> f32 {
        self.slot
            .and_then(|slot| groups.get(slot.group)?.current_volume(slot.index))
            .unwrap_or(self.level)
    }

    /// Advance one tick; returns `true` once the fade completed
    fn step(
        &mut self,
        source: &SourceHandle,
        dt: f32,
        policy: &FadePolicy,
        master: Volume,
        groups: &mut [AudioGroup],
    ) -> bool {
        if self.requested != self.ramp.target() {
            let from = self.current_level(groups);
            tracing::debug!(
                "Restarting fade of {} from {:.3} towards {:.3}",
                source,
                from,
                self.requested
            );
            self.ramp = FadeRamp::new(from, self.requested);
            self.started = false;
        }

        if !self.started {
            if !source.is_playing() && self.ramp.target() > 0.0 {
                source.play();
            }
            self.started = true;
        }

        self.ramp.advance(dt, policy.fade_time);
        let level = self.ramp.level();
        self.level = level;

        let output = match self.slot {
            Some(slot) => {
                match groups.get_mut(slot.group) {
                    Some(group) => group.set_current_volume(slot.index, level),
                    None => tracing::warn!("Fade of {} refers to missing group {}", source, slot.group),
                }
                master.scale(level)
            }
            None if policy.scale_ungrouped => master.scale(level),
            None => level,
        };
        source.set_volume(output);

        if !self.ramp.is_complete() {
            return false;
        }

        if self.ramp.target() <= 0.0 {
            source.pause();
        }
        true
    }
}

/// Scheduler for all active fades.
///
/// At most one fade exists per source. A request for a source that is
/// already fading replaces its target instead of adding a second fade.
pub struct FadeEngine {
    policy: FadePolicy,
    master: Volume,
    active: HashMap<SourceHandle, Fade>,
    events: EventBus,
}

impl FadeEngine {
    /// Create an engine with full master volume
    pub fn new(policy: FadePolicy, events: EventBus) -> Self {
        if !(policy.fade_time.is_finite() && policy.fade_time > 0.0) {
            tracing::warn!(
                "Fade time {} is not positive; fades will complete immediately",
                policy.fade_time
            );
        }

        Self {
            policy,
            master: Volume::FULL,
            active: HashMap::new(),
            events,
        }
    }

    pub fn policy(&self) -> &FadePolicy {
        &self.policy
    }

    pub fn master_volume(&self) -> f32 {
        self.master.level()
    }

    /// Fade `source` towards `target`.
    ///
    /// `slot` ties the fade to a group so progress is cached there and the
    /// output is scaled by master volume.
    pub fn request_fade(
        &mut self,
        source: &SourceHandle,
        target: f32,
        slot: Option<GroupSlot>,
        groups: &[AudioGroup],
    ) {
        let target = Volume::new(target).level();
        let group_name = slot
            .and_then(|slot| groups.get(slot.group))
            .map(|group| group.name().to_string());

        if let Some(fade) = self.active.get_mut(source) {
            fade.requested = target;
            if self.policy.retarget == RetargetMode::Continue {
                fade.ramp.retarget(target);
            }
            tracing::debug!("Retargeted fade of {} to {:.3}", source, target);
            self.events.publish(Event::FadeRetargeted {
                source: source.label().to_string(),
                group: group_name,
                target,
            });
            return;
        }

        let start = match slot.and_then(|slot| groups.get(slot.group)?.current_volume(slot.index)) {
            Some(cached) => cached,
            None => {
                if slot.is_some() {
                    tracing::warn!("Fade of {} has no cached group volume; using live volume", source);
                }
                self.unscaled_live_volume(source)
            }
        };

        tracing::debug!("Fading {} from {:.3} to {:.3}", source, start, target);
        self.active.insert(
            source.clone(),
            Fade {
                requested: target,
                slot,
                ramp: FadeRamp::new(start, target),
                started: false,
                level: start,
            },
        );
        self.events.publish(Event::FadeStarted {
            source: source.label().to_string(),
            group: group_name,
            from: start,
            target,
        });
    }

    /// Advance every active fade by `dt` seconds, dropping the ones that finished
    pub fn tick(&mut self, dt: f32, groups: &mut [AudioGroup]) {
        let Self {
            policy,
            master,
            active,
            events,
        } = self;

        active.retain(|source, fade| {
            if !fade.step(source, dt, policy, *master, groups) {
                return true;
            }

            let group = fade
                .slot
                .and_then(|slot| groups.get(slot.group))
                .map(|group| group.name().to_string());
            tracing::debug!("Fade of {} completed at {:.3}", source, fade.level);
            events.publish(Event::FadeCompleted {
                source: source.label().to_string(),
                group,
                volume: fade.level,
            });
            false
        });
    }

    /// Clamp and store master volume, then rescale every actively fading
    /// grouped source (and ungrouped ones when the policy says so)
    pub fn set_master_volume(&mut self, volume: f32, groups: &[AudioGroup]) {
        self.master = Volume::new(volume);

        for (source, fade) in &self.active {
            match fade.slot {
                Some(_) => source.set_volume(self.master.scale(fade.current_level(groups))),
                None if self.policy.scale_ungrouped => {
                    source.set_volume(self.master.scale(fade.level))
                }
                None => {}
            }
        }
    }

    pub fn state_of(&self, source: &SourceHandle) -> FadeState {
        if self.active.contains_key(source) {
            FadeState::Fading
        } else {
            FadeState::Idle
        }
    }

    pub fn is_fading(&self, source: &SourceHandle) -> bool {
        self.state_of(source) == FadeState::Fading
    }

    /// Target the source is currently fading towards
    pub fn target_of(&self, source: &SourceHandle) -> Option<f32> {
        self.active.get(source).map(|fade| fade.requested)
    }

    pub fn active_count(&self) -> usize {
        self.active.len()
    }

    /// Drop every in-flight fade, leaving sources where they are
    pub fn clear(&mut self) {
        if !self.active.is_empty() {
            tracing::debug!("Dropping {} active fades", self.active.len());
        }
        self.active.clear();
    }

    fn unscaled_live_volume(&self, source: &SourceHandle) -> f32 {
        let live = source.volume();
        if !self.policy.scale_ungrouped {
            return live;
        }
        if self.master.is_muted() {
            0.0
        } else {
            (live / self.master.level()).min(1.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio_system::source::{MemorySource, VolumeSource};
    use std::sync::Arc;

    const DT: f32 = 0.1;

    fn grouped(volumes: &[f32]) -> (Vec<Arc<MemorySource>>, Vec<AudioGroup>) {
        let mut sources = Vec::new();
        let mut handles = Vec::new();
        for (i, volume) in volumes.iter().enumerate() {
            let (source, handle) = MemorySource::shared(format!("s{}", i), *volume);
            sources.push(source);
            handles.push(handle);
        }
        let mut group = AudioGroup::with_sources("Ambience", handles);
        group.initialize();
        (sources, vec![group])
    }

    fn handle(groups: &[AudioGroup], index: usize) -> SourceHandle {
        groups[0].source(index).cloned().unwrap()
    }

    fn engine(policy: FadePolicy) -> FadeEngine {
        FadeEngine::new(policy, EventBus::new())
    }

    #[test]
    fn test_second_request_keeps_single_entry() {
        let (_sources, groups) = grouped(&[0.8]);
        let mut engine = engine(FadePolicy::new(1.0));
        let source = handle(&groups, 0);

        engine.request_fade(&source, 0.8, Some(GroupSlot::new(0, 0)), &groups);
        assert_eq!(engine.active_count(), 1);
        engine.request_fade(&source, 0.2, Some(GroupSlot::new(0, 0)), &groups);
        assert_eq!(engine.active_count(), 1);
        assert_eq!(engine.target_of(&source), Some(0.2));
        assert_eq!(engine.state_of(&source), FadeState::Fading);
    }

    #[test]
    fn test_fade_in_plays_and_completes_exactly() {
        let (sources, mut groups) = grouped(&[0.8]);
        let mut engine = engine(FadePolicy::new(1.0));
        let source = handle(&groups, 0);

        engine.request_fade(&source, 0.8, Some(GroupSlot::new(0, 0)), &groups);
        engine.tick(DT, &mut groups);
        assert_eq!(sources[0].play_calls(), 1);
        assert!(sources[0].is_playing());

        for _ in 0..20 {
            engine.tick(DT, &mut groups);
        }
        assert_eq!(engine.active_count(), 0);
        assert_eq!(groups[0].current_volume(0), Some(0.8));
        assert_eq!(sources[0].volume(), 0.8);
        assert_eq!(sources[0].pause_calls(), 0);
        assert_eq!(engine.state_of(&source), FadeState::Idle);
    }

    #[test]
    fn test_fade_to_zero_pauses_once() {
        let (sources, mut groups) = grouped(&[0.5]);
        let mut engine = engine(FadePolicy::new(0.5));
        let source = handle(&groups, 0);

        engine.request_fade(&source, 0.0, Some(GroupSlot::new(0, 0)), &groups);
        for _ in 0..10 {
            engine.tick(DT, &mut groups);
        }
        assert_eq!(sources[0].pause_calls(), 1);
        assert_eq!(sources[0].play_calls(), 0);
        assert_eq!(sources[0].volume(), 0.0);
    }

    #[test]
    fn test_restart_retarget_is_continuous() {
        let (sources, mut groups) = grouped(&[1.0]);
        let mut engine = engine(FadePolicy::new(1.0));
        let source = handle(&groups, 0);

        engine.request_fade(&source, 1.0, Some(GroupSlot::new(0, 0)), &groups);
        for _ in 0..5 {
            engine.tick(DT, &mut groups);
        }
        let before = groups[0].current_volume(0).unwrap();
        assert!((before - 0.5).abs() < 1e-4);

        engine.request_fade(&source, 0.0, Some(GroupSlot::new(0, 0)), &groups);
        engine.tick(DT, &mut groups);
        let after = groups[0].current_volume(0).unwrap();

        // one tick of the new ramp: 0.5 -> 0.0 over 1s, 0.1s in
        assert!((after - 0.45).abs() < 1e-4);
        assert!((before - after).abs() <= 0.1 + 1e-4);

        for _ in 0..10 {
            engine.tick(DT, &mut groups);
        }
        assert_eq!(engine.active_count(), 0);
        assert_eq!(sources[0].volume(), 0.0);
        assert_eq!(sources[0].pause_calls(), 1);
    }

    #[test]
    fn test_continue_retarget_keeps_progress() {
        let (_sources, mut groups) = grouped(&[1.0]);
        let mut engine = engine(FadePolicy::new(1.0).with_retarget(RetargetMode::Continue));
        let source = handle(&groups, 0);

        engine.request_fade(&source, 1.0, Some(GroupSlot::new(0, 0)), &groups);
        for _ in 0..5 {
            engine.tick(DT, &mut groups);
        }
        engine.request_fade(&source, 0.5, Some(GroupSlot::new(0, 0)), &groups);
        engine.tick(DT, &mut groups);

        // lerp(0.0, 0.5, 0.6): the original start is kept
        let level = groups[0].current_volume(0).unwrap();
        assert!((level - 0.3).abs() < 1e-4);

        for _ in 0..6 {
            engine.tick(DT, &mut groups);
        }
        assert_eq!(engine.active_count(), 0);
        assert_eq!(groups[0].current_volume(0), Some(0.5));
    }

    #[test]
    fn test_master_volume_scales_grouped_output() {
        let (sources, mut groups) = grouped(&[0.8]);
        let mut engine = engine(FadePolicy::new(1.0));
        let source = handle(&groups, 0);

        engine.set_master_volume(0.5, &groups);
        engine.request_fade(&source, 0.8, Some(GroupSlot::new(0, 0)), &groups);
        for _ in 0..5 {
            engine.tick(DT, &mut groups);
        }
        let cached = groups[0].current_volume(0).unwrap();
        assert!((sources[0].volume() - cached * 0.5).abs() < 1e-6);

        engine.set_master_volume(0.0, &groups);
        assert_eq!(sources[0].volume(), 0.0);
        assert_eq!(groups[0].current_volume(0), Some(cached));
    }

    #[test]
    fn test_master_volume_is_clamped() {
        let mut engine = engine(FadePolicy::default());
        engine.set_master_volume(3.0, &[]);
        assert_eq!(engine.master_volume(), 1.0);
        engine.set_master_volume(-1.0, &[]);
        assert_eq!(engine.master_volume(), 0.0);
    }

    #[test]
    fn test_ungrouped_ignores_master_by_default() {
        let (source, handle) = MemorySource::shared("ui", 0.0);
        let mut engine = engine(FadePolicy::new(1.0));
        let mut groups = Vec::new();

        engine.set_master_volume(0.5, &groups);
        engine.request_fade(&handle, 0.6, None, &groups);
        for _ in 0..11 {
            engine.tick(DT, &mut groups);
        }
        assert_eq!(source.volume(), 0.6);
    }

    #[test]
    fn test_ungrouped_scaled_when_enabled() {
        let (source, handle) = MemorySource::shared("ui", 0.0);
        let mut engine = engine(FadePolicy::new(1.0).with_scale_ungrouped(true));
        let mut groups = Vec::new();

        engine.set_master_volume(0.5, &groups);
        engine.request_fade(&handle, 0.6, None, &groups);
        for _ in 0..11 {
            engine.tick(DT, &mut groups);
        }
        assert!((source.volume() - 0.3).abs() < 1e-6);
    }

    #[test]
    fn test_zero_fade_time_completes_on_next_tick() {
        let (sources, mut groups) = grouped(&[0.7]);
        let mut engine = engine(FadePolicy::new(0.0));
        let source = handle(&groups, 0);

        engine.request_fade(&source, 0.7, Some(GroupSlot::new(0, 0)), &groups);
        engine.tick(0.0, &mut groups);
        assert_eq!(engine.active_count(), 0);
        assert_eq!(sources[0].volume(), 0.7);
    }

    #[test]
    fn test_events_follow_lifecycle() {
        let (_sources, mut groups) = grouped(&[0.8]);
        let bus = EventBus::new();
        let (rx, _id) = bus.subscribe();
        let mut engine = FadeEngine::new(FadePolicy::new(0.2), bus);
        let source = handle(&groups, 0);

        engine.request_fade(&source, 0.8, Some(GroupSlot::new(0, 0)), &groups);
        engine.request_fade(&source, 0.4, Some(GroupSlot::new(0, 0)), &groups);
        for _ in 0..5 {
            engine.tick(DT, &mut groups);
        }

        assert!(matches!(rx.try_recv(), Ok(Event::FadeStarted { .. })));
        assert!(matches!(rx.try_recv(), Ok(Event::FadeRetargeted { .. })));
        match rx.try_recv() {
            Ok(Event::FadeCompleted { group, volume, .. }) => {
                assert_eq!(group.as_deref(), Some("Ambience"));
                assert_eq!(volume, 0.4);
            }
            other => panic!("unexpected event: {:?}", other),
        }
    }

    #[test]
    fn test_clear_drops_fades() {
        let (_sources, groups) = grouped(&[0.8, 0.5]);
        let mut engine = engine(FadePolicy::default());
        engine.request_fade(&handle(&groups, 0), 0.8, Some(GroupSlot::new(0, 0)), &groups);
        engine.request_fade(&handle(&groups, 1), 0.5, Some(GroupSlot::new(0, 1)), &groups);
        assert_eq!(engine.active_count(), 2);

        engine.clear();
        assert_eq!(engine.active_count(), 0);
    }
}
