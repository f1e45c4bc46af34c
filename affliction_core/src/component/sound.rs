//! Sound cue on apply, on remove, or periodically.

use world_host::{EntityId, GameHost, SoundCue};

use super::{Component, Effect};
use crate::affliction::AfflictionInstance;

#[derive(Debug, Clone, PartialEq)]
pub struct SoundEffect {
    pub cue: SoundCue,
    pub play_on_apply: bool,
    pub play_on_remove: bool,
    /// Scheduler ticks between periodic plays; 0 disables them.
    pub interval: u64,
}

impl SoundEffect {
    pub const DEFAULT_INTERVAL: u64 = 100;

    /// Plays only when neither apply nor remove playback is set.
    pub fn is_periodic(&self) -> bool {
        self.interval > 0 && !self.play_on_apply && !self.play_on_remove
    }

    pub fn into_component(self, id: impl Into<String>) -> Component {
        let interval = self.interval.max(1);
        Component::ticking(id, interval, self)
    }
}

impl Default for SoundEffect {
    fn default() -> Self {
        Self {
            cue: SoundCue {
                sound: SoundCue::DEFAULT_SOUND.to_string(),
                volume: 0.5,
                pitch: 1.0,
            },
            play_on_apply: false,
            play_on_remove: false,
            interval: Self::DEFAULT_INTERVAL,
        }
    }
}

impl Effect for SoundEffect {
    fn on_apply(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        if self.play_on_apply {
            host.play_sound(entity, &self.cue);
        }
    }

    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        if self.is_periodic() {
            host.play_sound(entity, &self.cue);
        }
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        if self.play_on_remove {
            host.play_sound(entity, &self.cue);
        }
    }
}
