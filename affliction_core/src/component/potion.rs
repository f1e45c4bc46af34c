//! Level-scaled timed effect (potion-like buff or debuff).

use world_host::{EffectType, EntityId, GameHost, TimedEffect};

use super::{level_scaled, Component, Effect};
use crate::affliction::AfflictionInstance;

/// Host ticks each application lasts.
pub const EFFECT_DURATION_TICKS: u32 = 100;

/// Re-apply once the running effect has this many ticks or fewer left.
pub const REAPPLY_THRESHOLD_TICKS: u32 = 40;

/// Keeps one timed effect on the entity while the affliction (or its trigger) is active.
#[derive(Debug, Clone, PartialEq)]
pub struct ScaledEffect {
    pub effect_type: EffectType,
    pub base_amplifier: i32,
    pub level_scaling: f64,
    pub ambient: bool,
    pub particles: bool,
    pub icon: bool,
}

impl ScaledEffect {
    /// Ambient, particle-free, with icon.
    pub fn new(effect_type: EffectType, base_amplifier: i32, level_scaling: f64) -> Self {
        Self {
            effect_type,
            base_amplifier,
            level_scaling,
            ambient: true,
            particles: false,
            icon: true,
        }
    }

    /// Amplifier at `level`, truncated and clamped to `0..=255`.
    pub fn amplifier(&self, level: u32) -> u8 {
        let raw = level_scaled(f64::from(self.base_amplifier), self.level_scaling, level);
        raw.trunc().clamp(0.0, 255.0) as u8
    }

    /// Component checking every scheduler tick.
    pub fn into_component(self, id: impl Into<String>) -> Component {
        Component::ticking(id, 1, self)
    }

    fn effect_for(&self, level: u32) -> TimedEffect {
        TimedEffect::new(self.effect_type, EFFECT_DURATION_TICKS, self.amplifier(level))
            .with_display(self.ambient, self.particles, self.icon)
    }

    fn needs_reapplication(&self, host: &dyn GameHost, entity: EntityId, level: u32) -> bool {
        match host.active_effect(entity, self.effect_type) {
            None => true,
            Some(existing) => {
                existing.amplifier < self.amplifier(level)
                    || existing.duration_ticks <= REAPPLY_THRESHOLD_TICKS
            }
        }
    }
}

impl Effect for ScaledEffect {
    fn on_apply(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        host.add_effect(entity, self.effect_for(instance.level()));
    }

    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        if self.needs_reapplication(host, entity, instance.level()) {
            host.add_effect(entity, self.effect_for(instance.level()));
        }
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        host.remove_effect(entity, self.effect_type);
    }
}
