//! Blood hunger: debuffs that grow as the blood pool runs dry.

use world_host::{EffectType, EntityId, GameHost, TimedEffect};

use super::{notices, BloodHungerConfig, BoostConfig};
use crate::affliction::AfflictionInstance;
use crate::component::{Component, Effect};
use crate::resource::{self, BLOOD_KEY};

pub const HUNGER_ACTIVE_KEY: &str = "blood_hunger_active";

const DURATION_BUFFER: u32 = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct BloodHunger {
    pub interval: u64,
    pub max_blood: f64,
    /// Percentage at or below which hunger sets in.
    pub threshold: f64,
    pub debuffs: Vec<(EffectType, BoostConfig)>,
}

impl BloodHunger {
    pub fn from_config(config: &BloodHungerConfig, max_blood: f64) -> Self {
        let debuffs = [
            (EffectType::Slowness, config.slowness),
            (EffectType::Weakness, config.weakness),
        ]
        .into_iter()
        .filter_map(|(effect, boost)| boost.when_enabled().map(|b| (effect, b)))
        .collect();

        Self {
            interval: config.tick_interval.max(1),
            max_blood,
            threshold: config.threshold,
            debuffs,
        }
    }

    pub fn into_component(self, id: impl Into<String>) -> Component {
        let interval = self.interval;
        Component::ticking(id, interval, self)
    }

    /// 0 at the threshold, 1 when the pool is empty.
    pub fn severity(&self, percent: f64) -> f64 {
        if self.threshold <= 0.0 {
            return 1.0;
        }
        (1.0 - percent / self.threshold).clamp(0.0, 1.0)
    }

    fn afflict(&self, host: &mut dyn GameHost, entity: EntityId, percent: f64) {
        let severity = self.severity(percent);
        let duration = (self.interval.min(u64::from(u32::MAX / 40)) as u32) * 20 + DURATION_BUFFER;
        for (effect, boost) in &self.debuffs {
            let amplifier = f64::from(boost.base_amplifier) + severity * boost.scaling;
            let amplifier = amplifier.trunc().clamp(0.0, 255.0) as u8;
            host.add_effect(
                entity,
                TimedEffect::new(*effect, duration, amplifier).with_display(false, true, true),
            );
        }
    }

    fn relieve(&self, host: &mut dyn GameHost, entity: EntityId) {
        for (effect, _) in &self.debuffs {
            host.remove_effect(entity, *effect);
        }
    }
}

impl Effect for BloodHunger {
    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        let percent = resource::percent(instance, BLOOD_KEY, self.max_blood);
        let hungry = percent <= self.threshold;
        let was_hungry = instance.flag(HUNGER_ACTIVE_KEY);

        if hungry {
            self.afflict(host, entity, percent);
            if !was_hungry {
                instance.set_data(HUNGER_ACTIVE_KEY, true);
                host.notify(entity, notices::HUNGER_START);
            }
        } else if was_hungry {
            self.relieve(host, entity);
            instance.set_data(HUNGER_ACTIVE_KEY, false);
            host.notify(entity, notices::HUNGER_END);
        }
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        self.relieve(host, entity);
    }
}
