//! Night bonuses: short buffs refreshed every tick while it is night and the
//! vampire is not starving.

use world_host::{EffectType, EntityId, GameHost, TimedEffect};

use super::{notices, BoostConfig, NightBonusConfig};
use crate::affliction::AfflictionInstance;
use crate::component::{level_scaled, Component, Effect};
use crate::condition::Condition;
use crate::vampirism::HUNGER_ACTIVE_KEY;

pub const NIGHT_BONUSES_ACTIVE_KEY: &str = "night_bonuses_active";
pub const IS_NIGHT_KEY: &str = "is_night_time";

/// Extra host ticks on each buff so it never lapses between refreshes.
const DURATION_BUFFER: u32 = 10;

const NIGHT_VISION_MIN_TICKS: u32 = 400;

#[derive(Debug, Clone, PartialEq)]
pub struct NightBonus {
    pub interval: u64,
    /// Enabled buffs with their level scaling.
    pub buffs: Vec<(EffectType, BoostConfig)>,
    pub night_vision: bool,
}

impl NightBonus {
    pub fn from_config(config: &NightBonusConfig) -> Self {
        let buffs = [
            (EffectType::Speed, config.speed),
            (EffectType::Strength, config.strength),
            (EffectType::JumpBoost, config.jump),
        ]
        .into_iter()
        .filter_map(|(effect, boost)| boost.when_enabled().map(|b| (effect, b)))
        .collect();

        Self {
            interval: config.tick_interval.max(1),
            buffs,
            night_vision: config.night_vision,
        }
    }

    pub fn into_component(self, id: impl Into<String>) -> Component {
        let interval = self.interval;
        Component::ticking(id, interval, self)
    }

    fn buff_duration(&self) -> u32 {
        let ticks = self.interval.saturating_mul(20).min(u64::from(u32::MAX - DURATION_BUFFER)) as u32;
        ticks + DURATION_BUFFER
    }

    fn grant(&self, host: &mut dyn GameHost, entity: EntityId, level: u32) {
        let duration = self.buff_duration();
        for (effect, boost) in &self.buffs {
            let amplifier = level_scaled(f64::from(boost.base_amplifier), boost.scaling, level);
            let amplifier = amplifier.trunc().clamp(0.0, 255.0) as u8;
            host.add_effect(
                entity,
                TimedEffect::new(*effect, duration, amplifier).with_display(true, false, true),
            );
        }
        if self.night_vision {
            let duration = duration.max(NIGHT_VISION_MIN_TICKS);
            host.add_effect(
                entity,
                TimedEffect::new(EffectType::NightVision, duration, 0).with_display(true, false, true),
            );
        }
    }

    fn revoke(&self, host: &mut dyn GameHost, entity: EntityId) {
        for (effect, _) in &self.buffs {
            host.remove_effect(entity, *effect);
        }
        if self.night_vision {
            host.remove_effect(entity, EffectType::NightVision);
        }
    }
}

impl Effect for NightBonus {
    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        let is_night = Condition::Night.holds(host, entity);
        let was_active = instance.flag(NIGHT_BONUSES_ACTIVE_KEY);
        let was_night = instance.flag(IS_NIGHT_KEY);
        let hungry = instance.flag(HUNGER_ACTIVE_KEY);

        if is_night && !hungry {
            self.grant(host, entity, instance.level());
            instance.set_data(NIGHT_BONUSES_ACTIVE_KEY, true);
        } else if was_active {
            self.revoke(host, entity);
            instance.set_data(NIGHT_BONUSES_ACTIVE_KEY, false);
        }

        if is_night && !was_night {
            instance.set_data(IS_NIGHT_KEY, true);
            host.notify(entity, notices::NIGHT_FALLS);
        } else if !is_night && was_night {
            instance.set_data(IS_NIGHT_KEY, false);
            host.notify(entity, notices::DAWN_APPROACHES);
        }
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        self.revoke(host, entity);
    }
}
