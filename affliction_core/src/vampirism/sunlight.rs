//! Sunlight damage.
//!
//! Exposure is day with open sky (and clear weather when weather protects).
//! With a grace period the first seconds of exposure only warn. After that the
//! entity burns every tick it stays exposed.

use world_host::{EntityId, GameHost, ParticleBurst, ParticleKind};

use super::{notices, BloodConfig, SunDamageConfig};
use crate::affliction::AfflictionInstance;
use crate::component::{Component, Effect};
use crate::condition::Condition;
use crate::resource::{self, BLOOD_KEY};

pub const BURNING_KEY: &str = "burning";
pub const EXPOSURE_START_KEY: &str = "sun_exposure_start";
pub const HAS_HELMET_KEY: &str = "has_helmet";

/// Fire is topped up when fewer ticks than this are left.
const FIRE_REFRESH_BELOW: u32 = 20;

/// Damage lost per level above the first.
const LEVEL_RESISTANCE: f64 = 0.1;

#[derive(Debug, Clone, PartialEq)]
pub struct GracePeriod {
    pub base_seconds: f64,
    pub level_scaling: f64,
    pub warning_particles: u32,
}

impl GracePeriod {
    pub fn millis_at(&self, level: u32) -> u64 {
        let seconds = self.base_seconds + f64::from(level.saturating_sub(1)) * self.level_scaling;
        (seconds.max(0.0) * 1000.0) as u64
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct SunlightDamage {
    pub base_damage: f64,
    pub interval: u64,
    pub helmet_reduction: f64,
    pub minimum_damage: f64,
    pub fire_ticks: u32,
    /// Blood drained per burning tick; `None` when blood is off.
    pub blood_drain: Option<f64>,
    pub empty_multiplier: f64,
    pub grace: Option<GracePeriod>,
    exposure: Condition,
}

impl SunlightDamage {
    pub fn from_config(config: &SunDamageConfig, blood: &BloodConfig) -> Self {
        let grace = &config.grace_period;
        Self {
            base_damage: config.base_damage,
            interval: config.tick_interval,
            helmet_reduction: config.helmet_reduction,
            minimum_damage: config.minimum_damage,
            fire_ticks: config.fire_ticks,
            blood_drain: blood.enabled.then_some(blood.sun_drain),
            empty_multiplier: blood.empty_sun_multiplier,
            grace: grace.enabled.then(|| GracePeriod {
                base_seconds: grace.base_seconds,
                level_scaling: grace.level_scaling,
                warning_particles: grace.warning_particles,
            }),
            exposure: exposure_condition(config.weather_protection),
        }
    }

    pub fn exposure(&self) -> &Condition {
        &self.exposure
    }

    pub fn into_component(self, id: impl Into<String>) -> Component {
        let interval = self.interval;
        Component::ticking(id, interval, self)
    }

    /// Damage for one burning tick.
    pub fn damage_for(&self, level: u32, has_helmet: bool, blood_empty: bool) -> f64 {
        let mut damage = self.base_damage * (1.0 - f64::from(level.saturating_sub(1)) * LEVEL_RESISTANCE);
        if has_helmet {
            damage *= 1.0 - self.helmet_reduction;
        }
        if blood_empty && self.blood_drain.is_some() {
            damage *= self.empty_multiplier;
        }
        damage.max(self.minimum_damage)
    }

    /// Whether the exposure is still within the grace period. Starts the clock on first exposure.
    fn in_grace(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) -> bool {
        let Some(grace) = &self.grace else {
            return false;
        };

        let now = host.now_millis();
        let started = match instance.data(EXPOSURE_START_KEY).and_then(|v| v.as_i64()) {
            Some(started) => started.max(0) as u64,
            None => {
                instance.set_data(EXPOSURE_START_KEY, now);
                host.notify(entity, notices::SUN_WARNING);
                now
            }
        };

        if now.saturating_sub(started) >= grace.millis_at(instance.level()) {
            return false;
        }
        if grace.warning_particles > 0 {
            host.spawn_particles(
                entity,
                ParticleBurst {
                    kind: ParticleKind::Smoke,
                    count: grace.warning_particles,
                    offset: (0.3, 0.5, 0.3),
                    speed: 0.01,
                    height_offset: 1.0,
                },
            );
        }
        true
    }
}

/// Day with open sky, and clear weather when weather protects.
pub fn exposure_condition(weather_protection: bool) -> Condition {
    let exposed = Condition::Day.and(Condition::SkyAccess);
    if weather_protection {
        exposed.and(Condition::ClearWeather)
    } else {
        exposed
    }
}

impl Effect for SunlightDamage {
    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        let was_burning = instance.flag(BURNING_KEY);

        if !self.exposure.holds(host, entity) {
            instance.set_data(BURNING_KEY, false);
            instance.remove_data(EXPOSURE_START_KEY);
            return;
        }

        if self.in_grace(host, entity, instance) {
            return;
        }

        if !was_burning {
            host.notify(entity, notices::SUN_BURNING);
        }
        instance.set_data(BURNING_KEY, true);

        if let Some(drain) = self.blood_drain.filter(|d| *d > 0.0) {
            resource::drain(instance, BLOOD_KEY, drain);
        }

        let has_helmet = Condition::HasHelmet.holds(host, entity);
        instance.set_data(HAS_HELMET_KEY, has_helmet);
        let blood_empty = resource::is_empty(instance, BLOOD_KEY);
        let damage = self.damage_for(instance.level(), has_helmet, blood_empty);
        host.damage(entity, damage, false, 0.0);

        if host.fire_ticks(entity) < FIRE_REFRESH_BELOW {
            host.set_fire_ticks(entity, self.fire_ticks);
        }
    }
}
