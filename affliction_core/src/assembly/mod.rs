//! Data-driven assembly - turns a [`CurseConfig`] into a registered definition.
//!
//! Names in the configuration are parsed leniently. A bad entry is skipped or
//! replaced by its default with a warning, never an error, so one typo does
//! not take a whole curse down.

mod config;

pub use config::*;

use tracing::{error, info, warn};
use world_host::{
    Attribute, EffectType, EntityId, GameHost, ModifierOperation, ParticleBurst, ParticleKind, SoundCue,
};

use crate::affliction::{AfflictionCategory, AfflictionDefinition, AfflictionInstance, DefinitionSpec, DurationRule};
use crate::component::{AttributeShift, Component, Effect, ParticleAura, PeriodicDamage, ScaledEffect, SoundEffect};
use crate::engine::AfflictionEngine;
use crate::error::Result;

/// Host ticks per second of configured duration.
pub const TICKS_PER_SECOND: i64 = 20;

/// Build the curse described by `config`.
///
/// Components are laid out as potions, damage, attributes, particles, sound. Unless
/// the trigger is unconditional each one is wrapped so it only acts while the
/// trigger holds. Configured messages are never gated.
pub fn build_curse(config: &CurseConfig) -> Result<AfflictionDefinition> {
    let id = config.id.trim();
    let mut effects = Vec::new();

    for (index, potion) in valid_potions(config).enumerate() {
        effects.push(potion.into_component(format!("{id}_potion_{index}")));
    }

    let damage = &config.effects.damage;
    if damage.enabled {
        let behavior = PeriodicDamage::new(damage.base_damage, damage.level_scaling, damage.bypass_armor);
        effects.push(behavior.into_component(format!("{id}_damage"), damage.tick_interval));
    }

    for (index, (attribute, entry)) in valid_attributes(config).enumerate() {
        let component_id = format!("{id}_attr_{index}");
        let shift = AttributeShift::new(
            &component_id,
            attribute,
            entry.base_amount,
            entry.level_scaling,
            parse_operation(&entry.operation),
        );
        effects.push(shift.into_component(component_id));
    }

    let particles = &config.effects.particles;
    if particles.enabled {
        effects.push(particle_aura(particles).into_component(format!("{id}_particles"), particles.tick_interval));
    }

    let sound = &config.effects.sound;
    if sound.enabled {
        effects.push(sound_effect(sound).into_component(format!("{id}_sound")));
    }

    let mut components = if config.trigger.is_unconditional() {
        effects
    } else {
        let condition = config.trigger.to_condition();
        effects
            .into_iter()
            .map(|inner| Component::conditional(inner, condition.clone()))
            .collect()
    };

    if !config.messages.is_empty() {
        components.push(Component::new(
            format!("{id}_messages"),
            Announcement {
                on_apply: config.messages.on_apply.clone(),
                on_remove: config.messages.on_remove.clone(),
            },
        ));
    }

    let mut display_name = strip_markup(&config.display.affliction_name);
    if display_name.is_empty() {
        display_name = id.to_string();
    }

    let max_level = if config.max_level == 0 {
        warn!(curse = %id, "max_level must be at least 1, using 1");
        1
    } else {
        config.max_level
    };

    let mut spec = DefinitionSpec::new(id, display_name, AfflictionCategory::Curse, max_level);
    spec.description = config.display.description.clone();
    spec.curable = true;
    spec.duration = duration_rule(&config.duration);
    spec.components = components;

    AfflictionDefinition::new(spec)
}

/// Build and register every enabled curse. Returns the registered ids; failures are logged and skipped.
pub fn register_curses<'a>(
    engine: &AfflictionEngine,
    configs: impl IntoIterator<Item = &'a CurseConfig>,
) -> Vec<String> {
    let mut registered = Vec::new();
    for config in configs {
        if !config.enabled {
            info!(curse = %config.id, "curse disabled, not registering");
            continue;
        }
        match build_curse(config).and_then(|definition| engine.register(definition)) {
            Ok(definition) => registered.push(definition.key().to_string()),
            Err(err) => error!(curse = %config.id, error = %err, "failed to register curse"),
        }
    }
    registered
}

/// Drop `<...>` markup tags and surrounding whitespace.
pub fn strip_markup(text: &str) -> String {
    let mut plain = String::with_capacity(text.len());
    let mut rest = text;
    while let Some(start) = rest.find('<') {
        match rest[start..].find('>') {
            // Only non-empty tags count, as in `<#444444>` or `<bold>`.
            Some(len) if len > 1 => {
                plain.push_str(&rest[..start]);
                rest = &rest[start + len + 1..];
            }
            _ => {
                plain.push_str(&rest[..=start]);
                rest = &rest[start + 1..];
            }
        }
    }
    plain.push_str(rest);
    plain.trim().to_string()
}

fn duration_rule(duration: &DurationConfig) -> DurationRule {
    if duration.is_permanent() {
        return DurationRule::Permanent;
    }
    let ticks_per_level = match duration.kind {
        DurationKind::LevelScaled => (duration.level_scaling * TICKS_PER_SECOND as f64).round() as i64,
        _ => 0,
    };
    DurationRule::Timed {
        base_ticks: duration.base_seconds * TICKS_PER_SECOND,
        ticks_per_level,
    }
}

fn valid_potions(config: &CurseConfig) -> impl Iterator<Item = ScaledEffect> + '_ {
    config.effects.potions.iter().filter_map(move |potion| {
        let effect_type = match potion.effect.parse::<EffectType>() {
            Ok(effect_type) => effect_type,
            Err(err) => {
                warn!(curse = %config.id, error = %err, "skipping potion effect");
                return None;
            }
        };
        let mut scaled = ScaledEffect::new(effect_type, potion.base_amplifier, potion.level_scaling);
        scaled.ambient = potion.ambient;
        scaled.particles = potion.particles;
        scaled.icon = potion.icon;
        Some(scaled)
    })
}

fn valid_attributes(config: &CurseConfig) -> impl Iterator<Item = (Attribute, &AttributeConfig)> + '_ {
    config
        .effects
        .attributes
        .iter()
        .filter_map(move |entry| match Attribute::parse_lenient(&entry.attribute) {
            Ok(attribute) => Some((attribute, entry)),
            Err(err) => {
                warn!(curse = %config.id, error = %err, "skipping attribute modifier");
                None
            }
        })
}

fn parse_operation(name: &str) -> ModifierOperation {
    name.parse().unwrap_or_else(|_| {
        warn!(operation = %name, "unknown modifier operation, using ADD_NUMBER");
        ModifierOperation::AddNumber
    })
}

fn particle_aura(config: &ParticleConfig) -> ParticleAura {
    let kind = config.kind.parse().unwrap_or_else(|_| {
        warn!(particle = %config.kind, "unknown particle type, using WITCH");
        ParticleKind::Witch
    });
    ParticleAura::new(ParticleBurst {
        kind,
        count: config.count,
        offset: (config.offset_x, config.offset_y, config.offset_z),
        speed: config.speed,
        height_offset: config.height_offset,
    })
}

fn sound_effect(config: &SoundConfig) -> SoundEffect {
    SoundEffect {
        cue: SoundCue {
            sound: SoundCue::normalize_key(&config.sound),
            volume: config.volume,
            pitch: config.pitch,
        },
        play_on_apply: config.play_on_apply,
        play_on_remove: config.play_on_remove,
        interval: config.tick_interval,
    }
}

/// Sends the configured message keys when the curse is contracted or lifted.
#[derive(Debug, Clone)]
struct Announcement {
    on_apply: Option<String>,
    on_remove: Option<String>,
}

impl Effect for Announcement {
    fn on_apply(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        if let Some(key) = &self.on_apply {
            host.notify(entity, key);
        }
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        if let Some(key) = &self.on_remove {
            host.notify(entity, key);
        }
    }
}
