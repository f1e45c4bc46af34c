//! In-memory world implementing [`GameHost`], used by tests and tooling.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use super::{Surroundings, Weather, WorldTime};
use crate::entities::{EntityId, LivingEntity};
use crate::host::GameHost;
use crate::mechanics::{Attribute, AttributeModifier, EffectType, ParticleBurst, SoundCue, TimedEffect};

/// The complete state of a simulated world at any point in time.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct SimulatedWorld {
    /// Global time tracking.
    pub time: WorldTime,

    pub weather: Weather,

    /// All living entities in the world (including offline players).
    pub entities: HashMap<EntityId, LivingEntity>,

    /// Milliseconds reported by [`GameHost::now_millis`]; moved by hand.
    pub clock_millis: u64,

    // Output the host would have shown to players.
    pub particle_log: Vec<(EntityId, ParticleBurst)>,
    pub sound_log: Vec<(EntityId, SoundCue)>,
    pub notifications: Vec<(EntityId, String)>,
}

impl SimulatedWorld {
    /// Create a new empty world at noon of day zero.
    pub fn new() -> Self {
        Self {
            time: WorldTime::new(0, 12, 0),
            ..Self::default()
        }
    }

    /// Add an entity to the world.
    pub fn add_entity(&mut self, entity: LivingEntity) -> EntityId {
        let id = entity.id;
        self.entities.insert(id, entity);
        id
    }

    /// Spawn a fresh online player and return its id.
    pub fn spawn_player(&mut self, name: &str) -> EntityId {
        self.add_entity(LivingEntity::new(name))
    }

    /// Get entity by ID.
    pub fn entity(&self, id: EntityId) -> Option<&LivingEntity> {
        self.entities.get(&id)
    }

    /// Get mutable entity by ID.
    pub fn entity_mut(&mut self, id: EntityId) -> Option<&mut LivingEntity> {
        self.entities.get_mut(&id)
    }

    /// Look up an entity by display name (case-insensitive).
    pub fn find_by_name(&self, name: &str) -> Option<EntityId> {
        self.entities
            .values()
            .find(|e| e.name.eq_ignore_ascii_case(name))
            .map(|e| e.id)
    }

    pub fn set_online(&mut self, id: EntityId, online: bool) {
        if let Some(entity) = self.entities.get_mut(&id) {
            entity.online = online;
        }
    }

    /// Jump the clock to midnight (`true`) or noon (`false`) of the current day.
    pub fn set_night(&mut self, night: bool) {
        self.time.hour = if night { 0 } else { 12 };
        self.time.minute = 0;
    }

    /// Advance time by given minutes.
    pub fn advance_time(&mut self, minutes: u32) {
        self.time.advance_time(minutes);
    }

    /// Count down every entity's timed effects and fire.
    pub fn advance_ticks(&mut self, ticks: u32) {
        for entity in self.entities.values_mut() {
            entity.effects.advance(ticks);
            entity.fire_ticks = entity.fire_ticks.saturating_sub(ticks);
        }
        self.clock_millis += u64::from(ticks) * 50;
    }

    /// Notification keys delivered to one entity, oldest first.
    pub fn notifications_for(&self, id: EntityId) -> Vec<&str> {
        self.notifications
            .iter()
            .filter(|(entity, _)| *entity == id)
            .map(|(_, key)| key.as_str())
            .collect()
    }

    fn present(&self, id: EntityId) -> Option<&LivingEntity> {
        self.entities.get(&id).filter(|e| e.online)
    }

    fn present_mut(&mut self, id: EntityId) -> Option<&mut LivingEntity> {
        self.entities.get_mut(&id).filter(|e| e.online)
    }
}

impl GameHost for SimulatedWorld {
    fn is_present(&self, entity: EntityId) -> bool {
        self.present(entity).is_some()
    }

    fn display_name(&self, entity: EntityId) -> Option<String> {
        self.entities.get(&entity).map(|e| e.name.clone())
    }

    fn surroundings(&self, entity: EntityId) -> Option<Surroundings> {
        let living = self.present(entity)?;
        Some(Surroundings {
            is_day: self.time.is_day(),
            moon_phase: self.time.moon_phase(),
            weather: self.weather,
            dimension: living.dimension,
            sky_access: living.sky_access,
            has_helmet: living.has_helmet(),
        })
    }

    fn now_millis(&self) -> u64 {
        self.clock_millis
    }

    fn add_effect(&mut self, entity: EntityId, effect: TimedEffect) -> bool {
        match self.present_mut(entity) {
            Some(living) => living.effects.add(effect),
            None => false,
        }
    }

    fn remove_effect(&mut self, entity: EntityId, effect_type: EffectType) -> bool {
        match self.present_mut(entity) {
            Some(living) => living.effects.remove(effect_type),
            None => false,
        }
    }

    fn active_effect(&self, entity: EntityId, effect_type: EffectType) -> Option<TimedEffect> {
        self.present(entity)?.effects.get(effect_type).copied()
    }

    fn damage(&mut self, entity: EntityId, amount: f64, bypass_armor: bool, floor: f64) {
        let Some(living) = self.present_mut(entity) else {
            return;
        };
        if amount <= 0.0 || !living.is_alive() {
            return;
        }

        if bypass_armor {
            let lowest = floor.min(living.health);
            living.health = (living.health - amount).max(lowest);
        } else {
            let dealt = living.mitigate(amount);
            living.health = (living.health - dealt).max(0.0);
        }
    }

    fn health(&self, entity: EntityId) -> Option<f64> {
        self.present(entity).map(|e| e.health)
    }

    fn fire_ticks(&self, entity: EntityId) -> u32 {
        self.present(entity).map(|e| e.fire_ticks).unwrap_or(0)
    }

    fn set_fire_ticks(&mut self, entity: EntityId, ticks: u32) {
        if let Some(living) = self.present_mut(entity) {
            living.fire_ticks = ticks;
        }
    }

    fn spawn_particles(&mut self, entity: EntityId, burst: ParticleBurst) {
        if self.is_present(entity) {
            self.particle_log.push((entity, burst));
        }
    }

    fn play_sound(&mut self, entity: EntityId, cue: &SoundCue) {
        if self.is_present(entity) {
            self.sound_log.push((entity, cue.clone()));
        }
    }

    fn add_modifier(&mut self, entity: EntityId, attribute: Attribute, modifier: AttributeModifier) -> bool {
        match self.present_mut(entity) {
            Some(living) => living.attributes.add_modifier(attribute, modifier),
            None => false,
        }
    }

    fn remove_modifier(&mut self, entity: EntityId, attribute: Attribute, key: &str) -> bool {
        match self.present_mut(entity) {
            Some(living) => living.attributes.remove_modifier(attribute, key),
            None => false,
        }
    }

    fn notify(&mut self, entity: EntityId, key: &str) {
        if self.is_present(entity) {
            self.notifications.push((entity, key.to_string()));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mechanics::ModifierOperation;
    use crate::world_state::{Dimension, MoonPhase};

    #[test]
    fn test_add_entity() {
        let mut world = SimulatedWorld::new();
        let id = world.spawn_player("Test Hero");

        assert!(world.entity(id).is_some());
        assert_eq!(world.entity(id).unwrap().name, "Test Hero");
        assert_eq!(world.find_by_name("test hero"), Some(id));
        assert_eq!(world.display_name(id).as_deref(), Some("Test Hero"));
    }

    #[test]
    fn test_surroundings_follow_world_state() {
        let mut world = SimulatedWorld::new();
        let id = world.spawn_player("Watcher");

        let day = world.surroundings(id).unwrap();
        assert!(day.is_day);
        assert_eq!(day.moon_phase, MoonPhase::Full);
        assert_eq!(day.dimension, Dimension::Overworld);
        assert!(day.sky_access);

        world.set_night(true);
        world.weather = Weather::Thunder;
        world.entity_mut(id).unwrap().equipment.helmet = Some("iron_helmet".into());

        let night = world.surroundings(id).unwrap();
        assert!(night.is_night());
        assert!(night.weather.has_storm());
        assert!(night.has_helmet);
    }

    #[test]
    fn test_offline_entity_is_absent() {
        let mut world = SimulatedWorld::new();
        let id = world.spawn_player("Ghost");
        world.set_online(id, false);

        assert!(!world.is_present(id));
        assert!(world.surroundings(id).is_none());
        assert!(!world.add_effect(id, TimedEffect::new(EffectType::Speed, 100, 0)));
        world.notify(id, "anything");
        assert!(world.notifications.is_empty());
    }

    #[test]
    fn test_bypass_damage_respects_floor() {
        let mut world = SimulatedWorld::new();
        let id = world.spawn_player("Burning");

        world.damage(id, 19.8, true, 0.5);
        assert!((world.health(id).unwrap() - 0.5).abs() < 1e-9);

        world.damage(id, 5.0, true, 0.5);
        assert!((world.health(id).unwrap() - 0.5).abs() < 1e-9);
    }

    #[test]
    fn test_armored_damage_is_mitigated() {
        let mut world = SimulatedWorld::new();
        let id = world.spawn_player("Knight");
        world
            .entity_mut(id)
            .unwrap()
            .attributes
            .base
            .insert(Attribute::Armor, 10.0);

        world.damage(id, 10.0, false, 0.0);
        assert!((world.health(id).unwrap() - 14.0).abs() < 1e-9);
    }

    #[test]
    fn test_modifiers_and_effects_round_trip() {
        let mut world = SimulatedWorld::new();
        let id = world.spawn_player("Cursed");

        let modifier = AttributeModifier::new("curse_x", -0.02, ModifierOperation::AddNumber);
        assert!(world.add_modifier(id, Attribute::MovementSpeed, modifier.clone()));
        assert!(!world.add_modifier(id, Attribute::MovementSpeed, modifier));
        assert!(world.remove_modifier(id, Attribute::MovementSpeed, "curse_x"));

        assert!(world.add_effect(id, TimedEffect::new(EffectType::Weakness, 100, 1)));
        world.advance_ticks(60);
        assert_eq!(
            world.active_effect(id, EffectType::Weakness).unwrap().duration_ticks,
            40
        );
        assert_eq!(world.now_millis(), 3000);
    }
}
