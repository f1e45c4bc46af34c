//! Periodic damage.

use world_host::{EntityId, GameHost};

use super::{level_scaled, Component, Effect};
use crate::affliction::AfflictionInstance;

/// Health that armor-bypassing damage never goes below.
pub const BYPASS_HEALTH_FLOOR: f64 = 0.5;

/// Damage dealt every interval, scaled by level.
#[derive(Debug, Clone, PartialEq)]
pub struct PeriodicDamage {
    pub base_damage: f64,
    pub level_scaling: f64,
    pub bypass_armor: bool,
}

impl PeriodicDamage {
    pub const DEFAULT_INTERVAL: u64 = 20;

    pub fn new(base_damage: f64, level_scaling: f64, bypass_armor: bool) -> Self {
        Self {
            base_damage,
            level_scaling,
            bypass_armor,
        }
    }

    pub fn damage_at(&self, level: u32) -> f64 {
        level_scaled(self.base_damage, self.level_scaling, level)
    }

    pub fn into_component(self, id: impl Into<String>, interval: u64) -> Component {
        Component::ticking(id, interval, self)
    }
}

impl Effect for PeriodicDamage {
    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        let amount = self.damage_at(instance.level());
        if amount <= 0.0 || !host.is_present(entity) {
            return;
        }
        host.damage(entity, amount, self.bypass_armor, BYPASS_HEALTH_FLOOR);
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use world_host::{Attribute, SimulatedWorld};

    use super::*;
    use crate::affliction::{AfflictionCategory, AfflictionDefinition, DefinitionSpec, PERMANENT};

    fn setup(level: u32) -> (SimulatedWorld, EntityId, AfflictionInstance) {
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Bleeder");
        let definition =
            AfflictionDefinition::new(DefinitionSpec::new("rot", "Rot", AfflictionCategory::Curse, 5)).unwrap();
        let instance = AfflictionInstance::new(entity, Arc::new(definition), level, PERMANENT, 0);
        (world, entity, instance)
    }

    #[test]
    fn test_level_scaled_damage() {
        let (mut world, entity, mut instance) = setup(3);
        let component = PeriodicDamage::new(1.0, 0.5, false).into_component("rot_damage", 20);
        assert_eq!(component.tick_interval(), Some(20));

        component.tick(&mut world, entity, &mut instance);
        assert!((world.health(entity).unwrap() - 18.0).abs() < 1e-9);
    }

    #[test]
    fn test_bypass_keeps_entity_alive() {
        let (mut world, entity, mut instance) = setup(1);
        world.entity_mut(entity).unwrap().attributes.base.insert(Attribute::Armor, 20.0);
        let component = PeriodicDamage::new(50.0, 0.0, true).into_component("rot_damage", 1);

        component.tick(&mut world, entity, &mut instance);
        assert!((world.health(entity).unwrap() - BYPASS_HEALTH_FLOOR).abs() < 1e-9);
    }

    #[test]
    fn test_non_positive_damage_skipped() {
        let (mut world, entity, mut instance) = setup(5);
        let component = PeriodicDamage::new(2.0, -1.0, false).into_component("rot_damage", 1);

        component.tick(&mut world, entity, &mut instance);
        assert_eq!(world.health(entity), Some(20.0));
    }
}
