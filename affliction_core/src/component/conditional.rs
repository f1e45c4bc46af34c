//! Conditional wrapper - gates another component on a [`Condition`].

use world_host::{EntityId, GameHost};

use super::{Component, Effect};
use crate::affliction::AfflictionInstance;
use crate::condition::Condition;

/// Edge-triggered gate around an inner component.
///
/// The active flag lives in the instance data under `<inner id>_active`, so the
/// inner apply/remove hooks fire once per transition rather than once per tick.
#[derive(Debug)]
pub struct ConditionalEffect {
    inner: Component,
    condition: Condition,
    state_key: String,
}

impl ConditionalEffect {
    pub fn new(inner: Component, condition: Condition) -> Self {
        let state_key = format!("{}_active", inner.id());
        Self {
            inner,
            condition,
            state_key,
        }
    }

    pub fn state_key(&self) -> &str {
        &self.state_key
    }

    pub fn inner(&self) -> &Component {
        &self.inner
    }

    pub fn condition(&self) -> &Condition {
        &self.condition
    }

    fn activate(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        instance.set_data(self.state_key.clone(), true);
        self.inner.apply(host, entity, instance);
    }

    fn deactivate(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        self.inner.remove(host, entity, instance);
        instance.remove_data(&self.state_key);
    }
}

impl Effect for ConditionalEffect {
    fn on_apply(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        // A restored flag says nothing about the inner effect's host-side state.
        instance.remove_data(&self.state_key);
        if self.condition.holds(host, entity) {
            self.activate(host, entity, instance);
        }
    }

    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        let active = instance.flag(&self.state_key);
        let should_be_active = self.condition.holds(host, entity);

        match (active, should_be_active) {
            (false, true) => self.activate(host, entity, instance),
            (true, true) => self.inner.tick(host, entity, instance),
            (true, false) => self.deactivate(host, entity, instance),
            (false, false) => {}
        }
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        if instance.flag(&self.state_key) {
            self.deactivate(host, entity, instance);
        }
    }
}

impl Component {
    /// Wrap `inner` so it only runs while `condition` holds.
    ///
    /// The wrapper is named `<inner id>_conditional` and ticks at the inner
    /// interval (every tick for an inner component that does not tick).
    pub fn conditional(inner: Component, condition: Condition) -> Component {
        let id = format!("{}_conditional", inner.id());
        let interval = inner.tick_interval().unwrap_or(1);
        Component::ticking(id, interval, ConditionalEffect::new(inner, condition))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use world_host::SimulatedWorld;

    use super::*;
    use crate::affliction::{AfflictionCategory, AfflictionDefinition, DefinitionSpec, PERMANENT};
    use crate::component::testing::Recorder;

    fn instance_for(world: &mut SimulatedWorld) -> (EntityId, AfflictionInstance) {
        let entity = world.spawn_player("Night Walker");
        let definition = AfflictionDefinition::new(DefinitionSpec::new(
            "gated",
            "Gated",
            AfflictionCategory::Curse,
            1,
        ))
        .unwrap();
        let instance = AfflictionInstance::new(entity, Arc::new(definition), 1, PERMANENT, 0);
        (entity, instance)
    }

    #[test]
    fn test_wrapper_naming_and_interval() {
        let ticking = Component::conditional(
            Component::ticking("hex_damage", 20, Recorder::new("d")),
            Condition::Night,
        );
        assert_eq!(ticking.id(), "hex_damage_conditional");
        assert_eq!(ticking.tick_interval(), Some(20));

        let passive = Component::conditional(Component::new("hex_attr_0", Recorder::new("a")), Condition::Night);
        assert_eq!(passive.tick_interval(), Some(1));
    }

    #[test]
    fn test_inactive_to_active_to_inactive() {
        let mut world = SimulatedWorld::new();
        let (entity, mut instance) = instance_for(&mut world);
        let recorder = Recorder::new("inner");
        let wrapper = Component::conditional(Component::ticking("inner", 1, recorder.clone()), Condition::Night);

        wrapper.apply(&mut world, entity, &mut instance);
        for _ in 0..5 {
            wrapper.tick(&mut world, entity, &mut instance);
        }
        assert!(recorder.calls().is_empty());
        assert!(!instance.flag("inner_active"));

        world.set_night(true);
        wrapper.tick(&mut world, entity, &mut instance);
        assert_eq!(recorder.calls(), vec!["inner:apply"]);
        assert!(instance.flag("inner_active"));

        wrapper.tick(&mut world, entity, &mut instance);
        wrapper.tick(&mut world, entity, &mut instance);
        assert_eq!(recorder.count("tick"), 2);
        assert_eq!(recorder.count("apply"), 1);

        world.set_night(false);
        wrapper.tick(&mut world, entity, &mut instance);
        wrapper.tick(&mut world, entity, &mut instance);
        assert_eq!(recorder.count("remove"), 1);
        assert!(!instance.has_data("inner_active"));
    }

    #[test]
    fn test_single_fire_per_toggle() {
        let mut world = SimulatedWorld::new();
        let (entity, mut instance) = instance_for(&mut world);
        let recorder = Recorder::new("inner");
        let wrapper = Component::conditional(Component::new("inner", recorder.clone()), Condition::Night);

        wrapper.apply(&mut world, entity, &mut instance);
        for round in 0..3 {
            world.set_night(true);
            for _ in 0..4 {
                wrapper.tick(&mut world, entity, &mut instance);
            }
            world.set_night(false);
            for _ in 0..4 {
                wrapper.tick(&mut world, entity, &mut instance);
            }
            assert_eq!(recorder.count("apply"), round + 1);
            assert_eq!(recorder.count("remove"), round + 1);
        }
        // The inner component does not tick.
        assert_eq!(recorder.count("tick"), 0);
    }

    #[test]
    fn test_apply_activates_immediately_and_remove_cleans_up() {
        let mut world = SimulatedWorld::new();
        world.set_night(true);
        let (entity, mut instance) = instance_for(&mut world);
        let recorder = Recorder::new("inner");
        let wrapper = Component::conditional(Component::new("inner", recorder.clone()), Condition::Night);

        wrapper.apply(&mut world, entity, &mut instance);
        assert_eq!(recorder.count("apply"), 1);

        wrapper.remove(&mut world, entity, &mut instance);
        assert_eq!(recorder.count("remove"), 1);

        // Removing again while inactive does nothing.
        wrapper.remove(&mut world, entity, &mut instance);
        assert_eq!(recorder.count("remove"), 1);
    }

    #[test]
    fn test_stale_flag_is_reset_on_apply() {
        let mut world = SimulatedWorld::new();
        let (entity, mut instance) = instance_for(&mut world);
        instance.set_data("inner_active", "true");
        let recorder = Recorder::new("inner");
        let wrapper = Component::conditional(Component::new("inner", recorder.clone()), Condition::Night);

        wrapper.apply(&mut world, entity, &mut instance);
        wrapper.tick(&mut world, entity, &mut instance);

        assert!(recorder.calls().is_empty());
    }
}
