//! Keyed attribute modifier held for as long as the component is active.

use world_host::{Attribute, AttributeModifier, EntityId, GameHost, ModifierOperation};

use super::{level_scaled, Component, Effect};
use crate::affliction::AfflictionInstance;

#[derive(Debug, Clone, PartialEq)]
pub struct AttributeShift {
    pub attribute: Attribute,
    pub base_amount: f64,
    pub level_scaling: f64,
    pub operation: ModifierOperation,
    /// Stable modifier key, `curse_<component id>_<attribute>`.
    modifier_key: String,
}

impl AttributeShift {
    pub fn new(
        component_id: &str,
        attribute: Attribute,
        base_amount: f64,
        level_scaling: f64,
        operation: ModifierOperation,
    ) -> Self {
        Self {
            attribute,
            base_amount,
            level_scaling,
            operation,
            modifier_key: format!("curse_{component_id}_{}", attribute.key()),
        }
    }

    pub fn modifier_key(&self) -> &str {
        &self.modifier_key
    }

    pub fn amount_at(&self, level: u32) -> f64 {
        level_scaled(self.base_amount, self.level_scaling, level)
    }

    /// Apply/remove only; attribute shifts do not tick.
    pub fn into_component(self, id: impl Into<String>) -> Component {
        Component::new(id, self)
    }

    /// Re-apply at the instance's current level (after a level change).
    pub fn refresh(&self, host: &mut dyn GameHost, entity: EntityId, instance: &AfflictionInstance) {
        host.remove_modifier(entity, self.attribute, &self.modifier_key);
        let modifier = AttributeModifier::new(
            self.modifier_key.clone(),
            self.amount_at(instance.level()),
            self.operation,
        );
        host.add_modifier(entity, self.attribute, modifier);
    }
}

impl Effect for AttributeShift {
    fn on_apply(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        self.refresh(host, entity, instance);
    }

    fn on_remove(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        host.remove_modifier(entity, self.attribute, &self.modifier_key);
    }
}
