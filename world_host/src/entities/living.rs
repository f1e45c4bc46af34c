//! Living entity definitions.

use serde::{Deserialize, Serialize};

use super::{AttributeComponent, CreatureKind, EffectComponent, EntityId, EquipmentComponent};
use crate::mechanics::{Attribute, EffectType};
use crate::world_state::Dimension;

/// A living entity with all components the host exposes to afflictions.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LivingEntity {
    pub id: EntityId,
    pub name: String,
    pub kind: CreatureKind,

    // Core components stored directly for frequent access
    pub health: f64,
    pub attributes: AttributeComponent,
    pub effects: EffectComponent,
    pub equipment: EquipmentComponent,

    // Position-derived state
    pub dimension: Dimension,
    /// Whether nothing blocks the sky above the entity.
    pub sky_access: bool,
    pub fire_ticks: u32,

    /// Whether the entity is currently connected/loaded.
    pub online: bool,
}

impl LivingEntity {
    /// Create a new online player in the overworld, under open sky.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: EntityId::new(),
            name: name.into(),
            kind: CreatureKind::Player,
            health: Attribute::MaxHealth.default_base(),
            attributes: AttributeComponent::default(),
            effects: EffectComponent::default(),
            equipment: EquipmentComponent::default(),
            dimension: Dimension::Overworld,
            sky_access: true,
            fire_ticks: 0,
            online: true,
        }
    }

    /// Use a specific ID (e.g. when rejoining).
    pub fn with_id(mut self, id: EntityId) -> Self {
        self.id = id;
        self
    }

    pub fn with_kind(mut self, kind: CreatureKind) -> Self {
        self.kind = kind;
        self
    }

    /// Check if the entity is alive.
    pub fn is_alive(&self) -> bool {
        self.health > 0.0
    }

    pub fn max_health(&self) -> f64 {
        self.attributes.value(Attribute::MaxHealth)
    }

    /// Check if the entity has a specific timed effect.
    pub fn has_effect(&self, effect: EffectType) -> bool {
        self.effects.get(effect).is_some()
    }

    pub fn has_helmet(&self) -> bool {
        self.equipment.helmet.is_some()
    }

    /// Damage reduced by armor, the way normal (non-bypassing) damage is mitigated.
    pub fn mitigate(&self, amount: f64) -> f64 {
        let armor = self.attributes.value(Attribute::Armor).clamp(0.0, 20.0);
        amount * (1.0 - armor / 25.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_entity() {
        let entity = LivingEntity::new("Test Hero");
        assert_eq!(entity.name, "Test Hero");
        assert!(entity.is_alive());
        assert!(entity.online);
        assert!(!entity.has_helmet());
        assert_eq!(entity.max_health(), 20.0);
    }

    #[test]
    fn test_builders() {
        let id = EntityId::nil();
        let cow = LivingEntity::new("Bessie").with_id(id).with_kind(CreatureKind::Cow);
        assert_eq!(cow.id, id);
        assert_eq!(cow.kind, CreatureKind::Cow);
        assert!(!cow.has_effect(EffectType::Speed));
    }

    #[test]
    fn test_entity_death() {
        let mut entity = LivingEntity::new("Doomed");
        entity.health = 0.0;
        assert!(!entity.is_alive());
    }

    #[test]
    fn test_armor_mitigation() {
        let mut entity = LivingEntity::new("Knight");
        assert_eq!(entity.mitigate(4.0), 4.0);
        entity.attributes.base.insert(Attribute::Armor, 10.0);
        assert!((entity.mitigate(4.0) - 2.4).abs() < 1e-9);
    }
}
