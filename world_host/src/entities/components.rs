//! Component definitions for living entities.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

use crate::mechanics::{Attribute, AttributeModifier, EffectType, ModifierOperation, TimedEffect};

/// Attribute values for an entity: a base per attribute plus keyed modifiers.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AttributeComponent {
    /// Overridden base values; attributes not listed use [`Attribute::default_base`].
    pub base: HashMap<Attribute, f64>,
    pub modifiers: HashMap<Attribute, Vec<AttributeModifier>>,
}

impl AttributeComponent {
    /// Base value of an attribute.
    pub fn base_value(&self, attribute: Attribute) -> f64 {
        self.base
            .get(&attribute)
            .copied()
            .unwrap_or_else(|| attribute.default_base())
    }

    /// Add a modifier. Returns false if a modifier with the same key already exists.
    pub fn add_modifier(&mut self, attribute: Attribute, modifier: AttributeModifier) -> bool {
        let list = self.modifiers.entry(attribute).or_default();
        if list.iter().any(|m| m.key == modifier.key) {
            return false;
        }
        list.push(modifier);
        true
    }

    /// Remove a modifier by key. Returns true if one was removed.
    pub fn remove_modifier(&mut self, attribute: Attribute, key: &str) -> bool {
        let Some(list) = self.modifiers.get_mut(&attribute) else {
            return false;
        };
        let before = list.len();
        list.retain(|m| m.key != key);
        before != list.len()
    }

    /// All modifiers currently on an attribute.
    pub fn modifiers_of(&self, attribute: Attribute) -> &[AttributeModifier] {
        self.modifiers
            .get(&attribute)
            .map(|v| v.as_slice())
            .unwrap_or(&[])
    }

    /// Final value: additions first, then scalar additions, then multipliers.
    pub fn value(&self, attribute: Attribute) -> f64 {
        let base = self.base_value(attribute);
        let modifiers = self.modifiers_of(attribute);

        let mut total = base;
        for m in modifiers.iter().filter(|m| m.operation == ModifierOperation::AddNumber) {
            total += m.amount;
        }
        let added = total;
        for m in modifiers.iter().filter(|m| m.operation == ModifierOperation::AddScalar) {
            total += added * m.amount;
        }
        for m in modifiers
            .iter()
            .filter(|m| m.operation == ModifierOperation::MultiplyScalarOne)
        {
            total *= 1.0 + m.amount;
        }
        total
    }
}

/// Timed effects currently active on an entity, at most one per type.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EffectComponent {
    pub active: HashMap<EffectType, TimedEffect>,
}

impl EffectComponent {
    /// Add an effect. A weaker effect never replaces a stronger one that still runs;
    /// an equal or stronger one refreshes it.
    pub fn add(&mut self, effect: TimedEffect) -> bool {
        if let Some(existing) = self.active.get(&effect.effect_type) {
            if existing.amplifier > effect.amplifier && existing.duration_ticks > 0 {
                return false;
            }
        }
        self.active.insert(effect.effect_type, effect);
        true
    }

    pub fn remove(&mut self, effect_type: EffectType) -> bool {
        self.active.remove(&effect_type).is_some()
    }

    pub fn get(&self, effect_type: EffectType) -> Option<&TimedEffect> {
        self.active.get(&effect_type)
    }

    /// Count down all effects by `ticks`, dropping the ones that ran out.
    pub fn advance(&mut self, ticks: u32) {
        for effect in self.active.values_mut() {
            effect.duration_ticks = effect.duration_ticks.saturating_sub(ticks);
        }
        self.active.retain(|_, e| e.duration_ticks > 0);
    }
}

/// Worn equipment relevant to environmental checks.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EquipmentComponent {
    pub helmet: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_attribute_value_with_modifiers() {
        let mut attrs = AttributeComponent::default();
        attrs.base.insert(Attribute::AttackDamage, 4.0);

        assert!(attrs.add_modifier(
            Attribute::AttackDamage,
            AttributeModifier::new("a", -1.0, ModifierOperation::AddNumber),
        ));
        assert!(attrs.add_modifier(
            Attribute::AttackDamage,
            AttributeModifier::new("b", 0.5, ModifierOperation::MultiplyScalarOne),
        ));
        assert!((attrs.value(Attribute::AttackDamage) - 4.5).abs() < 1e-9);

        assert!(attrs.remove_modifier(Attribute::AttackDamage, "b"));
        assert!((attrs.value(Attribute::AttackDamage) - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_duplicate_modifier_key_rejected() {
        let mut attrs = AttributeComponent::default();
        let modifier = AttributeModifier::new("k", 1.0, ModifierOperation::AddNumber);
        assert!(attrs.add_modifier(Attribute::Armor, modifier.clone()));
        assert!(!attrs.add_modifier(Attribute::Armor, modifier));
        assert_eq!(attrs.modifiers_of(Attribute::Armor).len(), 1);
    }

    #[test]
    fn test_effect_refresh_and_expiry() {
        let mut effects = EffectComponent::default();
        assert!(effects.add(TimedEffect::new(EffectType::Weakness, 100, 1)));
        assert!(!effects.add(TimedEffect::new(EffectType::Weakness, 100, 0)));
        assert!(effects.add(TimedEffect::new(EffectType::Weakness, 200, 1)));
        assert_eq!(effects.get(EffectType::Weakness).unwrap().duration_ticks, 200);

        effects.advance(150);
        assert_eq!(effects.get(EffectType::Weakness).unwrap().duration_ticks, 50);
        effects.advance(50);
        assert!(effects.get(EffectType::Weakness).is_none());
    }
}
