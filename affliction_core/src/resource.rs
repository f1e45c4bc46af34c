//! Resource pools - clamped numeric values kept in an instance's data bag.
//!
//! These are free functions over the instance so any component of an
//! affliction can read or change a pool without owning it.

use crate::affliction::AfflictionInstance;

/// Key of the vampiric blood pool.
pub const BLOOD_KEY: &str = "blood";

/// Current value; zero if unset or not numeric.
pub fn get(instance: &AfflictionInstance, key: &str) -> f64 {
    instance.number(key)
}

/// Set the value, clamped to `[0, max]`.
pub fn set(instance: &mut AfflictionInstance, key: &str, amount: f64, max: f64) {
    instance.set_data(key, clamp(amount, max));
}

/// Add up to `amount` without exceeding `max`. Returns what was actually added.
pub fn add(instance: &mut AfflictionInstance, key: &str, amount: f64, max: f64) -> f64 {
    let current = get(instance, key);
    let updated = clamp(current + amount.max(0.0), max);
    instance.set_data(key, updated);
    (updated - current).max(0.0)
}

/// Remove up to `amount` without going below zero. Returns what was actually removed.
pub fn drain(instance: &mut AfflictionInstance, key: &str, amount: f64) -> f64 {
    let current = get(instance, key);
    let updated = (current - amount.max(0.0)).max(0.0);
    instance.set_data(key, updated);
    (current - updated).max(0.0)
}

/// Fill level in percent; zero when `max <= 0`.
pub fn percent(instance: &AfflictionInstance, key: &str, max: f64) -> f64 {
    if max <= 0.0 {
        return 0.0;
    }
    get(instance, key) / max * 100.0
}

pub fn is_empty(instance: &AfflictionInstance, key: &str) -> bool {
    get(instance, key) <= 0.0
}

fn clamp(amount: f64, max: f64) -> f64 {
    if amount.is_nan() {
        return 0.0;
    }
    amount.max(0.0).min(max.max(0.0))
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use world_host::EntityId;

    use super::*;
    use crate::affliction::{AfflictionCategory, AfflictionDefinition, DefinitionSpec, PERMANENT};

    fn instance() -> AfflictionInstance {
        let definition = AfflictionDefinition::new(DefinitionSpec::new(
            "thirst",
            "Thirst",
            AfflictionCategory::Supernatural,
            1,
        ))
        .unwrap();
        AfflictionInstance::new(EntityId::new(), Arc::new(definition), 1, PERMANENT, 0)
    }

    #[test]
    fn test_drain_below_zero_then_refill() {
        let mut instance = instance();
        set(&mut instance, BLOOD_KEY, 50.0, 100.0);

        assert_eq!(drain(&mut instance, BLOOD_KEY, 60.0), 50.0);
        assert_eq!(get(&instance, BLOOD_KEY), 0.0);
        assert!(is_empty(&instance, BLOOD_KEY));

        assert_eq!(add(&mut instance, BLOOD_KEY, 30.0, 100.0), 30.0);
        assert_eq!(get(&instance, BLOOD_KEY), 30.0);
    }

    #[test]
    fn test_add_beyond_max_returns_portion_that_fit() {
        let mut instance = instance();
        set(&mut instance, BLOOD_KEY, 90.0, 100.0);
        assert_eq!(add(&mut instance, BLOOD_KEY, 25.0, 100.0), 10.0);
        assert_eq!(get(&instance, BLOOD_KEY), 100.0);
    }

    #[test]
    fn test_value_always_within_bounds() {
        let mut instance = instance();
        let max = 40.0;
        let steps = [15.0, -3.0, 80.0, -200.0, 7.5, 33.0, -12.25, 0.0, 41.0];
        for (n, step) in steps.iter().enumerate() {
            if n % 2 == 0 {
                add(&mut instance, BLOOD_KEY, *step, max);
            } else {
                drain(&mut instance, BLOOD_KEY, -*step);
            }
            let value = get(&instance, BLOOD_KEY);
            assert!((0.0..=max).contains(&value), "value {value} out of range");
        }
    }

    #[test]
    fn test_percent_and_unset_values() {
        let mut instance = instance();
        assert_eq!(get(&instance, "mana"), 0.0);
        assert_eq!(percent(&instance, "mana", 0.0), 0.0);

        set(&mut instance, "mana", 25.0, 50.0);
        assert_eq!(percent(&instance, "mana", 50.0), 50.0);

        instance.set_data("mana", "not a number");
        assert_eq!(get(&instance, "mana"), 0.0);
    }

    #[test]
    fn test_set_clamps() {
        let mut instance = instance();
        set(&mut instance, BLOOD_KEY, 150.0, 100.0);
        assert_eq!(get(&instance, BLOOD_KEY), 100.0);
        set(&mut instance, BLOOD_KEY, -5.0, 100.0);
        assert_eq!(get(&instance, BLOOD_KEY), 0.0);
    }
}
