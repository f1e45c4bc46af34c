//! Per-entity runtime record of an applied affliction.

use std::collections::{BTreeMap, HashMap};
use std::sync::Arc;

use world_host::EntityId;

use super::{AfflictionDefinition, DataValue};

/// Duration value meaning "never expires".
pub const PERMANENT: i64 = -1;

/// One affliction on one entity: level, remaining duration and component scratch data.
#[derive(Debug, Clone)]
pub struct AfflictionInstance {
    entity: EntityId,
    affliction: Arc<AfflictionDefinition>,
    level: u32,
    /// Remaining host ticks; negative means permanent.
    duration: i64,
    /// Host milliseconds at contraction.
    contracted_at: u64,
    data: HashMap<String, DataValue>,
}

impl AfflictionInstance {
    /// Create an instance. The level is clamped to the definition's range.
    pub fn new(
        entity: EntityId,
        affliction: Arc<AfflictionDefinition>,
        level: u32,
        duration: i64,
        contracted_at: u64,
    ) -> Self {
        let level = affliction.clamp_level(level);
        Self {
            entity,
            affliction,
            level,
            duration,
            contracted_at,
            data: HashMap::new(),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    pub fn affliction(&self) -> &Arc<AfflictionDefinition> {
        &self.affliction
    }

    /// Lower-cased affliction id.
    pub fn affliction_id(&self) -> &str {
        self.affliction.key()
    }

    pub fn level(&self) -> u32 {
        self.level
    }

    /// Set the level, clamped to `[1, max_level]`.
    pub fn set_level(&mut self, level: u32) {
        self.level = self.affliction.clamp_level(level);
    }

    pub fn duration(&self) -> i64 {
        self.duration
    }

    pub fn set_duration(&mut self, duration: i64) {
        self.duration = duration;
    }

    pub fn is_permanent(&self) -> bool {
        self.duration < 0
    }

    /// Count the duration down. Returns true once a timed instance has run out.
    pub fn tick_down(&mut self, ticks: u64) -> bool {
        if self.is_permanent() {
            return false;
        }
        self.duration = self
            .duration
            .saturating_sub(i64::try_from(ticks).unwrap_or(i64::MAX));
        self.duration <= 0
    }

    pub fn contracted_at(&self) -> u64 {
        self.contracted_at
    }

    // Data bag

    pub fn data(&self, key: &str) -> Option<&DataValue> {
        self.data.get(key)
    }

    pub fn set_data(&mut self, key: impl Into<String>, value: impl Into<DataValue>) {
        self.data.insert(key.into(), value.into());
    }

    pub fn remove_data(&mut self, key: &str) -> Option<DataValue> {
        self.data.remove(key)
    }

    pub fn has_data(&self, key: &str) -> bool {
        self.data.contains_key(key)
    }

    /// Flag value; unset or non-boolean reads as false.
    pub fn flag(&self, key: &str) -> bool {
        self.data(key).and_then(DataValue::as_bool).unwrap_or(false)
    }

    /// Numeric value; unset or non-numeric reads as zero.
    pub fn number(&self, key: &str) -> f64 {
        self.data(key).and_then(DataValue::as_f64).unwrap_or(0.0)
    }

    /// Integer value; unset or non-integer reads as zero.
    pub fn integer(&self, key: &str) -> i64 {
        self.data(key).and_then(DataValue::as_i64).unwrap_or(0)
    }

    pub fn text(&self, key: &str) -> Option<&str> {
        self.data(key).and_then(DataValue::as_text)
    }

    /// All data keys and values.
    pub fn data_entries(&self) -> impl Iterator<Item = (&String, &DataValue)> {
        self.data.iter()
    }

    /// Data bag rendered as strings, sorted by key.
    pub fn data_as_strings(&self) -> BTreeMap<String, String> {
        self.data
            .iter()
            .map(|(key, value)| (key.clone(), value.to_persisted()))
            .collect()
    }

    /// Load persisted string values into the data bag.
    pub fn load_data<'a>(&mut self, entries: impl IntoIterator<Item = (&'a String, &'a String)>) {
        for (key, raw) in entries {
            self.data.insert(key.clone(), DataValue::parse(raw));
        }
    }
}
