//! Persistence boundary - plain records of an entity's afflictions and the
//! store they are saved to.
//!
//! Instance data is stored as strings and parsed back leniently on restore.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::atomic::{AtomicBool, Ordering};
use tracing::{debug, info, warn};
use world_host::{EntityId, GameHost};

use crate::affliction::AfflictionInstance;
use crate::engine::AfflictionEngine;
use crate::error::{AfflictionError, Result};

/// One persisted affliction instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AfflictionRecord {
    pub affliction_id: String,
    pub level: u32,
    /// Remaining host ticks, negative for permanent.
    pub duration: i64,
    pub contracted_at: u64,
    #[serde(default)]
    pub data: BTreeMap<String, String>,
}

impl AfflictionRecord {
    pub fn from_instance(instance: &AfflictionInstance) -> Self {
        Self {
            affliction_id: instance.affliction_id().to_string(),
            level: instance.level(),
            duration: instance.duration(),
            contracted_at: instance.contracted_at(),
            data: instance.data_as_strings(),
        }
    }
}

/// Everything persisted for one entity.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EntityRecord {
    pub entity: EntityId,
    /// Display name at save time, for name-based lookup.
    pub name: String,
    #[serde(default)]
    pub afflictions: Vec<AfflictionRecord>,
}

impl EntityRecord {
    pub fn new(entity: EntityId, name: impl Into<String>) -> Self {
        Self {
            entity,
            name: name.into(),
            afflictions: Vec::new(),
        }
    }

    pub fn to_json(&self) -> Result<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(source: &str) -> Result<Self> {
        Ok(serde_json::from_str(source)?)
    }
}

/// Where entity records live between sessions.
pub trait AfflictionStore: Send + Sync {
    fn load(&self, entity: EntityId) -> Result<Option<EntityRecord>>;

    /// Case-insensitive lookup by the name saved with the record.
    fn load_by_name(&self, name: &str) -> Result<Option<EntityRecord>>;

    fn save(&self, record: &EntityRecord) -> Result<()>;
}

/// In-memory store. Can be told to fail every call.
#[derive(Debug, Default)]
pub struct MemoryStore {
    records: RwLock<HashMap<EntityId, EntityRecord>>,
    failing: AtomicBool,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose every call fails.
    pub fn failing() -> Self {
        let store = Self::new();
        store.set_failing(true);
        store
    }

    pub fn set_failing(&self, failing: bool) {
        self.failing.store(failing, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.read().is_empty()
    }

    fn check(&self) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(AfflictionError::Storage("memory store is offline".to_string()));
        }
        Ok(())
    }
}

impl AfflictionStore for MemoryStore {
    fn load(&self, entity: EntityId) -> Result<Option<EntityRecord>> {
        self.check()?;
        Ok(self.records.read().get(&entity).cloned())
    }

    fn load_by_name(&self, name: &str) -> Result<Option<EntityRecord>> {
        self.check()?;
        Ok(self
            .records
            .read()
            .values()
            .find(|record| record.name.eq_ignore_ascii_case(name))
            .cloned())
    }

    fn save(&self, record: &EntityRecord) -> Result<()> {
        self.check()?;
        self.records.write().insert(record.entity, record.clone());
        Ok(())
    }
}

impl AfflictionEngine {
    /// Record of the entity's current afflictions.
    pub fn snapshot(&self, host: &dyn GameHost, entity: EntityId) -> EntityRecord {
        let mut record = EntityRecord::new(entity, host.display_name(entity).unwrap_or_default());
        record.afflictions = self
            .afflictions_of(entity)
            .iter()
            .map(AfflictionRecord::from_instance)
            .collect();
        record
    }

    /// Rebuild the afflictions in `record` on `record.entity`, running their apply hooks.
    /// Unknown ids are skipped. Returns how many were restored.
    pub fn restore(&self, host: &mut dyn GameHost, record: &EntityRecord) -> usize {
        let entity = record.entity;
        let mut restored = 0;

        for saved in &record.afflictions {
            let Some(definition) = self.registry().get(&saved.affliction_id) else {
                warn!(
                    entity = %entity,
                    affliction = %saved.affliction_id,
                    "unknown affliction in saved data, skipping"
                );
                continue;
            };

            let mut instance =
                AfflictionInstance::new(entity, definition, saved.level, saved.duration, saved.contracted_at);
            instance.load_data(&saved.data);

            if self.attach(host, instance) {
                restored += 1;
            } else {
                debug!(entity = %entity, affliction = %saved.affliction_id, "already restored");
            }
        }

        self.ensure_loaded(entity);
        if restored > 0 {
            info!(entity = %entity, count = restored, "afflictions restored");
        }
        restored
    }
}

#[cfg(test)]
mod tests {
    use world_host::SimulatedWorld;

    use super::*;
    use crate::affliction::{AfflictionCategory, AfflictionDefinition, DefinitionSpec};
    use crate::component::testing::Recorder;
    use crate::component::Component;
    use crate::resource::BLOOD_KEY;
    use crate::vampirism::{build_vampirism, VampirismConfig, VAMPIRISM_ID};

    fn engine() -> (AfflictionEngine, Recorder) {
        let engine = AfflictionEngine::with_defaults();
        engine.register(build_vampirism(&VampirismConfig::default()).unwrap()).unwrap();
        let probe = Recorder::new("probe");
        let mut spec = DefinitionSpec::new("hex", "Hex", AfflictionCategory::Curse, 3);
        spec.components = vec![Component::new("probe", probe.clone())];
        engine.register(AfflictionDefinition::new(spec).unwrap()).unwrap();
        (engine, probe)
    }

    #[test]
    fn test_snapshot_stringifies_data() {
        let (engine, _) = engine();
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");
        engine.apply(&mut world, entity, VAMPIRISM_ID, 2);
        engine.apply_with_duration(&mut world, entity, "hex", 1, 600);

        let record = engine.snapshot(&world, entity);

        assert_eq!(record.name, "Nosferatu");
        assert_eq!(record.afflictions.len(), 2);
        let hex = &record.afflictions[0];
        assert_eq!((hex.affliction_id.as_str(), hex.level, hex.duration), ("hex", 1, 600));
        let vampirism = &record.afflictions[1];
        assert_eq!(vampirism.level, 2);
        assert_eq!(vampirism.duration, -1);
        assert_eq!(vampirism.data.get(BLOOD_KEY).map(String::as_str), Some("50"));
    }

    #[test]
    fn test_restore_preserves_data_and_reruns_apply() {
        let (engine, probe) = engine();
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");

        let mut record = EntityRecord::new(entity, "Nosferatu");
        record.afflictions.push(AfflictionRecord {
            affliction_id: "VAMPIRISM".to_string(),
            level: 3,
            duration: -1,
            contracted_at: 42,
            data: BTreeMap::from([(BLOOD_KEY.to_string(), "12.5".to_string())]),
        });
        record.afflictions.push(AfflictionRecord {
            affliction_id: "hex".to_string(),
            level: 9,
            duration: 200,
            contracted_at: 7,
            data: BTreeMap::new(),
        });

        assert_eq!(engine.restore(&mut world, &record), 2);
        assert_eq!(engine.resource_value(entity, VAMPIRISM_ID, BLOOD_KEY), Some(12.5));
        assert_eq!(probe.count("apply"), 1);

        let hex = engine.instance_view(entity, "hex").unwrap();
        assert_eq!(hex.level(), 3);
        assert_eq!(hex.duration(), 200);
        assert_eq!(hex.contracted_at(), 7);
    }

    #[test]
    fn test_unknown_ids_skipped() {
        let (engine, _) = engine();
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Casper");

        let mut record = EntityRecord::new(entity, "Casper");
        record.afflictions.push(AfflictionRecord {
            affliction_id: "ghost".to_string(),
            level: 1,
            duration: -1,
            contracted_at: 0,
            data: BTreeMap::new(),
        });

        assert_eq!(engine.restore(&mut world, &record), 0);
        assert!(engine.afflictions_of(entity).is_empty());
        assert!(engine.is_loaded(entity));
    }

    #[test]
    fn test_json_helpers() {
        let mut record = EntityRecord::new(EntityId::new(), "Nosferatu");
        record.afflictions.push(AfflictionRecord {
            affliction_id: "vampirism".to_string(),
            level: 1,
            duration: -1,
            contracted_at: 0,
            data: BTreeMap::from([(BLOOD_KEY.to_string(), "50".to_string())]),
        });

        let json = record.to_json().unwrap();
        assert!(json.contains("\"affliction_id\": \"vampirism\""));
        assert_eq!(EntityRecord::from_json(&json).unwrap(), record);
        assert!(matches!(EntityRecord::from_json("{"), Err(AfflictionError::Json(_))));
    }

    #[test]
    fn test_memory_store() {
        let store = MemoryStore::new();
        let entity = EntityId::new();
        store.save(&EntityRecord::new(entity, "Nosferatu")).unwrap();

        assert_eq!(store.len(), 1);
        assert!(store.load(entity).unwrap().is_some());
        assert!(store.load(EntityId::new()).unwrap().is_none());
        assert_eq!(store.load_by_name("nosferatu").unwrap().unwrap().entity, entity);

        store.set_failing(true);
        assert!(matches!(store.load(entity), Err(AfflictionError::Storage(_))));
        assert!(MemoryStore::failing().save(&EntityRecord::new(entity, "x")).is_err());
    }
}
