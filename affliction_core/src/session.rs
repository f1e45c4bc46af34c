//! Join and quit handling: moving an entity's afflictions between the
//! engine and an [`AfflictionStore`].

use std::sync::Arc;
use tracing::{debug, error, info};
use world_host::{EntityId, GameHost};

use crate::config::PlayerLookup;
use crate::engine::AfflictionEngine;
use crate::error::Result;
use crate::persistence::{AfflictionStore, EntityRecord};

pub struct Sessions {
    engine: Arc<AfflictionEngine>,
    store: Arc<dyn AfflictionStore>,
    lookup: PlayerLookup,
}

impl Sessions {
    pub fn new(engine: Arc<AfflictionEngine>, store: Arc<dyn AfflictionStore>, lookup: PlayerLookup) -> Self {
        Self { engine, store, lookup }
    }

    pub fn engine(&self) -> &Arc<AfflictionEngine> {
        &self.engine
    }

    pub fn lookup(&self) -> PlayerLookup {
        self.lookup
    }

    /// Load and restore the entity's afflictions. Returns how many were restored.
    ///
    /// On a storage failure the entity starts with no afflictions and the error is returned.
    pub fn join(&self, host: &mut dyn GameHost, entity: EntityId) -> Result<usize> {
        let record = match self.find(host, entity) {
            Ok(record) => record,
            Err(err) => {
                error!(entity = %entity, error = %err, "failed to load afflictions");
                self.engine.ensure_loaded(entity);
                return Err(err);
            }
        };

        let Some(mut record) = record else {
            debug!(entity = %entity, "no saved afflictions");
            self.engine.ensure_loaded(entity);
            return Ok(0);
        };

        // A record found by name may have been saved under another id.
        record.entity = entity;
        Ok(self.engine.restore(host, &record))
    }

    /// Save the entity's afflictions and drop its state. On a failed save the
    /// state stays loaded.
    pub fn quit(&self, host: &dyn GameHost, entity: EntityId) -> Result<()> {
        let record = self.engine.snapshot(host, entity);
        if let Err(err) = self.store.save(&record) {
            error!(entity = %entity, error = %err, "failed to save afflictions");
            return Err(err);
        }

        self.engine.unload(entity);
        info!(entity = %entity, count = record.afflictions.len(), "afflictions saved");
        Ok(())
    }

    fn find(&self, host: &dyn GameHost, entity: EntityId) -> Result<Option<EntityRecord>> {
        let name = host.display_name(entity);
        match (self.lookup, name) {
            (PlayerLookup::Uuid, _) | (_, None) => self.store.load(entity),
            (PlayerLookup::Name, Some(name)) => match self.store.load_by_name(&name)? {
                Some(record) => Ok(Some(record)),
                None => self.store.load(entity),
            },
            (PlayerLookup::Auto, Some(name)) => match self.store.load(entity)? {
                Some(record) => Ok(Some(record)),
                None => self.store.load_by_name(&name),
            },
        }
    }
}

impl std::fmt::Debug for Sessions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sessions")
            .field("engine", &self.engine)
            .field("lookup", &self.lookup)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use world_host::SimulatedWorld;

    use super::*;
    use crate::persistence::{AfflictionRecord, MemoryStore};
    use crate::resource::BLOOD_KEY;
    use crate::vampirism::{build_vampirism, VampirismConfig, VAMPIRISM_ID};

    fn sessions(lookup: PlayerLookup) -> (Sessions, Arc<MemoryStore>) {
        let engine = Arc::new(AfflictionEngine::with_defaults());
        engine.register(build_vampirism(&VampirismConfig::default()).unwrap()).unwrap();
        let store = Arc::new(MemoryStore::new());
        (Sessions::new(engine, store.clone(), lookup), store)
    }

    fn vampire_record(entity: EntityId, name: &str, blood: &str) -> EntityRecord {
        let mut record = EntityRecord::new(entity, name);
        record.afflictions.push(AfflictionRecord {
            affliction_id: VAMPIRISM_ID.to_string(),
            level: 2,
            duration: -1,
            contracted_at: 0,
            data: [(BLOOD_KEY.to_string(), blood.to_string())].into_iter().collect(),
        });
        record
    }

    #[test]
    fn test_quit_then_join_round_trip() {
        let (sessions, store) = sessions(PlayerLookup::Uuid);
        let engine = sessions.engine().clone();
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");

        engine.apply(&mut world, entity, VAMPIRISM_ID, 2);
        engine.with_instance_mut(entity, VAMPIRISM_ID, |i| i.set_data(BLOOD_KEY, 33.0));

        sessions.quit(&world, entity).unwrap();
        assert!(!engine.is_loaded(entity));
        assert_eq!(store.len(), 1);

        assert_eq!(sessions.join(&mut world, entity).unwrap(), 1);
        assert_eq!(engine.resource_value(entity, VAMPIRISM_ID, BLOOD_KEY), Some(33.0));
        assert_eq!(engine.instance_view(entity, VAMPIRISM_ID).unwrap().level(), 2);
    }

    #[test]
    fn test_join_without_record() {
        let (sessions, _) = sessions(PlayerLookup::Auto);
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Newcomer");

        assert_eq!(sessions.join(&mut world, entity).unwrap(), 0);
        assert!(sessions.engine().is_loaded(entity));
    }

    #[test]
    fn test_name_lookup_rebinds_entity() {
        let (sessions, store) = sessions(PlayerLookup::Name);
        store.save(&vampire_record(EntityId::new(), "Nosferatu", "70")).unwrap();

        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");

        assert_eq!(sessions.join(&mut world, entity).unwrap(), 1);
        assert_eq!(sessions.engine().resource_value(entity, VAMPIRISM_ID, BLOOD_KEY), Some(70.0));
    }

    #[test]
    fn test_uuid_lookup_ignores_names() {
        let (sessions, store) = sessions(PlayerLookup::Uuid);
        store.save(&vampire_record(EntityId::new(), "Nosferatu", "70")).unwrap();

        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");

        assert_eq!(sessions.join(&mut world, entity).unwrap(), 0);
    }

    #[test]
    fn test_auto_prefers_id() {
        let (sessions, store) = sessions(PlayerLookup::Auto);
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");
        store.save(&vampire_record(EntityId::new(), "Nosferatu", "10")).unwrap();
        store.save(&vampire_record(entity, "Nosferatu", "90")).unwrap();

        sessions.join(&mut world, entity).unwrap();
        assert_eq!(sessions.engine().resource_value(entity, VAMPIRISM_ID, BLOOD_KEY), Some(90.0));
    }

    #[test]
    fn test_failed_load_starts_clean() {
        let (sessions, store) = sessions(PlayerLookup::Auto);
        store.set_failing(true);
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");

        assert!(sessions.join(&mut world, entity).is_err());
        assert!(sessions.engine().is_loaded(entity));
        assert!(sessions.engine().afflictions_of(entity).is_empty());
    }

    #[test]
    fn test_failed_save_keeps_state() {
        let (sessions, store) = sessions(PlayerLookup::Uuid);
        let mut world = SimulatedWorld::new();
        let entity = world.spawn_player("Nosferatu");
        sessions.engine().apply(&mut world, entity, VAMPIRISM_ID, 1);

        store.set_failing(true);
        assert!(sessions.quit(&world, entity).is_err());
        assert!(sessions.engine().has(entity, VAMPIRISM_ID));
    }
}
