//! Entity affliction state - the afflictions one entity currently carries.

use dashmap::mapref::one::{Ref, RefMut};
use dashmap::DashMap;
use world_host::EntityId;

use crate::affliction::{AfflictionCategory, AfflictionInstance};

/// Instances keyed by lower-cased affliction id, at most one per id.
///
/// The map is safe to read from query paths while the tick path mutates it.
#[derive(Debug)]
pub struct EntityAfflictionState {
    entity: EntityId,
    instances: DashMap<String, AfflictionInstance>,
}

impl EntityAfflictionState {
    pub fn new(entity: EntityId) -> Self {
        Self {
            entity,
            instances: DashMap::new(),
        }
    }

    pub fn entity(&self) -> EntityId {
        self.entity
    }

    /// Add an instance. Returns false, leaving the existing one untouched, if the id is present.
    pub fn add(&self, instance: AfflictionInstance) -> bool {
        let key = instance.affliction_id().to_string();
        match self.instances.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(_) => false,
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                entry.insert(instance);
                true
            }
        }
    }

    pub fn remove(&self, id: &str) -> Option<AfflictionInstance> {
        self.instances.remove(&id.to_lowercase()).map(|(_, instance)| instance)
    }

    pub fn has(&self, id: &str) -> bool {
        self.instances.contains_key(&id.to_lowercase())
    }

    pub fn get(&self, id: &str) -> Option<Ref<'_, String, AfflictionInstance>> {
        self.instances.get(&id.to_lowercase())
    }

    pub fn get_mut(&self, id: &str) -> Option<RefMut<'_, String, AfflictionInstance>> {
        self.instances.get_mut(&id.to_lowercase())
    }

    /// Ids currently held, sorted.
    pub fn ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.instances.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Ids of held afflictions in `category`, sorted.
    pub fn ids_in(&self, category: AfflictionCategory) -> Vec<String> {
        let mut ids: Vec<String> = self
            .instances
            .iter()
            .filter(|e| e.value().affliction().category() == category)
            .map(|e| e.key().clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn curses(&self) -> Vec<String> {
        self.ids_in(AfflictionCategory::Curse)
    }

    /// The supernatural affliction, if any. With hybrids allowed, the first by id.
    pub fn supernatural(&self) -> Option<String> {
        self.ids_in(AfflictionCategory::Supernatural).into_iter().next()
    }

    /// Snapshots of every instance, sorted by id.
    pub fn snapshots(&self) -> Vec<AfflictionInstance> {
        let mut all: Vec<AfflictionInstance> = self.instances.iter().map(|e| e.value().clone()).collect();
        all.sort_by(|a, b| a.affliction_id().cmp(b.affliction_id()));
        all
    }

    pub fn len(&self) -> usize {
        self.instances.len()
    }

    pub fn is_empty(&self) -> bool {
        self.instances.is_empty()
    }

    /// Remove everything and hand the instances back. Remove hooks are the caller's job.
    pub fn clear(&self) -> Vec<AfflictionInstance> {
        let mut drained = Vec::with_capacity(self.instances.len());
        for id in self.ids() {
            if let Some(instance) = self.remove(&id) {
                drained.push(instance);
            }
        }
        drained
    }
}
