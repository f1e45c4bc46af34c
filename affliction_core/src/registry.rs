//! Affliction registry - id to definition lookup.
//!
//! Ids are case-insensitive. Registering an id twice is rejected; the first
//! definition stays in place.

use dashmap::DashMap;
use std::sync::Arc;
use tracing::{debug, warn};

use crate::affliction::{AfflictionCategory, AfflictionDefinition};
use crate::error::{AfflictionError, Result};

#[derive(Debug, Default)]
pub struct AfflictionRegistry {
    definitions: DashMap<String, Arc<AfflictionDefinition>>,
}

impl AfflictionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a definition. Fails if its id is already taken.
    pub fn register(&self, definition: AfflictionDefinition) -> Result<Arc<AfflictionDefinition>> {
        let key = definition.key().to_string();
        match self.definitions.entry(key) {
            dashmap::mapref::entry::Entry::Occupied(entry) => {
                warn!(affliction = %entry.key(), "affliction already registered, keeping the first");
                Err(AfflictionError::AlreadyRegistered(entry.key().clone()))
            }
            dashmap::mapref::entry::Entry::Vacant(entry) => {
                let definition = Arc::new(definition);
                debug!(affliction = %definition.key(), components = definition.components().len(), "registered affliction");
                entry.insert(definition.clone());
                Ok(definition)
            }
        }
    }

    pub fn get(&self, id: &str) -> Option<Arc<AfflictionDefinition>> {
        self.definitions
            .get(&id.to_lowercase())
            .map(|entry| entry.value().clone())
    }

    pub fn is_registered(&self, id: &str) -> bool {
        self.definitions.contains_key(&id.to_lowercase())
    }

    /// All registered ids (lower-cased), sorted.
    pub fn all_ids(&self) -> Vec<String> {
        let mut ids: Vec<String> = self.definitions.iter().map(|e| e.key().clone()).collect();
        ids.sort();
        ids
    }

    /// Ids of every definition in `category`, sorted.
    pub fn ids_in(&self, category: AfflictionCategory) -> Vec<String> {
        let mut ids: Vec<String> = self
            .definitions
            .iter()
            .filter(|e| e.value().category() == category)
            .map(|e| e.key().clone())
            .collect();
        ids.sort();
        ids
    }

    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }
}
