//! The affliction engine - registry, per-entity state and the administrative operations.
//!
//! Apply and remove run synchronously on the caller's thread and invoke every
//! component hook once, in declaration order. Ticking lives in [`scheduler`].

mod scheduler;

pub use scheduler::*;

use dashmap::DashMap;
use parking_lot::{Mutex, RwLock};
use serde::{Deserialize, Serialize};
use std::sync::atomic::{AtomicBool, AtomicU64};
use std::sync::Arc;
use tracing::{debug, info, warn};
use world_host::{EntityId, GameHost, TaskId};

use crate::affliction::{AfflictionCategory, AfflictionDefinition, AfflictionInstance};
use crate::config::{EngineConfig, GeneralConfig};
use crate::error::{AfflictionError, Result};
use crate::registry::AfflictionRegistry;
use crate::state::EntityAfflictionState;

/// Why an affliction was taken off an entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RemovalReason {
    Cured,
    Expired,
    Admin,
    Death,
    Other,
}

impl std::fmt::Display for RemovalReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            RemovalReason::Cured => "cured",
            RemovalReason::Expired => "expired",
            RemovalReason::Admin => "admin",
            RemovalReason::Death => "death",
            RemovalReason::Other => "other",
        };
        f.write_str(name)
    }
}

/// Owns every definition and every entity's afflictions.
pub struct AfflictionEngine {
    settings: GeneralConfig,
    registry: AfflictionRegistry,
    entities: DashMap<EntityId, EntityAfflictionState>,
    /// Entities with at least one affliction; rebuilt lazily after add/remove.
    tracked: RwLock<Option<Vec<EntityId>>>,
    tick_counter: AtomicU64,
    ticking: AtomicBool,
    task: Mutex<Option<TaskId>>,
}

impl AfflictionEngine {
    pub fn new(config: &EngineConfig) -> Self {
        Self {
            settings: config.general.clone(),
            registry: AfflictionRegistry::new(),
            entities: DashMap::new(),
            tracked: RwLock::new(None),
            tick_counter: AtomicU64::new(0),
            ticking: AtomicBool::new(false),
            task: Mutex::new(None),
        }
    }

    pub fn with_defaults() -> Self {
        Self::new(&EngineConfig::default())
    }

    pub fn settings(&self) -> &GeneralConfig {
        &self.settings
    }

    pub fn registry(&self) -> &AfflictionRegistry {
        &self.registry
    }

    /// Register a definition with the engine's registry.
    pub fn register(&self, definition: AfflictionDefinition) -> Result<Arc<AfflictionDefinition>> {
        self.registry.register(definition)
    }

    // Administrative operations

    /// Apply an affliction at `level` with the definition's own duration.
    /// Returns false for unknown ids and for afflictions the entity already has.
    pub fn apply(&self, host: &mut dyn GameHost, entity: EntityId, id: &str, level: u32) -> bool {
        self.try_apply(host, entity, id, level, None).is_ok()
    }

    /// Apply with an explicit duration in host ticks (negative for permanent).
    pub fn apply_with_duration(
        &self,
        host: &mut dyn GameHost,
        entity: EntityId,
        id: &str,
        level: u32,
        duration: i64,
    ) -> bool {
        self.try_apply(host, entity, id, level, Some(duration)).is_ok()
    }

    /// Like [`apply`](Self::apply) but says why it failed.
    pub fn try_apply(
        &self,
        host: &mut dyn GameHost,
        entity: EntityId,
        id: &str,
        level: u32,
        duration: Option<i64>,
    ) -> Result<()> {
        let Some(definition) = self.registry.get(id) else {
            warn!(entity = %entity, affliction = %id, "cannot apply unknown affliction");
            return Err(AfflictionError::UnknownAffliction(id.to_string()));
        };

        if let Some(state) = self.entities.get(&entity) {
            if state.has(definition.key()) {
                debug!(entity = %entity, affliction = %definition.key(), "already afflicted");
                return Err(AfflictionError::DuplicateAffliction(definition.key().to_string()));
            }
            if definition.category() == AfflictionCategory::Supernatural
                && !self.settings.hybrid_supernaturals
            {
                if let Some(existing) = state.supernatural() {
                    warn!(
                        entity = %entity,
                        affliction = %definition.key(),
                        existing = %existing,
                        "entity already carries a supernatural affliction"
                    );
                    return Err(AfflictionError::DuplicateAffliction(existing));
                }
            }
        }

        let duration = duration.unwrap_or_else(|| definition.duration_for(level));
        let instance = AfflictionInstance::new(entity, definition.clone(), level, duration, host.now_millis());
        let level = instance.level();

        if !self.attach(host, instance) {
            return Err(AfflictionError::DuplicateAffliction(definition.key().to_string()));
        }

        info!(
            entity = %entity,
            affliction = %definition.key(),
            level,
            duration,
            "affliction contracted"
        );
        Ok(())
    }

    /// Run every apply hook on `instance` and store it. Undoes the hooks if the
    /// entity gained the same affliction in the meantime.
    pub(crate) fn attach(&self, host: &mut dyn GameHost, mut instance: AfflictionInstance) -> bool {
        let entity = instance.entity();
        let definition = instance.affliction().clone();

        for component in definition.components() {
            component.apply(host, entity, &mut instance);
        }

        let rejected = {
            let state = self
                .entities
                .entry(entity)
                .or_insert_with(|| EntityAfflictionState::new(entity));
            if state.has(definition.key()) {
                Some(instance)
            } else {
                state.add(instance);
                None
            }
        };

        if let Some(mut instance) = rejected {
            for component in definition.components() {
                component.remove(host, entity, &mut instance);
            }
            return false;
        }

        self.invalidate_tracked();
        true
    }

    /// Remove an affliction, running every remove hook once.
    pub fn remove(&self, host: &mut dyn GameHost, entity: EntityId, id: &str, reason: RemovalReason) -> bool {
        let removed = match self.entities.get(&entity) {
            Some(state) => state.remove(id),
            None => None,
        };
        let Some(mut instance) = removed else {
            return false;
        };

        let definition = instance.affliction().clone();
        for component in definition.components() {
            component.remove(host, entity, &mut instance);
        }
        self.invalidate_tracked();

        info!(
            entity = %entity,
            affliction = %definition.key(),
            reason = %reason,
            "affliction removed"
        );
        true
    }

    /// Remove every affliction from the entity.
    pub fn clear(&self, host: &mut dyn GameHost, entity: EntityId, reason: RemovalReason) {
        let drained = match self.entities.get(&entity) {
            Some(state) => state.clear(),
            None => return,
        };

        for mut instance in drained {
            let definition = instance.affliction().clone();
            for component in definition.components() {
                component.remove(host, entity, &mut instance);
            }
            info!(
                entity = %entity,
                affliction = %definition.key(),
                reason = %reason,
                "affliction removed"
            );
        }
        self.invalidate_tracked();
    }

    pub fn has(&self, entity: EntityId, id: &str) -> bool {
        self.entities
            .get(&entity)
            .map(|state| state.has(id))
            .unwrap_or(false)
    }

    /// Change the level (clamped to the definition's range). Returns false if absent.
    pub fn set_level(&self, entity: EntityId, id: &str, level: u32) -> bool {
        self.with_instance_mut(entity, id, |instance| instance.set_level(level))
            .is_some()
    }

    // Queries

    /// Copy of one instance.
    pub fn instance_view(&self, entity: EntityId, id: &str) -> Option<AfflictionInstance> {
        let state = self.entities.get(&entity)?;
        let instance = state.get(id)?;
        Some(instance.clone())
    }

    /// Run `f` against one instance in place.
    pub fn with_instance_mut<R>(
        &self,
        entity: EntityId,
        id: &str,
        f: impl FnOnce(&mut AfflictionInstance) -> R,
    ) -> Option<R> {
        let state = self.entities.get(&entity)?;
        let mut instance = state.get_mut(id)?;
        Some(f(&mut instance))
    }

    /// Copies of all the entity's instances, sorted by id.
    pub fn afflictions_of(&self, entity: EntityId) -> Vec<AfflictionInstance> {
        self.entities
            .get(&entity)
            .map(|state| state.snapshots())
            .unwrap_or_default()
    }

    /// Value of a resource pool, for overlays and placeholders.
    pub fn resource_value(&self, entity: EntityId, id: &str, key: &str) -> Option<f64> {
        let state = self.entities.get(&entity)?;
        let instance = state.get(id)?;
        Some(crate::resource::get(&instance, key))
    }

    /// Whether the engine holds any state for the entity.
    pub fn is_loaded(&self, entity: EntityId) -> bool {
        self.entities.contains_key(&entity)
    }

    /// Drop the entity's state without running remove hooks (the entity left).
    pub fn unload(&self, entity: EntityId) -> Option<EntityAfflictionState> {
        let removed = self.entities.remove(&entity).map(|(_, state)| state);
        if removed.is_some() {
            self.invalidate_tracked();
        }
        removed
    }

    /// Make sure the entity has a (possibly empty) state.
    pub(crate) fn ensure_loaded(&self, entity: EntityId) {
        self.entities
            .entry(entity)
            .or_insert_with(|| EntityAfflictionState::new(entity));
    }

    /// Entities with at least one affliction, sorted.
    pub fn tracked_entities(&self) -> Vec<EntityId> {
        if let Some(cached) = self.tracked.read().as_ref() {
            return cached.clone();
        }

        // Rebuild under the write lock so a concurrent invalidation lands after it.
        let mut cache = self.tracked.write();
        if let Some(cached) = cache.as_ref() {
            return cached.clone();
        }

        let mut tracked: Vec<EntityId> = self
            .entities
            .iter()
            .filter(|entry| !entry.value().is_empty())
            .map(|entry| *entry.key())
            .collect();
        tracked.sort();

        *cache = Some(tracked.clone());
        tracked
    }

    fn invalidate_tracked(&self) {
        *self.tracked.write() = None;
    }
}

impl std::fmt::Debug for AfflictionEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AfflictionEngine")
            .field("registered", &self.registry.len())
            .field("entities", &self.entities.len())
            .field("tick", &self.tick_count())
            .finish()
    }
}
