//! Affliction definitions and their per-entity instances.
//!
//! A definition is the immutable template (identity, category, level range,
//! ordered components). An instance is what one entity carries at runtime.

mod data;
mod instance;

pub use data::*;
pub use instance::*;

use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use crate::component::Component;
use crate::error::{AfflictionError, Result};

/// Broad kinds of affliction. Governs multiplicity rules.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AfflictionCategory {
    /// At most one per entity unless hybrids are allowed.
    Supernatural,
    Curse,
    Physical,
    Mental,
    Environmental,
}

impl AfflictionCategory {
    pub fn display_name(&self) -> &'static str {
        match self {
            AfflictionCategory::Supernatural => "Supernatural",
            AfflictionCategory::Curse => "Curse",
            AfflictionCategory::Physical => "Physical",
            AfflictionCategory::Mental => "Mental",
            AfflictionCategory::Environmental => "Environmental",
        }
    }
}

/// How long a freshly applied instance lasts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum DurationRule {
    #[default]
    Permanent,
    /// `base_ticks + (level - 1) * ticks_per_level`; a non-positive base means permanent.
    Timed { base_ticks: i64, ticks_per_level: i64 },
}

/// A resource pool an affliction keeps in its instances' data.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoolSpec {
    pub key: String,
    pub max: f64,
    pub start: f64,
}

impl PoolSpec {
    pub fn new(key: impl Into<String>, max: f64, start: f64) -> Self {
        Self {
            key: key.into(),
            max,
            start,
        }
    }
}

/// Everything needed to build a definition, validated at once by [`AfflictionDefinition::new`].
#[derive(Debug, Clone)]
pub struct DefinitionSpec {
    pub id: String,
    pub display_name: String,
    pub description: String,
    pub category: AfflictionCategory,
    pub max_level: u32,
    pub curable: bool,
    pub duration: DurationRule,
    /// Ordered; ticked and applied in this order.
    pub components: Vec<Component>,
    pub pools: Vec<PoolSpec>,
}

impl DefinitionSpec {
    /// A curable, permanent, component-less spec.
    pub fn new(
        id: impl Into<String>,
        display_name: impl Into<String>,
        category: AfflictionCategory,
        max_level: u32,
    ) -> Self {
        Self {
            id: id.into(),
            display_name: display_name.into(),
            description: String::new(),
            category,
            max_level,
            curable: true,
            duration: DurationRule::Permanent,
            components: Vec::new(),
            pools: Vec::new(),
        }
    }
}

/// Immutable affliction template, shared by every instance of it.
#[derive(Debug)]
pub struct AfflictionDefinition {
    id: String,
    key: String,
    display_name: String,
    description: String,
    category: AfflictionCategory,
    max_level: u32,
    curable: bool,
    duration: DurationRule,
    components: Vec<Component>,
    pools: Vec<PoolSpec>,
}

impl AfflictionDefinition {
    /// Validate a [`DefinitionSpec`] and freeze it.
    pub fn new(spec: DefinitionSpec) -> Result<Self> {
        let id = spec.id.trim().to_string();
        if id.is_empty() {
            return Err(AfflictionError::InvalidDefinition("id must not be blank".into()));
        }
        if spec.display_name.trim().is_empty() {
            return Err(AfflictionError::InvalidDefinition(format!(
                "'{id}' needs a display name"
            )));
        }
        if spec.max_level == 0 {
            return Err(AfflictionError::InvalidDefinition(format!(
                "'{id}' max level must be at least 1"
            )));
        }

        let mut seen = HashSet::new();
        for component in &spec.components {
            if !seen.insert(component.id().to_string()) {
                return Err(AfflictionError::InvalidDefinition(format!(
                    "'{id}' has duplicate component id '{}'",
                    component.id()
                )));
            }
        }

        let mut pool_keys = HashSet::new();
        for pool in &spec.pools {
            if pool.max <= 0.0 || !pool_keys.insert(pool.key.clone()) {
                return Err(AfflictionError::InvalidDefinition(format!(
                    "'{id}' has an invalid resource pool '{}'",
                    pool.key
                )));
            }
        }

        Ok(Self {
            key: id.to_lowercase(),
            id,
            display_name: spec.display_name,
            description: spec.description,
            category: spec.category,
            max_level: spec.max_level,
            curable: spec.curable,
            duration: spec.duration,
            components: spec.components,
            pools: spec.pools,
        })
    }

    /// Identifier as declared.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Lower-cased identifier used for all lookups.
    pub fn key(&self) -> &str {
        &self.key
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn category(&self) -> AfflictionCategory {
        self.category
    }

    pub fn max_level(&self) -> u32 {
        self.max_level
    }

    pub fn is_curable(&self) -> bool {
        self.curable
    }

    pub fn components(&self) -> &[Component] {
        &self.components
    }

    pub fn component(&self, id: &str) -> Option<&Component> {
        self.components.iter().find(|c| c.id() == id)
    }

    pub fn pools(&self) -> &[PoolSpec] {
        &self.pools
    }

    /// Resource pool declared under `key`.
    pub fn pool(&self, key: &str) -> Option<&PoolSpec> {
        self.pools.iter().find(|p| p.key == key)
    }

    pub fn clamp_level(&self, level: u32) -> u32 {
        level.clamp(1, self.max_level)
    }

    /// Duration in ticks for a fresh instance at `level`.
    pub fn duration_for(&self, level: u32) -> i64 {
        match self.duration {
            DurationRule::Permanent => PERMANENT,
            DurationRule::Timed {
                base_ticks,
                ticks_per_level,
            } => {
                if base_ticks <= 0 {
                    return PERMANENT;
                }
                let extra = i64::from(self.clamp_level(level) - 1) * ticks_per_level;
                (base_ticks + extra).max(1)
            }
        }
    }
}
