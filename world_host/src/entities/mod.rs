//! Entity definitions for the host world.

mod components;
mod living;

pub use components::*;
pub use living::*;

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use uuid::Uuid;

use crate::error::HostError;

/// Unique identifier for all entities tracked by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub Uuid);

impl EntityId {
    /// Create a new random entity ID.
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create an entity ID from a specific UUID.
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Create a nil/empty entity ID (useful for defaults).
    pub fn nil() -> Self {
        Self(Uuid::nil())
    }
}

impl Default for EntityId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for EntityId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Kinds of creatures, used to decide who can be fed upon.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CreatureKind {
    Player,
    Villager,
    WanderingTrader,
    Pillager,
    Witch,
    Cow,
    Pig,
    Sheep,
    Chicken,
    Horse,
    Wolf,
    Zombie,
    Skeleton,
    Creeper,
    Spider,
    Enderman,
    Blaze,
    IronGolem,
}

impl FromStr for CreatureKind {
    type Err = HostError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let kind = match s.trim().to_ascii_uppercase().as_str() {
            "PLAYER" => CreatureKind::Player,
            "VILLAGER" => CreatureKind::Villager,
            "WANDERING_TRADER" => CreatureKind::WanderingTrader,
            "PILLAGER" => CreatureKind::Pillager,
            "WITCH" => CreatureKind::Witch,
            "COW" => CreatureKind::Cow,
            "PIG" => CreatureKind::Pig,
            "SHEEP" => CreatureKind::Sheep,
            "CHICKEN" => CreatureKind::Chicken,
            "HORSE" => CreatureKind::Horse,
            "WOLF" => CreatureKind::Wolf,
            "ZOMBIE" => CreatureKind::Zombie,
            "SKELETON" => CreatureKind::Skeleton,
            "CREEPER" => CreatureKind::Creeper,
            "SPIDER" => CreatureKind::Spider,
            "ENDERMAN" => CreatureKind::Enderman,
            "BLAZE" => CreatureKind::Blaze,
            "IRON_GOLEM" => CreatureKind::IronGolem,
            _ => return Err(HostError::unknown("creature", s)),
        };
        Ok(kind)
    }
}
