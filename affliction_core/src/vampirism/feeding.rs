//! Feeding: vampires regain blood by hurting living creatures.

use dashmap::DashMap;
use std::collections::HashSet;
use tracing::debug;
use world_host::{CreatureKind, EntityId, GameHost};

use super::{notices, BloodConfig, SourceMode, VAMPIRISM_ID};
use crate::engine::AfflictionEngine;
use crate::resource::{self, BLOOD_KEY};

/// At most one feeding notice per entity in this window.
pub const FEEDING_NOTICE_COOLDOWN_MS: u64 = 5_000;

/// Turns damage dealt by a vampire into blood.
#[derive(Debug)]
pub struct Feeder {
    enabled: bool,
    gain_per_damage: f64,
    max_blood: f64,
    sources_enabled: bool,
    mode: SourceMode,
    listed: HashSet<CreatureKind>,
    last_notice: DashMap<EntityId, u64>,
}

impl Feeder {
    pub fn new(config: &BloodConfig) -> Self {
        Self {
            enabled: config.enabled,
            gain_per_damage: config.gain_per_damage,
            max_blood: config.max_blood,
            sources_enabled: config.sources.enabled,
            mode: config.sources.mode,
            listed: config.sources.kinds(),
            last_notice: DashMap::new(),
        }
    }

    pub fn can_provide_blood(&self, kind: CreatureKind) -> bool {
        if !self.sources_enabled {
            return false;
        }
        let listed = self.listed.contains(&kind);
        match self.mode {
            SourceMode::Whitelist => listed,
            SourceMode::Blacklist => !listed,
        }
    }

    /// `attacker` dealt `damage` to a creature of kind `victim`. Returns the blood gained.
    pub fn feed(
        &self,
        engine: &AfflictionEngine,
        host: &mut dyn GameHost,
        attacker: EntityId,
        victim: CreatureKind,
        damage: f64,
    ) -> f64 {
        if !self.enabled || !self.can_provide_blood(victim) {
            return 0.0;
        }
        let amount = damage * self.gain_per_damage;
        if amount <= 0.0 {
            return 0.0;
        }

        let Some(gained) = engine.with_instance_mut(attacker, VAMPIRISM_ID, |instance| {
            let max = instance
                .affliction()
                .pool(BLOOD_KEY)
                .map(|pool| pool.max)
                .unwrap_or(self.max_blood);
            resource::add(instance, BLOOD_KEY, amount, max)
        }) else {
            return 0.0;
        };

        debug!(entity = %attacker, victim = ?victim, gained, "vampire fed");
        self.notify_feeding(host, attacker);
        gained
    }

    /// Forget the notice cooldown of an entity that left.
    pub fn forget(&self, entity: EntityId) {
        self.last_notice.remove(&entity);
    }

    fn notify_feeding(&self, host: &mut dyn GameHost, entity: EntityId) {
        let now = host.now_millis();
        let due = match self.last_notice.get(&entity) {
            Some(last) => now.saturating_sub(*last) >= FEEDING_NOTICE_COOLDOWN_MS,
            None => true,
        };
        if due {
            self.last_notice.insert(entity, now);
            host.notify(entity, notices::FEEDING);
        }
    }
}
