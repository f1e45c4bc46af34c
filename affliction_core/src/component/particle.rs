//! Periodic particle burst around the entity.

use world_host::{EntityId, GameHost, ParticleBurst, ParticleKind};

use super::{Component, Effect};
use crate::affliction::AfflictionInstance;

#[derive(Debug, Clone, PartialEq)]
pub struct ParticleAura {
    pub burst: ParticleBurst,
}

impl ParticleAura {
    pub const DEFAULT_INTERVAL: u64 = 20;

    pub fn new(burst: ParticleBurst) -> Self {
        Self { burst }
    }

    pub fn into_component(self, id: impl Into<String>, interval: u64) -> Component {
        Component::ticking(id, interval, self)
    }
}

impl Default for ParticleAura {
    fn default() -> Self {
        Self::new(ParticleBurst {
            kind: ParticleKind::Witch,
            count: 5,
            offset: (0.3, 0.5, 0.3),
            speed: 0.01,
            height_offset: 1.0,
        })
    }
}

impl Effect for ParticleAura {
    fn on_tick(&self, host: &mut dyn GameHost, entity: EntityId, _instance: &mut AfflictionInstance) {
        host.spawn_particles(entity, self.burst);
    }
}
