//! The blood pool: seeded on contraction, drained a little every tick.

use world_host::{EntityId, GameHost};

use super::BloodConfig;
use crate::affliction::AfflictionInstance;
use crate::component::{Component, Effect};
use crate::resource::{self, BLOOD_KEY};

#[derive(Debug, Clone, PartialEq)]
pub struct BloodPool {
    pub max_blood: f64,
    pub start_blood: f64,
    pub passive_drain: f64,
}

impl BloodPool {
    pub fn from_config(config: &BloodConfig) -> Self {
        Self {
            max_blood: config.max_blood,
            start_blood: config.start_blood,
            passive_drain: config.passive_drain,
        }
    }

    pub fn into_component(self, id: impl Into<String>) -> Component {
        Component::ticking(id, 1, self)
    }
}

impl Effect for BloodPool {
    /// Seeds the pool unless a restored value is already there.
    fn on_apply(&self, _host: &mut dyn GameHost, _entity: EntityId, instance: &mut AfflictionInstance) {
        if !instance.has_data(BLOOD_KEY) {
            resource::set(instance, BLOOD_KEY, self.start_blood, self.max_blood);
        }
    }

    fn on_tick(&self, _host: &mut dyn GameHost, _entity: EntityId, instance: &mut AfflictionInstance) {
        if self.passive_drain > 0.0 {
            resource::drain(instance, BLOOD_KEY, self.passive_drain);
        }
    }
}
