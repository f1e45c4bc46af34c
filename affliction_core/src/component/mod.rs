//! Effect components - the reusable units of behavior an affliction is made of.
//!
//! A [`Component`] pairs an id with an [`Effect`] and, when it acts periodically,
//! a tick interval. Whether a component ticks is fixed when it is built.

mod attribute;
mod conditional;
mod damage;
mod particle;
mod potion;
mod sound;

pub use attribute::*;
pub use conditional::*;
pub use damage::*;
pub use particle::*;
pub use potion::*;
pub use sound::*;

use std::fmt;
use std::sync::Arc;

use world_host::{EntityId, GameHost};

use crate::affliction::AfflictionInstance;

/// Lifecycle hooks of one component. All hooks default to no-ops.
///
/// Hooks act on the world through `host` and keep cross-tick state in the
/// instance's data bag. Missing data keys read as zero/false. Hooks may be
/// called for an entity the host no longer has; host calls are no-ops then.
pub trait Effect: Send + Sync + fmt::Debug {
    /// Called once when the affliction is attached.
    fn on_apply(&self, _host: &mut dyn GameHost, _entity: EntityId, _instance: &mut AfflictionInstance) {}

    /// Called on scheduler ticks divisible by the component's interval.
    fn on_tick(&self, _host: &mut dyn GameHost, _entity: EntityId, _instance: &mut AfflictionInstance) {}

    /// Called once when the affliction is detached. Undoes anything persistent.
    fn on_remove(&self, _host: &mut dyn GameHost, _entity: EntityId, _instance: &mut AfflictionInstance) {}
}

/// A named effect, optionally ticking every `interval` scheduler ticks.
#[derive(Clone)]
pub struct Component {
    id: String,
    tick_interval: Option<u64>,
    behavior: Arc<dyn Effect>,
}

impl Component {
    /// A component that only reacts to apply and remove.
    pub fn new(id: impl Into<String>, behavior: impl Effect + 'static) -> Self {
        Self {
            id: id.into(),
            tick_interval: None,
            behavior: Arc::new(behavior),
        }
    }

    /// A component that also ticks. Intervals below 1 are raised to 1.
    pub fn ticking(id: impl Into<String>, interval: u64, behavior: impl Effect + 'static) -> Self {
        Self {
            id: id.into(),
            tick_interval: Some(interval.max(1)),
            behavior: Arc::new(behavior),
        }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn tick_interval(&self) -> Option<u64> {
        self.tick_interval
    }

    pub fn is_tickable(&self) -> bool {
        self.tick_interval.is_some()
    }

    /// Whether this component ticks on scheduler tick `counter`.
    pub fn ticks_at(&self, counter: u64) -> bool {
        match self.tick_interval {
            Some(interval) => counter % interval == 0,
            None => false,
        }
    }

    pub fn apply(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        self.behavior.on_apply(host, entity, instance);
    }

    /// Run the tick hook. Does nothing for non-ticking components.
    pub fn tick(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        if self.is_tickable() {
            self.behavior.on_tick(host, entity, instance);
        }
    }

    pub fn remove(&self, host: &mut dyn GameHost, entity: EntityId, instance: &mut AfflictionInstance) {
        self.behavior.on_remove(host, entity, instance);
    }
}

impl fmt::Debug for Component {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Component")
            .field("id", &self.id)
            .field("tick_interval", &self.tick_interval)
            .field("behavior", &self.behavior)
            .finish()
    }
}

/// `base + (level - 1) * scaling`.
pub fn level_scaled(base: f64, scaling: f64, level: u32) -> f64 {
    base + f64::from(level.saturating_sub(1)) * scaling
}
