//! The game-host interface afflictions act through.

use crate::entities::EntityId;
use crate::mechanics::{Attribute, AttributeModifier, EffectType, ParticleBurst, SoundCue, TimedEffect};
use crate::world_state::Surroundings;

/// Everything the affliction runtime needs from a live world.
///
/// Any entity may be absent on any call. Queries on an absent entity return
/// `None`/`false`/zero and mutations on it are ignored.
pub trait GameHost {
    /// Whether the entity is currently loaded and online.
    fn is_present(&self, entity: EntityId) -> bool;

    fn display_name(&self, entity: EntityId) -> Option<String>;

    /// Environment snapshot around the entity, or `None` if it is absent.
    fn surroundings(&self, entity: EntityId) -> Option<Surroundings>;

    /// Wall clock of the host in milliseconds.
    fn now_millis(&self) -> u64;

    // Timed effects

    /// Put a timed effect on the entity. Returns false if nothing was applied.
    fn add_effect(&mut self, entity: EntityId, effect: TimedEffect) -> bool;

    fn remove_effect(&mut self, entity: EntityId, effect_type: EffectType) -> bool;

    /// The currently running effect of that type, if any.
    fn active_effect(&self, entity: EntityId, effect_type: EffectType) -> Option<TimedEffect>;

    // Health

    /// Deal damage. With `bypass_armor` the damage ignores mitigation and the
    /// entity's health never drops below `floor`.
    fn damage(&mut self, entity: EntityId, amount: f64, bypass_armor: bool, floor: f64);

    fn health(&self, entity: EntityId) -> Option<f64>;

    fn fire_ticks(&self, entity: EntityId) -> u32;

    fn set_fire_ticks(&mut self, entity: EntityId, ticks: u32);

    // Cues

    fn spawn_particles(&mut self, entity: EntityId, burst: ParticleBurst);

    fn play_sound(&mut self, entity: EntityId, cue: &SoundCue);

    // Attributes

    /// Add a keyed modifier. Returns false when the entity is absent or the
    /// key is already present on that attribute.
    fn add_modifier(&mut self, entity: EntityId, attribute: Attribute, modifier: AttributeModifier) -> bool;

    fn remove_modifier(&mut self, entity: EntityId, attribute: Attribute, key: &str) -> bool;

    /// Deliver a message key to the entity. Formatting is the host's concern.
    fn notify(&mut self, entity: EntityId, key: &str);
}
