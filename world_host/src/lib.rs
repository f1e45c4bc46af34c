//! # World Host
//!
//! The game-host boundary consumed by the affliction runtime. This crate names the
//! things a live world provides - entity handles, time/weather/moon/dimension state,
//! timed effects, damage, attributes, particles and sounds - and ships an in-memory
//! simulated world that implements the same interface for tests and tooling.
//!
//! It contains no affliction logic.

pub mod entities;
pub mod error;
pub mod host;
pub mod mechanics;
pub mod schedule;
pub mod world_state;

pub use entities::*;
pub use error::*;
pub use host::*;
pub use mechanics::*;
pub use schedule::*;
pub use world_state::*;
