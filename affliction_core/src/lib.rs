//! # Affliction Core
//!
//! Runtime for afflictions: leveled, optionally timed status conditions
//! (curses, supernatural transformations) attached to entities of a game
//! host and driven by a periodic tick.
//!
//! ## Core Components
//!
//! - **affliction**: definitions, per-entity instances and their data bag
//! - **component**: the effect units an affliction is composed of, plus the conditional wrapper
//! - **condition**: environmental predicates and trigger names
//! - **engine**: registry, entity state, administrative operations and the tick scheduler
//! - **assembly**: building curses from configuration
//! - **vampirism**: the built-in vampirism affliction and feeding
//! - **persistence** / **session**: records, stores and join/quit handling
//!
//! The host side (entities, effects, weather, scheduling) lives in `world_host`.

pub mod affliction;
pub mod assembly;
pub mod component;
pub mod condition;
pub mod config;
pub mod engine;
pub mod error;
pub mod logging;
pub mod persistence;
pub mod registry;
pub mod resource;
pub mod session;
pub mod state;
pub mod vampirism;

pub use affliction::*;
pub use assembly::*;
pub use component::*;
pub use condition::*;
pub use config::*;
pub use engine::*;
pub use error::*;
pub use persistence::*;
pub use registry::*;
pub use session::*;
pub use state::*;
pub use vampirism::*;
