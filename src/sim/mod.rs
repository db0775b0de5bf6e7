//! Rules engine
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Seeded RNG only
//! - Stable iteration order (by entity ID)
//! - No rendering or platform dependencies
//! - Physics integration belongs to the host; this module only reads its reports

pub mod collision;
pub mod entity;
pub mod event;
pub mod game;
pub mod spawn;
pub mod state;
pub mod tick;

pub use collision::{CollisionMode, CollisionRule, CollisionRules, ContactHandler};
pub use entity::{Entity, EntityId, EntityKind, EntityRegistry, Visual};
pub use event::{EventQueue, GameEvent};
pub use game::Game;
pub use spawn::{HazardDrop, SpawnPolicy};
pub use state::{GamePhase, GameState};
pub use tick::{Direction, TickInput, tick};
