//! # Arena Core
//!
//! Deterministic simulation core for a top-down arena shooter.
//!
//! The player moves on a tiled arena, aims with the cursor and fires
//! projectiles at enemies that roam the map and chase the player once close
//! enough. Ammo is scarce; pickups appear periodically and killed enemies
//! respawn after a random delay, away from the player.
//!
//! ## Architecture
//!
//! - **Entities**: [`Agent`], [`Player`], [`Pickup`] built from plain
//!   component records
//! - **Systems**: [`PursuitController`], [`KinematicBody`],
//!   [`ProjectileSystem`], [`CombatResolver`], [`SpawnScheduler`]
//! - **Context**: [`World`] owns all of the above and runs one fixed-order
//!   tick per [`World::step`]
//! - **Outputs**: [`FrameView`] snapshots and drained [`GameEvent`]s
//!
//! Path planning and walkability live in the [`tilenav`] crate.
//!
//! ## Usage
//!
//! ```
//! use arena_core::{ArenaConfig, MoveInput, TickInput, World};
//! use glam::Vec2;
//! use tilenav::NavigationGrid;
//!
//! let grid = NavigationGrid::open(40, 23, Vec2::splat(32.0)).unwrap();
//! let mut world = World::new(grid, ArenaConfig::default(), 42).unwrap();
//!
//! let input = TickInput {
//!     dt: 1.0 / 60.0,
//!     movement: MoveInput::RIGHT,
//!     aim_target: Vec2::new(0.0, 368.0),
//!     fire: true,
//! };
//! for _ in 0..30 {
//!     world.step(&input);
//! }
//!
//! let frame = world.view();
//! assert!(frame.player.ammo < 24);
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod aim;
pub mod combat;
pub mod config;
pub mod entity;
pub mod error;
pub mod event;
pub mod kinematics;
pub mod projectile;
pub mod pursuit;
pub mod spawn;
pub mod view;
pub mod world;

// Re-exports for convenience
pub use aim::{aim_angle, AngleCache};
pub use combat::{CombatResolver, HitOutcome};
pub use config::{ArenaConfig, ConfigError};
pub use entity::{Agent, EntityId, Health, HealthTier, Pickup, Player};
pub use error::WorldError;
pub use event::{EventLog, GameEvent};
pub use kinematics::{DiagonalSpeed, KinematicBody, MoveInput};
pub use projectile::{FireOutcome, Projectile, ProjectileSystem};
pub use pursuit::{Mode, PathFollower, Pursuit, PursuitController};
pub use spawn::SpawnScheduler;
pub use view::FrameView;
pub use world::{TickInput, TickReport, World};

#[cfg(test)]
mod tests;
