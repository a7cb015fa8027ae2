//! Entity types for the arena.
//!
//! Entities are compositions of the records in [`components`]:
//! - [`Agent`]: an enemy with health and a path follower
//! - [`Player`]: the single controllable entity, with ammo and kill count
//! - [`Pickup`]: an ammo box waiting to be collected
//!
//! Projectiles live in [`crate::projectile`] next to the system that owns
//! them.
//!
//! # Example
//!
//! ```
//! use arena_core::entity::{Agent, EntityId};
//! use glam::Vec2;
//!
//! let agent = Agent::new(EntityId::new(3), Vec2::new(10.0, 20.0), Vec2::splat(16.0), 4, 425.0);
//! assert_eq!(agent.health.current, 4);
//! assert_eq!(agent.id.as_u64(), 3);
//! ```

pub mod components;

use std::fmt;

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::kinematics::MoveInput;
use crate::pursuit::PathFollower;

pub use components::{Health, HealthTier, Transform, Velocity};

/// Unique identifier for an entity.
///
/// Identifiers are handed out monotonically by an [`IdAllocator`] and never
/// reused within a world, so ordering by id is ordering by creation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct EntityId(u64);

impl EntityId {
    /// Creates a new `EntityId` from a raw `u64` value.
    #[must_use]
    pub const fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw `u64` value of this identifier.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Debug for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "EntityId({})", self.0)
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self::new(id)
    }
}

/// Monotonic source of [`EntityId`]s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IdAllocator {
    next: u64,
}

impl IdAllocator {
    /// Start allocating from zero.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Hand out the next identifier.
    pub fn allocate(&mut self) -> EntityId {
        let id = EntityId::new(self.next);
        self.next += 1;
        id
    }
}

/// An enemy.
#[derive(Debug, Clone, PartialEq)]
pub struct Agent {
    /// Identifier in the live agent collection
    pub id: EntityId,
    /// Position and hitbox
    pub transform: Transform,
    /// Current velocity
    pub velocity: Velocity,
    /// Hit points
    pub health: Health,
    /// Pursuit mode, path and replan timer
    pub follower: PathFollower,
}

impl Agent {
    /// A fresh roaming agent with full health.
    #[must_use]
    pub fn new(id: EntityId, position: Vec2, half_extents: Vec2, max_health: u32, chase_distance: f32) -> Self {
        Self {
            id,
            transform: Transform::new(position, half_extents),
            velocity: Velocity::default(),
            health: Health::full(max_health),
            follower: PathFollower::new(position, chase_distance),
        }
    }
}

/// The player.
#[derive(Debug, Clone, PartialEq)]
pub struct Player {
    /// Position and hitbox
    pub transform: Transform,
    /// Velocity committed last tick
    pub velocity: Velocity,
    /// Rounds left
    pub ammo: u32,
    /// Enemies killed; never decreases
    pub kill_count: u32,
    /// Directions held last tick
    pub input: MoveInput,
    /// Weapon angle in radians
    pub aim_angle: f32,
}

impl Player {
    /// A player at `position` with `ammo` rounds and no kills.
    #[must_use]
    pub fn new(position: Vec2, half_extents: Vec2, ammo: u32) -> Self {
        Self {
            transform: Transform::new(position, half_extents),
            velocity: Velocity::default(),
            ammo,
            kill_count: 0,
            input: MoveInput::empty(),
            aim_angle: 0.0,
        }
    }

    /// True when the player moved last tick.
    #[must_use]
    pub fn is_moving(&self) -> bool {
        self.velocity.0 != Vec2::ZERO
    }
}

/// An ammo box.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Pickup {
    /// Identifier in the live pickup collection
    pub id: EntityId,
    /// Position and hitbox
    pub transform: Transform,
    /// Rounds granted on collection
    pub ammo: u32,
}
