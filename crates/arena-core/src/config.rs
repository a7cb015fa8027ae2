//! Tunable parameters for a match.
//!
//! All durations are seconds of game time and all speeds are world units per
//! second. The defaults reproduce the shipped game at a 32-unit tile size.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tilenav::DiagonalMovement;

use crate::kinematics::DiagonalSpeed;

/// Invalid configuration values.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum ConfigError {
    /// A value that must be strictly positive (and finite) is not.
    #[error("{field} must be positive, got {value}")]
    NonPositive {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f32,
    },
    /// A value that must not be negative is.
    #[error("{field} must not be negative, got {value}")]
    Negative {
        /// Name of the offending field
        field: &'static str,
        /// The rejected value
        value: f32,
    },
    /// Roaming must be strictly slower than chasing.
    #[error("roam speed {roam} must be lower than chase speed {chase}")]
    RoamNotSlower {
        /// Configured roam speed
        roam: f32,
        /// Configured chase speed
        chase: f32,
    },
    /// The respawn delay range is inverted.
    #[error("respawn delay range [{min}, {max}] is inverted")]
    InvertedRespawnRange {
        /// Lower bound
        min: f32,
        /// Upper bound
        max: f32,
    },
    /// Enemies need at least one hit point.
    #[error("enemy max health must be at least 1")]
    ZeroHealth,
    /// Spawn sampling needs at least one attempt.
    #[error("spawn attempts must be at least 1")]
    ZeroSpawnAttempts,
}

/// Player movement and inventory.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerConfig {
    /// Movement speed
    pub speed: f32,
    /// Hitbox half extents
    pub half_extents: Vec2,
    /// Ammo at match start
    pub start_ammo: u32,
    /// How combined directional input is scaled
    pub diagonal: DiagonalSpeed,
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            speed: 360.0,
            half_extents: Vec2::new(16.0, 20.0),
            start_ammo: 24,
            diagonal: DiagonalSpeed::Normalized,
        }
    }
}

/// Enemy durability and pursuit behavior.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnemyConfig {
    /// Hit points of a fresh enemy
    pub max_health: u32,
    /// Speed while chasing the player
    pub chase_speed: f32,
    /// Speed while roaming (must be lower than `chase_speed`)
    pub roam_speed: f32,
    /// Hitbox half extents
    pub half_extents: Vec2,
    /// Player distance below which roaming turns into chasing
    pub chase_distance: f32,
    /// A chase path whose end is farther than this from the player is stale
    pub stale_tolerance: f32,
    /// Delay before retrying after a failed plan
    pub replan_backoff: f32,
    /// Enemies spawned at match start
    pub initial_count: usize,
}

impl Default for EnemyConfig {
    fn default() -> Self {
        Self {
            max_health: 4,
            chase_speed: 300.0,
            roam_speed: 270.0,
            half_extents: Vec2::splat(16.0),
            chase_distance: 425.0,
            stale_tolerance: 120.0,
            replan_backoff: 0.25,
            initial_count: 1,
        }
    }
}

/// Bullets and the fire-rate limit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileConfig {
    /// Flight speed
    pub speed: f32,
    /// Hitbox half extents
    pub half_extents: Vec2,
    /// Minimum time between shots
    pub cooldown: f32,
}

impl Default for ProjectileConfig {
    fn default() -> Self {
        Self {
            speed: 1500.0,
            half_extents: Vec2::splat(4.0),
            cooldown: 0.17,
        }
    }
}

/// Ammo pickups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PickupConfig {
    /// Maximum live pickups
    pub cap: usize,
    /// Time between spawn attempts
    pub interval: f32,
    /// Ammo granted on collection
    pub ammo: u32,
    /// Hitbox half extents
    pub half_extents: Vec2,
}

impl Default for PickupConfig {
    fn default() -> Self {
        Self {
            cap: 4,
            interval: 6.7,
            ammo: 12,
            half_extents: Vec2::new(30.0, 27.0),
        }
    }
}

/// Enemy respawn timing and placement.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RespawnConfig {
    /// Shortest delay after a kill
    pub delay_min: f32,
    /// Longest delay after a kill
    pub delay_max: f32,
    /// Respawns are placed at least this far from the player
    pub exclusion_radius: f32,
}

impl Default for RespawnConfig {
    fn default() -> Self {
        Self {
            delay_min: 0.2,
            delay_max: 4.0,
            exclusion_radius: 325.0,
        }
    }
}

/// Configuration for a [`World`](crate::world::World).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ArenaConfig {
    /// Player settings
    pub player: PlayerConfig,
    /// Enemy settings
    pub enemy: EnemyConfig,
    /// Projectile settings
    pub projectile: ProjectileConfig,
    /// Pickup settings
    pub pickup: PickupConfig,
    /// Respawn settings
    pub respawn: RespawnConfig,
    /// Planner diagonal policy
    pub diagonal_movement: DiagonalMovement,
    /// Candidate positions tried per spawn or roam target
    #[serde(default = "default_spawn_attempts")]
    pub spawn_attempts: u32,
    /// Grace period after start/reset during which the world is frozen
    #[serde(default = "default_start_delay")]
    pub start_delay: f32,
}

fn default_spawn_attempts() -> u32 {
    64
}

fn default_start_delay() -> f32 {
    0.25
}

impl Default for ArenaConfig {
    fn default() -> Self {
        Self {
            player: PlayerConfig::default(),
            enemy: EnemyConfig::default(),
            projectile: ProjectileConfig::default(),
            pickup: PickupConfig::default(),
            respawn: RespawnConfig::default(),
            diagonal_movement: DiagonalMovement::default(),
            spawn_attempts: default_spawn_attempts(),
            start_delay: default_start_delay(),
        }
    }
}

impl ArenaConfig {
    /// Create the default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Check every value for internal consistency.
    ///
    /// # Errors
    ///
    /// Returns the first [`ConfigError`] found.
    pub fn validate(&self) -> Result<(), ConfigError> {
        positive("player.speed", self.player.speed)?;
        positive_extents("player.half_extents", self.player.half_extents)?;

        if self.enemy.max_health == 0 {
            return Err(ConfigError::ZeroHealth);
        }
        positive("enemy.chase_speed", self.enemy.chase_speed)?;
        positive("enemy.roam_speed", self.enemy.roam_speed)?;
        if self.enemy.roam_speed >= self.enemy.chase_speed {
            return Err(ConfigError::RoamNotSlower {
                roam: self.enemy.roam_speed,
                chase: self.enemy.chase_speed,
            });
        }
        positive_extents("enemy.half_extents", self.enemy.half_extents)?;
        positive("enemy.chase_distance", self.enemy.chase_distance)?;
        positive("enemy.stale_tolerance", self.enemy.stale_tolerance)?;
        non_negative("enemy.replan_backoff", self.enemy.replan_backoff)?;

        positive("projectile.speed", self.projectile.speed)?;
        positive_extents("projectile.half_extents", self.projectile.half_extents)?;
        non_negative("projectile.cooldown", self.projectile.cooldown)?;

        positive("pickup.interval", self.pickup.interval)?;
        positive_extents("pickup.half_extents", self.pickup.half_extents)?;

        non_negative("respawn.delay_min", self.respawn.delay_min)?;
        non_negative("respawn.delay_max", self.respawn.delay_max)?;
        if self.respawn.delay_min > self.respawn.delay_max {
            return Err(ConfigError::InvertedRespawnRange {
                min: self.respawn.delay_min,
                max: self.respawn.delay_max,
            });
        }
        non_negative("respawn.exclusion_radius", self.respawn.exclusion_radius)?;

        if self.spawn_attempts == 0 {
            return Err(ConfigError::ZeroSpawnAttempts);
        }
        non_negative("start_delay", self.start_delay)?;
        Ok(())
    }
}

fn positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::NonPositive { field, value })
    }
}

fn non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::Negative { field, value })
    }
}

fn positive_extents(field: &'static str, extents: Vec2) -> Result<(), ConfigError> {
    positive(field, extents.x)?;
    positive(field, extents.y)
}

/// Widen a configured duration to game clock precision.
///
/// Rounds to whole microseconds, so a configured `0.17` equals a clock
/// reading of `0.17` rather than the `f32` approximation `0.1700000017..`.
pub(crate) fn seconds(value: f32) -> f64 {
    (f64::from(value) * 1e6).round() / 1e6
}
