//! Read-only frame snapshot for rendering and HUD collaborators.
//!
//! A [`FrameView`] copies out exactly what a renderer needs: positions, hitbox
//! sizes, health bars, the pursuit mode and remaining waypoints for debug
//! overlays, and the player's ammo, kills and aim. It owns its data, so it can
//! be serialized, sent elsewhere or compared across runs.

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, HealthTier, Pickup};
use crate::pursuit::Mode;
use crate::world::World;

/// The player as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerView {
    /// Center
    pub position: Vec2,
    /// Velocity committed last tick
    pub velocity: Vec2,
    /// Hitbox half extents
    pub half_extents: Vec2,
    /// Rounds left
    pub ammo: u32,
    /// Enemies killed
    pub kill_count: u32,
    /// Weapon angle in radians
    pub aim_angle: f32,
    /// Whether to play the walk animation
    pub moving: bool,
}

/// An agent as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentView {
    /// Identifier
    pub id: EntityId,
    /// Center
    pub position: Vec2,
    /// Desired velocity this tick
    pub velocity: Vec2,
    /// Hitbox half extents
    pub half_extents: Vec2,
    /// Health bar fill in `[0, 1]`
    pub health_ratio: f32,
    /// Health bar color bucket
    pub tier: HealthTier,
    /// Current behavior mode
    pub mode: Mode,
    /// Remaining waypoints, next first
    pub waypoints: Vec<Vec2>,
}

/// A projectile as drawn.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProjectileView {
    /// Identifier
    pub id: EntityId,
    /// Center
    pub position: Vec2,
    /// Flight angle in radians
    pub angle: f32,
    /// Hitbox half extents
    pub half_extents: Vec2,
}

/// Everything needed to draw one frame.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FrameView {
    /// Tick the snapshot was taken after
    pub tick: u64,
    /// Game clock
    pub time: f64,
    /// True during the start grace period
    pub frozen: bool,
    /// The player
    pub player: PlayerView,
    /// Live agents in id order
    pub agents: Vec<AgentView>,
    /// Live projectiles in id order
    pub projectiles: Vec<ProjectileView>,
    /// Live pickups in id order
    pub pickups: Vec<Pickup>,
}

impl FrameView {
    /// Snapshot `world`.
    #[must_use]
    pub fn capture(world: &World) -> Self {
        let player = world.player();
        Self {
            tick: world.tick(),
            time: world.time(),
            frozen: world.is_frozen(),
            player: PlayerView {
                position: player.transform.position,
                velocity: player.velocity.0,
                half_extents: player.transform.half_extents,
                ammo: player.ammo,
                kill_count: player.kill_count,
                aim_angle: player.aim_angle,
                moving: player.is_moving(),
            },
            agents: world
                .agents()
                .map(|agent| AgentView {
                    id: agent.id,
                    position: agent.transform.position,
                    velocity: agent.velocity.0,
                    half_extents: agent.transform.half_extents,
                    health_ratio: agent.health.ratio(),
                    tier: agent.health.tier(),
                    mode: agent.follower.mode(),
                    waypoints: agent.follower.pursuit().waypoints().iter().copied().collect(),
                })
                .collect(),
            projectiles: world
                .projectiles()
                .map(|p| ProjectileView {
                    id: p.id,
                    position: p.position,
                    angle: p.angle,
                    half_extents: p.half_extents,
                })
                .collect(),
            pickups: world.pickups().copied().collect(),
        }
    }

    /// Look up an agent by id.
    #[must_use]
    pub fn agent(&self, id: EntityId) -> Option<&AgentView> {
        self.agents.iter().find(|a| a.id == id)
    }
}
