//! Component records shared by the entity types.
//!
//! Entities are plain compositions of these records; each system only touches
//! the components it needs.

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilenav::Rect;

/// Position and collision box of an entity.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Transform {
    /// Center of the entity in world units
    pub position: Vec2,
    /// Half width/height of the hitbox
    pub half_extents: Vec2,
}

impl Transform {
    /// Create a transform.
    #[must_use]
    pub fn new(position: Vec2, half_extents: Vec2) -> Self {
        Self {
            position,
            half_extents,
        }
    }

    /// Axis-aligned hitbox centered on the position.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.position, self.half_extents)
    }
}

/// Linear velocity in world units per second.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Velocity(pub Vec2);

/// Cosmetic health bucket used by health bars.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HealthTier {
    /// More than 75% health
    High,
    /// More than 50% health
    Medium,
    /// More than 25% health
    Low,
    /// 25% or less
    Critical,
}

impl HealthTier {
    /// Bucket a health ratio in `[0, 1]`.
    #[must_use]
    pub fn from_ratio(ratio: f32) -> Self {
        if ratio > 0.75 {
            Self::High
        } else if ratio > 0.50 {
            Self::Medium
        } else if ratio > 0.25 {
            Self::Low
        } else {
            Self::Critical
        }
    }
}

/// Hit points of a destructible entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Health {
    /// Remaining hit points
    pub current: u32,
    /// Hit points when fresh
    pub max: u32,
}

impl Health {
    /// Full health.
    #[must_use]
    pub fn full(max: u32) -> Self {
        Self { current: max, max }
    }

    /// Remove hit points, saturating at zero. Returns the remaining health.
    pub fn damage(&mut self, amount: u32) -> u32 {
        self.current = self.current.saturating_sub(amount);
        self.current
    }

    /// True once health has reached zero.
    #[must_use]
    pub fn is_depleted(&self) -> bool {
        self.current == 0
    }

    /// Remaining fraction in `[0, 1]`.
    #[must_use]
    #[allow(clippy::cast_precision_loss)]
    pub fn ratio(&self) -> f32 {
        if self.max == 0 {
            0.0
        } else {
            self.current as f32 / self.max as f32
        }
    }

    /// Display bucket for the current ratio.
    #[must_use]
    pub fn tier(&self) -> HealthTier {
        HealthTier::from_ratio(self.ratio())
    }
}
