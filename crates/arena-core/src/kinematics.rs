//! Velocity integration and arena clamping shared by every moving body.
//!
//! The player additionally has per-axis wall rejection against the
//! walkability grid; enemies only follow their planned waypoints and are
//! clamped to the arena.

use bitflags::bitflags;
use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilenav::{NavigationGrid, Rect};

bitflags! {
    /// Four independent directional inputs, sampled once per tick.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct MoveInput: u8 {
        /// Towards negative y
        const UP = 0b0001;
        /// Towards positive y
        const DOWN = 0b0010;
        /// Towards negative x
        const LEFT = 0b0100;
        /// Towards positive x
        const RIGHT = 0b1000;
    }
}

impl MoveInput {
    /// Unit-per-axis direction: each component is -1, 0 or 1.
    ///
    /// Opposite keys held together cancel out.
    #[must_use]
    pub fn axis(self) -> Vec2 {
        let x = f32::from(u8::from(self.contains(Self::RIGHT))) - f32::from(u8::from(self.contains(Self::LEFT)));
        let y = f32::from(u8::from(self.contains(Self::DOWN))) - f32::from(u8::from(self.contains(Self::UP)));
        Vec2::new(x, y)
    }
}

/// How two held directions combine.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum DiagonalSpeed {
    /// Diagonal movement is as fast as straight movement.
    #[default]
    Normalized,
    /// Each axis moves at full speed, so diagonals are ~41% faster.
    Raw,
}

/// Player velocity for a set of held directions.
#[must_use]
pub fn player_velocity(input: MoveInput, speed: f32, policy: DiagonalSpeed) -> Vec2 {
    let axis = input.axis();
    match policy {
        DiagonalSpeed::Normalized => axis.normalize_or_zero() * speed,
        DiagonalSpeed::Raw => axis * speed,
    }
}

/// `position + velocity * dt`.
#[must_use]
pub fn integrate(position: Vec2, velocity: Vec2, dt: f32) -> Vec2 {
    position + velocity * dt
}

/// Clamp `position` so a box of `half_extents` stays inside `arena`.
///
/// A box wider than the arena on some axis is centered on that axis.
#[must_use]
pub fn clamp_to_arena(position: Vec2, half_extents: Vec2, arena: &Rect) -> Vec2 {
    Vec2::new(
        clamp_axis(position.x, half_extents.x, arena.min.x, arena.max.x),
        clamp_axis(position.y, half_extents.y, arena.min.y, arena.max.y),
    )
}

fn clamp_axis(value: f32, half: f32, min: f32, max: f32) -> f32 {
    let lo = min + half;
    let hi = max - half;
    if lo > hi {
        (min + max) * 0.5
    } else {
        value.clamp(lo, hi)
    }
}

/// Arena-bound integrator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct KinematicBody {
    arena: Rect,
}

/// Result of one constrained move.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Motion {
    /// Committed position
    pub position: Vec2,
    /// Velocity actually used (blocked axes zeroed)
    pub velocity: Vec2,
}

impl KinematicBody {
    /// Create an integrator bounded by `arena`.
    #[must_use]
    pub fn new(arena: Rect) -> Self {
        Self { arena }
    }

    /// The bounding rectangle.
    #[must_use]
    pub fn arena(&self) -> Rect {
        self.arena
    }

    /// Integrate freely, then clamp into the arena.
    #[must_use]
    pub fn advance(&self, position: Vec2, velocity: Vec2, half_extents: Vec2, dt: f32) -> Motion {
        Motion {
            position: clamp_to_arena(integrate(position, velocity, dt), half_extents, &self.arena),
            velocity,
        }
    }

    /// Integrate with per-axis wall rejection, then clamp into the arena.
    ///
    /// The x step is tested first, then the y step from the accepted x
    /// position. An axis whose candidate lands on a blocked cell has its
    /// velocity zeroed for this tick.
    #[must_use]
    pub fn advance_on_grid(
        &self,
        grid: &NavigationGrid,
        position: Vec2,
        velocity: Vec2,
        half_extents: Vec2,
        dt: f32,
    ) -> Motion {
        let mut velocity = velocity;

        if velocity.x != 0.0 {
            let candidate = position + Vec2::new(velocity.x * dt, 0.0);
            if !grid.is_point_walkable(candidate) {
                velocity.x = 0.0;
            }
        }
        if velocity.y != 0.0 {
            let candidate = position + Vec2::new(velocity.x * dt, velocity.y * dt);
            if !grid.is_point_walkable(candidate) {
                velocity.y = 0.0;
            }
        }

        self.advance(position, velocity, half_extents, dt)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn arena() -> Rect {
        Rect::from_size(Vec2::new(320.0, 320.0))
    }

    mod input_tests {
        use super::*;

        #[test]
        fn axis_from_flags() {
            assert_eq!(MoveInput::empty().axis(), Vec2::ZERO);
            assert_eq!(MoveInput::UP.axis(), Vec2::new(0.0, -1.0));
            assert_eq!((MoveInput::DOWN | MoveInput::RIGHT).axis(), Vec2::new(1.0, 1.0));
        }

        #[test]
        fn opposite_keys_cancel() {
            assert_eq!((MoveInput::LEFT | MoveInput::RIGHT).axis(), Vec2::ZERO);
            assert_eq!(MoveInput::all().axis(), Vec2::ZERO);
        }

        #[test]
        fn normalized_diagonal_keeps_speed() {
            let v = player_velocity(MoveInput::UP | MoveInput::LEFT, 100.0, DiagonalSpeed::Normalized);
            assert!((v.length() - 100.0).abs() < 1e-3);
        }

        #[test]
        fn raw_diagonal_is_faster() {
            let v = player_velocity(MoveInput::UP | MoveInput::LEFT, 100.0, DiagonalSpeed::Raw);
            assert_eq!(v, Vec2::new(-100.0, -100.0));
        }
    }

    mod integration_tests {
        use super::*;

        #[test]
        fn integrate_moves_by_velocity() {
            assert_eq!(integrate(Vec2::new(1.0, 2.0), Vec2::new(10.0, -4.0), 0.5), Vec2::new(6.0, 0.0));
        }

        #[test]
        fn clamp_keeps_box_inside() {
            let half = Vec2::new(10.0, 20.0);
            assert_eq!(clamp_to_arena(Vec2::new(-5.0, 400.0), half, &arena()), Vec2::new(10.0, 300.0));
            assert_eq!(clamp_to_arena(Vec2::new(50.0, 50.0), half, &arena()), Vec2::new(50.0, 50.0));
        }

        #[test]
        fn oversized_box_is_centered() {
            let p = clamp_to_arena(Vec2::new(3.0, 3.0), Vec2::new(500.0, 10.0), &arena());
            assert_eq!(p, Vec2::new(160.0, 10.0));
        }

        #[test]
        fn advance_clamps() {
            let body = KinematicBody::new(arena());
            let motion = body.advance(Vec2::new(300.0, 100.0), Vec2::new(1000.0, 0.0), Vec2::splat(10.0), 1.0);
            assert_eq!(motion.position, Vec2::new(310.0, 100.0));
        }
    }

    mod grid_rejection_tests {
        use super::*;

        fn grid() -> NavigationGrid {
            // Wall column at x = 64..96
            NavigationGrid::from_ascii(
                "..#..\n\
                 ..#..\n\
                 .....",
                Vec2::splat(32.0),
            )
            .unwrap()
        }

        #[test]
        fn blocked_axis_is_zeroed() {
            let grid = grid();
            let body = KinematicBody::new(grid.extent());
            let motion = body.advance_on_grid(&grid, Vec2::new(60.0, 16.0), Vec2::new(100.0, 50.0), Vec2::splat(4.0), 0.1);

            assert_eq!(motion.velocity.x, 0.0);
            assert_eq!(motion.velocity.y, 50.0);
            assert_eq!(motion.position, Vec2::new(60.0, 21.0));
        }

        #[test]
        fn open_move_is_committed() {
            let grid = grid();
            let body = KinematicBody::new(grid.extent());
            let motion = body.advance_on_grid(&grid, Vec2::new(16.0, 16.0), Vec2::new(100.0, 0.0), Vec2::splat(4.0), 0.1);
            assert_eq!(motion.position, Vec2::new(26.0, 16.0));
            assert_eq!(motion.velocity, Vec2::new(100.0, 0.0));
        }

        #[test]
        fn vertical_block_only_stops_y() {
            let grid = grid();
            let body = KinematicBody::new(grid.extent());
            // Moving up into the wall from the open bottom row
            let motion = body.advance_on_grid(&grid, Vec2::new(80.0, 66.0), Vec2::new(0.0, -100.0), Vec2::splat(4.0), 0.1);
            assert_eq!(motion.velocity, Vec2::ZERO);
            assert_eq!(motion.position, Vec2::new(80.0, 66.0));
        }
    }
}
