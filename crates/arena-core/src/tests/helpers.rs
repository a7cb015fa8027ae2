//! Test helpers for building worlds and scripting input.

use glam::Vec2;
use tilenav::NavigationGrid;

use crate::config::ArenaConfig;
use crate::entity::EntityId;
use crate::kinematics::MoveInput;
use crate::world::{TickInput, TickReport, World};

/// Tile edge used by every test map.
pub const TILE: f32 = 32.0;

/// One frame at 60 Hz.
pub const DT: f32 = 1.0 / 60.0;

/// A 40x23 map with a few wall blocks, 1280x736 units.
pub const ARENA_MAP: &str = "\
........................................
........................................
...####..........................####...
...####..........................####...
........................................
........................................
..............########..................
..............########..................
........................................
........................................
........................................
........................................
........................................
........................................
........................................
.........######..........######.........
.........######..........######.........
........................................
........................................
...####..........................####...
...####..........................####...
........................................
........................................";

// =============================================================================
// World Setup
// =============================================================================

/// Defaults with no grace period and no initial enemies.
pub fn quiet_config() -> ArenaConfig {
    let mut config = ArenaConfig::default();
    config.start_delay = 0.0;
    config.enemy.initial_count = 0;
    config
}

/// Quiet config whose enemies barely move.
pub fn sluggish_config() -> ArenaConfig {
    let mut config = quiet_config();
    config.enemy.chase_speed = 2.0;
    config.enemy.roam_speed = 1.0;
    config
}

/// World over a fully open grid.
pub fn open_world(cols: usize, rows: usize, config: ArenaConfig, seed: u64) -> World {
    let grid = NavigationGrid::open(cols, rows, Vec2::splat(TILE)).unwrap();
    World::new(grid, config, seed).unwrap()
}

/// World over [`ARENA_MAP`].
pub fn arena_world(config: ArenaConfig, seed: u64) -> World {
    let grid = NavigationGrid::from_ascii(ARENA_MAP, Vec2::splat(TILE)).unwrap();
    World::new(grid, config, seed).unwrap()
}

/// Place an agent in the world and return its id.
pub fn place_agent(world: &mut World, position: Vec2) -> EntityId {
    world.spawn_agent_at(position)
}

// =============================================================================
// Input
// =============================================================================

/// Fire at `target` without moving.
pub fn fire_at(target: Vec2) -> TickInput {
    TickInput {
        dt: DT,
        movement: MoveInput::empty(),
        aim_target: target,
        fire: true,
    }
}

/// A reproducible input script: strafing in a square, firing in bursts,
/// aiming around the arena.
#[allow(clippy::cast_precision_loss)]
pub fn scripted_input(tick: u64) -> TickInput {
    let movement = match (tick / 90) % 4 {
        0 => MoveInput::RIGHT,
        1 => MoveInput::DOWN | MoveInput::LEFT,
        2 => MoveInput::LEFT,
        _ => MoveInput::UP,
    };
    let phase = tick as f32 * 0.05;
    TickInput {
        dt: DT,
        movement,
        aim_target: Vec2::new(640.0 + 500.0 * phase.cos(), 368.0 + 300.0 * phase.sin()),
        fire: tick % 20 < 5,
    }
}

/// Step `world` `n` times with the same input.
pub fn step_n(world: &mut World, input: &TickInput, n: usize) -> Vec<TickReport> {
    (0..n).map(|_| world.step(input)).collect()
}
