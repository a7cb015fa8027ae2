//! The `World` context object and its fixed-order tick.
//!
//! A world owns everything a match needs: configuration, the shared
//! walkability grid, every subsystem, the seeded RNG and the game clock.
//! Collaborators (renderer, audio, HUD) never reach into it mutably; they
//! read a [`FrameView`] and drain [`GameEvent`]s.
//!
//! # Tick Order
//!
//! 1. **CLOCK**: advance game time; during the start grace period nothing
//!    else runs
//! 2. **PLAYER**: input velocity with wall rejection
//! 3. **AGENTS**: pursuit update and integration
//! 4. **FIRE**: aim towards the cursor and honor a fire request
//! 5. **PROJECTILES**: flight, hit collection, combat resolution
//! 6. **RESPAWNS**: place due respawns
//! 7. **PICKUPS**: pickup timer, then collection
//! 8. **CONTACT**: any agent touching the player reports game over
//!
//! Every check runs against positions already moved this tick, so a
//! returned report and [`FrameView`] always agree.
//!
//! # Determinism
//!
//! Agents, projectiles and pickups live in `BTreeMap`s keyed by monotonic
//! ids and all randomness comes from one `ChaCha8Rng` seeded at
//! construction, so the same seed and the same inputs always produce the
//! same frames.
//!
//! # Example
//!
//! ```
//! use arena_core::{ArenaConfig, TickInput, World};
//! use glam::Vec2;
//! use tilenav::NavigationGrid;
//!
//! let grid = NavigationGrid::open(40, 23, Vec2::splat(32.0)).unwrap();
//! let mut world = World::new(grid, ArenaConfig::default(), 7).unwrap();
//!
//! for _ in 0..60 {
//!     world.step(&TickInput::idle(1.0 / 60.0));
//! }
//! assert_eq!(world.tick(), 60);
//! assert_eq!(world.player().ammo, 24);
//! ```

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use tilenav::{Cell, NavigationGrid, PathPlanner, Rect};
use tracing::{info, trace};

use crate::aim::aim_angle;
use crate::combat::{CombatResolver, HitOutcome};
use crate::config::{seconds, ArenaConfig};
use crate::entity::{Agent, EntityId, IdAllocator, Pickup, Player, Velocity};
use crate::error::WorldError;
use crate::event::{EventLog, GameEvent};
use crate::kinematics::{player_velocity, KinematicBody, MoveInput};
use crate::projectile::{FireOutcome, Projectile, ProjectileSystem};
use crate::pursuit::{PursuitController, PursuitParams};
use crate::spawn::SpawnScheduler;
use crate::view::FrameView;

// =============================================================================
// Tick I/O
// =============================================================================

/// Player input sampled once per tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct TickInput {
    /// Seconds of game time covered by this tick
    pub dt: f32,
    /// Directions held
    pub movement: MoveInput,
    /// World point the weapon aims at
    pub aim_target: Vec2,
    /// Fire requested this tick
    pub fire: bool,
}

impl TickInput {
    /// A tick with no input.
    #[must_use]
    pub fn idle(dt: f32) -> Self {
        Self {
            dt,
            ..Self::default()
        }
    }
}

/// Summary of one tick.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickReport {
    /// Tick number after this step
    pub tick: u64,
    /// Game clock after this step
    pub time: f64,
    /// True while the start grace period froze the world
    pub frozen: bool,
    /// True when an agent touched the player
    pub game_over: bool,
    /// Result of a fire request, if one was made
    pub fire: Option<FireOutcome>,
    /// Combat results in the order hits were resolved
    pub hits: Vec<HitOutcome>,
}

// =============================================================================
// World
// =============================================================================

/// A running match.
#[derive(Debug, Clone)]
pub struct World {
    config: ArenaConfig,
    grid: Arc<NavigationGrid>,
    arena: Rect,
    body: KinematicBody,
    pursuit: PursuitController,
    projectiles: ProjectileSystem,
    combat: CombatResolver,
    spawner: SpawnScheduler,
    agents: BTreeMap<EntityId, Agent>,
    player: Player,
    ids: IdAllocator,
    rng: ChaCha8Rng,
    seed: u64,
    clock: f64,
    tick: u64,
    events: EventLog,
}

impl World {
    /// Build a world over `grid`.
    ///
    /// The player starts at the arena center (or the nearest open cell) and
    /// `config.enemy.initial_count` agents are placed outside the respawn
    /// exclusion radius.
    ///
    /// # Arguments
    ///
    /// * `grid` - Walkability of the arena; its extent is the arena rectangle
    /// * `config` - Match parameters, validated here
    /// * `seed` - Seed for every random draw of the match
    ///
    /// # Errors
    ///
    /// [`WorldError::Config`] for an invalid configuration,
    /// [`WorldError::Spawn`] when an initial agent cannot be placed.
    pub fn new(grid: NavigationGrid, config: ArenaConfig, seed: u64) -> Result<Self, WorldError> {
        config.validate()?;

        let grid = Arc::new(grid);
        let arena = grid.extent();
        let planner = PathPlanner::new(Arc::clone(&grid)).with_diagonal(config.diagonal_movement);
        let player = Player::new(
            player_start(&grid),
            config.player.half_extents,
            config.player.start_ammo,
        );

        let mut world = Self {
            body: KinematicBody::new(arena),
            pursuit: PursuitController::new(planner, arena, PursuitParams::from_config(&config)),
            projectiles: ProjectileSystem::new(&config.projectile),
            combat: CombatResolver::new(&config.respawn),
            spawner: SpawnScheduler::new(Arc::clone(&grid), arena, &config),
            agents: BTreeMap::new(),
            player,
            ids: IdAllocator::new(),
            rng: ChaCha8Rng::seed_from_u64(seed),
            seed,
            clock: 0.0,
            tick: 0,
            events: EventLog::new(),
            config,
            grid,
            arena,
        };
        world.populate()?;
        Ok(world)
    }

    /// Build a world from a raw walkability matrix (0 = blocked).
    ///
    /// # Errors
    ///
    /// [`WorldError::Grid`] for a malformed matrix, otherwise as [`World::new`].
    pub fn from_matrix<R: AsRef<[i32]>>(
        matrix: &[R],
        tile_size: Vec2,
        config: ArenaConfig,
        seed: u64,
    ) -> Result<Self, WorldError> {
        let grid = NavigationGrid::new(matrix, tile_size)?;
        Self::new(grid, config, seed)
    }

    /// Restore the initial state: ammo, kills, player position, agents,
    /// projectiles, pickups, timers and the RNG stream. The grid is reused.
    ///
    /// # Errors
    ///
    /// [`WorldError::Spawn`] when an initial agent cannot be placed.
    pub fn reset(&mut self) -> Result<(), WorldError> {
        self.agents.clear();
        self.projectiles.clear();
        self.spawner.reset(0.0);
        self.player = Player::new(
            player_start(&self.grid),
            self.config.player.half_extents,
            self.config.player.start_ammo,
        );
        self.ids = IdAllocator::new();
        self.rng = ChaCha8Rng::seed_from_u64(self.seed);
        self.clock = 0.0;
        self.tick = 0;
        self.events.clear();
        self.populate()?;
        info!(seed = self.seed, "world reset");
        Ok(())
    }

    fn populate(&mut self) -> Result<(), WorldError> {
        let player = self.player.transform.position;
        for _ in 0..self.config.enemy.initial_count {
            let agent = self.spawner.spawn_agent(&mut self.ids, &mut self.rng, player)?;
            self.events.push(GameEvent::AgentSpawned {
                agent: agent.id,
                position: agent.transform.position,
            });
            self.agents.insert(agent.id, agent);
        }
        Ok(())
    }

    /// Advance the match by one tick.
    pub fn step(&mut self, input: &TickInput) -> TickReport {
        let dt = if input.dt.is_finite() { input.dt.max(0.0) } else { 0.0 };
        self.clock += f64::from(dt);
        self.tick += 1;
        let now = self.clock;

        let mut report = TickReport {
            tick: self.tick,
            time: now,
            ..TickReport::default()
        };

        // CLOCK
        if self.is_frozen() {
            report.frozen = true;
            return report;
        }

        // PLAYER
        self.player.input = input.movement;
        let desired = player_velocity(input.movement, self.config.player.speed, self.config.player.diagonal);
        let motion = self.body.advance_on_grid(
            &self.grid,
            self.player.transform.position,
            desired,
            self.player.transform.half_extents,
            dt,
        );
        self.player.transform.position = motion.position;
        self.player.velocity = Velocity(motion.velocity);

        // AGENTS
        let player = self.player.transform.position;
        for agent in self.agents.values_mut() {
            let step = self.pursuit.update(agent, player, now, &mut self.rng);
            if let Some(transition) = step.transition {
                self.events.push(GameEvent::ModeChanged {
                    agent: agent.id,
                    from: transition.from,
                    to: transition.to,
                });
            }
            let motion = self.body.advance(
                agent.transform.position,
                agent.velocity.0,
                agent.transform.half_extents,
                dt,
            );
            agent.transform.position = motion.position;
        }

        // FIRE
        let muzzle = self.player.transform.position;
        self.player.aim_angle = aim_angle(muzzle, input.aim_target);
        if input.fire {
            let angle = self.player.aim_angle;
            let outcome = self
                .projectiles
                .fire(&mut self.ids, muzzle, angle, now, &mut self.player.ammo);
            match outcome {
                FireOutcome::Fired(projectile) => self.events.push(GameEvent::Fired {
                    projectile,
                    angle,
                    ammo: self.player.ammo,
                }),
                FireOutcome::Empty => self.events.push(GameEvent::Empty),
                FireOutcome::CoolingDown => {}
            }
            report.fire = Some(outcome);
        }

        // PROJECTILES
        self.projectiles.advance(dt, &self.arena);
        for hit in self.projectiles.collect_hits(self.agents.values()) {
            let outcome = self.combat.apply_hit(
                &mut self.agents,
                hit.target,
                &mut self.player,
                self.spawner.respawns_mut(),
                now,
                &mut self.rng,
            );
            match outcome {
                HitOutcome::Damaged { agent, remaining, tier } => {
                    self.events.push(GameEvent::Hit { agent, remaining, tier });
                }
                HitOutcome::Killed { agent, due_at, .. } => {
                    self.events.push(GameEvent::Killed {
                        agent,
                        kill_count: self.player.kill_count,
                    });
                    self.events.push(GameEvent::RespawnScheduled { due_at });
                }
                HitOutcome::Missing(agent) => trace!(agent = %agent, "hit on removed agent"),
            }
            report.hits.push(outcome);
        }

        // RESPAWNS
        for agent in self.spawner.process_respawns(now, &mut self.ids, &mut self.rng, player) {
            self.events.push(GameEvent::AgentSpawned {
                agent: agent.id,
                position: agent.transform.position,
            });
            self.agents.insert(agent.id, agent);
        }

        // PICKUPS
        if let Some(pickup) = self.spawner.tick_pickups(now, &mut self.ids, &mut self.rng) {
            self.events.push(GameEvent::PickupSpawned {
                pickup: pickup.id,
                position: pickup.transform.position,
            });
        }
        for pickup in self.spawner.collect_pickups(&mut self.player) {
            self.events.push(GameEvent::PickupCollected {
                pickup: pickup.id,
                ammo: self.player.ammo,
            });
        }

        // CONTACT
        if let Some(agent) = self.touching_agent() {
            info!(agent = %agent, tick = self.tick, "game over");
            self.events.push(GameEvent::GameOver { agent });
            report.game_over = true;
        }

        trace!(
            tick = self.tick,
            agents = self.agents.len(),
            projectiles = self.projectiles.len(),
            "tick complete"
        );
        report
    }

    fn touching_agent(&self) -> Option<EntityId> {
        let hitbox = self.player.transform.hitbox();
        self.agents
            .values()
            .find(|agent| agent.transform.hitbox().intersects(&hitbox))
            .map(|agent| agent.id)
    }

    /// Place a fresh agent at `position`, bypassing spawn sampling.
    ///
    /// Intended for scripted scenarios and tests.
    pub fn spawn_agent_at(&mut self, position: Vec2) -> EntityId {
        let id = self.ids.allocate();
        let agent = Agent::new(
            id,
            position,
            self.config.enemy.half_extents,
            self.config.enemy.max_health,
            self.config.enemy.chase_distance,
        );
        self.events.push(GameEvent::AgentSpawned { agent: id, position });
        self.agents.insert(id, agent);
        id
    }

    // =========================================================================
    // Accessors
    // =========================================================================

    /// Serializable snapshot for rendering and HUD.
    #[must_use]
    pub fn view(&self) -> FrameView {
        FrameView::capture(self)
    }

    /// Drains and returns all events recorded since the last call.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        self.events.take_events()
    }

    /// True during the start grace period.
    #[must_use]
    pub fn is_frozen(&self) -> bool {
        self.clock < seconds(self.config.start_delay)
    }

    /// Match configuration.
    #[must_use]
    pub fn config(&self) -> &ArenaConfig {
        &self.config
    }

    /// Shared walkability grid.
    #[must_use]
    pub fn grid(&self) -> &Arc<NavigationGrid> {
        &self.grid
    }

    /// Arena bounds.
    #[must_use]
    pub fn arena(&self) -> Rect {
        self.arena
    }

    /// The player.
    #[must_use]
    pub fn player(&self) -> &Player {
        &self.player
    }

    /// Mutable player access for scripted scenarios.
    pub fn player_mut(&mut self) -> &mut Player {
        &mut self.player
    }

    /// Live agents in id order.
    pub fn agents(&self) -> impl Iterator<Item = &Agent> {
        self.agents.values()
    }

    /// Look up a live agent.
    #[must_use]
    pub fn agent(&self, id: EntityId) -> Option<&Agent> {
        self.agents.get(&id)
    }

    /// Mutable agent access for scripted scenarios.
    pub fn agent_mut(&mut self, id: EntityId) -> Option<&mut Agent> {
        self.agents.get_mut(&id)
    }

    /// Live projectiles in id order.
    pub fn projectiles(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.iter()
    }

    /// Live pickups in id order.
    pub fn pickups(&self) -> impl Iterator<Item = &Pickup> {
        self.spawner.pickups()
    }

    /// Respawns not yet placed.
    #[must_use]
    pub fn pending_respawns(&self) -> usize {
        self.spawner.respawns().len()
    }

    /// Game clock in seconds.
    #[must_use]
    pub fn time(&self) -> f64 {
        self.clock
    }

    /// Ticks stepped since construction or reset.
    #[must_use]
    pub fn tick(&self) -> u64 {
        self.tick
    }

    /// Seed the world was built with.
    #[must_use]
    pub fn seed(&self) -> u64 {
        self.seed
    }
}

/// Arena center if walkable, else the closest open cell center.
fn player_start(grid: &NavigationGrid) -> Vec2 {
    let center = grid.extent().center();
    if grid.is_point_walkable(center) {
        return center;
    }
    (0..grid.rows())
        .flat_map(|row| (0..grid.cols()).map(move |col| Cell::new(col, row)))
        .filter(|cell| grid.is_cell_walkable(*cell))
        .map(|cell| grid.cell_center(cell))
        .min_by(|a, b| a.distance_squared(center).total_cmp(&b.distance_squared(center)))
        .unwrap_or(center)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn open_world(seed: u64) -> World {
        let grid = NavigationGrid::open(40, 23, Vec2::splat(32.0)).unwrap();
        World::new(grid, ArenaConfig::default(), seed).unwrap()
    }

    #[test]
    fn player_starts_centered_with_ammo() {
        let world = open_world(1);
        assert_eq!(world.player().transform.position, Vec2::new(640.0, 368.0));
        assert_eq!(world.player().ammo, 24);
        assert_eq!(world.agents().count(), 1);
    }

    #[test]
    fn blocked_center_moves_player_to_open_cell() {
        let grid = NavigationGrid::from_ascii("...\n.#.\n...", Vec2::splat(32.0)).unwrap();
        assert_eq!(player_start(&grid), Vec2::new(48.0, 16.0));
    }

    #[test]
    fn invalid_config_is_rejected() {
        let mut config = ArenaConfig::default();
        config.enemy.roam_speed = 400.0;
        let grid = NavigationGrid::open(4, 4, Vec2::splat(32.0)).unwrap();
        assert!(matches!(World::new(grid, config, 0), Err(WorldError::Config(_))));
    }

    #[test]
    fn ragged_matrix_is_rejected() {
        let matrix: Vec<Vec<i32>> = vec![vec![1, 1], vec![1]];
        let result = World::from_matrix(&matrix, Vec2::splat(32.0), ArenaConfig::default(), 0);
        assert!(matches!(result, Err(WorldError::Grid(_))));
    }

    #[test]
    fn unplaceable_initial_agent_is_an_error() {
        // Whole arena inside the exclusion radius
        let grid = NavigationGrid::open(4, 4, Vec2::splat(32.0)).unwrap();
        assert!(matches!(
            World::new(grid, ArenaConfig::default(), 0),
            Err(WorldError::Spawn(_))
        ));
    }

    #[test]
    fn grace_period_freezes_world() {
        let mut world = open_world(2);
        let input = TickInput {
            dt: 0.1,
            movement: MoveInput::RIGHT,
            aim_target: Vec2::ZERO,
            fire: true,
        };

        let report = world.step(&input);

        assert!(report.frozen);
        assert_eq!(world.player().ammo, 24);
        assert_eq!(world.player().transform.position, Vec2::new(640.0, 368.0));
    }

    #[test]
    fn non_finite_dt_is_ignored() {
        let mut world = open_world(3);
        world.step(&TickInput::idle(f32::NAN));
        assert_eq!(world.time(), 0.0);
        assert_eq!(world.tick(), 1);
    }
}
