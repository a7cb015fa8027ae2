//! Spawn scheduling for ammo pickups and enemy respawns.
//!
//! Both kinds of spawn use bounded random sampling over the arena: a
//! candidate is accepted only if the whole footprint lies on open cells
//! (and, for agents, outside the exclusion radius around the player).
//! Pickups that fail to sample skip their cycle; respawns stay queued and
//! retry on the next tick.

use std::collections::BTreeMap;
use std::sync::Arc;

use glam::Vec2;
use rand::Rng;
use tilenav::{sample_open_position, NavigationGrid, Rect, SampleError};
use tracing::{info, trace, warn};

use crate::config::{seconds, ArenaConfig};
use crate::entity::{Agent, EntityId, IdAllocator, Pickup, Player, Transform};

/// A respawn waiting for its due time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PendingRespawn {
    /// Game time at which the agent may reappear
    pub due_at: f64,
}

/// Respawns in the order they were scheduled.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RespawnQueue {
    pending: Vec<PendingRespawn>,
}

impl RespawnQueue {
    /// An empty queue.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a respawn due at `due_at`.
    pub fn schedule(&mut self, due_at: f64) {
        self.pending.push(PendingRespawn { due_at });
    }

    /// Pending respawns, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = &PendingRespawn> {
        self.pending.iter()
    }

    /// Number of pending respawns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Forget every pending respawn.
    pub fn clear(&mut self) {
        self.pending.clear();
    }
}

#[derive(Debug, Clone, PartialEq)]
struct PickupRules {
    cap: usize,
    interval: f64,
    ammo: u32,
    half_extents: Vec2,
}

#[derive(Debug, Clone, PartialEq)]
struct AgentRules {
    half_extents: Vec2,
    max_health: u32,
    chase_distance: f32,
    exclusion_radius: f32,
}

/// Owns live pickups, the pickup timer and the respawn queue.
#[derive(Debug, Clone)]
pub struct SpawnScheduler {
    grid: Arc<NavigationGrid>,
    arena: Rect,
    attempts: u32,
    pickup: PickupRules,
    agent: AgentRules,
    pickups: BTreeMap<EntityId, Pickup>,
    last_pickup_at: f64,
    respawns: RespawnQueue,
}

impl SpawnScheduler {
    /// Create a scheduler sampling over `grid` inside `arena`.
    #[must_use]
    pub fn new(grid: Arc<NavigationGrid>, arena: Rect, config: &ArenaConfig) -> Self {
        Self {
            grid,
            arena,
            attempts: config.spawn_attempts,
            pickup: PickupRules {
                cap: config.pickup.cap,
                interval: seconds(config.pickup.interval),
                ammo: config.pickup.ammo,
                half_extents: config.pickup.half_extents,
            },
            agent: AgentRules {
                half_extents: config.enemy.half_extents,
                max_health: config.enemy.max_health,
                chase_distance: config.enemy.chase_distance,
                exclusion_radius: config.respawn.exclusion_radius,
            },
            pickups: BTreeMap::new(),
            last_pickup_at: 0.0,
            respawns: RespawnQueue::new(),
        }
    }

    // =========================================================================
    // Pickups
    // =========================================================================

    /// Attempt a pickup spawn once every pickup interval.
    ///
    /// The timer restarts on every attempt, whether or not a pickup appears.
    pub fn tick_pickups<R: Rng + ?Sized>(&mut self, now: f64, ids: &mut IdAllocator, rng: &mut R) -> Option<Pickup> {
        if now - self.last_pickup_at < self.pickup.interval {
            return None;
        }
        self.last_pickup_at = now;
        self.spawn_pickup(ids, rng)
    }

    /// Place one pickup if fewer than the cap are live.
    ///
    /// Returns `None` when capped or when no open footprint was found.
    pub fn spawn_pickup<R: Rng + ?Sized>(&mut self, ids: &mut IdAllocator, rng: &mut R) -> Option<Pickup> {
        if self.pickups.len() >= self.pickup.cap {
            trace!(live = self.pickups.len(), "pickup cap reached");
            return None;
        }

        let position = match sample_open_position(
            &self.grid,
            rng,
            self.arena,
            self.pickup.half_extents,
            self.attempts,
            |_| true,
        ) {
            Ok(position) => position,
            Err(err) => {
                warn!(%err, "skipping pickup spawn");
                return None;
            }
        };

        let id = ids.allocate();
        let pickup = Pickup {
            id,
            transform: Transform::new(position, self.pickup.half_extents),
            ammo: self.pickup.ammo,
        };
        self.pickups.insert(id, pickup);
        info!(pickup = %id, x = position.x, y = position.y, "pickup spawned");
        Some(pickup)
    }

    /// Remove every pickup touching the player and credit its ammo.
    pub fn collect_pickups(&mut self, player: &mut Player) -> Vec<Pickup> {
        let hitbox = player.transform.hitbox();
        let touched: Vec<EntityId> = self
            .pickups
            .values()
            .filter(|p| p.transform.hitbox().intersects(&hitbox))
            .map(|p| p.id)
            .collect();

        touched
            .into_iter()
            .filter_map(|id| self.pickups.remove(&id))
            .inspect(|pickup| {
                player.ammo = player.ammo.saturating_add(pickup.ammo);
                trace!(pickup = %pickup.id, ammo = player.ammo, "pickup collected");
            })
            .collect()
    }

    /// Live pickups in id order.
    pub fn pickups(&self) -> impl Iterator<Item = &Pickup> {
        self.pickups.values()
    }

    // =========================================================================
    // Agents
    // =========================================================================

    /// Sample an agent position on open cells at least the exclusion radius
    /// away from `player`.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::Exhausted`] if no candidate qualified.
    pub fn sample_agent_position<R: Rng + ?Sized>(&self, rng: &mut R, player: Vec2) -> Result<Vec2, SampleError> {
        let radius = self.agent.exclusion_radius;
        sample_open_position(
            &self.grid,
            rng,
            self.arena,
            self.agent.half_extents,
            self.attempts,
            |candidate| candidate.distance(player) >= radius,
        )
    }

    /// A fresh roaming agent with full health at a sampled position.
    ///
    /// # Errors
    ///
    /// Returns [`SampleError::Exhausted`] if no position qualified; no id is
    /// consumed in that case.
    pub fn spawn_agent<R: Rng + ?Sized>(
        &self,
        ids: &mut IdAllocator,
        rng: &mut R,
        player: Vec2,
    ) -> Result<Agent, SampleError> {
        let position = self.sample_agent_position(rng, player)?;
        let id = ids.allocate();
        info!(agent = %id, x = position.x, y = position.y, "agent spawned");
        Ok(Agent::new(
            id,
            position,
            self.agent.half_extents,
            self.agent.max_health,
            self.agent.chase_distance,
        ))
    }

    /// Queue of respawns not yet placed.
    #[must_use]
    pub fn respawns(&self) -> &RespawnQueue {
        &self.respawns
    }

    /// Mutable access for the combat resolver.
    pub fn respawns_mut(&mut self) -> &mut RespawnQueue {
        &mut self.respawns
    }

    /// Place every respawn due at `now`.
    ///
    /// Entries whose sampling fails stay queued for the next tick.
    pub fn process_respawns<R: Rng + ?Sized>(
        &mut self,
        now: f64,
        ids: &mut IdAllocator,
        rng: &mut R,
        player: Vec2,
    ) -> Vec<Agent> {
        let mut spawned = Vec::new();
        let mut still_pending = Vec::with_capacity(self.respawns.pending.len());

        for entry in std::mem::take(&mut self.respawns.pending) {
            if entry.due_at > now {
                still_pending.push(entry);
                continue;
            }
            match self.spawn_agent(ids, rng, player) {
                Ok(agent) => spawned.push(agent),
                Err(err) => {
                    warn!(%err, due_at = entry.due_at, "respawn deferred");
                    still_pending.push(entry);
                }
            }
        }

        self.respawns.pending = still_pending;
        spawned
    }

    /// Drop all pickups and pending respawns and restart the pickup timer at
    /// `now`.
    pub fn reset(&mut self, now: f64) {
        self.pickups.clear();
        self.respawns.clear();
        self.last_pickup_at = now;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;

    const TILE: f32 = 32.0;

    fn open_grid() -> Arc<NavigationGrid> {
        Arc::new(NavigationGrid::open(40, 23, Vec2::splat(TILE)).unwrap())
    }

    fn scheduler(grid: Arc<NavigationGrid>) -> SpawnScheduler {
        let arena = grid.extent();
        SpawnScheduler::new(grid, arena, &ArenaConfig::default())
    }

    fn rng() -> ChaCha8Rng {
        ChaCha8Rng::seed_from_u64(11)
    }

    mod pickup_tests {
        use super::*;

        #[test]
        fn pickup_waits_for_interval() {
            let mut s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let mut rng = rng();

            assert!(s.tick_pickups(6.0, &mut ids, &mut rng).is_none());
            assert!(s.tick_pickups(6.7, &mut ids, &mut rng).is_some());
            assert!(s.tick_pickups(7.0, &mut ids, &mut rng).is_none());
            assert_eq!(s.pickups().count(), 1);
        }

        #[test]
        fn cap_is_respected() {
            let mut s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let mut rng = rng();

            for _ in 0..10 {
                s.spawn_pickup(&mut ids, &mut rng);
            }
            assert_eq!(s.pickups().count(), 4);
        }

        #[test]
        fn pickups_land_on_open_cells() {
            let grid = Arc::new(
                NavigationGrid::from_ascii(
                    "##########\n\
                     #........#\n\
                     #..####..#\n\
                     #........#\n\
                     ##########",
                    Vec2::splat(TILE),
                )
                .unwrap(),
            );
            let mut s = scheduler(grid.clone());
            s.pickup.half_extents = Vec2::splat(10.0);
            let mut ids = IdAllocator::new();
            let mut rng = rng();

            for _ in 0..4 {
                s.spawn_pickup(&mut ids, &mut rng);
            }
            for pickup in s.pickups() {
                assert!(grid.is_footprint_walkable(&pickup.transform.hitbox()));
            }
        }

        #[test]
        fn impossible_footprint_skips_cycle() {
            let grid = Arc::new(NavigationGrid::open(2, 2, Vec2::splat(TILE)).unwrap());
            let mut s = scheduler(grid);
            let mut ids = IdAllocator::new();
            let mut rng = rng();

            // 80x80 box in a 64x64 arena
            s.pickup.half_extents = Vec2::splat(40.0);
            assert!(s.spawn_pickup(&mut ids, &mut rng).is_none());
            assert_eq!(s.pickups().count(), 0);
        }

        #[test]
        fn collection_grants_ammo() {
            let mut s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let mut rng = rng();
            let pickup = s.spawn_pickup(&mut ids, &mut rng).unwrap();
            let mut player = Player::new(pickup.transform.position, Vec2::new(16.0, 20.0), 3);

            let collected = s.collect_pickups(&mut player);

            assert_eq!(collected.len(), 1);
            assert_eq!(player.ammo, 15);
            assert_eq!(s.pickups().count(), 0);
        }

        #[test]
        fn collection_saturates_ammo() {
            let mut s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let mut rng = rng();
            let pickup = s.spawn_pickup(&mut ids, &mut rng).unwrap();
            let mut player = Player::new(pickup.transform.position, Vec2::new(16.0, 20.0), u32::MAX - 5);

            s.collect_pickups(&mut player);

            assert_eq!(player.ammo, u32::MAX);
        }

        #[test]
        fn pickup_due_exactly_at_interval() {
            let mut s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let mut rng = rng();

            assert!(s.tick_pickups(6.7, &mut ids, &mut rng).is_some());
            assert!(s.tick_pickups(13.39, &mut ids, &mut rng).is_none());
            assert!(s.tick_pickups(13.4, &mut ids, &mut rng).is_some());
        }
    }

    mod agent_tests {
        use super::*;

        #[test]
        fn spawn_respects_exclusion_radius() {
            let s = scheduler(open_grid());
            let mut rng = rng();
            let player = Vec2::new(640.0, 368.0);

            for _ in 0..50 {
                let p = s.sample_agent_position(&mut rng, player).unwrap();
                assert!(p.distance(player) >= 325.0);
            }
        }

        #[test]
        fn spawned_agent_is_fresh() {
            let s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let agent = s.spawn_agent(&mut ids, &mut rng(), Vec2::ZERO).unwrap();

            assert_eq!(agent.health.current, 4);
            assert_eq!(agent.follower.mode(), crate::pursuit::Mode::Roam);
        }

        #[test]
        fn respawn_waits_until_due() {
            let mut s = scheduler(open_grid());
            let mut ids = IdAllocator::new();
            let mut rng = rng();
            s.respawns_mut().schedule(2.0);

            assert!(s.process_respawns(1.9, &mut ids, &mut rng, Vec2::ZERO).is_empty());
            assert_eq!(s.respawns().len(), 1);

            let spawned = s.process_respawns(2.0, &mut ids, &mut rng, Vec2::ZERO);
            assert_eq!(spawned.len(), 1);
            assert!(s.respawns().is_empty());
        }

        #[test]
        fn failed_respawn_stays_pending() {
            // Whole arena inside the exclusion radius
            let grid = Arc::new(NavigationGrid::open(4, 4, Vec2::splat(TILE)).unwrap());
            let mut s = scheduler(grid);
            let mut ids = IdAllocator::new();
            let mut rng = rng();
            s.respawns_mut().schedule(0.0);

            assert!(s.process_respawns(1.0, &mut ids, &mut rng, Vec2::new(64.0, 64.0)).is_empty());
            assert_eq!(s.respawns().len(), 1);
            assert_eq!(ids.allocate().as_u64(), 0);
        }
    }
}
