//! Player projectiles: the fire-rate limit, straight-line flight and hit
//! detection against agent hitboxes.
//!
//! A projectile's position is a closed-form function of its age,
//! `origin + speed * age * (cos θ, sin θ)`, so flight has no accumulated
//! integration error regardless of the tick lengths used.

use std::collections::BTreeMap;

use glam::Vec2;
use serde::{Deserialize, Serialize};
use tilenav::Rect;
use tracing::trace;

use crate::config::{seconds, ProjectileConfig};
use crate::entity::{Agent, EntityId, IdAllocator};

/// A bullet in flight.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Projectile {
    /// Identifier in the live projectile collection
    pub id: EntityId,
    /// Muzzle position
    pub origin: Vec2,
    /// Current center
    pub position: Vec2,
    /// Flight angle in radians
    pub angle: f32,
    /// Flight speed
    pub speed: f32,
    /// Hitbox half extents
    pub half_extents: Vec2,
    /// Seconds since firing
    pub age: f32,
}

impl Projectile {
    /// Unit vector of travel.
    #[must_use]
    pub fn direction(&self) -> Vec2 {
        Vec2::from_angle(self.angle)
    }

    /// Center after `age` seconds of flight.
    #[must_use]
    pub fn position_at(&self, age: f32) -> Vec2 {
        self.origin + self.direction() * self.speed * age
    }

    /// Current hitbox.
    #[must_use]
    pub fn hitbox(&self) -> Rect {
        Rect::from_center(self.position, self.half_extents)
    }
}

/// Result of a fire request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FireOutcome {
    /// A projectile was created.
    Fired(EntityId),
    /// No ammo; nothing changed.
    Empty,
    /// The weapon has not cooled down; nothing changed.
    CoolingDown,
}

/// A projectile that struck an agent this tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Hit {
    /// The destroyed projectile
    pub projectile: EntityId,
    /// The agent it struck
    pub target: EntityId,
}

/// Owns live projectiles and the weapon cooldown.
#[derive(Debug, Clone, PartialEq)]
pub struct ProjectileSystem {
    projectiles: BTreeMap<EntityId, Projectile>,
    last_fire: Option<f64>,
    cooldown: f64,
    speed: f32,
    half_extents: Vec2,
}

impl ProjectileSystem {
    /// Create an empty system from projectile settings.
    #[must_use]
    pub fn new(config: &ProjectileConfig) -> Self {
        Self {
            projectiles: BTreeMap::new(),
            last_fire: None,
            cooldown: seconds(config.cooldown),
            speed: config.speed,
            half_extents: config.half_extents,
        }
    }

    /// Try to fire from `origin` along `angle` at game time `now`.
    ///
    /// Requires `ammo > 0`. The first shot is always allowed; later shots
    /// need `now - last_fire >= cooldown`. A successful shot spends one round
    /// and restarts the cooldown.
    pub fn fire(&mut self, ids: &mut IdAllocator, origin: Vec2, angle: f32, now: f64, ammo: &mut u32) -> FireOutcome {
        if *ammo == 0 {
            return FireOutcome::Empty;
        }
        if self.last_fire.is_some_and(|last| now - last < self.cooldown) {
            return FireOutcome::CoolingDown;
        }

        *ammo -= 1;
        self.last_fire = Some(now);

        let id = ids.allocate();
        self.projectiles.insert(
            id,
            Projectile {
                id,
                origin,
                position: origin,
                angle,
                speed: self.speed,
                half_extents: self.half_extents,
                age: 0.0,
            },
        );
        trace!(projectile = %id, angle, ammo = *ammo, "fired");
        FireOutcome::Fired(id)
    }

    /// Move every projectile `dt` further along its line and despawn those no
    /// longer overlapping `arena`. Returns the despawned ids.
    pub fn advance(&mut self, dt: f32, arena: &Rect) -> Vec<EntityId> {
        for projectile in self.projectiles.values_mut() {
            projectile.age += dt;
            projectile.position = projectile.position_at(projectile.age);
        }

        let gone: Vec<EntityId> = self
            .projectiles
            .values()
            .filter(|p| !p.hitbox().intersects(arena))
            .map(|p| p.id)
            .collect();
        for id in &gone {
            self.projectiles.remove(id);
        }
        gone
    }

    /// Test every projectile against `targets` and destroy the ones that hit.
    ///
    /// Projectiles and targets are visited in id order; a projectile reports
    /// at most one hit (the lowest-id agent it overlaps).
    pub fn collect_hits<'a, I>(&mut self, targets: I) -> Vec<Hit>
    where
        I: IntoIterator<Item = &'a Agent>,
        I::IntoIter: Clone,
    {
        let targets = targets.into_iter();
        let hits: Vec<Hit> = self
            .projectiles
            .values()
            .filter_map(|projectile| {
                let hitbox = projectile.hitbox();
                targets
                    .clone()
                    .find(|agent| agent.transform.hitbox().intersects(&hitbox))
                    .map(|agent| Hit {
                        projectile: projectile.id,
                        target: agent.id,
                    })
            })
            .collect();

        for hit in &hits {
            self.projectiles.remove(&hit.projectile);
        }
        hits
    }

    /// Live projectiles in id order.
    pub fn iter(&self) -> impl Iterator<Item = &Projectile> {
        self.projectiles.values()
    }

    /// Look up a live projectile.
    #[must_use]
    pub fn get(&self, id: EntityId) -> Option<&Projectile> {
        self.projectiles.get(&id)
    }

    /// Number of live projectiles.
    #[must_use]
    pub fn len(&self) -> usize {
        self.projectiles.len()
    }

    /// True when nothing is in flight.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.projectiles.is_empty()
    }

    /// Remove every projectile and forget the cooldown.
    pub fn clear(&mut self) {
        self.projectiles.clear();
        self.last_fire = None;
    }
}
