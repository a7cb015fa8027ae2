//! Combat resolution: projectile hits reduce agent health, and depleted
//! agents are removed, credited to the player and queued for respawn.

use std::collections::BTreeMap;

use rand::Rng;
use tracing::{debug, info};

use crate::config::{seconds, RespawnConfig};
use crate::entity::{Agent, EntityId, HealthTier, Player};
use crate::spawn::RespawnQueue;

/// What a single hit did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HitOutcome {
    /// The agent survived.
    Damaged {
        /// The agent
        agent: EntityId,
        /// Health left
        remaining: u32,
        /// Cosmetic bucket for the remaining health
        tier: HealthTier,
    },
    /// The agent was removed.
    Killed {
        /// The removed agent
        agent: EntityId,
        /// Seconds until its replacement becomes due
        respawn_delay: f64,
        /// Game time the replacement becomes due
        due_at: f64,
    },
    /// The id was not live (already removed this tick).
    Missing(EntityId),
}

/// Applies hits to agents.
#[derive(Debug, Clone, PartialEq)]
pub struct CombatResolver {
    damage: u32,
    delay_min: f64,
    delay_max: f64,
}

impl CombatResolver {
    /// One point of damage per hit, respawn delays from `respawn`.
    #[must_use]
    pub fn new(respawn: &RespawnConfig) -> Self {
        Self {
            damage: 1,
            delay_min: seconds(respawn.delay_min),
            delay_max: seconds(respawn.delay_max),
        }
    }

    /// Apply one hit to agent `id`.
    ///
    /// At zero health the agent is removed from `agents`, the player's kill
    /// count goes up by exactly one and a respawn is queued after a delay
    /// drawn uniformly from the configured range.
    pub fn apply_hit<R: Rng + ?Sized>(
        &self,
        agents: &mut BTreeMap<EntityId, Agent>,
        id: EntityId,
        player: &mut Player,
        respawns: &mut RespawnQueue,
        now: f64,
        rng: &mut R,
    ) -> HitOutcome {
        let Some(agent) = agents.get_mut(&id) else {
            return HitOutcome::Missing(id);
        };

        let remaining = agent.health.damage(self.damage);
        if !agent.health.is_depleted() {
            let tier = agent.health.tier();
            debug!(agent = %id, remaining, ?tier, "agent hit");
            return HitOutcome::Damaged {
                agent: id,
                remaining,
                tier,
            };
        }

        agents.remove(&id);
        player.kill_count += 1;
        let respawn_delay = self.sample_delay(rng);
        let due_at = now + respawn_delay;
        respawns.schedule(due_at);
        info!(agent = %id, kills = player.kill_count, respawn_delay, "agent killed");

        HitOutcome::Killed {
            agent: id,
            respawn_delay,
            due_at,
        }
    }

    fn sample_delay<R: Rng + ?Sized>(&self, rng: &mut R) -> f64 {
        if self.delay_max > self.delay_min {
            rng.gen_range(self.delay_min..=self.delay_max)
        } else {
            self.delay_min
        }
    }
}
