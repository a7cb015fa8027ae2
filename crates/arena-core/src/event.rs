//! Game events for audio, HUD and telemetry collaborators.
//!
//! The world records one [`GameEvent`] per notable occurrence during a tick.
//! Nothing in the simulation reads them back; callers drain the log with
//! [`EventLog::take_events`] once per frame and react (play a sound, flash
//! the ammo counter, show the game-over screen).

use glam::Vec2;
use serde::{Deserialize, Serialize};

use crate::entity::{EntityId, HealthTier};
use crate::pursuit::Mode;

/// Something that happened during a tick.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A projectile left the weapon.
    Fired {
        /// The new projectile
        projectile: EntityId,
        /// Flight angle in radians
        angle: f32,
        /// Ammo left after the shot
        ammo: u32,
    },
    /// Fire was requested with no ammo.
    Empty,
    /// A projectile hit an agent that survived.
    Hit {
        /// The agent
        agent: EntityId,
        /// Health after the hit
        remaining: u32,
        /// Cosmetic bucket for the new health
        tier: HealthTier,
    },
    /// An agent's health reached zero.
    Killed {
        /// The removed agent
        agent: EntityId,
        /// Player kills after this one
        kill_count: u32,
    },
    /// A respawn was queued.
    RespawnScheduled {
        /// Game time the respawn becomes due
        due_at: f64,
    },
    /// A fresh agent entered the arena.
    AgentSpawned {
        /// The new agent
        agent: EntityId,
        /// Where it was placed
        position: Vec2,
    },
    /// An ammo pickup appeared.
    PickupSpawned {
        /// The new pickup
        pickup: EntityId,
        /// Where it was placed
        position: Vec2,
    },
    /// The player collected a pickup.
    PickupCollected {
        /// The collected pickup
        pickup: EntityId,
        /// Player ammo after collection
        ammo: u32,
    },
    /// An agent switched between roaming and chasing.
    ModeChanged {
        /// The agent
        agent: EntityId,
        /// Previous mode
        from: Mode,
        /// New mode
        to: Mode,
    },
    /// An agent touched the player.
    GameOver {
        /// The first agent found in contact
        agent: EntityId,
    },
}

/// Ordered buffer of events recorded since the last drain.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventLog {
    events: Vec<GameEvent>,
}

impl EventLog {
    /// Creates an empty log.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Record an event.
    pub fn push(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Drains and returns all recorded events in the order they happened.
    pub fn take_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }

    /// Events recorded since the last drain.
    #[must_use]
    pub fn events(&self) -> &[GameEvent] {
        &self.events
    }

    /// Number of pending events.
    #[must_use]
    pub fn len(&self) -> usize {
        self.events.len()
    }

    /// True when nothing is pending.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    /// Drop pending events.
    pub fn clear(&mut self) {
        self.events.clear();
    }
}
