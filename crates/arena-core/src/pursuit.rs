//! Enemy pursuit behavior: a two-state machine (roam, chase) driving path
//! requests and producing a desired velocity.
//!
//! # State Machine
//!
//! ```text
//!          distance < chase_distance
//!   ROAM ----------------------------> CHASE
//!        <----------------------------
//!     distance >= chase_distance AND path empty or stale
//! ```
//!
//! A chase path is stale once its final waypoint is farther than the stale
//! tolerance from the player's live position. The exit condition needs both
//! the distance and the staleness test, so an agent sitting exactly on the
//! threshold does not flip modes every tick.
//!
//! # Planning
//!
//! A new path is requested on every transition and whenever the current path
//! is exhausted (or, while chasing, stale). Each agent issues at most one
//! search per [`PursuitController::update`] call. A plan that comes back
//! empty delays the next attempt by the replan backoff; transitions always
//! plan immediately.

use std::collections::VecDeque;

use glam::Vec2;
use rand::Rng;
use serde::{Deserialize, Serialize};
use tilenav::{sample_open_position, PathPlanner, Rect};
use tracing::debug;

use crate::config::{seconds, ArenaConfig};
use crate::entity::Agent;

/// Behavior mode of an agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Mode {
    /// Wander towards random open points
    Roam,
    /// Follow the player
    Chase,
}

/// The active plan: mode, its target and the waypoints still to visit.
#[derive(Debug, Clone, PartialEq)]
pub enum Pursuit {
    /// Heading for a random open point.
    Roam {
        /// Sampled destination
        target: Vec2,
        /// Remaining waypoints, next first
        waypoints: VecDeque<Vec2>,
    },
    /// Heading for the player.
    Chase {
        /// Player position when the path was planned
        target: Vec2,
        /// Remaining waypoints, next first
        waypoints: VecDeque<Vec2>,
    },
}

impl Pursuit {
    /// The mode this plan belongs to.
    #[must_use]
    pub fn mode(&self) -> Mode {
        match self {
            Self::Roam { .. } => Mode::Roam,
            Self::Chase { .. } => Mode::Chase,
        }
    }

    /// The destination the plan was made for.
    #[must_use]
    pub fn target(&self) -> Vec2 {
        match self {
            Self::Roam { target, .. } | Self::Chase { target, .. } => *target,
        }
    }

    /// Remaining waypoints.
    #[must_use]
    pub fn waypoints(&self) -> &VecDeque<Vec2> {
        match self {
            Self::Roam { waypoints, .. } | Self::Chase { waypoints, .. } => waypoints,
        }
    }

    fn waypoints_mut(&mut self) -> &mut VecDeque<Vec2> {
        match self {
            Self::Roam { waypoints, .. } | Self::Chase { waypoints, .. } => waypoints,
        }
    }

    /// The waypoint currently steered towards.
    #[must_use]
    pub fn next_waypoint(&self) -> Option<Vec2> {
        self.waypoints().front().copied()
    }

    /// True when no waypoints remain.
    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.waypoints().is_empty()
    }

    /// True when the path is empty or ends farther than `tolerance` from `player`.
    #[must_use]
    pub fn is_stale(&self, player: Vec2, tolerance: f32) -> bool {
        self.waypoints()
            .back()
            .map_or(true, |end| end.distance(player) > tolerance)
    }
}

/// Per-agent pursuit state.
#[derive(Debug, Clone, PartialEq)]
pub struct PathFollower {
    pursuit: Pursuit,
    chase_distance: f32,
    retry_at: f64,
}

impl PathFollower {
    /// Start roaming with an empty path; the first update plans immediately.
    #[must_use]
    pub fn new(position: Vec2, chase_distance: f32) -> Self {
        Self {
            pursuit: Pursuit::Roam {
                target: position,
                waypoints: VecDeque::new(),
            },
            chase_distance,
            retry_at: f64::NEG_INFINITY,
        }
    }

    /// Current mode.
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.pursuit.mode()
    }

    /// Current plan.
    #[must_use]
    pub fn pursuit(&self) -> &Pursuit {
        &self.pursuit
    }

    /// Distance at which this agent starts chasing.
    #[must_use]
    pub fn chase_distance(&self) -> f32 {
        self.chase_distance
    }
}

/// Speeds and limits used by the controller.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PursuitParams {
    /// Speed in chase mode
    pub chase_speed: f32,
    /// Speed in roam mode
    pub roam_speed: f32,
    /// Chase paths ending farther than this from the player are stale
    pub stale_tolerance: f32,
    /// Seconds to wait after an empty plan
    pub replan_backoff: f32,
    /// Candidates tried when sampling a roam target
    pub sample_attempts: u32,
}

impl PursuitParams {
    /// Extract pursuit parameters from a match configuration.
    #[must_use]
    pub fn from_config(config: &ArenaConfig) -> Self {
        Self {
            chase_speed: config.enemy.chase_speed,
            roam_speed: config.enemy.roam_speed,
            stale_tolerance: config.enemy.stale_tolerance,
            replan_backoff: config.enemy.replan_backoff,
            sample_attempts: config.spawn_attempts,
        }
    }

    /// Movement speed for a mode.
    #[must_use]
    pub fn speed(&self, mode: Mode) -> f32 {
        match mode {
            Mode::Roam => self.roam_speed,
            Mode::Chase => self.chase_speed,
        }
    }
}

/// A mode change.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Transition {
    /// Mode before the update
    pub from: Mode,
    /// Mode after the update
    pub to: Mode,
}

/// What one update did.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PursuitStep {
    /// Set when the mode changed
    pub transition: Option<Transition>,
    /// True when a path search was issued
    pub replanned: bool,
}

/// Drives [`PathFollower`]s: mode transitions, planning and steering.
#[derive(Debug, Clone)]
pub struct PursuitController {
    planner: PathPlanner,
    arena: Rect,
    params: PursuitParams,
}

impl PursuitController {
    /// Create a controller searching `planner`'s grid inside `arena`.
    #[must_use]
    pub fn new(planner: PathPlanner, arena: Rect, params: PursuitParams) -> Self {
        Self { planner, arena, params }
    }

    /// The controller's parameters.
    #[must_use]
    pub fn params(&self) -> &PursuitParams {
        &self.params
    }

    /// Advance one agent's state machine and set its desired velocity.
    ///
    /// Does not move the agent; integration happens in the kinematics pass.
    pub fn update<R: Rng + ?Sized>(&self, agent: &mut Agent, player: Vec2, now: f64, rng: &mut R) -> PursuitStep {
        let position = agent.transform.position;
        let follower = &mut agent.follower;

        let distance = position.distance(player);
        let current = follower.mode();
        let stale = follower.pursuit.is_stale(player, self.params.stale_tolerance);
        let next = match current {
            Mode::Roam if distance < follower.chase_distance => Mode::Chase,
            Mode::Chase if distance >= follower.chase_distance && stale => Mode::Roam,
            mode => mode,
        };

        let transition = (next != current).then_some(Transition { from: current, to: next });
        if let Some(Transition { from, to }) = transition {
            debug!(agent = %agent.id, ?from, ?to, distance, "pursuit mode changed");
        }

        let wants_plan = follower.pursuit.is_exhausted() || (next == Mode::Chase && stale);
        let replanned = transition.is_some() || (wants_plan && now >= follower.retry_at);
        if replanned {
            follower.pursuit = self.plan(next, position, player, agent.transform.half_extents, rng);
            debug!(agent = %agent.id, waypoints = follower.pursuit.waypoints().len(), "replanned");
            if follower.pursuit.is_exhausted() {
                follower.retry_at = now + seconds(self.params.replan_backoff);
            }
        }

        let hitbox = agent.transform.hitbox();
        let waypoints = follower.pursuit.waypoints_mut();
        while waypoints.front().is_some_and(|w| hitbox.contains_point(*w)) {
            waypoints.pop_front();
        }

        agent.velocity.0 = match waypoints.front() {
            Some(&waypoint) => (waypoint - position).normalize_or_zero() * self.params.speed(next),
            None => Vec2::ZERO,
        };

        PursuitStep { transition, replanned }
    }

    fn plan<R: Rng + ?Sized>(&self, mode: Mode, position: Vec2, player: Vec2, half_extents: Vec2, rng: &mut R) -> Pursuit {
        match mode {
            Mode::Chase => Pursuit::Chase {
                target: player,
                waypoints: self.planner.find_path(position, player).into(),
            },
            Mode::Roam => {
                let sampled = sample_open_position(
                    self.planner.grid(),
                    rng,
                    self.arena,
                    half_extents,
                    self.params.sample_attempts,
                    |_| true,
                );
                match sampled {
                    Ok(target) => Pursuit::Roam {
                        target,
                        waypoints: self.planner.find_path(position, target).into(),
                    },
                    Err(err) => {
                        debug!(%err, "no roam target");
                        Pursuit::Roam {
                            target: position,
                            waypoints: VecDeque::new(),
                        }
                    }
                }
            }
        }
    }
}
