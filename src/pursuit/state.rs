//! Pursuit state and the signals the agent emits.

use glam::Vec3;

use crate::difficulty::{DifficultyLevel, Tuning};
use crate::entity::EntityId;

/// Coarse behaviour of the pursuit agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PursuitMode {
    /// Wandering around the objective with no target.
    Patrolling,
    /// Closing in on a target.
    Pursuing,
    /// Within attack range of the target and dealing damage.
    Attacking,
}

/// Why a target was dropped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LossReason {
    /// The target left the grid.
    Unregistered,
    /// The target ran out of hit points.
    Defeated,
    /// The target stopped taking part in the simulation.
    Inactive,
}

/// Signals recorded by the agent for the surrounding game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PursuitEvent {
    /// A target was chosen while none was held.
    TargetAcquired {
        /// The new target.
        target: EntityId,
    },
    /// A better target replaced the current one.
    Retargeted {
        /// The dropped target.
        from: EntityId,
        /// The new target.
        to: EntityId,
    },
    /// The target was dropped.
    TargetLost {
        /// The dropped target.
        target: EntityId,
        /// Why it was dropped.
        reason: LossReason,
    },
    /// The agent came within range and began dealing damage.
    Attacking {
        /// The target under attack.
        target: EntityId,
    },
    /// The agent went back to patrolling.
    Idle {
        /// The patrol destination.
        point: Vec3,
    },
}

/// Target, patrol, and tuning state of one agent.
#[derive(Debug, Clone, PartialEq)]
pub struct PursuitState {
    pub(crate) target: Option<EntityId>,
    pub(crate) target_position: Option<Vec3>,
    pub(crate) target_score: f32,
    pub(crate) player_selected: bool,
    pub(crate) patrol_point: Option<Vec3>,
    pub(crate) attacking: bool,
    pub(crate) level: DifficultyLevel,
    pub(crate) tuning: Tuning,
}

impl PursuitState {
    pub(crate) const fn new(level: DifficultyLevel, tuning: Tuning) -> Self {
        Self {
            target: None,
            target_position: None,
            target_score: f32::INFINITY,
            player_selected: false,
            patrol_point: None,
            attacking: false,
            level,
            tuning,
        }
    }

    pub(crate) fn set_target(&mut self, id: EntityId, position: Vec3, score: f32, selected: bool) {
        self.target = Some(id);
        self.target_position = Some(position);
        self.target_score = score;
        self.player_selected = selected;
        self.attacking = false;
    }

    pub(crate) fn clear_target(&mut self) {
        self.target = None;
        self.target_position = None;
        self.target_score = f32::INFINITY;
        self.player_selected = false;
        self.attacking = false;
    }

    /// Current target, if any.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        self.target
    }

    /// Last known position of the target.
    #[must_use]
    pub const fn target_position(&self) -> Option<Vec3> {
        self.target_position
    }

    /// Whether the target was chosen by the player.
    #[must_use]
    pub const fn is_player_selected(&self) -> bool {
        self.player_selected
    }

    /// Current patrol destination.
    #[must_use]
    pub const fn patrol_point(&self) -> Option<Vec3> {
        self.patrol_point
    }

    /// Whether the agent is dealing damage.
    #[must_use]
    pub const fn is_attacking(&self) -> bool {
        self.attacking
    }

    /// Active difficulty level.
    #[must_use]
    pub const fn level(&self) -> DifficultyLevel {
        self.level
    }

    /// Parameters derived from the active difficulty level.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.tuning
    }

    /// Coarse behaviour derived from target and attack state.
    #[must_use]
    pub const fn mode(&self) -> PursuitMode {
        match (self.target, self.attacking) {
            (None, _) => PursuitMode::Patrolling,
            (Some(_), false) => PursuitMode::Pursuing,
            (Some(_), true) => PursuitMode::Attacking,
        }
    }
}
