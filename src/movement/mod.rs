//! Movement capability and the reference strategies behind it.
//!
//! The pursuit logic only depends on [`Movement`]. [`MovementStrategy`] picks
//! one of three concrete movers from an entity's category.

mod direct;
mod eased;
mod physics;

use glam::Vec3;

pub use direct::DirectMovement;
pub use eased::{smoothstep, EasedMovement};
pub use physics::{approach_velocity, PhysicsMovement};

use crate::entity::EntityType;

/// A body that can be steered towards a point.
pub trait Movement {
    /// Current world position.
    fn position(&self) -> Vec3;
    /// Sets the point to move towards.
    fn set_target(&mut self, point: Vec3);
    /// Sets the travel speed in world units per second.
    fn set_speed(&mut self, speed: f32);
    /// Halts in place, keeping the target.
    fn stop(&mut self);
    /// Continues towards the target after [`Movement::stop`].
    fn resume(&mut self);
    /// Advances by `dt` seconds and reports whether the target is reached.
    fn advance(&mut self, dt: f32) -> bool;
}

/// Which mover a [`MovementStrategy`] wraps.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MovementKind {
    /// Constant-speed straight line.
    Direct,
    /// Acceleration-limited steering.
    Physics,
    /// Smoothstep interpolation between waypoints.
    Eased,
}

impl MovementKind {
    /// Mover used for `entity_type`.
    #[must_use]
    pub const fn for_entity_type(entity_type: EntityType) -> Self {
        match entity_type {
            EntityType::Aphid => Self::Physics,
            EntityType::Ladybug => Self::Eased,
            EntityType::Beetle | EntityType::Ant | EntityType::Flag => Self::Direct,
        }
    }
}

/// One of the reference movers, selected once per entity.
#[derive(Debug, Clone, PartialEq)]
pub enum MovementStrategy {
    /// See [`DirectMovement`].
    Direct(DirectMovement),
    /// See [`PhysicsMovement`].
    Physics(PhysicsMovement),
    /// See [`EasedMovement`].
    Eased(EasedMovement),
}

impl MovementStrategy {
    /// Builds the mover matching `entity_type`.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use warden::movement::{MovementKind, MovementStrategy};
    /// use warden::EntityType;
    /// let mover = MovementStrategy::for_entity_type(EntityType::Aphid, Vec3::ZERO, 2.0);
    /// assert_eq!(mover.kind(), MovementKind::Physics);
    /// ```
    #[must_use]
    pub fn for_entity_type(entity_type: EntityType, position: Vec3, speed: f32) -> Self {
        match MovementKind::for_entity_type(entity_type) {
            MovementKind::Direct => Self::Direct(DirectMovement::new(position, speed)),
            MovementKind::Physics => Self::Physics(PhysicsMovement::new(position, speed)),
            MovementKind::Eased => Self::Eased(EasedMovement::new(position, speed)),
        }
    }

    /// Which mover this is.
    #[must_use]
    pub const fn kind(&self) -> MovementKind {
        match self {
            Self::Direct(_) => MovementKind::Direct,
            Self::Physics(_) => MovementKind::Physics,
            Self::Eased(_) => MovementKind::Eased,
        }
    }

    fn inner(&self) -> &dyn Movement {
        match self {
            Self::Direct(mover) => mover,
            Self::Physics(mover) => mover,
            Self::Eased(mover) => mover,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn Movement {
        match self {
            Self::Direct(mover) => mover,
            Self::Physics(mover) => mover,
            Self::Eased(mover) => mover,
        }
    }
}

impl Movement for MovementStrategy {
    fn position(&self) -> Vec3 {
        self.inner().position()
    }

    fn set_target(&mut self, point: Vec3) {
        self.inner_mut().set_target(point);
    }

    fn set_speed(&mut self, speed: f32) {
        self.inner_mut().set_speed(speed);
    }

    fn stop(&mut self) {
        self.inner_mut().stop();
    }

    fn resume(&mut self) {
        self.inner_mut().resume();
    }

    fn advance(&mut self, dt: f32) -> bool {
        self.inner_mut().advance(dt)
    }
}
