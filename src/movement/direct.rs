//! Constant-speed straight-line mover.

use glam::Vec3;

use super::Movement;
use crate::constants::ARRIVAL_THRESHOLD;
use crate::vector_math::{planar_direction, planar_distance, planar_distance_squared};

/// Moves along the X/Z plane at a fixed speed and snaps onto the target.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectMovement {
    position: Vec3,
    target: Option<Vec3>,
    speed: f32,
    halted: bool,
}

impl DirectMovement {
    /// Creates a mover at rest.
    #[must_use]
    pub const fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            target: None,
            speed,
            halted: false,
        }
    }

    fn has_arrived(&self) -> bool {
        self.target.map_or(true, |target| {
            planar_distance_squared(self.position, target) <= ARRIVAL_THRESHOLD * ARRIVAL_THRESHOLD
        })
    }
}

impl Movement for DirectMovement {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_target(&mut self, point: Vec3) {
        self.target = Some(point);
    }

    fn set_speed(&mut self, speed: f32) {
        self.speed = speed.max(0.0);
    }

    fn stop(&mut self) {
        self.halted = true;
    }

    fn resume(&mut self) {
        self.halted = false;
    }

    fn advance(&mut self, dt: f32) -> bool {
        let Some(target) = self.target else {
            return true;
        };
        if self.halted {
            return self.has_arrived();
        }
        let step = self.speed * dt.max(0.0);
        if planar_distance(self.position, target) <= step {
            self.position.x = target.x;
            self.position.z = target.z;
        } else {
            self.position += planar_direction(self.position, target) * step;
        }
        self.has_arrived()
    }
}
