//! Acceleration-limited mover.
//!
//! Velocity is steered towards a desired velocity at a bounded rate, braking
//! harder than it accelerates. Near the target the desired speed follows the
//! stopping curve `sqrt(2 · deceleration · distance)`.

use glam::Vec3;

use super::Movement;
use crate::constants::{ARRIVAL_THRESHOLD, PHYSICS_ACCELERATION, PHYSICS_DECELERATION};
use crate::vector_math::{planar_direction, planar_distance};

/// Moves `current` towards `desired` by at most `max_delta`.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use warden::movement::approach_velocity;
/// let v = approach_velocity(Vec3::ZERO, Vec3::new(10.0, 0.0, 0.0), 2.5);
/// assert!((v.x - 2.5).abs() < 1e-6);
/// let w = approach_velocity(Vec3::ZERO, Vec3::new(1.0, 0.0, 0.0), 2.5);
/// assert_eq!(w, Vec3::new(1.0, 0.0, 0.0));
/// ```
#[must_use]
pub fn approach_velocity(current: Vec3, desired: Vec3, max_delta: f32) -> Vec3 {
    let delta = desired - current;
    let length = delta.length();
    if length <= max_delta || length <= f32::EPSILON {
        desired
    } else {
        current + delta / length * max_delta
    }
}

/// Steers with bounded acceleration and deceleration.
#[derive(Debug, Clone, PartialEq)]
pub struct PhysicsMovement {
    position: Vec3,
    velocity: Vec3,
    target: Option<Vec3>,
    max_speed: f32,
    acceleration: f32,
    deceleration: f32,
    halted: bool,
}

impl PhysicsMovement {
    /// Creates a mover at rest with the default acceleration profile.
    #[must_use]
    pub const fn new(position: Vec3, max_speed: f32) -> Self {
        Self {
            position,
            velocity: Vec3::ZERO,
            target: None,
            max_speed,
            acceleration: PHYSICS_ACCELERATION,
            deceleration: PHYSICS_DECELERATION,
            halted: false,
        }
    }

    /// Current velocity.
    #[must_use]
    pub const fn velocity(&self) -> Vec3 {
        self.velocity
    }

    fn desired_velocity(&self, target: Vec3) -> Vec3 {
        let distance = planar_distance(self.position, target);
        let stopping_speed = (2.0 * self.deceleration * distance).sqrt();
        planar_direction(self.position, target) * self.max_speed.min(stopping_speed)
    }

    fn steer(&mut self, desired: Vec3, dt: f32) {
        let rate = if desired.length_squared() < self.velocity.length_squared() {
            self.deceleration
        } else {
            self.acceleration
        };
        self.velocity = approach_velocity(self.velocity, desired, rate * dt);
    }
}

impl Movement for PhysicsMovement {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_target(&mut self, point: Vec3) {
        self.target = Some(point);
    }

    fn set_speed(&mut self, speed: f32) {
        self.max_speed = speed.max(0.0);
    }

    fn stop(&mut self) {
        self.halted = true;
    }

    fn resume(&mut self) {
        self.halted = false;
    }

    fn advance(&mut self, elapsed: f32) -> bool {
        let dt = elapsed.max(0.0);
        let target = match self.target {
            Some(target) if !self.halted => target,
            _ => {
                self.steer(Vec3::ZERO, dt);
                self.position += self.velocity * dt;
                return self.target.is_none();
            }
        };
        let remaining = planar_distance(self.position, target);
        if remaining <= ARRIVAL_THRESHOLD {
            self.steer(Vec3::ZERO, dt);
            return true;
        }
        let desired = self.desired_velocity(target);
        self.steer(desired, dt);
        let travel = self.velocity * dt;
        if travel.length() >= remaining {
            self.position.x = target.x;
            self.position.z = target.z;
            self.velocity = Vec3::ZERO;
            return true;
        }
        self.position += travel;
        planar_distance(self.position, target) <= ARRIVAL_THRESHOLD
    }
}
