//! Mover that glides between waypoints along a smoothstep curve.

use glam::Vec3;

use super::Movement;
use crate::constants::ARRIVAL_THRESHOLD;
use crate::vector_math::planar_distance;

/// Hermite smoothstep of `t` clamped to `0..=1`.
///
/// # Examples
/// ```
/// use warden::movement::smoothstep;
/// assert_eq!(smoothstep(0.0), 0.0);
/// assert_eq!(smoothstep(1.0), 1.0);
/// assert!((smoothstep(0.5) - 0.5).abs() < 1e-6);
/// assert_eq!(smoothstep(3.0), 1.0);
/// ```
#[must_use]
pub fn smoothstep(x: f32) -> f32 {
    let t = x.clamp(0.0, 1.0);
    t * t * 2.0f32.mul_add(-t, 3.0)
}

/// Eases out of the start point and into the target.
///
/// The leg duration is the straight-line distance over speed. Retargeting
/// by more than the arrival threshold, or changing speed, starts a fresh leg
/// from the current position.
#[derive(Debug, Clone, PartialEq)]
pub struct EasedMovement {
    position: Vec3,
    start: Vec3,
    target: Option<Vec3>,
    speed: f32,
    progress: f32,
    duration: f32,
    halted: bool,
}

impl EasedMovement {
    /// Creates a mover at rest.
    #[must_use]
    pub const fn new(position: Vec3, speed: f32) -> Self {
        Self {
            position,
            start: position,
            target: None,
            speed,
            progress: 1.0,
            duration: 0.0,
            halted: false,
        }
    }

    fn begin_leg(&mut self) {
        let Some(target) = self.target else {
            return;
        };
        self.start = self.position;
        self.progress = 0.0;
        let distance = planar_distance(self.start, target);
        self.duration = if self.speed > 0.0 {
            distance / self.speed
        } else {
            f32::INFINITY
        };
    }
}

impl Movement for EasedMovement {
    fn position(&self) -> Vec3 {
        self.position
    }

    fn set_target(&mut self, point: Vec3) {
        let unchanged = self
            .target
            .is_some_and(|current| planar_distance(current, point) <= ARRIVAL_THRESHOLD);
        if unchanged {
            return;
        }
        self.target = Some(point);
        self.begin_leg();
    }

    fn set_speed(&mut self, requested: f32) {
        let speed = requested.max(0.0);
        if (speed - self.speed).abs() <= f32::EPSILON {
            return;
        }
        self.speed = speed;
        if self.progress < 1.0 {
            self.begin_leg();
        }
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
        if !self.halted && self.progress < 1.0 {
            self.progress = if self.duration > 0.0 {
                (self.progress + dt.max(0.0) / self.duration).min(1.0)
            } else {
                1.0
            };
            self.position = self.start.lerp(target, smoothstep(self.progress));
        }
        planar_distance(self.position, target) <= ARRIVAL_THRESHOLD
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn small_retargets_keep_the_current_leg() {
        let mut mover = EasedMovement::new(Vec3::ZERO, 1.0);
        mover.set_target(Vec3::new(4.0, 0.0, 0.0));
        mover.advance(1.0);
        let before = mover.clone();
        mover.set_target(Vec3::new(4.05, 0.0, 0.0));
        assert_eq!(mover, before);
    }

    #[rstest]
    fn reaches_target_exactly_at_leg_end() {
        let mut mover = EasedMovement::new(Vec3::ZERO, 2.0);
        let goal = Vec3::new(0.0, 0.0, 4.0);
        mover.set_target(goal);
        assert!(!mover.advance(1.0));
        assert!(mover.advance(1.0));
        assert_eq!(mover.position(), goal);
    }
}
