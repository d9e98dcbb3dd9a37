//! Planar vector helpers.
//! The grid and pursuit logic work on the X/Z plane; height is ignored.
use glam::{Vec2, Vec3};

/// Projects a world position onto the X/Z plane.
#[must_use]
pub const fn planar(position: Vec3) -> Vec2 {
    Vec2::new(position.x, position.z)
}

/// Squared distance between two positions measured on the X/Z plane.
///
/// # Examples
/// ```
/// use glam::Vec3;
/// use warden::vector_math::planar_distance_squared;
/// let d = planar_distance_squared(Vec3::new(0.0, 9.0, 0.0), Vec3::new(3.0, 0.0, 4.0));
/// assert!((d - 25.0).abs() < f32::EPSILON);
/// ```
#[must_use]
pub fn planar_distance_squared(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance_squared(planar(b))
}

/// Distance between two positions measured on the X/Z plane.
#[must_use]
pub fn planar_distance(a: Vec3, b: Vec3) -> f32 {
    planar(a).distance(planar(b))
}

/// Returns the unit X/Z direction from `from` towards `to`.
///
/// Coincident or non-finite inputs yield the zero vector.
///
/// # Examples
///
/// ```
/// use glam::Vec3;
/// use warden::vector_math::planar_direction;
/// let dir = planar_direction(Vec3::ZERO, Vec3::new(3.0, 7.0, 4.0));
/// assert!((dir.x - 0.6).abs() < 1e-6);
/// assert!(dir.y.abs() < 1e-6);
/// assert!((dir.z - 0.8).abs() < 1e-6);
///
/// assert_eq!(planar_direction(Vec3::ONE, Vec3::ONE), Vec3::ZERO);
/// ```
#[must_use]
pub fn planar_direction(from: Vec3, to: Vec3) -> Vec3 {
    let delta = Vec3::new(to.x - from.x, 0.0, to.z - from.z);
    if !delta.is_finite() {
        return Vec3::ZERO;
    }
    delta.try_normalize().unwrap_or(Vec3::ZERO)
}
