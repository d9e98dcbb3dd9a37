//! Ground-plane vector helpers.

use glam::Vec3;
use warden::vector_math::{planar, planar_direction, planar_distance, planar_distance_squared};

#[test]
fn height_is_ignored_by_distances() {
    let a = Vec3::new(1.0, 50.0, 1.0);
    let b = Vec3::new(4.0, -3.0, 5.0);
    assert_eq!(planar_distance_squared(a, b), 25.0);
    assert_eq!(planar_distance(a, b), 5.0);
}

#[test]
fn direction_is_flat_and_unit_length() {
    let direction = planar_direction(Vec3::new(0.0, 2.0, 0.0), Vec3::new(3.0, 9.0, 4.0));
    assert_eq!(direction.y, 0.0);
    assert!((direction.length() - 1.0).abs() < 1e-6);
}

#[test]
fn direction_between_coincident_points_is_zero() {
    assert_eq!(planar_direction(Vec3::ONE, Vec3::new(1.0, 7.0, 1.0)), Vec3::ZERO);
}

#[test]
fn planar_drops_height() {
    assert_eq!(planar(Vec3::new(2.0, 9.0, -3.0)), glam::Vec2::new(2.0, -3.0));
}
