//! Constructors for samples and trackers.

use glam::Vec3;
use warden::config::GridConfig;
use warden::{EntityId, EntitySample, EntityTracker, EntityType};

/// Point on the ground plane.
///
/// # Examples
/// ```
/// use test_utils::at;
/// assert_eq!(at(1.0, 2.0), glam::Vec3::new(1.0, 0.0, 2.0));
/// ```
pub fn at(x: f32, z: f32) -> Vec3 {
    Vec3::new(x, 0.0, z)
}

/// Sample with id `id` at `(x, 0, z)`.
///
/// # Examples
/// ```
/// use test_utils::sample;
/// use warden::{EntityId, EntityType, GridEntity};
/// let beetle = sample(3, EntityType::Beetle, 0.5, 0.5);
/// assert_eq!(beetle.id(), EntityId(3));
/// ```
pub fn sample(id: u64, entity_type: EntityType, x: f32, z: f32) -> EntitySample {
    EntitySample::new(EntityId(id), entity_type, at(x, z))
}

/// Tracker built from the default grid configuration.
///
/// # Panics
/// Panics if the default configuration is rejected.
pub fn tracker() -> EntityTracker {
    tracker_with(&GridConfig::default())
}

/// Tracker built from `config`.
///
/// # Panics
/// Panics if `config` is rejected.
pub fn tracker_with(config: &GridConfig) -> EntityTracker {
    EntityTracker::new(config).unwrap_or_else(|err| panic!("tracker fixture: {err}"))
}
