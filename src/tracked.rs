//! Per-object adapter between a position source and the tracker.
//!
//! A [`TrackedEntity`] remembers where it last told the tracker it was and
//! only resyncs once it has moved further than its threshold. Every operation
//! takes the tracker as an `Option`; when it is absent the call fails with
//! [`TrackingError::TrackerUnavailable`] and the next tick simply tries again.

use glam::Vec3;
use log::error;
use thiserror::Error;

use crate::config::TrackingConfig;
use crate::entity::{EntityId, EntitySample, EntityType, PositionSource};
use crate::tracker::EntityTracker;
use crate::vector_math::planar_distance_squared;

/// Recoverable failures when syncing with the tracker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum TrackingError {
    /// No tracker was supplied for this tick.
    #[error("no entity tracker is available for {0}")]
    TrackerUnavailable(EntityId),
}

/// Grid membership state of one entity.
#[derive(Debug, Clone, PartialEq)]
pub struct TrackedEntity {
    id: EntityId,
    entity_type: EntityType,
    last_synced: Option<Vec3>,
    threshold_sq: f32,
    check_interval: u32,
    ticks_since_check: u32,
}

impl TrackedEntity {
    /// Creates an unregistered adapter.
    #[must_use]
    pub fn new(id: EntityId, entity_type: EntityType, config: &TrackingConfig) -> Self {
        Self {
            id,
            entity_type,
            last_synced: None,
            threshold_sq: config.movement_threshold * config.movement_threshold,
            check_interval: config.check_interval_ticks.max(1),
            ticks_since_check: 0,
        }
    }

    /// Identifier reported to the tracker.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// Category reported to the tracker, as last read from the source.
    #[must_use]
    pub const fn entity_type(&self) -> EntityType {
        self.entity_type
    }

    /// Whether the entity is currently registered.
    #[must_use]
    pub const fn is_registered(&self) -> bool {
        self.last_synced.is_some()
    }

    /// Position most recently sent to the tracker.
    #[must_use]
    pub const fn last_synced(&self) -> Option<Vec3> {
        self.last_synced
    }

    /// Reads position and category from `source`.
    fn sample(&mut self, source: &impl PositionSource) -> EntitySample {
        self.entity_type = source.entity_type();
        EntitySample::new(self.id, self.entity_type, source.world_position())
    }

    fn require<'a>(
        &self,
        tracker: Option<&'a mut EntityTracker>,
    ) -> Result<&'a mut EntityTracker, TrackingError> {
        tracker.ok_or_else(|| {
            error!("{} ({}) has no entity tracker", self.id, self.entity_type);
            TrackingError::TrackerUnavailable(self.id)
        })
    }

    /// Registers at `source`'s current position.
    ///
    /// # Errors
    /// Returns [`TrackingError::TrackerUnavailable`] when `tracker` is `None`.
    pub fn register_with_grid(
        &mut self,
        tracker: Option<&mut EntityTracker>,
        source: &impl PositionSource,
    ) -> Result<(), TrackingError> {
        let index = self.require(tracker)?;
        let sample = self.sample(source);
        index.register(Some(&sample));
        self.last_synced = Some(sample.position);
        self.ticks_since_check = 0;
        Ok(())
    }

    /// Leaves the grid. Unregistered adapters succeed without doing anything.
    ///
    /// # Errors
    /// Returns [`TrackingError::TrackerUnavailable`] when `tracker` is `None`.
    pub fn unregister_from_grid(
        &mut self,
        tracker: Option<&mut EntityTracker>,
    ) -> Result<(), TrackingError> {
        let index = self.require(tracker)?;
        if self.last_synced.take().is_some() {
            index.unregister_id(self.id);
        }
        Ok(())
    }

    /// Registers if absent, otherwise resyncs regardless of the threshold.
    ///
    /// # Errors
    /// Returns [`TrackingError::TrackerUnavailable`] when `tracker` is `None`.
    pub fn force_update(
        &mut self,
        tracker: Option<&mut EntityTracker>,
        source: &impl PositionSource,
    ) -> Result<(), TrackingError> {
        if !self.is_registered() {
            return self.register_with_grid(tracker, source);
        }
        let index = self.require(tracker)?;
        let sample = self.sample(source);
        index.update_position(Some(&sample));
        self.last_synced = Some(sample.position);
        Ok(())
    }

    /// Per-tick check. Returns `true` when a resync was sent.
    ///
    /// Unregistered adapters and ticks skipped by the check interval never
    /// touch the tracker.
    ///
    /// # Errors
    /// Returns [`TrackingError::TrackerUnavailable`] when a resync is due but
    /// `tracker` is `None`.
    pub fn tick(
        &mut self,
        tracker: Option<&mut EntityTracker>,
        source: &impl PositionSource,
    ) -> Result<bool, TrackingError> {
        let Some(last) = self.last_synced else {
            return Ok(false);
        };
        self.ticks_since_check += 1;
        if self.ticks_since_check < self.check_interval {
            return Ok(false);
        }
        self.ticks_since_check = 0;
        let position = source.world_position();
        if planar_distance_squared(last, position) <= self.threshold_sq {
            return Ok(false);
        }
        let index = self.require(tracker)?;
        let sample = self.sample(source);
        index.update_position(Some(&sample));
        self.last_synced = Some(sample.position);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GridConfig;
    use rstest::{fixture, rstest};

    struct Fixed(Vec3);

    impl PositionSource for Fixed {
        fn world_position(&self) -> Vec3 {
            self.0
        }

        fn entity_type(&self) -> EntityType {
            EntityType::Aphid
        }
    }

    #[fixture]
    fn tracker() -> EntityTracker {
        EntityTracker::new(&GridConfig::default()).unwrap_or_else(|err| panic!("{err}"))
    }

    #[rstest]
    fn sub_threshold_motion_is_ignored(mut tracker: EntityTracker) {
        let mut tracked = TrackedEntity::new(EntityId(1), EntityType::Aphid, &TrackingConfig::default());
        assert_eq!(
            tracked.register_with_grid(Some(&mut tracker), &Fixed(Vec3::new(2.0, 0.0, 2.0))),
            Ok(())
        );
        let synced = tracked.tick(Some(&mut tracker), &Fixed(Vec3::new(2.005, 0.0, 2.0)));
        assert_eq!(synced, Ok(false));
        assert_eq!(tracker.stats().position_updates, 0);
    }

    #[rstest]
    fn missing_tracker_is_recoverable(mut tracker: EntityTracker) {
        let mut tracked = TrackedEntity::new(EntityId(2), EntityType::Aphid, &TrackingConfig::default());
        let source = Fixed(Vec3::new(1.5, 0.0, 1.5));
        assert_eq!(
            tracked.register_with_grid(None, &source),
            Err(TrackingError::TrackerUnavailable(EntityId(2)))
        );
        assert!(!tracked.is_registered());
        assert_eq!(tracked.force_update(Some(&mut tracker), &source), Ok(()));
        assert!(tracked.is_registered());
        assert!(tracker.grid().contains(EntityId(2)));
    }

    #[rstest]
    fn check_interval_throttles_sampling(mut tracker: EntityTracker) {
        let config = TrackingConfig {
            check_interval_ticks: 3,
            ..TrackingConfig::default()
        };
        let mut tracked = TrackedEntity::new(EntityId(3), EntityType::Aphid, &config);
        assert_eq!(
            tracked.register_with_grid(Some(&mut tracker), &Fixed(Vec3::ZERO)),
            Ok(())
        );
        let moved = Fixed(Vec3::new(4.0, 0.0, 0.0));
        assert_eq!(tracked.tick(Some(&mut tracker), &moved), Ok(false));
        assert_eq!(tracked.tick(Some(&mut tracker), &moved), Ok(false));
        assert_eq!(tracked.tick(Some(&mut tracker), &moved), Ok(true));
    }

    #[rstest]
    fn category_follows_the_source(mut tracker: EntityTracker) {
        let mut tracked = TrackedEntity::new(EntityId(4), EntityType::Beetle, &TrackingConfig::default());
        let source = Fixed(Vec3::new(3.5, 0.0, 3.5));
        assert_eq!(tracked.register_with_grid(Some(&mut tracker), &source), Ok(()));
        assert_eq!(tracked.entity_type(), EntityType::Aphid);
        assert_eq!(tracker.entity_type_of(EntityId(4)), Some(EntityType::Aphid));
    }
}
