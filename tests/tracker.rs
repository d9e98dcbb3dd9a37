//! Tracker bookkeeping: statistics, pooled queries, and cell allocation.

use rstest::{fixture, rstest};
use test_utils::{assert_same_ids, at, sample, tracker_with, EventLog};
use warden::config::{CellAllocation, GridConfig};
use warden::grid::GridEventKind;
use warden::{CellCoord, EntityId, EntityTracker, EntityType};

#[fixture]
fn tracker() -> EntityTracker {
    test_utils::tracker()
}

#[fixture]
fn lazy() -> EntityTracker {
    tracker_with(&GridConfig {
        allocation: CellAllocation::Lazy,
        ..GridConfig::default()
    })
}

#[rstest]
fn taking_stats_resets_counters(mut tracker: EntityTracker) {
    tracker.register(Some(&sample(1, EntityType::Beetle, 1.5, 1.5)));
    tracker.register(Some(&sample(2, EntityType::Aphid, 2.5, 1.5)));
    tracker.update_position(Some(&sample(1, EntityType::Beetle, 6.5, 1.5)));
    tracker.unregister_id(EntityId(2));

    let stats = tracker.take_stats();
    assert_eq!(stats.registrations, 2);
    assert_eq!(stats.position_updates, 1);
    assert_eq!(stats.unregistrations, 1);
    assert_eq!(tracker.stats(), warden::tracker::TrackerStats::default());
}

#[rstest]
fn missing_entities_are_skipped(mut tracker: EntityTracker) {
    tracker.register::<warden::EntitySample>(None);
    tracker.update_position::<warden::EntitySample>(None);
    tracker.unregister::<warden::EntitySample>(None);
    assert_eq!(tracker.stats(), warden::tracker::TrackerStats::default());
    assert!(tracker.grid().is_empty());
}

#[rstest]
fn updates_before_registration_register(mut tracker: EntityTracker) {
    let log = EventLog::attach(&mut tracker);
    tracker.update_position(Some(&sample(9, EntityType::Ladybug, 3.5, 3.5)));
    assert!(tracker.is_known(EntityId(9)));
    assert_eq!(tracker.stats().auto_registrations, 1);
    assert_eq!(log.count(GridEventKind::Registered), 1);
}

#[rstest]
fn pooled_buffers_are_reused(mut tracker: EntityTracker) {
    tracker.register(Some(&sample(1, EntityType::Beetle, 5.5, 5.5)));
    for _ in 0..4 {
        let found = tracker.entities_in_radius_pooled(at(5.0, 5.0), 2.0);
        assert_same_ids(&found, &[EntityId(1)]);
        tracker.release_results(found);
    }
    let pool = tracker.pool_stats();
    assert_eq!(pool.allocated, 1);
    assert_eq!(pool.reused, 3);
    assert_eq!(tracker.stats().pooled_queries, 4);
}

#[rstest]
fn candidate_query_excludes_self_and_non_candidates(mut tracker: EntityTracker) {
    tracker.register(Some(&sample(1, EntityType::Ant, 10.5, 10.5)));
    tracker.register(Some(&sample(2, EntityType::Flag, 10.5, 10.5)));
    tracker.register(Some(&sample(3, EntityType::Aphid, 11.5, 10.5)));
    tracker.register(Some(&sample(4, EntityType::Beetle, 9.5, 10.5)));
    let found = tracker.candidates_in_radius_pooled(at(10.5, 10.5), 2.0, EntityId(1), usize::MAX);
    assert_same_ids(&found, &[EntityId(3), EntityId(4)]);
    tracker.release_results(found);

    let capped = tracker.candidates_in_radius_pooled(at(10.5, 10.5), 2.0, EntityId(1), 1);
    assert_eq!(capped.len(), 1);
    tracker.release_results(capped);
}

#[rstest]
fn eager_allocation_creates_the_region(tracker: EntityTracker) {
    assert_eq!(tracker.grid().cell_count(), 2500);
    assert!(tracker.grid().cell(CellCoord::new(49, 49)).is_some());
    assert!(tracker.grid().cell(CellCoord::new(50, 0)).is_none());
}

#[rstest]
fn lazy_allocation_creates_cells_on_first_touch(mut lazy: EntityTracker) {
    assert_eq!(lazy.grid().cell_count(), 0);
    lazy.register(Some(&sample(1, EntityType::Beetle, -7.5, 12.5)));
    let coord = CellCoord::new(-8, 12);
    assert_eq!(lazy.grid().cell(coord).map(|info| info.coord), Some(coord));
    assert_eq!(lazy.grid().cell_count(), 1);
}

#[rstest]
fn deleting_a_region_forgets_evicted_entities(mut tracker: EntityTracker) {
    tracker.register(Some(&sample(1, EntityType::Beetle, 0.5, 0.5)));
    tracker.register(Some(&sample(2, EntityType::Beetle, 1.5, 1.5)));
    tracker.register(Some(&sample(3, EntityType::Beetle, 8.5, 8.5)));
    let log = EventLog::attach(&mut tracker);

    let deleted = tracker.delete_region(CellCoord::new(0, 0), CellCoord::new(1, 1));
    assert_eq!(deleted, 4);
    assert_eq!(log.count(GridEventKind::Unregistered), 2);
    assert!(!tracker.is_known(EntityId(1)));
    assert!(!tracker.is_known(EntityId(2)));
    assert!(tracker.is_known(EntityId(3)));
    assert_eq!(tracker.grid().verify_consistency(), Ok(()));
    let pool = tracker.pool_stats();
    assert_eq!(pool.allocated, 1);
    assert_eq!(pool.reused, 0);
}

#[rstest]
fn nearest_uses_last_synced_positions(mut tracker: EntityTracker) {
    tracker.register(Some(&sample(1, EntityType::Aphid, 20.5, 20.5)));
    tracker.register(Some(&sample(2, EntityType::Aphid, 23.5, 20.5)));
    let nearest = tracker.nearest_entity(at(22.9, 20.5), |occupant| {
        occupant.entity_type == EntityType::Aphid
    });
    assert_eq!(nearest, Some(EntityId(2)));
    assert!(tracker.any_entity_of_type_in_radius(at(22.9, 20.5), 1.0, EntityType::Aphid));
    assert!(!tracker.any_entity_of_type_in_radius(at(22.9, 20.5), 1.0, EntityType::Ladybug));
}

#[rstest]
fn detached_observers_hear_nothing_more(mut tracker: EntityTracker) {
    let mut log = EventLog::attach(&mut tracker);
    tracker.register(Some(&sample(1, EntityType::Beetle, 0.5, 0.5)));
    tracker.update_position(Some(&sample(1, EntityType::Beetle, 3.5, 0.5)));
    let kinds: Vec<GridEventKind> = log.events().iter().map(|event| event.kind()).collect();
    assert_eq!(kinds, vec![GridEventKind::Registered, GridEventKind::Moved]);

    log.detach(&mut tracker);
    tracker.unregister_id(EntityId(1));
    assert_eq!(log.len(), 2);
    assert_eq!(tracker.grid().subscriber_count(), 0);
}
