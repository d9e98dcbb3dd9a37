//! Fixtures and recorders shared by the integration tests.

pub mod fixtures;
pub mod recorder;

pub use fixtures::{at, sample, tracker, tracker_with};
pub use recorder::EventLog;

use warden::EntityId;

/// Assert that `actual` and `expected` hold the same ids in any order.
///
/// # Panics
/// Panics with both sorted lists if they differ.
///
/// # Examples
/// ```
/// use test_utils::assert_same_ids;
/// use warden::EntityId;
/// assert_same_ids(&[EntityId(2), EntityId(1)], &[EntityId(1), EntityId(2)]);
/// ```
pub fn assert_same_ids(actual: &[EntityId], expected: &[EntityId]) {
    let mut left = actual.to_vec();
    let mut right = expected.to_vec();
    left.sort();
    right.sort();
    assert_eq!(left, right, "entity ids differ");
}
