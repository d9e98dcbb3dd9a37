//! Sightings buffered between grid notifications and the agent's tick.

use std::cell::RefCell;
use std::rc::Rc;

use crate::entity::EntityId;
use crate::grid::Occupant;

/// What the agent learned from one grid notification.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sighting {
    /// A candidate registered or changed cell.
    Seen(Occupant),
    /// An entity left the grid.
    Lost(EntityId),
}

/// Queue filled synchronously by grid callbacks and drained once per tick.
#[derive(Debug, Default)]
pub struct SightingInbox {
    sightings: Vec<Sighting>,
}

/// Inbox shared between the agent and its grid subscriptions.
pub type SharedInbox = Rc<RefCell<SightingInbox>>;

impl SightingInbox {
    /// Queues one sighting.
    pub fn push(&mut self, sighting: Sighting) {
        self.sightings.push(sighting);
    }

    /// Moves every queued sighting onto the end of `out`.
    pub fn drain_into(&mut self, out: &mut Vec<Sighting>) {
        out.append(&mut self.sightings);
    }

    /// Discards everything queued.
    pub fn clear(&mut self) {
        self.sightings.clear();
    }

    /// Whether nothing is queued.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sightings.is_empty()
    }

    /// Number of queued sightings.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sightings.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntityType;
    use glam::Vec3;
    use rstest::rstest;

    fn seen(id: u64) -> Sighting {
        Sighting::Seen(Occupant {
            id: EntityId(id),
            entity_type: EntityType::Beetle,
            position: Vec3::ZERO,
        })
    }

    #[rstest]
    fn drain_preserves_order_and_empties() {
        let mut inbox = SightingInbox::default();
        inbox.push(seen(1));
        inbox.push(Sighting::Lost(EntityId(1)));
        let mut out = vec![seen(9)];
        inbox.drain_into(&mut out);
        assert_eq!(out, vec![seen(9), seen(1), Sighting::Lost(EntityId(1))]);
        assert!(inbox.is_empty());
    }
}
