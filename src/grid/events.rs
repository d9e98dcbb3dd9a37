//! Change notifications raised by the grid.
//!
//! Observers are kept in one list per event kind and invoked synchronously,
//! in subscription order, before the mutating call returns. A callback only
//! sees the event, never the grid, so it cannot mutate the index mid-dispatch.

use std::fmt;

use glam::Vec3;

use super::CellCoord;
use crate::entity::{EntityId, EntityType, GridEntity};

/// The grid's record of a registered entity as of its last sync.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Occupant {
    /// Entity identifier.
    pub id: EntityId,
    /// Category tag.
    pub entity_type: EntityType,
    /// Position reported at the last register or move.
    pub position: Vec3,
}

impl Occupant {
    /// Samples an entity.
    #[must_use]
    pub fn of<E: GridEntity + ?Sized>(entity: &E) -> Self {
        Self {
            id: entity.id(),
            entity_type: entity.entity_type(),
            position: entity.world_position(),
        }
    }
}

/// Discriminant of [`GridEvent`], used to pick an observer list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridEventKind {
    /// See [`GridEvent::Registered`].
    Registered,
    /// See [`GridEvent::Moved`].
    Moved,
    /// See [`GridEvent::Unregistered`].
    Unregistered,
}

/// A change to the entity index.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridEvent {
    /// An entity entered the index.
    Registered {
        /// Cell the entity now occupies.
        cell: CellCoord,
        /// The entity.
        occupant: Occupant,
    },
    /// An entity crossed a cell boundary.
    Moved {
        /// Previous cell.
        from: CellCoord,
        /// New cell.
        to: CellCoord,
        /// The entity after the move.
        occupant: Occupant,
    },
    /// An entity left the index.
    Unregistered {
        /// Cell the entity occupied.
        cell: CellCoord,
        /// The entity as last synced.
        occupant: Occupant,
    },
}

impl GridEvent {
    /// The entity the event concerns.
    #[must_use]
    pub const fn occupant(&self) -> &Occupant {
        match self {
            Self::Registered { occupant, .. }
            | Self::Moved { occupant, .. }
            | Self::Unregistered { occupant, .. } => occupant,
        }
    }

    /// Which observer list receives this event.
    #[must_use]
    pub const fn kind(&self) -> GridEventKind {
        match self {
            Self::Registered { .. } => GridEventKind::Registered,
            Self::Moved { .. } => GridEventKind::Moved,
            Self::Unregistered { .. } => GridEventKind::Unregistered,
        }
    }
}

/// Observer callback.
pub type GridCallback = Box<dyn FnMut(&GridEvent)>;

/// Handle returned by a subscription, used to unsubscribe.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub(crate) struct Observers {
    next_id: u64,
    registered: Vec<(SubscriptionId, GridCallback)>,
    moved: Vec<(SubscriptionId, GridCallback)>,
    unregistered: Vec<(SubscriptionId, GridCallback)>,
}

impl Observers {
    fn list_mut(&mut self, kind: GridEventKind) -> &mut Vec<(SubscriptionId, GridCallback)> {
        match kind {
            GridEventKind::Registered => &mut self.registered,
            GridEventKind::Moved => &mut self.moved,
            GridEventKind::Unregistered => &mut self.unregistered,
        }
    }

    pub(crate) fn subscribe(&mut self, kind: GridEventKind, callback: GridCallback) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.list_mut(kind).push((id, callback));
        id
    }

    pub(crate) fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        for list in [&mut self.registered, &mut self.moved, &mut self.unregistered] {
            if let Some(index) = list.iter().position(|(entry, _)| *entry == id) {
                list.remove(index);
                return true;
            }
        }
        false
    }

    pub(crate) fn dispatch(&mut self, event: &GridEvent) {
        for (_, callback) in self.list_mut(event.kind()).iter_mut() {
            callback(event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.registered.len() + self.moved.len() + self.unregistered.len()
    }
}

impl fmt::Debug for Observers {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Observers")
            .field("registered", &self.registered.len())
            .field("moved", &self.moved.len())
            .field("unregistered", &self.unregistered.len())
            .finish()
    }
}
