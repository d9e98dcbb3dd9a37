//! Uniform spatial partition over the X/Z plane.
//!
//! [`SpatialGrid`] keeps two indices that always agree: entity → cell and
//! cell → entities. Static cell payloads are optional and independent of
//! occupancy. A coordinate is *active* while it holds a payload or at least one
//! entity; neighbourhood queries skip inactive coordinates before touching the
//! per-cell lists.
//!
//! ```
//! use glam::Vec3;
//! use warden::grid::{GridGeometry, SpatialGrid};
//! use warden::{CellCoord, EntityId, EntitySample, EntityType};
//!
//! let mut grid: SpatialGrid<()> = SpatialGrid::new(GridGeometry::default());
//! let beetle = EntitySample::new(EntityId(1), EntityType::Beetle, Vec3::new(0.5, 0.0, 0.5));
//! grid.register(&beetle);
//! assert_eq!(grid.cell_of(EntityId(1)), Some(CellCoord::new(0, 0)));
//!
//! let mut near = Vec::new();
//! grid.entities_in_radius(Vec3::ZERO, 1.0, &mut near);
//! assert_eq!(near, vec![EntityId(1)]);
//! ```

mod coord;
mod events;
mod offsets;
mod queries;

use std::fmt;

use glam::Vec3;
use hashbrown::{HashMap, HashSet};
use log::{debug, warn};
use thiserror::Error;

pub use coord::{CellCoord, GridGeometry};
pub use events::{GridCallback, GridEvent, GridEventKind, Occupant, SubscriptionId};
pub use offsets::RadiusOffsetCache;

use crate::constants::DEFAULT_NEAREST_MAX_RADIUS;
use crate::entity::{EntityId, GridEntity};
use events::Observers;

/// Builds a static payload for a coordinate touched for the first time.
pub type CellFactory<C> = Box<dyn Fn(CellCoord) -> C>;

/// A disagreement between the grid's indices.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GridInconsistency {
    /// The reverse index names a cell whose list lacks the entity.
    #[error("{entity} is indexed at {cell} but missing from that cell's list")]
    MissingFromCell {
        /// Entity in question.
        entity: EntityId,
        /// Cell recorded in the reverse index.
        cell: CellCoord,
    },
    /// A cell list holds an entity whose reverse index disagrees.
    #[error("{entity} is listed in {cell} but indexed elsewhere or not at all")]
    StrayInCell {
        /// Entity in question.
        entity: EntityId,
        /// Cell whose list holds it.
        cell: CellCoord,
    },
    /// An entity appears more than once across the cell lists.
    #[error("{entity} is listed more than once")]
    Duplicate {
        /// Entity in question.
        entity: EntityId,
    },
    /// The active set disagrees with payloads and occupancy.
    #[error("{cell} has the wrong active state")]
    ActiveMismatch {
        /// Coordinate in question.
        cell: CellCoord,
    },
}

#[derive(Debug, Clone, Copy, PartialEq)]
struct Placement {
    cell: CellCoord,
    occupant: Occupant,
}

/// Cell-indexed registry of entities with optional static cell payloads `C`.
///
/// The grid never owns entity state. It stores each entity's cell and the
/// position it last reported, and raises [`GridEvent`]s as the index changes.
pub struct SpatialGrid<C> {
    geometry: GridGeometry,
    cells: HashMap<CellCoord, C>,
    occupants: HashMap<CellCoord, Vec<EntityId>>,
    placements: HashMap<EntityId, Placement>,
    active: HashSet<CellCoord>,
    offsets: RadiusOffsetCache,
    observers: Observers,
    cell_factory: Option<CellFactory<C>>,
    nearest_max_radius: f32,
}

impl<C> SpatialGrid<C> {
    /// Creates an empty grid whose cells are added explicitly.
    #[must_use]
    pub fn new(geometry: GridGeometry) -> Self {
        Self {
            geometry,
            cells: HashMap::new(),
            occupants: HashMap::new(),
            placements: HashMap::new(),
            active: HashSet::new(),
            offsets: RadiusOffsetCache::default(),
            observers: Observers::default(),
            cell_factory: None,
            nearest_max_radius: DEFAULT_NEAREST_MAX_RADIUS,
        }
    }

    /// Creates an empty grid that builds payloads on first touch.
    #[must_use]
    pub fn with_cell_factory(
        geometry: GridGeometry,
        factory: impl Fn(CellCoord) -> C + 'static,
    ) -> Self {
        let mut grid = Self::new(geometry);
        grid.cell_factory = Some(Box::new(factory));
        grid
    }

    /// Sets the largest ring radius tried by [`SpatialGrid::nearest_entity`].
    #[must_use]
    pub fn with_nearest_max_radius(mut self, radius: f32) -> Self {
        self.nearest_max_radius = radius;
        self
    }

    /// World-to-cell mapping in use.
    #[must_use]
    pub const fn geometry(&self) -> &GridGeometry {
        &self.geometry
    }

    /// Cell containing `world`.
    #[must_use]
    pub fn to_cell(&self, world: Vec3) -> CellCoord {
        self.geometry.to_cell(world)
    }

    /// Centre of `cell` in world space.
    #[must_use]
    pub fn to_world(&self, cell: CellCoord) -> Vec3 {
        self.geometry.to_world(cell)
    }

    /// Inserts or replaces the static payload at `coord`.
    ///
    /// Returns the replaced payload, if any.
    pub fn add_cell(&mut self, coord: CellCoord, payload: C) -> Option<C> {
        let previous = self.cells.insert(coord, payload);
        if previous.is_some() {
            warn!("replacing existing cell payload at {coord}");
        }
        self.occupants.entry(coord).or_default();
        self.active.insert(coord);
        previous
    }

    /// Removes the static payload at `coord`.
    ///
    /// Entities still registered there are evicted first, each with its own
    /// [`GridEvent::Unregistered`].
    pub fn delete_cell(&mut self, coord: CellCoord) -> Option<C> {
        if !self.cells.contains_key(&coord) {
            return None;
        }
        let evicted = self.occupants.get(&coord).cloned().unwrap_or_default();
        if !evicted.is_empty() {
            warn!(
                "deleting cell {coord} with {} registered entities; evicting them",
                evicted.len()
            );
        }
        for id in evicted {
            self.unregister(id);
        }
        let payload = self.cells.remove(&coord);
        if self.occupants.get(&coord).is_some_and(Vec::is_empty) {
            self.occupants.remove(&coord);
        }
        if !self.occupants.contains_key(&coord) {
            self.active.remove(&coord);
        }
        payload
    }

    /// Static payload at `coord`.
    #[must_use]
    pub fn cell(&self, coord: CellCoord) -> Option<&C> {
        self.cells.get(&coord)
    }

    /// Number of static payloads.
    #[must_use]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    /// Number of coordinates holding a payload or an entity.
    #[must_use]
    pub fn active_cell_count(&self) -> usize {
        self.active.len()
    }

    /// Whether `coord` holds a payload or an entity.
    #[must_use]
    pub fn is_active(&self, coord: CellCoord) -> bool {
        self.active.contains(&coord)
    }

    /// Number of registered entities.
    #[must_use]
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Whether no entity is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Whether `id` is registered.
    #[must_use]
    pub fn contains(&self, id: EntityId) -> bool {
        self.placements.contains_key(&id)
    }

    /// Cell currently recorded for `id`.
    #[must_use]
    pub fn cell_of(&self, id: EntityId) -> Option<CellCoord> {
        self.placements.get(&id).map(|placement| placement.cell)
    }

    /// Last synced record for `id`.
    #[must_use]
    pub fn occupant(&self, id: EntityId) -> Option<Occupant> {
        self.placements.get(&id).map(|placement| placement.occupant)
    }

    /// Adds `entity` to the index and raises [`GridEvent::Registered`].
    ///
    /// Registering an entity that is already indexed resyncs it as
    /// [`SpatialGrid::move_entity`] would.
    pub fn register<E: GridEntity + ?Sized>(&mut self, entity: &E) {
        let occupant = Occupant::of(entity);
        if self.placements.contains_key(&occupant.id) {
            debug!("{} already registered; treating as a move", occupant.id);
            self.move_entity(entity);
            return;
        }
        let cell = self.geometry.to_cell(occupant.position);
        self.ensure_cell(cell);
        self.insert_into_cell(cell, occupant.id);
        self.placements.insert(occupant.id, Placement { cell, occupant });
        self.observers
            .dispatch(&GridEvent::Registered { cell, occupant });
    }

    /// Removes `id` from the index and raises [`GridEvent::Unregistered`].
    ///
    /// Returns the entity's last synced record, or `None` when it was not
    /// registered.
    pub fn unregister(&mut self, id: EntityId) -> Option<Occupant> {
        let placement = self.placements.remove(&id)?;
        self.remove_from_cell(placement.cell, id);
        self.observers.dispatch(&GridEvent::Unregistered {
            cell: placement.cell,
            occupant: placement.occupant,
        });
        Some(placement.occupant)
    }

    /// Resyncs `entity` with its reported position.
    ///
    /// Staying inside the same cell only refreshes the stored position and
    /// raises nothing. Crossing a boundary relocates the entity and raises
    /// [`GridEvent::Moved`]. Unknown entities are registered.
    pub fn move_entity<E: GridEntity + ?Sized>(&mut self, entity: &E) {
        let occupant = Occupant::of(entity);
        let target = self.geometry.to_cell(occupant.position);
        let Some(placement) = self.placements.get_mut(&occupant.id) else {
            self.register(entity);
            return;
        };
        placement.occupant = occupant;
        if placement.cell == target {
            return;
        }
        let from = placement.cell;
        placement.cell = target;
        self.remove_from_cell(from, occupant.id);
        self.ensure_cell(target);
        self.insert_into_cell(target, occupant.id);
        self.observers.dispatch(&GridEvent::Moved {
            from,
            to: target,
            occupant,
        });
    }

    /// Subscribes to [`GridEvent::Registered`].
    pub fn on_registered(&mut self, callback: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.observers
            .subscribe(GridEventKind::Registered, Box::new(callback))
    }

    /// Subscribes to [`GridEvent::Moved`].
    pub fn on_moved(&mut self, callback: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.observers
            .subscribe(GridEventKind::Moved, Box::new(callback))
    }

    /// Subscribes to [`GridEvent::Unregistered`].
    pub fn on_unregistered(
        &mut self,
        callback: impl FnMut(&GridEvent) + 'static,
    ) -> SubscriptionId {
        self.observers
            .subscribe(GridEventKind::Unregistered, Box::new(callback))
    }

    /// Removes a subscription. Returns `false` for unknown handles.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Number of live subscriptions across all event kinds.
    #[must_use]
    pub fn subscriber_count(&self) -> usize {
        self.observers.len()
    }

    /// Checks that both indices and the active set agree.
    ///
    /// # Errors
    /// Returns the first [`GridInconsistency`] found.
    pub fn verify_consistency(&self) -> Result<(), GridInconsistency> {
        let mut seen = HashSet::with_capacity(self.placements.len());
        for (&cell, ids) in &self.occupants {
            for &entity in ids {
                if !seen.insert(entity) {
                    return Err(GridInconsistency::Duplicate { entity });
                }
                if self.cell_of(entity) != Some(cell) {
                    return Err(GridInconsistency::StrayInCell { entity, cell });
                }
            }
        }
        for (&entity, placement) in &self.placements {
            if !seen.contains(&entity) {
                return Err(GridInconsistency::MissingFromCell {
                    entity,
                    cell: placement.cell,
                });
            }
        }
        for (&cell, ids) in &self.occupants {
            let should_be_active = !ids.is_empty() || self.cells.contains_key(&cell);
            if should_be_active != self.active.contains(&cell) {
                return Err(GridInconsistency::ActiveMismatch { cell });
            }
        }
        for &cell in &self.active {
            if !self.occupants.contains_key(&cell) && !self.cells.contains_key(&cell) {
                return Err(GridInconsistency::ActiveMismatch { cell });
            }
        }
        Ok(())
    }

    fn ensure_cell(&mut self, cell: CellCoord) {
        if let Some(factory) = &self.cell_factory {
            if !self.cells.contains_key(&cell) {
                debug!("creating cell {cell} on first touch");
                self.cells.insert(cell, factory(cell));
            }
        }
    }

    fn insert_into_cell(&mut self, cell: CellCoord, id: EntityId) {
        self.occupants.entry(cell).or_default().push(id);
        self.active.insert(cell);
    }

    fn remove_from_cell(&mut self, cell: CellCoord, id: EntityId) {
        let Some(ids) = self.occupants.get_mut(&cell) else {
            return;
        };
        if let Some(index) = ids.iter().position(|entry| *entry == id) {
            ids.swap_remove(index);
        }
        if ids.is_empty() && !self.cells.contains_key(&cell) {
            self.occupants.remove(&cell);
            self.active.remove(&cell);
        }
    }
}

impl<C: fmt::Debug> fmt::Debug for SpatialGrid<C> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpatialGrid")
            .field("geometry", &self.geometry)
            .field("cells", &self.cells.len())
            .field("entities", &self.placements.len())
            .field("active", &self.active.len())
            .field("observers", &self.observers)
            .field("lazy", &self.cell_factory.is_some())
            .finish_non_exhaustive()
    }
}
