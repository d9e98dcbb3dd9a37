//! Facade over the spatial grid.
//!
//! [`EntityTracker`] owns the only [`SpatialGrid`] and is the sole writer of
//! its index. It keeps a table of every entity it has seen, lays out static
//! cells, pools query buffers, and counts traffic for periodic reports.

use std::fmt;

use glam::Vec3;
use hashbrown::HashMap;
use log::{debug, error, info, warn};

use crate::config::{CellAllocation, ConfigError, GridConfig};
use crate::entity::{EntityId, EntityType, GridEntity};
use crate::grid::{CellCoord, GridEvent, GridGeometry, Occupant, SpatialGrid, SubscriptionId};
use crate::pool::{PoolStats, QueryResultPool};

/// Static payload stored for each tracker cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CellInfo {
    /// Coordinate the payload describes.
    pub coord: CellCoord,
}

/// Traffic counters since the last reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TrackerStats {
    /// Successful registrations.
    pub registrations: u64,
    /// Successful unregistrations.
    pub unregistrations: u64,
    /// Position updates for known entities.
    pub position_updates: u64,
    /// Unknown entities registered by a position update.
    pub auto_registrations: u64,
    /// Queries served from the buffer pool.
    pub pooled_queries: u64,
}

impl fmt::Display for TrackerStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "registrations={} unregistrations={} position_updates={} auto_registrations={} pooled_queries={}",
            self.registrations,
            self.unregistrations,
            self.position_updates,
            self.auto_registrations,
            self.pooled_queries
        )
    }
}

/// Owner of the spatial grid and entry point for every grid mutation.
#[derive(Debug)]
pub struct EntityTracker {
    grid: SpatialGrid<CellInfo>,
    known: HashMap<EntityId, EntityType>,
    pool: QueryResultPool<EntityId>,
    stats: TrackerStats,
}

impl EntityTracker {
    /// Builds a tracker and lays out cells per `config.allocation`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when the grid geometry is invalid.
    pub fn new(config: &GridConfig) -> Result<Self, ConfigError> {
        config.validate()?;
        let geometry = GridGeometry::new(config.cell_size, config.offset)?;
        let grid = match config.allocation {
            CellAllocation::Lazy => {
                SpatialGrid::with_cell_factory(geometry, |coord| CellInfo { coord })
            }
            CellAllocation::Eager { .. } => SpatialGrid::new(geometry),
        }
        .with_nearest_max_radius(config.nearest_max_radius);
        let mut tracker = Self {
            grid,
            known: HashMap::new(),
            pool: QueryResultPool::default(),
            stats: TrackerStats::default(),
        };
        if let CellAllocation::Eager { columns, rows } = config.allocation {
            tracker.create_region(columns, rows);
            info!(
                "entity tracker initialised with {columns}x{rows} cells of size {}",
                config.cell_size
            );
        } else {
            info!(
                "entity tracker initialised with lazy cells of size {}",
                config.cell_size
            );
        }
        Ok(tracker)
    }

    fn create_region(&mut self, columns: u32, rows: u32) {
        let column_end = i32::try_from(columns).unwrap_or(i32::MAX);
        let row_end = i32::try_from(rows).unwrap_or(i32::MAX);
        for column in 0..column_end {
            for row in 0..row_end {
                let coord = CellCoord::new(column, row);
                self.grid.add_cell(coord, CellInfo { coord });
            }
        }
    }

    /// Read access to the grid for queries.
    #[must_use]
    pub const fn grid(&self) -> &SpatialGrid<CellInfo> {
        &self.grid
    }

    /// Registers `entity`. A missing entity is logged and skipped.
    pub fn register<E: GridEntity + ?Sized>(&mut self, candidate: Option<&E>) {
        let Some(entity) = candidate else {
            error!("attempted to register a missing entity with the tracker");
            return;
        };
        self.known.insert(entity.id(), entity.entity_type());
        self.grid.register(entity);
        self.stats.registrations += 1;
    }

    /// Unregisters `entity`. A missing entity is logged and skipped.
    pub fn unregister<E: GridEntity + ?Sized>(&mut self, candidate: Option<&E>) {
        let Some(entity) = candidate else {
            error!("attempted to unregister a missing entity from the tracker");
            return;
        };
        self.unregister_id(entity.id());
    }

    /// Unregisters by identifier. Unknown identifiers are ignored.
    pub fn unregister_id(&mut self, id: EntityId) -> Option<Occupant> {
        self.known.remove(&id);
        let removed = self.grid.unregister(id);
        if removed.is_some() {
            self.stats.unregistrations += 1;
        } else {
            debug!("{id} was not registered; nothing to unregister");
        }
        removed
    }

    /// Resyncs `entity` with its reported position.
    ///
    /// Entities the tracker has not seen are registered instead.
    pub fn update_position<E: GridEntity + ?Sized>(&mut self, candidate: Option<&E>) {
        let Some(entity) = candidate else {
            error!("attempted to update a missing entity");
            return;
        };
        if !self.known.contains_key(&entity.id()) {
            warn!(
                "{} ({}) updated before registration; registering it",
                entity.id(),
                entity.entity_type()
            );
            self.stats.auto_registrations += 1;
            self.register(Some(entity));
            return;
        }
        self.grid.move_entity(entity);
        self.stats.position_updates += 1;
    }

    /// Whether the tracker knows `id`.
    #[must_use]
    pub fn is_known(&self, id: EntityId) -> bool {
        self.known.contains_key(&id)
    }

    /// Category recorded for `id`.
    #[must_use]
    pub fn entity_type_of(&self, id: EntityId) -> Option<EntityType> {
        self.known.get(&id).copied()
    }

    /// Number of entities the tracker knows.
    #[must_use]
    pub fn known_count(&self) -> usize {
        self.known.len()
    }

    /// Last synced position of `id`.
    #[must_use]
    pub fn position_of(&self, id: EntityId) -> Option<Vec3> {
        self.grid.occupant(id).map(|occupant| occupant.position)
    }

    /// Cell containing `world`.
    #[must_use]
    pub fn to_cell(&self, world: Vec3) -> CellCoord {
        self.grid.to_cell(world)
    }

    /// Centre of `cell` in world space.
    #[must_use]
    pub fn to_world(&self, cell: CellCoord) -> Vec3 {
        self.grid.to_world(cell)
    }

    /// Deletes every static cell in the inclusive rectangle `min..=max`.
    ///
    /// Entities still inside are evicted with the usual notifications and
    /// forgotten by the tracker. Returns the number of cells deleted.
    pub fn delete_region(&mut self, min: CellCoord, max: CellCoord) -> usize {
        let mut deleted = 0;
        let mut evicted = self.pool.acquire();
        for column in min.column..=max.column {
            for row in min.row..=max.row {
                let coord = CellCoord::new(column, row);
                evicted.clear();
                self.grid.entities_in_cell(coord, &mut evicted);
                if self.grid.delete_cell(coord).is_some() {
                    deleted += 1;
                    for id in evicted.drain(..) {
                        self.known.remove(&id);
                        self.stats.unregistrations += 1;
                    }
                }
            }
        }
        self.pool.release(evicted);
        deleted
    }

    /// Hands out a pooled buffer.
    pub fn acquire_buffer(&mut self) -> Vec<EntityId> {
        self.pool.acquire()
    }

    /// Returns a buffer obtained from any pooled query.
    pub fn release_results(&mut self, buffer: Vec<EntityId>) {
        self.pool.release(buffer);
    }

    /// Entities in the cells covering `radius` around `world`, in a pooled
    /// buffer the caller must hand back through
    /// [`EntityTracker::release_results`].
    pub fn entities_in_radius_pooled(&mut self, world: Vec3, radius: f32) -> Vec<EntityId> {
        let mut buffer = self.pool.acquire();
        self.grid.entities_in_radius(world, radius, &mut buffer);
        self.stats.pooled_queries += 1;
        buffer
    }

    /// As [`EntityTracker::entities_in_radius_pooled`], keeping only
    /// `entity_type`.
    pub fn entities_of_type_in_radius_pooled(
        &mut self,
        world: Vec3,
        radius: f32,
        entity_type: EntityType,
    ) -> Vec<EntityId> {
        let mut buffer = self.pool.acquire();
        self.grid
            .entities_of_type_in_radius(world, radius, entity_type, &mut buffer);
        self.stats.pooled_queries += 1;
        buffer
    }

    /// Up to `limit` candidate-category entities other than `exclude`, in a
    /// pooled buffer.
    pub fn candidates_in_radius_pooled(
        &mut self,
        world: Vec3,
        radius: f32,
        exclude: EntityId,
        limit: usize,
    ) -> Vec<EntityId> {
        let mut buffer = self.pool.acquire();
        self.grid.entities_in_radius_where(
            world,
            radius,
            |occupant| occupant.id != exclude && occupant.entity_type.is_candidate(),
            limit,
            &mut buffer,
        );
        self.stats.pooled_queries += 1;
        buffer
    }

    /// Whether any entity of `entity_type` lies within `radius` of `world`.
    #[must_use]
    pub fn any_entity_of_type_in_radius(
        &self,
        world: Vec3,
        radius: f32,
        entity_type: EntityType,
    ) -> bool {
        self.grid
            .any_entity_of_type_in_radius(world, radius, entity_type)
    }

    /// Closest entity accepted by `predicate`; see
    /// [`SpatialGrid::nearest_entity`].
    pub fn nearest_entity(
        &self,
        world: Vec3,
        predicate: impl FnMut(&Occupant) -> bool,
    ) -> Option<EntityId> {
        self.grid.nearest_entity(world, predicate)
    }

    /// Subscribes to registrations.
    pub fn on_registered(&mut self, callback: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.grid.on_registered(callback)
    }

    /// Subscribes to cell changes.
    pub fn on_moved(&mut self, callback: impl FnMut(&GridEvent) + 'static) -> SubscriptionId {
        self.grid.on_moved(callback)
    }

    /// Subscribes to unregistrations.
    pub fn on_unregistered(
        &mut self,
        callback: impl FnMut(&GridEvent) + 'static,
    ) -> SubscriptionId {
        self.grid.on_unregistered(callback)
    }

    /// Removes a subscription.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        self.grid.unsubscribe(id)
    }

    /// Counters since the last reset.
    #[must_use]
    pub const fn stats(&self) -> TrackerStats {
        self.stats
    }

    /// Buffer pool counters.
    #[must_use]
    pub const fn pool_stats(&self) -> PoolStats {
        self.pool.stats()
    }

    /// Returns the counters and resets them.
    pub fn take_stats(&mut self) -> TrackerStats {
        std::mem::take(&mut self.stats)
    }

    /// Logs and resets the counters.
    pub fn log_stats(&mut self) {
        let stats = self.take_stats();
        info!(
            "tracker: {stats} entities={} active_cells={}",
            self.grid.len(),
            self.grid.active_cell_count()
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::EntitySample;
    use rstest::rstest;

    #[rstest]
    fn eager_allocation_creates_bounded_region() {
        let config = GridConfig {
            allocation: CellAllocation::Eager {
                columns: 4,
                rows: 3,
            },
            ..GridConfig::default()
        };
        let tracker = EntityTracker::new(&config).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(tracker.grid().cell_count(), 12);
        assert!(tracker.grid().cell(CellCoord::new(3, 2)).is_some());
        assert!(tracker.grid().cell(CellCoord::new(4, 0)).is_none());
    }

    #[rstest]
    fn lazy_allocation_creates_cells_on_touch() {
        let config = GridConfig {
            allocation: CellAllocation::Lazy,
            ..GridConfig::default()
        };
        let mut tracker = EntityTracker::new(&config).unwrap_or_else(|err| panic!("{err}"));
        assert_eq!(tracker.grid().cell_count(), 0);
        let sample = EntitySample::new(EntityId(1), EntityType::Beetle, Vec3::new(-7.5, 0.0, 2.5));
        tracker.register(Some(&sample));
        let coord = CellCoord::new(-8, 2);
        assert_eq!(tracker.grid().cell(coord), Some(&CellInfo { coord }));
    }

    #[rstest]
    fn missing_entity_is_skipped() {
        let mut tracker =
            EntityTracker::new(&GridConfig::default()).unwrap_or_else(|err| panic!("{err}"));
        tracker.register::<EntitySample>(None);
        tracker.update_position::<EntitySample>(None);
        tracker.unregister::<EntitySample>(None);
        assert_eq!(tracker.stats(), TrackerStats::default());
        assert!(tracker.grid().is_empty());
    }
}
