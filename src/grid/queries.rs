//! Neighbourhood queries.
//!
//! Radius queries cover the square of cells around the centre cell, so they
//! over-approximate a circle. Callers needing exact containment filter by
//! distance themselves. The `_into` style appends to a caller-owned buffer so
//! pooled vectors can be reused across frames.

use glam::Vec3;

use super::{CellCoord, Occupant, SpatialGrid};
use crate::entity::{EntityId, EntityType};
use crate::vector_math::planar_distance_squared;

impl<C> SpatialGrid<C> {
    /// Calls `visit` for every occupant within `radius` cells of `center`.
    ///
    /// Stops early and returns `false` as soon as `visit` returns `false`.
    fn visit_cell_radius(
        &self,
        center: CellCoord,
        radius: u32,
        mut visit: impl FnMut(&Occupant) -> bool,
    ) -> bool {
        let side = u64::from(radius) * 2 + 1;
        let active = u64::try_from(self.active.len()).unwrap_or(u64::MAX);
        if side.saturating_mul(side) > active {
            // Fewer active cells than offsets: walk the active set instead.
            for &cell in &self.active {
                if cell.chebyshev(center) <= radius && !self.visit_cell(cell, &mut visit) {
                    return false;
                }
            }
            return true;
        }
        let offsets = self.offsets.offsets(radius);
        for &offset in offsets.iter() {
            let Some(cell) = center.checked_offset(offset) else {
                continue;
            };
            if !self.active.contains(&cell) {
                continue;
            }
            if !self.visit_cell(cell, &mut visit) {
                return false;
            }
        }
        true
    }

    fn visit_cell(&self, cell: CellCoord, visit: &mut impl FnMut(&Occupant) -> bool) -> bool {
        let Some(ids) = self.occupants.get(&cell) else {
            return true;
        };
        for id in ids {
            if let Some(placement) = self.placements.get(id) {
                if !visit(&placement.occupant) {
                    return false;
                }
            }
        }
        true
    }

    /// Appends the entities indexed at `coord` to `out`.
    pub fn entities_in_cell(&self, coord: CellCoord, out: &mut Vec<EntityId>) {
        if let Some(ids) = self.occupants.get(&coord) {
            out.extend_from_slice(ids);
        }
    }

    /// Appends every entity within `radius` cells of `center` to `out`.
    pub fn entities_in_cell_radius(&self, center: CellCoord, radius: u32, out: &mut Vec<EntityId>) {
        self.visit_cell_radius(center, radius, |occupant| {
            out.push(occupant.id);
            true
        });
    }

    /// Appends every entity in the cells covering `world_radius` around
    /// `world` to `out`.
    pub fn entities_in_radius(&self, world: Vec3, world_radius: f32, out: &mut Vec<EntityId>) {
        let center = self.geometry.to_cell(world);
        let radius = self.geometry.cells_for_radius(world_radius);
        self.entities_in_cell_radius(center, radius, out);
    }

    /// As [`SpatialGrid::entities_in_radius`], keeping only `entity_type`.
    pub fn entities_of_type_in_radius(
        &self,
        world: Vec3,
        world_radius: f32,
        entity_type: EntityType,
        out: &mut Vec<EntityId>,
    ) {
        self.entities_in_radius_where(
            world,
            world_radius,
            |occupant| occupant.entity_type == entity_type,
            usize::MAX,
            out,
        );
    }

    /// Appends up to `limit` entities accepted by `filter` from the cells
    /// covering `world_radius` around `world`.
    pub fn entities_in_radius_where(
        &self,
        world: Vec3,
        world_radius: f32,
        mut filter: impl FnMut(&Occupant) -> bool,
        limit: usize,
        out: &mut Vec<EntityId>,
    ) {
        if limit == 0 {
            return;
        }
        let center = self.geometry.to_cell(world);
        let radius = self.geometry.cells_for_radius(world_radius);
        let mut taken = 0;
        self.visit_cell_radius(center, radius, |occupant| {
            if filter(occupant) {
                out.push(occupant.id);
                taken += 1;
            }
            taken < limit
        });
    }

    /// Whether any entity of `entity_type` lies in the cells covering
    /// `world_radius` around `world`.
    ///
    /// Returns on the first match without collecting anything.
    #[must_use]
    pub fn any_entity_of_type_in_radius(
        &self,
        world: Vec3,
        world_radius: f32,
        entity_type: EntityType,
    ) -> bool {
        let center = self.geometry.to_cell(world);
        let radius = self.geometry.cells_for_radius(world_radius);
        !self.visit_cell_radius(center, radius, |occupant| {
            occupant.entity_type != entity_type
        })
    }

    /// Closest entity accepted by `predicate`, searched in widening rings.
    ///
    /// Ring radii start at one cell width and the increment doubles after
    /// each empty ring (`cs`, `3cs`, `7cs`, ...), with the last ring clamped
    /// to the configured maximum. The closest match inside the first
    /// non-empty ring wins even if a closer one might sit just beyond it.
    pub fn nearest_entity(
        &self,
        world: Vec3,
        mut predicate: impl FnMut(&Occupant) -> bool,
    ) -> Option<EntityId> {
        let center = self.geometry.to_cell(world);
        let cell_size = self.geometry.cell_size();
        let max_radius = self.nearest_max_radius.max(cell_size);
        let mut radius = cell_size;
        let mut step = cell_size * 2.0;
        loop {
            let ring = radius.min(max_radius);
            let mut best: Option<(f32, EntityId)> = None;
            self.visit_cell_radius(center, self.geometry.cells_for_radius(ring), |occupant| {
                if predicate(occupant) {
                    let distance = planar_distance_squared(world, occupant.position);
                    if best.map_or(true, |(closest, _)| distance < closest) {
                        best = Some((distance, occupant.id));
                    }
                }
                true
            });
            if let Some((_, id)) = best {
                return Some(id);
            }
            if ring >= max_radius {
                return None;
            }
            radius += step;
            step *= 2.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::super::GridGeometry;
    use super::*;
    use crate::entity::EntitySample;
    use rstest::{fixture, rstest};

    #[fixture]
    fn grid() -> SpatialGrid<()> {
        SpatialGrid::new(GridGeometry::default())
    }

    fn sample(id: u64, entity_type: EntityType, x: f32, z: f32) -> EntitySample {
        EntitySample::new(EntityId(id), entity_type, Vec3::new(x, 0.0, z))
    }

    #[rstest]
    fn limit_caps_collection(mut grid: SpatialGrid<()>) {
        for id in 0..10 {
            grid.register(&sample(id, EntityType::Beetle, 0.5, 0.5));
        }
        let mut out = Vec::new();
        grid.entities_in_radius_where(Vec3::ZERO, 2.0, |_| true, 4, &mut out);
        assert_eq!(out.len(), 4);
    }

    #[rstest]
    fn sparse_and_dense_paths_agree(mut grid: SpatialGrid<()>) {
        grid.register(&sample(1, EntityType::Aphid, 0.5, 0.5));
        grid.register(&sample(2, EntityType::Aphid, 3.5, -2.5));
        grid.register(&sample(3, EntityType::Aphid, 9.5, 9.5));
        let mut wide = Vec::new();
        // Radius 4 has more offsets than active cells, so the active set is walked.
        grid.entities_in_cell_radius(CellCoord::new(0, 0), 4, &mut wide);
        wide.sort();
        assert_eq!(wide, vec![EntityId(1), EntityId(2)]);

        // Fill a distant block so active cells outnumber the radius-4 offsets.
        for column in 0..11_u8 {
            for row in 0..11_u8 {
                grid.register(&sample(
                    100 + u64::from(column) * 11 + u64::from(row),
                    EntityType::Flag,
                    f32::from(column) - 4.5,
                    f32::from(row) + 20.5,
                ));
            }
        }
        let mut dense = Vec::new();
        grid.entities_in_cell_radius(CellCoord::new(0, 0), 4, &mut dense);
        dense.sort();
        assert_eq!(dense, vec![EntityId(1), EntityId(2)]);
    }

    #[rstest]
    fn nearest_prefers_first_non_empty_ring(mut grid: SpatialGrid<()>) {
        grid.register(&sample(1, EntityType::Beetle, 2.5, 0.5));
        grid.register(&sample(2, EntityType::Beetle, 1.5, 0.5));
        grid.register(&sample(3, EntityType::Ladybug, 0.5, 0.5));
        let found = grid.nearest_entity(Vec3::new(0.5, 0.0, 0.5), |occupant| {
            occupant.entity_type == EntityType::Beetle
        });
        assert_eq!(found, Some(EntityId(2)));
    }

    #[rstest]
    fn nearest_gives_up_beyond_max_radius(grid: SpatialGrid<()>) {
        let mut grid = grid.with_nearest_max_radius(5.0);
        grid.register(&sample(1, EntityType::Beetle, 40.0, 0.0));
        assert_eq!(grid.nearest_entity(Vec3::ZERO, |_| true), None);
        assert_eq!(
            grid.nearest_entity(Vec3::new(36.0, 0.0, 0.0), |_| true),
            Some(EntityId(1))
        );
    }
}
