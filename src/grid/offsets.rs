//! Memoised square neighbourhoods.

use std::cell::RefCell;
use std::rc::Rc;

use hashbrown::HashMap;

use super::CellCoord;

/// Relative offsets of the `(2r + 1)²` cells around a centre, cached per radius.
///
/// Each radius is computed once and shared thereafter. Interior mutability
/// keeps lookups available to `&self` query methods.
///
/// # Examples
/// ```
/// use warden::grid::RadiusOffsetCache;
/// let cache = RadiusOffsetCache::default();
/// assert_eq!(cache.offsets(0).len(), 1);
/// assert_eq!(cache.offsets(2).len(), 25);
/// assert_eq!(cache.cached_radii(), 2);
/// ```
#[derive(Debug, Default)]
pub struct RadiusOffsetCache {
    offsets: RefCell<HashMap<u32, Rc<[CellCoord]>>>,
}

impl RadiusOffsetCache {
    /// Offsets for `radius`, computing them on first use.
    pub fn offsets(&self, radius: u32) -> Rc<[CellCoord]> {
        if let Some(found) = self.offsets.borrow().get(&radius) {
            return Rc::clone(found);
        }
        let computed: Rc<[CellCoord]> = square_offsets(radius).into();
        self.offsets
            .borrow_mut()
            .insert(radius, Rc::clone(&computed));
        computed
    }

    /// Number of distinct radii computed so far.
    #[must_use]
    pub fn cached_radii(&self) -> usize {
        self.offsets.borrow().len()
    }
}

fn square_offsets(radius: u32) -> Vec<CellCoord> {
    let reach = i32::try_from(radius).unwrap_or(i32::MAX);
    let side = usize::try_from(radius)
        .map_or(0, |r| r.saturating_mul(2).saturating_add(1));
    let mut offsets = Vec::with_capacity(side.saturating_mul(side));
    for row in -reach..=reach {
        for column in -reach..=reach {
            offsets.push(CellCoord::new(column, row));
        }
    }
    offsets
}
