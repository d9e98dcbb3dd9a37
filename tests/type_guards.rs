//! Compile-time guards on the thread and copy semantics of core types.
use static_assertions::{assert_impl_all, assert_not_impl_any};
use warden::pursuit::PursuitAgent;
use warden::tracker::CellInfo;
use warden::{CellCoord, EntityId, EntityTracker, GridEvent, Simulation, SpatialGrid, WardenConfig};

assert_impl_all!(EntityId: Copy, Send, Sync, Ord, std::hash::Hash);
assert_impl_all!(CellCoord: Copy, Send, Sync, std::hash::Hash);
assert_impl_all!(GridEvent: Copy);
assert_impl_all!(WardenConfig: Copy, Send, Sync, Default);
// Subscribers share state through `Rc`, so the grid stays on one thread.
assert_not_impl_any!(SpatialGrid<CellInfo>: Send, Sync);
assert_not_impl_any!(EntityTracker: Send, Sync);
assert_not_impl_any!(PursuitAgent: Send, Sync, Clone);
assert_not_impl_any!(Simulation: Send, Sync);
