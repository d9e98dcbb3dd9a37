//! Tuning defaults shared across the crate.
//!
//! Configuration files override most of these; the remainder are fixed
//! properties of the movement strategies.

/// Edge length of a grid cell in world units.
pub const DEFAULT_CELL_SIZE: f32 = 1.0;
/// Columns created when cells are allocated eagerly.
pub const DEFAULT_GRID_COLUMNS: u32 = 50;
/// Rows created when cells are allocated eagerly.
pub const DEFAULT_GRID_ROWS: u32 = 50;
/// Largest ring radius, in world units, tried by nearest-entity searches.
pub const DEFAULT_NEAREST_MAX_RADIUS: f32 = 50.0;
/// Idle result buffers kept by a query pool before extras are dropped.
pub const DEFAULT_POOL_RETENTION: usize = 32;

/// Displacement below which a tracked entity does not resync with the grid.
pub const DEFAULT_MOVEMENT_THRESHOLD: f32 = 0.01;
/// Tracked entities check their displacement every this many ticks.
pub const DEFAULT_CHECK_INTERVAL_TICKS: u32 = 1;

/// Base radius within which the pursuit agent notices candidates.
pub const DEFAULT_SEARCH_RADIUS: f32 = 10.0;
/// Base distance at which the pursuit agent starts dealing damage.
pub const DEFAULT_ATTACK_RANGE: f32 = 1.5;
/// Base damage per second dealt while attacking.
pub const DEFAULT_ATTACK_DAMAGE: f32 = 50.0;
/// Patrol points are sampled within this distance of the objective.
pub const DEFAULT_PATROL_RADIUS: f32 = 5.0;
/// Seconds between fallback searches while no target is held.
pub const DEFAULT_SEARCH_INTERVAL: f32 = 0.5;
/// Seconds between re-evaluation sweeps.
pub const DEFAULT_REEVALUATE_INTERVAL: f32 = 1.0;
/// Seconds the pursuit agent waits before its first patrol.
pub const DEFAULT_START_DELAY: f32 = 0.5;
/// Candidates inspected per re-evaluation sweep.
pub const DEFAULT_MAX_CANDIDATES_PER_SWEEP: usize = 16;
/// Base movement speed of the pursuit agent.
pub const DEFAULT_AGENT_SPEED: f32 = 3.5;

/// Distance under which a mover counts as having reached its target.
pub const ARRIVAL_THRESHOLD: f32 = 0.1;
/// Steering acceleration of physics-driven movers.
pub const PHYSICS_ACCELERATION: f32 = 10.0;
/// Braking deceleration of physics-driven movers.
pub const PHYSICS_DECELERATION: f32 = 15.0;
