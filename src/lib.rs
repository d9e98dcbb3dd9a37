#![cfg_attr(docsrs, feature(doc_cfg))]
//! Uniform-grid spatial index and a pursuit agent that consumes its change
//! notifications.
//!
//! The [`EntityTracker`] owns a [`grid::SpatialGrid`] and is the only way to
//! mutate it. Moving objects sync through [`TrackedEntity`], and a
//! [`PursuitAgent`] subscribes to the tracker to find, chase, and attack
//! candidates near the objective it guards. [`Simulation`] wires everything
//! together for headless runs.
pub mod combat;
pub mod config;
pub mod constants;
pub mod difficulty;
pub mod entity;
pub mod grid;
pub mod logging;
pub mod movement;
pub mod numeric;
pub mod pool;
pub mod pursuit;
pub mod simulation;
pub mod timing;
pub mod tracked;
pub mod tracker;
pub mod vector_math;
pub use constants::*;

pub use combat::{Combat, CombatRoster, Health};
pub use config::{ConfigError, WardenConfig};
pub use difficulty::{DifficultyCurve, DifficultyLevel, Tuning};
pub use entity::{EntityId, EntitySample, EntityType, GridEntity, PositionSource};
pub use grid::{CellCoord, GridEvent, GridGeometry, Occupant, SpatialGrid};
pub use logging::init as init_logging;
pub use movement::{Movement, MovementStrategy};
pub use pool::QueryResultPool;
pub use pursuit::{PursuitAgent, PursuitEvent, PursuitMode};
pub use simulation::{Simulation, SimulationSummary};
pub use tracked::{TrackedEntity, TrackingError};
pub use tracker::EntityTracker;

pub mod prelude {
    //! Prelude exports used in documentation examples.
    //!
    //! ```rust,no_run
    //! use warden::prelude::*;
    //! ```

    pub use crate::combat::{Combat, Health};
    pub use crate::entity::{EntityId, EntitySample, EntityType, GridEntity, PositionSource};
    pub use crate::movement::Movement;
    pub use crate::tracker::EntityTracker;
    pub use crate::PursuitAgent;
    pub use crate::WardenConfig;
    pub use glam::Vec3;
    pub use ordered_float::OrderedFloat;
}
