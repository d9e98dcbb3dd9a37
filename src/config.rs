//! Serde-backed configuration for the grid, tracking, pursuit, and difficulty.
//!
//! Every section falls back to the crate defaults, so a configuration file
//! only needs to name the values it overrides:
//!
//! ```
//! use warden::WardenConfig;
//! let config = WardenConfig::from_json_str(r#"{ "pursuit": { "search_radius": 12.0 } }"#)?;
//! assert!((config.pursuit.search_radius - 12.0).abs() < f32::EPSILON);
//! assert!((config.grid.cell_size - 1.0).abs() < f32::EPSILON);
//! # Ok::<(), warden::ConfigError>(())
//! ```

use std::fs;
use std::path::{Path, PathBuf};

use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    DEFAULT_AGENT_SPEED, DEFAULT_ATTACK_DAMAGE, DEFAULT_ATTACK_RANGE, DEFAULT_CELL_SIZE,
    DEFAULT_CHECK_INTERVAL_TICKS, DEFAULT_GRID_COLUMNS, DEFAULT_GRID_ROWS,
    DEFAULT_MAX_CANDIDATES_PER_SWEEP, DEFAULT_MOVEMENT_THRESHOLD, DEFAULT_NEAREST_MAX_RADIUS,
    DEFAULT_PATROL_RADIUS, DEFAULT_REEVALUATE_INTERVAL, DEFAULT_SEARCH_INTERVAL,
    DEFAULT_SEARCH_RADIUS, DEFAULT_START_DELAY,
};
use crate::difficulty::{DifficultyCurve, DifficultyLevel};

/// Errors raised while loading or validating configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The configuration file could not be read.
    #[error("failed to read config {path:?}: {source}")]
    Io {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
    /// The configuration text is not valid JSON for [`WardenConfig`].
    #[error("failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A value parsed but is out of its permitted range.
    #[error("invalid {field}: {reason}")]
    Invalid {
        /// Dotted path of the offending field.
        field: &'static str,
        /// Human-readable explanation.
        reason: String,
    },
}

impl ConfigError {
    /// Builds an [`ConfigError::Invalid`] for `field`.
    pub fn invalid(field: &'static str, reason: impl Into<String>) -> Self {
        Self::Invalid {
            field,
            reason: reason.into(),
        }
    }
}

fn require_positive(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value > 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be finite and positive, got {value}"),
        ))
    }
}

fn require_non_negative(field: &'static str, value: f32) -> Result<(), ConfigError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(ConfigError::invalid(
            field,
            format!("must be finite and non-negative, got {value}"),
        ))
    }
}

/// How the tracker creates static cells.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "mode", rename_all = "snake_case")]
pub enum CellAllocation {
    /// Create every cell of a bounded `columns × rows` region up front.
    Eager {
        /// Cells along world X.
        columns: u32,
        /// Cells along world Z.
        rows: u32,
    },
    /// Create cells on first touch.
    Lazy,
}

impl Default for CellAllocation {
    fn default() -> Self {
        Self::Eager {
            columns: DEFAULT_GRID_COLUMNS,
            rows: DEFAULT_GRID_ROWS,
        }
    }
}

/// Grid geometry and allocation policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GridConfig {
    /// Cell edge length in world units.
    pub cell_size: f32,
    /// World X/Z position of the corner of cell `(0, 0)`.
    pub offset: Vec2,
    /// Static cell creation policy.
    pub allocation: CellAllocation,
    /// Largest ring radius tried by nearest-entity searches.
    pub nearest_max_radius: f32,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            cell_size: DEFAULT_CELL_SIZE,
            offset: Vec2::ZERO,
            allocation: CellAllocation::default(),
            nearest_max_radius: DEFAULT_NEAREST_MAX_RADIUS,
        }
    }
}

impl GridConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("grid.cell_size", self.cell_size)?;
        require_positive("grid.nearest_max_radius", self.nearest_max_radius)?;
        if !self.offset.is_finite() {
            return Err(ConfigError::invalid("grid.offset", "must be finite"));
        }
        if let CellAllocation::Eager { columns, rows } = self.allocation {
            if columns == 0 || rows == 0 {
                return Err(ConfigError::invalid(
                    "grid.allocation",
                    format!("eager region must be non-empty, got {columns}x{rows}"),
                ));
            }
        }
        Ok(())
    }
}

/// Tracked-entity resync policy.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackingConfig {
    /// Displacement that triggers a resync, in world units.
    pub movement_threshold: f32,
    /// Check displacement every this many ticks.
    pub check_interval_ticks: u32,
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            movement_threshold: DEFAULT_MOVEMENT_THRESHOLD,
            check_interval_ticks: DEFAULT_CHECK_INTERVAL_TICKS,
        }
    }
}

impl TrackingConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_non_negative("tracking.movement_threshold", self.movement_threshold)?;
        if self.check_interval_ticks == 0 {
            return Err(ConfigError::invalid(
                "tracking.check_interval_ticks",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Base pursuit values before difficulty scaling.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PursuitConfig {
    /// Radius within which candidates are noticed.
    pub search_radius: f32,
    /// Distance at which attacks land.
    pub attack_range: f32,
    /// Damage per second while attacking.
    pub attack_damage: f32,
    /// Patrol points are sampled within this distance of the objective.
    pub patrol_radius: f32,
    /// Seconds between fallback searches while idle.
    pub search_interval: f32,
    /// Seconds between re-evaluation sweeps.
    pub reevaluate_interval: f32,
    /// Seconds before the first patrol.
    pub start_delay: f32,
    /// Candidates inspected per sweep.
    pub max_candidates_per_sweep: usize,
    /// Movement speed.
    pub move_speed: f32,
}

impl Default for PursuitConfig {
    fn default() -> Self {
        Self {
            search_radius: DEFAULT_SEARCH_RADIUS,
            attack_range: DEFAULT_ATTACK_RANGE,
            attack_damage: DEFAULT_ATTACK_DAMAGE,
            patrol_radius: DEFAULT_PATROL_RADIUS,
            search_interval: DEFAULT_SEARCH_INTERVAL,
            reevaluate_interval: DEFAULT_REEVALUATE_INTERVAL,
            start_delay: DEFAULT_START_DELAY,
            max_candidates_per_sweep: DEFAULT_MAX_CANDIDATES_PER_SWEEP,
            move_speed: DEFAULT_AGENT_SPEED,
        }
    }
}

impl PursuitConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        require_positive("pursuit.search_radius", self.search_radius)?;
        require_positive("pursuit.attack_range", self.attack_range)?;
        require_non_negative("pursuit.attack_damage", self.attack_damage)?;
        require_non_negative("pursuit.patrol_radius", self.patrol_radius)?;
        require_positive("pursuit.search_interval", self.search_interval)?;
        require_positive("pursuit.reevaluate_interval", self.reevaluate_interval)?;
        require_non_negative("pursuit.start_delay", self.start_delay)?;
        require_positive("pursuit.move_speed", self.move_speed)?;
        if self.max_candidates_per_sweep == 0 {
            return Err(ConfigError::invalid(
                "pursuit.max_candidates_per_sweep",
                "must be at least 1",
            ));
        }
        Ok(())
    }
}

/// Starting level and the scaling curves.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DifficultyConfig {
    /// Level applied at start-up.
    pub initial_level: DifficultyLevel,
    /// Multiplier curve for the search radius.
    pub search_radius: DifficultyCurve,
    /// Multiplier curve for damage per second.
    pub damage: DifficultyCurve,
    /// Multiplier curve for movement speed.
    pub speed: DifficultyCurve,
}

impl Default for DifficultyConfig {
    fn default() -> Self {
        Self {
            initial_level: DifficultyLevel::default(),
            search_radius: DifficultyCurve::new(0.8, 1.3),
            damage: DifficultyCurve::new(0.6, 1.5),
            speed: DifficultyCurve::new(0.8, 1.3),
        }
    }
}

impl DifficultyConfig {
    /// Checks value ranges.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        for (field, curve) in [
            ("difficulty.search_radius", self.search_radius),
            ("difficulty.damage", self.damage),
            ("difficulty.speed", self.speed),
        ] {
            require_positive(field, curve.easier)?;
            require_positive(field, curve.harder)?;
        }
        Ok(())
    }
}

/// Complete configuration.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct WardenConfig {
    /// Grid geometry and allocation.
    pub grid: GridConfig,
    /// Tracked-entity resync policy.
    pub tracking: TrackingConfig,
    /// Base pursuit values.
    pub pursuit: PursuitConfig,
    /// Difficulty scaling.
    pub difficulty: DifficultyConfig,
}

impl WardenConfig {
    /// Parses and validates JSON text.
    ///
    /// # Errors
    /// Returns [`ConfigError::Parse`] for malformed input and
    /// [`ConfigError::Invalid`] for out-of-range values.
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses, and validates a JSON file.
    ///
    /// # Errors
    /// Returns [`ConfigError::Io`] when the file cannot be read, otherwise as
    /// [`WardenConfig::from_json_str`].
    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json_str(&text)
    }

    /// Checks every section.
    ///
    /// # Errors
    /// Returns [`ConfigError::Invalid`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.grid.validate()?;
        self.tracking.validate()?;
        self.pursuit.validate()?;
        self.difficulty.validate()
    }
}
