//! Entity identity, categories, and the position-source capability.

use std::fmt;

use glam::Vec3;
use serde::{Deserialize, Serialize};

/// Opaque identifier for anything tracked by the grid.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct EntityId(pub u64);

impl From<u64> for EntityId {
    fn from(id: u64) -> Self {
        Self(id)
    }
}

impl EntityId {
    /// Returns the raw identifier.
    #[must_use]
    pub const fn into_inner(self) -> u64 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Category tag carried by every tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EntityType {
    /// Fast, fragile attacker.
    Beetle,
    /// Slow, sturdy attacker with momentum.
    Aphid,
    /// Attacker that glides along eased paths.
    Ladybug,
    /// The defending pursuit agent.
    Ant,
    /// The objective marker defended by the ants.
    Flag,
}

impl EntityType {
    /// Every category, in declaration order.
    pub const ALL: [Self; 5] = [
        Self::Beetle,
        Self::Aphid,
        Self::Ladybug,
        Self::Ant,
        Self::Flag,
    ];

    /// Categories the pursuit agent may target.
    pub const CANDIDATES: [Self; 3] = [Self::Beetle, Self::Aphid, Self::Ladybug];

    /// Whether entities of this category are valid pursuit targets.
    ///
    /// # Examples
    /// ```
    /// use warden::EntityType;
    /// assert!(EntityType::Aphid.is_candidate());
    /// assert!(!EntityType::Ant.is_candidate());
    /// assert!(!EntityType::Flag.is_candidate());
    /// ```
    #[must_use]
    pub const fn is_candidate(self) -> bool {
        matches!(self, Self::Beetle | Self::Aphid | Self::Ladybug)
    }

    /// Lower-case label used in logs.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Beetle => "beetle",
            Self::Aphid => "aphid",
            Self::Ladybug => "ladybug",
            Self::Ant => "ant",
            Self::Flag => "flag",
        }
    }

    /// Baseline hit points and speed for units of this category.
    #[must_use]
    pub const fn profile(self) -> UnitProfile {
        match self {
            Self::Beetle => UnitProfile::new(40.0, 4.0),
            Self::Aphid => UnitProfile::new(75.0, 2.5),
            Self::Ladybug => UnitProfile::new(50.0, 3.0),
            Self::Ant => UnitProfile::new(150.0, 3.5),
            Self::Flag => UnitProfile::new(0.0, 0.0),
        }
    }
}

impl fmt::Display for EntityType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Per-category unit statistics.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UnitProfile {
    /// Hit points at spawn.
    pub max_health: f32,
    /// World units per second.
    pub move_speed: f32,
}

impl UnitProfile {
    /// Creates a profile from hit points and speed.
    #[must_use]
    pub const fn new(max_health: f32, move_speed: f32) -> Self {
        Self {
            max_health,
            move_speed,
        }
    }
}

/// Anything that can report where it is and what it is.
pub trait PositionSource {
    /// Current world position.
    fn world_position(&self) -> Vec3;
    /// Category tag.
    fn entity_type(&self) -> EntityType;
}

/// A position source with a stable identity, accepted by the grid.
pub trait GridEntity: PositionSource {
    /// Stable identifier.
    fn id(&self) -> EntityId;
}

/// Owned snapshot of an entity's identity, category, and position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EntitySample {
    /// Entity identifier.
    pub id: EntityId,
    /// Category tag.
    pub entity_type: EntityType,
    /// World position at sampling time.
    pub position: Vec3,
}

impl EntitySample {
    /// Creates a snapshot.
    ///
    /// # Examples
    /// ```
    /// use glam::Vec3;
    /// use warden::{EntityId, EntitySample, EntityType, GridEntity, PositionSource};
    /// let sample = EntitySample::new(EntityId(4), EntityType::Beetle, Vec3::X);
    /// assert_eq!(sample.id(), EntityId(4));
    /// assert_eq!(sample.world_position(), Vec3::X);
    /// ```
    #[must_use]
    pub const fn new(id: EntityId, entity_type: EntityType, position: Vec3) -> Self {
        Self {
            id,
            entity_type,
            position,
        }
    }
}

impl PositionSource for EntitySample {
    fn world_position(&self) -> Vec3 {
        self.position
    }

    fn entity_type(&self) -> EntityType {
        self.entity_type
    }
}

impl GridEntity for EntitySample {
    fn id(&self) -> EntityId {
        self.id
    }
}
