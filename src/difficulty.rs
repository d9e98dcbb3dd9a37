//! Difficulty levels and the interpolation curves that scale pursuit tuning.
//!
//! A level is a small integer in `MIN_LEVEL..=MAX_LEVEL`. Each tuned
//! parameter owns a [`DifficultyCurve`]: a piecewise linear multiplier that is
//! `easier` at the lowest level, `1.0` at the centre and `harder` at the top.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::config::{DifficultyConfig, PursuitConfig};
use crate::numeric::i32_to_f32;

/// Easiest selectable level.
pub const MIN_LEVEL: i32 = 1;
/// Nominal level at which every curve yields `1.0`.
pub const CENTRE_LEVEL: i32 = 3;
/// Hardest selectable level.
pub const MAX_LEVEL: i32 = 5;

/// Clamped difficulty level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i32", into = "i32")]
pub struct DifficultyLevel(i32);

impl DifficultyLevel {
    /// Preset for relaxed play.
    pub const EASY: Self = Self(MIN_LEVEL);
    /// Preset matching the base tuning.
    pub const MEDIUM: Self = Self(CENTRE_LEVEL);
    /// Preset for aggressive defenders.
    pub const HARD: Self = Self(MAX_LEVEL);

    /// Creates a level, clamping out-of-range values with a warning.
    ///
    /// # Examples
    /// ```
    /// use warden::DifficultyLevel;
    /// assert_eq!(DifficultyLevel::new(9), DifficultyLevel::HARD);
    /// assert_eq!(DifficultyLevel::new(3).value(), 3);
    /// ```
    #[must_use]
    pub fn new(level: i32) -> Self {
        let clamped = level.clamp(MIN_LEVEL, MAX_LEVEL);
        if clamped != level {
            warn!("difficulty level {level} outside {MIN_LEVEL}..={MAX_LEVEL}; using {clamped}");
        }
        Self(clamped)
    }

    /// Raw level value.
    #[must_use]
    pub const fn value(self) -> i32 {
        self.0
    }

    /// Next preset in the easy, medium, hard cycle.
    ///
    /// Levels between presets advance to the next preset above them.
    #[must_use]
    pub const fn cycle(self) -> Self {
        if self.0 < CENTRE_LEVEL {
            Self::MEDIUM
        } else if self.0 < MAX_LEVEL {
            Self::HARD
        } else {
            Self::EASY
        }
    }
}

impl Default for DifficultyLevel {
    fn default() -> Self {
        Self::MEDIUM
    }
}

impl TryFrom<i32> for DifficultyLevel {
    type Error = String;

    fn try_from(level: i32) -> Result<Self, Self::Error> {
        if (MIN_LEVEL..=MAX_LEVEL).contains(&level) {
            Ok(Self(level))
        } else {
            Err(format!(
                "difficulty level {level} outside {MIN_LEVEL}..={MAX_LEVEL}"
            ))
        }
    }
}

impl From<DifficultyLevel> for i32 {
    fn from(level: DifficultyLevel) -> Self {
        level.0
    }
}

/// Multiplier curve anchored at the easiest and hardest levels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DifficultyCurve {
    /// Multiplier at [`MIN_LEVEL`].
    pub easier: f32,
    /// Multiplier at [`MAX_LEVEL`].
    pub harder: f32,
}

impl DifficultyCurve {
    /// Creates a curve from its endpoint multipliers.
    #[must_use]
    pub const fn new(easier: f32, harder: f32) -> Self {
        Self { easier, harder }
    }

    /// Multiplier for `level`.
    ///
    /// # Examples
    /// ```
    /// use warden::{DifficultyCurve, DifficultyLevel};
    /// let speed = DifficultyCurve::new(0.8, 1.3);
    /// assert!((speed.multiplier(DifficultyLevel::EASY) - 0.8).abs() < 1e-6);
    /// assert!((speed.multiplier(DifficultyLevel::MEDIUM) - 1.0).abs() < 1e-6);
    /// assert!((speed.multiplier(DifficultyLevel::new(4)) - 1.15).abs() < 1e-6);
    /// ```
    #[must_use]
    pub fn multiplier(&self, level: DifficultyLevel) -> f32 {
        let value = level.value();
        if value <= CENTRE_LEVEL {
            let t = i32_to_f32(value - MIN_LEVEL) / i32_to_f32(CENTRE_LEVEL - MIN_LEVEL);
            lerp(self.easier, 1.0, t)
        } else {
            let t = i32_to_f32(value - CENTRE_LEVEL) / i32_to_f32(MAX_LEVEL - CENTRE_LEVEL);
            lerp(1.0, self.harder, t)
        }
    }
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    (to - from).mul_add(t, from)
}

/// Pursuit parameters after difficulty scaling.
///
/// Squared distances are cached alongside their roots so hot comparisons
/// never take a square root.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Tuning {
    /// Radius within which candidates are noticed.
    pub search_radius: f32,
    /// `search_radius` squared.
    pub search_radius_sq: f32,
    /// Distance at which attacks land.
    pub attack_range: f32,
    /// `attack_range` squared.
    pub attack_range_sq: f32,
    /// Damage per second while attacking.
    pub damage_rate: f32,
    /// Movement speed pushed to the movement collaborator.
    pub move_speed: f32,
}

impl Tuning {
    /// Scales the base pursuit values for `level`.
    ///
    /// Always derives from the base values, so repeated level changes never
    /// compound.
    #[must_use]
    pub fn derive(base: &PursuitConfig, curves: &DifficultyConfig, level: DifficultyLevel) -> Self {
        let search_radius = base.search_radius * curves.search_radius.multiplier(level);
        let attack_range = base.attack_range;
        Self {
            search_radius,
            search_radius_sq: search_radius * search_radius,
            attack_range,
            attack_range_sq: attack_range * attack_range,
            damage_rate: base.attack_damage * curves.damage.multiplier(level),
            move_speed: base.move_speed * curves.speed.multiplier(level),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::relative_eq;
    use rstest::rstest;

    #[rstest]
    #[case(DifficultyLevel::EASY, DifficultyLevel::MEDIUM)]
    #[case(DifficultyLevel::new(2), DifficultyLevel::MEDIUM)]
    #[case(DifficultyLevel::MEDIUM, DifficultyLevel::HARD)]
    #[case(DifficultyLevel::HARD, DifficultyLevel::EASY)]
    fn cycles_through_presets(#[case] from: DifficultyLevel, #[case] to: DifficultyLevel) {
        assert_eq!(from.cycle(), to);
    }

    #[rstest]
    fn curve_is_monotonic_when_harder_exceeds_easier() {
        let curve = DifficultyCurve::new(0.6, 1.5);
        let values: Vec<f32> = (MIN_LEVEL..=MAX_LEVEL)
            .map(|level| curve.multiplier(DifficultyLevel::new(level)))
            .collect();
        assert!(values.windows(2).all(|pair| matches!(pair, [a, b] if a < b)));
    }

    #[rstest]
    fn rejects_out_of_range_levels_when_deserialising() {
        assert!(DifficultyLevel::try_from(0).is_err());
        assert!(DifficultyLevel::try_from(6).is_err());
        assert_eq!(DifficultyLevel::try_from(5), Ok(DifficultyLevel::HARD));
    }

    #[rstest]
    fn derive_does_not_compound() {
        let base = PursuitConfig::default();
        let curves = DifficultyConfig::default();
        let once = Tuning::derive(&base, &curves, DifficultyLevel::HARD);
        let easy = Tuning::derive(&base, &curves, DifficultyLevel::EASY);
        let again = Tuning::derive(&base, &curves, DifficultyLevel::HARD);
        assert_eq!(once, again);
        assert!(easy.search_radius < once.search_radius);
        assert!(relative_eq!(
            once.search_radius_sq,
            once.search_radius * once.search_radius
        ));
    }
}
