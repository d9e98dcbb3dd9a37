//! Headless driver wiring the tracker, combat, movers, and one guard.
//!
//! Attackers walk straight at the objective. The guard is a
//! [`PursuitAgent`] driven by its own mover; fallen attackers are
//! unregistered and removed at the end of the step that killed them.

use std::fmt;

use glam::Vec3;
use log::{debug, info, warn};

use crate::combat::{CombatRoster, Health};
use crate::config::{ConfigError, WardenConfig};
use crate::difficulty::DifficultyLevel;
use crate::entity::{EntityId, EntitySample, EntityType};
use crate::movement::{Movement, MovementStrategy};
use crate::pursuit::{PursuitAgent, PursuitEvent, PursuitMode};
use crate::tracked::TrackedEntity;
use crate::tracker::{EntityTracker, TrackerStats};

/// A moving body known to the tracker.
#[derive(Debug)]
struct Body {
    tracked: TrackedEntity,
    movement: MovementStrategy,
}

impl Body {
    fn new(id: EntityId, entity_type: EntityType, position: Vec3, config: &WardenConfig) -> Self {
        Self {
            tracked: TrackedEntity::new(id, entity_type, &config.tracking),
            movement: MovementStrategy::for_entity_type(
                entity_type,
                position,
                entity_type.profile().move_speed,
            ),
        }
    }

    fn sample(&self) -> EntitySample {
        EntitySample::new(
            self.tracked.id(),
            self.tracked.entity_type(),
            self.movement.position(),
        )
    }

    fn sync(&mut self, tracker: &mut EntityTracker) {
        let sample = self.sample();
        if let Err(err) = self.tracked.tick(Some(tracker), &sample) {
            warn!("{err}");
        }
    }
}

/// Snapshot of a run for reporting.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SimulationSummary {
    /// Steps taken.
    pub ticks: u64,
    /// Attackers still standing.
    pub remaining: usize,
    /// Attackers defeated.
    pub defeated: u64,
    /// Guard behaviour at the end of the run.
    pub mode: PursuitMode,
    /// Guard target at the end of the run.
    pub target: Option<EntityId>,
    /// Active difficulty level.
    pub level: DifficultyLevel,
    /// Tracker counters accumulated over the run.
    pub tracker: TrackerStats,
}

impl fmt::Display for SimulationSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ticks, {} defeated, {} remaining, guard {:?}",
            self.ticks, self.defeated, self.remaining, self.mode
        )?;
        if let Some(target) = self.target {
            write!(f, " {target}")?;
        }
        write!(f, " at difficulty {}; {}", self.level.value(), self.tracker)
    }
}

/// One guarded objective under attack.
#[derive(Debug)]
pub struct Simulation {
    config: WardenConfig,
    tracker: EntityTracker,
    roster: CombatRoster,
    objective: Vec3,
    flag: EntitySample,
    guard: Body,
    agent: PursuitAgent,
    attackers: Vec<Body>,
    events: Vec<PursuitEvent>,
    next_id: u64,
    ticks: u64,
    defeated: u64,
}

impl Simulation {
    /// Places the flag and the guard at `objective`.
    ///
    /// # Errors
    /// Returns [`ConfigError`] when `config` fails validation.
    pub fn new(config: &WardenConfig, objective: Vec3, seed: u64) -> Result<Self, ConfigError> {
        config.validate()?;
        let mut tracker = EntityTracker::new(&config.grid)?;
        let flag = EntitySample::new(EntityId(1), EntityType::Flag, objective);
        tracker.register(Some(&flag));

        let guard_id = EntityId(2);
        let mut guard = Body::new(guard_id, EntityType::Ant, objective, config);
        let mut agent = PursuitAgent::new(
            guard_id,
            objective,
            &config.pursuit,
            &config.difficulty,
            seed,
        );
        agent.attach(&mut tracker);
        let sample = guard.sample();
        if let Err(err) = guard.tracked.register_with_grid(Some(&mut tracker), &sample) {
            warn!("{err}");
        }
        let mut roster = CombatRoster::default();
        roster.insert(guard_id, Health::new(EntityType::Ant.profile().max_health));

        info!("guard {guard_id} defends {objective}");
        Ok(Self {
            config: *config,
            tracker,
            roster,
            objective,
            flag,
            guard,
            agent,
            attackers: Vec::new(),
            events: Vec::new(),
            next_id: 3,
            ticks: 0,
            defeated: 0,
        })
    }

    /// Adds a unit at `position` heading for the objective.
    pub fn spawn_unit(&mut self, entity_type: EntityType, position: Vec3) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        let mut body = Body::new(id, entity_type, position, &self.config);
        body.movement.set_target(self.objective);
        let sample = body.sample();
        if let Err(err) = body.tracked.register_with_grid(Some(&mut self.tracker), &sample) {
            warn!("{err}");
        }
        self.roster
            .insert(id, Health::new(entity_type.profile().max_health));
        self.attackers.push(body);
        debug!("spawned {entity_type} {id} at {position}");
        id
    }

    /// Removes a unit. Returns `false` for unknown ids.
    pub fn despawn(&mut self, id: EntityId) -> bool {
        let Some(index) = self
            .attackers
            .iter()
            .position(|body| body.tracked.id() == id)
        else {
            return false;
        };
        let mut body = self.attackers.swap_remove(index);
        if let Err(err) = body.tracked.unregister_from_grid(Some(&mut self.tracker)) {
            warn!("{err}");
        }
        self.roster.remove(id);
        true
    }

    /// Advances every body by `dt` seconds.
    pub fn step(&mut self, dt: f32) {
        self.ticks += 1;
        for body in &mut self.attackers {
            body.movement.advance(dt);
            body.sync(&mut self.tracker);
        }
        self.agent.tick(
            Some(&mut self.tracker),
            &mut self.guard.movement,
            &mut self.roster,
            dt,
        );
        self.guard.sync(&mut self.tracker);
        self.events.extend(self.agent.drain_events());

        let fallen: Vec<EntityId> = self.roster.drain_fallen().collect();
        for id in fallen {
            if self.despawn(id) {
                self.defeated += 1;
                info!("{id} removed after tick {}", self.ticks);
            }
        }
    }

    /// Switches the guard to `level`.
    pub fn set_difficulty(&mut self, level: DifficultyLevel) {
        self.agent.set_difficulty(level, &mut self.guard.movement);
    }

    /// Advances to the next difficulty preset and returns it.
    pub fn cycle_difficulty(&mut self) -> DifficultyLevel {
        let level = self.agent.state().level().cycle();
        self.set_difficulty(level);
        level
    }

    /// Orders the guard to attack `target`.
    pub fn select_target(&mut self, target: EntityId) -> bool {
        self.agent.select_target(target, &self.tracker)
    }

    /// Guard events recorded since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PursuitEvent> {
        self.events.drain(..)
    }

    /// The spatial index.
    #[must_use]
    pub const fn tracker(&self) -> &EntityTracker {
        &self.tracker
    }

    /// The guard.
    #[must_use]
    pub const fn agent(&self) -> &PursuitAgent {
        &self.agent
    }

    /// Hit points of every combatant.
    #[must_use]
    pub const fn roster(&self) -> &CombatRoster {
        &self.roster
    }

    /// The objective flag.
    #[must_use]
    pub const fn flag(&self) -> &EntitySample {
        &self.flag
    }

    /// Current guard position.
    #[must_use]
    pub fn guard_position(&self) -> Vec3 {
        self.guard.movement.position()
    }

    /// Current position of attacker `id`.
    #[must_use]
    pub fn unit_position(&self, id: EntityId) -> Option<Vec3> {
        self.attackers
            .iter()
            .find(|body| body.tracked.id() == id)
            .map(|body| body.movement.position())
    }

    /// Attackers still standing.
    #[must_use]
    pub fn unit_count(&self) -> usize {
        self.attackers.len()
    }

    /// Steps taken so far.
    #[must_use]
    pub const fn ticks(&self) -> u64 {
        self.ticks
    }

    /// Reporting snapshot.
    #[must_use]
    pub fn summary(&self) -> SimulationSummary {
        SimulationSummary {
            ticks: self.ticks,
            remaining: self.attackers.len(),
            defeated: self.defeated,
            mode: self.agent.mode(),
            target: self.agent.target(),
            level: self.agent.state().level(),
            tracker: self.tracker.stats(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    fn despawn_unregisters_the_unit() {
        let mut sim = Simulation::new(&WardenConfig::default(), Vec3::new(25.0, 0.0, 25.0), 1)
            .unwrap_or_else(|err| panic!("{err}"));
        let id = sim.spawn_unit(EntityType::Beetle, Vec3::new(10.0, 0.0, 10.0));
        assert!(sim.tracker().grid().contains(id));
        assert!(sim.despawn(id));
        assert!(!sim.tracker().grid().contains(id));
        assert!(!sim.despawn(id));
        assert_eq!(sim.unit_count(), 0);
    }

    #[rstest]
    fn cycling_difficulty_updates_tuning() {
        let mut sim = Simulation::new(&WardenConfig::default(), Vec3::ZERO, 1)
            .unwrap_or_else(|err| panic!("{err}"));
        let before = sim.agent().tuning().search_radius;
        assert_eq!(sim.cycle_difficulty(), DifficultyLevel::HARD);
        assert!(sim.agent().tuning().search_radius > before);
    }
}
