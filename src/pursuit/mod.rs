//! Target selection and pursuit for a single guarding agent.
//!
//! The agent learns about candidates in two ways. Grid subscriptions push
//! [`Sighting`]s into a shared inbox as entities register, move between
//! cells, or leave; the inbox is drained at the start of each tick. Polled
//! queries through the tracker's pool back this up: a fallback search while
//! no target is held and a periodic sweep that may switch to a candidate
//! closer to the objective.
//!
//! Every tick takes the tracker as an `Option`. Without one the agent still
//! reacts to queued sightings and keeps attacking, but skips polled searches
//! until a tracker is supplied again.

mod inbox;
mod state;

use std::cell::RefCell;
use std::f32::consts::TAU;
use std::rc::Rc;

use glam::Vec3;
use log::{debug, error, info};
use ordered_float::OrderedFloat;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

pub use inbox::{SharedInbox, Sighting, SightingInbox};
pub use state::{LossReason, PursuitEvent, PursuitMode, PursuitState};

use crate::combat::Combat;
use crate::config::{DifficultyConfig, PursuitConfig};
use crate::difficulty::{DifficultyLevel, Tuning};
use crate::entity::{EntityId, EntityType};
use crate::grid::{GridEvent, SubscriptionId};
use crate::movement::Movement;
use crate::timing::{Delay, Interval};
use crate::tracker::EntityTracker;
use crate::vector_math::planar_distance_squared;

#[derive(Debug, Clone, Copy)]
struct Candidate {
    id: EntityId,
    position: Vec3,
    score: f32,
}

/// A guard that patrols around an objective and attacks intruders.
#[derive(Debug)]
pub struct PursuitAgent {
    id: EntityId,
    objective: Vec3,
    config: PursuitConfig,
    curves: DifficultyConfig,
    state: PursuitState,
    inbox: SharedInbox,
    batch: Vec<Sighting>,
    subscriptions: Vec<SubscriptionId>,
    startup: Delay,
    started: bool,
    search_timer: Interval,
    sweep_timer: Interval,
    events: Vec<PursuitEvent>,
    patrols: u64,
    rng: StdRng,
}

impl PursuitAgent {
    /// Creates an agent guarding `objective`.
    ///
    /// `seed` drives patrol point selection so runs are reproducible.
    #[must_use]
    pub fn new(
        id: EntityId,
        objective: Vec3,
        config: &PursuitConfig,
        curves: &DifficultyConfig,
        seed: u64,
    ) -> Self {
        let level = curves.initial_level;
        Self {
            id,
            objective,
            config: *config,
            curves: *curves,
            state: PursuitState::new(level, Tuning::derive(config, curves, level)),
            inbox: Rc::new(RefCell::new(SightingInbox::default())),
            batch: Vec::new(),
            subscriptions: Vec::new(),
            startup: Delay::new(config.start_delay),
            started: false,
            search_timer: Interval::new(config.search_interval),
            sweep_timer: Interval::new(config.reevaluate_interval),
            events: Vec::new(),
            patrols: 0,
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// The agent's own entity id.
    #[must_use]
    pub const fn id(&self) -> EntityId {
        self.id
    }

    /// The guarded point.
    #[must_use]
    pub const fn objective(&self) -> Vec3 {
        self.objective
    }

    /// Target, patrol, and tuning state.
    #[must_use]
    pub const fn state(&self) -> &PursuitState {
        &self.state
    }

    /// Coarse behaviour.
    #[must_use]
    pub const fn mode(&self) -> PursuitMode {
        self.state.mode()
    }

    /// Current target.
    #[must_use]
    pub const fn target(&self) -> Option<EntityId> {
        self.state.target
    }

    /// Parameters for the active difficulty level.
    #[must_use]
    pub const fn tuning(&self) -> &Tuning {
        &self.state.tuning
    }

    /// Whether the start-up delay has elapsed.
    #[must_use]
    pub const fn is_started(&self) -> bool {
        self.started
    }

    /// Whether grid subscriptions are installed.
    #[must_use]
    pub fn is_attached(&self) -> bool {
        !self.subscriptions.is_empty()
    }

    /// Subscribes to `tracker`'s change notifications.
    ///
    /// Registered and moved candidates are queued as [`Sighting::Seen`];
    /// every unregistration is queued as [`Sighting::Lost`]. Attaching twice
    /// is a no-op.
    pub fn attach(&mut self, tracker: &mut EntityTracker) {
        if self.is_attached() {
            debug!("{} is already attached", self.id);
            return;
        }
        let own_id = self.id;
        let seen = move |inbox: SharedInbox| {
            move |event: &GridEvent| {
                let occupant = *event.occupant();
                if occupant.id == own_id || !occupant.entity_type.is_candidate() {
                    return;
                }
                push(&inbox, Sighting::Seen(occupant));
            }
        };
        let lost_inbox = Rc::clone(&self.inbox);
        self.subscriptions = vec![
            tracker.on_registered(seen(Rc::clone(&self.inbox))),
            tracker.on_moved(seen(Rc::clone(&self.inbox))),
            tracker.on_unregistered(move |event: &GridEvent| {
                push(&lost_inbox, Sighting::Lost(event.occupant().id));
            }),
        ];
        debug!("{} attached to the entity tracker", self.id);
    }

    /// Removes the subscriptions installed by [`PursuitAgent::attach`] and
    /// drops anything still queued.
    pub fn detach(&mut self, tracker: &mut EntityTracker) {
        for subscription in self.subscriptions.drain(..) {
            tracker.unsubscribe(subscription);
        }
        if let Ok(mut inbox) = self.inbox.try_borrow_mut() {
            inbox.clear();
        }
    }

    /// Switches difficulty, recomputing tuning and pushing the new speed to
    /// `movement` before returning.
    pub fn set_difficulty<M: Movement + ?Sized>(&mut self, level: DifficultyLevel, movement: &mut M) {
        self.state.level = level;
        self.state.tuning = Tuning::derive(&self.config, &self.curves, level);
        movement.set_speed(self.state.tuning.move_speed);
        info!(
            "{} difficulty {}: search radius {:.2}, damage {:.1}/s, speed {:.2}",
            self.id,
            level.value(),
            self.state.tuning.search_radius,
            self.state.tuning.damage_rate,
            self.state.tuning.move_speed
        );
    }

    /// Targets `target` on the player's behalf.
    ///
    /// The selection survives sweeps until the target becomes invalid.
    /// Returns `false` if `target` is not a registered candidate.
    pub fn select_target(&mut self, target: EntityId, tracker: &EntityTracker) -> bool {
        let eligible = target != self.id
            && tracker
                .entity_type_of(target)
                .is_some_and(EntityType::is_candidate);
        let Some(position) = tracker.position_of(target).filter(|_| eligible) else {
            debug!("{} ignored selection of {target}", self.id);
            return false;
        };
        let previous = self.state.target;
        let score = planar_distance_squared(position, self.objective);
        self.state.set_target(target, position, score, true);
        self.events.push(match previous {
            Some(from) if from != target => PursuitEvent::Retargeted { from, to: target },
            _ => PursuitEvent::TargetAcquired { target },
        });
        info!("{} was ordered to attack {target}", self.id);
        true
    }

    /// Events recorded since the last drain.
    pub fn drain_events(&mut self) -> std::vec::Drain<'_, PursuitEvent> {
        self.events.drain(..)
    }

    /// Runs one update.
    ///
    /// Order: start-up delay, queued sightings, target validation, fallback
    /// search, sweep, engagement, then movement.
    pub fn tick<M, K>(
        &mut self,
        tracker: Option<&mut EntityTracker>,
        movement: &mut M,
        combat: &mut K,
        elapsed: f32,
    ) where
        M: Movement + ?Sized,
        K: Combat + ?Sized,
    {
        let dt = elapsed.max(0.0);
        let patrols = self.patrols;
        if !self.started {
            if !self.startup.tick(dt) {
                return;
            }
            self.started = true;
            info!("{} starts guarding {}", self.id, self.objective);
            movement.set_speed(self.state.tuning.move_speed);
            self.patrol(movement);
        }
        let position = movement.position();
        let search_due = self.search_timer.tick(dt);
        let sweep_due = self.sweep_timer.tick(dt);

        self.drain_sightings(position, movement, combat);
        self.validate_target(tracker.as_deref(), movement, combat);
        match tracker {
            Some(index) => {
                if search_due && self.state.target.is_none() {
                    self.poll(index, position, usize::MAX, combat);
                }
                if sweep_due && !(self.state.player_selected && self.state.target.is_some()) {
                    self.poll(index, position, self.config.max_candidates_per_sweep, combat);
                }
            }
            None => {
                if search_due || sweep_due {
                    error!("{} has no entity tracker; polled searches skipped", self.id);
                }
            }
        }
        self.engage(position, movement, combat, dt);

        let arrived = movement.advance(dt);
        // A target lost this tick has already been given a fresh patrol point.
        if arrived && self.state.target.is_none() && self.patrols == patrols {
            self.patrol(movement);
        }
    }

    fn drain_sightings<M, K>(&mut self, position: Vec3, movement: &mut M, combat: &K)
    where
        M: Movement + ?Sized,
        K: Combat + ?Sized,
    {
        let mut batch = std::mem::take(&mut self.batch);
        match self.inbox.try_borrow_mut() {
            Ok(mut inbox) => inbox.drain_into(&mut batch),
            Err(_) => error!("{} could not read its sighting inbox", self.id),
        }
        for sighting in batch.drain(..) {
            match sighting {
                Sighting::Lost(id) => {
                    if self.state.target == Some(id) {
                        self.lose_target(id, LossReason::Unregistered, movement);
                    }
                }
                Sighting::Seen(occupant) => {
                    if Some(occupant.id) == self.state.target {
                        self.state.target_position = Some(occupant.position);
                        self.state.target_score =
                            planar_distance_squared(occupant.position, self.objective);
                        continue;
                    }
                    let in_sight = planar_distance_squared(position, occupant.position)
                        <= self.state.tuning.search_radius_sq;
                    if in_sight && self.is_eligible(occupant.id, combat) {
                        self.offer(Candidate {
                            id: occupant.id,
                            position: occupant.position,
                            score: planar_distance_squared(occupant.position, self.objective),
                        });
                    }
                }
            }
        }
        self.batch = batch;
    }

    fn validate_target<M, K>(&mut self, index: Option<&EntityTracker>, movement: &mut M, combat: &K)
    where
        M: Movement + ?Sized,
        K: Combat + ?Sized,
    {
        let Some(target) = self.state.target else {
            return;
        };
        if let Some(tracker) = index {
            match tracker.position_of(target) {
                Some(position) => {
                    self.state.target_position = Some(position);
                    self.state.target_score = planar_distance_squared(position, self.objective);
                }
                None => {
                    self.lose_target(target, LossReason::Unregistered, movement);
                    return;
                }
            }
        }
        if !combat.is_alive(target) {
            self.lose_target(target, LossReason::Defeated, movement);
        } else if !combat.is_active(target) {
            self.lose_target(target, LossReason::Inactive, movement);
        }
    }

    fn is_eligible<K: Combat + ?Sized>(&self, id: EntityId, combat: &K) -> bool {
        id != self.id && combat.is_alive(id) && combat.is_active(id)
    }

    /// Queries candidates around `position` and offers the one closest to
    /// the objective.
    fn poll<K: Combat + ?Sized>(
        &mut self,
        tracker: &mut EntityTracker,
        position: Vec3,
        limit: usize,
        combat: &K,
    ) {
        let found =
            tracker.candidates_in_radius_pooled(position, self.state.tuning.search_radius, self.id, limit);
        let best = found
            .iter()
            .filter(|&&id| self.is_eligible(id, combat))
            .filter_map(|&id| {
                tracker.position_of(id).map(|position| Candidate {
                    id,
                    position,
                    score: planar_distance_squared(position, self.objective),
                })
            })
            .min_by_key(|candidate| (OrderedFloat(candidate.score), candidate.id));
        tracker.release_results(found);
        if let Some(candidate) = best {
            self.offer(candidate);
        }
    }

    /// Acquires `candidate` when idle, or switches to it when it is strictly
    /// closer to the objective than an automatically chosen target.
    fn offer(&mut self, candidate: Candidate) {
        match self.state.target {
            None => {
                self.state
                    .set_target(candidate.id, candidate.position, candidate.score, false);
                self.events.push(PursuitEvent::TargetAcquired {
                    target: candidate.id,
                });
                info!("{} acquired {}", self.id, candidate.id);
            }
            Some(current) if current == candidate.id => {
                self.state.target_position = Some(candidate.position);
                self.state.target_score = candidate.score;
            }
            Some(current) => {
                if self.state.player_selected || candidate.score >= self.state.target_score {
                    return;
                }
                self.state
                    .set_target(candidate.id, candidate.position, candidate.score, false);
                self.events.push(PursuitEvent::Retargeted {
                    from: current,
                    to: candidate.id,
                });
                info!("{} switched from {current} to {}", self.id, candidate.id);
            }
        }
    }

    fn engage<M, K>(&mut self, position: Vec3, movement: &mut M, combat: &mut K, dt: f32)
    where
        M: Movement + ?Sized,
        K: Combat + ?Sized,
    {
        let (Some(target), Some(target_position)) = (self.state.target, self.state.target_position)
        else {
            self.state.attacking = false;
            return;
        };
        if planar_distance_squared(position, target_position) > self.state.tuning.attack_range_sq {
            self.state.attacking = false;
            movement.set_target(target_position);
            movement.resume();
            return;
        }
        if !self.state.attacking {
            self.state.attacking = true;
            self.events.push(PursuitEvent::Attacking { target });
            debug!("{} is attacking {target}", self.id);
        }
        movement.stop();
        combat.take_damage(target, self.state.tuning.damage_rate * dt);
        if !combat.is_alive(target) {
            self.lose_target(target, LossReason::Defeated, movement);
        }
    }

    fn lose_target<M: Movement + ?Sized>(&mut self, target: EntityId, reason: LossReason, movement: &mut M) {
        self.state.clear_target();
        self.events.push(PursuitEvent::TargetLost { target, reason });
        info!("{} lost {target} ({reason:?})", self.id);
        self.patrol(movement);
    }

    fn patrol<M: Movement + ?Sized>(&mut self, movement: &mut M) {
        let point = self.patrol_point();
        self.patrols += 1;
        self.state.patrol_point = Some(point);
        movement.set_target(point);
        movement.resume();
        self.events.push(PursuitEvent::Idle { point });
        debug!("{} patrols towards {point}", self.id);
    }

    /// Uniform sample from the disc of `patrol_radius` around the objective.
    fn patrol_point(&mut self) -> Vec3 {
        let radius = self.config.patrol_radius.max(0.0);
        if radius == 0.0 {
            return self.objective;
        }
        let angle = self.rng.gen_range(0.0..TAU);
        let distance = radius * self.rng.gen::<f32>().sqrt();
        self.objective + Vec3::new(angle.cos() * distance, 0.0, angle.sin() * distance)
    }
}

fn push(inbox: &SharedInbox, sighting: Sighting) {
    match inbox.try_borrow_mut() {
        Ok(mut queue) => queue.push(sighting),
        Err(_) => error!("sighting inbox busy; dropped {sighting:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::{CombatRoster, Health};
    use crate::config::GridConfig;
    use crate::entity::EntitySample;
    use crate::movement::DirectMovement;
    use rstest::{fixture, rstest};

    struct Rig {
        tracker: EntityTracker,
        roster: CombatRoster,
        movement: DirectMovement,
        agent: PursuitAgent,
    }

    impl Rig {
        fn spawn(&mut self, id: u64, entity_type: EntityType, x: f32, z: f32) {
            let sample = EntitySample::new(EntityId(id), entity_type, Vec3::new(x, 0.0, z));
            self.roster.insert(EntityId(id), Health::new(100.0));
            self.tracker.register(Some(&sample));
        }

        fn tick(&mut self, dt: f32) {
            self.agent
                .tick(Some(&mut self.tracker), &mut self.movement, &mut self.roster, dt);
        }
    }

    #[fixture]
    fn rig() -> Rig {
        let config = PursuitConfig {
            start_delay: 0.0,
            ..PursuitConfig::default()
        };
        let mut tracker =
            EntityTracker::new(&GridConfig::default()).unwrap_or_else(|err| panic!("{err}"));
        let mut agent = PursuitAgent::new(
            EntityId(0),
            Vec3::new(25.0, 0.0, 25.0),
            &config,
            &DifficultyConfig::default(),
            7,
        );
        agent.attach(&mut tracker);
        Rig {
            tracker,
            roster: CombatRoster::default(),
            movement: DirectMovement::new(Vec3::new(25.0, 0.0, 25.0), 3.5),
            agent,
        }
    }

    #[rstest]
    fn registration_in_sight_is_acquired_next_tick(mut rig: Rig) {
        rig.tick(0.01);
        rig.spawn(1, EntityType::Beetle, 28.0, 25.0);
        assert_eq!(rig.agent.target(), None);
        rig.tick(0.01);
        assert_eq!(rig.agent.target(), Some(EntityId(1)));
        assert_eq!(rig.agent.mode(), PursuitMode::Pursuing);
    }

    #[rstest]
    fn non_candidates_are_ignored(mut rig: Rig) {
        rig.tick(0.01);
        rig.spawn(1, EntityType::Flag, 26.0, 25.0);
        rig.spawn(2, EntityType::Ant, 26.0, 25.0);
        rig.tick(1.0);
        assert_eq!(rig.agent.target(), None);
    }

    #[rstest]
    fn attached_twice_subscribes_once(mut rig: Rig) {
        let before = rig.tracker.grid().subscriber_count();
        rig.agent.attach(&mut rig.tracker);
        assert_eq!(rig.tracker.grid().subscriber_count(), before);
        rig.agent.detach(&mut rig.tracker);
        assert_eq!(rig.tracker.grid().subscriber_count(), before - 3);
        assert!(!rig.agent.is_attached());
    }

    #[rstest]
    fn patrol_points_stay_near_objective(mut rig: Rig) {
        for _ in 0..20 {
            let point = rig.agent.patrol_point();
            assert!(planar_distance_squared(point, rig.agent.objective()) <= 25.0 + 1e-3);
        }
    }
}
