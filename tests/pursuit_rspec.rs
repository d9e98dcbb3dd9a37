//! Behavioural suite for a guard defending its flag.
//!
//! The simulation holds `Rc` subscriptions, so each scenario runs inside
//! `before_each` and records only plain data in the shared environment.

#[path = "support/rspec_runner.rs"]
mod rspec_runner;

use glam::Vec3;
use rspec_runner::run_serial;
use warden::{EntityId, EntityType, PursuitEvent, PursuitMode, Simulation, WardenConfig};

const OBJECTIVE: Vec3 = Vec3::new(25.0, 0.0, 25.0);
const DT: f32 = 0.05;

#[derive(Clone, Debug, Default)]
struct Watch {
    intruders: Vec<(EntityType, Vec3)>,
    ticks: u32,
    modes: Vec<PursuitMode>,
    events: Vec<PursuitEvent>,
    remaining: usize,
    first_intruder: Option<EntityId>,
}

impl Watch {
    fn run(&mut self) {
        self.modes.clear();
        self.events.clear();
        let mut sim = Simulation::new(&WardenConfig::default(), OBJECTIVE, 3)
            .unwrap_or_else(|err| panic!("simulation: {err}"));
        let ids: Vec<EntityId> = self
            .intruders
            .iter()
            .map(|&(entity_type, position)| sim.spawn_unit(entity_type, position))
            .collect();
        self.first_intruder = ids.first().copied();
        for _ in 0..self.ticks {
            sim.step(DT);
            self.modes.push(sim.agent().mode());
            self.events.extend(sim.drain_events());
        }
        self.remaining = sim.unit_count();
    }
}

#[test]
fn guard_patrols_when_nothing_approaches() {
    run_serial(&rspec::given("a guard with no intruders", Watch::default(), |ctx| {
        ctx.before_each(|watch| watch.ticks = 60);
        ctx.when("three seconds pass", |ctx| {
            ctx.before_each(Watch::run);
            ctx.then("it only ever patrols", |watch| {
                assert!(watch.modes.iter().all(|mode| *mode == PursuitMode::Patrolling));
            });
            ctx.then("it picked at least one patrol point", |watch| {
                assert!(watch
                    .events
                    .iter()
                    .any(|event| matches!(event, PursuitEvent::Idle { .. })));
            });
        });
    }));
}

#[test]
fn guard_defeats_a_lone_beetle() {
    run_serial(&rspec::given(
        "a beetle walking at the flag",
        Watch::default(),
        |ctx| {
            ctx.before_each(|watch| {
                watch.intruders = vec![(EntityType::Beetle, Vec3::new(33.0, 0.0, 25.0))];
                watch.ticks = 200;
            });
            ctx.when("ten seconds pass", |ctx| {
                ctx.before_each(Watch::run);
                ctx.then("the guard acquired the beetle", |watch| {
                    let target = watch.first_intruder;
                    assert!(watch.events.iter().any(|event| matches!(
                        event,
                        PursuitEvent::TargetAcquired { target: acquired } if Some(*acquired) == target
                    )));
                });
                ctx.then("the guard attacked it", |watch| {
                    assert!(watch.modes.contains(&PursuitMode::Attacking));
                });
                ctx.then("the beetle is gone and the guard is patrolling again", |watch| {
                    assert_eq!(watch.remaining, 0);
                    assert_eq!(watch.modes.last(), Some(&PursuitMode::Patrolling));
                });
            });
        },
    ));
}
