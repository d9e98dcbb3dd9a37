//! End-to-end runs of the headless simulation.

use glam::Vec3;
use rstest::{fixture, rstest};
use test_utils::at;
use warden::config::GridConfig;
use warden::pursuit::LossReason;
use warden::{
    DifficultyLevel, EntityType, PursuitEvent, PursuitMode, Simulation, WardenConfig,
};

const OBJECTIVE: Vec3 = Vec3::new(25.0, 0.0, 25.0);

#[fixture]
fn sim() -> Simulation {
    Simulation::new(&WardenConfig::default(), OBJECTIVE, 42).unwrap_or_else(|err| panic!("{err}"))
}

fn run(sim: &mut Simulation, ticks: u32) -> Vec<PursuitEvent> {
    let mut events = Vec::new();
    for _ in 0..ticks {
        sim.step(0.05);
        events.extend(sim.drain_events());
        assert_eq!(sim.tracker().grid().verify_consistency(), Ok(()));
    }
    events
}

#[rstest]
fn flag_and_guard_are_indexed(sim: Simulation) {
    let grid = sim.tracker().grid();
    assert_eq!(grid.len(), 2);
    assert!(grid.contains(sim.flag().id));
    assert!(grid.contains(sim.agent().id()));
    assert_eq!(sim.tracker().entity_type_of(sim.agent().id()), Some(EntityType::Ant));
}

#[rstest]
fn guard_clears_a_small_wave(mut sim: Simulation) {
    sim.spawn_unit(EntityType::Beetle, at(31.0, 25.0));
    sim.spawn_unit(EntityType::Aphid, at(25.0, 33.0));
    sim.spawn_unit(EntityType::Ladybug, at(19.0, 21.0));

    let events = run(&mut sim, 600);

    let summary = sim.summary();
    assert_eq!(summary.remaining, 0);
    assert_eq!(summary.defeated, 3);
    assert_eq!(summary.mode, PursuitMode::Patrolling);
    let defeats = events
        .iter()
        .filter(|event| {
            matches!(
                event,
                PursuitEvent::TargetLost {
                    reason: LossReason::Defeated,
                    ..
                }
            )
        })
        .count();
    assert_eq!(defeats, 3);
    assert!(sim.roster().len() == 1, "only the guard should remain");
}

#[rstest]
fn distant_units_are_ignored_until_they_close_in(mut sim: Simulation) {
    let far = sim.spawn_unit(EntityType::Beetle, at(49.0, 49.0));
    run(&mut sim, 12);
    assert_eq!(sim.agent().target(), None);
    run(&mut sim, 200);
    assert!(sim.unit_position(far).is_none() || sim.agent().target() == Some(far));
}

#[rstest]
fn difficulty_broadcasts_to_the_guard(mut sim: Simulation) {
    sim.set_difficulty(DifficultyLevel::EASY);
    assert_eq!(sim.summary().level, DifficultyLevel::EASY);
    assert!((sim.agent().tuning().search_radius - 8.0).abs() < 1e-4);
    assert_eq!(sim.cycle_difficulty(), DifficultyLevel::MEDIUM);
}

#[rstest]
fn player_orders_are_followed(mut sim: Simulation) {
    let near = sim.spawn_unit(EntityType::Aphid, at(27.0, 25.0));
    let ordered = sim.spawn_unit(EntityType::Beetle, at(25.0, 31.0));
    assert!(sim.select_target(ordered));
    run(&mut sim, 1);
    assert_eq!(sim.agent().target(), Some(ordered));
    assert!(sim.unit_position(near).is_some());
}

#[rstest]
fn lazy_grid_runs_outside_the_eager_region() {
    let config = WardenConfig {
        grid: GridConfig {
            allocation: warden::config::CellAllocation::Lazy,
            ..GridConfig::default()
        },
        ..WardenConfig::default()
    };
    let objective = at(-40.0, -40.0);
    let mut sim = Simulation::new(&config, objective, 9).unwrap_or_else(|err| panic!("{err}"));
    sim.spawn_unit(EntityType::Beetle, at(-34.0, -40.0));
    run(&mut sim, 300);
    assert_eq!(sim.unit_count(), 0);
    assert!(sim.tracker().grid().cell_count() > 0);
}

#[rstest]
fn invalid_configuration_is_rejected() {
    let config = WardenConfig {
        grid: GridConfig {
            cell_size: -1.0,
            ..GridConfig::default()
        },
        ..WardenConfig::default()
    };
    assert!(Simulation::new(&config, OBJECTIVE, 1).is_err());
}
