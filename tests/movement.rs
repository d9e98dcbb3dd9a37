//! Every reference mover reaches its target and honours stop/resume.

use glam::Vec3;
use rstest::rstest;
use test_utils::at;
use warden::movement::{MovementKind, MovementStrategy};
use warden::{EntityType, Movement, ARRIVAL_THRESHOLD};

const DT: f32 = 1.0 / 30.0;

fn run_until_arrival(mover: &mut MovementStrategy, max_steps: u32) -> Option<u32> {
    (1..=max_steps).find(|_| mover.advance(DT))
}

#[rstest]
#[case::beetle(EntityType::Beetle, MovementKind::Direct)]
#[case::aphid(EntityType::Aphid, MovementKind::Physics)]
#[case::ladybug(EntityType::Ladybug, MovementKind::Eased)]
#[case::ant(EntityType::Ant, MovementKind::Direct)]
fn strategies_arrive(#[case] entity_type: EntityType, #[case] kind: MovementKind) {
    let speed = entity_type.profile().move_speed;
    let mut mover = MovementStrategy::for_entity_type(entity_type, at(0.0, 0.0), speed);
    assert_eq!(mover.kind(), kind);
    let target = at(6.0, -8.0);
    mover.set_target(target);

    let steps = run_until_arrival(&mut mover, 600);
    assert!(steps.is_some(), "{entity_type} never arrived");
    assert!(mover.position().distance(target) <= ARRIVAL_THRESHOLD + 1e-4);
}

#[rstest]
#[case(EntityType::Beetle)]
#[case(EntityType::Aphid)]
#[case(EntityType::Ladybug)]
fn stopped_movers_hold_position(#[case] entity_type: EntityType) {
    let mut mover = MovementStrategy::for_entity_type(entity_type, Vec3::ZERO, 3.0);
    mover.set_target(at(20.0, 0.0));
    for _ in 0..10 {
        mover.advance(DT);
    }
    mover.stop();
    // Physics bodies brake rather than halting instantly.
    for _ in 0..30 {
        mover.advance(DT);
    }
    let held = mover.position();
    for _ in 0..10 {
        mover.advance(DT);
    }
    assert!(mover.position().distance(held) < 1e-3);

    mover.resume();
    for _ in 0..10 {
        mover.advance(DT);
    }
    assert!(mover.position().x > held.x);
}

#[rstest]
fn speed_changes_take_effect(#[values(EntityType::Beetle, EntityType::Ladybug)] entity_type: EntityType) {
    let mut slow = MovementStrategy::for_entity_type(entity_type, Vec3::ZERO, 1.0);
    let mut fast = slow.clone();
    fast.set_speed(4.0);
    slow.set_target(at(10.0, 0.0));
    fast.set_target(at(10.0, 0.0));
    for _ in 0..15 {
        slow.advance(DT);
        fast.advance(DT);
    }
    assert!(fast.position().x > slow.position().x);
}
