use bevy_ecs::{entity::Entity, query::With, system::RunSystemOnce, world::World};
use glam::Vec2;
use rooftop::constants::{fireball, player};
use rooftop::events::Effect;
use rooftop::systems::quest::challenge::{self, challenge_system, hazard_motion_system};
use rooftop::systems::quest::{Challenge, ChallengeRun, Hazard, HazardMotion, HazardSize, PowerupState, QuestState};
use rooftop::systems::{web_origin, Body, Origin, Sensor};
use speculoos::prelude::*;

mod common;
use common::{
    create_test_world, drain_effects, player_body, send_collision_event, set_delta, spawn_test_player,
    spawn_test_rescue,
};

const TOWER_X: f32 = 2_000.0;

/// A world with the rescue set up, the powerup collected and the player in view of the tower.
fn challenge_world() -> (World, Entity) {
    let mut world = create_test_world();
    spawn_test_rescue(&mut world, TOWER_X);
    world.resource_mut::<QuestState>().powerup = PowerupState::Collected;
    let player = spawn_test_player(&mut world, Vec2::new(TOWER_X - 400.0, 420.0));
    (world, player)
}

fn spawn_hazard(world: &mut World, size: HazardSize, position: Vec2) -> Entity {
    let mut body = Body::fixed(position, Vec2::splat(size.extent()), Origin::Center);
    body.immovable = false;
    body.velocity = Vec2::new(-size.speed(), 0.0);
    world
        .spawn((
            Hazard {
                size,
                motion: HazardMotion::Flying,
            },
            body,
            Sensor,
        ))
        .id()
}

fn set_run(world: &mut World, run: ChallengeRun) {
    world.resource_mut::<QuestState>().challenge = Challenge::Running(run);
}

fn run(world: &World) -> ChallengeRun {
    *world
        .resource::<QuestState>()
        .challenge
        .run()
        .expect("Challenge should be running")
}

fn hazard_count(world: &mut World) -> usize {
    world.query_filtered::<(), With<Hazard>>().iter(world).count()
}

fn run_challenge(world: &mut World) {
    world
        .run_system_once(challenge_system)
        .expect("System should run successfully");
}

#[test]
fn test_should_run_conditions() {
    let (world, _) = challenge_world();
    let quest = world.resource::<QuestState>().clone();

    assert_that(&challenge::should_run(&quest, TOWER_X - fireball::CHALLENGE_VIEW_X)).is_true();
    assert_that(&challenge::should_run(&quest, TOWER_X - fireball::CHALLENGE_VIEW_X - 1.0)).is_false();

    let pending = QuestState {
        powerup: PowerupState::Pending,
        ..quest.clone()
    };
    assert_that(&challenge::should_run(&pending, TOWER_X)).is_false();

    let complete = QuestState {
        challenge: Challenge::Complete,
        ..quest
    };
    assert_that(&challenge::should_run(&complete, TOWER_X)).is_false();
}

#[test]
fn test_challenge_starts_in_view_of_tower() {
    let (mut world, _) = challenge_world();

    run_challenge(&mut world);

    assert_that(&run(&world)).is_equal_to(ChallengeRun {
        dodged: 0,
        hazard: None,
        spawn_in: Some(fireball::FIRST_SPAWN_DELAY),
    });
}

#[test]
fn test_first_hazard_after_delay() {
    let (mut world, _) = challenge_world();
    world.resource_mut::<QuestState>().challenge = Challenge::begin();
    set_delta(&mut world, fireball::FIRST_SPAWN_DELAY);

    run_challenge(&mut world);

    let hazard = run(&world).hazard.expect("Hazard should be spawned");
    let body = *world.get::<Body>(hazard).expect("Hazard should have a body");
    let feet = player_body(&mut world).position;
    assert_that(&body.position.x).is_equal_to(feet.x + fireball::SPAWN_AHEAD);
    assert_that(&body.position.y).is_equal_to(feet.y - fireball::SMALL_LIFT);
    assert_that(&body.velocity.x).is_equal_to(-fireball::SMALL_SPEED);
    assert_that(&world.get::<Hazard>(hazard).map(|hazard| hazard.size)).is_equal_to(Some(HazardSize::Small));
}

#[test]
fn test_big_hazard_after_three_dodges() {
    let (mut world, _) = challenge_world();
    set_run(
        &mut world,
        ChallengeRun {
            dodged: fireball::DODGES_REQUIRED,
            hazard: None,
            spawn_in: Some(0.01),
        },
    );

    run_challenge(&mut world);

    let hazard = run(&world).hazard.expect("Hazard should be spawned");
    assert_that(&world.get::<Hazard>(hazard).map(|hazard| hazard.size)).is_equal_to(Some(HazardSize::Big));
    let feet = player_body(&mut world).position;
    let body = *world.get::<Body>(hazard).expect("Hazard should have a body");
    assert_that(&body.position.y).is_equal_to(feet.y - fireball::BIG_LIFT);
}

#[test]
fn test_small_hazard_dodged() {
    let (mut world, _) = challenge_world();
    let feet = player_body(&mut world).position;
    let hazard = spawn_hazard(
        &mut world,
        HazardSize::Small,
        Vec2::new(feet.x - fireball::SMALL_DODGE_BEHIND - 1.0, feet.y - 12.0),
    );
    set_run(
        &mut world,
        ChallengeRun {
            dodged: 1,
            hazard: Some(hazard),
            spawn_in: None,
        },
    );

    run_challenge(&mut world);

    assert_that(&run(&world)).is_equal_to(ChallengeRun {
        dodged: 2,
        hazard: None,
        spawn_in: Some(fireball::NEXT_SPAWN_DELAY),
    });
    assert_that(&hazard_count(&mut world)).is_equal_to(0);
}

#[test]
fn test_hit_sends_player_back_to_start() {
    let (mut world, player) = challenge_world();
    let feet = player_body(&mut world).position;
    let hazard = spawn_hazard(&mut world, HazardSize::Small, feet + Vec2::new(5.0, -12.0));
    set_run(
        &mut world,
        ChallengeRun {
            dodged: 2,
            hazard: Some(hazard),
            spawn_in: None,
        },
    );
    send_collision_event(&mut world, player, hazard);

    run_challenge(&mut world);

    assert_that(&player_body(&mut world).position).is_equal_to(player::SPAWN);
    assert_that(&hazard_count(&mut world)).is_equal_to(0);
    // The start is out of view of the tower, so the run is over
    assert_that(&world.resource::<QuestState>().challenge).is_equal_to(Challenge::Idle);
}

#[test]
fn test_big_hazard_let_through_fails() {
    let (mut world, _) = challenge_world();
    let feet = player_body(&mut world).position;
    let hazard = spawn_hazard(
        &mut world,
        HazardSize::Big,
        Vec2::new(feet.x - fireball::BIG_MISS_BEHIND - 1.0, feet.y - 8.0),
    );
    set_run(
        &mut world,
        ChallengeRun {
            dodged: fireball::DODGES_REQUIRED,
            hazard: Some(hazard),
            spawn_in: None,
        },
    );

    run_challenge(&mut world);

    assert_that(&player_body(&mut world).position).is_equal_to(player::SPAWN);
    assert_that(&world.resource::<QuestState>().challenge).is_equal_to(Challenge::Idle);
}

#[test]
fn test_throw_rules() {
    let center = Vec2::new(100.0, 100.0);
    let in_range = Body::fixed(center + Vec2::new(fireball::WEB_THROW_RANGE, 0.0), Vec2::splat(36.0), Origin::Center);
    let big = Hazard {
        size: HazardSize::Big,
        motion: HazardMotion::Flying,
    };

    assert_that(&challenge::can_throw(&big, &in_range, center)).is_true();

    let small = Hazard {
        size: HazardSize::Small,
        ..big
    };
    assert_that(&challenge::can_throw(&small, &in_range, center)).is_false();

    let far = Body::fixed(center + Vec2::new(fireball::WEB_THROW_RANGE + 1.0, 0.0), Vec2::splat(36.0), Origin::Center);
    assert_that(&challenge::can_throw(&big, &far, center)).is_false();
}

#[test]
fn test_thrown_hazard_completes_challenge() {
    let (mut world, _) = challenge_world();
    let center = web_origin(&player_body(&mut world));
    let hazard = spawn_hazard(&mut world, HazardSize::Big, center + Vec2::new(100.0, 0.0));
    set_run(
        &mut world,
        ChallengeRun {
            dodged: fireball::DODGES_REQUIRED,
            hazard: Some(hazard),
            spawn_in: None,
        },
    );
    {
        let mut entity = world.entity_mut(hazard);
        let mut body = *entity.get::<Body>().expect("Hazard should have a body");
        let mut state = *entity.get::<Hazard>().expect("Hazard should exist");
        assert_that(&challenge::try_throw(&mut state, &mut body, center)).is_true();
        entity.insert((body, state));
    }

    set_delta(&mut world, fireball::ORBIT_DURATION);
    world
        .run_system_once(hazard_motion_system)
        .expect("System should run successfully");
    let motion = world.get::<Hazard>(hazard).map(|hazard| hazard.motion);
    assert_that(&matches!(motion, Some(HazardMotion::Thrown(_)))).is_true();

    set_delta(&mut world, fireball::THROW_DURATION);
    world
        .run_system_once(hazard_motion_system)
        .expect("System should run successfully");

    assert_that(&world.resource::<QuestState>().challenge).is_equal_to(Challenge::Complete);
    assert_that(&world.get_entity(hazard).is_err()).is_true();
    let effects = drain_effects(&mut world);
    assert_that(&effects.iter().any(|effect| matches!(effect, Effect::BombBurst { .. }))).is_true();
}
