use bevy_ecs::system::RunSystemOnce;
use glam::Vec2;
use rooftop::constants::{player, stance};
use rooftop::systems::{is_idle, stance_system, Body, Contacts, Origin, Stance, StanceFrame, Traversal};
use speculoos::prelude::*;

mod common;
use common::{create_test_world, set_delta, spawn_test_player};

#[test]
fn test_stays_primary_before_delay() {
    let mut stance = Stance::default();

    stance.tick(true, stance::IDLE_DELAY - 0.1);

    assert_that(&stance.frame).is_equal_to(StanceFrame::Primary);
}

#[test]
fn test_breathes_after_delay_then_toggles() {
    let mut stance = Stance::default();

    stance.tick(true, 1.0);
    stance.tick(true, 1.0);
    assert_that(&stance.frame).is_equal_to(StanceFrame::Breath);

    stance.tick(true, 0.3);
    assert_that(&stance.frame).is_equal_to(StanceFrame::Breath);
    stance.tick(true, 0.3);
    assert_that(&stance.frame).is_equal_to(StanceFrame::Primary);
    stance.tick(true, stance::IDLE_INTERVAL);
    assert_that(&stance.frame).is_equal_to(StanceFrame::Breath);
}

#[test]
fn test_movement_resets() {
    let mut stance = Stance::default();
    stance.tick(true, 2.0);

    stance.tick(false, 0.1);

    assert_that(&stance).is_equal_to(Stance::default());
}

#[test]
fn test_idle_requires_standing_still_on_ground() {
    let mut body = Body::new(Vec2::new(10.0, 10.0), player::SIZE, Origin::BottomCenter);
    let normal = Traversal::Normal;

    assert_that(&is_idle(&body, Contacts::DOWN, &normal)).is_true();
    assert_that(&is_idle(&body, Contacts::empty(), &normal)).is_false();
    assert_that(&is_idle(&body, Contacts::DOWN | Contacts::LEFT, &normal)).is_false();
    assert_that(&is_idle(&body, Contacts::DOWN, &Traversal::Scripted)).is_false();

    body.velocity.x = 1.0;
    assert_that(&is_idle(&body, Contacts::DOWN, &normal)).is_false();
}

#[test]
fn test_stance_system_tracks_player() {
    let mut world = create_test_world();
    let player = spawn_test_player(&mut world, Vec2::new(100.0, 300.0));
    set_delta(&mut world, 1.0);

    for _ in 0..2 {
        world
            .run_system_once(stance_system)
            .expect("System should run successfully");
    }

    let stance = world.get::<Stance>(player).expect("Player should have a stance");
    assert_that(&stance.frame).is_equal_to(StanceFrame::Breath);
}
