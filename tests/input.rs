use bevy_ecs::{event::Events, system::RunSystemOnce};
use rooftop::events::{GameCommand, GameEvent};
use rooftop::systems::{input_system, Bindings, Controls, InputEvent, InputQueue, InputState, Key};
use speculoos::prelude::*;

mod common;
use common::create_test_world;

fn commands(world: &mut bevy_ecs::world::World) -> Vec<GameEvent> {
    world.resource_mut::<Events<GameEvent>>().drain().collect()
}

#[test]
fn test_default_bindings_hold() {
    let mut bindings = Bindings::default();

    bindings.apply(Key::A, true);
    bindings.apply(Key::W, true);

    assert_that(&bindings.held()).is_equal_to(Controls::LEFT | Controls::UP | Controls::JUMP);
}

#[test]
fn test_release_clears_control() {
    let mut bindings = Bindings::default();
    bindings.apply(Key::D, true);
    bindings.apply(Key::Right, true);

    bindings.apply(Key::D, false);
    assert_that(&bindings.held()).is_equal_to(Controls::RIGHT);

    bindings.apply(Key::Right, false);
    assert_that(&bindings.held()).is_equal_to(Controls::empty());
}

#[test]
fn test_command_fires_on_fresh_press_only() {
    let mut bindings = Bindings::default();

    assert_that(&bindings.apply(Key::E, true)).is_equal_to(Some(GameCommand::Action));
    assert_that(&bindings.apply(Key::E, true)).is_none();
    assert_that(&bindings.apply(Key::E, false)).is_none();
    assert_that(&bindings.apply(Key::E, true)).is_equal_to(Some(GameCommand::Action));
}

#[test]
fn test_command_keys() {
    let mut bindings = Bindings::default();

    assert_that(&bindings.apply(Key::R, true)).is_equal_to(Some(GameCommand::Restart));
    assert_that(&bindings.apply(Key::Escape, true)).is_equal_to(Some(GameCommand::Exit));
    assert_that(&bindings.apply(Key::Space, true)).is_none();
}

#[test]
fn test_input_system_edges_and_held() {
    let mut world = create_test_world();
    world.resource_mut::<InputQueue>().0.extend([
        InputEvent::Key { key: Key::D, pressed: true },
        InputEvent::Key { key: Key::E, pressed: true },
        InputEvent::Key { key: Key::E, pressed: true },
        InputEvent::PointerDown,
    ]);

    world
        .run_system_once(input_system)
        .expect("System should run successfully");

    assert_that(&commands(&mut world)).is_equal_to(vec![
        GameEvent::Command(GameCommand::Action),
        GameEvent::Command(GameCommand::Action),
    ]);
    assert_that(&world.resource::<InputState>().right()).is_true();
    assert_that(&world.resource::<InputQueue>().0.is_empty()).is_true();
}

#[test]
fn test_held_state_persists_across_frames() {
    let mut world = create_test_world();
    world
        .resource_mut::<InputQueue>()
        .0
        .push(InputEvent::Key { key: Key::Space, pressed: true });

    for _ in 0..2 {
        world
            .run_system_once(input_system)
            .expect("System should run successfully");
    }

    assert_that(&world.resource::<InputState>().jump()).is_true();
    assert_that(&commands(&mut world).is_empty()).is_true();
}
