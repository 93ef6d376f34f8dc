use bevy_ecs::query::With;
use glam::Vec2;
use pretty_assertions::assert_eq;
use rooftop::app::{App, RunOptions};
use rooftop::arcade::ArcadePhysics;
use rooftop::config::GameOptions;
use rooftop::constants::{player, powerup, world};
use rooftop::game::Game;
use rooftop::systems::quest::{QuestMode, QuestPhase, QuestState, RewindGlitch};
use rooftop::systems::{Body, FrameCount, Key, PhysicsPaused, Player};
use speculoos::prelude::*;

mod common;
use common::DT;

fn new_game() -> Game {
    Game::new(GameOptions::default()).expect("Game should initialize")
}

fn place_player(game: &mut Game, feet: Vec2) {
    let mut query = game.world.query_filtered::<&mut Body, With<Player>>();
    let mut body = query.single_mut(&mut game.world).expect("Player should exist");
    body.teleport(feet);
}

#[test]
fn test_new_game_generates_ahead() {
    let mut game = new_game();

    assert_that(&(game.generator().frontier() >= world::GENERATE_AHEAD)).is_true();
    assert_that(&game.phase()).is_equal_to(QuestPhase::Collecting);
    let (body, _, _) = game.player().expect("Player should exist");
    assert_that(&body.position).is_equal_to(player::SPAWN);
}

#[test]
fn test_player_lands_on_first_rooftop() {
    let mut game = new_game();
    let physics = ArcadePhysics::default();

    for _ in 0..120 {
        game.step(&physics, DT);
    }

    // The default level opens with a 239 px tall building
    let (body, contacts, _) = game.player().expect("Player should exist");
    assert_that(&(body.position.y - (world::FLOOR_Y - 239.0)).abs()).is_less_than(1e-3);
    assert_that(&contacts.grounded()).is_true();
}

#[test]
fn test_same_seed_same_run() {
    let physics = ArcadePhysics::default();
    let mut a = new_game();
    let mut b = new_game();
    for game in [&mut a, &mut b] {
        game.key_event(Key::D, true);
        for frame in 0..600 {
            if frame % 40 == 0 {
                game.key_event(Key::W, frame % 80 == 0);
            }
            game.step(&physics, DT);
        }
    }

    assert_eq!(a.player(), b.player());
    assert_eq!(a.quest(), b.quest());
    assert_eq!(a.generator().buildings(), b.generator().buildings());
}

#[test]
fn test_running_extends_level() {
    let physics = ArcadePhysics::default();
    let mut game = new_game();
    let frontier = game.generator().frontier();

    game.key_event(Key::D, true);
    place_player(&mut game, Vec2::new(frontier - 100.0, 100.0));
    game.step(&physics, DT);

    let (body, _, _) = game.player().expect("Player should exist");
    assert_that(&(game.generator().frontier() >= body.position.x + world::GENERATE_AHEAD)).is_true();
}

#[test]
fn test_escape_exits() {
    let mut game = new_game();

    assert_that(&game.tick(DT)).is_false();
    game.key_event(Key::Escape, true);
    assert_that(&game.tick(DT)).is_true();
}

#[test]
fn test_restart_only_when_won() {
    let mut game = new_game();
    game.world.resource_mut::<QuestState>().hearts = 2;

    game.key_event(Key::R, true);
    game.tick(DT);
    assert_that(&game.quest().hearts).is_equal_to(2);

    game.key_event(Key::R, false);
    game.world.resource_mut::<QuestState>().mode = QuestMode::Won;
    game.key_event(Key::R, true);
    assert_that(&game.tick(DT)).is_false();

    assert_that(&game.quest().hearts).is_equal_to(0);
    assert_that(&game.is_won()).is_false();
    assert_that(&game.world.resource::<FrameCount>().0).is_equal_to(0);
}

#[test]
fn test_falling_out_respawns() {
    let mut game = new_game();
    place_player(&mut game, Vec2::new(300.0, world::FLOOR_Y + 20.0));

    game.tick(DT);

    let (body, _, _) = game.player().expect("Player should exist");
    assert_that(&body.position).is_equal_to(player::SPAWN);
}

#[test]
fn test_won_game_freezes_gameplay() {
    let physics = ArcadePhysics::default();
    let mut game = new_game();
    for _ in 0..120 {
        game.step(&physics, DT);
    }
    game.world.resource_mut::<QuestState>().mode = QuestMode::Won;
    game.world.resource_mut::<PhysicsPaused>().0 = true;
    let (before, _, _) = game.player().expect("Player should exist");

    game.key_event(Key::D, true);
    for _ in 0..30 {
        game.step(&physics, DT);
    }

    let (after, _, _) = game.player().expect("Player should exist");
    assert_that(&after).is_equal_to(before);
    assert_that(&game.hud().end_visible).is_true();
}

#[test]
fn test_hud_follows_quest() {
    let mut game = new_game();
    game.tick(DT);
    assert_that(&game.hud().quest_text.as_str()).is_equal_to("Find Gwen\nHearts 0/6");

    // The powerup lands on a rooftop ahead in the same frame the checkpoint count is reached
    game.world.resource_mut::<QuestState>().hearts = 3;
    game.tick(DT);
    assert_that(&game.phase()).is_equal_to(QuestPhase::PowerupActive);
    assert_that(&game.hud().quest_text.as_str()).is_equal_to("Critical Powerup!\nDo not miss it");
}

#[test]
fn test_app_runs_frame_budget() {
    let run = RunOptions {
        frames: 90,
        realtime: false,
    };
    let mut app = App::new(GameOptions::default(), run).expect("App should initialize");

    assert_that(&app.run()).is_equal_to(90);
    let (body, _, _) = app.game.player().expect("Player should exist");
    assert_that(&(body.position.x > player::SPAWN.x)).is_true();
}

#[test]
fn test_click_during_glitch_does_not_fire_after_rewind() {
    let mut game = new_game();
    let tip = game.generator().cranes()[0].tip();
    let checkpoint = tip + Vec2::new(-50.0, 150.0 + player::CENTER_OFFSET);
    {
        let mut quest = game.world.resource_mut::<QuestState>();
        quest.checkpoint = checkpoint;
        quest.mode = QuestMode::Rewinding(RewindGlitch {
            elapsed: powerup::REWIND_DURATION - 1.5 * DT,
            next_tick: powerup::REWIND_DURATION,
        });
    }

    // Last glitch frame
    game.pointer_down();
    game.tick(DT);
    assert_that(&matches!(game.quest().mode, QuestMode::Rewinding(_))).is_true();

    // Glitch ends and play resumes at the checkpoint
    game.tick(DT);
    assert_that(&game.quest().is_playing()).is_true();
    let (body, _, traversal) = game.player().expect("Player should exist");
    assert_that(&body.position).is_equal_to(checkpoint);
    assert_that(&traversal.is_swinging()).is_false();

    // A fresh click from the same spot does swing
    game.pointer_down();
    game.tick(DT);
    let (_, _, traversal) = game.player().expect("Player should exist");
    assert_that(&traversal.is_swinging()).is_true();
}
