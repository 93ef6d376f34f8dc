#![allow(dead_code)]

use bevy_ecs::{
    entity::Entity,
    event::{EventRegistry, Events},
    query::With,
    world::World,
};
use glam::Vec2;
use rooftop::{
    config::GameOptions,
    constants::rescue,
    error::GameError,
    events::{Effect, GameCommand, GameEvent},
    level::{SeededRandom, TowerFootprint, WorldGenerator},
    systems::{
        quest::{CompanionPhase, QuestState, Rescue},
        Bindings, Body, CompanionBundle, Contacts, CosmeticRng, DeltaTime, GlobalState, Hud, InputQueue, InputState,
        PhysicsPaused, Player, PlayerBundle, RescueTower, Solid, SpawnPoint, Origin,
    },
};

pub const DT: f32 = 1.0 / 60.0;

/// Creates a world with every resource and event the gameplay systems expect.
pub fn create_test_world() -> World {
    let mut world = World::new();

    EventRegistry::register_event::<GameEvent>(&mut world);
    EventRegistry::register_event::<GameError>(&mut world);
    EventRegistry::register_event::<Effect>(&mut world);

    world.insert_resource(GameOptions::default());
    world.insert_resource(WorldGenerator::new(SeededRandom::new()));
    world.insert_resource(QuestState::default());
    world.insert_resource(GlobalState::default());
    world.insert_resource(SpawnPoint::default());
    world.insert_resource(PhysicsPaused::default());
    world.insert_resource(DeltaTime(DT));
    world.insert_resource(CosmeticRng::seeded(7));
    world.insert_resource(Bindings::default());
    world.insert_resource(InputQueue::default());
    world.insert_resource(InputState::default());
    world.insert_resource(Hud::default());

    world
}

/// Spawns the player with its feet at `feet`, standing on something.
pub fn spawn_test_player(world: &mut World, feet: Vec2) -> Entity {
    let mut bundle = PlayerBundle::at(feet);
    bundle.contacts = Contacts::DOWN;
    world.spawn(bundle).id()
}

pub fn player_body(world: &mut World) -> Body {
    *world
        .query_filtered::<&Body, With<Player>>()
        .single(world)
        .expect("Player should exist")
}

pub fn set_player_position(world: &mut World, feet: Vec2) {
    let mut query = world.query_filtered::<&mut Body, With<Player>>();
    let mut body = query.single_mut(world).expect("Player should exist");
    body.position = feet;
}

pub fn send_event(world: &mut World, event: GameEvent) {
    world.resource_mut::<Events<GameEvent>>().send(event);
}

pub fn send_action(world: &mut World) {
    send_event(world, GameEvent::Command(GameCommand::Action));
}

pub fn send_collision_event(world: &mut World, player: Entity, other: Entity) {
    send_event(world, GameEvent::Collision(player, other));
}

pub fn drain_effects(world: &mut World) -> Vec<Effect> {
    world.resource_mut::<Events<Effect>>().drain().collect()
}

pub fn drain_errors(world: &mut World) -> Vec<GameError> {
    world.resource_mut::<Events<GameError>>().drain().collect()
}

pub fn set_delta(world: &mut World, dt: f32) {
    world.insert_resource(DeltaTime(dt));
}

/// Raises the rescue tower at `tower_x` directly, with the companion perched on top.
pub fn spawn_test_rescue(world: &mut World, tower_x: f32) -> Rescue {
    let floor_y = world.resource::<WorldGenerator>().floor_y();
    let tower_top_y = floor_y - rescue::TOWER_HEIGHT;

    world.resource_mut::<WorldGenerator>().place_tower(TowerFootprint {
        center_x: tower_x,
        width: rescue::TOWER_WIDTH,
        height: rescue::TOWER_HEIGHT,
    });

    let body = Body::fixed(
        Vec2::new(tower_x, floor_y - rescue::TOWER_HEIGHT / 2.0),
        Vec2::new(rescue::TOWER_WIDTH, rescue::TOWER_HEIGHT),
        Origin::Center,
    );
    let tower = world.spawn((RescueTower, Solid(body.aabb()), body)).id();
    let companion = world
        .spawn(CompanionBundle::perched(Vec2::new(tower_x, tower_top_y + 1.0)))
        .id();

    let rescue = Rescue {
        tower,
        companion,
        tower_x,
        tower_top_y,
        phase: CompanionPhase::Perched,
        player_pull: None,
    };
    world.resource_mut::<QuestState>().rescue = Some(rescue);
    rescue
}

pub fn rescue_state(world: &World) -> Rescue {
    world.resource::<QuestState>().rescue.expect("Rescue should be set up")
}
