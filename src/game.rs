//! This module contains the main game logic and state.

use bevy_ecs::event::{EventRegistry, Events};
use bevy_ecs::query::With;
use bevy_ecs::schedule::{IntoScheduleConfigs, Schedule, SystemSet};
use bevy_ecs::system::RunSystemOnce;
use bevy_ecs::world::World;
use tracing::{debug, error, info};

use crate::arcade::ArcadePhysics;
use crate::config::GameOptions;
use crate::constants::player;
use crate::error::{error_logging_system, GameError, GameResult};
use crate::events::{Effect, GameEvent};
use crate::formatter;
use crate::level::{SeededRandom, WorldGenerator};
use crate::systems::quest::{self, challenge, critical, is_playing, is_reunion, is_rewinding, reunion, rewind, tower, QuestState};
use crate::systems::{
    arbiter_system, collision_system, command_system, generation_system, hud_system, initial_generation_system,
    input_system, item_system, respawn_system, stance_system, traversal_system, Bindings, Body, Contacts, CosmeticRng,
    DeltaTime, FrameCount, GlobalState, Hud, InputEvent, InputQueue, InputState, Key, PhysicsPaused, Player, PlayerBundle,
    SpawnPoint,
};
use crate::systems::traversal::Traversal;

/// System sets, run in declaration order every frame.
#[derive(SystemSet, Debug, Hash, PartialEq, Eq, Clone)]
enum GameplaySet {
    /// Raw input into held state and command edges
    Input,
    /// Timed sequences that own the bodies they move
    Sequence,
    /// Free play; skipped outside `QuestMode::Playing` except the arbiter, which drains stale edges
    Update,
    /// Derived output: stance, HUD text, error logging
    Respond,
}

/// Core game state manager built on the Bevy ECS architecture.
///
/// Owns the `World` holding every entity and resource of one scene, and the `Schedule`
/// that advances it. The host feeds input through [`Game::key_event`] and
/// [`Game::pointer_down`], integrates bodies (see [`ArcadePhysics`]) and calls
/// [`Game::tick`] once per frame.
pub struct Game {
    pub world: World,
    pub schedule: Schedule,
}

impl Game {
    /// Builds a fresh scene: resources, the player at the level spawn and the first window of
    /// the level.
    ///
    /// # Errors
    ///
    /// Returns `GameError::World` if the initial generation pass cannot run.
    pub fn new(options: GameOptions) -> GameResult<Game> {
        info!(seed = options.seed, cosmetic_seed = options.cosmetic_seed, "Starting game initialization");

        let mut world = World::default();
        let mut schedule = Schedule::default();

        debug!("Setting up ECS event registry");
        Self::setup_ecs(&mut world);

        debug!("Inserting resources into ECS world");
        Self::insert_resources(&mut world, options);

        debug!("Configuring system execution schedule");
        Self::configure_schedule(&mut schedule);

        debug!("Spawning player entity");
        world.spawn(PlayerBundle::at(player::SPAWN));

        world
            .run_system_once(initial_generation_system)
            .map_err(|e| GameError::World(format!("Initial generation failed: {}", e)))?;

        info!(frontier = world.resource::<WorldGenerator>().frontier(), "Game initialization completed successfully");
        Ok(Game { world, schedule })
    }

    fn setup_ecs(world: &mut World) {
        EventRegistry::register_event::<GameError>(world);
        EventRegistry::register_event::<GameEvent>(world);
        EventRegistry::register_event::<Effect>(world);
    }

    fn insert_resources(world: &mut World, options: GameOptions) {
        world.insert_resource(WorldGenerator::new(SeededRandom::with_counter(options.seed)));
        world.insert_resource(CosmeticRng::seeded(options.cosmetic_seed));
        world.insert_resource(options);
        world.insert_resource(QuestState::default());
        world.insert_resource(GlobalState::default());
        world.insert_resource(SpawnPoint::default());
        world.insert_resource(PhysicsPaused::default());
        world.insert_resource(DeltaTime::default());
        world.insert_resource(FrameCount::default());
        world.insert_resource(Bindings::default());
        world.insert_resource(InputQueue::default());
        world.insert_resource(InputState::default());
        world.insert_resource(Hud::default());
    }

    fn configure_schedule(schedule: &mut Schedule) {
        let input_systems = (input_system, command_system).chain();

        let sequence_systems = (
            rewind::rewind_system.run_if(is_rewinding),
            reunion::reunion_system.run_if(is_reunion),
            tower::rescue_pull_system.run_if(is_playing),
            challenge::hazard_motion_system.run_if(is_playing),
        )
            .chain();

        // Each system re-checks the mode, so a rewind started mid-frame stops the rest
        let update_systems = (
            generation_system.run_if(is_playing),
            arbiter_system,
            (
                traversal_system,
                collision_system,
                item_system,
                respawn_system,
                critical::powerup_spawn_system,
                critical::powerup_miss_system,
                tower::rescue_spawn_system,
                challenge::challenge_system,
                tower::companion_system,
            )
                .chain()
                .distributive_run_if(is_playing),
        )
            .chain();

        let respond_systems = (stance_system, hud_system, error_logging_system).chain();

        schedule
            .add_systems((
                input_systems.in_set(GameplaySet::Input),
                sequence_systems.in_set(GameplaySet::Sequence),
                update_systems.in_set(GameplaySet::Update),
                respond_systems.in_set(GameplaySet::Respond),
            ))
            .configure_sets(
                (
                    GameplaySet::Input,
                    GameplaySet::Sequence,
                    GameplaySet::Update,
                    GameplaySet::Respond,
                )
                    .chain(),
            );
    }

    /// Queues a key transition for the next frame.
    pub fn key_event(&mut self, key: Key, pressed: bool) {
        self.world.resource_mut::<InputQueue>().0.push(InputEvent::Key { key, pressed });
    }

    /// Queues a pointer click for the next frame. Clicks are the action gesture.
    pub fn pointer_down(&mut self) {
        self.world.resource_mut::<InputQueue>().0.push(InputEvent::PointerDown);
    }

    /// Integrates bodies with `physics`, then runs one frame of game logic.
    pub fn step(&mut self, physics: &ArcadePhysics, dt: f32) -> bool {
        physics.step(&mut self.world, dt);
        self.tick(dt)
    }

    /// Executes one frame of game logic by running all scheduled ECS systems.
    ///
    /// A restart requested during the frame rebuilds the scene afterwards.
    ///
    /// # Returns
    ///
    /// `true` if the game should terminate (exit command received), `false` to continue
    pub fn tick(&mut self, dt: f32) -> bool {
        self.world.insert_resource(DeltaTime(dt));
        self.schedule.run(&mut self.world);

        // Swap event buffers so unread edges expire instead of piling up
        self.world.resource_mut::<Events<GameEvent>>().update();
        self.world.resource_mut::<Events<GameError>>().update();

        let frame = {
            let mut frames = self.world.resource_mut::<FrameCount>();
            frames.0 += 1;
            frames.0
        };
        formatter::publish_frame(frame);

        let state = self.world.resource::<GlobalState>();
        let (exit, restart) = (state.exit, state.restart_requested);

        if restart && !exit {
            if let Err(e) = self.restart() {
                error!("Failed to restart game: {}", e);
                return true;
            }
        }

        exit
    }

    /// Rebuilds the whole scene from the options it was created with.
    pub fn restart(&mut self) -> GameResult<()> {
        let options = *self.world.resource::<GameOptions>();
        info!("Restarting scene");
        *self = Game::new(options)?;
        formatter::publish_frame(0);
        Ok(())
    }

    /// Takes every visual effect requested since the last call.
    pub fn drain_effects(&mut self) -> Vec<Effect> {
        self.world.resource_mut::<Events<Effect>>().drain().collect()
    }

    pub fn quest(&self) -> &QuestState {
        self.world.resource::<QuestState>()
    }

    pub fn hud(&self) -> &Hud {
        self.world.resource::<Hud>()
    }

    pub fn generator(&self) -> &WorldGenerator {
        self.world.resource::<WorldGenerator>()
    }

    /// The player's body, contacts and traversal mode, if the player exists.
    pub fn player(&mut self) -> Option<(Body, Contacts, Traversal)> {
        self.world
            .query_filtered::<(&Body, &Contacts, &Traversal), With<Player>>()
            .single(&self.world)
            .ok()
            .map(|(body, contacts, traversal)| (*body, *contacts, *traversal))
    }

    pub fn phase(&self) -> quest::QuestPhase {
        self.quest().phase()
    }

    pub fn input(&self) -> InputState {
        *self.world.resource::<InputState>()
    }

    pub fn is_won(&self) -> bool {
        self.quest().is_won()
    }
}
