use std::ops::Range;

use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use tracing::trace;

use crate::config::GameOptions;
use crate::error::GameError;
use crate::level::{Extension, WorldGenerator};
use crate::systems::components::{Body, Building, Crane, Heart, ItemBundle, Player, Solid};

/// Spawns the visuals and obstacles for everything an `extend` call appended.
pub fn spawn_extension(commands: &mut Commands, generator: &mut WorldGenerator, extension: &Extension) {
    let floor_y = generator.floor_y();
    for building in &generator.buildings()[extension.buildings.clone()] {
        commands.spawn((Building, Solid(building.aabb(floor_y))));
    }

    spawn_crane_visuals(commands, generator, extension.cranes.clone());

    for heart in &extension.hearts {
        commands.spawn((Heart, ItemBundle::heart(*heart)));
    }
}

/// Spawns a visual for each crane in `range` and records it on the anchor.
pub fn spawn_crane_visuals(commands: &mut Commands, generator: &mut WorldGenerator, range: Range<usize>) {
    for index in range {
        let Some(tip) = generator.cranes().get(index).map(|crane| crane.tip()) else {
            continue;
        };
        let visual = commands.spawn(Crane { tip }).id();
        generator.attach_crane_visual(index, visual);
    }
}

/// Keeps the level generated `lookahead` pixels past the player.
pub fn generation_system(
    mut commands: Commands,
    options: Res<GameOptions>,
    mut generator: ResMut<WorldGenerator>,
    players: Query<&Body, With<Player>>,
    mut errors: EventWriter<GameError>,
) {
    let body = match players.single() {
        Ok(body) => body,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for generation system: {}",
                e
            )));
            return;
        }
    };

    let player_x = body.position.x;
    if !generator.needs_extension(player_x, options.lookahead) {
        return;
    }

    let extension = generator.extend(player_x + options.lookahead);
    trace!(player_x, frontier = generator.frontier(), "Generation pass");
    spawn_extension(&mut commands, &mut generator, &extension);
}

/// Builds the first window of the level, before any frame runs.
pub fn initial_generation_system(mut commands: Commands, options: Res<GameOptions>, mut generator: ResMut<WorldGenerator>) {
    let extension = generator.extend(options.lookahead);
    spawn_extension(&mut commands, &mut generator, &extension);
}
