//! The critical powerup: it shows up ahead of the player after the checkpoint, and walking
//! past it without picking it up rewinds the quest.

use bevy_ecs::{
    event::EventWriter,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::constants::powerup;
use crate::events::Effect;
use crate::level::WorldGenerator;
use crate::systems::components::{Body, CriticalPowerup, ItemBundle, Player};
use crate::systems::quest::{rewind, PowerupState, QuestState};
use crate::systems::traversal::Traversal;

/// Places the powerup on the rooftop `SPAWN_AHEAD` past the player once the checkpoint is set.
///
/// With no rooftop at that x (a gap) the spawn waits for a later frame.
pub fn powerup_spawn_system(
    mut commands: Commands,
    mut quest: ResMut<QuestState>,
    generator: Res<WorldGenerator>,
    players: Query<&Body, With<Player>>,
) {
    if quest.powerup != PowerupState::Pending || quest.hearts < powerup::CHECKPOINT_HEARTS {
        return;
    }

    let Ok(player) = players.single() else {
        return;
    };

    let x = player.position.x + powerup::SPAWN_AHEAD;
    let Some(top_y) = generator.top_surface_y_at(x) else {
        trace!(x, "No rooftop for the powerup yet");
        return;
    };

    let center = Vec2::new(x, top_y - powerup::SIZE / 2.0);
    let entity = commands.spawn((CriticalPowerup, ItemBundle::critical_powerup(center))).id();
    quest.powerup = PowerupState::Active { entity, x };
    debug!(x, top_y, "Critical powerup spawned");
}

/// Starts the rewind once the player is past the powerup by more than the miss margin.
pub fn powerup_miss_system(
    mut quest: ResMut<QuestState>,
    mut players: Query<(&mut Body, &mut Traversal), With<Player>>,
    mut effects: EventWriter<Effect>,
) {
    let PowerupState::Active { x, .. } = quest.powerup else {
        return;
    };

    let Ok((mut body, mut traversal)) = players.single_mut() else {
        return;
    };

    if body.position.x <= x + powerup::MISS_MARGIN {
        return;
    }

    rewind::start_rewind(&mut quest, &mut body, &mut traversal, &mut effects);
}
