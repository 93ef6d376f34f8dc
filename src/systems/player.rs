use bevy_ecs::{
    event::EventReader,
    query::With,
    system::{Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::events::{GameCommand, GameEvent};
use crate::systems::components::{Body, GlobalState, Player, SpawnPoint};
use crate::systems::quest::QuestState;
use crate::systems::traversal::Traversal;

/// Applies the lifecycle commands: exit at any time, restart only once the quest is won.
pub fn command_system(mut events: EventReader<GameEvent>, quest: Res<QuestState>, mut state: ResMut<GlobalState>) {
    for event in events.read() {
        match event {
            GameEvent::Command(GameCommand::Exit) => {
                info!("Exit requested");
                state.exit = true;
            }
            GameEvent::Command(GameCommand::Restart) if quest.is_won() => {
                info!("Restart requested");
                state.restart_requested = true;
            }
            _ => {}
        }
    }
}

/// Sends a player that fell into the death zone back to the level start.
///
/// Quest progress is untouched; only the body moves.
pub fn respawn_system(
    mut events: EventReader<GameEvent>,
    spawn: Res<SpawnPoint>,
    mut players: Query<(&mut Body, &mut Traversal), With<Player>>,
) {
    for event in events.read() {
        let GameEvent::FellOut(entity) = *event else {
            continue;
        };

        let Ok((mut body, mut traversal)) = players.get_mut(entity) else {
            continue;
        };

        traversal.end_swing(&mut body);
        body.teleport(spawn.0);
        debug!(x = spawn.0.x, y = spawn.0.y, "Player fell out, respawned");
    }
}
