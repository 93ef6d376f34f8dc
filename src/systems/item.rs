use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::With,
    system::{Commands, Query, ResMut},
};
use rand::Rng;
use smallvec::SmallVec;
use tracing::{debug, info};

use crate::events::{Effect, GameEvent};
use crate::systems::components::{Body, CosmeticRng, CriticalPowerup, Heart, Player};
use crate::systems::quest::{PowerupState, QuestState};

/// What the player touched, for the item system.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemKind {
    Heart,
    CriticalPowerup,
}

/// Handles pickups reported by the collision system.
///
/// Hearts always count. The critical powerup only counts while it is the active one.
/// An item reported twice in one frame is only taken once.
pub fn item_system(
    mut commands: Commands,
    mut events: EventReader<GameEvent>,
    mut quest: ResMut<QuestState>,
    mut rng: ResMut<CosmeticRng>,
    players: Query<&Body, With<Player>>,
    hearts: Query<&Body, With<Heart>>,
    powerups: Query<&Body, With<CriticalPowerup>>,
    mut effects: EventWriter<Effect>,
) {
    let mut taken: SmallVec<[Entity; 4]> = SmallVec::new();

    for event in events.read() {
        let GameEvent::Collision(player, item) = *event else {
            continue;
        };
        if taken.contains(&item) {
            continue;
        }

        let kind = if hearts.contains(item) {
            ItemKind::Heart
        } else if powerups.contains(item) {
            ItemKind::CriticalPowerup
        } else {
            continue;
        };

        let (Ok(player_body), Ok(item_body)) = (players.get(player), hearts.get(item).or_else(|_| powerups.get(item))) else {
            continue;
        };

        match kind {
            ItemKind::Heart => {
                let checkpoint = quest.collect_heart(player_body.position);
                effects.write(Effect::ParticleBurst {
                    position: item_body.position,
                    count: rng.0.random_range(2..=3),
                });
                debug!(hearts = quest.hearts, "Heart collected");
                if checkpoint {
                    info!(x = player_body.position.x, y = player_body.position.y, "Checkpoint set");
                }
            }
            ItemKind::CriticalPowerup => {
                if !matches!(quest.powerup, PowerupState::Active { entity, .. } if entity == item) {
                    continue;
                }
                quest.powerup = PowerupState::Collected;
                effects.write(Effect::ParticleBurst {
                    position: item_body.position,
                    count: rng.0.random_range(8..=10),
                });
                info!("Critical powerup collected");
            }
        }

        taken.push(item);
        commands.entity(item).despawn();
    }
}
