use bevy_ecs::entity::Entity;
use bevy_ecs::event::EventWriter;
use bevy_ecs::query::{With, Without};
use bevy_ecs::system::{Query, Res};

use crate::events::GameEvent;
use crate::geometry::Aabb;
use crate::level::WorldGenerator;
use crate::systems::components::{Body, Player, Sensor};

/// Whether two bodies' boxes overlap.
pub fn check_overlap(a: &Body, b: &Body) -> bool {
    a.aabb().overlaps(&b.aabb())
}

/// Detects the player overlapping sensors and the death zone.
///
/// Emits `GameEvent::Collision(player, sensor)` for every overlapping sensor, which the
/// item and challenge systems respond to, and `GameEvent::FellOut` when the player's box
/// reaches into the death zone under the level.
pub fn collision_system(
    generator: Res<WorldGenerator>,
    players: Query<(Entity, &Body), With<Player>>,
    sensors: Query<(Entity, &Body), (With<Sensor>, Without<Player>)>,
    mut events: EventWriter<GameEvent>,
) {
    let death_zone: Aabb = generator.death_zone();

    for (player, player_body) in players.iter() {
        for (sensor, sensor_body) in sensors.iter() {
            if check_overlap(player_body, sensor_body) {
                events.write(GameEvent::Collision(player, sensor));
            }
        }

        if player_body.aabb().overlaps(&death_zone) {
            events.write(GameEvent::FellOut(player));
        }
    }
}
