//! The rescue tower and the companion waiting on it.
//!
//! Getting close makes the companion jump off. From then on the action trigger either
//! zips the player up to the tower top or, from the top, webs the companion back up,
//! which starts the reunion. A companion that reaches the ground is put back on the
//! tower and the loop starts over.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, info, trace};

use crate::constants::rescue;
use crate::error::GameError;
use crate::events::Effect;
use crate::level::{TowerFootprint, WorldGenerator};
use crate::systems::components::{
    Body, Companion, CompanionBundle, CosmeticRng, Crane, DeltaTime, Origin, Player, RescueTower, Solid,
};
use crate::systems::quest::{challenge, reunion, CompanionPhase, QuestMode, QuestState, Rescue};
use crate::systems::traversal::{web_origin, Traversal};
use crate::tween::{Easing, Interp};

/// Whether [`try_pull_player`] would succeed for this body.
pub fn can_pull_player(rescue: &Rescue, body: &Body) -> bool {
    rescue.is_falling()
        && rescue.player_pull.is_none()
        && !rescue.is_on_top(body.position)
        && web_origin(body).distance(rescue.top_anchor()) <= rescue::PLAYER_PULL_RANGE
}

/// Whether [`try_save_companion`] would succeed: the player is on top and within web reach.
pub fn can_save_companion(rescue: &Rescue, player: &Body, companion: &Body) -> bool {
    // Distance is measured a little above both characters' feet
    let reach = Vec2::new(0.0, 10.0);
    rescue.is_falling()
        && rescue.is_on_top(player.position)
        && (player.position - reach).distance(companion.position - reach) <= rescue::WEB_SAVE_RANGE
}

/// Zips the player to the tower top while the companion is falling.
///
/// Rejected when the player is already on top or too far from the top anchor.
pub fn try_pull_player(rescue: &mut Rescue, body: &mut Body, traversal: &mut Traversal) -> bool {
    if !can_pull_player(rescue, body) {
        trace!("Pull to tower rejected");
        return false;
    }

    traversal.lock(body);
    let target = Vec2::new(rescue.tower_x, rescue.tower_top_y + 4.0);
    rescue.player_pull = Some(Interp::new(
        body.position,
        target,
        rescue::PLAYER_PULL_DURATION,
        Easing::SineOut,
    ));
    debug!(from_x = body.position.x, from_y = body.position.y, "Pulling player to tower top");
    true
}

/// Webs the falling companion back to the tower top, from the tower top.
pub fn try_save_companion(rescue: &mut Rescue, player: &Body, companion: &mut Body) -> bool {
    if !can_save_companion(rescue, player, companion) {
        trace!("Companion save rejected");
        return false;
    }

    companion.halt();
    rescue.phase = CompanionPhase::PulledUp(Interp::new(
        companion.position,
        rescue.perch(),
        rescue::COMPANION_PULL_DURATION,
        Easing::SineOut,
    ));
    debug!(companion_y = companion.position.y, "Webbing companion");
    true
}

fn start_fall(rescue: &mut Rescue, player_x: f32, companion: &mut Body) {
    // Jumps off the side away from the player
    let direction = if player_x <= companion.position.x { 1.0 } else { -1.0 };
    companion.position.x = rescue.tower_x + direction * (rescue::TOWER_WIDTH / 2.0 + rescue::FALL_EDGE_OFFSET);
    companion.immovable = false;
    companion.gravity = false;
    companion.velocity = Vec2::new(direction * rescue::FALL_DRIFT_X, rescue::FALL_SPEED);
    rescue.phase = CompanionPhase::Falling;
    debug!(direction, "Companion falling");
}

fn reset_perch(rescue: &mut Rescue, companion: &mut Body) {
    companion.teleport(rescue.perch());
    companion.immovable = true;
    companion.gravity = false;
    rescue.phase = CompanionPhase::Perched;
    debug!("Companion back on the tower");
}

/// Sets up the tower and companion once enough hearts are collected far enough into the level.
pub fn rescue_spawn_system(
    mut commands: Commands,
    mut quest: ResMut<QuestState>,
    mut generator: ResMut<WorldGenerator>,
    players: Query<&Body, With<Player>>,
    cranes: Query<Entity, With<Crane>>,
) {
    if quest.rescue.is_some() || quest.hearts < rescue::REQUIRED_HEARTS {
        return;
    }

    let Ok(player) = players.single() else {
        return;
    };
    if player.position.x < rescue::MIN_SPAWN_X {
        return;
    }

    let tower_x = player.position.x + rescue::SPAWN_AHEAD;
    let floor_y = generator.floor_y();
    let tower_top_y = floor_y - rescue::TOWER_HEIGHT;

    let suppressed = generator.place_tower(TowerFootprint {
        center_x: tower_x,
        width: rescue::TOWER_WIDTH,
        height: rescue::TOWER_HEIGHT,
    });
    for visual in suppressed.iter().filter_map(|crane| crane.visual) {
        if cranes.contains(visual) {
            commands.entity(visual).despawn();
        }
    }

    let tower_body = Body::fixed(
        Vec2::new(tower_x, floor_y - rescue::TOWER_HEIGHT / 2.0),
        Vec2::new(rescue::TOWER_WIDTH, rescue::TOWER_HEIGHT),
        Origin::Center,
    );
    let tower = commands.spawn((RescueTower, Solid(tower_body.aabb()), tower_body)).id();
    let perch = Vec2::new(tower_x, tower_top_y + 1.0);
    let companion = commands.spawn(CompanionBundle::perched(perch)).id();

    quest.rescue = Some(Rescue {
        tower,
        companion,
        tower_x,
        tower_top_y,
        phase: CompanionPhase::Perched,
        player_pull: None,
    });
    info!(tower_x, hearts = quest.hearts, "Rescue tower raised");
}

/// Triggers the companion's fall and keeps the fall going, resetting it at the ground.
///
/// On hold while the fireball challenge applies.
pub fn companion_system(
    mut quest: ResMut<QuestState>,
    generator: Res<WorldGenerator>,
    players: Query<&Body, (With<Player>, Without<Companion>)>,
    mut companions: Query<&mut Body, (With<Companion>, Without<Player>)>,
) {
    let Some(mut rescue) = quest.rescue else {
        return;
    };
    let Ok(player) = players.single() else {
        return;
    };

    if challenge::should_run(&quest, player.position.x) {
        return;
    }

    let Ok(mut companion) = companions.get_mut(rescue.companion) else {
        return;
    };

    match rescue.phase {
        CompanionPhase::Perched => {
            if rescue.is_in_trigger_range(player.position) {
                start_fall(&mut rescue, player.position.x, &mut companion);
            }
        }
        CompanionPhase::Falling => {
            companion.velocity.y = rescue::FALL_SPEED;
            if companion.position.y >= generator.floor_y() + rescue::FALL_RESET_DEPTH {
                reset_perch(&mut rescue, &mut companion);
            }
        }
        CompanionPhase::PulledUp(_) | CompanionPhase::Reunited => {}
    }

    quest.rescue = Some(rescue);
}

/// Advances the two rescue pulls. Finishing the companion's pull starts the reunion.
#[allow(clippy::too_many_arguments)]
pub fn rescue_pull_system(
    dt: Res<DeltaTime>,
    mut quest: ResMut<QuestState>,
    mut rng: ResMut<CosmeticRng>,
    mut players: Query<(&mut Body, &mut Traversal), (With<Player>, Without<Companion>)>,
    mut companions: Query<&mut Body, (With<Companion>, Without<Player>)>,
    mut effects: EventWriter<Effect>,
    mut errors: EventWriter<GameError>,
) {
    let Some(mut rescue) = quest.rescue else {
        return;
    };
    let (mut body, mut traversal) = match players.single_mut() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for rescue pull system: {}",
                e
            )));
            return;
        }
    };

    if let Some(mut pull) = rescue.player_pull {
        body.position = pull.advance(dt.0);
        effects.write(Effect::WebLine {
            from: web_origin(&body),
            to: rescue.top_anchor(),
        });

        if pull.is_finished() {
            rescue.player_pull = None;
            traversal.unlock(&mut body);
            debug!("Player reached the tower top");
        } else {
            rescue.player_pull = Some(pull);
        }
    }

    let CompanionPhase::PulledUp(mut interp) = rescue.phase else {
        quest.rescue = Some(rescue);
        return;
    };

    let Ok(mut companion) = companions.get_mut(rescue.companion) else {
        errors.write(GameError::MissingEntity {
            entity: rescue.companion,
            component: "Body",
        });
        rescue.phase = CompanionPhase::Perched;
        quest.rescue = Some(rescue);
        return;
    };

    companion.position = interp.advance(dt.0);
    effects.write(Effect::WebLine {
        from: web_origin(&body),
        to: companion.position - Vec2::new(0.0, 10.0),
    });

    if !interp.is_finished() {
        rescue.phase = CompanionPhase::PulledUp(interp);
        quest.rescue = Some(rescue);
        return;
    }

    companion.immovable = true;
    companion.gravity = false;
    companion.halt();
    effects.write(Effect::ParticleBurst {
        position: companion.position - Vec2::new(0.0, 20.0),
        count: rng.0.random_range(6..=8),
    });

    rescue.phase = CompanionPhase::Reunited;
    rescue.player_pull = None;
    quest.rescue = Some(rescue);

    let hops = reunion::roll_hops(&mut rng.0);
    let sequence = reunion::begin(&mut body, &mut traversal, rescue.companion, &mut companion, hops, &mut effects);
    quest.mode = QuestMode::Reunion(sequence);
    info!(hops, "Companion saved");
}
