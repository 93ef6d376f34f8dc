//! Resolves the single action trigger into one behavior.
//!
//! The decision is a pure function of an [`ActionContext`] snapshot, so the priority rules can
//! be checked without a world. [`arbiter_system`] builds the snapshot on every action edge and
//! applies whatever was chosen.

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, trace};

use crate::constants::swing;
use crate::error::GameError;
use crate::events::{Effect, GameCommand, GameEvent};
use crate::level::WorldGenerator;
use crate::systems::components::{Body, Companion, CosmeticRng, Player};
use crate::systems::quest::{challenge, tower, Hazard, QuestState};
use crate::systems::traversal::{web_origin, Traversal};

/// The one behavior an action edge resolves to.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    ThrowHazard(Entity),
    PullToTower,
    RescueCompanion,
    Swing(Vec2),
}

/// Everything the arbiter needs to know about the frame the trigger arrived in.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ActionContext {
    pub playing: bool,
    /// The active hazard, when it is big, still flying and within web range.
    pub throwable_hazard: Option<Entity>,
    pub challenge_running: bool,
    /// The companion is falling or being pulled, or the player is being pulled.
    pub rescue_engaged: bool,
    pub can_pull: bool,
    pub can_save: bool,
    /// Neither swinging nor in a scripted sequence.
    pub free: bool,
    /// Nearest crane tip within swing range of the player's center.
    pub anchor: Option<Vec2>,
}

/// Picks the highest-priority applicable action, or nothing.
pub fn arbitrate(context: &ActionContext) -> Option<Action> {
    if !context.playing {
        return None;
    }

    if let Some(hazard) = context.throwable_hazard {
        return Some(Action::ThrowHazard(hazard));
    }

    // Nothing else is allowed while fireballs are coming
    if context.challenge_running {
        return None;
    }

    if context.rescue_engaged {
        if context.can_pull {
            return Some(Action::PullToTower);
        }
        if context.can_save {
            return Some(Action::RescueCompanion);
        }
    }

    if context.free {
        return context.anchor.map(Action::Swing);
    }

    None
}

/// Applies the arbitrated action on every action edge.
///
/// Runs in every mode so its reader never holds edges across a mode change.
#[allow(clippy::too_many_arguments)]
pub fn arbiter_system(
    mut events: EventReader<GameEvent>,
    mut quest: ResMut<QuestState>,
    generator: Res<WorldGenerator>,
    mut rng: ResMut<CosmeticRng>,
    mut players: Query<(&mut Body, &mut Traversal), (With<Player>, Without<Companion>, Without<Hazard>)>,
    mut companions: Query<&mut Body, (With<Companion>, Without<Player>, Without<Hazard>)>,
    mut hazards: Query<(&mut Body, &mut Hazard), (Without<Player>, Without<Companion>)>,
    mut effects: EventWriter<Effect>,
    mut errors: EventWriter<GameError>,
) {
    let edges = events
        .read()
        .filter(|event| matches!(event, GameEvent::Command(GameCommand::Action)))
        .count();
    if edges == 0 {
        return;
    }

    // Edges raised outside play are consumed here so they cannot fire once play resumes
    if !quest.is_playing() {
        trace!(edges, mode = ?quest.mode, "Action trigger discarded outside play");
        return;
    }

    let (mut body, mut traversal) = match players.single_mut() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for arbiter system: {}",
                e
            )));
            return;
        }
    };

    for _ in 0..edges {
        let center = web_origin(&body);
        let throwable_hazard = quest
            .challenge
            .run()
            .and_then(|run| run.hazard)
            .filter(|entity| {
                hazards
                    .get(*entity)
                    .is_ok_and(|(hazard_body, hazard)| challenge::can_throw(hazard, hazard_body, center))
            });

        let rescue = quest.rescue;
        let companion = rescue.and_then(|rescue| companions.get(rescue.companion).ok());
        let context = ActionContext {
            playing: quest.is_playing(),
            throwable_hazard,
            challenge_running: quest.challenge.is_running(),
            rescue_engaged: rescue.is_some_and(|rescue| rescue.is_engaged()),
            can_pull: rescue.is_some_and(|rescue| tower::can_pull_player(&rescue, &body)),
            can_save: rescue
                .zip(companion)
                .is_some_and(|(rescue, companion)| tower::can_save_companion(&rescue, &body, companion)),
            free: !traversal.is_swinging() && !traversal.is_scripted(),
            anchor: generator
                .nearest_crane(center, swing::DETECT_RANGE)
                .map(|crane| crane.tip()),
        };

        let Some(action) = arbitrate(&context) else {
            trace!(?context, "Action trigger ignored");
            continue;
        };
        debug!(?action, "Action trigger resolved");

        match action {
            Action::ThrowHazard(entity) => {
                if let Ok((mut hazard_body, mut hazard)) = hazards.get_mut(entity) {
                    challenge::try_throw(&mut hazard, &mut hazard_body, center);
                }
            }
            Action::PullToTower => {
                if let Some(rescue) = quest.rescue.as_mut() {
                    tower::try_pull_player(rescue, &mut body, &mut traversal);
                }
            }
            Action::RescueCompanion => {
                let Some(rescue) = quest.rescue.as_mut() else {
                    continue;
                };
                match companions.get_mut(rescue.companion) {
                    Ok(mut companion) => {
                        tower::try_save_companion(rescue, &body, &mut companion);
                    }
                    Err(_) => {
                        errors.write(GameError::MissingEntity {
                            entity: rescue.companion,
                            component: "Body",
                        });
                    }
                }
            }
            Action::Swing(anchor) => {
                if traversal.start_swing(&mut body, anchor) {
                    effects.write(Effect::ParticleBurst {
                        position: body.position - Vec2::new(0.0, 20.0),
                        count: rng.0.random_range(2..=3),
                    });
                }
            }
        }
    }
}
