//! Closing sequence: the player walks up to the companion, then both hop together.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::{With, Without},
    system::{Query, Res, ResMut},
};
use glam::Vec2;
use rand::Rng;
use tracing::{debug, info};

use crate::constants::reunion;
use crate::events::Effect;
use crate::systems::components::{Body, Companion, CosmeticRng, DeltaTime, PhysicsPaused, Player};
use crate::systems::quest::{QuestMode, QuestState};
use crate::systems::traversal::Traversal;
use crate::tween::{Easing, Interp};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ReunionStep {
    /// The player moves next to the companion, who bobs once.
    Approach { player: Interp, elapsed: f32 },
    /// One synchronized hop; `left` includes the current one.
    Hop { left: u32, elapsed: f32, player_y: f32 },
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ReunionSequence {
    pub companion: Entity,
    /// Where the companion stands between bobs and hops.
    pub companion_rest: Vec2,
    pub hops: u32,
    pub step: ReunionStep,
}

pub fn roll_hops(rng: &mut impl Rng) -> u32 {
    rng.random_range(reunion::MIN_HOPS..=reunion::MAX_HOPS)
}

/// Locks both characters in place and starts the approach.
pub fn begin(
    player: &mut Body,
    traversal: &mut Traversal,
    companion_entity: Entity,
    companion: &mut Body,
    hops: u32,
    effects: &mut EventWriter<Effect>,
) -> ReunionSequence {
    traversal.lock(player);
    companion.gravity = false;
    companion.immovable = true;
    companion.halt();

    effects.write(Effect::ParticleBurst {
        position: companion.position - Vec2::new(0.0, 30.0),
        count: 6,
    });

    let target = companion.position + Vec2::new(reunion::APPROACH_OFFSET_X, 0.0);
    ReunionSequence {
        companion: companion_entity,
        companion_rest: companion.position,
        hops,
        step: ReunionStep::Approach {
            player: Interp::new(player.position, target, reunion::APPROACH_DURATION, Easing::SineInOut),
            elapsed: 0.0,
        },
    }
}

/// Rise of a hop at `elapsed` seconds in: up, hold at the top, and back down.
pub fn hop_lift(elapsed: f32) -> f32 {
    let up = reunion::HOP_UP;
    let hold = reunion::HOP_HOLD;
    let eased = if elapsed < up {
        Easing::SineOut.apply(elapsed / up)
    } else if elapsed < up + hold {
        1.0
    } else {
        Easing::SineOut.apply(1.0 - (elapsed - up - hold) / up)
    };
    eased * reunion::HOP_HEIGHT
}

pub fn hop_duration() -> f32 {
    reunion::HOP_UP * 2.0 + reunion::HOP_HOLD
}

/// Upward bob of the companion during the approach: out and back over the whole approach.
fn bob_offset(elapsed: f32) -> f32 {
    let half = reunion::APPROACH_DURATION / 2.0;
    let eased = if elapsed < half {
        Easing::SineInOut.apply(elapsed / half)
    } else {
        Easing::SineInOut.apply(1.0 - (elapsed - half) / half)
    };
    eased * reunion::COMPANION_BOB
}

fn hop_or_finish(
    left: u32,
    player: &Body,
    companion: &Body,
    rng: &mut CosmeticRng,
    effects: &mut EventWriter<Effect>,
) -> Option<ReunionStep> {
    if left == 0 {
        return None;
    }

    effects.write(Effect::ParticleBurst {
        position: Vec2::new((player.position.x + companion.position.x) / 2.0, companion.position.y - 24.0),
        count: rng.0.random_range(5..=7),
    });
    debug!(left, "Reunion hop");
    Some(ReunionStep::Hop {
        left,
        elapsed: 0.0,
        player_y: player.position.y,
    })
}

fn finish(quest: &mut QuestState, paused: &mut PhysicsPaused) {
    quest.mode = QuestMode::Won;
    paused.0 = true;
    info!("Mission complete");
}

pub fn reunion_system(
    dt: Res<DeltaTime>,
    mut quest: ResMut<QuestState>,
    mut paused: ResMut<PhysicsPaused>,
    mut rng: ResMut<CosmeticRng>,
    mut players: Query<&mut Body, (With<Player>, Without<Companion>)>,
    mut companions: Query<&mut Body, (With<Companion>, Without<Player>)>,
    mut effects: EventWriter<Effect>,
) {
    let QuestMode::Reunion(mut sequence) = quest.mode else {
        return;
    };

    let (Ok(mut player), Ok(mut companion)) = (players.single_mut(), companions.get_mut(sequence.companion)) else {
        finish(&mut quest, &mut paused);
        return;
    };

    let next = match sequence.step {
        ReunionStep::Approach {
            player: mut approach,
            elapsed,
        } => {
            let elapsed = elapsed + dt.0;
            player.position = approach.advance(dt.0);
            companion.position.y = sequence.companion_rest.y - bob_offset(elapsed);

            if approach.is_finished() {
                companion.position = sequence.companion_rest;
                hop_or_finish(sequence.hops, &player, &companion, &mut rng, &mut effects)
            } else {
                Some(ReunionStep::Approach {
                    player: approach,
                    elapsed,
                })
            }
        }
        ReunionStep::Hop { left, elapsed, player_y } => {
            let elapsed = elapsed + dt.0;
            if elapsed >= hop_duration() {
                player.position.y = player_y;
                companion.position.y = sequence.companion_rest.y;
                hop_or_finish(left - 1, &player, &companion, &mut rng, &mut effects)
            } else {
                let lift = hop_lift(elapsed);
                player.position.y = player_y - lift;
                companion.position.y = sequence.companion_rest.y - lift;
                Some(ReunionStep::Hop { left, elapsed, player_y })
            }
        }
    };

    match next {
        Some(step) => {
            sequence.step = step;
            quest.mode = QuestMode::Reunion(sequence);
        }
        None => finish(&mut quest, &mut paused),
    }
}
