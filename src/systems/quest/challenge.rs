//! The fireball challenge guarding the rescue tower.
//!
//! Hazards come one at a time from ahead of the player. Small ones are jumped over; once
//! enough have been dodged a big one comes that has to be webbed, swung around the player
//! and thrown at the tower. Getting hit, or letting the big one through, sends the player
//! back to the level start.

use std::f32::consts::TAU;

use bevy_ecs::{
    entity::Entity,
    event::{EventReader, EventWriter},
    prelude::Component,
    query::{With, Without},
    system::{Commands, Query, Res, ResMut},
};
use glam::Vec2;
use tracing::{debug, info};

use crate::constants::fireball;
use crate::error::GameError;
use crate::events::{Effect, GameEvent};
use crate::systems::components::{Body, DeltaTime, Origin, Player, Sensor, SpawnPoint};
use crate::systems::quest::QuestState;
use crate::systems::traversal::{web_origin, Traversal};
use crate::tween::{Easing, Interp};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HazardSize {
    Small,
    Big,
}

impl HazardSize {
    /// The size of the next hazard after `dodged` small ones got past.
    pub fn after_dodges(dodged: u32) -> Self {
        if dodged >= fireball::DODGES_REQUIRED {
            HazardSize::Big
        } else {
            HazardSize::Small
        }
    }

    pub fn speed(self) -> f32 {
        match self {
            HazardSize::Small => fireball::SMALL_SPEED,
            HazardSize::Big => fireball::BIG_SPEED,
        }
    }

    pub fn extent(self) -> f32 {
        match self {
            HazardSize::Small => fireball::SMALL_SIZE,
            HazardSize::Big => fireball::BIG_SIZE,
        }
    }

    /// Height above the player's feet the hazard flies at.
    fn lift(self) -> f32 {
        match self {
            HazardSize::Small => fireball::SMALL_LIFT,
            HazardSize::Big => fireball::BIG_LIFT,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HazardMotion {
    /// Moving on its own velocity toward the player.
    Flying,
    /// Webbed and circling the player.
    Orbiting { elapsed: f32, start_angle: f32 },
    /// Released toward its target.
    Thrown(Interp),
}

#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Hazard {
    pub size: HazardSize,
    pub motion: HazardMotion,
}

impl Hazard {
    pub fn is_flying(&self) -> bool {
        self.motion == HazardMotion::Flying
    }

    pub fn is_webbed(&self) -> bool {
        !self.is_flying()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct ChallengeRun {
    pub dodged: u32,
    pub hazard: Option<Entity>,
    /// Countdown until the next hazard appears, when one is queued.
    pub spawn_in: Option<f32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Challenge {
    #[default]
    Idle,
    Running(ChallengeRun),
    Complete,
}

impl Challenge {
    /// A fresh run with the first hazard queued.
    pub fn begin() -> Self {
        Challenge::Running(ChallengeRun {
            dodged: 0,
            hazard: None,
            spawn_in: Some(fireball::FIRST_SPAWN_DELAY),
        })
    }

    pub fn is_running(&self) -> bool {
        matches!(self, Challenge::Running(_))
    }

    pub fn is_complete(&self) -> bool {
        *self == Challenge::Complete
    }

    pub fn run(&self) -> Option<&ChallengeRun> {
        match self {
            Challenge::Running(run) => Some(run),
            _ => None,
        }
    }
}

/// Whether the challenge applies at `player_x`: the rescue is set up, the powerup was
/// collected, the challenge is not done yet and the tower is in view.
pub fn should_run(quest: &QuestState, player_x: f32) -> bool {
    let Some(rescue) = &quest.rescue else {
        return false;
    };

    quest.powerup_collected()
        && !quest.challenge.is_complete()
        && player_x >= rescue.tower_x - fireball::CHALLENGE_VIEW_X
}

/// Whether the hazard is big, still flying, and within web range of `center` (inclusive).
pub fn can_throw(hazard: &Hazard, body: &Body, center: Vec2) -> bool {
    hazard.size == HazardSize::Big && hazard.is_flying() && center.distance(body.position) <= fireball::WEB_THROW_RANGE
}

/// Webs a big flying hazard within range of `center` and starts swinging it around.
pub fn try_throw(hazard: &mut Hazard, body: &mut Body, center: Vec2) -> bool {
    if !can_throw(hazard, body, center) {
        return false;
    }

    let start_angle = (body.position - center).to_angle();
    body.halt();
    hazard.motion = HazardMotion::Orbiting {
        elapsed: 0.0,
        start_angle,
    };
    true
}

fn spawn_hazard(commands: &mut Commands, size: HazardSize, player_feet: Vec2) -> Entity {
    let position = Vec2::new(player_feet.x + fireball::SPAWN_AHEAD, player_feet.y - size.lift());
    let mut body = Body::fixed(position, Vec2::splat(size.extent()), Origin::Center);
    body.immovable = false;
    body.velocity = Vec2::new(-size.speed(), 0.0);

    debug!(?size, x = position.x, y = position.y, "Hazard spawned");
    commands
        .spawn((
            Hazard {
                size,
                motion: HazardMotion::Flying,
            },
            body,
            Sensor,
        ))
        .id()
}

/// Drives an active challenge: starting it, spawning hazards, counting dodges and failing it.
#[allow(clippy::too_many_arguments)]
pub fn challenge_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    spawn: Res<SpawnPoint>,
    mut quest: ResMut<QuestState>,
    mut events: EventReader<GameEvent>,
    mut players: Query<(&mut Body, &mut Traversal), (With<Player>, Without<Hazard>)>,
    hazards: Query<(Entity, &Body, &Hazard), Without<Player>>,
    mut errors: EventWriter<GameError>,
) {
    let (mut body, mut traversal) = match players.single_mut() {
        Ok(player) => player,
        Err(e) => {
            errors.write(GameError::InvalidState(format!(
                "No/multiple entities queried for challenge system: {}",
                e
            )));
            return;
        }
    };

    let mut run = match quest.challenge {
        Challenge::Idle => {
            if should_run(&quest, body.position.x) {
                info!(x = body.position.x, "Fireball challenge started");
                quest.challenge = Challenge::begin();
            }
            return;
        }
        Challenge::Complete => return,
        Challenge::Running(run) => run,
    };

    let touched = events
        .read()
        .filter_map(|event| match event {
            GameEvent::Collision(_, other) => Some(*other),
            _ => None,
        })
        .filter(|other| hazards.get(*other).is_ok_and(|(_, _, hazard)| hazard.is_flying()))
        .count()
        > 0;

    let mut failed = touched;
    if let Some(entity) = run.hazard {
        match hazards.get(entity) {
            Ok((_, hazard_body, hazard)) if hazard.is_flying() => {
                let behind = body.position.x - hazard_body.position.x;
                match hazard.size {
                    HazardSize::Small if behind > fireball::SMALL_DODGE_BEHIND => {
                        commands.entity(entity).despawn();
                        run.hazard = None;
                        run.dodged += 1;
                        run.spawn_in = Some(fireball::NEXT_SPAWN_DELAY);
                        debug!(dodged = run.dodged, "Hazard dodged");
                    }
                    HazardSize::Big if behind > fireball::BIG_MISS_BEHIND => failed = true,
                    _ => {}
                }
            }
            Ok(_) => {}
            Err(_) => run.hazard = None,
        }
    }

    if failed {
        for (entity, _, _) in hazards.iter() {
            commands.entity(entity).despawn();
        }

        traversal.end_swing(&mut body);
        body.teleport(spawn.0);

        quest.challenge = if should_run(&quest, body.position.x) {
            Challenge::begin()
        } else {
            Challenge::Idle
        };
        info!(touched, "Fireball challenge failed, back to the start");
        return;
    }

    if run.hazard.is_none() {
        let remaining = run.spawn_in.get_or_insert(fireball::RESPAWN_DELAY);
        *remaining -= dt.0;
        if *remaining <= 0.0 {
            let size = HazardSize::after_dodges(run.dodged);
            run.hazard = Some(spawn_hazard(&mut commands, size, body.position));
            run.spawn_in = None;
        }
    }

    quest.challenge = Challenge::Running(run);
}

/// Advances webbed hazards: the orbit around the player, then the throw at the tower.
pub fn hazard_motion_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    mut quest: ResMut<QuestState>,
    players: Query<&Body, (With<Player>, Without<Hazard>)>,
    mut hazards: Query<(Entity, &mut Body, &mut Hazard), Without<Player>>,
    mut effects: EventWriter<Effect>,
) {
    let Ok(player) = players.single() else {
        return;
    };
    let center = web_origin(player);

    for (entity, mut body, mut hazard) in hazards.iter_mut() {
        match hazard.motion {
            HazardMotion::Flying => {}
            HazardMotion::Orbiting { elapsed, start_angle } => {
                let elapsed = elapsed + dt.0;
                let turn = Easing::SineInOut.apply(elapsed / fireball::ORBIT_DURATION);
                let angle = start_angle + turn * TAU * fireball::ORBIT_TURNS;
                body.position = center + Vec2::from_angle(angle) * fireball::ORBIT_RADIUS;
                effects.write(Effect::WebLine {
                    from: center,
                    to: body.position,
                });

                hazard.motion = if elapsed >= fireball::ORBIT_DURATION {
                    let target = match &quest.rescue {
                        Some(rescue) => Vec2::new(rescue.tower_x, rescue.tower_top_y + 40.0),
                        None => body.position + Vec2::new(fireball::WEB_THROW_DIST, -40.0),
                    };
                    debug!(target_x = target.x, target_y = target.y, "Hazard thrown");
                    HazardMotion::Thrown(Interp::new(body.position, target, fireball::THROW_DURATION, Easing::CubicIn))
                } else {
                    HazardMotion::Orbiting { elapsed, start_angle }
                };
            }
            HazardMotion::Thrown(mut interp) => {
                body.position = interp.advance(dt.0);
                effects.write(Effect::WebLine {
                    from: center,
                    to: body.position,
                });

                if !interp.is_finished() {
                    hazard.motion = HazardMotion::Thrown(interp);
                    continue;
                }

                effects.write(Effect::BombBurst { position: interp.to });
                effects.write(Effect::CameraShake {
                    duration: fireball::IMPACT_SHAKE,
                    intensity: fireball::IMPACT_SHAKE_INTENSITY,
                });
                commands.entity(entity).despawn();
                quest.challenge = Challenge::Complete;
                info!("Fireball challenge complete");
            }
        }
    }
}
