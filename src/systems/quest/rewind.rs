//! The rewind glitch: a short frozen sequence after which the quest returns to the checkpoint.

use bevy_ecs::{
    entity::Entity,
    event::EventWriter,
    query::With,
    system::{Commands, Query, Res, ResMut},
};
use tracing::{debug, info};

use crate::constants::powerup;
use crate::events::Effect;
use crate::level::WorldGenerator;
use crate::systems::components::{Body, DeltaTime, Player};
use crate::systems::generation::spawn_crane_visuals;
use crate::systems::quest::{Challenge, Hazard, PowerupState, QuestMode, QuestState};
use crate::systems::traversal::Traversal;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RewindGlitch {
    pub elapsed: f32,
    /// Elapsed time at which the next glitch tick fires.
    pub next_tick: f32,
}

impl Default for RewindGlitch {
    fn default() -> Self {
        Self {
            elapsed: 0.0,
            next_tick: powerup::REWIND_TICK,
        }
    }
}

impl RewindGlitch {
    /// Advances the glitch, returning how many ticks fired during this step.
    pub fn advance(&mut self, dt: f32) -> u32 {
        self.elapsed += dt;
        let mut ticks = 0;
        while self.next_tick <= self.elapsed && self.next_tick < powerup::REWIND_DURATION {
            self.next_tick += powerup::REWIND_TICK;
            ticks += 1;
        }
        ticks
    }

    pub fn is_finished(&self) -> bool {
        self.elapsed >= powerup::REWIND_DURATION
    }
}

/// Freezes the player and starts the glitch. Does nothing unless the quest is playing.
pub fn start_rewind(quest: &mut QuestState, body: &mut Body, traversal: &mut Traversal, effects: &mut EventWriter<Effect>) -> bool {
    if !quest.is_playing() {
        return false;
    }

    traversal.lock(body);
    quest.mode = QuestMode::Rewinding(RewindGlitch::default());
    effects.write(Effect::GlitchStart);
    effects.write(Effect::CameraShake {
        duration: powerup::REWIND_DURATION,
        intensity: powerup::REWIND_SHAKE_INTENSITY,
    });

    info!(x = body.position.x, hearts = quest.hearts, "Critical powerup missed, rewinding");
    true
}

/// Puts the quest back at the checkpoint: hearts, powerup, rescue and challenge all reset.
///
/// Despawns every entity the reset state no longer references and restores cranes the
/// rescue tower suppressed. The player is moved separately.
pub fn rollback(
    commands: &mut Commands,
    quest: &mut QuestState,
    generator: &mut WorldGenerator,
    hazards: impl IntoIterator<Item = Entity>,
) {
    quest.hearts = powerup::CHECKPOINT_HEARTS;

    if let PowerupState::Active { entity, .. } = quest.powerup {
        commands.entity(entity).try_despawn();
    }
    quest.powerup = PowerupState::Pending;

    if let Some(rescue) = quest.rescue.take() {
        commands.entity(rescue.tower).try_despawn();
        commands.entity(rescue.companion).try_despawn();
        let restored = generator.clear_tower();
        debug!(restored = restored.len(), "Cranes restored");
        spawn_crane_visuals(commands, generator, restored);
    }

    quest.challenge = Challenge::Idle;
    for hazard in hazards {
        commands.entity(hazard).despawn();
    }
}

/// Advances a running rewind and applies it when the glitch ends.
pub fn rewind_system(
    mut commands: Commands,
    dt: Res<DeltaTime>,
    mut quest: ResMut<QuestState>,
    mut generator: ResMut<WorldGenerator>,
    mut players: Query<(&mut Body, &mut Traversal), With<Player>>,
    hazards: Query<Entity, With<Hazard>>,
    mut effects: EventWriter<Effect>,
) {
    let QuestMode::Rewinding(mut glitch) = quest.mode else {
        return;
    };

    for _ in 0..glitch.advance(dt.0) {
        effects.write(Effect::GlitchTick);
    }

    if !glitch.is_finished() {
        quest.mode = QuestMode::Rewinding(glitch);
        return;
    }

    rollback(&mut commands, &mut quest, &mut generator, hazards.iter());

    if let Ok((mut body, mut traversal)) = players.single_mut() {
        body.teleport(quest.checkpoint);
        traversal.unlock(&mut body);
    }

    quest.mode = QuestMode::Playing;
    effects.write(Effect::GlitchEnd);
    info!(x = quest.checkpoint.x, y = quest.checkpoint.y, "Rewound to checkpoint");
}
