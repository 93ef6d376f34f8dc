use bevy_ecs::prelude::*;
use glam::Vec2;

/// Discrete commands produced by the input layer.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameCommand {
    Exit,
    /// The single contextual action (E key edge or pointer click).
    Action,
    Restart,
}

#[derive(Event, Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameEvent {
    Command(GameCommand),
    /// The player's box overlaps another entity's box.
    Collision(Entity, Entity),
    /// The player dropped into the death zone under the level.
    FellOut(Entity),
}

impl From<GameCommand> for GameEvent {
    fn from(command: GameCommand) -> Self {
        GameEvent::Command(command)
    }
}

/// Purely visual requests for the rendering collaborator. Gameplay never reads these back.
#[derive(Event, Clone, Copy, Debug, PartialEq)]
pub enum Effect {
    ParticleBurst { position: Vec2, count: u32 },
    /// Draw a web strand for this frame only.
    WebLine { from: Vec2, to: Vec2 },
    CameraShake { duration: f32, intensity: f32 },
    GlitchStart,
    GlitchTick,
    GlitchEnd,
    BombBurst { position: Vec2 },
}
