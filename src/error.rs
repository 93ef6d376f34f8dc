//! Centralized error types for the game.
//!
//! Gameplay rejections (an action that does not apply right now) are not errors. These types
//! cover broken invariants, which systems report as events instead of panicking.

use bevy_ecs::entity::Entity;
use bevy_ecs::event::{Event, EventReader};
use tracing::warn;

/// Main error type for the game core.
#[derive(thiserror::Error, Debug, Event)]
pub enum GameError {
    #[error("Invalid state: {0}")]
    InvalidState(String),

    #[error("Entity {entity} is missing its {component} component")]
    MissingEntity { entity: Entity, component: &'static str },

    #[error("World error: {0}")]
    World(String),
}

/// Result type for game operations.
pub type GameResult<T> = Result<T, GameError>;

/// Drains reported errors into the log. Nothing else reads them.
pub fn error_logging_system(mut errors: EventReader<GameError>) {
    for error in errors.read() {
        warn!(%error, "Game error reported");
    }
}
