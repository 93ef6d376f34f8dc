//! Run options for a single game session.

use bevy_ecs::resource::Resource;

use crate::constants::world;

/// Options a scene is built from. A restart rebuilds the scene from the same options.
#[derive(Resource, Debug, Clone, Copy, PartialEq)]
pub struct GameOptions {
    /// Counter value the level's random sequence starts from. Zero reproduces the default level.
    pub seed: u32,
    /// Seed for cosmetic randomness (particle counts, reunion hops).
    pub cosmetic_seed: u64,
    /// How far ahead of the player the level is kept generated.
    pub lookahead: f32,
}

impl Default for GameOptions {
    fn default() -> Self {
        Self {
            seed: 0,
            cosmetic_seed: 0,
            lookahead: world::GENERATE_AHEAD,
        }
    }
}

impl GameOptions {
    pub fn with_seed(seed: u32) -> Self {
        Self { seed, ..Self::default() }
    }
}
