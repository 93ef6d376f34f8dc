//! The procedurally extended cityscape: the seeded random stream and the incremental generator.

pub mod generator;
pub mod random;

pub use generator::{BuildingSpec, CraneAnchor, Extension, Gap, TowerFootprint, WorldGenerator};
pub use random::SeededRandom;
