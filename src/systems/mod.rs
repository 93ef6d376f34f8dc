//! The Entity-Component-System (ECS) module.
//!
//! This module contains all the ECS-related logic, including components, systems,
//! and resources.

pub mod arbiter;
pub mod collision;
pub mod components;
pub mod generation;
pub mod hud;
pub mod input;
pub mod item;
pub mod player;
pub mod quest;
pub mod stance;
pub mod traversal;

pub use self::arbiter::*;
pub use self::collision::*;
pub use self::components::*;
pub use self::generation::*;
pub use self::hud::*;
pub use self::input::*;
pub use self::item::*;
pub use self::player::*;
pub use self::stance::*;
pub use self::traversal::*;
