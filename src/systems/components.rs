use bevy_ecs::{bundle::Bundle, component::Component, resource::Resource};
use bitflags::bitflags;
use glam::Vec2;
use rand::{rngs::SmallRng, SeedableRng};

use crate::constants::{player, powerup, rescue, world};
use crate::geometry::Aabb;
use crate::systems::stance::Stance;
use crate::systems::traversal::Traversal;

/// Which point of the box `Body::position` refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Origin {
    /// Feet; used by characters standing on rooftops.
    BottomCenter,
    Center,
}

/// The physical state shared with the arcade collaborator.
///
/// The core writes velocities and flags, the collaborator integrates positions and
/// reports `Contacts`. Scripted sequences write positions directly.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Body {
    pub position: Vec2,
    pub velocity: Vec2,
    pub size: Vec2,
    pub origin: Origin,
    pub gravity: bool,
    /// Immovable bodies are never integrated by the collaborator.
    pub immovable: bool,
}

impl Body {
    pub fn new(position: Vec2, size: Vec2, origin: Origin) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            size,
            origin,
            gravity: true,
            immovable: false,
        }
    }

    /// A body that floats in place until something moves it.
    pub fn fixed(position: Vec2, size: Vec2, origin: Origin) -> Self {
        Self {
            gravity: false,
            immovable: true,
            ..Self::new(position, size, origin)
        }
    }

    pub fn aabb(&self) -> Aabb {
        match self.origin {
            Origin::BottomCenter => Aabb::from_bottom_center(self.position, self.size),
            Origin::Center => Aabb::from_center(self.position, self.size),
        }
    }

    /// Stops all motion, keeping the position.
    pub fn halt(&mut self) {
        self.velocity = Vec2::ZERO;
    }

    pub fn teleport(&mut self, position: Vec2) {
        self.position = position;
        self.velocity = Vec2::ZERO;
    }
}

bitflags! {
    /// Which sides of a body are resting against a solid, as reported by the collaborator.
    #[derive(Component, Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Contacts: u8 {
        const DOWN = 1 << 0;
        const LEFT = 1 << 1;
        const RIGHT = 1 << 2;
    }
}

impl Contacts {
    pub fn grounded(&self) -> bool {
        self.contains(Contacts::DOWN)
    }

    pub fn against_wall(&self) -> bool {
        self.intersects(Contacts::LEFT | Contacts::RIGHT)
    }
}

/// A tag component for the player-controlled character.
#[derive(Default, Component, Debug)]
pub struct Player;

/// A tag component for the companion waiting on the rescue tower.
#[derive(Default, Component, Debug)]
pub struct Companion;

#[derive(Default, Component, Debug)]
pub struct RescueTower;

#[derive(Default, Component, Debug)]
pub struct Heart;

#[derive(Default, Component, Debug)]
pub struct CriticalPowerup;

/// Visual for a generated building.
#[derive(Default, Component, Debug)]
pub struct Building;

/// Visual for a crane anchor; the anchor itself lives in the generator.
#[derive(Component, Debug, Clone, Copy)]
pub struct Crane {
    pub tip: Vec2,
}

/// A static obstacle the collaborator resolves `Collides` bodies against.
#[derive(Component, Debug, Clone, Copy)]
pub struct Solid(pub Aabb);

/// Marks bodies that are pushed out of solids (the player only).
#[derive(Default, Component, Debug)]
pub struct Collides;

/// Anything the player can pick up or get hit by, checked by box overlap.
#[derive(Default, Component, Debug)]
pub struct Sensor;

#[derive(Bundle)]
pub struct PlayerBundle {
    pub player: Player,
    pub body: Body,
    pub contacts: Contacts,
    pub traversal: Traversal,
    pub stance: Stance,
    pub collides: Collides,
}

impl PlayerBundle {
    pub fn at(position: Vec2) -> Self {
        Self {
            player: Player,
            body: Body::new(position, player::SIZE, Origin::BottomCenter),
            contacts: Contacts::empty(),
            traversal: Traversal::Normal,
            stance: Stance::default(),
            collides: Collides,
        }
    }
}

#[derive(Bundle)]
pub struct CompanionBundle {
    pub companion: Companion,
    pub body: Body,
}

impl CompanionBundle {
    pub fn perched(feet: Vec2) -> Self {
        Self {
            companion: Companion,
            body: Body::fixed(
                feet,
                Vec2::new(rescue::COMPANION_WIDTH, rescue::COMPANION_HEIGHT),
                Origin::BottomCenter,
            ),
        }
    }
}

#[derive(Bundle)]
pub struct ItemBundle {
    pub body: Body,
    pub sensor: Sensor,
}

impl ItemBundle {
    pub fn at(center: Vec2, size: f32) -> Self {
        Self {
            body: Body::fixed(center, Vec2::splat(size), Origin::Center),
            sensor: Sensor,
        }
    }

    pub fn heart(center: Vec2) -> Self {
        Self::at(center, world::HEART_HITBOX)
    }

    pub fn critical_powerup(center: Vec2) -> Self {
        Self::at(center, powerup::HITBOX)
    }
}

/// Global lifecycle flags written by the input layer.
#[derive(Resource, Debug, Default)]
pub struct GlobalState {
    pub exit: bool,
    /// Set by the restart command while the game is won; the game rebuilds itself after the frame.
    pub restart_requested: bool,
}

/// Seconds elapsed since the previous frame.
#[derive(Resource, Debug, Clone, Copy)]
pub struct DeltaTime(pub f32);

impl Default for DeltaTime {
    fn default() -> Self {
        Self(1.0 / 60.0)
    }
}

/// Number of frames simulated since the scene was built.
#[derive(Resource, Debug, Default, Clone, Copy)]
pub struct FrameCount(pub u64);

/// Where the player returns after falling out or failing the fireball challenge.
#[derive(Resource, Debug, Clone, Copy)]
pub struct SpawnPoint(pub Vec2);

impl Default for SpawnPoint {
    fn default() -> Self {
        Self(player::SPAWN)
    }
}

/// When set, the collaborator must not integrate any body.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct PhysicsPaused(pub bool);

/// Randomness for visuals only (particle counts, reunion hops). Seeded so runs replay.
#[derive(Resource, Debug)]
pub struct CosmeticRng(pub SmallRng);

impl CosmeticRng {
    pub fn seeded(seed: u64) -> Self {
        Self(SmallRng::seed_from_u64(seed))
    }
}

impl Default for CosmeticRng {
    fn default() -> Self {
        Self::seeded(0)
    }
}
