//! The rescue quest: heart gating, the critical powerup and its rewind, the companion's
//! tower, the fireball challenge, and the closing reunion.
//!
//! All quest progress lives in the [`QuestState`] resource. The top-level [`QuestMode`]
//! decides which systems run at all; the remaining records are orthogonal and only
//! combine in the ways the systems below allow.

use bevy_ecs::{entity::Entity, resource::Resource, system::Res};
use glam::Vec2;
use strum_macros::{Display, EnumIter};

use crate::constants::{player, powerup, rescue};
use crate::tween::Interp;

pub mod challenge;
pub mod critical;
pub mod reunion;
pub mod rewind;
pub mod tower;

pub use challenge::{Challenge, ChallengeRun, Hazard, HazardMotion, HazardSize};
pub use reunion::ReunionSequence;
pub use rewind::RewindGlitch;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PowerupState {
    /// Not on the map yet; spawns once enough hearts are collected.
    Pending,
    Active { entity: Entity, x: f32 },
    Collected,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CompanionPhase {
    Perched,
    Falling,
    /// Being webbed back to the tower top.
    PulledUp(Interp),
    Reunited,
}

/// The tower and companion pair, present once the rescue has been set up.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rescue {
    pub tower: Entity,
    pub companion: Entity,
    pub tower_x: f32,
    pub tower_top_y: f32,
    pub phase: CompanionPhase,
    /// The player zipping up to the tower top.
    pub player_pull: Option<Interp>,
}

impl Rescue {
    /// Feet position of the companion standing on the tower.
    pub fn perch(&self) -> Vec2 {
        Vec2::new(self.tower_x, self.tower_top_y + 1.0)
    }

    /// Where the player's web attaches when zipping up.
    pub fn top_anchor(&self) -> Vec2 {
        Vec2::new(self.tower_x, self.tower_top_y + 2.0)
    }

    pub fn is_falling(&self) -> bool {
        self.phase == CompanionPhase::Falling
    }

    pub fn is_pulling_companion(&self) -> bool {
        matches!(self.phase, CompanionPhase::PulledUp(_))
    }

    /// Whether a rescue action is what the action trigger means right now.
    pub fn is_engaged(&self) -> bool {
        self.is_falling() || self.is_pulling_companion() || self.player_pull.is_some()
    }

    /// Inclusive check that the player's feet are standing on (or close to) the tower top.
    pub fn is_on_top(&self, feet: Vec2) -> bool {
        feet.y <= self.tower_top_y + rescue::SAVE_TOP_Y_TOLERANCE
            && (feet.x - self.tower_x).abs() <= rescue::SAVE_TOP_X_TOLERANCE
    }

    pub fn is_in_trigger_range(&self, feet: Vec2) -> bool {
        (feet.x - self.tower_x).abs() <= rescue::TRIGGER_RANGE_X && feet.y <= self.tower_top_y + rescue::TRIGGER_RANGE_Y
    }
}

/// What the whole game is doing. Only `Playing` runs the gameplay systems.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum QuestMode {
    #[default]
    Playing,
    Rewinding(RewindGlitch),
    Reunion(ReunionSequence),
    /// Terminal; physics is paused until a restart.
    Won,
}

/// Label for the current quest state, for display and logging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display, EnumIter)]
pub enum QuestPhase {
    Collecting,
    PowerupPending,
    PowerupActive,
    RewindGlitch,
    RescuePending,
    RescueLoop,
    FireballChallenge,
    Reunion,
    Won,
}

#[derive(Resource, Debug, Clone, PartialEq)]
pub struct QuestState {
    pub hearts: u32,
    /// Where a rewind returns the player. Starts at the level spawn.
    pub checkpoint: Vec2,
    pub powerup: PowerupState,
    pub rescue: Option<Rescue>,
    pub challenge: Challenge,
    pub mode: QuestMode,
}

impl Default for QuestState {
    fn default() -> Self {
        Self {
            hearts: 0,
            checkpoint: player::SPAWN,
            powerup: PowerupState::Pending,
            rescue: None,
            challenge: Challenge::Idle,
            mode: QuestMode::Playing,
        }
    }
}

impl QuestState {
    pub fn is_playing(&self) -> bool {
        self.mode == QuestMode::Playing
    }

    pub fn is_won(&self) -> bool {
        self.mode == QuestMode::Won
    }

    pub fn powerup_collected(&self) -> bool {
        self.powerup == PowerupState::Collected
    }

    /// Counts a heart pickup. Returns true when this pickup reached the checkpoint count.
    pub fn collect_heart(&mut self, position: Vec2) -> bool {
        self.hearts += 1;
        if self.hearts == powerup::CHECKPOINT_HEARTS {
            self.checkpoint = position;
            return true;
        }
        false
    }

    pub fn phase(&self) -> QuestPhase {
        match self.mode {
            QuestMode::Won => return QuestPhase::Won,
            QuestMode::Rewinding(_) => return QuestPhase::RewindGlitch,
            QuestMode::Reunion(_) => return QuestPhase::Reunion,
            QuestMode::Playing => {}
        }

        if self.challenge.is_running() {
            return QuestPhase::FireballChallenge;
        }

        if let Some(rescue) = &self.rescue {
            return if rescue.is_engaged() {
                QuestPhase::RescueLoop
            } else {
                QuestPhase::RescuePending
            };
        }

        match self.powerup {
            PowerupState::Active { .. } => QuestPhase::PowerupActive,
            PowerupState::Pending if self.hearts >= powerup::CHECKPOINT_HEARTS => QuestPhase::PowerupPending,
            _ => QuestPhase::Collecting,
        }
    }
}

/// Run condition for every gameplay system.
pub fn is_playing(quest: Res<QuestState>) -> bool {
    quest.is_playing()
}

pub fn is_rewinding(quest: Res<QuestState>) -> bool {
    matches!(quest.mode, QuestMode::Rewinding(_))
}

pub fn is_reunion(quest: Res<QuestState>) -> bool {
    matches!(quest.mode, QuestMode::Reunion(_))
}
