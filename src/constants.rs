//! This module contains all the tunable constants used in the game.
//!
//! Units are world pixels, pixels-per-second and seconds unless otherwise specified.
//! The y axis points down, so "up" velocities are negative.

use std::time::Duration;

use glam::Vec2;

pub const LOOP_TIME: Duration = Duration::from_nanos((1_000_000_000.0 / 60.0) as u64);

/// The logical size of the viewport, in pixels.
pub const VIEWPORT_SIZE: Vec2 = Vec2::new(800.0, 600.0);

/// Static controls hint shown by the UI layer.
pub const CONTROLS_HINT: &str = "WASD: Move | W/Space: Jump | E/Click: Swing | E near Gwen: Save";

pub mod world {
    //! Level generation.

    /// World y of the ground line; buildings stand on it.
    pub const FLOOR_Y: f32 = 600.0;
    /// Exclusive upper bound of building heights.
    pub const MAX_BUILDING_HEIGHT: f32 = 380.0;
    pub const MIN_BUILDING_HEIGHT: f32 = 0.0;
    pub const MIN_BUILDING_WIDTH: f32 = 60.0;
    /// Exclusive upper bound of building widths.
    pub const MAX_BUILDING_WIDTH: f32 = 130.0;
    /// Buildings shorter than this are holes and get a crane above them.
    pub const HOLE_HEIGHT_THRESHOLD: f32 = 100.0;
    /// Smallest number of buildings in a cluster.
    pub const MIN_CLUSTER_SIZE: u32 = 4;
    /// Number of distinct cluster sizes above the minimum (4, 5 or 6).
    pub const CLUSTER_SIZE_SPREAD: u32 = 3;
    pub const MIN_GAP_WIDTH: f32 = 50.0;
    /// Range added on top of `MIN_GAP_WIDTH` (exclusive).
    pub const GAP_WIDTH_SPREAD: f32 = 60.0;
    /// How far ahead of the player the level is kept generated.
    pub const GENERATE_AHEAD: f32 = 900.0;
    /// How far past the frontier the death zone reaches.
    pub const DEATH_ZONE_MARGIN: f32 = 400.0;
    pub const DEATH_ZONE_HEIGHT: f32 = 40.0;
    /// Lowest y a body can reach before the world bounds stop it.
    pub const WORLD_BOTTOM: f32 = 660.0;
    /// Cranes hang from the top of the screen; this is the y of their tip.
    pub const CRANE_TIP_Y: f32 = 180.0;
    pub const CRANE_WIDTH: f32 = 10.0;
    /// Hearts only appear on buildings at least this tall.
    pub const HEART_MIN_BUILDING_HEIGHT: f32 = 50.0;
    pub const HEART_SPAWN_CHANCE: f32 = 0.35;
    pub const HEART_SIZE: f32 = 28.0;
    /// Pickup box of a heart, slightly inside its sprite.
    pub const HEART_HITBOX: f32 = 24.0;
}

pub mod player {
    use glam::Vec2;

    /// Level start, also the respawn point after a death or a failed challenge.
    pub const SPAWN: Vec2 = Vec2::new(50.0, 180.0);
    /// Collision box, anchored at the bottom-center of the body.
    pub const SIZE: Vec2 = Vec2::new(28.0, 46.0);
    /// Offset from the feet to the body's visual center (web attachment point).
    pub const CENTER_OFFSET: f32 = 24.0;
    pub const RUN_SPEED: f32 = 160.0;
    pub const JUMP_VELOCITY: f32 = -330.0;
    pub const CLIMB_SPEED: f32 = 120.0;
    pub const GRAVITY: f32 = 550.0;
}

pub mod swing {
    /// How close the player's center must be to a crane tip to swing.
    pub const DETECT_RANGE: f32 = 200.0;
    /// How long a swing lasts before auto-release.
    pub const DURATION: f32 = 0.6;
    pub const BOOST_X: f32 = 280.0;
    pub const BOOST_Y: f32 = -350.0;
    /// Downward pull reached at the end of the swing.
    pub const ARC_PULL: f32 = 400.0;
    pub const RELEASE_MULTIPLIER: f32 = 1.1;
    /// Vertical velocity on release is clamped to at most this (i.e. at least this much upward).
    pub const RELEASE_MAX_VY: f32 = -100.0;
}

pub mod powerup {
    /// Hearts required before the critical powerup appears, also the checkpoint count.
    pub const CHECKPOINT_HEARTS: u32 = 3;
    pub const SIZE: f32 = 34.0;
    pub const HITBOX: f32 = 32.0;
    pub const SPAWN_AHEAD: f32 = 260.0;
    pub const MISS_MARGIN: f32 = 130.0;
    pub const REWIND_DURATION: f32 = 1.2;
    pub const REWIND_TICK: f32 = 0.07;
    pub const REWIND_SHAKE_INTENSITY: f32 = 0.007;
}

pub mod rescue {
    pub const REQUIRED_HEARTS: u32 = 6;
    pub const MIN_SPAWN_X: f32 = 1600.0;
    pub const SPAWN_AHEAD: f32 = 560.0;
    pub const TOWER_WIDTH: f32 = 150.0;
    pub const TOWER_HEIGHT: f32 = 470.0;
    /// Cranes within this horizontal distance of the tower are removed or never placed.
    pub const CRANE_EXCLUSION_RANGE: f32 = 260.0;
    pub const COMPANION_WIDTH: f32 = 34.0;
    pub const COMPANION_HEIGHT: f32 = 50.0;
    pub const TRIGGER_RANGE_X: f32 = 200.0;
    pub const TRIGGER_RANGE_Y: f32 = 220.0;
    pub const FALL_SPEED: f32 = 55.0;
    pub const FALL_DRIFT_X: f32 = 18.0;
    /// The companion is placed this far beyond the tower edge when it jumps.
    pub const FALL_EDGE_OFFSET: f32 = 18.0;
    /// The companion resets to the tower top once its feet pass this far below the floor.
    pub const FALL_RESET_DEPTH: f32 = 10.0;
    pub const WEB_SAVE_RANGE: f32 = 420.0;
    pub const SAVE_TOP_X_TOLERANCE: f32 = 130.0;
    pub const SAVE_TOP_Y_TOLERANCE: f32 = 72.0;
    pub const PLAYER_PULL_RANGE: f32 = 260.0;
    pub const PLAYER_PULL_DURATION: f32 = 0.46;
    pub const COMPANION_PULL_DURATION: f32 = 0.56;
}

pub mod fireball {
    pub const CHALLENGE_VIEW_X: f32 = 480.0;
    pub const DODGES_REQUIRED: u32 = 3;
    pub const SMALL_SPEED: f32 = 250.0;
    pub const BIG_SPEED: f32 = 210.0;
    pub const SMALL_SIZE: f32 = 28.0;
    pub const BIG_SIZE: f32 = 36.0;
    pub const SPAWN_AHEAD: f32 = 520.0;
    /// Height above the player's feet each hazard size flies at.
    pub const SMALL_LIFT: f32 = 12.0;
    pub const BIG_LIFT: f32 = 8.0;
    /// A small hazard counts as dodged once it is this far behind the player.
    pub const SMALL_DODGE_BEHIND: f32 = 70.0;
    /// A big hazard this far behind the player was missed.
    pub const BIG_MISS_BEHIND: f32 = 160.0;
    pub const WEB_THROW_RANGE: f32 = 150.0;
    /// Throw distance used when no tower exists to aim at.
    pub const WEB_THROW_DIST: f32 = 520.0;
    pub const ORBIT_RADIUS: f32 = 56.0;
    pub const ORBIT_TURNS: f32 = 2.0;
    pub const ORBIT_DURATION: f32 = 0.52;
    pub const THROW_DURATION: f32 = 0.56;
    pub const FIRST_SPAWN_DELAY: f32 = 0.42;
    pub const NEXT_SPAWN_DELAY: f32 = 0.38;
    pub const RESPAWN_DELAY: f32 = 0.45;
    pub const IMPACT_SHAKE: f32 = 0.22;
    pub const IMPACT_SHAKE_INTENSITY: f32 = 0.004;
}

pub mod reunion {
    pub const APPROACH_DURATION: f32 = 0.85;
    /// The player stops this far to the left of the companion.
    pub const APPROACH_OFFSET_X: f32 = -18.0;
    pub const COMPANION_BOB: f32 = 8.0;
    pub const HOP_HEIGHT: f32 = 20.0;
    pub const HOP_UP: f32 = 0.12;
    pub const HOP_HOLD: f32 = 0.03;
    pub const MIN_HOPS: u32 = 2;
    pub const MAX_HOPS: u32 = 3;
}

pub mod hud {
    /// Seconds the companion's opening plea stays up before fading.
    pub const INTRO_DISMISS_DELAY: f32 = 9.0;
    pub const INTRO_FADE: f32 = 0.55;
}

pub mod stance {
    /// Time standing still before the idle animation starts.
    pub const IDLE_DELAY: f32 = 1.5;
    /// Time between idle frame toggles.
    pub const IDLE_INTERVAL: f32 = 0.45;
}
