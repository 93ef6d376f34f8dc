use std::time::{Duration, Instant};

use anyhow::Result;
use tracing::{debug, info, warn};

use crate::arcade::ArcadePhysics;
use crate::config::GameOptions;
use crate::constants::{swing, LOOP_TIME};
use crate::events::Effect;
use crate::game::Game;
use crate::systems::input::Key;
use crate::systems::traversal::web_origin;

fn sleep(value: Duration) {
    spin_sleep::sleep(value);
}

/// How the runner drives the game.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RunOptions {
    /// Frames to simulate before stopping; the run also stops on exit or win.
    pub frames: u64,
    /// Pace frames at 60 Hz instead of simulating as fast as possible.
    pub realtime: bool,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            frames: 60 * 60,
            realtime: false,
        }
    }
}

/// A stand-in for a player: runs right, jumps when blocked, and fires the action trigger
/// whenever it would do something useful.
#[derive(Debug, Default)]
pub struct Autopilot {
    jumping: bool,
    acting: bool,
}

impl Autopilot {
    /// Queues this frame's input on `game`.
    pub fn drive(&mut self, game: &mut Game) {
        let Some((body, contacts, traversal)) = game.player() else {
            return;
        };

        // Release last frame's action so the next press is a fresh edge
        if self.acting {
            game.key_event(Key::E, false);
            self.acting = false;
        }

        let blocked = contacts.against_wall();
        if blocked != self.jumping {
            game.key_event(Key::W, blocked);
            self.jumping = blocked;
        }

        let airborne = !contacts.grounded() && !traversal.is_swinging() && !traversal.is_scripted();
        let near_anchor = game
            .generator()
            .nearest_crane(web_origin(&body), swing::DETECT_RANGE)
            .is_some();
        let rescue = game.quest().rescue.is_some_and(|rescue| rescue.is_falling());
        let hazard = game.quest().challenge.run().is_some_and(|run| run.hazard.is_some());

        if (airborne && near_anchor && body.velocity.y > 0.0) || rescue || hazard {
            game.key_event(Key::E, true);
            self.acting = true;
        }
    }
}

pub struct App {
    pub game: Game,
    physics: ArcadePhysics,
    autopilot: Autopilot,
    run: RunOptions,
    quest_text: String,
}

impl App {
    pub fn new(options: GameOptions, run: RunOptions) -> Result<Self> {
        let mut game = Game::new(options)?;
        // Held for the whole run
        game.key_event(Key::D, true);

        Ok(Self {
            game,
            physics: ArcadePhysics::default(),
            autopilot: Autopilot::default(),
            run,
            quest_text: String::new(),
        })
    }

    /// Simulates one frame. Returns false once the run should stop.
    pub fn run_frame(&mut self) -> bool {
        let start = Instant::now();

        self.autopilot.drive(&mut self.game);
        let exit = self.game.step(&self.physics, LOOP_TIME.as_secs_f32());

        let effects = self.game.drain_effects();
        let bursts = effects
            .iter()
            .filter(|effect| matches!(effect, Effect::ParticleBurst { .. } | Effect::BombBurst { .. }))
            .count();
        if bursts > 0 {
            debug!(bursts, "Visual effects requested");
        }

        let hud = self.game.hud();
        if hud.quest_text != self.quest_text {
            self.quest_text = hud.quest_text.clone();
            info!(phase = %self.game.phase(), text = self.quest_text.replace('\n', " / "), "Quest update");
        }

        if self.run.realtime {
            if start.elapsed() < LOOP_TIME {
                let time = LOOP_TIME.saturating_sub(start.elapsed());
                if time != Duration::ZERO {
                    sleep(time);
                }
            } else {
                warn!("Game loop behind schedule by: {:?}", start.elapsed() - LOOP_TIME);
            }
        }

        !exit && !self.game.is_won()
    }

    /// Runs until the frame budget is spent, the game exits or the quest is won.
    pub fn run(&mut self) -> u64 {
        info!(loop_time = ?LOOP_TIME, frames = self.run.frames, realtime = self.run.realtime, "Starting game loop");

        let mut frames = 0;
        while frames < self.run.frames {
            frames += 1;
            if !self.run_frame() {
                break;
            }
        }

        let x = self.game.player().map(|(body, _, _)| body.position.x).unwrap_or_default();
        info!(frames, phase = %self.game.phase(), hearts = self.game.quest().hearts, x, "Run finished");
        frames
    }
}
