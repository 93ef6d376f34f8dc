use bevy_ecs::{
    query::With,
    resource::Resource,
    system::{Query, Res, ResMut},
};
use tracing::debug;

use crate::constants::{fireball, hud, powerup, rescue};
use crate::systems::components::{Body, DeltaTime, Player};
use crate::systems::quest::{CompanionPhase, PowerupState, QuestMode, QuestState};
use crate::tween::Easing;

pub const END_TEXT: &str = "You saved Gwen!\nPress R to restart";
pub const INTRO_TEXT: &str = "Spidey, I am trapped!\nFind me and save me!";

/// Text the UI layer displays. Rewritten every frame from the quest state.
#[derive(Resource, Debug, Clone, PartialEq)]
pub struct Hud {
    pub quest_text: String,
    pub end_text: String,
    pub end_visible: bool,
    /// The companion's speech bubble shown when a scene starts.
    pub intro_text: String,
    pub intro_visible: bool,
    /// Bubble opacity; eases to zero over the fade once the dismiss delay passes.
    pub intro_alpha: f32,
    intro_elapsed: f32,
}

impl Default for Hud {
    fn default() -> Self {
        Self {
            quest_text: String::new(),
            end_text: String::new(),
            end_visible: false,
            intro_text: INTRO_TEXT.to_string(),
            intro_visible: true,
            intro_alpha: 1.0,
            intro_elapsed: 0.0,
        }
    }
}

impl Hud {
    /// Ages the intro bubble by `dt`, fading it out and finally hiding it.
    pub fn advance_intro(&mut self, dt: f32) {
        if !self.intro_visible {
            return;
        }

        self.intro_elapsed += dt;
        let fading = self.intro_elapsed - hud::INTRO_DISMISS_DELAY;
        if fading <= 0.0 {
            return;
        }

        if fading >= hud::INTRO_FADE {
            debug!("Intro bubble dismissed");
            self.intro_visible = false;
            self.intro_alpha = 0.0;
            self.intro_text.clear();
        } else {
            self.intro_alpha = 1.0 - Easing::SineInOut.apply(fading / hud::INTRO_FADE);
        }
    }
}

/// The quest line for the current state. `on_top` is whether the player stands on the tower top.
pub fn quest_message(quest: &QuestState, on_top: bool) -> String {
    match quest.mode {
        QuestMode::Won => return "Mission Complete".to_string(),
        QuestMode::Rewinding(_) => return "Reality glitching...\nRewinding...".to_string(),
        QuestMode::Reunion(_) => return "Saving Gwen...".to_string(),
        QuestMode::Playing => {}
    }

    if let Some(rescue) = &quest.rescue {
        if rescue.player_pull.is_some() {
            return "Web attached!\nPulling to tower top".to_string();
        }
        if matches!(rescue.phase, CompanionPhase::PulledUp(_)) {
            return "Webbing Gwen...\nPulling her up".to_string();
        }
    }

    if let Some(run) = quest.challenge.run() {
        return if run.dodged < fireball::DODGES_REQUIRED {
            format!("Fireballs incoming!\nJump dodge {}/{}", run.dodged, fireball::DODGES_REQUIRED)
        } else {
            "Giant fireball!\nPress E to web-throw".to_string()
        };
    }

    if let Some(rescue) = &quest.rescue {
        if rescue.is_falling() {
            return if on_top {
                "Gwen is falling!\nPress E to save her".to_string()
            } else {
                "Gwen is falling!\nPress E to zip to top".to_string()
            };
        }
        return "Rescue Gwen\nReach the tower top".to_string();
    }

    match quest.powerup {
        PowerupState::Active { .. } => return "Critical Powerup!\nDo not miss it".to_string(),
        PowerupState::Pending if quest.hearts >= powerup::CHECKPOINT_HEARTS => {
            return "Powerup incoming...\nStay sharp".to_string();
        }
        _ => {}
    }

    let hearts = quest.hearts.min(rescue::REQUIRED_HEARTS);
    format!("Find Gwen\nHearts {}/{}", hearts, rescue::REQUIRED_HEARTS)
}

pub fn hud_system(
    dt: Res<DeltaTime>,
    quest: Res<QuestState>,
    players: Query<&Body, With<Player>>,
    mut hud: ResMut<Hud>,
) {
    hud.advance_intro(dt.0);

    let on_top = match (&quest.rescue, players.single()) {
        (Some(rescue), Ok(player)) => rescue.is_on_top(player.position),
        _ => false,
    };

    let text = quest_message(&quest, on_top);
    if text != hud.quest_text {
        debug!(phase = %quest.phase(), text = text.replace('\n', " / "), "Quest text changed");
        hud.quest_text = text;
    }

    let won = quest.is_won();
    if won != hud.end_visible {
        hud.end_visible = won;
        hud.end_text = if won { END_TEXT.to_string() } else { String::new() };
    }
}
