//! Movement modes of the player and the velocities each one asks for.
//!
//! Priority is Scripted > Swinging > Climbing > Normal: a scripted sequence owns the body
//! outright, a swing owns it until it times out, and climbing and running are decided fresh
//! every frame from the contact flags.

use bevy_ecs::{
    event::EventWriter,
    prelude::{Component, With},
    system::{Query, Res},
};
use glam::Vec2;
use tracing::{debug, trace};

use crate::constants::{player, swing};
use crate::events::Effect;
use crate::systems::components::{Body, Contacts, DeltaTime, Player};
use crate::systems::input::InputState;

/// An active swing around a crane tip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Swing {
    pub anchor: Vec2,
    pub elapsed: f32,
}

impl Swing {
    pub fn progress(&self) -> f32 {
        self.elapsed / swing::DURATION
    }
}

#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub enum Traversal {
    #[default]
    Normal,
    Climbing,
    Swinging(Swing),
    /// Position and velocity are owned by a scripted sequence.
    Scripted,
}

impl Traversal {
    pub fn is_swinging(&self) -> bool {
        matches!(self, Traversal::Swinging(_))
    }

    pub fn is_scripted(&self) -> bool {
        matches!(self, Traversal::Scripted)
    }

    /// Attaches to `anchor`. Rejected while swinging or scripted.
    pub fn start_swing(&mut self, body: &mut Body, anchor: Vec2) -> bool {
        if self.is_swinging() || self.is_scripted() {
            trace!(?self, "Swing rejected");
            return false;
        }

        let direction = if anchor.x >= body.position.x { 1.0 } else { -1.0 };
        body.gravity = false;
        body.velocity = Vec2::new(swing::BOOST_X * direction, swing::BOOST_Y);
        *self = Traversal::Swinging(Swing { anchor, elapsed: 0.0 });

        debug!(anchor_x = anchor.x, anchor_y = anchor.y, direction, "Swing started");
        true
    }

    /// Drops any swing without the release boost. No-op in other modes.
    pub fn end_swing(&mut self, body: &mut Body) {
        if self.is_swinging() {
            *self = Traversal::Normal;
            body.gravity = true;
        }
    }

    /// Hands the body over to a scripted sequence: any swing ends, motion stops, gravity is off.
    pub fn lock(&mut self, body: &mut Body) {
        self.end_swing(body);
        *self = Traversal::Scripted;
        body.gravity = false;
        body.halt();
    }

    /// Returns the body to free movement with gravity.
    pub fn unlock(&mut self, body: &mut Body) {
        if self.is_scripted() {
            *self = Traversal::Normal;
            body.gravity = true;
            body.halt();
        }
    }
}

/// Advances the player's movement mode by one frame.
///
/// Returns the anchor the web line should be drawn to while a swing is in progress.
pub fn steer(traversal: &mut Traversal, body: &mut Body, contacts: Contacts, input: &InputState, dt: f32) -> Option<Vec2> {
    match traversal {
        Traversal::Scripted => None,
        Traversal::Swinging(swing) => {
            swing.elapsed += dt;
            let anchor = swing.anchor;
            let pull = swing::ARC_PULL * swing.progress();
            body.velocity.y = swing::BOOST_Y + pull * 2.0;

            if swing.elapsed >= swing::DURATION {
                let released = Vec2::new(
                    body.velocity.x * swing::RELEASE_MULTIPLIER,
                    body.velocity.y.min(swing::RELEASE_MAX_VY),
                );
                *traversal = Traversal::Normal;
                body.gravity = true;
                body.velocity = released;
                debug!(vx = released.x, vy = released.y, "Swing released");
                return None;
            }

            Some(anchor)
        }
        Traversal::Normal | Traversal::Climbing => {
            if contacts.against_wall() && !contacts.grounded() {
                *traversal = Traversal::Climbing;
                body.gravity = false;
                body.velocity.x = 0.0;
                body.velocity.y = match (input.up(), input.down()) {
                    (true, false) => -player::CLIMB_SPEED,
                    (false, true) => player::CLIMB_SPEED,
                    _ => 0.0,
                };
                return None;
            }

            if *traversal == Traversal::Climbing {
                body.gravity = true;
            }
            *traversal = Traversal::Normal;

            body.velocity.x = match (input.left(), input.right()) {
                (true, false) => -player::RUN_SPEED,
                (false, true) => player::RUN_SPEED,
                _ => 0.0,
            };

            if input.jump() && contacts.grounded() {
                body.velocity.y = player::JUMP_VELOCITY;
            }

            None
        }
    }
}

/// The point the web attaches to on the player: roughly the body's center.
pub fn web_origin(body: &Body) -> Vec2 {
    body.position - Vec2::new(0.0, player::CENTER_OFFSET)
}

pub fn traversal_system(
    input: Res<InputState>,
    dt: Res<DeltaTime>,
    mut players: Query<(&mut Traversal, &mut Body, &Contacts), With<Player>>,
    mut effects: EventWriter<Effect>,
) {
    for (mut traversal, mut body, contacts) in players.iter_mut() {
        if let Some(anchor) = steer(&mut traversal, &mut body, *contacts, &input, dt.0) {
            effects.write(Effect::WebLine {
                from: web_origin(&body),
                to: anchor,
            });
        }
    }
}
