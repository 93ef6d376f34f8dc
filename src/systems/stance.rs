use bevy_ecs::{
    prelude::{Component, With},
    system::{Query, Res},
};
use glam::Vec2;

use crate::constants::stance;
use crate::systems::components::{Body, Contacts, DeltaTime, Player};
use crate::systems::traversal::Traversal;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StanceFrame {
    #[default]
    Primary,
    Breath,
}

impl StanceFrame {
    fn toggled(self) -> Self {
        match self {
            StanceFrame::Primary => StanceFrame::Breath,
            StanceFrame::Breath => StanceFrame::Primary,
        }
    }
}

/// Visual pose selection for the player. Has no effect on gameplay.
#[derive(Component, Debug, Clone, Copy, PartialEq, Default)]
pub struct Stance {
    pub frame: StanceFrame,
    pub idle_time: f32,
    pub toggle_time: f32,
}

impl Stance {
    pub fn tick(&mut self, idle: bool, dt: f32) {
        if !idle {
            *self = Stance::default();
            return;
        }

        let waiting = self.idle_time < stance::IDLE_DELAY;
        self.idle_time += dt;
        if self.idle_time < stance::IDLE_DELAY {
            return;
        }

        if waiting {
            self.frame = StanceFrame::Breath;
            self.toggle_time = 0.0;
            return;
        }

        self.toggle_time += dt;
        if self.toggle_time >= stance::IDLE_INTERVAL {
            self.toggle_time -= stance::IDLE_INTERVAL;
            self.frame = self.frame.toggled();
        }
    }
}

/// Standing still on a rooftop, clear of walls and not attached to anything.
pub fn is_idle(body: &Body, contacts: Contacts, traversal: &Traversal) -> bool {
    body.velocity == Vec2::ZERO && contacts.grounded() && !contacts.against_wall() && *traversal == Traversal::Normal
}

pub fn stance_system(dt: Res<DeltaTime>, mut players: Query<(&mut Stance, &Body, &Contacts, &Traversal), With<Player>>) {
    for (mut stance, body, contacts, traversal) in players.iter_mut() {
        stance.tick(is_idle(body, *contacts, traversal), dt.0);
    }
}
