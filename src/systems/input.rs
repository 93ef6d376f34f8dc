use std::collections::{HashMap, HashSet};

use bevy_ecs::{
    event::EventWriter,
    resource::Resource,
    system::ResMut,
};
use bitflags::bitflags;
use smallvec::SmallVec;
use tracing::trace;

use crate::events::{GameCommand, GameEvent};

/// Logical keys the host maps its devices onto.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    A,
    D,
    W,
    S,
    Up,
    Down,
    Left,
    Right,
    Space,
    E,
    R,
    Escape,
}

bitflags! {
    /// Held directional controls.
    #[derive(Default, Clone, Copy, Debug, PartialEq, Eq, Hash)]
    pub struct Controls: u8 {
        const LEFT = 1 << 0;
        const RIGHT = 1 << 1;
        const UP = 1 << 2;
        const DOWN = 1 << 3;
        const JUMP = 1 << 4;
    }
}

/// Raw input as delivered by the host, in arrival order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key { key: Key, pressed: bool },
    PointerDown,
}

/// Input gathered since the previous frame.
#[derive(Resource, Debug, Default)]
pub struct InputQueue(pub SmallVec<[InputEvent; 8]>);

/// Current held state, rebuilt each frame from the pressed keys.
#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct InputState {
    pub held: Controls,
}

impl InputState {
    pub fn new(held: Controls) -> Self {
        Self { held }
    }

    pub fn left(&self) -> bool {
        self.held.contains(Controls::LEFT)
    }

    pub fn right(&self) -> bool {
        self.held.contains(Controls::RIGHT)
    }

    pub fn up(&self) -> bool {
        self.held.contains(Controls::UP)
    }

    pub fn down(&self) -> bool {
        self.held.contains(Controls::DOWN)
    }

    pub fn jump(&self) -> bool {
        self.held.contains(Controls::JUMP)
    }
}

#[derive(Debug, Clone, Resource)]
pub struct Bindings {
    held_bindings: HashMap<Key, Controls>,
    command_bindings: HashMap<Key, GameCommand>,
    pressed: HashSet<Key>,
}

impl Default for Bindings {
    fn default() -> Self {
        let held_bindings = HashMap::from([
            (Key::A, Controls::LEFT),
            (Key::Left, Controls::LEFT),
            (Key::D, Controls::RIGHT),
            (Key::Right, Controls::RIGHT),
            // Up doubles as jump, so the same key climbs when on a wall
            (Key::W, Controls::UP | Controls::JUMP),
            (Key::Up, Controls::UP | Controls::JUMP),
            (Key::Space, Controls::JUMP),
            (Key::S, Controls::DOWN),
            (Key::Down, Controls::DOWN),
        ]);

        let command_bindings = HashMap::from([
            (Key::E, GameCommand::Action),
            (Key::R, GameCommand::Restart),
            (Key::Escape, GameCommand::Exit),
        ]);

        Self {
            held_bindings,
            command_bindings,
            pressed: HashSet::new(),
        }
    }
}

impl Bindings {
    /// Union of the controls bound to every pressed key.
    pub fn held(&self) -> Controls {
        self.pressed
            .iter()
            .filter_map(|key| self.held_bindings.get(key))
            .fold(Controls::empty(), |acc, controls| acc | *controls)
    }

    /// Records a key transition; returns the command to fire on a fresh press.
    pub fn apply(&mut self, key: Key, pressed: bool) -> Option<GameCommand> {
        if !pressed {
            self.pressed.remove(&key);
            return None;
        }

        // Key repeat does not produce another edge
        if !self.pressed.insert(key) {
            return None;
        }

        self.command_bindings.get(&key).copied()
    }
}

/// Turns queued raw input into held state and command edges.
///
/// Pointer clicks are the same gesture as the action key.
pub fn input_system(
    mut queue: ResMut<InputQueue>,
    mut bindings: ResMut<Bindings>,
    mut state: ResMut<InputState>,
    mut writer: EventWriter<GameEvent>,
) {
    for event in queue.0.drain(..) {
        let command = match event {
            InputEvent::Key { key, pressed } => bindings.apply(key, pressed),
            InputEvent::PointerDown => Some(GameCommand::Action),
        };

        if let Some(command) = command {
            trace!(?command, "Command issued");
            writer.write(GameEvent::Command(command));
        }
    }

    state.held = bindings.held();
}

