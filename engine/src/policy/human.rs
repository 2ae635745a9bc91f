// engine/src/policy/human.rs
#![forbid(unsafe_code)]

use std::collections::VecDeque;

use crate::engine::{Command, Grid};

use super::base::Controller;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Key {
    Left,
    Right,
    RotateClockwise,
    RotateCounterClockwise,
    Down,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum KeyEvent {
    Pressed(Key),
    Released(Key),
}

impl KeyEvent {
    pub fn command(self) -> Option<Command> {
        match self {
            KeyEvent::Pressed(Key::Left) => Some(Command::MoveLeft),
            KeyEvent::Pressed(Key::Right) => Some(Command::MoveRight),
            KeyEvent::Pressed(Key::RotateClockwise) => Some(Command::RotateClockwise),
            KeyEvent::Pressed(Key::RotateCounterClockwise) => {
                Some(Command::RotateCounterClockwise)
            }
            KeyEvent::Pressed(Key::Down) => Some(Command::MaxFallingSpeed),
            KeyEvent::Released(Key::Down) => Some(Command::NormalFallingSpeed),
            KeyEvent::Released(_) => None,
        }
    }
}

/// Feeds buffered key events to the grid on the next update.
#[derive(Clone, Debug, Default)]
pub struct HumanController {
    pending: VecDeque<KeyEvent>,
    down_held: bool,
}

impl HumanController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: KeyEvent) {
        match event {
            KeyEvent::Pressed(Key::Down) => self.down_held = true,
            KeyEvent::Released(Key::Down) => self.down_held = false,
            _ => {}
        }
        self.pending.push_back(event);
    }
}

impl Controller for HumanController {
    fn update(&mut self, _elapsed_ms: u32, grid: &mut Grid) {
        for event in self.pending.drain(..) {
            if let Some(cmd) = event.command() {
                grid.apply(cmd);
            }
        }
        // A held key keeps pushing new pairs down.
        if self.down_held && !grid.is_max_speed() {
            grid.set_max_falling_speed();
        }
    }

    fn name(&self) -> String {
        "human".to_string()
    }
}
