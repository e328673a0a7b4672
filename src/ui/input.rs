/// Keyboard input: turns terminal key events into game commands.
///
/// Every Press (or auto-Repeat) of a direction key is its own command, so a
/// tap is exactly one simulation tick and holding a key ticks at the
/// terminal's repeat rate. Release events are ignored.

use std::time::Duration;

use crossterm::event::{self, poll, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::domain::entity::MoveDir;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Command {
    Move(MoveDir),
    /// Yes to a prompt.
    Confirm,
    /// No to a prompt; quit during play.
    Cancel,
    Quit,
}

const KEYS_LEFT: &[KeyCode] = &[KeyCode::Left, KeyCode::Char('a'), KeyCode::Char('A')];
const KEYS_RIGHT: &[KeyCode] = &[KeyCode::Right, KeyCode::Char('d'), KeyCode::Char('D')];
const KEYS_UP: &[KeyCode] = &[KeyCode::Up, KeyCode::Char('w'), KeyCode::Char('W')];
const KEYS_DOWN: &[KeyCode] = &[KeyCode::Down, KeyCode::Char('s'), KeyCode::Char('S')];
const KEYS_CONFIRM: &[KeyCode] = &[KeyCode::Enter, KeyCode::Char(' '), KeyCode::Char('y'), KeyCode::Char('Y')];
const KEYS_CANCEL: &[KeyCode] = &[KeyCode::Esc, KeyCode::Char('n'), KeyCode::Char('N')];
const KEYS_QUIT: &[KeyCode] = &[KeyCode::Char('q'), KeyCode::Char('Q')];

/// Map one key event to a command. Pure, so the mapping is testable
/// without a terminal.
pub fn key_command(key: &KeyEvent) -> Option<Command> {
    if key.kind == KeyEventKind::Release {
        return None;
    }
    if key.modifiers.contains(KeyModifiers::CONTROL)
        && matches!(key.code, KeyCode::Char('c') | KeyCode::Char('C'))
    {
        return Some(Command::Quit);
    }

    let code = key.code;
    if KEYS_LEFT.contains(&code) {
        Some(Command::Move(MoveDir::Left))
    } else if KEYS_RIGHT.contains(&code) {
        Some(Command::Move(MoveDir::Right))
    } else if KEYS_UP.contains(&code) {
        Some(Command::Move(MoveDir::Up))
    } else if KEYS_DOWN.contains(&code) {
        Some(Command::Move(MoveDir::Down))
    } else if KEYS_CONFIRM.contains(&code) {
        Some(Command::Confirm)
    } else if KEYS_CANCEL.contains(&code) {
        Some(Command::Cancel)
    } else if KEYS_QUIT.contains(&code) {
        Some(Command::Quit)
    } else {
        None
    }
}

pub struct InputState {
    /// Commands collected during the most recent `drain_events()`, in
    /// arrival order.
    commands: Vec<Command>,
}

impl InputState {
    pub fn new() -> Self {
        InputState {
            commands: Vec::with_capacity(8),
        }
    }

    /// Drain all pending terminal events without blocking.
    /// Call this once per frame.
    pub fn drain_events(&mut self) {
        self.commands.clear();

        while poll(Duration::ZERO).unwrap_or(false) {
            if let Ok(Event::Key(key)) = event::read() {
                if let Some(cmd) = key_command(&key) {
                    self.commands.push(cmd);
                }
            }
        }
    }

    pub fn commands(&self) -> &[Command] {
        &self.commands
    }
}
