use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use std::time::Duration;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Command {
    Left,
    Right,
    Up,
    Down,
    Quit,
}

/// Supplies at most one command per frame without blocking.
pub trait InputSource {
    fn poll_command(&mut self) -> anyhow::Result<Option<Command>>;
}

pub fn map_key(key: KeyEvent) -> Option<Command> {
    if !matches!(key.kind, KeyEventKind::Press | KeyEventKind::Repeat) {
        return None;
    }
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => Some(Command::Quit),
        KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => Some(Command::Quit),
        KeyCode::Char('a') | KeyCode::Char('A') | KeyCode::Left => Some(Command::Left),
        KeyCode::Char('d') | KeyCode::Char('D') | KeyCode::Right => Some(Command::Right),
        KeyCode::Char('w') | KeyCode::Char('W') | KeyCode::Up => Some(Command::Up),
        KeyCode::Char('s') | KeyCode::Char('S') | KeyCode::Down => Some(Command::Down),
        _ => None,
    }
}

/// Reads crossterm events. Needs raw mode to see single key presses.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputSource for TerminalInput {
    fn poll_command(&mut self) -> anyhow::Result<Option<Command>> {
        // one key per frame; anything typed after it waits for the next frame
        while event::poll(Duration::ZERO)? {
            if let Event::Key(k) = event::read()? {
                if k.kind == KeyEventKind::Release {
                    continue;
                }
                return Ok(map_key(k));
            }
        }
        Ok(None)
    }
}
