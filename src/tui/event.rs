use std::time::Duration;

use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};

use crate::core::model::Direction;

/// TUI-specific input events
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TuiEvent {
    /// Arrow keys
    Arrow(Direction),
    Keep,
    Discard,
    Undo,
    Reset,
    ToggleStats,
    Quit,
    ForceQuit, // Ctrl+C
    Resize,
}

/// Poll for an event without blocking (returns immediately)
pub fn poll_event_immediate() -> Option<TuiEvent> {
    poll_event_timeout(Duration::ZERO)
}

/// Poll for an event, blocking up to `timeout`. Read failures count as no event.
pub fn poll_event_timeout(timeout: Duration) -> Option<TuiEvent> {
    if !event::poll(timeout).ok()? {
        return None;
    }
    match event::read().ok()? {
        Event::Key(key_event) => translate_key(key_event),
        Event::Resize(_, _) => Some(TuiEvent::Resize),
        _ => None,
    }
}

pub fn translate_key(key_event: KeyEvent) -> Option<TuiEvent> {
    // Release and repeat events show up with keyboard enhancement on
    if key_event.kind != KeyEventKind::Press {
        return None;
    }
    log::debug!(
        "Key event: {:?} with modifiers {:?}",
        key_event.code,
        key_event.modifiers
    );
    match (key_event.modifiers, key_event.code) {
        (KeyModifiers::CONTROL, KeyCode::Char('c')) => Some(TuiEvent::ForceQuit),
        (_, KeyCode::Up) => Some(TuiEvent::Arrow(Direction::Up)),
        (_, KeyCode::Down) => Some(TuiEvent::Arrow(Direction::Down)),
        (_, KeyCode::Left) => Some(TuiEvent::Arrow(Direction::Left)),
        (_, KeyCode::Right) => Some(TuiEvent::Arrow(Direction::Right)),
        (_, KeyCode::Char('k')) => Some(TuiEvent::Keep),
        (_, KeyCode::Char('d')) => Some(TuiEvent::Discard),
        (_, KeyCode::Char('u')) => Some(TuiEvent::Undo),
        (_, KeyCode::Char('r')) => Some(TuiEvent::Reset),
        (_, KeyCode::Char('s')) => Some(TuiEvent::ToggleStats),
        (_, KeyCode::Char('q')) | (_, KeyCode::Esc) => Some(TuiEvent::Quit),
        _ => None,
    }
}
