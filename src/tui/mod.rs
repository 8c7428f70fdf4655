//! # TUI Adapter
//!
//! The ratatui-specific layer. Handles terminal I/O, renders the UI,
//! and translates keyboard events into core::Action values.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Transition Timing
//!
//! A swipe returns `Effect::ScheduleAdvance`. The loop records a deadline
//! `transition_delay` in the future and shortens its poll timeout so it
//! wakes up on time, then dispatches `Action::TransitionFinished`. Keys
//! pressed before the deadline still reach `update()`, where the session
//! latch ignores further swipes.
//!
//! ## Redraw Strategy
//!
//! Idle, the loop sleeps up to 500ms and only redraws on events, resize or
//! a finished transition.

mod component;
mod components;
mod event;
mod ui;

use log::{debug, info};
use std::io::stdout;
use std::time::{Duration, Instant};

use crossterm::cursor::{Hide, Show};
use crossterm::event::{
    KeyboardEnhancementFlags, PopKeyboardEnhancementFlags, PushKeyboardEnhancementFlags,
};
use crossterm::execute;

use crate::core::action::{Action, Effect, update};
use crate::core::model::Direction;
use crate::core::state::App;
use crate::tui::component::EventHandler;
use crate::tui::components::HistoryState;
use crate::tui::event::{TuiEvent, poll_event_immediate, poll_event_timeout};

const IDLE_POLL: Duration = Duration::from_millis(500);

/// TUI-specific presentation state (not part of core business logic)
#[derive(Default)]
pub struct TuiState {
    pub history: HistoryState,
}

impl TuiState {
    pub fn new() -> Self {
        Self::default()
    }
}

struct TerminalModeGuard;

impl TerminalModeGuard {
    fn new() -> std::io::Result<Self> {
        // Ignored by terminals without the Kitty protocol; where supported it
        // reports press/release separately so held arrows don't double-swipe
        execute!(
            stdout(),
            Hide,
            PushKeyboardEnhancementFlags(
                KeyboardEnhancementFlags::DISAMBIGUATE_ESCAPE_CODES
                    | KeyboardEnhancementFlags::REPORT_EVENT_TYPES
            )
        )?;
        info!("Terminal modes enabled (hidden cursor, keyboard enhancement)");
        Ok(Self)
    }
}

impl Drop for TerminalModeGuard {
    fn drop(&mut self) {
        let _ = execute!(stdout(), PopKeyboardEnhancementFlags, Show);
    }
}

/// Map a key event to the action it triggers, if any.
///
/// Once the session is complete the vertical arrows scroll the history
/// instead, so they are handled before this is consulted.
pub fn action_for(event: &TuiEvent) -> Option<Action> {
    match event {
        TuiEvent::Arrow(direction) => Some(Action::Swipe(*direction)),
        TuiEvent::Keep => Some(Action::Swipe(Direction::Keep)),
        TuiEvent::Discard => Some(Action::Swipe(Direction::Discard)),
        TuiEvent::Undo => Some(Action::Undo),
        TuiEvent::Reset => Some(Action::Reset),
        TuiEvent::ToggleStats => Some(Action::ToggleStats),
        TuiEvent::Quit | TuiEvent::ForceQuit => Some(Action::Quit),
        TuiEvent::Resize => None,
    }
}

pub fn run(mut app: App) -> std::io::Result<()> {
    let mut tui = TuiState::new();

    let mut terminal = ratatui::init();
    let _terminal_mode_guard = TerminalModeGuard::new();

    // When the pending transition should finish
    let mut advance_at: Option<Instant> = None;
    let mut needs_redraw = true; // Force first frame

    loop {
        if needs_redraw {
            terminal.draw(|f| ui::draw_ui(f, &app, &mut tui))?;
            needs_redraw = false;
        }

        let timeout = advance_at
            .map(|at| at.saturating_duration_since(Instant::now()))
            .unwrap_or(IDLE_POLL);
        let first_event = poll_event_timeout(timeout);

        // Process first event + drain ALL pending events before next draw
        let mut should_quit = false;
        if first_event.is_some() {
            needs_redraw = true;
        }
        for event in first_event
            .into_iter()
            .chain(std::iter::from_fn(poll_event_immediate))
        {
            if app.session.is_complete() && tui.history.handle_event(&event).is_some() {
                continue;
            }
            let Some(action) = action_for(&event) else {
                continue;
            };
            match update(&mut app, action) {
                Effect::Quit => {
                    should_quit = true;
                    break;
                }
                Effect::ScheduleAdvance => {
                    advance_at = Some(Instant::now() + app.transition_delay);
                }
                Effect::None => {}
            }
        }

        if should_quit {
            break;
        }

        if let Some(at) = advance_at
            && Instant::now() >= at
        {
            debug!("Transition delay elapsed");
            advance_at = None;
            update(&mut app, Action::TransitionFinished);
            needs_redraw = true;
        }
    }

    info!("Leaving sorting view: {:?}", app.session.stats());
    ratatui::restore();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_action_for_swipes_and_commands() {
        assert_eq!(
            action_for(&TuiEvent::Arrow(Direction::Left)),
            Some(Action::Swipe(Direction::Left))
        );
        assert_eq!(
            action_for(&TuiEvent::Keep),
            Some(Action::Swipe(Direction::Keep))
        );
        assert_eq!(
            action_for(&TuiEvent::Discard),
            Some(Action::Swipe(Direction::Discard))
        );
        assert_eq!(action_for(&TuiEvent::Undo), Some(Action::Undo));
        assert_eq!(action_for(&TuiEvent::ForceQuit), Some(Action::Quit));
        assert_eq!(action_for(&TuiEvent::Resize), None);
    }
}
