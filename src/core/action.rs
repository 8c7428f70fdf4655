//! # Actions
//!
//! Everything that can happen in SortIt becomes an `Action`.
//! User presses →? That's `Action::Swipe(Direction::Right)`.
//! The transition delay runs out? That's `Action::TransitionFinished`.
//!
//! The `update()` function applies an action to the state and returns an
//! `Effect` telling the adapter what to do next. The only I/O it triggers is
//! through the session's repository.
//!
//! ```text
//! State + Action  →  update()  →  New State + Effect
//! ```
//!
//! A swipe returns `Effect::ScheduleAdvance`: the adapter waits out the
//! transition delay and sends `TransitionFinished`. Swipes in between are
//! ignored by the session latch.

use log::{debug, warn};

use crate::core::model::Direction;
use crate::core::router::Placement;
use crate::core::session::SwipeOutcome;
use crate::core::state::App;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Action {
    Swipe(Direction),
    TransitionFinished,
    Undo,
    Reset,
    Reload,
    ToggleStats,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Send `TransitionFinished` once the transition delay has passed.
    ScheduleAdvance,
    Quit,
}

pub fn update(app: &mut App, action: Action) -> Effect {
    debug!("update: {:?}", action);
    match action {
        Action::Swipe(direction) => {
            app.error = None;
            match app.session.swipe(direction) {
                Ok(SwipeOutcome::Ignored) => Effect::None,
                Ok(SwipeOutcome::Recorded { record, placement }) => {
                    app.status_message = match &placement {
                        Placement::Placed { .. } => format!(
                            "{} {} → {}",
                            direction.arrow(),
                            record.photo_name,
                            app.destination_label(direction)
                                .unwrap_or(placement.album_id())
                        ),
                        Placement::Missed { album_id } => format!(
                            "Album '{}' no longer exists, '{}' was not placed",
                            album_id, record.photo_name
                        ),
                    };
                    Effect::ScheduleAdvance
                }
                Err(e) => {
                    warn!("Swipe {} failed: {}", direction, e);
                    app.error = Some(e.to_string());
                    // The swipe is already in the history, so the pointer still moves on
                    if app.session.is_animating() {
                        Effect::ScheduleAdvance
                    } else {
                        Effect::None
                    }
                }
            }
        }
        Action::TransitionFinished => {
            if app.session.finish_transition() {
                let stats = app.session.stats();
                app.status_message = format!(
                    "All done! {} kept, {} discarded",
                    stats.positive, stats.negative
                );
            }
            Effect::None
        }
        Action::Undo => {
            app.error = None;
            match app.session.undo() {
                Some(record) => {
                    app.status_message = format!("Undid {} on {}", record.direction, record.photo_name);
                }
                None if app.session.is_animating() => {}
                None => app.status_message = String::from("Nothing to undo"),
            }
            Effect::None
        }
        Action::Reset => {
            app.error = None;
            app.session.reset();
            app.status_message = String::from("Starting over");
            Effect::None
        }
        Action::Reload => {
            app.error = None;
            app.session.reload();
            app.refresh_destinations();
            app.status_message = format!("Loaded {} photos", app.session.total());
            Effect::None
        }
        Action::ToggleStats => {
            app.show_stats = !app.show_stats;
            Effect::None
        }
        Action::Quit => Effect::Quit,
    }
}
