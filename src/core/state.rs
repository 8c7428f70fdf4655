//! # Application State
//!
//! Core business state for SortIt. This module contains domain logic only -
//! no TUI-specific types. Presentation state lives in the `tui` module.
//!
//! ```text
//! App
//! ├── session: SortingSession         // photos, pointer, history, repository
//! ├── status_message: String          // status bar text
//! ├── error: Option<String>           // last failure, shown until the next action
//! ├── show_stats: bool                // stats panel toggle
//! ├── transition_delay: Duration      // pause before the next photo
//! └── destinations: Vec<(Direction, String)>  // swipe hints for the card
//! ```
//!
//! State changes only happen through `update(state, action)` in action.rs.

use std::time::Duration;

use crate::core::config::{DEFAULT_TRANSITION_DELAY_MS, ResolvedConfig};
use crate::core::model::Direction;
use crate::core::session::SortingSession;

pub struct App {
    pub session: SortingSession,
    pub status_message: String,
    pub error: Option<String>,
    pub show_stats: bool,
    pub transition_delay: Duration,
    /// Label of the album each cardinal direction routes to.
    pub destinations: Vec<(Direction, String)>,
}

impl App {
    pub fn new(session: SortingSession) -> Self {
        let mut app = Self {
            session,
            status_message: String::from("Swipe with the arrow keys"),
            error: None,
            show_stats: false,
            transition_delay: Duration::from_millis(DEFAULT_TRANSITION_DELAY_MS),
            destinations: Vec::new(),
        };
        app.refresh_destinations();
        app
    }

    pub fn from_config(session: SortingSession, config: &ResolvedConfig) -> Self {
        Self {
            transition_delay: config.transition_delay,
            ..Self::new(session)
        }
    }

    /// Re-derive the direction labels from the current mapping and albums.
    pub fn refresh_destinations(&mut self) {
        let albums = self.session.repository().get_albums();
        let mapping = self.session.mapping();
        self.destinations = Direction::CARDINAL
            .iter()
            .map(|direction| {
                let id = mapping.get(*direction).unwrap_or_default();
                let label = albums
                    .iter()
                    .find(|a| a.id == id && a.is_routable())
                    .map(|a| a.display_name.clone())
                    .unwrap_or_else(|| format!("{id} (missing)"));
                (*direction, label)
            })
            .collect();
    }

    pub fn destination_label(&self, direction: Direction) -> Option<&str> {
        self.destinations
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, label)| label.as_str())
    }
}
