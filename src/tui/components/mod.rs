//! # TUI Components
//!
//! ### Stateless Components (Props-Based Rendering)
//!
//! Display components that receive all data as parameters:
//! - `TitleBar`: app name, progress and status message
//! - `PhotoCard`: the current photo and where each arrow sends it
//! - `StatsPanel`: kept/discarded counts and a progress gauge
//!
//! ### Stateful Components (Event-Driven)
//!
//! - `HistoryState` / `HistoryView`: the end-of-session summary with a
//!   scrollable list of swipes
//!
//! Components receive external data as props, not by reaching into `App`:
//!
//! ```rust,ignore
//! // Dependencies are explicit
//! TitleBar::new(done, total, app.status_message.clone()).render(frame, area);
//! ```
//!
//! ## Module Structure
//!
//! ```text
//! components/
//! ├── mod.rs           (this file)
//! ├── title_bar.rs     (Top status bar)
//! ├── photo_card.rs    (Current photo)
//! ├── stats_panel.rs   (Session stats)
//! ├── history.rs       (Completion summary)
//! └── text.rs          (Width-aware truncation)
//! ```

mod title_bar;
pub use title_bar::TitleBar;

pub mod history;
pub mod photo_card;
pub mod stats_panel;
pub mod text;
pub use history::{HistoryState, HistoryView};
pub use photo_card::PhotoCard;
pub use stats_panel::StatsPanel;
