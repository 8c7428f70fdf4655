//! # TitleBar Component
//!
//! Top status bar: app name, progress through the photo list and the
//! latest status message.
//!
//! Stateless. All data arrives as props:
//!
//! ```rust,ignore
//! let mut title_bar = TitleBar::new(done, total, app.status_message.clone());
//! title_bar.render(frame, area);
//! ```
//!
//! The status message is truncated to the space left after the progress
//! counter, so the counter stays visible on narrow terminals.

use crate::tui::component::Component;
use crate::tui::components::text::truncate_to_width;
use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use unicode_width::UnicodeWidthStr;

pub struct TitleBar {
    pub done: usize,
    pub total: usize,
    pub status_message: String,
}

impl TitleBar {
    pub fn new(done: usize, total: usize, status_message: String) -> Self {
        Self {
            done,
            total,
            status_message,
        }
    }

    fn prefix(&self) -> String {
        format!("SortIt [{}/{}]", self.done, self.total)
    }
}

impl Component for TitleBar {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let prefix = self.prefix();
        let mut spans = vec![Span::styled(
            prefix.clone(),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        )];

        if !self.status_message.is_empty() {
            let room = (area.width as usize).saturating_sub(prefix.width() + 3);
            spans.push(Span::raw(" | "));
            spans.push(Span::raw(truncate_to_width(&self.status_message, room)));
        }

        frame.render_widget(Line::from(spans), area);
    }
}
