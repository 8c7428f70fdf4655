//! # StatsPanel Component
//!
//! Kept/discarded counts for the current session and a progress gauge.
//! Toggled with `s`.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Gauge, Paragraph};

use crate::core::ledger::SortingStats;
use crate::tui::component::Component;

pub struct StatsPanel {
    pub stats: SortingStats,
    pub done: usize,
    pub total: usize,
}

impl StatsPanel {
    pub fn new(stats: SortingStats, done: usize, total: usize) -> Self {
        Self { stats, done, total }
    }

    fn ratio(&self) -> f64 {
        if self.total == 0 {
            1.0
        } else {
            (self.done as f64 / self.total as f64).clamp(0.0, 1.0)
        }
    }
}

impl Component for StatsPanel {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let block = Block::bordered().title("Stats");
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [counts_area, gauge_area] =
            Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(inner);

        let counts = vec![
            Line::from(vec![
                Span::styled("Kept       ", Style::default().fg(Color::Green)),
                Span::raw(self.stats.positive.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Discarded  ", Style::default().fg(Color::Red)),
                Span::raw(self.stats.negative.to_string()),
            ]),
            Line::from(vec![
                Span::styled("Remaining  ", Style::default().fg(Color::DarkGray)),
                Span::raw(self.total.saturating_sub(self.done).to_string()),
            ]),
        ];
        frame.render_widget(Paragraph::new(counts), counts_area);

        let gauge = Gauge::default()
            .gauge_style(Style::default().fg(Color::Cyan))
            .ratio(self.ratio())
            .label(format!("{}/{}", self.done, self.total));
        frame.render_widget(gauge, gauge_area);
    }
}
