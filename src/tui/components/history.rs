//! # History Component
//!
//! Summary shown once every photo has been classified: the totals and a
//! scrollable list of each swipe, oldest first.
//!
//! Follows the persistent state + transient wrapper pattern:
//! - `HistoryState` lives in `TuiState` and keeps the selection
//! - `HistoryView` is created each frame with borrowed records

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, List, ListItem, ListState, Paragraph};

use crate::core::ledger::SortingStats;
use crate::core::model::{ClassificationRecord, Direction, Outcome};
use crate::tui::component::EventHandler;
use crate::tui::components::text::truncate_to_width;
use crate::tui::event::TuiEvent;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HistoryEvent {
    Scrolled,
}

#[derive(Debug, Default)]
pub struct HistoryState {
    pub len: usize,
    pub list_state: ListState,
}

impl HistoryState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Keep the selection inside a list of `len` records.
    pub fn sync_len(&mut self, len: usize) {
        self.len = len;
        match self.list_state.selected() {
            _ if len == 0 => self.list_state.select(None),
            None => self.list_state.select(Some(0)),
            Some(i) if i >= len => self.list_state.select(Some(len - 1)),
            Some(_) => {}
        }
    }
}

impl EventHandler for HistoryState {
    type Event = HistoryEvent;

    fn handle_event(&mut self, event: &TuiEvent) -> Option<HistoryEvent> {
        if self.len == 0 {
            return None;
        }
        let selected = self.list_state.selected().unwrap_or(0);
        match event {
            TuiEvent::Arrow(Direction::Up) => {
                self.list_state.select(Some(selected.saturating_sub(1)));
                Some(HistoryEvent::Scrolled)
            }
            TuiEvent::Arrow(Direction::Down) => {
                self.list_state.select(Some((selected + 1).min(self.len - 1)));
                Some(HistoryEvent::Scrolled)
            }
            _ => None,
        }
    }
}

pub struct HistoryView<'a> {
    pub records: &'a [ClassificationRecord],
    pub stats: SortingStats,
}

impl<'a> HistoryView<'a> {
    pub fn new(records: &'a [ClassificationRecord], stats: SortingStats) -> Self {
        Self { records, stats }
    }

    fn item(record: &ClassificationRecord, width: usize) -> ListItem<'static> {
        let color = match record.outcome {
            Outcome::Keep => Color::Green,
            Outcome::Discard => Color::Red,
        };
        let prefix = format!(" {} ", record.direction.arrow());
        let suffix = format!("  → {}", record.destination);
        let room = width.saturating_sub(prefix.chars().count() + suffix.chars().count());
        ListItem::new(Line::from(vec![
            Span::styled(prefix, Style::default().fg(color)),
            Span::raw(truncate_to_width(&record.photo_name, room)),
            Span::styled(suffix, Style::default().fg(Color::DarkGray)),
        ]))
    }

    pub fn render(&self, frame: &mut Frame, area: Rect, state: &mut HistoryState) {
        let [summary_area, list_area, help_area] = Layout::vertical([
            Constraint::Length(2),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .areas(area);

        let summary = Paragraph::new(vec![
            Line::from(Span::styled(
                "All photos sorted!",
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            Line::from(format!(
                "{} kept · {} discarded · {} seen",
                self.stats.positive, self.stats.negative, self.stats.total_seen
            )),
        ]);
        frame.render_widget(summary, summary_area);

        let width = list_area.width.saturating_sub(2) as usize;
        let items: Vec<ListItem> = self
            .records
            .iter()
            .map(|record| Self::item(record, width))
            .collect();
        let list = List::new(items)
            .block(Block::bordered().title("History"))
            .highlight_style(Style::default().bg(Color::DarkGray));
        state.sync_len(self.records.len());
        frame.render_stateful_widget(list, list_area, &mut state.list_state);

        let help = Paragraph::new(Span::styled(
            "↑/↓ scroll · u undo last · r start over · q quit",
            Style::default().fg(Color::DarkGray),
        ));
        frame.render_widget(help, help_area);
    }
}
