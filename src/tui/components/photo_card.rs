//! # PhotoCard Component
//!
//! The photo under the pointer, with the album each arrow sends it to.
//!
//! ```text
//! ┌ beach.jpg ─────────────────────────┐
//! │             ↑ Favorites            │
//! │ ← Archive              Favorites → │
//! │             ↓ Archive              │
//! │                                    │
//! │        image/jpeg · 2.4 MiB        │
//! │      uploaded 2024-03-10 12:00     │
//! └────────────────────────────────────┘
//! ```
//!
//! While a transition is in flight the card is dimmed. Terminals can't
//! show the image itself, so the card carries its metadata instead.

use chrono::{DateTime, Local};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use crate::core::model::{Direction, Photo, PhotoSource};
use crate::tui::component::Component;
use crate::tui::components::text::{human_bytes, truncate_to_width};

pub struct PhotoCard<'a> {
    pub photo: &'a Photo,
    pub destinations: &'a [(Direction, String)],
    pub dimmed: bool,
}

impl<'a> PhotoCard<'a> {
    pub fn new(photo: &'a Photo, destinations: &'a [(Direction, String)], dimmed: bool) -> Self {
        Self {
            photo,
            destinations,
            dimmed,
        }
    }

    fn label(&self, direction: Direction) -> &str {
        self.destinations
            .iter()
            .find(|(d, _)| *d == direction)
            .map(|(_, label)| label.as_str())
            .unwrap_or("?")
    }

    fn details(&self) -> Vec<Line<'static>> {
        let uploaded = DateTime::from_timestamp_millis(self.photo.uploaded_at)
            .map(|t| t.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string())
            .unwrap_or_else(|| "unknown date".to_string());
        let source = match self.photo.source {
            Some(PhotoSource::Camera) => " · camera",
            _ => "",
        };
        vec![
            Line::from(format!(
                "{} · {}{}",
                self.photo.mime_type,
                human_bytes(self.photo.byte_size),
                source
            )),
            Line::from(Span::styled(
                format!("uploaded {uploaded}"),
                Style::default().fg(Color::DarkGray),
            )),
        ]
    }
}

impl Component for PhotoCard<'_> {
    fn render(&mut self, frame: &mut Frame, area: Rect) {
        let border_style = if self.dimmed {
            Style::default().fg(Color::DarkGray)
        } else {
            Style::default().fg(Color::Cyan)
        };
        let title = truncate_to_width(&self.photo.name, area.width.saturating_sub(4) as usize);
        let block = Block::bordered()
            .title(Span::styled(title, border_style.add_modifier(Modifier::BOLD)))
            .border_style(border_style);
        let inner = block.inner(area);
        frame.render_widget(block, area);

        let [hints_area, _, details_area] = Layout::vertical([
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Length(2),
        ])
        .flex(Flex::Center)
        .areas(inner);

        let hint_style = if self.dimmed {
            Style::default().add_modifier(Modifier::DIM)
        } else {
            Style::default().fg(Color::Yellow)
        };
        let [up_area, middle_area, down_area] =
            Layout::vertical([Constraint::Length(1); 3]).areas(hints_area);

        let up = format!("{} {}", Direction::Up.arrow(), self.label(Direction::Up));
        let down = format!("{} {}", Direction::Down.arrow(), self.label(Direction::Down));
        let left = format!("{} {}", Direction::Left.arrow(), self.label(Direction::Left));
        let right = format!("{} {}", self.label(Direction::Right), Direction::Right.arrow());

        frame.render_widget(
            Paragraph::new(up).style(hint_style).alignment(Alignment::Center),
            up_area,
        );
        frame.render_widget(
            Paragraph::new(down).style(hint_style).alignment(Alignment::Center),
            down_area,
        );
        frame.render_widget(
            Paragraph::new(left).style(hint_style).alignment(Alignment::Left),
            middle_area,
        );
        frame.render_widget(
            Paragraph::new(right).style(hint_style).alignment(Alignment::Right),
            middle_area,
        );

        frame.render_widget(
            Paragraph::new(self.details()).alignment(Alignment::Center),
            details_area,
        );
    }
}
