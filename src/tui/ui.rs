use crate::core::state::App;
use crate::tui::TuiState;
use crate::tui::component::Component;
use crate::tui::components::{HistoryView, PhotoCard, StatsPanel, TitleBar};

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::{Block, Paragraph, Wrap};

const STATS_WIDTH: u16 = 28;
const CARD_MAX_WIDTH: u16 = 64;
const CARD_HEIGHT: u16 = 11;

pub fn draw_ui(frame: &mut Frame, app: &App, tui: &mut TuiState) {
    use Constraint::{Length, Min};
    let layout = Layout::vertical([Length(1), Min(0), Length(1)]);
    let [title_area, main_area, footer_area] = layout.areas(frame.area());

    let (done, total) = app.session.progress();
    TitleBar::new(done, total, app.status_message.clone()).render(frame, title_area);

    let card_area = if app.show_stats {
        let [card_area, stats_area] =
            Layout::horizontal([Min(0), Length(STATS_WIDTH)]).areas(main_area);
        StatsPanel::new(app.session.stats(), done, total).render(frame, stats_area);
        card_area
    } else {
        main_area
    };

    if total == 0 {
        draw_empty_view(frame, card_area);
    } else if let Some(photo) = app.session.current_photo() {
        let [centered] = Layout::horizontal([Length(CARD_MAX_WIDTH)])
            .flex(Flex::Center)
            .areas(card_area);
        let [centered] = Layout::vertical([Length(CARD_HEIGHT)])
            .flex(Flex::Center)
            .areas(centered);
        PhotoCard::new(photo, &app.destinations, app.session.is_animating())
            .render(frame, centered);
    } else {
        HistoryView::new(app.session.history(), app.session.stats()).render(
            frame,
            card_area,
            &mut tui.history,
        );
    }

    draw_footer(frame, footer_area, app.error.as_deref());
}

fn draw_empty_view(frame: &mut Frame, area: Rect) {
    let message = Paragraph::new("No photos yet.\nImport some with `sortit import <FILES>`.")
        .block(Block::bordered().title("SortIt"))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(message, area);
}

fn draw_footer(frame: &mut Frame, area: Rect, error: Option<&str>) {
    let line = match error {
        Some(msg) => Span::styled(format!("Error: {msg}"), Style::default().fg(Color::Red)),
        None => Span::styled(
            "←↑↓→ swipe · k keep · d discard · u undo · r reset · s stats · q quit",
            Style::default().fg(Color::DarkGray),
        ),
    };
    frame.render_widget(line, area);
}
