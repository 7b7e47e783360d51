use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame,
};
use unicode_width::UnicodeWidthStr;

use super::app::App;
use crate::commands::CommandMode;
use crate::shell::render_plain;

const ACCENT_GREEN: Color = Color::Rgb(100, 200, 140);
const ACCENT_RED: Color = Color::Rgb(220, 100, 100);
const ACCENT_CYAN: Color = Color::Rgb(100, 200, 200);
const ACCENT_AMBER: Color = Color::Rgb(220, 180, 100);
const TEXT_PRIMARY: Color = Color::Rgb(220, 220, 220);
const TEXT_DIM: Color = Color::Rgb(100, 100, 110);
const BORDER_DIM: Color = Color::Rgb(50, 50, 55);

pub fn draw(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(f.area());

    draw_history(f, app, chunks[0]);
    draw_input(f, app, chunks[1]);
    draw_status(f, app, chunks[2]);
}

fn history_lines(app: &App) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    for entry in app.session.history().entries() {
        if !entry.command.is_empty() {
            lines.push(Line::from(vec![
                Span::styled(app.prompt.clone(), Style::default().fg(ACCENT_CYAN)),
                Span::styled(entry.command.clone(), Style::default().fg(TEXT_PRIMARY)),
            ]));
        }
        for text in render_plain(&entry.output).lines() {
            lines.push(Line::from(Span::styled(
                text.to_string(),
                Style::default().fg(TEXT_PRIMARY),
            )));
        }
        lines.push(Line::default());
    }
    lines
}

fn draw_history(f: &mut Frame, app: &App, area: Rect) {
    let lines = history_lines(app);
    let top = scroll_top(lines.len(), area.height, app.scroll_offset);

    let history = Paragraph::new(lines).scroll((top, 0));
    f.render_widget(history, area);
}

/// First visible line, keeping the newest lines at the bottom of the pane
fn scroll_top(total_lines: usize, height: u16, offset: u16) -> u16 {
    let top = total_lines
        .saturating_sub(height as usize)
        .saturating_sub(offset as usize);
    u16::try_from(top).unwrap_or(u16::MAX)
}

fn draw_input(f: &mut Frame, app: &App, area: Rect) {
    let input = app.session.input();
    let color = if app.input_is_valid() {
        ACCENT_GREEN
    } else {
        ACCENT_RED
    };

    let mut spans = vec![
        Span::styled(app.prompt.clone(), Style::default().fg(ACCENT_CYAN)),
        Span::styled(input.to_string(), Style::default().fg(color)),
    ];
    if let Some(suggestion) = app.session.suggestion() {
        if let Some(rest) = suggestion.strip_prefix(input) {
            spans.push(Span::styled(
                rest.to_string(),
                Style::default().fg(TEXT_DIM).add_modifier(Modifier::ITALIC),
            ));
        }
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(BORDER_DIM));
    f.render_widget(Paragraph::new(Line::from(spans)).block(block), area);

    let x = area.x + 1 + (app.prompt.width() + input.width()) as u16;
    f.set_cursor_position((x.min(area.right().saturating_sub(2)), area.y + 1));
}

fn draw_status(f: &mut Frame, app: &App, area: Rect) {
    let mode = app.session.mode();
    let mode_color = match mode {
        CommandMode::Normal => ACCENT_GREEN,
        CommandMode::Advanced => ACCENT_AMBER,
    };

    let mut spans = vec![
        Span::styled(
            format!(" {} ", mode.as_str().to_uppercase()),
            Style::default()
                .fg(Color::Black)
                .bg(mode_color)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  ctrl+t mode · tab complete · ctrl+l clear · esc quit",
            Style::default().fg(TEXT_DIM),
        ),
    ];
    if app.is_busy() {
        spans.push(Span::styled("  running…", Style::default().fg(ACCENT_AMBER)));
    }
    if let Some(game) = app.session.games().active() {
        spans.push(Span::styled(
            format!("  playing {}", game.name()),
            Style::default().fg(ACCENT_CYAN),
        ));
    }

    f.render_widget(Paragraph::new(Line::from(spans)), area);
}
