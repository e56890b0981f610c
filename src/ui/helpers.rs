use anyhow::Error;
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::models::Slide;

/// Produce a rectangle centered within `area` that spans the requested percent
/// of the width and height. Used for modal dialogs.
pub(crate) fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let horizontal = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(area);

    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(horizontal[1]);

    vertical[1]
}

/// Extract the most relevant error message from a chained error.
pub(crate) fn surface_error(err: &Error) -> String {
    err.chain()
        .last()
        .map(|cause| cause.to_string())
        .unwrap_or_else(|| err.to_string())
}

/// Render a slide's lines as owned text lines in a single style, padded with
/// a leading empty line so short slides do not hug the widget border.
pub(crate) fn slide_lines(slide: &Slide, style: Style) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from("")];
    for text in &slide.lines {
        lines.push(Line::styled(text.clone(), style));
    }
    lines
}

/// Short label for a song's folder path in list rows; empty paths render as
/// nothing rather than a stray separator.
pub(crate) fn path_label(path: &str) -> Option<Span<'static>> {
    let trimmed = path.trim_matches('/').trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(Span::styled(
            format!("  [{trimmed}]"),
            Style::default().fg(Color::DarkGray),
        ))
    }
}
