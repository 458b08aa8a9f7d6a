//! UI module
//!
//! Draws the session view with Ratatui: a title bar, the rendered art block,
//! and a status footer. Styling lives in an immutable [`Theme`] passed in by
//! the binary, keeping the session controller presentation-free.

mod help;

use std::time::Instant;

use ratatui::{
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

use crate::session::Session;

/// Immutable style descriptors for the session view.
#[derive(Debug, Clone)]
pub struct Theme {
    pub title: Style,
    pub title_recording: Style,
    pub status: Style,
    pub status_error: Style,
    pub error: Style,
}

impl Default for Theme {
    fn default() -> Self {
        Self {
            title: Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD),
            title_recording: Style::default()
                .fg(Color::Red)
                .add_modifier(Modifier::BOLD),
            status: Style::default().fg(Color::DarkGray),
            status_error: Style::default().fg(Color::Red),
            error: Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        }
    }
}

/// Main render function - draws the entire session view.
pub fn render(frame: &mut Frame, session: &Session, theme: &Theme) {
    let area = frame.area();

    if let Some(err) = &session.last_error {
        render_centered_message(frame, area, &format!("Error: {err}"), theme.error);
        return;
    }

    let Some(art) = &session.rendered else {
        let message = format!("Waiting for camera... ({})", session.status);
        render_centered_message(frame, area, &message, theme.status);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Title bar
            Constraint::Min(1),    // Art
            Constraint::Length(2), // Footer
        ])
        .split(area);

    render_title(frame, chunks[0], session, theme);
    render_art(frame, chunks[1], session, art);
    render_footer(frame, chunks[2], session, theme);

    if session.show_help {
        help::render_help_overlay(frame, area);
    }
}

fn render_title(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let mut title = String::from(" GLYPHCAM ");
    let style = if session.recording {
        let seconds = session
            .rec_start
            .map(|start| (Instant::now() - start).as_secs())
            .unwrap_or(0);
        title.push_str(&format!("[REC {seconds}s] "));
        theme.title_recording
    } else {
        theme.title
    };

    let widget = Paragraph::new(Line::from(Span::styled(title, style)))
        .alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

fn render_art(frame: &mut Frame, area: Rect, session: &Session, art: &str) {
    use crate::render::RenderMode;

    let widget = if session.mode == RenderMode::Color {
        Paragraph::new(ansi_art_lines(art))
    } else {
        Paragraph::new(art)
    };
    frame.render_widget(widget, area);
}

fn render_footer(frame: &mut Frame, area: Rect, session: &Session, theme: &Theme) {
    let status_style = if session.status_is_error {
        theme.status_error
    } else {
        theme.status
    };

    let line = Line::from(vec![
        Span::raw(" "),
        Span::raw(session.mode.name()),
        Span::raw(" | "),
        Span::raw(session.filter.name()),
        Span::raw(" | "),
        Span::styled(session.status.clone(), status_style),
    ]);

    let hint = Line::from(Span::styled(
        format!(" {} fps | Press '?' for help", session.metrics.fps_int()),
        theme.status,
    ));

    let widget = Paragraph::new(vec![line, hint]);
    frame.render_widget(widget, area);
}

fn render_centered_message(frame: &mut Frame, area: Rect, message: &str, style: Style) {
    // Vertical centering via leading blank lines.
    let top = area.height.saturating_sub(1) / 2;
    let mut lines: Vec<Line> = (0..top).map(|_| Line::from("")).collect();
    lines.push(Line::from(Span::styled(message.to_string(), style)));

    let widget = Paragraph::new(lines).alignment(Alignment::Center);
    frame.render_widget(widget, area);
}

/// Convert a truecolor-escaped art block into Ratatui lines.
///
/// Only the sequences the ANSI renderer emits are understood: `38;2;R;G;B`
/// foregrounds and `0` resets; anything else is skipped.
pub(crate) fn ansi_art_lines(text: &str) -> Vec<Line<'static>> {
    text.lines().map(ansi_line).collect()
}

fn ansi_line(line: &str) -> Line<'static> {
    let mut spans = Vec::new();
    let mut current = String::new();
    let mut fg: Option<Color> = None;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        if c != '\x1b' {
            current.push(c);
            continue;
        }

        if !current.is_empty() {
            spans.push(make_span(std::mem::take(&mut current), fg));
        }

        if chars.peek() == Some(&'[') {
            chars.next();
            let mut params = String::new();
            while let Some(&next) = chars.peek() {
                chars.next();
                if next.is_ascii_alphabetic() {
                    if next == 'm' {
                        if params == "0" {
                            fg = None;
                        } else if let Some(color) = parse_sgr_fg(&params) {
                            fg = Some(color);
                        }
                    }
                    break;
                }
                params.push(next);
            }
        }
    }

    if !current.is_empty() {
        spans.push(make_span(current, fg));
    }
    Line::from(spans)
}

fn make_span(text: String, fg: Option<Color>) -> Span<'static> {
    match fg {
        Some(color) => Span::styled(text, Style::default().fg(color)),
        None => Span::raw(text),
    }
}

/// Parse SGR parameters, returning the truecolor foreground if present.
fn parse_sgr_fg(params: &str) -> Option<Color> {
    let parts: Vec<&str> = params.split(';').collect();
    if parts.len() == 5 && parts[0] == "38" && parts[1] == "2" {
        if let (Ok(r), Ok(g), Ok(b)) = (
            parts[2].parse::<u8>(),
            parts[3].parse::<u8>(),
            parts[4].parse::<u8>(),
        ) {
            return Some(Color::Rgb(r, g, b));
        }
    }
    None
}
