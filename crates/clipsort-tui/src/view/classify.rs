use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use clipsort_core::session::{EXHAUSTED_MESSAGE, Session, SessionStatus};
use clipsort_core::{AudioFileRecord, Category};

use super::{short_timestamp, spinner_char, truncate};
use crate::app::{App, Pane};
use crate::theme::Theme;

pub fn render_header(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let mut spans = vec![
        Span::styled(" clipsort ", theme.header_style()),
        Span::styled(
            format!(" {}", app.server),
            Style::default().fg(theme.dim),
        ),
    ];
    if let Some(role) = &app.role {
        spans.push(Span::styled(
            format!("  [{role}]"),
            Style::default().fg(theme.active),
        ));
    }
    if let Some(note) = app.controller.notification() {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(
            note.message.clone(),
            Style::default()
                .fg(theme.severity_color(note.severity))
                .add_modifier(Modifier::BOLD),
        ));
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// The file under review, or the reason there is none.
pub fn render_session(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let focused = app.pane == Pane::Session && app.picker.is_none();
    let border = if focused {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(border)
        .title(" Now reviewing ");

    let width = area.width.saturating_sub(16) as usize;
    let lines = match app.controller.session() {
        Session::Reviewing(file) => file_lines(app, file, width, theme),
        Session::Empty => empty_lines(app, theme),
    };

    f.render_widget(
        Paragraph::new(lines).block(block).wrap(Wrap { trim: false }),
        area,
    );
}

fn file_lines<'a>(app: &App, file: &AudioFileRecord, width: usize, theme: &Theme) -> Vec<Line<'a>> {
    let (playback, playback_color) = theme.playback_label(app.player.state());
    let mut lines = vec![
        Line::from(vec![
            Span::styled("  File        ", Style::default().fg(theme.dim)),
            Span::styled(
                truncate(&file.filename, width),
                Style::default().fg(theme.text).add_modifier(Modifier::BOLD),
            ),
            Span::styled(format!("  #{}", file.id), Style::default().fg(theme.dim)),
        ]),
        Line::from(vec![
            Span::styled("  Labelled    ", Style::default().fg(theme.dim)),
            Span::styled(
                file.initial_category.label().to_string(),
                theme.category_style(&file.initial_category),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Uploaded    ", Style::default().fg(theme.dim)),
            Span::styled(
                format!(
                    "{} by {}",
                    short_timestamp(&file.uploaded_at),
                    if file.uploaded_by.is_empty() { "?" } else { &file.uploaded_by }
                ),
                Style::default().fg(theme.text),
            ),
        ]),
        Line::from(vec![
            Span::styled("  Playback    ", Style::default().fg(theme.dim)),
            Span::styled(playback, Style::default().fg(playback_color)),
        ]),
        Line::from(""),
    ];

    let mut keys = vec![Span::styled("  ", Style::default())];
    for category in Category::BUILT_INS {
        if let Some(c) = category.shortcut() {
            keys.push(Span::styled(
                format!("[{c}]"),
                Style::default().fg(theme.dim),
            ));
            keys.push(Span::styled(
                format!(" {}  ", category.label()),
                theme.category_style(&category),
            ));
        }
    }
    keys.push(Span::styled("[c] other", Style::default().fg(theme.dim)));
    lines.push(Line::from(keys));
    lines
}

fn empty_lines<'a>(app: &App, theme: &Theme) -> Vec<Line<'a>> {
    let (text, color) = if app.controller.is_submitting() {
        (
            format!("{} Saving classification...", spinner_char(app.tick)),
            theme.spinner,
        )
    } else {
        match app.controller.status() {
            SessionStatus::Loading => (
                format!("{} Loading next file...", spinner_char(app.tick)),
                theme.spinner,
            ),
            SessionStatus::Exhausted => (EXHAUSTED_MESSAGE.to_string(), theme.text),
            SessionStatus::Failed(msg) => (msg.clone(), theme.error),
            SessionStatus::Idle => ("Nothing under review.".to_string(), theme.dim),
        }
    };

    let mut lines = vec![
        Line::from(""),
        Line::from(Span::styled(format!("  {text}"), Style::default().fg(color))),
        Line::from(""),
    ];
    if !app.controller.is_submitting() && !matches!(app.controller.status(), SessionStatus::Loading) {
        lines.push(Line::from(Span::styled(
            "  r load next file",
            Style::default().fg(theme.dim),
        )));
    }
    if let Some(previous) = app.controller.previous() {
        lines.push(Line::from(Span::styled(
            format!(
                "  p bring back {} ({})",
                previous.filename,
                previous.current_category
            ),
            Style::default().fg(theme.dim),
        )));
    }
    lines
}

pub fn render_footer(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let hints = match app.pane {
        Pane::Session => {
            " Space play/pause \u{2502} v/s/a/u classify \u{2502} c other \u{2502} r next \u{2502} p previous \u{2502} Tab history \u{2502} ? help \u{2502} q quit"
        }
        Pane::History => {
            " j/k select \u{2502} v/s/a/u reclassify \u{2502} Enter other \u{2502} [ ] page \u{2502} +/- size \u{2502} Tab back \u{2502} ? help"
        }
    };
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, theme.footer_style()))),
        area,
    );
}
