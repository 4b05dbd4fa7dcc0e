use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use clipsort_core::auth::{AuthField, AuthMode};

use super::{centered_rect, spinner_char};
use crate::app::App;
use crate::theme::Theme;

/// Sign-in / registration form. Submission is only offered while the health
/// probe reports the server online.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let form = &app.auth;

    let [body, footer] = Layout::vertical([Constraint::Min(3), Constraint::Length(1)]).areas(area);
    let popup = centered_rect(56, 14, body);

    let title = match form.mode {
        AuthMode::Login => " Sign in ",
        AuthMode::Register => " Register ",
    };

    let mut lines = vec![status_line(app, theme), Line::from("")];
    for field in form.fields() {
        lines.push(field_line(app, *field, theme));
    }
    lines.push(Line::from(""));

    if form.submitting {
        lines.push(Line::from(Span::styled(
            format!("  {} Working...", spinner_char(app.tick)),
            Style::default().fg(theme.spinner),
        )));
    } else if let Some(err) = &form.error {
        lines.push(Line::from(Span::styled(
            format!("  {err}"),
            Style::default().fg(theme.error),
        )));
    } else if let Some(ok) = &form.success {
        lines.push(Line::from(Span::styled(
            format!("  {ok}"),
            Style::default().fg(theme.success),
        )));
    }

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(theme.border_style())
        .title(Span::styled(title, theme.header_style()));
    f.render_widget(Paragraph::new(lines).block(block), popup);

    let submit_hint = if app.availability.allows_auth() {
        "Enter submit"
    } else {
        "Enter disabled (server not online)"
    };
    let other_mode = match form.mode {
        AuthMode::Login => "register",
        AuthMode::Register => "login",
    };
    let hints = format!(" Tab next field \u{2502} Ctrl+t {other_mode} \u{2502} {submit_hint} \u{2502} Ctrl+c quit");
    f.render_widget(
        Paragraph::new(Line::from(Span::styled(hints, theme.footer_style()))),
        footer,
    );
}

fn status_line<'a>(app: &App, theme: &Theme) -> Line<'a> {
    let availability = app.availability;
    let mut spans = vec![
        Span::styled("  Server ", Style::default().fg(theme.dim)),
        Span::styled(app.server.clone(), Style::default().fg(theme.text)),
        Span::raw("  "),
    ];
    spans.push(Span::styled(
        format!("\u{25CF} {}", availability.label()),
        Style::default()
            .fg(theme.availability_color(availability))
            .add_modifier(Modifier::BOLD),
    ));
    Line::from(spans)
}

fn field_line<'a>(app: &App, field: AuthField, theme: &Theme) -> Line<'a> {
    let form = &app.auth;
    let (label, value) = match field {
        AuthField::Email => ("Email", form.email.clone()),
        AuthField::Password => ("Password", "*".repeat(form.password.chars().count())),
        AuthField::Confirm => ("Confirm", "*".repeat(form.confirm.chars().count())),
    };
    let focused = form.field == field;
    let marker = if focused { "\u{25B6} " } else { "  " };
    let cursor = if focused && app.tick % 10 < 5 { "_" } else { " " };
    let value_style = if focused {
        Style::default().fg(theme.text).add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(theme.text)
    };
    Line::from(vec![
        Span::styled(format!("  {marker}"), Style::default().fg(theme.active)),
        Span::styled(format!("{label:<10}"), Style::default().fg(theme.dim)),
        Span::styled(value, value_style),
        Span::styled(cursor, Style::default().fg(theme.active)),
    ])
}
