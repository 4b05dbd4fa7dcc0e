use ratatui::Frame;
use ratatui::layout::Alignment;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::centered_rect;
use crate::theme::Theme;

/// Ask before leaving. Warns when a decision has not reached the server yet.
pub fn render(f: &mut Frame, theme: &Theme, decision_pending: bool) {
    let height = if decision_pending { 6 } else { 5 };
    let popup = centered_rect(44, height, f.area());

    let bold = |color: Color| Style::default().fg(color).add_modifier(Modifier::BOLD);
    let mut lines = vec![Line::from(""), Line::styled("Quit clipsort?", bold(theme.text))];
    if decision_pending {
        lines.push(Line::styled(
            "A classification is still being saved.",
            Style::default().fg(theme.error),
        ));
    }
    lines.push(Line::from(vec![
        Span::styled("q", bold(theme.error)),
        Span::styled(" quit    ", Style::default().fg(theme.dim)),
        Span::styled("Esc", bold(theme.active)),
        Span::styled(" stay", Style::default().fg(theme.dim)),
    ]));

    let dialog = Paragraph::new(lines).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(theme.error))
            .title(" Quit "),
    );

    f.render_widget(Clear, popup);
    f.render_widget(dialog, popup);
}
