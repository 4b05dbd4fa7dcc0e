use clipsort_core::Category;
use ratatui::Frame;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::centered_rect;
use crate::theme::Theme;

type Section = (&'static str, &'static [(&'static str, &'static str)]);

const SECTIONS: &[Section] = &[
    (
        "Session",
        &[
            ("Space", "Play / pause the current file"),
            ("Enter / c", "Pick any category"),
            ("r", "Load the next file"),
            ("p", "Bring back the previous file"),
        ],
    ),
    (
        "History",
        &[
            ("Tab", "Focus history / session"),
            ("j k \u{2191} \u{2193}", "Select row"),
            ("v s a u", "Reclassify selected row"),
            ("[ ] PgUp PgDn", "Previous / next page"),
            ("+ / -", "Change page size"),
        ],
    ),
    (
        "Sign in",
        &[
            ("Tab \u{2191} \u{2193}", "Move between fields"),
            ("Ctrl+t", "Switch login / register"),
            ("Enter", "Submit"),
        ],
    ),
    (
        "Anywhere",
        &[
            ("Esc", "Dismiss notification / go back"),
            ("L", "Sign out"),
            ("?", "Toggle this help"),
            ("q  Ctrl+c", "Quit"),
        ],
    ),
];

/// Render the help overlay as a centered popup.
pub fn render(f: &mut Frame, theme: &Theme) {
    let popup = centered_rect(60, 32, f.area());

    let mut lines = vec![
        Line::from(Span::styled(
            " Keyboard Shortcuts ",
            theme.header_style(),
        )),
        Line::from(""),
        heading("Classify", theme),
    ];
    // One line per built-in, in its display color.
    for category in Category::BUILT_INS {
        let key = category.shortcut().map(String::from).unwrap_or_default();
        lines.push(Line::from(vec![
            Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
            Span::styled(category.label().to_string(), theme.category_style(&category)),
        ]));
    }

    for (title, keys) in SECTIONS {
        lines.push(Line::from(""));
        lines.push(heading(title, theme));
        lines.extend(keys.iter().map(|(key, desc)| {
            Line::from(vec![
                Span::styled(format!("    {key:<16}"), Style::default().fg(theme.text)),
                Span::styled(*desc, Style::default().fg(theme.dim)),
            ])
        }));
    }

    let help = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .block(
            Block::default()
                .title(" Help ")
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active)),
        );

    f.render_widget(Clear, popup);
    f.render_widget(help, popup);
}

fn heading<'a>(title: &'a str, theme: &Theme) -> Line<'a> {
    Line::styled(
        format!("  {title}"),
        Style::default().fg(theme.active).add_modifier(Modifier::BOLD),
    )
}
