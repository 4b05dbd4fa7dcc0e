use ratatui::Frame;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState};

use super::centered_rect;
use crate::app::{App, PickTarget, PickerState};

/// Category picker popup. Lists every category in the catalog, built-ins
/// first, with their shortcut where one exists.
pub fn render(f: &mut Frame, app: &App, picker: &PickerState) {
    let theme = &app.theme;
    let catalog = app.controller.catalog();
    let height = (catalog.len() as u16).saturating_add(2).min(f.area().height);
    let popup = centered_rect(36, height, f.area());

    let items: Vec<ListItem> = catalog
        .all()
        .iter()
        .map(|category| {
            let key = category
                .shortcut()
                .map(|c| format!("[{c}] "))
                .unwrap_or_else(|| "    ".to_string());
            ListItem::new(Line::from(vec![
                Span::styled(key, Style::default().fg(theme.dim)),
                Span::styled(category.label().to_string(), theme.category_style(category)),
            ]))
        })
        .collect();

    let title = match picker.target {
        PickTarget::Current => " Classify as ".to_string(),
        PickTarget::History(id) => format!(" Reclassify #{id} as "),
    };
    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(theme.active))
                .title(title),
        )
        .highlight_style(theme.highlight_style())
        .highlight_symbol("\u{25B6} ");

    let mut state = ListState::default().with_selected(Some(picker.cursor));
    f.render_widget(Clear, popup);
    f.render_stateful_widget(list, popup, &mut state);
}
