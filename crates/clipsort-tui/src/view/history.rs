use ratatui::Frame;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::widgets::{Block, Borders, Cell, Row, Table, TableState};

use super::{short_timestamp, spinner_char, truncate};
use crate::app::{App, Pane};

/// Reviewer's past decisions, one page at a time.
pub fn render(f: &mut Frame, app: &App, area: Rect) {
    let theme = &app.theme;
    let pager = app.controller.history();
    let page = pager.page();
    let focused = app.pane == Pane::History && app.picker.is_none();

    let mut title = format!(
        " History  page {}/{}  size {} ",
        page.page_index + 1,
        page.total_pages.max(1),
        page.page_size
    );
    if pager.is_loading() {
        title.push_str(&format!("{} ", spinner_char(app.tick)));
    }

    let name_width = (area.width as usize).saturating_sub(58).max(12);
    let header = Row::new(vec!["File", "Labelled", "Classified", "At", ""]).style(
        Style::default()
            .fg(theme.active)
            .add_modifier(Modifier::BOLD),
    );

    let rows: Vec<Row> = pager
        .items()
        .iter()
        .map(|record| {
            let marker = if pager.is_reclassifying(record.id) {
                spinner_char(app.tick).to_string()
            } else if record.is_reclassified() {
                "*".to_string()
            } else {
                String::new()
            };
            Row::new(vec![
                Cell::from(truncate(&record.filename, name_width))
                    .style(Style::default().fg(theme.text)),
                Cell::from(record.initial_category.label().to_string())
                    .style(Style::default().fg(theme.category_color(&record.initial_category))),
                Cell::from(record.current_category.label().to_string())
                    .style(theme.category_style(&record.current_category)),
                Cell::from(short_timestamp(record.classified_at.as_deref().unwrap_or("")))
                    .style(Style::default().fg(theme.dim)),
                Cell::from(marker).style(Style::default().fg(theme.spinner)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Min(12),
        Constraint::Length(18),
        Constraint::Length(18),
        Constraint::Length(17),
        Constraint::Length(2),
    ];
    let border = if focused {
        Style::default().fg(theme.active)
    } else {
        theme.border_style()
    };
    let table = Table::new(rows, widths)
        .header(header)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(border)
                .title(title),
        )
        .row_highlight_style(theme.highlight_style());

    let mut state = TableState::default();
    if focused && !pager.items().is_empty() {
        state.select(Some(app.history_cursor));
    }
    f.render_stateful_widget(table, area, &mut state);
}
