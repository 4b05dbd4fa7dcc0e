use std::io::Write;

use clipsort_core::auth::AuthOutcome;
use clipsort_core::{AudioFileRecord, Availability, Category, CategoryCatalog, HistoryPage};
use owo_colors::OwoColorize;

/// Whether to use colored output.
#[derive(Debug, Clone, Copy)]
pub struct ColorMode(pub bool);

impl ColorMode {
    pub fn enabled(&self) -> bool {
        self.0
    }
}

fn paint_category(category: &Category, color: ColorMode) -> String {
    let label = category.label();
    if !color.enabled() {
        return label.to_string();
    }
    match category {
        Category::Voice => label.green().bold().to_string(),
        Category::Silent => label.dimmed().to_string(),
        Category::AnsweringMachine => label.yellow().bold().to_string(),
        Category::Undefined => label.magenta().to_string(),
        Category::Custom(_) => label.cyan().to_string(),
    }
}

pub fn print_health(
    w: &mut dyn Write,
    base_url: &str,
    availability: Availability,
    color: ColorMode,
) -> std::io::Result<()> {
    let label = availability.label();
    if color.enabled() {
        let painted = match availability {
            Availability::Available => label.green().bold().to_string(),
            Availability::Unavailable => label.red().bold().to_string(),
            Availability::Unknown => label.dimmed().to_string(),
        };
        writeln!(w, "{} {}", base_url, painted)
    } else {
        writeln!(w, "{} {}", base_url, label)
    }
}

/// Print the file handed out for review.
pub fn print_file(w: &mut dyn Write, file: &AudioFileRecord, color: ColorMode) -> std::io::Result<()> {
    if color.enabled() {
        writeln!(w, "{} {}", format!("#{}", file.id).dimmed(), file.filename.bold())?;
    } else {
        writeln!(w, "#{} {}", file.id, file.filename)?;
    }
    writeln!(w, "  url:       {}", file.file_path)?;
    writeln!(
        w,
        "  labelled:  {}",
        paint_category(&file.initial_category, color)
    )?;
    if !file.uploaded_at.is_empty() {
        writeln!(w, "  uploaded:  {} by {}", file.uploaded_at, file.uploaded_by)?;
    }
    Ok(())
}

pub fn print_classified(
    w: &mut dyn Write,
    id: i64,
    category: &Category,
    color: ColorMode,
) -> std::io::Result<()> {
    let mark = if color.enabled() {
        "\u{2713}".green().to_string()
    } else {
        "OK".to_string()
    };
    writeln!(w, "{} #{} classified as {}", mark, id, paint_category(category, color))
}

/// Print one history page as an aligned table.
pub fn print_history(w: &mut dyn Write, page: &HistoryPage, color: ColorMode) -> std::io::Result<()> {
    if page.items.is_empty() {
        writeln!(w, "No classified files yet.")?;
        return Ok(());
    }

    let name_width = page
        .items
        .iter()
        .map(|r| r.filename.chars().count())
        .max()
        .unwrap_or(4)
        .max(4);
    writeln!(
        w,
        "{:>6}  {:<name_width$}  {:<18}  {:<18}  {}",
        "ID", "FILE", "LABELLED", "CLASSIFIED", "AT"
    )?;
    for record in &page.items {
        let mark = if record.is_reclassified() { "*" } else { " " };
        // Pad before painting so escape codes do not skew the columns.
        let initial = format!("{:<18}", record.initial_category.label());
        let current = format!("{:<17}{}", record.current_category.label(), mark);
        let (initial, current) = if color.enabled() {
            (
                initial.dimmed().to_string(),
                paint_padded(&current, &record.current_category),
            )
        } else {
            (initial, current)
        };
        writeln!(
            w,
            "{:>6}  {:<name_width$}  {}  {}  {}",
            record.id,
            record.filename,
            initial,
            current,
            record.classified_at.as_deref().unwrap_or("-")
        )?;
    }
    writeln!(
        w,
        "page {}/{} ({} per page)",
        page.page_index + 1,
        page.total_pages.max(1),
        page.page_size
    )?;
    Ok(())
}

fn paint_padded(text: &str, category: &Category) -> String {
    match category {
        Category::Voice => text.green().to_string(),
        Category::Silent => text.dimmed().to_string(),
        Category::AnsweringMachine => text.yellow().to_string(),
        Category::Undefined => text.magenta().to_string(),
        Category::Custom(_) => text.cyan().to_string(),
    }
}

pub fn print_categories(
    w: &mut dyn Write,
    catalog: &CategoryCatalog,
    color: ColorMode,
) -> std::io::Result<()> {
    for category in catalog.all() {
        let key = category
            .shortcut()
            .map(|c| format!("[{c}]"))
            .unwrap_or_else(|| "   ".to_string());
        writeln!(w, "{} {}", key, paint_category(category, color))?;
    }
    Ok(())
}

pub fn print_auth(w: &mut dyn Write, outcome: &AuthOutcome, color: ColorMode) -> std::io::Result<()> {
    let text = match outcome {
        AuthOutcome::SignedIn { role: Some(role) } => format!("Signed in as {role}"),
        AuthOutcome::SignedIn { role: None } => "Signed in".to_string(),
        AuthOutcome::Registered => clipsort_core::auth::REGISTERED_MESSAGE.to_string(),
    };
    if color.enabled() {
        writeln!(w, "{}", text.green())
    } else {
        writeln!(w, "{}", text)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(id: i64, name: &str, current: Category) -> AudioFileRecord {
        AudioFileRecord {
            id,
            file_path: format!("/files/{name}"),
            filename: name.to_string(),
            initial_category: Category::Voice,
            current_category: current,
            uploaded_at: String::new(),
            uploaded_by: String::new(),
            classified_at: Some("2024-10-02T10:00:00".into()),
        }
    }

    #[test]
    fn history_marks_reclassified_rows() {
        let page = HistoryPage {
            items: vec![
                record(1, "a.wav", Category::Voice),
                record(2, "b.wav", Category::Silent),
            ],
            page_index: 0,
            page_size: 10,
            total_pages: 1,
        };
        let mut buf = Vec::new();
        print_history(&mut buf, &page, ColorMode(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();
        assert!(lines[1].contains("a.wav"));
        assert!(!lines[1].contains('*'));
        assert!(lines[2].contains("Silent"));
        assert!(lines[2].contains('*'));
        assert_eq!(lines[3], "page 1/1 (10 per page)");
    }

    #[test]
    fn categories_show_shortcuts() {
        let mut buf = Vec::new();
        print_categories(&mut buf, &CategoryCatalog::default(), ColorMode(false)).unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert!(text.starts_with("[v] Voice\n"));
        assert!(text.contains("[a] Answering Machine"));
    }
}
