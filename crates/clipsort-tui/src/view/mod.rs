use ratatui::layout::{Constraint, Flex, Layout, Rect};

pub mod auth;
pub mod classify;
pub mod help;
pub mod history;
pub mod picker;
pub mod quit_confirm;

/// Spinner frames for animated progress indication.
const SPINNER_FRAMES: &[char] = &[
    '\u{280B}', '\u{2819}', '\u{2839}', '\u{2838}', '\u{283C}', '\u{2834}', '\u{2826}', '\u{2827}',
    '\u{2807}', '\u{280F}',
];

/// Get the current spinner character based on a tick counter.
pub fn spinner_char(tick: usize) -> char {
    SPINNER_FRAMES[tick % SPINNER_FRAMES.len()]
}

/// Truncate a string to fit in `max_width` columns, appending "\u{2026}" if truncated.
pub fn truncate(s: &str, max_width: usize) -> String {
    if max_width == 0 {
        return String::new();
    }
    if s.chars().count() <= max_width {
        return s.to_string();
    }
    let mut truncated: String = s.chars().take(max_width.saturating_sub(1)).collect();
    truncated.push('\u{2026}');
    truncated
}

/// `2024-10-02T10:15:00.123` -> `2024-10-02 10:15`
pub fn short_timestamp(ts: &str) -> String {
    let ts = ts.replacen('T', " ", 1);
    ts.chars().take(16).collect()
}

/// Create a centered rectangle of the given width (columns) and height (rows).
pub fn centered_rect(width: u16, height: u16, area: Rect) -> Rect {
    let vertical = Layout::vertical([Constraint::Length(height)])
        .flex(Flex::Center)
        .split(area);
    Layout::horizontal([Constraint::Length(width)])
        .flex(Flex::Center)
        .split(vertical[0])[0]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn truncate_counts_chars() {
        assert_eq!(truncate("räksmörgås.wav", 6), "räksm\u{2026}");
        assert_eq!(truncate("a.wav", 10), "a.wav");
        assert_eq!(truncate("a.wav", 0), "");
    }

    #[test]
    fn timestamps_are_shortened() {
        assert_eq!(short_timestamp("2024-10-02T10:15:00.123"), "2024-10-02 10:15");
        assert_eq!(short_timestamp(""), "");
    }
}
