use ratatui::style::{Color, Modifier, Style};

use clipsort_core::playback::PlaybackState;
use clipsort_core::{Availability, Category, Severity};

/// Palette for every screen, including the per-category colors.
pub struct Theme {
    pub voice: Color,
    pub silent: Color,
    pub answering_machine: Color,
    pub undefined: Color,
    pub custom: Color,

    pub success: Color,
    pub error: Color,

    pub header_fg: Color,
    pub header_bg: Color,
    pub border: Color,
    pub text: Color,
    pub dim: Color,
    pub highlight_bg: Color,
    pub active: Color,
    pub spinner: Color,
    pub footer_fg: Color,
    pub footer_bg: Color,
}

impl Theme {
    /// Green on black. The default.
    pub fn hacker() -> Self {
        Self {
            voice: Color::Rgb(0, 210, 0),
            silent: Color::DarkGray,
            answering_machine: Color::Yellow,
            undefined: Color::Magenta,
            custom: Color::Cyan,

            success: Color::Rgb(0, 210, 0),
            error: Color::Red,

            header_fg: Color::Black,
            header_bg: Color::Rgb(0, 210, 0),
            border: Color::DarkGray,
            text: Color::White,
            dim: Color::DarkGray,
            highlight_bg: Color::Rgb(30, 50, 30),
            active: Color::Cyan,
            spinner: Color::Cyan,
            footer_fg: Color::DarkGray,
            footer_bg: Color::Reset,
        }
    }

    /// Blue accents on a dark header.
    pub fn modern() -> Self {
        Self {
            voice: Color::Rgb(0, 200, 80),
            silent: Color::Rgb(140, 140, 160),
            answering_machine: Color::Rgb(255, 200, 0),
            undefined: Color::Rgb(200, 50, 200),
            custom: Color::Rgb(60, 200, 220),

            success: Color::Rgb(0, 200, 80),
            error: Color::Rgb(255, 80, 80),

            header_fg: Color::White,
            header_bg: Color::Rgb(30, 60, 120),
            border: Color::Rgb(60, 60, 80),
            text: Color::White,
            dim: Color::Rgb(120, 120, 140),
            highlight_bg: Color::Rgb(30, 40, 80),
            active: Color::Rgb(60, 140, 255),
            spinner: Color::Rgb(60, 140, 255),
            footer_fg: Color::Rgb(120, 120, 140),
            footer_bg: Color::Reset,
        }
    }

    pub fn by_name(name: &str) -> Self {
        match name {
            "modern" => Self::modern(),
            _ => Self::hacker(),
        }
    }

    pub fn category_color(&self, category: &Category) -> Color {
        match category {
            Category::Voice => self.voice,
            Category::Silent => self.silent,
            Category::AnsweringMachine => self.answering_machine,
            Category::Undefined => self.undefined,
            Category::Custom(_) => self.custom,
        }
    }

    pub fn category_style(&self, category: &Category) -> Style {
        Style::default()
            .fg(self.category_color(category))
            .add_modifier(Modifier::BOLD)
    }

    pub fn severity_color(&self, severity: Severity) -> Color {
        match severity {
            Severity::Success => self.success,
            Severity::Error => self.error,
        }
    }

    pub fn availability_color(&self, availability: Availability) -> Color {
        match availability {
            Availability::Unknown => self.dim,
            Availability::Available => self.success,
            Availability::Unavailable => self.error,
        }
    }

    pub fn playback_label(&self, state: PlaybackState) -> (&'static str, Color) {
        match state {
            PlaybackState::Idle => ("\u{25A0} idle", self.dim),
            PlaybackState::Playing => ("\u{25B6} playing", self.active),
            PlaybackState::Paused => ("\u{2016} paused", self.text),
        }
    }

    pub fn header_style(&self) -> Style {
        Style::default()
            .fg(self.header_fg)
            .bg(self.header_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn highlight_style(&self) -> Style {
        Style::default()
            .bg(self.highlight_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border_style(&self) -> Style {
        Style::default().fg(self.border)
    }

    pub fn footer_style(&self) -> Style {
        Style::default().fg(self.footer_fg).bg(self.footer_bg)
    }
}
