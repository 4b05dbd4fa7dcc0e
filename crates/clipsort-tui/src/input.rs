use std::io;
use std::time::Duration;

use clipsort_core::keyboard::{InputEvent, InputPort, KeyCode, KeyStroke};
use ratatui::crossterm::event::{self, Event, KeyEventKind, KeyModifiers};

use crate::action::Action;
use crate::app::InputMode;

/// The real terminal as an input source.
#[derive(Debug, Default)]
pub struct TerminalInput;

impl InputPort for TerminalInput {
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        Ok(convert(&event::read()?))
    }
}

/// Translate a crossterm event. Key releases and repeats are dropped.
pub fn convert(event: &Event) -> Option<InputEvent> {
    match event {
        Event::Key(key) if key.kind == KeyEventKind::Press => {
            use ratatui::crossterm::event::KeyCode as Ct;
            let code = match key.code {
                Ct::Char(c) => KeyCode::Char(c),
                Ct::Enter => KeyCode::Enter,
                Ct::Esc => KeyCode::Esc,
                Ct::Tab => KeyCode::Tab,
                Ct::BackTab => KeyCode::BackTab,
                Ct::Backspace => KeyCode::Backspace,
                Ct::Delete => KeyCode::Delete,
                Ct::Up => KeyCode::Up,
                Ct::Down => KeyCode::Down,
                Ct::Left => KeyCode::Left,
                Ct::Right => KeyCode::Right,
                Ct::PageUp => KeyCode::PageUp,
                Ct::PageDown => KeyCode::PageDown,
                Ct::Home => KeyCode::Home,
                Ct::End => KeyCode::End,
                _ => KeyCode::Other,
            };
            Some(InputEvent::Key(KeyStroke {
                code,
                ctrl: key.modifiers.contains(KeyModifiers::CONTROL),
            }))
        }
        Event::Resize(w, h) => Some(InputEvent::Resize(*w, *h)),
        _ => None,
    }
}

/// Map an input event to a TUI action, respecting input mode.
pub fn map_event(event: &InputEvent, input_mode: &InputMode) -> Action {
    match event {
        InputEvent::Key(key) => {
            // Ctrl+C always quits regardless of mode
            if key.ctrl && key.code == KeyCode::Char('c') {
                return Action::Quit;
            }

            match input_mode {
                InputMode::Normal => map_key_normal(key),
                InputMode::TextInput => map_key_text_input(key),
            }
        }
        InputEvent::Resize(w, h) => Action::Resize(*w, *h),
    }
}

fn map_key_normal(key: &KeyStroke) -> Action {
    if key.ctrl {
        return Action::None;
    }
    match key.code {
        KeyCode::Char('q') => Action::Quit,
        KeyCode::Char('?') => Action::ToggleHelp,
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Char('j') | KeyCode::Down => Action::MoveDown,
        KeyCode::Char('k') | KeyCode::Up => Action::MoveUp,
        KeyCode::Enter => Action::DrillIn,
        KeyCode::Char('c') => Action::OpenPicker,
        KeyCode::Char(']') | KeyCode::PageDown => Action::NextPage,
        KeyCode::Char('[') | KeyCode::PageUp => Action::PrevPage,
        KeyCode::Char('+') | KeyCode::Char('=') => Action::GrowPageSize,
        KeyCode::Char('-') => Action::ShrinkPageSize,
        KeyCode::Char('r') => Action::Retry,
        KeyCode::Char('p') => Action::RecallPrevious,
        KeyCode::Tab | KeyCode::BackTab => Action::SwitchPane,
        KeyCode::Char('L') => Action::SignOut,
        _ => Action::Key(*key),
    }
}

fn map_key_text_input(key: &KeyStroke) -> Action {
    if key.ctrl {
        return match key.code {
            KeyCode::Char('t') => Action::ToggleAuthMode,
            _ => Action::None,
        };
    }
    match key.code {
        KeyCode::Esc => Action::NavigateBack,
        KeyCode::Enter => Action::Submit,
        KeyCode::Tab | KeyCode::Down => Action::NextField,
        KeyCode::BackTab | KeyCode::Up => Action::PrevField,
        KeyCode::Backspace => Action::Backspace,
        KeyCode::Char(c) => Action::TextInput(c),
        _ => Action::None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratatui::crossterm::event::{KeyCode as Ct, KeyEvent};

    #[test]
    fn ctrl_c_quits_in_every_mode() {
        let key = InputEvent::Key(KeyStroke::ctrl(KeyCode::Char('c')));
        assert_eq!(map_event(&key, &InputMode::Normal), Action::Quit);
        assert_eq!(map_event(&key, &InputMode::TextInput), Action::Quit);
    }

    #[test]
    fn letters_are_text_while_typing() {
        let key = InputEvent::Key(KeyStroke::char('v'));
        assert_eq!(map_event(&key, &InputMode::TextInput), Action::TextInput('v'));
        assert_eq!(
            map_event(&key, &InputMode::Normal),
            Action::Key(KeyStroke::char('v'))
        );
    }

    #[test]
    fn only_presses_are_converted() {
        let press = Event::Key(KeyEvent::new(Ct::Char(' '), KeyModifiers::NONE));
        assert_eq!(
            convert(&press),
            Some(InputEvent::Key(KeyStroke::char(' ')))
        );

        let mut release = KeyEvent::new(Ct::Char(' '), KeyModifiers::NONE);
        release.kind = KeyEventKind::Release;
        assert_eq!(convert(&Event::Key(release)), None);
    }
}
