//! Keyboard shortcuts for the classification view.

use std::collections::VecDeque;
use std::io;
use std::time::Duration;

use crate::category::Category;
use crate::session::Session;

/// Terminal-independent key code.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCode {
    Char(char),
    Enter,
    Esc,
    Tab,
    BackTab,
    Backspace,
    Delete,
    Up,
    Down,
    Left,
    Right,
    PageUp,
    PageDown,
    Home,
    End,
    Other,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyStroke {
    pub code: KeyCode,
    pub ctrl: bool,
}

impl KeyStroke {
    pub fn plain(code: KeyCode) -> Self {
        Self { code, ctrl: false }
    }

    pub fn ctrl(code: KeyCode) -> Self {
        Self { code, ctrl: true }
    }

    pub fn char(c: char) -> Self {
        Self::plain(KeyCode::Char(c))
    }
}

/// Events an input source delivers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    Key(KeyStroke),
    Resize(u16, u16),
}

/// Source of input events: the terminal in production, a script in tests.
pub trait InputPort {
    /// Wait up to `timeout` for the next event.
    fn poll_event(&mut self, timeout: Duration) -> io::Result<Option<InputEvent>>;
}

/// Replays a fixed list of events, then reports no input.
#[derive(Debug, Default)]
pub struct ScriptedInput {
    events: VecDeque<InputEvent>,
}

impl ScriptedInput {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self {
            events: events.into_iter().collect(),
        }
    }

    pub fn keys(keys: &str) -> Self {
        Self::new(keys.chars().map(|c| InputEvent::Key(KeyStroke::char(c))))
    }

    pub fn is_drained(&self) -> bool {
        self.events.is_empty()
    }
}

impl InputPort for ScriptedInput {
    fn poll_event(&mut self, _timeout: Duration) -> io::Result<Option<InputEvent>> {
        Ok(self.events.pop_front())
    }
}

/// Where keyboard focus currently sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Classification,
    /// A text field owns the keyboard; shortcuts are not intercepted.
    TextInput,
    /// Another view or overlay is active.
    Elsewhere,
}

/// What a shortcut asks the session to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyCommand {
    TogglePlayback,
    Classify(Category),
}

/// Maps key strokes to classification commands while attached.
///
/// Reads the session at dispatch time instead of capturing it, so a command
/// always reflects the latest state.
#[derive(Debug, Default)]
pub struct KeyboardDispatcher {
    attached: bool,
    focus: Focus,
}

impl KeyboardDispatcher {
    pub fn attach(&mut self) {
        self.attached = true;
    }

    pub fn detach(&mut self) {
        self.attached = false;
    }

    pub fn is_attached(&self) -> bool {
        self.attached
    }

    pub fn set_focus(&mut self, focus: Focus) {
        self.focus = focus;
    }

    pub fn focus(&self) -> Focus {
        self.focus
    }

    pub fn dispatch(&self, key: &KeyStroke, session: &Session) -> Option<KeyCommand> {
        if !self.attached || self.focus != Focus::Classification || key.ctrl {
            return None;
        }
        match key.code {
            KeyCode::Char(' ') if session.is_reviewing() => Some(KeyCommand::TogglePlayback),
            KeyCode::Char(c) => Category::from_shortcut(c).map(KeyCommand::Classify),
            _ => None,
        }
    }
}
