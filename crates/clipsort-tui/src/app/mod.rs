mod backend;
mod update;

use std::io;
use std::time::Duration;

use ratatui::layout::{Constraint, Layout, Rect};
use tokio::sync::mpsc;

use clipsort_core::auth::AuthForm;
use clipsort_core::keyboard::{Focus, InputPort, KeyboardDispatcher};
use clipsort_core::playback::Playback;
use clipsort_core::{
    AudioFileRecord, Availability, Category, Controller, ControllerSettings, Effect, FileId,
};

use crate::theme::Theme;
use crate::tui_event::BackendCommand;

/// Which screen is currently displayed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Auth,
    Classify,
}

/// Input mode determines how keyboard input is interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputMode {
    Normal,
    TextInput,
}

/// Panel of the classification screen that owns the keyboard.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pane {
    Session,
    History,
}

/// What a category chosen in the picker is applied to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PickTarget {
    Current,
    History(FileId),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PickerState {
    pub target: PickTarget,
    pub cursor: usize,
}

/// Main application state.
pub struct App {
    pub screen: Screen,
    pub input_mode: InputMode,
    pub theme: Theme,
    pub controller: Controller,
    pub dispatcher: KeyboardDispatcher,
    pub auth: AuthForm,
    /// Last health report for the auth screen.
    pub availability: Availability,
    /// Bumped every time health polling restarts; older reports are ignored.
    pub(crate) health_generation: u64,
    /// Role of the signed-in reviewer, `ROLE_` prefix stripped.
    pub role: Option<String>,
    pub server: String,
    pub pane: Pane,
    pub history_cursor: usize,
    pub picker: Option<PickerState>,
    pub player: Box<dyn Playback>,
    pub tick: usize,
    pub show_help: bool,
    pub confirm_quit: bool,
    pub should_quit: bool,
    /// Channel to send commands to the backend task.
    pub backend_cmd_tx: Option<mpsc::UnboundedSender<BackendCommand>>,
}

impl App {
    pub fn new(settings: ControllerSettings, theme: Theme, player: Box<dyn Playback>) -> Self {
        Self {
            screen: Screen::Auth,
            input_mode: InputMode::TextInput,
            theme,
            controller: Controller::new(settings),
            dispatcher: KeyboardDispatcher::default(),
            auth: AuthForm::default(),
            availability: Availability::Unknown,
            health_generation: 0,
            role: None,
            server: String::new(),
            pane: Pane::Session,
            history_cursor: 0,
            picker: None,
            player,
            tick: 0,
            show_help: false,
            confirm_quit: false,
            should_quit: false,
            backend_cmd_tx: None,
        }
    }

    pub(crate) fn send(&self, cmd: BackendCommand) {
        match &self.backend_cmd_tx {
            Some(tx) => {
                if tx.send(cmd).is_err() {
                    tracing::warn!("backend channel closed");
                }
            }
            None => tracing::debug!(?cmd, "no backend attached"),
        }
    }

    /// Apply playback effects locally and hand remote ones to the backend.
    pub(crate) fn run_effects(&mut self, effects: Vec<Effect>) {
        let epoch = self.controller.epoch();
        for effect in effects {
            match effect {
                Effect::Playback(cmd) => self.player.apply(&cmd),
                effect => self.send(BackendCommand::Run { epoch, effect }),
            }
        }
    }

    /// Wait up to `timeout` for one input event and apply it.
    pub fn poll_input<P: InputPort>(&mut self, input: &mut P, timeout: Duration) -> io::Result<()> {
        if let Some(event) = input.poll_event(timeout)? {
            let action = crate::input::map_event(&event, &self.input_mode);
            self.update(action);
        }
        Ok(())
    }

    /// Show the sign-in form and start health polling for it.
    pub fn enter_auth(&mut self) {
        let effects = self.controller.unmount();
        self.run_effects(effects);
        self.dispatcher.detach();
        self.dispatcher.set_focus(Focus::TextInput);
        self.picker = None;
        self.pane = Pane::Session;
        self.history_cursor = 0;
        self.role = None;

        self.screen = Screen::Auth;
        self.input_mode = InputMode::TextInput;
        self.availability = Availability::Unknown;
        self.health_generation += 1;
        self.send(BackendCommand::StartHealth {
            generation: self.health_generation,
        });
    }

    /// Leave the sign-in form for the classification view.
    pub fn enter_classification(&mut self, role: Option<String>) {
        if self.screen == Screen::Auth {
            self.send(BackendCommand::StopHealth);
        }
        self.screen = Screen::Classify;
        self.input_mode = InputMode::Normal;
        self.role = role;
        self.pane = Pane::Session;
        self.dispatcher.attach();
        self.sync_focus();
        let effects = self.controller.mount();
        self.run_effects(effects);
    }

    /// Drop the stored token and go back to the sign-in form.
    pub fn sign_out(&mut self) {
        tracing::info!("signing out");
        self.send(BackendCommand::SignOut);
        self.enter_auth();
    }

    /// Stop playback and background work before the process exits.
    pub fn shutdown(&mut self) {
        let effects = self.controller.unmount();
        self.run_effects(effects);
        if self.screen == Screen::Auth {
            self.send(BackendCommand::StopHealth);
        }
    }

    /// Shortcuts only reach the dispatcher while the session pane has focus
    /// and nothing is layered on top of it.
    pub(crate) fn sync_focus(&mut self) {
        let focus = if self.screen != Screen::Classify {
            Focus::TextInput
        } else if self.picker.is_some() || self.show_help || self.confirm_quit {
            Focus::Elsewhere
        } else if self.pane == Pane::History {
            Focus::Elsewhere
        } else {
            Focus::Classification
        };
        self.dispatcher.set_focus(focus);
    }

    pub fn selected_history(&self) -> Option<&AudioFileRecord> {
        self.controller.history().items().get(self.history_cursor)
    }

    pub(crate) fn clamp_history_cursor(&mut self) {
        let len = self.controller.history().items().len();
        self.history_cursor = self.history_cursor.min(len.saturating_sub(1));
    }

    /// Open the category picker for the current file or the selected row.
    pub(crate) fn open_picker(&mut self) {
        let target = match self.pane {
            Pane::Session if self.controller.session().is_reviewing() => PickTarget::Current,
            Pane::History => match self.selected_history() {
                Some(record) => PickTarget::History(record.id),
                None => return,
            },
            Pane::Session => return,
        };
        self.picker = Some(PickerState { target, cursor: 0 });
        self.sync_focus();
    }

    pub(crate) fn apply_category(&mut self, target: PickTarget, category: Category) {
        let command = match target {
            PickTarget::Current => clipsort_core::Command::Classify(category),
            PickTarget::History(id) => clipsort_core::Command::Reclassify { id, category },
        };
        let effects = self.controller.handle(command);
        self.run_effects(effects);
    }

    /// Render the current screen.
    pub fn view(&self, f: &mut ratatui::Frame) {
        let area = f.area();
        match self.screen {
            Screen::Auth => crate::view::auth::render(f, self, area),
            Screen::Classify => {
                let [body, footer] =
                    Layout::vertical([Constraint::Min(5), Constraint::Length(1)]).areas(area);
                self.render_classify(f, body);
                crate::view::classify::render_footer(f, self, footer);
            }
        }

        if let Some(picker) = &self.picker {
            crate::view::picker::render(f, self, picker);
        }

        if self.show_help {
            crate::view::help::render(f, &self.theme);
        }

        if self.confirm_quit {
            crate::view::quit_confirm::render(f, &self.theme, self.controller.is_submitting());
        }
    }

    fn render_classify(&self, f: &mut ratatui::Frame, area: Rect) {
        let [header, main] = Layout::vertical([Constraint::Length(1), Constraint::Min(4)]).areas(area);
        crate::view::classify::render_header(f, self, header);

        let [session, history] =
            Layout::vertical([Constraint::Length(11), Constraint::Min(5)]).areas(main);
        crate::view::classify::render_session(f, self, session);
        crate::view::history::render(f, self, history);
    }
}
