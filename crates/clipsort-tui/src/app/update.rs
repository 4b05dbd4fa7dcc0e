use clipsort_core::keyboard::{KeyCode, KeyCommand};
use clipsort_core::{Category, Command, CoreError};

use super::{App, Pane, Screen};
use crate::action::Action;
use crate::tui_event::BackendCommand;

impl App {
    /// Process a user action and update state. Returns true if the app should quit.
    pub fn update(&mut self, action: Action) -> bool {
        // Quit confirmation modal: q / Ctrl+c confirms, Esc cancels
        if self.confirm_quit {
            match action {
                Action::Quit | Action::TextInput('q') | Action::TextInput('y') => {
                    self.should_quit = true;
                    return true;
                }
                Action::NavigateBack => {
                    self.confirm_quit = false;
                    self.sync_focus();
                }
                Action::Tick => self.on_tick(),
                _ => {}
            }
            return false;
        }

        if self.show_help {
            match action {
                Action::ToggleHelp | Action::NavigateBack => {
                    self.show_help = false;
                    self.sync_focus();
                }
                Action::Quit => {
                    self.confirm_quit = true;
                    self.sync_focus();
                }
                Action::Tick => self.on_tick(),
                _ => {}
            }
            return false;
        }

        match action {
            Action::Quit => {
                self.confirm_quit = true;
                self.sync_focus();
                return false;
            }
            Action::Tick => {
                self.on_tick();
                return false;
            }
            Action::Resize(..) | Action::None => return false,
            _ => {}
        }

        match self.screen {
            Screen::Auth => self.update_auth(action),
            Screen::Classify => self.update_classify(action),
        }
        false
    }

    fn update_auth(&mut self, action: Action) {
        match action {
            Action::TextInput(c) => self.auth.input(c),
            Action::Backspace => self.auth.backspace(),
            Action::NextField => self.auth.next_field(),
            Action::PrevField => self.auth.prev_field(),
            Action::ToggleAuthMode => self.auth.toggle_mode(),
            Action::NavigateBack => {
                self.auth.error = None;
                self.auth.success = None;
            }
            Action::Submit => match self.auth.prepare(self.availability) {
                Ok(request) => self.send(BackendCommand::Authenticate(request)),
                Err(e) => tracing::debug!(error = %e, "sign-in form rejected locally"),
            },
            _ => {}
        }
    }

    fn update_classify(&mut self, action: Action) {
        if self.picker.is_some() {
            self.update_picker(action);
            return;
        }

        match action {
            Action::ToggleHelp => {
                self.show_help = true;
                self.sync_focus();
            }
            Action::NavigateBack => {
                if self.pane == Pane::History {
                    self.pane = Pane::Session;
                    self.sync_focus();
                } else {
                    self.command(Command::DismissNotification);
                }
            }
            Action::SwitchPane => {
                self.pane = match self.pane {
                    Pane::Session => Pane::History,
                    Pane::History => Pane::Session,
                };
                self.clamp_history_cursor();
                self.sync_focus();
            }
            Action::MoveDown if self.pane == Pane::History => {
                let len = self.controller.history().items().len();
                if self.history_cursor + 1 < len {
                    self.history_cursor += 1;
                }
            }
            Action::MoveUp if self.pane == Pane::History => {
                self.history_cursor = self.history_cursor.saturating_sub(1);
            }
            Action::DrillIn | Action::OpenPicker => self.open_picker(),
            Action::NextPage => self.page_command(Command::NextPage),
            Action::PrevPage => self.page_command(Command::PrevPage),
            Action::GrowPageSize => self.page_command(Command::CyclePageSize { grow: true }),
            Action::ShrinkPageSize => self.page_command(Command::CyclePageSize { grow: false }),
            Action::Retry => self.command(Command::LoadNext),
            Action::RecallPrevious => self.command(Command::RecallPrevious),
            Action::SignOut => self.sign_out(),
            Action::Key(key) => {
                if self.pane == Pane::History {
                    self.reclassify_selected(key.code);
                    return;
                }
                match self.dispatcher.dispatch(&key, self.controller.session()) {
                    Some(KeyCommand::TogglePlayback) => self.player.toggle(),
                    Some(KeyCommand::Classify(category)) => {
                        self.command(Command::Classify(category))
                    }
                    None => {}
                }
            }
            _ => {}
        }
    }

    fn update_picker(&mut self, action: Action) {
        let Some(picker) = self.picker.as_mut() else {
            return;
        };
        let count = self.controller.catalog().len();
        match action {
            Action::MoveDown => {
                if picker.cursor + 1 < count {
                    picker.cursor += 1;
                }
            }
            Action::MoveUp => picker.cursor = picker.cursor.saturating_sub(1),
            Action::DrillIn => {
                let target = picker.target;
                let chosen = self.controller.catalog().get(picker.cursor).cloned();
                self.picker = None;
                if let Some(category) = chosen {
                    self.apply_category(target, category);
                }
                self.sync_focus();
            }
            Action::NavigateBack | Action::OpenPicker => {
                self.picker = None;
                self.sync_focus();
            }
            _ => {}
        }
    }

    fn reclassify_selected(&mut self, code: KeyCode) {
        let KeyCode::Char(c) = code else { return };
        let Some(category) = Category::from_shortcut(c) else {
            return;
        };
        if let Some(id) = self.selected_history().map(|r| r.id) {
            self.command(Command::Reclassify { id, category });
        }
    }

    fn page_command(&mut self, command: Command) {
        self.command(command);
        self.history_cursor = 0;
    }

    fn command(&mut self, command: Command) {
        let effects = self.controller.handle(command);
        self.run_effects(effects);
    }

    fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        self.player.refresh();
        if self.screen != Screen::Classify {
            return;
        }
        self.controller.tick();
        if self.controller.auth_lost() {
            tracing::warn!("request rejected as unauthorized, returning to sign-in");
            self.sign_out();
            self.auth.error = Some(CoreError::Unauthorized.user_message());
        }
    }
}
