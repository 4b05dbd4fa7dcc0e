use clipsort_core::auth::AuthOutcome;

use super::{App, Screen};
use crate::tui_event::BackendEvent;

impl App {
    /// Process a backend event and update model state.
    pub fn handle_backend_event(&mut self, event: BackendEvent) {
        match event {
            BackendEvent::Completion(completion) => {
                let effects = self.controller.complete(completion);
                self.run_effects(effects);
                self.clamp_history_cursor();
            }
            BackendEvent::Availability {
                generation,
                availability,
            } => {
                if generation == self.health_generation && self.screen == Screen::Auth {
                    self.availability = availability;
                }
            }
            BackendEvent::AuthFinished(result) => {
                self.auth.finish(&result);
                if self.screen != Screen::Auth {
                    return;
                }
                if let Ok(AuthOutcome::SignedIn { role }) = result {
                    tracing::info!(role = ?role, "signed in");
                    self.enter_classification(role);
                }
            }
        }
    }
}
