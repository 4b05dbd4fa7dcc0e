//! Classification session controller.
//!
//! The controller is a plain state machine: user [`Command`]s and network
//! [`Completion`]s go in, [`Effect`]s come out. Performing the effects (and
//! feeding their completions back) is the job of
//! [`EffectRunner`](crate::runner::EffectRunner) or of a test.
//!
//! Every completion is tagged with the epoch that was current when its effect
//! was issued. Unmounting bumps the epoch, so responses that arrive after the
//! view went away are discarded instead of applied.

use std::time::Duration;

use tokio::time::Instant;

use crate::category::{Category, CategoryCatalog, CategoryEntry};
use crate::history::{DEFAULT_PAGE_SIZE, HistoryPager};
use crate::notification::{DEFAULT_TTL, NotificationChannel, Notification};
use crate::playback::PlaybackCommand;
use crate::session::{CLASSIFY_FAILED_MESSAGE, Session, SessionMachine, SessionStatus};
use crate::submit::SubmitTarget;
use crate::{AudioFileRecord, CoreError, FileId, HistoryPage};

pub const CLASSIFIED_MESSAGE: &str = "Successfully classified!";
pub const RECLASSIFY_FAILED_MESSAGE: &str = "Could not update the category. Please try again.";

/// Work the controller asks its environment to do.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    FetchNext,
    Submit {
        target: SubmitTarget,
        id: FileId,
        category: Category,
    },
    FetchPage {
        index: usize,
        page_size: usize,
    },
    FetchCategories,
    Playback(PlaybackCommand),
}

impl Effect {
    /// Whether the effect is a network call (as opposed to local playback).
    pub fn is_remote(&self) -> bool {
        !matches!(self, Effect::Playback(_))
    }
}

/// User intent, from buttons or key shortcuts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    LoadNext,
    Classify(Category),
    RecallPrevious,
    Reclassify { id: FileId, category: Category },
    LoadPage(usize),
    NextPage,
    PrevPage,
    SetPageSize(usize),
    CyclePageSize { grow: bool },
    RefreshCategories,
    DismissNotification,
}

/// Result of a remote effect.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    NextLoaded(AudioFileRecord),
    NextFailed(CoreError),
    Submitted {
        target: SubmitTarget,
        id: FileId,
        category: Category,
        classified_at: String,
    },
    SubmitFailed {
        target: SubmitTarget,
        id: FileId,
        error: CoreError,
    },
    PageLoaded(HistoryPage),
    PageFailed {
        index: usize,
        error: CoreError,
    },
    CategoriesLoaded(Vec<CategoryEntry>),
    CategoriesFailed(CoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Completion {
    pub epoch: u64,
    pub outcome: Outcome,
}

#[derive(Debug, Clone, Copy)]
pub struct ControllerSettings {
    pub page_size: usize,
    pub notification_ttl: Duration,
}

impl Default for ControllerSettings {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            notification_ttl: DEFAULT_TTL,
        }
    }
}

pub struct Controller {
    settings: ControllerSettings,
    epoch: u64,
    mounted: bool,
    auth_lost: bool,
    session: SessionMachine,
    history: HistoryPager,
    notifications: NotificationChannel,
    catalog: CategoryCatalog,
}

impl Controller {
    pub fn new(settings: ControllerSettings) -> Self {
        Self {
            settings,
            epoch: 0,
            mounted: false,
            auth_lost: false,
            session: SessionMachine::default(),
            history: HistoryPager::new(settings.page_size),
            notifications: NotificationChannel::new(settings.notification_ttl),
            catalog: CategoryCatalog::default(),
        }
    }

    /// Enter the classification view: fetch the first file, the first history
    /// page and the category catalog.
    pub fn mount(&mut self) -> Vec<Effect> {
        if self.mounted {
            return Vec::new();
        }
        self.mounted = true;
        tracing::debug!(epoch = self.epoch, "classification view mounted");
        let mut effects = self.session.load_next();
        effects.extend(self.history.load_page(0));
        effects.push(Effect::FetchCategories);
        effects
    }

    /// Leave the view. All local state is dropped and outstanding responses
    /// become stale.
    pub fn unmount(&mut self) -> Vec<Effect> {
        if !self.mounted {
            return Vec::new();
        }
        let epoch = self.epoch + 1;
        *self = Self::new(self.settings);
        self.epoch = epoch;
        tracing::debug!(epoch, "classification view unmounted");
        vec![Effect::Playback(PlaybackCommand::Reset)]
    }

    pub fn handle(&mut self, command: Command) -> Vec<Effect> {
        if !self.mounted {
            tracing::debug!(?command, "command while unmounted ignored");
            return Vec::new();
        }
        match command {
            Command::LoadNext => self.session.load_next(),
            Command::Classify(category) => self.session.classify(category),
            Command::RecallPrevious => self.session.recall_previous(),
            Command::Reclassify { id, category } => self.history.reclassify(id, category),
            Command::LoadPage(index) => self.history.load_page(index),
            Command::NextPage => self.history.next_page(),
            Command::PrevPage => self.history.prev_page(),
            Command::SetPageSize(size) => self.history.set_page_size(size),
            Command::CyclePageSize { grow } => self.history.cycle_page_size(grow),
            Command::RefreshCategories => vec![Effect::FetchCategories],
            Command::DismissNotification => {
                self.notifications.dismiss();
                Vec::new()
            }
        }
    }

    pub fn complete(&mut self, completion: Completion) -> Vec<Effect> {
        if completion.epoch != self.epoch || !self.mounted {
            tracing::debug!(
                epoch = completion.epoch,
                current = self.epoch,
                "stale completion discarded"
            );
            return Vec::new();
        }

        match completion.outcome {
            Outcome::NextLoaded(file) => self.session.next_loaded(file),
            Outcome::NextFailed(error) => {
                self.note_auth(&error);
                self.session.next_failed(&error);
                Vec::new()
            }
            Outcome::Submitted {
                target: SubmitTarget::Current,
                id,
                classified_at,
                ..
            } => match self.session.classify_succeeded(id, classified_at) {
                Some(decided) => {
                    self.notifications.success(CLASSIFIED_MESSAGE);
                    self.history.prepend(decided);
                    self.session.load_next()
                }
                None => Vec::new(),
            },
            Outcome::Submitted {
                target: SubmitTarget::History,
                id,
                category,
                ..
            } => {
                if self.history.reclassified(id, &category) {
                    self.notifications
                        .success(format!("Reclassified as {}", category));
                }
                Vec::new()
            }
            Outcome::SubmitFailed {
                target: SubmitTarget::Current,
                id,
                error,
            } => {
                self.note_auth(&error);
                if self.session.classify_failed(id) {
                    let message = if error.is_retryable() {
                        CLASSIFY_FAILED_MESSAGE.to_string()
                    } else {
                        error.user_message()
                    };
                    self.notifications.error(message);
                }
                Vec::new()
            }
            Outcome::SubmitFailed {
                target: SubmitTarget::History,
                id,
                error,
            } => {
                self.note_auth(&error);
                self.history.reclassify_failed(id);
                self.notifications.error(RECLASSIFY_FAILED_MESSAGE);
                Vec::new()
            }
            Outcome::PageLoaded(page) => {
                self.history.page_loaded(page);
                Vec::new()
            }
            Outcome::PageFailed { index, error } => {
                self.note_auth(&error);
                self.history.page_failed(index, &error);
                Vec::new()
            }
            Outcome::CategoriesLoaded(entries) => {
                self.catalog = CategoryCatalog::from_entries(&entries);
                Vec::new()
            }
            Outcome::CategoriesFailed(error) => {
                // The built-ins stay usable without the catalog.
                tracing::warn!(error = %error, "failed to load category catalog");
                Vec::new()
            }
        }
    }

    /// Expire the notification if its deadline has passed.
    pub fn tick(&mut self) -> bool {
        self.notifications.expire(Instant::now())
    }

    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// A request was rejected as unauthorized; the reviewer must sign in again.
    pub fn auth_lost(&self) -> bool {
        self.auth_lost
    }

    pub fn session(&self) -> &Session {
        self.session.session()
    }

    pub fn status(&self) -> &SessionStatus {
        self.session.status()
    }

    pub fn is_submitting(&self) -> bool {
        self.session.is_submitting()
    }

    pub fn previous(&self) -> Option<&AudioFileRecord> {
        self.session.previous()
    }

    pub fn history(&self) -> &HistoryPager {
        &self.history
    }

    pub fn notification(&self) -> Option<&Notification> {
        self.notifications.current()
    }

    pub fn catalog(&self) -> &CategoryCatalog {
        &self.catalog
    }

    fn note_auth(&mut self, error: &CoreError) {
        if *error == CoreError::Unauthorized {
            self.auth_lost = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: FileId) -> AudioFileRecord {
        AudioFileRecord {
            id,
            file_path: format!("/files/{id}.wav"),
            filename: format!("{id}.wav"),
            initial_category: Category::Voice,
            current_category: Category::Voice,
            uploaded_at: String::new(),
            uploaded_by: String::new(),
            classified_at: None,
        }
    }

    fn done(c: &Controller, outcome: Outcome) -> Completion {
        Completion {
            epoch: c.epoch(),
            outcome,
        }
    }

    fn mounted_with(id: FileId) -> Controller {
        let mut c = Controller::new(ControllerSettings::default());
        c.mount();
        let loaded = done(&c, Outcome::NextLoaded(file(id)));
        c.complete(loaded);
        let page = done(&c, Outcome::PageLoaded(HistoryPage::empty(DEFAULT_PAGE_SIZE)));
        c.complete(page);
        c
    }

    #[test]
    fn mount_issues_initial_fetches_once() {
        let mut c = Controller::new(ControllerSettings::default());
        let effects = c.mount();
        assert_eq!(
            effects,
            vec![
                Effect::FetchNext,
                Effect::FetchPage {
                    index: 0,
                    page_size: DEFAULT_PAGE_SIZE
                },
                Effect::FetchCategories,
            ]
        );
        assert!(c.mount().is_empty());
    }

    #[test]
    fn successful_decision_prepends_and_chains_fetch() {
        let mut c = mounted_with(42);
        c.handle(Command::Classify(Category::Silent));

        let effects = c.complete(done(
            &c,
            Outcome::Submitted {
                target: SubmitTarget::Current,
                id: 42,
                category: Category::Silent,
                classified_at: "2024-10-02T10:00:00".into(),
            },
        ));
        assert_eq!(effects, vec![Effect::FetchNext]);

        let head = &c.history().items()[0];
        assert_eq!(head.id, 42);
        assert_eq!(head.current_category, Category::Silent);
        assert_eq!(head.initial_category, Category::Voice);
        assert_eq!(c.notification().unwrap().message, CLASSIFIED_MESSAGE);
    }

    #[test]
    fn decision_outlives_slow_initial_history_fetch() {
        let mut c = Controller::new(ControllerSettings::default());
        c.mount();
        c.complete(done(&c, Outcome::NextLoaded(file(42))));
        c.handle(Command::Classify(Category::Silent));
        c.complete(done(
            &c,
            Outcome::Submitted {
                target: SubmitTarget::Current,
                id: 42,
                category: Category::Silent,
                classified_at: "2024-10-02T10:00:00".into(),
            },
        ));
        assert_eq!(c.history().items()[0].id, 42);

        // The page requested at mount lands after the decision.
        c.complete(done(
            &c,
            Outcome::PageLoaded(HistoryPage::empty(DEFAULT_PAGE_SIZE)),
        ));
        let head = c.history().items().first().map(|r| r.id);
        assert_eq!(head, Some(42));
        assert_eq!(
            c.history().items()[0].current_category,
            Category::Silent
        );
    }

    #[test]
    fn failed_decision_notifies_and_stays_empty() {
        let mut c = mounted_with(42);
        c.handle(Command::Classify(Category::Silent));
        let effects = c.complete(done(
            &c,
            Outcome::SubmitFailed {
                target: SubmitTarget::Current,
                id: 42,
                error: CoreError::Transport("HTTP 500".into()),
            },
        ));
        assert!(effects.is_empty());
        assert_eq!(c.session(), &Session::Empty);
        assert!(c.history().items().is_empty());
        let note = c.notification().unwrap();
        assert_eq!(note.message, CLASSIFY_FAILED_MESSAGE);
        // Manual retry goes through.
        assert_eq!(c.handle(Command::LoadNext), vec![Effect::FetchNext]);
    }

    #[test]
    fn refused_decision_names_the_cause() {
        let mut c = mounted_with(42);
        c.handle(Command::Classify(Category::Voice));
        c.complete(done(
            &c,
            Outcome::SubmitFailed {
                target: SubmitTarget::Current,
                id: 42,
                error: CoreError::BackendUnavailable,
            },
        ));
        assert_eq!(
            c.notification().map(|n| n.message.clone()),
            Some(CoreError::BackendUnavailable.user_message())
        );
    }

    #[test]
    fn completions_after_unmount_are_discarded() {
        let mut c = Controller::new(ControllerSettings::default());
        c.mount();
        let stale_epoch = c.epoch();
        assert_eq!(
            c.unmount(),
            vec![Effect::Playback(PlaybackCommand::Reset)]
        );
        c.mount();

        let effects = c.complete(Completion {
            epoch: stale_epoch,
            outcome: Outcome::NextLoaded(file(5)),
        });
        assert!(effects.is_empty());
        assert_eq!(c.session(), &Session::Empty);
        assert!(c.status() == &SessionStatus::Loading);
    }

    #[test]
    fn commands_before_mount_are_ignored() {
        let mut c = Controller::new(ControllerSettings::default());
        assert!(c.handle(Command::LoadNext).is_empty());
    }

    #[test]
    fn unauthorized_marks_auth_lost() {
        let mut c = Controller::new(ControllerSettings::default());
        c.mount();
        c.complete(done(&c, Outcome::NextFailed(CoreError::Unauthorized)));
        assert!(c.auth_lost());
    }

    #[test]
    fn catalog_replaced_on_load() {
        let mut c = Controller::new(ControllerSettings::default());
        c.mount();
        c.complete(done(
            &c,
            Outcome::CategoriesLoaded(vec![CategoryEntry {
                id: Some(1),
                name: "Fax Tone".into(),
                shortcut: None,
            }]),
        ));
        assert_eq!(c.catalog().len(), 5);
    }
}
