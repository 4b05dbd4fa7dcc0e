//! The single "file under review" slot and its transitions.

use crate::category::Category;
use crate::controller::Effect;
use crate::playback::PlaybackCommand;
use crate::submit::SubmitTarget;
use crate::{AudioFileRecord, CoreError, FileId};

pub const EXHAUSTED_MESSAGE: &str = "No unclassified files are left to listen to.";
pub const LOAD_FAILED_MESSAGE: &str =
    "An error occurred while loading the file. Please try again later.";
pub const CLASSIFY_FAILED_MESSAGE: &str =
    "An error occurred while classifying the file. Please try again.";

/// The file currently under review, if any.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Session {
    #[default]
    Empty,
    Reviewing(AudioFileRecord),
}

impl Session {
    pub fn current(&self) -> Option<&AudioFileRecord> {
        match self {
            Session::Reviewing(file) => Some(file),
            Session::Empty => None,
        }
    }

    pub fn is_reviewing(&self) -> bool {
        matches!(self, Session::Reviewing(_))
    }
}

/// Inline status shown while the session is `Empty`.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SessionStatus {
    #[default]
    Idle,
    Loading,
    /// The backend reported nothing left to classify.
    Exhausted,
    /// The last fetch or submit failed; a manual retry is needed.
    Failed(String),
}

/// Decision awaiting the classification service.
#[derive(Debug, Clone, PartialEq, Eq)]
struct InFlight {
    file: AudioFileRecord,
    category: Category,
}

/// Transitions of the review slot. Every operation returns the effects the
/// caller must perform; nothing here touches the network.
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    session: Session,
    status: SessionStatus,
    in_flight: Option<InFlight>,
    previous: Option<AudioFileRecord>,
}

impl SessionMachine {
    pub fn session(&self) -> &Session {
        &self.session
    }

    pub fn status(&self) -> &SessionStatus {
        &self.status
    }

    /// Last successfully classified file, available for recall.
    pub fn previous(&self) -> Option<&AudioFileRecord> {
        self.previous.as_ref()
    }

    pub fn is_submitting(&self) -> bool {
        self.in_flight.is_some()
    }

    pub fn is_loading(&self) -> bool {
        self.status == SessionStatus::Loading
    }

    /// Ask the backend for the next undecided file. Only valid from `Empty`
    /// with no fetch or decision outstanding.
    pub fn load_next(&mut self) -> Vec<Effect> {
        if self.session.is_reviewing() || self.is_loading() || self.is_submitting() {
            tracing::debug!(status = ?self.status, "load_next ignored");
            return Vec::new();
        }
        self.status = SessionStatus::Loading;
        vec![Effect::FetchNext]
    }

    pub fn next_loaded(&mut self, file: AudioFileRecord) -> Vec<Effect> {
        if !self.is_loading() {
            tracing::debug!(file_id = file.id, "unrequested file dropped");
            return Vec::new();
        }
        tracing::info!(file_id = file.id, filename = %file.filename, "reviewing file");
        let bind = PlaybackCommand::Bind {
            file_path: file.file_path.clone(),
        };
        self.session = Session::Reviewing(file);
        self.status = SessionStatus::Idle;
        vec![Effect::Playback(bind)]
    }

    pub fn next_failed(&mut self, error: &CoreError) {
        if !self.is_loading() {
            return;
        }
        self.status = match error {
            CoreError::NoContentAvailable => {
                tracing::info!("no unclassified files remain");
                SessionStatus::Exhausted
            }
            other if other.is_retryable() => {
                tracing::warn!(error = %other, "failed to load file");
                SessionStatus::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
            other => {
                tracing::warn!(error = %other, "file request refused");
                SessionStatus::Failed(other.user_message())
            }
        };
    }

    /// Decide the file under review. Moves optimistically to `Empty`; a
    /// second call while the first is outstanding is dropped, not queued.
    pub fn classify(&mut self, category: Category) -> Vec<Effect> {
        if self.is_submitting() {
            tracing::debug!(category = %category, "decision already in flight, ignoring");
            return Vec::new();
        }
        let file = match std::mem::take(&mut self.session) {
            Session::Reviewing(file) => file,
            Session::Empty => {
                tracing::debug!(category = %category, "nothing under review, ignoring");
                return Vec::new();
            }
        };
        let id = file.id;
        self.in_flight = Some(InFlight {
            file,
            category: category.clone(),
        });
        vec![
            Effect::Playback(PlaybackCommand::Reset),
            Effect::Submit {
                target: SubmitTarget::Current,
                id,
                category,
            },
        ]
    }

    /// The outstanding decision for `id` was accepted. Returns the decided
    /// record; the caller chains history and the next fetch onto it.
    pub fn classify_succeeded(&mut self, id: FileId, classified_at: String) -> Option<AudioFileRecord> {
        let in_flight = self.take_in_flight(id)?;
        let decided = in_flight
            .file
            .classified_as(in_flight.category, classified_at);
        self.previous = Some(decided.clone());
        Some(decided)
    }

    /// The outstanding decision for `id` failed. The file is not restored;
    /// the session stays `Empty` until the reviewer retries.
    pub fn classify_failed(&mut self, id: FileId) -> bool {
        if self.take_in_flight(id).is_none() {
            return false;
        }
        self.status = SessionStatus::Failed(CLASSIFY_FAILED_MESSAGE.to_string());
        true
    }

    /// Put the last classified file back under review.
    pub fn recall_previous(&mut self) -> Vec<Effect> {
        if self.is_submitting() || self.is_loading() {
            return Vec::new();
        }
        let Some(previous) = self.previous.take() else {
            return Vec::new();
        };
        let bind = PlaybackCommand::Bind {
            file_path: previous.file_path.clone(),
        };
        self.session = Session::Reviewing(previous);
        self.status = SessionStatus::Idle;
        vec![Effect::Playback(bind)]
    }

    fn take_in_flight(&mut self, id: FileId) -> Option<InFlight> {
        match &self.in_flight {
            Some(f) if f.file.id == id => self.in_flight.take(),
            _ => {
                tracing::debug!(file_id = id, "outcome for unknown decision dropped");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(id: FileId, name: &str) -> AudioFileRecord {
        AudioFileRecord {
            id,
            file_path: format!("/files/{name}"),
            filename: name.to_string(),
            initial_category: Category::Voice,
            current_category: Category::Voice,
            uploaded_at: "2024-10-01T10:00:00".into(),
            uploaded_by: "admin".into(),
            classified_at: None,
        }
    }

    fn reviewing(id: FileId) -> SessionMachine {
        let mut m = SessionMachine::default();
        assert_eq!(m.load_next(), vec![Effect::FetchNext]);
        m.next_loaded(file(id, "a.wav"));
        m
    }

    #[test]
    fn load_next_only_from_empty() {
        let mut m = reviewing(42);
        assert!(m.load_next().is_empty());
        assert_eq!(m.session().current().map(|f| f.id), Some(42));
    }

    #[test]
    fn duplicate_load_is_ignored_while_loading() {
        let mut m = SessionMachine::default();
        assert_eq!(m.load_next().len(), 1);
        assert!(m.load_next().is_empty());
    }

    #[test]
    fn loaded_file_binds_playback() {
        let mut m = SessionMachine::default();
        m.load_next();
        let effects = m.next_loaded(file(1, "x.wav"));
        assert_eq!(
            effects,
            vec![Effect::Playback(PlaybackCommand::Bind {
                file_path: "/files/x.wav".into()
            })]
        );
        assert_eq!(m.status(), &SessionStatus::Idle);
    }

    #[test]
    fn no_content_is_exhausted_not_failed() {
        let mut m = SessionMachine::default();
        m.load_next();
        m.next_failed(&CoreError::NoContentAvailable);
        assert_eq!(m.session(), &Session::Empty);
        assert_eq!(m.status(), &SessionStatus::Exhausted);
    }

    #[test]
    fn transport_failure_is_retryable() {
        let mut m = SessionMachine::default();
        m.load_next();
        m.next_failed(&CoreError::Transport("refused".into()));
        assert!(matches!(m.status(), SessionStatus::Failed(_)));
        // Retrying is allowed right away.
        assert_eq!(m.load_next(), vec![Effect::FetchNext]);
    }

    #[test]
    fn refused_load_explains_itself() {
        let mut m = SessionMachine::default();
        m.load_next();
        m.next_failed(&CoreError::Unauthorized);
        assert_eq!(
            m.status(),
            &SessionStatus::Failed(CoreError::Unauthorized.user_message())
        );

        let mut m = SessionMachine::default();
        m.load_next();
        m.next_failed(&CoreError::Decode("bad json".into()));
        assert_eq!(
            m.status(),
            &SessionStatus::Failed(LOAD_FAILED_MESSAGE.to_string())
        );
    }

    #[test]
    fn classify_moves_to_empty_and_guards_reentry() {
        let mut m = reviewing(42);
        let effects = m.classify(Category::Voice);
        assert!(effects.contains(&Effect::Submit {
            target: SubmitTarget::Current,
            id: 42,
            category: Category::Voice
        }));
        assert_eq!(m.session(), &Session::Empty);
        assert!(m.classify(Category::Silent).is_empty());
        // No fetch while the decision is outstanding.
        assert!(m.load_next().is_empty());
    }

    #[test]
    fn success_records_previous() {
        let mut m = reviewing(42);
        m.classify(Category::Silent);
        let decided = m.classify_succeeded(42, "2024-10-02T09:00:00".into()).unwrap();
        assert_eq!(decided.current_category, Category::Silent);
        assert_eq!(decided.initial_category, Category::Voice);
        assert_eq!(m.previous().map(|p| p.id), Some(42));
        assert!(!m.is_submitting());
    }

    #[test]
    fn failure_does_not_restore_file() {
        let mut m = reviewing(42);
        m.classify(Category::Silent);
        assert!(m.classify_failed(42));
        assert_eq!(m.session(), &Session::Empty);
        assert!(matches!(m.status(), SessionStatus::Failed(_)));
        assert!(m.previous().is_none());
    }

    #[test]
    fn outcome_for_other_file_is_ignored() {
        let mut m = reviewing(42);
        m.classify(Category::Silent);
        assert!(m.classify_succeeded(7, "t".into()).is_none());
        assert!(m.is_submitting());
    }

    #[test]
    fn recall_previous_reloads_last_decision_once() {
        let mut m = reviewing(42);
        m.classify(Category::Silent);
        m.classify_succeeded(42, "t".into());

        let effects = m.recall_previous();
        assert_eq!(effects.len(), 1);
        assert_eq!(m.session().current().map(|f| f.id), Some(42));
        assert!(m.previous().is_none());
        assert!(m.recall_previous().is_empty());
    }
}
