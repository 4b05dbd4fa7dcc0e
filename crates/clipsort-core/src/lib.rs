use serde::{Deserialize, Serialize};
use thiserror::Error;

pub mod api;
pub mod auth;
pub mod category;
pub mod config_file;
pub mod context;
pub mod controller;
pub mod health;
pub mod history;
pub mod keyboard;
pub mod notification;
pub mod playback;
pub mod runner;
pub mod session;
pub mod submit;

// Re-export for convenience
pub use api::{ApiFuture, ClassificationApi, HttpApi};
pub use category::{Category, CategoryCatalog, CategoryEntry};
pub use context::SessionContext;
pub use controller::{Command, Completion, Controller, ControllerSettings, Effect, Outcome};
pub use health::{Availability, HealthMonitor};
pub use history::HistoryPager;
pub use notification::{Notification, NotificationChannel, Severity};
pub use session::{Session, SessionMachine, SessionStatus};
pub use submit::{ClassificationSubmitter, SubmitTarget};

/// Server-side identity of an audio file.
pub type FileId = i64;

/// One audio recording as the classification service describes it.
///
/// `initial_category` is assigned at ingestion and never changes on the
/// client; only `current_category` and `classified_at` move after a decision.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AudioFileRecord {
    pub id: FileId,
    /// Playable locator (URL or server path) for the recording.
    pub file_path: String,
    pub filename: String,
    pub initial_category: Category,
    pub current_category: Category,
    #[serde(default)]
    pub uploaded_at: String,
    #[serde(default)]
    pub uploaded_by: String,
    #[serde(default)]
    pub classified_at: Option<String>,
}

impl AudioFileRecord {
    /// Copy of this record carrying a new decision.
    pub fn classified_as(&self, category: Category, classified_at: String) -> Self {
        Self {
            current_category: category,
            classified_at: Some(classified_at),
            ..self.clone()
        }
    }

    /// Whether the current decision differs from the ingestion label.
    pub fn is_reclassified(&self) -> bool {
        self.current_category != self.initial_category
    }
}

/// One page of the reviewer's classification history, most recent first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HistoryPage {
    pub items: Vec<AudioFileRecord>,
    /// Zero-based page index.
    pub page_index: usize,
    pub page_size: usize,
    pub total_pages: usize,
}

impl HistoryPage {
    pub fn empty(page_size: usize) -> Self {
        Self {
            items: Vec::new(),
            page_index: 0,
            page_size,
            total_pages: 0,
        }
    }
}

/// Email/password pair sent to the authentication endpoints.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// A granted authority as returned by the login endpoint (`ROLE_USER`, ...).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Authority {
    pub authority: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub authorities: Vec<Authority>,
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CoreError {
    /// The backend has no unclassified file left for this reviewer.
    #[error("no unclassified files remain")]
    NoContentAvailable,
    #[error("transport error: {0}")]
    Transport(String),
    #[error("not authorized")]
    Unauthorized,
    #[error("validation error: {0}")]
    Validation(String),
    /// The health signal is not `available`; the action was never attempted.
    #[error("backend unavailable")]
    BackendUnavailable,
    #[error("malformed response: {0}")]
    Decode(String),
    #[error("I/O error: {0}")]
    Io(String),
}

impl CoreError {
    /// Transport-level failures are worth retrying by hand; everything else is
    /// either terminal-for-now or local.
    pub fn is_retryable(&self) -> bool {
        matches!(self, CoreError::Transport(_) | CoreError::Decode(_))
    }

    /// Text suitable for showing to the reviewer.
    pub fn user_message(&self) -> String {
        match self {
            CoreError::NoContentAvailable => session::EXHAUSTED_MESSAGE.to_string(),
            CoreError::Unauthorized => "Your session has expired. Please sign in again.".into(),
            CoreError::Validation(msg) => msg.clone(),
            CoreError::BackendUnavailable => {
                "The server is unreachable. Please wait until it is back online.".into()
            }
            CoreError::Transport(_) | CoreError::Decode(_) => {
                "The server could not be reached. Please try again.".into()
            }
            CoreError::Io(e) => format!("Local storage error: {e}"),
        }
    }
}

impl From<reqwest::Error> for CoreError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            CoreError::Decode(err.to_string())
        } else {
            CoreError::Transport(err.to_string())
        }
    }
}

impl From<std::io::Error> for CoreError {
    fn from(err: std::io::Error) -> Self {
        CoreError::Io(err.to_string())
    }
}

impl From<serde_json::Error> for CoreError {
    fn from(err: serde_json::Error) -> Self {
        CoreError::Decode(err.to_string())
    }
}

/// Local timestamp in the same shape the backend uses for `classifiedAt`.
pub fn now_timestamp() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S")
        .to_string()
}
