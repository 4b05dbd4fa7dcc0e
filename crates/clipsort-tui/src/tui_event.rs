use clipsort_core::auth::{AuthOutcome, AuthRequest};
use clipsort_core::{Availability, Completion, CoreError, Effect};

/// Commands sent from the TUI to the backend.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCommand {
    /// Perform a remote controller effect issued under `epoch`.
    Run { epoch: u64, effect: Effect },
    Authenticate(AuthRequest),
    /// Forget the stored token.
    SignOut,
    /// Start probing the health endpoint. Reports carry `generation`.
    StartHealth { generation: u64 },
    StopHealth,
}

/// Events flowing from the backend task to the TUI.
#[derive(Debug, Clone)]
pub enum BackendEvent {
    Completion(Completion),
    Availability {
        generation: u64,
        availability: Availability,
    },
    AuthFinished(Result<AuthOutcome, CoreError>),
}
