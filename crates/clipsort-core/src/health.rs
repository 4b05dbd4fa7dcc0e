//! Periodic backend liveness probe.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;

use crate::CoreError;
use crate::api::ClassificationApi;

pub const DEFAULT_INTERVAL: Duration = Duration::from_secs(5);

/// Tri-state availability signal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Availability {
    #[default]
    Unknown,
    Available,
    Unavailable,
}

impl Availability {
    pub fn from_probe(result: &Result<(), CoreError>) -> Self {
        match result {
            Ok(()) => Availability::Available,
            Err(_) => Availability::Unavailable,
        }
    }

    /// Authentication may only be submitted against a known-live backend.
    pub fn allows_auth(self) -> bool {
        self == Availability::Available
    }

    pub fn label(self) -> &'static str {
        match self {
            Availability::Unknown => "checking",
            Availability::Available => "online",
            Availability::Unavailable => "offline",
        }
    }
}

/// Polls the health endpoint on a fixed interval.
///
/// The poller is the only writer of the availability signal; readers hold
/// `watch` receivers. Dropping the monitor (or calling [`stop`]) cancels the
/// interval, and a probe that completes afterwards is discarded.
///
/// [`stop`]: HealthMonitor::stop
pub struct HealthMonitor {
    rx: watch::Receiver<Availability>,
    cancel: CancellationToken,
    handle: Option<JoinHandle<()>>,
}

impl HealthMonitor {
    /// Start polling. The first probe runs immediately.
    pub fn spawn(api: Arc<dyn ClassificationApi>, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(Availability::Unknown);
        let cancel = CancellationToken::new();
        let handle = tokio::spawn(poll_loop(api, interval, tx, cancel.clone()));
        Self {
            rx,
            cancel,
            handle: Some(handle),
        }
    }

    pub fn availability(&self) -> Availability {
        *self.rx.borrow()
    }

    pub fn subscribe(&self) -> watch::Receiver<Availability> {
        self.rx.clone()
    }

    /// Cancel polling and wait for the task to wind down.
    pub async fn stop(mut self) {
        self.cancel.cancel();
        if let Some(handle) = self.handle.take() {
            let _ = handle.await;
        }
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}

async fn poll_loop(
    api: Arc<dyn ClassificationApi>,
    interval: Duration,
    tx: watch::Sender<Availability>,
    cancel: CancellationToken,
) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
    tracing::info!(interval_ms = interval.as_millis() as u64, "health polling started");

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            _ = ticker.tick() => {}
        }

        let result = tokio::select! {
            _ = cancel.cancelled() => break,
            result = api.health() => result,
        };

        let next = Availability::from_probe(&result);
        tx.send_if_modified(|current| {
            if *current == next {
                return false;
            }
            match &result {
                Ok(()) => tracing::info!(from = ?*current, "backend available"),
                Err(e) => tracing::warn!(from = ?*current, error = %e, "backend unavailable"),
            }
            *current = next;
            true
        });
    }

    tracing::info!("health polling stopped");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_available_allows_auth() {
        assert!(Availability::Available.allows_auth());
        assert!(!Availability::Unknown.allows_auth());
        assert!(!Availability::Unavailable.allows_auth());
    }

    #[test]
    fn any_error_maps_to_unavailable() {
        assert_eq!(
            Availability::from_probe(&Err(CoreError::Transport("HTTP 503".into()))),
            Availability::Unavailable
        );
        assert_eq!(Availability::from_probe(&Ok(())), Availability::Available);
    }
}
