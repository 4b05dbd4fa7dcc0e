use std::sync::Arc;
use std::time::Duration;

use clipsort_core::runner::EffectRunner;
use clipsort_core::{
    Availability, ClassificationApi, Completion, HealthMonitor, SessionContext, auth,
};
use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use crate::tui_event::{BackendCommand, BackendEvent};

/// Owns everything that talks to the network on behalf of the TUI.
///
/// Runs until the command channel closes or `cancel` fires. The health
/// monitor only lives between `StartHealth` and `StopHealth`.
pub async fn run(
    api: Arc<dyn ClassificationApi>,
    context: Arc<SessionContext>,
    health_interval: Duration,
    mut cmd_rx: mpsc::UnboundedReceiver<BackendCommand>,
    event_tx: mpsc::UnboundedSender<BackendEvent>,
    cancel: CancellationToken,
) {
    let (completion_tx, mut completion_rx) = mpsc::unbounded_channel::<Completion>();
    let runner = EffectRunner::new(api.clone(), completion_tx);
    let mut health: Option<HealthMonitor> = None;

    loop {
        tokio::select! {
            _ = cancel.cancelled() => break,
            Some(completion) = completion_rx.recv() => {
                if event_tx.send(BackendEvent::Completion(completion)).is_err() {
                    break;
                }
            }
            maybe_cmd = cmd_rx.recv() => {
                let Some(cmd) = maybe_cmd else { break };
                match cmd {
                    BackendCommand::Run { epoch, effect } => {
                        if !runner.run(epoch, effect.clone()) {
                            tracing::debug!(?effect, "local effect sent to backend ignored");
                        }
                    }
                    BackendCommand::Authenticate(request) => {
                        let api = api.clone();
                        let context = context.clone();
                        let tx = event_tx.clone();
                        tokio::spawn(async move {
                            let result = auth::submit(api.as_ref(), &context, request).await;
                            if let Err(e) = &result {
                                tracing::warn!(error = %e, "authentication failed");
                            }
                            let _ = tx.send(BackendEvent::AuthFinished(result));
                        });
                    }
                    BackendCommand::SignOut => {
                        if let Err(e) = context.sign_out() {
                            tracing::warn!(error = %e, "failed to clear stored session");
                        }
                    }
                    BackendCommand::StartHealth { generation } => {
                        if let Some(previous) = health.take() {
                            previous.stop().await;
                        }
                        let monitor = HealthMonitor::spawn(api.clone(), health_interval);
                        forward_availability(&monitor, generation, event_tx.clone());
                        health = Some(monitor);
                    }
                    BackendCommand::StopHealth => {
                        if let Some(monitor) = health.take() {
                            monitor.stop().await;
                        }
                    }
                }
            }
        }
    }

    if let Some(monitor) = health.take() {
        monitor.stop().await;
    }
    tracing::debug!("backend loop finished");
}

/// Relay availability changes until the monitor's poller goes away.
fn forward_availability(
    monitor: &HealthMonitor,
    generation: u64,
    tx: mpsc::UnboundedSender<BackendEvent>,
) {
    let mut rx = monitor.subscribe();
    tokio::spawn(async move {
        // The first probe may have landed before we subscribed.
        let mut availability = *rx.borrow_and_update();
        loop {
            if availability != Availability::Unknown {
                let event = BackendEvent::Availability {
                    generation,
                    availability,
                };
                if tx.send(event).is_err() {
                    break;
                }
            }
            if rx.changed().await.is_err() {
                break;
            }
            availability = *rx.borrow_and_update();
        }
    });
}
