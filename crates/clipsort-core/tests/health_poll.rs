//! Health monitor timing under paused tokio time.

use std::sync::Arc;
use std::time::Duration;

use clipsort_core::api::mock::{Call, MockApi};
use clipsort_core::{Availability, CoreError, HealthMonitor};
use tokio::time::Instant;

const INTERVAL: Duration = Duration::from_secs(5);

#[tokio::test(start_paused = true)]
async fn first_probe_is_immediate() {
    let api = Arc::new(MockApi::new());
    let monitor = HealthMonitor::spawn(api.clone(), INTERVAL);
    assert_eq!(monitor.availability(), Availability::Unknown);

    let started = Instant::now();
    let mut rx = monitor.subscribe();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), Availability::Available);
    assert!(started.elapsed() < INTERVAL);

    monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn outage_is_noticed_within_one_interval() {
    let api = Arc::new(MockApi::new());
    let monitor = HealthMonitor::spawn(api.clone(), INTERVAL);
    let mut rx = monitor.subscribe();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), Availability::Available);

    api.set_health(Err(CoreError::Transport("connection refused".into())));
    let went_down = Instant::now();
    rx.changed().await.unwrap();
    assert_eq!(*rx.borrow(), Availability::Unavailable);
    assert!(went_down.elapsed() <= INTERVAL);

    api.set_health(Ok(()));
    rx.changed().await.unwrap();
    assert_eq!(monitor.availability(), Availability::Available);

    monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn unchanged_result_does_not_notify() {
    let api = Arc::new(MockApi::new());
    let monitor = HealthMonitor::spawn(api.clone(), INTERVAL);
    let mut rx = monitor.subscribe();
    rx.changed().await.unwrap();

    tokio::time::sleep(INTERVAL * 3).await;
    assert!(!rx.has_changed().unwrap());
    assert!(api.count(|c| *c == Call::Health) >= 3);

    monitor.stop().await;
}

#[tokio::test(start_paused = true)]
async fn stop_ends_polling() {
    let api = Arc::new(MockApi::new());
    let monitor = HealthMonitor::spawn(api.clone(), INTERVAL);
    let mut rx = monitor.subscribe();
    rx.changed().await.unwrap();

    monitor.stop().await;
    let probes = api.count(|c| *c == Call::Health);
    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(api.count(|c| *c == Call::Health), probes);
}

#[tokio::test(start_paused = true)]
async fn dropping_the_monitor_cancels_polling() {
    let api = Arc::new(MockApi::new());
    let monitor = HealthMonitor::spawn(api.clone(), INTERVAL);
    let mut rx = monitor.subscribe();
    rx.changed().await.unwrap();
    drop(monitor);

    // Let the task observe cancellation.
    tokio::task::yield_now().await;
    let probes = api.count(|c| *c == Call::Health);
    tokio::time::sleep(INTERVAL * 4).await;
    assert_eq!(api.count(|c| *c == Call::Health), probes);
}
