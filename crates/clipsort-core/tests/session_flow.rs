//! End-to-end runs of the classification controller against [`MockApi`].
//!
//! Effects are executed by the real [`EffectRunner`]; completions are fed
//! back until nothing is outstanding, so each test observes the state the
//! reviewer would see once the network settles.

use std::sync::Arc;
use std::time::Duration;

use clipsort_core::api::mock::{Call, MockApi};
use clipsort_core::controller::CLASSIFIED_MESSAGE;
use clipsort_core::keyboard::{InputEvent, InputPort, KeyCommand, KeyboardDispatcher, ScriptedInput};
use clipsort_core::playback::{Playback, PlaybackState, TrackingPlayback};
use clipsort_core::runner::EffectRunner;
use clipsort_core::session::EXHAUSTED_MESSAGE;
use clipsort_core::{
    AudioFileRecord, Category, Command, Completion, Controller, ControllerSettings, CoreError,
    Effect, HistoryPage, Session, SessionStatus, Severity,
};
use tokio::sync::mpsc;

fn file(id: i64, name: &str) -> AudioFileRecord {
    AudioFileRecord {
        id,
        file_path: format!("http://localhost:8080/files/{name}"),
        filename: name.to_string(),
        initial_category: Category::Voice,
        current_category: Category::Voice,
        uploaded_at: "2024-10-01T09:00:00".into(),
        uploaded_by: "admin@example.com".into(),
        classified_at: None,
    }
}

struct Harness {
    api: Arc<MockApi>,
    controller: Controller,
    runner: EffectRunner,
    rx: mpsc::UnboundedReceiver<Completion>,
    player: TrackingPlayback,
    pending: usize,
}

impl Harness {
    fn new(api: MockApi) -> Self {
        let api = Arc::new(api);
        let (tx, rx) = mpsc::unbounded_channel();
        Self {
            runner: EffectRunner::new(api.clone(), tx),
            api,
            controller: Controller::new(ControllerSettings::default()),
            rx,
            player: TrackingPlayback::default(),
            pending: 0,
        }
    }

    fn apply(&mut self, effects: Vec<Effect>) {
        for effect in effects {
            match effect {
                Effect::Playback(cmd) => self.player.apply(&cmd),
                remote => {
                    if self.runner.run(self.controller.epoch(), remote) {
                        self.pending += 1;
                    }
                }
            }
        }
    }

    fn mount(&mut self) {
        let effects = self.controller.mount();
        self.apply(effects);
    }

    fn command(&mut self, command: Command) {
        let effects = self.controller.handle(command);
        self.apply(effects);
    }

    /// Feed completions back until no effect is outstanding.
    async fn settle(&mut self) {
        while self.pending > 0 {
            let completion = self.rx.recv().await.expect("runner dropped");
            self.pending -= 1;
            let effects = self.controller.complete(completion);
            self.apply(effects);
        }
    }
}

#[tokio::test]
async fn classify_by_shortcut_records_history_and_fetches_next() {
    let api = MockApi::new().with_files(vec![file(42, "a.wav"), file(43, "b.wav")]);
    let mut h = Harness::new(api);
    h.mount();
    h.settle().await;

    assert_eq!(h.controller.session().current().map(|f| f.id), Some(42));
    assert_eq!(
        h.player.source(),
        Some("http://localhost:8080/files/a.wav")
    );
    assert_eq!(h.player.state(), PlaybackState::Paused);

    let mut dispatcher = KeyboardDispatcher::default();
    dispatcher.attach();
    let mut input = ScriptedInput::keys("v");
    let Some(InputEvent::Key(key)) = input.poll_event(Duration::ZERO).unwrap() else {
        panic!("scripted key missing");
    };
    let cmd = dispatcher.dispatch(&key, h.controller.session());
    assert_eq!(cmd, Some(KeyCommand::Classify(Category::Voice)));
    h.command(Command::Classify(Category::Voice));
    h.settle().await;

    assert_eq!(h.api.submitted(), vec![(42, Category::Voice)]);
    let head = &h.controller.history().items()[0];
    assert_eq!(head.id, 42);
    assert_eq!(head.current_category, Category::Voice);
    assert!(head.classified_at.is_some());

    assert_eq!(h.controller.session().current().map(|f| f.id), Some(43));
    assert_eq!(h.api.count(|c| *c == Call::RandomFile), 2);
    let note = h.controller.notification().unwrap();
    assert_eq!(note.message, CLASSIFIED_MESSAGE);
    assert_eq!(note.severity, Severity::Success);
}

#[tokio::test]
async fn no_content_leaves_session_empty_without_retry() {
    let mut h = Harness::new(MockApi::new());
    h.mount();
    h.settle().await;

    assert_eq!(h.controller.session(), &Session::Empty);
    assert_eq!(h.controller.status(), &SessionStatus::Exhausted);
    assert_eq!(h.api.count(|c| *c == Call::RandomFile), 1);
    assert!(!EXHAUSTED_MESSAGE.is_empty());

    // Shortcuts do nothing while nothing is under review.
    h.command(Command::Classify(Category::Silent));
    h.settle().await;
    assert!(h.api.submitted().is_empty());

    // A manual retry asks again.
    h.command(Command::LoadNext);
    h.settle().await;
    assert_eq!(h.api.count(|c| *c == Call::RandomFile), 2);
}

#[tokio::test(start_paused = true)]
async fn rapid_double_classify_submits_once() {
    let api = MockApi::new()
        .with_files(vec![file(42, "a.wav")])
        .with_delay(Duration::from_millis(200));
    let mut h = Harness::new(api);
    h.mount();
    h.settle().await;

    h.command(Command::Classify(Category::Voice));
    h.command(Command::Classify(Category::Silent));
    h.settle().await;

    assert_eq!(h.api.submitted(), vec![(42, Category::Voice)]);
}

#[tokio::test]
async fn failed_submit_stays_empty_until_retry() {
    let api = MockApi::new().with_files(vec![file(42, "a.wav")]);
    api.queue_classify(Err(CoreError::Transport("server returned HTTP 500".into())));
    let mut h = Harness::new(api);
    h.mount();
    h.settle().await;

    h.command(Command::Classify(Category::AnsweringMachine));
    h.settle().await;

    assert_eq!(h.controller.session(), &Session::Empty);
    assert!(matches!(h.controller.status(), SessionStatus::Failed(_)));
    assert!(h.controller.history().items().is_empty());
    assert_eq!(
        h.controller.notification().map(|n| n.severity),
        Some(Severity::Error)
    );
    assert_eq!(h.api.count(|c| *c == Call::RandomFile), 1);
    assert_eq!(h.player.state(), PlaybackState::Idle);
}

#[tokio::test(start_paused = true)]
async fn responses_after_unmount_are_discarded() {
    let api = MockApi::new()
        .with_files(vec![file(42, "a.wav")])
        .with_delay(Duration::from_millis(500));
    let mut h = Harness::new(api);
    h.mount();
    let effects = h.controller.unmount();
    h.apply(effects);
    h.settle().await;

    assert!(!h.controller.is_mounted());
    assert_eq!(h.controller.session(), &Session::Empty);
    assert!(h.controller.history().items().is_empty());
    assert_eq!(h.player.source(), None);
}

#[tokio::test]
async fn reclassify_updates_history_in_place() {
    let api = MockApi::new();
    api.queue_history(Ok(HistoryPage {
        items: vec![file(7, "old.wav")],
        page_index: 0,
        page_size: 10,
        total_pages: 1,
    }));
    let mut h = Harness::new(api);
    h.mount();
    h.settle().await;

    h.command(Command::Reclassify {
        id: 7,
        category: Category::Silent,
    });
    h.settle().await;

    let item = &h.controller.history().items()[0];
    assert_eq!(item.current_category, Category::Silent);
    assert_eq!(item.initial_category, Category::Voice);
    assert_eq!(h.api.submitted(), vec![(7, Category::Silent)]);
    assert_eq!(
        h.controller.notification().map(|n| n.message.as_str()),
        Some("Reclassified as Silent")
    );
}

#[tokio::test]
async fn recall_previous_rebinds_playback() {
    let api = MockApi::new().with_files(vec![file(42, "a.wav")]);
    let mut h = Harness::new(api);
    h.mount();
    h.settle().await;

    h.command(Command::Classify(Category::Voice));
    h.settle().await;
    assert_eq!(h.controller.status(), &SessionStatus::Exhausted);

    h.command(Command::RecallPrevious);
    assert_eq!(h.controller.session().current().map(|f| f.id), Some(42));
    assert_eq!(
        h.player.source(),
        Some("http://localhost:8080/files/a.wav")
    );
}
