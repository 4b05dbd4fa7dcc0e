//! Mock classification service for tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::time::Duration;

use super::{ApiFuture, ClassificationApi};
use crate::category::{Category, CategoryEntry};
use crate::{AudioFileRecord, CoreError, Credentials, FileId, HistoryPage, LoginResponse};

/// One recorded call against [`MockApi`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Health,
    RandomFile,
    Classify { id: FileId, category: Category },
    History { page: usize, page_size: usize },
    Categories,
    Login { email: String },
    Register { email: String },
}

/// A hand-rolled [`ClassificationApi`] for tests.
///
/// Each endpoint pops queued responses in order. When a queue runs dry the
/// endpoint falls back to a fixed answer: no content for the random file, an
/// empty history page, success for classify/register and the current health
/// result (which persists until changed with [`MockApi::set_health`]).
pub struct MockApi {
    random: Mutex<VecDeque<Result<AudioFileRecord, CoreError>>>,
    classify: Mutex<VecDeque<Result<(), CoreError>>>,
    history: Mutex<VecDeque<Result<HistoryPage, CoreError>>>,
    categories: Mutex<VecDeque<Result<Vec<CategoryEntry>, CoreError>>>,
    login: Mutex<VecDeque<Result<LoginResponse, CoreError>>>,
    register: Mutex<VecDeque<Result<(), CoreError>>>,
    health: Mutex<Result<(), CoreError>>,
    delay: Option<Duration>,
    calls: Mutex<Vec<Call>>,
}

impl Default for MockApi {
    fn default() -> Self {
        Self::new()
    }
}

impl MockApi {
    pub fn new() -> Self {
        Self {
            random: Mutex::new(VecDeque::new()),
            classify: Mutex::new(VecDeque::new()),
            history: Mutex::new(VecDeque::new()),
            categories: Mutex::new(VecDeque::new()),
            login: Mutex::new(VecDeque::new()),
            register: Mutex::new(VecDeque::new()),
            health: Mutex::new(Ok(())),
            delay: None,
            calls: Mutex::new(Vec::new()),
        }
    }

    /// Queue files to be handed out by `random_file`, in order.
    pub fn with_files(self, files: Vec<AudioFileRecord>) -> Self {
        for file in files {
            self.queue_random(Ok(file));
        }
        self
    }

    /// Set simulated network latency per call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn queue_random(&self, response: Result<AudioFileRecord, CoreError>) {
        lock(&self.random).push_back(response);
    }

    pub fn queue_classify(&self, response: Result<(), CoreError>) {
        lock(&self.classify).push_back(response);
    }

    pub fn queue_history(&self, response: Result<HistoryPage, CoreError>) {
        lock(&self.history).push_back(response);
    }

    pub fn queue_categories(&self, response: Result<Vec<CategoryEntry>, CoreError>) {
        lock(&self.categories).push_back(response);
    }

    pub fn queue_login(&self, response: Result<LoginResponse, CoreError>) {
        lock(&self.login).push_back(response);
    }

    pub fn queue_register(&self, response: Result<(), CoreError>) {
        lock(&self.register).push_back(response);
    }

    pub fn set_health(&self, result: Result<(), CoreError>) {
        *lock(&self.health) = result;
    }

    pub fn calls(&self) -> Vec<Call> {
        lock(&self.calls).clone()
    }

    /// Every `(id, category)` submitted so far.
    pub fn submitted(&self) -> Vec<(FileId, Category)> {
        lock(&self.calls)
            .iter()
            .filter_map(|c| match c {
                Call::Classify { id, category } => Some((*id, category.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn count(&self, matches: impl Fn(&Call) -> bool) -> usize {
        lock(&self.calls).iter().filter(|c| matches(c)).count()
    }

    fn record(&self, call: Call) {
        lock(&self.calls).push(call);
    }

    async fn latency(&self) {
        if let Some(d) = self.delay {
            tokio::time::sleep(d).await;
        }
    }
}

fn lock<T>(mutex: &Mutex<T>) -> std::sync::MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl ClassificationApi for MockApi {
    fn health(&self) -> ApiFuture<'_, ()> {
        self.record(Call::Health);
        let response = lock(&self.health).clone();
        Box::pin(async move {
            self.latency().await;
            response
        })
    }

    fn random_file(&self) -> ApiFuture<'_, AudioFileRecord> {
        self.record(Call::RandomFile);
        let response = lock(&self.random)
            .pop_front()
            .unwrap_or(Err(CoreError::NoContentAvailable));
        Box::pin(async move {
            self.latency().await;
            response
        })
    }

    fn classify(&self, id: FileId, category: Category) -> ApiFuture<'_, ()> {
        self.record(Call::Classify { id, category });
        let response = lock(&self.classify).pop_front().unwrap_or(Ok(()));
        Box::pin(async move {
            self.latency().await;
            response
        })
    }

    fn history(&self, page: usize, page_size: usize) -> ApiFuture<'_, HistoryPage> {
        self.record(Call::History { page, page_size });
        let response = lock(&self.history).pop_front().unwrap_or_else(|| {
            Ok(HistoryPage {
                page_index: page,
                ..HistoryPage::empty(page_size)
            })
        });
        Box::pin(async move {
            self.latency().await;
            response
        })
    }

    fn categories(&self) -> ApiFuture<'_, Vec<CategoryEntry>> {
        self.record(Call::Categories);
        let response = lock(&self.categories).pop_front().unwrap_or(Ok(Vec::new()));
        Box::pin(async move {
            self.latency().await;
            response
        })
    }

    fn login(&self, credentials: Credentials) -> ApiFuture<'_, LoginResponse> {
        self.record(Call::Login {
            email: credentials.email,
        });
        let response = lock(&self.login)
            .pop_front()
            .unwrap_or(Err(CoreError::Unauthorized));
        Box::pin(async move {
            self.latency().await;
            response
        })
    }

    fn register(&self, credentials: Credentials) -> ApiFuture<'_, ()> {
        self.record(Call::Register {
            email: credentials.email,
        });
        let response = lock(&self.register).pop_front().unwrap_or(Ok(()));
        Box::pin(async move {
            self.latency().await;
            response
        })
    }
}
