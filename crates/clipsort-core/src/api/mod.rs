//! REST port to the classification service and its implementations.

pub mod http;
pub mod mock;
mod wire;

use std::future::Future;
use std::pin::Pin;

use crate::category::{Category, CategoryEntry};
use crate::{AudioFileRecord, CoreError, Credentials, FileId, HistoryPage, LoginResponse};

pub use http::HttpApi;
pub use wire::normalize_history;

/// Boxed future returned by every [`ClassificationApi`] call.
pub type ApiFuture<'a, T> = Pin<Box<dyn Future<Output = Result<T, CoreError>> + Send + 'a>>;

/// The external classification service, as the session core consumes it.
pub trait ClassificationApi: Send + Sync {
    /// `GET /actuator/health`; any 2xx is `Ok`.
    fn health(&self) -> ApiFuture<'_, ()>;

    /// `GET /classification/random`. The "none left" signal maps to
    /// [`CoreError::NoContentAvailable`].
    fn random_file(&self) -> ApiFuture<'_, AudioFileRecord>;

    /// `POST /classification/{id}` with `{category}`. Used for first
    /// decisions and reclassification alike.
    fn classify(&self, id: FileId, category: Category) -> ApiFuture<'_, ()>;

    /// `GET /classification/history?page&pageSize`, normalised.
    fn history(&self, page: usize, page_size: usize) -> ApiFuture<'_, HistoryPage>;

    /// `GET /admin/categories`.
    fn categories(&self) -> ApiFuture<'_, Vec<CategoryEntry>>;

    /// `POST /auth/login`.
    fn login(&self, credentials: Credentials) -> ApiFuture<'_, LoginResponse>;

    /// `POST /auth/register`.
    fn register(&self, credentials: Credentials) -> ApiFuture<'_, ()>;
}
