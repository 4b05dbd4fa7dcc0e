//! reqwest adapter for [`ClassificationApi`].

use std::sync::Arc;

use reqwest::{RequestBuilder, Response, StatusCode};
use serde::Serialize;

use super::{ApiFuture, ClassificationApi, normalize_history};
use crate::category::{Category, CategoryEntry};
use crate::context::SessionContext;
use crate::{AudioFileRecord, CoreError, Credentials, FileId, HistoryPage, LoginResponse};

pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Serialize)]
struct ClassifyBody<'a> {
    category: &'a str,
}

/// HTTP client for the classification service.
///
/// Every request carries the bearer token currently held by the shared
/// [`SessionContext`]; no timeout is set beyond reqwest's own defaults.
#[derive(Clone)]
pub struct HttpApi {
    client: reqwest::Client,
    base_url: String,
    context: Arc<SessionContext>,
}

impl HttpApi {
    pub fn new(base_url: impl Into<String>, context: Arc<SessionContext>) -> Self {
        let client = reqwest::Client::builder()
            .pool_max_idle_per_host(2)
            .build()
            .unwrap_or_else(|_| reqwest::Client::new());
        Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            context,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn authorized(&self, builder: RequestBuilder) -> RequestBuilder {
        match self.context.token() {
            Some(token) => builder.bearer_auth(token),
            None => builder,
        }
    }

    async fn send(&self, builder: RequestBuilder) -> Result<Response, CoreError> {
        let resp = self.authorized(builder).send().await?;
        let status = resp.status();
        if status.is_success() {
            return Ok(resp);
        }
        Err(status_error(status))
    }
}

fn status_error(status: StatusCode) -> CoreError {
    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => CoreError::Unauthorized,
        other => CoreError::Transport(format!("server returned HTTP {}", other)),
    }
}

impl ClassificationApi for HttpApi {
    fn health(&self) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let resp = self.client.get(self.url("/actuator/health")).send().await?;
            if resp.status().is_success() {
                Ok(())
            } else {
                Err(status_error(resp.status()))
            }
        })
    }

    fn random_file(&self) -> ApiFuture<'_, AudioFileRecord> {
        Box::pin(async move {
            let builder = self.client.get(self.url("/classification/random"));
            let resp = self.authorized(builder).send().await?;
            match resp.status() {
                // The service answers 400 once nothing is left; 204 is treated alike.
                StatusCode::BAD_REQUEST | StatusCode::NO_CONTENT => {
                    Err(CoreError::NoContentAvailable)
                }
                status if status.is_success() => Ok(resp.json::<AudioFileRecord>().await?),
                status => Err(status_error(status)),
            }
        })
    }

    fn classify(&self, id: FileId, category: Category) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let body = ClassifyBody {
                category: category.label(),
            };
            let builder = self
                .client
                .post(self.url(&format!("/classification/{}", id)))
                .json(&body);
            self.send(builder).await?;
            Ok(())
        })
    }

    fn history(&self, page: usize, page_size: usize) -> ApiFuture<'_, HistoryPage> {
        Box::pin(async move {
            let builder = self
                .client
                .get(self.url("/classification/history"))
                .query(&[("page", page), ("pageSize", page_size)]);
            let body: serde_json::Value = self.send(builder).await?.json().await?;
            normalize_history(body, page, page_size)
        })
    }

    fn categories(&self) -> ApiFuture<'_, Vec<CategoryEntry>> {
        Box::pin(async move {
            let builder = self.client.get(self.url("/admin/categories"));
            Ok(self.send(builder).await?.json().await?)
        })
    }

    fn login(&self, credentials: Credentials) -> ApiFuture<'_, LoginResponse> {
        Box::pin(async move {
            let builder = self.client.post(self.url("/auth/login")).json(&credentials);
            Ok(self.send(builder).await?.json().await?)
        })
    }

    fn register(&self, credentials: Credentials) -> ApiFuture<'_, ()> {
        Box::pin(async move {
            let builder = self
                .client
                .post(self.url("/auth/register"))
                .json(&credentials);
            self.send(builder).await?;
            Ok(())
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trailing_slash_is_trimmed() {
        let api = HttpApi::new("http://example.test:8080/", Arc::new(SessionContext::in_memory()));
        assert_eq!(api.base_url(), "http://example.test:8080");
        assert_eq!(
            api.url("/classification/random"),
            "http://example.test:8080/classification/random"
        );
    }

    #[test]
    fn auth_statuses_map_to_unauthorized() {
        assert_eq!(status_error(StatusCode::FORBIDDEN), CoreError::Unauthorized);
        assert!(matches!(
            status_error(StatusCode::INTERNAL_SERVER_ERROR),
            CoreError::Transport(_)
        ));
    }
}
