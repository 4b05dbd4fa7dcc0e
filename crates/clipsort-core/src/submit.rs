//! Persisting a classification decision.

use std::sync::Arc;

use crate::api::ClassificationApi;
use crate::category::Category;
use crate::{CoreError, FileId};

/// Who asked for a decision to be persisted; decides how the outcome is
/// applied once it comes back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmitTarget {
    /// The file currently under review.
    Current,
    /// A record on the visible history page.
    History,
}

/// Pass-through to the classification service. Holds no state and imposes
/// no timeout or retry of its own.
#[derive(Clone)]
pub struct ClassificationSubmitter {
    api: Arc<dyn ClassificationApi>,
}

impl ClassificationSubmitter {
    pub fn new(api: Arc<dyn ClassificationApi>) -> Self {
        Self { api }
    }

    pub async fn submit(&self, file_id: FileId, category: Category) -> Result<(), CoreError> {
        tracing::debug!(file_id, category = %category, "submitting decision");
        let result = self.api.classify(file_id, category).await;
        if let Err(e) = &result {
            tracing::warn!(file_id, error = %e, "classification failed");
        }
        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::mock::MockApi;

    #[tokio::test]
    async fn forwards_outcome_unchanged() {
        let api = Arc::new(MockApi::new());
        api.queue_classify(Err(CoreError::Transport("reset".into())));
        let submitter = ClassificationSubmitter::new(api.clone());

        let err = submitter.submit(9, Category::Silent).await.unwrap_err();
        assert_eq!(err, CoreError::Transport("reset".into()));
        submitter.submit(9, Category::Voice).await.unwrap();

        assert_eq!(
            api.submitted(),
            vec![(9, Category::Silent), (9, Category::Voice)]
        );
    }
}
