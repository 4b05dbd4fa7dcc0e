//! Executes controller effects against the classification service.

use std::sync::Arc;

use tokio::sync::mpsc;

use crate::api::ClassificationApi;
use crate::controller::{Completion, Effect, Outcome};
use crate::submit::ClassificationSubmitter;

/// Spawns one task per remote effect and reports each result on `tx`.
///
/// Completions carry the epoch they were issued under; the controller drops
/// the ones that no longer match. Playback effects are not remote and are
/// left to the caller.
#[derive(Clone)]
pub struct EffectRunner {
    api: Arc<dyn ClassificationApi>,
    submitter: ClassificationSubmitter,
    tx: mpsc::UnboundedSender<Completion>,
}

impl EffectRunner {
    pub fn new(api: Arc<dyn ClassificationApi>, tx: mpsc::UnboundedSender<Completion>) -> Self {
        Self {
            submitter: ClassificationSubmitter::new(api.clone()),
            api,
            tx,
        }
    }

    /// Start `effect`. Returns false for effects this runner does not handle.
    pub fn run(&self, epoch: u64, effect: Effect) -> bool {
        if !effect.is_remote() {
            return false;
        }
        let api = Arc::clone(&self.api);
        let submitter = self.submitter.clone();
        let tx = self.tx.clone();
        tokio::spawn(async move {
            if let Some(outcome) = perform(api.as_ref(), &submitter, effect).await {
                // The receiver is gone once the view is torn down.
                let _ = tx.send(Completion { epoch, outcome });
            }
        });
        true
    }
}

/// Perform one remote effect to completion. Local effects yield `None`.
pub async fn perform(
    api: &dyn ClassificationApi,
    submitter: &ClassificationSubmitter,
    effect: Effect,
) -> Option<Outcome> {
    let outcome = match effect {
        Effect::FetchNext => match api.random_file().await {
            Ok(file) => Outcome::NextLoaded(file),
            Err(e) => Outcome::NextFailed(e),
        },
        Effect::Submit {
            target,
            id,
            category,
        } => match submitter.submit(id, category.clone()).await {
            Ok(()) => Outcome::Submitted {
                target,
                id,
                category,
                classified_at: crate::now_timestamp(),
            },
            Err(error) => Outcome::SubmitFailed { target, id, error },
        },
        Effect::FetchPage { index, page_size } => match api.history(index, page_size).await {
            Ok(page) => Outcome::PageLoaded(page),
            Err(error) => Outcome::PageFailed { index, error },
        },
        Effect::FetchCategories => match api.categories().await {
            Ok(entries) => Outcome::CategoriesLoaded(entries),
            Err(e) => Outcome::CategoriesFailed(e),
        },
        Effect::Playback(_) => return None,
    };
    Some(outcome)
}
