//! Response shapes the history endpoint has used over time.

use serde::Deserialize;

use crate::{AudioFileRecord, CoreError, HistoryPage};

#[derive(Debug, Deserialize)]
struct PageMeta {
    #[serde(rename = "totalPages")]
    total_pages: usize,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum HistoryResponse {
    /// `{content, page: {totalPages}}`
    Nested {
        content: Vec<AudioFileRecord>,
        page: PageMeta,
    },
    /// `{content, totalPages}`
    Flat {
        content: Vec<AudioFileRecord>,
        #[serde(rename = "totalPages")]
        total_pages: usize,
    },
    /// A bare array of records.
    Bare(Vec<AudioFileRecord>),
}

/// Fold any known history payload into one [`HistoryPage`].
///
/// A bare array carries no page count: a full page is taken to mean another
/// page may follow.
pub fn normalize_history(
    body: serde_json::Value,
    page_index: usize,
    page_size: usize,
) -> Result<HistoryPage, CoreError> {
    let response: HistoryResponse = serde_json::from_value(body)?;
    let (items, total_pages) = match response {
        HistoryResponse::Nested { content, page } => (content, page.total_pages),
        HistoryResponse::Flat {
            content,
            total_pages,
        } => (content, total_pages),
        HistoryResponse::Bare(items) => {
            let total = if items.is_empty() && page_index == 0 {
                0
            } else if items.len() >= page_size {
                page_index + 2
            } else {
                page_index + 1
            };
            (items, total)
        }
    };

    let mut items = items;
    items.truncate(page_size);

    Ok(HistoryPage {
        items,
        page_index,
        page_size,
        total_pages,
    })
}
