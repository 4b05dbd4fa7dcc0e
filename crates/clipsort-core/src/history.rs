//! Paginated, locally editable history of decided files.

use std::collections::HashSet;

use crate::category::Category;
use crate::controller::Effect;
use crate::submit::SubmitTarget;
use crate::{AudioFileRecord, CoreError, FileId, HistoryPage};

pub const DEFAULT_PAGE_SIZE: usize = 10;
pub const PAGE_SIZES: [usize; 4] = [5, 10, 25, 50];

/// Owns the visible history page.
///
/// Reclassification edits the page in place instead of reloading it, so the
/// list keeps its order (entries are ordered by first decision time).
#[derive(Debug, Clone)]
pub struct HistoryPager {
    page: HistoryPage,
    /// `(index, size)` of the fetch in flight; older responses are dropped.
    requested: Option<(usize, usize)>,
    /// Decisions made while page 0 was in flight, oldest first. The response
    /// may predate them, so they are laid over it on arrival.
    pending_head: Vec<AudioFileRecord>,
    reclassifying: HashSet<FileId>,
}

impl Default for HistoryPager {
    fn default() -> Self {
        Self::new(DEFAULT_PAGE_SIZE)
    }
}

impl HistoryPager {
    pub fn new(page_size: usize) -> Self {
        Self {
            page: HistoryPage::empty(page_size.max(1)),
            requested: None,
            pending_head: Vec::new(),
            reclassifying: HashSet::new(),
        }
    }

    pub fn page(&self) -> &HistoryPage {
        &self.page
    }

    pub fn items(&self) -> &[AudioFileRecord] {
        &self.page.items
    }

    pub fn is_loading(&self) -> bool {
        self.requested.is_some()
    }

    pub fn is_reclassifying(&self, id: FileId) -> bool {
        self.reclassifying.contains(&id)
    }

    pub fn load_page(&mut self, index: usize) -> Vec<Effect> {
        let page_size = self.page.page_size;
        self.requested = Some((index, page_size));
        vec![Effect::FetchPage { index, page_size }]
    }

    pub fn next_page(&mut self) -> Vec<Effect> {
        let next = self.page.page_index + 1;
        if next >= self.page.total_pages {
            return Vec::new();
        }
        self.load_page(next)
    }

    pub fn prev_page(&mut self) -> Vec<Effect> {
        match self.page.page_index.checked_sub(1) {
            Some(prev) => self.load_page(prev),
            None => Vec::new(),
        }
    }

    /// Change the page size and go back to the first page.
    pub fn set_page_size(&mut self, page_size: usize) -> Vec<Effect> {
        self.page.page_size = page_size.max(1);
        self.load_page(0)
    }

    /// Step through [`PAGE_SIZES`]; `grow` picks the next larger size.
    pub fn cycle_page_size(&mut self, grow: bool) -> Vec<Effect> {
        let current = self.page.page_size;
        let next = if grow {
            PAGE_SIZES.iter().copied().find(|&s| s > current)
        } else {
            PAGE_SIZES.iter().rev().copied().find(|&s| s < current)
        };
        match next {
            Some(size) => self.set_page_size(size),
            None => Vec::new(),
        }
    }

    pub fn page_loaded(&mut self, page: HistoryPage) {
        if self.requested != Some((page.page_index, page.page_size)) {
            tracing::debug!(page = page.page_index, "out-of-date history page dropped");
            return;
        }
        self.requested = None;
        self.page = page;
        let pending = std::mem::take(&mut self.pending_head);
        if self.page.page_index == 0 {
            for record in pending {
                self.put_head(record);
            }
        }
    }

    /// Failures keep the previous page on screen.
    pub fn page_failed(&mut self, index: usize, error: &CoreError) {
        tracing::warn!(page = index, error = %error, "failed to load history page");
        if matches!(self.requested, Some((i, _)) if i == index) {
            self.requested = None;
            self.pending_head.clear();
        }
    }

    /// Persist a new category for a record on the visible page.
    pub fn reclassify(&mut self, id: FileId, category: Category) -> Vec<Effect> {
        let Some(record) = self.page.items.iter().find(|r| r.id == id) else {
            tracing::debug!(file_id = id, "reclassify for record not on page ignored");
            return Vec::new();
        };
        if record.current_category == category || !self.reclassifying.insert(id) {
            return Vec::new();
        }
        vec![Effect::Submit {
            target: SubmitTarget::History,
            id,
            category,
        }]
    }

    /// Apply an accepted reclassification to the matching record only.
    pub fn reclassified(&mut self, id: FileId, category: &Category) -> bool {
        self.reclassifying.remove(&id);
        match self.page.items.iter_mut().find(|r| r.id == id) {
            Some(record) => {
                record.current_category = category.clone();
                true
            }
            None => false,
        }
    }

    pub fn reclassify_failed(&mut self, id: FileId) {
        self.reclassifying.remove(&id);
    }

    /// Put a freshly decided record at the head of page 0. Other pages pick
    /// it up on their next fetch.
    pub fn prepend(&mut self, record: AudioFileRecord) {
        if matches!(self.requested, Some((0, _))) {
            self.pending_head.retain(|r| r.id != record.id);
            self.pending_head.push(record.clone());
        }
        if self.page.page_index == 0 {
            self.put_head(record);
        }
    }

    fn put_head(&mut self, record: AudioFileRecord) {
        let items = &mut self.page.items;
        items.retain(|r| r.id != record.id);
        items.insert(0, record);
        let overflowed = items.len() > self.page.page_size;
        items.truncate(self.page.page_size);

        if self.page.total_pages == 0 {
            self.page.total_pages = 1;
        }
        // A record pushed off the last page starts a new one.
        if overflowed && self.page.page_index + 1 == self.page.total_pages {
            self.page.total_pages += 1;
        }
    }
}
