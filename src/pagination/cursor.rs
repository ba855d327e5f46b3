//! Pagination cursor
//!
//! Position of one paged read. Owned by a single invocation and never shared.

use super::types::{CursorStyle, PageMetadata, PageState, PaginationConfig};
use crate::types::QueryValue;

#[derive(Debug, Clone)]
pub struct PageCursor {
    style: CursorStyle,
    page_size: u32,
    /// Pages received so far
    pages_fetched: u64,
    /// Records received so far
    records_fetched: u64,
    state: PageState,
}

impl PageCursor {
    /// Cursor positioned at the first page
    pub fn new(config: &PaginationConfig) -> Self {
        Self {
            style: config.style,
            page_size: config.page_size.max(1),
            pages_fetched: 0,
            records_fetched: 0,
            state: PageState::Fetching,
        }
    }

    pub fn state(&self) -> PageState {
        self.state
    }

    pub fn page_size(&self) -> u32 {
        self.page_size
    }

    pub fn pages_fetched(&self) -> u64 {
        self.pages_fetched
    }

    pub fn records_fetched(&self) -> u64 {
        self.records_fetched
    }

    /// Value of the cursor parameter for the next request
    pub fn position(&self) -> u64 {
        match self.style {
            CursorStyle::PageNumber { start_page } => u64::from(start_page) + self.pages_fetched,
            CursorStyle::Offset => self.records_fetched,
        }
    }

    /// Query parameters selecting the next page
    pub fn query_params(&self, config: &PaginationConfig) -> [(String, QueryValue); 2] {
        [
            (
                config.cursor_param.clone(),
                QueryValue::Integer(self.position() as i64),
            ),
            (
                config.size_param.clone(),
                QueryValue::Integer(i64::from(self.page_size)),
            ),
        ]
    }

    /// Account for a received page and report whether it is the last one
    ///
    /// An empty page is always last. Otherwise an explicit has-more flag
    /// decides, then the reported totals; a short page only ends the read
    /// when the server sends neither. The cursor moves to `Done` on the last page and one page forward
    /// otherwise.
    pub fn record_page(&mut self, record_count: usize, metadata: &PageMetadata) -> bool {
        self.pages_fetched += 1;
        self.records_fetched += record_count as u64;

        let last = if record_count == 0 {
            true
        } else if let Some(has_more) = metadata.has_more {
            !has_more
        } else if metadata.total_items.is_some() || metadata.total_pages.is_some() {
            let total_reached = metadata
                .total_items
                .is_some_and(|total| self.records_fetched >= total);
            let pages_reached = metadata
                .total_pages
                .is_some_and(|total| self.pages_fetched >= total);
            total_reached || pages_reached
        } else {
            record_count < self.page_size as usize
        };
        if last {
            self.state = PageState::Done;
        }
        last
    }

    pub fn fail(&mut self) {
        self.state = PageState::Failed;
    }
}
