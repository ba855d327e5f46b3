//! Paged read driver
//!
//! `Pages` walks a paginated resource one request at a time. Each call to
//! [`Pages::next_page`] issues at most one request; requests are never
//! overlapped because the cursor of page N+1 depends on page N.
//!
//! Every invocation yields either a run of pages ending in one with
//! `finished == true`, or a run of pages ending in one error. After that
//! terminal item `next_page` returns `None` without touching the network.

use super::cursor::PageCursor;
use super::types::{Page, PageState, PaginationConfig};
use crate::error::{Error, Result};
use crate::http::{RequestExecutor, RequestOptions};
use futures::stream::{self, Stream};
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Lazy, finite, non-restartable sequence of pages for one resource
pub struct Pages {
    executor: Arc<dyn RequestExecutor>,
    config: PaginationConfig,
    path: String,
    options: RequestOptions,
    cursor: PageCursor,
}

impl Pages {
    pub fn new(
        executor: Arc<dyn RequestExecutor>,
        config: PaginationConfig,
        path: impl Into<String>,
        options: RequestOptions,
    ) -> Self {
        let cursor = PageCursor::new(&config);
        Self {
            executor,
            config,
            path: path.into(),
            options,
            cursor,
        }
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn state(&self) -> PageState {
        self.cursor.state()
    }

    /// Records delivered so far
    pub fn records_fetched(&self) -> u64 {
        self.cursor.records_fetched()
    }

    /// Fetch the next page
    ///
    /// Returns `None` once a finished page or an error has been returned.
    pub async fn next_page(&mut self) -> Option<Result<Page>> {
        if self.cursor.state().is_terminal() {
            return None;
        }

        if self.cursor.pages_fetched() == 0 {
            if let Some(name) = self.reserved_collision() {
                return Some(Err(self.fail(Error::ReservedQueryParam { name })));
            }
        }

        let mut options = self.options.clone();
        for (key, value) in self.cursor.query_params(&self.config) {
            options.qs.insert(key, value);
        }

        let index = self.cursor.pages_fetched();
        debug!(path = %self.path, page = index, position = self.cursor.position(), "fetching page");

        let body = match self.executor.get_json(&self.path, &options).await {
            Ok(body) => body,
            Err(e) => return Some(Err(self.fail(e))),
        };

        let Some((records, metadata)) = self.config.parse_page(body) else {
            let err = Error::pagination_not_supported(self.path.clone());
            return Some(Err(self.fail(err)));
        };

        let finished = self.cursor.record_page(records.len(), &metadata);
        debug!(
            path = %self.path,
            page = index,
            records = records.len(),
            finished,
            "received page"
        );
        if finished {
            info!(
                path = %self.path,
                pages = self.cursor.pages_fetched(),
                records = self.cursor.records_fetched(),
                "pagination complete"
            );
        }

        Some(Ok(Page {
            records,
            finished,
            index,
        }))
    }

    /// Deliver every page to `on_page`, in order, until the terminal one
    ///
    /// `Ok(page)` mirrors `(error = none, finished = page.finished, data = page.records)`
    /// and `Err(e)` mirrors `(error = e, finished = false, data = none)`.
    pub async fn for_each<F>(mut self, mut on_page: F)
    where
        F: FnMut(Result<Page>),
    {
        while let Some(item) = self.next_page().await {
            on_page(item);
        }
    }

    /// Adapt into a `Stream` of pages
    pub fn into_stream(self) -> impl Stream<Item = Result<Page>> + Send {
        stream::unfold(self, |mut pages| async move {
            let item = pages.next_page().await?;
            Some((item, pages))
        })
    }

    fn reserved_collision(&self) -> Option<String> {
        let reserved = self.config.reserved_params();
        self.options
            .qs
            .keys()
            .find(|key| reserved.iter().any(|r| r.eq_ignore_ascii_case(key)))
            .cloned()
    }

    fn fail(&mut self, err: Error) -> Error {
        warn!(path = %self.path, page = self.cursor.pages_fetched(), error = %err, "pagination failed");
        self.cursor.fail();
        err
    }
}

impl std::fmt::Debug for Pages {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Pages")
            .field("path", &self.path)
            .field("cursor", &self.cursor)
            .finish_non_exhaustive()
    }
}
