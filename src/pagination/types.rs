//! Pagination types
//!
//! Describes where the cursor lives in the request and where records and
//! metadata live in the response.

use crate::types::JsonValue;
use serde::Deserialize;

/// Default number of records requested per page
pub const DEFAULT_PAGE_SIZE: u32 = 50;

/// How the cursor position is expressed in the query string
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum CursorStyle {
    /// `?PageIndex=2&PageSize=50`
    PageNumber {
        /// Index of the first page (usually 0 or 1)
        #[serde(default = "default_start_page")]
        start_page: u32,
    },
    /// `?Offset=100&PageSize=50`
    Offset,
}

impl Default for CursorStyle {
    fn default() -> Self {
        Self::PageNumber {
            start_page: default_start_page(),
        }
    }
}

fn default_start_page() -> u32 {
    1
}

/// Request and response layout of a paginated resource
///
/// Field paths accept dotted notation with an optional `$.` prefix,
/// e.g. `Paging.TotalItems`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct PaginationConfig {
    /// Cursor encoding
    pub style: CursorStyle,
    /// Query parameter carrying the page index or offset
    pub cursor_param: String,
    /// Query parameter carrying the page size
    pub size_param: String,
    /// Records requested per page
    pub page_size: u32,
    /// Path of the records array in the response
    pub records_field: String,
    /// Path of the total record count
    pub total_items_field: Option<String>,
    /// Path of the total page count
    pub total_pages_field: Option<String>,
    /// Path of an explicit has-more flag
    pub has_more_field: Option<String>,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            style: CursorStyle::default(),
            cursor_param: "PageIndex".to_string(),
            size_param: "PageSize".to_string(),
            page_size: DEFAULT_PAGE_SIZE,
            records_field: "Results".to_string(),
            total_items_field: Some("TotalItems".to_string()),
            total_pages_field: Some("TotalPages".to_string()),
            has_more_field: Some("HasMore".to_string()),
        }
    }
}

impl PaginationConfig {
    /// Offset/limit layout with the given parameter names
    pub fn offset(cursor_param: impl Into<String>, size_param: impl Into<String>) -> Self {
        Self {
            style: CursorStyle::Offset,
            cursor_param: cursor_param.into(),
            size_param: size_param.into(),
            ..Self::default()
        }
    }

    /// Set the page size
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size;
        self
    }

    /// Set the records path
    #[must_use]
    pub fn with_records_field(mut self, path: impl Into<String>) -> Self {
        self.records_field = path.into();
        self
    }

    /// Set the metadata paths; `None` disables a signal
    #[must_use]
    pub fn with_metadata_fields(
        mut self,
        total_items: Option<&str>,
        total_pages: Option<&str>,
        has_more: Option<&str>,
    ) -> Self {
        self.total_items_field = total_items.map(String::from);
        self.total_pages_field = total_pages.map(String::from);
        self.has_more_field = has_more.map(String::from);
        self
    }

    /// Query parameter names the cursor owns
    pub fn reserved_params(&self) -> [&str; 2] {
        [self.cursor_param.as_str(), self.size_param.as_str()]
    }

    /// Split a response into its records and pagination metadata
    ///
    /// Returns `None` when the body is not a page: the records path does not
    /// hold an array, or none of the configured metadata signals is present.
    pub fn parse_page(&self, body: JsonValue) -> Option<(Vec<JsonValue>, PageMetadata)> {
        let metadata = PageMetadata {
            total_items: self
                .total_items_field
                .as_deref()
                .and_then(|p| lookup(&body, p))
                .and_then(as_u64),
            total_pages: self
                .total_pages_field
                .as_deref()
                .and_then(|p| lookup(&body, p))
                .and_then(as_u64),
            has_more: self
                .has_more_field
                .as_deref()
                .and_then(|p| lookup(&body, p))
                .and_then(as_bool),
        };

        let expects_metadata = self.total_items_field.is_some()
            || self.total_pages_field.is_some()
            || self.has_more_field.is_some();
        if expects_metadata && metadata.is_empty() {
            return None;
        }

        let records = match take(body, &self.records_field)? {
            JsonValue::Array(records) => records,
            _ => return None,
        };
        Some((records, metadata))
    }
}

/// Pagination signals reported by the server for one page
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PageMetadata {
    pub total_items: Option<u64>,
    pub total_pages: Option<u64>,
    pub has_more: Option<bool>,
}

impl PageMetadata {
    pub fn is_empty(&self) -> bool {
        self.total_items.is_none() && self.total_pages.is_none() && self.has_more.is_none()
    }
}

/// One page delivered to the caller
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Records in server order
    pub records: Vec<JsonValue>,
    /// True on the last page; nothing follows it
    pub finished: bool,
    /// Zero-based position of this page within the invocation
    pub index: u64,
}

impl Page {
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Lifecycle of one paged read
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageState {
    /// More pages may follow
    Fetching,
    /// The last page was delivered
    Done,
    /// An error was delivered
    Failed,
}

impl PageState {
    pub fn is_terminal(self) -> bool {
        !matches!(self, Self::Fetching)
    }
}

fn path_parts(path: &str) -> impl Iterator<Item = &str> {
    path.strip_prefix("$.")
        .unwrap_or(path)
        .split('.')
        .filter(|p| !p.is_empty())
}

fn lookup<'a>(value: &'a JsonValue, path: &str) -> Option<&'a JsonValue> {
    path_parts(path).try_fold(value, |current, part| current.as_object()?.get(part))
}

/// Move the value at `path` out of `value`
fn take(mut value: JsonValue, path: &str) -> Option<JsonValue> {
    let mut current = &mut value;
    for part in path_parts(path) {
        current = current.as_object_mut()?.get_mut(part)?;
    }
    Some(current.take())
}

fn as_u64(value: &JsonValue) -> Option<u64> {
    match value {
        JsonValue::Number(n) => n.as_u64(),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_bool(value: &JsonValue) -> Option<bool> {
    match value {
        JsonValue::Bool(b) => Some(*b),
        JsonValue::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}
