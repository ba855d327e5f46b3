//! Pagination module
//!
//! Enumerates every record of a paginated resource.
//!
//! # Overview
//!
//! - `PaginationConfig` describes the cursor parameters and where records
//!   and metadata live in a response.
//! - `PageCursor` tracks the position of a single paged read.
//! - `Pages` drives the executor one page at a time and exposes the result
//!   as `next_page()`, a callback driver, or a `Stream`.

mod cursor;
mod pages;
mod types;

pub use cursor::PageCursor;
pub use pages::Pages;
pub use types::{
    CursorStyle, Page, PageMetadata, PageState, PaginationConfig, DEFAULT_PAGE_SIZE,
};
