// SPDX-License-Identifier: Apache-2.0

//! Bounded page-by-page fetch loop over GitHub's page-numbered listings.
//!
//! Pages are fetched strictly in sequence and concatenated in upstream order.
//! Iteration stops on, in order of precedence:
//! 1. an empty page,
//! 2. a page shorter than the page size (included, then stop),
//! 3. the page-count ceiling.
//!
//! The ceiling is a safety valve, not a completeness guarantee: a result cut
//! short by it is flagged but otherwise returned as-is. Fetch failures are
//! propagated unchanged; nothing here retries.

use std::future::Future;

use tracing::{debug, warn};

use crate::Result;

/// Page size and page-count ceiling for one paginated listing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    /// Items requested per page.
    pub per_page: u8,
    /// Maximum number of pages fetched.
    pub max_pages: u32,
}

impl PageLimits {
    /// Creates limits; both values are clamped to at least 1.
    #[must_use]
    pub fn new(per_page: u8, max_pages: u32) -> Self {
        Self {
            per_page: per_page.max(1),
            max_pages: max_pages.max(1),
        }
    }
}

/// Coordinates of a single page request (1-based page index).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    /// Page number, starting at 1.
    pub page: u32,
    /// Items per page.
    pub per_page: u8,
}

/// Concatenated result of a full pagination pass.
#[derive(Debug, Clone)]
pub struct Paginated<T> {
    /// Items from every fetched page, in upstream order.
    pub items: Vec<T>,
    /// Number of fetch calls made.
    pub pages_fetched: u32,
    /// False when the ceiling stopped iteration before a terminal page.
    pub complete: bool,
}

/// Result of a search that stops at the first matching item.
#[derive(Debug, Clone)]
pub struct PageSearch<T> {
    /// The first item satisfying the predicate, if any.
    pub found: Option<T>,
    /// Number of fetch calls made.
    pub pages_fetched: u32,
    /// Number of items examined across all fetched pages.
    pub scanned: usize,
}

/// Fetches every page until a terminal page or the ceiling.
///
/// `fetch` is called with 1-based page numbers and must return at most
/// `limits.per_page` items.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub async fn paginate<T, F, Fut>(limits: PageLimits, mut fetch: F) -> Result<Paginated<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
{
    let per_page = usize::from(limits.per_page);
    let mut items = Vec::new();

    for page in 1..=limits.max_pages {
        let batch = fetch(PageRequest {
            page,
            per_page: limits.per_page,
        })
        .await?;

        if batch.is_empty() {
            debug!(page, "Empty page, stopping");
            return Ok(Paginated {
                items,
                pages_fetched: page,
                complete: true,
            });
        }

        let short = batch.len() < per_page;
        items.extend(batch);

        if short {
            debug!(page, total = items.len(), "Short page, stopping");
            return Ok(Paginated {
                items,
                pages_fetched: page,
                complete: true,
            });
        }
    }

    warn!(
        max_pages = limits.max_pages,
        total = items.len(),
        "Pagination ceiling reached, result may be incomplete"
    );
    Ok(Paginated {
        items,
        pages_fetched: limits.max_pages,
        complete: false,
    })
}

/// Fetches pages until an item satisfies `predicate`, a terminal page, or the ceiling.
///
/// The page containing the match is the last one fetched.
///
/// # Errors
///
/// Returns the first error produced by `fetch`.
pub async fn paginate_until<T, F, Fut, P>(
    limits: PageLimits,
    mut fetch: F,
    mut predicate: P,
) -> Result<PageSearch<T>>
where
    F: FnMut(PageRequest) -> Fut,
    Fut: Future<Output = Result<Vec<T>>>,
    P: FnMut(&T) -> bool,
{
    let per_page = usize::from(limits.per_page);
    let mut scanned = 0;

    for page in 1..=limits.max_pages {
        let batch = fetch(PageRequest {
            page,
            per_page: limits.per_page,
        })
        .await?;

        if batch.is_empty() {
            return Ok(PageSearch {
                found: None,
                pages_fetched: page,
                scanned,
            });
        }

        let len = batch.len();
        scanned += len;

        if let Some(found) = batch.into_iter().find(|item| predicate(item)) {
            debug!(page, scanned, "Match found");
            return Ok(PageSearch {
                found: Some(found),
                pages_fetched: page,
                scanned,
            });
        }

        if len < per_page {
            return Ok(PageSearch {
                found: None,
                pages_fetched: page,
                scanned,
            });
        }
    }

    warn!(
        max_pages = limits.max_pages,
        scanned, "Pagination ceiling reached without a match"
    );
    Ok(PageSearch {
        found: None,
        pages_fetched: limits.max_pages,
        scanned,
    })
}
