//! Parsing of `page` / `limit` query parameters.

use std::num::{NonZeroU32, NonZeroU64};

/// Query parameter selecting the 1-based page number.
pub const PAGE_PARAM: &str = "page";
/// Query parameter overriding the page size.
pub const LIMIT_PARAM: &str = "limit";

/// Errors raised while resolving a page request.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PageError {
    /// The page parameter is not a positive integer.
    #[error("Invalid page.")]
    InvalidPage {
        /// Raw value supplied by the client.
        raw: String,
    },
    /// The page lies beyond the last page of the result set.
    #[error("Invalid page.")]
    OutOfRange {
        /// Requested page number.
        page: u64,
        /// Last page available for the current result count.
        last: u64,
    },
}

/// Resolve a page-size override, falling back to `default` when the raw
/// value is missing, non-numeric, or zero.
///
/// # Examples
/// ```
/// use std::num::NonZeroU32;
///
/// use pagination::limit_or_default;
///
/// let default = NonZeroU32::new(6).expect("non-zero");
/// assert_eq!(limit_or_default(Some("3"), default).get(), 3);
/// assert_eq!(limit_or_default(Some("many"), default).get(), 6);
/// assert_eq!(limit_or_default(None, default).get(), 6);
/// ```
#[must_use]
pub fn limit_or_default(raw: Option<&str>, default: NonZeroU32) -> NonZeroU32 {
    raw.and_then(|value| value.trim().parse::<NonZeroU32>().ok())
        .unwrap_or(default)
}

/// A validated page selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    page: NonZeroU64,
    limit: NonZeroU32,
}

impl PageRequest {
    /// First page with the given size.
    #[must_use]
    pub const fn first(limit: NonZeroU32) -> Self {
        Self {
            page: NonZeroU64::MIN,
            limit,
        }
    }

    /// Parse raw query values.
    ///
    /// A missing page selects the first page. A malformed limit is ignored in
    /// favour of `default_limit`; a malformed page is rejected.
    ///
    /// # Errors
    /// Returns [`PageError::InvalidPage`] when `page` is not a positive
    /// integer.
    pub fn parse(
        page: Option<&str>,
        limit: Option<&str>,
        default_limit: NonZeroU32,
    ) -> Result<Self, PageError> {
        let limit = limit_or_default(limit, default_limit);
        let page = match page {
            None => NonZeroU64::MIN,
            Some(raw) => raw
                .trim()
                .parse::<NonZeroU64>()
                .map_err(|_| PageError::InvalidPage {
                    raw: raw.to_owned(),
                })?,
        };
        Ok(Self { page, limit })
    }

    /// 1-based page number.
    #[must_use]
    pub const fn page(&self) -> u64 {
        self.page.get()
    }

    /// Page size.
    #[must_use]
    pub const fn limit(&self) -> u32 {
        self.limit.get()
    }

    /// Number of rows to skip before this page.
    #[must_use]
    pub fn offset(&self) -> u64 {
        (self.page.get() - 1).saturating_mul(u64::from(self.limit.get()))
    }

    /// Last page number for `count` rows; an empty result set still has one
    /// page.
    #[must_use]
    pub fn last_page(&self, count: u64) -> u64 {
        count.div_ceil(u64::from(self.limit.get())).max(1)
    }

    /// Whether another page follows this one.
    #[must_use]
    pub fn has_next(&self, count: u64) -> bool {
        self.page.get() < self.last_page(count)
    }

    /// Whether a page precedes this one.
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.page.get() > 1
    }

    /// Reject pages past the end of the result set.
    ///
    /// # Errors
    /// Returns [`PageError::OutOfRange`] when the page exceeds the last page.
    pub fn ensure_within(&self, count: u64) -> Result<(), PageError> {
        let last = self.last_page(count);
        if self.page.get() > last {
            return Err(PageError::OutOfRange {
                page: self.page.get(),
                last,
            });
        }
        Ok(())
    }
}
