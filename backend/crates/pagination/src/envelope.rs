//! Page envelope with absolute navigation links.

use serde::Serialize;
use url::Url;

use crate::request::{PAGE_PARAM, PageRequest};

/// Paginated response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Page<T> {
    /// Total number of rows across all pages.
    pub count: u64,
    /// Absolute URL of the next page, if any.
    pub next: Option<String>,
    /// Absolute URL of the previous page, if any.
    pub previous: Option<String>,
    /// Rows on this page.
    pub results: Vec<T>,
}

impl<T> Page<T> {
    /// Build an envelope for `results`, deriving links from the request URL.
    ///
    /// Every query parameter other than `page` is preserved; the first page
    /// is addressed without a `page` parameter.
    #[must_use]
    pub fn new(request: &PageRequest, base: &Url, count: u64, results: Vec<T>) -> Self {
        let next = request
            .has_next(count)
            .then(|| link_for(base, request.page().saturating_add(1)));
        let previous = request
            .has_previous()
            .then(|| link_for(base, request.page().saturating_sub(1)));
        Self {
            count,
            next,
            previous,
            results,
        }
    }

    /// Convert each row while keeping counts and links.
    #[must_use]
    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            count: self.count,
            next: self.next,
            previous: self.previous,
            results: self.results.into_iter().map(f).collect(),
        }
    }
}

fn link_for(base: &Url, page: u64) -> String {
    let retained: Vec<(String, String)> = base
        .query_pairs()
        .filter(|(key, _)| key != PAGE_PARAM)
        .map(|(key, value)| (key.into_owned(), value.into_owned()))
        .collect();

    let mut url = base.clone();
    url.set_query(None);
    if !retained.is_empty() || page > 1 {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in &retained {
            pairs.append_pair(key, value);
        }
        if page > 1 {
            pairs.append_pair(PAGE_PARAM, &page.to_string());
        }
    }
    url.into()
}
