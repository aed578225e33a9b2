//! Query-string access and page envelopes for list endpoints.

use std::num::NonZeroU32;

use actix_web::HttpRequest;
use pagination::{LIMIT_PARAM, PAGE_PARAM, Page, PageError, PageRequest};
use url::Url;

use crate::domain::Error;
use crate::domain::ports::Listing;

/// Decoded query pairs, preserving repeated keys (`?tags=a&tags=b`).
#[derive(Debug, Clone, Default)]
pub(crate) struct QueryParams(Vec<(String, String)>);

impl QueryParams {
    pub(crate) fn from_request(req: &HttpRequest) -> Self {
        Self::parse(req.query_string())
    }

    pub(crate) fn parse(query: &str) -> Self {
        Self(
            url::form_urlencoded::parse(query.as_bytes())
                .into_owned()
                .collect(),
        )
    }

    /// First non-empty value for `key`.
    pub(crate) fn first(&self, key: &str) -> Option<&str> {
        self.all(key).next()
    }

    /// Every non-empty value for `key`, in request order.
    pub(crate) fn all<'a>(&'a self, key: &str) -> impl Iterator<Item = &'a str> {
        self.0
            .iter()
            .filter(move |(name, value)| name == key && !value.is_empty())
            .map(|(_, value)| value.as_str())
    }

    /// Page selection; an unparseable page is `404 Invalid page.`.
    pub(crate) fn page_request(&self, default_limit: NonZeroU32) -> Result<PageRequest, Error> {
        PageRequest::parse(self.first(PAGE_PARAM), self.first(LIMIT_PARAM), default_limit)
            .map_err(page_error)
    }
}

pub(crate) fn page_error(err: PageError) -> Error {
    Error::not_found(err.to_string())
}

/// Absolute URL for `path` on the host the request was addressed to.
pub(crate) fn absolute_url(req: &HttpRequest, path: &str) -> String {
    let info = req.connection_info();
    format!("{}://{}{}", info.scheme(), info.host(), path)
}

/// Absolute URL of the current request, used as the base for page links.
pub(crate) fn request_url(req: &HttpRequest) -> Result<Url, Error> {
    let raw = absolute_url(req, &req.uri().to_string());
    Url::parse(&raw).map_err(|err| Error::internal(format!("request URL {raw:?}: {err}")))
}

/// Wrap a listing in the `{count, next, previous, results}` envelope.
pub(crate) fn page_envelope<T, U, F>(
    req: &HttpRequest,
    page: &PageRequest,
    listing: Listing<T>,
    render: F,
) -> Result<Page<U>, Error>
where
    F: FnMut(T) -> U,
{
    let base = request_url(req)?;
    Ok(Page::new(page, &base, listing.total, listing.items).map(render))
}
