//! Page-number pagination primitives shared by Foodgram list endpoints.
//!
//! Requests carry a 1-based `page` and an optional `limit` page-size
//! override; responses are wrapped in the `{count, next, previous, results}`
//! envelope with absolute navigation links.
//!
//! ```
//! use std::num::NonZeroU32;
//!
//! use pagination::{Page, PageRequest};
//! use url::Url;
//!
//! let default_limit = NonZeroU32::new(6).expect("non-zero");
//! let request = PageRequest::parse(Some("2"), Some("2"), default_limit).expect("valid page");
//! let base = Url::parse("http://localhost/api/recipes/?limit=2&page=2").expect("url");
//! let page = Page::new(&request, &base, 5, vec!["c", "d"]);
//!
//! assert_eq!(page.next.as_deref(), Some("http://localhost/api/recipes/?limit=2&page=3"));
//! assert_eq!(page.previous.as_deref(), Some("http://localhost/api/recipes/?limit=2"));
//! ```

mod envelope;
mod request;

pub use envelope::Page;
pub use request::{LIMIT_PARAM, PAGE_PARAM, PageError, PageRequest, limit_or_default};
