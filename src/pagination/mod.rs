//! Pagination module
//!
//! List endpoints describe their neighbours in an RFC 5988 `Link` header:
//!
//! ```text
//! Link: <https://host/api/v1/courses?page=1>; rel="current",
//!       <https://host/api/v1/courses?page=2>; rel="next",
//!       <https://host/api/v1/courses?page=1>; rel="first",
//!       <https://host/api/v1/courses?page=5>; rel="last"
//! ```
//!
//! [`extract_paged_resource`] turns that header into a [`PagedResource`].
//! `current`, `first` and `last` are required; `next` is absent on the last
//! page. A `PagedResource` describes exactly one response and should not be
//! reused for another request.

mod link;
mod types;

pub use link::{extract_paged_resource, parse_link_header};
pub use types::{LinkProblem, Page, PagedLink, PagedResource};
