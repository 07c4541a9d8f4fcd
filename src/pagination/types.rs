//! Pagination types
//!
//! Value types derived from a single response's `Link` header.

use std::fmt;
use url::Url;

/// A navigation link with its page number
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedLink {
    /// Absolute URL of the page
    pub url: Url,
    /// Value of the `page` query parameter
    pub page: u32,
}

/// Navigation links for one page of a list response
///
/// The required relations are plain fields: a `PagedResource` only exists
/// once `current`, `first` and `last` have all parsed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PagedResource {
    pub current: PagedLink,
    pub first: PagedLink,
    pub last: PagedLink,
    /// Absent on the last page
    pub next: Option<PagedLink>,
    /// Absent on the first page
    pub prev: Option<PagedLink>,
}

impl PagedResource {
    /// True when there is no `next` link
    pub fn is_last_page(&self) -> bool {
        self.next.is_none()
    }

    /// Total number of pages according to the `last` link
    pub fn page_count(&self) -> u32 {
        self.last.page
    }
}

impl fmt::Display for PagedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "page {} of {}", self.current.page, self.last.page)?;
        if let Some(next) = &self.next {
            write!(f, " (next: {})", next.page)?;
        }
        Ok(())
    }
}

/// One page of decoded items together with its navigation links
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub links: PagedResource,
}

impl<T> Page<T> {
    /// True when this is the final page
    pub fn is_last(&self) -> bool {
        self.links.is_last_page()
    }
}

/// Why a link relation could not be used
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkProblem {
    /// Relation name, e.g. `first`
    pub rel: String,
    /// What went wrong
    pub reason: String,
}

impl LinkProblem {
    /// A required relation that was not present
    pub fn missing(rel: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            reason: "missing".to_string(),
        }
    }

    /// A relation whose link could not be parsed
    pub fn malformed(rel: impl Into<String>, reason: impl Into<String>) -> Self {
        Self {
            rel: rel.into(),
            reason: reason.into(),
        }
    }
}

impl fmt::Display for LinkProblem {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.rel, self.reason)
    }
}
