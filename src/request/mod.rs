//! Request descriptors
//!
//! A [`RequestDescriptor`] describes one API call: its method, path under
//! the API prefix, query string, body, and a validation check that runs
//! before anything touches the network. Endpoint types implement it;
//! [`RawRequest`] covers calls assembled at runtime.
//!
//! The [`Client`](crate::http::Client) calls the descriptor in a fixed
//! order: `validate`, then `method`/`url_path`/`query`, then `body`, and
//! stops at the first error.

use crate::error::{Error, Result};
use crate::http::API_PREFIX;
use crate::pagination::PagedLink;
use crate::types::Method;
use serde::Serialize;
use url::form_urlencoded;

/// One API call, independent of how it is transmitted
pub trait RequestDescriptor {
    /// HTTP method
    fn method(&self) -> Method;

    /// Path relative to the API prefix, e.g. `/courses/5/users`
    fn url_path(&self) -> String;

    /// Encoded query string without the leading `?`; empty for none
    fn query(&self) -> Result<String> {
        Ok(String::new())
    }

    /// Serialized body; empty means no payload
    fn body(&self) -> Result<String> {
        Ok(String::new())
    }

    /// Reject structurally invalid requests before they are sent
    fn validate(&self) -> Result<()> {
        Ok(())
    }
}

// ============================================================================
// Helpers for descriptor implementations
// ============================================================================

/// Check that `value` is one of the `allowed` values for `field`
pub fn check_one_of(field: &str, value: &str, allowed: &[&str]) -> Result<()> {
    if allowed.contains(&value) {
        return Ok(());
    }
    Err(Error::InvalidEnumValue {
        field: field.to_string(),
        value: value.to_string(),
        allowed: allowed.iter().map(ToString::to_string).collect(),
    })
}

/// Form-urlencode key/value pairs into a query string
pub fn query_string<I, K, V>(pairs: I) -> String
where
    I: IntoIterator<Item = (K, V)>,
    K: AsRef<str>,
    V: AsRef<str>,
{
    let mut serializer = form_urlencoded::Serializer::new(String::new());
    for (key, value) in pairs {
        serializer.append_pair(key.as_ref(), value.as_ref());
    }
    serializer.finish()
}

/// Serialize a request body as JSON
pub fn json_body<T: Serialize + ?Sized>(body: &T) -> Result<String> {
    Ok(serde_json::to_string(body)?)
}

// ============================================================================
// Raw Request
// ============================================================================

/// A request descriptor assembled at runtime
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawRequest {
    method: Method,
    path: String,
    query: String,
    body: String,
}

impl RawRequest {
    /// Create a request with the given method and path
    pub fn new(method: Method, path: impl Into<String>) -> Self {
        Self {
            method,
            path: path.into(),
            ..Self::default()
        }
    }

    /// Create a GET request
    pub fn get(path: impl Into<String>) -> Self {
        Self::new(Method::GET, path)
    }

    /// Create a POST request
    pub fn post(path: impl Into<String>) -> Self {
        Self::new(Method::POST, path)
    }

    /// Create a PUT request
    pub fn put(path: impl Into<String>) -> Self {
        Self::new(Method::PUT, path)
    }

    /// Create a DELETE request
    pub fn delete(path: impl Into<String>) -> Self {
        Self::new(Method::DELETE, path)
    }

    /// Re-target a pagination link through the API prefix
    ///
    /// The link is resolved against the client's own host; only its path
    /// and query are kept.
    pub fn from_link(link: &PagedLink) -> Self {
        let path = link.url.path();
        let path = path
            .strip_prefix(API_PREFIX)
            .filter(|rest| rest.is_empty() || rest.starts_with('/'))
            .unwrap_or(path);

        Self {
            method: Method::GET,
            path: path.to_string(),
            query: link.url.query().unwrap_or_default().to_string(),
            body: String::new(),
        }
    }

    /// Append a query parameter
    #[must_use]
    pub fn with_query(mut self, key: impl AsRef<str>, value: impl AsRef<str>) -> Self {
        let pair = query_string([(key, value)]);
        if !self.query.is_empty() {
            self.query.push('&');
        }
        self.query.push_str(&pair);
        self
    }

    /// Replace the query string verbatim
    #[must_use]
    pub fn with_raw_query(mut self, query: impl Into<String>) -> Self {
        self.query = query.into();
        self
    }

    /// Set a raw body
    #[must_use]
    pub fn with_body(mut self, body: impl Into<String>) -> Self {
        self.body = body.into();
        self
    }

    /// Set a JSON body
    pub fn with_json<T: Serialize + ?Sized>(mut self, body: &T) -> Result<Self> {
        self.body = json_body(body)?;
        Ok(self)
    }
}

impl RequestDescriptor for RawRequest {
    fn method(&self) -> Method {
        self.method
    }

    fn url_path(&self) -> String {
        self.path.clone()
    }

    fn query(&self) -> Result<String> {
        Ok(self.query.clone())
    }

    fn body(&self) -> Result<String> {
        Ok(self.body.clone())
    }

    fn validate(&self) -> Result<()> {
        if self.path.contains(['?', '#']) {
            return Err(Error::validation(format!(
                "path '{}' must not carry a query or fragment",
                self.path
            )));
        }
        Ok(())
    }
}
