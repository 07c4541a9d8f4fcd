//! HTTP client for the Canvas REST API
//!
//! Turns a request descriptor into a wire request, performs exactly one
//! blocking round trip, and classifies the response:
//! - Success statuses hand the live response to the caller
//! - 403 becomes the [`Error::RateLimited`] sentinel
//! - Everything else becomes an [`ApiError`]
//!
//! Every non-success branch consumes the response exactly once, which
//! releases its body. On success the caller owns it.

use super::classify::{classify, ResponseClass};
use crate::config::ClientConfig;
use crate::error::{ApiError, Error, ErrorBody, Result};
use crate::pagination::{extract_paged_resource, LinkProblem, Page};
use crate::request::{RawRequest, RequestDescriptor};
use reqwest::blocking::{Body, Request, Response};
use reqwest::header::{HeaderValue, AUTHORIZATION, USER_AGENT};
use reqwest::{StatusCode, Version};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

/// Path prefix every resource path is joined under
pub const API_PREFIX: &str = "/api/v1";

/// Synchronous client for one API host
///
/// Holds only immutable configuration, so a single instance can be shared
/// across threads.
#[derive(Clone)]
pub struct Client {
    http: reqwest::blocking::Client,
    config: ClientConfig,
    base_url: Url,
    authorization: HeaderValue,
    user_agent: HeaderValue,
}

impl Client {
    /// Create a client from a validated config
    pub fn new(config: ClientConfig) -> Result<Self> {
        config.validate()?;

        let base_url = Url::parse(&format!("{}://{}/", config.scheme, config.host))?;

        let mut authorization = HeaderValue::from_str(&format!("Bearer {}", config.token))?;
        authorization.set_sensitive(true);
        let user_agent = HeaderValue::from_str(&config.user_agent)?;

        let http = reqwest::blocking::Client::builder()
            .timeout(config.timeout_duration())
            .build()?;

        Ok(Self {
            http,
            config,
            base_url,
            authorization,
            user_agent,
        })
    }

    /// The config this client was built from
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Scheme and host every request is sent to
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build the wire request for a descriptor without sending it
    ///
    /// Does not run the descriptor's validation; [`Client::send`] does that
    /// first.
    pub fn build_request<R: RequestDescriptor + ?Sized>(&self, request: &R) -> Result<Request> {
        let method = request.method();

        let mut url = self.base_url.clone();
        url.set_path(&join_api_path(API_PREFIX, &request.url_path()));

        let query = request.query()?;
        let query = query.strip_prefix('?').unwrap_or(&query);
        url.set_query((!query.is_empty()).then_some(query));

        let body = request.body()?;

        let mut req = Request::new(method.into(), url);
        *req.version_mut() = Version::HTTP_11;

        let headers = req.headers_mut();
        headers.insert(AUTHORIZATION, self.authorization.clone());
        headers.insert(USER_AGENT, self.user_agent.clone());

        // An empty body means no payload at all
        if !body.is_empty() {
            *req.body_mut() = Some(Body::from(body));
        }

        Ok(req)
    }

    /// Validate, send and classify one request
    ///
    /// Returns the live response for 200, 201 and 202. The caller decodes it.
    pub fn send<R: RequestDescriptor + ?Sized>(&self, request: &R) -> Result<Response> {
        request.validate()?;
        let req = self.build_request(request)?;

        debug!("Sending request: {} {}", req.method(), req.url());
        let response = self.http.execute(req)?;

        handle_response(response)
    }

    /// Send a request and decode the JSON response
    pub fn send_json<T, R>(&self, request: &R) -> Result<T>
    where
        T: DeserializeOwned,
        R: RequestDescriptor + ?Sized,
    {
        let response = self.send(request)?;
        let value: T = response.json().map_err(Error::Http)?;
        Ok(value)
    }

    /// Send a list request and decode one page with its navigation links
    pub fn send_paged<T, R>(&self, request: &R) -> Result<Page<T>>
    where
        T: DeserializeOwned,
        R: RequestDescriptor + ?Sized,
    {
        let response = self.send(request)?;
        let links = extract_paged_resource(response.headers())?;
        let items: Vec<T> = response.json().map_err(Error::Http)?;
        Ok(Page { items, links })
    }

    /// Fetch the page after `page`, or `None` on the last page
    pub fn next_page<T: DeserializeOwned>(&self, page: &Page<T>) -> Result<Option<Page<T>>> {
        match &page.links.next {
            Some(next) => self.send_paged(&RawRequest::from_link(next)).map(Some),
            None => Ok(None),
        }
    }

    /// Fetch every page of a list request, in order
    ///
    /// Fails if a `next` link does not move past the current page.
    pub fn collect_all<T, R>(&self, request: &R) -> Result<Vec<T>>
    where
        T: DeserializeOwned,
        R: RequestDescriptor + ?Sized,
    {
        let mut items = Vec::new();
        let mut page: Page<T> = self.send_paged(request)?;

        loop {
            let Page { items: batch, links } = page;
            items.extend(batch);

            let Some(next) = links.next else {
                return Ok(items);
            };
            if next.page <= links.current.page {
                return Err(Error::Pagination {
                    problems: vec![LinkProblem::malformed(
                        "next",
                        format!(
                            "page {} does not advance past page {}",
                            next.page, links.current.page
                        ),
                    )],
                });
            }

            debug!("Following next page {} of {}", next.page, links.last.page);
            page = self.send_paged(&RawRequest::from_link(&next))?;
        }
    }
}

impl std::fmt::Debug for Client {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Client")
            .field("config", &self.config)
            .field("base_url", &self.base_url.as_str())
            .finish_non_exhaustive()
    }
}

/// Join a resource path under `prefix`, component by component
///
/// Empty and `.` segments are dropped and `..` removes the previous one,
/// so stray slashes never produce `//` or a missing separator. A `..`
/// never climbs above `prefix`.
pub fn join_api_path(prefix: &str, path: &str) -> String {
    let mut segments: Vec<&str> = prefix
        .split('/')
        .filter(|s| !s.is_empty() && *s != ".")
        .collect();
    let root = segments.len();

    for segment in path.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                if segments.len() > root {
                    segments.pop();
                }
            }
            s => segments.push(s),
        }
    }
    format!("/{}", segments.join("/"))
}

/// Turn a response into the call's outcome
fn handle_response(response: Response) -> Result<Response> {
    let status = response.status();
    let class = classify(status);
    debug!("Response {} classified as {:?}", status.as_u16(), class);

    match class {
        ResponseClass::Success => Ok(response),
        ResponseClass::RateLimited => {
            drop(response);
            Err(Error::RateLimited)
        }
        ResponseClass::Unprocessable => {
            drop(response);
            Err(ApiError::from_status(status).into())
        }
        ResponseClass::Error => Err(decode_error_response(status, response).into()),
    }
}

/// Read the body and decode it as an error message, best effort
fn decode_error_response(status: StatusCode, response: Response) -> ApiError {
    let error = ApiError::from_status(status);

    let bytes = match response.bytes() {
        Ok(bytes) => bytes,
        Err(e) => return error.with_decode_error(format!("failed to read body: {e}")),
    };

    match serde_json::from_slice::<ErrorBody>(&bytes) {
        Ok(body) => match body.summary() {
            Some(message) => error.with_message(message),
            None => error,
        },
        Err(e) => error.with_decode_error(e),
    }
}
