//! HTTP client module
//!
//! Executes [`RequestDescriptor`](crate::request::RequestDescriptor)s
//! against one configured host.
//!
//! # Features
//!
//! - **One round trip per call**: no retries, no caching, no throttling
//! - **Bearer authentication**: `Authorization` and `User-Agent` on every request
//! - **Status classification**: success, rate limit, or decoded API error
//! - **Pagination helpers**: decode a page and follow its `next` link

mod classify;
mod client;

pub use crate::error::status_text;
pub use classify::{classify, ResponseClass};
pub use client::{join_api_path, Client, API_PREFIX};
