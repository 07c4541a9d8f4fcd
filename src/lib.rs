//! # Canvas API client
//!
//! A typed, synchronous client core for the Canvas LMS REST API.
//!
//! ## Features
//!
//! - **Request descriptors**: endpoints describe method, path, query, body
//!   and validation; the client turns them into wire requests
//! - **Bearer authentication** on every request
//! - **Status classification**: success, rate-limit sentinel, decoded API error
//! - **Link-header pagination**: page-numbered `current`/`first`/`last`/`next` links
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_api::{is_rate_limit, Client, ClientConfig, RawRequest};
//! use serde_json::Value;
//!
//! fn main() -> canvas_api::Result<()> {
//!     let client = Client::new(ClientConfig::new("school.instructure.com", "token"))?;
//!
//!     let request = RawRequest::get("/courses").with_query("per_page", "50");
//!     match client.send_paged::<Value, _>(&request) {
//!         Ok(page) => println!("{} courses, {}", page.items.len(), page.links),
//!         Err(e) if is_rate_limit(&e) => eprintln!("slow down"),
//!         Err(e) => return Err(e),
//!     }
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! RequestDescriptor ──▶ Client::send ──▶ validate ─▶ build ─▶ execute ─▶ classify
//!                                                                          │
//!                        ┌─────────────────────────────────┬───────────────┤
//!                   200/201/202                          403          other
//!                   Response ──▶ extract_paged_resource   RateLimited   ApiError
//! ```

#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::doc_markdown)]

// ============================================================================
// Module declarations
// ============================================================================

/// Error types and the rate-limit predicate
pub mod error;

/// Common types
pub mod types;

/// Client configuration
pub mod config;

/// Request descriptors
pub mod request;

/// HTTP client and status classification
pub mod http;

/// Link-header pagination
pub mod pagination;

/// Command-line interface
pub mod cli;

// ============================================================================
// Re-exports
// ============================================================================

pub use config::ClientConfig;
pub use error::{is_rate_limit, ApiError, Error, Result};
pub use http::{Client, API_PREFIX};
pub use pagination::{extract_paged_resource, Page, PagedLink, PagedResource};
pub use request::{RawRequest, RequestDescriptor};
pub use types::{Method, Scheme};
