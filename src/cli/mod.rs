//! CLI module
//!
//! Command-line interface for ad-hoc API calls.
//!
//! # Commands
//!
//! - `get` - Send a GET request and print the JSON response
//! - `list` - Fetch a paginated list, one page or all of them

mod commands;
mod runner;

pub use commands::{Cli, Commands, OutputFormat};
pub use runner::Runner;
