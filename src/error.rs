//! Error types for the Canvas API client
//!
//! All public APIs return `Result<T, Error>` where Error is defined here.
//!
//! A 403 from the platform means the request quota is exhausted. It is
//! reported as the payload-free [`Error::RateLimited`] so callers can test
//! for it with [`is_rate_limit`] instead of matching on message text.

use crate::pagination::LinkProblem;
use reqwest::StatusCode;
use serde::Deserialize;
use serde_json::Value;
use std::fmt;
use thiserror::Error;

/// The main error type for the client
#[derive(Error, Debug)]
pub enum Error {
    // ============================================================================
    // Configuration Errors
    // ============================================================================
    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Missing required config field: {field}")]
    MissingConfigField { field: String },

    #[error("Invalid config value for '{field}': {message}")]
    InvalidConfigValue { field: String, message: String },

    #[error("Failed to parse YAML: {0}")]
    YamlParse(#[from] serde_yaml::Error),

    #[error("Failed to parse JSON: {0}")]
    JsonParse(#[from] serde_json::Error),

    // ============================================================================
    // Request Errors
    // ============================================================================
    #[error("Invalid request: {message}")]
    Validation { message: String },

    #[error("Invalid value '{value}' for '{field}', expected one of: {}", .allowed.join(", "))]
    InvalidEnumValue {
        field: String,
        value: String,
        allowed: Vec<String>,
    },

    // ============================================================================
    // HTTP Errors
    // ============================================================================
    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Rate limit exceeded")]
    RateLimited,

    #[error("{0}")]
    Api(ApiError),

    #[error("Invalid URL: {0}")]
    InvalidUrl(#[from] url::ParseError),

    #[error("Invalid header value: {0}")]
    InvalidHeader(#[from] reqwest::header::InvalidHeaderValue),

    // ============================================================================
    // Pagination Errors
    // ============================================================================
    #[error("Invalid pagination links: {}", join_problems(.problems))]
    Pagination { problems: Vec<LinkProblem> },

    // ============================================================================
    // Other Errors
    // ============================================================================
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a config error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }

    /// Create a missing field error
    pub fn missing_field(field: impl Into<String>) -> Self {
        Self::MissingConfigField {
            field: field.into(),
        }
    }

    /// Create an invalid config value error
    pub fn invalid_value(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidConfigValue {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Create a request validation error
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation {
            message: message.into(),
        }
    }

    /// Check if this is the rate-limit sentinel
    pub fn is_rate_limit(&self) -> bool {
        matches!(self, Error::RateLimited)
    }

    /// The API error carried by this error, if any
    pub fn api_error(&self) -> Option<&ApiError> {
        match self {
            Error::Api(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ApiError> for Error {
    fn from(err: ApiError) -> Self {
        Error::Api(err)
    }
}

/// Result type alias for the client
pub type Result<T> = std::result::Result<T, Error>;

/// Check whether `err`, or anything in its `source()` chain, is the
/// rate-limit sentinel.
///
/// Works through wrapping layers such as `anyhow::Context` as long as they
/// expose the original error as a source.
pub fn is_rate_limit(err: &(dyn std::error::Error + 'static)) -> bool {
    let mut current = Some(err);
    while let Some(e) = current {
        if e.downcast_ref::<Error>().is_some_and(Error::is_rate_limit) {
            return true;
        }
        current = e.source();
    }
    false
}

fn join_problems(problems: &[LinkProblem]) -> String {
    problems
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

// ============================================================================
// API Errors
// ============================================================================

/// A non-success response from the API
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError {
    /// Numeric status code
    pub status: u16,
    /// Status line text, e.g. `404 Not Found`
    pub status_text: String,
    /// Message decoded from the response body
    pub message: Option<String>,
    /// Why the body could not be read or decoded
    pub decode_error: Option<String>,
}

impl ApiError {
    /// An error carrying only the status line
    pub fn from_status(status: StatusCode) -> Self {
        Self {
            status: status.as_u16(),
            status_text: status_text(status),
            message: None,
            decode_error: None,
        }
    }

    /// Attach the decoded message
    #[must_use]
    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    /// Attach a body read or decode failure
    #[must_use]
    pub fn with_decode_error(mut self, cause: impl fmt::Display) -> Self {
        self.decode_error = Some(cause.to_string());
        self
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.status_text)?;
        if let Some(message) = &self.message {
            write!(f, ": {message}")?;
        }
        if let Some(cause) = &self.decode_error {
            write!(f, " (undecodable error body: {cause})")?;
        }
        Ok(())
    }
}

impl std::error::Error for ApiError {}

/// Render a status as `<code> <reason>`, e.g. `422 Unprocessable Entity`
pub fn status_text(status: StatusCode) -> String {
    match status.canonical_reason() {
        Some(reason) => format!("{} {reason}", status.as_u16()),
        None => status.as_u16().to_string(),
    }
}

/// Error body as returned by the platform
///
/// Seen shapes: `{"message": ".."}`, `{"errors": [{"message": ".."}]}`,
/// `{"errors": {"field": [{"message": ".."}]}}` and `{"errors": ".."}`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<Value>,
}

impl ErrorBody {
    /// All messages in the body joined with `; `
    pub fn summary(&self) -> Option<String> {
        let mut messages = Vec::new();
        if let Some(message) = &self.message {
            messages.push(message.clone());
        }
        if let Some(errors) = &self.errors {
            collect_messages(None, errors, &mut messages);
        }

        if messages.is_empty() {
            None
        } else {
            Some(messages.join("; "))
        }
    }
}

fn collect_messages(field: Option<&str>, value: &Value, out: &mut Vec<String>) {
    match value {
        Value::String(s) => out.push(match field {
            Some(field) => format!("{field}: {s}"),
            None => s.clone(),
        }),
        Value::Array(items) => {
            for item in items {
                collect_messages(field, item, out);
            }
        }
        Value::Object(map) => {
            if let Some(message) = map.get("message") {
                collect_messages(field, message, out);
                return;
            }
            for (key, nested) in map {
                collect_messages(Some(key), nested, out);
            }
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pagination::LinkProblem;
    use anyhow::Context;
    use serde_json::json;

    #[test]
    fn test_error_display() {
        let err = Error::config("test message");
        assert_eq!(err.to_string(), "Configuration error: test message");

        let err = Error::missing_field("token");
        assert_eq!(err.to_string(), "Missing required config field: token");

        let err = Error::RateLimited;
        assert_eq!(err.to_string(), "Rate limit exceeded");
    }

    #[test]
    fn test_invalid_enum_display() {
        let err = Error::InvalidEnumValue {
            field: "enrollment_type".to_string(),
            value: "janitor".to_string(),
            allowed: vec!["student".to_string(), "teacher".to_string()],
        };
        assert_eq!(
            err.to_string(),
            "Invalid value 'janitor' for 'enrollment_type', expected one of: student, teacher"
        );
    }

    #[test]
    fn test_api_error_display() {
        let err = ApiError::from_status(StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(err.to_string(), "422 Unprocessable Entity");

        let err = ApiError::from_status(StatusCode::NOT_FOUND)
            .with_message("The specified resource does not exist.");
        assert_eq!(
            err.to_string(),
            "404 Not Found: The specified resource does not exist."
        );

        let err = ApiError::from_status(StatusCode::INTERNAL_SERVER_ERROR)
            .with_decode_error("expected value at line 1 column 1");
        assert_eq!(
            err.to_string(),
            "500 Internal Server Error (undecodable error body: expected value at line 1 column 1)"
        );
    }

    #[test]
    fn test_status_text_without_reason() {
        let status = StatusCode::from_u16(599).unwrap();
        assert_eq!(status_text(status), "599");
    }

    #[test]
    fn test_pagination_error_lists_every_problem() {
        let err = Error::Pagination {
            problems: vec![LinkProblem::missing("first"), LinkProblem::missing("last")],
        };
        let text = err.to_string();
        assert!(text.contains("first"));
        assert!(text.contains("last"));
    }

    #[test]
    fn test_is_rate_limit_direct() {
        assert!(Error::RateLimited.is_rate_limit());
        assert!(is_rate_limit(&Error::RateLimited));
        assert!(!is_rate_limit(&Error::validation("nope")));
        assert!(!is_rate_limit(&Error::Api(ApiError::from_status(
            StatusCode::FORBIDDEN
        ))));
    }

    #[test]
    fn test_is_rate_limit_through_context() {
        let wrapped = Err::<(), _>(Error::RateLimited)
            .context("listing courses")
            .unwrap_err();
        assert!(is_rate_limit(&*wrapped));

        let other = Err::<(), _>(Error::validation("bad"))
            .context("listing courses")
            .unwrap_err();
        assert!(!is_rate_limit(&*other));
    }

    #[test]
    fn test_error_body_message() {
        let body: ErrorBody = serde_json::from_value(json!({"message": "X"})).unwrap();
        assert_eq!(body.summary().as_deref(), Some("X"));
    }

    #[test]
    fn test_error_body_errors_list() {
        let body: ErrorBody = serde_json::from_value(json!({
            "errors": [{"message": "Invalid access token."}, {"message": "Expired."}]
        }))
        .unwrap();
        assert_eq!(
            body.summary().as_deref(),
            Some("Invalid access token.; Expired.")
        );
    }

    #[test]
    fn test_error_body_field_errors() {
        let body: ErrorBody = serde_json::from_value(json!({
            "errors": {"name": [{"attribute": "name", "message": "is too long"}]}
        }))
        .unwrap();
        assert_eq!(body.summary().as_deref(), Some("name: is too long"));
    }

    #[test]
    fn test_error_body_empty() {
        let body: ErrorBody = serde_json::from_value(json!({"status": "bad"})).unwrap();
        assert!(body.summary().is_none());
    }
}
