//! Status code classification
//!
//! | Status          | Class           | Body                         |
//! |-----------------|-----------------|------------------------------|
//! | 200, 201, 202   | `Success`       | left open for the caller     |
//! | 403             | `RateLimited`   | released unread              |
//! | 422             | `Unprocessable` | released unread              |
//! | anything else   | `Error`         | decoded as an error body     |

use reqwest::StatusCode;

/// Outcome kind for a response status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResponseClass {
    /// The caller owns and decodes the body
    Success,
    /// Request quota exhausted
    RateLimited,
    /// Rejected input; reported by status text only
    Unprocessable,
    /// Any other failure; the body carries the error message
    Error,
}

/// Map a status code to its outcome kind
pub fn classify(status: StatusCode) -> ResponseClass {
    match status.as_u16() {
        200 | 201 | 202 => ResponseClass::Success,
        403 => ResponseClass::RateLimited,
        422 => ResponseClass::Unprocessable,
        _ => ResponseClass::Error,
    }
}
