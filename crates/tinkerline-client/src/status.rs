//! Response status codes.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Status code of a server response.
///
/// Only 200, 204 and 206 are successes; every other code, including unknown
/// ones, is a failure.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StatusCode(pub u16);

impl StatusCode {
    /// The server processed the request and returned the full result.
    pub const SUCCESS: StatusCode = StatusCode(200);
    /// The server processed the request but there is no result.
    pub const NO_CONTENT: StatusCode = StatusCode(204);
    /// Part of a streamed result; more responses follow.
    pub const PARTIAL_CONTENT: StatusCode = StatusCode(206);
    /// The request attempted to access resources it is not permitted to.
    pub const UNAUTHORIZED: StatusCode = StatusCode(401);
    /// SASL challenge; the client must authenticate.
    pub const AUTHENTICATE: StatusCode = StatusCode(407);
    /// The request message could not be parsed.
    pub const MALFORMED_REQUEST: StatusCode = StatusCode(498);
    /// The request arguments are invalid for the operation.
    pub const INVALID_REQUEST_ARGUMENTS: StatusCode = StatusCode(499);
    /// A general server error.
    pub const SERVER_ERROR: StatusCode = StatusCode(500);
    /// The script failed to evaluate.
    pub const SCRIPT_EVALUATION_ERROR: StatusCode = StatusCode(597);
    /// Evaluation exceeded the server's timeout.
    pub const SERVER_TIMEOUT: StatusCode = StatusCode(598);
    /// The server could not serialize the result.
    pub const SERVER_SERIALIZATION_ERROR: StatusCode = StatusCode(599);

    pub fn is_success(self) -> bool {
        matches!(
            self,
            StatusCode::SUCCESS | StatusCode::NO_CONTENT | StatusCode::PARTIAL_CONTENT
        )
    }

    pub fn is_err(self) -> bool {
        !self.is_success()
    }

    /// Human text for the code; empty for unknown codes.
    pub fn text(self) -> &'static str {
        match self {
            StatusCode::SUCCESS => "Success",
            StatusCode::NO_CONTENT => "No Content",
            StatusCode::PARTIAL_CONTENT => "Partial Content",
            StatusCode::UNAUTHORIZED => "Unauthorized",
            StatusCode::AUTHENTICATE => "Authenticate",
            StatusCode::MALFORMED_REQUEST => "Malformed Request",
            StatusCode::INVALID_REQUEST_ARGUMENTS => "Invalid Request Arguments",
            StatusCode::SERVER_ERROR => "Server Error",
            StatusCode::SCRIPT_EVALUATION_ERROR => "Script Evaluation Error",
            StatusCode::SERVER_TIMEOUT => "Server Timeout",
            StatusCode::SERVER_SERIALIZATION_ERROR => "Server Serialization Error",
            _ => "",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u16> for StatusCode {
    fn from(code: u16) -> Self {
        StatusCode(code)
    }
}
