//! Error types for the Gremlin client

use crate::context::ContextError;
use crate::status::StatusCode;
use thiserror::Error;

/// Errors that can occur when talking to a Gremlin server
#[derive(Debug, Error)]
pub enum GremlinError {
    /// Endpoint URL could not be used
    #[error("invalid endpoint {endpoint:?}: {reason}")]
    InvalidEndpoint { endpoint: String, reason: String },

    /// Configuration text could not be parsed
    #[error("invalid configuration: {0}")]
    Config(#[from] toml::de::Error),

    /// Transport does not handle the request operation
    #[error("unsupported operation: {0:?}")]
    UnsupportedOperation(String),

    /// Required request argument is absent
    #[error("missing argument: {0}")]
    MissingArgument(&'static str),

    /// Request argument has the wrong shape
    #[error("invalid argument {name}: {reason}")]
    InvalidArgument { name: &'static str, reason: String },

    /// A binding value could not be rendered as a script literal
    #[error("marshal bindings value for key {key}: {source}")]
    MarshalBinding {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// Server answered outside the HTTP success range
    #[error("HTTP {status}: {body}")]
    Http { status: u16, body: String },

    /// Response body exceeded the size cap
    #[error("response body exceeds {limit} bytes")]
    ResponseTooLarge { limit: usize },

    /// Response body is not a valid response envelope
    #[error("decode response: {0}")]
    Decode(#[source] serde_json::Error),

    /// HTTP request failed
    #[error("send request: {0}")]
    Send(#[from] reqwest::Error),

    /// Request body could not be encoded
    #[error("encode request: {0}")]
    Encode(#[source] serde_json::Error),

    /// Server reported a failure status
    #[error("gremlin: code={code}, message={message}")]
    Status { code: StatusCode, message: String },

    /// Caller context was canceled or expired
    #[error(transparent)]
    Context(#[from] ContextError),

    /// Result held no values
    #[error("empty result")]
    EmptyResult,

    /// Result value has an unexpected shape
    #[error("unexpected value: {0}")]
    UnexpectedValue(String),

    /// Malformed SASL PLAIN credentials
    #[error("credentials: {0}")]
    Credentials(String),
}

impl GremlinError {
    /// Returns the server status code for server-reported failures.
    pub fn status_code(&self) -> Option<StatusCode> {
        match self {
            GremlinError::Status { code, .. } => Some(*code),
            _ => None,
        }
    }

    /// Whether the error comes from the caller's context rather than the server.
    pub fn is_context(&self) -> bool {
        matches!(self, GremlinError::Context(_))
    }
}

/// Result type for Gremlin client operations
pub type Result<T> = std::result::Result<T, GremlinError>;
