//! Tracing interceptor.
//!
//! Each round trip runs inside an `info` span carrying the request id and
//! operation. The response code, message and a coarse [`TraceStatus`] are
//! recorded on the span when the round trip completes.

use crate::context::Context;
use crate::error::Result;
use crate::request::Request;
use crate::response::Response;
use crate::status::StatusCode;
use crate::transport::{interceptor, Interceptor, RoundTripper};
use async_trait::async_trait;
use std::fmt;
use std::sync::Arc;
use tracing::field::Empty;
use tracing::{info_span, trace, warn, Instrument};

/// Coarse classification of a status code for span status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TraceStatus {
    Ok,
    PermissionDenied,
    Unauthenticated,
    InvalidArgument,
    Internal,
    DeadlineExceeded,
    Unknown,
}

impl TraceStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            TraceStatus::Ok => "ok",
            TraceStatus::PermissionDenied => "permission_denied",
            TraceStatus::Unauthenticated => "unauthenticated",
            TraceStatus::InvalidArgument => "invalid_argument",
            TraceStatus::Internal => "internal",
            TraceStatus::DeadlineExceeded => "deadline_exceeded",
            TraceStatus::Unknown => "unknown",
        }
    }
}

impl From<StatusCode> for TraceStatus {
    fn from(code: StatusCode) -> Self {
        match code {
            StatusCode::SUCCESS | StatusCode::NO_CONTENT | StatusCode::PARTIAL_CONTENT => {
                TraceStatus::Ok
            }
            StatusCode::UNAUTHORIZED => TraceStatus::PermissionDenied,
            StatusCode::AUTHENTICATE => TraceStatus::Unauthenticated,
            StatusCode::MALFORMED_REQUEST
            | StatusCode::INVALID_REQUEST_ARGUMENTS
            | StatusCode::SCRIPT_EVALUATION_ERROR => TraceStatus::InvalidArgument,
            StatusCode::SERVER_ERROR | StatusCode::SERVER_SERIALIZATION_ERROR => {
                TraceStatus::Internal
            }
            StatusCode::SERVER_TIMEOUT => TraceStatus::DeadlineExceeded,
            _ => TraceStatus::Unknown,
        }
    }
}

impl fmt::Display for TraceStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Round tripper that wraps each request in a span.
pub struct TraceTransport {
    next: Arc<dyn RoundTripper>,
    with_query: bool,
}

impl TraceTransport {
    /// When `with_query` is set, the script is recorded on the span and the
    /// bindings are emitted as a `trace` event.
    pub fn new(next: Arc<dyn RoundTripper>, with_query: bool) -> Self {
        Self { next, with_query }
    }

    pub fn interceptor(with_query: bool) -> Interceptor {
        interceptor(move |next| Arc::new(TraceTransport::new(next, with_query)))
    }
}

#[async_trait]
impl RoundTripper for TraceTransport {
    async fn round_trip(&self, ctx: &Context, req: Request) -> Result<Response> {
        let span = info_span!(
            "gremlin",
            request_id = %req.request_id,
            operation = %req.operation,
            query = Empty,
            code = Empty,
            message = Empty,
            status = Empty,
        );
        if self.with_query {
            if let Some(script) = req.script() {
                span.record("query", script);
            }
            if let Some(bindings) = req.bindings() {
                let bindings = serde_json::Value::from(bindings.clone());
                trace!(parent: &span, bindings = %bindings, "request bindings");
            }
        }

        let result = self
            .next
            .round_trip(ctx, req)
            .instrument(span.clone())
            .await;
        match &result {
            Ok(rsp) => {
                span.record("code", rsp.status.code.0);
                if !rsp.status.message.is_empty() {
                    span.record("message", rsp.status.message.as_str());
                }
                span.record("status", TraceStatus::from(rsp.status.code).as_str());
            }
            Err(e) => {
                span.record("status", TraceStatus::Unknown.as_str());
                span.record("message", tracing::field::display(e));
                warn!(parent: &span, error = %e, "gremlin round trip failed");
            }
        }
        result
    }
}
