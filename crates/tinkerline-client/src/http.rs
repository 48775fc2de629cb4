//! HTTP transport for Gremlin server.
//!
//! Requests are POSTed as JSON to the server's HTTP endpoint. The body is
//! encoded on a blocking task and streamed to the connection, so large
//! scripts and bindings are never held in a single buffer.

use crate::context::Context;
use crate::error::{GremlinError, Result};
use crate::request::{Request, ARGS_GREMLIN, OP_EVAL};
use crate::response::Response;
use crate::transport::RoundTripper;
use async_trait::async_trait;
use futures::StreamExt;
use reqwest::header::CONTENT_TYPE;
use reqwest::{Body, Client, Url};
use std::io::{self, BufWriter, Write};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;
use tracing::{debug, warn};

/// Maximum accepted response body size.
pub const MAX_RESPONSE_SIZE: usize = 2 << 20;

const ENCODE_CHUNK_SIZE: usize = 8 * 1024;
const ENCODE_QUEUE_DEPTH: usize = 4;

/// Terminal round tripper posting eval requests over HTTP.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
    url: Url,
}

impl HttpTransport {
    /// Transport for `endpoint` using a default HTTP client.
    pub fn new(endpoint: &str) -> Result<Self> {
        let url = parse_endpoint(endpoint)?;
        let client = Client::builder().build()?;
        Ok(Self::with_client(client, url))
    }

    /// Transport sharing an existing HTTP client.
    pub fn with_client(client: Client, url: Url) -> Self {
        Self { client, url }
    }

    pub fn url(&self) -> &Url {
        &self.url
    }

    async fn send(&self, req: Request) -> Result<Response> {
        let response = self
            .client
            .post(self.url.clone())
            .header(CONTENT_TYPE, "application/json")
            .body(encode_body(req))
            .send()
            .await?;

        let status = response.status().as_u16();
        debug!(status, content_length = ?response.content_length(), "gremlin http response");

        if !(200..=206).contains(&status) {
            let body = read_body(response).await.unwrap_or_default();
            return Err(GremlinError::Http {
                status,
                body: String::from_utf8_lossy(&body).into_owned(),
            });
        }
        if response
            .content_length()
            .is_some_and(|n| n > MAX_RESPONSE_SIZE as u64)
        {
            return Err(GremlinError::ResponseTooLarge {
                limit: MAX_RESPONSE_SIZE,
            });
        }

        let body = read_body(response).await?;
        serde_json::from_slice(&body).map_err(GremlinError::Decode)
    }
}

/// Parses an endpoint URL; only `http` and `https` are accepted.
pub fn parse_endpoint(endpoint: &str) -> Result<Url> {
    let url = Url::parse(endpoint).map_err(|e| GremlinError::InvalidEndpoint {
        endpoint: endpoint.to_string(),
        reason: e.to_string(),
    })?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(GremlinError::InvalidEndpoint {
            endpoint: endpoint.to_string(),
            reason: format!("unsupported scheme {scheme:?}"),
        }),
    }
}

#[async_trait]
impl RoundTripper for HttpTransport {
    async fn round_trip(&self, ctx: &Context, req: Request) -> Result<Response> {
        if req.operation != OP_EVAL {
            return Err(GremlinError::UnsupportedOperation(req.operation));
        }
        if !req.arguments.contains_key(ARGS_GREMLIN) {
            return Err(GremlinError::MissingArgument(ARGS_GREMLIN));
        }
        debug!(request_id = %req.request_id, url = %self.url, "sending gremlin request");

        tokio::select! {
            err = ctx.done() => Err(err.into()),
            result = self.send(req) => result,
        }
    }
}

// Reads the body, failing as soon as it grows past the cap. The declared
// content length is not trusted.
async fn read_body(response: reqwest::Response) -> Result<Vec<u8>> {
    let mut body = Vec::new();
    let mut chunks = response.bytes_stream();
    while let Some(chunk) = chunks.next().await {
        let chunk = chunk?;
        if body.len() + chunk.len() > MAX_RESPONSE_SIZE {
            return Err(GremlinError::ResponseTooLarge {
                limit: MAX_RESPONSE_SIZE,
            });
        }
        body.extend_from_slice(&chunk);
    }
    Ok(body)
}

// Streams the JSON encoding of `req` from a blocking task. An encode failure
// ends the stream with an error, which fails the send.
fn encode_body(req: Request) -> Body {
    let (tx, rx) = mpsc::channel::<io::Result<Vec<u8>>>(ENCODE_QUEUE_DEPTH);
    tokio::task::spawn_blocking(move || {
        if let Err(e) = write_body(&req, tx.clone()) {
            warn!(request_id = %req.request_id, error = %e, "encoding gremlin request");
            let _ = tx.blocking_send(Err(e));
        }
    });
    Body::wrap_stream(ReceiverStream::new(rx))
}

// Writes the JSON encoding of `req` to `tx` in chunks. Serializer failures,
// including a closed channel mid-write, surface as `GremlinError::Encode`
// wrapped in the returned io error.
fn write_body(req: &Request, tx: mpsc::Sender<io::Result<Vec<u8>>>) -> io::Result<()> {
    let mut writer = BufWriter::with_capacity(ENCODE_CHUNK_SIZE, ChannelWriter { tx });
    let result = serde_json::to_writer(&mut writer, req)
        .map_err(|e| io::Error::other(GremlinError::Encode(e)))
        .and_then(|()| writer.flush());
    if result.is_err() {
        // Discard buffered bytes; the stream must end at the error.
        let _ = writer.into_parts();
    }
    result
}

struct ChannelWriter {
    tx: mpsc::Sender<io::Result<Vec<u8>>>,
}

impl Write for ChannelWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.tx
            .blocking_send(Ok(buf.to_vec()))
            .map_err(|_| io::Error::from(io::ErrorKind::BrokenPipe))?;
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
