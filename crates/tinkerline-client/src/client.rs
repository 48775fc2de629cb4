//! Client façade over a round tripper.

use crate::context::Context;
use crate::error::Result;
use crate::request::Request;
use crate::response::Response;
use crate::transport::RoundTripper;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use tinkerline_dsl::Querier;
use tracing::debug;

/// Gremlin client
///
/// Cloning is cheap; clones share the interceptor chain and the HTTP
/// connection pool.
#[derive(Clone)]
pub struct Client {
    transport: Arc<dyn RoundTripper>,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client").finish_non_exhaustive()
    }
}

impl Client {
    /// Client over a composed round tripper; see [`chain`](crate::chain).
    pub fn new(transport: Arc<dyn RoundTripper>) -> Self {
        Self { transport }
    }

    /// Sends a request and returns its response.
    ///
    /// A response with a failure status becomes [`GremlinError::Status`]. If
    /// the round trip fails while `ctx` is done, the context's error is
    /// returned instead of the transport's.
    ///
    /// [`GremlinError::Status`]: crate::GremlinError::Status
    pub async fn execute(&self, ctx: &Context, req: Request) -> Result<Response> {
        let request_id = req.request_id.clone();
        let result = self
            .transport
            .round_trip(ctx, req)
            .await
            .and_then(|rsp| rsp.err().map(|()| rsp));

        match (result, ctx.err()) {
            (Err(err), Some(ctx_err)) => {
                debug!(%request_id, error = %err, "discarding round trip error, context is done");
                Err(ctx_err.into())
            }
            (result, _) => result,
        }
    }

    /// Evaluates a script.
    pub async fn query(&self, ctx: &Context, script: &str) -> Result<Response> {
        self.execute(ctx, Request::eval(script)).await
    }

    /// Evaluates a formatted script: `client.queryf(&ctx, format_args!("g.V({id})"))`.
    pub fn queryf<'a>(
        &'a self,
        ctx: &'a Context,
        args: fmt::Arguments<'_>,
    ) -> impl Future<Output = Result<Response>> + Send + 'a {
        self.execute(ctx, Request::eval(args.to_string()))
    }

    /// Compiles a traversal and evaluates it with its bindings.
    ///
    /// The traversal is compiled before the returned future is created, so the
    /// future does not borrow it.
    pub fn traverse<'a>(
        &'a self,
        ctx: &'a Context,
        traversal: &dyn Querier,
    ) -> impl Future<Output = Result<Response>> + Send + 'a {
        let (script, bindings) = traversal.query();
        self.execute(ctx, Request::eval(script).with_bindings(bindings))
    }
}
