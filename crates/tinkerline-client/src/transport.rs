//! The round-trip seam and interceptor composition.

use crate::context::Context;
use crate::error::Result;
use crate::request::Request;
use crate::response::Response;
use async_trait::async_trait;
use std::future::Future;
use std::sync::Arc;

/// Executes a single request and returns its response.
#[async_trait]
pub trait RoundTripper: Send + Sync {
    async fn round_trip(&self, ctx: &Context, req: Request) -> Result<Response>;
}

/// Wraps a round tripper with additional behavior.
pub type Interceptor = Arc<dyn Fn(Arc<dyn RoundTripper>) -> Arc<dyn RoundTripper> + Send + Sync>;

/// Builds an [`Interceptor`] from a closure.
pub fn interceptor<F>(f: F) -> Interceptor
where
    F: Fn(Arc<dyn RoundTripper>) -> Arc<dyn RoundTripper> + Send + Sync + 'static,
{
    Arc::new(f)
}

/// Composes interceptors around `base`. The first interceptor is the
/// outermost: it sees the request first and the response last.
pub fn chain(interceptors: &[Interceptor], base: Arc<dyn RoundTripper>) -> Arc<dyn RoundTripper> {
    interceptors
        .iter()
        .rev()
        .fold(base, |next, wrap| wrap(next))
}

/// Adapts an async function into a [`RoundTripper`].
///
/// ```
/// use tinkerline_client::{Context, Request, Response, RoundTripperFn};
///
/// let rt = RoundTripperFn::new(|_ctx: Context, _req: Request| async {
///     Ok(Response::default())
/// });
/// # let _ = rt;
/// ```
pub struct RoundTripperFn<F>(F);

impl<F, Fut> RoundTripperFn<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync,
    Fut: Future<Output = Result<Response>> + Send,
{
    pub fn new(f: F) -> Self {
        Self(f)
    }
}

#[async_trait]
impl<F, Fut> RoundTripper for RoundTripperFn<F>
where
    F: Fn(Context, Request) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    async fn round_trip(&self, ctx: &Context, req: Request) -> Result<Response> {
        (self.0)(ctx.clone(), req).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use parking_lot::Mutex;

    fn recorder(name: &'static str, log: Arc<Mutex<Vec<String>>>) -> Interceptor {
        interceptor(move |next| {
            let log = Arc::clone(&log);
            Arc::new(RoundTripperFn::new(move |ctx: Context, req: Request| {
                let next = Arc::clone(&next);
                let log = Arc::clone(&log);
                async move {
                    log.lock().push(format!("{name} in"));
                    let rsp = next.round_trip(&ctx, req).await;
                    log.lock().push(format!("{name} out"));
                    rsp
                }
            }))
        })
    }

    #[tokio::test]
    async fn test_chain_first_is_outermost() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let base_log = Arc::clone(&log);
        let base: Arc<dyn RoundTripper> = Arc::new(RoundTripperFn::new(move |_, _| {
            base_log.lock().push("base".to_string());
            async { Ok(Response::default()) }
        }));

        let rt = chain(
            &[recorder("a", Arc::clone(&log)), recorder("b", Arc::clone(&log))],
            base,
        );
        rt.round_trip(&Context::background(), Request::eval("g"))
            .await
            .unwrap();

        assert_eq!(
            *log.lock(),
            vec!["a in", "b in", "base", "b out", "a out"]
        );
    }

    #[tokio::test]
    async fn test_empty_chain_is_base() {
        let base: Arc<dyn RoundTripper> =
            Arc::new(RoundTripperFn::new(|_, req: Request| async move {
                Ok(Response {
                    request_id: req.request_id,
                    ..Response::default()
                })
            }));
        let req = Request::eval("g");
        let id = req.request_id.clone();

        let rsp = chain(&[], base)
            .round_trip(&Context::background(), req)
            .await
            .unwrap();
        assert_eq!(rsp.request_id, id);
    }
}
