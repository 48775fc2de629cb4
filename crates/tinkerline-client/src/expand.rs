//! Inlining of bindings into the script text.
//!
//! Some servers evaluate scripts faster without bindings, so the client
//! rewrites `g.V($0)` with `{"$0": 1}` into `g.V(1)` before sending.

use crate::context::Context;
use crate::error::{GremlinError, Result};
use crate::request::{Request, ARGS_BINDINGS, ARGS_GREMLIN};
use crate::response::Response;
use crate::transport::{interceptor, Interceptor, RoundTripper};
use async_trait::async_trait;
use regex::{Captures, Regex};
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::trace;

/// Round tripper that expands bindings before delegating.
pub struct ExpandBindings {
    next: Arc<dyn RoundTripper>,
}

impl ExpandBindings {
    pub fn new(next: Arc<dyn RoundTripper>) -> Self {
        Self { next }
    }

    pub fn interceptor() -> Interceptor {
        interceptor(|next| Arc::new(ExpandBindings::new(next)))
    }
}

#[async_trait]
impl RoundTripper for ExpandBindings {
    async fn round_trip(&self, ctx: &Context, req: Request) -> Result<Response> {
        let req = expand_bindings(req)?;
        self.next.round_trip(ctx, req).await
    }
}

/// Replaces every binding key in the script with the JSON text of its value
/// and drops the bindings argument.
///
/// Requests without both a script and bindings pass through unchanged. Keys
/// are tried in descending order, so `$11` is matched before its prefix `$1`.
pub fn expand_bindings(mut req: Request) -> Result<Request> {
    let (Some(bindings), Some(script)) = (
        req.arguments.get(ARGS_BINDINGS),
        req.arguments.get(ARGS_GREMLIN),
    ) else {
        return Ok(req);
    };
    let Value::Object(bindings) = bindings else {
        return Err(GremlinError::InvalidArgument {
            name: ARGS_BINDINGS,
            reason: "expected an object".to_string(),
        });
    };
    let Value::String(script) = script else {
        return Err(GremlinError::InvalidArgument {
            name: ARGS_GREMLIN,
            reason: "expected a string".to_string(),
        });
    };

    let mut keys: Vec<&String> = bindings.keys().filter(|k| !k.is_empty()).collect();
    keys.sort_unstable_by(|a, b| b.cmp(a));

    let mut literals = HashMap::with_capacity(keys.len());
    for key in &keys {
        let literal = serde_json::to_string(&bindings[key.as_str()]).map_err(|source| {
            GremlinError::MarshalBinding {
                key: key.to_string(),
                source,
            }
        })?;
        literals.insert(key.as_str(), literal);
    }

    let expanded = if keys.is_empty() {
        script.clone()
    } else {
        let pattern = keys
            .iter()
            .map(|k| regex::escape(k))
            .collect::<Vec<_>>()
            .join("|");
        let re = Regex::new(&pattern).map_err(|e| GremlinError::InvalidArgument {
            name: ARGS_BINDINGS,
            reason: e.to_string(),
        })?;
        re.replace_all(script, |caps: &Captures| {
            literals.get(&caps[0]).cloned().unwrap_or_default()
        })
        .into_owned()
    };
    trace!(request_id = %req.request_id, script = %expanded, "expanded bindings");

    req.arguments.remove(ARGS_BINDINGS);
    req.arguments
        .insert(ARGS_GREMLIN.to_string(), Value::String(expanded));
    Ok(req)
}
