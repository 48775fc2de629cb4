//! Gremlin server client
//!
//! Requests travel through a chain of [`Interceptor`]s to a terminal
//! [`RoundTripper`], by default the [`HttpTransport`]. Bindings are inlined
//! into the script by [`ExpandBindings`] unless the configuration disables it.
//!
//! ```no_run
//! use tinkerline_client::dsl::{g, p};
//! use tinkerline_client::{ClientConfig, Context, TraceTransport};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = ClientConfig::builder()
//!     .endpoint("http://localhost:8182/gremlin")
//!     .build()
//!     .build(vec![TraceTransport::interceptor(false)])?;
//!
//! let ctx = Context::background();
//! let adults = g::v(()).has_label("person").has(("age", p::gte(18))).count(());
//! let count = client.traverse(&ctx, &adults).await?.read_int()?;
//! println!("{count} adults");
//! # Ok(())
//! # }
//! ```

mod client;
mod config;
mod context;
mod error;
mod expand;
pub mod graph;
pub mod graphson;
mod http;
mod request;
mod response;
mod status;
mod trace;
mod transport;

pub use tinkerline_dsl as dsl;

pub use client::Client;
pub use config::{ClientConfig, ClientConfigBuilder};
pub use context::{Context, ContextError};
pub use error::{GremlinError, Result};
pub use expand::{expand_bindings, ExpandBindings};
pub use graph::{Edge, Property, ValueMap, Vertex, VertexProperty};
pub use http::{parse_endpoint, HttpTransport, MAX_RESPONSE_SIZE};
pub use request::{
    Credentials, Request, ARGS_BINDINGS, ARGS_EVAL_TIMEOUT, ARGS_GREMLIN, ARGS_LANGUAGE,
    ARGS_SASL, ARGS_SASL_MECHANISM, LANGUAGE_GREMLIN_GROOVY, OP_AUTHENTICATION, OP_EVAL,
    SASL_MECHANISM_PLAIN,
};
pub use response::{Response, ResponseResult, Status};
pub use status::StatusCode;
pub use trace::{TraceStatus, TraceTransport};
pub use transport::{chain, interceptor, Interceptor, RoundTripper, RoundTripperFn};
