//! Gremlin traversal DSL
//!
//! Write Gremlin traversals almost as-is in Rust, without string building.
//! Traversals compile to a script with positional binding names and the
//! matching [`Bindings`]:
//!
//! ```
//! use tinkerline_dsl::{g, p, Querier, __};
//!
//! let t = g::v(()).has_label("person").choose(__::values(["age"]).is_(p::lte(20)));
//! let (query, bindings) = t.query();
//! assert_eq!(query, "g.V().hasLabel($0).choose(__.values($1).is(lte($2)))");
//! assert_eq!(bindings.len(), 3);
//! ```
//!
//! The DSL is not type-safe: it assumes the traversal and its arguments are
//! valid Gremlin.

pub mod anon;
mod bindings;
mod error;
pub mod g;
mod node;
pub mod p;
mod traversal;

pub use anon as __;
pub use bindings::Bindings;
pub use error::{BuildError, Result};
pub use node::{
    list, Arg, Cardinality, Column, IntoArgs, Keyword, Literal, Node, Order, Scope, ANON, DOT, G,
    IT,
};
pub use traversal::{each, group, join, Querier, Traversal, TraversalRef};
