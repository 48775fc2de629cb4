//! Predicates, rendered as plain function calls (`within($0, $1)`).

use crate::node::{Arg, IntoArgs, Node};

fn op(name: &'static str, args: impl IntoArgs) -> Node {
    Node::func(name, args)
}

/// Equal to the value.
pub fn eq(v: impl Into<Arg>) -> Node {
    op("eq", [v])
}

/// Not equal to the value.
pub fn neq(v: impl Into<Arg>) -> Node {
    op("neq", [v])
}

/// Less than the value.
pub fn lt(v: impl Into<Arg>) -> Node {
    op("lt", [v])
}

/// Less than or equal to the value.
pub fn lte(v: impl Into<Arg>) -> Node {
    op("lte", [v])
}

/// Greater than the value.
pub fn gt(v: impl Into<Arg>) -> Node {
    op("gt", [v])
}

/// Greater than or equal to the value.
pub fn gte(v: impl Into<Arg>) -> Node {
    op("gte", [v])
}

/// Within `[from, to)`.
pub fn between(from: impl Into<Arg>, to: impl Into<Arg>) -> Node {
    op("between", (from, to))
}

/// Strictly between the bounds.
pub fn inside(from: impl Into<Arg>, to: impl Into<Arg>) -> Node {
    op("inside", (from, to))
}

/// Outside the bounds.
pub fn outside(from: impl Into<Arg>, to: impl Into<Arg>) -> Node {
    op("outside", (from, to))
}

/// Member of the values.
pub fn within(values: impl IntoArgs) -> Node {
    op("within", values)
}

/// Not a member of the values.
pub fn without(values: impl IntoArgs) -> Node {
    op("without", values)
}

/// Contains the substring.
pub fn containing(s: impl Into<String>) -> Node {
    op("containing", Into::<String>::into(s))
}

/// Does not contain the substring.
pub fn not_containing(s: impl Into<String>) -> Node {
    op("notContaining", Into::<String>::into(s))
}

/// Starts with the prefix.
pub fn starting_with(s: impl Into<String>) -> Node {
    op("startingWith", Into::<String>::into(s))
}

/// Does not start with the prefix.
pub fn not_starting_with(s: impl Into<String>) -> Node {
    op("notStartingWith", Into::<String>::into(s))
}

/// Ends with the suffix.
pub fn ending_with(s: impl Into<String>) -> Node {
    op("endingWith", Into::<String>::into(s))
}

/// Does not end with the suffix.
pub fn not_ending_with(s: impl Into<String>) -> Node {
    op("notEndingWith", Into::<String>::into(s))
}
