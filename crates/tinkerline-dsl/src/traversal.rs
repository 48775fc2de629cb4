//! The traversal builder.
//!
//! A [`Traversal`] is a handle over a shared, in-place mutated node list.
//! Step methods append to that list and hand the same traversal back; they
//! are not copy-on-write. Use [`Clone`] to fork a traversal before branching.
//!
//! Handles are `!Send`: a traversal must not be mutated from several threads.

use crate::bindings::Bindings;
use crate::error::{BuildError, Result};
use crate::node::{Arg, IntoArgs, Literal, Node, ANON, DOT, G, IT, PLACEHOLDER};
use serde_json::Value;
use std::borrow::Cow;
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

#[derive(Debug, Default)]
struct Inner {
    // First element is the reference name of the graph, "g" by default.
    nodes: Vec<Node>,
    errs: Vec<String>,
}

/// Mimics the TinkerPop graph traversal.
#[derive(Debug)]
pub struct Traversal {
    inner: Rc<RefCell<Inner>>,
}

/// A reference to a traversal nested inside another one.
///
/// Rendering a reference renders the current nodes of the referenced
/// traversal, so re-pointing it (see [`group`]) is visible to every holder.
#[derive(Debug, Clone)]
pub struct TraversalRef(Rc<RefCell<Inner>>);

impl TraversalRef {
    pub(crate) fn code(&self) -> (String, Vec<Literal>) {
        code_nodes(&self.0.borrow().nodes)
    }
}

/// Types that compile to a script and its bindings.
pub trait Querier {
    /// Returns the query string and its bindings.
    fn query(&self) -> (String, Bindings);
}

impl Default for Traversal {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for Traversal {
    /// Forks the traversal: the node list is copied, so later steps on either
    /// side do not affect the other. Nested traversal references are shared.
    /// Errors recorded with [`Traversal::add_error`] are not copied; the fork
    /// starts with none.
    fn clone(&self) -> Self {
        Self::from_nodes(self.inner.borrow().nodes.clone())
    }
}

impl Traversal {
    /// Returns a traversal rooted at `g`.
    pub fn new() -> Self {
        Self::rooted(G)
    }

    /// Returns a traversal starting with the given node.
    pub fn rooted(root: Node) -> Self {
        Self::from_nodes(vec![root])
    }

    /// Returns an anonymous traversal rooted at `__`.
    pub fn anonymous() -> Self {
        Self::rooted(ANON)
    }

    fn from_nodes(nodes: Vec<Node>) -> Self {
        Self {
            inner: Rc::new(RefCell::new(Inner {
                nodes,
                errs: Vec::new(),
            })),
        }
    }

    pub(crate) fn share(&self) -> TraversalRef {
        TraversalRef(Rc::clone(&self.inner))
    }

    fn nodes(&self) -> Vec<Node> {
        self.inner.borrow().nodes.clone()
    }

    /// Appends raw nodes. Used by the step namespaces and by callers that
    /// need steps this builder does not cover.
    pub fn add(self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.inner.borrow_mut().nodes.extend(nodes);
        self
    }

    fn step(self, name: &'static str, args: impl IntoArgs) -> Self {
        self.add([DOT, Node::func(name, args)])
    }

    /// Records an error without breaking the chain. Check [`Traversal::err`]
    /// before trusting the built query.
    pub fn add_error(self, err: impl fmt::Display) -> Self {
        self.inner.borrow_mut().errs.push(err.to_string());
        self
    }

    /// Returns the errors recorded while building, joined by `"; "`.
    pub fn err(&self) -> Result<()> {
        let inner = self.inner.borrow();
        if inner.errs.is_empty() {
            Ok(())
        } else {
            Err(BuildError::new(inner.errs.clone()))
        }
    }

    /// Reverts the last step. A traversal holding only its root is left as is.
    pub fn undo(self) -> Self {
        {
            let mut inner = self.inner.borrow_mut();
            let n = inner.nodes.len();
            if n > 2 {
                inner.nodes.truncate(n - 2);
            }
        }
        self
    }

    /// Step with string keys (`values`).
    pub fn values<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<Arg> = keys
            .into_iter()
            .map(|k| Arg::from(Into::<String>::into(k)))
            .collect();
        self.step("values", keys)
    }
}

impl Querier for Traversal {
    fn query(&self) -> (String, Bindings) {
        let mut script = String::new();
        let mut names = Vec::new();
        let mut bindings = Bindings::new();
        for node in self.inner.borrow().nodes.iter() {
            let (code, args) = node.code();
            script.push_str(&code);
            names.extend(args.into_iter().map(|arg| bindings.add(arg)));
        }
        (substitute(&script, &names), bindings)
    }
}

fn code_nodes(nodes: &[Node]) -> (String, Vec<Literal>) {
    let mut code = String::new();
    let mut args = Vec::new();
    for node in nodes {
        let (c, nargs) = node.code();
        code.push_str(&c);
        args.extend(nargs);
    }
    (code, args)
}

// Placeholders are replaced positionally, never by value.
fn substitute(script: &str, names: &[String]) -> String {
    let mut out = String::with_capacity(script.len());
    let mut names = names.iter();
    let mut rest = script;
    while let Some(pos) = rest.find(PLACEHOLDER) {
        out.push_str(&rest[..pos]);
        out.push_str(names.next().map_or(PLACEHOLDER, String::as_str));
        rest = &rest[pos + PLACEHOLDER.len()..];
    }
    out.push_str(rest);
    out
}

/// Groups traversals into one block. Each distinct traversal (by identity)
/// is assigned to a variable named by its position, `t<i>`, and the last
/// variable is the value of the block.
///
/// Every input traversal is re-pointed at its variable, so traversals that
/// reference an input render the variable name instead of repeating it.
pub fn group(traversals: &[&Traversal]) -> Traversal {
    let mut block = Vec::new();
    let mut names: Vec<(Rc<RefCell<Inner>>, String)> = Vec::new();
    for (i, tr) in traversals.iter().enumerate() {
        if names.iter().any(|(seen, _)| Rc::ptr_eq(seen, &tr.inner)) {
            continue;
        }
        let name = format!("t{i}");
        block.push(Arg::Node(Node::Var {
            name: name.clone(),
            elem: Box::new(Arg::from(Traversal::from_nodes(tr.nodes()))),
        }));
        names.push((Rc::clone(&tr.inner), name));
    }
    let name_of = |tr: &Traversal| {
        names
            .iter()
            .find(|(seen, _)| Rc::ptr_eq(seen, &tr.inner))
            .map(|(_, name)| name.clone())
            .unwrap_or_default()
    };
    for tr in traversals {
        tr.inner.borrow_mut().nodes = vec![Node::Token(Cow::Owned(name_of(tr)))];
    }
    if let Some(last) = traversals.last() {
        block.push(Arg::Node(Node::Token(Cow::Owned(name_of(last)))));
    }
    Traversal::from_nodes(vec![Node::Block(block)])
}

/// Joins traversals with a `"; "` separator, without variable aliasing.
pub fn join(traversals: &[&Traversal]) -> Traversal {
    let block = traversals
        .iter()
        .map(|tr| Arg::from(Traversal::from_nodes(tr.nodes())))
        .collect();
    Traversal::from_nodes(vec![Node::Block(block)])
}

/// Groovy each-loop: `<source>.each { <body> }`.
///
/// A traversal source renders as itself, a list (a [`Node::List`] or a JSON
/// array) as a bound list, and anything else as `undefined`. The body
/// receives a traversal rooted at `it`.
pub fn each(source: impl Into<Arg>, body: impl FnOnce(Traversal) -> Traversal) -> Traversal {
    let head = match source.into() {
        Arg::Traversal(t) => Node::Var {
            name: String::new(),
            elem: Box::new(Arg::Traversal(t)),
        },
        Arg::Node(list @ Node::List(_)) => list,
        Arg::Literal(Literal::Value(Value::Array(items))) => {
            Node::List(items.into_iter().map(Arg::from).collect())
        }
        _ => Node::token("undefined"),
    };
    let body = body(Traversal::rooted(IT)).nodes();
    Traversal::rooted(head)
        .add([DOT, Node::token("each"), Node::token(" { ")])
        .add(body)
        .add([Node::token(" }")])
}

macro_rules! steps {
    ($($(#[$doc:meta])* $method:ident => $name:literal;)*) => {
        #[allow(clippy::wrong_self_convention, clippy::should_implement_trait)]
        impl Traversal {
            $(
                $(#[$doc])*
                pub fn $method(self, args: impl IntoArgs) -> Self {
                    self.step($name, args)
                }
            )*
        }
    };
}

macro_rules! bare_steps {
    ($($(#[$doc:meta])* $method:ident => $name:literal;)*) => {
        #[allow(clippy::wrong_self_convention, clippy::should_implement_trait)]
        impl Traversal {
            $(
                $(#[$doc])*
                pub fn $method(self) -> Self {
                    self.step($name, ())
                }
            )*
        }
    };
}

steps! {
    /// Starts a traversal over vertices; may also be used mid-traversal.
    v => "V";
    /// Starts a traversal over edges; may also be used mid-traversal.
    e => "E";
    /// Adds a vertex.
    add_v => "addV";
    /// Adds an edge.
    add_e => "addE";
    /// Sets a property value, with optional cardinality and meta-properties.
    property => "property";
    /// Maps the vertex to its adjacent vertices given the edge labels.
    both => "both";
    /// Maps the vertex to its incident edges given the edge labels.
    both_e => "bothE";
    /// Filters elements by their properties.
    has => "has";
    /// Filters elements by the absence of properties.
    has_not => "hasNot";
    /// Filters elements by identifier.
    has_id => "hasId";
    /// Filters elements by label.
    has_label => "hasLabel";
    /// Maps the traverser to a map of bindings of the given match traversals.
    match_ => "match";
    /// Routes the traverser to a branch, for if-then-else semantics.
    choose => "choose";
    /// Selects labeled steps or map entries.
    select => "select";
    /// Maps the element to a map of its property values.
    value_map => "valueMap";
    /// Maps the element to its properties given the property keys.
    properties => "properties";
    /// Passes objects within the given range.
    range => "range";
    /// Passes only the first n objects.
    limit => "limit";
    /// from()-modulation.
    from => "from";
    /// to()-modulation; the incoming vertex of an added edge.
    to => "to";
    /// Labels the step for later reference.
    as_ => "as";
    /// At least one of the traversals yields a result.
    or_ => "or";
    /// All of the traversals yield a result.
    and_ => "and";
    /// Filters objects that are not equal to, or do not match, the argument.
    is_ => "is";
    /// Removes objects for which the traversal yields a result.
    not_ => "not";
    /// Maps the vertex to its incoming adjacent vertices.
    in_ => "in";
    /// Filters by the object itself or its path history.
    where_ => "where";
    /// Maps the vertex to its outgoing adjacent vertices.
    out => "out";
    /// Maps the vertex to its outgoing incident edges.
    out_e => "outE";
    /// Maps the vertex to its incoming incident edges.
    in_e => "inE";
    /// Maps the edge to its outgoing/tail vertex.
    out_v => "outV";
    /// Maps the edge to its incoming/head vertex.
    in_v => "inV";
    /// Counts the traversers up to this point.
    count => "count";
    /// Orders the objects of the stream.
    order => "order";
    /// Modulates the previous step.
    by => "by";
    /// Sums the stream.
    sum => "sum";
    /// Mean of the stream.
    mean => "mean";
    /// Smallest value of the stream.
    min => "min";
    /// Greatest value of the stream.
    max => "max";
    /// Result of the first traversal that emits at least one object.
    coalesce => "coalesce";
    /// Removes duplicates.
    dedup => "dedup";
    /// Maps any object to a fixed value.
    constant => "constant";
    /// Merges the results of the traversals.
    union => "union";
    /// Runs a traversal for its side effects, passing the traverser through.
    side_effect => "sideEffect";
}

bare_steps! {
    /// Maps the edge to the vertex that was not just traversed from.
    other_v => "otherV";
    /// Gets the next result.
    next => "next";
    /// Removes elements and properties from the graph.
    drop_ => "drop";
    /// Returns true if the iteration has more elements.
    has_next => "hasNext";
    /// Organizes objects of the stream into a map.
    group => "group";
    /// Maps the element to its id.
    id => "id";
    /// Maps the element to its label.
    label => "label";
    /// Puts all the results into a list.
    to_list => "toList";
    /// Iterates the traversal for its side effects.
    iterate => "iterate";
    /// Rolls the stream up into a list.
    fold => "fold";
    /// Unrolls an iterable or map into a linear stream.
    unfold => "unfold";
}
