//! AST nodes of the traversal DSL.
//!
//! Every node renders to a code fragment plus the ordered list of literal
//! arguments it references. A literal renders as the `%s` placeholder and is
//! replaced by a binding name when the owning traversal is compiled.

use crate::traversal::{Traversal, TraversalRef};
use chrono::{DateTime, Utc};
use serde_json::Value;
use std::borrow::Cow;

/// Placeholder emitted for every unbound literal.
pub(crate) const PLACEHOLDER: &str = "%s";

/// Reference name of the graph traversal source.
pub const G: Node = Node::Token(Cow::Borrowed("g"));

/// Step separator.
pub const DOT: Node = Node::Token(Cow::Borrowed("."));

/// Root of anonymous traversals (`__.out()`).
pub const ANON: Node = Node::Token(Cow::Borrowed("__"));

/// Loop variable of Groovy closures.
pub const IT: Node = Node::Token(Cow::Borrowed("it"));

/// A value that becomes a binding when the traversal is compiled.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    /// Bound verbatim.
    Value(Value),
    /// Bound as nanoseconds since the Unix epoch.
    Time(DateTime<Utc>),
}

/// A DSL element.
///
/// Nodes are immutable once built; nested traversals are held by reference so
/// that [`group`](crate::group) can re-point them at their assigned variables.
#[derive(Debug, Clone)]
pub enum Node {
    /// Rendered verbatim, no arguments.
    Token(Cow<'static, str>),
    /// `[a, b, c]`
    List(Vec<Arg>),
    /// `name(a, b, c)`
    Func { name: Cow<'static, str>, args: Vec<Arg> },
    /// `a; b; c`
    Block(Vec<Arg>),
    /// `name = elem`, or just `elem` when the name is empty.
    Var { name: String, elem: Box<Arg> },
}

/// An argument of a step, list, block or variable.
#[derive(Debug, Clone)]
pub enum Arg {
    Node(Node),
    Traversal(TraversalRef),
    Literal(Literal),
}

impl Node {
    /// Token from a static string.
    pub const fn token(s: &'static str) -> Self {
        Node::Token(Cow::Borrowed(s))
    }

    /// Function call node.
    pub fn func(name: &'static str, args: impl IntoArgs) -> Self {
        Node::Func {
            name: Cow::Borrowed(name),
            args: args.into_args(),
        }
    }

    /// List node.
    pub fn list(args: impl IntoArgs) -> Self {
        Node::List(args.into_args())
    }

    /// Returns the code representation of the node and its unbound literals.
    pub fn code(&self) -> (String, Vec<Literal>) {
        match self {
            Node::Token(t) => (t.to_string(), Vec::new()),
            Node::List(elems) => {
                let (c, args) = code_list(", ", elems);
                (format!("[{c}]"), args)
            }
            Node::Func { name, args } => {
                let (c, args) = code_list(", ", args);
                (format!("{name}({c})"), args)
            }
            Node::Block(nodes) => code_list("; ", nodes),
            Node::Var { name, elem } => {
                let (c, args) = elem.code();
                if name.is_empty() {
                    (c, args)
                } else {
                    (format!("{name} = {c}"), args)
                }
            }
        }
    }
}

impl Arg {
    /// Returns the code representation of the argument.
    pub fn code(&self) -> (String, Vec<Literal>) {
        match self {
            Arg::Node(n) => n.code(),
            Arg::Traversal(t) => t.code(),
            Arg::Literal(l) => (PLACEHOLDER.to_string(), vec![l.clone()]),
        }
    }
}

fn code_list(sep: &str, elems: &[Arg]) -> (String, Vec<Literal>) {
    let mut code = String::new();
    let mut args = Vec::new();
    for (i, elem) in elems.iter().enumerate() {
        if i > 0 {
            code.push_str(sep);
        }
        let (c, nargs) = elem.code();
        code.push_str(&c);
        args.extend(nargs);
    }
    (code, args)
}

/// Shorthand for a list node: `list((1, 2, 3))` renders `[$0, $1, $2]`.
pub fn list(args: impl IntoArgs) -> Node {
    Node::list(args)
}

macro_rules! keyword {
    ($(#[$meta:meta])* $name:ident { $($(#[$vmeta:meta])* $variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
        pub enum $name {
            $($(#[$vmeta])* $variant),+
        }

        impl $name {
            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text),+
                }
            }
        }

        impl From<$name> for Node {
            fn from(k: $name) -> Self {
                Node::token(k.as_str())
            }
        }

        impl From<$name> for Arg {
            fn from(k: $name) -> Self {
                Arg::Node(k.into())
            }
        }

        impl IntoArgs for $name {
            fn into_args(self) -> Vec<Arg> {
                vec![self.into()]
            }
        }
    };
}

keyword! {
    /// Cardinality of vertex properties.
    Cardinality {
        Set => "set",
        Single => "single",
    }
}

keyword! {
    /// Gremlin keywords.
    Keyword {
        Id => "id",
    }
}

keyword! {
    /// Order of vertex properties.
    Order {
        Incr => "incr",
        Decr => "decr",
        Shuffle => "shuffle",
    }
}

keyword! {
    /// References a particular column of a Map, Map.Entry or Path.
    Column {
        Keys => "keys",
        Values => "values",
    }
}

keyword! {
    /// Scope of steps that can operate locally or across the whole stream.
    Scope {
        Local => "local",
        Global => "global",
    }
}

// ============================================================================
// Conversions
// ============================================================================

impl From<Node> for Arg {
    fn from(n: Node) -> Self {
        Arg::Node(n)
    }
}

impl From<Literal> for Arg {
    fn from(l: Literal) -> Self {
        Arg::Literal(l)
    }
}

impl From<Traversal> for Arg {
    fn from(t: Traversal) -> Self {
        Arg::Traversal(t.share())
    }
}

impl From<&Traversal> for Arg {
    fn from(t: &Traversal) -> Self {
        Arg::Traversal(t.share())
    }
}

impl From<TraversalRef> for Arg {
    fn from(t: TraversalRef) -> Self {
        Arg::Traversal(t)
    }
}

impl From<DateTime<Utc>> for Arg {
    fn from(t: DateTime<Utc>) -> Self {
        Arg::Literal(Literal::Time(t))
    }
}

macro_rules! literal_from {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Arg {
                fn from(v: $ty) -> Self {
                    Arg::Literal(Literal::Value(Value::from(v)))
                }
            }
        )*
    };
}

literal_from!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, &str, Value);

/// Conversion of step arguments.
///
/// Implemented for `()` (no arguments), single values, tuples of up to eight
/// heterogeneous values, arrays and vectors. A vector spreads into separate
/// arguments; bind a list value with `serde_json::json!` or [`list`].
pub trait IntoArgs {
    fn into_args(self) -> Vec<Arg>;
}

impl IntoArgs for () {
    fn into_args(self) -> Vec<Arg> {
        Vec::new()
    }
}

impl<T: Into<Arg>, const N: usize> IntoArgs for [T; N] {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Into::into).collect()
    }
}

impl<T: Into<Arg>> IntoArgs for Vec<T> {
    fn into_args(self) -> Vec<Arg> {
        self.into_iter().map(Into::into).collect()
    }
}

macro_rules! single_into_args {
    ($($ty:ty),* $(,)?) => {
        $(
            impl IntoArgs for $ty {
                fn into_args(self) -> Vec<Arg> {
                    vec![self.into()]
                }
            }
        )*
    };
}

single_into_args!(
    i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32, f64, bool, String, Value,
    DateTime<Utc>, Literal, Node, Arg, Traversal, TraversalRef,
);

impl IntoArgs for &str {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

impl IntoArgs for &Traversal {
    fn into_args(self) -> Vec<Arg> {
        vec![self.into()]
    }
}

macro_rules! tuple_into_args {
    ($($name:ident),+) => {
        impl<$($name: Into<Arg>),+> IntoArgs for ($($name,)+) {
            #[allow(non_snake_case)]
            fn into_args(self) -> Vec<Arg> {
                let ($($name,)+) = self;
                vec![$($name.into()),+]
            }
        }
    };
}

tuple_into_args!(T1);
tuple_into_args!(T1, T2);
tuple_into_args!(T1, T2, T3);
tuple_into_args!(T1, T2, T3, T4);
tuple_into_args!(T1, T2, T3, T4, T5);
tuple_into_args!(T1, T2, T3, T4, T5, T6);
tuple_into_args!(T1, T2, T3, T4, T5, T6, T7);
tuple_into_args!(T1, T2, T3, T4, T5, T6, T7, T8);
