//! Traversals rooted at the graph traversal source `g`.

use crate::node::IntoArgs;
use crate::traversal::Traversal;

/// `g.V(...)`
pub fn v(args: impl IntoArgs) -> Traversal {
    Traversal::new().v(args)
}

/// `g.E(...)`
pub fn e(args: impl IntoArgs) -> Traversal {
    Traversal::new().e(args)
}

/// `g.addV(...)`
pub fn add_v(args: impl IntoArgs) -> Traversal {
    Traversal::new().add_v(args)
}

/// `g.addE(...)`
pub fn add_e(args: impl IntoArgs) -> Traversal {
    Traversal::new().add_e(args)
}
