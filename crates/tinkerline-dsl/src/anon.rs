//! Anonymous traversals, rooted at `__` (`__.out("knows")`).
//!
//! Re-exported from the crate root as `__`.

use crate::node::IntoArgs;
use crate::traversal::Traversal;

macro_rules! anon_steps {
    ($($method:ident),* $(,)?) => {
        $(
            #[doc = concat!("Anonymous `", stringify!($method), "` step.")]
            pub fn $method(args: impl IntoArgs) -> Traversal {
                Traversal::anonymous().$method(args)
            }
        )*
    };
}

macro_rules! anon_bare_steps {
    ($($method:ident),* $(,)?) => {
        $(
            #[doc = concat!("Anonymous `", stringify!($method), "` step.")]
            pub fn $method() -> Traversal {
                Traversal::anonymous().$method()
            }
        )*
    };
}

anon_steps!(
    v, add_v, add_e, property, both, both_e, has, has_not, has_id, has_label, match_, choose,
    select, value_map, properties, range, limit, from, to, as_, or_, and_, is_, not_, in_,
    where_, out, out_e, in_e, out_v, in_v, count, order, by, sum, mean, min, max, coalesce,
    dedup, constant, union, side_effect,
);

anon_bare_steps!(other_v, drop_, id, label, fold, unfold, group, to_list);

/// `__.values(keys)`
pub fn values<I, S>(keys: I) -> Traversal
where
    I: IntoIterator<Item = S>,
    S: Into<String>,
{
    Traversal::anonymous().values(keys)
}
