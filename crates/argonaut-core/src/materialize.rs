//! Translation from builder nodes to wire records.
//!
//! Every builder node implements [`Materialize`]. A node that produced
//! nothing returns `None` and its parent leaves the slot out entirely. The
//! presence rule is shared by all aggregators: build the wire record from the
//! materialized children, then [`collapse`] it, which drops the record when
//! every one of its optional fields came back empty.

use tracing::trace;

/// Translate a builder node into its wire record.
///
/// Implementations are pure: calling `materialize` twice on the same value
/// yields equal output and never mutates the node.
pub trait Materialize {
    type Wire;

    /// The wire record, or `None` when the node carries nothing to send.
    fn materialize(&self) -> Option<Self::Wire>;
}

/// A wire record whose fields are all optional.
pub trait Sparse {
    /// True when every field is `None`.
    fn is_vacant(&self) -> bool;
}

/// Keep `record` only if at least one of its fields is populated.
pub fn collapse<W: Sparse>(record: W) -> Option<W> {
    if record.is_vacant() {
        trace!(record = std::any::type_name::<W>(), "collapsed empty record");
        None
    } else {
        Some(record)
    }
}

/// Materialize each node, dropping absent ones. An empty result is absent.
pub fn materialize_list<T: Materialize>(nodes: &[T]) -> Option<Vec<T::Wire>> {
    let wire: Vec<T::Wire> = nodes.iter().filter_map(Materialize::materialize).collect();
    if wire.is_empty() { None } else { Some(wire) }
}

/// [`materialize_list`] over an optional slot.
pub fn materialize_opt_list<T: Materialize>(nodes: Option<&[T]>) -> Option<Vec<T::Wire>> {
    nodes.and_then(materialize_list)
}

/// Materialize an optional child.
pub fn materialize_opt<T: Materialize>(node: Option<&T>) -> Option<T::Wire> {
    node.and_then(Materialize::materialize)
}

/// Implement [`Sparse`] for a record by listing its optional fields.
macro_rules! impl_sparse {
    ($ty:ident { $($field:ident),+ $(,)? }) => {
        impl $crate::materialize::Sparse for $ty {
            fn is_vacant(&self) -> bool {
                $(self.$field.is_none())&&+
            }
        }
    };
}

pub(crate) use impl_sparse;
