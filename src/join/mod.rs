//! Equality joins and group joins.
//!
//! A join matches every element of an *outer* sequence against the elements
//! of an *inner* sequence that share its key. The inner side is materialized
//! into a [`Lookup`] exactly once, on the first outer element that needs it;
//! an empty outer side never touches the inner side.
//!
//! - `group_join`: one result per outer element, paired with its (possibly
//!   empty) group.
//! - `join`: one result per matching (outer, inner) pair; unmatched outer
//!   elements produce nothing.
//!
//! Both keep outer order, and inner order within a group. `Result`-aware
//! variants let failures on the outer side pass through untouched, and let
//! the inner side itself be a `Result`.
//!
//! The entry points are methods on [`SequenceExt`](crate::sequence::SequenceExt),
//! [`ResultSequenceExt`](crate::sequence::ResultSequenceExt) and, with the
//! `async` feature, their stream counterparts.

pub(crate) mod iter;
mod lookup;

#[cfg(feature = "async")]
pub(crate) mod stream;

pub use iter::{GroupJoin, GroupJoinOk, Join, JoinOk, TryJoin};
pub use lookup::{Grouping, Lookup};

#[cfg(feature = "async")]
pub use stream::{GroupJoinOkStream, JoinOkStream, KeyedStream};
