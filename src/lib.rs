//! # railyard
//!
//! Railway-oriented `Result`/`Option` combinators and lazy, possibly
//! asynchronous sequence operators for Rust.
//!
//! ## Overview
//!
//! - **Result algebra**: [`ResultExt`](result::ResultExt) adds `fold`, `bind`,
//!   failure-channel mirrors, `where_or`, `tap`, panic-catching `try_map` and
//!   friends to `std::result::Result`. [`zip!`] aggregates up to nine results
//!   and collects *every* failure.
//! - **Option algebra**: [`OptionExt`](option::OptionExt) gives `Option` the
//!   same vocabulary.
//! - **Deferred results**: `ResultFutureExt` threads the algebra through a
//!   `Future<Output = Result<_, _>>`, awaiting it exactly once.
//! - **Lazy sequences**: a single continuation state machine
//!   (`Pending`/`Take`/`Skip`/`Stop`/`Start`) drives `take_while`,
//!   `skip_while` and friends over both `Iterator` and `Stream`.
//! - **Set operators**: `except`, `intersect_by`, `append`, `group_by`,
//!   and a lazily shared `partition`.
//! - **Joins**: `join` / `group_join` with a lookup built exactly once, on
//!   first demand, with `Result`-aware variants.
//! - **Replay**: [`Replayable`](replay::Replayable) lets many readers, on many
//!   threads, re-read a single-pass iterator without re-driving it.
//!
//! ## Feature Flags
//!
//! - `async`: `Stream` and `Future` variants (default)
//! - `replay`: the replay buffer (default)
//! - `fxhash` / `ahash`: faster hashers for lookups and exclusion sets
//! - `full`: Enable all features
//!
//! ## Example
//!
//! ```rust
//! use railyard::prelude::*;
//!
//! let parsed: Result<i32, String> = railyard::result::success(20);
//! let doubled = parsed
//!     .bind(|value| railyard::result::success(value * 2))
//!     .where_or(|value| *value > 10, |value| format!("{value} is too small"));
//! assert_eq!(doubled, Ok(40));
//!
//! let prefix: Vec<i32> = vec![1, 2, 3, 4, 1]
//!     .into_iter()
//!     .take_while_indexed(|value, _| *value < 3)
//!     .collect();
//! assert_eq!(prefix, vec![1, 2]);
//! ```

#![forbid(unsafe_code)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::redundant_closure_for_method_calls)]

/// Prelude module for convenient imports.
///
/// Re-exports the extension traits so method syntax is available.
///
/// # Usage
///
/// ```rust
/// use railyard::prelude::*;
/// ```
pub mod prelude {
    pub use crate::join::{Grouping, Lookup};
    pub use crate::option::OptionExt;
    pub use crate::result::ResultExt;
    pub use crate::sequence::{OptionSequenceExt, ResultSequenceExt, SequenceExt};

    #[cfg(feature = "async")]
    pub use crate::result::future::ResultFutureExt;

    #[cfg(feature = "async")]
    pub use crate::sequence::stream::{OptionStreamExt, ResultStreamExt, StreamSequenceExt};

    #[cfg(feature = "replay")]
    pub use crate::replay::{ReplayIter, ReplayOptions, Replayable};
}

pub mod error;
pub mod hash;
pub mod join;
pub mod option;
pub mod result;
pub mod sequence;

#[cfg(feature = "replay")]
pub mod replay;

pub use error::{CaughtPanic, ReplayError};
