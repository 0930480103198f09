//! A thread-safe buffer that lets many readers replay a single-pass iterator.
//!
//! [`Replayable`] wraps an iterator that can only be driven once and hands out
//! any number of independent [`ReplayIter`] cursors, on any number of threads.
//! Every element is produced at most once and cached; later readers get
//! clones of the cached values.
//!
//! # Concurrency
//!
//! - The number of published elements and a completion flag are packed into
//!   one atomic word. A reader whose index is already published (or whose
//!   index lies beyond a completed source) never takes the producer lock.
//! - Everyone else goes through the producer gate, a `parking_lot::Mutex`
//!   owning the source. The first caller drives the source; callers arriving
//!   meanwhile block on the gate and then re-read the count, usually finding
//!   their element already published.
//! - Published elements live in an arena behind a `parking_lot::RwLock` and
//!   are only appended, never moved out, so indices stay stable.
//!
//! The source must not read from its own buffer while producing: the gate is
//! not reentrant.
//!
//! # Faults
//!
//! A panic while advancing the source is caught once, stored, and returned as
//! [`ReplayError::SourcePanicked`] to every reader at or beyond the element
//! that was being produced. Readers of earlier indices are unaffected.
//!
//! # Examples
//!
//! ```rust
//! use railyard::replay::Replayable;
//!
//! let numbers = Replayable::new(vec![1, 2, 3]);
//!
//! let first: Vec<i32> = numbers.iter().collect::<Result<_, _>>().unwrap();
//! let second: Vec<i32> = numbers.iter().collect::<Result<_, _>>().unwrap();
//! assert_eq!(first, vec![1, 2, 3]);
//! assert_eq!(first, second);
//! ```

mod options;

pub use options::{MAX_REPLAY_CAPACITY, ReplayOptions};

use std::iter::FusedIterator;
use std::panic::{AssertUnwindSafe, catch_unwind};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use parking_lot::{Mutex, RwLock};
use static_assertions::assert_impl_all;
use tracing::{debug, trace, warn};

use crate::error::{CaughtPanic, ReplayError};

const COMPLETE: usize = !MAX_REPLAY_CAPACITY;

#[inline]
const fn published(count: usize) -> usize {
    count & MAX_REPLAY_CAPACITY
}

#[inline]
const fn is_complete(count: usize) -> bool {
    count & COMPLETE != 0
}

struct Arena<T> {
    values: Vec<T>,
    fault: Option<ReplayError>,
}

struct Shared<I: Iterator> {
    count: AtomicUsize,
    arena: RwLock<Arena<I::Item>>,
    producer: Mutex<Option<I>>,
    options: ReplayOptions,
}

enum Slot<T> {
    Value(T),
    Exhausted,
    Faulted(ReplayError),
    Unpublished,
}

impl<T> Slot<T> {
    fn into_result(self) -> Option<Result<Option<T>, ReplayError>> {
        match self {
            Self::Value(value) => Some(Ok(Some(value))),
            Self::Exhausted => Some(Ok(None)),
            Self::Faulted(error) => Some(Err(error)),
            Self::Unpublished => None,
        }
    }
}

/// A replayable, thread-safe cache over a single-pass iterator.
///
/// Cloning is cheap and shares the cache.
pub struct Replayable<I: Iterator> {
    shared: Arc<Shared<I>>,
}

assert_impl_all!(Replayable<std::vec::IntoIter<u32>>: Send, Sync, Clone);

impl<I: Iterator> Clone for Replayable<I> {
    fn clone(&self) -> Self {
        Self {
            shared: Arc::clone(&self.shared),
        }
    }
}

impl<I: Iterator> std::fmt::Debug for Replayable<I> {
    fn fmt(&self, formatter: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.shared.count.load(Ordering::Acquire);
        formatter
            .debug_struct("Replayable")
            .field("published", &published(count))
            .field("complete", &is_complete(count))
            .field("options", &self.shared.options)
            .finish()
    }
}

impl<I: Iterator> Replayable<I> {
    /// Wraps `source` with the default [`ReplayOptions`].
    pub fn new<S>(source: S) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self::with_options(source, ReplayOptions::default())
    }

    /// Wraps `source` with explicit sizing.
    pub fn with_options<S>(source: S, options: ReplayOptions) -> Self
    where
        S: IntoIterator<IntoIter = I>,
    {
        Self {
            shared: Arc::new(Shared {
                count: AtomicUsize::new(0),
                arena: RwLock::new(Arena {
                    values: Vec::with_capacity(options.initial_capacity()),
                    fault: None,
                }),
                producer: Mutex::new(Some(source.into_iter())),
                options,
            }),
        }
    }

    /// The number of elements produced so far.
    pub fn buffered_len(&self) -> usize {
        published(self.shared.count.load(Ordering::Acquire))
    }

    /// Returns `true` once the source is exhausted or faulted.
    pub fn is_complete(&self) -> bool {
        is_complete(self.shared.count.load(Ordering::Acquire))
    }

    /// The options this buffer was created with.
    pub fn options(&self) -> ReplayOptions {
        self.shared.options
    }
}

impl<I> Replayable<I>
where
    I: Iterator,
    I::Item: Clone,
{
    /// Returns the element at `index`, producing it if needed.
    ///
    /// - `Ok(Some(value))`: the element, cached or freshly produced.
    /// - `Ok(None)`: the source ended before `index`.
    ///
    /// # Errors
    ///
    /// Returns the stored [`ReplayError`] when the source faulted at or
    /// before `index`.
    pub fn try_get_value(&self, index: usize) -> Result<Option<I::Item>, ReplayError> {
        if let Some(result) = self.read(index, self.shared.count.load(Ordering::Acquire)).into_result() {
            return result;
        }

        let mut producer = self.shared.producer.lock();
        let count = self.shared.count.load(Ordering::Acquire);
        let count = if is_complete(count) {
            count
        } else {
            self.produce_through(&mut producer, index, count)
        };
        drop(producer);

        self.read(index, count)
            .into_result()
            .unwrap_or_else(|| unreachable!("producer returned with element {index} unpublished"))
    }

    /// A new cursor starting at the first element.
    pub fn iter(&self) -> ReplayIter<I> {
        ReplayIter {
            replay: self.clone(),
            index: 0,
            finished: false,
        }
    }

    fn read(&self, index: usize, count: usize) -> Slot<I::Item> {
        if index < published(count) {
            return self
                .shared
                .arena
                .read()
                .values
                .get(index)
                .map_or(Slot::Unpublished, |value| Slot::Value(value.clone()));
        }
        if !is_complete(count) {
            return Slot::Unpublished;
        }
        match &self.shared.arena.read().fault {
            Some(error) => Slot::Faulted(error.clone()),
            None => Slot::Exhausted,
        }
    }

    fn produce_through(&self, producer: &mut Option<I>, index: usize, mut count: usize) -> usize {
        while published(count) <= index {
            let produced = published(count);
            let Some(source) = producer.as_mut() else {
                break;
            };
            let outcome = match catch_unwind(AssertUnwindSafe(|| source.next())) {
                Ok(Some(value)) => self.store(value, produced).map(|()| true),
                Ok(None) => {
                    trace!(len = produced, "replayed source exhausted");
                    Ok(false)
                }
                Err(payload) => {
                    let panic = CaughtPanic::from_payload(payload.as_ref());
                    warn!(index = produced, %panic, "replayed source panicked");
                    Err(ReplayError::SourcePanicked {
                        index: produced,
                        panic,
                    })
                }
            };
            match outcome {
                Ok(true) => {
                    count += 1;
                    self.shared.count.store(count, Ordering::Release);
                }
                Ok(false) => {
                    *producer = None;
                    count |= COMPLETE;
                    self.shared.count.store(count, Ordering::Release);
                }
                Err(error) => {
                    *producer = None;
                    self.shared.arena.write().fault = Some(error);
                    count |= COMPLETE;
                    self.shared.count.store(count, Ordering::Release);
                }
            }
        }
        count
    }

    fn store(&self, value: I::Item, produced: usize) -> Result<(), ReplayError> {
        let options = self.shared.options;
        if produced >= options.max_capacity() {
            warn!(max_capacity = options.max_capacity(), "replay buffer is full");
            return Err(ReplayError::CapacityExceeded {
                max_capacity: options.max_capacity(),
            });
        }

        let mut arena = self.shared.arena.write();
        let capacity = arena.values.capacity();
        if produced == capacity {
            let target = produced
                .saturating_mul(2)
                .max(options.initial_capacity())
                .max(1)
                .min(options.max_capacity());
            arena.values.reserve_exact(target - produced);
            debug!(from = capacity, to = target, "grew replay buffer");
        }
        arena.values.push(value);
        Ok(())
    }
}

impl<'a, I> IntoIterator for &'a Replayable<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Result<I::Item, ReplayError>;
    type IntoIter = ReplayIter<I>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// An independent cursor over a [`Replayable`].
///
/// Yields `Ok` elements in order. A fault is yielded once as `Err`, after
/// which the cursor is finished.
pub struct ReplayIter<I: Iterator> {
    replay: Replayable<I>,
    index: usize,
    finished: bool,
}

impl<I: Iterator> ReplayIter<I> {
    /// The index of the next element this cursor will read.
    pub const fn position(&self) -> usize {
        self.index
    }
}

impl<I: Iterator> Clone for ReplayIter<I> {
    fn clone(&self) -> Self {
        Self {
            replay: self.replay.clone(),
            index: self.index,
            finished: self.finished,
        }
    }
}

impl<I> Iterator for ReplayIter<I>
where
    I: Iterator,
    I::Item: Clone,
{
    type Item = Result<I::Item, ReplayError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        match self.replay.try_get_value(self.index) {
            Ok(Some(value)) => {
                self.index += 1;
                Some(Ok(value))
            }
            Ok(None) => {
                self.finished = true;
                None
            }
            Err(error) => {
                self.finished = true;
                Some(Err(error))
            }
        }
    }
}

impl<I> FusedIterator for ReplayIter<I>
where
    I: Iterator,
    I::Item: Clone,
{
}
