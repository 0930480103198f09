//! Splitting one lazy iterator into two co-dependent halves.
//!
//! Both halves share the upstream. Pulling from one half advances the
//! upstream until an element for that half shows up; elements destined for
//! the other half are parked in its queue. The halves can therefore be drained
//! in any order, interleaved or one after the other, and the upstream is
//! consumed exactly once.

use std::cell::RefCell;
use std::collections::VecDeque;
use std::iter::FusedIterator;
use std::rc::Rc;

/// Which half of a partition an element belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    /// Elements satisfying the predicate.
    Matches,
    /// Elements failing the predicate.
    NonMatches,
}

impl Side {
    /// The opposite half.
    #[inline]
    pub const fn other(self) -> Self {
        match self {
            Self::Matches => Self::NonMatches,
            Self::NonMatches => Self::Matches,
        }
    }

    /// The half an element with the given predicate outcome belongs to.
    #[inline]
    pub const fn of(matched: bool) -> Self {
        if matched { Self::Matches } else { Self::NonMatches }
    }
}

/// The two halves of a partition.
#[derive(Debug)]
pub struct Partition<M, N> {
    /// Elements satisfying the predicate.
    pub matches: M,
    /// Elements failing the predicate.
    pub non_matches: N,
}

impl<M, N> Partition<M, N> {
    /// Splits into `(matches, non_matches)`.
    pub fn into_parts(self) -> (M, N) {
        (self.matches, self.non_matches)
    }
}

struct Shared<I: Iterator, P> {
    source: Option<I>,
    predicate: P,
    matches: VecDeque<I::Item>,
    non_matches: VecDeque<I::Item>,
}

impl<I, P> Shared<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    fn queue(&mut self, side: Side) -> &mut VecDeque<I::Item> {
        match side {
            Side::Matches => &mut self.matches,
            Side::NonMatches => &mut self.non_matches,
        }
    }

    fn pull(&mut self, side: Side) -> Option<I::Item> {
        loop {
            if let Some(item) = self.queue(side).pop_front() {
                return Some(item);
            }
            let Some(item) = self.source.as_mut().and_then(Iterator::next) else {
                self.source = None;
                return None;
            };
            let belongs_to = Side::of((self.predicate)(&item));
            if belongs_to == side {
                return Some(item);
            }
            self.queue(belongs_to).push_back(item);
        }
    }
}

/// One half of a synchronous partition.
#[must_use = "iterators are lazy and do nothing unless consumed"]
pub struct PartitionHalf<I: Iterator, P> {
    shared: Rc<RefCell<Shared<I, P>>>,
    side: Side,
}

impl<I: Iterator, P> PartitionHalf<I, P> {
    /// Which half this is.
    pub const fn side(&self) -> Side {
        self.side
    }
}

impl<I, P> Iterator for PartitionHalf<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    type Item = I::Item;

    fn next(&mut self) -> Option<Self::Item> {
        self.shared.borrow_mut().pull(self.side)
    }
}

impl<I, P> FusedIterator for PartitionHalf<I, P>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
}

pub(crate) fn partition_lazy<I, P>(source: I, predicate: P) -> Partition<PartitionHalf<I, P>, PartitionHalf<I, P>>
where
    I: Iterator,
    P: FnMut(&I::Item) -> bool,
{
    let shared = Rc::new(RefCell::new(Shared {
        source: Some(source),
        predicate,
        matches: VecDeque::new(),
        non_matches: VecDeque::new(),
    }));
    Partition {
        matches: PartitionHalf {
            shared: Rc::clone(&shared),
            side: Side::Matches,
        },
        non_matches: PartitionHalf {
            shared,
            side: Side::NonMatches,
        },
    }
}
