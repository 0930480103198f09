//! Splitting one stream into two halves with an asynchronous predicate.
//!
//! The halves share the source behind a `parking_lot::Mutex`. Whichever half
//! is polled drives the source and the predicate; elements for the other half
//! are queued and that half is woken. While a predicate future is pending
//! both halves wait on it through a shared waker, so it is polled by
//! whichever half is woken first.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;
use std::sync::Arc;
use std::task::{Context, Poll, Waker, ready};

use futures::stream::Stream;
use futures::task::{ArcWake, AtomicWaker, waker_ref};
use parking_lot::Mutex;

use crate::sequence::{Partition, Side};

#[derive(Default)]
struct SideWakers {
    matches: AtomicWaker,
    non_matches: AtomicWaker,
}

impl SideWakers {
    fn of(&self, side: Side) -> &AtomicWaker {
        match side {
            Side::Matches => &self.matches,
            Side::NonMatches => &self.non_matches,
        }
    }

    fn register(&self, side: Side, waker: &Waker) {
        self.of(side).register(waker);
    }

    fn wake(&self, side: Side) {
        self.of(side).wake();
    }
}

impl ArcWake for SideWakers {
    fn wake_by_ref(arc_self: &Arc<Self>) {
        arc_self.matches.wake();
        arc_self.non_matches.wake();
    }
}

struct Shared<S: Stream, P, Test> {
    source: Option<Pin<Box<S>>>,
    predicate: P,
    in_flight: Option<(Pin<Box<Test>>, S::Item)>,
    matches: VecDeque<S::Item>,
    non_matches: VecDeque<S::Item>,
}

impl<S, P, Test> Shared<S, P, Test>
where
    S: Stream,
    P: FnMut(&S::Item) -> Test,
    Test: Future<Output = bool>,
{
    fn queue(&mut self, side: Side) -> &mut VecDeque<S::Item> {
        match side {
            Side::Matches => &mut self.matches,
            Side::NonMatches => &mut self.non_matches,
        }
    }

    fn poll_side(&mut self, side: Side, wakers: &SideWakers, cx: &mut Context<'_>) -> Poll<Option<S::Item>> {
        loop {
            if let Some(item) = self.queue(side).pop_front() {
                return Poll::Ready(Some(item));
            }

            if let Some((test, _)) = &mut self.in_flight {
                let matched = ready!(test.as_mut().poll(cx));
                if let Some((_, item)) = self.in_flight.take() {
                    let belongs_to = Side::of(matched);
                    if belongs_to == side {
                        return Poll::Ready(Some(item));
                    }
                    self.queue(belongs_to).push_back(item);
                    wakers.wake(belongs_to);
                }
                continue;
            }

            let Some(source) = self.source.as_mut() else {
                return Poll::Ready(None);
            };
            match ready!(source.as_mut().poll_next(cx)) {
                Some(item) => {
                    let test = Box::pin((self.predicate)(&item));
                    self.in_flight = Some((test, item));
                }
                None => {
                    self.source = None;
                    wakers.wake(side.other());
                    return Poll::Ready(None);
                }
            }
        }
    }
}

/// One half of a stream partition.
#[must_use = "streams do nothing unless polled"]
pub struct StreamPartitionHalf<S: Stream, P, Test> {
    shared: Arc<Mutex<Shared<S, P, Test>>>,
    wakers: Arc<SideWakers>,
    side: Side,
}

impl<S: Stream, P, Test> StreamPartitionHalf<S, P, Test> {
    /// Which half this is.
    pub const fn side(&self) -> Side {
        self.side
    }
}

impl<S, P, Test> Stream for StreamPartitionHalf<S, P, Test>
where
    S: Stream,
    P: FnMut(&S::Item) -> Test,
    Test: Future<Output = bool>,
{
    type Item = S::Item;

    fn poll_next(self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        let this = self.get_mut();
        this.wakers.register(this.side, cx.waker());
        let waker = waker_ref(&this.wakers);
        let mut shared_cx = Context::from_waker(&waker);
        this.shared.lock().poll_side(this.side, &this.wakers, &mut shared_cx)
    }
}

pub(crate) fn partition_async<S, P, Test>(
    source: S,
    predicate: P,
) -> Partition<StreamPartitionHalf<S, P, Test>, StreamPartitionHalf<S, P, Test>>
where
    S: Stream,
{
    let shared = Arc::new(Mutex::new(Shared {
        source: Some(Box::pin(source)),
        predicate,
        in_flight: None,
        matches: VecDeque::new(),
        non_matches: VecDeque::new(),
    }));
    let wakers = Arc::new(SideWakers::default());
    Partition {
        matches: StreamPartitionHalf {
            shared: Arc::clone(&shared),
            wakers: Arc::clone(&wakers),
            side: Side::Matches,
        },
        non_matches: StreamPartitionHalf {
            shared,
            wakers,
            side: Side::NonMatches,
        },
    }
}
