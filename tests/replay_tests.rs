//! Integration tests for the replay buffer.
//!
//! Tests cover:
//! - At-most-once production and independent cursors
//! - Concurrent readers on many threads
//! - Source panics surfaced as `ReplayError`
//! - Capacity limits

use railyard::ReplayError;
use railyard::prelude::*;
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::thread;

fn counted(len: usize, produced: &Arc<AtomicUsize>) -> impl Iterator<Item = usize> + Send + use<> {
    let produced = Arc::clone(produced);
    (0..len).inspect(move |_| {
        produced.fetch_add(1, Ordering::SeqCst);
    })
}

#[rstest]
fn cursors_replay_without_reproducing() {
    let produced = Arc::new(AtomicUsize::new(0));
    let replay = Replayable::new(counted(5, &produced));

    let first: Vec<usize> = replay.iter().map(Result::unwrap).collect();
    let second: Vec<usize> = replay.iter().map(Result::unwrap).collect();

    assert_eq!(first, vec![0, 1, 2, 3, 4]);
    assert_eq!(first, second);
    assert_eq!(produced.load(Ordering::SeqCst), 5);
    assert!(replay.is_complete());
}

#[rstest]
fn nothing_is_produced_before_the_first_read() {
    let produced = Arc::new(AtomicUsize::new(0));
    let replay = counted(3, &produced).replayable();

    assert_eq!(produced.load(Ordering::SeqCst), 0);
    assert_eq!(replay.try_get_value(1), Ok(Some(1)));
    assert_eq!(produced.load(Ordering::SeqCst), 2);
    assert_eq!(replay.buffered_len(), 2);
}

#[rstest]
fn partial_cursors_advance_independently() {
    let replay = Replayable::new(vec!['a', 'b', 'c']);
    let mut slow = replay.iter();
    let mut fast = replay.iter();

    assert_eq!(fast.next(), Some(Ok('a')));
    assert_eq!(fast.next(), Some(Ok('b')));
    assert_eq!(slow.next(), Some(Ok('a')));
    assert_eq!(fast.position(), 2);
    assert_eq!(slow.position(), 1);

    let resumed = slow.clone();
    assert_eq!(resumed.map(Result::unwrap).collect::<String>(), "bc");
}

#[rstest]
fn reads_past_the_end_report_exhaustion() {
    let replay = Replayable::new(vec![1]);
    assert_eq!(replay.try_get_value(5), Ok(None));
    assert_eq!(replay.try_get_value(0), Ok(Some(1)));
    assert_eq!(replay.buffered_len(), 1);
}

#[rstest]
fn concurrent_readers_observe_one_production() {
    let produced = Arc::new(AtomicUsize::new(0));
    let replay = Replayable::with_options(
        counted(1_000, &produced),
        ReplayOptions::default().with_initial_capacity(1),
    );

    let readers: Vec<_> = (0..8)
        .map(|_| {
            let replay = replay.clone();
            thread::spawn(move || replay.iter().map(Result::unwrap).sum::<usize>())
        })
        .collect();

    for reader in readers {
        assert_eq!(reader.join().unwrap(), (0..1_000).sum::<usize>());
    }
    assert_eq!(produced.load(Ordering::SeqCst), 1_000);
}

#[rstest]
fn source_panic_is_reported_to_every_later_reader() {
    let source = (0..5).map(|value| {
        assert!(value != 3, "sensor {value} offline");
        value
    });
    let replay = Replayable::new(source);

    let collected: Vec<Result<i32, ReplayError>> = replay.iter().collect();
    assert_eq!(collected.len(), 4);
    assert_eq!(collected[..3], [Ok(0), Ok(1), Ok(2)]);
    match &collected[3] {
        Err(ReplayError::SourcePanicked { index, panic }) => {
            assert_eq!(*index, 3);
            assert_eq!(panic.message(), "sensor 3 offline");
        }
        other => panic!("expected a source panic, got {other:?}"),
    }

    assert_eq!(replay.try_get_value(2), Ok(Some(2)));
    assert!(matches!(replay.try_get_value(4), Err(ReplayError::SourcePanicked { index: 3, .. })));
    assert!(replay.is_complete());
}

#[rstest]
fn capacity_limit_is_reported_as_an_error() {
    let replay = Replayable::with_options(0.., ReplayOptions::default().with_max_capacity(4));

    let collected: Vec<Result<u64, ReplayError>> = replay.iter().collect();

    assert_eq!(collected.len(), 5);
    assert_eq!(collected[4], Err(ReplayError::CapacityExceeded { max_capacity: 4 }));
    assert_eq!(replay.buffered_len(), 4);
}

#[rstest]
fn options_are_clamped() {
    let options = ReplayOptions::default().with_initial_capacity(64).with_max_capacity(8);
    assert_eq!(options.max_capacity(), 8);
    assert_eq!(options.initial_capacity(), 8);
    assert_eq!(
        ReplayOptions::default().with_max_capacity(usize::MAX).max_capacity(),
        railyard::replay::MAX_REPLAY_CAPACITY
    );
}
