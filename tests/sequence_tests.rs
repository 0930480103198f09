//! Integration tests for the lazy sequence operators.
//!
//! Tests cover:
//! - The continuation protocol (`take_while`, `skip_while`, custom steps)
//! - Laziness and upstream release
//! - `except`, `intersect_by`, `append`
//! - Grouping and partitioning
//! - Per-element validation over plain, `Result` and `Option` elements

use railyard::prelude::*;
use railyard::result::ensure;
use railyard::sequence::{self, Continuation, ContinuationIter, IteratorState, Partition};
use rstest::rstest;
use std::cell::Cell;
use std::rc::Rc;

/// Counts pulls and flags when it is dropped.
struct Tracked {
    next: i32,
    end: i32,
    pulls: Rc<Cell<usize>>,
    dropped: Rc<Cell<bool>>,
}

impl Tracked {
    fn new(end: i32) -> (Self, Rc<Cell<usize>>, Rc<Cell<bool>>) {
        let pulls = Rc::new(Cell::new(0));
        let dropped = Rc::new(Cell::new(false));
        let tracked = Self {
            next: 0,
            end,
            pulls: Rc::clone(&pulls),
            dropped: Rc::clone(&dropped),
        };
        (tracked, pulls, dropped)
    }
}

impl Iterator for Tracked {
    type Item = i32;

    fn next(&mut self) -> Option<i32> {
        self.pulls.set(self.pulls.get() + 1);
        (self.next < self.end).then(|| {
            self.next += 1;
            self.next - 1
        })
    }
}

impl Drop for Tracked {
    fn drop(&mut self) {
        self.dropped.set(true);
    }
}

// =============================================================================
// Continuation Protocol
// =============================================================================

#[rstest]
#[case(vec![1, 2, 3, 4, 1], vec![1, 2])]
#[case(vec![5, 1], vec![])]
#[case(vec![], vec![])]
fn take_while_yields_prefix(#[case] input: Vec<i32>, #[case] expected: Vec<i32>) {
    let prefix: Vec<i32> = sequence::take_while(input, |value| *value < 3).collect();
    assert_eq!(prefix, expected);
}

#[rstest]
#[case(vec![1, 2, 3, 1], vec![3, 1])]
#[case(vec![1, 1], vec![])]
#[case(vec![4, 0, 9], vec![4, 0, 9])]
fn skip_while_yields_remainder(#[case] input: Vec<i32>, #[case] expected: Vec<i32>) {
    let rest: Vec<i32> = sequence::skip_while(input, |value| *value < 3).collect();
    assert_eq!(rest, expected);
}

#[rstest]
fn skip_while_stops_consulting_predicate_after_start() {
    let calls = Cell::new(0);
    let rest: Vec<i32> = vec![1, 5, 1, 1]
        .into_iter()
        .skip_while_indexed(|value, _| {
            calls.set(calls.get() + 1);
            *value < 3
        })
        .collect();

    assert_eq!(rest, vec![5, 1, 1]);
    assert_eq!(calls.get(), 2);
}

#[rstest]
fn indexed_predicates_see_source_positions() {
    let picked: Vec<char> = "abcdef".chars().skip_while_indexed(|_, index| index < 2).collect();
    assert_eq!(picked, vec!['c', 'd', 'e', 'f']);
}

#[rstest]
fn take_while_releases_upstream_on_first_rejection() {
    let (source, pulls, dropped) = Tracked::new(100);
    let mut prefix = source.take_while_indexed(|value, _| *value < 2);

    assert_eq!(prefix.next(), Some(0));
    assert_eq!(prefix.next(), Some(1));
    assert!(!dropped.get());
    assert_eq!(prefix.next(), None);
    assert!(dropped.get());
    assert_eq!(prefix.next(), None);
    assert_eq!(pulls.get(), 3);
    assert_eq!(prefix.state(), IteratorState::Stop);
}

#[rstest]
fn adapters_are_lazy_until_pulled() {
    let (source, pulls, _) = Tracked::new(10);
    let adapted = source.skip_while_indexed(|value, _| *value < 3).except(vec![5]).append(-1);
    assert_eq!(pulls.get(), 0);
    drop(adapted);
}

#[rstest]
fn custom_continuation_sees_previous_state() {
    let states: Vec<(i32, IteratorState)> = vec![1, 2, 3]
        .into_iter()
        .with_continuation(|value, position| Continuation::Take((value, position.state)))
        .collect();

    assert_eq!(
        states,
        vec![
            (1, IteratorState::Pending),
            (2, IteratorState::Take),
            (3, IteratorState::Take),
        ]
    );
}

#[rstest]
fn custom_continuation_can_transform_and_stop() {
    let words: Vec<String> = vec!["alpha", "", "beta", "stop", "gamma"]
        .into_iter()
        .with_continuation(|word, _| match word {
            "stop" => Continuation::Stop,
            "" => Continuation::Skip,
            word => Continuation::Take(word.to_uppercase()),
        })
        .collect();
    assert_eq!(words, vec!["ALPHA".to_string(), "BETA".to_string()]);
}

#[rstest]
fn continuation_starting_in_stop_is_empty() {
    let (source, pulls, _) = Tracked::new(5);
    let mut stopped = ContinuationIter::with_state(source, IteratorState::Stop, |value: i32, _| {
        Continuation::Take(value)
    });
    assert_eq!(stopped.next(), None);
    assert_eq!(pulls.get(), 0);
}

// =============================================================================
// Except / Intersect / Append
// =============================================================================

#[rstest]
#[case(vec![1, 2, 2, 3], vec![2], vec![1, 3])]
#[case(vec![1, 1], vec![], vec![1])]
#[case(vec![], vec![1], vec![])]
#[case(vec![4, 5], vec![4, 5], vec![])]
fn except_removes_second_and_duplicates(#[case] first: Vec<i32>, #[case] second: Vec<i32>, #[case] expected: Vec<i32>) {
    let remaining: Vec<i32> = first.into_iter().except(second).collect();
    assert_eq!(remaining, expected);
}

#[rstest]
fn except_never_touches_second_for_empty_first() {
    let (second, pulls, _) = Tracked::new(3);
    let remaining: Vec<i32> = Vec::<i32>::new().into_iter().except(second).collect();
    assert!(remaining.is_empty());
    assert_eq!(pulls.get(), 0);
}

#[rstest]
fn except_by_key_compares_projected_keys() {
    let users = vec![("ada", 36), ("bob", 20), ("cy", 36), ("dee", 51)];
    let kept: Vec<(&str, i32)> = users.into_iter().except_by_key(vec![20], |user| user.1).collect();
    assert_eq!(kept, vec![("ada", 36), ("dee", 51)]);
}

#[rstest]
fn intersect_by_admits_one_element_per_key() {
    let orders = vec![(1, "a"), (2, "b"), (1, "c"), (3, "d")];
    let matched: Vec<(i32, &str)> = orders.into_iter().intersect_by(vec![1, 3, 9], |order| order.0).collect();
    assert_eq!(matched, vec![(1, "a"), (3, "d")]);
}

#[rstest]
fn append_adds_one_trailing_element() {
    let appended: Vec<i32> = Vec::new().into_iter().append(7).collect();
    assert_eq!(appended, vec![7]);

    let mut tail = vec![1].into_iter().append(2);
    assert_eq!(tail.size_hint(), (2, Some(2)));
    assert_eq!(tail.by_ref().collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(tail.next(), None);
}

// =============================================================================
// Grouping / Partitioning
// =============================================================================

#[rstest]
fn group_by_keeps_first_appearance_order() {
    let lookup = vec!["apple", "bean", "avocado", "corn", "beet"].into_iter().group_by(|word| word.chars().next());

    let keys: Vec<Option<char>> = lookup.keys().copied().collect();
    assert_eq!(keys, vec![Some('a'), Some('b'), Some('c')]);
    assert_eq!(lookup.get(&Some('b')), &["bean", "beet"]);
    assert!(lookup.get(&Some('z')).is_empty());
}

#[rstest]
fn group_by_result_reduces_each_group() {
    let totals = vec![("x", 1), ("y", 2), ("x", 3)].into_iter().group_by_result(
        |pair| pair.0,
        |pair| pair.1,
        |key, values| format!("{key}={}", values.iter().sum::<i32>()),
    );
    assert_eq!(totals, vec!["x=4".to_string(), "y=2".to_string()]);
}

#[rstest]
fn partition_shares_one_pass_over_the_source() {
    let (source, pulls, _) = Tracked::new(6);
    let Partition { matches, non_matches } = source.partition_lazy(|value| value % 3 == 0);

    let others: Vec<i32> = non_matches.collect();
    let multiples: Vec<i32> = matches.collect();

    assert_eq!(others, vec![1, 2, 4, 5]);
    assert_eq!(multiples, vec![0, 3]);
    assert_eq!(pulls.get(), 7);
}

#[rstest]
fn pick_into_returns_non_matches_first() {
    let (small, large) = (1..=4).pick_into(|value| *value > 2);
    assert_eq!(small.collect::<Vec<_>>(), vec![1, 2]);
    assert_eq!(large.collect::<Vec<_>>(), vec![3, 4]);
}

// =============================================================================
// Validation
// =============================================================================

#[rstest]
fn where_valid_maps_each_element() {
    let checked: Vec<Result<&str, String>> = vec!["ok", "", "fine"]
        .into_iter()
        .where_valid(|text| ensure(!text.is_empty(), "empty".to_string()))
        .collect();
    assert_eq!(checked, vec![Ok("ok"), Err("empty".to_string()), Ok("fine")]);
}

#[rstest]
fn where_valid_ok_validates_only_successes() {
    let calls = Cell::new(0);
    let rows: Vec<Result<&str, String>> = vec![Ok("ok"), Err("unreadable".to_string()), Ok("")];
    let checked: Vec<Result<&str, String>> = rows
        .into_iter()
        .where_valid_ok(|text| {
            calls.set(calls.get() + 1);
            ensure(!text.is_empty(), "empty".to_string())
        })
        .collect();

    assert_eq!(
        checked,
        vec![Ok("ok"), Err("unreadable".to_string()), Err("empty".to_string())]
    );
    assert_eq!(calls.get(), 2);
}

#[rstest]
#[case(vec![3, 0, 8], vec![Some(3), None, Some(8)])]
#[case(vec![], vec![])]
fn where_present_maps_rejections_to_none(#[case] input: Vec<u32>, #[case] expected: Vec<Option<u32>>) {
    let checked: Vec<Option<u32>> = input.into_iter().where_present(|value| (*value > 0).then_some(())).collect();
    assert_eq!(checked, expected);
}

#[rstest]
fn where_some_checks_present_values_only() {
    let calls = Cell::new(0);
    let checked: Vec<Option<i32>> = vec![Some(4), None, Some(-1)]
        .into_iter()
        .where_some(|value| {
            calls.set(calls.get() + 1);
            (*value >= 0).then_some(())
        })
        .collect();

    assert_eq!(checked, vec![Some(4), None, None]);
    assert_eq!(calls.get(), 2);
}
