//! Integration tests for the `Option` algebra.

use railyard::option::{self, OptionExt};
use rstest::rstest;
use std::cell::Cell;

#[rstest]
#[case(Some(3), 6)]
#[case(None, -1)]
fn fold_eliminates_both_cases(#[case] value: Option<i32>, #[case] expected: i32) {
    assert_eq!(value.fold(|value| value * 2, || -1), expected);
}

#[rstest]
fn factories() {
    assert_eq!(option::some(1), Some(1));
    assert_eq!(option::none::<i32>(), None);
    assert_eq!(option::create(false, 'x'), None);
    assert_eq!(option::create(true, 'x'), Some('x'));
}

#[rstest]
fn where_or_none_filters_present_values() {
    assert_eq!(Some(4).where_or_none(|value| value % 2 == 0), Some(4));
    assert_eq!(Some(3).where_or_none(|value| value % 2 == 0), None);
    assert_eq!(None::<i32>.where_or_none(|_| true), None);
}

#[rstest]
fn bind_then_ok_or_failure() {
    let parse = |text: &str| text.parse::<u16>().ok();

    let port = Some("8080").bind(parse).ok_or_failure(|| "invalid port");
    let missing = Some("http").bind(parse).ok_or_failure(|| "invalid port");

    assert_eq!(port, Ok(8080));
    assert_eq!(missing, Err("invalid port"));
}

#[rstest]
fn tap_and_tap_none_see_their_case_only() {
    let present = Cell::new(0);
    let absent = Cell::new(0);

    let _ = Some(2).tap(|value| present.set(*value)).tap_none(|| absent.set(absent.get() + 1));
    let _ = None::<i32>.tap(|value| present.set(*value)).tap_none(|| absent.set(absent.get() + 1));

    assert_eq!(present.get(), 2);
    assert_eq!(absent.get(), 1);
}

#[rstest]
fn select_many_requires_both_values() {
    let lookup = |name: &&str| if name.is_empty() { None } else { Some(name.len()) };

    assert_eq!(Some("ada").select_many(lookup, |name, len| format!("{name}/{len}")), Some("ada/3".to_string()));
    assert_eq!(Some("").select_many(lookup, |name, len| format!("{name}/{len}")), None);
}

#[rstest]
fn try_map_reports_panic_and_yields_none() {
    let mut caught = None;
    let value = Some(vec![1]).try_map(|values| values[5], |panic| caught = Some(panic));

    assert_eq!(value, None);
    assert!(caught.is_some_and(|panic| panic.message().contains("index out of bounds")));
}

#[rstest]
fn try_map_on_none_runs_nothing() {
    let ran = Cell::new(false);
    let value = None::<i32>.try_map(
        |value| {
            ran.set(true);
            value
        },
        |_| ran.set(true),
    );
    assert_eq!(value, None);
    assert!(!ran.get());
}
