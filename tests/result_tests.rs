//! Integration tests for the `Result` algebra.
//!
//! Tests cover:
//! - Factories and the `ensure` guard
//! - Success and failure channel combinators
//! - Panic-catching boundaries (`try_map`, `attempt`)
//! - All-or-nothing aggregation with `zip!`

use railyard::CaughtPanic;
use railyard::result::{self, ResultExt, attempt, attempt_with, ensure, ensure_with, zip2, zip3};
use railyard::zip;
use rstest::rstest;
use std::cell::{Cell, RefCell};

// =============================================================================
// Factories
// =============================================================================

#[rstest]
fn success_and_failure_factories() {
    assert_eq!(result::success::<i32, String>(1), Ok(1));
    assert_eq!(result::failure::<i32, &str>("no"), Err("no"));
    assert_eq!(result::unit::<&str>(), Ok(()));
}

#[rstest]
#[case(true, Ok(()))]
#[case(false, Err("negative"))]
fn ensure_guards_on_condition(#[case] condition: bool, #[case] expected: Result<(), &str>) {
    assert_eq!(ensure(condition, "negative"), expected);
}

#[rstest]
fn ensure_with_builds_failure_lazily() {
    let built = Cell::new(0);
    let passed: Result<(), String> = ensure_with(true, || {
        built.set(built.get() + 1);
        "unused".to_string()
    });
    assert_eq!(passed, Ok(()));
    assert_eq!(built.get(), 0);

    let failed: Result<(), String> = ensure_with(false, || {
        built.set(built.get() + 1);
        "too small".to_string()
    });
    assert_eq!(failed, Err("too small".to_string()));
    assert_eq!(built.get(), 1);
}

// =============================================================================
// Channel Combinators
// =============================================================================

#[rstest]
fn bind_chain_stops_at_first_failure() {
    let calls = Cell::new(0);
    let step = |value: i32| {
        calls.set(calls.get() + 1);
        if value > 2 { Err(format!("{value} too large")) } else { Ok(value + 1) }
    };

    let outcome = Ok(1).bind(step).bind(step).bind(step).bind(step);

    assert_eq!(outcome, Err("3 too large".to_string()));
    assert_eq!(calls.get(), 3);
}

#[rstest]
fn failure_channel_mirrors() {
    let failed: Result<i32, &str> = Err("timeout");
    assert_eq!(failed.map_on_failure(str::len), Err(7));
    assert_eq!(failed.bind_on_failure(|_| Ok::<i32, ()>(0)), Ok(0));

    let succeeded: Result<i32, &str> = Ok(5);
    assert_eq!(succeeded.map_on_failure(str::len), Ok(5));
}

#[rstest]
fn try_get_value_populates_exactly_one_slot() {
    assert_eq!(Ok::<i32, &str>(1).try_get_value(), (true, Some(1), None));
    assert_eq!(Err::<i32, &str>("x").try_get_value(), (false, None, Some("x")));
}

#[rstest]
fn where_or_turns_rejected_success_into_failure() {
    let accepted = Ok::<i32, String>(10).where_or(|value| *value > 5, |value| format!("{value}"));
    let rejected = Ok::<i32, String>(1).where_or(|value| *value > 5, |value| format!("{value} <= 5"));

    assert_eq!(accepted, Ok(10));
    assert_eq!(rejected, Err("1 <= 5".to_string()));
}

#[rstest]
fn tap_family_observes_without_changing() {
    let seen = Cell::new(0);
    let missed = Cell::new(0);

    let value = Ok::<i32, i32>(4)
        .tap(|value| seen.set(*value))
        .tap_failure(|_| missed.set(1))
        .tap_either(|value| seen.set(seen.get() + value), |_| missed.set(2));

    assert_eq!(value, Ok(4));
    assert_eq!(seen.get(), 8);
    assert_eq!(missed.get(), 0);
}

#[rstest]
fn apply_consumes_active_channel() {
    let log = RefCell::new(Vec::new());
    Err::<i32, &str>("gone").apply(
        |value| log.borrow_mut().push(format!("ok {value}")),
        |error| log.borrow_mut().push(format!("err {error}")),
    );
    assert_eq!(log.into_inner(), vec!["err gone".to_string()]);
}

#[rstest]
fn select_many_combines_outer_and_bound() {
    let order = Ok::<&str, String>("order-7").select_many(
        |id| id.strip_prefix("order-").ok_or_else(|| "bad id".to_string()).map(str::len),
        |id, digits| format!("{id}:{digits}"),
    );
    assert_eq!(order, Ok("order-7:1".to_string()));
}

#[rstest]
#[should_panic(expected = "config missing")]
fn success_or_panic_raises_built_message() {
    let missing: Result<i32, &str> = Err("config");
    missing.success_or_panic(|name| format!("{name} missing"));
}

// =============================================================================
// Panic Boundaries
// =============================================================================

#[rstest]
fn try_map_catches_panic_and_builds_failure() {
    let value: Result<i32, String> =
        Ok::<Vec<i32>, String>(vec![]).try_map(|values| values[3], |panic| format!("caught: {}", panic.message()));

    let failure = value.unwrap_err();
    assert!(failure.starts_with("caught: index out of bounds"));
}

#[rstest]
fn try_map_skips_both_functions_on_failure() {
    let called = Cell::new(false);
    let value: Result<i32, &str> = Err::<i32, &str>("early").try_map(
        |value| {
            called.set(true);
            value
        },
        |_| {
            called.set(true);
            "late"
        },
    );
    assert_eq!(value, Err("early"));
    assert!(!called.get());
}

#[rstest]
fn try_map_as_catches_only_matching_payloads() {
    #[derive(Debug, PartialEq)]
    struct Rejected(&'static str);

    let value: Result<(), String> = Ok::<(), String>(()).try_map_as::<Rejected, _, _, _>(
        |()| std::panic::panic_any(Rejected("quota")),
        |rejected| rejected.0.to_string(),
    );
    assert_eq!(value, Err("quota".to_string()));

    let escaped = std::panic::catch_unwind(|| {
        Ok::<(), String>(()).try_map_as::<Rejected, (), _, _>(|()| panic!("other"), |rejected| rejected.0.to_string())
    });
    assert!(escaped.is_err());
}

#[rstest]
fn attempt_family() {
    assert_eq!(attempt(|| 2 * 21), Ok(42));
    assert_eq!(attempt(|| -> i32 { panic!("boom") }), Err(CaughtPanic::new("boom")));

    let wrapped: Result<i32, String> = attempt_with(|| panic!("{} failed", "step"), |panic| panic.to_string());
    assert_eq!(wrapped, Err("panicked: step failed".to_string()));
}

// =============================================================================
// Zip
// =============================================================================

#[rstest]
fn zip_collects_every_failure_in_order() {
    let validated: Result<(i32, i32, i32), Vec<&str>> = zip3(Err("name"), Ok(2), Err("email"));
    assert_eq!(validated, Err(vec!["name", "email"]));
}

#[rstest]
fn zip_macro_dispatches_by_arity() {
    let pair = zip2::<_, _, ()>(Ok(1), Ok('a'));
    assert_eq!(pair, Ok((1, 'a')));

    let many: Result<(u8, u8, u8, u8, u8, u8, u8, u8, u8), Vec<u8>> =
        zip!(Ok(1), Ok(2), Err(3), Ok(4), Ok(5), Err(6), Ok(7), Ok(8), Err(9));
    assert_eq!(many, Err(vec![3, 6, 9]));
}
