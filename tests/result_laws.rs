//! Property-based tests for the `Result` and `Option` algebra.
//!
//! - **Left identity**: `success(a).bind(f) == f(a)`
//! - **Right identity**: `m.bind(success) == m`
//! - **Associativity**: `m.bind(f).bind(g) == m.bind(|x| f(x).bind(g))`
//! - **Fold completeness**: `fold` agrees with pattern matching
//! - **Zip**: a success exactly when every input succeeds

use proptest::prelude::*;
use railyard::option::OptionExt;
use railyard::result::{self, ResultExt, zip3};

fn halve(value: i32) -> Result<i32, String> {
    if value % 2 == 0 { Ok(value / 2) } else { Err(format!("{value} is odd")) }
}

fn bounded(value: i32) -> Result<i32, String> {
    if value.abs() < 1_000 { Ok(value * 3) } else { Err(format!("{value} is out of range")) }
}

fn result_strategy() -> impl Strategy<Value = Result<i32, String>> {
    prop_oneof![any::<i32>().prop_map(Ok), "[a-z]{1,8}".prop_map(Err)]
}

proptest! {
    #[test]
    fn prop_bind_left_identity(value in any::<i32>()) {
        prop_assert_eq!(result::success::<i32, String>(value).bind(halve), halve(value));
    }

    #[test]
    fn prop_bind_right_identity(value in result_strategy()) {
        prop_assert_eq!(value.clone().bind(result::success), value);
    }

    #[test]
    fn prop_bind_associativity(value in result_strategy()) {
        let left = value.clone().bind(halve).bind(bounded);
        let right = value.bind(|inner| halve(inner).bind(bounded));
        prop_assert_eq!(left, right);
    }

    #[test]
    fn prop_fold_matches_pattern(value in result_strategy()) {
        let folded = value.clone().fold(|success| success.to_string(), |failure| failure);
        let matched = match value {
            Ok(success) => success.to_string(),
            Err(failure) => failure,
        };
        prop_assert_eq!(folded, matched);
    }

    #[test]
    fn prop_swap_is_an_involution(value in result_strategy()) {
        prop_assert_eq!(value.clone().swap().swap(), value);
    }

    #[test]
    fn prop_where_or_keeps_passing_successes(value in any::<i32>(), threshold in any::<i32>()) {
        let checked = Ok::<i32, String>(value).where_or(|value| *value >= threshold, |value| value.to_string());
        if value >= threshold {
            prop_assert_eq!(checked, Ok(value));
        } else {
            prop_assert_eq!(checked, Err(value.to_string()));
        }
    }

    #[test]
    fn prop_zip_succeeds_iff_all_succeed(
        first in result_strategy(),
        second in result_strategy(),
        third in result_strategy(),
    ) {
        let expected_failures: Vec<String> = [&first, &second, &third]
            .into_iter()
            .filter_map(|value| value.clone().err())
            .collect();
        let zipped = zip3(first, second, third);
        if expected_failures.is_empty() {
            prop_assert!(zipped.is_ok());
        } else {
            prop_assert_eq!(zipped, Err(expected_failures));
        }
    }

    #[test]
    fn prop_option_bind_associativity(value in any::<Option<i32>>()) {
        let first = |value: i32| value.checked_mul(2);
        let second = |value: i32| value.checked_sub(7);
        let left = value.bind(first).bind(second);
        let right = value.bind(|inner| first(inner).bind(second));
        prop_assert_eq!(left, right);
    }
}
