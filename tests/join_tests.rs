//! Integration tests for joins, group joins and lookups.

use railyard::prelude::*;
use rstest::rstest;
use std::cell::Cell;

#[derive(Debug, Clone, PartialEq)]
struct Customer {
    id: u32,
    name: &'static str,
}

#[derive(Debug, Clone, PartialEq)]
struct Order {
    customer_id: u32,
    total: u32,
}

fn customers() -> Vec<Customer> {
    vec![
        Customer { id: 1, name: "ada" },
        Customer { id: 2, name: "bob" },
        Customer { id: 3, name: "cy" },
    ]
}

fn orders() -> Vec<Order> {
    vec![
        Order { customer_id: 2, total: 10 },
        Order { customer_id: 1, total: 5 },
        Order { customer_id: 2, total: 7 },
        Order { customer_id: 9, total: 1 },
    ]
}

// =============================================================================
// Plain outer side
// =============================================================================

#[rstest]
fn group_join_yields_every_outer_with_its_group() {
    let totals: Vec<(&str, u32)> = customers()
        .into_iter()
        .group_join(
            orders(),
            |customer| customer.id,
            |order| order.customer_id,
            |customer, orders| (customer.name, orders.iter().map(|order| order.total).sum()),
        )
        .collect();

    assert_eq!(totals, vec![("ada", 5), ("bob", 17), ("cy", 0)]);
}

#[rstest]
fn join_yields_matching_pairs_in_outer_then_inner_order() {
    let pairs: Vec<(&str, u32)> = customers()
        .into_iter()
        .join(
            orders(),
            |customer| customer.id,
            |order| order.customer_id,
            |customer, order| (customer.name, order.total),
        )
        .collect();

    assert_eq!(pairs, vec![("ada", 5), ("bob", 10), ("bob", 7)]);
}

#[rstest]
fn inner_side_is_grouped_once_and_only_on_demand() {
    let pulls = Cell::new(0);
    let inner = orders().into_iter().inspect(|_| pulls.set(pulls.get() + 1));

    let mut joined = customers().into_iter().group_join(
        inner,
        |customer| customer.id,
        |order| order.customer_id,
        |customer, orders| (customer.id, orders.len()),
    );

    assert_eq!(pulls.get(), 0);
    assert_eq!(joined.next(), Some((1, 1)));
    assert_eq!(pulls.get(), 4);
    assert_eq!(joined.by_ref().count(), 2);
    assert_eq!(pulls.get(), 4);
}

#[rstest]
fn empty_outer_never_reads_inner() {
    let pulls = Cell::new(0);
    let inner = orders().into_iter().inspect(|_| pulls.set(pulls.get() + 1));

    let joined: Vec<u32> = Vec::<Customer>::new()
        .into_iter()
        .join(inner, |customer| customer.id, |order| order.customer_id, |customer, _| customer.id)
        .collect();

    assert!(joined.is_empty());
    assert_eq!(pulls.get(), 0);
}

// =============================================================================
// Result-aware joins
// =============================================================================

#[rstest]
fn group_join_ok_passes_failures_in_place() {
    let outer: Vec<Result<u32, String>> = vec![Ok(2), Err("bad row".to_string()), Ok(3)];
    let joined: Vec<Result<(u32, usize), String>> = outer
        .into_iter()
        .group_join_ok(orders(), |id| *id, |order| order.customer_id, |id, orders| (id, orders.len()))
        .collect();

    assert_eq!(joined, vec![Ok((2, 2)), Err("bad row".to_string()), Ok((3, 0))]);
}

#[rstest]
fn join_ok_drops_unmatched_successes() {
    let outer: Vec<Result<u32, &str>> = vec![Ok(4), Err("x"), Ok(1)];
    let joined: Vec<Result<u32, &str>> = outer
        .into_iter()
        .join_ok(orders(), |id| *id, |order| order.customer_id, |_, order| order.total)
        .collect();

    assert_eq!(joined, vec![Err("x"), Ok(5)]);
}

#[rstest]
fn try_join_with_failed_inner_yields_single_failure() {
    let pulled = Cell::new(false);
    let outer = customers().into_iter().inspect(|_| pulled.set(true));

    let joined: Vec<Result<u32, &str>> = outer
        .try_join(
            Err::<Vec<Order>, _>("orders unavailable"),
            |customer| customer.id,
            |order| order.customer_id,
            |_, order| order.total,
        )
        .collect();

    assert_eq!(joined, vec![Err("orders unavailable")]);
    assert!(!pulled.get());
}

#[rstest]
fn try_group_join_with_available_inner_wraps_results() {
    let joined: Vec<Result<usize, &str>> = customers()
        .into_iter()
        .try_group_join(
            Ok::<_, &str>(orders()),
            |customer| customer.id,
            |order| order.customer_id,
            |_, orders| orders.len(),
        )
        .collect();

    assert_eq!(joined, vec![Ok(1), Ok(2), Ok(0)]);
}

#[rstest]
fn try_group_join_ok_with_failed_inner_forwards_outer_failures_first() {
    let outer: Vec<Result<u32, &str>> = vec![Ok(1), Err("row 2"), Ok(3), Err("row 4")];
    let joined: Vec<Result<usize, &str>> = outer
        .into_iter()
        .try_group_join_ok(
            Err::<Vec<Order>, _>("inner"),
            |id| *id,
            |order| order.customer_id,
            |_, orders| orders.len(),
        )
        .collect();

    assert_eq!(joined, vec![Err("row 2"), Err("row 4"), Err("inner")]);
}

#[rstest]
fn try_join_ok_with_available_inner_matches_successes() {
    let outer: Vec<Result<u32, &str>> = vec![Ok(2), Err("skip")];
    let joined: Vec<Result<u32, &str>> = outer
        .into_iter()
        .try_join_ok(Ok(orders()), |id| *id, |order| order.customer_id, |_, order| order.total)
        .collect();

    assert_eq!(joined, vec![Ok(10), Ok(7), Err("skip")]);
}

// =============================================================================
// Lookup
// =============================================================================

#[rstest]
fn lookup_collects_pairs_in_first_appearance_order() {
    let lookup: Lookup<char, i32> = vec![('b', 1), ('a', 2), ('b', 3)].into_iter().collect();

    assert_eq!(lookup.len(), 2);
    assert!(lookup.contains_key(&'a'));
    let groups: Vec<(char, Vec<i32>)> = lookup.into_iter().map(Grouping::into_parts).collect();
    assert_eq!(groups, vec![('b', vec![1, 3]), ('a', vec![2])]);
}
