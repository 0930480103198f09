#![cfg(feature = "async")]
//! Integration tests for deferred results.
//!
//! Tests cover:
//! - Combinators over `Future<Output = Result<_, _>>`
//! - Async binds on plain results
//! - Panic capture while polling

use railyard::CaughtPanic;
use railyard::prelude::*;
use railyard::result::create_async;
use railyard::result::future::{attempt_async, attempt_async_as, attempt_async_with};
use rstest::rstest;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

async fn fetch_quota(user: &str) -> Result<u32, String> {
    tokio::time::sleep(Duration::from_millis(1)).await;
    match user {
        "ada" => Ok(40),
        _ => Err(format!("unknown user {user}")),
    }
}

#[rstest]
#[tokio::test]
async fn deferred_chain_runs_only_success_steps() {
    let quota = fetch_quota("ada")
        .map_success(|quota| quota * 2)
        .where_or(|quota| *quota >= 50, |quota| format!("quota {quota} too low"))
        .bind(|quota| Ok(quota + 1))
        .await;
    assert_eq!(quota, Ok(81));

    let missing = fetch_quota("bob").map_success(|quota| quota * 2).map_on_failure(|error| error.len()).await;
    assert_eq!(missing, Err(16));
}

#[rstest]
#[tokio::test]
async fn deferred_bind_async_short_circuits() {
    let created = Arc::new(AtomicUsize::new(0));
    let counter = Arc::clone(&created);

    let value = fetch_quota("nobody")
        .bind_async(move |quota| {
            counter.fetch_add(1, Ordering::SeqCst);
            async move { Ok::<u32, String>(quota + 1) }
        })
        .await;

    assert!(value.is_err());
    assert_eq!(created.load(Ordering::SeqCst), 0);
}

#[rstest]
#[tokio::test]
async fn deferred_recovery_and_elimination() {
    let recovered = fetch_quota("bob").bind_on_failure(|_| Ok::<u32, ()>(0)).await;
    assert_eq!(recovered, Ok(0));

    let described = fetch_quota("ada").fold(|quota| format!("{quota} left"), |error| error).await;
    assert_eq!(described, "40 left");

    assert!(fetch_quota("ada").is_success().await);
    assert_eq!(fetch_quota("ada").success().await, Some(40));
    assert_eq!(fetch_quota("x").failure().await, Some("unknown user x".to_string()));
}

#[rstest]
#[tokio::test]
async fn deferred_taps_and_select_many() {
    let seen = Arc::new(AtomicUsize::new(0));
    let observer = Arc::clone(&seen);

    let paired = fetch_quota("ada")
        .tap(move |quota| observer.store(*quota as usize, Ordering::SeqCst))
        .tap_failure(|_| unreachable!())
        .select_many(|quota| Ok(quota / 4), |quota, share| (quota, share))
        .await;

    assert_eq!(paired, Ok((40, 10)));
    assert_eq!(seen.load(Ordering::SeqCst), 40);
}

#[rstest]
#[tokio::test]
async fn deferred_try_map_catches_panics() {
    let value = fetch_quota("ada")
        .try_map(
            |quota| {
                assert!(quota < 10, "quota {quota} exceeds limit");
                quota
            },
            |panic| panic.message().to_string(),
        )
        .await;
    assert_eq!(value, Err("quota 40 exceeds limit".to_string()));
}

#[rstest]
#[tokio::test]
async fn plain_result_async_binds() {
    let doubled = Ok::<u32, String>(4).map_async(|value| async move { value * 2 }).await;
    assert_eq!(doubled, Ok(8));

    let looked_up = Ok::<&str, String>("ada").bind_async(fetch_quota).await;
    assert_eq!(looked_up, Ok(40));
}

#[rstest]
#[tokio::test]
async fn create_async_awaits_only_the_selected_factory() {
    let value: Result<u32, String> =
        create_async(false, || async { unreachable!() }, || async { "rejected".to_string() }).await;
    assert_eq!(value, Err("rejected".to_string()));
}

#[rstest]
#[tokio::test]
async fn attempt_async_family() {
    let ok = attempt_async(async { 7 }).await;
    assert_eq!(ok.map_err(|panic| panic.to_string()), Ok(7));

    let caught: Result<(), CaughtPanic> = attempt_async(async {
        tokio::task::yield_now().await;
        panic!("stream closed");
    })
    .await;
    assert_eq!(caught, Err(CaughtPanic::new("stream closed")));

    let wrapped: Result<(), usize> = attempt_async_with(async { panic!("abc") }, |panic| panic.message().len()).await;
    assert_eq!(wrapped, Err(3));

    let typed: Result<(), u16> = attempt_async_as::<u16, _, _>(async { std::panic::panic_any(503_u16) }).await;
    assert_eq!(typed, Err(503));
}
