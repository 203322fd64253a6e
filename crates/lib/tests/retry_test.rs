//! # Retry Combinator Tests
//!
//! These tests drive `retry` with plain closures and a paused clock, so no
//! network and no real waiting are involved.

use sheetdb::{retry, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::time::Duration;
use tokio::time::Instant;

#[test]
fn test_backoff_is_quadratic_in_attempt() {
    let policy = RetryPolicy::default();

    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.backoff(1), Duration::from_millis(250));
    assert_eq!(policy.backoff(2), Duration::from_millis(1000));
    assert_eq!(policy.backoff(3), Duration::from_millis(2250));
}

#[tokio::test(start_paused = true)]
async fn test_succeeds_on_nth_attempt() {
    let policy = RetryPolicy::new(3, Duration::from_millis(250));
    let calls = AtomicU32::new(0);

    let outcome = retry(&policy, |attempt| {
        calls.fetch_add(1, Ordering::SeqCst);
        async move {
            if attempt < 3 {
                Err(format!("attempt {attempt} failed"))
            } else {
                Ok("rows")
            }
        }
    })
    .await;

    assert_eq!(outcome.result, Ok("rows"));
    assert_eq!(outcome.attempts, 3);
    assert_eq!(calls.load(Ordering::SeqCst), 3);
}

#[tokio::test(start_paused = true)]
async fn test_first_success_stops_retrying() {
    let policy = RetryPolicy::default();
    let calls = AtomicU32::new(0);

    let outcome = retry(&policy, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Ok::<_, String>(7) }
    })
    .await;

    assert_eq!(outcome.result, Ok(7));
    assert_eq!(outcome.attempts, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[tokio::test(start_paused = true)]
async fn test_exhaustion_returns_last_error() {
    let policy = RetryPolicy::new(4, Duration::from_millis(10));

    let outcome = retry(&policy, |attempt| async move {
        Err::<(), _>(format!("failure #{attempt}"))
    })
    .await;

    assert_eq!(outcome.result, Err("failure #4".to_string()));
    assert_eq!(outcome.attempts, 4);
}

#[tokio::test(start_paused = true)]
async fn test_waits_between_attempts_but_not_after_the_last() {
    let policy = RetryPolicy::new(3, Duration::from_millis(250));
    let started = Instant::now();

    let outcome = retry(&policy, |_| async { Err::<(), _>("down") }).await;

    assert_eq!(outcome.attempts, 3);
    // 250ms after attempt 1, 1000ms after attempt 2, nothing after attempt 3.
    let elapsed = started.elapsed();
    assert!(elapsed >= Duration::from_millis(1250), "waited {elapsed:?}");
    assert!(elapsed < Duration::from_millis(2250), "waited {elapsed:?}");
}

#[tokio::test(start_paused = true)]
async fn test_zero_attempts_still_runs_once() {
    let policy = RetryPolicy::new(0, Duration::from_millis(250));
    let calls = AtomicU32::new(0);

    let outcome = retry(&policy, |_| {
        calls.fetch_add(1, Ordering::SeqCst);
        async { Err::<(), _>("down") }
    })
    .await;

    assert!(outcome.result.is_err());
    assert_eq!(outcome.attempts, 1);
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}
