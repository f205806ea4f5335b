use nis_api::{ApiError, RetryPolicy};
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;

/// Runs `policy` over an operation that fails with `errors` in turn and then
/// succeeds, recording when each attempt started.
async fn run(
    policy: RetryPolicy,
    errors: Vec<ApiError>,
) -> (Result<&'static str, ApiError>, Vec<Duration>) {
    let start = Instant::now();
    let calls = AtomicU32::new(0);
    let times = Mutex::new(Vec::new());
    let result = policy
        .execute(|| {
            let n = calls.fetch_add(1, Ordering::SeqCst) as usize;
            times.lock().unwrap().push(start.elapsed());
            let outcome = errors.get(n).cloned();
            async move {
                match outcome {
                    Some(err) => Err(err),
                    None => Ok("done"),
                }
            }
        })
        .await;
    (result, times.into_inner().unwrap())
}

// ── Backoff ─────────────────────────────────────────────────────

#[tokio::test(start_paused = true)]
async fn waits_one_then_two_seconds_before_giving_up() {
    let policy = RetryPolicy::new(3, Duration::from_secs(1));
    let errors = vec![ApiError::Timeout; 3];
    let (result, times) = run(policy, errors).await;

    assert_eq!(result, Err(ApiError::Timeout));
    assert_eq!(
        times,
        vec![
            Duration::ZERO,
            Duration::from_secs(1),
            Duration::from_secs(3)
        ]
    );
}

#[tokio::test(start_paused = true)]
async fn surfaces_last_retryable_error() {
    let policy = RetryPolicy::new(3, Duration::from_secs(1));
    let errors = vec![
        ApiError::Timeout,
        ApiError::NetworkError("reset".into()),
        ApiError::HttpError(503),
    ];
    let (result, _) = run(policy, errors).await;
    assert_eq!(result, Err(ApiError::HttpError(503)));
}

#[tokio::test(start_paused = true)]
async fn succeeds_after_transient_failure() {
    let policy = RetryPolicy::new(3, Duration::from_secs(1));
    let (result, times) = run(policy, vec![ApiError::ServerError("busy".into())]).await;
    assert_eq!(result, Ok("done"));
    assert_eq!(times.len(), 2);
}

#[tokio::test(start_paused = true)]
async fn non_retryable_aborts_immediately() {
    let policy = RetryPolicy::new(5, Duration::from_secs(1));
    let (result, times) = run(policy, vec![ApiError::Unauthorized]).await;
    assert_eq!(result, Err(ApiError::Unauthorized));
    assert_eq!(times, vec![Duration::ZERO]);
}

#[tokio::test(start_paused = true)]
async fn zero_attempts_still_runs_once() {
    let policy = RetryPolicy::new(0, Duration::from_secs(1));
    let (result, times) = run(policy, vec![ApiError::Timeout]).await;
    assert_eq!(result, Err(ApiError::Timeout));
    assert_eq!(times.len(), 1);
}

#[tokio::test(start_paused = true)]
async fn delays_are_capped() {
    let policy =
        RetryPolicy::new(4, Duration::from_secs(10)).with_max_delay(Duration::from_secs(15));
    let (_, times) = run(policy, vec![ApiError::Timeout; 4]).await;
    assert_eq!(
        times,
        vec![
            Duration::ZERO,
            Duration::from_secs(10),
            Duration::from_secs(25),
            Duration::from_secs(40)
        ]
    );
}

// ── Policy values ───────────────────────────────────────────────

#[test]
fn default_policy() {
    let policy = RetryPolicy::default();
    assert_eq!(policy.max_attempts, 3);
    assert_eq!(policy.base_delay, Duration::from_secs(1));
    assert_eq!(policy.max_delay, Duration::from_secs(30));
}

#[test]
fn delay_doubles_per_attempt() {
    let policy = RetryPolicy::new(10, Duration::from_millis(100));
    assert_eq!(policy.delay_for(0), Duration::from_millis(100));
    assert_eq!(policy.delay_for(1), Duration::from_millis(200));
    assert_eq!(policy.delay_for(3), Duration::from_millis(800));
    // overflow saturates at the cap
    assert_eq!(policy.delay_for(64), Duration::from_secs(30));
}

// ── Error classification ────────────────────────────────────────

#[test]
fn retryable_errors() {
    assert!(ApiError::NetworkError("x".into()).is_retryable());
    assert!(ApiError::Timeout.is_retryable());
    assert!(ApiError::ServerError("x".into()).is_retryable());
    assert!(ApiError::HttpError(500).is_retryable());
    assert!(ApiError::HttpError(599).is_retryable());
}

#[test]
fn final_errors() {
    assert!(!ApiError::HttpError(499).is_retryable());
    assert!(!ApiError::HttpError(404).is_retryable());
    assert!(!ApiError::Unauthorized.is_retryable());
    assert!(!ApiError::RateLimitExceeded.is_retryable());
    assert!(!ApiError::NotConfigured.is_retryable());
    assert!(!ApiError::InvalidResponse.is_retryable());
    assert!(!ApiError::DecodingError("x".into()).is_retryable());
    assert!(!ApiError::EncodingError("x".into()).is_retryable());
    assert!(!ApiError::InvalidUrl("x".into()).is_retryable());
}

#[test]
fn status_of_http_errors() {
    assert_eq!(ApiError::HttpError(418).status(), Some(418));
    assert_eq!(ApiError::Unauthorized.status(), Some(401));
    assert_eq!(ApiError::Timeout.status(), None);
}
