use super::{ApiError, ApiResult};
use futures::channel::oneshot;
use std::future::Future;
use std::time::Duration;
use wasm_bindgen::closure::Closure;
use wasm_bindgen::JsCast;

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct RetryPolicy {
    /// Delay before each retry; its length is the retry count.
    pub delays: Vec<Duration>,
}

impl RetryPolicy {
    /// 1 s, 2 s, 4 s after the first attempt.
    pub fn upload() -> Self {
        Self::exponential(Duration::from_secs(1), 3)
    }

    pub fn exponential(base: Duration, retries: u32) -> Self {
        Self {
            delays: (0..retries).map(|i| base * 2u32.pow(i)).collect(),
        }
    }
}

/// Runs `attempt` until it succeeds, fails with a non-transient error, or the
/// policy runs out of delays.
pub(crate) async fn retry_with_backoff<T, A, AF, S, SF>(
    policy: &RetryPolicy,
    mut attempt: A,
    mut sleep: S,
) -> ApiResult<T>
where
    A: FnMut() -> AF,
    AF: Future<Output = ApiResult<T>>,
    S: FnMut(Duration) -> SF,
    SF: Future<Output = ()>,
{
    let mut delays = policy.delays.iter();
    let mut tries = 1;
    loop {
        let err: ApiError = match attempt().await {
            Ok(v) => return Ok(v),
            Err(e) => e,
        };

        match delays.next() {
            Some(delay) if err.is_transient() => {
                tracing::warn!("attempt {tries} failed ({err}); retrying in {delay:?}");
                sleep(*delay).await;
                tries += 1;
            }
            _ => return Err(err),
        }
    }
}

/// Browser timer as a future. Resolves immediately when there is no window.
pub(crate) async fn sleep(duration: Duration) {
    let Some(window) = web_sys::window() else {
        return;
    };

    let (tx, rx) = oneshot::channel::<()>();
    let cb = Closure::once_into_js(move || {
        let _ = tx.send(());
    });
    let scheduled = window.set_timeout_with_callback_and_timeout_and_arguments_0(
        cb.unchecked_ref(),
        duration.as_millis() as i32,
    );
    if scheduled.is_ok() {
        let _ = rx.await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use futures::executor::block_on;
    use std::cell::RefCell;

    fn recorded_run(results: Vec<ApiResult<u32>>) -> (ApiResult<u32>, usize, Vec<Duration>) {
        let results = RefCell::new(results.into_iter());
        let calls = RefCell::new(0usize);
        let slept = RefCell::new(Vec::new());

        let out = block_on(retry_with_backoff(
            &RetryPolicy::upload(),
            || {
                *calls.borrow_mut() += 1;
                let next = results.borrow_mut().next().unwrap_or(Ok(0));
                async move { next }
            },
            |d| {
                slept.borrow_mut().push(d);
                async {}
            },
        ));
        (out, calls.into_inner(), slept.into_inner())
    }

    #[test]
    fn test_upload_policy_schedule() {
        assert_eq!(
            RetryPolicy::upload().delays,
            vec![Duration::from_secs(1), Duration::from_secs(2), Duration::from_secs(4)]
        );
    }

    #[test]
    fn test_retries_transient_until_success() {
        let (out, calls, slept) = recorded_run(vec![
            Err(ApiError::new(ApiErrorKind::Http(503), "busy")),
            Err(ApiError::new(ApiErrorKind::Network, "reset")),
            Ok(7),
        ]);
        assert_eq!(out.ok(), Some(7));
        assert_eq!(calls, 3);
        assert_eq!(slept, vec![Duration::from_secs(1), Duration::from_secs(2)]);
    }

    #[test]
    fn test_gives_up_after_three_retries() {
        let failing = || -> ApiResult<u32> { Err(ApiError::new(ApiErrorKind::Http(504), "gateway timeout")) };
        let (out, calls, slept) = recorded_run(vec![failing(), failing(), failing(), failing(), Ok(1)]);
        assert_eq!(out.map_err(|e| e.kind), Err(ApiErrorKind::Http(504)));
        assert_eq!(calls, 4);
        assert_eq!(slept.len(), 3);
    }

    #[test]
    fn test_no_retry_for_payload_too_large() {
        let (out, calls, slept) = recorded_run(vec![Err(ApiError::new(ApiErrorKind::Http(413), "too big"))]);
        assert!(out.is_err());
        assert_eq!(calls, 1);
        assert!(slept.is_empty());
    }
}
