use rand::Rng;
use reqwest::StatusCode;
use std::time::Duration;
use tokio::time::sleep;
use tracing::debug;

/// Retry schedule: exponential backoff from 1s, plus jitter.
const RETRY_BASE_DELAY_SECS: u64 = 1;
const RETRY_JITTER_DIVISOR: u128 = 4; // + up to 25% jitter

/// How often an idempotent request may be resent.
#[derive(Debug, Clone, Copy)]
pub(crate) struct RetryPolicy {
    pub max_retries: usize,
    pub base_delay: Duration,
}

impl RetryPolicy {
    pub fn new(max_retries: usize) -> Self {
        Self {
            max_retries,
            base_delay: Duration::from_secs(RETRY_BASE_DELAY_SECS),
        }
    }

    fn delay(&self, attempt: usize) -> Duration {
        let multiplier = 1u32.checked_shl(attempt as u32).unwrap_or(u32::MAX);
        self.base_delay.saturating_mul(multiplier)
    }
}

fn is_retriable_status(status: StatusCode) -> bool {
    matches!(
        status,
        StatusCode::REQUEST_TIMEOUT
            | StatusCode::TOO_MANY_REQUESTS
            | StatusCode::INTERNAL_SERVER_ERROR
            | StatusCode::BAD_GATEWAY
            | StatusCode::SERVICE_UNAVAILABLE
            | StatusCode::GATEWAY_TIMEOUT
    )
}

fn is_retriable_send_error(err: &reqwest::Error) -> bool {
    err.is_timeout() || err.is_connect() || err.is_body()
}

fn add_jitter(delay: Duration) -> Duration {
    let max_jitter_ms = delay.as_millis() / RETRY_JITTER_DIVISOR;
    if max_jitter_ms == 0 {
        return delay;
    }

    let max_jitter_ms = std::cmp::min(max_jitter_ms, u128::from(u64::MAX)) as u64;
    let jitter_ms = rand::thread_rng().gen_range(0..=max_jitter_ms);
    delay + Duration::from_millis(jitter_ms)
}

/// Send a request, resending it on transient failures.
///
/// Only for requests that are safe to repeat. The last response is returned
/// as-is once retries are exhausted, so callers still see the failing status.
pub(crate) async fn send_with_retry(
    policy: RetryPolicy,
    mut make_request: impl FnMut() -> reqwest::RequestBuilder,
) -> Result<reqwest::Response, reqwest::Error> {
    let max_attempts = policy.max_retries + 1;
    let mut attempt = 0;

    loop {
        match make_request().send().await {
            Ok(response) => {
                let status = response.status();
                if status.is_success() {
                    return Ok(response);
                }

                if is_retriable_status(status) && attempt < policy.max_retries {
                    let base_delay = policy.delay(attempt);
                    let delay = add_jitter(base_delay);
                    debug!(
                        "HTTP request failed with status {}; retrying in {:?} (base {:?}, attempt {}/{})",
                        status,
                        delay,
                        base_delay,
                        attempt + 1,
                        max_attempts
                    );
                    let _ = response.bytes().await;
                    sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                return Ok(response);
            }
            Err(err) => {
                if is_retriable_send_error(&err) && attempt < policy.max_retries {
                    let base_delay = policy.delay(attempt);
                    let delay = add_jitter(base_delay);
                    debug!(
                        "HTTP request error: {}; retrying in {:?} (base {:?}, attempt {}/{})",
                        err,
                        delay,
                        base_delay,
                        attempt + 1,
                        max_attempts
                    );
                    sleep(delay).await;
                    attempt += 1;
                    continue;
                }

                debug!("HTTP request failed after {} attempt(s): {}", attempt + 1, err);
                return Err(err);
            }
        }
    }
}
