//! Exponential back-off with jitter for chat-completion calls.
//!
//! Only transport failures, rate limiting, and 5xx responses are retried.
//! A malformed or empty answer is returned immediately so the caller can
//! fall back without burning further requests.

use std::future::Future;
use std::time::Duration;

use crate::error::LlmError;

const MAX_DELAY_MS: u64 = 30_000;

pub(crate) fn is_retriable(err: &LlmError) -> bool {
    match err {
        LlmError::Http(e) => {
            e.is_timeout() || e.is_connect() || e.status().is_some_and(|s| s.is_server_error())
        }
        LlmError::Api { status, .. } => *status == 429 || (500..600).contains(status),
        LlmError::EmptyResponse
        | LlmError::MalformedResponse(_)
        | LlmError::Serialize(_)
        | LlmError::Disabled => false,
    }
}

/// Runs `operation`, retrying up to `max_retries` more times on transient errors.
///
/// The delay before retry `n` is `backoff_base_ms * 2^(n-1)` with ±25 % jitter,
/// capped at 30 s.
pub(crate) async fn retry_with_backoff<T, F, Fut>(
    max_retries: u32,
    backoff_base_ms: u64,
    mut operation: F,
) -> Result<T, LlmError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, LlmError>>,
{
    let mut attempt = 0u32;
    loop {
        match operation().await {
            Ok(value) => return Ok(value),
            Err(err) => {
                if !is_retriable(&err) || attempt >= max_retries {
                    return Err(err);
                }
                attempt += 1;
                let computed = backoff_base_ms.saturating_mul(1u64 << (attempt - 1).min(10));
                let capped = computed.min(MAX_DELAY_MS);
                #[allow(
                    clippy::cast_possible_truncation,
                    clippy::cast_sign_loss,
                    clippy::cast_precision_loss
                )]
                let delay_ms = (capped as f64 * (rand::random::<f64>() * 0.5 + 0.75)) as u64;
                tracing::warn!(
                    attempt,
                    max_retries,
                    delay_ms,
                    error = %err,
                    "text service transient error, retrying after back-off"
                );
                tokio::time::sleep(Duration::from_millis(delay_ms)).await;
            }
        }
    }
}
