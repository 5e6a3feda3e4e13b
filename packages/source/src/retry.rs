//! HTTP retry helper for transient errors.
//!
//! Snapshot and live fetchers go through [`send_json`] instead of calling
//! `reqwest::RequestBuilder::send()` directly, so connection failures,
//! timeouts, HTTP 429 and 5xx responses get retried with exponential
//! backoff. Other non-success statuses fail immediately.

use std::time::Duration;

use crate::SourceError;

/// Maximum number of retry attempts for transient HTTP errors.
///
/// With exponential backoff (1s, 2s, 4s) the total wait before giving up
/// is 7 seconds.
const MAX_RETRIES: u32 = 3;

/// Sends an HTTP request and parses the response body as JSON.
///
/// The `build_request` closure is called on each attempt to construct a
/// fresh [`reqwest::RequestBuilder`], since builders are consumed by
/// `.send()`.
///
/// # Errors
///
/// Returns [`SourceError::Status`] for a non-success status (after
/// retries for 429/5xx), [`SourceError::Http`] if the request fails after
/// all retries, or [`SourceError::Json`] if the body is not JSON.
#[allow(clippy::future_not_send)]
pub async fn send_json<F>(build_request: F) -> Result<serde_json::Value, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let response = send_inner(&build_request, MAX_RETRIES).await?;
    let text = response.text().await?;
    Ok(serde_json::from_str(&text)?)
}

#[allow(clippy::future_not_send)]
async fn send_inner<F>(build_request: &F, max_retries: u32) -> Result<reqwest::Response, SourceError>
where
    F: Fn() -> reqwest::RequestBuilder,
{
    let mut attempt = 0;
    loop {
        if attempt > 0 {
            let delay = Duration::from_secs(1u64 << (attempt - 1));
            log::warn!("  retry {attempt}/{max_retries} in {delay:?}...");
            tokio::time::sleep(delay).await;
        }

        match build_request().send().await {
            Err(e) if is_transient(&e) && attempt < max_retries => {
                log::warn!("  transient error: {e}");
            }
            Err(e) => return Err(SourceError::Http(e)),
            Ok(response) if response.status().is_success() => return Ok(response),
            Ok(response) => {
                let status = response.status();
                if is_retryable_status(status) && attempt < max_retries {
                    log::warn!("  HTTP {status} from {}", response.url());
                } else {
                    return Err(SourceError::Status {
                        url: response.url().to_string(),
                        status: status.as_u16(),
                    });
                }
            }
        }

        attempt += 1;
    }
}

/// Returns `true` if the error is likely transient and worth retrying.
fn is_transient(e: &reqwest::Error) -> bool {
    e.is_timeout() || e.is_connect() || e.is_body()
}

/// Rate limiting and server errors are retried; other statuses are final.
fn is_retryable_status(status: reqwest::StatusCode) -> bool {
    status == reqwest::StatusCode::TOO_MANY_REQUESTS || status.is_server_error()
}
