//! HTTP client with retries driven by a [`RetryPolicy`].
//!
//! Connection errors, timeouts, `429 Too Many Requests` and 5xx responses
//! (except `501 Not Implemented`) are retried. Every other response is
//! returned to the caller untouched.

use crate::config::RetryPolicy;
use crate::error::ClientError;
use reqwest::header::{HeaderMap, RETRY_AFTER};
use reqwest::{Client, IntoUrl, Method, RequestBuilder, Response, StatusCode};
use std::time::Duration;
use tracing::{debug, warn};

/// A `reqwest::Client` that retries failed requests.
#[derive(Debug, Clone)]
pub struct RetryClient {
    inner: Client,
    policy: RetryPolicy,
}

impl RetryClient {
    /// Create a client with default `reqwest` settings.
    pub fn new(policy: RetryPolicy) -> Self {
        Self::with_client(Client::new(), policy)
    }

    /// Wrap an existing client, e.g. one with a custom transport or proxy.
    pub fn with_client(inner: Client, policy: RetryPolicy) -> Self {
        Self { inner, policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// Start building a request.
    pub fn request<U: IntoUrl>(&self, method: Method, url: U) -> RequestBuilder {
        self.inner.request(method, url)
    }

    /// Start building a GET request.
    pub fn get<U: IntoUrl>(&self, url: U) -> RequestBuilder {
        self.inner.get(url)
    }

    /// Send a request, retrying per the policy.
    ///
    /// Requests whose body cannot be cloned (streams) are sent once.
    pub async fn execute(&self, request: RequestBuilder) -> Result<Response, ClientError> {
        let request = request.build()?;
        let method = request.method().to_string();
        let url = request.url().to_string();
        let max_attempts = self.policy.max_attempts();
        let mut attempt: u32 = 0;

        loop {
            let Some(current) = request.try_clone() else {
                debug!(%method, %url, "request body cannot be cloned, sending once");
                return Ok(self.inner.execute(request).await?);
            };

            let (last_error, retry_after) = match self.inner.execute(current).await {
                Ok(response) if !is_retryable_status(response.status()) => return Ok(response),
                Ok(response) => (
                    format!("status {}", response.status()),
                    retry_after(response.status(), response.headers()),
                ),
                Err(err) if is_retryable_error(&err) => (err.to_string(), None),
                Err(err) => return Err(err.into()),
            };

            if attempt >= max_attempts {
                warn!(%method, %url, attempts = attempt + 1, %last_error, "giving up");
                return Err(ClientError::RetriesExhausted {
                    method,
                    url,
                    attempts: attempt + 1,
                    last_error,
                });
            }

            let wait = self.policy.delay_for(attempt, retry_after);
            debug!(
                %method,
                %url,
                retry = attempt + 1,
                max_attempts,
                ?wait,
                %last_error,
                "retrying request"
            );
            tokio::time::sleep(wait).await;
            attempt += 1;
        }
    }
}

fn is_retryable_status(status: StatusCode) -> bool {
    status == StatusCode::TOO_MANY_REQUESTS
        || (status.is_server_error() && status != StatusCode::NOT_IMPLEMENTED)
}

fn is_retryable_error(err: &reqwest::Error) -> bool {
    err.is_connect() || err.is_timeout() || err.is_request()
}

/// Server-requested wait, only read from 429 and 503 responses.
fn retry_after(status: StatusCode, headers: &HeaderMap) -> Option<Duration> {
    if !matches!(
        status,
        StatusCode::TOO_MANY_REQUESTS | StatusCode::SERVICE_UNAVAILABLE
    ) {
        return None;
    }
    headers
        .get(RETRY_AFTER)?
        .to_str()
        .ok()?
        .trim()
        .parse::<u64>()
        .ok()
        .map(Duration::from_secs)
}
