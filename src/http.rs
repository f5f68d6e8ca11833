//! Shared HTTP client with timeout and transient-failure retries

use std::time::Duration;

use anyhow::{Context, Result};
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::{RetryTransientMiddleware, policies::ExponentialBackoff};
use serde::de::DeserializeOwned;
use thiserror::Error;

use crate::config::HttpConfig;

pub type HttpClient = ClientWithMiddleware;

/// Build the client every provider shares.
///
/// Only transient failures (connect errors, timeouts, 5xx, 429) are retried;
/// a "not found" answer from a service comes back on the first attempt.
pub fn build_client(config: &HttpConfig) -> Result<HttpClient> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds.into()))
        .user_agent(config.user_agent.clone())
        .build()
        .with_context(|| "Failed to create HTTP client")?;

    let mut builder = ClientBuilder::new(client);
    if config.max_retries > 0 {
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(config.max_retries);
        builder = builder.with(RetryTransientMiddleware::new_with_policy(retry_policy));
    }
    Ok(builder.build())
}

/// Outcome of a GET that expects a JSON body
#[derive(Error, Debug)]
pub(crate) enum FetchError {
    /// Request never produced a response (DNS, connect, timeout)
    #[error("request failed: {0}")]
    Transport(String),
    /// Service answered with a non-success status
    #[error("HTTP {0}: {1}")]
    Status(reqwest::StatusCode, String),
    /// Body did not match the expected shape
    #[error("invalid response: {0}")]
    Decode(String),
}

pub(crate) async fn get_json<T: DeserializeOwned>(
    client: &HttpClient,
    url: &str,
) -> std::result::Result<T, FetchError> {
    tracing::debug!("GET {}", url);
    let response = client
        .get(url)
        .send()
        .await
        .map_err(|e| FetchError::Transport(e.to_string()))?;

    let status = response.status();
    if !status.is_success() {
        let body = response.text().await.unwrap_or_default();
        return Err(FetchError::Status(status, body));
    }

    response
        .json::<T>()
        .await
        .map_err(|e| FetchError::Decode(e.to_string()))
}
