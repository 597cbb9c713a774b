//! Shared HTTP plumbing for the source adapters.

use crate::config::SourceConfig;
use salah_types::SalahError;
use std::time::Duration;

/// Builds the client used by every adapter of one configuration.
///
/// # Errors
///
/// Returns [`SalahError::Transport`] if the client cannot be constructed.
pub fn build_client(config: &SourceConfig) -> Result<reqwest::Client, SalahError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(config.timeout_seconds))
        .user_agent(config.user_agent())
        .build()
        .map_err(|e| SalahError::transport(format!("failed to build HTTP client: {e}")))
}

/// GETs `url` and returns the body text. Non-2xx statuses are failures.
pub async fn fetch_text(client: &reqwest::Client, url: &str) -> Result<String, SalahError> {
    tracing::debug!(url, "fetching prayer table");

    let result = async {
        let response = client
            .get(url)
            .send()
            .await
            .map_err(|e| SalahError::transport(format!("request to {url} failed: {e}")))?
            .error_for_status()
            .map_err(|e| SalahError::transport(format!("{url} answered with an error: {e}")))?;
        response
            .text()
            .await
            .map_err(|e| SalahError::transport(format!("reading {url} failed: {e}")))
    }
    .await;

    match &result {
        Ok(body) => tracing::debug!(url, bytes = body.len(), "prayer table received"),
        Err(err) => tracing::warn!(url, error = %err, "prayer table fetch failed"),
    }
    result
}
