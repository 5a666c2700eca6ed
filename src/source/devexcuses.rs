//! developerexcuses.com page fetcher.
//!
//! Plain GET against the site root — no headers, auth, or query
//! parameters. The site serves one excuse per page load.

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;

use super::ExcuseSource;
use crate::types::FetchError;

const SOURCE_URL: &str = "http://developerexcuses.com";
const SOURCE_NAME: &str = "developerexcuses";

/// HTTP client for the excuse page.
pub struct DevExcuses {
    http: Client,
}

impl DevExcuses {
    /// Build the client once with a bounded timeout so a hung connection
    /// cannot starve later refresh ticks.
    pub fn new(timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("devexcuses/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to build excuse HTTP client")?;
        Ok(Self { http })
    }
}

#[async_trait]
impl ExcuseSource for DevExcuses {
    async fn fetch_page(&self) -> Result<String, FetchError> {
        let resp = self
            .http
            .get(SOURCE_URL)
            .send()
            .await
            .map_err(|e| FetchError::new(format!("request to {SOURCE_URL} failed: {e}")))?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::new(format!(
                "{SOURCE_URL} returned status {status}"
            )));
        }

        let body = resp
            .bytes()
            .await
            .map_err(|e| FetchError::new(format!("failed to read response body: {e}")))?;

        debug!(bytes = body.len(), "Fetched excuse page");

        // Strict decode: a page that is not UTF-8 is a failed fetch, not
        // a garbled quote.
        String::from_utf8(body.to_vec())
            .map_err(|e| FetchError::new(format!("response body is not UTF-8: {e}")))
    }

    fn name(&self) -> &str {
        SOURCE_NAME
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builds() {
        let source = DevExcuses::new(Duration::from_secs(15)).unwrap();
        assert_eq!(source.name(), "developerexcuses");
    }

    #[test]
    fn test_client_builds_with_tiny_timeout() {
        assert!(DevExcuses::new(Duration::from_millis(1)).is_ok());
    }
}
