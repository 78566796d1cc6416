//! HTTP client for the remote intent classifier
//!
//! Every failure mode (transport, timeout, status, payload) collapses to
//! `None` so callers can fall back to local rules.

use std::time::Duration;

use reqwest::Client;
use serde_json::Value;
use tracing::debug;

use super::protocol::{InterpretRequest, InterpretResponse};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for `POST <base>/interpret`
pub struct ClassifierClient {
    client: Client,
    /// Base URL without trailing slash; empty disables the client
    base_url: String,
    api_key: String,
}

impl ClassifierClient {
    /// Create a new classifier client
    pub fn new(base_url: &str, api_key: &str) -> reqwest::Result<Self> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            api_key: api_key.to_string(),
        })
    }

    /// Whether a base URL is configured
    pub fn is_enabled(&self) -> bool {
        !self.base_url.is_empty()
    }

    /// Ask the service to classify `text`; `None` means unavailable
    pub async fn interpret(&self, text: &str, context: &Value) -> Option<InterpretResponse> {
        if !self.is_enabled() {
            return None;
        }

        let url = format!("{}/interpret", self.base_url);
        let request = self
            .client
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(&InterpretRequest { text, context });

        let response = match request.send().await {
            Ok(response) => response,
            Err(e) => {
                debug!(error = %e, "classifier unreachable");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(status = %response.status(), "classifier returned error status");
            return None;
        }

        match response.json::<InterpretResponse>().await {
            Ok(parsed) => {
                debug!(intent = %parsed.intent, "classifier result");
                Some(parsed)
            }
            Err(e) => {
                debug!(error = %e, "classifier returned malformed payload");
                None
            }
        }
    }
}
