//! Xtream Codes API Client
//!
//! HTTP client for the player_api.php endpoints used during verification.

use super::types::{Credentials, PlayerApiResponse};
use reqwest::Client;
use serde_json::Value;
use std::time::Duration;
use thiserror::Error;
use tracing::{debug, error};

/// Xtream API error
#[derive(Debug, Error)]
pub enum XtreamError {
    /// Network/connection error
    #[error("network error: {0}")]
    Network(String),
    /// HTTP error (non-2xx status)
    #[error("HTTP error: {0}")]
    Http(u16),
    /// JSON parsing error
    #[error("parse error: {0}")]
    Parse(String),
    /// Response parsed but carried no `user_info`
    #[error("response carried no user_info")]
    MissingUserInfo,
}

/// Xtream API client
///
/// One instance per verification; holds the credentials it was built from.
pub struct XtreamClient {
    http: Client,
    creds: Credentials,
    user_agent: String,
}

impl XtreamClient {
    /// Create a new client with the given request timeout
    pub fn new(
        creds: Credentials,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, XtreamError> {
        let http = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| XtreamError::Network(e.to_string()))?;

        Ok(Self {
            http,
            creds,
            user_agent: user_agent.to_string(),
        })
    }

    /// Make a GET request with optional action parameter, returning raw JSON
    async fn get(&self, action: &str) -> Result<Value, XtreamError> {
        let url = if action.is_empty() {
            self.creds.api_url()
        } else {
            self.creds.action_url(action)
        };

        debug!("Xtream API request: action='{}'", action);

        let response = self
            .http
            .get(&url)
            .header("User-Agent", &self.user_agent)
            .send()
            .await
            .map_err(|e| XtreamError::Network(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(XtreamError::Http(status.as_u16()));
        }

        let text = response
            .text()
            .await
            .map_err(|e| XtreamError::Network(e.to_string()))?;

        serde_json::from_str(&text).map_err(|e| {
            error!(
                "Failed to parse Xtream response for action '{}': {}",
                action, e
            );
            debug!("Response text: {}", truncate_to_boundary(&text, 500));
            XtreamError::Parse(e.to_string())
        })
    }

    /// Get authentication info (the primary player_api.php call)
    ///
    /// Fails with [`XtreamError::MissingUserInfo`] when the provider answers
    /// with a structurally valid but credential-rejecting response.
    pub async fn get_auth(&self) -> Result<PlayerApiResponse, XtreamError> {
        let value = self.get("").await?;
        let response: PlayerApiResponse =
            serde_json::from_value(value).map_err(|e| XtreamError::Parse(e.to_string()))?;

        if response.user_info.is_none() {
            return Err(XtreamError::MissingUserInfo);
        }

        Ok(response)
    }

    /// Count the items behind a secondary action (`get_live_streams`,
    /// `get_vod_streams`, `get_series`).
    ///
    /// Any failure (timeout, non-2xx, malformed JSON, error payload) degrades
    /// to 0 instead of aborting the verification.
    pub async fn count_items(&self, action: &str) -> u64 {
        match self.get(action).await {
            Ok(value) => count_from_value(&value),
            Err(e) => {
                debug!("Count request '{}' failed, using 0: {}", action, e);
                0
            }
        }
    }
}

/// Truncate to at most `max` bytes without splitting a UTF-8 character
fn truncate_to_boundary(text: &str, max: usize) -> &str {
    if text.len() <= max {
        return text;
    }
    let mut end = max;
    while !text.is_char_boundary(end) {
        end -= 1;
    }
    &text[..end]
}

/// Counting rule for action payloads: a list counts its elements, a mapping
/// counts its keys unless it carries an `error` field, anything else is 0.
pub fn count_from_value(value: &Value) -> u64 {
    match value {
        Value::Array(items) => items.len() as u64,
        Value::Object(map) => {
            if map.contains_key("error") {
                0
            } else {
                map.len() as u64
            }
        }
        _ => 0,
    }
}
