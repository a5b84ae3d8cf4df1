//! Xtream Codes API Types
//!
//! Type definitions for the player_api.php requests and responses.

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Normalized account credentials
///
/// `host` never carries a URI scheme; the API is addressed over plain HTTP.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    /// Host with optional port (e.g., "example.com:8080")
    pub host: String,
    /// Username for authentication
    pub username: String,
    /// Password for authentication
    pub password: String,
}

impl Credentials {
    /// Build the player_api.php base URL
    pub fn api_url(&self) -> String {
        format!(
            "http://{}/player_api.php?username={}&password={}",
            self.host, self.username, self.password
        )
    }

    /// Build the player_api.php URL for a secondary action
    pub fn action_url(&self, action: &str) -> String {
        format!("{}&action={}", self.api_url(), action)
    }
}

/// Main response from player_api.php (no action)
///
/// A structurally valid response that lacks `user_info` is how providers
/// reject bad credentials, so the field stays optional here and the caller
/// decides what its absence means.
#[derive(Debug, Deserialize, Clone)]
pub struct PlayerApiResponse {
    #[serde(default)]
    pub user_info: Option<UserInfo>,
}

/// User account information
///
/// Providers are inconsistent about scalar types (numbers vs. strings per
/// field, sometimes per server version), so every field goes through a
/// tolerant deserializer and lands as a display string.
#[derive(Debug, Deserialize, Serialize, Clone, Default)]
pub struct UserInfo {
    #[serde(default, deserialize_with = "flexible_string")]
    pub status: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub username: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub line_type: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub created_at: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub exp_date: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub active_cons: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub max_connections: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub output_formats: Option<String>,
    #[serde(default, deserialize_with = "flexible_string")]
    pub server_time: Option<String>,
}

/// Deserialize a string, number, bool, or list of those into a display string
fn flexible_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(value_to_display))
}

fn value_to_display(value: Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Array(items) => Some(
            items
                .into_iter()
                .filter_map(value_to_display)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        Value::Object(_) => None,
    }
}
