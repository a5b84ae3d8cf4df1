use serde::Serialize;

/// Account metadata extracted from the provider's `user_info` object,
/// with display sentinels already applied for absent fields
#[derive(Debug, Clone, Serialize)]
pub struct AccountInfo {
    pub status: String,
    pub username: String,
    pub line_type: String,
    /// Creation timestamp rendered as `dd/mm/yyyy HH:MM:SS` local time,
    /// or "invalid date"
    pub created_at: String,
    /// Expiry timestamp, same rendering as `created_at`
    pub exp_date: String,
    pub active_connections: String,
    pub max_connections: String,
    pub output_formats: String,
    pub server_time: String,
}

/// Catalog sizes reported by the provider's action endpoints.
///
/// A count is 0 whenever its call failed, timed out, or returned an
/// error payload; those failures never abort the verification.
#[derive(Debug, Clone, Copy, Default, Serialize)]
pub struct ItemCounts {
    pub channels: u64,
    pub movies: u64,
    pub series: u64,
}

/// Failure classification for a verification attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ErrorKind {
    /// Malformed or missing input, detected before any network call
    InvalidInput,
    /// Encrypted-connection attempt against a plain-HTTP-only provider
    Network,
    /// Wrong credentials, or any unclassified failure
    Auth,
    /// Any other transport or HTTP-layer failure
    Http,
}

/// Terminal result of one verification
#[derive(Debug, Clone)]
pub enum VerificationOutcome {
    Success {
        info: AccountInfo,
        counts: ItemCounts,
        /// Scheme-less host the account was verified against
        host: String,
        /// Password echoed back so the caller can confirm what was tested
        password: String,
    },
    Failure {
        kind: ErrorKind,
        detail: String,
    },
}
