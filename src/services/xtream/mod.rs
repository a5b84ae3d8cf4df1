//! Xtream Codes Integration
//!
//! Verification client for IPTV control panels following the Xtream Codes
//! Player API convention.
//!
//! # Overview
//!
//! A subscriber line is identified by host + username + password, and the
//! panel answers query-parameter-authenticated GETs:
//!
//! ```text
//! http://server:port/player_api.php?username=X&password=Y           -> account info
//! http://server:port/player_api.php?...&action=get_live_streams    -> channel catalog
//! http://server:port/player_api.php?...&action=get_vod_streams     -> movie catalog
//! http://server:port/player_api.php?...&action=get_series          -> series catalog
//! ```
//!
//! [`verify_account`] drives all four calls and folds the answers into a
//! single [`crate::models::VerificationOutcome`].

pub mod client;
pub mod types;
pub mod verifier;

// Re-exports for convenience
pub use types::Credentials;
pub use verifier::verify_account;
