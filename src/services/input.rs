//! Input normalization
//!
//! Turns the two supported input forms (manual host/username/password and an
//! M3U playlist URL) into a single [`Credentials`] value. The provider API is
//! plain HTTP only, so any `https` input is rejected here, before a network
//! call could fail with an opaque transport error.

use lazy_static::lazy_static;
use regex::Regex;
use thiserror::Error;
use tracing::debug;

use crate::services::xtream::Credentials;

lazy_static! {
    /// Xtream-style M3U playlist URL: `http://server:port/get.php?username=X&password=Y&...`
    static ref M3U_URL_REGEX: Regex =
        Regex::new(r"(http[s]?://[^/]+)/get\.php\?username=([^&]+)&password=([^&]+)").unwrap();
}

/// Input validation failure. The message is shown to the caller verbatim.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum InputError {
    #[error("remove the 's' from https (plain http only)")]
    HttpsNotSupported,
    #[error("host, username and password are all required")]
    MissingFields,
    #[error("invalid M3U URL")]
    InvalidM3uUrl,
}

/// Normalize manually entered host, username and password.
///
/// Strips a leading `http://`/`https://` and any trailing `/` from the host.
/// Rejects hosts supplied with an `https` scheme and empty fields.
pub fn parse_manual(host: &str, username: &str, password: &str) -> Result<Credentials, InputError> {
    let host = host.trim();
    if host.starts_with("https") {
        return Err(InputError::HttpsNotSupported);
    }

    let host = host
        .trim_start_matches("http://")
        .trim_end_matches('/')
        .to_string();
    let username = username.trim().to_string();
    let password = password.trim().to_string();

    if host.is_empty() || username.is_empty() || password.is_empty() {
        return Err(InputError::MissingFields);
    }

    Ok(Credentials {
        host,
        username,
        password,
    })
}

/// Extract credentials from an M3U playlist URL.
///
/// The URL must match the Xtream `get.php` pattern; extra query parameters
/// after the password (`&type=m3u_plus&output=ts`, ...) are ignored.
pub fn parse_m3u(url: &str) -> Result<Credentials, InputError> {
    let url = url.trim();

    let caps = M3U_URL_REGEX.captures(url).ok_or_else(|| {
        debug!("URL does not match the get.php pattern: {}", url);
        InputError::InvalidM3uUrl
    })?;

    if url.starts_with("https") {
        return Err(InputError::HttpsNotSupported);
    }

    let host = caps[1]
        .trim_start_matches("http://")
        .trim_start_matches("https://")
        .to_string();

    Ok(Credentials {
        host,
        username: caps[2].to_string(),
        password: caps[3].to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_plain_host() {
        let creds = parse_manual("panel.example.com", "bob", "secret").unwrap();
        assert_eq!(creds.host, "panel.example.com");
        assert_eq!(creds.username, "bob");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_manual_strips_scheme_and_slash() {
        let creds = parse_manual("http://panel.example.com:8080/", "bob", "secret").unwrap();
        assert_eq!(creds.host, "panel.example.com:8080");
    }

    #[test]
    fn test_manual_rejects_https() {
        assert_eq!(
            parse_manual("https://panel.example.com", "bob", "secret"),
            Err(InputError::HttpsNotSupported)
        );
    }

    #[test]
    fn test_manual_rejects_empty_fields() {
        assert_eq!(
            parse_manual("panel.example.com", "  ", "secret"),
            Err(InputError::MissingFields)
        );
        assert_eq!(
            parse_manual("  ", "bob", "secret"),
            Err(InputError::MissingFields)
        );
        assert_eq!(
            parse_manual("panel.example.com", "bob", ""),
            Err(InputError::MissingFields)
        );
        // A bare scheme strips down to nothing
        assert_eq!(
            parse_manual("http://", "bob", "secret"),
            Err(InputError::MissingFields)
        );
    }

    #[test]
    fn test_m3u_valid() {
        let creds = parse_m3u(
            "http://panel.example.com/get.php?username=bob&password=secret&type=m3u_plus",
        )
        .unwrap();
        assert_eq!(creds.host, "panel.example.com");
        assert_eq!(creds.username, "bob");
        assert_eq!(creds.password, "secret");
    }

    #[test]
    fn test_m3u_with_port() {
        let creds =
            parse_m3u("http://example.com:8080/get.php?username=u&password=p").unwrap();
        assert_eq!(creds.host, "example.com:8080");
    }

    #[test]
    fn test_m3u_rejects_https() {
        assert_eq!(
            parse_m3u("https://panel.example.com/get.php?username=bob&password=secret"),
            Err(InputError::HttpsNotSupported)
        );
    }

    #[test]
    fn test_m3u_rejects_missing_get_php() {
        assert_eq!(
            parse_m3u("http://panel.example.com/playlist.m3u"),
            Err(InputError::InvalidM3uUrl)
        );
        assert_eq!(
            parse_m3u("http://example.com/api/streams?username=u&password=p"),
            Err(InputError::InvalidM3uUrl)
        );
    }

    #[test]
    fn test_m3u_rejects_missing_params() {
        assert_eq!(
            parse_m3u("http://example.com/get.php?username=bob"),
            Err(InputError::InvalidM3uUrl)
        );
    }
}
