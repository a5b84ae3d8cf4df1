//! Account verification against the player_api.php endpoint
//!
//! Issues the primary authentication call, degrades the three catalog count
//! calls independently, and classifies every failure into the caller-facing
//! error taxonomy.

use chrono::{Local, LocalResult, TimeZone};
use std::time::Duration;
use tracing::{info, warn};

use super::client::{XtreamClient, XtreamError};
use super::types::{Credentials, UserInfo};
use crate::config::Config;
use crate::models::{AccountInfo, ErrorKind, ItemCounts, VerificationOutcome};

/// Verify an account and produce exactly one terminal outcome.
///
/// The three count calls run concurrently and never fail the verification;
/// only the primary call's failures are classified into a `Failure` outcome.
pub async fn verify_account(creds: &Credentials, config: &Config) -> VerificationOutcome {
    let timeout = Duration::from_millis(config.request_timeout_ms);

    let client = match XtreamClient::new(creds.clone(), timeout, &config.user_agent) {
        Ok(client) => client,
        Err(e) => return failure_from(&e),
    };

    let auth = match client.get_auth().await {
        Ok(auth) => auth,
        Err(e) => return failure_from(&e),
    };

    // get_auth guarantees user_info is present
    let user_info = auth.user_info.unwrap_or_default();

    let (channels, movies, series) = tokio::join!(
        client.count_items("get_live_streams"),
        client.count_items("get_vod_streams"),
        client.count_items("get_series"),
    );
    let counts = ItemCounts {
        channels,
        movies,
        series,
    };

    let info = build_account_info(&user_info);

    info!(
        "Account verified: username={}, status={}, expires={}",
        info.username, info.status, info.exp_date
    );

    VerificationOutcome::Success {
        info,
        counts,
        host: creds.host.clone(),
        password: creds.password.clone(),
    }
}

/// Map an API error onto the caller-facing taxonomy.
///
/// Anything that is not an encrypted-connection attempt or an explicit HTTP
/// status collapses into "incorrect username or password". That conflation
/// matches the original checker's behavior and can mask genuine defects
/// (e.g. a provider sending unparseable JSON); the warn log keeps the real
/// cause observable.
fn failure_from(err: &XtreamError) -> VerificationOutcome {
    warn!("Verification failed: {}", err);

    let (kind, detail) = match err {
        XtreamError::Network(msg) if is_tls_failure(msg) => {
            (ErrorKind::Network, "use http instead of https".to_string())
        }
        XtreamError::Http(404) => (ErrorKind::Auth, "incorrect username or password".to_string()),
        XtreamError::Http(code) => (ErrorKind::Http, format!("HTTP status {}", code)),
        XtreamError::Network(msg) => (ErrorKind::Http, msg.clone()),
        XtreamError::Parse(_) | XtreamError::MissingUserInfo => {
            (ErrorKind::Auth, "incorrect username or password".to_string())
        }
    };

    VerificationOutcome::Failure { kind, detail }
}

/// Does a transport error message indicate an SSL/TLS negotiation attempt?
fn is_tls_failure(msg: &str) -> bool {
    let msg = msg.to_lowercase();
    ["ssl", "tls", "certificate", "https"]
        .iter()
        .any(|needle| msg.contains(needle))
}

fn build_account_info(user_info: &UserInfo) -> AccountInfo {
    let field = |value: &Option<String>, default: &str| {
        value.clone().unwrap_or_else(|| default.to_string())
    };

    AccountInfo {
        status: field(&user_info.status, "Unknown"),
        username: field(&user_info.username, "Unknown"),
        line_type: field(&user_info.line_type, "Unknown"),
        created_at: format_timestamp(user_info.created_at.as_deref().unwrap_or("0")),
        exp_date: format_timestamp(user_info.exp_date.as_deref().unwrap_or("0")),
        active_connections: field(&user_info.active_cons, "0"),
        max_connections: field(&user_info.max_connections, "0"),
        output_formats: field(&user_info.output_formats, "N/A"),
        server_time: field(&user_info.server_time, "N/A"),
    }
}

/// Render epoch seconds as `dd/mm/yyyy HH:MM:SS` local time.
///
/// Non-numeric or out-of-range values render as "invalid date" rather than
/// failing the verification.
pub fn format_timestamp(raw: &str) -> String {
    let Ok(secs) = raw.trim().parse::<i64>() else {
        return "invalid date".to_string();
    };

    match Local.timestamp_opt(secs, 0) {
        LocalResult::Single(dt) | LocalResult::Ambiguous(dt, _) => {
            dt.format("%d/%m/%Y %H:%M:%S").to_string()
        }
        LocalResult::None => "invalid date".to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    /// Minimal panel on loopback: serves `primary_body` for the bare
    /// player_api.php call and HTTP 500 for every `action=` call.
    async fn spawn_panel(primary_body: &'static str) -> String {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();

        tokio::spawn(async move {
            while let Ok((mut sock, _)) = listener.accept().await {
                tokio::spawn(async move {
                    let mut buf = vec![0u8; 4096];
                    let n = sock.read(&mut buf).await.unwrap_or(0);
                    let request = String::from_utf8_lossy(&buf[..n]).to_string();

                    let response = if request.contains("action=") {
                        "HTTP/1.1 500 Internal Server Error\r\ncontent-length: 0\r\nconnection: close\r\n\r\n"
                            .to_string()
                    } else {
                        format!(
                            "HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: {}\r\nconnection: close\r\n\r\n{}",
                            primary_body.len(),
                            primary_body
                        )
                    };
                    let _ = sock.write_all(response.as_bytes()).await;
                });
            }
        });

        format!("127.0.0.1:{}", addr.port())
    }

    #[tokio::test]
    async fn test_failed_count_calls_do_not_fail_verification() {
        let host = spawn_panel(
            r#"{"user_info":{"status":"Active","username":"bob","created_at":"0","exp_date":"2000000000"}}"#,
        )
        .await;
        let creds = Credentials {
            host,
            username: "bob".to_string(),
            password: "secret".to_string(),
        };

        let outcome = verify_account(&creds, &Config::from_env()).await;
        match outcome {
            VerificationOutcome::Success { info, counts, .. } => {
                assert_eq!(info.status, "Active");
                assert_eq!(info.username, "bob");
                assert_ne!(info.created_at, "invalid date");
                assert_eq!(counts.channels, 0);
                assert_eq!(counts.movies, 0);
                assert_eq!(counts.series, 0);
            }
            VerificationOutcome::Failure { kind, detail } => {
                panic!("expected success, got {:?}: {}", kind, detail)
            }
        }
    }

    #[tokio::test]
    async fn test_missing_user_info_is_bad_credentials() {
        let host = spawn_panel(r#"{"user_info":null}"#).await;
        let creds = Credentials {
            host,
            username: "bob".to_string(),
            password: "wrong".to_string(),
        };

        let outcome = verify_account(&creds, &Config::from_env()).await;
        let (kind, detail) = kind_of(outcome);
        assert_eq!(kind, ErrorKind::Auth);
        assert_eq!(detail, "incorrect username or password");
    }

    fn kind_of(outcome: VerificationOutcome) -> (ErrorKind, String) {
        match outcome {
            VerificationOutcome::Failure { kind, detail } => (kind, detail),
            VerificationOutcome::Success { .. } => panic!("expected failure"),
        }
    }

    #[test]
    fn test_classify_tls_failure() {
        let err = XtreamError::Network("error trying to connect: invalid peer certificate".into());
        let (kind, detail) = kind_of(failure_from(&err));
        assert_eq!(kind, ErrorKind::Network);
        assert_eq!(detail, "use http instead of https");
    }

    #[test]
    fn test_classify_404_as_bad_credentials() {
        let (kind, detail) = kind_of(failure_from(&XtreamError::Http(404)));
        assert_eq!(kind, ErrorKind::Auth);
        assert_eq!(detail, "incorrect username or password");
    }

    #[test]
    fn test_classify_other_http_status() {
        let (kind, detail) = kind_of(failure_from(&XtreamError::Http(500)));
        assert_eq!(kind, ErrorKind::Http);
        assert!(detail.contains("500"));
    }

    #[test]
    fn test_classify_plain_transport_error() {
        let err = XtreamError::Network("connection refused".into());
        let (kind, detail) = kind_of(failure_from(&err));
        assert_eq!(kind, ErrorKind::Http);
        assert_eq!(detail, "connection refused");
    }

    #[test]
    fn test_classify_parse_and_missing_user_info_as_bad_credentials() {
        let (kind, _) = kind_of(failure_from(&XtreamError::Parse("eof".into())));
        assert_eq!(kind, ErrorKind::Auth);

        let (kind, detail) = kind_of(failure_from(&XtreamError::MissingUserInfo));
        assert_eq!(kind, ErrorKind::Auth);
        assert_eq!(detail, "incorrect username or password");
    }

    #[test]
    fn test_format_timestamp_numeric() {
        // Exact rendering depends on the local timezone; it must at least be
        // a formatted date, not the sentinel.
        let rendered = format_timestamp("2000000000");
        assert_ne!(rendered, "invalid date");
        assert_eq!(rendered.len(), "18/05/2033 03:33:20".len());

        assert_ne!(format_timestamp("0"), "invalid date");
    }

    #[test]
    fn test_format_timestamp_garbage() {
        assert_eq!(format_timestamp("soon"), "invalid date");
        assert_eq!(format_timestamp(""), "invalid date");
        assert_eq!(format_timestamp("12.5"), "invalid date");
        // Far outside chrono's representable range
        assert_eq!(format_timestamp("9999999999999999"), "invalid date");
    }

    #[test]
    fn test_build_account_info_defaults() {
        let info = build_account_info(&UserInfo::default());
        assert_eq!(info.status, "Unknown");
        assert_eq!(info.username, "Unknown");
        assert_eq!(info.line_type, "Unknown");
        assert_eq!(info.active_connections, "0");
        assert_eq!(info.max_connections, "0");
        assert_eq!(info.output_formats, "N/A");
        assert_eq!(info.server_time, "N/A");
        // Absent timestamps fall back to epoch zero, like the classic checkers
        assert_ne!(info.created_at, "invalid date");
    }
}
