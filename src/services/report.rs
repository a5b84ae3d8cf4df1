//! Report rendering
//!
//! Turns a [`VerificationOutcome`] into the textual report handed back to the
//! caller. Pure string assembly, no I/O.

use crate::models::{ErrorKind, VerificationOutcome};

/// Trailing attribution line of every success report
const ATTRIBUTION: &str = "Powered by linecheck";

/// Render an outcome as the caller-facing report.
///
/// Success reports list the account fields in fixed order; failures collapse
/// to a single line picked by the error kind.
pub fn format(outcome: &VerificationOutcome) -> String {
    match outcome {
        VerificationOutcome::Success {
            info,
            counts,
            host,
            password,
        } => [
            format!("Status: {}", info.status),
            format!("Username: {}", info.username),
            format!("Password: {}", password),
            format!("Line type: {}", info.line_type),
            format!("Created: {}", info.created_at),
            format!("Expires: {}", info.exp_date),
            format!("Active connections: {}", info.active_connections),
            format!("Max connections: {}", info.max_connections),
            format!("Output formats: {}", info.output_formats),
            format!("Server time: {}", info.server_time),
            format!("Server: http://{}", host),
            format!("Live channels: {}", counts.channels),
            format!("Movies: {}", counts.movies),
            format!("Series: {}", counts.series),
            ATTRIBUTION.to_string(),
        ]
        .join("\n"),

        VerificationOutcome::Failure { kind, detail } => match kind {
            ErrorKind::InvalidInput => format!("Invalid input: {}", detail),
            ErrorKind::Network => format!("SSL error: {}", detail),
            ErrorKind::Auth => format!("Verification failed: {}", detail),
            ErrorKind::Http => format!("Could not verify the IPTV account: {}", detail),
        },
    }
}
