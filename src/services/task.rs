//! Verification task orchestration
//!
//! [`submit`] normalizes the raw input, hands the verification to the tokio
//! runtime, and returns a handle exposing coarse progress plus exactly one
//! terminal report. The caller's context is never blocked.

use tokio::sync::{oneshot, watch};
use tracing::debug;

use crate::config::Config;
use crate::services::input::{self, InputError};
use crate::services::report;
use crate::services::xtream::verify_account;

/// Progress value set when the task is accepted
pub const PROGRESS_STARTED: u8 = 10;
/// Progress value set once the request sequence has been dispatched
pub const PROGRESS_DISPATCHED: u8 = 50;
/// Progress value set when the terminal report is ready
pub const PROGRESS_COMPLETED: u8 = 100;

/// Raw caller input, before normalization
#[derive(Debug, Clone)]
pub enum VerificationInput {
    Manual {
        host: String,
        username: String,
        password: String,
    },
    M3uUrl {
        url: String,
    },
}

/// Handle to one in-flight verification
///
/// Progress values are advisory UI hints only; the report delivered by
/// [`VerificationHandle::wait`] is the single source of truth.
pub struct VerificationHandle {
    progress: watch::Receiver<u8>,
    report: oneshot::Receiver<String>,
}

impl VerificationHandle {
    /// Watch the coarse progress counter (0-100)
    pub fn progress(&self) -> watch::Receiver<u8> {
        self.progress.clone()
    }

    /// Wait for the terminal report. Resolves exactly once.
    pub async fn wait(self) -> anyhow::Result<String> {
        self.report
            .await
            .map_err(|_| anyhow::anyhow!("verification task ended without a result"))
    }
}

/// Submit a verification request.
///
/// Input validation happens here, before anything is spawned: malformed or
/// insecure-scheme input returns `Err(InputError)` and no network call is
/// made. On success the verification runs on a background task to
/// completion; there is no cancellation.
///
/// Contract: at most one verification may be outstanding per caller session.
/// The task does not enforce single-flight itself.
pub fn submit(input: VerificationInput, config: Config) -> Result<VerificationHandle, InputError> {
    let creds = match &input {
        VerificationInput::Manual {
            host,
            username,
            password,
        } => input::parse_manual(host, username, password)?,
        VerificationInput::M3uUrl { url } => input::parse_m3u(url)?,
    };

    debug!(
        "Verification accepted: host={}, username={}",
        creds.host, creds.username
    );

    let (progress_tx, progress_rx) = watch::channel(PROGRESS_STARTED);
    let (report_tx, report_rx) = oneshot::channel();

    tokio::spawn(async move {
        let _ = progress_tx.send(PROGRESS_DISPATCHED);

        let outcome = verify_account(&creds, &config).await;
        let report = report::format(&outcome);

        let _ = progress_tx.send(PROGRESS_COMPLETED);
        // Receiver may have been dropped; the task still ran to completion
        let _ = report_tx.send(report);
    });

    Ok(VerificationHandle {
        progress: progress_rx,
        report: report_rx,
    })
}
