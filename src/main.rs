mod config;
mod models;
mod services;

use std::env;
use std::process::ExitCode;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::config::Config;
use crate::models::{ErrorKind, VerificationOutcome};
use crate::services::report;
use crate::services::task::{self, VerificationInput};

fn usage(program: &str) -> String {
    format!(
        "usage:\n  {program} manual <host> <username> <password>\n  {program} m3u <url>"
    )
}

#[tokio::main]
async fn main() -> ExitCode {
    // Load environment variables
    dotenvy::dotenv().ok();

    // Initialize tracing/logging
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "linecheck=info".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();

    let args: Vec<String> = env::args().collect();
    let program = args.first().map(String::as_str).unwrap_or("linecheck");

    let input = match args.get(1).map(String::as_str) {
        Some("manual") if args.len() == 5 => VerificationInput::Manual {
            host: args[2].clone(),
            username: args[3].clone(),
            password: args[4].clone(),
        },
        Some("m3u") if args.len() == 3 => VerificationInput::M3uUrl {
            url: args[2].clone(),
        },
        _ => {
            eprintln!("{}", usage(program));
            return ExitCode::from(1);
        }
    };

    tracing::info!("linecheck v{}", env!("CARGO_PKG_VERSION"));

    let config = Config::from_env();
    let handle = match task::submit(input, config) {
        Ok(handle) => handle,
        Err(e) => {
            // Input failures never reach the verifier; render them through
            // the same single-line report path as every other failure
            let outcome = VerificationOutcome::Failure {
                kind: ErrorKind::InvalidInput,
                detail: e.to_string(),
            };
            eprintln!("{}", report::format(&outcome));
            return ExitCode::from(2);
        }
    };

    // Forward progress changes to the log; purely advisory
    let mut progress = handle.progress();
    tokio::spawn(async move {
        while progress.changed().await.is_ok() {
            tracing::info!("progress: {}%", *progress.borrow());
        }
    });

    match handle.wait().await {
        Ok(report) => {
            // A failure report is still a report; the process succeeded at
            // producing an answer
            println!("{}", report);
            ExitCode::SUCCESS
        }
        Err(e) => {
            eprintln!("{}", e);
            ExitCode::from(1)
        }
    }
}
