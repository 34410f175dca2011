//! Binary entry point: set up logging, parse the command line and hand off to
//! the CLI dispatcher.
mod cli;

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// STUDENT_RECORDS_LOG_FORMAT=json switches log lines to JSON.
const LOG_FORMAT_ENV: &str = "STUDENT_RECORDS_LOG_FORMAT";

fn main() -> anyhow::Result<()> {
    init_tracing();

    let cli = cli::Cli::parse();
    cli::execute(cli)
}

/// Logs go to stderr so report output on stdout stays clean.
fn init_tracing() {
    let log_format = std::env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "text".to_string());

    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "student_records=info".into());

    match log_format.as_str() {
        "json" => {
            tracing_subscriber::registry()
                .with(filter)
                .with(
                    tracing_subscriber::fmt::layer()
                        .json()
                        .with_writer(std::io::stderr),
                )
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(filter)
                .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
                .init();
        }
    }
}
