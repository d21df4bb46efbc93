//! Wallet CLI
//!
//! Command-line interface over a flat-file wallet directory.
//!
//! # Usage
//!
//! ```bash
//! cargo run -- register +992937452945
//! cargo run -- deposit 1 10000
//! cargo run -- pay 1 1500 auto
//! cargo run -- --workers 4 sum
//! cargo run -- history 1 --out history --per-file 100
//! ```
//!
//! Each command loads the data directory (`--data-dir`, default `data`),
//! applies one operation, saves the directory, and prints the result to
//! stdout. Logs go to stderr and are controlled with `RUST_LOG`.
//!
//! # Exit Codes
//!
//! - 0: Success
//! - 1: Error (unknown account, insufficient balance, I/O failure, etc.)

use std::process;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use wallet_service::cli;

fn main() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "wallet_service=warn".into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let args = cli::parse_args();

    let mut output = std::io::stdout();
    if let Err(e) = cli::execute(&args, &mut output) {
        eprintln!("Error: {}", e);
        process::exit(1);
    }
}
