// main.rs
mod advice;
mod allocator;
mod analysis;
mod categories;
mod cli;
mod config;
mod conversation;
mod error;
mod format;
mod ledger;
mod shell;
mod store;

use clap::Parser;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

fn main() {
    let args = cli::Args::parse();

    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if args.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    if let Err(e) = cli::run(args) {
        eprintln!("❌ {:#}", e);
        std::process::exit(1);
    }
}
