use anyhow::Result;
use clap::Parser;

mod cli;
mod config;
mod format;
mod report;

use cli::Args;
use config::Config;
use report::Session;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(std::env::var("SIFT_LOG").unwrap_or_else(|_| "sift=info".into()))
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();
    let config = Config::resolve(&args)?;

    tracing::info!(version = env!("CARGO_PKG_VERSION"), reports = ?config.reports, "sift starting");

    let stdout = std::io::stdout();
    let mut session = Session::open(&config, stdout.lock())?;
    session.run_all()
}
