//! CLI entry point for the stamp painting generator

use clap::Parser;
use stampede::io::cli::{Cli, Runner};

fn main() -> stampede::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut runner = Runner::new(cli);
    runner.run()
}
