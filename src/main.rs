// Entrypoint for the CLI application.
// - Keeps `main` small: set up logging, parse flags, run the publish flow.
// - Returns `anyhow::Result` so any failure prints and exits non-zero.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fvtt_autopublish::cli::Cli;

fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "fvtt_autopublish=info".into()),
        ))
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();
    fvtt_autopublish::run(cli)
}
