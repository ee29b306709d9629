use anyhow::Context;
use clap::Parser;

use doctor_listing::{browse, cli, fetch, render};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let args = cli::Args::parse();
    let config = args.listing_config();

    match args.cmd {
        cli::Command::Fetch(cmd) => fetch::run(config, cmd).await.context("fetch failed"),
        cli::Command::Browse => browse::run(config).await.context("browse failed"),
        cli::Command::Options => {
            print!("{}", render::render_options());
            Ok(())
        }
    }
}
