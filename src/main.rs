use clap::Parser;
use tracing::info;
use tracing_subscriber::EnvFilter;
use weekly_gallery::cli::Cli;

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let default_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level)),
        )
        .init();

    info!("Starting weekly-gallery v{}", env!("CARGO_PKG_VERSION"));

    cli.run().await?;

    Ok(())
}
