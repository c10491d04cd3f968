use clap::Parser;
use micropost_accounts::cli::{self, Cli};
use micropost_accounts::infrastructure::logging;
use micropost_accounts::AppConfig;
use tracing::warn;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    let loaded = AppConfig::load();
    let config = loaded.as_ref().cloned().unwrap_or_default();
    logging::init_logging(&config.logging);

    if let Err(e) = loaded {
        warn!(error = %e, "Failed to load configuration, using defaults");
    }

    cli::run(cli, &config).await
}
