use clap::Parser;
use exapp::{Config, app};

/// Main entry point for the ExApp server
///
/// Reads the configuration from flags or the environment, sets up logging
/// (`RUST_LOG`, `info` by default) and serves until the process is stopped.
#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::parse();
    log::info!("Using Nextcloud at {}", config.nextcloud_url);

    app::run(config).await
}
