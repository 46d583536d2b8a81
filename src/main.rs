use anyhow::Result;
use tracing_subscriber::EnvFilter;

use fcm_notify::cli::CliApp;

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    CliApp::run().await
}
