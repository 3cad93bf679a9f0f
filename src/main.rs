use anyhow::Result;
use i18n_router::{config, server};
use tracing::info;

#[tokio::main]
async fn main() -> Result<()> {
    // Load .env file (ignored in production)
    let _ = dotenvy::dotenv();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("i18n_router=info".parse()?),
        )
        .init();

    info!("Starting i18n router");

    // Load configuration from environment; invalid locale config is fatal
    let config = config::Config::from_env()?;

    server::serve(config).await
}
