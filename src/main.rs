use anyhow::Result;
use talent_sift::{start_web_server, ConfigManager};
use tracing::info;

use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::{fmt, EnvFilter};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("talent_sift=info,rocket::server=off")),
        )
        .init();

    let config = ConfigManager::load()?;
    config.ensure_directories().await?;

    info!("Starting talentsift resume screening API");
    info!(
        "Environment: {}",
        std::env::var("ENVIRONMENT").unwrap_or_else(|_| "local".to_string())
    );
    info!(
        "Database: {}",
        config.environment.database_path.display()
    );

    start_web_server(config).await
}
