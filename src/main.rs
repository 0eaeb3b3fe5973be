//! Weather assistant - HTTP server entry point.

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use weather_assistant::{api, config::Config};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Environment file first, so the config loader sees its variables.
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "weather_assistant=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Fatal before any request is served when a required key is missing.
    let config = Config::from_env()?;
    tracing::info!("Loaded configuration: model={}", config.model);

    api::serve(config).await?;

    Ok(())
}
