use clap::Parser;
use dotenv::dotenv;
use tracing_subscriber::EnvFilter;
use restaurant_review_backend::config::Config;
use restaurant_review_backend::controller;
use restaurant_review_backend::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let config = Config::parse();
    let app_state = AppState::from_config(&config).await?;

    controller::serve(app_state, &config).await
}
