mod app;
mod config;
mod error;
mod generator;
mod images;
mod recipes;
mod state;
mod store;
mod telemetry;

use anyhow::Context;

use crate::config::AppConfig;
use crate::state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    telemetry::init_tracing();

    let config = AppConfig::from_env().context("invalid configuration")?;
    let addr = config.listen_addr()?;
    tracing::info!(
        app_id = %config.app_id,
        generator = config.generator_kind(),
        images = ?config.image_resolver,
        "configuration loaded"
    );

    let state = AppState::init(config).await?;
    app::serve(app::build_app(state), addr).await
}
