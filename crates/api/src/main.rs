//! Givebox API Server

use std::sync::Arc;

use db::PgStore;
use moderation::ModerationService;
use revalidate::{HttpRevalidator, NoopRevalidator, Revalidator};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

mod auth;
mod error;
mod routes;
mod state;

use state::AppState;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("givebox=debug".parse()?)
                .add_directive("api=debug".parse()?),
        )
        .init();

    info!("Starting Givebox API");

    let config = common::Config::from_env()?;

    let pool = db::create_pool(&config.database_url, config.db_max_connections).await?;
    db::run_migrations(&pool).await?;

    let revalidator: Arc<dyn Revalidator> = match &config.revalidate_url {
        Some(url) => {
            info!("Revalidation webhook: {}", url);
            Arc::new(HttpRevalidator::new(url.clone(), config.revalidate_secret.clone()))
        }
        None => {
            warn!("REVALIDATE_URL not set, cached pages will not be refreshed");
            Arc::new(NoopRevalidator)
        }
    };

    let moderation = ModerationService::new(Arc::new(PgStore::new(pool)), revalidator);
    let state = Arc::new(AppState::new(&config, moderation));

    let app = routes::router(state)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http());

    let addr = format!("{}:{}", config.host, config.port);
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
