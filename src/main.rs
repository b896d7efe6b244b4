//! groupbuy-gateway server entry point.
//!
//! Starts the Axum HTTP server fronting the pool repricing core.

use std::sync::Arc;
use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing_subscriber::EnvFilter;

use groupbuy_gateway::api;
use groupbuy_gateway::app_state::AppState;
use groupbuy_gateway::config::GatewayConfig;
use groupbuy_gateway::persistence::PostgresPoolStore;
use groupbuy_gateway::service::PricingService;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    // Load configuration
    let config = GatewayConfig::from_env()?;
    tracing::info!(addr = %config.listen_addr, "starting groupbuy-gateway");

    // Connect to Postgres
    let db_pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .min_connections(config.database_min_connections)
        .acquire_timeout(Duration::from_secs(config.database_connect_timeout_secs))
        .connect(&config.database_url)
        .await?;

    if config.migrate_on_start {
        sqlx::migrate!().run(&db_pool).await?;
        tracing::info!("migrations applied");
    }

    // Build service layer
    let store = PostgresPoolStore::new(db_pool);
    let pricing_service = Arc::new(PricingService::new(store));

    // Build application state
    let app_state = AppState { pricing_service };

    // Build router
    let app = api::build_router()
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(app_state);

    // Start server
    let listener = tokio::net::TcpListener::bind(config.listen_addr).await?;
    tracing::info!(addr = %config.listen_addr, "server listening");

    axum::serve(listener, app).await?;

    Ok(())
}
