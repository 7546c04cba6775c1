use anyhow::Context;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tut_api::{ApiConfig, ApiState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration from environment variables
    dotenvy::dotenv().ok();
    let config = ApiConfig::from_env().context("missing required environment variables")?;

    tut_api::tracing::init_tracing(&config.env);

    // Connect to the database and run migrations
    let pool = tut_db::create_pool(&config.database_url, 10).await?;
    tut_db::ensure_db_and_migrate(&config.database_url, &pool).await?;

    // Prometheus exporter
    let metrics_handle = tut_api::metrics::init_metrics()?;

    let port = config.port;
    let state = ApiState::new(config, pool);

    // Create the application router
    let app = tut_api::router::router()
        .with_state(state)
        .layer(axum::middleware::from_fn(tut_api::metrics::track_metrics))
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::very_permissive())
        .route(
            "/metrics",
            axum::routing::get(tut_api::metrics::metrics_handler).with_state(metrics_handle),
        );

    // Start the server
    let listener = tokio::net::TcpListener::bind(("0.0.0.0", port)).await?;
    tracing::info!("Server running on http://{}", listener.local_addr()?);
    axum::serve(listener, app).await?;

    Ok(())
}
