mod api;
mod config;
mod error;
mod frontend;
mod models;
mod services;

use crate::api::AppState;
use crate::config::{Config, LogFormat};
use crate::services::{LastFmClient, OpenRouterClient, Recommender};
use axum::{
    http::{header, HeaderValue, Method},
    Router,
};
use std::sync::Arc;
use tower_http::{
    compression::CompressionLayer,
    cors::{AllowOrigin, Any, CorsLayer},
    trace::TraceLayer,
};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize tracing
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,song_recommender=debug,tower_http=info".into());
    let registry = tracing_subscriber::registry().with(filter);
    match config.log_format {
        LogFormat::Json => registry.with(tracing_subscriber::fmt::layer().json()).init(),
        LogFormat::Pretty => registry.with(tracing_subscriber::fmt::layer()).init(),
    }
    tracing::info!("Configuration loaded");

    // Initialize services
    let completions = Arc::new(OpenRouterClient::new(&config)?);
    if !completions.is_configured() {
        tracing::warn!("OPENROUTER_API_KEY is not set; recommendation requests will fail");
    }

    let metadata = Arc::new(LastFmClient::new(&config)?);
    if !metadata.is_configured() {
        tracing::info!("LASTFM_API_KEY is not set; Last.fm enrichment disabled");
    }

    let recommender = Arc::new(Recommender::new(
        completions,
        metadata,
        config.trending_country.clone(),
    ));
    let app_state = Arc::new(AppState { recommender });

    // Build router
    let app = build_router(app_state)
        // Middleware
        .layer(CompressionLayer::new())
        .layer(cors_layer(&config)?)
        .layer(TraceLayer::new_for_http());

    // Start server
    let addr = format!("{}:{}", config.server_host, config.server_port);
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn build_router(app_state: Arc<AppState>) -> Router {
    Router::new()
        .merge(api::recommend_routes())
        .with_state(app_state)
        // Landing page - catch-all for every method (must be last)
        .fallback(frontend::serve_frontend)
}

fn cors_layer(config: &Config) -> anyhow::Result<CorsLayer> {
    let origin = if config.allows_any_origin() {
        AllowOrigin::from(Any)
    } else {
        let origins = config
            .cors_origins
            .iter()
            .map(|o| o.parse::<HeaderValue>())
            .collect::<Result<Vec<_>, _>>()
            .map_err(|e| anyhow::anyhow!("Invalid CORS_ORIGINS entry: {}", e))?;
        AllowOrigin::list(origins)
    };

    Ok(CorsLayer::new()
        .allow_origin(origin)
        .allow_methods([Method::GET, Method::POST])
        .allow_headers([header::CONTENT_TYPE]))
}
