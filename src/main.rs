use std::{sync::Arc, time::Duration};

use axum::http::HeaderValue;
use tower_http::cors::{Any, CorsLayer};
use tracing_subscriber::EnvFilter;

use cinemate_api::{
    config::{Config, StorageBackend},
    db::{create_metadata_cache, create_pool, run_migrations, MemoryStore, PgStore, Store},
    middleware::TokenKeys,
    routes::{create_router, AppState},
    services::TmdbProvider,
};

/// Allows the configured origin, or any origin when none is set
fn cors_layer(origin: Option<&str>) -> anyhow::Result<CorsLayer> {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    match origin {
        Some(origin) => Ok(layer.allow_origin(origin.parse::<HeaderValue>()?)),
        None => Ok(layer.allow_origin(Any)),
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.storage_backend {
        StorageBackend::Postgres => {
            let pool = create_pool(&config.database_url).await?;
            run_migrations(&pool).await?;
            tracing::info!("Connected to PostgreSQL and applied migrations");
            Arc::new(PgStore::new(pool))
        }
        StorageBackend::Memory => {
            tracing::warn!("Using in-memory storage; data is lost on restart");
            Arc::new(MemoryStore::new())
        }
    };

    let (cache, cache_handle) = match create_metadata_cache(
        &config.redis_url,
        config.metadata_cache_ttl,
        Duration::from_millis(config.cache_timeout_ms),
    )? {
        Some((cache, handle)) => (Some(cache), Some(handle)),
        None => {
            tracing::info!("Metadata caching disabled");
            (None, None)
        }
    };

    let metadata = TmdbProvider::new(
        config.tmdb_api_key.clone(),
        config.tmdb_api_url.clone(),
        Duration::from_secs(config.tmdb_timeout_secs),
        cache,
        config.metadata_cache_ttl,
    )?;

    let state = AppState {
        store,
        metadata: Arc::new(metadata),
        tokens: Arc::new(TokenKeys::new(&config.jwt_secret)),
        outbound_timeout: Duration::from_secs(config.tmdb_timeout_secs),
    };

    let app = create_router(state).layer(cors_layer(config.cors_origin.as_deref())?);

    let listener = tokio::net::TcpListener::bind(config.bind_addr()).await?;
    tracing::info!(addr = %config.bind_addr(), "Server listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }
    Ok(())
}
