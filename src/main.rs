use moviestore::backend::InMemoryBackend;
use moviestore::catalog::TmdbProvider;
use moviestore::observability::LogMetrics;
use moviestore::{
    CartStore, CatalogCache, CatalogProvider, Error, MovieStoreService, SessionBackend,
    StoreConfig,
};
use std::sync::Arc;

#[tokio::main]
async fn main() -> moviestore::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init()
        .ok();

    let config = StoreConfig::from_env()?;
    log::info!(
        "Starting moviestore {} on {} (upstream {})",
        moviestore::VERSION,
        config.bind_addr,
        config.api_endpoint_url
    );

    let metrics = Arc::new(LogMetrics);
    let catalog = CatalogCache::new(TmdbProvider::new(&config)?).with_metrics(metrics.clone());

    match config.redis_url.clone() {
        #[cfg(feature = "redis")]
        Some(_) => {
            let backend = moviestore::backend::RedisBackend::from_config(&config)?;
            serve(config, catalog, backend).await
        }
        #[cfg(not(feature = "redis"))]
        Some(_) => {
            log::warn!(
                "MOVIESTORE_REDIS_URL is set but the redis feature is disabled; using in-memory session store"
            );
            serve(config, catalog, InMemoryBackend::new()).await
        }
        None => {
            log::info!("Using in-memory session store");
            serve(config, catalog, InMemoryBackend::new()).await
        }
    }
}

async fn serve<P, B>(config: StoreConfig, catalog: CatalogCache<P>, backend: B) -> moviestore::Result<()>
where
    P: CatalogProvider + 'static,
    B: SessionBackend + 'static,
{
    let carts = CartStore::new(backend)
        .with_ttl_policy(config.session_ttl_policy())
        .with_metrics(Arc::new(LogMetrics));
    let service = MovieStoreService::new(catalog, carts, config.hostname.clone());
    let app = moviestore::web::router(service);

    let listener = tokio::net::TcpListener::bind(&config.bind_addr)
        .await
        .map_err(|e| Error::ConfigError(format!("Failed to bind {}: {}", config.bind_addr, e)))?;

    log::info!("Server running on http://{}", config.bind_addr);
    log::info!("Health check: http://{}/healthz", config.bind_addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| Error::Other(format!("Server error: {}", e)))
}
