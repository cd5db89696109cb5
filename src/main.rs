use std::{sync::Arc, time::Duration};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use moodplate_api::{
    api::{create_router, AppState},
    config::Config,
    db::{create_redis_client, Cache, CacheWriterHandle},
    services::{
        providers::{FoursquareProvider, OpenTripMapProvider, PlaceProvider},
        EngineSettings, LocalCatalog, RandomCopy, RecommendationEngine,
    },
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "moodplate_api=debug,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = Config::from_env()?;

    let (cache, cache_handle) = connect_cache(&config).await;
    let providers = build_providers(&config, cache)?;

    let mut catalog = LocalCatalog::builtin()?;
    if let Some(path) = &config.catalog_dataset_path {
        match catalog.load_dataset(path).await {
            Ok(added) => tracing::info!(path = %path, added, "Restaurant dataset loaded"),
            Err(e) => tracing::warn!(path = %path, error = %e, "Restaurant dataset not loaded"),
        }
    }
    tracing::info!(restaurants = catalog.len(), state = ?catalog.state(), "Catalog ready");

    let engine = RecommendationEngine::new(
        Arc::new(catalog),
        providers,
        Arc::new(RandomCopy),
        EngineSettings::from(&config),
    );
    let app = create_router(AppState::new(engine));

    let addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(addr = %addr, "Server running");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    if let Some(handle) = cache_handle {
        handle.shutdown().await;
    }

    Ok(())
}

/// Redis is optional; a bad URL only disables caching
async fn connect_cache(config: &Config) -> (Option<Cache>, Option<CacheWriterHandle>) {
    let Some(url) = &config.redis_url else {
        tracing::info!("REDIS_URL not set, remote searches are not cached");
        return (None, None);
    };

    match create_redis_client(url) {
        Ok(client) => {
            let (cache, handle) = Cache::new(client).await;
            (Some(cache), Some(handle))
        }
        Err(e) => {
            tracing::warn!(error = %e, "Invalid Redis URL, caching disabled");
            (None, None)
        }
    }
}

fn build_providers(
    config: &Config,
    cache: Option<Cache>,
) -> anyhow::Result<Vec<Arc<dyn PlaceProvider>>> {
    let timeout = Duration::from_secs(config.remote_timeout_secs);
    let mut providers: Vec<Arc<dyn PlaceProvider>> = Vec::new();

    if let Some(key) = &config.foursquare_api_key {
        providers.push(Arc::new(FoursquareProvider::new(
            cache.clone(),
            key.clone(),
            config.foursquare_api_url.clone(),
            config.search_radius_meters,
            timeout,
        )?));
    }
    if let Some(key) = &config.opentripmap_api_key {
        providers.push(Arc::new(OpenTripMapProvider::new(
            cache,
            key.clone(),
            config.opentripmap_api_url.clone(),
            config.search_radius_meters,
            timeout,
        )?));
    }

    let names: Vec<&str> = providers.iter().map(|p| p.name()).collect();
    tracing::info!(providers = ?names, "Remote providers configured");

    Ok(providers)
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
