use std::fs::File;

use anyhow::Context;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use fuel_server::catalog::{
    CatalogClient, CatalogClientConfig, CatalogDiskCache, CatalogDiskCacheConfig, FileCatalog,
    StationCatalog,
};
use fuel_server::config::{AppConfig, CatalogLocation};
use fuel_server::locator::{
    Locator, LocatorCacheConfig, NominatimConfig, NominatimLocator, PostalTable, spanish_capitals,
};
use fuel_server::web::{AppState, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new("fuel_server=info,tower_http=info"))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let config = AppConfig::from_env()?;

    // Station catalog
    let catalog = match &config.catalog {
        CatalogLocation::File(path) => {
            StationCatalog::new(FileCatalog::new(path.clone()), config.catalog_ttl)
        }
        CatalogLocation::Url(url) => {
            let client_config =
                CatalogClientConfig::new(url.clone()).with_user_agent(config.user_agent.clone());
            let client =
                CatalogClient::new(client_config).context("failed to create catalog client")?;
            StationCatalog::new(client, config.catalog_ttl)
        }
    };
    let catalog = match &config.catalog_cache_path {
        Some(path) => catalog.with_disk_cache(CatalogDiskCache::new(CatalogDiskCacheConfig::new(
            path.clone(),
        ))),
        None => catalog,
    };

    // Locator chain: bundled table, optional extra table, then online geocoding
    let mut locator = Locator::new(&LocatorCacheConfig::default()).with_backend(spanish_capitals());
    if let Some(path) = &config.postal_table_path {
        let file = File::open(path)
            .with_context(|| format!("failed to open postal table {}", path.display()))?;
        let table = PostalTable::from_csv(file)
            .with_context(|| format!("failed to read postal table {}", path.display()))?;
        info!(entries = table.len(), path = %path.display(), "loaded postal table");
        locator = locator.with_backend(table);
    }
    if !config.offline {
        let nominatim_config = NominatimConfig::new(config.user_agent.clone())
            .with_base_url(config.nominatim_url.clone())
            .with_country(config.country.clone());
        let nominatim =
            NominatimLocator::new(nominatim_config).context("failed to create geocoder")?;
        locator = locator.with_backend(nominatim);
    }
    info!(backends = ?locator.backend_names(), "locator ready");

    // Warm the catalog; searches retry if this fails
    info!(source = %catalog.describe(), "loading station catalog...");
    match catalog.refresh().await {
        Ok(count) => info!(stations = count, "station catalog ready"),
        Err(e) => warn!(error = %e, "initial catalog load failed, will retry on first search"),
    }

    // Spawn background task to refresh the catalog every TTL
    let catalog_refresh = catalog.clone();
    let refresh_interval = config.catalog_ttl;
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(refresh_interval);
        interval.tick().await; // First tick is immediate, skip it
        loop {
            interval.tick().await;
            match catalog_refresh.refresh().await {
                Ok(count) => info!(stations = count, "refreshed station catalog"),
                Err(e) => warn!(error = %e, "failed to refresh station catalog"),
            }
        }
    });

    let state = AppState::new(catalog, locator, config.rank.clone());
    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("failed to bind {}", config.bind_addr))?;
    info!(addr = %config.bind_addr, "fuel price finder listening");
    info!("  GET  /                    - Search page");
    info!("  GET  /health              - Health check");
    info!("  GET  /search              - Rank stations near a location");
    info!("  GET  /api/stations/count  - Catalog status");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            warn!(error = %e, "failed to listen for ctrl-c");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                warn!(error = %e, "failed to install signal handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    info!("received shutdown signal, starting graceful shutdown");
}
