//! Run resource initialization.

use std::sync::Arc;

use anyhow::{Context, Result};
use log::{info, warn};
use sqlx::SqlitePool;

use crate::config::{Config, GOOGLE_API_KEY_ENV};
use crate::geolocation::{default_chain, GeoResolver, ResolutionCache};
use crate::initialization::init_client;
use crate::queue::{JobStore, LocationQueue, QueueConfig};
use crate::storage::{init_db_pool_with_path, run_migrations, SqliteLocationUpdater};

/// Everything a run needs, created once up front.
pub(super) struct RunResources {
    pub pool: SqlitePool,
    pub cache: Arc<ResolutionCache>,
    pub queue: Arc<LocationQueue>,
}

/// Opens the database, builds the provider chain and wires the queue.
pub(super) async fn init_run_resources(config: &Config) -> Result<RunResources> {
    let pool = init_db_pool_with_path(&config.db_path)
        .await
        .context("Failed to initialize database pool")?;
    run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;

    let client = init_client(config).context("Failed to initialize HTTP client")?;

    let google_api_key = config
        .google_api_key
        .clone()
        .filter(|key| !key.trim().is_empty());
    if google_api_key.is_none() {
        warn!(
            "{} is not set; the paid fallback provider will be skipped",
            GOOGLE_API_KEY_ENV
        );
    }

    let cache = Arc::new(ResolutionCache::new());
    let resolver = Arc::new(GeoResolver::new(
        default_chain(client, &config.endpoints, google_api_key),
        Arc::clone(&cache),
    ));
    let updater = Arc::new(SqliteLocationUpdater::new(pool.clone()));

    if config.job_timeout_seconds < config.min_job_timeout_seconds() {
        warn!(
            "Job timeout of {}s is shorter than the provider chain needs; using {}s",
            config.job_timeout_seconds,
            config.min_job_timeout_seconds()
        );
    }

    let queue_config = QueueConfig {
        job_timeout: config.job_timeout(),
        ..QueueConfig::default()
    };
    let queue = Arc::new(LocationQueue::new(
        JobStore::new(pool.clone()),
        resolver,
        updater,
        queue_config,
    ));

    info!("Using database {}", config.db_path.display());
    Ok(RunResources { pool, cache, queue })
}
