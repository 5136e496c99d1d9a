use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::api::AppState;
use crate::config::StaticConfig;
use crate::storage::{SeaOrmStorage, StorageFactory};

/// Open storage (running migrations) and build the service graph.
pub async fn prepare_server_startup(config: &StaticConfig) -> Result<AppState> {
    let start_time = std::time::Instant::now();
    debug!("Starting pre-startup processing...");

    let storage = open_storage(config).await?;
    let state = AppState::new(storage, config).context("Invalid short link configuration")?;

    info!(
        "Short links: prefix {}, token length {}, alphabet size {}; shopping list merge: {}",
        config.short_link.path_prefix,
        state.short_links.policy().token_length(),
        state.short_links.policy().alphabet().len(),
        config.shopping_list.merge_policy
    );
    debug!("Pre-startup finished in {:?}", start_time.elapsed());
    Ok(state)
}

/// Storage only, for CLI commands.
pub async fn open_storage(config: &StaticConfig) -> Result<Arc<SeaOrmStorage>> {
    let storage = StorageFactory::create(&config.database)
        .await
        .context("Failed to create storage backend")?;
    info!(
        "Using storage backend: {}",
        storage.get_backend_config().storage_type
    );
    Ok(storage)
}
