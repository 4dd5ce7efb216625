use std::sync::Arc;

use anyhow::Context;
use tracing::info;

use plates::PlateService;
use platetrack_core::{ServiceConfig, SystemClock};
use platetrack_kv::{FileLoader, KVStore, OverlayKV, RedbStore};

/// Open the redb store, layer pinned YAML files from the data dir over
/// it, and load the service.
pub fn open_service(config: &ServiceConfig) -> anyhow::Result<PlateService> {
    let data_dir = config.resolve_data_dir();
    let db_path = config.resolve_db_path();
    if let Some(parent) = db_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }

    let db = RedbStore::open(&db_path)
        .with_context(|| format!("failed to open KV store {}", db_path.display()))?;
    let overlay = OverlayKV::new(db);
    let pinned = FileLoader::load(&data_dir, &overlay)
        .with_context(|| format!("failed to load {}", data_dir.display()))?;
    info!("Storage ready: {} ({} pinned file(s))", db_path.display(), pinned);

    let kv: Arc<dyn KVStore> = Arc::new(overlay);
    Ok(PlateService::open(kv, Arc::new(SystemClock))?)
}
