//! PlateService: the engine wired to a KVStore and a Clock.
//!
//! The service owns the catalog and the current plate state. Mutations run
//! the pure lifecycle operations on a copy of the state and only replace
//! the in-memory state once the copy has been persisted.

pub mod admin;
mod movement;
mod usage;

use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, info};

use platetrack_core::{Clock, ServiceError};
use platetrack_kv::{KVError, KVStore};

use crate::catalog::{self, Catalog};
use crate::inventory::InventoryQuery;
use crate::model::{Plate, PlateState, TransactionLog, UsageConfig};

pub use admin::RestorePoint;

/// KV keys used by the service.
pub mod keys {
    pub const CATALOG: &str = "config:catalog";
    pub const USAGE: &str = "config:usage";
    pub const PLATES: &str = "state:plates";
    pub const LOGS: &str = "state:logs";
    pub const RESTORE_POINT: &str = "state:restore-point";
    pub const ADMIN_PASSWORD: &str = "secret:admin-password";
}

pub struct PlateService {
    kv: Arc<dyn KVStore>,
    clock: Arc<dyn Clock>,
    catalog: Catalog,
    state: PlateState,
    usage: UsageConfig,
}

impl PlateService {
    /// Load catalog, plates, logs and usage overrides from `kv`.
    ///
    /// A missing catalog key falls back to the built-in catalog; a present
    /// one must parse and validate.
    pub fn open(kv: Arc<dyn KVStore>, clock: Arc<dyn Clock>) -> Result<Self, ServiceError> {
        let catalog = match kv.get(keys::CATALOG).map_err(storage)? {
            Some(data) => {
                let c = Catalog::from_yaml(&data).map_err(|e| ServiceError::Validation(e.to_string()))?;
                info!("Catalog loaded from {}: {} equipment types", keys::CATALOG, c.len());
                c
            }
            None => {
                debug!("No {} entry, using built-in catalog", keys::CATALOG);
                Catalog::default()
            }
        };

        let plates: Vec<Plate> = read_json(kv.as_ref(), keys::PLATES)?.unwrap_or_default();
        let logs: Vec<TransactionLog> = read_json(kv.as_ref(), keys::LOGS)?.unwrap_or_default();
        let usage = read_usage(kv.as_ref())?;

        info!(
            "Plate state loaded: {} plates, {} logs, {} usage overrides",
            plates.len(),
            logs.len(),
            usage.len()
        );

        Ok(Self {
            kv,
            clock,
            catalog,
            state: PlateState::new(plates, logs),
            usage,
        })
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn state(&self) -> &PlateState {
        &self.state
    }

    pub fn plates(&self) -> &[Plate] {
        &self.state.plates
    }

    pub fn logs(&self) -> &[TransactionLog] {
        &self.state.logs
    }

    pub fn usage_config(&self) -> &UsageConfig {
        &self.usage
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    /// Next number to order for the named equipment.
    pub fn next_available_number(&self, equipment_name: &str) -> Option<u32> {
        catalog::next_available_number(&self.catalog, equipment_name, &self.state.plates)
    }

    pub fn inventory(&self, query: &InventoryQuery) -> Vec<&Plate> {
        query.run(&self.state.plates)
    }

    /// Persist `next` and make it the current state.
    pub(crate) fn commit(&mut self, next: PlateState) -> Result<(), ServiceError> {
        write_state(self.kv.as_ref(), &next)?;
        self.state = next;
        Ok(())
    }
}

pub(crate) fn storage(e: KVError) -> ServiceError {
    match e {
        KVError::ReadOnly(key) => ServiceError::ReadOnly(format!("{key} is pinned by a data-dir file")),
        KVError::Storage(msg) => ServiceError::Storage(msg),
        e @ KVError::File { .. } => ServiceError::Storage(e.to_string()),
    }
}

pub(crate) fn to_json<T: Serialize + ?Sized>(value: &T) -> Result<Vec<u8>, ServiceError> {
    serde_json::to_vec(value).map_err(|e| ServiceError::Internal(e.to_string()))
}

pub(crate) fn read_json<T: DeserializeOwned>(kv: &dyn KVStore, key: &str) -> Result<Option<T>, ServiceError> {
    match kv.get(key).map_err(storage)? {
        Some(data) => serde_json::from_slice(&data)
            .map(Some)
            .map_err(|e| ServiceError::Internal(format!("corrupt {key}: {e}"))),
        None => Ok(None),
    }
}

/// Usage overrides are JSON when written by the service and YAML when
/// pinned from the data dir.
pub(crate) fn read_usage(kv: &dyn KVStore) -> Result<UsageConfig, ServiceError> {
    match kv.get(keys::USAGE).map_err(storage)? {
        Some(data) => serde_json::from_slice(&data)
            .or_else(|_| serde_yml::from_slice(&data))
            .map_err(|e| ServiceError::Validation(format!("invalid {}: {e}", keys::USAGE))),
        None => Ok(UsageConfig::new()),
    }
}

pub(crate) fn write_state(kv: &dyn KVStore, state: &PlateState) -> Result<(), ServiceError> {
    let plates = to_json(&state.plates)?;
    let logs = to_json(&state.logs)?;
    kv.batch_set(&[(keys::PLATES, plates.as_slice()), (keys::LOGS, logs.as_slice())])
        .map_err(storage)
}

#[cfg(test)]
pub(crate) mod test_support {
    use chrono::TimeZone;
    use platetrack_core::FixedClock;
    use platetrack_kv::MemoryStore;

    use super::*;

    pub fn start() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 3, 1, 12, 0, 0).unwrap()
    }

    pub fn fixture() -> (Arc<MemoryStore>, Arc<FixedClock>, PlateService) {
        let kv = Arc::new(MemoryStore::new());
        let clock = Arc::new(FixedClock::new(start()));
        let svc = PlateService::open(kv.clone(), clock.clone()).unwrap();
        (kv, clock, svc)
    }
}
