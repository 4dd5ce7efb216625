//! Full-data export/import document.

use std::collections::HashSet;

use chrono::{DateTime, Utc};
use platetrack_core::{ServiceError, format_rfc3339};
use serde::{Deserialize, Serialize};

use crate::model::{Plate, PlateState, TransactionLog, UsageConfig};

pub const SNAPSHOT_VERSION: &str = "1.0";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    #[error("invalid snapshot: {0}")]
    Parse(String),

    #[error("snapshot encode failed: {0}")]
    Encode(String),

    #[error("unsupported snapshot version '{0}'")]
    UnsupportedVersion(String),

    #[error("plate {0:05} appears more than once in the snapshot")]
    DuplicatePlate(u32),
}

impl From<SnapshotError> for ServiceError {
    fn from(e: SnapshotError) -> Self {
        match e {
            SnapshotError::Encode(_) => ServiceError::Internal(e.to_string()),
            _ => ServiceError::Validation(e.to_string()),
        }
    }
}

/// DataSnapshot: plates, logs and usage overrides in one JSON document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DataSnapshot {
    pub plates: Vec<Plate>,

    #[serde(default)]
    pub logs: Vec<TransactionLog>,

    /// Missing on import leaves the current overrides alone.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub usage_config: Option<UsageConfig>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub export_date: Option<String>,

    #[serde(default = "default_version")]
    pub version: String,
}

fn default_version() -> String {
    SNAPSHOT_VERSION.to_string()
}

impl DataSnapshot {
    pub fn export(state: &PlateState, usage: &UsageConfig, now: DateTime<Utc>) -> Self {
        Self {
            plates: state.plates.clone(),
            logs: state.logs.clone(),
            usage_config: Some(usage.clone()),
            export_date: Some(format_rfc3339(now)),
            version: SNAPSHOT_VERSION.to_string(),
        }
    }

    pub fn to_json(&self) -> Result<String, SnapshotError> {
        serde_json::to_string_pretty(self).map_err(|e| SnapshotError::Encode(e.to_string()))
    }

    /// Parse and check a snapshot. `plates` is required; every plate number
    /// must be unique.
    pub fn from_json(data: &[u8]) -> Result<Self, SnapshotError> {
        let snapshot: Self = serde_json::from_slice(data).map_err(|e| SnapshotError::Parse(e.to_string()))?;

        if snapshot.version.split('.').next() != Some("1") {
            return Err(SnapshotError::UnsupportedVersion(snapshot.version));
        }

        let mut seen = HashSet::with_capacity(snapshot.plates.len());
        for plate in &snapshot.plates {
            if !seen.insert(plate.number) {
                return Err(SnapshotError::DuplicatePlate(plate.number));
            }
        }
        Ok(snapshot)
    }

    /// The plate/log state carried by the snapshot.
    pub fn into_state(self) -> (PlateState, Option<UsageConfig>) {
        (PlateState::new(self.plates, self.logs), self.usage_config)
    }
}
