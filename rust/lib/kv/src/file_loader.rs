use std::fs;
use std::path::Path;

use tracing::{debug, warn};

use crate::error::KVError;
use crate::overlay::OverlayKV;
use crate::traits::KVStore;

/// FileLoader scans a data directory and populates the file layer of an
/// OverlayKV. Only top-level YAML files are considered; the file stem
/// determines the key:
///
/// ```text
/// data-dir/
/// ├── catalog.yaml    → config:catalog   (equipment rules and ranges)
/// ├── usage.yaml      → config:usage     (pinned annual usage overrides)
/// └── data.redb                          (ignored, not YAML)
/// ```
///
/// All loaded entries become read-only in the overlay.
pub struct FileLoader;

impl FileLoader {
    /// Load all YAML files from `data_dir` into the overlay's file layer.
    /// Returns the number of entries loaded.
    pub fn load<DB: KVStore>(data_dir: &Path, overlay: &OverlayKV<DB>) -> Result<usize, KVError> {
        if !data_dir.is_dir() {
            debug!("FileLoader: data dir {:?} does not exist, skipping", data_dir);
            return Ok(0);
        }

        let mut count = 0;
        let entries = fs::read_dir(data_dir).map_err(|source| KVError::File {
            path: data_dir.to_path_buf(),
            source,
        })?;

        for entry in entries {
            let entry = entry.map_err(|e| KVError::Storage(e.to_string()))?;
            let path = entry.path();
            if !path.is_file() || !Self::is_yaml(&path) {
                continue;
            }

            let Some(stem) = path.file_stem().and_then(|s| s.to_str()) else {
                warn!("FileLoader: skipping non UTF-8 file name {:?}", path);
                continue;
            };

            let key = Self::key_for(stem);
            let data = fs::read(&path).map_err(|source| KVError::File {
                path: path.clone(),
                source,
            })?;
            debug!("FileLoader: {:?} → {}", path, key);
            overlay.insert_file_entry(key, data);
            count += 1;
        }

        debug!("FileLoader: loaded {} entries from {:?}", count, data_dir);
        Ok(count)
    }

    /// Map a file stem to its KV key.
    pub fn key_for(stem: &str) -> String {
        format!("config:{}", stem.to_lowercase().replace([' ', '_'], "-"))
    }

    fn is_yaml(path: &Path) -> bool {
        matches!(
            path.extension().and_then(|e| e.to_str()),
            Some("yaml") | Some("yml")
        )
    }
}
