use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum KVError {
    /// Write to a key pinned by the file layer.
    #[error("key is read-only: {0}")]
    ReadOnly(String),

    /// A data-dir file could not be read into the file layer.
    #[error("cannot read {path}: {source}")]
    File {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("storage error: {0}")]
    Storage(String),
}
