use std::path::PathBuf;

use thiserror::Error;

/// Failures surfaced by [`crate::CollectionStore::save`].
#[derive(Error, Debug)]
pub enum StoreError {
    #[error("i/o failure on {}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to encode collection: {0}")]
    Encode(#[from] serde_json::Error),
}

impl StoreError {
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }
}
