use std::path::PathBuf;

use thiserror::Error;

/// Failures while loading tracks or enriching their metadata.
///
/// None of these are fatal: the library falls back to scanning and the
/// labels keep their filename-derived text.
#[derive(Debug, Error)]
pub enum LibraryError {
    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid manifest {}: {source}", path.display())]
    Manifest {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("failed to read tags from {}: {message}", path.display())]
    Tags { path: PathBuf, message: String },
}
