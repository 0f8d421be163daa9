//! Library error types

use std::path::PathBuf;

/// Errors raised while reading, searching or writing the library
#[derive(Debug, thiserror::Error)]
pub enum LibraryError {
    #[error("Document not found in library")]
    NotFound,

    #[error("library directory {0} does not exist")]
    Missing(PathBuf),

    #[error("document `{0}` does not live in a library folder")]
    NoFolder(String),

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {path}: {source}")]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}
