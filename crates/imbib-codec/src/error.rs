//! Codec error types

use std::path::PathBuf;

#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("invalid JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("expected a document or a list of documents, found {0}")]
    NotDocuments(&'static str),
}
