//! Error type shared by all commands

use std::path::PathBuf;

use imbib_codec::CodecError;
use imbib_library::LibraryError;

use crate::config::ConfigError;

#[derive(Debug, thiserror::Error)]
pub enum SessionError {
    #[error(transparent)]
    Cli(#[from] clap::Error),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Codec(#[from] CodecError),

    #[error(transparent)]
    Library(#[from] LibraryError),

    #[error("{0}")]
    Usage(String),

    #[error("document `{0}` has no ref")]
    MissingRef(String),

    #[error("no bibfile given and bibtex.default-save-bibfile is not set")]
    MissingSaveFile,

    #[error("failed to run `{program}`: {reason}")]
    Launch { program: String, reason: String },

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("terminal I/O failed: {0}")]
    Terminal(#[from] std::io::Error),
}
