//! Document model and on-disk library for the imbib bibtex tools
//!
//! This crate provides:
//! - Document: an ordered key/value record (title, author, ref, files, ...)
//! - Library: a directory of document folders, each holding an `info.yaml`
//! - Query: `key:value` and free-text matching over documents
//! - locate: finding the library copy of a document read from elsewhere

pub mod document;
pub mod error;
pub mod library;
pub mod locate;
pub mod query;

pub use document::{Document, INFO_FILE};
pub use error::LibraryError;
pub use library::Library;
pub use locate::{locate, normalize_title};
pub use query::Query;
