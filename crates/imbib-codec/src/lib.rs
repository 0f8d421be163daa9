//! Reading and writing imbib documents
//!
//! Features:
//! - Nom-based BibTeX parser with `@string` macros and error recovery
//! - BibTeX formatter
//! - Conversion between BibTeX entries and library documents
//! - YAML and JSON document streams

mod convert;
mod entry;
mod error;
mod export;
mod formatter;
pub mod parser;

pub use convert::{cite_key_for, document_from_entry, entry_from_document, BIBTEX_KEYS};
pub use entry::{Entry, EntryType, Field};
pub use error::CodecError;
pub use export::{
    export, from_json, from_yaml, read_bibtex, read_json, read_yaml, to_bibtex, to_json, to_yaml,
    BibFile, Format,
};
pub use formatter::{format_entries, format_entry};
pub use parser::{parse, EntryError, ParseResult};
