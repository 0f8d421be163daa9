//! Document streams in BibTeX, YAML and JSON

use std::fmt;
use std::fs;
use std::path::Path;

use imbib_library::Document;
use serde::Deserialize;
use serde_json::Value;

use crate::convert::{document_from_entry, entry_from_document};
use crate::formatter::format_entries;
use crate::parser::{parse, EntryError};
use crate::CodecError;

/// Export format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Format {
    #[default]
    Bibtex,
    Yaml,
    Json,
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Bibtex => "bibtex",
            Self::Yaml => "yaml",
            Self::Json => "json",
        })
    }
}

/// Documents read from a BibTeX file, with the entries that failed to parse
#[derive(Debug, Clone, Default)]
pub struct BibFile {
    pub documents: Vec<Document>,
    pub errors: Vec<EntryError>,
}

/// Render documents in `format`
pub fn export(docs: &[Document], format: Format) -> Result<String, CodecError> {
    match format {
        Format::Bibtex => Ok(to_bibtex(docs)),
        Format::Yaml => to_yaml(docs),
        Format::Json => to_json(docs),
    }
}

/// BibTeX text for `docs`, one entry per document
pub fn to_bibtex(docs: &[Document]) -> String {
    let entries: Vec<_> = docs.iter().map(entry_from_document).collect();
    let mut text = format_entries(&entries);
    if !text.is_empty() {
        text.push('\n');
    }
    text
}

/// A YAML stream with one `---` document per entry
pub fn to_yaml(docs: &[Document]) -> Result<String, CodecError> {
    let mut text = String::new();
    for doc in docs {
        text.push_str("---\n");
        text.push_str(&serde_yaml::to_string(doc)?);
    }
    Ok(text)
}

/// A pretty-printed JSON array
pub fn to_json(docs: &[Document]) -> Result<String, CodecError> {
    let mut text = serde_json::to_string_pretty(docs)?;
    text.push('\n');
    Ok(text)
}

/// Documents from a YAML stream
///
/// Each YAML document is either one mapping or a sequence of mappings.
/// Empty documents are skipped.
pub fn from_yaml(text: &str) -> Result<Vec<Document>, CodecError> {
    let mut docs = Vec::new();
    for part in serde_yaml::Deserializer::from_str(text) {
        let value = Value::deserialize(part)?;
        collect_documents(value, &mut docs)?;
    }
    Ok(docs)
}

/// Documents from a JSON array of objects, or a single object
pub fn from_json(text: &str) -> Result<Vec<Document>, CodecError> {
    let value: Value = serde_json::from_str(text)?;
    let mut docs = Vec::new();
    collect_documents(value, &mut docs)?;
    Ok(docs)
}

fn collect_documents(value: Value, docs: &mut Vec<Document>) -> Result<(), CodecError> {
    match value {
        Value::Null => Ok(()),
        Value::Object(_) => {
            docs.extend(Document::from_value(value));
            Ok(())
        }
        Value::Array(items) => {
            for item in items {
                let doc = Document::from_value(item)
                    .ok_or(CodecError::NotDocuments("a list holding a non-mapping item"))?;
                docs.push(doc);
            }
            Ok(())
        }
        Value::Bool(_) => Err(CodecError::NotDocuments("a boolean")),
        Value::Number(_) => Err(CodecError::NotDocuments("a number")),
        Value::String(_) => Err(CodecError::NotDocuments("a string")),
    }
}

/// Read and parse a BibTeX file
pub fn read_bibtex(path: &Path) -> Result<BibFile, CodecError> {
    let text = read(path)?;
    let parsed = parse(&text);
    tracing::debug!(
        path = %path.display(),
        entries = parsed.entries.len(),
        errors = parsed.errors.len(),
        "parsed bibtex file"
    );
    Ok(BibFile {
        documents: parsed.entries.iter().map(document_from_entry).collect(),
        errors: parsed.errors,
    })
}

pub fn read_yaml(path: &Path) -> Result<Vec<Document>, CodecError> {
    from_yaml(&read(path)?)
}

pub fn read_json(path: &Path) -> Result<Vec<Document>, CodecError> {
    from_json(&read(path)?)
}

fn read(path: &Path) -> Result<String, CodecError> {
    fs::read_to_string(path).map_err(|source| CodecError::Io {
        path: path.to_path_buf(),
        source,
    })
}
