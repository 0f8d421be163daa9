//! Document model

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// Name of the metadata file inside every library document folder
pub const INFO_FILE: &str = "info.yaml";

/// A document (paper, book, thesis, etc.)
///
/// Fields are kept sorted by key. A document read from the library remembers
/// the folder it lives in; documents read from a bibtex, yaml or json file
/// have no folder.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Document {
    fields: BTreeMap<String, Value>,
    #[serde(skip)]
    folder: Option<PathBuf>,
}

impl Document {
    /// Create an empty document
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a document from a JSON value. Only objects are documents.
    pub fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Object(map) => Some(Self {
                fields: map.into_iter().collect(),
                folder: None,
            }),
            _ => None,
        }
    }

    /// Builder method to attach the library folder
    pub fn with_folder(mut self, folder: impl Into<PathBuf>) -> Self {
        self.folder = Some(folder.into());
        self
    }

    pub fn folder(&self) -> Option<&Path> {
        self.folder.as_deref()
    }

    pub fn set_folder(&mut self, folder: Option<PathBuf>) {
        self.folder = folder;
    }

    /// Path of the `info.yaml` for documents that live in the library
    pub fn info_path(&self) -> Option<PathBuf> {
        self.folder.as_ref().map(|f| f.join(INFO_FILE))
    }

    /// Get a field rendered as text
    ///
    /// Numbers and booleans are printed, lists of scalars are joined with
    /// `", "`, nested structures are rendered as compact JSON. Null and
    /// missing fields give `None`.
    pub fn get(&self, key: &str) -> Option<String> {
        self.fields.get(key).and_then(render_value)
    }

    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(key.into(), value.into());
    }

    /// Iterate over fields in key order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Iterate over the text rendering of every field
    pub fn texts(&self) -> impl Iterator<Item = (&str, String)> + '_ {
        self.fields
            .iter()
            .filter_map(|(k, v)| render_value(v).map(|text| (k.as_str(), text)))
    }

    pub fn title(&self) -> Option<String> {
        self.get("title")
    }

    /// Title for log lines and prompts
    pub fn display_title(&self) -> String {
        self.title()
            .or_else(|| self.get("ref"))
            .unwrap_or_else(|| "untitled".to_string())
    }

    /// Attached files, resolved against the document folder
    pub fn files(&self) -> Vec<PathBuf> {
        let names: Vec<String> = match self.fields.get("files") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(|item| item.as_str().map(str::to_string))
                .collect(),
            Some(Value::String(name)) if !name.is_empty() => vec![name.clone()],
            _ => Vec::new(),
        };

        names
            .into_iter()
            .map(|name| match &self.folder {
                Some(folder) => folder.join(name),
                None => PathBuf::from(name),
            })
            .collect()
    }

    /// Copy every field of `other` into this document, except its files
    pub fn update_from(&mut self, other: &Document) {
        for (key, value) in &other.fields {
            if key == "files" {
                continue;
            }
            self.fields.insert(key.clone(), value.clone());
        }
    }
}

impl FromIterator<(String, Value)> for Document {
    fn from_iter<T: IntoIterator<Item = (String, Value)>>(iter: T) -> Self {
        Self {
            fields: iter.into_iter().collect(),
            folder: None,
        }
    }
}

fn render_value(value: &Value) -> Option<String> {
    match value {
        Value::Null => None,
        Value::String(s) => Some(s.clone()),
        Value::Bool(b) => Some(b.to_string()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) if items.iter().all(is_scalar) => Some(
            items
                .iter()
                .filter_map(render_value)
                .collect::<Vec<_>>()
                .join(", "),
        ),
        other => Some(other.to_string()),
    }
}

fn is_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}
