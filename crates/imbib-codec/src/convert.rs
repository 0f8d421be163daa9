//! Conversion between BibTeX entries and library documents

use imbib_library::Document;
use serde_json::Value;
use unicode_normalization::UnicodeNormalization;

use crate::entry::{Entry, EntryType};

/// Document fields written to BibTeX on export, besides `type` and `ref`
pub const BIBTEX_KEYS: &[&str] = &[
    "abstract",
    "address",
    "annote",
    "archiveprefix",
    "author",
    "booktitle",
    "chapter",
    "crossref",
    "doi",
    "edition",
    "editor",
    "eprint",
    "eprinttype",
    "howpublished",
    "institution",
    "isbn",
    "issn",
    "journal",
    "key",
    "keywords",
    "language",
    "month",
    "note",
    "number",
    "organization",
    "pages",
    "pmid",
    "primaryclass",
    "publisher",
    "school",
    "series",
    "title",
    "url",
    "urldate",
    "volume",
    "year",
];

const STOPWORDS: &[&str] = &[
    "a", "an", "the", "on", "in", "of", "for", "to", "and", "with", "by", "from", "as", "at",
];

/// Build a session document from a parsed entry
///
/// Field names are lowercased, the cite key becomes `ref` and the entry
/// type becomes `type`.
pub fn document_from_entry(entry: &Entry) -> Document {
    let mut doc = Document::new();
    for field in &entry.fields {
        doc.set(field.key.to_lowercase(), field.value.clone());
    }
    doc.set("type", entry.entry_type.as_str());
    doc.set("ref", entry.cite_key.clone());
    doc
}

/// Build a BibTeX entry from a document
///
/// Only [`BIBTEX_KEYS`] are written, in key order. Documents without a
/// `type` are articles; documents without a `ref` get one from
/// [`cite_key_for`].
pub fn entry_from_document(doc: &Document) -> Entry {
    let entry_type = doc
        .get("type")
        .map(|t| EntryType::parse(&t))
        .unwrap_or(EntryType::Article);

    let mut entry = Entry::new(cite_key_for(doc), entry_type);
    for (key, value) in doc.iter() {
        if !BIBTEX_KEYS.contains(&key) {
            continue;
        }
        if let Some(text) = bibtex_text(value) {
            entry.add_field(key, text);
        }
    }
    entry
}

fn bibtex_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .iter()
                .filter_map(|item| match item {
                    Value::String(s) => Some(s.clone()),
                    Value::Number(n) => Some(n.to_string()),
                    _ => None,
                })
                .collect();
            (!parts.is_empty()).then(|| parts.join(", "))
        }
        _ => None,
    }
}

/// The document's `ref`, or a generated `<Author><year><TitleWord>` key
pub fn cite_key_for(doc: &Document) -> String {
    if let Some(existing) = doc.get("ref").filter(|r| !r.trim().is_empty()) {
        return existing.trim().to_string();
    }

    let mut key = String::new();
    if let Some(last) = doc.get("author").as_deref().and_then(first_last_name) {
        key.push_str(&capitalize_first(&normalize_for_key(&last)));
    }
    if let Some(year) = doc.get("year") {
        key.push_str(&normalize_for_key(&year));
    }
    if let Some(word) = doc.get("title").as_deref().and_then(significant_word) {
        key.push_str(&word);
    }

    if key.is_empty() {
        "ref".to_string()
    } else {
        key
    }
}

fn first_last_name(author: &str) -> Option<String> {
    let first = author.split(" and ").next()?.trim();
    if first.is_empty() {
        return None;
    }
    match first.split_once(',') {
        Some((last, _)) => Some(last.trim().to_string()),
        None => first.split_whitespace().last().map(str::to_string),
    }
}

fn significant_word(title: &str) -> Option<String> {
    title
        .split_whitespace()
        .map(normalize_for_key)
        .filter(|w| !w.is_empty())
        .find(|w| !STOPWORDS.contains(&w.to_lowercase().as_str()))
        .map(|w| capitalize_first(&w))
}

fn normalize_for_key(s: &str) -> String {
    s.nfkd().filter(|c| c.is_ascii_alphanumeric()).collect()
}

fn capitalize_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        None => String::new(),
        Some(first) => first.to_ascii_uppercase().to_string() + &chars.as_str().to_lowercase(),
    }
}
