//! Finding the library copy of a document
//!
//! A document read from a bibtex file carries no library folder. To open or
//! edit it we look for the library document describing the same work: first
//! by a shared identifier, then by title and first author.

use strsim::jaro_winkler;
use unicode_normalization::UnicodeNormalization;

use crate::Document;

/// Identifier fields, checked in order before falling back to titles
const IDENTIFIER_KEYS: [&str; 5] = ["doi", "ref", "isbn", "isbn10", "url"];

/// Minimum Jaro-Winkler similarity for two normalized titles to match
const TITLE_THRESHOLD: f64 = 0.95;

/// Find the candidate describing the same work as `doc`
pub fn locate<'a>(doc: &Document, candidates: &'a [Document]) -> Option<&'a Document> {
    for key in IDENTIFIER_KEYS {
        let Some(wanted) = identifier(doc, key) else {
            continue;
        };
        if let Some(found) = candidates
            .iter()
            .find(|c| identifier(c, key).as_deref() == Some(wanted.as_str()))
        {
            return Some(found);
        }
    }

    let title = normalize_title(&doc.title()?);
    if title.is_empty() {
        return None;
    }
    let author = first_author_last_name(doc);

    candidates.iter().find(|candidate| {
        let Some(other) = candidate.title() else {
            return false;
        };
        if jaro_winkler(&title, &normalize_title(&other)) < TITLE_THRESHOLD {
            return false;
        }
        match (&author, first_author_last_name(candidate)) {
            (Some(a), Some(b)) => *a == b,
            _ => true,
        }
    })
}

fn identifier(doc: &Document, key: &str) -> Option<String> {
    let value = doc.get(key)?;
    let value = value.trim();
    if value.is_empty() {
        return None;
    }
    // DOIs are case-insensitive
    if key == "doi" {
        Some(value.to_lowercase())
    } else {
        Some(value.to_string())
    }
}

/// Normalize a title for comparison
///
/// Lowercases, strips diacritics, punctuation and braces, and collapses
/// whitespace.
pub fn normalize_title(title: &str) -> String {
    let folded: String = title
        .nfkd()
        .filter(|c| c.is_ascii_alphanumeric() || c.is_whitespace())
        .collect::<String>()
        .to_lowercase();

    folded.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Last name of the first author in a bibtex-style author string
fn first_author_last_name(doc: &Document) -> Option<String> {
    let author = doc.get("author")?;
    let first = author
        .split(" and ")
        .next()
        .map(str::trim)
        .filter(|a| !a.is_empty())?;

    let last = match first.split_once(',') {
        Some((last, _)) => last.trim(),
        None => first.split_whitespace().last()?,
    };

    let normalized = normalize_title(last);
    (!normalized.is_empty()).then_some(normalized)
}
