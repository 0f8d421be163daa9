//! Query parser for library searches.
//!
//! # Syntax
//!
//! ```text
//! author:einstein year:1905 "moving bodies"
//! ```
//!
//! Tokens:
//! - `key:value` — the field `key` contains `value`
//! - anything else — some field contains the term
//!
//! Matching is case-insensitive and every token must match. An empty query,
//! or the single token `.`, matches every document.

use crate::Document;

/// A parsed library query
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Query {
    terms: Vec<Term>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Term {
    Field { key: String, needle: String },
    Any(String),
}

impl Query {
    /// Parse a query string.
    pub fn parse(input: &str) -> Self {
        let tokens = tokenize(input);
        if tokens.len() == 1 && tokens[0] == "." {
            return Self::default();
        }

        let terms = tokens
            .into_iter()
            .map(|token| match token.split_once(':') {
                Some((key, needle)) if !key.is_empty() && !needle.is_empty() => Term::Field {
                    key: key.to_lowercase(),
                    needle: needle.to_lowercase(),
                },
                _ => Term::Any(token.to_lowercase()),
            })
            .collect();

        Self { terms }
    }

    /// Whether this query matches everything.
    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }

    pub fn matches(&self, doc: &Document) -> bool {
        self.terms.iter().all(|term| match term {
            Term::Field { key, needle } => doc
                .get(key)
                .is_some_and(|text| text.to_lowercase().contains(needle.as_str())),
            Term::Any(needle) => doc
                .texts()
                .any(|(_, text)| text.to_lowercase().contains(needle.as_str())),
        })
    }
}

/// Tokenize a query string, respecting quoted strings.
fn tokenize(input: &str) -> Vec<String> {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;

    for c in input.chars() {
        match c {
            '"' => {
                in_quotes = !in_quotes;
                if !in_quotes && !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            c if c.is_whitespace() && !in_quotes => {
                if !current.is_empty() {
                    tokens.push(std::mem::take(&mut current));
                }
            }
            _ => current.push(c),
        }
    }

    if !current.is_empty() {
        tokens.push(current);
    }

    tokens
}
