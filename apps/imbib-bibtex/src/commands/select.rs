//! Commands over the session list: pick, rm, ref, sort, cmd

use std::cmp::Ordering;
use std::fs;
use std::path::Path;

use imbib_library::Document;

use crate::{template, Session, SessionError};

pub fn pick(session: &mut Session, number: Option<usize>) -> Result<(), SessionError> {
    let index = match number {
        Some(n) => Some(nth(session, n)?),
        None => session.pick_index()?,
    };

    match index {
        Some(index) => {
            let doc = session.documents.swap_remove(index);
            tracing::debug!("picked {}", doc.display_title());
            session.documents = vec![doc];
        }
        None => tracing::info!("no document picked"),
    }
    Ok(())
}

pub fn rm(session: &mut Session) -> Result<(), SessionError> {
    if let Some(index) = session.pick_index()? {
        let doc = session.documents.remove(index);
        tracing::info!("removed {}", doc.display_title());
    }
    Ok(())
}

pub fn reference(session: &mut Session, out: Option<&Path>) -> Result<(), SessionError> {
    let Some(index) = session.pick_index()? else {
        return Ok(());
    };

    let doc = &session.documents[index];
    let reference = doc
        .get("ref")
        .filter(|r| !r.trim().is_empty())
        .ok_or_else(|| SessionError::MissingRef(doc.display_title()))?;

    match out {
        Some(path) => fs::write(path, &reference).map_err(|source| SessionError::Io {
            path: path.to_path_buf(),
            source,
        }),
        None => Ok(session.console().print(&reference)?),
    }
}

/// Stable sort on `key`; documents without the field go last
pub fn sort(session: &mut Session, key: &str, reverse: bool) -> Result<(), SessionError> {
    session.documents.sort_by(|a, b| {
        let ordering = compare_field(a, b, key);
        if reverse {
            ordering.reverse()
        } else {
            ordering
        }
    });
    tracing::debug!(key, reverse, "sorted {} documents", session.documents.len());
    Ok(())
}

/// Run `command` once per document
///
/// The command is split into words first, shell style, and each word is
/// filled in separately, so field values always stay single arguments.
pub fn cmd(session: &mut Session, command: &str) -> Result<(), SessionError> {
    let words = shell_words::split(command)
        .map_err(|err| SessionError::Usage(format!("cannot parse command `{command}`: {err}")))?;
    if words.is_empty() {
        return Err(SessionError::Usage("empty command".to_string()));
    }

    let commands: Vec<Vec<String>> = session
        .documents
        .iter()
        .map(|doc| words.iter().map(|word| template::render(word, doc)).collect())
        .collect();

    for argv in commands {
        tracing::info!("calling {}", shell_words::join(&argv));
        session.launcher().run(&argv)?;
    }
    Ok(())
}

fn nth(session: &Session, number: usize) -> Result<usize, SessionError> {
    let count = session.documents.len();
    if number == 0 || number > count {
        return Err(SessionError::Usage(format!(
            "cannot pick document {number}: the session holds {count} documents"
        )));
    }
    Ok(number - 1)
}

fn compare_field(a: &Document, b: &Document, key: &str) -> Ordering {
    match (a.get(key), b.get(key)) {
        (Some(a), Some(b)) => compare_values(&a, &b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Numbers compare numerically, anything else as text
fn compare_values(a: &str, b: &str) -> Ordering {
    match (a.trim().parse::<f64>(), b.trim().parse::<f64>()) {
        (Ok(x), Ok(y)) => x.total_cmp(&y),
        _ => a.cmp(b),
    }
}
