//! Commands that read and write document files: read, yaml, json, export, save

use std::fs;
use std::path::{Path, PathBuf};

use imbib_codec::{export as render, read_bibtex, read_json, read_yaml, to_bibtex, Format};

use crate::{Session, SessionError};

pub fn read(session: &mut Session, bibfile: &Path) -> Result<(), SessionError> {
    let bib = read_bibtex(bibfile)?;
    for err in &bib.errors {
        tracing::warn!("{}:{}: {}", bibfile.display(), err.line, err.message);
    }
    tracing::info!(
        "read {} documents from {}",
        bib.documents.len(),
        bibfile.display()
    );
    session.documents.extend(bib.documents);
    Ok(())
}

pub fn yaml(session: &mut Session, yamlfile: &Path) -> Result<(), SessionError> {
    let docs = read_yaml(yamlfile)?;
    tracing::info!("read {} documents from {}", docs.len(), yamlfile.display());
    session.documents.extend(docs);
    Ok(())
}

pub fn json(session: &mut Session, jsonfile: &Path) -> Result<(), SessionError> {
    let docs = read_json(jsonfile)?;
    tracing::info!("read {} documents from {}", docs.len(), jsonfile.display());
    session.documents.extend(docs);
    Ok(())
}

pub fn export(session: &mut Session, format: Format, out: Option<&Path>) -> Result<(), SessionError> {
    let text = render(&session.documents, format)?;
    match out {
        Some(path) => {
            write(path, &text)?;
            tracing::info!(
                "exported {} documents as {format} to {}",
                session.documents.len(),
                path.display()
            );
        }
        None => session.console().print(&text)?,
    }
    Ok(())
}

pub fn save(session: &mut Session, bibfile: Option<PathBuf>, force: bool) -> Result<(), SessionError> {
    let path = bibfile
        .or_else(|| session.config().default_save_bibfile())
        .ok_or(SessionError::MissingSaveFile)?;

    if !force && !session.console().confirm("Are you sure you want to save?", true)? {
        session.console().print("Not saving..")?;
        return Ok(());
    }

    tracing::info!(
        "Saving {} documents in {}..",
        session.documents.len(),
        path.display()
    );
    write(&path, &to_bibtex(&session.documents))
}

fn write(path: &Path, text: &str) -> Result<(), SessionError> {
    fs::write(path, text).map_err(|source| SessionError::Io {
        path: path.to_path_buf(),
        source,
    })
}
