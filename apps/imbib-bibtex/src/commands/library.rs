//! Commands that go through the document library: add, update, open, edit

use std::fs;
use std::path::{Path, PathBuf};

use imbib_codec::{read_yaml, to_yaml};
use imbib_library::{LibraryError, Query};

use crate::{Session, SessionError};

pub fn add(session: &mut Session, query: Option<&str>, all: bool) -> Result<(), SessionError> {
    let query = Query::parse(query.unwrap_or_default());
    let mut matches = session.library()?.search(&query);
    tracing::debug!("{} library documents match", matches.len());

    if all {
        tracing::info!("adding {} documents", matches.len());
        session.documents.extend(matches);
        return Ok(());
    }

    match session.pick_from(&matches)? {
        Some(index) => {
            let doc = matches.swap_remove(index);
            tracing::info!("adding {}", doc.display_title());
            session.documents.push(doc);
        }
        None => tracing::info!("no document added"),
    }
    Ok(())
}

/// Sync session documents with their library copies
///
/// `--to` writes the session fields into the library first, then `--from`
/// replaces the session document with the (possibly just updated) library
/// copy. A document missing from the library is logged and skipped.
pub fn update(session: &mut Session, all: bool, from: bool, to: bool) -> Result<(), SessionError> {
    let indices: Vec<usize> = if all {
        (0..session.documents.len()).collect()
    } else {
        match session.pick_index()? {
            Some(index) => vec![index],
            None => return Ok(()),
        }
    };

    for index in indices {
        let doc = session.documents[index].clone();
        let library = session.library()?;

        let mut libdoc = match library.locate(&doc) {
            Ok(libdoc) => libdoc,
            Err(err @ LibraryError::NotFound) => {
                tracing::info!("{err}: {}", doc.display_title());
                continue;
            }
            Err(err) => return Err(err.into()),
        };

        if to {
            tracing::info!("Updating library document {}", libdoc.display_title());
            libdoc.update_from(&doc);
            library.save(&libdoc)?;
        }

        if from {
            tracing::info!("Updating {}", doc.display_title());
            session.documents[index] = libdoc;
        }
    }
    Ok(())
}

pub fn open(session: &mut Session) -> Result<(), SessionError> {
    let Some(index) = session.pick_index()? else {
        return Ok(());
    };
    let doc = session.documents[index].clone();
    let libdoc = session.library()?.locate(&doc)?;

    let files = libdoc.files();
    let target = match files.len() {
        0 => libdoc.folder().map(Path::to_path_buf),
        1 => files.first().cloned(),
        _ => {
            let names: Vec<String> = files.iter().map(|f| file_label(f)).collect();
            session
                .console()
                .pick("Pick a file", &names)?
                .and_then(|i| files.get(i).cloned())
        }
    };

    match target {
        Some(path) => {
            tracing::info!("opening {}", path.display());
            session.launcher().open(&path)
        }
        None => {
            tracing::info!("nothing to open for {}", libdoc.display_title());
            Ok(())
        }
    }
}

pub fn edit(session: &mut Session, lib: bool) -> Result<(), SessionError> {
    let Some(index) = session.pick_index()? else {
        return Ok(());
    };

    if lib {
        edit_in_library(session, index)
    } else {
        edit_in_session(session, index)
    }
}

fn edit_in_library(session: &mut Session, index: usize) -> Result<(), SessionError> {
    let doc = session.documents[index].clone();
    let libdoc = session.library()?.locate(&doc)?;
    let path = libdoc
        .info_path()
        .ok_or_else(|| LibraryError::NoFolder(libdoc.display_title()))?;

    session.launcher().edit(&path)?;
    // The cached library no longer matches the edited file
    session.forget_library();
    Ok(())
}

/// Round-trip the session document through a temporary YAML file
fn edit_in_session(session: &mut Session, index: usize) -> Result<(), SessionError> {
    let temp_error = |source| SessionError::Io {
        path: std::env::temp_dir(),
        source,
    };
    let file = tempfile::Builder::new()
        .prefix("imbib-")
        .suffix(".yaml")
        .tempfile()
        .map_err(temp_error)?;
    let path = file.path().to_path_buf();

    let original = &session.documents[index];
    fs::write(&path, to_yaml(std::slice::from_ref(original))?).map_err(|source| {
        SessionError::Io {
            path: path.clone(),
            source,
        }
    })?;

    session.launcher().edit(&path)?;

    let mut edited = read_yaml(&path)?;
    if edited.len() > 1 {
        tracing::warn!("edited file holds {} documents, keeping the first", edited.len());
    }
    if edited.is_empty() {
        tracing::warn!("edited file holds no document, keeping the original");
        return Ok(());
    }

    let mut doc = edited.swap_remove(0);
    doc.set_folder(session.documents[index].folder().map(PathBuf::from));
    tracing::info!("edited {}", doc.display_title());
    session.documents[index] = doc;
    Ok(())
}

fn file_label(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}
