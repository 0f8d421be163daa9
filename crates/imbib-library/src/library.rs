//! On-disk document library
//!
//! A library is a directory tree. Every folder holding an `info.yaml` is one
//! document; the other files in that folder are its attachments.

use std::fs;
use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::{locate, Document, LibraryError, Query, INFO_FILE};

/// A library loaded from a directory
#[derive(Clone, Debug)]
pub struct Library {
    documents: Vec<Document>,
}

impl Library {
    /// Scan `root` for document folders
    ///
    /// Info files that cannot be read or parsed are logged and skipped.
    pub fn open(root: impl Into<PathBuf>) -> Result<Self, LibraryError> {
        let root = root.into();
        if !root.is_dir() {
            return Err(LibraryError::Missing(root));
        }

        let mut documents = Vec::new();
        for entry in WalkDir::new(&root)
            .follow_links(true)
            .sort_by_file_name()
            .into_iter()
            .filter_map(Result::ok)
            .filter(|e| e.file_type().is_file() && e.file_name() == INFO_FILE)
        {
            match read_info(entry.path()) {
                Ok(doc) => documents.push(doc),
                Err(err) => tracing::warn!("skipping library document: {err}"),
            }
        }

        tracing::debug!(
            root = %root.display(),
            count = documents.len(),
            "loaded library"
        );
        Ok(Self { documents })
    }

    pub fn documents(&self) -> &[Document] {
        &self.documents
    }

    /// Documents matching `query`, in library order
    pub fn search(&self, query: &Query) -> Vec<Document> {
        self.documents
            .iter()
            .filter(|doc| query.matches(doc))
            .cloned()
            .collect()
    }

    /// The library copy of `doc`
    pub fn locate(&self, doc: &Document) -> Result<Document, LibraryError> {
        locate(doc, &self.documents)
            .cloned()
            .ok_or(LibraryError::NotFound)
    }

    /// Write `doc` back to its `info.yaml` and refresh the cached copy
    pub fn save(&mut self, doc: &Document) -> Result<(), LibraryError> {
        let path = doc
            .info_path()
            .ok_or_else(|| LibraryError::NoFolder(doc.display_title()))?;

        let yaml = serde_yaml::to_string(doc).map_err(|source| LibraryError::Yaml {
            path: path.clone(),
            source,
        })?;
        fs::write(&path, yaml).map_err(|source| LibraryError::Io {
            path: path.clone(),
            source,
        })?;

        match self
            .documents
            .iter_mut()
            .find(|cached| cached.folder() == doc.folder())
        {
            Some(cached) => *cached = doc.clone(),
            None => self.documents.push(doc.clone()),
        }
        tracing::debug!(path = %path.display(), "saved library document");
        Ok(())
    }
}

fn read_info(path: &Path) -> Result<Document, LibraryError> {
    let text = fs::read_to_string(path).map_err(|source| LibraryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let doc: Document = serde_yaml::from_str(&text).map_err(|source| LibraryError::Yaml {
        path: path.to_path_buf(),
        source,
    })?;

    let folder = path.parent().map(Path::to_path_buf).unwrap_or_default();
    Ok(doc.with_folder(folder))
}
