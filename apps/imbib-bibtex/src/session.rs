//! Session state threaded through chained commands

use imbib_library::{Document, Library};

use crate::config::Config;
use crate::console::Console;
use crate::launcher::Launcher;
use crate::template;
use crate::SessionError;

/// The working set of one invocation
///
/// `documents` is the session document list every command reads and
/// rewrites. The library is opened on first use so that commands which
/// never touch it work without one.
pub struct Session {
    pub documents: Vec<Document>,
    config: Config,
    library: Option<Library>,
    console: Box<dyn Console>,
    launcher: Box<dyn Launcher>,
}

impl Session {
    pub fn new(config: Config, console: Box<dyn Console>, launcher: Box<dyn Launcher>) -> Self {
        Self {
            documents: Vec::new(),
            config,
            library: None,
            console,
            launcher,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    pub fn console(&mut self) -> &mut dyn Console {
        self.console.as_mut()
    }

    pub fn launcher(&mut self) -> &mut dyn Launcher {
        self.launcher.as_mut()
    }

    /// The document library, scanned on first access
    pub fn library(&mut self) -> Result<&mut Library, SessionError> {
        let library = match self.library.take() {
            Some(library) => library,
            None => Library::open(self.config.library_dir())?,
        };
        Ok(self.library.insert(library))
    }

    /// Drop the scanned library so the next access rescans it
    pub fn forget_library(&mut self) {
        self.library = None;
    }

    /// Pick one of the session documents
    pub fn pick_index(&mut self) -> Result<Option<usize>, SessionError> {
        let headers = self.headers(&self.documents);
        self.choose(headers)
    }

    /// Pick one of `docs`, which need not be session documents
    pub fn pick_from(&mut self, docs: &[Document]) -> Result<Option<usize>, SessionError> {
        let headers = self.headers(docs);
        self.choose(headers)
    }

    fn headers(&self, docs: &[Document]) -> Vec<String> {
        docs.iter()
            .map(|doc| template::render(&self.config.library.header_format, doc))
            .collect()
    }

    fn choose(&mut self, headers: Vec<String>) -> Result<Option<usize>, SessionError> {
        match headers.len() {
            0 => Ok(None),
            1 => Ok(Some(0)),
            _ => Ok(self.console.pick("Pick a document", &headers)?),
        }
    }
}
