//! The chainable commands
//!
//! Every command takes the session, reads and rewrites its document list,
//! and returns. Commands run in the order given on the command line.

mod files;
mod library;
mod select;

use std::path::PathBuf;

use clap::{Subcommand, ValueEnum};
use imbib_codec::Format;

use crate::{Session, SessionError};

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Read a bibtex file into the session documents
    Read {
        /// Bibtex file to read
        bibfile: PathBuf,
    },

    /// Export the session documents
    Export {
        /// Output format
        #[arg(short, long, value_enum, default_value_t = ExportFormat::Bibtex)]
        format: ExportFormat,

        /// Write to this file instead of stdout
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Read documents from a YAML file
    Yaml {
        /// YAML file to read
        yamlfile: PathBuf,
    },

    /// Read documents from a JSON file
    Json {
        /// JSON file to read
        jsonfile: PathBuf,
    },

    /// Reduce the session documents to a single picked one
    Pick {
        /// Pick the N-th document (1-based) without prompting
        #[arg(short, long, value_name = "N")]
        number: Option<usize>,
    },

    /// Run a command for every session document, e.g. `cmd 'echo {doc[ref]}'`
    Cmd {
        /// Command line with `{doc[key]}` placeholders
        #[arg(allow_hyphen_values = true)]
        command: String,
    },

    /// Add documents from the library
    Add {
        /// Library query, e.g. `author:einstein 1905`
        query: Option<String>,

        /// Add all searched documents
        #[arg(short, long)]
        all: bool,
    },

    /// Update session documents from, or into, the library
    Update {
        /// Update all session documents
        #[arg(short, long)]
        all: bool,

        /// Replace the session document with the library document
        #[arg(short, long)]
        from: bool,

        /// Write the session document's fields into the library document
        #[arg(short, long)]
        to: bool,
    },

    /// Open the library copy of a session document
    Open,

    /// Edit a session document
    Edit {
        /// Edit the document in the library instead
        #[arg(short, long)]
        lib: bool,
    },

    /// Remove a document from the session documents
    Rm,

    /// Print the reference of a document
    Ref {
        /// Write the reference to a file
        #[arg(short, long, value_name = "FILE")]
        out: Option<PathBuf>,
    },

    /// Save the session documents in bibtex format
    Save {
        /// Target file (default: bibtex.default-save-bibfile)
        bibfile: Option<PathBuf>,

        /// Do not ask for confirmation
        #[arg(short, long)]
        force: bool,
    },

    /// Sort the session documents by a field
    Sort {
        /// Field to order by
        #[arg(short, long)]
        key: String,

        /// Reverse the order
        #[arg(short, long)]
        reverse: bool,
    },
}

/// Formats offered by `export`
#[derive(ValueEnum, Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ExportFormat {
    #[default]
    Bibtex,
    Yaml,
    Json,
}

impl From<ExportFormat> for Format {
    fn from(format: ExportFormat) -> Self {
        match format {
            ExportFormat::Bibtex => Format::Bibtex,
            ExportFormat::Yaml => Format::Yaml,
            ExportFormat::Json => Format::Json,
        }
    }
}

impl Command {
    /// Command name as typed on the command line
    pub fn name(&self) -> &'static str {
        match self {
            Self::Read { .. } => "read",
            Self::Export { .. } => "export",
            Self::Yaml { .. } => "yaml",
            Self::Json { .. } => "json",
            Self::Pick { .. } => "pick",
            Self::Cmd { .. } => "cmd",
            Self::Add { .. } => "add",
            Self::Update { .. } => "update",
            Self::Open => "open",
            Self::Edit { .. } => "edit",
            Self::Rm => "rm",
            Self::Ref { .. } => "ref",
            Self::Save { .. } => "save",
            Self::Sort { .. } => "sort",
        }
    }

    pub fn run(self, session: &mut Session) -> Result<(), SessionError> {
        tracing::debug!(command = self.name(), "running command");
        match self {
            Self::Read { bibfile } => files::read(session, &bibfile),
            Self::Export { format, out } => files::export(session, format.into(), out.as_deref()),
            Self::Yaml { yamlfile } => files::yaml(session, &yamlfile),
            Self::Json { jsonfile } => files::json(session, &jsonfile),
            Self::Save { bibfile, force } => files::save(session, bibfile, force),
            Self::Pick { number } => select::pick(session, number),
            Self::Rm => select::rm(session),
            Self::Ref { out } => select::reference(session, out.as_deref()),
            Self::Sort { key, reverse } => select::sort(session, &key, reverse),
            Self::Cmd { command } => select::cmd(session, &command),
            Self::Add { query, all } => library::add(session, query.as_deref(), all),
            Self::Update { all, from, to } => library::update(session, all, from, to),
            Self::Open => library::open(session),
            Self::Edit { lib } => library::edit(session, lib),
        }
    }
}
