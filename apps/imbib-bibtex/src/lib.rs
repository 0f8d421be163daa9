//! imbib-bibtex: chained commands over bibtex files and the imbib library
//!
//! ```bash
//! imbib-bibtex read refs.bib add einstein update --from sort -k year save -f
//! ```
//!
//! Each invocation starts an empty [`Session`]; every command on the command
//! line reads and rewrites its document list in turn.

pub mod cli;
pub mod commands;
pub mod config;
pub mod console;
pub mod error;
pub mod launcher;
pub mod logging;
pub mod session;
pub mod template;

pub use cli::Cli;
pub use commands::{Command, ExportFormat};
pub use config::Config;
pub use error::SessionError;
pub use session::Session;

/// Run the commands of `cli` against `session`
///
/// The whole chain is parsed before anything runs, so a typo in the last
/// command does not leave a half-executed chain behind.
pub fn run(cli: &Cli, session: &mut Session) -> Result<(), SessionError> {
    let commands = cli::parse_chain(&cli.commands)?;

    if cli.no_auto_read {
        tracing::info!("Setting auto-read to False");
    } else {
        auto_read(session)?;
    }

    for command in commands {
        command.run(session)?;
    }
    Ok(())
}

/// Read `bibtex.default-read-bibfile` when `bibtex.auto-read` is on
fn auto_read(session: &mut Session) -> Result<(), SessionError> {
    if !session.config().bibtex.auto_read {
        return Ok(());
    }
    let bibfile = session.config().default_read_bibfile();
    match bibfile {
        Some(bibfile) if bibfile.exists() => {
            tracing::info!("auto reading {}", bibfile.display());
            Command::Read { bibfile }.run(session)
        }
        _ => Ok(()),
    }
}
