//! External programs: opener, editor and `cmd` commands

use std::path::Path;
use std::process::Command;

use crate::config::Config;
use crate::SessionError;

pub trait Launcher {
    /// Open a file or folder with the configured or system opener
    fn open(&mut self, path: &Path) -> Result<(), SessionError>;

    /// Edit a file and wait for the editor to exit
    fn edit(&mut self, path: &Path) -> Result<(), SessionError>;

    /// Run a program with arguments, without a shell
    fn run(&mut self, argv: &[String]) -> Result<(), SessionError>;
}

/// Launches real processes
#[derive(Debug, Clone)]
pub struct SystemLauncher {
    opentool: Option<String>,
    editor: String,
}

impl SystemLauncher {
    pub fn new(opentool: Option<String>, editor: String) -> Self {
        Self { opentool, editor }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.opentool().map(str::to_string), config.editor())
    }
}

impl Launcher for SystemLauncher {
    fn open(&mut self, path: &Path) -> Result<(), SessionError> {
        tracing::debug!(path = %path.display(), "opening");
        match &self.opentool {
            Some(tool) => spawn(tool, path, false),
            None => open::that(path).map_err(|err| SessionError::Launch {
                program: "system opener".to_string(),
                reason: err.to_string(),
            }),
        }
    }

    fn edit(&mut self, path: &Path) -> Result<(), SessionError> {
        tracing::debug!(path = %path.display(), editor = %self.editor, "editing");
        spawn(&self.editor, path, true)
    }

    fn run(&mut self, argv: &[String]) -> Result<(), SessionError> {
        let line = shell_words::join(argv);
        let Some((program, args)) = argv.split_first() else {
            return Err(SessionError::Launch {
                program: line,
                reason: "empty command".to_string(),
            });
        };

        tracing::debug!(command = %line, "running");
        let status = Command::new(program)
            .args(args)
            .status()
            .map_err(|err| SessionError::Launch {
                program: line.clone(),
                reason: err.to_string(),
            })?;
        if !status.success() {
            tracing::warn!(command = %line, %status, "command failed");
        }
        Ok(())
    }
}

/// Run `program` (which may carry arguments, e.g. `code -w`) on `path`
fn spawn(program: &str, path: &Path, wait: bool) -> Result<(), SessionError> {
    let mut parts = program.split_whitespace();
    let Some(binary) = parts.next() else {
        return Err(SessionError::Launch {
            program: program.to_string(),
            reason: "empty command".to_string(),
        });
    };

    let mut command = Command::new(binary);
    command.args(parts).arg(path);

    let launch_error = |err: std::io::Error| SessionError::Launch {
        program: program.to_string(),
        reason: err.to_string(),
    };

    if !wait {
        command.spawn().map_err(launch_error)?;
        return Ok(());
    }

    let status = command.status().map_err(launch_error)?;
    if status.success() {
        Ok(())
    } else {
        Err(SessionError::Launch {
            program: program.to_string(),
            reason: format!("exited with {status}"),
        })
    }
}
