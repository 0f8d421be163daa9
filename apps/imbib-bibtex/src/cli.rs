//! Command-line parsing
//!
//! Commands chain: `imbib-bibtex read refs.bib sort -k year save out.bib`
//! runs three commands against one session. The global options come first;
//! everything after the first command name is split into one segment per
//! command and each segment is parsed on its own.

use std::path::PathBuf;

use clap::{Arg, CommandFactory, Parser};

use crate::commands::Command;

const AFTER_HELP: &str = "\
Commands (chain as many as needed):
  read      Read a bibtex file into the session documents
  export    Export the session documents
  yaml      Read documents from a YAML file
  json      Read documents from a JSON file
  pick      Reduce the session documents to a single picked one
  cmd       Run a command for every session document
  add       Add documents from the library
  update    Update session documents from, or into, the library
  open      Open a document from the library
  edit      Edit a session document, or its library copy
  rm        Remove a document from the session documents
  ref       Print the reference of a document
  save      Save the session documents in bibtex format
  sort      Sort the session documents by a field

Run `imbib-bibtex <command> --help` for the options of a command.";

#[derive(Parser, Debug)]
#[command(
    name = "imbib-bibtex",
    version,
    about = "Interact with bibtex files and the imbib library",
    after_help = AFTER_HELP,
    arg_required_else_help = true
)]
pub struct Cli {
    /// Do not auto read even if the configuration file says otherwise
    #[arg(long = "no-auto-read", visible_alias = "noar")]
    pub no_auto_read: bool,

    /// Configuration file (default: $IMBIB_CONFIG or <config dir>/imbib/config.toml)
    #[arg(long, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Library directory, overriding the configuration
    #[arg(long, value_name = "DIR")]
    pub lib: Option<PathBuf>,

    /// Log level when RUST_LOG is not set (error, warn, info, debug, trace)
    #[arg(long, value_name = "LEVEL")]
    pub log: Option<String>,

    /// Commands and their arguments
    #[arg(
        value_name = "COMMAND",
        trailing_var_arg = true,
        allow_hyphen_values = true,
        required = true
    )]
    pub commands: Vec<String>,
}

/// Parser for a single chain segment
#[derive(Parser, Debug)]
#[command(name = "imbib-bibtex", no_binary_name = true)]
struct Step {
    #[command(subcommand)]
    command: Command,
}

/// Split the chain into segments and parse each one
pub fn parse_chain(tokens: &[String]) -> Result<Vec<Command>, clap::Error> {
    split_chain(tokens)?
        .into_iter()
        .map(|segment| Step::try_parse_from(segment).map(|step| step.command))
        .collect()
}

/// Split tokens at command names
///
/// A command name does not start a new segment where the current command
/// still expects it: as the value of an option (`export -f json`) or as a
/// required positional argument (`read sort.bib`, `cmd open`).
pub fn split_chain(tokens: &[String]) -> Result<Vec<Vec<String>>, clap::Error> {
    let step = Step::command();
    let mut segments: Vec<Vec<String>> = Vec::new();
    let mut iter = tokens.iter().peekable();

    while let Some(name) = iter.next() {
        let Some(sub) = step.find_subcommand(name) else {
            return Err(unknown_command(name));
        };

        let mut segment = vec![name.clone()];
        // Popped from the back, so the first positional is last
        let mut required: Vec<bool> = sub.get_positionals().map(Arg::is_required_set).collect();
        required.reverse();

        while let Some(token) = iter.peek() {
            let token = token.as_str();
            if token.starts_with('-') && token.len() > 1 {
                segment.push(token.to_string());
                iter.next();
                if option_takes_value(sub, token) {
                    if let Some(value) = iter.next() {
                        segment.push(value.clone());
                    }
                }
                continue;
            }

            let is_command = step.find_subcommand(token).is_some();
            match required.last() {
                Some(&true) => {}
                Some(&false) if !is_command => {}
                _ if is_command => break,
                _ => {}
            }
            required.pop();
            segment.push(token.to_string());
            iter.next();
        }

        segments.push(segment);
    }

    Ok(segments)
}

/// Whether `token` is an option of `sub` whose value is the next token
fn option_takes_value(sub: &clap::Command, token: &str) -> bool {
    if token.contains('=') {
        return false;
    }

    let arg = if let Some(long) = token.strip_prefix("--") {
        sub.get_arguments().find(|a| a.get_long() == Some(long))
    } else {
        let shorts: Vec<char> = token[1..].chars().collect();
        // `-kyear` carries its value inline
        if shorts.len() != 1 {
            return false;
        }
        sub.get_arguments().find(|a| a.get_short() == Some(shorts[0]))
    };

    arg.is_some_and(|a| a.get_action().takes_values())
}

fn unknown_command(name: &str) -> clap::Error {
    let mut cmd = Cli::command();
    cmd.error(
        clap::error::ErrorKind::InvalidSubcommand,
        format!("unknown command `{name}`"),
    )
}
