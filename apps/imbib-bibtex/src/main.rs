use clap::Parser;
use std::process::ExitCode;

use imbib_bibtex::console::Terminal;
use imbib_bibtex::launcher::SystemLauncher;
use imbib_bibtex::{logging, Cli, Config, Session, SessionError};

fn main() -> ExitCode {
    let cli = Cli::parse();
    logging::init(cli.log.as_deref());

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(SessionError::Cli(err)) => err.exit(),
        Err(err) => {
            eprintln!("error: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<(), SessionError> {
    let mut config = Config::load(cli.config.as_deref())?;
    if let Some(dir) = &cli.lib {
        config.library.dir = dir.to_string_lossy().into_owned();
    }

    let launcher = SystemLauncher::from_config(&config);
    let mut session = Session::new(config, Box::new(Terminal::stdio()), Box::new(launcher));
    imbib_bibtex::run(cli, &mut session)
}
