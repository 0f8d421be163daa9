//! Shared test fixtures: a scripted console, a recording launcher and a
//! temporary library with a bibtex file next to it.

#![allow(dead_code)]

use std::cell::RefCell;
use std::collections::VecDeque;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use clap::Parser;
use imbib_bibtex::console::Console;
use imbib_bibtex::launcher::Launcher;
use imbib_bibtex::{Cli, Config, Session, SessionError};
use tempfile::TempDir;

pub const REFS_BIB: &str = r#"@article{Turing1950,
  author = {Turing, Alan},
  title = {Computing Machinery and Intelligence},
  journal = {Mind},
  year = 1950
}

@article{Einstein1905,
  author = {Einstein, Albert},
  title = {On the Electrodynamics of Moving Bodies},
  year = {1905}
}

@book{Knuth1984,
  author = {Knuth, Donald E.},
  title = {The {\TeX}book},
  year = {1984}
}

@misc{NoYear,
  title = {Untitled notes}
}
"#;

/// Answers for the console, consumed in order
#[derive(Default)]
pub struct Script {
    pub picks: Vec<Option<usize>>,
    pub confirms: Vec<bool>,
    /// Written over the file whenever the launcher edits one
    pub edited: Option<String>,
}

impl Script {
    pub fn picks(picks: &[Option<usize>]) -> Self {
        Self {
            picks: picks.to_vec(),
            ..Self::default()
        }
    }

    pub fn confirms(confirms: &[bool]) -> Self {
        Self {
            confirms: confirms.to_vec(),
            ..Self::default()
        }
    }
}

pub struct ScriptedConsole {
    picks: VecDeque<Option<usize>>,
    confirms: VecDeque<bool>,
    printed: Rc<RefCell<Vec<String>>>,
}

impl Console for ScriptedConsole {
    fn pick(&mut self, _prompt: &str, items: &[String]) -> io::Result<Option<usize>> {
        let answer = self
            .picks
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected pick among {items:?}"));
        Ok(answer)
    }

    fn confirm(&mut self, question: &str, _default: bool) -> io::Result<bool> {
        Ok(self
            .confirms
            .pop_front()
            .unwrap_or_else(|| panic!("unexpected question: {question}")))
    }

    fn print(&mut self, text: &str) -> io::Result<()> {
        self.printed.borrow_mut().push(text.to_string());
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Launched {
    Open(PathBuf),
    Edit(PathBuf),
    Run(Vec<String>),
}

pub struct RecordingLauncher {
    edited: Option<String>,
    launched: Rc<RefCell<Vec<Launched>>>,
}

impl Launcher for RecordingLauncher {
    fn open(&mut self, path: &Path) -> Result<(), SessionError> {
        self.launched.borrow_mut().push(Launched::Open(path.to_path_buf()));
        Ok(())
    }

    fn edit(&mut self, path: &Path) -> Result<(), SessionError> {
        self.launched.borrow_mut().push(Launched::Edit(path.to_path_buf()));
        if let Some(content) = &self.edited {
            fs::write(path, content).unwrap();
        }
        Ok(())
    }

    fn run(&mut self, argv: &[String]) -> Result<(), SessionError> {
        self.launched.borrow_mut().push(Launched::Run(argv.to_vec()));
        Ok(())
    }
}

/// A session over a temporary library, plus `refs.bib` in the same dir
pub struct Fixture {
    pub dir: TempDir,
    pub session: Session,
    pub printed: Rc<RefCell<Vec<String>>>,
    pub launched: Rc<RefCell<Vec<Launched>>>,
}

impl Fixture {
    pub fn new(script: Script) -> Self {
        Self::with_config(script, |_, _| {})
    }

    /// Build a fixture, letting `configure` adjust the config; it gets the
    /// temporary directory as second argument
    pub fn with_config(script: Script, configure: impl FnOnce(&mut Config, &Path)) -> Self {
        let dir = TempDir::new().unwrap();
        write_library(&dir.path().join("library"));
        fs::write(dir.path().join("refs.bib"), REFS_BIB).unwrap();

        let mut config = Config::default();
        config.library.dir = dir.path().join("library").to_string_lossy().into_owned();
        configure(&mut config, dir.path());

        let printed = Rc::new(RefCell::new(Vec::new()));
        let launched = Rc::new(RefCell::new(Vec::new()));
        let console = ScriptedConsole {
            picks: script.picks.into(),
            confirms: script.confirms.into(),
            printed: Rc::clone(&printed),
        };
        let launcher = RecordingLauncher {
            edited: script.edited,
            launched: Rc::clone(&launched),
        };

        Self {
            dir,
            session: Session::new(config, Box::new(console), Box::new(launcher)),
            printed,
            launched,
        }
    }

    pub fn path(&self, name: &str) -> PathBuf {
        self.dir.path().join(name)
    }

    pub fn path_str(&self, name: &str) -> String {
        self.path(name).to_string_lossy().into_owned()
    }

    /// Parse `args` like the binary does and run them
    pub fn run(&mut self, args: &[&str]) -> Result<(), SessionError> {
        let argv = std::iter::once("imbib-bibtex").chain(args.iter().copied());
        let cli = Cli::try_parse_from(argv)?;
        imbib_bibtex::run(&cli, &mut self.session)
    }

    /// Run `read refs.bib` followed by `args`
    pub fn run_on_refs(&mut self, args: &[&str]) -> Result<(), SessionError> {
        let refs = self.path_str("refs.bib");
        let mut full = vec!["read", refs.as_str()];
        full.extend_from_slice(args);
        self.run(&full)
    }

    pub fn refs(&self) -> Vec<String> {
        self.session
            .documents
            .iter()
            .map(|doc| doc.get("ref").unwrap_or_default())
            .collect()
    }

    pub fn printed(&self) -> Vec<String> {
        self.printed.borrow().clone()
    }

    pub fn launched(&self) -> Vec<Launched> {
        self.launched.borrow().clone()
    }
}

pub fn run(words: &[&str]) -> Launched {
    Launched::Run(words.iter().map(|w| w.to_string()).collect())
}

pub fn write_info(root: &Path, folder: &str, yaml: &str) {
    let dir = root.join(folder);
    fs::create_dir_all(&dir).unwrap();
    fs::write(dir.join("info.yaml"), yaml).unwrap();
}

/// Library order (by folder name): einstein, shannon, turing
fn write_library(root: &Path) {
    write_info(
        root,
        "einstein-1905",
        "author: Einstein, Albert\n\
         title: On the Electrodynamics of Moving Bodies\n\
         year: 1905\n\
         ref: Einstein1905\n\
         doi: 10.1002/andp.19053221004\n\
         files:\n- paper.pdf\n",
    );
    write_info(
        root,
        "shannon-1948",
        "author: Shannon, Claude E.\n\
         title: A Mathematical Theory of Communication\n\
         year: 1948\n\
         ref: Shannon1948\n",
    );
    write_info(
        root,
        "turing-1950",
        "author: Turing, Alan\n\
         title: Computing Machinery and Intelligence\n\
         year: 1950\n\
         ref: Turing1950\n",
    );
}
