//! Configuration for imbib-bibtex
//!
//! Loaded from a TOML file:
//!
//! ```toml
//! [library]
//! dir = "~/Documents/papers"
//! header-format = "{doc[title]} - {doc[author]} ({doc[year]})"
//! opentool = ""
//! editor = ""
//!
//! [bibtex]
//! default-read-bibfile = "~/refs.bib"
//! auto-read = true
//! default-save-bibfile = "~/refs.bib"
//! ```
//!
//! The file is the first of `--config PATH`, `$IMBIB_CONFIG` and
//! `<config dir>/imbib/config.toml`. A missing default file means defaults.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

/// Environment variable naming the config file
pub const CONFIG_ENV: &str = "IMBIB_CONFIG";

/// Top-level configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub library: LibraryConfig,
    pub bibtex: BibtexConfig,
}

/// Document library settings
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct LibraryConfig {
    /// Root directory of the document library
    pub dir: String,
    /// How documents are shown when picking
    pub header_format: String,
    /// Program used to open attachments; empty means the system default
    pub opentool: String,
    /// Editor for info files; empty means `$VISUAL`, `$EDITOR`, then `vi`
    pub editor: String,
}

impl Default for LibraryConfig {
    fn default() -> Self {
        let dir = dirs::document_dir()
            .or_else(dirs::home_dir)
            .map(|d| d.join("papers").to_string_lossy().into_owned())
            .unwrap_or_else(|| "papers".to_string());

        Self {
            dir,
            header_format: "{doc[title]} - {doc[author]} ({doc[year]})".to_string(),
            opentool: String::new(),
            editor: String::new(),
        }
    }
}

/// Settings of the bibtex commands
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct BibtexConfig {
    pub default_read_bibfile: String,
    #[serde(deserialize_with = "bool_like")]
    pub auto_read: bool,
    pub default_save_bibfile: String,
}

/// Configuration loading error
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("cannot read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
}

impl Config {
    /// Load configuration from a TOML string
    pub fn from_toml(toml_str: &str) -> Result<Self, toml::de::Error> {
        toml::from_str(toml_str)
    }

    /// Load the configuration file
    ///
    /// An explicit path, or one named by `$IMBIB_CONFIG`, must exist.
    pub fn load(explicit: Option<&Path>) -> Result<Self, ConfigError> {
        let env_path = std::env::var_os(CONFIG_ENV).map(PathBuf::from);
        let required = explicit.map(Path::to_path_buf).or(env_path);

        let path = match required {
            Some(path) => path,
            None => match default_path() {
                Some(path) if path.is_file() => path,
                _ => {
                    tracing::debug!("no config file, using defaults");
                    return Ok(Self::default());
                }
            },
        };

        let text = fs::read_to_string(&path).map_err(|source| ConfigError::Read {
            path: path.clone(),
            source,
        })?;
        let config = Self::from_toml(&text).map_err(|source| ConfigError::Parse {
            path: path.clone(),
            source,
        })?;
        tracing::debug!(path = %path.display(), "loaded config");
        Ok(config)
    }

    pub fn library_dir(&self) -> PathBuf {
        expand_home(&self.library.dir)
    }

    pub fn default_read_bibfile(&self) -> Option<PathBuf> {
        non_empty(&self.bibtex.default_read_bibfile).map(expand_home)
    }

    pub fn default_save_bibfile(&self) -> Option<PathBuf> {
        non_empty(&self.bibtex.default_save_bibfile).map(expand_home)
    }

    pub fn opentool(&self) -> Option<&str> {
        non_empty(&self.library.opentool)
    }

    /// Editor command: config, then `$VISUAL`, `$EDITOR`, `vi`
    pub fn editor(&self) -> String {
        non_empty(&self.library.editor)
            .map(str::to_string)
            .or_else(|| std::env::var("VISUAL").ok().filter(|e| !e.trim().is_empty()))
            .or_else(|| std::env::var("EDITOR").ok().filter(|e| !e.trim().is_empty()))
            .unwrap_or_else(|| "vi".to_string())
    }
}

/// `<config dir>/imbib/config.toml`
pub fn default_path() -> Option<PathBuf> {
    dirs::config_dir().map(|dir| dir.join("imbib").join("config.toml"))
}

/// Expand a leading `~` to the home directory
pub fn expand_home(path: &str) -> PathBuf {
    if path == "~" {
        if let Some(home) = dirs::home_dir() {
            return home;
        }
    } else if let Some(rest) = path.strip_prefix("~/") {
        if let Some(home) = dirs::home_dir() {
            return home.join(rest);
        }
    }
    PathBuf::from(path)
}

fn non_empty(value: &str) -> Option<&str> {
    let trimmed = value.trim();
    (!trimmed.is_empty()).then_some(trimmed)
}

/// Accept `true`/`false` as well as the strings `"yes"`, `"on"`, `"1"`, ...
fn bool_like<'de, D: Deserializer<'de>>(deserializer: D) -> Result<bool, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Bool(bool),
        Text(String),
    }

    match Raw::deserialize(deserializer)? {
        Raw::Bool(value) => Ok(value),
        Raw::Text(text) => match text.trim().to_lowercase().as_str() {
            "true" | "yes" | "on" | "1" => Ok(true),
            "" | "false" | "no" | "off" | "0" => Ok(false),
            other => Err(serde::de::Error::custom(format!(
                "expected a boolean, found `{other}`"
            ))),
        },
    }
}
