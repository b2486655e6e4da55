//! Application settings.
//!
//! Settings are read from an INI file named by the `MXXN_SETTINGS` environment
//! variable, or from `settings.ini` in the current working directory. Without
//! a file every value falls back to its default, so an application can be
//! started without any settings at all. Single values can be overridden with
//! environment variables of the form `MXXN__<SECTION>__<KEY>`.
//!
//! | Section  | Variable        | Description                       |
//! |----------|-----------------|-----------------------------------|
//! | mxxn     | enabled_mxns    | List of enabled mxns              |
//! | mxxn     | app_path        | Application directory             |
//! | mxxn     | data_path       | Data directory                    |
//! | database | url             | Database URL                      |
//! | database | pool_size       | Pool size of non-SQLite databases |
//! | server   | host/port/...   | HTTP server                       |
//! | logging  | level/format/...| Logging                           |

mod structs;

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use tracing::debug;

pub use structs::{DatabaseSettings, LoggingSettings, ServerSettings};
use structs::RawSettings;

use crate::errors::{MxxnError, Result};
use crate::system::logging::targets;

/// Environment variable naming the settings file.
pub const SETTINGS_ENV: &str = "MXXN_SETTINGS";

/// Name of the settings file looked up in the working directory.
pub const SETTINGS_FILE: &str = "settings.ini";

/// Resolved settings of the application.
#[derive(Debug, Clone)]
pub struct Settings {
    enabled_mxns: Option<Vec<String>>,
    app_path: PathBuf,
    data_path: PathBuf,
    pub database: DatabaseSettings,
    pub server: ServerSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    /// Load the settings from the resolved settings file and the environment.
    pub fn load() -> Result<Self> {
        let file = Self::file()?;
        Self::from_file(file.as_deref())
    }

    /// Load the settings from the given file (or only the environment if
    /// `None`).
    pub fn from_file(file: Option<&Path>) -> Result<Self> {
        let mut builder = Config::builder();

        if let Some(path) = file {
            builder = builder.add_source(File::from(path).format(FileFormat::Ini));
        }

        let raw: RawSettings = builder
            .add_source(Environment::with_prefix("MXXN").separator("__"))
            .build()
            .map_err(|e| settings_error(file, e))?
            .try_deserialize()
            .map_err(|e| settings_error(file, e))?;

        if let Some(path) = file {
            debug!(target: targets::SETTINGS, "Settings loaded from {}", path.display());
        }

        Self::resolve(raw)
    }

    /// Path of the settings file, if any.
    ///
    /// A file named in `MXXN_SETTINGS` must exist. Otherwise `settings.ini` in
    /// the working directory is used when present.
    pub fn file() -> Result<Option<PathBuf>> {
        if let Some(value) = std::env::var_os(SETTINGS_ENV) {
            let path = PathBuf::from(value);
            if path.is_file() {
                return Ok(Some(absolute(&path)?));
            }
            return Err(MxxnError::file_not_exist(format!(
                "The settings file in the environment variable {} does not exist.",
                SETTINGS_ENV
            )));
        }

        let path = std::env::current_dir()?.join(SETTINGS_FILE);
        if path.is_file() {
            return Ok(Some(path));
        }

        Ok(None)
    }

    fn resolve(raw: RawSettings) -> Result<Self> {
        let enabled_mxns = raw
            .mxxn
            .enabled_mxns
            .as_deref()
            .map(|value| {
                parse_list(value).ok_or_else(|| {
                    MxxnError::settings_format(
                        "The format of variable \"enabled_mxns\" in the \"mxxn\" section must be \"array\".",
                    )
                })
            })
            .transpose()?;

        let app_path = match raw.mxxn.app_path.as_deref() {
            Some(value) => existing_dir(value, "app_path")?,
            None => std::env::current_dir()?,
        };

        let data_path = match raw.mxxn.data_path.as_deref() {
            Some(value) => existing_dir(value, "data_path")?,
            None => app_path.join("data"),
        };

        let url = raw
            .database
            .url
            .unwrap_or_else(|| default_database_url(&data_path));

        Ok(Self {
            enabled_mxns,
            app_path,
            data_path,
            database: DatabaseSettings {
                url,
                pool_size: raw.database.pool_size.unwrap_or(10),
            },
            server: raw.server,
            logging: raw.logging,
        })
    }

    /// The enabled mxns in configured order.
    ///
    /// `None` means the variable was not set, so every installed mxn is
    /// enabled. An empty list disables all of them.
    pub fn enabled_mxns(&self) -> Option<&[String]> {
        self.enabled_mxns.as_deref()
    }

    /// The directory holding the runtime data of the application.
    pub fn app_path(&self) -> &Path {
        &self.app_path
    }

    /// The data directory, `<app_path>/data` unless configured.
    pub fn data_path(&self) -> &Path {
        &self.data_path
    }

    pub fn with_enabled_mxns<S: Into<String>>(
        mut self,
        mxns: Option<impl IntoIterator<Item = S>>,
    ) -> Self {
        self.enabled_mxns = mxns.map(|mxns| mxns.into_iter().map(Into::into).collect());
        self
    }

    pub fn with_database_url(mut self, url: impl Into<String>) -> Self {
        self.database.url = url.into();
        self
    }
}

impl Default for Settings {
    fn default() -> Self {
        let app_path = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
        let data_path = app_path.join("data");
        Self {
            enabled_mxns: None,
            database: DatabaseSettings {
                url: default_database_url(&data_path),
                pool_size: 10,
            },
            app_path,
            data_path,
            server: ServerSettings::default(),
            logging: LoggingSettings::default(),
        }
    }
}

fn settings_error(file: Option<&Path>, err: config::ConfigError) -> MxxnError {
    match file {
        Some(path) => MxxnError::settings_format(format!(
            "The settings file {} is not in the required format: {}",
            path.display(),
            err
        )),
        None => MxxnError::from(err),
    }
}

fn default_database_url(data_path: &Path) -> String {
    format!("sqlite://{}?mode=rwc", data_path.join("mxxn.db").display())
}

fn absolute(path: &Path) -> Result<PathBuf> {
    Ok(std::path::absolute(path)?)
}

fn existing_dir(value: &str, variable: &str) -> Result<PathBuf> {
    let path = PathBuf::from(value);
    if path.is_dir() {
        return absolute(&path);
    }
    Err(MxxnError::path_not_exist(format!(
        "The {} from the settings file does not exist.",
        variable
    )))
}

/// Parse a list literal such as `['mxnone', "mxntwo"]`.
///
/// Items may be single quoted, double quoted or bare words; quoted items may
/// contain commas. Returns `None` if the value is not a bracketed list.
pub(crate) fn parse_list(value: &str) -> Option<Vec<String>> {
    let inner = value
        .trim()
        .strip_prefix('[')?
        .strip_suffix(']')?
        .trim();

    if inner.is_empty() {
        return Some(Vec::new());
    }

    let mut items = Vec::new();
    for item in split_items(inner)? {
        let unquoted = match item.chars().next() {
            Some(quote @ ('\'' | '"')) => {
                let unquoted = item.strip_prefix(quote)?.strip_suffix(quote)?;
                if unquoted.contains(quote) {
                    return None;
                }
                unquoted
            }
            Some(_) if !item.contains(['\'', '"', '[', ']']) => item,
            _ => return None,
        };

        if unquoted.is_empty() {
            return None;
        }
        items.push(unquoted.to_string());
    }

    Some(items)
}

/// Split at the commas outside of quotes, dropping one trailing comma.
fn split_items(inner: &str) -> Option<Vec<&str>> {
    let mut items = Vec::new();
    let mut quote = None;
    let mut start = 0;

    for (index, c) in inner.char_indices() {
        match quote {
            Some(open) if c == open => quote = None,
            Some(_) => {}
            None if c == '\'' || c == '"' => quote = Some(c),
            None if c == ',' => {
                items.push(inner[start..index].trim());
                start = index + 1;
            }
            None => {}
        }
    }

    if quote.is_some() {
        return None;
    }

    let last = inner[start..].trim();
    if !last.is_empty() || items.is_empty() {
        items.push(last);
    }
    Some(items)
}
