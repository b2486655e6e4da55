use std::fs;
use std::path::{Path, PathBuf};

use serde_json::Value;
use tracing::trace;

use crate::errors::{MxxnError, Result};
use crate::system::logging::targets;
use crate::utils::dicts;

const DEFAULT_SUFFIX: &str = "-default.json";
const JSON_SUFFIX: &str = ".json";

/// A directory of JSON configuration files.
///
/// The directory holds one configuration per file, for example one file per
/// theme. Exactly one file must carry the `-default.json` suffix; it is the
/// base every other configuration is merged into.
///
/// ```text
/// themes/
///   light-default.json    -> "light"
///   dark.json             -> "dark"
/// ```
#[derive(Debug, Clone)]
pub struct ConfigDir {
    path: PathBuf,
    default: String,
    names: Vec<String>,
}

impl ConfigDir {
    /// Open and validate a configuration directory.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        if !path.is_dir() {
            return Err(MxxnError::path_not_exist(format!(
                "The configuration directory {} does not exist.",
                path.display()
            )));
        }

        let mut files = Vec::new();
        for entry in fs::read_dir(&path)? {
            let entry = entry?;
            if entry.file_type()?.is_file() {
                files.push(entry.file_name().to_string_lossy().into_owned());
            }
        }

        if let Some(file) = files.iter().find(|f| !f.ends_with(JSON_SUFFIX)) {
            return Err(MxxnError::config_format(format!(
                "The file {} in {} is not a JSON file.",
                file,
                path.display()
            )));
        }

        let defaults: Vec<&String> = files.iter().filter(|f| f.ends_with(DEFAULT_SUFFIX)).collect();
        let default = match defaults.as_slice() {
            [] => {
                return Err(MxxnError::no_default_config(format!(
                    "There is no default configuration in {}.",
                    path.display()
                )));
            }
            [file] => file.trim_end_matches(DEFAULT_SUFFIX).to_string(),
            _ => {
                return Err(MxxnError::too_many_default_configs(format!(
                    "There are {} default configurations in {}.",
                    defaults.len(),
                    path.display()
                )));
            }
        };

        let mut names: Vec<String> = files
            .iter()
            .map(|f| {
                f.strip_suffix(DEFAULT_SUFFIX)
                    .or_else(|| f.strip_suffix(JSON_SUFFIX))
                    .unwrap_or(f)
                    .to_string()
            })
            .collect();
        names.sort();
        names.dedup();

        Ok(Self {
            path,
            default,
            names,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Name of the default configuration.
    pub fn default_name(&self) -> &str {
        &self.default
    }

    /// Sorted names of all configurations.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Load a configuration merged into the default one.
    pub fn load(&self, name: &str) -> Result<Value> {
        if !self.contains(name) {
            return Err(MxxnError::config_not_found(format!(
                "The configuration {} does not exist in {}.",
                name,
                self.path.display()
            )));
        }

        let mut config = self.read(&format!("{}{}", self.default, DEFAULT_SUFFIX))?;

        if name != self.default {
            let overlay = self.read(&format!("{}{}", name, JSON_SUFFIX))?;
            dicts::merge(&mut config, &overlay);
        }

        Ok(config)
    }

    fn read(&self, file: &str) -> Result<Value> {
        let path = self.path.join(file);
        trace!(target: targets::FILESYSTEM, "Reading configuration {}", path.display());

        let content = fs::read_to_string(&path)?;
        serde_json::from_str(&content).map_err(|e| {
            MxxnError::config_format(format!(
                "The configuration file {} is not valid JSON: {}",
                path.display(),
                e
            ))
        })
    }
}
