//! Themes and strings.
//!
//! Each package may ship a theme and a strings configuration directory (see
//! [`ConfigDir`]). A theme or a locale is requested by id and aggregated over
//! the framework, the enabled mxns and the application:
//!
//! ```json
//! {"mxxn": {...}, "mxns": {"mxnone": {...}}, "mxnapp": {...}}
//! ```

mod dir;

pub use dir::ConfigDir;

use serde_json::{Map, Value};

use crate::env::{Environment, Package};
use crate::errors::{MxxnError, Result};
use crate::settings::Settings;

/// The two kinds of aggregated configurations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigKind {
    Themes,
    Strings,
}

impl ConfigKind {
    fn path(self, package: &Package) -> Option<std::path::PathBuf> {
        match self {
            ConfigKind::Themes => package.themes_path(),
            ConfigKind::Strings => package.strings_path(),
        }
    }

    fn label(self) -> &'static str {
        match self {
            ConfigKind::Themes => "theme",
            ConfigKind::Strings => "strings",
        }
    }

    fn missing(self) -> MxxnError {
        match self {
            ConfigKind::Themes => {
                MxxnError::no_theme_config("The mxxn package has no theme configuration directory.")
            }
            ConfigKind::Strings => MxxnError::no_strings_config(
                "The mxxn package has no strings configuration directory.",
            ),
        }
    }
}

/// The configuration directory of the framework package.
pub fn mxxn_dir(env: &Environment, kind: ConfigKind) -> Result<ConfigDir> {
    let path = kind.path(env.mxxn()).ok_or_else(|| kind.missing())?;
    ConfigDir::open(path)
}

/// Aggregated configuration of the given id.
///
/// The id must exist in the framework directory. Mxns and the application
/// fall back to their default configuration when they lack the id, but
/// their default must be the framework default.
pub fn aggregate(env: &Environment, settings: &Settings, kind: ConfigKind, id: &str) -> Result<Value> {
    let mxxn = mxxn_dir(env, kind)?;
    let mxxn_config = mxxn.load(id)?;

    let mut mxns = Map::new();
    for mxn in env.mxns(settings)? {
        mxns.insert(
            mxn.name().to_string(),
            package_config(mxn, &mxxn, kind, id)?,
        );
    }

    let app_config = match env.app() {
        Ok(app) => package_config(app.package(), &mxxn, kind, id)?,
        Err(_) => Value::Object(Map::new()),
    };

    let mut aggregated = Map::new();
    aggregated.insert("mxxn".to_string(), mxxn_config);
    aggregated.insert("mxns".to_string(), Value::Object(mxns));
    aggregated.insert("mxnapp".to_string(), app_config);

    Ok(Value::Object(aggregated))
}

/// Aggregated theme, see [`aggregate`].
pub fn theme(env: &Environment, settings: &Settings, id: &str) -> Result<Value> {
    aggregate(env, settings, ConfigKind::Themes, id)
}

/// Aggregated strings of a locale, see [`aggregate`].
pub fn strings(env: &Environment, settings: &Settings, locale: &str) -> Result<Value> {
    aggregate(env, settings, ConfigKind::Strings, locale)
}

fn package_config(package: &Package, mxxn: &ConfigDir, kind: ConfigKind, id: &str) -> Result<Value> {
    let Some(path) = kind.path(package) else {
        return Ok(Value::Object(Map::new()));
    };

    let dir = ConfigDir::open(path)?;
    if dir.default_name() != mxxn.default_name() {
        return Err(MxxnError::not_same_defaults(format!(
            "The default {} of the package {} is {}, but the default of mxxn is {}.",
            kind.label(),
            package.name(),
            dir.default_name(),
            mxxn.default_name()
        )));
    }

    if dir.contains(id) {
        dir.load(id)
    } else {
        dir.load(dir.default_name())
    }
}
