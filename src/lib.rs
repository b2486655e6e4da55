//! Mxxn - a host for web applications assembled from packages
//!
//! An application consists of the framework package, any number of plugin
//! packages (mxns) and at most one application package (mxnapp). Each
//! package contributes REST resources, static files, themes, strings and
//! database migrations. At startup the framework merges everything into one
//! routing table, where the application package may cover routes and static
//! files of the other packages.
//!
//! # Features
//! - **server**: HTTP server mode (default)
//! - **cli**: The `mxxr db` migration commands
//!
//! # Architecture
//! - `env`: Package registration
//! - `settings`: The INI settings file
//! - `routing`: Route table and static files with covers
//! - `configs`: Themes and strings
//! - `api`: REST resources and middleware
//! - `database`: Connection and migrations
//! - `client`: Client-side state wrappers
//! - `interfaces`: The command line
//! - `runtime`: Application lifecycle and execution modes

use std::path::PathBuf;

pub mod api;
pub mod application;
pub mod cli;
pub mod client;
pub mod configs;
pub mod database;
pub mod env;
pub mod errors;
#[cfg(feature = "cli")]
pub mod interfaces;
pub mod routing;
pub mod runtime;
pub mod settings;
pub mod system;
pub mod utils;

/// Directory of the framework package in the source tree.
///
/// Holds the static files, themes and strings of the framework. Installed
/// binaries resolve the package with [`env::framework_root`].
pub fn package_root() -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("package")
}
