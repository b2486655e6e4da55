//! Mode routing
//!
//! `mxxr` without a subcommand or with `serve` runs the HTTP server, the
//! `db` subcommands run in CLI mode.

#[cfg(feature = "server")]
pub mod server;

#[cfg(feature = "cli")]
pub mod cli;

#[cfg(feature = "server")]
pub use server::run_server;

#[cfg(feature = "cli")]
pub use cli::run_cli;
