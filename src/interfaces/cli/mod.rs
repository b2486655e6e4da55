//! CLI interface module
//!
//! Runs the `mxxr db` migration commands against the package environment.

pub mod commands;

use std::fmt;

use crate::cli::DbCommands;
use crate::env::Environment;
use crate::errors::MxxnError;
use crate::settings::Settings;
use commands::db;

#[derive(Debug)]
pub enum CliError {
    Mxxn(MxxnError),
    CommandError(String),
}

impl CliError {
    /// Format as simple output
    pub fn format_simple(&self) -> String {
        match self {
            CliError::Mxxn(err) => err.message().to_string(),
            CliError::CommandError(msg) => msg.clone(),
        }
    }
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ERROR: {}", self.format_simple())
    }
}

impl std::error::Error for CliError {}

impl From<MxxnError> for CliError {
    fn from(err: MxxnError) -> Self {
        CliError::Mxxn(err)
    }
}

impl From<std::io::Error> for CliError {
    fn from(err: std::io::Error) -> Self {
        CliError::Mxxn(MxxnError::from(err))
    }
}

/// Run a `mxxr db` command from clap-parsed input
pub async fn run_db_command(
    cmd: DbCommands,
    env: &Environment,
    settings: &Settings,
) -> Result<(), CliError> {
    match cmd {
        DbCommands::Init { package } => db::init(env, &package).await,

        DbCommands::Upgrade { revision } => db::upgrade(env, settings, &revision).await,

        DbCommands::Downgrade { revision } => db::downgrade(env, settings, &revision).await,

        DbCommands::Branches { verbose } => db::branches(env, settings, verbose).await,

        DbCommands::Current { verbose } => db::current(env, settings, verbose).await,

        DbCommands::Heads { verbose } => db::heads_command(env, settings, verbose).await,

        DbCommands::History {
            rev_range,
            verbose,
            indicate_current,
        } => db::history(env, settings, rev_range.as_deref(), verbose, indicate_current).await,

        DbCommands::Merge { revisions, message } => {
            db::merge(env, settings, &revisions, message.as_deref()).await
        }

        DbCommands::Show { revision } => db::show(env, settings, &revision).await,

        DbCommands::Revision { message, head } => db::revision(env, &message, &head).await,
    }
}
