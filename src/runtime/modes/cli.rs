//! CLI mode

use crate::cli::DbCommands;
use crate::env::Environment;
use crate::interfaces::cli::{CliError, run_db_command};
use crate::settings::Settings;

/// Run a migration command.
pub async fn run_cli(cmd: DbCommands, env: &Environment, settings: &Settings) -> Result<(), CliError> {
    run_db_command(cmd, env, settings).await
}
