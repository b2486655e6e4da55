//! Application lifecycle and execution modes

pub mod lifetime;
pub mod modes;

use clap::Parser;
use colored::Colorize;

use crate::cli::{Cli, Commands};
use crate::env::Environment;
use crate::errors::MxxnError;
use crate::settings::Settings;

/// Entry point of `mxxr`.
///
/// Loads the settings, initializes logging and runs the server or the
/// requested migration command. Errors are printed as `ERROR: ...` and end
/// the process with status 1.
pub async fn run(env: Environment) -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match Settings::load() {
        Ok(settings) => settings,
        Err(e) => fail(e.message()),
    };

    let _guard = match crate::system::logging::init_logging(&settings.logging) {
        Ok(guard) => guard,
        Err(e) => fail(e.message()),
    };

    match cli.command.unwrap_or(Commands::Serve) {
        Commands::Serve => serve(env, settings).await,
        #[cfg(feature = "cli")]
        Commands::Db { action } => {
            if let Err(e) = modes::run_cli(action, &env, &settings).await {
                fail(&e.format_simple());
            }
            Ok(())
        }
    }
}

#[cfg(feature = "server")]
async fn serve(env: Environment, settings: Settings) -> anyhow::Result<()> {
    if let Err(e) = modes::run_server(env, settings).await {
        fail(&error_message(&e));
    }
    Ok(())
}

#[cfg(not(feature = "server"))]
async fn serve(_env: Environment, _settings: Settings) -> anyhow::Result<()> {
    fail("mxxr was built without the server feature.")
}

/// The message of the framework error behind `error`, or the whole chain.
fn error_message(error: &anyhow::Error) -> String {
    error
        .chain()
        .find_map(|cause| cause.downcast_ref::<MxxnError>())
        .map(|e| e.message().to_string())
        .unwrap_or_else(|| format!("{:#}", error))
}

/// Print `ERROR: <message>` and exit with status 1.
pub fn fail(message: &str) -> ! {
    eprintln!("{} {}", "ERROR:".red().bold(), message);
    std::process::exit(1);
}
