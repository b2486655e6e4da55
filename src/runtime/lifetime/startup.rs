use anyhow::{Context, Result};
use tracing::{debug, info};

use crate::application::Application;
use crate::env::Environment;
use crate::settings::Settings;
use crate::system::logging::targets;

/// Assemble the application before the server starts.
///
/// Route and static file registration errors abort the startup.
pub fn prepare_server_startup(env: Environment, settings: Settings) -> Result<Application> {
    let start_time = std::time::Instant::now();
    debug!(target: targets::REGISTRATION, "Starting pre-startup processing...");

    let app = Application::new(env, settings).context("Failed to register the packages")?;

    for entry in app.routes().entries() {
        debug!(
            target: targets::REGISTRATION,
            "{} -> {}{}",
            entry.url,
            entry.owner,
            if entry.covered { " (covered)" } else { "" }
        );
    }

    info!(
        target: targets::REGISTRATION,
        "Registered {} routes in {:.2?}",
        app.routes().len(),
        start_time.elapsed()
    );

    Ok(app)
}
