//! Server mode
//!
//! Assembles the application and serves it until Ctrl+C.

use actix_web::{
    App, HttpServer,
    middleware::{Compress, DefaultHeaders},
    web,
};
use anyhow::Result;
use tracing::{info, warn};

use crate::api::middleware::RequestIdMiddleware;
use crate::env::Environment;
use crate::runtime::lifetime;
use crate::settings::Settings;

/// Run the HTTP server
///
/// **Note**: Logging system must be initialized before calling this function
pub async fn run_server(env: Environment, settings: Settings) -> Result<()> {
    let host = settings.server.host.clone();
    let port = settings.server.port;
    let workers = settings.server.workers.clamp(1, 32);

    let app = lifetime::startup::prepare_server_startup(env, settings).map_err(|e| {
        tracing::error!("Server startup failed: {:#}", e);
        e
    })?;

    info!("Using {} workers for the server", workers);

    let server = HttpServer::new(move || {
        let app = app.clone();

        App::new()
            .wrap(RequestIdMiddleware)
            .wrap(Compress::default())
            .wrap(DefaultHeaders::new().add(("X-Content-Type-Options", "nosniff")))
            .app_data(web::PayloadConfig::new(1024 * 1024))
            .configure(move |cfg| app.configure(cfg))
            .default_service(web::to(crate::api::not_found))
    })
    .keep_alive(std::time::Duration::from_secs(30))
    .client_request_timeout(std::time::Duration::from_millis(5000))
    .workers(workers);

    let bind_address = format!("{}:{}", host, port);
    warn!("Starting server at http://{}", bind_address);
    let server = server.bind(bind_address)?.run();

    tokio::select! {
        res = server => {
            res?;
        }
        _ = lifetime::shutdown::listen_for_shutdown() => {
            warn!("Graceful shutdown: server stopped");
        }
    }

    Ok(())
}
