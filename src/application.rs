//! Assembly of the HTTP application.

use std::sync::Arc;

use actix_web::web;
use tracing::info;

use crate::api::AppState;
use crate::env::Environment;
use crate::errors::Result;
use crate::routing::{RouteTable, StaticFiles};
use crate::settings::Settings;
use crate::system::logging::targets;

/// The registered routes, static files and shared state of an application.
///
/// Built once at startup. [`Application::configure`] publishes everything to
/// an actix-web `App`, once per worker.
#[derive(Clone)]
pub struct Application {
    state: web::Data<AppState>,
    routes: Arc<RouteTable>,
}

impl Application {
    pub fn new(env: Environment, settings: Settings) -> Result<Self> {
        let routes = RouteTable::build(&env, &settings)?;
        let statics = StaticFiles::build(&env, &settings)?;

        info!(
            target: targets::REGISTRATION,
            "Application assembled with {} mxns.",
            env.mxns(&settings)?.len()
        );

        Ok(Self {
            state: web::Data::new(AppState {
                settings: Arc::new(settings),
                env: Arc::new(env),
                statics: Arc::new(statics),
            }),
            routes: Arc::new(routes),
        })
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        cfg.app_data(self.state.clone());
        self.routes.configure(cfg);
        self.state.statics.clone().configure(cfg);
    }
}
