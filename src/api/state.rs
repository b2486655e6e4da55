use std::sync::Arc;

use actix_web::{HttpRequest, web};

use super::errors::ApiError;
use crate::env::Environment;
use crate::errors::MxxnError;
use crate::routing::StaticFiles;
use crate::settings::Settings;

/// Shared state of the resources, registered as `web::Data`.
#[derive(Debug, Clone)]
pub struct AppState {
    pub settings: Arc<Settings>,
    pub env: Arc<Environment>,
    pub statics: Arc<StaticFiles>,
}

impl AppState {
    /// The state registered with the application of the request.
    pub fn of(req: &HttpRequest) -> Result<&AppState, ApiError> {
        req.app_data::<web::Data<AppState>>()
            .map(|data| data.get_ref())
            .ok_or_else(|| MxxnError::routing("The application state is not registered.").into())
    }
}
