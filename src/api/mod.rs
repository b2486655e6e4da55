//! HTTP layer: resources of the framework package, shared state, error
//! layer and middleware.

pub mod errors;
pub mod middleware;
pub mod resources;
pub mod state;

use actix_web::HttpResponse;

pub use errors::ApiError;
pub use state::AppState;

/// Default service for URLs no route matches.
pub async fn not_found() -> Result<HttpResponse, ApiError> {
    Err(ApiError::NotFound)
}
