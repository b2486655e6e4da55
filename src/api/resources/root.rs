use actix_web::{HttpRequest, HttpResponse, http::header, web};
use async_trait::async_trait;

use crate::api::errors::ApiError;
use crate::routing::Resource;

/// Redirects the application root to the frontend at `/app`.
pub struct Root;

#[async_trait(?Send)]
impl Resource for Root {
    async fn respond(
        &self,
        _req: &HttpRequest,
        _body: web::Bytes,
        _suffix: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        Ok(HttpResponse::MovedPermanently()
            .insert_header((header::LOCATION, "/app"))
            .finish())
    }
}
