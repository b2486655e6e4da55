use actix_web::{HttpRequest, HttpResponse, web};
use async_trait::async_trait;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::routing::Resource;

/// SVG icons of the framework.
///
/// Served from `icons/<name>.svg` of the mxxn static files, so the
/// application can cover single icons.
pub struct Icons;

#[async_trait(?Send)]
impl Resource for Icons {
    async fn respond(
        &self,
        req: &HttpRequest,
        _body: web::Bytes,
        _suffix: Option<&str>,
    ) -> Result<HttpResponse, ApiError> {
        let state = AppState::of(req)?;
        let name = req.match_info().get("name").unwrap_or_default();

        if !is_valid_name(name) {
            return Err(ApiError::NotFound);
        }

        let file = state
            .statics
            .resolve(&format!("mxxn/icons/{}.svg", name))
            .ok_or(ApiError::NotFound)?;
        let content = tokio::fs::read(file).await?;

        Ok(HttpResponse::Ok().content_type("image/svg+xml").body(content))
    }
}

fn is_valid_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_names() {
        assert!(is_valid_name("menu"));
        assert!(is_valid_name("arrow-left_2"));
        assert!(!is_valid_name(""));
        assert!(!is_valid_name("../secret"));
        assert!(!is_valid_name("menu.svg"));
    }
}
