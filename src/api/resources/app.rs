use actix_web::{HttpRequest, HttpResponse, web};
use async_trait::async_trait;
use rust_embed::Embed;
use tracing::debug;

use crate::api::errors::ApiError;
use crate::api::state::AppState;
use crate::errors::{MxxnError, Result};
use crate::routing::Resource;
use crate::system::logging::targets;

#[derive(Embed)]
#[folder = "templates/"]
struct Templates;

const TEMPLATE: &str = "app.html";

/// The frontend page.
///
/// Loads the scripts of mxxn, of every enabled mxn and of the application.
pub struct App;

#[async_trait(?Send)]
impl Resource for App {
    async fn respond(
        &self,
        req: &HttpRequest,
        _body: web::Bytes,
        _suffix: Option<&str>,
    ) -> std::result::Result<HttpResponse, ApiError> {
        let state = AppState::of(req)?;
        let urls = script_urls(state)?;
        let page = render(&urls)?;

        Ok(HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(page))
    }
}

/// URLs of all frontend scripts in load order.
pub fn script_urls(state: &AppState) -> Result<Vec<String>> {
    let env = &state.env;
    let mut urls = Vec::new();

    for file in env.mxxn().js_files()? {
        urls.push(format!("/static/mxxn/js/{}", url_path(&file)));
    }

    for mxn in env.mxns(&state.settings)? {
        for file in mxn.js_files()? {
            urls.push(format!(
                "/static/mxns/{}/js/{}",
                mxn.unprefixed_name(),
                url_path(&file)
            ));
        }
    }

    if let Ok(app) = env.app() {
        for file in app.package().js_files()? {
            urls.push(format!("/static/mxnapp/js/{}", url_path(&file)));
        }
    }

    Ok(urls)
}

fn url_path(path: &std::path::Path) -> String {
    path.components()
        .map(|c| c.as_os_str().to_string_lossy())
        .collect::<Vec<_>>()
        .join("/")
}

fn render(script_urls: &[String]) -> Result<String> {
    let template = Templates::get(TEMPLATE).ok_or_else(|| {
        MxxnError::template(format!("The template {} does not exist.", TEMPLATE))
    })?;
    let html = String::from_utf8_lossy(&template.data);

    let scripts = script_urls
        .iter()
        .map(|url| format!("    <script type=\"module\" src=\"{}\"></script>", url))
        .collect::<Vec<_>>()
        .join("\n");

    debug!(
        target: targets::TEMPLATE,
        "Rendering {} with {} scripts",
        TEMPLATE,
        script_urls.len()
    );

    Ok(html
        .replace("%MXXN_VERSION%", env!("CARGO_PKG_VERSION"))
        .replace("%SCRIPTS%", &scripts))
}
