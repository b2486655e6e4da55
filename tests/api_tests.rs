//! REST API tests
//!
//! Runs the framework resources against the shipped framework package and
//! temporary mxn and application packages.

use std::fs;
use std::path::Path;

use actix_web::http::{StatusCode, header};
use actix_web::test::{self, TestRequest};
use actix_web::{App, web};
use serde_json::{Value, json};
use tempfile::TempDir;

use mxxn::api::middleware::{REQUEST_ID_HEADER, RequestIdMiddleware};
use mxxn::application::Application;
use mxxn::env::{Environment, MxnApp, Package};
use mxxn::settings::Settings;

// =============================================================================
// Test Setup
// =============================================================================

fn write(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap()).unwrap();
    fs::write(path, content).unwrap();
}

/// An mxn with themes, strings, a script and a logo, and an application
/// covering the menu icon of the framework and the logo of the mxn.
fn packages() -> TempDir {
    let dir = TempDir::new().unwrap();
    let root = dir.path();

    write(root, "mxnone/configs/themes/light-default.json", r#"{"color": "white", "size": 1}"#);
    write(root, "mxnone/configs/themes/dark.json", r#"{"color": "black", "unknown": 2}"#);
    write(root, "mxnone/configs/strings/en-default.json", r#"{"title": "One"}"#);
    write(root, "mxnone/frontend/static/js/one.js", "// one");
    write(root, "mxnone/frontend/static/img/logo.svg", "<svg id=\"one\"/>");

    write(root, "mxnapp/configs/themes/light-default.json", r#"{"accent": "blue"}"#);
    write(root, "mxnapp/frontend/static/js/app.js", "// app");
    write(root, "mxnapp/covers/mxxn/frontend/static/icons/menu.svg", "<svg id=\"covered\"/>");
    write(
        root,
        "mxnapp/covers/mxns/mxnone/frontend/static/img/logo.svg",
        "<svg id=\"covered-one\"/>",
    );

    dir
}

fn application(dir: &TempDir) -> Application {
    let env = Environment::builder(mxxn::package_root())
        .mxn(Package::mxn("mxnone", dir.path().join("mxnone")))
        .app(MxnApp::new("mxnapp", dir.path().join("mxnapp")))
        .build()
        .unwrap();

    Application::new(env, Settings::default()).unwrap()
}

macro_rules! service {
    ($application:expr) => {{
        let application = $application.clone();
        test::init_service(
            App::new()
                .wrap(RequestIdMiddleware)
                .configure(move |cfg| application.configure(cfg))
                .default_service(web::to(mxxn::api::not_found)),
        )
        .await
    }};
}

// =============================================================================
// Root and App
// =============================================================================

#[actix_web::test]
async fn test_root_redirects_to_app() {
    let dir = packages();
    let app = service!(application(&dir));

    let resp = test::call_service(&app, TestRequest::get().uri("/").to_request()).await;
    assert_eq!(resp.status(), StatusCode::MOVED_PERMANENTLY);
    assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/app");
}

#[actix_web::test]
async fn test_app_page_lists_scripts() {
    let dir = packages();
    let app = service!(application(&dir));

    let resp = test::call_service(&app, TestRequest::get().uri("/app").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let body = String::from_utf8(test::read_body(resp).await.to_vec()).unwrap();
    let mxxn = body.find("/static/mxxn/js/mxxn.js").unwrap();
    let one = body.find("/static/mxns/one/js/one.js").unwrap();
    let mxnapp = body.find("/static/mxnapp/js/app.js").unwrap();
    assert!(mxxn < one && one < mxnapp);
    assert!(!body.contains("%SCRIPTS%"));
}

#[actix_web::test]
async fn test_unknown_url_returns_json_404() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/app/nothing/here").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);

    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({"title": "404 Not Found"}));
}

#[actix_web::test]
async fn test_request_id_header() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get()
        .uri("/app")
        .insert_header((REQUEST_ID_HEADER, "abc-123"))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.headers().get(REQUEST_ID_HEADER).unwrap(), "abc-123");

    let resp = test::call_service(&app, TestRequest::get().uri("/app").to_request()).await;
    assert!(resp.headers().contains_key(REQUEST_ID_HEADER));
}

// =============================================================================
// Themes and Strings
// =============================================================================

#[actix_web::test]
async fn test_themes_list() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/app/mxxn/themes").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    let items = body.as_array().unwrap();
    assert_eq!(items.len(), 2);
    assert_eq!(items[0]["id"], "dark");
    assert_eq!(items[1]["id"], "light");
    assert_eq!(items[0]["theme"]["mxns"]["mxnone"]["color"], "black");

    let req = TestRequest::get().uri("/app/mxxn/themes?fields=id").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([{"id": "dark"}, {"id": "light"}]));

    let req = TestRequest::get()
        .uri("/app/mxxn/themes?fields=id&fields=theme")
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert!(body[0].get("theme").is_some());
}

#[actix_web::test]
async fn test_themes_list_rejects_unknown_parameters() {
    let dir = packages();
    let app = service!(application(&dir));

    for uri in [
        "/app/mxxn/themes?sort=id",
        "/app/mxxn/themes?fields=color",
        "/app/mxxn/themes?fields=id,color",
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{}", uri);

        let body: Value = test::read_body_json(resp).await;
        assert!(body["title"].as_str().unwrap().contains("Query parameter"));
    }
}

#[actix_web::test]
async fn test_theme_by_id() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/app/mxxn/themes/dark").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["mxxn"]["palette"]["background"], "#121212");
    assert_eq!(body["mxxn"]["palette"]["primary"], "#1e88e5");
    assert_eq!(body["mxns"]["mxnone"], json!({"color": "black", "size": 1}));
    assert_eq!(body["mxnapp"], json!({"accent": "blue"}));
}

#[actix_web::test]
async fn test_theme_by_id_errors() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/app/mxxn/themes/unknown").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NO_CONTENT);

    let req = TestRequest::get().uri("/app/mxxn/themes/dark?fields=id").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);

    let body: Value = test::read_body_json(resp).await;
    assert!(body["title"].as_str().unwrap().contains("Query string"));
}

#[actix_web::test]
async fn test_strings_by_locale() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/app/mxxn/strings/de").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;

    assert_eq!(body["mxxn"]["app"]["title"], "Mxxn");
    assert_eq!(body["mxxn"]["app"]["loading"], "Wird geladen...");
    assert_eq!(body["mxns"]["mxnone"]["title"], "One");
    assert_eq!(body["mxnapp"], json!({}));

    let req = TestRequest::get().uri("/app/mxxn/strings?fields=id").to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!([{"id": "de"}, {"id": "en"}]));
}

// =============================================================================
// Icons and Static Files
// =============================================================================

#[actix_web::test]
async fn test_icons() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/app/mxxn/icons/menu").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(test::read_body(resp).await, "<svg id=\"covered\"/>");

    let req = TestRequest::get().uri("/app/mxxn/icons/close").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "image/svg+xml"
    );

    let req = TestRequest::get().uri("/app/mxxn/icons/missing").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[actix_web::test]
async fn test_static_files() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/static/mxxn/js/mxxn.js").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers().get(header::CONTENT_TYPE).unwrap(),
        "application/javascript; charset=utf-8"
    );

    let req = TestRequest::get().uri("/static/mxns/one/js/one.js").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, "// one");

    let req = TestRequest::get().uri("/static/mxxn/icons/menu.svg").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, "<svg id=\"covered\"/>");

    let req = TestRequest::get().uri("/static/covers/mxxn/icons/menu.svg").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    for uri in [
        "/static/mxxn/js/missing.js",
        "/static/mxns/two/js/one.js",
        "/static/mxxn/../Cargo.toml",
        "/static/covers/mxns/mxnone/img/logo.svg",
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }
}

#[actix_web::test]
async fn test_mxn_static_covers() {
    let dir = packages();
    let app = service!(application(&dir));

    let req = TestRequest::get().uri("/static/mxns/one/img/logo.svg").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, "<svg id=\"covered-one\"/>");

    let req = TestRequest::get().uri("/static/covers/mxns/one/img/logo.svg").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, "<svg id=\"covered-one\"/>");

    // not covered, served from the mxn itself
    let req = TestRequest::get().uri("/static/mxns/one/js/one.js").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, "// one");
}

#[actix_web::test]
async fn test_static_covers_of_disabled_mxns() {
    let dir = packages();
    write(dir.path(), "mxntwo/frontend/static/img/logo.svg", "<svg id=\"two\"/>");
    write(
        dir.path(),
        "mxnapp/covers/mxns/mxntwo/frontend/static/img/logo.svg",
        "<svg id=\"covered-two\"/>",
    );

    let env = Environment::builder(mxxn::package_root())
        .mxn(Package::mxn("mxnone", dir.path().join("mxnone")))
        .mxn(Package::mxn("mxntwo", dir.path().join("mxntwo")))
        .app(MxnApp::new("mxnapp", dir.path().join("mxnapp")))
        .build()
        .unwrap();
    let settings = Settings::default().with_enabled_mxns(Some(["mxnone"]));
    let app = service!(Application::new(env, settings).unwrap());

    for uri in [
        "/static/covers/mxns/two/img/logo.svg",
        "/static/mxns/two/img/logo.svg",
    ] {
        let resp = test::call_service(&app, TestRequest::get().uri(uri).to_request()).await;
        assert_eq!(resp.status(), StatusCode::NOT_FOUND, "{}", uri);
    }

    let req = TestRequest::get().uri("/static/covers/mxns/one/img/logo.svg").to_request();
    assert_eq!(test::call_and_read_body(&app, req).await, "<svg id=\"covered-one\"/>");
}
