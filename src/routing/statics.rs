//! Static file routes.
//!
//! Every package with a `frontend/static` directory is served below
//! `/static`:
//!
//! - `/static/mxxn/` for the framework package
//! - `/static/mxns/<unprefixed name>/` for each enabled mxn
//! - `/static/mxnapp/` for the application package
//! - `/static/covers/mxxn/` and `/static/covers/mxns/<unprefixed name>/` for
//!   the static cover trees of the application
//!
//! A request for a framework or mxn file that the application covers is
//! answered from the cover tree instead.

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use tracing::{debug, trace};

use crate::api::errors::ApiError;
use crate::env::Environment;
use crate::errors::Result;
use crate::settings::Settings;
use crate::system::logging::targets;

#[derive(Debug, Clone, Default)]
pub struct StaticFiles {
    mxxn: Option<PathBuf>,
    mxns: HashMap<String, PathBuf>,
    mxnapp: Option<PathBuf>,
    covers: Option<CoverTrees>,
}

#[derive(Debug, Clone, Default)]
struct CoverTrees {
    mxxn_root: PathBuf,
    mxxn: HashSet<PathBuf>,
    /// Keyed by unprefixed mxn name.
    mxns: HashMap<String, (PathBuf, HashSet<PathBuf>)>,
}

impl StaticFiles {
    pub fn build(env: &Environment, settings: &Settings) -> Result<Self> {
        let enabled = env.mxns(settings)?;

        let mut files = StaticFiles {
            mxxn: env.mxxn().static_path(),
            ..StaticFiles::default()
        };

        for mxn in &enabled {
            if let Some(path) = mxn.static_path() {
                files.mxns.insert(mxn.unprefixed_name().to_string(), path);
            }
        }

        if let Ok(app) = env.app() {
            files.mxnapp = app.package().static_path();

            let names: Vec<&str> = enabled.iter().map(|mxn| mxn.name()).collect();
            let covers = app.static_file_covers(&names)?;

            let mut trees = CoverTrees {
                mxxn_root: app.mxxn_covers_static_path(),
                mxxn: covers.mxxn.into_iter().collect(),
                mxns: HashMap::new(),
            };

            for (name, covered) in covers.mxns {
                let Some(mxn) = enabled.iter().find(|mxn| mxn.name() == name) else {
                    continue;
                };
                trees.mxns.insert(
                    mxn.unprefixed_name().to_string(),
                    (app.mxn_covers_static_path(&name), covered.into_iter().collect()),
                );
            }

            debug!(
                target: targets::REGISTRATION,
                "The application covers {} static files of mxxn and static files of {} mxns.",
                trees.mxxn.len(),
                trees.mxns.len()
            );
            files.covers = Some(trees);
        }

        Ok(files)
    }

    /// Resolve a path below `/static/` to a file on disk.
    ///
    /// Returns `None` for unknown mounts, missing files and paths containing
    /// empty, `.` or `..` segments.
    pub fn resolve(&self, path: &str) -> Option<PathBuf> {
        let segments: Vec<&str> = path.split('/').collect();
        if segments
            .iter()
            .any(|s| s.is_empty() || *s == "." || *s == ".." || s.contains('\\'))
        {
            return None;
        }

        let candidate = match segments.as_slice() {
            ["mxxn", rest @ ..] if !rest.is_empty() => {
                let file = join(rest);
                match &self.covers {
                    Some(covers) if covers.mxxn.contains(&file) => covers.mxxn_root.join(file),
                    _ => self.mxxn.as_ref()?.join(file),
                }
            }
            ["mxns", name, rest @ ..] if !rest.is_empty() => {
                let file = join(rest);
                let cover = self
                    .covers
                    .as_ref()
                    .and_then(|covers| covers.mxns.get(*name))
                    .filter(|(_, covered)| covered.contains(&file));
                match cover {
                    Some((root, _)) => root.join(file),
                    None => self.mxns.get(*name)?.join(file),
                }
            }
            ["mxnapp", rest @ ..] if !rest.is_empty() => self.mxnapp.as_ref()?.join(join(rest)),
            ["covers", "mxxn", rest @ ..] if !rest.is_empty() => {
                self.covers.as_ref()?.mxxn_root.join(join(rest))
            }
            ["covers", "mxns", name, rest @ ..] if !rest.is_empty() => {
                let (root, _) = self.covers.as_ref()?.mxns.get(*name)?;
                root.join(join(rest))
            }
            _ => return None,
        };

        candidate.is_file().then_some(candidate)
    }

    /// Register the `/static/{path}` route.
    pub fn configure(self: Arc<Self>, cfg: &mut web::ServiceConfig) {
        cfg.route(
            "/static/{path:.*}",
            web::get().to(move |req: HttpRequest| {
                let files = self.clone();
                async move { files.serve(&req).await }
            }),
        );
    }

    async fn serve(&self, req: &HttpRequest) -> std::result::Result<HttpResponse, ApiError> {
        let path = req.match_info().query("path");
        trace!(target: targets::REQUEST, "Serving static file: {}", path);

        let Some(file) = self.resolve(path) else {
            debug!(target: targets::REQUEST, "Static file not found: {}", path);
            return Err(ApiError::NotFound);
        };

        let content = tokio::fs::read(&file).await?;
        Ok(HttpResponse::Ok()
            .content_type(content_type(&file))
            .body(content))
    }
}

fn join(segments: &[&str]) -> PathBuf {
    segments.iter().collect()
}

/// Content type by file extension.
pub fn content_type(path: &Path) -> &'static str {
    match path.extension().and_then(|ext| ext.to_str()) {
        Some("html") => "text/html; charset=utf-8",
        Some("css") => "text/css; charset=utf-8",
        Some("js") | Some("mjs") => "application/javascript; charset=utf-8",
        Some("json") => "application/json",
        Some("png") => "image/png",
        Some("jpg") | Some("jpeg") => "image/jpeg",
        Some("gif") => "image/gif",
        Some("svg") => "image/svg+xml",
        Some("ico") => "image/x-icon",
        Some("woff") => "font/woff",
        Some("woff2") => "font/woff2",
        Some("ttf") => "font/ttf",
        Some("eot") => "application/vnd.ms-fontobject",
        Some("txt") => "text/plain; charset=utf-8",
        _ => "application/octet-stream",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_content_type() {
        assert_eq!(content_type(Path::new("js/mxxn.js")), "application/javascript; charset=utf-8");
        assert_eq!(content_type(Path::new("icons/menu.svg")), "image/svg+xml");
        assert_eq!(content_type(Path::new("LICENSE")), "application/octet-stream");
    }

    #[test]
    fn test_rejects_traversal() {
        let files = StaticFiles {
            mxxn: Some(PathBuf::from("/")),
            ..StaticFiles::default()
        };
        assert_eq!(files.resolve("mxxn/../etc/passwd"), None);
        assert_eq!(files.resolve("mxxn/./etc/passwd"), None);
        assert_eq!(files.resolve("mxxn//etc/passwd"), None);
        assert_eq!(files.resolve("mxxn"), None);
        assert_eq!(files.resolve("unknown/file.js"), None);
    }
}
