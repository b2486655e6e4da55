use std::fmt;
use std::sync::Arc;

use actix_web::{HttpRequest, HttpResponse, web};
use async_trait::async_trait;

use crate::api::errors::ApiError;

/// URL sentinel of the application root `/`.
///
/// Only the framework package may declare it, and only the application may
/// cover it in its mxxn covers.
pub const APP_ROOT: &str = "APP_ROOT";

/// A REST resource.
///
/// A resource has a plain responder and may implement additional suffixed
/// responders. A route either targets the plain responder or names one of
/// the declared suffixes.
#[async_trait(?Send)]
pub trait Resource: Send + Sync + 'static {
    /// Suffixes of the additional responders.
    fn suffixes(&self) -> &'static [&'static str] {
        &[]
    }

    /// Whether the resource has a plain responder.
    fn has_responder(&self) -> bool {
        true
    }

    async fn respond(
        &self,
        req: &HttpRequest,
        body: web::Bytes,
        suffix: Option<&str>,
    ) -> Result<HttpResponse, ApiError>;

    /// Whether the resource can serve a route with the given suffix.
    fn supports(&self, suffix: Option<&str>) -> bool {
        match suffix {
            Some(suffix) => self.suffixes().contains(&suffix),
            None => self.has_responder(),
        }
    }
}

/// A route declared by a package, relative to the package mount point.
#[derive(Clone)]
pub struct Route {
    url: String,
    resource: Arc<dyn Resource>,
    suffix: Option<String>,
}

impl Route {
    pub fn new<R: Resource>(url: impl Into<String>, resource: R) -> Self {
        Self::shared(url, Arc::new(resource))
    }

    /// A route for a resource instance shared with other routes.
    pub fn shared(url: impl Into<String>, resource: Arc<dyn Resource>) -> Self {
        Self {
            url: url.into(),
            resource,
            suffix: None,
        }
    }

    pub fn with_suffix(mut self, suffix: impl Into<String>) -> Self {
        self.suffix = Some(suffix.into());
        self
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn resource(&self) -> &Arc<dyn Resource> {
        &self.resource
    }

    pub fn suffix(&self) -> Option<&str> {
        self.suffix.as_deref()
    }
}

impl fmt::Debug for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Route")
            .field("url", &self.url)
            .field("suffix", &self.suffix)
            .finish()
    }
}

/// The package a route entry belongs to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Owner {
    Mxxn,
    Mxn(String),
    MxnApp(String),
}

impl fmt::Display for Owner {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Owner::Mxxn => write!(f, "mxxn"),
            Owner::Mxn(name) | Owner::MxnApp(name) => write!(f, "{}", name),
        }
    }
}

/// Prefix of the absolute URLs of a package.
pub fn mount_point(owner: &Owner, unprefixed_name: &str) -> String {
    match owner {
        Owner::Mxxn => "/app".to_string(),
        Owner::Mxn(_) => format!("/app/mxns/{}", unprefixed_name),
        Owner::MxnApp(_) => "/app/mxnapp".to_string(),
    }
}

/// Absolute URL of a declared route.
///
/// `APP_ROOT` becomes `/` and `/` becomes the mount point itself.
pub fn absolute_url(mount: &str, url: &str) -> String {
    if url == APP_ROOT {
        return "/".to_string();
    }
    if url == "/" || url.is_empty() {
        return mount.to_string();
    }
    if url.starts_with('/') {
        format!("{}{}", mount, url)
    } else {
        format!("{}/{}", mount, url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mount_points() {
        assert_eq!(mount_point(&Owner::Mxxn, "mxxn"), "/app");
        assert_eq!(mount_point(&Owner::Mxn("mxnone".into()), "one"), "/app/mxns/one");
        assert_eq!(mount_point(&Owner::MxnApp("mxnapp".into()), "mxnapp"), "/app/mxnapp");
    }

    #[test]
    fn test_absolute_url() {
        assert_eq!(absolute_url("/app", APP_ROOT), "/");
        assert_eq!(absolute_url("/app", "/"), "/app");
        assert_eq!(absolute_url("/app/mxns/one", "/todos"), "/app/mxns/one/todos");
        assert_eq!(absolute_url("/app/mxns/one", "todos/{id}"), "/app/mxns/one/todos/{id}");
    }
}
