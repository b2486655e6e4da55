use std::collections::{BTreeMap, HashMap};
use std::path::{Path, PathBuf};

use crate::errors::Result;
use crate::routing::Route;

use super::package::{Package, PackageKind, relative_files};

/// The application package.
///
/// Besides being a regular package, the application can cover routes and
/// static files of the framework and of the mxns. Route covers are declared
/// explicitly. Static file covers are found on disk:
///
/// ```text
/// <root>/covers/mxxn/frontend/static/**
/// <root>/covers/mxns/<mxn name>/frontend/static/**
/// ```
#[derive(Debug, Clone)]
pub struct MxnApp {
    package: Package,
    mxxn_covers: Vec<Route>,
    mxn_covers: HashMap<String, Vec<Route>>,
}

/// Static file covers of the application, relative to the covered static
/// directory.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StaticCovers {
    pub mxxn: Vec<PathBuf>,
    /// Keyed by mxn name. Mxns without cover files are omitted.
    pub mxns: BTreeMap<String, Vec<PathBuf>>,
}

impl MxnApp {
    pub fn new(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            package: Package::new(name, PackageKind::MxnApp, root),
            mxxn_covers: Vec::new(),
            mxn_covers: HashMap::new(),
        }
    }

    /// Declare a route of the application package itself.
    pub fn route(mut self, route: Route) -> Self {
        self.package = self.package.route(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.package = self.package.routes(routes);
        self
    }

    pub fn migrations(mut self, factory: migration::MigrationFactory) -> Self {
        self.package = self.package.migrations(factory);
        self
    }

    /// Cover a route of the framework package.
    pub fn cover_mxxn(mut self, route: Route) -> Self {
        self.mxxn_covers.push(route);
        self
    }

    /// Cover a route of the mxn with the given package name.
    pub fn cover_mxn(mut self, mxn: impl Into<String>, route: Route) -> Self {
        self.mxn_covers.entry(mxn.into()).or_default().push(route);
        self
    }

    pub fn package(&self) -> &Package {
        &self.package
    }

    pub fn name(&self) -> &str {
        self.package.name()
    }

    pub fn mxxn_covers(&self) -> &[Route] {
        &self.mxxn_covers
    }

    /// Covers for the given mxn, empty if none were declared.
    pub fn mxn_covers(&self, mxn: &str) -> &[Route] {
        self.mxn_covers.get(mxn).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Names of all mxns the application declared covers for.
    pub fn covered_mxns(&self) -> impl Iterator<Item = &str> {
        self.mxn_covers.keys().map(String::as_str)
    }

    pub fn covers_path(&self) -> PathBuf {
        self.package.root().join("covers")
    }

    /// Static cover tree of the framework package.
    pub fn mxxn_covers_static_path(&self) -> PathBuf {
        static_below(&self.covers_path().join("mxxn"))
    }

    /// Static cover tree of an mxn.
    pub fn mxn_covers_static_path(&self, mxn: &str) -> PathBuf {
        static_below(&self.covers_path().join("mxns").join(mxn))
    }

    /// Static files covered by the application.
    ///
    /// Only the trees of the given (enabled) mxns are considered.
    pub fn static_file_covers<S: AsRef<str>>(&self, enabled_mxns: &[S]) -> Result<StaticCovers> {
        let mut covers = StaticCovers {
            mxxn: files_if_dir(&self.mxxn_covers_static_path())?,
            ..StaticCovers::default()
        };

        for mxn in enabled_mxns {
            let files = files_if_dir(&self.mxn_covers_static_path(mxn.as_ref()))?;
            if !files.is_empty() {
                covers.mxns.insert(mxn.as_ref().to_string(), files);
            }
        }

        Ok(covers)
    }
}

fn static_below(path: &Path) -> PathBuf {
    path.join("frontend").join("static")
}

fn files_if_dir(path: &Path) -> Result<Vec<PathBuf>> {
    if path.is_dir() {
        relative_files(path)
    } else {
        Ok(Vec::new())
    }
}
