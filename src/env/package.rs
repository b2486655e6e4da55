use std::fmt;
use std::path::{Path, PathBuf};

use migration::{Branch, MigrationFactory};
use tracing::debug;
use walkdir::WalkDir;

use crate::errors::{MxxnError, Result};
use crate::routing::{Owner, Route};
use crate::system::logging::targets;

/// Name of the framework package.
pub const MXXN: &str = "mxxn";

/// Name prefix of plugin packages.
pub const MXN_PREFIX: &str = "mxn";

/// The three kinds of framework packages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PackageKind {
    Mxxn,
    Mxn,
    MxnApp,
}

impl fmt::Display for PackageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PackageKind::Mxxn => write!(f, "Mxxn"),
            PackageKind::Mxn => write!(f, "Mxn"),
            PackageKind::MxnApp => write!(f, "MxnApp"),
        }
    }
}

/// A framework package.
///
/// All three package kinds share the same layout below their root directory:
///
/// ```text
/// <root>/
///   frontend/static/       static files, js/ holds the frontend scripts
///   configs/themes/        theme configuration directory
///   configs/strings/       strings configuration directory
///   migrations/            migration scaffolds of the package branch
/// ```
#[derive(Clone)]
pub struct Package {
    name: String,
    kind: PackageKind,
    root: PathBuf,
    routes: Vec<Route>,
    migrations: Option<MigrationFactory>,
}

impl Package {
    /// A plugin package.
    pub fn mxn(name: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self::new(name, PackageKind::Mxn, root)
    }

    pub(crate) fn new(name: impl Into<String>, kind: PackageKind, root: impl Into<PathBuf>) -> Self {
        Self {
            name: name.into(),
            kind,
            root: root.into(),
            routes: Vec::new(),
            migrations: None,
        }
    }

    /// Declare a route relative to the mount point of the package.
    pub fn route(mut self, route: Route) -> Self {
        self.routes.push(route);
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Route>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Set the migrations of the package branch.
    pub fn migrations(mut self, factory: MigrationFactory) -> Self {
        self.migrations = Some(factory);
        self
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn kind(&self) -> PackageKind {
        self.kind
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn declared_routes(&self) -> &[Route] {
        &self.routes
    }

    /// The migration branch of the package, if it has migrations.
    pub fn branch(&self) -> Option<Branch> {
        self.migrations
            .map(|factory| Branch::new(self.name.clone(), factory))
    }

    pub fn owner(&self) -> Owner {
        match self.kind {
            PackageKind::Mxxn => Owner::Mxxn,
            PackageKind::Mxn => Owner::Mxn(self.name.clone()),
            PackageKind::MxnApp => Owner::MxnApp(self.name.clone()),
        }
    }

    /// The name without the `mxn` prefix.
    ///
    /// Used in URLs, so `mxnone` is mounted below `/app/mxns/one`. Names
    /// without the prefix are returned unchanged.
    pub fn unprefixed_name(&self) -> &str {
        match self.kind {
            PackageKind::Mxn => unprefixed(&self.name),
            _ => &self.name,
        }
    }

    /// `<root>/frontend/static`, if the directory exists.
    pub fn static_path(&self) -> Option<PathBuf> {
        existing(self.root.join("frontend").join("static"))
    }

    /// All files below the static directory, relative to it and sorted.
    pub fn static_files(&self) -> Result<Vec<PathBuf>> {
        match self.static_path() {
            Some(path) => relative_files(&path),
            None => Ok(Vec::new()),
        }
    }

    /// All files below `static/js`, relative to that directory and sorted.
    pub fn js_files(&self) -> Result<Vec<PathBuf>> {
        match self.static_path().and_then(|path| existing(path.join("js"))) {
            Some(path) => relative_files(&path),
            None => Ok(Vec::new()),
        }
    }

    pub fn configs_path(&self) -> PathBuf {
        self.root.join("configs")
    }

    /// `<root>/configs/themes`, if the directory exists.
    pub fn themes_path(&self) -> Option<PathBuf> {
        existing(self.configs_path().join("themes"))
    }

    /// `<root>/configs/strings`, if the directory exists.
    pub fn strings_path(&self) -> Option<PathBuf> {
        existing(self.configs_path().join("strings"))
    }

    /// Directory of the migration scaffolds of the package.
    pub fn versions_path(&self) -> PathBuf {
        self.root.join("migrations")
    }
}

impl fmt::Debug for Package {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Package")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("root", &self.root)
            .field("routes", &self.routes)
            .field("migrations", &self.migrations.is_some())
            .finish()
    }
}

pub(crate) fn unprefixed(name: &str) -> &str {
    match name.strip_prefix(MXN_PREFIX) {
        Some(rest) if !rest.is_empty() => rest,
        _ => name,
    }
}

fn existing(path: PathBuf) -> Option<PathBuf> {
    path.is_dir().then_some(path)
}

/// Files below `dir`, relative to it, sorted.
pub(crate) fn relative_files(dir: &Path) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for entry in WalkDir::new(dir).follow_links(true) {
        let entry = entry.map_err(|e| {
            MxxnError::file_operation(format!("Failed to read {}: {}", dir.display(), e))
        })?;

        if !entry.file_type().is_file() {
            continue;
        }

        if let Ok(relative) = entry.path().strip_prefix(dir) {
            files.push(relative.to_path_buf());
        }
    }

    files.sort();
    debug!(
        target: targets::FILESYSTEM,
        "Found {} files below {}",
        files.len(),
        dir.display()
    );

    Ok(files)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn test_unprefixed_name() {
        assert_eq!(Package::mxn("mxnone", "/tmp").unprefixed_name(), "one");
        assert_eq!(Package::mxn("todo", "/tmp").unprefixed_name(), "todo");
        assert_eq!(Package::mxn("mxn", "/tmp").unprefixed_name(), "mxn");
        let app = Package::new("mxnapp", PackageKind::MxnApp, "/tmp");
        assert_eq!(app.unprefixed_name(), "mxnapp");
    }

    #[test]
    fn test_static_and_js_files() {
        let root = TempDir::new().unwrap();
        let js = root.path().join("frontend/static/js/sub");
        fs::create_dir_all(&js).unwrap();
        fs::write(root.path().join("frontend/static/js/b.js"), "").unwrap();
        fs::write(root.path().join("frontend/static/js/sub/a.js"), "").unwrap();
        fs::write(root.path().join("frontend/static/style.css"), "").unwrap();

        let package = Package::mxn("mxnone", root.path());
        assert_eq!(
            package.js_files().unwrap(),
            vec![PathBuf::from("b.js"), PathBuf::from("sub/a.js")]
        );
        assert_eq!(
            package.static_files().unwrap(),
            vec![
                PathBuf::from("js/b.js"),
                PathBuf::from("js/sub/a.js"),
                PathBuf::from("style.css")
            ]
        );
    }

    #[test]
    fn test_missing_directories() {
        let root = TempDir::new().unwrap();
        let package = Package::mxn("mxnone", root.path());
        assert!(package.static_path().is_none());
        assert!(package.static_files().unwrap().is_empty());
        assert!(package.js_files().unwrap().is_empty());
        assert!(package.themes_path().is_none());
        assert!(package.strings_path().is_none());
        assert!(package.branch().is_none());
    }
}
