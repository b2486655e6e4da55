//! The package environment.
//!
//! An application is assembled from three kinds of packages: the framework
//! package `mxxn`, any number of plugin packages (mxns) and at most one
//! application package. Packages are registered explicitly when the
//! environment is built; the registration order of the mxns is the order
//! used whenever no `enabled_mxns` list is configured.
//!
//! ```no_run
//! use mxxn::env::{Environment, MxnApp, Package};
//!
//! let env = Environment::builder("/srv/mxxn")
//!     .mxn(Package::mxn("mxntodo", "/srv/mxntodo"))
//!     .app(MxnApp::new("mxnapp", "/srv/mxnapp"))
//!     .build()?;
//! # Ok::<(), mxxn::errors::MxxnError>(())
//! ```

mod app;
mod framework;
mod package;

use std::path::PathBuf;

use migration::Branch;
use tracing::debug;

pub use app::{MxnApp, StaticCovers};
pub use framework::{ROOT_VAR, framework_root, unpack};
pub use package::{MXN_PREFIX, MXXN, Package, PackageKind};

use crate::errors::{MxxnError, Result};
use crate::settings::Settings;
use crate::system::logging::targets;

/// The registered packages.
#[derive(Debug, Clone)]
pub struct Environment {
    mxxn: Package,
    mxns: Vec<Package>,
    app: Option<MxnApp>,
}

impl Environment {
    /// Start building an environment whose framework package lives in
    /// `mxxn_root`.
    pub fn builder(mxxn_root: impl Into<PathBuf>) -> EnvironmentBuilder {
        EnvironmentBuilder {
            mxxn: Package::new(MXXN, PackageKind::Mxxn, mxxn_root)
                .routes(crate::api::resources::routes()),
            mxns: Vec::new(),
            app: Vec::new(),
        }
    }

    pub fn mxxn(&self) -> &Package {
        &self.mxxn
    }

    /// All registered mxns in registration order.
    pub fn installed_mxns(&self) -> &[Package] {
        &self.mxns
    }

    pub fn mxn(&self, name: &str) -> Result<&Package> {
        self.mxns
            .iter()
            .find(|mxn| mxn.name() == name)
            .ok_or_else(|| {
                MxxnError::package_not_exist(format!(
                    "The environment package {} does not exist.",
                    name
                ))
            })
    }

    /// The mxn mounted below the given unprefixed name.
    pub fn mxn_by_unprefixed(&self, unprefixed: &str) -> Option<&Package> {
        self.mxns
            .iter()
            .find(|mxn| mxn.unprefixed_name() == unprefixed)
    }

    pub fn app(&self) -> Result<&MxnApp> {
        self.app
            .as_ref()
            .ok_or_else(|| MxxnError::mxn_app_not_exist("No application package installed."))
    }

    /// Any package by name.
    pub fn package(&self, name: &str) -> Result<&Package> {
        if name == self.mxxn.name() {
            return Ok(&self.mxxn);
        }
        if let Some(app) = self.app.as_ref().filter(|app| app.name() == name) {
            return Ok(app.package());
        }
        self.mxn(name)
    }

    /// The enabled mxns.
    ///
    /// With an `enabled_mxns` list in the settings, its packages in the
    /// configured order. Otherwise all installed mxns.
    pub fn mxns(&self, settings: &Settings) -> Result<Vec<&Package>> {
        let Some(enabled) = settings.enabled_mxns() else {
            return Ok(self.mxns.iter().collect());
        };

        enabled
            .iter()
            .map(|name| {
                self.mxns
                    .iter()
                    .find(|mxn| mxn.name() == name)
                    .ok_or_else(|| {
                        MxxnError::mxn_not_exist(format!(
                            "The key enabled_mxns in the settings file contains the mxn {} which is not installed.",
                            name
                        ))
                    })
            })
            .collect()
    }

    /// Migration branches in apply order: mxxn, the enabled mxns, the
    /// application.
    pub fn branches(&self, settings: &Settings) -> Result<Vec<Branch>> {
        let mut packages = vec![&self.mxxn];
        packages.extend(self.mxns(settings)?);
        if let Some(app) = &self.app {
            packages.push(app.package());
        }

        Ok(packages.into_iter().filter_map(Package::branch).collect())
    }
}

/// Collects the packages of an [`Environment`].
///
/// Registration errors are reported by [`EnvironmentBuilder::build`].
#[derive(Debug)]
pub struct EnvironmentBuilder {
    mxxn: Package,
    mxns: Vec<Package>,
    app: Vec<MxnApp>,
}

impl EnvironmentBuilder {
    /// Register a plugin package.
    pub fn mxn(mut self, mxn: Package) -> Self {
        self.mxns.push(mxn);
        self
    }

    /// Register the application package.
    pub fn app(mut self, app: MxnApp) -> Self {
        self.app.push(app);
        self
    }

    /// Set the migrations of the framework package.
    pub fn mxxn_migrations(mut self, factory: migration::MigrationFactory) -> Self {
        self.mxxn = self.mxxn.migrations(factory);
        self
    }

    pub fn build(self) -> Result<Environment> {
        if self.app.len() > 1 {
            return Err(MxxnError::multiple_mxn_apps(
                "Multiple application packages installed.",
            ));
        }

        for (index, mxn) in self.mxns.iter().enumerate() {
            if mxn.kind() != PackageKind::Mxn {
                return Err(MxxnError::duplicate_package(format!(
                    "The package {} is registered as mxn but is of kind {}.",
                    mxn.name(),
                    mxn.kind()
                )));
            }

            let reserved = mxn.name() == MXXN
                || self.app.iter().any(|app| app.name() == mxn.name());
            let clashing = self.mxns[..index].iter().any(|other| {
                other.name() == mxn.name() || other.unprefixed_name() == mxn.unprefixed_name()
            });

            if reserved || clashing {
                return Err(MxxnError::duplicate_package(format!(
                    "The package name {} is registered more than once.",
                    mxn.name()
                )));
            }
        }

        let env = Environment {
            mxxn: self.mxxn,
            mxns: self.mxns,
            app: self.app.into_iter().next(),
        };

        debug!(
            target: targets::REGISTRATION,
            "Environment with {} mxns and {} application package.",
            env.mxns.len(),
            if env.app.is_some() { "an" } else { "no" }
        );

        Ok(env)
    }
}
