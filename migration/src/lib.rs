//! Migration plumbing shared by every mxxn package.
//!
//! Each package (the framework, plugins and the application) contributes an
//! ordered list of migrations called a *branch*. The host installs the
//! branches of the enabled packages once at startup and [`EnvMigrator`]
//! applies their concatenation in branch order.

pub use sea_orm_migration::MigrationStatus;
pub use sea_orm_migration::prelude::*;

mod branch;
pub mod naming;

pub use branch::{Branch, MigrationFactory, branch_of, install_branches, installed_branches};

/// Migrator over all installed branches.
pub struct EnvMigrator;

#[async_trait::async_trait]
impl MigratorTrait for EnvMigrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        installed_branches()
            .iter()
            .flat_map(|branch| branch.migrations())
            .collect()
    }
}
