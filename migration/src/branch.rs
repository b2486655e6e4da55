use std::sync::Arc;

use parking_lot::RwLock;
use sea_orm_migration::MigrationTrait;

/// Builds the migrations of one package, oldest first.
pub type MigrationFactory = fn() -> Vec<Box<dyn MigrationTrait>>;

/// The migrations contributed by a single package.
#[derive(Clone)]
pub struct Branch {
    name: String,
    factory: MigrationFactory,
}

impl Branch {
    pub fn new(name: impl Into<String>, factory: MigrationFactory) -> Self {
        Self {
            name: name.into(),
            factory,
        }
    }

    /// Package name, used as branch label.
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn migrations(&self) -> Vec<Box<dyn MigrationTrait>> {
        (self.factory)()
    }

    /// Migration names of this branch in apply order.
    pub fn migration_names(&self) -> Vec<String> {
        self.migrations()
            .iter()
            .map(|m| m.name().to_string())
            .collect()
    }
}

impl std::fmt::Debug for Branch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Branch").field("name", &self.name).finish()
    }
}

// `MigratorTrait::migrations` is an associated function, so the branch list
// has to live in process-global state.
static BRANCHES: RwLock<Vec<Branch>> = RwLock::new(Vec::new());

/// Replace the installed branches.
pub fn install_branches(branches: Vec<Branch>) {
    *BRANCHES.write() = branches;
}

/// Snapshot of the installed branches in apply order.
pub fn installed_branches() -> Arc<[Branch]> {
    BRANCHES.read().iter().cloned().collect()
}

/// Name of the branch a migration belongs to.
pub fn branch_of(migration: &str) -> Option<String> {
    installed_branches()
        .iter()
        .find(|b| b.migration_names().iter().any(|n| n == migration))
        .map(|b| b.name().to_string())
}
