//! Migration targets and their execution.
//!
//! The migrations of all branches form one ordered list (mxxn, enabled mxns,
//! application) that is applied and rolled back linearly. Upgrade and
//! downgrade targets are translated into a number of steps over that list.

use migration::{Branch, EnvMigrator, MigrationStatus, MigratorTrait, install_branches};
use sea_orm::DatabaseConnection;
use tracing::info;

use crate::errors::{MxxnError, Result};
use crate::system::logging::targets;

/// Number of migrations to apply or roll back; `None` means all.
pub type Steps = Option<u32>;

/// A migration together with its branch and status.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationInfo {
    pub name: String,
    pub branch: String,
    pub applied: bool,
}

/// Steps to reach an upgrade target.
///
/// Targets are `head`/`heads`, `+N`, `<branch>@head` or a migration name.
/// `pending` lists the pending migrations in apply order.
pub fn upgrade_steps(target: &str, pending: &[MigrationInfo], branches: &[Branch]) -> Result<Steps> {
    if target == "head" || target == "heads" {
        return Ok(None);
    }

    if let Some(count) = target.strip_prefix('+') {
        return relative(count, target, pending.len()).map(Some);
    }

    if let Some(branch) = target.strip_suffix("@head") {
        known_branch(branch, branches)?;
        let steps = pending
            .iter()
            .rposition(|m| m.branch == branch)
            .map(|i| i + 1)
            .unwrap_or(0);
        return Ok(Some(steps as u32));
    }

    if let Some(position) = pending.iter().position(|m| m.name == target) {
        return Ok(Some(position as u32 + 1));
    }

    if branches.iter().any(|b| b.migration_names().iter().any(|n| n == target)) {
        // already applied
        return Ok(Some(0));
    }

    Err(unknown_revision(target))
}

/// Steps to reach a downgrade target.
///
/// Targets are `base`, `-N`, `<branch>@base` or a migration name, which stays
/// applied. `applied` lists the applied migrations in apply order. Rolling
/// back a branch also rolls back every migration applied after its first
/// one.
pub fn downgrade_steps(target: &str, applied: &[MigrationInfo], branches: &[Branch]) -> Result<Steps> {
    if target == "base" {
        return Ok(None);
    }

    if let Some(count) = target.strip_prefix('-') {
        return relative(count, target, applied.len()).map(Some);
    }

    if let Some(branch) = target.strip_suffix("@base") {
        known_branch(branch, branches)?;
        let steps = applied
            .iter()
            .position(|m| m.branch == branch)
            .map(|i| applied.len() - i)
            .unwrap_or(0);
        return Ok(Some(steps as u32));
    }

    match applied.iter().position(|m| m.name == target) {
        Some(position) => Ok(Some((applied.len() - position - 1) as u32)),
        None if branches.iter().any(|b| b.migration_names().iter().any(|n| n == target)) => {
            Err(MxxnError::migration(format!(
                "The revision {} is not applied.",
                target
            )))
        }
        None => Err(unknown_revision(target)),
    }
}

/// Steps of a relative target, at most `available`.
fn relative(count: &str, target: &str, available: usize) -> Result<u32> {
    let steps = count.parse::<u32>().map_err(|_| {
        MxxnError::migration(format!("The relative revision {} is not a number of steps.", target))
    })?;

    if steps as usize > available {
        return Err(MxxnError::migration(format!(
            "Relative revision {} didn't produce {} migrations, only {} are available.",
            target, steps, available
        )));
    }
    Ok(steps)
}

fn known_branch(name: &str, branches: &[Branch]) -> Result<()> {
    if branches.iter().any(|b| b.name() == name) {
        Ok(())
    } else {
        Err(MxxnError::migration(format!("The branch {} does not exist.", name)))
    }
}

fn unknown_revision(target: &str) -> MxxnError {
    MxxnError::migration(format!("Can't locate revision identified by {}.", target))
}

/// Migration operations over the installed branches.
pub struct Migrations {
    db: DatabaseConnection,
    branches: Vec<Branch>,
}

impl Migrations {
    /// Install the branches and wrap the connection.
    pub fn new(db: DatabaseConnection, branches: Vec<Branch>) -> Self {
        install_branches(branches.clone());
        Self { db, branches }
    }

    pub fn branches(&self) -> &[Branch] {
        &self.branches
    }

    pub fn connection(&self) -> &DatabaseConnection {
        &self.db
    }

    /// All migrations in apply order with their status.
    pub async fn status(&self) -> Result<Vec<MigrationInfo>> {
        let migrations = EnvMigrator::get_migration_with_status(&self.db).await?;

        Ok(migrations
            .iter()
            .map(|m| MigrationInfo {
                name: m.name().to_string(),
                branch: self.branch_of(m.name()),
                applied: matches!(m.status(), MigrationStatus::Applied),
            })
            .collect())
    }

    pub async fn upgrade(&self, target: &str) -> Result<usize> {
        let pending: Vec<MigrationInfo> =
            self.status().await?.into_iter().filter(|m| !m.applied).collect();
        let steps = upgrade_steps(target, &pending, &self.branches)?;
        let count = steps.map(|s| s as usize).unwrap_or(pending.len()).min(pending.len());

        if count > 0 {
            EnvMigrator::up(&self.db, Some(count as u32))
                .await
                .map_err(|e| MxxnError::migration(format!("Upgrade failed: {}", e)))?;
        }

        info!(target: targets::DATABASE, "Upgraded {} migrations to {}", count, target);
        Ok(count)
    }

    pub async fn downgrade(&self, target: &str) -> Result<usize> {
        let applied: Vec<MigrationInfo> =
            self.status().await?.into_iter().filter(|m| m.applied).collect();
        let steps = downgrade_steps(target, &applied, &self.branches)?;
        let count = steps.map(|s| s as usize).unwrap_or(applied.len()).min(applied.len());

        if count > 0 {
            EnvMigrator::down(&self.db, Some(count as u32))
                .await
                .map_err(|e| MxxnError::migration(format!("Downgrade failed: {}", e)))?;
        }

        info!(target: targets::DATABASE, "Downgraded {} migrations to {}", count, target);
        Ok(count)
    }

    fn branch_of(&self, migration: &str) -> String {
        self.branches
            .iter()
            .find(|b| b.migration_names().iter().any(|n| n == migration))
            .map(|b| b.name().to_string())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use migration::{DbErr, MigrationName, MigrationTrait, SchemaManager};

    struct Named(&'static str);

    impl MigrationName for Named {
        fn name(&self) -> &str {
            self.0
        }
    }

    #[async_trait::async_trait]
    impl MigrationTrait for Named {
        async fn up(&self, _manager: &SchemaManager) -> std::result::Result<(), DbErr> {
            Ok(())
        }
    }

    fn mxxn() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Named("m1_mxxn")), Box::new(Named("m2_mxxn"))]
    }

    fn mxnone() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(Named("m1_mxnone")), Box::new(Named("m2_mxnone"))]
    }

    fn branches() -> Vec<Branch> {
        vec![Branch::new("mxxn", mxxn), Branch::new("mxnone", mxnone)]
    }

    fn info(name: &str, branch: &str, applied: bool) -> MigrationInfo {
        MigrationInfo {
            name: name.to_string(),
            branch: branch.to_string(),
            applied,
        }
    }

    #[test]
    fn test_upgrade_steps() {
        let branches = branches();
        let pending = vec![
            info("m2_mxxn", "mxxn", false),
            info("m1_mxnone", "mxnone", false),
            info("m2_mxnone", "mxnone", false),
        ];

        assert_eq!(upgrade_steps("head", &pending, &branches).unwrap(), None);
        assert_eq!(upgrade_steps("heads", &pending, &branches).unwrap(), None);
        assert_eq!(upgrade_steps("+2", &pending, &branches).unwrap(), Some(2));
        assert_eq!(upgrade_steps("mxxn@head", &pending, &branches).unwrap(), Some(1));
        assert_eq!(upgrade_steps("mxnone@head", &pending, &branches).unwrap(), Some(3));
        assert_eq!(upgrade_steps("m1_mxnone", &pending, &branches).unwrap(), Some(2));
        assert_eq!(upgrade_steps("m1_mxxn", &pending, &branches).unwrap(), Some(0));
        assert_eq!(upgrade_steps("+3", &pending, &branches).unwrap(), Some(3));
        assert!(matches!(
            upgrade_steps("+4", &pending, &branches),
            Err(MxxnError::Migration(_))
        ));
        assert!(upgrade_steps("+x", &pending, &branches).is_err());
        assert!(upgrade_steps("other@head", &pending, &branches).is_err());
        assert!(upgrade_steps("m9_unknown", &pending, &branches).is_err());
    }

    #[test]
    fn test_downgrade_steps() {
        let branches = branches();
        let applied = vec![
            info("m1_mxxn", "mxxn", true),
            info("m2_mxxn", "mxxn", true),
            info("m1_mxnone", "mxnone", true),
        ];

        assert_eq!(downgrade_steps("base", &applied, &branches).unwrap(), None);
        assert_eq!(downgrade_steps("-1", &applied, &branches).unwrap(), Some(1));
        assert_eq!(downgrade_steps("-3", &applied, &branches).unwrap(), Some(3));
        assert!(matches!(
            downgrade_steps("-4", &applied, &branches),
            Err(MxxnError::Migration(_))
        ));
        assert_eq!(downgrade_steps("mxnone@base", &applied, &branches).unwrap(), Some(1));
        assert_eq!(downgrade_steps("mxxn@base", &applied, &branches).unwrap(), Some(3));
        assert_eq!(downgrade_steps("m1_mxxn", &applied, &branches).unwrap(), Some(2));
        assert_eq!(downgrade_steps("m1_mxnone", &applied, &branches).unwrap(), Some(0));
        assert!(matches!(
            downgrade_steps("m2_mxnone", &applied, &branches),
            Err(MxxnError::Migration(_))
        ));
        assert!(downgrade_steps("m9_unknown", &applied, &branches).is_err());
    }
}
