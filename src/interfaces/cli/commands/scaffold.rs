//! Source scaffolds written by the migration commands
//!
//! Migrations are compiled code, so `init`, `revision` and `merge` write
//! Rust sources into the migrations directory of a package. The `mod.rs` of
//! that directory exposes a `migrations()` function that can be passed to
//! `Package::migrations`.

use std::path::{Path, PathBuf};

use chrono::{DateTime, Utc};

use crate::errors::{MxxnError, Result};

/// Name of the module file listing the migrations of a package.
pub const MOD_FILE: &str = "mod.rs";

/// Lowercase the message and join its words with underscores.
pub fn slug(message: &str) -> String {
    let mut slug = String::with_capacity(message.len());

    for c in message.chars() {
        if c.is_ascii_alphanumeric() {
            slug.push(c.to_ascii_lowercase());
        } else if !slug.is_empty() && !slug.ends_with('_') {
            slug.push('_');
        }
    }

    let slug = slug.trim_end_matches('_');
    if slug.is_empty() {
        "revision".to_string()
    } else {
        slug.to_string()
    }
}

/// `m<YYYYMMDD>_<HHMMSS>_<branch>_<slug>`.
///
/// The branch is part of the name because migration names are unique across
/// all branches.
pub fn revision_name(at: DateTime<Utc>, branch: &str, message: &str) -> String {
    format!("m{}_{}_{}", at.format("%Y%m%d_%H%M%S"), branch, slug(message))
}

/// Source of a new revision.
pub fn render_revision(branch: &str, message: &str, head: Option<&str>) -> String {
    let parent = match head {
        Some(head) => format!("//! Revises: {}\n", head),
        None => "//! Revises: <base>\n".to_string(),
    };

    format!(
        r#"//! {message}
//!
//! Branch: {branch}
{parent}
use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {{
    async fn up(&self, _manager: &SchemaManager) -> Result<(), DbErr> {{
        Ok(())
    }}

    async fn down(&self, _manager: &SchemaManager) -> Result<(), DbErr> {{
        Ok(())
    }}
}}
"#
    )
}

/// Source of a merge revision. Merges carry no schema changes.
pub fn render_merge(branch: &str, message: &str, revisions: &[String]) -> String {
    render_revision(branch, message, Some(&revisions.join(", ")))
}

/// Source of the module file listing `modules` in apply order.
pub fn render_mod(package: &str, modules: &[String]) -> String {
    let mut source = format!(
        "//! Migrations of the {} package.\n\nuse sea_orm_migration::MigrationTrait;\n\n",
        package
    );

    for module in modules {
        source.push_str(&format!("mod {};\n", module));
    }

    source.push_str("\npub fn migrations() -> Vec<Box<dyn MigrationTrait>> {\n    vec![\n");
    for module in modules {
        source.push_str(&format!("        Box::new({}::Migration),\n", module));
    }
    source.push_str("    ]\n}\n");

    source
}

/// The revision modules of a migrations directory, sorted by name.
pub fn revision_modules(dir: &Path) -> Result<Vec<String>> {
    if !dir.is_dir() {
        return Ok(Vec::new());
    }

    let mut modules = Vec::new();
    for entry in std::fs::read_dir(dir)? {
        let path = entry?.path();
        let is_revision = path.extension().is_some_and(|ext| ext == "rs")
            && path
                .file_stem()
                .and_then(|stem| stem.to_str())
                .is_some_and(|stem| stem.starts_with('m') && stem != "mod");

        if is_revision && let Some(stem) = path.file_stem().and_then(|stem| stem.to_str()) {
            modules.push(stem.to_string());
        }
    }

    modules.sort();
    Ok(modules)
}

/// Write a revision file and regenerate the module file.
pub fn write_revision(dir: &Path, package: &str, name: &str, source: &str) -> Result<PathBuf> {
    let file = dir.join(format!("{}.rs", name));
    if file.exists() {
        return Err(MxxnError::migration(format!(
            "The revision file {} already exists.",
            file.display()
        )));
    }

    std::fs::create_dir_all(dir)?;
    std::fs::write(&file, source)?;

    let modules = revision_modules(dir)?;
    std::fs::write(dir.join(MOD_FILE), render_mod(package, &modules))?;

    Ok(file)
}
