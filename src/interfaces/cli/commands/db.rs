//! Migration commands of `mxxr db`

use std::path::PathBuf;

use chrono::Utc;
use colored::Colorize;
use migration::Branch;

use super::scaffold;
use crate::database::{self, MigrationInfo, Migrations};
use crate::env::{Environment, Package};
use crate::interfaces::cli::CliError;
use crate::settings::Settings;

async fn open(env: &Environment, settings: &Settings) -> Result<Migrations, CliError> {
    let branches = env.branches(settings)?;
    let db = database::connect(&settings.database).await?;
    Ok(Migrations::new(db, branches))
}

fn installed<'a>(env: &'a Environment, name: &str) -> Result<&'a Package, CliError> {
    env.package(name).map_err(|_| {
        CliError::CommandError(format!(
            "The {} package is not installed in the environment.",
            name
        ))
    })
}

/// Check the `<branchname>@<revision>` format of a head argument.
pub fn parse_head(head: &str) -> Result<(&str, &str), CliError> {
    let word = |s: &str| !s.is_empty() && s.chars().all(|c| c.is_alphanumeric() || c == '_');

    match head.split_once('@') {
        Some((branch, revision)) if word(branch) && word(revision) => Ok((branch, revision)),
        _ => Err(CliError::CommandError(
            "head is not in format <branchname>@head.".to_string(),
        )),
    }
}

/// Create the migrations directory of a package with its first revision.
pub async fn init(env: &Environment, name: &str) -> Result<(), CliError> {
    let package = installed(env, name)?;
    let versions = package.versions_path();

    if versions.is_dir() && std::fs::read_dir(&versions)?.next().is_some() {
        return Err(CliError::CommandError(format!(
            "The versions path of the {} package is not empty.",
            name
        )));
    }

    let message = format!("ADD: {} branch", name);
    let revision = scaffold::revision_name(Utc::now(), name, &message);
    let file = scaffold::write_revision(
        &versions,
        name,
        &revision,
        &scaffold::render_revision(name, &message, None),
    )?;

    println!(
        "{} Generating {} ... {}",
        "✓".bold().green(),
        file.display().to_string().cyan(),
        "done".green()
    );
    Ok(())
}

/// Create a new revision on top of a branch head.
pub async fn revision(env: &Environment, message: &str, head: &str) -> Result<(), CliError> {
    let (branch, target) = parse_head(head)?;
    let package = installed(env, branch)?;
    let versions = package.versions_path();

    if !versions.is_dir() {
        return Err(CliError::CommandError(format!(
            "The {} package has no versions path, run \"mxxr db init {}\" first.",
            branch, branch
        )));
    }

    let modules = scaffold::revision_modules(&versions)?;
    let parent = if target == "head" {
        modules.last().cloned()
    } else if modules.iter().any(|m| m == target) {
        Some(target.to_string())
    } else {
        return Err(CliError::CommandError(format!(
            "Can't locate revision identified by {}.",
            target
        )));
    };

    let revision = scaffold::revision_name(Utc::now(), branch, message);
    let file = scaffold::write_revision(
        &versions,
        branch,
        &revision,
        &scaffold::render_revision(branch, message, parent.as_deref()),
    )?;

    println!(
        "{} Generating {} ... {}",
        "✓".bold().green(),
        file.display().to_string().cyan(),
        "done".green()
    );
    Ok(())
}

/// Write a merge revision for the given revisions into the application
/// package, or the framework package without an application.
pub async fn merge(
    env: &Environment,
    settings: &Settings,
    revisions: &[String],
    message: Option<&str>,
) -> Result<(), CliError> {
    let branches = env.branches(settings)?;

    let mut merged = Vec::new();
    for revision in revisions {
        if revision == "heads" {
            merged.extend(heads(&branches).into_iter().map(|(_, head)| head));
        } else if branches
            .iter()
            .any(|b| b.migration_names().iter().any(|n| n == revision))
        {
            merged.push(revision.clone());
        } else {
            return Err(CliError::CommandError(format!(
                "Can't locate revision identified by {}.",
                revision
            )));
        }
    }

    let package = match env.app() {
        Ok(app) => app.package(),
        Err(_) => env.mxxn(),
    };
    let message = message.unwrap_or("merge");
    let revision = scaffold::revision_name(Utc::now(), package.name(), message);
    let file = scaffold::write_revision(
        &package.versions_path(),
        package.name(),
        &revision,
        &scaffold::render_merge(package.name(), message, &merged),
    )?;

    println!(
        "{} Generating {} ... {}",
        "✓".bold().green(),
        file.display().to_string().cyan(),
        "done".green()
    );
    Ok(())
}

pub async fn upgrade(env: &Environment, settings: &Settings, target: &str) -> Result<(), CliError> {
    let migrations = open(env, settings).await?;
    let count = migrations.upgrade(target).await?;

    println!(
        "{} Applied {} migrations ({})",
        "✓".bold().green(),
        count.to_string().green(),
        target.cyan()
    );
    Ok(())
}

pub async fn downgrade(env: &Environment, settings: &Settings, target: &str) -> Result<(), CliError> {
    let migrations = open(env, settings).await?;
    let count = migrations.downgrade(target).await?;

    println!(
        "{} Rolled back {} migrations ({})",
        "✓".bold().green(),
        count.to_string().green(),
        target.cyan()
    );
    Ok(())
}

pub async fn branches(env: &Environment, settings: &Settings, verbose: bool) -> Result<(), CliError> {
    let branches = env.branches(settings)?;

    if branches.is_empty() {
        println!("{} No migration branches", "ℹ".bold().blue());
        return Ok(());
    }

    for branch in &branches {
        let names = branch.migration_names();
        println!(
            "{} {}",
            branch.name().cyan(),
            format!("({} revisions)", names.len()).dimmed()
        );
        if verbose {
            for name in names {
                println!("    {}", name);
            }
        }
    }
    Ok(())
}

/// The last migration of every branch.
fn heads(branches: &[Branch]) -> Vec<(String, String)> {
    branches
        .iter()
        .filter_map(|b| {
            b.migration_names()
                .pop()
                .map(|head| (b.name().to_string(), head))
        })
        .collect()
}

pub async fn heads_command(env: &Environment, settings: &Settings, verbose: bool) -> Result<(), CliError> {
    let branches = env.branches(settings)?;

    for (branch, head) in heads(&branches) {
        println!("{} ({}) {}", head.cyan(), branch, "(head)".green());
        if verbose
            && let Some(package) = package_of(env, &branch)
        {
            println!("    Path: {}", revision_file(package, &head).display());
        }
    }
    Ok(())
}

pub async fn current(env: &Environment, settings: &Settings, verbose: bool) -> Result<(), CliError> {
    let migrations = open(env, settings).await?;
    let status = migrations.status().await?;

    if verbose {
        println!("Current revision(s) for {}:", settings.database.url.dimmed());
    }

    for branch in migrations.branches() {
        let last_applied = status
            .iter()
            .filter(|m| m.branch == branch.name() && m.applied)
            .next_back();
        let head = branch.migration_names().pop();

        if let Some(current) = last_applied {
            let marker = if head.as_deref() == Some(current.name.as_str()) {
                " (head)".green().to_string()
            } else {
                String::new()
            };
            println!("{} ({}){}", current.name.cyan(), branch.name(), marker);
        }
    }
    Ok(())
}

/// Select `[start]:[end]` of the migrations in apply order, both inclusive.
pub fn history_range(
    migrations: &[MigrationInfo],
    range: Option<&str>,
) -> Result<Vec<MigrationInfo>, CliError> {
    let Some(range) = range else {
        return Ok(migrations.to_vec());
    };

    let Some((start, end)) = range.split_once(':') else {
        return Err(CliError::CommandError(
            "History range requires [start]:[end], [start]:, or :[end]".to_string(),
        ));
    };

    let locate = |name: &str| {
        migrations.iter().position(|m| m.name == name).ok_or_else(|| {
            CliError::CommandError(format!("Can't locate revision identified by {}.", name))
        })
    };

    let from = if start.is_empty() { 0 } else { locate(start)? };
    let to = if end.is_empty() {
        migrations.len()
    } else {
        locate(end)? + 1
    };

    Ok(migrations
        .get(from..to.max(from))
        .map(<[MigrationInfo]>::to_vec)
        .unwrap_or_default())
}

pub async fn history(
    env: &Environment,
    settings: &Settings,
    rev_range: Option<&str>,
    verbose: bool,
    indicate_current: bool,
) -> Result<(), CliError> {
    let migrations = open(env, settings).await?;
    let status = migrations.status().await?;
    let heads = heads(migrations.branches());

    let current: Vec<&str> = migrations
        .branches()
        .iter()
        .filter_map(|branch| {
            status
                .iter()
                .filter(|m| m.branch == branch.name() && m.applied)
                .next_back()
                .map(|m| m.name.as_str())
        })
        .collect();

    for (index, info) in history_range(&status, rev_range)?.iter().enumerate().rev() {
        let parent = status
            .iter()
            .take_while(|m| m.name != info.name)
            .filter(|m| m.branch == info.branch)
            .last()
            .map(|m| m.name.as_str())
            .unwrap_or("<base>");

        let mut line = format!("{} -> {} ({})", parent, info.name.cyan(), info.branch);
        if heads.iter().any(|(_, head)| head == &info.name) {
            line.push_str(&format!(" {}", "(head)".green()));
        }
        if indicate_current && current.contains(&info.name.as_str()) {
            line.push_str(&format!(" {}", "(current)".yellow()));
        }
        println!("{}", line);

        if verbose {
            println!("    Position: {}", index + 1);
            println!("    Applied: {}", if info.applied { "yes" } else { "no" });
        }
    }
    Ok(())
}

pub async fn show(env: &Environment, settings: &Settings, revision: &str) -> Result<(), CliError> {
    let migrations = open(env, settings).await?;
    let status = migrations.status().await?;

    let Some(position) = status.iter().position(|m| m.name == revision) else {
        return Err(CliError::CommandError(format!(
            "Can't locate revision identified by {}.",
            revision
        )));
    };
    let info = &status[position];

    let parent = status[..position]
        .iter()
        .rev()
        .find(|m| m.branch == info.branch)
        .map(|m| m.name.as_str())
        .unwrap_or("<base>");
    let is_head = !status[position + 1..].iter().any(|m| m.branch == info.branch);

    println!(
        "Rev: {}{}",
        info.name.cyan(),
        if is_head { " (head)" } else { "" }
    );
    println!("Branch: {}", info.branch);
    println!("Parent: {}", parent);
    println!("Applied: {}", if info.applied { "yes" } else { "no" });
    if let Some(package) = package_of(env, &info.branch) {
        println!("Path: {}", revision_file(package, &info.name).display());
    }
    Ok(())
}

fn package_of<'a>(env: &'a Environment, branch: &str) -> Option<&'a Package> {
    env.package(branch).ok()
}

fn revision_file(package: &Package, revision: &str) -> PathBuf {
    package.versions_path().join(format!("{}.rs", revision))
}
