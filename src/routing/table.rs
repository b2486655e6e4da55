use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use actix_web::{HttpRequest, web};
use tracing::{debug, info, warn};

use super::route::{APP_ROOT, Owner, Resource, Route, absolute_url, mount_point};
use crate::env::{Environment, Package};
use crate::errors::{MxxnError, Result};
use crate::settings::Settings;
use crate::system::logging::targets;

/// A published route.
#[derive(Clone)]
pub struct RouteEntry {
    pub url: String,
    pub resource: Arc<dyn Resource>,
    pub suffix: Option<String>,
    pub owner: Owner,
    /// Whether the application replaced the declared resource.
    pub covered: bool,
}

impl fmt::Debug for RouteEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RouteEntry")
            .field("url", &self.url)
            .field("suffix", &self.suffix)
            .field("owner", &self.owner)
            .field("covered", &self.covered)
            .finish()
    }
}

/// The merged routing table of all packages.
///
/// Built once at startup and immutable afterwards. Entries keep their
/// declaration order: mxxn, the enabled mxns in configured order, the
/// application.
#[derive(Debug, Clone, Default)]
pub struct RouteTable {
    entries: Vec<RouteEntry>,
    index: HashMap<String, usize>,
}

impl RouteTable {
    /// Collect the declared routes of every enabled package and apply the
    /// route covers of the application.
    pub fn build(env: &Environment, settings: &Settings) -> Result<Self> {
        let mut table = RouteTable::default();
        let mxns = env.mxns(settings)?;

        table.declare(env.mxxn())?;
        debug!(target: targets::REGISTRATION, "The routes of the mxxn package were registered.");

        for mxn in &mxns {
            if mxn.declared_routes().is_empty() {
                debug!(target: targets::REGISTRATION, "The mxn {} contains no routes.", mxn.name());
                continue;
            }
            table.declare(mxn)?;
            debug!(target: targets::REGISTRATION, "The routes of the mxn {} were registered.", mxn.name());
        }

        let Ok(app) = env.app() else {
            info!(target: targets::REGISTRATION, "Registered {} routes.", table.len());
            return Ok(table);
        };

        table.declare(app.package())?;
        debug!(
            target: targets::REGISTRATION,
            "The routes of the application package {} were registered.",
            app.name()
        );

        let mut covered_mxns: Vec<&str> = app.covered_mxns().collect();
        covered_mxns.sort_unstable();
        for mxn in &covered_mxns {
            if app.mxn_covers(mxn).iter().any(|cover| cover.url() == APP_ROOT) {
                return Err(MxxnError::root_route(format!(
                    "The {} route can only be covered for the mxxn package, not for the mxn {}.",
                    APP_ROOT, mxn
                )));
            }
        }

        table.cover(env.mxxn(), app.mxxn_covers());

        for mxn in &mxns {
            table.cover(mxn, app.mxn_covers(mxn.name()));
        }

        for mxn in covered_mxns {
            if !mxns.iter().any(|enabled| enabled.name() == mxn) {
                debug!(
                    target: targets::REGISTRATION,
                    "The covers for {} were skipped, the mxn is not enabled.",
                    mxn
                );
            }
        }

        info!(
            target: targets::REGISTRATION,
            "Registered {} routes, {} covered.",
            table.len(),
            table.entries.iter().filter(|entry| entry.covered).count()
        );

        Ok(table)
    }

    fn declare(&mut self, package: &Package) -> Result<()> {
        let owner = package.owner();
        let mount = mount_point(&owner, package.unprefixed_name());

        for route in package.declared_routes() {
            if route.url() == APP_ROOT && owner != Owner::Mxxn {
                return Err(MxxnError::root_route(format!(
                    "The {} route can only be declared by the mxxn package, not by {}.",
                    APP_ROOT, owner
                )));
            }

            if !route.resource().supports(route.suffix()) {
                return Err(MxxnError::routing(format!(
                    "The route {} of the package {} has {} the resource does not implement.",
                    route.url(),
                    owner,
                    match route.suffix() {
                        Some(suffix) => format!("the suffix \"{}\" which", suffix),
                        None => "no suffix, a plain responder".to_string(),
                    }
                )));
            }

            let url = absolute_url(&mount, route.url());
            if self.index.contains_key(&url) {
                return Err(MxxnError::routing(format!(
                    "The URL {} of the package {} is already registered.",
                    url, owner
                )));
            }

            self.index.insert(url.clone(), self.entries.len());
            self.entries.push(RouteEntry {
                url,
                resource: route.resource().clone(),
                suffix: route.suffix().map(str::to_string),
                owner: owner.clone(),
                covered: false,
            });
        }

        Ok(())
    }

    /// Replace the resources of routes declared by `package`.
    ///
    /// Covers of URLs the package never declared, or with a suffix the cover
    /// resource does not implement, are skipped.
    fn cover(&mut self, package: &Package, covers: &[Route]) {
        let owner = package.owner();
        let mount = mount_point(&owner, package.unprefixed_name());

        for cover in covers {
            let url = absolute_url(&mount, cover.url());

            let Some(entry) = self
                .index
                .get(&url)
                .map(|&i| &mut self.entries[i])
                .filter(|entry| entry.owner == owner)
            else {
                warn!(
                    target: targets::REGISTRATION,
                    "The cover for {} was skipped, the package {} does not declare it.",
                    url, owner
                );
                continue;
            };

            if !cover.resource().supports(cover.suffix()) {
                warn!(
                    target: targets::REGISTRATION,
                    "The cover for {} was skipped, its resource does not implement the suffix {:?}.",
                    url,
                    cover.suffix()
                );
                continue;
            }

            entry.resource = cover.resource().clone();
            entry.suffix = cover.suffix().map(str::to_string);
            entry.covered = true;
            debug!(target: targets::REGISTRATION, "The route {} of {} was covered.", url, owner);
        }
    }

    pub fn entries(&self) -> &[RouteEntry] {
        &self.entries
    }

    pub fn get(&self, url: &str) -> Option<&RouteEntry> {
        self.index.get(url).map(|&i| &self.entries[i])
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Publish every entry as an actix-web route accepting any method.
    pub fn configure(&self, cfg: &mut web::ServiceConfig) {
        for entry in &self.entries {
            let resource = entry.resource.clone();
            let suffix = entry.suffix.clone();

            cfg.route(
                &entry.url,
                web::route().to(move |req: HttpRequest, body: web::Bytes| {
                    let resource = resource.clone();
                    let suffix = suffix.clone();
                    async move { resource.respond(&req, body, suffix.as_deref()).await }
                }),
            );
        }
    }
}
