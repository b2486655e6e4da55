//! Route and static file registration.
//!
//! Routes are registered in two passes. The first pass publishes the routes
//! declared by mxxn, by each enabled mxn in the configured order and by the
//! application, each below its mount point. The second pass applies the
//! route covers of the application, replacing the resource of an already
//! declared URL.

mod route;
mod statics;
mod table;

pub use route::{APP_ROOT, Owner, Resource, Route, absolute_url, mount_point};
pub use statics::{StaticFiles, content_type};
pub use table::{RouteEntry, RouteTable};
