//! Database connection and migrations.

mod connection;
pub mod migrate;

pub use connection::{Backend, connect, connect_generic, connect_sqlite};
pub use migrate::{MigrationInfo, Migrations, downgrade_steps, upgrade_steps};
