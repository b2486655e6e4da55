use std::path::Path;

use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use tracing::{debug, info};

use crate::errors::{MxxnError, Result};
use crate::settings::DatabaseSettings;
use crate::system::logging::targets;

/// The database backends supported by the framework.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Backend {
    Sqlite,
    MySql,
    Postgres,
}

impl Backend {
    pub fn from_url(url: &str) -> Result<Self> {
        let scheme = url.split_once(':').map(|(scheme, _)| scheme).unwrap_or_default();
        match scheme {
            "sqlite" => Ok(Backend::Sqlite),
            "mysql" | "mariadb" => Ok(Backend::MySql),
            "postgres" | "postgresql" => Ok(Backend::Postgres),
            _ => Err(MxxnError::database_url(format!(
                "The database URL must start with sqlite://, mysql:// or postgres://, got \"{}\".",
                url
            ))),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Backend::Sqlite => "sqlite",
            Backend::MySql => "mysql",
            Backend::Postgres => "postgres",
        }
    }
}

/// Connect to the configured database.
pub async fn connect(settings: &DatabaseSettings) -> Result<DatabaseConnection> {
    let backend = Backend::from_url(&settings.url)?;
    debug!(target: targets::DATABASE, "Connecting to the {} database", backend.name());

    let db = match backend {
        Backend::Sqlite => connect_sqlite(&settings.url).await?,
        Backend::MySql | Backend::Postgres => {
            connect_generic(&settings.url, backend, settings.pool_size).await?
        }
    };

    info!(target: targets::DATABASE, "Connected to the {} database", backend.name());
    Ok(db)
}

/// Connect to SQLite, creating the database file and its directory.
pub async fn connect_sqlite(database_url: &str) -> Result<DatabaseConnection> {
    use sea_orm::SqlxSqliteConnector;
    use sea_orm::sqlx::SqlitePool;
    use sea_orm::sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqliteSynchronous};
    use std::str::FromStr;

    if let Some(file) = sqlite_file(database_url)
        && let Some(parent) = file.parent().filter(|p| !p.as_os_str().is_empty())
    {
        std::fs::create_dir_all(parent)?;
    }

    let opt = SqliteConnectOptions::from_str(database_url)
        .map_err(|e| MxxnError::database_url(format!("Invalid SQLite URL: {}", e)))?
        .create_if_missing(true)
        .journal_mode(SqliteJournalMode::Wal)
        .synchronous(SqliteSynchronous::Normal)
        .busy_timeout(std::time::Duration::from_secs(5))
        .foreign_keys(true);

    let pool = SqlitePool::connect_with(opt).await.map_err(|e| {
        MxxnError::database_connection(format!("Failed to connect to the SQLite database: {}", e))
    })?;

    Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
}

/// Connect to MySQL or PostgreSQL through a connection pool.
pub async fn connect_generic(
    database_url: &str,
    backend: Backend,
    pool_size: u32,
) -> Result<DatabaseConnection> {
    let mut opt = ConnectOptions::new(database_url.to_owned());
    opt.max_connections(pool_size.max(1))
        .min_connections(pool_size.clamp(1, 5))
        .connect_timeout(std::time::Duration::from_secs(8))
        .acquire_timeout(std::time::Duration::from_secs(8))
        .idle_timeout(std::time::Duration::from_secs(300))
        .max_lifetime(std::time::Duration::from_secs(3600))
        .sqlx_logging(false);

    Database::connect(opt).await.map_err(|e| {
        MxxnError::database_connection(format!(
            "Failed to connect to the {} database: {}",
            backend.name(),
            e
        ))
    })
}

/// The file of a SQLite URL, `None` for in-memory databases.
fn sqlite_file(url: &str) -> Option<&Path> {
    let rest = url.strip_prefix("sqlite://").or_else(|| url.strip_prefix("sqlite:"))?;
    let path = rest.split('?').next().unwrap_or_default();
    if path.is_empty() || path == ":memory:" {
        return None;
    }
    Some(Path::new(path))
}
