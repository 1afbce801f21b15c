use rusqlite::Connection;
use std::path::Path;
use tracing::{debug, info};

use crate::config::Config;
use crate::error::{Error, Result};

mod contacts;
pub mod query;
mod schema;

pub use query::{ContactQuery, Filter, FilterColumn};
pub use schema::CONTACT_COLUMNS;

/// The contact repository. Owns the single store connection for the life of
/// the process; every operation runs on it sequentially.
pub struct Database {
    conn: Connection,
    location: String,
}

impl Database {
    /// Open the database named by the configuration, creating it if needed.
    pub fn open(config: &Config) -> Result<Self> {
        Self::open_at(&config.database_path())
    }

    pub fn open_at(path: &Path) -> Result<Self> {
        let location = path.display().to_string();

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent).map_err(|e| Error::unavailable(&location, e))?;
        }

        let conn = Connection::open(path).map_err(|e| Error::unavailable(&location, e))?;
        Self::bootstrap(conn, location)
    }

    /// Open in-memory database for testing
    pub fn open_memory() -> Result<Self> {
        let conn =
            Connection::open_in_memory().map_err(|e| Error::unavailable(":memory:", e))?;
        Self::bootstrap(conn, ":memory:".to_string())
    }

    fn bootstrap(conn: Connection, location: String) -> Result<Self> {
        let db = Self { conn, location };
        db.ensure_schema()?;
        info!(location = %db.location, "contact store ready");
        Ok(db)
    }

    pub fn location(&self) -> &str {
        &self.location
    }

    /// Create the contacts table if it is missing. Safe on every startup;
    /// an existing table is never dropped or altered, only checked for the
    /// columns the repository relies on.
    pub fn ensure_schema(&self) -> Result<()> {
        let existed = self.table_exists().map_err(|e| self.unavailable(e))?;

        self.conn
            .execute_batch(&format!("BEGIN TRANSACTION; {} COMMIT;", schema::SCHEMA_V1))
            .map_err(|e| {
                let _ = self.conn.execute_batch("ROLLBACK;");
                self.unavailable(e)
            })?;

        let columns = self.table_columns().map_err(|e| self.unavailable(e))?;
        if let Some(missing) = CONTACT_COLUMNS
            .iter()
            .find(|c| !columns.iter().any(|have| have == *c))
        {
            return Err(self.unavailable(rusqlite::Error::InvalidColumnName(
                missing.to_string(),
            )));
        }

        if existed {
            debug!(location = %self.location, "contacts table verified");
        } else {
            info!(location = %self.location, "contacts table created");
        }
        Ok(())
    }

    fn table_exists(&self) -> rusqlite::Result<bool> {
        let count: i64 = self.conn.query_row(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = 'contacts'",
            [],
            |row| row.get(0),
        )?;
        Ok(count > 0)
    }

    fn table_columns(&self) -> rusqlite::Result<Vec<String>> {
        let mut stmt = self.conn.prepare("PRAGMA table_info(contacts)")?;
        let columns = stmt
            .query_map([], |row| row.get::<_, String>("name"))?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(columns)
    }

    #[cfg(test)]
    pub(crate) fn execute_batch(&self, sql: &str) -> rusqlite::Result<()> {
        self.conn.execute_batch(sql)
    }

    fn unavailable(&self, source: rusqlite::Error) -> Error {
        tracing::error!(location = %self.location, error = %source, "schema bootstrap failed");
        Error::unavailable(&self.location, source)
    }
}
