use crate::core::error;
use rusqlite::Connection;
use std::fs;
use std::path::{Path, PathBuf};

pub const STORE_DB_NAME: &str = "store.db";

/// One flat table backs every logical namespace. Partitioning happens in
/// [`crate::core::store::Store`] via key prefixes, not in SQL.
pub const STORE_DB_SCHEMA: &str = "
    CREATE TABLE IF NOT EXISTS kv (
        key TEXT PRIMARY KEY,
        value TEXT NOT NULL
    )
";

pub fn db_connect(db_path: &str) -> Result<Connection, error::InterimError> {
    let conn = Connection::open(db_path)?;
    conn.busy_timeout(std::time::Duration::from_secs(5))
        .map_err(error::InterimError::RusqliteError)?;
    conn.query_row("PRAGMA journal_mode=WAL;", [], |_| Ok(()))
        .map_err(error::InterimError::RusqliteError)?;
    conn.execute("PRAGMA foreign_keys=ON;", [])
        .map_err(error::InterimError::RusqliteError)?;
    Ok(conn)
}

pub fn store_db_path(root: &Path) -> PathBuf {
    root.join(STORE_DB_NAME)
}

pub fn initialize_store_db(root: &Path) -> Result<(), error::InterimError> {
    let db_path = store_db_path(root);
    let parent_dir = db_path.parent().ok_or_else(|| {
        error::InterimError::PathError(format!("{} has no parent directory", db_path.display()))
    })?;
    fs::create_dir_all(parent_dir).map_err(error::InterimError::IoError)?;

    let conn = db_connect(&db_path.to_string_lossy())?;
    conn.execute(STORE_DB_SCHEMA, [])?;
    Ok(())
}
