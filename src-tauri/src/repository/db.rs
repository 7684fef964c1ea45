//! Database Connection and Setup
//!
//! Local SQLite file holding the persisted login session.

use rusqlite::Connection;
use std::path::Path;
use std::sync::Arc;
use tokio::sync::Mutex;

use crate::domain::{DomainError, DomainResult};

/// Shared connection handle
pub type DbConnection = Arc<Mutex<Connection>>;

/// Open (or create) the database at `db_path` and run migrations.
///
/// `:memory:` opens a private in-memory database.
pub async fn init_db(db_path: &Path) -> DomainResult<DbConnection> {
    if let Some(parent) = db_path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            std::fs::create_dir_all(parent)
                .map_err(|e| DomainError::Storage(format!("{}: {}", parent.display(), e)))?;
        }
    }

    let conn = Connection::open(db_path)
        .map_err(|e| DomainError::Storage(format!("Failed to open db: {}", e)))?;
    run_migrations(&conn)?;
    log::info!("[db] session store ready at {}", db_path.display());

    Ok(Arc::new(Mutex::new(conn)))
}

/// Check if a column exists in a table
fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let query = format!("PRAGMA table_info({})", table);
    let Ok(mut stmt) = conn.prepare(&query) else {
        return false;
    };
    let Ok(names) = stmt.query_map([], |row| row.get::<_, String>(1)) else {
        return false;
    };
    let found = names.flatten().any(|name| name == column);
    found
}

/// Run database migrations
fn run_migrations(conn: &Connection) -> DomainResult<()> {
    // Single-row table: id is pinned to 1
    conn.execute(
        "CREATE TABLE IF NOT EXISTS session (
            id INTEGER PRIMARY KEY CHECK (id = 1),
            jwt TEXT NOT NULL,
            user_json TEXT NOT NULL
        )",
        (),
    )
    .map_err(|e| DomainError::Storage(e.to_string()))?;

    if !column_exists(conn, "session", "saved_at") {
        conn.execute(
            "ALTER TABLE session ADD COLUMN saved_at INTEGER NOT NULL DEFAULT 0",
            (),
        )
        .map_err(|e| DomainError::Storage(format!("Failed to add saved_at: {}", e)))?;
    }

    Ok(())
}
