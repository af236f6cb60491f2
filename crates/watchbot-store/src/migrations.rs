use anyhow::{Context, Result};
use rusqlite::Connection;
use tracing::{debug, info};

pub fn run(conn: &Connection) -> Result<()> {
    conn.execute_batch(
        "
        CREATE TABLE IF NOT EXISTS watched (
            id              INTEGER PRIMARY KEY AUTOINCREMENT,
            title           TEXT,
            media_type      TEXT,
            tmdb_id         INTEGER,
            user_id         INTEGER,
            watched_at      TIMESTAMP,
            current_episode INTEGER DEFAULT 0
        );

        CREATE INDEX IF NOT EXISTS idx_watched_user
            ON watched(user_id, watched_at);
        ",
    )
    .context("Failed to create watched table")?;

    // Databases created before episode tracking lack this column
    add_column_if_not_exists(conn, "watched", "current_episode", "INTEGER DEFAULT 0")
        .context("Failed to add current_episode column")?;

    info!("Database migrations complete");
    Ok(())
}

/// Whether `table` already has `column`. A table that cannot be inspected has none.
pub fn column_exists(conn: &Connection, table: &str, column: &str) -> bool {
    let lookup = |conn: &Connection| -> rusqlite::Result<bool> {
        let mut stmt = conn.prepare(&format!("PRAGMA table_info({})", table))?;
        let found = stmt
            .query_map([], |row| row.get::<_, String>("name"))?
            .flatten()
            .any(|name| name == column);
        Ok(found)
    };
    lookup(conn).unwrap_or(false)
}

pub fn add_column_if_not_exists(
    conn: &Connection,
    table: &str,
    column: &str,
    col_type: &str,
) -> Result<(), rusqlite::Error> {
    if column_exists(conn, table, column) {
        return Ok(());
    }

    let sql = format!("ALTER TABLE {} ADD COLUMN {} {}", table, column, col_type);
    match conn.execute(&sql, []) {
        Ok(_) => Ok(()),
        Err(e) if is_duplicate_column(&e) => {
            debug!(table, column, "Column already exists");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

fn is_duplicate_column(err: &rusqlite::Error) -> bool {
    err.to_string().contains("duplicate column name")
}
