use std::fs;
use std::path::PathBuf;

use anyhow::{anyhow, Context, Result};
use directories::BaseDirs;
use rusqlite::Connection;

/// Folder name used beneath the user's home directory for application data.
/// The config file and the log file live here alongside the database.
const DATA_DIR_NAME: &str = ".cantica";
/// SQLite file name stored inside the application data directory.
const DB_FILE_NAME: &str = "cantica.sqlite";

/// Open (creating if needed) the on-disk database and run lazy migrations.
pub fn open_database() -> Result<Connection> {
    let dir = data_dir()?;
    fs::create_dir_all(&dir).context("failed to create data directory")?;

    let conn =
        Connection::open(dir.join(DB_FILE_NAME)).context("failed to open SQLite database")?;
    ensure_schema(&conn)?;
    Ok(conn)
}

/// Create the schema on an existing connection. Split out from
/// [`open_database`] so tests can run the same migrations against an
/// in-memory database. Also toggles `PRAGMA foreign_keys = ON` so the
/// referential integrity checks in our schema behave the same during tests
/// and production runs.
pub fn ensure_schema(conn: &Connection) -> Result<()> {
    conn.execute("PRAGMA foreign_keys = ON", [])
        .context("failed to enable foreign keys")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS songs (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            name TEXT NOT NULL UNIQUE,
            author TEXT,
            path TEXT,
            full_text TEXT NOT NULL
        )",
        [],
    )
    .context("failed to create songs table")?;

    conn.execute(
        "CREATE TABLE IF NOT EXISTS service_items (
            id INTEGER PRIMARY KEY AUTOINCREMENT,
            song_id INTEGER NOT NULL,
            position INTEGER NOT NULL,
            FOREIGN KEY(song_id) REFERENCES songs(id) ON DELETE CASCADE
        )",
        [],
    )
    .context("failed to create service_items table")?;

    Ok(())
}

/// Resolve the application data directory inside the user's home.
pub fn data_dir() -> Result<PathBuf> {
    let base_dirs = BaseDirs::new().ok_or_else(|| anyhow!("could not locate home directory"))?;
    Ok(base_dirs.home_dir().join(DATA_DIR_NAME))
}
