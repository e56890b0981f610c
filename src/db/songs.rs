use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, Error as SqlError, ErrorCode};

use crate::models::SongRecord;
use crate::song::search_key;

/// Fetch the whole library, ordered case-insensitively so mixed-case titles
/// group together in the UI. The normalized search key is computed here, once
/// per row, so every later keystroke of a search only does substring checks.
pub fn fetch_songs(conn: &Connection) -> Result<Vec<SongRecord>> {
    let mut stmt = conn
        .prepare(
            "SELECT id, name, author, path, full_text
             FROM songs
             ORDER BY name COLLATE NOCASE",
        )
        .context("failed to prepare songs query")?;

    let songs = stmt
        .query_map([], |row| {
            let name: String = row.get(1)?;
            let full_text: String = row.get(4)?;
            Ok(SongRecord {
                id: row.get(0)?,
                search_key: search_key(&name, &full_text),
                name,
                author: row.get::<_, Option<String>>(2)?.unwrap_or_default(),
                path: row.get::<_, Option<String>>(3)?.unwrap_or_default(),
                full_text,
            })
        })
        .context("failed to iterate songs")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect songs")?;

    Ok(songs)
}

/// Insert a brand new song. We echo the hydrated record so callers can update
/// UI state without having to re-query the database.
pub fn create_song(
    conn: &Connection,
    name: &str,
    author: &str,
    path: &str,
    full_text: &str,
) -> Result<SongRecord> {
    conn.execute(
        "INSERT INTO songs (name, author, path, full_text) VALUES (?1, ?2, ?3, ?4)",
        params![name, author, path, full_text],
    )
    .map_err(|err| map_unique_constraint(err, name))
    .context("failed to insert song")?;

    let id = conn.last_insert_rowid();
    Ok(SongRecord {
        id,
        name: name.to_string(),
        author: author.to_string(),
        path: path.to_string(),
        full_text: full_text.to_string(),
        search_key: search_key(name, full_text),
    })
}

/// Update all editable song fields. We surface an explicit error when zero
/// rows are touched so the UI can show a friendly message instead of silently
/// continuing.
pub fn update_song(
    conn: &Connection,
    id: i64,
    name: &str,
    author: &str,
    path: &str,
    full_text: &str,
) -> Result<()> {
    let updated = conn
        .execute(
            "UPDATE songs SET name = ?1, author = ?2, path = ?3, full_text = ?4 WHERE id = ?5",
            params![name, author, path, full_text, id],
        )
        .map_err(|err| map_unique_constraint(err, name))
        .context("failed to update song")?;

    if updated == 0 {
        Err(anyhow!("Song not found"))
    } else {
        Ok(())
    }
}

/// Permanently delete a song. The service list cascades automatically so any
/// scheduled entries disappear without additional cleanup.
pub fn delete_song(conn: &Connection, id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM songs WHERE id = ?1", params![id])
        .context("failed to delete song")?;

    if deleted == 0 {
        Err(anyhow!("Song not found"))
    } else {
        Ok(())
    }
}

/// Coerce SQLite constraint errors into human-readable messages. The only
/// constraint we guard is the uniqueness of song names, but keeping this
/// helper isolated prepares us for future constraints.
fn map_unique_constraint(err: SqlError, name: &str) -> anyhow::Error {
    if matches!(err.sqlite_error_code(), Some(ErrorCode::ConstraintViolation)) {
        anyhow!("A song named \"{name}\" already exists.")
    } else {
        err.into()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::ensure_schema;

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    #[test]
    fn create_and_fetch_computes_search_key() {
        let conn = test_conn();
        create_song(&conn, "Cântare", "Ion Popescu", "colinde", "Verse\nȘoapte\n---\nVerse")
            .unwrap();

        let songs = fetch_songs(&conn).unwrap();
        assert_eq!(songs.len(), 1);
        assert_eq!(songs[0].name, "Cântare");
        assert!(songs[0].search_key.contains("cantare"));
        assert!(songs[0].search_key.contains("soapte"));
    }

    #[test]
    fn duplicate_names_surface_a_friendly_error() {
        let conn = test_conn();
        create_song(&conn, "Same", "", "", "A\n---\nA").unwrap();
        let err = create_song(&conn, "Same", "", "", "B\n---\nB").unwrap_err();
        // The friendly message sits at the root of the chain, which is what
        // the UI surfaces; the Display of the outer error only carries the
        // insert context.
        let root = err.chain().last().map(ToString::to_string).unwrap_or_default();
        assert!(root.contains("already exists"), "unexpected error: {err:#}");
    }

    #[test]
    fn update_and_delete_report_missing_rows() {
        let conn = test_conn();
        assert!(update_song(&conn, 42, "X", "", "", "").is_err());
        assert!(delete_song(&conn, 42).is_err());

        let song = create_song(&conn, "Here", "", "", "A\n---\nA").unwrap();
        update_song(&conn, song.id, "Renamed", "Author", "path", "B\n---\nB").unwrap();
        let songs = fetch_songs(&conn).unwrap();
        assert_eq!(songs[0].name, "Renamed");
        delete_song(&conn, song.id).unwrap();
        assert!(fetch_songs(&conn).unwrap().is_empty());
    }
}
