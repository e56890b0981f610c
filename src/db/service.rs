use anyhow::{anyhow, Context, Result};
use rusqlite::{params, Connection, OptionalExtension};

use crate::models::{ServiceItem, SongRecord};
use crate::song::search_key;

/// Fetch the ordered service list with each referenced song hydrated. The
/// `position` column is the single source of truth for show order.
pub fn fetch_service(conn: &Connection) -> Result<Vec<ServiceItem>> {
    let mut stmt = conn
        .prepare(
            "SELECT si.id, si.position, s.id, s.name, s.author, s.path, s.full_text
             FROM service_items si
             INNER JOIN songs s ON s.id = si.song_id
             ORDER BY si.position",
        )
        .context("failed to prepare service query")?;

    let items = stmt
        .query_map([], |row| {
            let name: String = row.get(3)?;
            let full_text: String = row.get(6)?;
            Ok(ServiceItem {
                id: row.get(0)?,
                position: row.get(1)?,
                song: SongRecord {
                    id: row.get(2)?,
                    search_key: search_key(&name, &full_text),
                    name,
                    author: row.get::<_, Option<String>>(4)?.unwrap_or_default(),
                    path: row.get::<_, Option<String>>(5)?.unwrap_or_default(),
                    full_text,
                },
            })
        })
        .context("failed to iterate service items")?
        .collect::<Result<Vec<_>, _>>()
        .context("failed to collect service items")?;

    Ok(items)
}

/// Append a song at the end of the service list. The same song may appear
/// more than once; each entry is an independent row.
pub fn add_to_service(conn: &Connection, song_id: i64) -> Result<()> {
    conn.execute(
        "INSERT INTO service_items (song_id, position)
         SELECT ?1, COALESCE(MAX(position), 0) + 1 FROM service_items",
        params![song_id],
    )
    .context("failed to add song to service")?;
    Ok(())
}

/// Remove one entry from the service list, surfacing a descriptive error if
/// the entry never existed.
pub fn remove_from_service(conn: &Connection, item_id: i64) -> Result<()> {
    let deleted = conn
        .execute("DELETE FROM service_items WHERE id = ?1", params![item_id])
        .context("failed to remove service item")?;

    if deleted == 0 {
        Err(anyhow!("Service entry not found"))
    } else {
        Ok(())
    }
}

/// Swap an entry with its neighbor above (`offset < 0`) or below
/// (`offset > 0`). Returns `false` when the entry is already at that edge of
/// the list, which the UI treats as a quiet no-op.
pub fn move_service_item(conn: &Connection, item_id: i64, offset: i64) -> Result<bool> {
    let position: i64 = conn
        .query_row(
            "SELECT position FROM service_items WHERE id = ?1",
            params![item_id],
            |row| row.get(0),
        )
        .optional()
        .context("failed to read service item")?
        .ok_or_else(|| anyhow!("Service entry not found"))?;

    let neighbor: Option<(i64, i64)> = if offset < 0 {
        conn.query_row(
            "SELECT id, position FROM service_items
             WHERE position < ?1 ORDER BY position DESC LIMIT 1",
            params![position],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    } else {
        conn.query_row(
            "SELECT id, position FROM service_items
             WHERE position > ?1 ORDER BY position ASC LIMIT 1",
            params![position],
            |row| Ok((row.get(0)?, row.get(1)?)),
        )
    }
    .optional()
    .context("failed to find neighboring service item")?;

    let Some((neighbor_id, neighbor_position)) = neighbor else {
        return Ok(false);
    };

    conn.execute(
        "UPDATE service_items SET position = ?1 WHERE id = ?2",
        params![neighbor_position, item_id],
    )
    .context("failed to reposition service item")?;
    conn.execute(
        "UPDATE service_items SET position = ?1 WHERE id = ?2",
        params![position, neighbor_id],
    )
    .context("failed to reposition neighboring item")?;

    Ok(true)
}

/// Empty the service list, typically after a service has finished.
pub fn clear_service(conn: &Connection) -> Result<()> {
    conn.execute("DELETE FROM service_items", [])
        .context("failed to clear service list")?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_song, delete_song, ensure_schema};

    fn test_conn() -> Connection {
        let conn = Connection::open_in_memory().unwrap();
        ensure_schema(&conn).unwrap();
        conn
    }

    fn seed(conn: &Connection, names: &[&str]) -> Vec<i64> {
        names
            .iter()
            .map(|name| {
                let song = create_song(conn, name, "", "", "A\n---\nA").unwrap();
                add_to_service(conn, song.id).unwrap();
                song.id
            })
            .collect()
    }

    #[test]
    fn entries_keep_insertion_order() {
        let conn = test_conn();
        seed(&conn, &["First", "Second", "Third"]);

        let items = fetch_service(&conn).unwrap();
        let names: Vec<&str> = items.iter().map(|i| i.song.name.as_str()).collect();
        assert_eq!(names, vec!["First", "Second", "Third"]);
        assert!(items.windows(2).all(|w| w[0].position < w[1].position));
    }

    #[test]
    fn moving_swaps_with_the_neighbor() {
        let conn = test_conn();
        seed(&conn, &["First", "Second", "Third"]);
        let items = fetch_service(&conn).unwrap();

        assert!(move_service_item(&conn, items[2].id, -1).unwrap());
        let names: Vec<String> = fetch_service(&conn)
            .unwrap()
            .into_iter()
            .map(|i| i.song.name)
            .collect();
        assert_eq!(names, vec!["First", "Third", "Second"]);

        // Already at the top edge: quiet no-op.
        assert!(!move_service_item(&conn, items[0].id, -1).unwrap());
    }

    #[test]
    fn deleting_a_song_cascades_to_the_service() {
        let conn = test_conn();
        let ids = seed(&conn, &["Kept", "Dropped"]);
        delete_song(&conn, ids[1]).unwrap();

        let items = fetch_service(&conn).unwrap();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0].song.name, "Kept");
    }

    #[test]
    fn remove_and_clear() {
        let conn = test_conn();
        seed(&conn, &["One", "Two"]);
        let items = fetch_service(&conn).unwrap();

        remove_from_service(&conn, items[0].id).unwrap();
        assert_eq!(fetch_service(&conn).unwrap().len(), 1);
        assert!(remove_from_service(&conn, items[0].id).is_err());

        clear_service(&conn).unwrap();
        assert!(fetch_service(&conn).unwrap().is_empty());
    }
}
