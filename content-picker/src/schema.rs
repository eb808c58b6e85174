use crate::models::MediaKind;
use rusqlite::{params, Connection, Result};

/// Initialize the local media index schema.
///
/// The `files` table mirrors the MediaStore columns the local picker reads, so
/// an exported or synthetic index can stand in for MediaStore off-device.
pub fn init_media_schema(conn: &Connection) -> Result<()> {
    conn.execute(
        "CREATE TABLE IF NOT EXISTS media_schema_version (
            version INTEGER PRIMARY KEY,
            applied_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )",
        [],
    )?;

    let current_version: i32 = conn
        .query_row(
            "SELECT version FROM media_schema_version ORDER BY version DESC LIMIT 1",
            [],
            |row| row.get(0),
        )
        .unwrap_or(0);

    if current_version < 1 {
        create_media_schema_v1(conn)?;
        conn.execute("INSERT INTO media_schema_version (version) VALUES (1)", [])?;
    }

    Ok(())
}

fn create_media_schema_v1(conn: &Connection) -> Result<()> {
    // media_type: 1 = image, 3 = video (MediaStore.Files.FileColumns)
    conn.execute(
        "CREATE TABLE IF NOT EXISTS files (
            _id INTEGER PRIMARY KEY,
            media_type INTEGER NOT NULL DEFAULT 0,
            date_added INTEGER NOT NULL,
            display_name TEXT,
            mime_type TEXT
        )",
        [],
    )?;

    conn.execute(
        "CREATE INDEX IF NOT EXISTS idx_files_media_type_date
         ON files(media_type, date_added DESC)",
        [],
    )?;

    Ok(())
}

/// Adds one media row; `date_added` is seconds since the epoch
pub fn insert_media(
    conn: &Connection,
    id: i64,
    kind: MediaKind,
    date_added: i64,
    display_name: Option<&str>,
) -> Result<()> {
    let mime_type = match kind {
        MediaKind::Image => "image/jpeg",
        MediaKind::Video => "video/mp4",
    };
    conn.execute(
        "INSERT INTO files (_id, media_type, date_added, display_name, mime_type)
         VALUES (?1, ?2, ?3, ?4, ?5)",
        params![id, kind.code(), date_added, display_name, mime_type],
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_is_idempotent() {
        let conn = Connection::open_in_memory().unwrap();
        init_media_schema(&conn).unwrap();
        init_media_schema(&conn).unwrap();

        let versions: i32 = conn
            .query_row("SELECT COUNT(*) FROM media_schema_version", [], |row| row.get(0))
            .unwrap();
        assert_eq!(versions, 1);
    }

    #[test]
    fn test_insert_media() {
        let conn = Connection::open_in_memory().unwrap();
        init_media_schema(&conn).unwrap();
        insert_media(&conn, 12, MediaKind::Video, 1_700_000_000, Some("clip.mp4")).unwrap();

        let (kind, mime): (i64, String) = conn
            .query_row(
                "SELECT media_type, mime_type FROM files WHERE _id = 12",
                [],
                |row| Ok((row.get(0)?, row.get(1)?)),
            )
            .unwrap();
        assert_eq!(kind, 3);
        assert_eq!(mime, "video/mp4");
    }
}
