use crate::error::AppError;
use rusqlite::Connection;
use std::path::{Path, PathBuf};

/// Path of the SQLite media index used when MediaStore is not available
pub fn get_media_index_path(configured: Option<&Path>) -> PathBuf {
    configured
        .map(Path::to_path_buf)
        .unwrap_or_else(|| PathBuf::from("./data/media-index.db"))
}

/// Creates the media index (directory and schema) if needed
pub fn init_media_index(path: &Path) -> Result<Connection, AppError> {
    // Make sure the directory exists
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let conn = Connection::open(path)?;
    content_picker::init_media_schema(&conn)?;

    Ok(conn)
}

/// Number of rows in the media index
pub fn media_count(conn: &Connection) -> Result<i64, AppError> {
    let count: i64 = conn.query_row("SELECT COUNT(*) FROM files", [], |row| row.get(0))?;
    Ok(count)
}
