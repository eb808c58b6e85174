// Local media enumeration
//
// Reads item references straight from a media index (MediaStore on Android, a
// SQLite copy of its `files` table elsewhere), newest first, without any
// interactive picker.

use crate::models::{ItemReference, MediaKind, VisualMediaType};
use crate::picker::PickerError;
use rusqlite::{Connection, OpenFlags};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};

pub const COLUMN_ID: &str = "_id";
pub const COLUMN_MEDIA_TYPE: &str = "media_type";
pub const COLUMN_DATE_ADDED: &str = "date_added";

/// One row of the index query
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MediaRow {
    pub id: i64,
    pub media_type: i64,
}

impl MediaRow {
    /// Namespaces the row id by the row's own kind, not by the filter
    pub fn to_reference(self) -> ItemReference {
        let kind = if self.media_type == MediaKind::Image.code() {
            MediaKind::Image
        } else {
            MediaKind::Video
        };
        ItemReference::with_appended_id(kind.collection_uri(), self.id)
    }
}

/// `media_type = ? OR media_type = ?` plus its arguments
pub fn selection_for(filter: VisualMediaType) -> (String, Vec<String>) {
    let kinds = filter.media_kinds();
    let selection = kinds
        .iter()
        .map(|_| format!("{} = ?", COLUMN_MEDIA_TYPE))
        .collect::<Vec<_>>()
        .join(" OR ");
    let args = kinds.iter().map(|k| k.code().to_string()).collect();
    (selection, args)
}

pub fn sort_order() -> String {
    format!("{} DESC", COLUMN_DATE_ADDED)
}

/// Open result set of an index query. Dropping it releases the underlying
/// cursor.
pub trait MediaCursor: Send {
    fn next_row(&mut self) -> Option<MediaRow>;
}

/// Read-only media index
pub trait MediaIndex: Send + Sync {
    /// Runs the single sorted, filtered query. Fails with
    /// [`PickerError::QueryFailure`] when the index cannot be opened or queried.
    fn query(&self, filter: VisualMediaType) -> Result<Box<dyn MediaCursor>, PickerError>;
}

/// Lazy, finite, non-restartable sequence of references
pub struct LocalMedia {
    cursor: Box<dyn MediaCursor>,
}

impl Iterator for LocalMedia {
    type Item = ItemReference;

    fn next(&mut self) -> Option<Self::Item> {
        self.cursor.next_row().map(MediaRow::to_reference)
    }
}

/// Enumerates local media without going through a picker
#[derive(Clone)]
pub struct LocalEnumerator {
    index: Arc<dyn MediaIndex>,
}

impl LocalEnumerator {
    pub fn new(index: Arc<dyn MediaIndex>) -> Self {
        Self { index }
    }

    /// Blocking; call it off latency-sensitive threads or use
    /// [`LocalEnumerator::enumerate_async`]. Each call re-issues the query.
    pub fn enumerate(&self, filter: VisualMediaType) -> Result<LocalMedia, PickerError> {
        log::debug!("Enumerating local media for {:?}", filter);
        let cursor = self.index.query(filter)?;
        Ok(LocalMedia { cursor })
    }

    /// Runs the enumeration on the blocking thread pool and collects it
    pub async fn enumerate_async(
        &self,
        filter: VisualMediaType,
    ) -> Result<Vec<ItemReference>, PickerError> {
        let this = self.clone();
        tokio::task::spawn_blocking(move || this.enumerate(filter).map(|media| media.collect()))
            .await
            .map_err(|e| PickerError::Other(format!("Enumeration task failed: {}", e)))?
    }
}

enum IndexSource {
    Path(PathBuf),
    Connection(Mutex<Connection>),
}

/// Media index backed by a SQLite database with a MediaStore-shaped `files`
/// table (see [`crate::schema`]).
pub struct SqliteMediaIndex {
    source: IndexSource,
}

impl SqliteMediaIndex {
    /// Opens the database read-only on every query
    pub fn open(path: impl Into<PathBuf>) -> Self {
        Self {
            source: IndexSource::Path(path.into()),
        }
    }

    pub fn with_connection(conn: Connection) -> Self {
        Self {
            source: IndexSource::Connection(Mutex::new(conn)),
        }
    }

    fn read_rows(conn: &Connection, filter: VisualMediaType) -> Result<Vec<MediaRow>, PickerError> {
        let (selection, args) = selection_for(filter);
        let sql = format!(
            "SELECT {}, {} FROM files WHERE {} ORDER BY {}",
            COLUMN_ID,
            COLUMN_MEDIA_TYPE,
            selection,
            sort_order()
        );

        let mut stmt = conn.prepare(&sql)?;
        let rows = stmt
            .query_map(rusqlite::params_from_iter(args.iter()), |row| {
                Ok(MediaRow {
                    id: row.get(0)?,
                    media_type: row.get(1)?,
                })
            })?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(rows)
    }
}

impl MediaIndex for SqliteMediaIndex {
    fn query(&self, filter: VisualMediaType) -> Result<Box<dyn MediaCursor>, PickerError> {
        // The statement is finalized before returning, so rows are buffered
        let rows = match &self.source {
            IndexSource::Path(path) => {
                let conn = Connection::open_with_flags(path, OpenFlags::SQLITE_OPEN_READ_ONLY)
                    .map_err(|e| {
                        PickerError::QueryFailure(format!(
                            "Could not open media index {}: {}",
                            path.display(),
                            e
                        ))
                    })?;
                Self::read_rows(&conn, filter)?
            }
            IndexSource::Connection(conn) => {
                let conn = conn
                    .lock()
                    .map_err(|_| PickerError::QueryFailure("Media index lock poisoned".to_string()))?;
                Self::read_rows(&conn, filter)?
            }
        };
        log::debug!("Media index returned {} rows", rows.len());
        Ok(Box::new(BufferedCursor {
            rows: rows.into_iter(),
        }))
    }
}

struct BufferedCursor {
    rows: std::vec::IntoIter<MediaRow>,
}

impl MediaCursor for BufferedCursor {
    fn next_row(&mut self) -> Option<MediaRow> {
        self.rows.next()
    }
}

/// MediaStore accessed through `ContentResolver.query`
#[cfg(target_os = "android")]
#[derive(Debug, Clone, Copy, Default)]
pub struct AndroidMediaIndex;

#[cfg(target_os = "android")]
impl MediaIndex for AndroidMediaIndex {
    fn query(&self, filter: VisualMediaType) -> Result<Box<dyn MediaCursor>, PickerError> {
        use crate::picker::android;
        use jni::objects::{JObject, JValue};

        let (selection, args) = selection_for(filter);

        android::with_env(|env| {
            let context = android::app_context();
            let resolver = env
                .call_method(
                    &context,
                    "getContentResolver",
                    "()Landroid/content/ContentResolver;",
                    &[],
                )
                .and_then(|v| v.l())
                .map_err(|e| query_failure(env, "getContentResolver", e))?;

            let volume = JObject::from(
                env.new_string("external")
                    .map_err(|e| query_failure(env, "new_string", e))?,
            );
            let files_uri = env
                .call_static_method(
                    "android/provider/MediaStore$Files",
                    "getContentUri",
                    "(Ljava/lang/String;)Landroid/net/Uri;",
                    &[JValue::Object(&volume)],
                )
                .and_then(|v| v.l())
                .map_err(|e| query_failure(env, "MediaStore.Files.getContentUri", e))?;

            let projection = string_array(env, &[COLUMN_ID, COLUMN_MEDIA_TYPE])?;
            let arg_refs: Vec<&str> = args.iter().map(String::as_str).collect();
            let selection_args = string_array(env, &arg_refs)?;
            let selection = JObject::from(
                env.new_string(&selection)
                    .map_err(|e| query_failure(env, "new_string", e))?,
            );
            let order = JObject::from(
                env.new_string(sort_order())
                    .map_err(|e| query_failure(env, "new_string", e))?,
            );

            let cursor = env
                .call_method(
                    &resolver,
                    "query",
                    "(Landroid/net/Uri;[Ljava/lang/String;Ljava/lang/String;[Ljava/lang/String;Ljava/lang/String;)Landroid/database/Cursor;",
                    &[
                        JValue::Object(&files_uri),
                        JValue::Object(&projection),
                        JValue::Object(&selection),
                        JValue::Object(&selection_args),
                        JValue::Object(&order),
                    ],
                )
                .and_then(|v| v.l())
                .map_err(|e| query_failure(env, "ContentResolver.query", e))?;

            if cursor.is_null() {
                return Err(PickerError::QueryFailure(
                    "Query could not be executed".to_string(),
                ));
            }

            let cursor = env
                .new_global_ref(&cursor)
                .map_err(|e| query_failure(env, "new_global_ref", e))?;
            Ok(Box::new(AndroidCursor { cursor }) as Box<dyn MediaCursor>)
        })
    }
}

/// Clears the pending Java exception and reports the failed call
#[cfg(target_os = "android")]
fn query_failure(env: &mut jni::JNIEnv, what: &str, e: jni::errors::Error) -> PickerError {
    crate::picker::android::clear_exception(env);
    PickerError::QueryFailure(format!("{} failed: {}", what, e))
}

#[cfg(target_os = "android")]
fn string_array<'a>(
    env: &mut jni::JNIEnv<'a>,
    values: &[&str],
) -> Result<jni::objects::JObject<'a>, PickerError> {
    let array = env
        .new_object_array(values.len() as i32, "java/lang/String", jni::objects::JObject::null())
        .map_err(|e| query_failure(env, "new_object_array", e))?;
    for (i, value) in values.iter().enumerate() {
        let s = env
            .new_string(value)
            .map_err(|e| query_failure(env, "new_string", e))?;
        env.set_object_array_element(&array, i as i32, s)
            .map_err(|e| query_failure(env, "set_object_array_element", e))?;
    }
    Ok(array.into())
}

/// Live `android.database.Cursor`; columns follow the projection order
#[cfg(target_os = "android")]
struct AndroidCursor {
    cursor: jni::objects::GlobalRef,
}

#[cfg(target_os = "android")]
impl MediaCursor for AndroidCursor {
    fn next_row(&mut self) -> Option<MediaRow> {
        use jni::objects::JValue;

        let row = crate::picker::android::with_env(|env| {
            let cursor = self.cursor.as_obj();
            let has_next = env
                .call_method(cursor, "moveToNext", "()Z", &[])
                .and_then(|v| v.z())
                .map_err(|e| query_failure(env, "moveToNext", e))?;
            if !has_next {
                return Ok(None);
            }
            let id = env
                .call_method(cursor, "getLong", "(I)J", &[JValue::Int(0)])
                .and_then(|v| v.j())
                .map_err(|e| query_failure(env, "getLong", e))?;
            let media_type = env
                .call_method(cursor, "getInt", "(I)I", &[JValue::Int(1)])
                .and_then(|v| v.i())
                .map_err(|e| query_failure(env, "getInt", e))?;
            Ok(Some(MediaRow {
                id,
                media_type: media_type as i64,
            }))
        });

        row.unwrap_or_else(|e| {
            log::warn!("Stopping media enumeration: {}", e);
            None
        })
    }
}

#[cfg(target_os = "android")]
impl Drop for AndroidCursor {
    fn drop(&mut self) {
        let closed = crate::picker::android::with_env(|env| {
            env.call_method(self.cursor.as_obj(), "close", "()V", &[])
                .map_err(|e| query_failure(env, "Cursor.close", e))?;
            Ok(())
        });
        if let Err(e) = closed {
            log::warn!("{}", e);
        }
    }
}
