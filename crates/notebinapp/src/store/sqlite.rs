//! SQLite-backed storage.
//!
//! Ids are stored as hyphenated text and timestamps as fixed-width RFC 3339
//! text (nanosecond precision, `Z` suffix), so `ORDER BY created_at` sorts
//! chronologically.

use super::{EntryOrder, EntryQuery, ParentFilter, StorageBackend};
use crate::error::Result;
use crate::model::{Block, Entry, EntryKind, OwnerId};
use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::types::{Type, Value};
use rusqlite::{params, params_from_iter, Connection, OptionalExtension, Row};
use std::fs;
use std::path::Path;
use std::time::Duration;
use tracing::debug;
use uuid::Uuid;

const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS entries (
    id          TEXT PRIMARY KEY,
    owner_id    TEXT NOT NULL,
    kind        TEXT NOT NULL CHECK (kind IN ('page', 'folder')),
    title       TEXT NOT NULL,
    description TEXT NOT NULL DEFAULT '',
    parent_id   TEXT,
    in_trash    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_entries_owner_trash ON entries (owner_id, in_trash);
CREATE INDEX IF NOT EXISTS idx_entries_parent ON entries (parent_id);

CREATE TABLE IF NOT EXISTS blocks (
    id          TEXT PRIMARY KEY,
    page_id     TEXT NOT NULL,
    block_type  TEXT NOT NULL,
    content     TEXT NOT NULL,
    position    INTEGER NOT NULL,
    in_trash    INTEGER NOT NULL DEFAULT 0,
    created_at  TEXT NOT NULL,
    updated_at  TEXT NOT NULL
);
CREATE INDEX IF NOT EXISTS idx_blocks_page ON blocks (page_id);
";

const ENTRY_COLUMNS: &str =
    "id, owner_id, kind, title, description, parent_id, in_trash, created_at, updated_at";

const BLOCK_COLUMNS: &str =
    "id, page_id, block_type, content, position, in_trash, created_at, updated_at";

/// How long a writer waits on another connection's lock before failing with
/// `database is locked`.
pub const BUSY_TIMEOUT: Duration = Duration::from_secs(5);

pub struct SqliteBackend {
    conn: Connection,
}

impl SqliteBackend {
    /// Opens or creates a database file, creating parent directories as needed.
    pub fn open(path: &Path) -> Result<Self> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        debug!(path = %path.display(), "opening sqlite store");
        Self::with_connection(Connection::open(path)?)
    }

    pub fn open_in_memory() -> Result<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> Result<Self> {
        conn.busy_timeout(BUSY_TIMEOUT)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Overrides [`BUSY_TIMEOUT`] for this connection.
    pub fn set_busy_timeout(&self, timeout: Duration) -> Result<()> {
        self.conn.busy_timeout(timeout)?;
        Ok(())
    }
}

fn ts(at: &DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Nanos, true)
}

fn conversion_error(
    idx: usize,
    err: impl std::error::Error + Send + Sync + 'static,
) -> rusqlite::Error {
    rusqlite::Error::FromSqlConversionFailure(idx, Type::Text, Box::new(err))
}

fn uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(idx)?;
    Uuid::parse_str(&raw).map_err(|e| conversion_error(idx, e))
}

fn opt_uuid_at(row: &Row, idx: usize) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(idx)?;
    raw.map(|s| Uuid::parse_str(&s).map_err(|e| conversion_error(idx, e)))
        .transpose()
}

fn time_at(row: &Row, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| conversion_error(idx, e))
}

fn kind_at(row: &Row, idx: usize) -> rusqlite::Result<EntryKind> {
    let raw: String = row.get(idx)?;
    match raw.as_str() {
        "page" => Ok(EntryKind::Page),
        "folder" => Ok(EntryKind::Folder),
        _ => Err(rusqlite::Error::InvalidColumnType(
            idx,
            "kind".to_string(),
            Type::Text,
        )),
    }
}

fn entry_from_row(row: &Row) -> rusqlite::Result<Entry> {
    Ok(Entry {
        id: uuid_at(row, 0)?,
        owner_id: OwnerId::new(row.get::<_, String>(1)?),
        kind: kind_at(row, 2)?,
        title: row.get(3)?,
        description: row.get(4)?,
        parent_id: opt_uuid_at(row, 5)?,
        in_trash: row.get(6)?,
        created_at: time_at(row, 7)?,
        updated_at: time_at(row, 8)?,
    })
}

fn block_from_row(row: &Row) -> rusqlite::Result<Block> {
    Ok(Block {
        id: uuid_at(row, 0)?,
        page_id: uuid_at(row, 1)?,
        block_type: row.get(2)?,
        content: row.get(3)?,
        position: row.get(4)?,
        in_trash: row.get(5)?,
        created_at: time_at(row, 6)?,
        updated_at: time_at(row, 7)?,
    })
}

/// Builds the WHERE/ORDER BY tail and its positional values for an entry query.
fn entry_query_sql(owner: &OwnerId, query: &EntryQuery) -> (String, Vec<Value>) {
    let mut clauses = vec!["owner_id = ?".to_string()];
    let mut values = vec![Value::Text(owner.as_str().to_string())];

    if let Some(kind) = query.kind {
        clauses.push("kind = ?".to_string());
        values.push(Value::Text(kind.as_str().to_string()));
    }
    if let Some(in_trash) = query.in_trash {
        clauses.push("in_trash = ?".to_string());
        values.push(Value::Integer(i64::from(in_trash)));
    }
    match query.parent {
        ParentFilter::Any => {}
        ParentFilter::Root => clauses.push("parent_id IS NULL".to_string()),
        ParentFilter::Of(parent) => {
            clauses.push("parent_id = ?".to_string());
            values.push(Value::Text(parent.to_string()));
        }
    }

    let order = match query.order {
        EntryOrder::CreatedAsc => "created_at ASC",
        EntryOrder::CreatedDesc => "created_at DESC",
        EntryOrder::UpdatedDesc => "updated_at DESC",
    };

    (
        format!("WHERE {} ORDER BY {}", clauses.join(" AND "), order),
        values,
    )
}

impl StorageBackend for SqliteBackend {
    fn insert_entry(&self, entry: &Entry) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO entries ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
                ENTRY_COLUMNS
            ),
            params![
                entry.id.to_string(),
                entry.owner_id.as_str(),
                entry.kind.as_str(),
                entry.title,
                entry.description,
                entry.parent_id.map(|p| p.to_string()),
                entry.in_trash,
                ts(&entry.created_at),
                ts(&entry.updated_at),
            ],
        )?;
        Ok(())
    }

    fn find_entry(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Entry>> {
        let entry = self
            .conn
            .query_row(
                &format!(
                    "SELECT {} FROM entries WHERE id = ?1 AND owner_id = ?2",
                    ENTRY_COLUMNS
                ),
                params![id.to_string(), owner.as_str()],
                entry_from_row,
            )
            .optional()?;
        Ok(entry)
    }

    fn update_entry(&self, entry: &Entry) -> Result<usize> {
        let affected = self.conn.execute(
            "UPDATE entries
                SET title = ?1, description = ?2, parent_id = ?3, in_trash = ?4, updated_at = ?5
              WHERE id = ?6 AND owner_id = ?7",
            params![
                entry.title,
                entry.description,
                entry.parent_id.map(|p| p.to_string()),
                entry.in_trash,
                ts(&entry.updated_at),
                entry.id.to_string(),
                entry.owner_id.as_str(),
            ],
        )?;
        Ok(affected)
    }

    fn delete_entry(&self, owner: &OwnerId, id: &Uuid) -> Result<usize> {
        let affected = self.conn.execute(
            "DELETE FROM entries WHERE id = ?1 AND owner_id = ?2",
            params![id.to_string(), owner.as_str()],
        )?;
        Ok(affected)
    }

    fn select_entries(&self, owner: &OwnerId, query: &EntryQuery) -> Result<Vec<Entry>> {
        let (tail, values) = entry_query_sql(owner, query);
        let mut stmt = self
            .conn
            .prepare(&format!("SELECT {} FROM entries {}", ENTRY_COLUMNS, tail))?;
        let entries = stmt
            .query_map(params_from_iter(values.iter()), entry_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(entries)
    }

    fn insert_block(&self, block: &Block) -> Result<()> {
        self.conn.execute(
            &format!(
                "INSERT INTO blocks ({}) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
                BLOCK_COLUMNS
            ),
            params![
                block.id.to_string(),
                block.page_id.to_string(),
                block.block_type,
                block.content,
                block.position,
                block.in_trash,
                ts(&block.created_at),
                ts(&block.updated_at),
            ],
        )?;
        Ok(())
    }

    fn find_block(&self, id: &Uuid) -> Result<Option<Block>> {
        let block = self
            .conn
            .query_row(
                &format!("SELECT {} FROM blocks WHERE id = ?1", BLOCK_COLUMNS),
                params![id.to_string()],
                block_from_row,
            )
            .optional()?;
        Ok(block)
    }

    fn update_block(&self, block: &Block) -> Result<usize> {
        let affected = self.conn.execute(
            "UPDATE blocks
                SET block_type = ?1, content = ?2, position = ?3, in_trash = ?4, updated_at = ?5
              WHERE id = ?6",
            params![
                block.block_type,
                block.content,
                block.position,
                block.in_trash,
                ts(&block.updated_at),
                block.id.to_string(),
            ],
        )?;
        Ok(affected)
    }

    fn select_blocks(&self, page_id: &Uuid, in_trash: Option<bool>) -> Result<Vec<Block>> {
        let mut sql = format!("SELECT {} FROM blocks WHERE page_id = ?", BLOCK_COLUMNS);
        let mut values = vec![Value::Text(page_id.to_string())];
        if let Some(flag) = in_trash {
            sql.push_str(" AND in_trash = ?");
            values.push(Value::Integer(i64::from(flag)));
        }
        sql.push_str(" ORDER BY position ASC, created_at ASC");

        let mut stmt = self.conn.prepare(&sql)?;
        let blocks = stmt
            .query_map(params_from_iter(values.iter()), block_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(blocks)
    }

    fn set_blocks_trashed(
        &self,
        page_id: &Uuid,
        in_trash: bool,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        let affected = self.conn.execute(
            "UPDATE blocks SET in_trash = ?1, updated_at = ?2 WHERE page_id = ?3",
            params![in_trash, ts(&at), page_id.to_string()],
        )?;
        Ok(affected)
    }

    fn delete_blocks(&self, page_id: &Uuid) -> Result<usize> {
        let affected = self.conn.execute(
            "DELETE FROM blocks WHERE page_id = ?1",
            params![page_id.to_string()],
        )?;
        Ok(affected)
    }

    fn begin(&self) -> Result<()> {
        self.conn.execute_batch("BEGIN IMMEDIATE")?;
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        self.conn.execute_batch("COMMIT")?;
        Ok(())
    }

    fn rollback(&self) -> Result<()> {
        self.conn.execute_batch("ROLLBACK")?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::atomically;
    use chrono::Duration;

    fn owner() -> OwnerId {
        OwnerId::new("owner-a")
    }

    fn store() -> SqliteBackend {
        SqliteBackend::open_in_memory().unwrap()
    }

    #[test]
    fn entry_round_trips_through_columns() {
        let store = store();
        let folder = Entry::folder(owner(), "Work");
        let page = Entry::page(owner(), "Spec", "body").with_parent(Some(folder.id));
        store.insert_entry(&folder).unwrap();
        store.insert_entry(&page).unwrap();

        let loaded = store.find_entry(&owner(), &page.id).unwrap().unwrap();
        assert_eq!(loaded, page);
    }

    #[test]
    fn find_is_owner_scoped() {
        let store = store();
        let page = Entry::page(owner(), "Mine", "");
        store.insert_entry(&page).unwrap();
        assert!(store
            .find_entry(&OwnerId::new("owner-b"), &page.id)
            .unwrap()
            .is_none());
    }

    #[test]
    fn select_filters_and_orders() {
        let store = store();
        let base = Utc::now();
        let mut older = Entry::page(owner(), "Older", "");
        older.created_at = base - Duration::minutes(5);
        let mut newer = Entry::page(owner(), "Newer", "");
        newer.created_at = base;
        let mut trashed = Entry::page(owner(), "Gone", "");
        trashed.in_trash = true;
        for e in [&newer, &older, &trashed] {
            store.insert_entry(e).unwrap();
        }

        let active = store
            .select_entries(&owner(), &EntryQuery::new().in_trash(false))
            .unwrap();
        let titles: Vec<_> = active.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Older", "Newer"]);

        let desc = store
            .select_entries(
                &owner(),
                &EntryQuery::new()
                    .in_trash(false)
                    .order(EntryOrder::CreatedDesc),
            )
            .unwrap();
        assert_eq!(desc[0].title, "Newer");
    }

    #[test]
    fn parent_filters() {
        let store = store();
        let folder = Entry::folder(owner(), "F");
        let child = Entry::page(owner(), "Child", "").with_parent(Some(folder.id));
        store.insert_entry(&folder).unwrap();
        store.insert_entry(&child).unwrap();

        let children = store
            .select_entries(&owner(), &EntryQuery::new().parent(folder.id))
            .unwrap();
        assert_eq!(children.len(), 1);
        assert_eq!(children[0].id, child.id);

        let roots = store
            .select_entries(&owner(), &EntryQuery::new().roots())
            .unwrap();
        assert_eq!(roots.len(), 1);
        assert_eq!(roots[0].id, folder.id);
    }

    #[test]
    fn block_trash_flags_follow_page() {
        let store = store();
        let page = Uuid::new_v4();
        store.insert_block(&Block::new(page, "text", "a", 0)).unwrap();
        store.insert_block(&Block::new(page, "text", "b", 1)).unwrap();

        assert_eq!(store.set_blocks_trashed(&page, true, Utc::now()).unwrap(), 2);
        assert!(store.select_blocks(&page, Some(false)).unwrap().is_empty());
        assert_eq!(store.select_blocks(&page, Some(true)).unwrap().len(), 2);
        assert_eq!(store.delete_blocks(&page).unwrap(), 2);
    }

    #[test]
    fn transaction_rolls_back() {
        let store = store();
        let page = Entry::page(owner(), "Temp", "");
        let result: Result<()> = atomically(&store, |s| {
            s.insert_entry(&page)?;
            Err(crate::error::NotebinError::Validation("abort".into()))
        });
        assert!(result.is_err());
        assert!(store.find_entry(&owner(), &page.id).unwrap().is_none());
    }

    #[test]
    fn opens_file_database_creating_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("notebin.db");
        let page = Entry::page(owner(), "Persisted", "");
        {
            let store = SqliteBackend::open(&path).unwrap();
            store.insert_entry(&page).unwrap();
        }
        let reopened = SqliteBackend::open(&path).unwrap();
        assert!(reopened.find_entry(&owner(), &page.id).unwrap().is_some());
    }
}
