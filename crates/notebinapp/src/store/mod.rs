//! # Storage Layer
//!
//! This module defines the storage abstraction for notebin. The
//! [`StorageBackend`] trait handles the "how" of persistence (SQLite or
//! memory); the command layer handles the "what" (ownership, trash rules,
//! cascades).
//!
//! ## Tables
//!
//! ```text
//! entries  id | owner_id | kind | title | description | parent_id | in_trash | created_at | updated_at
//! blocks   id | page_id  | block_type | content | position | in_trash | created_at | updated_at
//! ```
//!
//! Entry operations always take the owner id, so a backend can never be
//! asked for a row without an ownership filter. Blocks carry no owner: the
//! command layer reaches them through an owned page.
//!
//! ## Units of Work
//!
//! Lifecycle transitions touch several rows (a page and its blocks, a folder
//! and its trashed children). [`atomically`] wraps such a sequence in
//! `begin`/`commit`, rolling back when any step fails, so callers never see a
//! half-applied cascade.
//!
//! ## Implementations
//!
//! - [`sqlite::SqliteBackend`]: production backend on a SQLite file (or in memory).
//! - [`mem_backend::MemBackend`]: maps in memory with snapshot rollback and
//!   write-failure injection, for testing logic without SQL.

use chrono::{DateTime, Utc};
use tracing::warn;
use uuid::Uuid;

use crate::error::Result;
use crate::model::{Block, Entry, EntryKind, OwnerId};

pub mod mem_backend;
pub mod sqlite;

/// Parent filter for entry selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ParentFilter {
    #[default]
    Any,
    Root,
    Of(Uuid),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryOrder {
    #[default]
    CreatedAsc,
    CreatedDesc,
    UpdatedDesc,
}

/// Filter + ordering for [`StorageBackend::select_entries`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct EntryQuery {
    pub kind: Option<EntryKind>,
    pub in_trash: Option<bool>,
    pub parent: ParentFilter,
    pub order: EntryOrder,
}

impl EntryQuery {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn kind(mut self, kind: EntryKind) -> Self {
        self.kind = Some(kind);
        self
    }

    pub fn in_trash(mut self, in_trash: bool) -> Self {
        self.in_trash = Some(in_trash);
        self
    }

    pub fn parent(mut self, parent_id: Uuid) -> Self {
        self.parent = ParentFilter::Of(parent_id);
        self
    }

    pub fn roots(mut self) -> Self {
        self.parent = ParentFilter::Root;
        self
    }

    pub fn order(mut self, order: EntryOrder) -> Self {
        self.order = order;
        self
    }

    /// In-memory evaluation of the filter part of the query.
    pub fn matches(&self, entry: &Entry) -> bool {
        if let Some(kind) = self.kind {
            if entry.kind != kind {
                return false;
            }
        }
        if let Some(in_trash) = self.in_trash {
            if entry.in_trash != in_trash {
                return false;
            }
        }
        match self.parent {
            ParentFilter::Any => true,
            ParentFilter::Root => entry.parent_id.is_none(),
            ParentFilter::Of(parent) => entry.parent_id == Some(parent),
        }
    }

    /// In-memory evaluation of the ordering part of the query.
    pub fn sort(&self, entries: &mut [Entry]) {
        match self.order {
            EntryOrder::CreatedAsc => entries.sort_by(|a, b| a.created_at.cmp(&b.created_at)),
            EntryOrder::CreatedDesc => entries.sort_by(|a, b| b.created_at.cmp(&a.created_at)),
            EntryOrder::UpdatedDesc => entries.sort_by(|a, b| b.updated_at.cmp(&a.updated_at)),
        }
    }
}

/// Abstract interface for table-scoped storage I/O.
///
/// Methods take `&self`; backends use interior mutability the way a database
/// connection handle does.
pub trait StorageBackend {
    // --- Entries ---

    fn insert_entry(&self, entry: &Entry) -> Result<()>;

    /// Fetch an entry by id, filtered by owner. Returns Ok(None) when no row matches.
    fn find_entry(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Entry>>;

    /// Overwrite the mutable columns of the row matching `entry.owner_id` and `entry.id`.
    /// Returns the number of rows affected.
    fn update_entry(&self, entry: &Entry) -> Result<usize>;

    /// Remove the row matching owner and id. Returns the number of rows affected.
    fn delete_entry(&self, owner: &OwnerId, id: &Uuid) -> Result<usize>;

    fn select_entries(&self, owner: &OwnerId, query: &EntryQuery) -> Result<Vec<Entry>>;

    // --- Blocks ---

    fn insert_block(&self, block: &Block) -> Result<()>;

    fn find_block(&self, id: &Uuid) -> Result<Option<Block>>;

    fn update_block(&self, block: &Block) -> Result<usize>;

    /// Blocks of a page ordered by position, optionally filtered by trash flag.
    fn select_blocks(&self, page_id: &Uuid, in_trash: Option<bool>) -> Result<Vec<Block>>;

    /// Set the trash flag (and `updated_at`) on every block of a page.
    fn set_blocks_trashed(&self, page_id: &Uuid, in_trash: bool, at: DateTime<Utc>)
        -> Result<usize>;

    fn delete_blocks(&self, page_id: &Uuid) -> Result<usize>;

    // --- Transactions ---

    fn begin(&self) -> Result<()>;

    fn commit(&self) -> Result<()>;

    fn rollback(&self) -> Result<()>;
}

/// An open transaction on a backend.
///
/// Rolls back on drop unless [`UnitOfWork::commit`] succeeded, so a failed
/// `COMMIT` never leaves the transaction open on the connection.
pub struct UnitOfWork<'a, B: StorageBackend + ?Sized> {
    backend: &'a B,
    finished: bool,
}

impl<'a, B: StorageBackend + ?Sized> UnitOfWork<'a, B> {
    pub fn begin(backend: &'a B) -> Result<Self> {
        backend.begin()?;
        Ok(Self {
            backend,
            finished: false,
        })
    }

    pub fn commit(mut self) -> Result<()> {
        self.backend.commit()?;
        self.finished = true;
        Ok(())
    }
}

impl<B: StorageBackend + ?Sized> Drop for UnitOfWork<'_, B> {
    fn drop(&mut self) {
        if !self.finished {
            if let Err(err) = self.backend.rollback() {
                warn!(error = %err, "rollback failed");
            }
        }
    }
}

/// Runs `work` inside a single transaction on `backend`.
///
/// Commits when `work` succeeds. If `work` or the commit itself fails, the
/// transaction is rolled back and the error is returned.
pub fn atomically<B, T, F>(backend: &B, work: F) -> Result<T>
where
    B: StorageBackend + ?Sized,
    F: FnOnce(&B) -> Result<T>,
{
    let unit = UnitOfWork::begin(backend)?;
    let value = work(backend)?;
    unit.commit()?;
    Ok(value)
}
