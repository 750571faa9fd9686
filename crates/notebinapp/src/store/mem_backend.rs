use super::{EntryQuery, StorageBackend};
use crate::error::{NotebinError, Result};
use crate::model::{Block, Entry, OwnerId};
use chrono::{DateTime, Utc};
use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use uuid::Uuid;

#[derive(Clone, Default)]
struct Tables {
    entries: HashMap<Uuid, Entry>,
    blocks: HashMap<Uuid, Block>,
}

/// In-memory storage backend for testing.
///
/// Uses `RefCell` for interior mutability since a backend handle is used from
/// one thread at a time. `begin` takes a snapshot of both tables and
/// `rollback` puts it back.
#[derive(Default)]
pub struct MemBackend {
    tables: RefCell<Tables>,
    snapshot: RefCell<Option<Tables>>,
    simulate_write_error: Cell<bool>,
    writes_before_failure: Cell<Option<usize>>,
    fail_next_commit: Cell<bool>,
}

impl MemBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable write error simulation for testing error handling.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn set_simulate_write_error(&self, simulate: bool) {
        self.simulate_write_error.set(simulate);
    }

    /// Let the next `writes` mutating calls succeed, then fail every write after
    /// them. Used to break a cascade halfway through.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn fail_after_writes(&self, writes: usize) {
        self.writes_before_failure.set(Some(writes));
    }

    /// Make the next `commit` fail while leaving the transaction open, the way
    /// a busy SQLite `COMMIT` does.
    #[cfg(any(test, feature = "test_utils"))]
    pub fn fail_next_commit(&self) {
        self.fail_next_commit.set(true);
    }

    /// Number of stored entries across all owners, trashed or not.
    pub fn entry_count(&self) -> usize {
        self.tables.borrow().entries.len()
    }

    pub fn block_count(&self) -> usize {
        self.tables.borrow().blocks.len()
    }

    fn check_write(&self) -> Result<()> {
        if self.simulate_write_error.get() {
            return Err(NotebinError::Storage("Simulated write error".to_string()));
        }
        if let Some(remaining) = self.writes_before_failure.get() {
            if remaining == 0 {
                return Err(NotebinError::Storage("Simulated write error".to_string()));
            }
            self.writes_before_failure.set(Some(remaining - 1));
        }
        Ok(())
    }
}

impl StorageBackend for MemBackend {
    fn insert_entry(&self, entry: &Entry) -> Result<()> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        if tables.entries.contains_key(&entry.id) {
            return Err(NotebinError::Storage(format!(
                "duplicate entry id {}",
                entry.id
            )));
        }
        tables.entries.insert(entry.id, entry.clone());
        Ok(())
    }

    fn find_entry(&self, owner: &OwnerId, id: &Uuid) -> Result<Option<Entry>> {
        let tables = self.tables.borrow();
        Ok(tables
            .entries
            .get(id)
            .filter(|e| &e.owner_id == owner)
            .cloned())
    }

    fn update_entry(&self, entry: &Entry) -> Result<usize> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        match tables.entries.get_mut(&entry.id) {
            Some(stored) if stored.owner_id == entry.owner_id => {
                // owner_id, kind and created_at are immutable columns
                stored.title = entry.title.clone();
                stored.description = entry.description.clone();
                stored.parent_id = entry.parent_id;
                stored.in_trash = entry.in_trash;
                stored.updated_at = entry.updated_at;
                Ok(1)
            }
            _ => Ok(0),
        }
    }

    fn delete_entry(&self, owner: &OwnerId, id: &Uuid) -> Result<usize> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let owned = tables
            .entries
            .get(id)
            .is_some_and(|e| &e.owner_id == owner);
        if owned {
            tables.entries.remove(id);
            Ok(1)
        } else {
            Ok(0)
        }
    }

    fn select_entries(&self, owner: &OwnerId, query: &EntryQuery) -> Result<Vec<Entry>> {
        let tables = self.tables.borrow();
        let mut entries: Vec<Entry> = tables
            .entries
            .values()
            .filter(|e| &e.owner_id == owner && query.matches(e))
            .cloned()
            .collect();
        query.sort(&mut entries);
        Ok(entries)
    }

    fn insert_block(&self, block: &Block) -> Result<()> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        tables.blocks.insert(block.id, block.clone());
        Ok(())
    }

    fn find_block(&self, id: &Uuid) -> Result<Option<Block>> {
        Ok(self.tables.borrow().blocks.get(id).cloned())
    }

    fn update_block(&self, block: &Block) -> Result<usize> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        match tables.blocks.get_mut(&block.id) {
            Some(stored) => {
                stored.block_type = block.block_type.clone();
                stored.content = block.content.clone();
                stored.position = block.position;
                stored.in_trash = block.in_trash;
                stored.updated_at = block.updated_at;
                Ok(1)
            }
            None => Ok(0),
        }
    }

    fn select_blocks(&self, page_id: &Uuid, in_trash: Option<bool>) -> Result<Vec<Block>> {
        let tables = self.tables.borrow();
        let mut blocks: Vec<Block> = tables
            .blocks
            .values()
            .filter(|b| &b.page_id == page_id && in_trash.map_or(true, |flag| b.in_trash == flag))
            .cloned()
            .collect();
        blocks.sort_by(|a, b| {
            a.position
                .cmp(&b.position)
                .then(a.created_at.cmp(&b.created_at))
        });
        Ok(blocks)
    }

    fn set_blocks_trashed(
        &self,
        page_id: &Uuid,
        in_trash: bool,
        at: DateTime<Utc>,
    ) -> Result<usize> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let mut affected = 0;
        for block in tables.blocks.values_mut().filter(|b| &b.page_id == page_id) {
            block.in_trash = in_trash;
            block.updated_at = at;
            affected += 1;
        }
        Ok(affected)
    }

    fn delete_blocks(&self, page_id: &Uuid) -> Result<usize> {
        self.check_write()?;
        let mut tables = self.tables.borrow_mut();
        let before = tables.blocks.len();
        tables.blocks.retain(|_, b| &b.page_id != page_id);
        Ok(before - tables.blocks.len())
    }

    fn begin(&self) -> Result<()> {
        let mut snapshot = self.snapshot.borrow_mut();
        if snapshot.is_some() {
            return Err(NotebinError::Storage(
                "transaction already in progress".to_string(),
            ));
        }
        *snapshot = Some(self.tables.borrow().clone());
        Ok(())
    }

    fn commit(&self) -> Result<()> {
        if self.fail_next_commit.replace(false) {
            return Err(NotebinError::Storage("Simulated commit error".to_string()));
        }
        match self.snapshot.borrow_mut().take() {
            Some(_) => Ok(()),
            None => Err(NotebinError::Storage(
                "commit without transaction".to_string(),
            )),
        }
    }

    fn rollback(&self) -> Result<()> {
        match self.snapshot.borrow_mut().take() {
            Some(saved) => {
                *self.tables.borrow_mut() = saved;
                Ok(())
            }
            None => Err(NotebinError::Storage(
                "rollback without transaction".to_string(),
            )),
        }
    }
}
