//! Permanent deletion.
//!
//! Only trashed entries can be purged. Purging a page removes its blocks first.
//! Purging a folder first purges every child that is *already trashed* (pages and
//! folders alike, recursively), then the folder row.
//!
//! Children that are still active are left where they are, with a `parent_id`
//! that no longer resolves. Tree views show them as roots.

use crate::error::{NotebinError, Result};
use crate::model::{Entry, EntryKind, OwnerId, Visibility};
use crate::store::{atomically, EntryQuery, StorageBackend};
use std::collections::HashSet;
use tracing::info;
use uuid::Uuid;

use super::helpers::load_owned;
use super::PurgeOutcome;

/// Permanently deletes one trashed entry (with its cascade) in a single transaction.
pub fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    kind: EntryKind,
) -> Result<PurgeOutcome> {
    let outcome = atomically(store, |store| {
        let entry = load_owned(store, owner, id, Some(kind), Visibility::Trashed)?;
        let mut outcome = PurgeOutcome::default();
        let mut visited = HashSet::new();
        purge_entry(store, owner, &entry, &mut visited, &mut outcome)?;
        Ok(outcome)
    })?;

    info!(
        %id,
        %kind,
        entries_deleted = outcome.entries_deleted,
        blocks_deleted = outcome.blocks_deleted,
        "entry purged"
    );
    Ok(outcome)
}

/// Deletes every trashed entry the owner has: blocks of trashed pages, then the
/// trashed pages, then the trashed folders. Active entries are never touched.
pub fn empty_trash<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
) -> Result<PurgeOutcome> {
    let outcome = atomically(store, |store| {
        let mut outcome = PurgeOutcome::default();

        let pages = store.select_entries(
            owner,
            &EntryQuery::new().kind(EntryKind::Page).in_trash(true),
        )?;
        for page in &pages {
            outcome.blocks_deleted += store.delete_blocks(&page.id)?;
        }
        for page in &pages {
            outcome.entries_deleted += store.delete_entry(owner, &page.id)?;
        }

        let folders = store.select_entries(
            owner,
            &EntryQuery::new().kind(EntryKind::Folder).in_trash(true),
        )?;
        for folder in &folders {
            outcome.entries_deleted += store.delete_entry(owner, &folder.id)?;
        }

        Ok(outcome)
    })?;

    info!(
        %owner,
        entries_deleted = outcome.entries_deleted,
        blocks_deleted = outcome.blocks_deleted,
        "trash emptied"
    );
    Ok(outcome)
}

fn purge_entry<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    entry: &Entry,
    visited: &mut HashSet<Uuid>,
    outcome: &mut PurgeOutcome,
) -> Result<()> {
    // a parent chain that loops back would otherwise recurse forever
    if !visited.insert(entry.id) {
        return Ok(());
    }

    match entry.kind {
        EntryKind::Page => {
            outcome.blocks_deleted += store.delete_blocks(&entry.id)?;
        }
        EntryKind::Folder => {
            let children = store.select_entries(
                owner,
                &EntryQuery::new().in_trash(true).parent(entry.id),
            )?;
            for child in &children {
                purge_entry(store, owner, child, visited, outcome)?;
            }
        }
    }

    if store.delete_entry(owner, &entry.id)? == 0 {
        return Err(NotebinError::NotFoundOrUnauthorized);
    }
    outcome.entries_deleted += 1;
    Ok(())
}
