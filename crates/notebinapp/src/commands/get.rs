use crate::error::Result;
use crate::model::{Entry, EntryKind, OwnerId, Visibility};
use crate::store::{EntryOrder, EntryQuery, StorageBackend};
use uuid::Uuid;

use super::helpers::load_owned;

/// Fetches one entry the caller owns, in the requested trash state.
pub fn by_id<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    visibility: Visibility,
) -> Result<Entry> {
    load_owned(store, owner, id, None, visibility)
}

/// Active entries of one kind.
///
/// Pages come oldest first, folders newest first; the two list views have always
/// sorted differently and callers rely on it.
pub fn active<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    kind: EntryKind,
) -> Result<Vec<Entry>> {
    let order = match kind {
        EntryKind::Page => EntryOrder::CreatedAsc,
        EntryKind::Folder => EntryOrder::CreatedDesc,
    };
    store.select_entries(
        owner,
        &EntryQuery::new().kind(kind).in_trash(false).order(order),
    )
}

/// Every active entry regardless of kind, oldest first. Input for tree building.
pub fn all_active<B: StorageBackend + ?Sized>(store: &B, owner: &OwnerId) -> Result<Vec<Entry>> {
    store.select_entries(owner, &EntryQuery::new().in_trash(false))
}

/// Trashed entries of both kinds, most recently trashed first.
pub fn trashed<B: StorageBackend + ?Sized>(store: &B, owner: &OwnerId) -> Result<Vec<Entry>> {
    store.select_entries(
        owner,
        &EntryQuery::new()
            .in_trash(true)
            .order(EntryOrder::UpdatedDesc),
    )
}
