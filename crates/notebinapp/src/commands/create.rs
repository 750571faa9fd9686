use crate::error::Result;
use crate::model::{Entry, EntryKind, OwnerId};
use crate::store::StorageBackend;
use tracing::debug;
use uuid::Uuid;

use super::helpers::validate_parent;

pub fn page<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    title: &str,
    description: &str,
    parent_id: Option<Uuid>,
) -> Result<Entry> {
    run(store, owner, EntryKind::Page, title, description, parent_id)
}

pub fn folder<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    title: &str,
    parent_id: Option<Uuid>,
) -> Result<Entry> {
    run(store, owner, EntryKind::Folder, title, "", parent_id)
}

fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    kind: EntryKind,
    title: &str,
    description: &str,
    parent_id: Option<Uuid>,
) -> Result<Entry> {
    validate_parent(store, owner, parent_id)?;

    let entry = Entry::new(owner.clone(), kind, title, description, parent_id);
    store.insert_entry(&entry)?;
    debug!(id = %entry.id, %kind, "entry created");
    Ok(entry)
}
