use crate::error::{NotebinError, Result};
use crate::model::{Entry, EntryKind, OwnerId, Visibility};
use crate::store::StorageBackend;
use chrono::Utc;
use std::collections::HashSet;
use tracing::debug;
use uuid::Uuid;

use super::TrashOutcome;

/// Loads an entry the caller owns, in the requested trash state and (optionally) of
/// the requested kind. Any mismatch is reported as `NotFoundOrUnauthorized`.
pub fn load_owned<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    kind: Option<EntryKind>,
    visibility: Visibility,
) -> Result<Entry> {
    let entry = store
        .find_entry(owner, id)?
        .ok_or(NotebinError::NotFoundOrUnauthorized)?;

    if kind.is_some_and(|k| k != entry.kind) || !visibility.admits(entry.in_trash) {
        return Err(NotebinError::NotFoundOrUnauthorized);
    }
    Ok(entry)
}

/// Checks that a prospective parent exists, is owned by the caller and is active.
pub fn validate_parent<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    parent_id: Option<Uuid>,
) -> Result<()> {
    if let Some(parent) = parent_id {
        load_owned(store, owner, &parent, None, Visibility::Active)?;
    }
    Ok(())
}

/// Flips the trash flag on an entry and, for pages, on all of its blocks.
///
/// The entry must currently be in the opposite state. Runs inside the caller's
/// unit of work.
pub fn set_trash_state<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    kind: EntryKind,
    to_trash: bool,
) -> Result<TrashOutcome> {
    let from = if to_trash {
        Visibility::Active
    } else {
        Visibility::Trashed
    };
    let mut entry = load_owned(store, owner, id, Some(kind), from)?;

    let now = Utc::now();
    entry.in_trash = to_trash;
    entry.updated_at = now;
    if store.update_entry(&entry)? == 0 {
        return Err(NotebinError::NotFoundOrUnauthorized);
    }

    let blocks_affected = match kind {
        EntryKind::Page => store.set_blocks_trashed(id, to_trash, now)?,
        EntryKind::Folder => 0,
    };

    debug!(
        %id,
        %kind,
        in_trash = to_trash,
        blocks_affected,
        "trash state changed"
    );
    Ok(TrashOutcome {
        entry,
        blocks_affected,
    })
}

/// Returns true if `candidate` sits somewhere below `ancestor` in the caller's tree.
///
/// Walks up the parent chain from `candidate`. A chain that loops back on itself
/// (corrupt data) ends the walk.
pub fn is_descendant_of<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    candidate: Uuid,
    ancestor: Uuid,
) -> Result<bool> {
    let mut seen = HashSet::new();
    let mut current = candidate;

    while seen.insert(current) {
        let parent = match store.find_entry(owner, &current)? {
            Some(entry) => entry.parent_id,
            None => return Ok(false),
        };
        match parent {
            Some(parent_id) if parent_id == ancestor => return Ok(true),
            Some(parent_id) => current = parent_id,
            None => return Ok(false),
        }
    }
    Ok(false)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::mem_backend::MemBackend;

    fn owner() -> OwnerId {
        OwnerId::new("me")
    }

    #[test]
    fn load_owned_rejects_wrong_kind_and_state() {
        let store = MemBackend::new();
        let page = Entry::page(owner(), "P", "");
        store.insert_entry(&page).unwrap();

        let as_page = load_owned(
            &store,
            &owner(),
            &page.id,
            Some(EntryKind::Page),
            Visibility::Active,
        );
        assert!(as_page.is_ok());

        let as_folder = load_owned(
            &store,
            &owner(),
            &page.id,
            Some(EntryKind::Folder),
            Visibility::Active,
        );
        assert!(matches!(
            as_folder,
            Err(NotebinError::NotFoundOrUnauthorized)
        ));
        assert!(matches!(
            load_owned(&store, &owner(), &page.id, None, Visibility::Trashed),
            Err(NotebinError::NotFoundOrUnauthorized)
        ));
    }

    #[test]
    fn descendant_walk_follows_parents() {
        let store = MemBackend::new();
        let root = Entry::folder(owner(), "Root");
        let mid = Entry::folder(owner(), "Mid").with_parent(Some(root.id));
        let leaf = Entry::page(owner(), "Leaf", "").with_parent(Some(mid.id));
        for e in [&root, &mid, &leaf] {
            store.insert_entry(e).unwrap();
        }

        assert!(is_descendant_of(&store, &owner(), leaf.id, root.id).unwrap());
        assert!(!is_descendant_of(&store, &owner(), root.id, leaf.id).unwrap());
    }

    #[test]
    fn descendant_walk_terminates_on_cycles() {
        let store = MemBackend::new();
        let mut a = Entry::folder(owner(), "A");
        let b = Entry::folder(owner(), "B").with_parent(Some(a.id));
        a.parent_id = Some(b.id);
        store.insert_entry(&a).unwrap();
        store.insert_entry(&b).unwrap();

        let outsider = Uuid::new_v4();
        assert!(!is_descendant_of(&store, &owner(), a.id, outsider).unwrap());
    }
}
