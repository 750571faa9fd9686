use crate::error::Result;
use crate::model::{EntryKind, OwnerId};
use crate::store::{atomically, StorageBackend};
use uuid::Uuid;

use super::helpers::set_trash_state;
use super::TrashOutcome;

/// Moves an active entry to the trash. For pages, every block of the page is
/// trashed in the same transaction.
pub fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    kind: EntryKind,
) -> Result<TrashOutcome> {
    atomically(store, |store| set_trash_state(store, owner, id, kind, true))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{blocks, create, get};
    use crate::error::NotebinError;
    use crate::model::Visibility;
    use crate::store::mem_backend::MemBackend;
    use crate::store::StorageBackend;

    fn owner() -> OwnerId {
        OwnerId::new("me")
    }

    #[test]
    fn moves_page_and_blocks_to_trash() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "Spec", "", None).unwrap();
        let page = crate::commands::backdated(&store, page);
        blocks::add(&store, &owner(), &page.id, "text", "one", None).unwrap();
        blocks::add(&store, &owner(), &page.id, "text", "two", None).unwrap();

        let outcome = run(&store, &owner(), &page.id, EntryKind::Page).unwrap();

        assert!(outcome.entry.in_trash);
        assert_eq!(outcome.blocks_affected, 2);
        assert!(outcome.entry.updated_at > page.updated_at);
        let stored = store.select_blocks(&page.id, None).unwrap();
        assert!(stored.iter().all(|b| b.in_trash));

        assert!(get::active(&store, &owner(), EntryKind::Page)
            .unwrap()
            .is_empty());
        assert_eq!(get::trashed(&store, &owner()).unwrap()[0].id, page.id);
    }

    #[test]
    fn moves_folder_without_touching_children() {
        let store = MemBackend::new();
        let folder = create::folder(&store, &owner(), "F", None).unwrap();
        let child = create::page(&store, &owner(), "Child", "", Some(folder.id)).unwrap();

        let outcome = run(&store, &owner(), &folder.id, EntryKind::Folder).unwrap();
        assert_eq!(outcome.blocks_affected, 0);

        let child_now = get::by_id(&store, &owner(), &child.id, Visibility::Any).unwrap();
        assert!(!child_now.in_trash);
    }

    #[test]
    fn nonexistent_entry_fails_without_changes() {
        let store = MemBackend::new();
        create::page(&store, &owner(), "Bystander", "", None).unwrap();

        let result = run(&store, &owner(), &Uuid::new_v4(), EntryKind::Page);
        assert!(matches!(result, Err(NotebinError::NotFoundOrUnauthorized)));
        assert_eq!(get::active(&store, &owner(), EntryKind::Page).unwrap().len(), 1);
        assert!(get::trashed(&store, &owner()).unwrap().is_empty());
    }

    #[test]
    fn already_trashed_entry_fails() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "P", "", None).unwrap();
        run(&store, &owner(), &page.id, EntryKind::Page).unwrap();
        let again = run(&store, &owner(), &page.id, EntryKind::Page);
        assert!(matches!(again, Err(NotebinError::NotFoundOrUnauthorized)));
    }

    #[test]
    fn kind_mismatch_fails() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "P", "", None).unwrap();
        let result = run(&store, &owner(), &page.id, EntryKind::Folder);
        assert!(matches!(result, Err(NotebinError::NotFoundOrUnauthorized)));
    }

    #[test]
    fn other_owner_cannot_trash() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "Mine", "", None).unwrap();
        let result = run(&store, &OwnerId::new("them"), &page.id, EntryKind::Page);
        assert!(matches!(result, Err(NotebinError::NotFoundOrUnauthorized)));
        assert!(!get::by_id(&store, &owner(), &page.id, Visibility::Any)
            .unwrap()
            .in_trash);
    }

    #[test]
    fn failed_block_cascade_rolls_back_page() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "Fragile", "", None).unwrap();
        blocks::add(&store, &owner(), &page.id, "text", "body", None).unwrap();

        // the page update succeeds, the block update fails
        store.fail_after_writes(1);
        let result = run(&store, &owner(), &page.id, EntryKind::Page);
        assert!(matches!(result, Err(NotebinError::Storage(_))));

        let stored = get::by_id(&store, &owner(), &page.id, Visibility::Any).unwrap();
        assert!(!stored.in_trash);
        assert_eq!(stored.updated_at, page.updated_at);
        assert!(store
            .select_blocks(&page.id, None)
            .unwrap()
            .iter()
            .all(|b| !b.in_trash));
    }
}
