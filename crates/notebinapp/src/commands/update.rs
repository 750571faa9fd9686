use crate::error::{NotebinError, Result};
use crate::model::{Entry, EntryKind, EntryPatch, OwnerId, Visibility};
use crate::store::StorageBackend;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::helpers::load_owned;

/// Applies the defined fields of `patch` to an active entry.
///
/// `updated_at` is refreshed even when the patch is empty. Folders carry no
/// description, so a non-empty one is rejected for them.
pub fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    patch: &EntryPatch,
) -> Result<Entry> {
    let mut entry = load_owned(store, owner, id, None, Visibility::Active)?;
    if entry.kind == EntryKind::Folder
        && patch.description.as_deref().is_some_and(|d| !d.is_empty())
    {
        return Err(NotebinError::Validation(
            "Folders have no description".to_string(),
        ));
    }

    patch.apply_to(&mut entry);
    entry.updated_at = Utc::now();

    if store.update_entry(&entry)? == 0 {
        return Err(NotebinError::NotFoundOrUnauthorized);
    }
    debug!(%id, fields_changed = !patch.is_empty(), "entry updated");
    Ok(entry)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, get, trash};
    use crate::store::mem_backend::MemBackend;

    fn owner() -> OwnerId {
        OwnerId::new("me")
    }

    #[test]
    fn applies_only_defined_fields() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "Draft", "first body", None).unwrap();
        let page = crate::commands::backdated(&store, page);

        let updated = run(
            &store,
            &owner(),
            &page.id,
            &EntryPatch::default().title("Final"),
        )
        .unwrap();

        assert_eq!(updated.title, "Final");
        assert_eq!(updated.description, "first body");
        assert!(updated.updated_at > page.updated_at);
        assert_eq!(updated.created_at, page.created_at);

        let stored = get::by_id(&store, &owner(), &page.id, Visibility::Active).unwrap();
        assert_eq!(stored, updated);
    }

    #[test]
    fn empty_patch_still_touches_updated_at() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "P", "", None).unwrap();
        let page = crate::commands::backdated(&store, page);
        let updated = run(&store, &owner(), &page.id, &EntryPatch::default()).unwrap();
        assert!(updated.updated_at > page.updated_at);
        assert_eq!(updated.title, "P");
    }

    #[test]
    fn other_owners_cannot_update() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "Mine", "", None).unwrap();
        let result = run(
            &store,
            &OwnerId::new("them"),
            &page.id,
            &EntryPatch::default().title("Theirs"),
        );
        assert!(matches!(result, Err(NotebinError::NotFoundOrUnauthorized)));
    }

    #[test]
    fn trashed_entries_are_read_only() {
        let store = MemBackend::new();
        let page = create::page(&store, &owner(), "P", "", None).unwrap();
        trash::run(&store, &owner(), &page.id, EntryKind::Page).unwrap();

        let result = run(
            &store,
            &owner(),
            &page.id,
            &EntryPatch::default().title("Edited"),
        );
        assert!(matches!(result, Err(NotebinError::NotFoundOrUnauthorized)));
    }

    #[test]
    fn folder_description_is_rejected() {
        let store = MemBackend::new();
        let folder = create::folder(&store, &owner(), "F", None).unwrap();

        let result = run(
            &store,
            &owner(),
            &folder.id,
            &EntryPatch::default().title("Renamed").description("notes"),
        );
        assert!(matches!(result, Err(NotebinError::Validation(_))));
        let stored = get::by_id(&store, &owner(), &folder.id, Visibility::Active).unwrap();
        assert_eq!(stored.title, "F");

        let renamed = run(&store, &owner(), &folder.id, &EntryPatch::default().title("Renamed"))
            .unwrap();
        assert_eq!(renamed.title, "Renamed");
        assert!(renamed.description.is_empty());
    }
}
