use crate::error::Result;
use crate::model::{EntryKind, OwnerId, Visibility};
use crate::store::{EntryOrder, EntryQuery, StorageBackend};
use uuid::Uuid;

use super::helpers::load_owned;
use super::FolderDetail;

/// A folder with its direct active contents: pages by most recent edit, subfolders
/// newest first.
pub fn detail<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    folder_id: &Uuid,
) -> Result<FolderDetail> {
    let folder = load_owned(
        store,
        owner,
        folder_id,
        Some(EntryKind::Folder),
        Visibility::Active,
    )?;

    let children = EntryQuery::new().in_trash(false).parent(folder.id);
    let pages = store.select_entries(
        owner,
        &children
            .kind(EntryKind::Page)
            .order(EntryOrder::UpdatedDesc),
    )?;
    let subfolders = store.select_entries(
        owner,
        &children
            .kind(EntryKind::Folder)
            .order(EntryOrder::CreatedDesc),
    )?;

    Ok(FolderDetail {
        folder,
        pages,
        subfolders,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::{create, trash, update};
    use crate::error::NotebinError;
    use crate::model::EntryPatch;
    use crate::store::mem_backend::MemBackend;

    fn owner() -> OwnerId {
        OwnerId::new("me")
    }

    #[test]
    fn lists_direct_active_children() {
        let store = MemBackend::new();
        let folder = create::folder(&store, &owner(), "Work", None).unwrap();
        let older = create::page(&store, &owner(), "Older", "", Some(folder.id)).unwrap();
        create::page(&store, &owner(), "Newer", "", Some(folder.id)).unwrap();
        let gone = create::page(&store, &owner(), "Gone", "", Some(folder.id)).unwrap();
        create::folder(&store, &owner(), "Sub A", Some(folder.id)).unwrap();
        let sub_b = create::folder(&store, &owner(), "Sub B", Some(folder.id)).unwrap();
        create::page(&store, &owner(), "Grandchild", "", Some(sub_b.id)).unwrap();
        create::page(&store, &owner(), "Elsewhere", "", None).unwrap();

        trash::run(&store, &owner(), &gone.id, EntryKind::Page).unwrap();
        update::run(&store, &owner(), &older.id, &EntryPatch::default()).unwrap();

        let detail = detail(&store, &owner(), &folder.id).unwrap();

        let pages: Vec<_> = detail.pages.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(pages, vec!["Older", "Newer"]);
        let subfolders: Vec<_> = detail.subfolders.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(subfolders, vec!["Sub B", "Sub A"]);
    }

    #[test]
    fn requires_an_active_owned_folder() {
        let store = MemBackend::new();
        let folder = create::folder(&store, &owner(), "F", None).unwrap();
        let page = create::page(&store, &owner(), "P", "", None).unwrap();

        assert!(matches!(
            detail(&store, &OwnerId::new("them"), &folder.id),
            Err(NotebinError::NotFoundOrUnauthorized)
        ));
        assert!(matches!(
            detail(&store, &owner(), &page.id),
            Err(NotebinError::NotFoundOrUnauthorized)
        ));

        trash::run(&store, &owner(), &folder.id, EntryKind::Folder).unwrap();
        assert!(matches!(
            detail(&store, &owner(), &folder.id),
            Err(NotebinError::NotFoundOrUnauthorized)
        ));
    }
}
