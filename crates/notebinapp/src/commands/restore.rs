use crate::error::Result;
use crate::model::{EntryKind, OwnerId};
use crate::store::{atomically, StorageBackend};
use uuid::Uuid;

use super::helpers::set_trash_state;
use super::TrashOutcome;

/// Brings a trashed entry back. For pages, every block of the page comes back with
/// it, so the page is restored fully intact.
///
/// `created_at` is kept, so the entry returns to its original list position.
pub fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    kind: EntryKind,
) -> Result<TrashOutcome> {
    atomically(store, |store| set_trash_state(store, owner, id, kind, false))
}
