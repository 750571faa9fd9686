use crate::error::{NotebinError, Result};
use crate::model::{Entry, OwnerId, Visibility};
use crate::store::{atomically, StorageBackend};
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::helpers::{is_descendant_of, load_owned};

/// Re-parents an active entry. `None` moves it to the root.
///
/// The destination must be active and owned by the caller. Moves that would put an
/// entry inside itself or inside one of its own descendants are rejected, so the
/// parent graph stays acyclic. Moving to the current parent changes nothing.
pub fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    id: &Uuid,
    new_parent: Option<Uuid>,
) -> Result<Entry> {
    atomically(store, |store| {
        let mut entry = load_owned(store, owner, id, None, Visibility::Active)?;

        if let Some(target) = new_parent {
            if target == entry.id {
                return Err(NotebinError::Validation(format!(
                    "Cannot move '{}' into itself",
                    entry.title
                )));
            }
            load_owned(store, owner, &target, None, Visibility::Active)?;
            if is_descendant_of(store, owner, target, entry.id)? {
                return Err(NotebinError::Validation(format!(
                    "Cannot move '{}' into its own descendant",
                    entry.title
                )));
            }
        }

        if entry.parent_id == new_parent {
            debug!(%id, "entry already at destination");
            return Ok(entry);
        }

        entry.parent_id = new_parent;
        entry.updated_at = Utc::now();
        if store.update_entry(&entry)? == 0 {
            return Err(NotebinError::NotFoundOrUnauthorized);
        }
        debug!(%id, parent = ?new_parent, "entry moved");
        Ok(entry)
    })
}
