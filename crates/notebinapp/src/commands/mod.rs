//! # Command Layer
//!
//! This module contains the **core business logic** of notebin. Each command lives in
//! its own submodule and implements plain Rust functions over a [`StorageBackend`].
//!
//! ## Role and Responsibilities
//!
//! Commands are where the real work happens:
//! - Enforce ownership: every lookup goes through the caller's [`OwnerId`]
//! - Enforce the trash state machine (Active → Trashed → Deleted)
//! - Cascade trash state to page blocks, and purges to blocks and trashed children
//! - Wrap every multi-row transition in [`crate::store::atomically`]
//!
//! ## What Commands Do NOT Do
//!
//! - **Authentication**: the owner is resolved by the facade before a command runs
//! - **Input parsing**: kinds and ids arrive typed
//! - **Presentation**: results are data, the UI decides how to render them
//!
//! ## Testing Strategy
//!
//! **This is where the lion's share of testing lives.** Command tests run against
//! [`crate::store::mem_backend::MemBackend`], which also lets them inject write
//! failures in the middle of a cascade.
//!
//! ## Command Modules
//!
//! - [`create`]: Create pages and folders
//! - [`get`]: Fetch one entry, list active and trashed entries
//! - [`update`]: Partial field updates
//! - [`blocks`]: Add, list and edit page blocks
//! - [`trash`]: Move an entry to the trash
//! - [`restore`]: Bring an entry back from the trash
//! - [`purge`]: Permanent deletion and emptying the trash
//! - [`folder`]: Folder detail view
//! - [`move_entries`]: Re-parent an entry without creating cycles
//! - [`search`]: Ranked text search over active entries
//! - [`helpers`]: Shared ownership and state checks
//!
//! [`StorageBackend`]: crate::store::StorageBackend
//! [`OwnerId`]: crate::model::OwnerId

use serde::Serialize;

use crate::model::Entry;

pub mod blocks;
pub mod create;
pub mod folder;
pub mod get;
pub mod helpers;
pub mod move_entries;
pub mod purge;
pub mod restore;
pub mod search;
pub mod trash;
pub mod update;

/// Result of moving an entry into or out of the trash.
#[derive(Debug, Clone, Serialize)]
pub struct TrashOutcome {
    /// The entry in its new state.
    pub entry: Entry,
    /// Blocks whose trash flag followed the page (always 0 for folders).
    pub blocks_affected: usize,
}

/// Result of a permanent deletion.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PurgeOutcome {
    pub entries_deleted: usize,
    pub blocks_deleted: usize,
}

/// A folder together with its direct, active contents.
#[derive(Debug, Clone, Serialize)]
pub struct FolderDetail {
    pub folder: Entry,
    pub pages: Vec<Entry>,
    pub subfolders: Vec<Entry>,
}

/// Pushes an entry's `updated_at` a minute back so a later refresh is visible
/// regardless of clock resolution.
#[cfg(test)]
pub(crate) fn backdated<B>(store: &B, mut entry: Entry) -> Entry
where
    B: crate::store::StorageBackend + ?Sized,
{
    entry.updated_at -= chrono::Duration::minutes(1);
    store.update_entry(&entry).unwrap();
    entry
}
