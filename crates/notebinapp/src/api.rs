//! # API Facade
//!
//! The API layer is a **thin facade** over the command layer. It is the single
//! entry point for notebin operations, whatever UI sits on top.
//!
//! ## Role and Responsibilities
//!
//! The facade:
//! - **Guards** every call: the owner is resolved from the [`AuthProvider`]
//!   before anything touches the store
//! - **Normalizes inputs**: ids and kind discriminators arrive as strings
//!   (`"pages"`, `"folders"`) and are parsed here
//! - **Dispatches** to the matching command function
//! - **Logs failures** once, at a level that matches the failure class
//! - **Shapes results** into [`ActionResult`] for callers that want one uniform
//!   response type
//!
//! ## What the API Does NOT Do
//!
//! - **Business logic**: that belongs in `commands/*.rs`
//! - **Presentation**: no stdout, no formatting
//!
//! ## Generic Over Backend and Session
//!
//! `NotebinApi<B: StorageBackend, A: AuthProvider>`:
//! - Production: `NotebinApi<SqliteBackend, StaticSession>`
//! - Testing: `NotebinApi<MemBackend, StaticSession>` or `NoSession`

use serde::Serialize;
use std::str::FromStr;
use tracing::{debug, error, warn};
use uuid::Uuid;

use crate::auth::{require_owner, AuthProvider};
use crate::commands::search::SearchHit;
use crate::commands::{self, FolderDetail, PurgeOutcome, TrashOutcome};
use crate::error::{NotebinError, Result};
use crate::hierarchy::{build_hierarchy, TreeNode};
use crate::model::{Block, Entry, EntryKind, EntryPatch, OwnerId, Visibility};
use crate::store::StorageBackend;

/// Uniform response shape for UI callers.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ActionResult<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ActionResult<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(message.into()),
        }
    }

    pub fn from_result(result: Result<T>) -> Self {
        match result {
            Ok(data) => Self::ok(data),
            Err(err) => Self::failed(err.to_string()),
        }
    }
}

impl<T: Serialize> ActionResult<T> {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

pub struct NotebinApi<B: StorageBackend, A: AuthProvider> {
    store: B,
    auth: A,
}

impl<B: StorageBackend, A: AuthProvider> NotebinApi<B, A> {
    pub fn new(store: B, auth: A) -> Self {
        Self { store, auth }
    }

    pub fn store(&self) -> &B {
        &self.store
    }

    /// Converts a facade result into the uniform response shape.
    pub fn respond<T>(&self, result: Result<T>) -> ActionResult<T> {
        ActionResult::from_result(result)
    }

    pub fn create_page(
        &self,
        title: &str,
        description: &str,
        parent_id: Option<&str>,
    ) -> Result<Entry> {
        self.guarded("create_page", |owner| {
            let parent = parse_optional_id(parent_id)?;
            commands::create::page(&self.store, owner, title, description, parent)
        })
    }

    pub fn create_folder(&self, title: &str, parent_id: Option<&str>) -> Result<Entry> {
        self.guarded("create_folder", |owner| {
            let parent = parse_optional_id(parent_id)?;
            commands::create::folder(&self.store, owner, title, parent)
        })
    }

    pub fn get_entry(&self, id: &str, visibility: Visibility) -> Result<Entry> {
        self.guarded("get_entry", |owner| {
            commands::get::by_id(&self.store, owner, &parse_id(id)?, visibility)
        })
    }

    pub fn update_entry(&self, id: &str, patch: &EntryPatch) -> Result<Entry> {
        self.guarded("update_entry", |owner| {
            commands::update::run(&self.store, owner, &parse_id(id)?, patch)
        })
    }

    /// Active entries of one kind; `kind` is `"pages"` or `"folders"`.
    pub fn list_active(&self, kind: &str) -> Result<Vec<Entry>> {
        self.guarded("list_active", |owner| {
            commands::get::active(&self.store, owner, EntryKind::from_str(kind)?)
        })
    }

    pub fn list_trashed(&self) -> Result<Vec<Entry>> {
        self.guarded("list_trashed", |owner| {
            commands::get::trashed(&self.store, owner)
        })
    }

    /// All active entries arranged as a forest.
    pub fn tree(&self) -> Result<Vec<TreeNode>> {
        self.guarded("tree", |owner| {
            Ok(build_hierarchy(commands::get::all_active(
                &self.store,
                owner,
            )?))
        })
    }

    pub fn folder_detail(&self, folder_id: &str) -> Result<FolderDetail> {
        self.guarded("folder_detail", |owner| {
            commands::folder::detail(&self.store, owner, &parse_id(folder_id)?)
        })
    }

    pub fn move_entry(&self, id: &str, new_parent: Option<&str>) -> Result<Entry> {
        self.guarded("move_entry", |owner| {
            let parent = parse_optional_id(new_parent)?;
            commands::move_entries::run(&self.store, owner, &parse_id(id)?, parent)
        })
    }

    pub fn move_to_trash(&self, id: &str, kind: &str) -> Result<TrashOutcome> {
        self.guarded("move_to_trash", |owner| {
            let kind = EntryKind::from_str(kind)?;
            commands::trash::run(&self.store, owner, &parse_id(id)?, kind)
        })
    }

    pub fn restore(&self, id: &str, kind: &str) -> Result<TrashOutcome> {
        self.guarded("restore", |owner| {
            let kind = EntryKind::from_str(kind)?;
            commands::restore::run(&self.store, owner, &parse_id(id)?, kind)
        })
    }

    pub fn permanently_delete(&self, id: &str, kind: &str) -> Result<PurgeOutcome> {
        self.guarded("permanently_delete", |owner| {
            let kind = EntryKind::from_str(kind)?;
            commands::purge::run(&self.store, owner, &parse_id(id)?, kind)
        })
    }

    pub fn empty_trash(&self) -> Result<PurgeOutcome> {
        self.guarded("empty_trash", |owner| {
            commands::purge::empty_trash(&self.store, owner)
        })
    }

    pub fn add_block(
        &self,
        page_id: &str,
        block_type: &str,
        content: &str,
        position: Option<i64>,
    ) -> Result<Block> {
        self.guarded("add_block", |owner| {
            let page_id = parse_id(page_id)?;
            commands::blocks::add(&self.store, owner, &page_id, block_type, content, position)
        })
    }

    pub fn list_blocks(&self, page_id: &str) -> Result<Vec<Block>> {
        self.guarded("list_blocks", |owner| {
            commands::blocks::list(&self.store, owner, &parse_id(page_id)?)
        })
    }

    pub fn update_block(&self, block_id: &str, content: &str) -> Result<Block> {
        self.guarded("update_block", |owner| {
            commands::blocks::update(&self.store, owner, &parse_id(block_id)?, content)
        })
    }

    /// Ranked search; `kind` optionally limits results to `"pages"` or `"folders"`.
    pub fn search(&self, term: &str, kind: Option<&str>) -> Result<Vec<SearchHit>> {
        self.guarded("search", |owner| {
            let kind = kind.map(EntryKind::from_str).transpose()?;
            commands::search::run(&self.store, owner, term, kind)
        })
    }

    /// Resolves the owner, runs `op` and logs any failure once.
    fn guarded<T>(
        &self,
        action: &'static str,
        op: impl FnOnce(&OwnerId) -> Result<T>,
    ) -> Result<T> {
        let result = require_owner(&self.auth).and_then(|owner| op(&owner));
        if let Err(err) = &result {
            match err {
                NotebinError::Unauthorized => warn!(action, "rejected: no session"),
                e if e.is_client_error() => debug!(action, error = %e, "request failed"),
                e => error!(action, error = %e, "operation failed"),
            }
        }
        result
    }
}

fn parse_id(raw: &str) -> Result<Uuid> {
    Uuid::parse_str(raw.trim())
        .map_err(|_| NotebinError::Validation(format!("'{}' is not a valid id", raw)))
}

fn parse_optional_id(raw: Option<&str>) -> Result<Option<Uuid>> {
    raw.map(parse_id).transpose()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::{NoSession, StaticSession};
    use crate::store::mem_backend::MemBackend;

    fn api() -> NotebinApi<MemBackend, StaticSession> {
        NotebinApi::new(MemBackend::new(), StaticSession::for_id("me"))
    }

    #[test]
    fn dispatches_by_kind_discriminator() {
        let api = api();
        let page = api.create_page("Spec", "", None).unwrap();
        let folder = api.create_folder("", None).unwrap();
        assert_eq!(folder.title, "New Folder");

        assert_eq!(api.list_active("pages").unwrap().len(), 1);
        assert_eq!(api.list_active("folders").unwrap().len(), 1);

        api.move_to_trash(&page.id.to_string(), "pages").unwrap();
        api.move_to_trash(&folder.id.to_string(), "folders").unwrap();
        assert_eq!(api.list_trashed().unwrap().len(), 2);
    }

    #[test]
    fn unknown_kind_and_bad_ids_are_validation_errors() {
        let api = api();
        let page = api.create_page("P", "", None).unwrap();

        assert!(matches!(
            api.move_to_trash(&page.id.to_string(), "diagrams"),
            Err(NotebinError::Validation(_))
        ));
        assert!(matches!(
            api.restore("not-a-uuid", "pages"),
            Err(NotebinError::Validation(_))
        ));
        assert!(matches!(
            api.create_page("Child", "", Some("nope")),
            Err(NotebinError::Validation(_))
        ));
        assert_eq!(api.store().entry_count(), 1);
    }

    #[test]
    fn no_session_is_unauthorized_and_touches_nothing() {
        let api = NotebinApi::new(MemBackend::new(), NoSession);
        assert!(matches!(
            api.create_page("P", "", None),
            Err(NotebinError::Unauthorized)
        ));
        assert!(matches!(
            api.empty_trash(),
            Err(NotebinError::Unauthorized)
        ));
        assert_eq!(api.store().entry_count(), 0);
    }

    #[test]
    fn tree_shows_orphans_as_roots() {
        let api = api();
        let folder = api.create_folder("F", None).unwrap();
        let fid = folder.id.to_string();
        api.create_page("P2", "", Some(&fid)).unwrap();
        api.move_to_trash(&fid, "folders").unwrap();

        let forest = api.tree().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].entry.title, "P2");

        api.restore(&fid, "folders").unwrap();
        let forest = api.tree().unwrap();
        assert_eq!(forest.len(), 1);
        assert_eq!(forest[0].entry.title, "F");
        assert_eq!(forest[0].children[0].entry.title, "P2");
    }

    #[test]
    fn action_result_serializes_without_absent_fields() {
        let api = api();
        let ok = api.respond(api.create_folder("Docs", None));
        let json: serde_json::Value = serde_json::from_str(&ok.to_json().unwrap()).unwrap();
        assert_eq!(json["success"], true);
        assert_eq!(json["data"]["title"], "Docs");
        assert!(json.get("error").is_none());

        let failed = api.respond(api.restore(&Uuid::new_v4().to_string(), "pages"));
        assert!(!failed.success);
        assert_eq!(failed.error.as_deref(), Some("Not found or unauthorized"));
        let json: serde_json::Value = serde_json::from_str(&failed.to_json().unwrap()).unwrap();
        assert!(json.get("data").is_none());
    }
}
