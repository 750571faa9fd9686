//! # Domain Model: Entries, Blocks and Owners
//!
//! Notebin stores two kinds of containers, pages and folders, in a single
//! shape: an [`Entry`] tagged with an [`EntryKind`]. Both kinds may sit under a
//! parent entry, so a page can hold sub-pages and a folder can hold both.
//!
//! Page content beyond the description lives in [`Block`]s. A block belongs to
//! exactly one page and always shares that page's trash state.
//!
//! ## Trash State
//!
//! Every entry is in one of three states:
//!
//! ```text
//! Active (in_trash = false) ──trash──▶ Trashed (in_trash = true) ──purge──▶ Deleted (no row)
//!            ▲                                 │
//!            └────────────restore──────────────┘
//! ```
//!
//! [`Visibility`] selects which of the two stored states a lookup accepts.
//!
//! ## Titles
//!
//! Titles are trimmed. A blank page title becomes `"Untitled"`, a blank folder
//! title becomes `"New Folder"`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::error::NotebinError;

pub const DEFAULT_PAGE_TITLE: &str = "Untitled";
pub const DEFAULT_FOLDER_TITLE: &str = "New Folder";

/// The authenticated principal a record belongs to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OwnerId(String);

impl OwnerId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for OwnerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    Page,
    Folder,
}

impl EntryKind {
    /// Column value used by the relational backends.
    pub fn as_str(&self) -> &'static str {
        match self {
            EntryKind::Page => "page",
            EntryKind::Folder => "folder",
        }
    }

    pub fn default_title(&self) -> &'static str {
        match self {
            EntryKind::Page => DEFAULT_PAGE_TITLE,
            EntryKind::Folder => DEFAULT_FOLDER_TITLE,
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Parses the `"pages" | "folders"` discriminator used by UI callers.
/// The singular column spelling is accepted as well.
impl FromStr for EntryKind {
    type Err = NotebinError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pages" | "page" => Ok(EntryKind::Page),
            "folders" | "folder" => Ok(EntryKind::Folder),
            other => Err(NotebinError::Validation(format!(
                "unknown entity kind '{}' (expected 'pages' or 'folders')",
                other
            ))),
        }
    }
}

/// Which trash state a lookup accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Active,
    Trashed,
    Any,
}

impl Visibility {
    pub fn admits(&self, in_trash: bool) -> bool {
        match self {
            Visibility::Active => !in_trash,
            Visibility::Trashed => in_trash,
            Visibility::Any => true,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub kind: EntryKind,
    pub title: String,
    pub description: String,
    pub parent_id: Option<Uuid>,
    pub in_trash: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Entry {
    pub fn new(
        owner_id: OwnerId,
        kind: EntryKind,
        title: &str,
        description: &str,
        parent_id: Option<Uuid>,
    ) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            owner_id,
            kind,
            title: normalize_title(title, kind),
            description: description.to_string(),
            parent_id,
            in_trash: false,
            created_at: now,
            updated_at: now,
        }
    }

    pub fn page(owner_id: OwnerId, title: &str, description: &str) -> Self {
        Self::new(owner_id, EntryKind::Page, title, description, None)
    }

    pub fn folder(owner_id: OwnerId, title: &str) -> Self {
        Self::new(owner_id, EntryKind::Folder, title, "", None)
    }

    pub fn with_parent(mut self, parent_id: Option<Uuid>) -> Self {
        self.parent_id = parent_id;
        self
    }

    pub fn is_page(&self) -> bool {
        self.kind == EntryKind::Page
    }

    pub fn is_folder(&self) -> bool {
        self.kind == EntryKind::Folder
    }
}

/// Partial update of an entry's editable fields. `None` leaves a field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EntryPatch {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl EntryPatch {
    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    /// Applies the defined fields to `entry`. Timestamps are the caller's job.
    pub fn apply_to(&self, entry: &mut Entry) {
        if let Some(title) = &self.title {
            entry.title = normalize_title(title, entry.kind);
        }
        if let Some(description) = &self.description {
            entry.description = description.clone();
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Block {
    pub id: Uuid,
    pub page_id: Uuid,
    pub block_type: String,
    /// Opaque serialized payload; notebin never interprets it.
    pub content: String,
    pub position: i64,
    pub in_trash: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Block {
    pub fn new(page_id: Uuid, block_type: &str, content: &str, position: i64) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            page_id,
            block_type: block_type.trim().to_string(),
            content: content.to_string(),
            position,
            in_trash: false,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Trims a title, falling back to the kind's default when nothing is left.
pub fn normalize_title(title: &str, kind: EntryKind) -> String {
    let clean = title.trim();
    if clean.is_empty() {
        kind.default_title().to_string()
    } else {
        clean.to_string()
    }
}
