use crate::error::{NotebinError, Result};
use crate::model::{Entry, EntryKind, OwnerId};
use crate::store::{EntryQuery, StorageBackend};
use serde::Serialize;
use std::cmp::Reverse;

/// How an entry matched; variants are ordered best first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MatchRank {
    ExactTitle,
    Title,
    Description,
}

#[derive(Debug, Clone, Serialize)]
pub struct SearchHit {
    pub entry: Entry,
    pub rank: MatchRank,
}

/// Case-insensitive search over the caller's active entries, optionally limited to
/// one kind.
pub fn run<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    term: &str,
    kind: Option<EntryKind>,
) -> Result<Vec<SearchHit>> {
    let term = term.trim().to_lowercase();
    if term.is_empty() {
        return Err(NotebinError::Validation(
            "Search term cannot be empty".to_string(),
        ));
    }

    let mut query = EntryQuery::new().in_trash(false);
    if let Some(kind) = kind {
        query = query.kind(kind);
    }

    let mut hits: Vec<SearchHit> = store
        .select_entries(owner, &query)?
        .into_iter()
        .filter_map(|entry| {
            let title = entry.title.to_lowercase();
            let rank = if title == term {
                MatchRank::ExactTitle
            } else if title.contains(&term) {
                MatchRank::Title
            } else if entry.description.to_lowercase().contains(&term) {
                MatchRank::Description
            } else {
                return None;
            };
            Some(SearchHit { entry, rank })
        })
        .collect();

    hits.sort_by_key(|hit| {
        (
            hit.rank,
            hit.entry.title.chars().count(),
            Reverse(hit.entry.updated_at),
        )
    });
    Ok(hits)
}
