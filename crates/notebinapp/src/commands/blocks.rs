//! Page blocks.
//!
//! Blocks are only reachable through an active page the caller owns. Their trash
//! flag is never set directly; it follows the page (see [`super::trash`]).

use crate::error::{NotebinError, Result};
use crate::model::{Block, EntryKind, OwnerId, Visibility};
use crate::store::StorageBackend;
use chrono::Utc;
use tracing::debug;
use uuid::Uuid;

use super::helpers::load_owned;

/// Appends a block to a page. Without an explicit position the block goes last.
pub fn add<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    page_id: &Uuid,
    block_type: &str,
    content: &str,
    position: Option<i64>,
) -> Result<Block> {
    if block_type.trim().is_empty() {
        return Err(NotebinError::Validation(
            "Block type cannot be empty".to_string(),
        ));
    }
    load_owned(store, owner, page_id, Some(EntryKind::Page), Visibility::Active)?;

    let position = match position {
        Some(p) => p,
        None => match store.select_blocks(page_id, None)?.iter().map(|b| b.position).max() {
            None => 0,
            Some(max) => max.checked_add(1).ok_or_else(|| {
                NotebinError::Validation(
                    "No position left after the last block; pass one explicitly".to_string(),
                )
            })?,
        },
    };

    let block = Block::new(*page_id, block_type, content, position);
    store.insert_block(&block)?;
    debug!(id = %block.id, page = %page_id, position, "block added");
    Ok(block)
}

/// Blocks of an active page, in position order.
pub fn list<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    page_id: &Uuid,
) -> Result<Vec<Block>> {
    load_owned(store, owner, page_id, Some(EntryKind::Page), Visibility::Active)?;
    store.select_blocks(page_id, Some(false))
}

/// Replaces a block's content.
pub fn update<B: StorageBackend + ?Sized>(
    store: &B,
    owner: &OwnerId,
    block_id: &Uuid,
    content: &str,
) -> Result<Block> {
    let mut block = store
        .find_block(block_id)?
        .ok_or(NotebinError::NotFoundOrUnauthorized)?;
    load_owned(
        store,
        owner,
        &block.page_id,
        Some(EntryKind::Page),
        Visibility::Active,
    )?;

    block.content = content.to_string();
    block.updated_at = Utc::now();
    if store.update_block(&block)? == 0 {
        return Err(NotebinError::NotFoundOrUnauthorized);
    }
    debug!(id = %block_id, "block updated");
    Ok(block)
}
