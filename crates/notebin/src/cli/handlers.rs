//! Command handlers.
//!
//! Each handler makes one (occasionally two) facade calls and hands the result
//! to [`emit`], which either renders it for humans or prints the `ActionResult`
//! JSON shape. Failures become `Err` either way, so the exit code is 1.

use anyhow::anyhow;
use notebinapp::error::Result;
use notebinapp::model::{EntryKind, EntryPatch, Visibility};
use serde::Serialize;

use super::render;
use super::setup::{BlockCommands, Commands};
use super::Api;

pub struct Ctx {
    pub api: Api,
    pub json: bool,
}

pub fn dispatch(ctx: &Ctx, command: Commands) -> anyhow::Result<()> {
    let api = &ctx.api;
    match command {
        Commands::Create {
            body,
            parent,
            title,
        } => emit(
            ctx,
            api.create_page(&title.join(" "), &body, parent.as_deref()),
            |e| render::render_saved("Created", e),
        ),
        Commands::Mkdir { parent, title } => emit(
            ctx,
            api.create_folder(&title.join(" "), parent.as_deref()),
            |e| render::render_saved("Created", e),
        ),
        Commands::List { folders } => {
            let (kind, empty) = if folders {
                ("folders", "No folders.")
            } else {
                ("pages", "No pages.")
            };
            emit(ctx, api.list_active(kind), |entries| {
                render::render_entries(entries, empty)
            })
        }
        Commands::Tree => emit(ctx, api.tree(), |forest| render::render_tree(forest)),
        Commands::Show { id } => show(ctx, &id),
        Commands::Folder { id } => emit(ctx, api.folder_detail(&id), render::render_folder),
        Commands::Edit { id, title, body } => {
            let patch = EntryPatch { title, description: body };
            emit(ctx, api.update_entry(&id, &patch), |e| {
                render::render_saved("Updated", e)
            })
        }
        Commands::Move { id, to } => emit(ctx, api.move_entry(&id, to.as_deref()), |e| {
            render::render_saved("Moved", e)
        }),
        Commands::Search { term, kind } => emit(ctx, api.search(&term, kind.as_deref()), |hits| {
            render::render_search(hits)
        }),
        Commands::Block(block) => dispatch_block(ctx, block),
        Commands::Trash { kind, id } => emit(ctx, api.move_to_trash(&id, &kind), |o| {
            render::render_trash_outcome("Trashed", o)
        }),
        Commands::Trashed => emit(ctx, api.list_trashed(), |entries| {
            render::render_entries(entries, "Trash is empty.")
        }),
        Commands::Restore { kind, id } => emit(ctx, api.restore(&id, &kind), |o| {
            render::render_trash_outcome("Restored", o)
        }),
        Commands::Purge { kind, id } => {
            emit(ctx, api.permanently_delete(&id, &kind), render::render_purge)
        }
        Commands::EmptyTrash => emit(ctx, api.empty_trash(), render::render_purge),
    }
}

fn dispatch_block(ctx: &Ctx, command: BlockCommands) -> anyhow::Result<()> {
    let api = &ctx.api;
    match command {
        BlockCommands::Add {
            page,
            block_type,
            content,
            position,
        } => emit(
            ctx,
            api.add_block(&page, &block_type, &content, position),
            |b| render::render_blocks(std::slice::from_ref(b)),
        ),
        BlockCommands::List { page } => emit(ctx, api.list_blocks(&page), |blocks| {
            render::render_blocks(blocks)
        }),
        BlockCommands::Edit { id, content } => emit(ctx, api.update_block(&id, &content), |b| {
            render::render_blocks(std::slice::from_ref(b))
        }),
    }
}

#[derive(Serialize)]
struct EntryView {
    entry: notebinapp::model::Entry,
    blocks: Vec<notebinapp::model::Block>,
}

/// Shows any entry the user owns, trashed or not. Blocks are only listed for
/// active pages.
fn show(ctx: &Ctx, id: &str) -> anyhow::Result<()> {
    let view = ctx.api.get_entry(id, Visibility::Any).and_then(|entry| {
        let blocks = if entry.kind == EntryKind::Page && !entry.in_trash {
            ctx.api.list_blocks(id)?
        } else {
            Vec::new()
        };
        Ok(EntryView { entry, blocks })
    });
    emit(ctx, view, |v| render::render_entry(&v.entry, &v.blocks))
}

fn emit<T: Serialize>(
    ctx: &Ctx,
    result: Result<T>,
    render: impl FnOnce(&T) -> String,
) -> anyhow::Result<()> {
    if ctx.json {
        let response = ctx.api.respond(result);
        println!("{}", response.to_json()?);
        return match response.error {
            Some(message) => Err(anyhow!(message)),
            None => Ok(()),
        };
    }

    let value = result?;
    print!("{}", render(&value));
    Ok(())
}
