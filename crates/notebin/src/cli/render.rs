//! Rendering for terminal output.
//!
//! Everything here returns `String`s; handlers decide when to print. Colors come
//! from `console`, which drops the escape codes when stdout is not a terminal.
//! Column math uses display width, not byte length, so titles with wide
//! characters still line up.

use chrono::{DateTime, Utc};
use console::style;
use notebinapp::commands::search::{MatchRank, SearchHit};
use notebinapp::commands::{FolderDetail, PurgeOutcome, TrashOutcome};
use notebinapp::hierarchy::TreeNode;
use notebinapp::model::{Block, Entry, EntryKind};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub const LINE_WIDTH: usize = 100;
const TIME_WIDTH: usize = 14;
const ID_WIDTH: usize = 36;
const ELLIPSIS: char = '…';

pub fn render_entries(entries: &[Entry], empty_message: &str) -> String {
    if entries.is_empty() {
        return format!("{}\n", style(empty_message).dim());
    }
    entries
        .iter()
        .map(|e| entry_line(e, 0))
        .collect::<Vec<_>>()
        .concat()
}

pub fn render_tree(forest: &[TreeNode]) -> String {
    if forest.is_empty() {
        return format!("{}\n", style("Nothing here yet.").dim());
    }
    let mut out = String::new();
    for node in forest {
        push_node(&mut out, node, 0);
    }
    out
}

fn push_node(out: &mut String, node: &TreeNode, depth: usize) {
    out.push_str(&entry_line(&node.entry, depth));
    for child in &node.children {
        push_node(out, child, depth + 1);
    }
}

/// Full view of one entry, with blocks for pages.
pub fn render_entry(entry: &Entry, blocks: &[Block]) -> String {
    let mut out = format!("{}\n", style(&entry.title).bold());
    out.push_str(&format!(
        "{}\n",
        style(format!(
            "{} {} · updated {}",
            entry.kind,
            entry.id,
            format_time_ago(entry.updated_at).trim()
        ))
        .dim()
    ));
    if entry.in_trash {
        out.push_str(&format!("{}\n", style("in trash").red()));
    }
    if !entry.description.is_empty() {
        out.push('\n');
        out.push_str(&entry.description);
        out.push('\n');
    }
    if !blocks.is_empty() {
        out.push('\n');
        out.push_str(&render_blocks(blocks));
    }
    out
}

pub fn render_folder(detail: &FolderDetail) -> String {
    let mut out = format!(
        "{}  {}\n",
        style(&detail.folder.title).bold(),
        style(detail.folder.id).dim()
    );
    out.push_str(&format!("\n{}\n", style("Subfolders").underlined()));
    out.push_str(&render_entries(&detail.subfolders, "No subfolders."));
    out.push_str(&format!("\n{}\n", style("Pages").underlined()));
    out.push_str(&render_entries(&detail.pages, "No pages."));
    out
}

pub fn render_blocks(blocks: &[Block]) -> String {
    if blocks.is_empty() {
        return format!("{}\n", style("No blocks.").dim());
    }
    blocks
        .iter()
        .map(|b| {
            format!(
                "{:>4} {:<10} {}  {}\n",
                style(b.position).dim(),
                style(truncate_to_width(&b.block_type, 10)).cyan(),
                b.content,
                style(b.id).dim()
            )
        })
        .collect::<Vec<_>>()
        .concat()
}

pub fn render_search(hits: &[SearchHit]) -> String {
    if hits.is_empty() {
        return format!("{}\n", style("No matches.").dim());
    }
    hits.iter()
        .map(|hit| {
            let marker = match hit.rank {
                MatchRank::ExactTitle => "=",
                MatchRank::Title => "~",
                MatchRank::Description => ".",
            };
            format!("{} {}", style(marker).yellow(), entry_line(&hit.entry, 0))
        })
        .collect::<Vec<_>>()
        .concat()
}

pub fn render_trash_outcome(action: &str, outcome: &TrashOutcome) -> String {
    let mut line = format!("{} {} '{}'", action, outcome.entry.kind, outcome.entry.title);
    if outcome.blocks_affected > 0 {
        line.push_str(&format!(" ({} blocks)", outcome.blocks_affected));
    }
    format!("{}\n", style(line).green())
}

pub fn render_purge(outcome: &PurgeOutcome) -> String {
    let line = format!(
        "Permanently deleted {} {} and {} {}",
        outcome.entries_deleted,
        plural(outcome.entries_deleted, "entry", "entries"),
        outcome.blocks_deleted,
        plural(outcome.blocks_deleted, "block", "blocks"),
    );
    format!("{}\n", style(line).red())
}

pub fn render_saved(verb: &str, entry: &Entry) -> String {
    format!(
        "{} {} '{}'  {}\n",
        style(verb).green(),
        entry.kind,
        entry.title,
        style(entry.id).dim()
    )
}

fn plural<'a>(n: usize, one: &'a str, many: &'a str) -> &'a str {
    if n == 1 {
        one
    } else {
        many
    }
}

fn entry_line(entry: &Entry, depth: usize) -> String {
    let indent = "  ".repeat(depth);
    let marker = match entry.kind {
        EntryKind::Page => style("·").dim(),
        EntryKind::Folder => style("▸").cyan(),
    };

    // indent + marker + space, two gaps, id, time
    let fixed = indent.width() + 2 + 2 + ID_WIDTH + 1 + TIME_WIDTH;
    let available = LINE_WIDTH.saturating_sub(fixed);
    let title = truncate_to_width(&entry.title, available);
    let padding = " ".repeat(available.saturating_sub(title.width()));

    let title = match entry.kind {
        EntryKind::Folder => style(title).bold(),
        EntryKind::Page => style(title),
    };
    format!(
        "{}{} {}{}  {} {}\n",
        indent,
        marker,
        title,
        padding,
        style(entry.id).dim(),
        style(format_time_ago(entry.updated_at)).dim()
    )
}

/// Cuts `text` to at most `max` columns, ending with an ellipsis when shortened.
pub fn truncate_to_width(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    if max == 0 {
        return String::new();
    }
    let budget = max - ELLIPSIS.width().unwrap_or(1);
    let mut out = String::new();
    let mut used = 0;
    for ch in text.chars() {
        let w = ch.width().unwrap_or(0);
        if used + w > budget {
            break;
        }
        used += w;
        out.push(ch);
    }
    out.push(ELLIPSIS);
    out
}

fn format_time_ago(timestamp: DateTime<Utc>) -> String {
    let duration = Utc::now().signed_duration_since(timestamp);
    let formatter = timeago::Formatter::new();
    let time_str = formatter.convert(duration.to_std().unwrap_or_default());
    format!("{:>width$}", time_str, width = TIME_WIDTH)
}
