//! # Hierarchy
//!
//! Turns the flat list of entries returned by the store into a forest of
//! [`TreeNode`]s, following `parent_id` links.
//!
//! Rules:
//! - Entries without a parent are roots.
//! - Entries whose parent is not in the list (purged, trashed, or filtered out)
//!   are roots too. This is how orphans left behind by a folder purge show up.
//! - Siblings keep the order they had in the input list.
//! - Every entry appears exactly once. Moves keep the stored graph acyclic, but
//!   if a cycle is ever found, the first entry of the cycle (in input order) is
//!   promoted to a root and the rest of the cycle hangs below it.

use serde::Serialize;
use std::collections::{HashMap, HashSet};
use uuid::Uuid;

use crate::model::Entry;

#[derive(Debug, Clone, Serialize)]
pub struct TreeNode {
    pub entry: Entry,
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    /// Number of entries in this subtree, including the node itself.
    pub fn count(&self) -> usize {
        1 + self.children.iter().map(TreeNode::count).sum::<usize>()
    }
}

pub fn build_hierarchy(entries: Vec<Entry>) -> Vec<TreeNode> {
    let ids: HashSet<Uuid> = entries.iter().map(|e| e.id).collect();

    // Group entry positions by resolved parent; None holds the roots
    let mut parent_map: HashMap<Option<Uuid>, Vec<usize>> = HashMap::new();
    for (idx, entry) in entries.iter().enumerate() {
        let parent = entry.parent_id.filter(|p| ids.contains(p));
        parent_map.entry(parent).or_default().push(idx);
    }

    let mut slots: Vec<Option<Entry>> = entries.into_iter().map(Some).collect();
    let mut forest: Vec<TreeNode> = parent_map
        .get(&None)
        .cloned()
        .unwrap_or_default()
        .into_iter()
        .filter_map(|idx| build_node(idx, &mut slots, &parent_map))
        .collect();

    // Anything still unplaced sits on a cycle no root reaches
    for idx in 0..slots.len() {
        if let Some(node) = build_node(idx, &mut slots, &parent_map) {
            forest.push(node);
        }
    }
    forest
}

fn build_node(
    idx: usize,
    slots: &mut [Option<Entry>],
    parent_map: &HashMap<Option<Uuid>, Vec<usize>>,
) -> Option<TreeNode> {
    let entry = slots.get_mut(idx)?.take()?;
    let children = parent_map
        .get(&Some(entry.id))
        .map(|kids| {
            kids.iter()
                .filter_map(|&child| build_node(child, slots, parent_map))
                .collect()
        })
        .unwrap_or_default();
    Some(TreeNode { entry, children })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::OwnerId;

    fn owner() -> OwnerId {
        OwnerId::new("me")
    }

    fn page(title: &str, parent: Option<Uuid>) -> Entry {
        Entry::page(owner(), title, "").with_parent(parent)
    }

    fn titles(nodes: &[TreeNode]) -> Vec<&str> {
        nodes.iter().map(|n| n.entry.title.as_str()).collect()
    }

    #[test]
    fn nests_children_under_parents_in_input_order() {
        let folder = Entry::folder(owner(), "Work");
        let a = page("A", Some(folder.id));
        let b = page("B", Some(folder.id));
        let sub = page("A.1", Some(a.id));
        let loose = page("Loose", None);

        let forest = build_hierarchy(vec![folder, a, loose, b, sub]);

        assert_eq!(titles(&forest), vec!["Work", "Loose"]);
        assert_eq!(titles(&forest[0].children), vec!["A", "B"]);
        assert_eq!(titles(&forest[0].children[0].children), vec!["A.1"]);
        assert_eq!(forest[0].count(), 4);
    }

    #[test]
    fn unresolved_parents_become_roots() {
        let purged_folder = Uuid::new_v4();
        let orphan = page("P2", Some(purged_folder));

        let forest = build_hierarchy(vec![orphan]);

        assert_eq!(titles(&forest), vec!["P2"]);
        assert_eq!(forest[0].entry.parent_id, Some(purged_folder));
    }

    #[test]
    fn cycles_are_promoted_and_each_entry_appears_once() {
        let mut a = page("A", None);
        let mut b = page("B", None);
        a.parent_id = Some(b.id);
        b.parent_id = Some(a.id);
        let root = page("Root", None);
        let mut selfish = page("Self", None);
        selfish.parent_id = Some(selfish.id);

        let forest = build_hierarchy(vec![root, a, b, selfish]);

        assert_eq!(titles(&forest), vec!["Root", "A", "Self"]);
        assert_eq!(titles(&forest[1].children), vec!["B"]);
        assert!(forest[1].children[0].children.is_empty());
        assert!(forest[2].children.is_empty());
        let total: usize = forest.iter().map(TreeNode::count).sum();
        assert_eq!(total, 4);
    }

    #[test]
    fn empty_input_gives_empty_forest() {
        assert!(build_hierarchy(Vec::new()).is_empty());
    }
}
