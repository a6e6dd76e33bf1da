//! HighlightBroadcaster - marks nodes equal to the selected value
//!
//! The selection belongs to the [`ObjectTree`] it was made in, so loading a
//! new root resets it. Selecting is split in two: [`ObjectTree::select`]
//! clears stale decoration and records the value right away, while
//! [`ObjectTree::apply_highlight`] walks the materialized tree and is run
//! as deferred work.

use gx_core::prelude::*;
use gx_core::Value;

use crate::search::Direction;
use crate::tree::{NodeId, ObjectTree};

/// The currently selected node and the value it held when selected.
#[derive(Debug, Clone)]
pub struct Selection {
    pub node: NodeId,
    pub value: Value,
}

impl ObjectTree {
    pub fn selection(&self) -> Option<&Selection> {
        self.selection.as_ref()
    }

    /// Record a new selection. Clears every highlight and selection-path
    /// mark first, then marks the ancestors of `id`.
    ///
    /// Nothing is expanded.
    pub fn select(&mut self, id: NodeId) -> Result<()> {
        let value = self.node(id)?.value.clone();
        self.clear_highlights();
        for ancestor in self.ancestors(id) {
            self.node_mut(ancestor)?.on_selection_path = true;
        }
        self.selection = Some(Selection { node: id, value });
        Ok(())
    }

    pub fn clear_selection(&mut self) {
        self.clear_highlights();
        self.selection = None;
    }

    /// Drop highlight and selection-path marks from every materialized node.
    pub fn clear_highlights(&mut self) {
        for node in self.nodes_mut() {
            node.highlighted = false;
            node.on_selection_path = false;
        }
    }

    /// Highlight every materialized node other than the selected one whose
    /// value equals the selection. Returns the number of highlighted nodes.
    pub fn apply_highlight(&mut self) -> usize {
        let Some(Selection { node: selected, value }) = self.selection.clone() else {
            return 0;
        };
        let mut count = 0;
        for node in self.nodes_mut() {
            let equal = node.id != selected && node.value.same_as(&value);
            node.highlighted = equal;
            if equal {
                count += 1;
            }
        }
        trace!("Highlighted {} nodes equal to the selection", count);
        count
    }

    /// Check freshly loaded children against the current selection.
    pub(crate) fn mark_loaded_children(&mut self, ids: &[NodeId]) {
        let Some(selection) = self.selection.clone() else {
            return;
        };
        for id in ids {
            if let Ok(node) = self.node_mut(*id) {
                node.highlighted = *id != selection.node && node.value.same_as(&selection.value);
            }
        }
    }

    /// Step circularly through the visible rows from the selection to the
    /// next (or previous) row holding an equal value.
    ///
    /// `None` without a selection, for a null selection, and when no other
    /// visible row matches.
    pub fn find_equal(&self, direction: Direction) -> Option<NodeId> {
        let selection = self.selection.as_ref()?;
        if selection.value.is_null() {
            return None;
        }

        let rows = self.visible_rows();
        if rows.is_empty() {
            return None;
        }
        let len = rows.len();
        let start = rows.iter().position(|(id, _)| *id == selection.node);

        for offset in 1..=len {
            let index = match (direction, start) {
                (Direction::Forward, Some(pos)) => (pos + offset) % len,
                (Direction::Forward, None) => offset - 1,
                (Direction::Backward, Some(pos)) => (pos + len - offset % len) % len,
                (Direction::Backward, None) => len - offset,
            };
            let (id, _) = rows[index];
            if id == selection.node {
                continue;
            }
            if self
                .get(id)
                .is_some_and(|node| node.value.same_as(&selection.value))
            {
                return Some(id);
            }
        }
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;

    /// Expand root, `Left` and `Right`; returns the two `Shared` nodes.
    fn expanded_shared_tree() -> (ObjectTree, NodeId, NodeId) {
        let mut tree = shared_tree();
        let root = tree.root();
        tree.expand(root).unwrap();
        let left = tree.child_named(root, "Left").unwrap();
        let right = tree.child_named(root, "Right").unwrap();
        tree.expand(left).unwrap();
        tree.expand(right).unwrap();
        let a = tree.child_named(left, "Shared").unwrap();
        let b = tree.child_named(right, "Shared").unwrap();
        (tree, a, b)
    }

    #[test]
    fn test_select_highlights_equal_values() {
        let (mut tree, a, b) = expanded_shared_tree();
        tree.select(a).unwrap();
        let count = tree.apply_highlight();

        assert_eq!(count, 1);
        assert!(tree.node(b).unwrap().highlighted);
        assert!(!tree.node(a).unwrap().highlighted);
    }

    #[test]
    fn test_new_selection_clears_previous_highlight_without_matches() {
        let (mut tree, a, b) = expanded_shared_tree();
        tree.select(a).unwrap();
        tree.apply_highlight();
        assert!(tree.node(b).unwrap().highlighted);

        let root = tree.root();
        let unique = tree.child_named(root, "Title").unwrap();
        tree.select(unique).unwrap();
        // Cleared synchronously, before the deferred walk
        assert!(!tree.node(b).unwrap().highlighted);

        let count = tree.apply_highlight();
        assert_eq!(count, 0);
        assert!(tree
            .materialized()
            .iter()
            .all(|id| !tree.node(*id).unwrap().highlighted));
    }

    #[test]
    fn test_selection_path_marks_ancestors() {
        let (mut tree, a, _) = expanded_shared_tree();
        tree.select(a).unwrap();
        let left = tree.parent(a).unwrap();
        assert!(tree.node(left).unwrap().on_selection_path);
        assert!(tree.node(tree.root()).unwrap().on_selection_path);
        assert!(!tree.node(a).unwrap().on_selection_path);
    }

    #[test]
    fn test_select_does_not_expand() {
        let mut tree = shared_tree();
        let root = tree.root();
        tree.expand(root).unwrap();
        let left = tree.child_named(root, "Left").unwrap();
        let before = tree.len();
        tree.select(left).unwrap();
        tree.apply_highlight();
        assert_eq!(tree.len(), before);
    }

    #[test]
    fn test_loaded_children_are_checked_against_selection() {
        let mut tree = shared_tree();
        let root = tree.root();
        tree.expand(root).unwrap();
        let left = tree.child_named(root, "Left").unwrap();
        let right = tree.child_named(root, "Right").unwrap();
        tree.expand(left).unwrap();
        let a = tree.child_named(left, "Shared").unwrap();
        tree.select(a).unwrap();
        tree.apply_highlight();

        tree.expand(right).unwrap();
        let b = tree.child_named(right, "Shared").unwrap();
        assert!(tree.node(b).unwrap().highlighted);
    }

    #[test]
    fn test_find_equal_steps_circularly() {
        let (mut tree, a, b) = expanded_shared_tree();
        tree.select(a).unwrap();
        assert_eq!(tree.find_equal(Direction::Forward), Some(b));
        assert_eq!(tree.find_equal(Direction::Backward), Some(b));

        tree.select(b).unwrap();
        assert_eq!(tree.find_equal(Direction::Forward), Some(a));
    }

    #[test]
    fn test_find_equal_none_when_only_self_matches() {
        let (mut tree, _, _) = expanded_shared_tree();
        let title = tree.child_named(tree.root(), "Title").unwrap();
        tree.select(title).unwrap();
        assert_eq!(tree.find_equal(Direction::Forward), None);
        assert_eq!(tree.find_equal(Direction::Backward), None);
    }

    #[test]
    fn test_find_equal_without_selection() {
        let (tree, _, _) = expanded_shared_tree();
        assert_eq!(tree.find_equal(Direction::Forward), None);
    }
}
