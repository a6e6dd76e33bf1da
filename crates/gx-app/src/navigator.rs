//! TreeNavigator - pre-order stepping over the lazy tree
//!
//! Stepping may load children purely to walk through them; such nodes are
//! flagged `expanded_transiently` and unloaded again once the walk leaves
//! their subtree. Every transiently expanded node is therefore a strict
//! ancestor of the node the walk is positioned at.

use gx_core::prelude::*;
use gx_core::Value;

use crate::materialize::NodeOrigin;
use crate::search::Direction;
use crate::tree::{Node, NodeId, ObjectTree};

/// Whether a walk may descend into `node`.
///
/// Markers, method results, failures and objects opaque to search are
/// walked as leaves.
pub fn can_traverse(node: &Node) -> bool {
    node.expandable
        && !node.classification.blocks_traversal()
        && node.origin != NodeOrigin::Method
        && !node.value.is_failure()
        && !matches!(&node.value, Value::Object(obj) if obj.opaque_to_search())
}

/// Stateful stepping helper borrowing the tree for the duration of a walk.
pub struct TreeNavigator<'t> {
    tree: &'t mut ObjectTree,
    expand_nodes: bool,
}

impl<'t> TreeNavigator<'t> {
    /// With `expand_nodes` false only already expanded subtrees are walked
    /// and nothing is loaded.
    pub fn new(tree: &'t mut ObjectTree, expand_nodes: bool) -> Self {
        Self { tree, expand_nodes }
    }

    pub fn tree(&self) -> &ObjectTree {
        &*self.tree
    }

    pub fn step(&mut self, direction: Direction, from: NodeId) -> Result<NodeId> {
        match direction {
            Direction::Forward => self.step_forward(from),
            Direction::Backward => self.step_backward(from),
        }
    }

    /// Next node in pre-order; the root after the last node.
    pub fn step_forward(&mut self, from: NodeId) -> Result<NodeId> {
        if let Some(child) = self.descend(from, Edge::First)? {
            return Ok(child);
        }

        let mut current = from;
        loop {
            let Some(parent) = self.tree.parent(current) else {
                return Ok(current);
            };
            if let Some(next) = self.tree.next_sibling(current) {
                return Ok(next);
            }
            self.retract(parent)?;
            current = parent;
        }
    }

    /// Previous node in pre-order; the deepest last descendant of the root
    /// when stepping back from the root.
    pub fn step_backward(&mut self, from: NodeId) -> Result<NodeId> {
        let Some(parent) = self.tree.node(from)?.parent else {
            return self.last_descendant(from);
        };
        if let Some(prev) = self.tree.prev_sibling(from) {
            return self.last_descendant(prev);
        }
        self.retract(parent)?;
        Ok(parent)
    }

    fn last_descendant(&mut self, id: NodeId) -> Result<NodeId> {
        let mut current = id;
        while let Some(child) = self.descend(current, Edge::Last)? {
            current = child;
        }
        Ok(current)
    }

    /// First or last child of `id` if the walk may enter it, loading the
    /// children transiently when allowed.
    fn descend(&mut self, id: NodeId, edge: Edge) -> Result<Option<NodeId>> {
        let node = self.tree.node(id)?;
        if !can_traverse(node) {
            return Ok(None);
        }

        if !self.expand_nodes {
            if !node.expanded {
                return Ok(None);
            }
            return Ok(edge.pick(node.children()));
        }

        if !node.children_loaded() {
            self.tree.load_children(id)?;
            let node = self.tree.node_mut(id)?;
            node.expanded_transiently = true;
            if node.children().is_empty() {
                self.retract(id)?;
                return Ok(None);
            }
        }

        Ok(edge.pick(self.tree.node(id)?.children()))
    }

    /// Unload `id` if it was only expanded for the walk.
    fn retract(&mut self, id: NodeId) -> Result<()> {
        if self.tree.node(id)?.expanded_transiently {
            trace!("Retracting transient expansion of node {}", id);
            self.tree.unload(id)?;
        }
        Ok(())
    }
}

/// Unload the outermost transiently expanded ancestor of `id`, which removes
/// every nested transient expansion with it.
pub fn retract_transient_ancestors(tree: &mut ObjectTree, id: NodeId) -> Result<()> {
    let outermost = tree
        .ancestors(id)
        .into_iter()
        .rev()
        .find(|ancestor| tree.get(*ancestor).is_some_and(|node| node.expanded_transiently));
    if let Some(ancestor) = outermost {
        tree.unload(ancestor)?;
    }
    Ok(())
}

#[derive(Debug, Clone, Copy)]
enum Edge {
    First,
    Last,
}

impl Edge {
    fn pick(self, children: &[NodeId]) -> Option<NodeId> {
        match self {
            Self::First => children.first().copied(),
            Self::Last => children.last().copied(),
        }
    }
}
