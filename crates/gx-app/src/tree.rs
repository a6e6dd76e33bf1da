//! Object tree - arena of materialized nodes
//!
//! Nodes live in a map keyed by [`NodeId`]; children are id lists and the
//! parent link is an id, so a node never keeps its parent alive. Ids are
//! never reused within one tree: unloading a subtree and loading it again
//! yields fresh ids.

use std::collections::{BTreeSet, HashMap};
use std::fmt;

use gx_core::prelude::*;
use gx_core::{
    Classification, ElementLevel, FormatOptions, TypeDescriptor, TypeLabel, Value, ValueStyle,
};
use serde::Serialize;

use crate::children::enumerate_children;
use crate::highlight::Selection;
use crate::materialize::{materialize, AncestorPath, ChildSpec, Materialized, NodeOrigin};

/// Identifier of a materialized node within one [`ObjectTree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct NodeId(u64);

impl NodeId {
    pub fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// One materialized entry of the tree.
#[derive(Debug, Clone)]
pub struct Node {
    pub id: NodeId,
    pub name: String,
    pub origin: NodeOrigin,
    pub declared_type: TypeDescriptor,
    pub type_label: TypeLabel,
    pub value_text: String,
    pub classification: Classification,
    pub style: ValueStyle,
    pub expandable: bool,
    pub element_level: Option<ElementLevel>,
    /// Underlying value handle; the graph source owns the object
    pub value: Value,
    pub parent: Option<NodeId>,
    /// `None` until first load; always `None` for non-expandable nodes
    children: Option<Vec<NodeId>>,

    // ─────────────────────────────────────────────────────────
    // Presentation state
    // ─────────────────────────────────────────────────────────
    /// Expanded by the user (or revealed by a search hit)
    pub expanded: bool,
    /// Children were loaded only to let a search walk through them
    pub expanded_transiently: bool,
    pub highlighted: bool,
    /// Ancestor of the current selection
    pub on_selection_path: bool,
    /// Key member of its parent
    pub emphasized: bool,
}

impl Node {
    fn from_materialized(id: NodeId, parent: Option<NodeId>, m: Materialized) -> Self {
        Self {
            id,
            name: m.name,
            origin: m.origin,
            declared_type: m.declared_type,
            type_label: m.type_label,
            value_text: m.value_text,
            classification: m.classification,
            style: m.style,
            expandable: m.expandable,
            element_level: m.element_level,
            value: m.value,
            parent,
            children: None,
            expanded: false,
            expanded_transiently: false,
            highlighted: false,
            on_selection_path: false,
            emphasized: m.emphasized,
        }
    }

    /// Loaded children, empty when not loaded.
    pub fn children(&self) -> &[NodeId] {
        self.children.as_deref().unwrap_or(&[])
    }

    pub fn children_loaded(&self) -> bool {
        self.children.is_some()
    }

    pub fn runtime_type_differs(&self) -> bool {
        self.type_label.runtime_differs()
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }
}

/// The lazily materialized tree for one root value.
///
/// Loading a new root means building a new `ObjectTree`; the selection and
/// every node id belong to a single tree.
#[derive(Debug)]
pub struct ObjectTree {
    nodes: HashMap<NodeId, Node>,
    root: NodeId,
    next_id: u64,
    options: FormatOptions,
    pub(crate) selection: Option<Selection>,
}

impl ObjectTree {
    /// Materialize the root node from an externally supplied value.
    pub fn new(
        name: impl Into<String>,
        value: Value,
        declared_type: TypeDescriptor,
        options: FormatOptions,
    ) -> Self {
        let root = NodeId(0);
        let m = materialize(
            ChildSpec::root(name, value, declared_type),
            &AncestorPath::new(),
            &options,
        );
        let mut nodes = HashMap::new();
        nodes.insert(root, Node::from_materialized(root, None, m));
        info!("Materialized root node");
        Self {
            nodes,
            root,
            next_id: 1,
            options,
            selection: None,
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    pub fn get(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(&id)
    }

    /// Like [`Self::get`] but reports a stale id as an error.
    pub fn node(&self, id: NodeId) -> Result<&Node> {
        self.nodes.get(&id).ok_or_else(|| Error::unknown_node(id.get()))
    }

    pub(crate) fn node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.nodes.get_mut(&id).ok_or_else(|| Error::unknown_node(id.get()))
    }

    pub(crate) fn nodes_mut(&mut self) -> impl Iterator<Item = &mut Node> {
        self.nodes.values_mut()
    }

    pub fn contains(&self, id: NodeId) -> bool {
        self.nodes.contains_key(&id)
    }

    /// Number of materialized nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Ids of every materialized node.
    pub fn materialized(&self) -> BTreeSet<NodeId> {
        self.nodes.keys().copied().collect()
    }

    pub fn format_options(&self) -> &FormatOptions {
        &self.options
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.nodes.get(&id).and_then(|node| node.parent)
    }

    /// Ancestors of `id`, nearest first, root last.
    pub fn ancestors(&self, id: NodeId) -> Vec<NodeId> {
        let mut out = Vec::new();
        let mut current = self.parent(id);
        while let Some(ancestor) = current {
            out.push(ancestor);
            current = self.parent(ancestor);
        }
        out
    }

    // ─────────────────────────────────────────────────────────
    // Children
    // ─────────────────────────────────────────────────────────

    /// Load the children of an expandable node. Returns `true` if they were
    /// materialized by this call, `false` if already loaded or the node is a
    /// leaf.
    pub fn load_children(&mut self, id: NodeId) -> Result<bool> {
        let node = self.node(id)?;
        if !node.expandable || node.children_loaded() {
            return Ok(false);
        }
        let value = node.value.clone();

        // Root-first path including the node itself
        let mut chain = self.ancestors(id);
        chain.reverse();
        chain.push(id);
        let mut path = AncestorPath::new();
        for ancestor in chain {
            let entry = self.node(ancestor)?;
            path.push(entry.value.clone(), entry.element_level);
        }

        let specs = enumerate_children(&value);
        let mut ids = Vec::with_capacity(specs.len());
        for spec in specs {
            let m = materialize(spec, &path, &self.options);
            let child = NodeId(self.next_id);
            self.next_id += 1;
            self.nodes.insert(child, Node::from_materialized(child, Some(id), m));
            ids.push(child);
        }

        debug!("Loaded {} children for node {}", ids.len(), id);
        self.mark_loaded_children(&ids);
        self.node_mut(id)?.children = Some(ids);
        Ok(true)
    }

    /// Expand a node by user action: load children and show them.
    pub fn expand(&mut self, id: NodeId) -> Result<()> {
        if !self.node(id)?.expandable {
            return Err(Error::not_expandable(id.get()));
        }
        self.load_children(id)?;
        let node = self.node_mut(id)?;
        node.expanded = true;
        node.expanded_transiently = false;
        Ok(())
    }

    /// Hide children without releasing them.
    pub fn collapse(&mut self, id: NodeId) -> Result<()> {
        self.node_mut(id)?.expanded = false;
        Ok(())
    }

    /// Release the subtree below `id`. Returns the number of nodes dropped.
    pub fn unload(&mut self, id: NodeId) -> Result<usize> {
        let node = self.node_mut(id)?;
        node.expanded = false;
        node.expanded_transiently = false;
        let Some(children) = node.children.take() else {
            return Ok(0);
        };

        let mut removed = 0;
        let mut stack = children;
        while let Some(child) = stack.pop() {
            if let Some(mut node) = self.nodes.remove(&child) {
                removed += 1;
                if let Some(grandchildren) = node.children.take() {
                    stack.extend(grandchildren);
                }
            }
        }
        debug!("Unloaded {} nodes below node {}", removed, id);
        if self
            .selection
            .as_ref()
            .is_some_and(|selection| !self.nodes.contains_key(&selection.node))
        {
            debug!("Selection was inside the unloaded subtree, clearing it");
            self.clear_selection();
        }
        Ok(removed)
    }

    /// Mark every ancestor of `id` as persistently expanded.
    pub fn reveal(&mut self, id: NodeId) -> Result<()> {
        for ancestor in self.ancestors(id) {
            let node = self.node_mut(ancestor)?;
            node.expanded = true;
            node.expanded_transiently = false;
        }
        Ok(())
    }

    /// Pre-order `(id, depth)` rows shown by a shell: the root, then the
    /// children of expanded nodes.
    pub fn visible_rows(&self) -> Vec<(NodeId, usize)> {
        let mut rows = Vec::new();
        let mut stack = vec![(self.root, 0usize)];
        while let Some((id, depth)) = stack.pop() {
            let Some(node) = self.nodes.get(&id) else {
                continue;
            };
            rows.push((id, depth));
            if node.expanded {
                for child in node.children().iter().rev() {
                    stack.push((*child, depth + 1));
                }
            }
        }
        rows
    }

    // ─────────────────────────────────────────────────────────
    // Siblings
    // ─────────────────────────────────────────────────────────

    fn siblings(&self, id: NodeId) -> Option<(&[NodeId], usize)> {
        let parent = self.nodes.get(&self.parent(id)?)?;
        let siblings = parent.children();
        let index = siblings.iter().position(|s| *s == id)?;
        Some((siblings, index))
    }

    pub fn next_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, index) = self.siblings(id)?;
        siblings.get(index + 1).copied()
    }

    pub fn prev_sibling(&self, id: NodeId) -> Option<NodeId> {
        let (siblings, index) = self.siblings(id)?;
        index.checked_sub(1).map(|i| siblings[i])
    }

    /// Look up a loaded child by display name.
    pub fn child_named(&self, id: NodeId, name: &str) -> Option<NodeId> {
        self.nodes
            .get(&id)?
            .children()
            .iter()
            .copied()
            .find(|child| self.nodes.get(child).is_some_and(|node| node.name == name))
    }
}
