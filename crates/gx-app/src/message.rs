//! Message types for the application (TEA pattern)

use gx_core::{TypeDescriptor, Value};

use crate::search::{Direction, SearchOptions};
use crate::tree::NodeId;

/// All possible messages/actions in the application
#[derive(Debug, Clone)]
pub enum Message {
    // ─────────────────────────────────────────────────────────
    // Root
    // ─────────────────────────────────────────────────────────
    /// Replace the whole tree with a new root value
    LoadRoot {
        name: String,
        value: Value,
        declared_type: TypeDescriptor,
    },

    // ─────────────────────────────────────────────────────────
    // Tree
    // ─────────────────────────────────────────────────────────
    Expand(NodeId),
    Collapse(NodeId),
    /// Collapse and drop the children so they are rebuilt on next expand
    Unload(NodeId),

    // ─────────────────────────────────────────────────────────
    // Selection / Highlight
    // ─────────────────────────────────────────────────────────
    Select(NodeId),
    ClearSelection,
    /// Highlight every materialized node whose value is the selected one
    ApplyHighlight,
    ClearHighlights,
    /// Select the next/previous visible node holding the selected value
    FindEqual(Direction),

    // ─────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────
    /// Begin a search at `start`, the selection, or the root (in that order)
    StartSearch {
        start: Option<NodeId>,
        options: SearchOptions,
    },
    /// Run the next slice of the active search; stale generations are dropped
    ContinueSearch { generation: u64 },
    CancelSearch,
}
