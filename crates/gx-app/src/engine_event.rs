//! Domain events emitted by the Engine for external consumers
//!
//! Events are broadcast after each message processing cycle via
//! `Engine::subscribe()`. A presentation shell or the headless runner reads
//! them instead of polling the tree.

use crate::search::{Direction, SearchOutcome};
use crate::tree::NodeId;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EngineEvent {
    // ─────────────────────────────────────────────────────────
    // Tree
    // ─────────────────────────────────────────────────────────
    /// A new root was installed; every previous node id is invalid
    RootLoaded {
        root: NodeId,
        name: String,
        value_text: String,
        failed: bool,
    },

    // ─────────────────────────────────────────────────────────
    // Selection / Highlight
    // ─────────────────────────────────────────────────────────
    SelectionChanged {
        node: Option<NodeId>,
        breadcrumb: String,
    },

    HighlightApplied { count: usize },

    // ─────────────────────────────────────────────────────────
    // Search
    // ─────────────────────────────────────────────────────────
    SearchStarted {
        text: String,
        start: NodeId,
        direction: Direction,
    },

    SearchFinished {
        text: String,
        outcome: SearchOutcome,
        /// Breadcrumb of the matching node
        breadcrumb: Option<String>,
    },

    // ─────────────────────────────────────────────────────────
    // Errors
    // ─────────────────────────────────────────────────────────
    /// A message could not be applied; state is unchanged
    Rejected { message: String },
}

impl EngineEvent {
    /// Short label for logging.
    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RootLoaded { .. } => "root_loaded",
            Self::SelectionChanged { .. } => "selection_changed",
            Self::HighlightApplied { .. } => "highlight_applied",
            Self::SearchStarted { .. } => "search_started",
            Self::SearchFinished { .. } => "search_finished",
            Self::Rejected { .. } => "rejected",
        }
    }
}
