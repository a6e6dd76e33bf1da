//! Application state (Model in TEA pattern)

use crate::config::Settings;
use crate::search::{SearchCursor, SearchOutcome};
use crate::tree::{NodeId, ObjectTree};

/// A search between slices.
#[derive(Debug)]
pub struct ActiveSearch {
    pub cursor: SearchCursor,
    /// Bumped per search so a queued `ContinueSearch` of a finished or
    /// cancelled search is ignored
    pub generation: u64,
}

/// Complete application state
#[derive(Debug, Default)]
pub struct AppState {
    /// The explored graph; `None` until a root is loaded
    pub tree: Option<ObjectTree>,

    pub settings: Settings,

    pub search: Option<ActiveSearch>,

    pub last_outcome: Option<SearchOutcome>,

    /// Incremented each time a root is loaded
    pub root_generation: u64,

    search_generation: u64,
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_settings(settings: Settings) -> Self {
        Self {
            settings,
            ..Self::default()
        }
    }

    pub fn selected(&self) -> Option<NodeId> {
        self.tree
            .as_ref()
            .and_then(|tree| tree.selection())
            .map(|selection| selection.node)
    }

    pub fn is_searching(&self) -> bool {
        self.search.is_some()
    }

    /// Install `tree`, dropping any running search.
    pub fn replace_tree(&mut self, tree: ObjectTree) {
        self.tree = Some(tree);
        self.search = None;
        self.last_outcome = None;
        self.root_generation += 1;
    }

    pub(crate) fn begin_search(&mut self, cursor: SearchCursor) -> u64 {
        self.search_generation += 1;
        self.search = Some(ActiveSearch {
            cursor,
            generation: self.search_generation,
        });
        self.search_generation
    }
}
