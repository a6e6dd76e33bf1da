//! Root, expansion and selection handlers

use gx_core::prelude::*;
use gx_core::{TypeDescriptor, Value};

use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::search::{Direction, SearchOutcome};
use crate::state::AppState;
use crate::tree::{NodeId, ObjectTree};

use super::{rejected, UpdateResult};

/// Borrow the tree or bail out of the handler with a rejection.
macro_rules! tree_or_reject {
    ($state:expr) => {
        match $state.tree.as_mut() {
            Some(tree) => tree,
            None => return $crate::handler::rejected(::gx_core::Error::NoRoot),
        }
    };
}

pub(crate) use tree_or_reject;

pub fn handle_load_root(
    state: &mut AppState,
    name: String,
    value: Value,
    declared_type: TypeDescriptor,
) -> UpdateResult {
    // The old tree goes away with its transient expansions
    let interrupted = state.search.take().map(|active| {
        info!("Root replaced while searching, dropping the search");
        EngineEvent::SearchFinished {
            text: active.cursor.options().text.clone(),
            outcome: SearchOutcome::Aborted {
                steps: active.cursor.steps(),
            },
            breadcrumb: None,
        }
    });

    let tree = ObjectTree::new(
        name,
        value,
        declared_type,
        state.settings.display.format_options(),
    );
    state.replace_tree(tree);

    match interrupted {
        Some(event) => UpdateResult::notify(event),
        None => UpdateResult::none(),
    }
}

pub fn handle_expand(state: &mut AppState, id: NodeId) -> UpdateResult {
    // Children loaded now could sit below a transient expansion and be
    // released when the walk moves on
    if state.is_searching() {
        return rejected(Error::SearchInProgress);
    }
    let tree = tree_or_reject!(state);
    match tree.expand(id) {
        Ok(()) => UpdateResult::none(),
        Err(e) => rejected(e),
    }
}

pub fn handle_collapse(state: &mut AppState, id: NodeId) -> UpdateResult {
    let tree = tree_or_reject!(state);
    match tree.collapse(id) {
        Ok(()) => UpdateResult::none(),
        Err(e) => rejected(e),
    }
}

pub fn handle_unload(state: &mut AppState, id: NodeId) -> UpdateResult {
    // A running search may be positioned inside the subtree
    if state.is_searching() {
        return rejected(Error::SearchInProgress);
    }
    let tree = tree_or_reject!(state);
    match tree.unload(id) {
        Ok(_) => UpdateResult::none(),
        Err(e) => rejected(e),
    }
}

/// Record the selection now; highlighting runs as deferred work.
pub fn handle_select(state: &mut AppState, id: NodeId) -> UpdateResult {
    let tree = tree_or_reject!(state);
    match tree.select(id) {
        Ok(()) => UpdateResult::defer(Message::ApplyHighlight),
        Err(e) => rejected(e),
    }
}

pub fn handle_clear_selection(state: &mut AppState) -> UpdateResult {
    if let Some(tree) = state.tree.as_mut() {
        tree.clear_selection();
    }
    UpdateResult::none()
}

pub fn handle_apply_highlight(state: &mut AppState) -> UpdateResult {
    let Some(tree) = state.tree.as_mut() else {
        return UpdateResult::none();
    };
    if tree.selection().is_none() {
        return UpdateResult::none();
    }
    let count = tree.apply_highlight();
    UpdateResult::notify(EngineEvent::HighlightApplied { count })
}

pub fn handle_clear_highlights(state: &mut AppState) -> UpdateResult {
    if let Some(tree) = state.tree.as_mut() {
        tree.clear_highlights();
    }
    UpdateResult::none()
}

pub fn handle_find_equal(state: &mut AppState, direction: Direction) -> UpdateResult {
    let tree = tree_or_reject!(state);
    match tree.find_equal(direction) {
        Some(id) => UpdateResult::message(Message::Select(id)),
        None => {
            debug!("No other visible node holds the selected value");
            UpdateResult::none()
        }
    }
}
