//! Search lifecycle handlers
//!
//! The first slice of a search runs in the cycle that starts it; every
//! further slice is deferred behind pending messages so a shell stays
//! responsive while a large graph is walked.

use gx_core::prelude::*;

use crate::breadcrumb::breadcrumb;
use crate::engine_event::EngineEvent;
use crate::message::Message;
use crate::search::{SearchCursor, SearchOptions, SearchOutcome, SearchProgress};
use crate::state::AppState;
use crate::tree::NodeId;

use super::tree::tree_or_reject;
use super::{rejected, UpdateResult};

pub fn handle_start_search(
    state: &mut AppState,
    start: Option<NodeId>,
    options: SearchOptions,
) -> UpdateResult {
    if state.is_searching() {
        return rejected(Error::SearchInProgress);
    }
    let start = start.or_else(|| state.selected());
    let max_steps = state.settings.search.max_steps;
    let tree = tree_or_reject!(state);

    let cursor = match SearchCursor::new(tree, start, options, max_steps) {
        Ok(cursor) => cursor,
        Err(e) => return rejected(e),
    };
    let event = EngineEvent::SearchStarted {
        text: cursor.options().text.clone(),
        start: cursor.start(),
        direction: cursor.options().direction,
    };
    info!(
        "Searching {:?} for {:?} from node {}",
        cursor.options().direction,
        cursor.options().text,
        cursor.start()
    );

    let generation = state.begin_search(cursor);
    UpdateResult::notify(event).then(Message::ContinueSearch { generation })
}

pub fn handle_continue_search(state: &mut AppState, generation: u64) -> UpdateResult {
    let Some(mut active) = state.search.take() else {
        debug!("Dropping slice of finished search {}", generation);
        return UpdateResult::none();
    };
    if active.generation != generation {
        debug!("Dropping slice of stale search {}", generation);
        state.search = Some(active);
        return UpdateResult::none();
    }

    let slice = state.settings.search.slice();
    let Some(tree) = state.tree.as_mut() else {
        return rejected(Error::NoRoot);
    };

    match active.cursor.advance(tree, slice) {
        Ok(SearchProgress::Pending { steps }) => {
            trace!("Search {} pending after {} steps", generation, steps);
            state.search = Some(active);
            UpdateResult::defer(Message::ContinueSearch { generation })
        }
        Ok(SearchProgress::Done(outcome)) => {
            finish(state, active.cursor.options().text.clone(), outcome)
        }
        Err(e) => {
            active.cursor.abort(tree);
            rejected(e)
        }
    }
}

pub fn handle_cancel_search(state: &mut AppState) -> UpdateResult {
    let Some(mut active) = state.search.take() else {
        return UpdateResult::none();
    };
    let Some(tree) = state.tree.as_mut() else {
        return UpdateResult::none();
    };
    let outcome = active.cursor.abort(tree);
    info!("Search for {:?} cancelled", active.cursor.options().text);
    finish(state, active.cursor.options().text.clone(), outcome)
}

/// Record the outcome and select a found node.
fn finish(state: &mut AppState, text: String, outcome: SearchOutcome) -> UpdateResult {
    state.last_outcome = Some(outcome);

    let found = match outcome {
        SearchOutcome::Found { node } => Some(node),
        _ => None,
    };
    let crumb = found.and_then(|node| {
        let tree = state.tree.as_ref()?;
        breadcrumb(tree, node).ok()
    });

    let result = UpdateResult::notify(EngineEvent::SearchFinished {
        text,
        outcome,
        breadcrumb: crumb,
    });
    match found {
        Some(node) => result.then(Message::Select(node)),
        None => result,
    }
}
