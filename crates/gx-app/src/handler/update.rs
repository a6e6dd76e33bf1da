//! Main update function - handles state transitions (TEA pattern)

use crate::message::Message;
use crate::state::AppState;

use super::{search, tree, UpdateResult};

/// Process a message and update state
/// Returns optional follow-up message and/or action
pub fn update(state: &mut AppState, message: Message) -> UpdateResult {
    match message {
        Message::LoadRoot {
            name,
            value,
            declared_type,
        } => tree::handle_load_root(state, name, value, declared_type),

        Message::Expand(id) => tree::handle_expand(state, id),
        Message::Collapse(id) => tree::handle_collapse(state, id),
        Message::Unload(id) => tree::handle_unload(state, id),

        Message::Select(id) => tree::handle_select(state, id),
        Message::ClearSelection => tree::handle_clear_selection(state),
        Message::ApplyHighlight => tree::handle_apply_highlight(state),
        Message::ClearHighlights => tree::handle_clear_highlights(state),
        Message::FindEqual(direction) => tree::handle_find_equal(state, direction),

        Message::StartSearch { start, options } => {
            search::handle_start_search(state, start, options)
        }
        Message::ContinueSearch { generation } => {
            search::handle_continue_search(state, generation)
        }
        Message::CancelSearch => search::handle_cancel_search(state),
    }
}
