//! Handler module - TEA update function and message handlers
//!
//! Organized into submodules:
//! - `update`: Main update() function and message dispatch
//! - `tree`: Root loading, expansion and selection handlers
//! - `search`: Search lifecycle handlers

pub mod search;
pub mod tree;
pub mod update;


use std::fmt;

use gx_core::prelude::*;

use crate::engine_event::EngineEvent;
use crate::message::Message;

// Re-export main entry point
pub use update::update;

/// Actions that the event loop should perform after update
#[derive(Debug, Clone)]
pub enum UpdateAction {
    /// Queue a message behind everything already pending
    Defer(Message),

    /// Broadcast an event to subscribers
    Notify(EngineEvent),
}

/// Result of processing a message
#[derive(Debug, Default)]
pub struct UpdateResult {
    /// Optional follow-up message to process
    pub message: Option<Message>,
    /// Optional action for the event loop to perform
    pub action: Option<UpdateAction>,
}

impl UpdateResult {
    pub fn none() -> Self {
        Self::default()
    }

    pub fn message(msg: Message) -> Self {
        Self {
            message: Some(msg),
            action: None,
        }
    }

    pub fn action(action: UpdateAction) -> Self {
        Self {
            message: None,
            action: Some(action),
        }
    }

    pub fn notify(event: EngineEvent) -> Self {
        Self::action(UpdateAction::Notify(event))
    }

    pub fn defer(msg: Message) -> Self {
        Self::action(UpdateAction::Defer(msg))
    }

    /// Attach a follow-up message to this result.
    pub fn then(mut self, msg: Message) -> Self {
        self.message = Some(msg);
        self
    }
}

/// Report a message that could not be applied.
pub(crate) fn rejected(reason: impl fmt::Display) -> UpdateResult {
    warn!("Rejected message: {}", reason);
    UpdateResult::notify(EngineEvent::Rejected {
        message: reason.to_string(),
    })
}
