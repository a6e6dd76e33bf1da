//! gx-app - Tree state, navigation, search and orchestration for Graph Explorer
//!
//! This crate materializes an object graph into a lazily loaded tree, walks
//! it for text search, broadcasts highlights for the selected value and runs
//! it all through a TEA (The Elm Architecture) update loop owned by the
//! [`Engine`].

pub mod breadcrumb;
pub mod children;
pub mod config;
pub mod engine;
pub mod engine_event;
pub mod handler;
pub mod highlight;
pub mod materialize;
pub mod message;
pub mod navigator;
pub mod search;
pub mod state;
pub mod tree;

#[cfg(test)]
mod test_support;

// Re-export primary types
pub use breadcrumb::breadcrumb;
pub use children::enumerate_children;
pub use config::{load_settings, Settings};
pub use engine::Engine;
pub use engine_event::EngineEvent;
pub use handler::{UpdateAction, UpdateResult};
pub use highlight::Selection;
pub use materialize::{materialize, AncestorPath, ChildSpec, NodeOrigin};
pub use message::Message;
pub use navigator::{can_traverse, TreeNavigator};
pub use search::{search, Direction, SearchCursor, SearchOptions, SearchOutcome, SearchProgress};
pub use state::AppState;
pub use tree::{Node, NodeId, ObjectTree};
