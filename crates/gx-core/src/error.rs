//! Application error types with rich context
//!
//! Nothing in tree materialization returns these: a failed member read is a
//! [`crate::MemberError`] *value* rendered inline. The variants below cover
//! API misuse (stale node ids), search requests, configuration and reading
//! input documents.

use thiserror::Error;

/// Result type alias using our Error type
pub type Result<T> = std::result::Result<T, Error>;

/// Application error types organized by layer/domain
#[derive(Debug, Error)]
pub enum Error {
    // ─────────────────────────────────────────────────────────────
    // Common/Infrastructure Errors
    // ─────────────────────────────────────────────────────────────
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON parsing error: {0}")]
    Json(#[from] serde_json::Error),

    // ─────────────────────────────────────────────────────────────
    // Tree Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Node {id} is not materialized in the current tree")]
    UnknownNode { id: u64 },

    #[error("No root value has been loaded")]
    NoRoot,

    #[error("Node {id} cannot be expanded")]
    NotExpandable { id: u64 },

    #[error("Node {id} has no child named {name:?}")]
    NoSuchChild { id: u64, name: String },

    // ─────────────────────────────────────────────────────────────
    // Search Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Search text must not be empty")]
    EmptySearchText,

    #[error("A search is already in progress")]
    SearchInProgress,

    // ─────────────────────────────────────────────────────────────
    // Configuration Errors
    // ─────────────────────────────────────────────────────────────
    #[error("Configuration error: {message}")]
    Config { message: String },
}

// ─────────────────────────────────────────────────────────────────
// Convenience Constructors
// ─────────────────────────────────────────────────────────────────

impl Error {
    pub fn unknown_node(id: u64) -> Self {
        Self::UnknownNode { id }
    }

    pub fn not_expandable(id: u64) -> Self {
        Self::NotExpandable { id }
    }

    pub fn no_such_child(id: u64, name: impl Into<String>) -> Self {
        Self::NoSuchChild {
            id,
            name: name.into(),
        }
    }

    pub fn config(message: impl Into<String>) -> Self {
        Self::Config {
            message: message.into(),
        }
    }
}
