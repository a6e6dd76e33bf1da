//! Headless mode - JSON event output for scripted use
//!
//! Search results are written as NDJSON (newline-delimited JSON), one event
//! per line. Each event has an "event" field indicating its type, along with
//! event-specific data.
//!
//! # Example Output
//!
//! ```json
//! {"event":"root_loaded","name":"model.json","value":"{3 fields}","failed":false,"timestamp":1704700001000}
//! {"event":"search_found","text":"core","node":7,"breadcrumb":"Modules[0] \"core.dll\"","value":"core.dll","timestamp":1704700001004}
//! ```

pub mod runner;

use std::io::{self, Write};

use chrono::Utc;
use gx_app::{NodeId, ObjectTree};
use serde::Serialize;

/// Events emitted in headless mode
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum HeadlessEvent {
    /// The root value was materialized
    RootLoaded {
        name: String,
        value: String,
        failed: bool,
        timestamp: i64,
    },

    /// A search matched a node
    SearchFound {
        text: String,
        node: NodeId,
        breadcrumb: String,
        value: String,
        timestamp: i64,
    },

    /// A search returned to its start without a match
    SearchNotFound { text: String, timestamp: i64 },

    /// A search ran out of steps or was cancelled
    SearchAborted {
        text: String,
        steps: u64,
        timestamp: i64,
    },

    /// A request was rejected
    Error { message: String, timestamp: i64 },
}

impl HeadlessEvent {
    /// Write this event as one NDJSON line and flush.
    pub fn write_to(&self, out: &mut impl Write) -> io::Result<()> {
        let json = serde_json::to_string(self)?;
        writeln!(out, "{}", json)?;
        out.flush()
    }

    pub fn event_type(&self) -> &'static str {
        match self {
            Self::RootLoaded { .. } => "root_loaded",
            Self::SearchFound { .. } => "search_found",
            Self::SearchNotFound { .. } => "search_not_found",
            Self::SearchAborted { .. } => "search_aborted",
            Self::Error { .. } => "error",
        }
    }

    /// Get current timestamp in milliseconds
    fn now() -> i64 {
        Utc::now().timestamp_millis()
    }

    // ─────────────────────────────────────────────────────────
    // Convenience constructors
    // ─────────────────────────────────────────────────────────

    pub fn root_loaded(name: &str, value: &str, failed: bool) -> Self {
        Self::RootLoaded {
            name: name.to_string(),
            value: value.to_string(),
            failed,
            timestamp: Self::now(),
        }
    }

    /// Describe a match using the tree it was found in.
    pub fn search_found(text: &str, tree: &ObjectTree, node: NodeId, breadcrumb: String) -> Self {
        let value = tree
            .get(node)
            .map(|n| n.value_text.clone())
            .unwrap_or_default();
        Self::SearchFound {
            text: text.to_string(),
            node,
            breadcrumb,
            value,
            timestamp: Self::now(),
        }
    }

    pub fn search_not_found(text: &str) -> Self {
        Self::SearchNotFound {
            text: text.to_string(),
            timestamp: Self::now(),
        }
    }

    pub fn search_aborted(text: &str, steps: u64) -> Self {
        Self::SearchAborted {
            text: text.to_string(),
            steps,
            timestamp: Self::now(),
        }
    }

    pub fn error(message: &str) -> Self {
        Self::Error {
            message: message.to_string(),
            timestamp: Self::now(),
        }
    }
}
