//! Headless mode runner - drives the engine without a presentation shell
//!
//! `dump` renders the tree as indented text; `find` runs searches and
//! reports each outcome as a [`HeadlessEvent`].

use std::io::Write;
use std::path::Path;

use gx_app::config::SearchSettings;
use gx_app::{
    Direction, Engine, EngineEvent, Message, NodeId, ObjectTree, SearchOptions, SearchOutcome,
};
use gx_core::prelude::*;
use tokio::sync::broadcast::{self, error::TryRecvError};

use super::HeadlessEvent;
use crate::loader::{load_path, LoadedRoot};

/// Parameters of `gx <FILE> dump`.
#[derive(Debug, Clone, Default)]
pub struct DumpRequest {
    /// Child names leading from the root to the node to dump
    pub path: Vec<String>,
    /// Levels expanded below that node
    pub depth: usize,
}

/// Parameters of `gx <FILE> find`.
#[derive(Debug, Clone)]
pub struct FindRequest {
    pub text: String,
    pub backward: bool,
    pub case_sensitive: bool,
    pub no_expand: bool,
    /// Number of consecutive searches, each continuing after the last match
    pub repeat: usize,
}

impl FindRequest {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            backward: false,
            case_sensitive: false,
            no_expand: false,
            repeat: 1,
        }
    }

    /// Command-line flags layered over the configured defaults.
    pub fn options(&self, defaults: &SearchSettings) -> SearchOptions {
        let mut options = defaults.options_for(self.text.clone());
        if self.backward {
            options = options.direction(Direction::Backward);
        }
        if self.case_sensitive {
            options = options.case_sensitive(true);
        }
        if self.no_expand {
            options = options.expand_while_searching(false);
        }
        options
    }
}

fn banner(mode: &str, file: &Path) {
    info!("═══════════════════════════════════════════════════════");
    info!("Graph Explorer starting in HEADLESS {} mode", mode);
    info!("File: {}", file.display());
    info!("═══════════════════════════════════════════════════════");
}

/// Load `file` and print its tree.
pub fn run_dump(
    file: &Path,
    config_dir: &Path,
    request: &DumpRequest,
    out: &mut impl Write,
) -> Result<()> {
    banner("dump", file);
    let mut engine = Engine::new(config_dir);
    dump(&mut engine, load_path(file), request, out)
}

/// Load `file` and run the requested searches.
pub async fn run_find(
    file: &Path,
    config_dir: &Path,
    request: &FindRequest,
    out: &mut impl Write,
) -> Result<Vec<SearchOutcome>> {
    banner("find", file);
    let mut engine = Engine::new(config_dir);
    let outcomes = find(&mut engine, load_path(file), request, out).await?;
    info!("Graph Explorer headless mode exiting");
    Ok(outcomes)
}

// ─────────────────────────────────────────────────────────────────
// Dump
// ─────────────────────────────────────────────────────────────────

pub fn dump(
    engine: &mut Engine,
    root: LoadedRoot,
    request: &DumpRequest,
    out: &mut impl Write,
) -> Result<()> {
    engine.process_message(root.into_message());
    engine.drain_pending_messages();

    let mut current = tree(engine)?.root();
    for name in &request.path {
        expand(engine, current);
        current = tree(engine)?
            .child_named(current, name)
            .ok_or_else(|| Error::no_such_child(current.get(), name.as_str()))?;
    }

    expand_to_depth(engine, current, request.depth)?;
    let tree = tree(engine)?;
    let mut stack = vec![(current, 0usize)];
    while let Some((id, depth)) = stack.pop() {
        let node = tree.node(id)?;
        writeln!(out, "{}", render_row(tree, id, depth)?)?;
        if node.expanded {
            for child in node.children().iter().rev() {
                stack.push((*child, depth + 1));
            }
        }
    }
    Ok(())
}

fn tree(engine: &Engine) -> Result<&ObjectTree> {
    engine.state.tree.as_ref().ok_or(Error::NoRoot)
}

fn expand(engine: &mut Engine, id: NodeId) {
    let expandable = engine
        .state
        .tree
        .as_ref()
        .and_then(|tree| tree.get(id))
        .is_some_and(|node| node.expandable);
    if expandable {
        engine.process_message(Message::Expand(id));
    }
}

fn expand_to_depth(engine: &mut Engine, id: NodeId, depth: usize) -> Result<()> {
    let mut frontier = vec![id];
    for _ in 0..depth {
        let mut next = Vec::new();
        for id in frontier {
            expand(engine, id);
            next.extend_from_slice(tree(engine)?.node(id)?.children());
        }
        frontier = next;
    }
    Ok(())
}

/// One dump line: `[+]` collapsed, `[-]` expanded, `[ ]` leaf.
fn render_row(tree: &ObjectTree, id: NodeId, depth: usize) -> Result<String> {
    let node = tree.node(id)?;
    let marker = match (node.expandable, node.expanded) {
        (false, _) => "[ ]",
        (true, true) => "[-]",
        (true, false) => "[+]",
    };
    Ok(format!(
        "{}{} {}: {} = {}",
        "  ".repeat(depth),
        marker,
        node.name,
        node.type_label,
        node.value_text
    ))
}

// ─────────────────────────────────────────────────────────────────
// Find
// ─────────────────────────────────────────────────────────────────

pub async fn find(
    engine: &mut Engine,
    root: LoadedRoot,
    request: &FindRequest,
    out: &mut impl Write,
) -> Result<Vec<SearchOutcome>> {
    let mut rx = engine.subscribe();

    engine.send(root.into_message());
    engine.run_until_idle().await;
    forward_events(engine, &mut rx, out)?;

    let options = request.options(&engine.state.settings.search);
    let mut outcomes = Vec::new();
    for round in 0..request.repeat.max(1) {
        debug!("Search round {} for {:?}", round + 1, options.text);
        engine.send(Message::StartSearch {
            start: None,
            options: options.clone(),
        });
        engine.run_until_idle().await;

        let finished = forward_events(engine, &mut rx, out)?;
        let Some(outcome) = finished else {
            break;
        };
        outcomes.push(outcome);
        if !matches!(outcome, SearchOutcome::Found { .. }) {
            break;
        }
    }
    Ok(outcomes)
}

/// Write headless events for everything broadcast since the last call.
/// Returns the outcome of a search that finished in between.
fn forward_events(
    engine: &Engine,
    rx: &mut broadcast::Receiver<EngineEvent>,
    out: &mut impl Write,
) -> Result<Option<SearchOutcome>> {
    let mut finished = None;
    loop {
        let event = match rx.try_recv() {
            Ok(event) => event,
            Err(TryRecvError::Lagged(skipped)) => {
                warn!("Headless output skipped {} engine events", skipped);
                continue;
            }
            Err(TryRecvError::Empty) | Err(TryRecvError::Closed) => break,
        };

        let headless = match event {
            EngineEvent::RootLoaded {
                name,
                value_text,
                failed,
                ..
            } => HeadlessEvent::root_loaded(&name, &value_text, failed),
            EngineEvent::SearchFinished {
                text,
                outcome,
                breadcrumb,
            } => {
                finished = Some(outcome);
                match outcome {
                    SearchOutcome::Found { node } => HeadlessEvent::search_found(
                        &text,
                        tree(engine)?,
                        node,
                        breadcrumb.unwrap_or_default(),
                    ),
                    SearchOutcome::NotFound => HeadlessEvent::search_not_found(&text),
                    SearchOutcome::Aborted { steps } => HeadlessEvent::search_aborted(&text, steps),
                }
            }
            EngineEvent::Rejected { message } => HeadlessEvent::error(&message),
            other => {
                trace!("Not forwarded: {}", other.event_type());
                continue;
            }
        };
        headless.write_to(out)?;
    }
    Ok(finished)
}
