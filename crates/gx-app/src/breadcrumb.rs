//! Breadcrumb text for the status line of a presentation shell.
//!
//! Built from the selected node up to (but excluding) the root, e.g.
//! `Modules[0] "core.dll" / Types[2] "Program" / Name`.

use std::sync::OnceLock;

use gx_core::prelude::*;
use regex::Regex;

use crate::tree::{Node, NodeId, ObjectTree};

const SEPARATOR: &str = " / ";

fn index_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r"^\[[0-9]+\]$").expect("valid index regex"))
}

/// Whether `name` is a sequence index such as `[3]`.
pub fn is_index_name(name: &str) -> bool {
    index_pattern().is_match(name)
}

/// Breadcrumb of `id`; empty for the root.
pub fn breadcrumb(tree: &ObjectTree, id: NodeId) -> Result<String> {
    let mut segments = Vec::new();
    let mut current = tree.node(id)?;
    while let Some(parent) = current.parent {
        segments.push(current);
        current = tree.node(parent)?;
    }

    let mut out = String::new();
    for (i, node) in segments.iter().rev().enumerate() {
        let index = is_index_name(&node.name);
        if i > 0 && !index {
            out.push_str(SEPARATOR);
        }
        out.push_str(&segment(node, index));
    }
    Ok(out)
}

fn segment(node: &Node, index: bool) -> String {
    let short = node.value.as_object().and_then(|obj| obj.short_name());
    match short {
        Some(short) => format!("{} \"{}\"", node.name, short),
        None if index => format!("{} \"{}\"", node.name, node.value_text),
        None => node.name.clone(),
    }
}
