//! SearchEngine - incremental text search over the lazy tree
//!
//! A search is a resumable [`SearchCursor`]. Each [`SearchCursor::advance`]
//! call performs a bounded number of navigator steps so the caller can
//! yield back to its event loop between slices. The walk ends when a node's
//! formatted value contains the text, when it returns to the start node, or
//! when the step budget runs out.

use gx_core::prelude::*;
use serde::{Deserialize, Serialize};

use crate::navigator::{retract_transient_ancestors, TreeNavigator};
use crate::tree::{Node, NodeId, ObjectTree};

/// Walk direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    #[default]
    Forward,
    Backward,
}

/// Parameters of one search.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchOptions {
    pub text: String,
    pub case_sensitive: bool,
    /// Load children while walking; otherwise only expanded subtrees are searched
    pub expand_while_searching: bool,
    pub direction: Direction,
}

impl SearchOptions {
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            case_sensitive: false,
            expand_while_searching: true,
            direction: Direction::Forward,
        }
    }

    pub fn case_sensitive(mut self, case_sensitive: bool) -> Self {
        self.case_sensitive = case_sensitive;
        self
    }

    pub fn expand_while_searching(mut self, expand: bool) -> Self {
        self.expand_while_searching = expand;
        self
    }

    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }

    /// Reject searches that cannot match anything meaningful.
    pub fn validate(&self) -> Result<()> {
        if self.text.is_empty() {
            return Err(Error::EmptySearchText);
        }
        Ok(())
    }
}

/// Final result of a search.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum SearchOutcome {
    Found { node: NodeId },
    NotFound,
    /// Step budget exhausted or cancelled
    Aborted { steps: u64 },
}

/// State after one slice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SearchProgress {
    Pending { steps: u64 },
    Done(SearchOutcome),
}

/// Resumable search walk.
#[derive(Debug, Clone)]
pub struct SearchCursor {
    options: SearchOptions,
    needle: String,
    start: NodeId,
    current: NodeId,
    /// No start node was given: the root itself is tested first
    check_current: bool,
    steps: u64,
    /// 0 = unlimited
    max_steps: u64,
    wraps: u32,
}

impl SearchCursor {
    /// Start a search at `start`, or at the root when `None`.
    ///
    /// With an explicit start node the walk steps away before testing, so
    /// the start node itself never matches.
    pub fn new(
        tree: &ObjectTree,
        start: Option<NodeId>,
        options: SearchOptions,
        max_steps: u64,
    ) -> Result<Self> {
        options.validate()?;
        let (start, check_current) = match start {
            Some(id) => {
                tree.node(id)?;
                (id, false)
            }
            None => (tree.root(), true),
        };
        let needle = if options.case_sensitive {
            options.text.clone()
        } else {
            options.text.to_lowercase()
        };
        Ok(Self {
            options,
            needle,
            start,
            current: start,
            check_current,
            steps: 0,
            max_steps,
            wraps: 0,
        })
    }

    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    pub fn steps(&self) -> u64 {
        self.steps
    }

    pub fn start(&self) -> NodeId {
        self.start
    }

    /// Run at most `slice` navigator steps.
    pub fn advance(&mut self, tree: &mut ObjectTree, slice: usize) -> Result<SearchProgress> {
        if self.check_current {
            self.check_current = false;
            if self.matches(tree.node(self.current)?) {
                return self.found(tree);
            }
        }

        let root = tree.root();
        for _ in 0..slice {
            if self.max_steps > 0 && self.steps >= self.max_steps {
                debug!("Search budget of {} steps exhausted", self.max_steps);
                return Ok(SearchProgress::Done(self.abort(tree)));
            }

            let from = self.current;
            let next = TreeNavigator::new(tree, self.options.expand_while_searching)
                .step(self.options.direction, from)?;
            self.steps += 1;
            let wrapped = match self.options.direction {
                Direction::Forward => (next == root && from != root) || next == from,
                Direction::Backward => from == root,
            };
            if wrapped {
                self.wraps += 1;
            }
            self.current = next;

            if next == self.start {
                return Ok(SearchProgress::Done(self.not_found(tree)?));
            }
            if self.matches(tree.node(next)?) {
                return self.found(tree);
            }
            // The start node is unreachable (e.g. hidden under a collapsed
            // node while not expanding); two wraps cover every reachable node
            if self.wraps > 1 {
                return Ok(SearchProgress::Done(self.not_found(tree)?));
            }
        }

        Ok(SearchProgress::Pending { steps: self.steps })
    }

    /// Stop the walk, retracting every outstanding transient expansion.
    pub fn abort(&mut self, tree: &mut ObjectTree) -> SearchOutcome {
        if let Err(e) = retract_transient_ancestors(tree, self.current) {
            warn!("Failed to retract search expansions: {}", e);
        }
        SearchOutcome::Aborted { steps: self.steps }
    }

    fn found(&mut self, tree: &mut ObjectTree) -> Result<SearchProgress> {
        tree.reveal(self.current)?;
        info!(
            "Search for {:?} found node {} after {} steps",
            self.options.text, self.current, self.steps
        );
        Ok(SearchProgress::Done(SearchOutcome::Found { node: self.current }))
    }

    fn not_found(&mut self, tree: &mut ObjectTree) -> Result<SearchOutcome> {
        retract_transient_ancestors(tree, self.current)?;
        info!(
            "Search for {:?} found nothing after {} steps",
            self.options.text, self.steps
        );
        Ok(SearchOutcome::NotFound)
    }

    pub fn matches(&self, node: &Node) -> bool {
        text_matches(&node.value_text, &self.needle, self.options.case_sensitive)
    }
}

/// Substring test; `needle` must already be lowercased when case-insensitive.
pub fn text_matches(haystack: &str, needle: &str, case_sensitive: bool) -> bool {
    if case_sensitive {
        haystack.contains(needle)
    } else {
        haystack.to_lowercase().contains(needle)
    }
}

/// Run a search to completion in one go.
pub fn search(
    tree: &mut ObjectTree,
    start: Option<NodeId>,
    options: SearchOptions,
    max_steps: u64,
) -> Result<SearchOutcome> {
    let mut cursor = SearchCursor::new(tree, start, options, max_steps)?;
    loop {
        if let SearchProgress::Done(outcome) = cursor.advance(tree, usize::MAX)? {
            return Ok(outcome);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::*;
    use gx_core::{
        Classification, DynamicObject, ElementLevel, TypeDescriptor, TypeRole, Value,
        REFERENCE_LOOP,
    };

    fn find(tree: &mut ObjectTree, start: Option<NodeId>, options: SearchOptions) -> SearchOutcome {
        search(tree, start, options, 0).unwrap()
    }

    fn found_name(tree: &ObjectTree, outcome: SearchOutcome) -> String {
        match outcome {
            SearchOutcome::Found { node } => tree.node(node).unwrap().name.clone(),
            other => panic!("expected a match, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_text_is_rejected() {
        let tree = small_tree();
        assert!(matches!(
            SearchCursor::new(&tree, None, SearchOptions::new(""), 0),
            Err(Error::EmptySearchText)
        ));
    }

    #[test]
    fn test_finds_nested_value_and_reveals_ancestors() {
        let mut tree = small_tree();
        let outcome = find(&mut tree, None, SearchOptions::new("second"));
        assert_eq!(found_name(&tree, outcome), "A2");

        let SearchOutcome::Found { node } = outcome else {
            unreachable!()
        };
        for ancestor in tree.ancestors(node) {
            let n = tree.node(ancestor).unwrap();
            assert!(n.expanded);
            assert!(!n.expanded_transiently);
        }
    }

    #[test]
    fn test_case_sensitivity() {
        let mut tree = small_tree();
        let outcome = find(&mut tree, None, SearchOptions::new("SECOND"));
        assert_eq!(found_name(&tree, outcome), "A2");

        let mut tree = small_tree();
        let outcome = find(
            &mut tree,
            None,
            SearchOptions::new("SECOND").case_sensitive(true),
        );
        assert_eq!(outcome, SearchOutcome::NotFound);
    }

    #[test]
    fn test_not_found_leaves_materialization_unchanged() {
        let mut tree = small_tree();
        let root = tree.root();
        tree.expand(root).unwrap();
        let before = tree.materialized();

        for start in before.clone() {
            for direction in [Direction::Forward, Direction::Backward] {
                let outcome = find(
                    &mut tree,
                    Some(start),
                    SearchOptions::new("no such text").direction(direction),
                );
                assert_eq!(outcome, SearchOutcome::NotFound);
                assert_eq!(tree.materialized(), before);
            }
        }
    }

    #[test]
    fn test_not_found_from_root_without_start() {
        let mut tree = small_tree();
        let before = tree.materialized();
        let outcome = find(&mut tree, None, SearchOptions::new("zzz"));
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(tree.materialized(), before);
    }

    #[test]
    fn test_start_node_itself_is_not_a_match() {
        let mut tree = small_tree();
        let outcome = find(&mut tree, None, SearchOptions::new("second"));
        let SearchOutcome::Found { node } = outcome else {
            panic!("expected a match");
        };
        let again = find(&mut tree, Some(node), SearchOptions::new("second"));
        assert_eq!(again, SearchOutcome::NotFound);
    }

    #[test]
    fn test_repeated_search_moves_to_next_match() {
        let mut tree = small_tree();
        let first = find(&mut tree, None, SearchOptions::new("e"));
        let first_name = found_name(&tree, first);
        let SearchOutcome::Found { node } = first else {
            unreachable!()
        };
        let second = find(&mut tree, Some(node), SearchOptions::new("e"));
        assert_ne!(found_name(&tree, second), first_name);
    }

    #[test]
    fn test_backward_search_finds_last_match_first() {
        let mut tree = small_tree();
        let outcome = find(
            &mut tree,
            None,
            SearchOptions::new("item").direction(Direction::Backward),
        );
        assert_eq!(found_name(&tree, outcome), "C");
    }

    #[test]
    fn test_does_not_descend_into_cycle_marker() {
        let mut tree = cyclic_tree();
        let before = tree.materialized();
        let outcome = find(&mut tree, None, SearchOptions::new("absent"));
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(tree.materialized(), before);
    }

    /// An object whose only string member holds "needle".
    fn holder(runtime_type: TypeDescriptor) -> DynamicObject {
        DynamicObject::new(runtime_type)
            .with_display("holder")
            .with_field("Inner", TypeDescriptor::String, "needle")
    }

    fn tree_around(root: DynamicObject) -> ObjectTree {
        tree_of(Value::object(root.with_display("root")))
    }

    fn assert_needle_unreachable(mut tree: ObjectTree) {
        let before = tree.materialized();
        for direction in [Direction::Forward, Direction::Backward] {
            let outcome = find(
                &mut tree,
                None,
                SearchOptions::new("needle").direction(direction),
            );
            assert_eq!(outcome, SearchOutcome::NotFound);
            assert_eq!(tree.materialized(), before);
        }
    }

    #[test]
    fn test_plain_field_is_searched() {
        let mut tree = tree_around(
            DynamicObject::new(TypeDescriptor::named("Root")).with_field(
                "Plain",
                TypeDescriptor::named("Holder"),
                Value::object(holder(TypeDescriptor::named("Holder"))),
            ),
        );
        let outcome = find(&mut tree, None, SearchOptions::new("needle"));
        assert_eq!(found_name(&tree, outcome), "Inner");
    }

    #[test]
    fn test_method_results_are_not_descended() {
        assert_needle_unreachable(tree_around(
            DynamicObject::new(TypeDescriptor::named("Root")).with_method(
                "Compute",
                TypeDescriptor::named("Holder"),
                Value::object(holder(TypeDescriptor::named("Holder"))),
            ),
        ));
    }

    #[test]
    fn test_failure_objects_are_not_descended() {
        assert_needle_unreachable(tree_around(
            DynamicObject::new(TypeDescriptor::named("Root")).with_field(
                "Broken",
                TypeDescriptor::named("Holder"),
                Value::object(holder(TypeDescriptor::named("Holder")).as_failure()),
            ),
        ));
    }

    #[test]
    fn test_objects_opaque_to_search_are_not_descended() {
        assert_needle_unreachable(tree_around(
            DynamicObject::new(TypeDescriptor::named("Root")).with_field(
                "Body",
                TypeDescriptor::named("Holder"),
                Value::object(holder(TypeDescriptor::named("Holder")).opaque_to_search()),
            ),
        ));
    }

    #[test]
    fn test_definition_markers_are_not_descended() {
        let declared = TypeDescriptor::named("TypeRef").with_role(TypeRole::Reference);
        let definition = TypeDescriptor::named("TypeDef").with_role(TypeRole::Definition);
        let mut tree = tree_around(DynamicObject::new(TypeDescriptor::named("Root")).with_field(
            "BaseType",
            declared,
            Value::object(holder(definition)),
        ));
        let root = tree.root();
        tree.load_children(root).unwrap();
        let base = tree.child_named(root, "BaseType").unwrap();
        assert_eq!(
            tree.node(base).unwrap().classification,
            Classification::DefinitionMarker
        );
        tree.unload(root).unwrap();
        assert_needle_unreachable(tree);
    }

    #[test]
    fn test_higher_level_markers_are_not_descended() {
        let mut tree = tree_around(
            DynamicObject::new(TypeDescriptor::named("Method"))
                .with_element_level(ElementLevel::Member)
                .with_field(
                    "DeclaringType",
                    TypeDescriptor::named("Holder"),
                    Value::object(
                        holder(TypeDescriptor::named("Holder"))
                            .with_element_level(ElementLevel::Type),
                    ),
                ),
        );
        let root = tree.root();
        tree.load_children(root).unwrap();
        let declaring = tree.child_named(root, "DeclaringType").unwrap();
        assert_eq!(
            tree.node(declaring).unwrap().classification,
            Classification::HigherLevelMarker
        );
        tree.unload(root).unwrap();
        assert_needle_unreachable(tree);
    }

    #[test]
    fn test_cycle_marker_text_is_searchable() {
        let mut tree = cyclic_tree();
        let outcome = find(&mut tree, None, SearchOptions::new(REFERENCE_LOOP));
        assert_eq!(found_name(&tree, outcome), "Self");
    }

    #[test]
    fn test_no_expand_searches_only_expanded_nodes() {
        let mut tree = small_tree();
        let root = tree.root();
        tree.expand(root).unwrap();
        let before = tree.materialized();

        let outcome = find(
            &mut tree,
            None,
            SearchOptions::new("second").expand_while_searching(false),
        );
        assert_eq!(outcome, SearchOutcome::NotFound);
        assert_eq!(tree.materialized(), before);
    }

    #[test]
    fn test_budget_aborts_and_retracts() {
        let mut tree = small_tree();
        let before = tree.materialized();
        let outcome = search(&mut tree, None, SearchOptions::new("zzz"), 2).unwrap();
        assert_eq!(outcome, SearchOutcome::Aborted { steps: 2 });
        assert_eq!(tree.materialized(), before);
    }

    #[test]
    fn test_slices_resume_where_they_stopped() {
        let mut tree = small_tree();
        let mut cursor = SearchCursor::new(&tree, None, SearchOptions::new("item"), 0).unwrap();
        assert_eq!(
            cursor.advance(&mut tree, 1).unwrap(),
            SearchProgress::Pending { steps: 1 }
        );
        let mut outcome = None;
        for _ in 0..10 {
            if let SearchProgress::Done(done) = cursor.advance(&mut tree, 1).unwrap() {
                outcome = Some(done);
                break;
            }
        }
        assert_eq!(found_name(&tree, outcome.unwrap()), "B");
    }

    #[test]
    fn test_cancel_releases_transient_expansions() {
        let mut tree = small_tree();
        let before = tree.materialized();
        let mut cursor = SearchCursor::new(&tree, None, SearchOptions::new("zzz"), 0).unwrap();
        cursor.advance(&mut tree, 2).unwrap();
        assert!(tree.len() > before.len());

        let outcome = cursor.abort(&mut tree);
        assert_eq!(outcome, SearchOutcome::Aborted { steps: 2 });
        assert_eq!(tree.materialized(), before);
    }

    #[test]
    fn test_text_matches_unicode_folding() {
        assert!(text_matches("ÄRGER", "ärger", false));
        assert!(!text_matches("ÄRGER", "ärger", true));
    }
}
