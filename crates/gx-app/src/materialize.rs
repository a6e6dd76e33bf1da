//! NodeMaterializer - builds one node's display content from a child spec
//!
//! Cycle detection only looks at the ancestor path of the node being built;
//! the same value may legitimately appear again in an unrelated branch.

use gx_core::{
    format_value, Classification, ElementLevel, FormatOptions, FormattedValue, TypeDescriptor,
    TypeLabel, Value, ValueStyle,
};
use serde::Serialize;

/// How a node was reached from its parent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeOrigin {
    Root,
    Property,
    Field,
    Method,
    /// Array or iterable element, named `[i]`
    Element,
}

/// Everything needed to materialize one child.
#[derive(Debug, Clone)]
pub struct ChildSpec {
    pub name: String,
    pub origin: NodeOrigin,
    pub declared_type: TypeDescriptor,
    pub value: Value,
    /// Parent marks this member as a key member
    pub emphasized: bool,
}

impl ChildSpec {
    pub fn root(name: impl Into<String>, value: Value, declared_type: TypeDescriptor) -> Self {
        Self {
            name: name.into(),
            origin: NodeOrigin::Root,
            declared_type,
            value,
            emphasized: false,
        }
    }
}

/// One ancestor on the root-to-parent path.
#[derive(Debug, Clone)]
struct PathEntry {
    value: Value,
    element_level: Option<ElementLevel>,
}

/// Root-first list of (value, effective element level) pairs for the
/// ancestors of the node being materialized.
///
/// Entries hold value handles, never copies of the graph.
#[derive(Debug, Clone, Default)]
pub struct AncestorPath {
    entries: Vec<PathEntry>,
}

impl AncestorPath {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, value: Value, element_level: Option<ElementLevel>) {
        self.entries.push(PathEntry {
            value,
            element_level,
        });
    }

    /// Whether any ancestor holds the same underlying value.
    pub fn contains(&self, value: &Value) -> bool {
        self.entries.iter().any(|entry| entry.value.same_as(value))
    }

    /// Effective element level of the nearest ancestor.
    pub fn inherited_level(&self) -> Option<ElementLevel> {
        self.entries.last().and_then(|entry| entry.element_level)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Display-ready content of a node, before it is placed in the tree.
#[derive(Debug, Clone)]
pub struct Materialized {
    pub name: String,
    pub origin: NodeOrigin,
    pub declared_type: TypeDescriptor,
    pub type_label: TypeLabel,
    pub value_text: String,
    pub classification: Classification,
    pub style: ValueStyle,
    pub expandable: bool,
    /// Own level, or the inherited one when the value is unclassified
    pub element_level: Option<ElementLevel>,
    pub emphasized: bool,
    pub value: Value,
}

/// Build one node from `spec` given its ancestor path.
///
/// Classification precedence: CycleMarker > HigherLevelMarker >
/// DefinitionMarker > Error > Normal.
pub fn materialize(spec: ChildSpec, path: &AncestorPath, options: &FormatOptions) -> Materialized {
    let ChildSpec {
        name,
        origin,
        declared_type,
        value,
        emphasized,
    } = spec;

    let runtime = value.runtime_type();
    let type_label = TypeLabel::new(&declared_type, runtime.as_ref());

    let cycle = path.contains(&value);
    let formatted = if cycle {
        FormattedValue::reference_loop()
    } else {
        format_value(&value, &declared_type, options)
    };

    let own_level = value.as_object().and_then(|obj| obj.element_level());
    let inherited = path.inherited_level();
    let higher_level = matches!((own_level, inherited), (Some(own), Some(parent)) if own < parent);

    let classification = if cycle {
        Classification::CycleMarker
    } else if higher_level {
        Classification::HigherLevelMarker
    } else if type_label.definition_for_reference {
        Classification::DefinitionMarker
    } else {
        formatted.classification
    };

    Materialized {
        name,
        origin,
        declared_type,
        type_label,
        value_text: formatted.text,
        classification,
        style: formatted.style,
        expandable: formatted.expandable,
        element_level: own_level.or(inherited),
        emphasized,
        value,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gx_core::{DynamicObject, TypeRole, REFERENCE_LOOP};

    fn spec(name: &str, value: Value, declared: TypeDescriptor) -> ChildSpec {
        ChildSpec {
            name: name.to_string(),
            origin: NodeOrigin::Field,
            declared_type: declared,
            value,
            emphasized: false,
        }
    }

    fn leveled(level: ElementLevel) -> Value {
        Value::object(DynamicObject::new(TypeDescriptor::named("Element")).with_element_level(level))
    }

    #[test]
    fn test_value_on_ancestor_path_is_cycle_marker() {
        let obj = Value::object(DynamicObject::new(TypeDescriptor::named("Node")));
        let mut path = AncestorPath::new();
        path.push(obj.clone(), None);

        let node = materialize(
            spec("self", obj, TypeDescriptor::named("Node")),
            &path,
            &FormatOptions::default(),
        );

        assert_eq!(node.classification, Classification::CycleMarker);
        assert_eq!(node.value_text, REFERENCE_LOOP);
        assert!(!node.expandable);
    }

    #[test]
    fn test_same_value_elsewhere_is_not_a_cycle() {
        let shared = Value::object(DynamicObject::new(TypeDescriptor::named("Node")));
        let mut path = AncestorPath::new();
        path.push(Value::object(DynamicObject::new(TypeDescriptor::named("Other"))), None);

        let node = materialize(
            spec("shared", shared, TypeDescriptor::named("Node")),
            &path,
            &FormatOptions::default(),
        );
        assert_eq!(node.classification, Classification::Normal);
        assert!(node.expandable);
    }

    #[test]
    fn test_level_is_inherited_when_unclassified() {
        let mut path = AncestorPath::new();
        path.push(leveled(ElementLevel::Module), Some(ElementLevel::Module));

        let node = materialize(
            spec("name", Value::str("x"), TypeDescriptor::String),
            &path,
            &FormatOptions::default(),
        );
        assert_eq!(node.element_level, Some(ElementLevel::Module));
        assert_eq!(node.classification, Classification::Normal);
    }

    #[test]
    fn test_lower_tier_than_parent_is_higher_level_marker() {
        let mut path = AncestorPath::new();
        path.push(leveled(ElementLevel::Member), Some(ElementLevel::Member));

        let node = materialize(
            spec("DeclaringType", leveled(ElementLevel::Type), TypeDescriptor::named("Element")),
            &path,
            &FormatOptions::default(),
        );
        assert_eq!(node.classification, Classification::HigherLevelMarker);
        assert_eq!(node.element_level, Some(ElementLevel::Type));
    }

    #[test]
    fn test_definition_marker() {
        let declared = TypeDescriptor::named("TypeRef").with_role(TypeRole::Reference);
        let value = Value::object(
            DynamicObject::new(TypeDescriptor::named("TypeDef").with_role(TypeRole::Definition))
                .with_display("Program"),
        );

        let node = materialize(
            spec("BaseType", value, declared),
            &AncestorPath::new(),
            &FormatOptions::default(),
        );
        assert_eq!(node.classification, Classification::DefinitionMarker);
        assert_eq!(node.type_label.to_string(), "TypeRef {TypeDef}");
    }

    #[test]
    fn test_error_value_classification() {
        let node = materialize(
            spec("Size", Value::error("not supported"), TypeDescriptor::I32),
            &AncestorPath::new(),
            &FormatOptions::default(),
        );
        assert_eq!(node.classification, Classification::Error);
        assert_eq!(node.value_text, "[not supported]");
        assert!(!node.type_label.runtime_differs());
    }

    #[test]
    fn test_root_spec() {
        let root = ChildSpec::root("model.json", Value::Null, TypeDescriptor::Object);
        assert_eq!(root.origin, NodeOrigin::Root);
        let node = materialize(root, &AncestorPath::new(), &FormatOptions::default());
        assert_eq!(node.value_text, "null");
        assert_eq!(node.element_level, None);
    }
}
