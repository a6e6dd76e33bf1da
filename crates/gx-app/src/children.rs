//! ChildEnumerator - ordered child specs for an expandable value
//!
//! Arrays and iterables yield one child per element. Composite objects yield
//! three groups, each sorted by member name: readable properties, fields,
//! then zero-argument non-void methods. A failing accessor produces an
//! Error-valued child; enumeration always continues.

use gx_core::{Elements, Member, MemberKind, TypeDescriptor, Value};

use crate::materialize::{ChildSpec, NodeOrigin};

/// Methods never listed as children (identity, hashing, type and string
/// conversion).
pub const EXCLUDED_METHODS: &[&str] = &[
    "clone",
    "fmt",
    "hash",
    "hash_code",
    "to_owned",
    "to_string",
    "type_id",
];

/// Accessor method prefixes; such methods duplicate properties.
const ACCESSOR_PREFIXES: &[&str] = &["get_", "set_"];

/// Produce the ordered child specs of `value`.
///
/// Non-object values have no children.
pub fn enumerate_children(value: &Value) -> Vec<ChildSpec> {
    let Some(obj) = value.as_object() else {
        return Vec::new();
    };

    if let Some(elements) = obj.elements() {
        return element_children(elements);
    }

    let mut properties = Vec::new();
    let mut fields = Vec::new();
    let mut methods = Vec::new();

    for member in obj.members() {
        match member.kind {
            MemberKind::Property { readable: true } => properties.push(member),
            MemberKind::Property { readable: false } => {}
            MemberKind::Field => fields.push(member),
            MemberKind::Method { arity } => {
                if arity == 0 && is_listed_method(&member) {
                    methods.push(member);
                }
            }
        }
    }

    let mut children = Vec::with_capacity(properties.len() + fields.len() + methods.len());
    for (group, origin) in [
        (properties, NodeOrigin::Property),
        (fields, NodeOrigin::Field),
        (methods, NodeOrigin::Method),
    ] {
        let mut group = group;
        group.sort_by(|a, b| a.name.cmp(&b.name));
        children.extend(group.into_iter().map(|member| {
            let emphasized = obj.is_emphasized(&member.name);
            member_child(member, origin, emphasized)
        }));
    }
    children
}

fn element_children(elements: Elements) -> Vec<ChildSpec> {
    match elements {
        Elements::Array {
            element_type,
            items,
        } => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| element_child(index, element_type.clone(), value))
            .collect(),
        Elements::Iterable(items) => items
            .into_iter()
            .enumerate()
            .map(|(index, value)| {
                let declared = value.runtime_type().unwrap_or(TypeDescriptor::Object);
                element_child(index, declared, value)
            })
            .collect(),
    }
}

fn element_child(index: usize, declared_type: TypeDescriptor, value: Value) -> ChildSpec {
    ChildSpec {
        name: format!("[{index}]"),
        origin: NodeOrigin::Element,
        declared_type,
        value,
        emphasized: false,
    }
}

fn member_child(member: Member<'_>, origin: NodeOrigin, emphasized: bool) -> ChildSpec {
    let value = member.read().unwrap_or_else(Value::Error);
    let name = match origin {
        NodeOrigin::Method => format!("{}()", member.name),
        _ => member.name,
    };
    ChildSpec {
        name,
        origin,
        declared_type: member.declared_type,
        value,
        emphasized,
    }
}

fn is_listed_method(member: &Member<'_>) -> bool {
    member.declared_type != TypeDescriptor::Void
        && !EXCLUDED_METHODS.contains(&member.name.as_str())
        && !ACCESSOR_PREFIXES
            .iter()
            .any(|prefix| member.name.starts_with(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;
    use gx_core::{DynamicObject, SequenceObject};

    fn names(children: &[ChildSpec]) -> Vec<&str> {
        children.iter().map(|c| c.name.as_str()).collect()
    }

    #[test]
    fn test_member_ordering_properties_fields_methods() {
        let obj = DynamicObject::new(TypeDescriptor::named("Sample"))
            .with_method("F", TypeDescriptor::I32, 6)
            .with_field("D", TypeDescriptor::I32, 4)
            .with_property("B", TypeDescriptor::I32, 2)
            .with_method("E", TypeDescriptor::I32, 5)
            .with_field("C", TypeDescriptor::I32, 3)
            .with_property("A", TypeDescriptor::I32, 1);

        let children = enumerate_children(&Value::object(obj));
        assert_eq!(names(&children), vec!["A", "B", "C", "D", "E()", "F()"]);
        assert_eq!(children[0].origin, NodeOrigin::Property);
        assert_eq!(children[2].origin, NodeOrigin::Field);
        assert_eq!(children[4].origin, NodeOrigin::Method);
    }

    #[test]
    fn test_sorting_is_ordinal() {
        let obj = DynamicObject::new(TypeDescriptor::named("Sample"))
            .with_field("b", TypeDescriptor::I32, 1)
            .with_field("B", TypeDescriptor::I32, 2)
            .with_field("a", TypeDescriptor::I32, 3);
        let children = enumerate_children(&Value::object(obj));
        assert_eq!(names(&children), vec!["B", "a", "b"]);
    }

    #[test]
    fn test_excluded_methods_and_accessors() {
        let obj = DynamicObject::new(TypeDescriptor::named("Sample"))
            .with_method("to_string", TypeDescriptor::String, "x")
            .with_method("hash_code", TypeDescriptor::I32, 1)
            .with_method("get_name", TypeDescriptor::String, "n")
            .with_method("reset", TypeDescriptor::Void, Value::Null)
            .with_member(
                "resolve",
                MemberKind::Method { arity: 1 },
                TypeDescriptor::Object,
            )
            .with_member(
                "Sink",
                MemberKind::Property { readable: false },
                TypeDescriptor::String,
            )
            .with_method("resolve_all", TypeDescriptor::Object, Value::Null);

        let children = enumerate_children(&Value::object(obj));
        assert_eq!(names(&children), vec!["resolve_all()"]);
    }

    #[test]
    fn test_failing_member_becomes_error_child() {
        let obj = DynamicObject::new(TypeDescriptor::named("Sample"))
            .with_property("A", TypeDescriptor::I32, 1)
            .with_failing(
                "B",
                MemberKind::Property { readable: true },
                TypeDescriptor::I32,
                "operation is not valid",
            )
            .with_property("C", TypeDescriptor::I32, 3);

        let children = enumerate_children(&Value::object(obj));
        assert_eq!(names(&children), vec!["A", "B", "C"]);
        match &children[1].value {
            Value::Error(err) => assert_eq!(err.message, "operation is not valid"),
            other => panic!("expected error value, got {other:?}"),
        }
        assert!(matches!(children[2].value, Value::I32(3)));
    }

    #[test]
    fn test_array_children_use_element_type() {
        let seq = SequenceObject::array(TypeDescriptor::named("Module"))
            .with_items([Value::Null, Value::Null]);
        let children = enumerate_children(&Value::object(seq));
        assert_eq!(names(&children), vec!["[0]", "[1]"]);
        assert_eq!(children[1].declared_type, TypeDescriptor::named("Module"));
        assert_eq!(children[0].origin, NodeOrigin::Element);
    }

    #[test]
    fn test_iterable_children_use_runtime_type() {
        let seq = SequenceObject::iterable(TypeDescriptor::named("List"))
            .with_items([Value::I32(1), Value::str("two"), Value::Null]);
        let children = enumerate_children(&Value::object(seq));
        assert_eq!(children[0].declared_type, TypeDescriptor::I32);
        assert_eq!(children[1].declared_type, TypeDescriptor::String);
        assert_eq!(children[2].declared_type, TypeDescriptor::Object);
    }

    #[test]
    fn test_emphasized_members() {
        let obj = DynamicObject::new(TypeDescriptor::named("Type"))
            .with_property("Name", TypeDescriptor::String, "Program")
            .with_property("Flags", TypeDescriptor::I32, 0)
            .with_emphasis("Name");
        let children = enumerate_children(&Value::object(obj));
        assert!(!children[0].emphasized);
        assert!(children[1].emphasized);
    }

    #[test]
    fn test_scalars_have_no_children() {
        assert!(enumerate_children(&Value::I32(1)).is_empty());
        assert!(enumerate_children(&Value::Null).is_empty());
    }
}
