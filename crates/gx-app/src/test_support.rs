//! Fixture graphs shared by unit tests.

use std::rc::Rc;

use gx_core::{DynamicObject, FormatOptions, ObjectRef, SequenceObject, TypeDescriptor, Value};

use crate::tree::ObjectTree;

pub fn tree_of(value: Value) -> ObjectTree {
    ObjectTree::new("root", value, TypeDescriptor::Object, FormatOptions::default())
}

/// ```text
/// root "root"
/// ├── A "pair"
/// │   ├── A1 "first"
/// │   └── A2 "second"
/// ├── B "item b"
/// └── C "item c"
/// ```
pub fn small_tree() -> ObjectTree {
    let pair = DynamicObject::new(TypeDescriptor::named("Pair"))
        .with_display("pair")
        .with_field("A2", TypeDescriptor::String, "second")
        .with_field("A1", TypeDescriptor::String, "first");
    let root = DynamicObject::new(TypeDescriptor::named("Root"))
        .with_display("root")
        .with_field("C", TypeDescriptor::String, "item c")
        .with_field("A", TypeDescriptor::named("Pair"), Value::object(pair))
        .with_field("B", TypeDescriptor::String, "item b");
    tree_of(Value::object(root))
}

/// An assembly with a `Name` and two `Modules`.
pub fn sample_tree() -> ObjectTree {
    let module = |name: &str| {
        Value::object(
            DynamicObject::new(TypeDescriptor::named_in("model", "Module"))
                .with_display(name)
                .with_short_name(name)
                .with_property("Name", TypeDescriptor::String, name),
        )
    };
    let modules = SequenceObject::iterable(
        TypeDescriptor::named("List").with_args(vec![TypeDescriptor::named_in("model", "Module")]),
    )
    .with_items([module("core.dll"), module("extra.dll")]);

    let assembly = DynamicObject::new(TypeDescriptor::named_in("model", "Assembly"))
        .with_display("demo assembly")
        .with_property("Name", TypeDescriptor::String, "demo")
        .with_property("Modules", TypeDescriptor::Object, Value::object(modules));
    tree_of(Value::object(assembly))
}

/// A node whose `Self` field points back at itself.
pub fn cyclic_tree() -> ObjectTree {
    let node = Rc::new(
        DynamicObject::new(TypeDescriptor::named("Node"))
            .with_display("node")
            .with_field("Label", TypeDescriptor::String, "label text")
            .with_field("Self", TypeDescriptor::named("Node"), Value::Null),
    );
    let handle: ObjectRef = node.clone().into();
    node.set("Self", handle.clone());
    tree_of(Value::Object(handle))
}

/// `Left` and `Right` both hold the same `Shared` object.
pub fn shared_tree() -> ObjectTree {
    let shared: ObjectRef = ObjectRef::new(
        DynamicObject::new(TypeDescriptor::named("Info")).with_display("shared info"),
    );
    let side = |display: &str, tag: &str| {
        Value::object(
            DynamicObject::new(TypeDescriptor::named("Side"))
                .with_display(display)
                .with_field("Shared", TypeDescriptor::named("Info"), shared.clone())
                .with_field("Tag", TypeDescriptor::String, tag),
        )
    };
    let root = DynamicObject::new(TypeDescriptor::named("Root"))
        .with_display("root")
        .with_field("Left", TypeDescriptor::named("Side"), side("left", "L"))
        .with_field("Right", TypeDescriptor::named("Side"), side("right", "R"))
        .with_field("Title", TypeDescriptor::String, "Demo title");
    tree_of(Value::object(root))
}

/// A member-less object followed by a scalar.
pub fn empty_child_tree() -> ObjectTree {
    let root = DynamicObject::new(TypeDescriptor::named("Root"))
        .with_display("root")
        .with_field("Value", TypeDescriptor::I32, 1)
        .with_field(
            "Empty",
            TypeDescriptor::named("Empty"),
            Value::object(DynamicObject::new(TypeDescriptor::named("Empty"))),
        );
    tree_of(Value::object(root))
}
