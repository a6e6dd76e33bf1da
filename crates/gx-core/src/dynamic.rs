//! Runtime-built [`Inspect`] implementations.
//!
//! Loaders that do not have a static domain model (the JSON demo loader,
//! tests) describe objects with these instead of hand-written impls. Slots
//! are patchable after the object is shared so that cycles can be tied.

use std::cell::RefCell;

use crate::inspect::{
    ElementLevel, Elements, Inspect, Member, MemberError, MemberKind, MemberResult, OpaqueParts,
};
use crate::types::TypeDescriptor;
use crate::value::Value;

#[derive(Debug, Clone)]
struct Slot {
    name: String,
    kind: MemberKind,
    declared_type: TypeDescriptor,
    value: MemberResult,
}

/// A composite object whose members are a list of named slots.
#[derive(Debug)]
pub struct DynamicObject {
    runtime_type: TypeDescriptor,
    display: Option<String>,
    slots: RefCell<Vec<Slot>>,
    element_level: Option<ElementLevel>,
    short_name: Option<String>,
    failure: bool,
    opaque_parts: Option<OpaqueParts>,
    emphasized: Vec<String>,
    opaque_to_search: bool,
}

impl DynamicObject {
    pub fn new(runtime_type: TypeDescriptor) -> Self {
        Self {
            runtime_type,
            display: None,
            slots: RefCell::new(Vec::new()),
            element_level: None,
            short_name: None,
            failure: false,
            opaque_parts: None,
            emphasized: Vec::new(),
            opaque_to_search: false,
        }
    }

    // ─────────────────────────────────────────────────────────
    // Builder
    // ─────────────────────────────────────────────────────────

    pub fn with_display(mut self, display: impl Into<String>) -> Self {
        self.display = Some(display.into());
        self
    }

    pub fn with_element_level(mut self, level: ElementLevel) -> Self {
        self.element_level = Some(level);
        self
    }

    pub fn with_short_name(mut self, short_name: impl Into<String>) -> Self {
        self.short_name = Some(short_name.into());
        self
    }

    pub fn as_failure(mut self) -> Self {
        self.failure = true;
        self
    }

    pub fn with_opaque_parts(mut self, type_name: Option<String>, value: Value) -> Self {
        self.opaque_parts = Some(OpaqueParts { type_name, value });
        self
    }

    /// Render the named member with emphasis.
    pub fn with_emphasis(mut self, member: impl Into<String>) -> Self {
        self.emphasized.push(member.into());
        self
    }

    pub fn opaque_to_search(mut self) -> Self {
        self.opaque_to_search = true;
        self
    }

    pub fn with_property(self, name: impl Into<String>, ty: TypeDescriptor, value: impl Into<Value>) -> Self {
        self.push(name, MemberKind::Property { readable: true }, ty, Ok(value.into()));
        self
    }

    pub fn with_field(self, name: impl Into<String>, ty: TypeDescriptor, value: impl Into<Value>) -> Self {
        self.push(name, MemberKind::Field, ty, Ok(value.into()));
        self
    }

    pub fn with_method(self, name: impl Into<String>, ty: TypeDescriptor, value: impl Into<Value>) -> Self {
        self.push(name, MemberKind::Method { arity: 0 }, ty, Ok(value.into()));
        self
    }

    /// A member whose access fails with `message`.
    pub fn with_failing(
        self,
        name: impl Into<String>,
        kind: MemberKind,
        ty: TypeDescriptor,
        message: impl Into<String>,
    ) -> Self {
        self.push(name, kind, ty, Err(MemberError::new(message)));
        self
    }

    /// A member listed with an arbitrary kind; used for write-only properties
    /// and methods with arguments.
    pub fn with_member(self, name: impl Into<String>, kind: MemberKind, ty: TypeDescriptor) -> Self {
        self.push(name, kind, ty, Ok(Value::Null));
        self
    }

    // ─────────────────────────────────────────────────────────
    // Patching
    // ─────────────────────────────────────────────────────────

    /// Append a slot.
    pub fn push(&self, name: impl Into<String>, kind: MemberKind, ty: TypeDescriptor, value: MemberResult) {
        self.slots.borrow_mut().push(Slot {
            name: name.into(),
            kind,
            declared_type: ty,
            value,
        });
    }

    /// Replace the value of an existing slot. Returns false if no slot has
    /// that name.
    pub fn set(&self, name: &str, value: impl Into<Value>) -> bool {
        let mut slots = self.slots.borrow_mut();
        match slots.iter_mut().find(|slot| slot.name == name) {
            Some(slot) => {
                slot.value = Ok(value.into());
                true
            }
            None => false,
        }
    }

    pub fn member_count(&self) -> usize {
        self.slots.borrow().len()
    }
}

impl Inspect for DynamicObject {
    fn runtime_type(&self) -> TypeDescriptor {
        self.runtime_type.clone()
    }

    fn display(&self) -> String {
        self.display
            .clone()
            .unwrap_or_else(|| self.runtime_type.full_name())
    }

    fn members(&self) -> Vec<Member<'_>> {
        self.slots
            .borrow()
            .iter()
            .cloned()
            .map(|slot| {
                let value = slot.value;
                Member::new(slot.name, slot.kind, slot.declared_type, move || value.clone())
            })
            .collect()
    }

    fn element_level(&self) -> Option<ElementLevel> {
        self.element_level
    }

    fn opaque_parts(&self) -> Option<OpaqueParts> {
        self.opaque_parts.clone()
    }

    fn is_failure(&self) -> bool {
        self.failure
    }

    fn short_name(&self) -> Option<String> {
        self.short_name.clone()
    }

    fn is_emphasized(&self, member: &str) -> bool {
        self.emphasized.iter().any(|name| name == member)
    }

    fn opaque_to_search(&self) -> bool {
        self.opaque_to_search
    }
}

// ============================================================================
// SequenceObject
// ============================================================================

#[derive(Debug, Clone)]
enum SequenceKind {
    Array(TypeDescriptor),
    Iterable,
}

/// An array-like or iterable object.
#[derive(Debug)]
pub struct SequenceObject {
    runtime_type: TypeDescriptor,
    kind: SequenceKind,
    items: RefCell<Vec<Value>>,
}

impl SequenceObject {
    /// Array whose elements are all declared as `element_type`.
    pub fn array(element_type: TypeDescriptor) -> Self {
        Self {
            runtime_type: TypeDescriptor::array(element_type.clone()),
            kind: SequenceKind::Array(element_type),
            items: RefCell::new(Vec::new()),
        }
    }

    /// Iterable collection; each element is declared with its runtime type.
    pub fn iterable(runtime_type: TypeDescriptor) -> Self {
        Self {
            runtime_type,
            kind: SequenceKind::Iterable,
            items: RefCell::new(Vec::new()),
        }
    }

    pub fn with_items(self, items: impl IntoIterator<Item = Value>) -> Self {
        self.items.borrow_mut().extend(items);
        self
    }

    pub fn push(&self, item: impl Into<Value>) {
        self.items.borrow_mut().push(item.into());
    }

    /// Replace the item at `index`. Returns false when out of range.
    pub fn set(&self, index: usize, item: impl Into<Value>) -> bool {
        match self.items.borrow_mut().get_mut(index) {
            Some(slot) => {
                *slot = item.into();
                true
            }
            None => false,
        }
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }
}

impl Inspect for SequenceObject {
    fn runtime_type(&self) -> TypeDescriptor {
        self.runtime_type.clone()
    }

    fn elements(&self) -> Option<Elements> {
        let items = self.items.borrow().clone();
        Some(match &self.kind {
            SequenceKind::Array(element_type) => Elements::Array {
                element_type: element_type.clone(),
                items,
            },
            SequenceKind::Iterable => Elements::Iterable(items),
        })
    }
}
