//! # Member Enumeration Contract
//!
//! [`Inspect`] is the seam between the explorer and a domain model. Each model
//! type describes itself explicitly: its runtime type, its default string
//! form, whether it is a sequence, and an ordered list of [`Member`]s with
//! accessors. Ordering and exclusion rules are applied by the explorer, so an
//! implementation may list members in any order.

use serde::Serialize;
use thiserror::Error;

use crate::types::TypeDescriptor;
use crate::value::Value;

// ============================================================================
// MemberError
// ============================================================================

/// A failed member access (property/field read or method invocation).
///
/// Captured per member and shown inline; never aborts an expansion.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct MemberError {
    pub message: String,
}

impl MemberError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

/// Outcome of reading a member.
pub type MemberResult = std::result::Result<Value, MemberError>;

// ============================================================================
// Member
// ============================================================================

/// Kind of an instance member.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MemberKind {
    /// Property; only readable properties become children
    Property { readable: bool },
    Field,
    /// Method; only zero-argument, non-void methods become children
    Method { arity: usize },
}

/// One named member of an object with its accessor.
pub struct Member<'a> {
    pub name: String,
    pub kind: MemberKind,
    pub declared_type: TypeDescriptor,
    accessor: Box<dyn Fn() -> MemberResult + 'a>,
}

impl<'a> Member<'a> {
    pub fn new(
        name: impl Into<String>,
        kind: MemberKind,
        declared_type: TypeDescriptor,
        accessor: impl Fn() -> MemberResult + 'a,
    ) -> Self {
        Self {
            name: name.into(),
            kind,
            declared_type,
            accessor: Box::new(accessor),
        }
    }

    /// Readable property.
    pub fn property(
        name: impl Into<String>,
        declared_type: TypeDescriptor,
        accessor: impl Fn() -> MemberResult + 'a,
    ) -> Self {
        Self::new(name, MemberKind::Property { readable: true }, declared_type, accessor)
    }

    /// Property without a getter; listed but never read.
    pub fn write_only(name: impl Into<String>, declared_type: TypeDescriptor) -> Self {
        Self::new(
            name,
            MemberKind::Property { readable: false },
            declared_type,
            || Err(MemberError::new("property has no getter")),
        )
    }

    pub fn field(
        name: impl Into<String>,
        declared_type: TypeDescriptor,
        accessor: impl Fn() -> MemberResult + 'a,
    ) -> Self {
        Self::new(name, MemberKind::Field, declared_type, accessor)
    }

    /// Zero-argument method.
    pub fn method(
        name: impl Into<String>,
        return_type: TypeDescriptor,
        accessor: impl Fn() -> MemberResult + 'a,
    ) -> Self {
        Self::new(name, MemberKind::Method { arity: 0 }, return_type, accessor)
    }

    /// Method taking arguments; listed but never invoked.
    pub fn method_with_args(
        name: impl Into<String>,
        return_type: TypeDescriptor,
        arity: usize,
    ) -> Self {
        Self::new(name, MemberKind::Method { arity }, return_type, || {
            Err(MemberError::new("method requires arguments"))
        })
    }

    /// Read the member (invoke the accessor).
    pub fn read(&self) -> MemberResult {
        (self.accessor)()
    }
}

impl std::fmt::Debug for Member<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Member")
            .field("name", &self.name)
            .field("kind", &self.kind)
            .field("declared_type", &self.declared_type)
            .finish_non_exhaustive()
    }
}

// ============================================================================
// Elements / ElementLevel / OpaqueParts
// ============================================================================

/// Items of a sequence-like object.
#[derive(Debug, Clone)]
pub enum Elements {
    /// Array: every element is declared with the array's element type
    Array {
        element_type: TypeDescriptor,
        items: Vec<Value>,
    },
    /// Iterable: each element is declared with its own runtime type
    Iterable(Vec<Value>),
}

impl Elements {
    pub fn items(&self) -> &[Value] {
        match self {
            Self::Array { items, .. } | Self::Iterable(items) => items,
        }
    }

    pub fn len(&self) -> usize {
        self.items().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items().is_empty()
    }
}

/// Coarse structural tier of a domain value, used for visual emphasis.
///
/// Ordered from outermost to innermost.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementLevel {
    Package,
    Module,
    Type,
    Member,
}

/// Inner type/value of an opaque wrapper, rendered `"(<type>) <value>"`.
#[derive(Debug, Clone)]
pub struct OpaqueParts {
    pub type_name: Option<String>,
    pub value: Value,
}

// ============================================================================
// Inspect
// ============================================================================

/// Explicit introspection contract for domain model types.
pub trait Inspect {
    /// Concrete runtime type of this object.
    fn runtime_type(&self) -> TypeDescriptor;

    /// Default string conversion. Returning the runtime type's full name
    /// (the default) marks the object as having no meaningful override.
    fn display(&self) -> String {
        self.runtime_type().full_name()
    }

    /// Items when the object is array-like or iterable.
    fn elements(&self) -> Option<Elements> {
        None
    }

    /// Instance members, in any order.
    fn members(&self) -> Vec<Member<'_>> {
        Vec::new()
    }

    fn element_level(&self) -> Option<ElementLevel> {
        None
    }

    /// Inner parts shown instead of an opaque default string.
    fn opaque_parts(&self) -> Option<OpaqueParts> {
        None
    }

    /// Whether the object represents a failure (e.g. a loader error root).
    fn is_failure(&self) -> bool {
        false
    }

    /// Short label used in breadcrumbs, e.g. a member's simple name.
    fn short_name(&self) -> Option<String> {
        None
    }

    /// Whether the named member is a key member rendered with emphasis.
    fn is_emphasized(&self, _member: &str) -> bool {
        false
    }

    /// Children of this object are never walked by search.
    fn opaque_to_search(&self) -> bool {
        false
    }
}
