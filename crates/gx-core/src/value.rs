//! Raw values reached while walking an object graph.

use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use crate::inspect::{Inspect, MemberError};
use crate::types::TypeDescriptor;

// ============================================================================
// ObjectRef
// ============================================================================

/// Shared handle to an object owned by the external graph source.
///
/// Cloning is cheap; equality is handle identity.
#[derive(Clone)]
pub struct ObjectRef(Rc<dyn Inspect>);

impl ObjectRef {
    pub fn new<T: Inspect + 'static>(object: T) -> Self {
        Self(Rc::new(object))
    }

    /// Identity comparison (ignores vtable metadata).
    pub fn ptr_eq(&self, other: &ObjectRef) -> bool {
        std::ptr::addr_eq(Rc::as_ptr(&self.0), Rc::as_ptr(&other.0))
    }

    /// Address of the shared object, stable for its lifetime.
    pub fn addr(&self) -> usize {
        Rc::as_ptr(&self.0) as *const () as usize
    }
}

impl<T: Inspect + 'static> From<Rc<T>> for ObjectRef {
    fn from(rc: Rc<T>) -> Self {
        Self(rc)
    }
}

impl Deref for ObjectRef {
    type Target = dyn Inspect;

    fn deref(&self) -> &Self::Target {
        self.0.as_ref()
    }
}

impl fmt::Debug for ObjectRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectRef({} @ {:#x})", self.0.runtime_type(), self.addr())
    }
}

// ============================================================================
// Value
// ============================================================================

/// A value reached from the root: a scalar, a captured member failure, or a
/// handle to a composite object.
#[derive(Debug, Clone)]
pub enum Value {
    Null,
    Bool(bool),
    U8(u8),
    I8(i8),
    U16(u16),
    I16(i16),
    U32(u32),
    I32(i32),
    U64(u64),
    I64(i64),
    F32(f32),
    F64(f64),
    Char(char),
    Str(Rc<str>),
    Enum {
        type_name: Rc<str>,
        variant: Rc<str>,
    },
    /// A member access that failed
    Error(MemberError),
    Object(ObjectRef),
}

impl Value {
    pub fn str(s: impl Into<Rc<str>>) -> Self {
        Self::Str(s.into())
    }

    pub fn enum_variant(type_name: impl Into<Rc<str>>, variant: impl Into<Rc<str>>) -> Self {
        Self::Enum {
            type_name: type_name.into(),
            variant: variant.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::Error(MemberError::new(message))
    }

    pub fn object<T: Inspect + 'static>(object: T) -> Self {
        Self::Object(ObjectRef::new(object))
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    pub fn as_object(&self) -> Option<&ObjectRef> {
        match self {
            Self::Object(obj) => Some(obj),
            _ => None,
        }
    }

    /// A captured member failure or an object representing one.
    pub fn is_failure(&self) -> bool {
        match self {
            Self::Error(_) => true,
            Self::Object(obj) => obj.is_failure(),
            _ => false,
        }
    }

    /// Same underlying value: handle identity for objects, value equality for
    /// scalars. `Null` and errors never match anything.
    pub fn same_as(&self, other: &Value) -> bool {
        match (self, other) {
            (Self::Object(a), Self::Object(b)) => a.ptr_eq(b),
            (Self::Bool(a), Self::Bool(b)) => a == b,
            (Self::U8(a), Self::U8(b)) => a == b,
            (Self::I8(a), Self::I8(b)) => a == b,
            (Self::U16(a), Self::U16(b)) => a == b,
            (Self::I16(a), Self::I16(b)) => a == b,
            (Self::U32(a), Self::U32(b)) => a == b,
            (Self::I32(a), Self::I32(b)) => a == b,
            (Self::U64(a), Self::U64(b)) => a == b,
            (Self::I64(a), Self::I64(b)) => a == b,
            (Self::F32(a), Self::F32(b)) => a == b,
            (Self::F64(a), Self::F64(b)) => a == b,
            (Self::Char(a), Self::Char(b)) => a == b,
            (Self::Str(a), Self::Str(b)) => a == b,
            (
                Self::Enum {
                    type_name: ta,
                    variant: va,
                },
                Self::Enum {
                    type_name: tb,
                    variant: vb,
                },
            ) => ta == tb && va == vb,
            _ => false,
        }
    }

    /// Concrete runtime type, `None` for null and failures.
    pub fn runtime_type(&self) -> Option<TypeDescriptor> {
        let ty = match self {
            Self::Null | Self::Error(_) => return None,
            Self::Bool(_) => TypeDescriptor::Bool,
            Self::U8(_) => TypeDescriptor::U8,
            Self::I8(_) => TypeDescriptor::I8,
            Self::U16(_) => TypeDescriptor::U16,
            Self::I16(_) => TypeDescriptor::I16,
            Self::U32(_) => TypeDescriptor::U32,
            Self::I32(_) => TypeDescriptor::I32,
            Self::U64(_) => TypeDescriptor::U64,
            Self::I64(_) => TypeDescriptor::I64,
            Self::F32(_) => TypeDescriptor::F32,
            Self::F64(_) => TypeDescriptor::F64,
            Self::Char(_) => TypeDescriptor::Char,
            Self::Str(_) => TypeDescriptor::String,
            Self::Enum { type_name, .. } => TypeDescriptor::enumeration(type_name.as_ref()),
            Self::Object(obj) => obj.runtime_type(),
        };
        Some(ty)
    }

    /// Plain string conversion (no hex decoration, no item counts).
    pub fn to_plain_string(&self) -> String {
        match self {
            Self::Null => "null".to_string(),
            Self::Bool(b) => b.to_string(),
            Self::U8(v) => v.to_string(),
            Self::I8(v) => v.to_string(),
            Self::U16(v) => v.to_string(),
            Self::I16(v) => v.to_string(),
            Self::U32(v) => v.to_string(),
            Self::I32(v) => v.to_string(),
            Self::U64(v) => v.to_string(),
            Self::I64(v) => v.to_string(),
            Self::F32(v) => v.to_string(),
            Self::F64(v) => v.to_string(),
            Self::Char(c) => c.to_string(),
            Self::Str(s) => s.to_string(),
            Self::Enum { variant, .. } => variant.to_string(),
            Self::Error(err) => err.message.clone(),
            Self::Object(obj) => obj.display(),
        }
    }
}

macro_rules! impl_from_scalar {
    ($($ty:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(v: $ty) -> Self {
                    Self::$variant(v)
                }
            }
        )*
    };
}

impl_from_scalar! {
    bool => Bool,
    u8 => U8,
    i8 => I8,
    u16 => U16,
    i16 => I16,
    u32 => U32,
    i32 => I32,
    u64 => U64,
    i64 => I64,
    f32 => F32,
    f64 => F64,
    char => Char,
    ObjectRef => Object,
    MemberError => Error,
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::Str(s.into())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::Str(s.into())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map(Into::into).unwrap_or(Self::Null)
    }
}
