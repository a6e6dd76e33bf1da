//! # Type Descriptors
//!
//! Declared (static) and runtime types of values reached in an inspected
//! object graph, plus the TypeFormatter that renders them into the short
//! names shown in the type column.
//!
//! ## Key Types
//!
//! - [`TypeDescriptor`] — primitive, array, nullable, enum or named type
//! - [`NamedType`] — a user/domain type with optional generic arguments
//! - [`TypeRole`] — reference/definition pairing used for definition markers
//! - [`TypeLabel`] — formatted declared type plus runtime-type difference

use std::fmt;

// ============================================================================
// TypeRole
// ============================================================================

/// Role a named type plays in a reference/definition pairing.
///
/// Domain models often split an entity into a lightweight *reference* type and
/// a full *definition* type that extends it. A slot declared with a reference
/// type that actually holds a definition is flagged as a definition marker.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TypeRole {
    #[default]
    Plain,
    Reference,
    Definition,
}

// ============================================================================
// TypeDescriptor
// ============================================================================

/// A declared or runtime type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TypeDescriptor {
    /// Dynamically typed slot (any value)
    Object,
    /// Return type of methods without a result
    Void,
    Bool,
    U8,
    I8,
    U16,
    I16,
    U32,
    I32,
    U64,
    I64,
    F32,
    F64,
    Char,
    String,
    /// Fixed-size array with a declared element type
    Array(Box<TypeDescriptor>),
    /// Optional value of the inner type
    Nullable(Box<TypeDescriptor>),
    /// Enumeration; values are always leaves
    Enum { name: String },
    Named(NamedType),
}

/// A named (composite) type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NamedType {
    /// Namespace/module path, e.g. `"model::cil"`
    pub namespace: Option<String>,
    /// Type name; a trailing "`N" arity marker is tolerated and stripped
    pub name: String,
    pub generic_args: Vec<TypeDescriptor>,
    pub role: TypeRole,
}

impl TypeDescriptor {
    /// A named type without namespace or generic arguments.
    pub fn named(name: impl Into<String>) -> Self {
        Self::Named(NamedType {
            namespace: None,
            name: name.into(),
            generic_args: Vec::new(),
            role: TypeRole::Plain,
        })
    }

    /// A named type inside a namespace.
    pub fn named_in(namespace: impl Into<String>, name: impl Into<String>) -> Self {
        Self::Named(NamedType {
            namespace: Some(namespace.into()),
            name: name.into(),
            generic_args: Vec::new(),
            role: TypeRole::Plain,
        })
    }

    pub fn array(element: TypeDescriptor) -> Self {
        Self::Array(Box::new(element))
    }

    pub fn nullable(inner: TypeDescriptor) -> Self {
        Self::Nullable(Box::new(inner))
    }

    pub fn enumeration(name: impl Into<String>) -> Self {
        Self::Enum { name: name.into() }
    }

    /// Attach generic arguments to a named type. No-op for other kinds.
    pub fn with_args(mut self, args: Vec<TypeDescriptor>) -> Self {
        if let Self::Named(named) = &mut self {
            named.generic_args = args;
        }
        self
    }

    /// Set the reference/definition role of a named type. No-op for other kinds.
    pub fn with_role(mut self, role: TypeRole) -> Self {
        if let Self::Named(named) = &mut self {
            named.role = role;
        }
        self
    }

    pub fn role(&self) -> TypeRole {
        match self {
            Self::Named(named) => named.role,
            _ => TypeRole::Plain,
        }
    }

    /// Scalar primitives: booleans, fixed-width numbers, chars and strings.
    pub fn is_primitive(&self) -> bool {
        matches!(
            self,
            Self::Bool
                | Self::U8
                | Self::I8
                | Self::U16
                | Self::I16
                | Self::U32
                | Self::I32
                | Self::U64
                | Self::I64
                | Self::F32
                | Self::F64
                | Self::Char
                | Self::String
        )
    }

    /// Type-driven leaf/expandable decision.
    ///
    /// Primitives, primitive arrays, enums, void and nullable-of-leaf are
    /// leaves; everything else may have children.
    pub fn is_expandable(&self) -> bool {
        match self {
            Self::Void | Self::Enum { .. } => false,
            Self::Array(element) => !element.is_primitive(),
            Self::Nullable(inner) => inner.is_expandable(),
            Self::Object | Self::Named(_) => true,
            _ => false,
        }
    }

    /// Fully qualified name. An object whose default string conversion equals
    /// this is treated as having no meaningful display override.
    pub fn full_name(&self) -> String {
        match self {
            Self::Named(named) => {
                let mut out = String::new();
                if let Some(ns) = &named.namespace {
                    out.push_str(ns);
                    out.push_str("::");
                }
                out.push_str(base_name(&named.name));
                push_generic_args(&mut out, &named.generic_args, Self::full_name);
                out
            }
            Self::Array(element) => format!("[{}]", element.full_name()),
            Self::Nullable(inner) => format!("Option<{}>", inner.full_name()),
            other => format_type(other),
        }
    }
}

impl fmt::Display for TypeDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_type(self))
    }
}

// ============================================================================
// TypeFormatter
// ============================================================================

/// Render a type into its short display name.
///
/// Examples: `u8`, `[String]`, `Option<u32>`, `Dictionary<String, TypeDef>`.
pub fn format_type(ty: &TypeDescriptor) -> String {
    match ty {
        TypeDescriptor::Object => "object".to_string(),
        TypeDescriptor::Void => "()".to_string(),
        TypeDescriptor::Bool => "bool".to_string(),
        TypeDescriptor::U8 => "u8".to_string(),
        TypeDescriptor::I8 => "i8".to_string(),
        TypeDescriptor::U16 => "u16".to_string(),
        TypeDescriptor::I16 => "i16".to_string(),
        TypeDescriptor::U32 => "u32".to_string(),
        TypeDescriptor::I32 => "i32".to_string(),
        TypeDescriptor::U64 => "u64".to_string(),
        TypeDescriptor::I64 => "i64".to_string(),
        TypeDescriptor::F32 => "f32".to_string(),
        TypeDescriptor::F64 => "f64".to_string(),
        TypeDescriptor::Char => "char".to_string(),
        TypeDescriptor::String => "String".to_string(),
        TypeDescriptor::Array(element) => format!("[{}]", format_type(element)),
        TypeDescriptor::Nullable(inner) => format!("Option<{}>", format_type(inner)),
        TypeDescriptor::Enum { name } => base_name(name).to_string(),
        TypeDescriptor::Named(named) => {
            let mut out = base_name(&named.name).to_string();
            push_generic_args(&mut out, &named.generic_args, format_type);
            out
        }
    }
}

/// Strip a "`N" generic arity marker from a type name.
fn base_name(name: &str) -> &str {
    name.split('`').next().unwrap_or(name)
}

fn push_generic_args(out: &mut String, args: &[TypeDescriptor], render: fn(&TypeDescriptor) -> String) {
    if args.is_empty() {
        return;
    }
    out.push('<');
    for (i, arg) in args.iter().enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&render(arg));
    }
    out.push('>');
}

// ============================================================================
// TypeLabel
// ============================================================================

/// Formatted type column for a node.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeLabel {
    /// Formatted declared type
    pub declared: String,
    /// Formatted runtime type, set only when it differs from the declared type
    pub runtime: Option<String>,
    /// Declared as a reference kind but holding the matching definition kind
    pub definition_for_reference: bool,
}

impl TypeLabel {
    pub fn new(declared: &TypeDescriptor, runtime: Option<&TypeDescriptor>) -> Self {
        let runtime = runtime.filter(|rt| *rt != declared);
        Self {
            declared: format_type(declared),
            runtime: runtime.map(format_type),
            definition_for_reference: runtime.is_some_and(|rt| {
                declared.role() == TypeRole::Reference && rt.role() == TypeRole::Definition
            }),
        }
    }

    pub fn runtime_differs(&self) -> bool {
        self.runtime.is_some()
    }
}

impl fmt::Display for TypeLabel {
    /// `"<declared>"` or `"<declared> {<runtime>}"`
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.runtime {
            Some(runtime) => write!(f, "{} {{{}}}", self.declared, runtime),
            None => f.write_str(&self.declared),
        }
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_primitives() {
        assert_eq!(format_type(&TypeDescriptor::Bool), "bool");
        assert_eq!(format_type(&TypeDescriptor::I64), "i64");
        assert_eq!(format_type(&TypeDescriptor::String), "String");
        assert_eq!(format_type(&TypeDescriptor::Object), "object");
        assert_eq!(format_type(&TypeDescriptor::Void), "()");
    }

    #[test]
    fn test_format_array_and_nullable() {
        assert_eq!(format_type(&TypeDescriptor::array(TypeDescriptor::U8)), "[u8]");
        assert_eq!(
            format_type(&TypeDescriptor::nullable(TypeDescriptor::U32)),
            "Option<u32>"
        );
        assert_eq!(
            format_type(&TypeDescriptor::array(TypeDescriptor::named("Instruction"))),
            "[Instruction]"
        );
    }

    #[test]
    fn test_format_generic_strips_arity_marker() {
        let ty = TypeDescriptor::named_in("collections", "Dictionary`2").with_args(vec![
            TypeDescriptor::String,
            TypeDescriptor::named("TypeDef"),
        ]);
        assert_eq!(format_type(&ty), "Dictionary<String, TypeDef>");
        assert_eq!(ty.full_name(), "collections::Dictionary<String, TypeDef>");
    }

    #[test]
    fn test_format_nested_generics() {
        let ty = TypeDescriptor::named("Vec").with_args(vec![TypeDescriptor::nullable(
            TypeDescriptor::named("Map").with_args(vec![TypeDescriptor::I32, TypeDescriptor::Char]),
        )]);
        assert_eq!(format_type(&ty), "Vec<Option<Map<i32, char>>>");
    }

    #[test]
    fn test_format_enum_uses_short_name() {
        assert_eq!(
            format_type(&TypeDescriptor::enumeration("Attributes")),
            "Attributes"
        );
    }

    #[test]
    fn test_expandable_is_type_driven() {
        assert!(!TypeDescriptor::I32.is_expandable());
        assert!(!TypeDescriptor::String.is_expandable());
        assert!(!TypeDescriptor::array(TypeDescriptor::U8).is_expandable());
        assert!(!TypeDescriptor::enumeration("Kind").is_expandable());
        assert!(!TypeDescriptor::nullable(TypeDescriptor::I32).is_expandable());
        assert!(!TypeDescriptor::Void.is_expandable());

        assert!(TypeDescriptor::Object.is_expandable());
        assert!(TypeDescriptor::named("Module").is_expandable());
        assert!(TypeDescriptor::array(TypeDescriptor::named("Module")).is_expandable());
        assert!(TypeDescriptor::array(TypeDescriptor::Object).is_expandable());
        assert!(TypeDescriptor::nullable(TypeDescriptor::named("Module")).is_expandable());
    }

    #[test]
    fn test_full_name_with_namespace() {
        assert_eq!(
            TypeDescriptor::named_in("model", "Attribute").full_name(),
            "model::Attribute"
        );
        assert_eq!(TypeDescriptor::named("Attribute").full_name(), "Attribute");
        assert_eq!(TypeDescriptor::U8.full_name(), "u8");
        assert_eq!(
            TypeDescriptor::array(TypeDescriptor::named_in("m", "X")).full_name(),
            "[m::X]"
        );
    }

    #[test]
    fn test_label_same_runtime_type() {
        let ty = TypeDescriptor::named("Module");
        let label = TypeLabel::new(&ty, Some(&ty));
        assert!(!label.runtime_differs());
        assert_eq!(label.to_string(), "Module");
    }

    #[test]
    fn test_label_runtime_differs() {
        let label = TypeLabel::new(&TypeDescriptor::Object, Some(&TypeDescriptor::I32));
        assert!(label.runtime_differs());
        assert!(!label.definition_for_reference);
        assert_eq!(label.to_string(), "object {i32}");
    }

    #[test]
    fn test_label_without_runtime_type() {
        let label = TypeLabel::new(&TypeDescriptor::named("Module"), None);
        assert!(!label.runtime_differs());
        assert_eq!(label.to_string(), "Module");
    }

    #[test]
    fn test_label_definition_for_reference() {
        let declared = TypeDescriptor::named("TypeRef").with_role(TypeRole::Reference);
        let runtime = TypeDescriptor::named("TypeDef").with_role(TypeRole::Definition);
        let label = TypeLabel::new(&declared, Some(&runtime));
        assert!(label.definition_for_reference);
        assert_eq!(label.to_string(), "TypeRef {TypeDef}");
    }

    #[test]
    fn test_label_reference_to_plain_is_not_marker() {
        let declared = TypeDescriptor::named("TypeRef").with_role(TypeRole::Reference);
        let runtime = TypeDescriptor::named("GenericInstance");
        assert!(!TypeLabel::new(&declared, Some(&runtime)).definition_for_reference);
    }
}
