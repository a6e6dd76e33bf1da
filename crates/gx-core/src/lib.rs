//! # gx-core - Core Domain Types
//!
//! Foundation crate for Graph Explorer. Provides the value model, the
//! member-enumeration contract domain models implement, type descriptors,
//! the value/type formatters, error handling and logging setup.
//!
//! This crate has **zero internal dependencies** -- it only depends on external
//! crates (serde, serde_json, thiserror, tracing, dirs).
//!
//! ## Public API
//!
//! ### Values (`value`, `inspect`)
//! - [`Value`] - A scalar, captured member failure, or object handle
//! - [`ObjectRef`] - Shared handle to an externally owned object
//! - [`Inspect`] - Member-enumeration contract implemented by model types
//! - [`Member`], [`MemberKind`], [`MemberError`] - Named members and failures
//!
//! ### Types (`types`)
//! - [`TypeDescriptor`] - Declared/runtime type
//! - [`format_type()`] - TypeFormatter
//! - [`TypeLabel`] - Declared type plus differing runtime type
//!
//! ### Formatting (`format`)
//! - [`format_value()`] - ValueFormatter
//! - [`Classification`], [`ValueStyle`] - Severity and colour hints
//!
//! ### Runtime-built objects (`dynamic`)
//! - [`DynamicObject`], [`SequenceObject`]
//!
//! ## Prelude
//!
//! Import commonly used types with:
//! ```rust
//! use gx_core::prelude::*;
//! ```

pub mod dynamic;
pub mod error;
pub mod format;
pub mod inspect;
pub mod logging;
pub mod types;
pub mod value;

/// Prelude for common imports used throughout all Graph Explorer crates
pub mod prelude {
    pub use super::error::{Error, Result};
    pub use tracing::{debug, error, info, instrument, trace, warn};
}

pub use dynamic::{DynamicObject, SequenceObject};
pub use error::{Error, Result};
pub use format::{
    format_value, group_hex_digits, item_count, Classification, FormatOptions, FormattedValue,
    ValueStyle, DEFAULT_ARRAY_PREVIEW_LIMIT, REFERENCE_LOOP,
};
pub use inspect::{
    ElementLevel, Elements, Inspect, Member, MemberError, MemberKind, MemberResult, OpaqueParts,
};
pub use types::{format_type, NamedType, TypeDescriptor, TypeLabel, TypeRole};
pub use value::{ObjectRef, Value};
