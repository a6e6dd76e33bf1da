//! ValueFormatter: raw value + declared type → display string and
//! classification.

use serde::Serialize;

use crate::types::TypeDescriptor;
use crate::value::Value;

/// Fixed display value of a node that closes a reference cycle.
pub const REFERENCE_LOOP: &str = "Reference loop";

/// Default number of items shown in a primitive-array preview.
pub const DEFAULT_ARRAY_PREVIEW_LIMIT: usize = 16;

/// Display/semantic category of a node's value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    #[default]
    Normal,
    Error,
    DefinitionMarker,
    HigherLevelMarker,
    CycleMarker,
}

impl Classification {
    /// Markers that keep search from descending into a node.
    pub fn blocks_traversal(self) -> bool {
        matches!(
            self,
            Self::CycleMarker | Self::DefinitionMarker | Self::HigherLevelMarker
        )
    }
}

/// Colour hint for the presentation shell.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ValueStyle {
    #[default]
    Plain,
    Dimmed,
    Accent,
}

/// Output of [`format_value`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormattedValue {
    pub text: String,
    pub classification: Classification,
    pub style: ValueStyle,
    /// Whether children may be materialized for this value
    pub expandable: bool,
}

impl FormattedValue {
    fn plain(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            classification: Classification::Normal,
            style: ValueStyle::Plain,
            expandable: false,
        }
    }

    fn dimmed(mut self) -> Self {
        self.style = ValueStyle::Dimmed;
        self
    }

    /// Sentinel for a node whose value already appears on its ancestor path.
    pub fn reference_loop() -> Self {
        Self {
            text: REFERENCE_LOOP.to_string(),
            classification: Classification::CycleMarker,
            style: ValueStyle::Dimmed,
            expandable: false,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatOptions {
    pub array_preview_limit: usize,
}

impl Default for FormatOptions {
    fn default() -> Self {
        Self {
            array_preview_limit: DEFAULT_ARRAY_PREVIEW_LIMIT,
        }
    }
}

/// Format a value for its declared slot type.
pub fn format_value(value: &Value, declared: &TypeDescriptor, options: &FormatOptions) -> FormattedValue {
    match value {
        Value::Null => FormattedValue::plain("null").dimmed(),
        Value::Bool(b) => FormattedValue::plain(b.to_string()),
        Value::U8(v) => FormattedValue::plain(with_hex(*v, format!("{v:02x}"))),
        Value::I8(v) => FormattedValue::plain(with_hex(*v, format!("{:02x}", *v as u8))),
        Value::U16(v) => FormattedValue::plain(with_hex(*v, format!("{v:04x}"))),
        Value::I16(v) => FormattedValue::plain(with_hex(*v, format!("{:04x}", *v as u16))),
        Value::U32(v) => FormattedValue::plain(with_hex(*v, format!("{v:08x}"))),
        Value::I32(v) => FormattedValue::plain(with_hex(*v, format!("{:08x}", *v as u32))),
        Value::U64(v) => FormattedValue::plain(with_hex(*v, format!("{v:016x}"))),
        Value::I64(v) => FormattedValue::plain(with_hex(*v, format!("{:016x}", *v as u64))),
        Value::Error(err) => FormattedValue {
            text: format!("[{}]", err.message),
            classification: Classification::Error,
            style: ValueStyle::Plain,
            expandable: false,
        },
        Value::Object(obj) => {
            let runtime = obj.runtime_type();
            let expandable = declared.is_expandable() && runtime.is_expandable();

            if let Some(elements) = obj.elements() {
                if !expandable {
                    return FormattedValue::plain(preview(elements.items(), options.array_preview_limit));
                }
                return FormattedValue {
                    expandable: !elements.is_empty(),
                    ..FormattedValue::plain(item_count(elements.len())).dimmed()
                };
            }

            let display = obj.display();
            if display == runtime.full_name() {
                if let Some(parts) = obj.opaque_parts() {
                    let text = match parts.type_name {
                        Some(type_name) => format!("({type_name}) {}", parts.value.to_plain_string()),
                        None => parts.value.to_plain_string(),
                    };
                    return FormattedValue {
                        text,
                        classification: Classification::Normal,
                        style: ValueStyle::Accent,
                        expandable,
                    };
                }
            }

            FormattedValue {
                expandable,
                ..FormattedValue::plain(display)
            }
        }
        other => FormattedValue::plain(other.to_plain_string()),
    }
}

/// `"(empty)"`, `"(1 item)"` or `"(N items)"`.
pub fn item_count(count: usize) -> String {
    match count {
        0 => "(empty)".to_string(),
        1 => "(1 item)".to_string(),
        n => format!("({n} items)"),
    }
}

/// Split hex digits into space-separated pairs from the right.
///
/// `"00001000"` → `"00 00 10 00"`, `"abc"` → `"a bc"`.
pub fn group_hex_digits(digits: &str) -> String {
    let chars: Vec<char> = digits.chars().collect();
    let lead = chars.len() % 2;
    let mut out = String::with_capacity(chars.len() + chars.len() / 2);
    for (i, c) in chars.iter().enumerate() {
        if i > 0 && (i + 2 - lead) % 2 == 0 {
            out.push(' ');
        }
        out.push(*c);
    }
    out
}

fn with_hex(decimal: impl std::fmt::Display, hex: String) -> String {
    format!("{decimal} (0x{})", group_hex_digits(&hex))
}

fn preview(items: &[Value], limit: usize) -> String {
    let mut out = String::from("[");
    for (i, item) in items.iter().take(limit).enumerate() {
        if i > 0 {
            out.push_str(", ");
        }
        out.push_str(&item.to_plain_string());
    }
    if items.len() > limit {
        if limit > 0 {
            out.push_str(", ");
        }
        out.push('…');
    }
    out.push(']');
    out
}
